use docfolder_api_models::{DocumentCreateRequest, DocumentUpdateRequest};

use crate::cli::{DocCreateArgs, DocIdArgs, DocUpdateArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_value;

pub(crate) async fn handle_doc_create(
    ctx: &AppContext,
    args: DocCreateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let request = DocumentCreateRequest {
        title: args.title,
        sheets_count: args.sheets_count,
        document_type_id: args.document_type_id,
        folder_id: args.folder_id,
    };
    let document = ctx.api.create_document(&request).await?;
    render_value(&document, format)
}

pub(crate) async fn handle_doc_get(
    ctx: &AppContext,
    args: DocIdArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let document = ctx.api.get_document(args.id).await?;
    render_value(&document, format)
}

pub(crate) async fn handle_doc_update(
    ctx: &AppContext,
    args: DocUpdateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let request = DocumentUpdateRequest {
        title: args.title,
        sheets_count: args.sheets_count,
        folder_id: args.folder_id,
    };
    if request.is_empty() {
        return Err(CliError::validation(
            "nothing to update; pass at least one of --title, --sheets-count, --folder-id",
        ));
    }
    let document = ctx.api.update_document(args.id, &request).await?;
    render_value(&document, format)
}

pub(crate) async fn handle_doc_delete(ctx: &AppContext, args: DocIdArgs) -> CliResult<()> {
    ctx.api.delete_document(args.id).await?;
    println!("Document {} deleted", args.id);
    Ok(())
}
