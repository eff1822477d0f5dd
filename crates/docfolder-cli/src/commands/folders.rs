use docfolder_api_models::RecommendationQuery;

use crate::cli::{OutputFormat, RecommendArgs};
use crate::client::{AppContext, CliResult};
use crate::output::render_recommendation;

pub(crate) async fn handle_folder_recommend(
    ctx: &AppContext,
    args: RecommendArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let query = RecommendationQuery {
        document_type_id: args.document_type_id,
        sheets_count: args.sheets_count,
    };
    let folder = ctx.api.recommended_folder(&query).await?;
    render_recommendation(folder.as_ref(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context_with, context_with_token};
    use anyhow::{Result, anyhow};
    use docfolder_test_support::fixtures::sample_folder;
    use httpmock::prelude::*;
    use serde_json::Value;

    #[tokio::test]
    async fn null_recommendation_is_not_an_error() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/protected/folders/recommended")
                .query_param("document_type_id", "2")
                .query_param("sheets_count", "0")
                .header("authorization", "Bearer abc");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(Value::Null);
        });

        let ctx = context_with_token(&server, "abc")?;
        handle_folder_recommend(
            &ctx,
            RecommendArgs {
                document_type_id: 2,
                sheets_count: 0,
            },
            OutputFormat::Table,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        ctx.api.logout()?;
        Ok(())
    }

    #[tokio::test]
    async fn recommendation_is_rendered() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/protected/folders/recommended")
                .query_param("document_type_id", "2")
                .query_param("sheets_count", "12");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(sample_folder(3));
        });

        let ctx = context_with_token(&server, "abc")?;
        handle_folder_recommend(
            &ctx,
            RecommendArgs {
                document_type_id: 2,
                sheets_count: 12,
            },
            OutputFormat::Json,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        ctx.api.logout()?;
        Ok(())
    }

    #[tokio::test]
    async fn unauthenticated_request_exits_with_four() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/protected/folders/recommended")
                .header_missing("authorization");
            then.status(401);
        });

        let ctx = context_with(&server)?;
        let err = handle_folder_recommend(
            &ctx,
            RecommendArgs {
                document_type_id: 2,
                sheets_count: 1,
            },
            OutputFormat::Table,
        )
        .await
        .expect_err("no session");
        assert_eq!(err.exit_code(), 4);
        mock.assert();
        Ok(())
    }
}
