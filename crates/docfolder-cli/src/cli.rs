//! Argument parsing, logging setup, and command dispatch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use docfolder_client::{ClientConfig, DEFAULT_API_URL, default_session_path, parse_api_url};
use docfolder_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use reqwest::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, ConsoleNotifier};
use crate::commands::auth::{handle_login, handle_logout, handle_register, handle_status};
use crate::commands::documents::{
    handle_doc_create, handle_doc_delete, handle_doc_get, handle_doc_update,
};
use crate::commands::folders::handle_folder_recommend;

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = install_logging(&cli) {
        eprintln!("warning: {err:#}");
    }
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    tracing::debug!(command = command_name, trace_id = %trace_id, "dispatching command");

    match dispatch(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = build_context(&cli, trace_id)?;
    let output = cli.output;

    match cli.command {
        Command::Register(args) => handle_register(&ctx, args).await,
        Command::Login(args) => handle_login(&ctx, args).await,
        Command::Logout => handle_logout(&ctx),
        Command::Status => handle_status(&ctx, output),
        Command::Doc(doc) => match doc {
            DocCommand::Create(args) => handle_doc_create(&ctx, args, output).await,
            DocCommand::Get(args) => handle_doc_get(&ctx, args, output).await,
            DocCommand::Update(args) => handle_doc_update(&ctx, args, output).await,
            DocCommand::Delete(args) => handle_doc_delete(&ctx, args).await,
        },
        Command::Folder(FolderCommand::Recommend(args)) => {
            handle_folder_recommend(&ctx, args, output).await
        }
    }
}

fn build_context(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let session_file = cli
        .session_file
        .clone()
        .or_else(default_session_path)
        .ok_or_else(|| {
            CliError::validation(
                "cannot locate a home directory; pass --session-file or set DOCFOLDER_SESSION_FILE",
            )
        })?;

    let mut config = ClientConfig::new(cli.api_url.clone()).with_request_id(trace_id);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    AppContext::open(config, session_file, Arc::new(ConsoleNotifier))
}

fn install_logging(cli: &Cli) -> anyhow::Result<()> {
    let format = cli
        .log_format
        .as_deref()
        .map_or_else(LogFormat::infer, LogFormat::from_label);
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: option_env!("DOCFOLDER_BUILD_SHA").unwrap_or("dev"),
    })
}

#[derive(Parser)]
#[command(
    name = "docfolder",
    version,
    about = "Command-line client for the docfolder document API"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "DOCFOLDER_API_URL",
        value_parser = parse_api_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "DOCFOLDER_HTTP_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Whole-request timeout in seconds (waits indefinitely when unset)"
    )]
    timeout: Option<u64>,
    #[arg(
        long,
        global = true,
        env = "DOCFOLDER_SESSION_FILE",
        help = "Session file (defaults to $DOCFOLDER_HOME/session.json)"
    )]
    session_file: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "DOCFOLDER_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "DOCFOLDER_LOG_FORMAT",
        help = "Log format: pretty or json (inferred from the build when unset)"
    )]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create an account.
    Register(CredentialArgs),
    /// Log in and store the session token.
    Login(CredentialArgs),
    /// Forget the stored session token.
    Logout,
    /// Show whether a session token is stored.
    Status,
    /// Create, fetch, update, or delete documents.
    #[command(subcommand)]
    Doc(DocCommand),
    /// Folder recommendations.
    #[command(subcommand)]
    Folder(FolderCommand),
}

#[derive(Subcommand)]
pub(crate) enum DocCommand {
    /// Create a document.
    Create(DocCreateArgs),
    /// Fetch a document by identifier.
    Get(DocIdArgs),
    /// Change the title, sheet count, or folder of a document.
    Update(DocUpdateArgs),
    /// Delete a document.
    Delete(DocIdArgs),
}

#[derive(Subcommand)]
pub(crate) enum FolderCommand {
    /// Ask the server which folder fits a document.
    Recommend(RecommendArgs),
}

#[derive(Args)]
pub(crate) struct CredentialArgs {
    #[arg(long, env = "DOCFOLDER_EMAIL")]
    pub(crate) email: String,
    #[arg(
        long,
        env = "DOCFOLDER_PASSWORD",
        hide_env_values = true,
        help = "Account password (prompted for when omitted on a terminal)"
    )]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct DocCreateArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) sheets_count: i64,
    #[arg(long)]
    pub(crate) document_type_id: u64,
    #[arg(long, help = "File into this folder instead of letting the server choose")]
    pub(crate) folder_id: Option<u64>,
}

#[derive(Args)]
pub(crate) struct DocIdArgs {
    #[arg(help = "Document identifier")]
    pub(crate) id: u64,
}

#[derive(Args)]
pub(crate) struct DocUpdateArgs {
    #[arg(help = "Document identifier")]
    pub(crate) id: u64,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) sheets_count: Option<i64>,
    #[arg(long)]
    pub(crate) folder_id: Option<u64>,
}

#[derive(Args)]
pub(crate) struct RecommendArgs {
    #[arg(long)]
    pub(crate) document_type_id: u64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) sheets_count: i64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Register(_) => "register",
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Status => "status",
        Command::Doc(DocCommand::Create(_)) => "doc_create",
        Command::Doc(DocCommand::Get(_)) => "doc_get",
        Command::Doc(DocCommand::Update(_)) => "doc_update",
        Command::Doc(DocCommand::Delete(_)) => "doc_delete",
        Command::Folder(FolderCommand::Recommend(_)) => "folder_recommend",
    }
}
