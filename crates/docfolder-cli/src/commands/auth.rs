use std::io::{self, IsTerminal};

use anyhow::anyhow;
use docfolder_api_models::Credentials;
use docfolder_client::FileTokenStore;

use crate::cli::{CredentialArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_status;

pub(crate) async fn handle_register(ctx: &AppContext, args: CredentialArgs) -> CliResult<()> {
    let credentials = resolve_credentials(args)?;
    let response = ctx.api.register(&credentials).await?;
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("Registration successful")
    );
    Ok(())
}

pub(crate) async fn handle_login(ctx: &AppContext, args: CredentialArgs) -> CliResult<()> {
    let credentials = resolve_credentials(args)?;
    ctx.api.login(&credentials).await?;
    println!("Logged in as {}", credentials.email);
    Ok(())
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.api.logout()?;
    println!("Logged out");
    Ok(())
}

/// Reports the stored session without contacting the server.
pub(crate) fn handle_status(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let state = ctx.api.session().state();
    let saved_at = FileTokenStore::new(&ctx.session_file)
        .load_record()
        .map_err(CliError::failure)?
        .map(|record| record.saved_at.to_rfc3339());
    render_status(&state, &ctx.session_file, saved_at.as_deref(), format)
}

fn resolve_credentials(args: CredentialArgs) -> CliResult<Credentials> {
    let email = args.email.trim();
    if email.is_empty() {
        return Err(CliError::validation("email cannot be empty"));
    }
    let password = resolve_password(args.password)?;
    Ok(Credentials::new(email, password))
}

/// Passwords are sent exactly as typed; only an empty value is refused.
fn resolve_password(password: Option<String>) -> CliResult<String> {
    if let Some(value) = password {
        return non_empty_password(value);
    }

    if io::stdin().is_terminal() {
        let value = rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from terminal: {err}"))
        })?;
        non_empty_password(value)
    } else {
        Err(CliError::validation(
            "password required; supply via --password or DOCFOLDER_PASSWORD when running non-interactively",
        ))
    }
}

fn non_empty_password(value: String) -> CliResult<String> {
    if value.is_empty() {
        Err(CliError::validation("password cannot be empty"))
    } else {
        Ok(value)
    }
}
