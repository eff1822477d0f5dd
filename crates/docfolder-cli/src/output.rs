//! Output renderers for API payloads and session status.

use std::path::Path;

use anyhow::anyhow;
use docfolder_client::{AuthEvent, AuthState};
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) const NO_FOLDER_MESSAGE: &str = "No suitable folder found";

pub(crate) fn render_value(value: &Value, format: OutputFormat) -> CliResult<()> {
    let text = format_value(value, format)?;
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}

pub(crate) fn format_value(value: &Value, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Table => Ok(table_lines(value)),
    }
}

/// A missing recommendation is a normal answer, not an error.
pub(crate) fn render_recommendation(folder: Option<&Value>, format: OutputFormat) -> CliResult<()> {
    match (folder, format) {
        (Some(folder), _) => render_value(folder, format),
        (None, OutputFormat::Json) => render_value(&Value::Null, format),
        (None, OutputFormat::Table) => {
            println!("{NO_FOLDER_MESSAGE}");
            Ok(())
        }
    }
}

pub(crate) fn render_status(
    state: &AuthState,
    session_file: &Path,
    saved_at: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    println!("{}", format_status(state, session_file, saved_at, format)?);
    Ok(())
}

pub(crate) fn format_status(
    state: &AuthState,
    session_file: &Path,
    saved_at: Option<&str>,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => format_value(
            &json!({
                "status": state.label(),
                "authenticated": state.is_authenticated(),
                "session_file": session_file.display().to_string(),
                "saved_at": saved_at,
            }),
            format,
        ),
        OutputFormat::Table => {
            let mut lines = vec![
                format!("status: {}", state.label()),
                format!("session file: {}", session_file.display()),
            ];
            if let Some(saved_at) = saved_at {
                lines.push(format!("saved at: {saved_at}"));
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Status line shown after a session transition.
pub(crate) const fn status_line(event: AuthEvent) -> &'static str {
    match event {
        AuthEvent::LoggedIn => "Authenticated",
        AuthEvent::LoggedOut => "Not authenticated",
        AuthEvent::Expired => "Not authenticated (session expired)",
    }
}

fn table_lines(value: &Value) -> String {
    match value {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| format!("{key}: {}", scalar(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfolder_test_support::fixtures::{sample_document, sample_folder};

    #[test]
    fn table_prints_one_field_per_line() -> anyhow::Result<()> {
        let text = format_value(&sample_document(7), OutputFormat::Table)?;
        assert!(text.contains("ID: 7"));
        assert!(text.contains("title: Quarterly report"));
        assert!(text.contains("DeletedAt: -"));
        assert!(text.contains(r#"document_type: {"ID":2,"Name":"Report"}"#));
        Ok(())
    }

    #[test]
    fn json_output_is_pretty_printed() -> anyhow::Result<()> {
        let text = format_value(&sample_folder(3), OutputFormat::Json)?;
        let parsed: Value = serde_json::from_str(&text)?;
        assert_eq!(parsed, sample_folder(3));
        assert!(text.contains('\n'));
        Ok(())
    }

    #[test]
    fn scalars_render_without_quotes() -> anyhow::Result<()> {
        assert_eq!(format_value(&json!("plain"), OutputFormat::Table)?, "plain");
        assert_eq!(format_value(&json!(12), OutputFormat::Table)?, "12");
        assert_eq!(format_value(&json!({}), OutputFormat::Table)?, "");
        Ok(())
    }

    #[test]
    fn status_reports_label_and_saved_time() -> anyhow::Result<()> {
        let state = AuthState::Authenticated {
            token: "secret".into(),
        };
        let table = format_status(
            &state,
            Path::new("/tmp/session.json"),
            Some("2026-01-05T10:00:00+00:00"),
            OutputFormat::Table,
        )?;
        assert_eq!(
            table,
            "status: Authenticated\nsession file: /tmp/session.json\nsaved at: 2026-01-05T10:00:00+00:00"
        );
        assert!(!table.contains("secret"));

        let json = format_status(
            &AuthState::Unauthenticated,
            Path::new("/tmp/session.json"),
            None,
            OutputFormat::Json,
        )?;
        let parsed: Value = serde_json::from_str(&json)?;
        assert_eq!(parsed["status"], "Not authenticated");
        assert_eq!(parsed["authenticated"], false);
        assert_eq!(parsed["saved_at"], Value::Null);
        Ok(())
    }

    #[test]
    fn status_lines_match_session_state() {
        assert_eq!(status_line(AuthEvent::LoggedIn), "Authenticated");
        assert_eq!(status_line(AuthEvent::LoggedOut), "Not authenticated");
        assert!(status_line(AuthEvent::Expired).starts_with("Not authenticated"));
    }
}
