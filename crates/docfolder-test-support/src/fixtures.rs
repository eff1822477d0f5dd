//! Test fixtures shaped like the document API's responses.

use std::env;
use std::path::PathBuf;

use serde_json::{Value, json};
use uuid::Uuid;

/// Document as returned by `GET /protected/documents/{id}`.
#[must_use]
pub fn sample_document(id: u64) -> Value {
    json!({
        "ID": id,
        "CreatedAt": "2026-01-05T10:00:00Z",
        "UpdatedAt": "2026-01-05T10:00:00Z",
        "DeletedAt": null,
        "title": "Quarterly report",
        "sheets_count": 12,
        "folder_id": 3,
        "document_type_id": 2,
        "document_type": {"ID": 2, "Name": "Report"}
    })
}

/// Folder as returned by `GET /protected/folders/recommended`.
#[must_use]
pub fn sample_folder(id: u64) -> Value {
    json!({
        "ID": id,
        "Name": "Reports 2026",
        "TotalSheets": 480,
        "UsedSheets": 120,
        "FolderTypeID": 2
    })
}

/// `{error}` document the API returns on failures.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

/// Unique, not-yet-created path under the system temp directory.
#[must_use]
pub fn temp_path(name: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!(
        "docfolder-test-{}-{}-{name}",
        std::process::id(),
        Uuid::new_v4()
    ));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_paths_are_unique() {
        let first = temp_path("session.json");
        let second = temp_path("session.json");
        assert_ne!(first, second);
        assert!(!first.exists());
    }

    #[test]
    fn fixtures_use_api_field_names() {
        assert_eq!(sample_document(7)["ID"], 7);
        assert_eq!(sample_document(7)["sheets_count"], 12);
        assert_eq!(sample_folder(3)["Name"], "Reports 2026");
        assert_eq!(error_body("nope")["error"], "nope");
    }
}
