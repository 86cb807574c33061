use serde::{Deserialize, Serialize};

/// Body returned by `GET /export_training`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResponse {
    /// Whether the export was written.
    #[serde(default)]
    pub success: bool,

    /// Server-side file the data was exported to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Explanation, mostly useful on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::from_str;

    #[test]
    fn export_success() {
        let response: ExportResponse = from_str(
            r#"{"success": true, "filename": "exported_training_data.json", "message": "ok"}"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(
            response.filename.as_deref(),
            Some("exported_training_data.json")
        );
    }

    #[test]
    fn error_body_is_failure() {
        let response: ExportResponse =
            from_str(r#"{"error": "Training not available in simple mode"}"#).unwrap();
        assert!(!response.success);
    }
}
