use serde::{Deserialize, Serialize};

/// Body returned by `POST /retrain`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrainResponse {
    /// Whether the model was retrained.
    #[serde(default)]
    pub success: bool,

    /// Explanation, mostly useful on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::from_str;

    #[test]
    fn refusal_carries_message() {
        let response: RetrainResponse = from_str(
            r#"{"success": false, "message": "Retraining failed - no training data available"}"#,
        )
        .unwrap();
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("Retraining failed - no training data available")
        );
    }
}
