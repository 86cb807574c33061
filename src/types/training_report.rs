use std::fmt;

use serde::{Deserialize, Serialize};

/// The backend's learning-rate figure.
///
/// The reference backend formats it as a percentage string (`"12.5%"`), but a
/// bare number is accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LearningRate {
    /// Pre-formatted text.
    Text(String),
    /// A raw number.
    Number(f64),
}

impl fmt::Display for LearningRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningRate::Text(text) => write!(f, "{text}"),
            LearningRate::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Snapshot of the backend's training statistics.
///
/// Owned by the backend; the client only displays it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Number of logged conversations.
    #[serde(default)]
    pub total_conversations: u64,

    /// Number of conversations marked good or taught.
    #[serde(default)]
    pub positive_feedback: u64,

    /// Number of conversations marked bad.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_feedback: Option<u64>,

    /// Share of positive conversations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<LearningRate>,

    /// Number of distinct learned patterns.
    #[serde(default)]
    pub learned_patterns: u64,

    /// Number of responses across all learned patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pattern_responses: Option<u64>,
}

impl TrainingStats {
    /// True once the backend has learned at least one pattern.
    pub fn is_model_trained(&self) -> bool {
        self.learned_patterns > 0
    }
}

/// Body returned by `GET /training_report`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Whether the backend's training features are switched on.
    #[serde(default)]
    pub available: bool,

    /// The statistics, present when `available` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TrainingStats>,

    /// Explanation when training is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Backend-side failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::from_str;

    #[test]
    fn available_report() {
        let report: TrainingReport = from_str(
            r#"{
                "available": true,
                "stats": {
                    "total_conversations": 12,
                    "positive_feedback": 3,
                    "negative_feedback": 1,
                    "learned_patterns": 4,
                    "total_pattern_responses": 9,
                    "learning_rate": "25.0%"
                }
            }"#,
        )
        .unwrap();
        assert!(report.available);
        let stats = report.stats.unwrap();
        assert_eq!(stats.total_conversations, 12);
        assert_eq!(stats.positive_feedback, 3);
        assert_eq!(
            stats.learning_rate,
            Some(LearningRate::Text("25.0%".to_string()))
        );
        assert!(stats.is_model_trained());
    }

    #[test]
    fn unavailable_report() {
        let report: TrainingReport = from_str(
            r#"{"available": false, "message": "Training features not available."}"#,
        )
        .unwrap();
        assert!(!report.available);
        assert!(report.stats.is_none());
    }

    #[test]
    fn numeric_learning_rate() {
        let stats: TrainingStats = from_str(r#"{"learning_rate": 0.5}"#).unwrap();
        assert_eq!(stats.learning_rate, Some(LearningRate::Number(0.5)));
        assert_eq!(stats.learning_rate.unwrap().to_string(), "0.5");
        assert!(!TrainingStats::default().is_model_trained());
    }
}
