use crate::types::TrainingStats;

/// Model status shown once the backend has learned a pattern.
pub const MODEL_TRAINED: &str = "Trained ✅";

/// Model status shown before the backend has learned anything.
pub const MODEL_NOT_TRAINED: &str = "Not Trained ❌";

/// Read-only display fields derived from a [`TrainingStats`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsDisplay {
    /// Total conversations.
    pub conversation_count: String,
    /// Positive feedback count.
    pub feedback_count: String,
    /// Learning rate, or `N/A`.
    pub average_rating: String,
    /// Trained / not trained.
    pub model_status: String,
}

impl From<&TrainingStats> for StatsDisplay {
    fn from(stats: &TrainingStats) -> Self {
        Self {
            conversation_count: stats.total_conversations.to_string(),
            feedback_count: stats.positive_feedback.to_string(),
            average_rating: stats
                .learning_rate
                .as_ref()
                .map(|rate| rate.to_string())
                .filter(|rate| !rate.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            model_status: if stats.is_model_trained() {
                MODEL_TRAINED.to_string()
            } else {
                MODEL_NOT_TRAINED.to_string()
            },
        }
    }
}

impl Default for StatsDisplay {
    fn default() -> Self {
        Self::from(&TrainingStats::default())
    }
}
