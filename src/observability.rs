use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatterbox.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("chatterbox.client.request_errors");
pub(crate) static CLIENT_LOG_WRITE_ERRORS: Counter =
    Counter::new("chatterbox.client.log_write_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatterbox.client.request_duration_seconds");

pub(crate) static SESSION_SUBMITS: Counter = Counter::new("chatterbox.session.submits");
pub(crate) static SESSION_REJECTED_SUBMITS: Counter =
    Counter::new("chatterbox.session.rejected_submits");
pub(crate) static SESSION_APOLOGIES: Counter = Counter::new("chatterbox.session.apologies");
pub(crate) static SESSION_FEEDBACK_SENT: Counter =
    Counter::new("chatterbox.session.feedback_sent");
pub(crate) static SESSION_STATS_REFRESH_FAILURES: Counter =
    Counter::new("chatterbox.session.stats_refresh_failures");
pub(crate) static SESSION_RETRAINS: Counter = Counter::new("chatterbox.session.retrains");
pub(crate) static SESSION_EXCHANGE_DURATION: Moments =
    Moments::new("chatterbox.session.exchange_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_LOG_WRITE_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_SUBMITS);
    collector.register_counter(&SESSION_REJECTED_SUBMITS);
    collector.register_counter(&SESSION_APOLOGIES);
    collector.register_counter(&SESSION_FEEDBACK_SENT);
    collector.register_counter(&SESSION_STATS_REFRESH_FAILURES);
    collector.register_counter(&SESSION_RETRAINS);
    collector.register_moments(&SESSION_EXCHANGE_DURATION);
}
