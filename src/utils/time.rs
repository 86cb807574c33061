use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Format an instant as a two-digit `HH:MM` display timestamp.
pub fn display_time(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| format!("{:02}:{:02}", at.hour(), at.minute()))
}

/// The current wall-clock time as a display timestamp.
///
/// Falls back to UTC when the local offset cannot be determined.
pub fn local_display_time() -> String {
    let now = OffsetDateTime::now_utc();
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    display_time(now.to_offset(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn pads_to_two_digits() {
        assert_eq!(display_time(datetime!(2024-03-05 09:07 UTC)), "09:07");
        assert_eq!(display_time(datetime!(2024-03-05 23:59 UTC)), "23:59");
    }

    #[test]
    fn local_time_shape() {
        let now = local_display_time();
        assert_eq!(now.len(), 5);
        assert_eq!(&now[2..3], ":");
    }
}
