use chrono::{Duration, SecondsFormat, Utc};
use regex::Regex;

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert phrases like "3 hours ago", "2 days ago", "1 week ago" into an
/// RFC 3339 UTC timestamp. Months count as 30 days and years as 365; no
/// calendar-aware arithmetic. Anything unparsable maps to the current time.
pub fn parse_relative_time_to_iso(text: &str) -> String {
    let text = text.to_lowercase();
    let num = match first_int(&text) {
        Some(n) => n,
        None => return now_iso(),
    };

    let now = Utc::now();
    let delta = if text.contains("minute") {
        Duration::try_minutes(num)
    } else if text.contains("hour") {
        Duration::try_hours(num)
    } else if text.contains("day") {
        Duration::try_days(num)
    } else if text.contains("week") {
        Duration::try_weeks(num)
    } else if text.contains("month") {
        Duration::try_days(num.saturating_mul(30))
    } else if text.contains("year") {
        Duration::try_days(num.saturating_mul(365))
    } else {
        None
    };

    match delta.and_then(|d| now.checked_sub_signed(d)) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => now.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn first_int(text: &str) -> Option<i64> {
    Regex::new(r"\d+")
        .unwrap()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn seconds_from_now(iso: &str, expected_offset: Duration) -> i64 {
        let parsed = DateTime::parse_from_rfc3339(iso).unwrap();
        let expected = Utc::now() - expected_offset;
        (parsed.with_timezone(&Utc) - expected).num_seconds().abs()
    }

    #[test]
    fn hours_ago_subtracts_hours() {
        let iso = parse_relative_time_to_iso("3 hours ago");
        assert!(seconds_from_now(&iso, Duration::hours(3)) <= 1);
    }

    #[test]
    fn days_and_weeks_subtract_their_durations() {
        let iso = parse_relative_time_to_iso("2 days ago");
        assert!(seconds_from_now(&iso, Duration::days(2)) <= 1);
        let iso = parse_relative_time_to_iso("1 week ago");
        assert!(seconds_from_now(&iso, Duration::weeks(1)) <= 1);
    }

    #[test]
    fn months_approximate_to_thirty_days() {
        let iso = parse_relative_time_to_iso("2 months ago");
        assert!(seconds_from_now(&iso, Duration::days(60)) <= 1);
    }

    #[test]
    fn unparsable_text_yields_current_time() {
        let iso = parse_relative_time_to_iso("posted recently");
        assert!(seconds_from_now(&iso, Duration::zero()) <= 1);
    }

    #[test]
    fn integer_without_unit_yields_current_time() {
        let iso = parse_relative_time_to_iso("around 7 or so");
        assert!(seconds_from_now(&iso, Duration::zero()) <= 1);
    }
}
