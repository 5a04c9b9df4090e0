use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Accepted local formats, besides RFC 3339
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a due date given on the command line, in the local time zone
pub fn parse_due(input: &str) -> Result<DateTime<Utc>, String> {
    parse_due_in(input, &Local)
}

/// Parse a due date: RFC 3339, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM`, or a
/// bare `YYYY-MM-DD` meaning midnight. Zone-less forms are read in `tz`.
pub fn parse_due_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| {
            format!(
                "invalid date '{}' (expected YYYY-MM-DD, YYYY-MM-DD HH:MM, or RFC 3339)",
                input
            )
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("'{}' does not exist in the local time zone", input))
}

/// Parse a calendar day filter (`YYYY-MM-DD`)
pub fn parse_day(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", input))
}

/// Format a due date for display in local time
pub fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn plus_two() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn rfc3339_keeps_its_offset() {
        let dt = parse_due_in("2025-05-14T17:00:00+00:00", &plus_two()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 5, 14, 17, 0, 0).unwrap());
    }

    #[test]
    fn local_forms_use_the_given_zone() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 14, 15, 0, 0).unwrap();
        assert_eq!(parse_due_in("2025-05-14T17:00", &plus_two()).unwrap(), expected);
        assert_eq!(parse_due_in("2025-05-14 17:00", &plus_two()).unwrap(), expected);
        assert_eq!(
            parse_due_in(" 2025-05-14 17:00:00 ", &plus_two()).unwrap(),
            expected
        );
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(
            parse_due_in("2025-05-14", &plus_two()).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 13, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_due_in("tomorrow", &plus_two()).is_err());
        assert!(parse_day("2025-13-01").is_err());
        assert_eq!(
            parse_day("2025-05-14").unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
        );
    }
}
