//! Shared utility functions for F1 dashboard crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Date format used by the race CSV (`races.csv` `date` column).
    pub const RACE_DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(RACE_DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_race_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), RACE_DATE_FORMAT)?)
    }

    /// Format a raw race date for display, e.g. "2023-03-05" -> "05 Mar 2023".
    ///
    /// Null markers and empty strings become an empty string. Anything that
    /// does not parse as a date is returned unchanged.
    pub fn format_race_date(raw: &str) -> String {
        let raw = raw.trim();
        if crate::fields::is_null(raw) {
            return String::new();
        }
        match parse_race_date(raw) {
            Ok(date) => date.format("%d %b %Y").to_string(),
            Err(_) => raw.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_race_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_format_race_date() {
            assert_eq!(format_race_date("2023-03-05"), "05 Mar 2023");
            assert_eq!(format_race_date(" 1950-05-13 "), "13 May 1950");
        }

        #[test]
        fn test_format_race_date_null_and_garbage() {
            assert_eq!(format_race_date("\\N"), "");
            assert_eq!(format_race_date(""), "");
            assert_eq!(format_race_date("sometime"), "sometime");
        }
    }
}

/// Helpers for CSV fields that use `\N` as the null marker.
pub mod fields {
    use std::str::FromStr;

    /// Null marker used throughout the race data CSV exports.
    pub const NULL_MARKER: &str = "\\N";

    /// True for empty fields and the `\N` null marker.
    pub fn is_null(s: &str) -> bool {
        let s = s.trim();
        s.is_empty() || s == NULL_MARKER
    }

    /// Parse a nullable field. Null markers and unparseable text become `None`.
    pub fn parse_nullable<T: FromStr>(s: &str) -> Option<T> {
        if is_null(s) {
            return None;
        }
        s.trim().parse().ok()
    }

    /// Parse a nullable float, rejecting NaN and infinities.
    pub fn parse_finite(s: &str) -> Option<f64> {
        parse_nullable::<f64>(s).filter(|v| v.is_finite())
    }

    /// A trimmed text field, or `None` for null markers.
    pub fn nullable_text(s: &str) -> Option<String> {
        if is_null(s) {
            None
        } else {
            Some(s.trim().to_string())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn null_markers() {
            assert!(is_null("\\N"));
            assert!(is_null("  "));
            assert!(!is_null("0"));
        }

        #[test]
        fn parse_nullable_numbers() {
            assert_eq!(parse_nullable::<i64>("12"), Some(12));
            assert_eq!(parse_nullable::<i64>("\\N"), None);
            assert_eq!(parse_nullable::<i64>("R"), None);
            assert_eq!(parse_finite("NaN"), None);
            assert_eq!(parse_finite("inf"), None);
            assert_eq!(parse_finite("43.7347"), Some(43.7347));
        }

        #[test]
        fn nullable_text_trims() {
            assert_eq!(nullable_text(" 1:34:50.616 "), Some("1:34:50.616".to_string()));
            assert_eq!(nullable_text("\\N"), None);
        }
    }
}
