use chrono::{NaiveDate, NaiveDateTime};

use crate::constants::DATE_FORMAT;
use crate::errors::ValidationError;

/// Datetime layouts written by spreadsheet tools and older exports.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a calendar date from a persisted or uploaded cell.
///
/// Accepts `YYYY-MM-DD` as well as datetime forms, in which case the time
/// component is dropped.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(date_err) => DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(|dt| dt.date())
            .ok_or(ValidationError::DateParse(date_err)),
    }
}

/// Formats a date the way rows are persisted.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_datetime_drops_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05 00:00:00").unwrap(), expected);
        assert_eq!(parse_date(" 2024-03-05T13:45:00 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_date("05/03/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        assert_eq!(format_date(date), "2023-11-02");
    }
}
