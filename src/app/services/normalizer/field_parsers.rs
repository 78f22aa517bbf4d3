//! Field parsing utilities for raw shipment rows
//!
//! Helpers for pulling cells out of raw records by rename-plan index and
//! parsing the typed canonical fields. Parsers return `None` for values that
//! cannot be used; the caller decides how the row is recorded.

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use regex::Regex;
use std::sync::LazyLock;

/// First number in a mixed cell, optionally with `,`-grouped thousands and a decimal part
static QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").expect("Invalid quantity regex"));

/// Get a trimmed, non-empty cell value
pub fn get_required_field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Get a cell value trimmed, or empty when the column is absent
pub fn get_optional_field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

/// Parse a shipped quantity
///
/// Plain numbers are used directly. Anything else (`"500 KG"`,
/// `"approx. 1,200.5 units"`) yields its first number. Negative numbers
/// (`"-5"`, `"-5 KG"`) and values too large for `f64` are rejected.
pub fn parse_quantity(value: &str) -> Option<f64> {
    let value = value.trim();

    let number = match value.parse::<f64>() {
        Ok(number) => number,
        Err(_) => {
            let found = QUANTITY_RE.find(value)?;
            if value[..found.start()].trim_end().ends_with('-') {
                return None;
            }
            found.as_str().replace(',', "").parse::<f64>().ok()?
        }
    };

    (number.is_finite() && number >= 0.0).then_some(number)
}

/// Collapse internal whitespace and trim a free-text value
pub fn clean_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

const ISO_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DAY_FIRST_FORMATS: [&str; 3] = ["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];
const MONTH_FIRST_FORMATS: [&str; 3] = ["%m-%d-%Y", "%m/%d/%Y", "%m.%d.%Y"];
const MONTH_NAME_FORMATS: [&str; 5] = ["%d-%b-%Y", "%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Date parser trying an ordered list of formats
///
/// ISO forms are tried first, then numeric day/month forms in the configured
/// order, then month-name forms, then datetimes (whose time part is discarded).
#[derive(Debug, Clone)]
pub struct DateParser {
    date_formats: Vec<&'static str>,
}

impl DateParser {
    pub fn new(day_first: bool) -> Self {
        let numeric = if day_first {
            DAY_FIRST_FORMATS
        } else {
            MONTH_FIRST_FORMATS
        };

        let date_formats = ISO_DATE_FORMATS
            .into_iter()
            .chain(numeric)
            .chain(MONTH_NAME_FORMATS)
            .collect();

        Self { date_formats }
    }

    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();

        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                    .map(|datetime| datetime.date())
            })
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_quantity_plain_numbers() {
        assert_eq!(parse_quantity("500"), Some(500.0));
        assert_eq!(parse_quantity(" 12.5 "), Some(12.5));
        assert_eq!(parse_quantity("0"), Some(0.0));
        assert_eq!(parse_quantity("-5"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("inf"), None);
    }

    #[test]
    fn test_parse_quantity_extracts_first_number() {
        assert_eq!(parse_quantity("350 KG"), Some(350.0));
        assert_eq!(parse_quantity("500 KG"), Some(500.0));
        assert_eq!(parse_quantity("approx. 1,200.5 units"), Some(1200.5));
        assert_eq!(parse_quantity("10 boxes of 20"), Some(10.0));
        assert_eq!(parse_quantity("10-20 boxes"), Some(10.0));
    }

    #[test]
    fn test_parse_quantity_rejects_negative_and_overflow() {
        assert_eq!(parse_quantity("-5"), None);
        assert_eq!(parse_quantity("-5 KG"), None);
        assert_eq!(parse_quantity("approx. - 5 units"), None);
        assert_eq!(parse_quantity(&format!("{} KG", "9".repeat(400))), None);
    }

    #[test]
    fn test_parse_quantity_without_digits() {
        assert_eq!(parse_quantity("N/A"), None);
        assert_eq!(parse_quantity("bad"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_date_parser_day_first() {
        let parser = DateParser::new(true);
        assert_eq!(parser.parse("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parser.parse("2024/03/15"), Some(date(2024, 3, 15)));
        assert_eq!(parser.parse("05/01/2023"), Some(date(2023, 1, 5)));
        assert_eq!(parser.parse("15.03.2024"), Some(date(2024, 3, 15)));
        assert_eq!(parser.parse("15-Mar-2024"), Some(date(2024, 3, 15)));
        assert_eq!(parser.parse("March 15, 2024"), Some(date(2024, 3, 15)));
        assert_eq!(parser.parse("2024-03-15 10:30:00"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_date_parser_month_first() {
        let parser = DateParser::new(false);
        assert_eq!(parser.parse("05/01/2023"), Some(date(2023, 5, 1)));
        assert_eq!(parser.parse("2023-01-05"), Some(date(2023, 1, 5)));
    }

    #[test]
    fn test_date_parser_rejects_garbage() {
        let parser = DateParser::default();
        assert_eq!(parser.parse("not a date"), None);
        assert_eq!(parser.parse("31/02/2024"), None);
        assert_eq!(parser.parse(""), None);
    }

    #[test]
    fn test_get_required_field() {
        let record = StringRecord::from(vec![" Acme ", "  ", "x"]);
        assert_eq!(get_required_field(&record, Some(0)), Some("Acme"));
        assert_eq!(get_required_field(&record, Some(1)), None);
        assert_eq!(get_required_field(&record, Some(9)), None);
        assert_eq!(get_required_field(&record, None), None);
        assert_eq!(get_optional_field(&record, 9), "");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Acme   Trading\tCo "), "Acme Trading Co");
    }
}
