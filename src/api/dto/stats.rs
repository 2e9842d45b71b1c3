//! Query parameters for the statistics endpoints.
//!
//! Fields are deserialized as optional strings so that a missing or malformed
//! value surfaces as a [`AppError::Validation`] with our JSON error body
//! rather than the framework's plain-text rejection.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::domain::entities::GroupBy;
use crate::error::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `?by=day|month&from=YYYY-MM-DD&to=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub by: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl StatsQuery {
    /// Validates and converts the raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a parameter is missing or malformed,
    /// or if `from` is after `to`.
    pub fn parse(&self) -> Result<(GroupBy, NaiveDate, NaiveDate), AppError> {
        let by = required("by", self.by.as_deref())?;
        let group_by = by.parse::<GroupBy>().map_err(|reason| {
            AppError::bad_request(
                "Invalid 'by' parameter",
                json!({ "field": "by", "value": by, "reason": reason }),
            )
        })?;

        let (from, to) = parse_range(self.from.as_deref(), self.to.as_deref())?;
        Ok((group_by, from, to))
    }
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeQuery {
    /// # Errors
    ///
    /// Same rules as [`StatsQuery::parse`] for the date pair.
    pub fn parse(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        parse_range(self.from.as_deref(), self.to.as_deref())
    }
}

fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<(NaiveDate, NaiveDate), AppError> {
    let from = parse_date("from", from)?;
    let to = parse_date("to", to)?;

    if from > to {
        return Err(AppError::bad_request(
            "'from' must not be after 'to'",
            json!({ "from": from, "to": to }),
        ));
    }

    Ok((from, to))
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<NaiveDate, AppError> {
    let value = required(field, value)?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        AppError::bad_request(
            format!("Invalid '{field}' parameter, expected YYYY-MM-DD"),
            json!({ "field": field, "value": value }),
        )
    })
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::bad_request(
            format!("Missing '{field}' parameter"),
            json!({ "field": field }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(by: Option<&str>, from: Option<&str>, to: Option<&str>) -> StatsQuery {
        StatsQuery {
            by: by.map(String::from),
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    #[test]
    fn test_parse_valid() {
        let (group_by, from, to) = query(Some("month"), Some("2024-01-01"), Some("2024-01-31"))
            .parse()
            .unwrap();

        assert_eq!(group_by, GroupBy::Month);
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_missing_parameters() {
        assert!(query(None, Some("2024-01-01"), Some("2024-01-02")).parse().is_err());
        assert!(query(Some("day"), None, Some("2024-01-02")).parse().is_err());
        assert!(query(Some("day"), Some("2024-01-01"), None).parse().is_err());
        assert!(query(Some("day"), Some(""), Some("2024-01-02")).parse().is_err());
    }

    #[test]
    fn test_parse_malformed_parameters() {
        assert!(query(Some("week"), Some("2024-01-01"), Some("2024-01-02")).parse().is_err());
        assert!(query(Some("day"), Some("2024-13-01"), Some("2024-01-02")).parse().is_err());
        assert!(query(Some("day"), Some("01/01/2024"), Some("2024-01-02")).parse().is_err());
    }

    #[test]
    fn test_parse_inverted_range() {
        let err = query(Some("day"), Some("2024-02-01"), Some("2024-01-01"))
            .parse()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_range_query_single_day() {
        let range = RangeQuery {
            from: Some("2024-05-05".to_string()),
            to: Some("2024-05-05".to_string()),
        };
        let (from, to) = range.parse().unwrap();
        assert_eq!(from, to);
    }
}
