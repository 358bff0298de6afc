//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is a `400 invalid_request` whose details name the offending
//! field, a stable code and, where useful, the rejected value.

use actix_web::web;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::{
    BestClientsLimit, Error, MAX_STORED_AMOUNT, MONEY_SCALE, Money, MoneyValidationError,
    ReportWindow,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidTimestamp,
    InvalidWindow,
    InvalidLimit,
    InvalidAmount,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidWindow => "invalid_window",
            ErrorCode::InvalidLimit => "invalid_limit",
            ErrorCode::InvalidAmount => "invalid_amount",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Parse a positive integer identifier from a path segment or header.
pub(crate) fn parse_id(value: &str, field: FieldName) -> Result<i64, Error> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let name = field.as_str();
            Err(
                ValidationError::new(name, format!("{name} must be a positive integer"))
                    .with_value(ErrorCode::InvalidId, value),
            )
        }
    }
}

/// Which end of a report window a date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Start,
    End,
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
///
/// A plain date opens the window at midnight UTC for [`Bound::Start`] and
/// closes it at the last nanosecond of that day for [`Bound::End`].
pub(crate) fn parse_instant(
    value: &str,
    field: FieldName,
    bound: Bound,
) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let time = match bound {
        Bound::Start => Some(NaiveTime::MIN),
        Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999),
    };
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .zip(time)
        .map(|(date, time)| date.and_time(time).and_utc())
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(
                name,
                format!("{name} must be an RFC 3339 timestamp or a YYYY-MM-DD date"),
            )
            .with_value(ErrorCode::InvalidTimestamp, value)
        })
}

/// Build an inclusive report window from the `start` and `end` parameters.
pub(crate) fn parse_window(start: Option<&str>, end: Option<&str>) -> Result<ReportWindow, Error> {
    const START: FieldName = FieldName::new("start");
    const END: FieldName = FieldName::new("end");

    let start = start.ok_or_else(|| missing_field_error(START))?;
    let end = end.ok_or_else(|| missing_field_error(END))?;
    let start = parse_instant(start, START, Bound::Start)?;
    let end = parse_instant(end, END, Bound::End)?;
    ReportWindow::new(start, end).map_err(|_| {
        ValidationError::new("start", "start must not be after end")
            .with_code(ErrorCode::InvalidWindow)
    })
}

/// Validate the optional `limit` parameter of the best-clients report.
pub(crate) fn parse_limit(limit: Option<i64>) -> Result<BestClientsLimit, Error> {
    limit.map_or(Ok(BestClientsLimit::default()), |raw| {
        BestClientsLimit::new(raw).map_err(|_| {
            ValidationError::new(
                "limit",
                format!(
                    "limit must be between {} and {}",
                    BestClientsLimit::MIN,
                    BestClientsLimit::MAX
                ),
            )
            .with_value(ErrorCode::InvalidLimit, raw.to_string())
        })
    })
}

/// Validate a deposit amount: strictly positive, at most two decimals and
/// no larger than a stored balance.
pub(crate) fn parse_deposit_amount(amount: Decimal) -> Result<Money, Error> {
    if amount > MAX_STORED_AMOUNT {
        return Err(ValidationError::new(
            "amount",
            format!("amount must not exceed {MAX_STORED_AMOUNT}"),
        )
        .with_value(ErrorCode::InvalidAmount, amount.to_string()));
    }
    Money::positive(amount).map_err(|err| {
        let message = match err {
            MoneyValidationError::TooPrecise => {
                format!("amount must have at most {MONEY_SCALE} decimal places")
            }
            MoneyValidationError::Negative | MoneyValidationError::NotPositive => {
                "amount must be greater than zero".to_owned()
            }
        };
        ValidationError::new("amount", message)
            .with_value(ErrorCode::InvalidAmount, amount.to_string())
    })
}

/// JSON body extractor settings that report decoding failures as
/// `invalid_request` errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}

/// Query-string extractor settings that report decoding failures as
/// `invalid_request` errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 12 ", Some(12))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    fn ids_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i64>) {
        let parsed = parse_id(raw, FieldName::new("id"));
        match expected {
            Some(id) => assert_eq!(parsed.expect("valid id"), id),
            None => {
                let err = parsed.expect_err("invalid id");
                assert_eq!(err.code(), DomainCode::InvalidRequest);
                assert_eq!(detail(&err, "code"), Some("invalid_id"));
                assert_eq!(detail(&err, "value"), Some(raw));
            }
        }
    }

    #[rstest]
    fn plain_dates_cover_whole_days() {
        let window = parse_window(Some("2020-08-10"), Some("2020-08-15")).expect("valid window");
        let late = Utc
            .with_ymd_and_hms(2020, 8, 15, 23, 59, 59)
            .single()
            .expect("timestamp");
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2020, 8, 10, 0, 0, 0).single().expect("timestamp")
        );
        assert!(window.contains(late));
    }

    #[rstest]
    fn rfc3339_bounds_are_used_verbatim() {
        let window = parse_window(Some("2020-08-10T10:00:00Z"), Some("2020-08-10T12:00:00+02:00"))
            .expect("valid window");
        assert_eq!(
            window.end(),
            Utc.with_ymd_and_hms(2020, 8, 10, 10, 0, 0).single().expect("timestamp")
        );
    }

    #[rstest]
    #[case(None, Some("2020-08-15"), "start", "missing_field")]
    #[case(Some("2020-08-10"), None, "end", "missing_field")]
    #[case(Some("yesterday"), Some("2020-08-15"), "start", "invalid_timestamp")]
    #[case(Some("2020-08-16"), Some("2020-08-15"), "start", "invalid_window")]
    fn bad_windows_are_rejected(
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = parse_window(start, end).expect_err("invalid window");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some(code));
    }

    #[rstest]
    #[case(None, Some(2))]
    #[case(Some(1), Some(1))]
    #[case(Some(100), Some(100))]
    #[case(Some(0), None)]
    #[case(Some(101), None)]
    fn limit_defaults_and_bounds(#[case] raw: Option<i64>, #[case] expected: Option<u32>) {
        match (parse_limit(raw), expected) {
            (Ok(limit), Some(value)) => assert_eq!(limit.get(), value),
            (Err(err), None) => assert_eq!(detail(&err, "code"), Some("invalid_limit")),
            (other, _) => panic!("unexpected outcome {other:?} for {raw:?}"),
        }
    }

    #[rstest]
    #[case(Decimal::new(4_000, 2), true)]
    #[case(Decimal::new(1, 2), true)]
    #[case(Decimal::ZERO, false)]
    #[case(Decimal::new(-500, 2), false)]
    #[case(Decimal::new(1_001, 3), false)]
    #[case(Decimal::new(999_999_999_999, 2), true)]
    #[case(Decimal::new(1_000_000_000_000, 2), false)]
    #[case(Decimal::MAX, false)]
    fn deposit_amounts_are_validated(#[case] amount: Decimal, #[case] valid: bool) {
        let parsed = parse_deposit_amount(amount);
        assert_eq!(parsed.is_ok(), valid);
        if let Err(err) = parsed {
            assert_eq!(detail(&err, "code"), Some("invalid_amount"));
        }
    }
}
