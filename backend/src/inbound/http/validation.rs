//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `invalid_request` errors whose details name the offending
//! field and a stable sub-code.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Wire name of a request field.
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

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must contain valid UUIDs")).with_details(json!({
        "field": field,
        "index": index,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn require_uuid(value: Option<String>, field: FieldName) -> Result<Uuid, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    parse_uuid(&value, field)
}

pub(crate) fn parse_uuid_list(values: &[String], field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(value).map_err(|_| invalid_uuid_index_error(field, index, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    const FIELD: FieldName = FieldName::new("courseId");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    fn missing_value_reports_field() {
        let err = require_uuid(None, FIELD).expect_err("missing value");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(&json!("courseId")));
        assert_eq!(detail(&err, "code"), Some(&json!("missing_field")));
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn malformed_uuid_echoes_value(#[case] raw: &str) {
        let err = parse_uuid(raw, FIELD).expect_err("malformed uuid");
        assert_eq!(detail(&err, "value"), Some(&json!(raw)));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_uuid")));
    }

    #[rstest]
    fn list_reports_first_bad_index() {
        let values = vec![
            "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
            "nope".to_owned(),
        ];
        let err = parse_uuid_list(&values, FieldName::new("enrollmentIds"))
            .expect_err("second entry is invalid");
        assert_eq!(detail(&err, "index"), Some(&json!(1)));
        assert_eq!(detail(&err, "field"), Some(&json!("enrollmentIds")));
    }

    #[rstest]
    fn valid_list_parses_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_uuid_list(&[a.to_string(), b.to_string()], FIELD).expect("valid");
        assert_eq!(parsed, vec![a, b]);
    }
}
