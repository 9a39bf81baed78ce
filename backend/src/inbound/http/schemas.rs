//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `ToSchema`. The wrappers here mirror their shape
//! and are registered under the domain type names.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed, fails validation, or asks for a transition
    /// the enrollment lifecycle does not allow.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The course has no free seat left.
    #[schema(rename = "course_full")]
    CourseFull,
    /// The request collides with an existing record.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "course_full")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "course has no free seats")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "6f1c2a4e-8d3b-4f7a-9c2e-1b5d7e9f0a11")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn schemas_register_under_domain_names() {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("forbidden")]
    #[case("not_found")]
    #[case("course_full")]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn error_code_schema_lists_variant(#[case] code: &str) {
        assert!(schema_to_json::<ErrorCodeSchema>().contains(code), "missing {code}");
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("details"));
    }
}
