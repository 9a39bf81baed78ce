//! Enrollment DTOs and parsing helpers.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{BulkApprovalItem, BulkApprovalOutcome, BulkApprovalReport};
use crate::domain::{CourseId, Enrollment, EnrollmentId, Error, ErrorCode, UserId};
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_uuid, parse_uuid_list, require_uuid,
};

/// Upper bound on ids accepted by one bulk approval call.
pub const BULK_APPROVE_MAX_IDS: usize = 500;

const STUDENT_ID: FieldName = FieldName::new("studentId");
const COURSE_ID: FieldName = FieldName::new("courseId");
const ENROLLMENT_ID: FieldName = FieldName::new("enrollmentId");
const ENROLLMENT_IDS: FieldName = FieldName::new("enrollmentIds");

#[derive(Debug, Deserialize)]
pub(super) struct StudentPath {
    pub(super) student_id: String,
}

impl StudentPath {
    pub(super) fn parse(&self) -> Result<UserId, Error> {
        parse_uuid(&self.student_id, STUDENT_ID).map(UserId::from_uuid)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct EnrollmentPath {
    pub(super) enrollment_id: String,
}

impl EnrollmentPath {
    pub(super) fn parse(&self) -> Result<EnrollmentId, Error> {
        parse_uuid(&self.enrollment_id, ENROLLMENT_ID).map(EnrollmentId::from_uuid)
    }
}

/// Request body for `POST /api/v1/students/{student_id}/enrollments`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequestBody {
    #[schema(example = "7d9f0c3a-2b1e-4c5d-8f6a-9b0c1d2e3f40")]
    pub course_id: Option<String>,
}

impl EnrollmentRequestBody {
    pub(super) fn parse(self) -> Result<CourseId, Error> {
        require_uuid(self.course_id, COURSE_ID).map(CourseId::from_uuid)
    }
}

/// Request body for `POST /api/v1/enrollments/approve`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveBody {
    #[schema(max_items = 500)]
    pub enrollment_ids: Option<Vec<String>>,
}

impl BulkApproveBody {
    pub(super) fn parse(self) -> Result<Vec<EnrollmentId>, Error> {
        let raw = self
            .enrollment_ids
            .ok_or_else(|| missing_field_error(ENROLLMENT_IDS))?;
        if raw.len() > BULK_APPROVE_MAX_IDS {
            return Err(Error::invalid_request(format!(
                "enrollmentIds accepts at most {BULK_APPROVE_MAX_IDS} ids"
            ))
            .with_details(json!({
                "field": "enrollmentIds",
                "code": "too_many_items",
                "max": BULK_APPROVE_MAX_IDS,
                "count": raw.len(),
            })));
        }
        let ids = parse_uuid_list(&raw, ENROLLMENT_IDS)?;
        Ok(ids.into_iter().map(EnrollmentId::from_uuid).collect())
    }
}

/// Enrollment as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    /// One of `pending`, `approved` or `rejected`.
    #[schema(example = "pending")]
    pub status: String,
    /// Administrator who decided the enrollment. Absent while pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    pub requested_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<String>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(value: Enrollment) -> Self {
        Self {
            id: value.id().to_string(),
            student_id: value.student_id().to_string(),
            course_id: value.course_id().to_string(),
            status: value.status().as_str().to_owned(),
            decided_by: value.decided_by().map(|admin| admin.to_string()),
            requested_at: value.requested_at().to_rfc3339(),
            decided_at: value.decided_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Why one bulk item was not approved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkApprovalFailure {
    #[schema(value_type = crate::inbound::http::schemas::ErrorCodeSchema)]
    pub code: ErrorCode,
    pub message: String,
}

/// Result for one id of a bulk approval.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkApprovalItemResponse {
    pub enrollment_id: String,
    /// `approved` or `failed`.
    #[schema(example = "approved")]
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BulkApprovalFailure>,
}

impl From<BulkApprovalItem> for BulkApprovalItemResponse {
    fn from(value: BulkApprovalItem) -> Self {
        let enrollment_id = value.enrollment_id.to_string();
        match value.outcome {
            BulkApprovalOutcome::Approved => Self {
                enrollment_id,
                outcome: "approved".to_owned(),
                error: None,
            },
            BulkApprovalOutcome::Failed { code, message } => Self {
                enrollment_id,
                outcome: "failed".to_owned(),
                error: Some(BulkApprovalFailure { code, message }),
            },
        }
    }
}

/// Aggregate bulk approval result. `results` keeps request order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkApprovalResponse {
    pub approved: usize,
    pub results: Vec<BulkApprovalItemResponse>,
}

impl From<BulkApprovalReport> for BulkApprovalResponse {
    fn from(value: BulkApprovalReport) -> Self {
        Self {
            approved: value.approved,
            results: value.results.into_iter().map(Into::into).collect(),
        }
    }
}
