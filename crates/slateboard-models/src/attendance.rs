//! Attendance models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Stored as the Postgres enum `attendance_status`.
///
/// `Present` and `Late` both count toward the attendance percentage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    Excused,
}

/// An attendance row joined with student, class, subject and marker names.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceDetail {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub class_id: Uuid,
    pub class_name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_by: Uuid,
    pub marked_by_name: String,
    pub notes: Option<String>,
    pub marked_at: DateTime<Utc>,
}

/// Paginated attendance listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAttendanceResponse {
    pub data: Vec<AttendanceDetail>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAttendanceDto {
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    /// Ignored for teacher requesters; required when an admin marks on a
    /// teacher's behalf.
    pub marked_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAttendanceDto {
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_present() {
        let json = format!(
            r#"{{"student_id":"{}","class_id":"{}","subject_id":"{}","date":"2025-02-10"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let dto: CreateAttendanceDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.status, AttendanceStatus::Present);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_status_serde_slugs() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Excused).unwrap(),
            r#""excused""#
        );
        let status: AttendanceStatus = serde_json::from_str(r#""late""#).unwrap();
        assert_eq!(status, AttendanceStatus::Late);
    }
}
