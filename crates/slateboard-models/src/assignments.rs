//! Assignment models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Stored as the Postgres enum `assignment_type`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "assignment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    #[default]
    Homework,
    Project,
    Quiz,
    Test,
    Exam,
}

/// An assignment joined with its subject, class and teacher names.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignmentDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub class_id: Uuid,
    pub class_name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub assignment_type: AssignmentType,
    pub total_marks: i32,
    pub due_date: DateTime<Utc>,
    pub instructions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated assignment listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAssignmentsResponse {
    pub data: Vec<AssignmentDetail>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub subject_id: Uuid,
    pub class_id: Uuid,
    /// Ignored for teacher requesters; required when an admin creates on a
    /// teacher's behalf.
    pub teacher_id: Option<Uuid>,
    #[serde(default)]
    pub assignment_type: AssignmentType,
    #[validate(range(min = 1))]
    pub total_marks: i32,
    pub due_date: DateTime<Utc>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub subject_id: Option<Uuid>,
    pub assignment_type: Option<AssignmentType>,
    #[validate(range(min = 1))]
    pub total_marks: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub instructions: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_type_defaults_to_homework() {
        let json = format!(
            r#"{{
                "title": "Algebra worksheet",
                "description": "Chapter 4 problems",
                "subject_id": "{}",
                "class_id": "{}",
                "total_marks": 20,
                "due_date": "2025-03-01T16:00:00Z"
            }}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let dto: CreateAssignmentDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.assignment_type, AssignmentType::Homework);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_assignment_type_serde_slugs() {
        assert_eq!(
            serde_json::to_string(&AssignmentType::Quiz).unwrap(),
            r#""quiz""#
        );
    }

    #[test]
    fn test_create_assignment_rejects_zero_marks() {
        let json = format!(
            r#"{{
                "title": "Quiz",
                "description": "Pop quiz",
                "subject_id": "{}",
                "class_id": "{}",
                "total_marks": 0,
                "due_date": "2025-03-01T16:00:00Z"
            }}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let dto: CreateAssignmentDto = serde_json::from_str(&json).unwrap();
        assert!(dto.validate().is_err());
    }
}
