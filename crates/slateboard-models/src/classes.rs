//! Class models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::subjects::Subject;

/// A class joined with its teacher and enrollment count; `subjects` is
/// filled by a follow-up query.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassDetail {
    pub id: Uuid,
    pub name: String,
    pub grade_level: String,
    pub section: String,
    pub academic_year: String,
    pub teacher_id: Option<Uuid>,
    pub teacher_name: Option<String>,
    pub room_number: Option<String>,
    pub max_students: i32,
    pub student_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

/// Compact row for class listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassListItem {
    pub id: Uuid,
    pub name: String,
    pub grade_level: String,
    pub section: String,
    pub academic_year: String,
    pub teacher_name: Option<String>,
    pub room_number: Option<String>,
    pub max_students: i32,
    pub student_count: i64,
    pub is_active: bool,
}

/// Paginated class listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub data: Vec<ClassListItem>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub grade_level: String,
    #[validate(length(min = 1, max = 10))]
    pub section: String,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
    pub teacher_id: Option<Uuid>,
    #[validate(length(max = 20))]
    pub room_number: Option<String>,
    #[serde(default = "default_max_students")]
    #[validate(range(min = 1))]
    pub max_students: i32,
    #[serde(default)]
    pub subject_ids: Vec<Uuid>,
}

fn default_max_students() -> i32 {
    30
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub grade_level: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub section: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
    pub teacher_id: Option<Uuid>,
    #[validate(length(max = 20))]
    pub room_number: Option<String>,
    #[validate(range(min = 1))]
    pub max_students: Option<i32>,
    pub is_active: Option<bool>,
    pub subject_ids: Option<Vec<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_class_defaults() {
        let dto: CreateClassDto = serde_json::from_str(
            r#"{"name":"Grade 8 Blue","grade_level":"8","section":"B","academic_year":"2024-2025"}"#,
        )
        .unwrap();
        assert_eq!(dto.max_students, 30);
        assert!(dto.subject_ids.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_class_rejects_zero_capacity() {
        let dto: CreateClassDto = serde_json::from_str(
            r#"{"name":"Grade 8 Blue","grade_level":"8","section":"B","academic_year":"2024-2025","max_students":0}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
