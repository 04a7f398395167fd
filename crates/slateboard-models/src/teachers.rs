//! Teacher models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::subjects::Subject;

/// A teacher row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employee_id: String,
    pub department: String,
    pub qualification: String,
    pub experience_years: i32,
    pub specialization: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A teacher joined with its user account; `subjects` is filled by a
/// follow-up query.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TeacherDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub employee_id: String,
    pub department: String,
    pub qualification: String,
    pub experience_years: i32,
    pub specialization: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

/// Compact row for teacher listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TeacherListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub employee_id: String,
    pub department: String,
    pub specialization: Option<String>,
}

/// Paginated teacher listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<TeacherListItem>,
    pub meta: PaginationMeta,
}

/// DTO for attaching a teacher profile to an existing user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub employee_id: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    #[validate(length(min = 1, max = 200))]
    pub qualification: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub experience_years: i32,
    #[validate(length(max = 200))]
    pub specialization: Option<String>,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub subject_ids: Vec<Uuid>,
}

/// DTO for updating a teacher. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub qualification: Option<String>,
    #[validate(range(min = 0))]
    pub experience_years: Option<i32>,
    #[validate(length(max = 200))]
    pub specialization: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub subject_ids: Option<Vec<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher_dto_defaults() {
        let json = format!(
            r#"{{
                "user_id": "{}",
                "employee_id": "EMP-042",
                "department": "Science",
                "qualification": "BSc Physics",
                "hire_date": "2021-01-15"
            }}"#,
            Uuid::new_v4()
        );
        let dto: CreateTeacherDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.experience_years, 0);
        assert!(dto.subject_ids.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_teacher_dto_rejects_negative_experience() {
        let dto = UpdateTeacherDto {
            experience_years: Some(-3),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_teacher_detail_serializes_subjects() {
        let detail = TeacherDetail {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "tsmith".to_string(),
            first_name: "Tom".to_string(),
            last_name: "Smith".to_string(),
            email: "tsmith@example.com".to_string(),
            employee_id: "EMP-001".to_string(),
            department: "Mathematics".to_string(),
            qualification: "MSc".to_string(),
            experience_years: 4,
            specialization: None,
            hire_date: NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            subjects: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["subjects"], serde_json::json!([]));
    }
}
