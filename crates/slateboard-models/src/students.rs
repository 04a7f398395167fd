//! Student models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Stored as the Postgres enum `gender`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A student row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub student_code: String,
    pub roll_number: String,
    pub class_id: Option<Uuid>,
    pub gender: Gender,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: Option<String>,
    pub emergency_contact: Option<String>,
    pub admission_date: NaiveDate,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A student joined with its user account and enrolled class.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_code: String,
    pub roll_number: String,
    pub class_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub gender: Gender,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: Option<String>,
    pub emergency_contact: Option<String>,
    pub admission_date: NaiveDate,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact row for student listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub student_code: String,
    pub roll_number: String,
    pub class_name: Option<String>,
}

/// Paginated student listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentListItem>,
    pub meta: PaginationMeta,
}

/// DTO for attaching a student profile to an existing user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub student_code: String,
    #[validate(length(min = 1, max = 20))]
    pub roll_number: String,
    pub class_id: Option<Uuid>,
    pub gender: Gender,
    #[validate(length(min = 1, max = 200))]
    pub guardian_name: String,
    #[validate(length(min = 1, max = 15))]
    pub guardian_phone: String,
    #[validate(email)]
    pub guardian_email: Option<String>,
    #[validate(length(max = 15))]
    pub emergency_contact: Option<String>,
    pub admission_date: NaiveDate,
    #[validate(length(max = 5))]
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
}

/// DTO for updating a student. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 20))]
    pub roll_number: Option<String>,
    pub class_id: Option<Uuid>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, max = 200))]
    pub guardian_name: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub guardian_phone: Option<String>,
    #[validate(email)]
    pub guardian_email: Option<String>,
    #[validate(length(max = 15))]
    pub emergency_contact: Option<String>,
    #[validate(length(max = 5))]
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_serde_slugs() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), r#""female""#);
        let g: Gender = serde_json::from_str(r#""other""#).unwrap();
        assert_eq!(g, Gender::Other);
    }

    #[test]
    fn test_create_student_dto_validation() {
        let json = format!(
            r#"{{
                "user_id": "{}",
                "student_code": "STU-2024-001",
                "roll_number": "17",
                "gender": "female",
                "guardian_name": "Maria Doe",
                "guardian_phone": "5550001111",
                "admission_date": "2024-09-01"
            }}"#,
            Uuid::new_v4()
        );
        let dto: CreateStudentDto = serde_json::from_str(&json).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.class_id.is_none());
    }

    #[test]
    fn test_update_student_dto_rejects_empty_guardian() {
        let dto = UpdateStudentDto {
            guardian_name: Some("".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
