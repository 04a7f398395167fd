//! User models and DTOs.
//!
//! Users are the authentication principals. Teachers and students get an
//! additional profile row in their own tables; `role` decides which
//! endpoints and query scopes apply.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::students::Gender;

/// System role of a user.
///
/// Stored as the Postgres enum `user_role` and carried as a string slug
/// inside JWT claims.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
            UserRole::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "teacher" => Some(UserRole::Teacher),
            "student" => Some(UserRole::Student),
            "staff" => Some(UserRole::Staff),
            _ => None,
        }
    }

    /// Human-readable name for display fields.
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Teacher => "Teacher",
            UserRole::Student => "Student",
            UserRole::Staff => "Staff",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user row, minus the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Profile payload returned by `/api/profile/me`, the login response and
/// the user listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: UserRole,
    pub role_display: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            role_display: user.role.display_name().to_string(),
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            phone_number: user.phone_number,
            address: user.address,
            date_of_birth: user.date_of_birth,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Paginated user listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<ProfileResponse>,
    pub meta: PaginationMeta,
}

/// DTO for attaching a teacher profile to an existing user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConvertToTeacherDto {
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

/// DTO for attaching a student profile to an existing user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConvertToStudentDto {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_slug_round_trip() {
        for role in [
            UserRole::Admin,
            UserRole::Teacher,
            UserRole::Student,
            UserRole::Staff,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("principal"), None);
    }

    #[test]
    fn test_role_serde_uses_slugs() {
        assert_eq!(
            serde_json::to_string(&UserRole::Teacher).unwrap(),
            r#""teacher""#
        );
        let role: UserRole = serde_json::from_str(r#""staff""#).unwrap();
        assert_eq!(role, UserRole::Staff);
    }

    #[test]
    fn test_profile_response_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role: UserRole::Teacher,
            phone_number: None,
            address: None,
            date_of_birth: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile = ProfileResponse::from(user);
        assert_eq!(profile.full_name, "Jane Doe");
        assert_eq!(profile.role_display, "Teacher");
    }

    #[test]
    fn test_convert_to_teacher_dto_validation() {
        let dto = ConvertToTeacherDto {
            user_id: Uuid::new_v4(),
            employee_id: "EMP-001".to_string(),
            department: "Mathematics".to_string(),
            qualification: "MSc Mathematics".to_string(),
            experience_years: 3,
            specialization: None,
            hire_date: NaiveDate::from_ymd_opt(2020, 8, 1).unwrap(),
            subject_ids: vec![],
        };
        assert!(dto.validate().is_ok());

        let bad = ConvertToTeacherDto {
            employee_id: "".to_string(),
            experience_years: -1,
            ..dto
        };
        assert!(bad.validate().is_err());
    }
}
