//! Authentication DTOs: login, token refresh and registration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::students::Gender;
use crate::users::{ProfileResponse, UserRole};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response: access/refresh token pair plus the profile payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: ProfileResponse,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

/// Registration payload. The base account fields are always required;
/// the teacher and student sections are required when `role` selects
/// them (checked in the service, not by the validator).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: UserRole,
    #[validate(length(max = 15))]
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,

    // Teacher-specific fields
    #[validate(length(min = 1, max = 20))]
    pub employee_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub qualification: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub experience_years: i32,
    #[validate(length(max = 200))]
    pub specialization: Option<String>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub subject_ids: Vec<Uuid>,

    // Student-specific fields
    #[validate(length(min = 1, max = 20))]
    pub student_code: Option<String>,
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
    pub admission_date: Option<NaiveDate>,
    #[validate(length(max = 5))]
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
}

impl RegisterRequestDto {
    /// Names of the role-specific fields that are missing for the chosen
    /// role. Empty when the payload is complete.
    pub fn missing_role_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self.role {
            UserRole::Teacher => {
                if self.employee_id.is_none() {
                    missing.push("employee_id");
                }
                if self.department.is_none() {
                    missing.push("department");
                }
                if self.qualification.is_none() {
                    missing.push("qualification");
                }
                if self.hire_date.is_none() {
                    missing.push("hire_date");
                }
            }
            UserRole::Student => {
                if self.student_code.is_none() {
                    missing.push("student_code");
                }
                if self.roll_number.is_none() {
                    missing.push("roll_number");
                }
                if self.gender.is_none() {
                    missing.push("gender");
                }
                if self.guardian_name.is_none() {
                    missing.push("guardian_name");
                }
                if self.guardian_phone.is_none() {
                    missing.push("guardian_phone");
                }
                if self.admission_date.is_none() {
                    missing.push("admission_date");
                }
            }
            UserRole::Admin | UserRole::Staff => {}
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_dto(role: UserRole) -> RegisterRequestDto {
        serde_json::from_str::<RegisterRequestDto>(&format!(
            r#"{{
                "username": "newuser",
                "email": "new@example.com",
                "first_name": "New",
                "last_name": "User",
                "password": "password123",
                "role": "{}"
            }}"#,
            role.as_str()
        ))
        .unwrap()
    }

    #[test]
    fn test_staff_registration_needs_no_extra_fields() {
        let dto = base_dto(UserRole::Staff);
        assert!(dto.validate().is_ok());
        assert!(dto.missing_role_fields().is_empty());
    }

    #[test]
    fn test_teacher_registration_reports_missing_fields() {
        let dto = base_dto(UserRole::Teacher);
        let missing = dto.missing_role_fields();
        assert!(missing.contains(&"employee_id"));
        assert!(missing.contains(&"department"));
        assert!(missing.contains(&"qualification"));
        assert!(missing.contains(&"hire_date"));
    }

    #[test]
    fn test_student_registration_reports_missing_fields() {
        let dto = base_dto(UserRole::Student);
        let missing = dto.missing_role_fields();
        assert!(missing.contains(&"student_code"));
        assert!(missing.contains(&"guardian_phone"));
        assert!(missing.contains(&"admission_date"));
    }

    #[test]
    fn test_short_password_rejected() {
        let mut dto = base_dto(UserRole::Staff);
        dto.password = "short".to_string();
        assert!(dto.validate().is_err());
    }
}
