//! Subject models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// An academic subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated subject listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSubjectsResponse {
    pub data: Vec<Subject>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 10))]
    pub code: String,
    pub description: Option<String>,
    #[serde(default = "default_credits")]
    #[validate(range(min = 1))]
    pub credits: i32,
}

fn default_credits() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub code: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub credits: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_subject_defaults_credits() {
        let dto: CreateSubjectDto =
            serde_json::from_str(r#"{"name":"Physics","code":"PHY"}"#).unwrap();
        assert_eq!(dto.credits, 1);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_subject_rejects_zero_credits() {
        let dto: CreateSubjectDto =
            serde_json::from_str(r#"{"name":"Physics","code":"PHY","credits":0}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_subject_rejects_long_code() {
        let dto = UpdateSubjectDto {
            code: Some("TOOLONGCODE".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
