//! Grade models and DTOs, plus the letter-grade scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slateboard_core::pagination::PaginationMeta;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A grade joined with student, assignment and grader names.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct GradeDetail {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub assignment_id: Uuid,
    pub assignment_title: String,
    pub total_marks: i32,
    pub marks_obtained: f64,
    pub percentage: f64,
    pub grade_letter: String,
    pub comments: Option<String>,
    pub submitted_date: Option<DateTime<Utc>>,
    pub graded_date: DateTime<Utc>,
    pub graded_by: Uuid,
    pub graded_by_name: String,
}

/// Paginated grade listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedGradesResponse {
    pub data: Vec<GradeDetail>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGradeDto {
    pub student_id: Uuid,
    pub assignment_id: Uuid,
    #[validate(range(min = 0.0))]
    pub marks_obtained: f64,
    pub comments: Option<String>,
    pub submitted_date: Option<DateTime<Utc>>,
    /// Ignored for teacher requesters; required when an admin grades on a
    /// teacher's behalf.
    pub graded_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    #[validate(range(min = 0.0))]
    pub marks_obtained: Option<f64>,
    pub comments: Option<String>,
    pub submitted_date: Option<DateTime<Utc>>,
}

/// Letter grade for a percentage score.
pub fn letter_for_percentage(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B+"
    } else if percentage >= 60.0 {
        "B"
    } else if percentage >= 50.0 {
        "C+"
    } else if percentage >= 40.0 {
        "C"
    } else {
        "F"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_scale_boundaries() {
        assert_eq!(letter_for_percentage(100.0), "A+");
        assert_eq!(letter_for_percentage(90.0), "A+");
        assert_eq!(letter_for_percentage(89.99), "A");
        assert_eq!(letter_for_percentage(80.0), "A");
        assert_eq!(letter_for_percentage(70.0), "B+");
        assert_eq!(letter_for_percentage(60.0), "B");
        assert_eq!(letter_for_percentage(50.0), "C+");
        assert_eq!(letter_for_percentage(40.0), "C");
        assert_eq!(letter_for_percentage(39.99), "F");
        assert_eq!(letter_for_percentage(0.0), "F");
    }

    #[test]
    fn test_create_grade_rejects_negative_marks() {
        let json = format!(
            r#"{{"student_id":"{}","assignment_id":"{}","marks_obtained":-1.0}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let dto: CreateGradeDto = serde_json::from_str(&json).unwrap();
        assert!(dto.validate().is_err());
    }
}
