use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::assignments::model::AssignmentType;
use crate::modules::grades::model::{
    CreateGradeDto, GradeDetail, UpdateGradeDto, letter_for_percentage,
};

use crate::metrics;
use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const GRADE_ORDERING: &[(&str, &str)] = &[
    ("graded_date", "g.graded_date"),
    ("marks_obtained", "g.marks_obtained"),
    ("student_name", "u.first_name"),
    ("assignment_title", "a.title"),
];

const DETAIL_SELECT: &str =
    "SELECT g.id, g.student_id, u.first_name || ' ' || u.last_name AS student_name, \
     g.assignment_id, a.title AS assignment_title, a.total_marks, g.marks_obtained, \
     g.marks_obtained / a.total_marks * 100 AS percentage, g.grade_letter, g.comments, \
     g.submitted_date, g.graded_date, g.graded_by, \
     gu.first_name || ' ' || gu.last_name AS graded_by_name \
     FROM grades g \
     JOIN students s ON s.id = g.student_id \
     JOIN users u ON u.id = s.user_id \
     JOIN assignments a ON a.id = g.assignment_id \
     JOIN teachers gt ON gt.id = g.graded_by \
     JOIN users gu ON gu.id = gt.user_id \
     WHERE 1=1";

fn push_scope_filter(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope) -> bool {
    match scope {
        AccessScope::Admin => true,
        AccessScope::Teacher { teacher_id } => {
            qb.push(
                " AND g.student_id IN (SELECT st.id FROM students st \
                 WHERE st.class_id IN (SELECT id FROM classes WHERE teacher_id = ",
            )
            .push_bind(*teacher_id)
            .push("))");
            true
        }
        AccessScope::Student { student_id, .. } => {
            qb.push(" AND g.student_id = ").push_bind(*student_id);
            true
        }
        AccessScope::Staff | AccessScope::Unlinked => false,
    }
}

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (u.first_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.last_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR a.title ILIKE ")
        .push_bind(pattern)
        .push(")");
}

/// Assignment fields needed to validate and letter a grade.
#[derive(sqlx::FromRow)]
struct AssignmentRef {
    class_id: Uuid,
    total_marks: i32,
    assignment_type: AssignmentType,
}

async fn fetch_assignment_ref(db: &PgPool, id: Uuid) -> Result<AssignmentRef, AppError> {
    let assignment: Option<AssignmentRef> = sqlx::query_as(
        "SELECT class_id, total_marks, assignment_type FROM assignments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("Failed to fetch assignment for grading")
    .map_err(AppError::database)?;

    assignment.ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Assignment does not exist")))
}

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db, params))]
    pub async fn list_grades(
        db: &PgPool,
        scope: &AccessScope,
        params: &ListParams,
    ) -> Result<(Vec<GradeDetail>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM grades g \
             JOIN students s ON s.id = g.student_id \
             JOIN users u ON u.id = s.user_id \
             JOIN assignments a ON a.id = g.assignment_id \
             WHERE 1=1",
        );
        if !push_scope_filter(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        if let Some(search) = params.search() {
            push_search_filter(&mut count_qb, search);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count grades")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        push_scope_filter(&mut qb, scope);
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            GRADE_ORDERING,
            "g.graded_date DESC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let grades: Vec<GradeDetail> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch grades")
            .map_err(AppError::database)?;

        Ok((grades, total))
    }

    #[instrument(skip(db))]
    pub async fn get_grade(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<GradeDetail, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        if !push_scope_filter(&mut qb, scope) {
            return Err(AppError::not_found(anyhow::anyhow!("Grade not found")));
        }
        qb.push(" AND g.id = ").push_bind(id);

        let grade: Option<GradeDetail> = qb
            .build_query_as()
            .fetch_optional(db)
            .await
            .context("Failed to fetch grade by ID")
            .map_err(AppError::database)?;

        grade.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))
    }

    /// Record a grade. The letter is always computed server-side from the
    /// assignment's total marks.
    #[instrument(skip(db, dto))]
    pub async fn create_grade(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateGradeDto,
    ) -> Result<GradeDetail, AppError> {
        let assignment = fetch_assignment_ref(db, dto.assignment_id).await?;

        let graded_by = match scope {
            AccessScope::Teacher { teacher_id } => {
                let owns_class: Option<(Uuid,)> =
                    sqlx::query_as("SELECT id FROM classes WHERE id = $1 AND teacher_id = $2")
                        .bind(assignment.class_id)
                        .bind(*teacher_id)
                        .fetch_optional(db)
                        .await
                        .context("Failed to check class ownership")
                        .map_err(AppError::database)?;

                if owns_class.is_none() {
                    return Err(AppError::forbidden(
                        "Teachers can only grade assignments for their own classes".to_string(),
                    ));
                }
                *teacher_id
            }
            AccessScope::Admin => dto.graded_by.ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!(
                    "graded_by is required when an admin records a grade"
                ))
            })?,
            _ => {
                return Err(AppError::forbidden(
                    "Only teachers and admins can record grades".to_string(),
                ));
            }
        };

        if dto.marks_obtained > assignment.total_marks as f64 {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "marks_obtained cannot exceed the assignment's total marks ({})",
                assignment.total_marks
            )));
        }

        let percentage = dto.marks_obtained / assignment.total_marks as f64 * 100.0;
        let grade_letter = letter_for_percentage(percentage);

        let grade_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO grades (student_id, assignment_id, marks_obtained, grade_letter,
                                comments, submitted_date, graded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(dto.student_id)
        .bind(dto.assignment_id)
        .bind(dto.marks_obtained)
        .bind(grade_letter)
        .bind(&dto.comments)
        .bind(dto.submitted_date)
        .bind(graded_by)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "This student already has a grade for this assignment"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced student or teacher does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        metrics::track_grade_recorded(match assignment.assignment_type {
            AssignmentType::Homework => "homework",
            AssignmentType::Project => "project",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Test => "test",
            AssignmentType::Exam => "exam",
        });

        Self::get_grade(db, scope, grade_id).await
    }

    /// Update a grade. Admins update anything; teachers only grades of
    /// students in their classes. The letter is recomputed when marks
    /// change.
    #[instrument(skip(db, dto))]
    pub async fn update_grade(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateGradeDto,
    ) -> Result<GradeDetail, AppError> {
        if !matches!(scope, AccessScope::Admin | AccessScope::Teacher { .. }) {
            return Err(AppError::forbidden(
                "Only teachers and admins can update grades".to_string(),
            ));
        }

        let existing = Self::get_grade(db, scope, id).await?;

        if dto.marks_obtained.is_none() && dto.comments.is_none() && dto.submitted_date.is_none() {
            return Ok(existing);
        }

        if let Some(marks_obtained) = dto.marks_obtained {
            if marks_obtained > existing.total_marks as f64 {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "marks_obtained cannot exceed the assignment's total marks ({})",
                    existing.total_marks
                )));
            }
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE grades SET ");
        {
            let mut sets = qb.separated(", ");

            if let Some(marks_obtained) = dto.marks_obtained {
                let percentage = marks_obtained / existing.total_marks as f64 * 100.0;
                sets.push("marks_obtained = ");
                sets.push_bind_unseparated(marks_obtained);
                sets.push("grade_letter = ");
                sets.push_bind_unseparated(letter_for_percentage(percentage));
            }
            if let Some(comments) = &dto.comments {
                sets.push("comments = ");
                sets.push_bind_unseparated(comments);
            }
            if let Some(submitted_date) = dto.submitted_date {
                sets.push("submitted_date = ");
                sets.push_bind_unseparated(submitted_date);
            }
        }

        qb.push(" WHERE id = ").push_bind(id);

        qb.build()
            .execute(db)
            .await
            .context("Failed to update grade")
            .map_err(AppError::database)?;

        Self::get_grade(db, scope, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        if !matches!(scope, AccessScope::Admin | AccessScope::Teacher { .. }) {
            return Err(AppError::forbidden(
                "Only teachers and admins can delete grades".to_string(),
            ));
        }

        // Scope-checked fetch; a teacher cannot delete another class's grade.
        Self::get_grade(db, scope, id).await?;

        sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete grade")
            .map_err(AppError::database)?;

        Ok(())
    }
}
