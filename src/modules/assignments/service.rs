use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::assignments::model::{
    AssignmentDetail, CreateAssignmentDto, UpdateAssignmentDto,
};

use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const ASSIGNMENT_ORDERING: &[(&str, &str)] = &[
    ("title", "a.title"),
    ("due_date", "a.due_date"),
    ("total_marks", "a.total_marks"),
    ("created_at", "a.created_at"),
];

const DETAIL_SELECT: &str =
    "SELECT a.id, a.title, a.description, a.subject_id, sub.name AS subject_name, \
     a.class_id, c.name AS class_name, a.teacher_id, \
     u.first_name || ' ' || u.last_name AS teacher_name, \
     a.assignment_type, a.total_marks, a.due_date, a.instructions, a.is_active, \
     a.created_at, a.updated_at \
     FROM assignments a \
     JOIN subjects sub ON sub.id = a.subject_id \
     JOIN classes c ON c.id = a.class_id \
     JOIN teachers t ON t.id = a.teacher_id \
     JOIN users u ON u.id = t.user_id \
     WHERE 1=1";

/// Teachers see every assignment, matching the grading workflow where a
/// substitute may grade another teacher's class. Students see only their
/// class; staff see none.
fn push_scope_filter(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope) -> bool {
    match scope {
        AccessScope::Admin | AccessScope::Teacher { .. } => true,
        AccessScope::Student { class_id, .. } => match class_id {
            Some(class_id) => {
                qb.push(" AND a.class_id = ").push_bind(*class_id);
                true
            }
            None => false,
        },
        AccessScope::Staff | AccessScope::Unlinked => false,
    }
}

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (a.title ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR a.description ILIKE ")
        .push_bind(pattern)
        .push(")");
}

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db, params))]
    pub async fn list_assignments(
        db: &PgPool,
        scope: &AccessScope,
        params: &ListParams,
    ) -> Result<(Vec<AssignmentDetail>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM assignments a WHERE 1=1");
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
            .context("Failed to count assignments")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        push_scope_filter(&mut qb, scope);
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            ASSIGNMENT_ORDERING,
            "a.due_date DESC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let assignments: Vec<AssignmentDetail> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch assignments")
            .map_err(AppError::database)?;

        Ok((assignments, total))
    }

    #[instrument(skip(db))]
    pub async fn get_assignment(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<AssignmentDetail, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        if !push_scope_filter(&mut qb, scope) {
            return Err(AppError::not_found(anyhow::anyhow!("Assignment not found")));
        }
        qb.push(" AND a.id = ").push_bind(id);

        let assignment: Option<AssignmentDetail> = qb
            .build_query_as()
            .fetch_optional(db)
            .await
            .context("Failed to fetch assignment by ID")
            .map_err(AppError::database)?;

        assignment.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assignment not found")))
    }

    /// Create an assignment. Teachers are set as the owner regardless of
    /// the payload; admins must name the owning teacher.
    #[instrument(skip(db, dto))]
    pub async fn create_assignment(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateAssignmentDto,
    ) -> Result<AssignmentDetail, AppError> {
        let teacher_id = match scope {
            AccessScope::Teacher { teacher_id } => *teacher_id,
            AccessScope::Admin => dto.teacher_id.ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!(
                    "teacher_id is required when an admin creates an assignment"
                ))
            })?,
            _ => {
                return Err(AppError::forbidden(
                    "Only teachers and admins can create assignments".to_string(),
                ));
            }
        };

        let assignment_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO assignments (title, description, subject_id, class_id, teacher_id,
                                     assignment_type, total_marks, due_date, instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.subject_id)
        .bind(dto.class_id)
        .bind(teacher_id)
        .bind(dto.assignment_type)
        .bind(dto.total_marks)
        .bind(dto.due_date)
        .bind(&dto.instructions)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced subject, class or teacher does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::get_assignment(db, scope, assignment_id).await
    }

    /// Update an assignment. Admins update anything; a teacher only their
    /// own assignments.
    #[instrument(skip(db, dto))]
    pub async fn update_assignment(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateAssignmentDto,
    ) -> Result<AssignmentDetail, AppError> {
        let existing = Self::get_assignment(db, scope, id).await?;

        let allowed = scope.is_admin() || scope.teacher_id() == Some(existing.teacher_id);
        if !allowed {
            return Err(AppError::forbidden(
                "Teachers can only update their own assignments".to_string(),
            ));
        }

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE assignments SET updated_at = NOW()");

        if let Some(title) = &dto.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = &dto.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(subject_id) = dto.subject_id {
            qb.push(", subject_id = ").push_bind(subject_id);
        }
        if let Some(assignment_type) = dto.assignment_type {
            qb.push(", assignment_type = ").push_bind(assignment_type);
        }
        if let Some(total_marks) = dto.total_marks {
            qb.push(", total_marks = ").push_bind(total_marks);
        }
        if let Some(due_date) = dto.due_date {
            qb.push(", due_date = ").push_bind(due_date);
        }
        if let Some(instructions) = &dto.instructions {
            qb.push(", instructions = ").push_bind(instructions);
        }
        if let Some(is_active) = dto.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }

        qb.push(" WHERE id = ").push_bind(id);

        qb.build()
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "Referenced subject does not exist"
                        ));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        Self::get_assignment(db, scope, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_assignment(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<(), AppError> {
        let existing = Self::get_assignment(db, scope, id).await?;

        let allowed = scope.is_admin() || scope.teacher_id() == Some(existing.teacher_id);
        if !allowed {
            return Err(AppError::forbidden(
                "Teachers can only delete their own assignments".to_string(),
            ));
        }

        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete assignment")
            .map_err(AppError::database)?;

        Ok(())
    }
}
