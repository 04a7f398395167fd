use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::subjects::model::{CreateSubjectDto, Subject, UpdateSubjectDto};

use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const SUBJECT_COLUMNS: &str = "id, name, code, description, credits, created_at, updated_at";

const SUBJECT_ORDERING: &[(&str, &str)] = &[
    ("name", "name"),
    ("code", "code"),
    ("credits", "credits"),
    ("created_at", "created_at"),
];

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR code ILIKE ")
        .push_bind(pattern)
        .push(")");
}

pub struct SubjectService;

impl SubjectService {
    /// Subjects are readable by any authenticated user.
    #[instrument(skip(db, params))]
    pub async fn list_subjects(
        db: &PgPool,
        params: &ListParams,
    ) -> Result<(Vec<Subject>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM subjects WHERE 1=1");
        if let Some(search) = params.search() {
            push_search_filter(&mut count_qb, search);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count subjects")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM subjects WHERE 1=1", SUBJECT_COLUMNS));
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            SUBJECT_ORDERING,
            "name ASC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let subjects: Vec<Subject> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch subjects")
            .map_err(AppError::database)?;

        Ok((subjects, total))
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, id: Uuid) -> Result<Subject, AppError> {
        let subject: Option<Subject> = sqlx::query_as(&format!(
            "SELECT {} FROM subjects WHERE id = $1",
            SUBJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch subject by ID")
        .map_err(AppError::database)?;

        subject.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_subject(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateSubjectDto,
    ) -> Result<Subject, AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can create subjects".to_string(),
            ));
        }

        sqlx::query_as(&format!(
            "INSERT INTO subjects (name, code, description, credits) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            SUBJECT_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.description)
        .bind(dto.credits)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A subject with this name or code already exists"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_subject(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can update subjects".to_string(),
            ));
        }

        Self::get_subject(db, id).await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE subjects SET updated_at = NOW()");

        if let Some(name) = &dto.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(code) = &dto.code {
            qb.push(", code = ").push_bind(code);
        }
        if let Some(description) = &dto.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(credits) = dto.credits {
            qb.push(", credits = ").push_bind(credits);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(&format!(" RETURNING {}", SUBJECT_COLUMNS));

        qb.build_query_as()
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "A subject with this name or code already exists"
                        ));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<(), AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can delete subjects".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete subject")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        Ok(())
    }
}
