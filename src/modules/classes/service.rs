use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classes::model::{ClassDetail, ClassListItem, CreateClassDto, UpdateClassDto};
use crate::modules::subjects::model::Subject;

use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const CLASS_ORDERING: &[(&str, &str)] = &[
    ("name", "c.name"),
    ("grade_level", "c.grade_level"),
    ("section", "c.section"),
    ("academic_year", "c.academic_year"),
    ("created_at", "c.created_at"),
];

fn push_scope_filter(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope) -> bool {
    match scope {
        AccessScope::Admin | AccessScope::Staff => true,
        AccessScope::Teacher { teacher_id } => {
            qb.push(" AND c.teacher_id = ").push_bind(*teacher_id);
            true
        }
        AccessScope::Student { class_id, .. } => match class_id {
            Some(class_id) => {
                qb.push(" AND c.id = ").push_bind(*class_id);
                true
            }
            None => false,
        },
        AccessScope::Unlinked => false,
    }
}

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (c.name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR c.grade_level ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR c.section ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR c.academic_year ILIKE ")
        .push_bind(pattern)
        .push(")");
}

async fn subjects_for_class(db: &PgPool, class_id: Uuid) -> Result<Vec<Subject>, AppError> {
    sqlx::query_as(
        r#"
        SELECT s.id, s.name, s.code, s.description, s.credits, s.created_at, s.updated_at
        FROM subjects s
        JOIN class_subjects cs ON cs.subject_id = s.id
        WHERE cs.class_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(class_id)
    .fetch_all(db)
    .await
    .context("Failed to fetch class subjects")
    .map_err(AppError::database)
}

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db, params))]
    pub async fn list_classes(
        db: &PgPool,
        scope: &AccessScope,
        params: &ListParams,
    ) -> Result<(Vec<ClassListItem>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM classes c WHERE 1=1");
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
            .context("Failed to count classes")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.name, c.grade_level, c.section, c.academic_year, \
             u.first_name || ' ' || u.last_name AS teacher_name, \
             c.room_number, c.max_students, \
             (SELECT COUNT(*) FROM students st WHERE st.class_id = c.id) AS student_count, \
             c.is_active \
             FROM classes c \
             LEFT JOIN teachers t ON t.id = c.teacher_id \
             LEFT JOIN users u ON u.id = t.user_id \
             WHERE 1=1",
        );
        push_scope_filter(&mut qb, scope);
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            CLASS_ORDERING,
            "c.grade_level ASC, c.section ASC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let classes: Vec<ClassListItem> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch classes")
            .map_err(AppError::database)?;

        Ok((classes, total))
    }

    #[instrument(skip(db))]
    pub async fn get_class(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<ClassDetail, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.name, c.grade_level, c.section, c.academic_year, c.teacher_id, \
             u.first_name || ' ' || u.last_name AS teacher_name, \
             c.room_number, c.max_students, \
             (SELECT COUNT(*) FROM students st WHERE st.class_id = c.id) AS student_count, \
             c.is_active, c.created_at, c.updated_at \
             FROM classes c \
             LEFT JOIN teachers t ON t.id = c.teacher_id \
             LEFT JOIN users u ON u.id = t.user_id \
             WHERE 1=1",
        );
        if !push_scope_filter(&mut qb, scope) {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }
        qb.push(" AND c.id = ").push_bind(id);

        let class: Option<ClassDetail> = qb
            .build_query_as()
            .fetch_optional(db)
            .await
            .context("Failed to fetch class by ID")
            .map_err(AppError::database)?;

        let mut class = class.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;
        class.subjects = subjects_for_class(db, class.id).await?;

        Ok(class)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_class(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateClassDto,
    ) -> Result<ClassDetail, AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can create classes".to_string(),
            ));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin class creation transaction")
            .map_err(AppError::database)?;

        let class_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO classes (name, grade_level, section, academic_year, teacher_id,
                                 room_number, max_students)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.grade_level)
        .bind(&dto.section)
        .bind(&dto.academic_year)
        .bind(dto.teacher_id)
        .bind(&dto.room_number)
        .bind(dto.max_students)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A class with this grade level, section and academic year already exists"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Teacher does not exist"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        for subject_id in &dto.subject_ids {
            sqlx::query("INSERT INTO class_subjects (class_id, subject_id) VALUES ($1, $2)")
                .bind(class_id)
                .bind(subject_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.is_foreign_key_violation() {
                            return AppError::bad_request(anyhow::anyhow!(
                                "Subject {} does not exist",
                                subject_id
                            ));
                        }
                    }
                    AppError::database(anyhow::Error::from(e))
                })?;
        }

        tx.commit()
            .await
            .context("Failed to commit class creation transaction")
            .map_err(AppError::database)?;

        Self::get_class(db, scope, class_id).await
    }

    /// Update a class. Admins update anything; a teacher only a class
    /// assigned to them.
    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<ClassDetail, AppError> {
        if matches!(scope, AccessScope::Staff | AccessScope::Student { .. }) {
            return Err(AppError::forbidden(
                "Read-only access to classes".to_string(),
            ));
        }

        // Resolves visibility first; a teacher cannot update (or probe)
        // a class that is not theirs.
        Self::get_class(db, scope, id).await?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin class update transaction")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE classes SET updated_at = NOW()");

        if let Some(name) = &dto.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(grade_level) = &dto.grade_level {
            qb.push(", grade_level = ").push_bind(grade_level);
        }
        if let Some(section) = &dto.section {
            qb.push(", section = ").push_bind(section);
        }
        if let Some(academic_year) = &dto.academic_year {
            qb.push(", academic_year = ").push_bind(academic_year);
        }
        if let Some(teacher_id) = dto.teacher_id {
            qb.push(", teacher_id = ").push_bind(teacher_id);
        }
        if let Some(room_number) = &dto.room_number {
            qb.push(", room_number = ").push_bind(room_number);
        }
        if let Some(max_students) = dto.max_students {
            qb.push(", max_students = ").push_bind(max_students);
        }
        if let Some(is_active) = dto.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }

        qb.push(" WHERE id = ").push_bind(id);

        qb.build()
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "A class with this grade level, section and academic year already exists"
                        ));
                    }
                    if db_err.is_foreign_key_violation() {
                        return AppError::bad_request(anyhow::anyhow!("Teacher does not exist"));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        if let Some(subject_ids) = &dto.subject_ids {
            sqlx::query("DELETE FROM class_subjects WHERE class_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to clear class subjects")
                .map_err(AppError::database)?;

            for subject_id in subject_ids {
                sqlx::query("INSERT INTO class_subjects (class_id, subject_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(subject_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        if let sqlx::Error::Database(db_err) = &e {
                            if db_err.is_foreign_key_violation() {
                                return AppError::bad_request(anyhow::anyhow!(
                                    "Subject {} does not exist",
                                    subject_id
                                ));
                            }
                        }
                        AppError::database(anyhow::Error::from(e))
                    })?;
            }
        }

        tx.commit()
            .await
            .context("Failed to commit class update transaction")
            .map_err(AppError::database)?;

        Self::get_class(db, scope, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, scope: &AccessScope, id: Uuid) -> Result<(), AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can delete classes".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete class")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        Ok(())
    }
}
