use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classes::model::ClassListItem;
use crate::modules::students::model::StudentListItem;
use crate::modules::subjects::model::Subject;
use crate::modules::teachers::model::{
    CreateTeacherDto, TeacherDetail, TeacherListItem, UpdateTeacherDto,
};

use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const TEACHER_ORDERING: &[(&str, &str)] = &[
    ("name", "u.first_name"),
    ("employee_id", "t.employee_id"),
    ("department", "t.department"),
    ("hire_date", "t.hire_date"),
    ("created_at", "t.created_at"),
];

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (u.first_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.last_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.email ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR t.employee_id ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR t.department ILIKE ")
        .push_bind(pattern)
        .push(")");
}

async fn subjects_for_teacher(db: &PgPool, teacher_id: Uuid) -> Result<Vec<Subject>, AppError> {
    sqlx::query_as(
        r#"
        SELECT s.id, s.name, s.code, s.description, s.credits, s.created_at, s.updated_at
        FROM subjects s
        JOIN teacher_subjects ts ON ts.subject_id = s.id
        WHERE ts.teacher_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(teacher_id)
    .fetch_all(db)
    .await
    .context("Failed to fetch teacher subjects")
    .map_err(AppError::database)
}

pub struct TeacherService;

impl TeacherService {
    /// Teacher listings are not scoped: any authenticated user sees the
    /// compact directory.
    #[instrument(skip(db, params))]
    pub async fn list_teachers(
        db: &PgPool,
        params: &ListParams,
    ) -> Result<(Vec<TeacherListItem>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM teachers t JOIN users u ON u.id = t.user_id WHERE 1=1",
        );
        if let Some(search) = params.search() {
            push_search_filter(&mut count_qb, search);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count teachers")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT t.id, u.first_name || ' ' || u.last_name AS name, u.email, \
             t.employee_id, t.department, t.specialization \
             FROM teachers t \
             JOIN users u ON u.id = t.user_id \
             WHERE 1=1",
        );
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            TEACHER_ORDERING,
            "u.first_name ASC, u.last_name ASC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let teachers: Vec<TeacherListItem> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch teachers")
            .map_err(AppError::database)?;

        Ok((teachers, total))
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: Uuid) -> Result<TeacherDetail, AppError> {
        let teacher: Option<TeacherDetail> = sqlx::query_as(
            r#"
            SELECT t.id, t.user_id, u.username, u.first_name, u.last_name, u.email,
                   t.employee_id, t.department, t.qualification, t.experience_years,
                   t.specialization, t.hire_date, t.is_active, t.created_at, t.updated_at
            FROM teachers t
            JOIN users u ON u.id = t.user_id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch teacher by ID")
        .map_err(AppError::database)?;

        let mut teacher =
            teacher.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;
        teacher.subjects = subjects_for_teacher(db, teacher.id).await?;

        Ok(teacher)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_teacher(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateTeacherDto,
    ) -> Result<TeacherDetail, AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can create teachers".to_string(),
            ));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin teacher creation transaction")
            .map_err(AppError::database)?;

        let teacher_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO teachers (user_id, employee_id, department, qualification,
                                  experience_years, specialization, hire_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(dto.user_id)
        .bind(&dto.employee_id)
        .bind(&dto.department)
        .bind(&dto.qualification)
        .bind(dto.experience_years)
        .bind(&dto.specialization)
        .bind(dto.hire_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A teacher profile for this user, or this employee id, already exists"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("User does not exist"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        for subject_id in &dto.subject_ids {
            sqlx::query("INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)")
                .bind(teacher_id)
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
            .context("Failed to commit teacher creation transaction")
            .map_err(AppError::database)?;

        Self::get_teacher(db, teacher_id).await
    }

    /// Update a teacher. Admins update anyone; a teacher only their own row.
    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherDetail, AppError> {
        let allowed = scope.is_admin() || scope.teacher_id() == Some(id);
        if !allowed {
            return Err(AppError::forbidden(
                "Teachers can only update their own profile".to_string(),
            ));
        }

        Self::get_teacher(db, id).await?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin teacher update transaction")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE teachers SET updated_at = NOW()");

        if let Some(department) = &dto.department {
            qb.push(", department = ").push_bind(department);
        }
        if let Some(qualification) = &dto.qualification {
            qb.push(", qualification = ").push_bind(qualification);
        }
        if let Some(experience_years) = dto.experience_years {
            qb.push(", experience_years = ").push_bind(experience_years);
        }
        if let Some(specialization) = &dto.specialization {
            qb.push(", specialization = ").push_bind(specialization);
        }
        if let Some(hire_date) = dto.hire_date {
            qb.push(", hire_date = ").push_bind(hire_date);
        }
        if let Some(is_active) = dto.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }

        qb.push(" WHERE id = ").push_bind(id);

        qb.build()
            .execute(&mut *tx)
            .await
            .context("Failed to update teacher")
            .map_err(AppError::database)?;

        if let Some(subject_ids) = &dto.subject_ids {
            sqlx::query("DELETE FROM teacher_subjects WHERE teacher_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to clear teacher subjects")
                .map_err(AppError::database)?;

            for subject_id in subject_ids {
                sqlx::query(
                    "INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)",
                )
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
            .context("Failed to commit teacher update transaction")
            .map_err(AppError::database)?;

        Self::get_teacher(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<(), AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can delete teachers".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete teacher")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }

        Ok(())
    }

    /// Classes taught by a teacher.
    #[instrument(skip(db))]
    pub async fn teacher_classes(db: &PgPool, id: Uuid) -> Result<Vec<ClassListItem>, AppError> {
        // 404 for unknown teachers instead of an empty list.
        Self::get_teacher(db, id).await?;

        sqlx::query_as(
            r#"
            SELECT c.id, c.name, c.grade_level, c.section, c.academic_year,
                   u.first_name || ' ' || u.last_name AS teacher_name,
                   c.room_number, c.max_students,
                   (SELECT COUNT(*) FROM students st WHERE st.class_id = c.id) AS student_count,
                   c.is_active
            FROM classes c
            JOIN teachers t ON t.id = c.teacher_id
            JOIN users u ON u.id = t.user_id
            WHERE c.teacher_id = $1
            ORDER BY c.grade_level, c.section
            "#,
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch teacher classes")
        .map_err(AppError::database)
    }

    /// Students enrolled in any class taught by a teacher.
    #[instrument(skip(db))]
    pub async fn teacher_students(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Vec<StudentListItem>, AppError> {
        Self::get_teacher(db, id).await?;

        sqlx::query_as(
            r#"
            SELECT s.id, u.first_name || ' ' || u.last_name AS name, u.email,
                   s.student_code, s.roll_number, c.name AS class_name
            FROM students s
            JOIN users u ON u.id = s.user_id
            JOIN classes c ON c.id = s.class_id
            WHERE c.teacher_id = $1
            ORDER BY u.first_name, u.last_name
            "#,
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch teacher students")
        .map_err(AppError::database)
    }
}
