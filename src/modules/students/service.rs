use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::{
    CreateStudentDto, StudentDetail, StudentListItem, UpdateStudentDto,
};

use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const STUDENT_ORDERING: &[(&str, &str)] = &[
    ("name", "u.first_name"),
    ("student_code", "s.student_code"),
    ("roll_number", "s.roll_number"),
    ("admission_date", "s.admission_date"),
    ("created_at", "s.created_at"),
];

/// Scope filter shared by the list, count and detail queries.
///
/// Returns false when the scope can never match anything, letting
/// callers skip the query entirely.
fn push_scope_filter(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope) -> bool {
    match scope {
        AccessScope::Admin | AccessScope::Staff => true,
        AccessScope::Teacher { teacher_id } => {
            qb.push(" AND s.class_id IN (SELECT id FROM classes WHERE teacher_id = ")
                .push_bind(*teacher_id)
                .push(")");
            true
        }
        AccessScope::Student { student_id, .. } => {
            qb.push(" AND s.id = ").push_bind(*student_id);
            true
        }
        AccessScope::Unlinked => false,
    }
}

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (u.first_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.last_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.email ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR s.student_code ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR s.roll_number ILIKE ")
        .push_bind(pattern)
        .push(")");
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, params))]
    pub async fn list_students(
        db: &PgPool,
        scope: &AccessScope,
        params: &ListParams,
    ) -> Result<(Vec<StudentListItem>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM students s \
             JOIN users u ON u.id = s.user_id \
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
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT s.id, u.first_name || ' ' || u.last_name AS name, u.email, \
             s.student_code, s.roll_number, c.name AS class_name \
             FROM students s \
             JOIN users u ON u.id = s.user_id \
             LEFT JOIN classes c ON c.id = s.class_id \
             WHERE 1=1",
        );
        push_scope_filter(&mut qb, scope);
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            STUDENT_ORDERING,
            "u.first_name ASC, u.last_name ASC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let students: Vec<StudentListItem> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::database)?;

        Ok((students, total))
    }

    /// Fetch one student visible to the scope. Out-of-scope rows read as
    /// not found rather than forbidden, matching the list behavior.
    #[instrument(skip(db))]
    pub async fn get_student(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<StudentDetail, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT s.id, s.user_id, u.username, u.first_name, u.last_name, u.email, \
             s.student_code, s.roll_number, s.class_id, c.name AS class_name, s.gender, \
             s.guardian_name, s.guardian_phone, s.guardian_email, s.emergency_contact, \
             s.admission_date, s.blood_group, s.medical_conditions, s.is_active, \
             s.created_at, s.updated_at \
             FROM students s \
             JOIN users u ON u.id = s.user_id \
             LEFT JOIN classes c ON c.id = s.class_id \
             WHERE 1=1",
        );
        if !push_scope_filter(&mut qb, scope) {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }
        qb.push(" AND s.id = ").push_bind(id);

        let student: Option<StudentDetail> = qb
            .build_query_as()
            .fetch_optional(db)
            .await
            .context("Failed to fetch student by ID")
            .map_err(AppError::database)?;

        student.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateStudentDto,
    ) -> Result<StudentDetail, AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can create students".to_string(),
            ));
        }

        let student_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO students (user_id, student_code, roll_number, class_id, gender,
                                  guardian_name, guardian_phone, guardian_email,
                                  emergency_contact, admission_date, blood_group,
                                  medical_conditions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(dto.user_id)
        .bind(&dto.student_code)
        .bind(&dto.roll_number)
        .bind(dto.class_id)
        .bind(dto.gender)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(&dto.guardian_email)
        .bind(&dto.emergency_contact)
        .bind(dto.admission_date)
        .bind(&dto.blood_group)
        .bind(&dto.medical_conditions)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A student with this student code, or this roll number in the same class, already exists"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced user or class does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::get_student(db, scope, student_id).await
    }

    /// Update a student. Admins update anyone, teachers students of their
    /// classes, and a student only their own row.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<StudentDetail, AppError> {
        if matches!(scope, AccessScope::Staff) {
            return Err(AppError::forbidden(
                "Staff have read-only access to students".to_string(),
            ));
        }

        // 404s for rows outside the requester's scope.
        Self::get_student(db, scope, id).await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE students SET updated_at = NOW()");

        if let Some(roll_number) = &dto.roll_number {
            qb.push(", roll_number = ").push_bind(roll_number);
        }
        if let Some(class_id) = dto.class_id {
            qb.push(", class_id = ").push_bind(class_id);
        }
        if let Some(gender) = dto.gender {
            qb.push(", gender = ").push_bind(gender);
        }
        if let Some(guardian_name) = &dto.guardian_name {
            qb.push(", guardian_name = ").push_bind(guardian_name);
        }
        if let Some(guardian_phone) = &dto.guardian_phone {
            qb.push(", guardian_phone = ").push_bind(guardian_phone);
        }
        if let Some(guardian_email) = &dto.guardian_email {
            qb.push(", guardian_email = ").push_bind(guardian_email);
        }
        if let Some(emergency_contact) = &dto.emergency_contact {
            qb.push(", emergency_contact = ").push_bind(emergency_contact);
        }
        if let Some(blood_group) = &dto.blood_group {
            qb.push(", blood_group = ").push_bind(blood_group);
        }
        if let Some(medical_conditions) = &dto.medical_conditions {
            qb.push(", medical_conditions = ").push_bind(medical_conditions);
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
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "A student with this roll number already exists in the class"
                        ));
                    }
                    if db_err.is_foreign_key_violation() {
                        return AppError::bad_request(anyhow::anyhow!("Class does not exist"));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        Self::get_student(db, scope, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_student(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<(), AppError> {
        if !scope.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can delete students".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}
