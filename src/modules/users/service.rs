use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::Student;
use crate::modules::teachers::model::Teacher;
use crate::modules::users::model::{ConvertToStudentDto, ConvertToTeacherDto, User, UserRole};

use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, role, phone_number, \
                            address, date_of_birth, is_active, created_at, updated_at";

const USER_ORDERING: &[(&str, &str)] = &[
    ("username", "username"),
    ("email", "email"),
    ("first_name", "first_name"),
    ("last_name", "last_name"),
    ("role", "role"),
    ("created_at", "created_at"),
];

fn push_user_search(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (username ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR email ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR first_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR last_name ILIKE ")
        .push_bind(pattern)
        .push(")");
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id)
                .fetch_optional(db)
                .await
                .context("Failed to fetch user by ID")
                .map_err(AppError::database)?;

        user.ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db, params))]
    pub async fn list_users(
        db: &PgPool,
        params: &ListParams,
    ) -> Result<(Vec<User>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
        if let Some(search) = params.search() {
            push_user_search(&mut count_qb, search);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE 1=1", USER_COLUMNS));
        if let Some(search) = params.search() {
            push_user_search(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            USER_ORDERING,
            "username ASC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let users: Vec<User> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)?;

        Ok((users, total))
    }

    /// Attach a teacher profile to an existing user and switch its role.
    #[instrument(skip(db, dto))]
    pub async fn convert_to_teacher(
        db: &PgPool,
        dto: ConvertToTeacherDto,
    ) -> Result<Teacher, AppError> {
        // Confirms the user exists before touching anything else.
        Self::get_user(db, dto.user_id).await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM teachers WHERE user_id = $1")
                .bind(dto.user_id)
                .fetch_optional(db)
                .await
                .context("Failed to check for existing teacher profile")
                .map_err(AppError::database)?;

        if existing.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "User already has a teacher profile"
            )));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin conversion transaction")
            .map_err(AppError::database)?;

        let teacher: Teacher = sqlx::query_as(
            r#"
            INSERT INTO teachers (user_id, employee_id, department, qualification,
                                  experience_years, specialization, hire_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, employee_id, department, qualification, experience_years,
                      specialization, hire_date, is_active, created_at, updated_at
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
                        "A teacher with employee id {} already exists",
                        dto.employee_id
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        for subject_id in &dto.subject_ids {
            sqlx::query("INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)")
                .bind(teacher.id)
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

        sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2")
            .bind(UserRole::Teacher)
            .bind(dto.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to update user role")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit conversion transaction")
            .map_err(AppError::database)?;

        Ok(teacher)
    }

    /// Attach a student profile to an existing user and switch its role.
    #[instrument(skip(db, dto))]
    pub async fn convert_to_student(
        db: &PgPool,
        dto: ConvertToStudentDto,
    ) -> Result<Student, AppError> {
        Self::get_user(db, dto.user_id).await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM students WHERE user_id = $1")
                .bind(dto.user_id)
                .fetch_optional(db)
                .await
                .context("Failed to check for existing student profile")
                .map_err(AppError::database)?;

        if existing.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "User already has a student profile"
            )));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin conversion transaction")
            .map_err(AppError::database)?;

        let student: Student = sqlx::query_as(
            r#"
            INSERT INTO students (user_id, student_code, roll_number, class_id, gender,
                                  guardian_name, guardian_phone, guardian_email,
                                  emergency_contact, admission_date, blood_group,
                                  medical_conditions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, user_id, student_code, roll_number, class_id, gender, guardian_name,
                      guardian_phone, guardian_email, emergency_contact, admission_date,
                      blood_group, medical_conditions, is_active, created_at, updated_at
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
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A student with this student code or roll number already exists"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Class does not exist"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2")
            .bind(UserRole::Student)
            .bind(dto.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to update user role")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit conversion transaction")
            .map_err(AppError::database)?;

        Ok(student)
    }
}
