use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{ProfileResponse, User, UserRole};

use crate::config::jwt::JwtConfig;
use crate::metrics;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequestDto,
};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::{hash_password, verify_password};

/// User row including the password hash. Only the login path reads it.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    phone_number: Option<String>,
    address: Option<String>,
    date_of_birth: Option<NaiveDate>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    password: String,
}

impl CredentialRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            phone_number: self.phone_number,
            address: self.address,
            date_of_birth: self.date_of_birth,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, first_name, last_name, role, phone_number,
                   address, date_of_birth, is_active, created_at, updated_at, password
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user for login")
        .map_err(AppError::database)?;

        let Some(row) = row else {
            metrics::track_user_login_failure("unknown_user");
            return Err(AppError::unauthorized(
                "Invalid username or password".to_string(),
            ));
        };

        if !row.is_active {
            metrics::track_user_login_failure("inactive_account");
            return Err(AppError::unauthorized("Account is disabled".to_string()));
        }

        if !verify_password(&dto.password, &row.password)? {
            metrics::track_user_login_failure("bad_password");
            return Err(AppError::unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let user = row.into_user();
        let access = create_access_token(user.id, &user.username, user.role, jwt_config)?;
        let refresh = create_refresh_token(user.id, jwt_config)?;

        metrics::track_user_login_success(user.role.as_str());
        metrics::track_jwt_issued();

        Ok(LoginResponse {
            access,
            refresh,
            user: ProfileResponse::from(user),
        })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_token(
        db: &PgPool,
        dto: RefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh, jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid refresh token".to_string()))?;

        // Username and role are re-read so a role change or deactivation
        // takes effect at the next refresh.
        let user = UserService::get_user(db, user_id)
            .await
            .map_err(|_| AppError::unauthorized("User no longer exists".to_string()))?;

        if !user.is_active {
            return Err(AppError::unauthorized("Account is disabled".to_string()));
        }

        let access = create_access_token(user.id, &user.username, user.role, jwt_config)?;
        metrics::track_jwt_issued();

        Ok(RefreshResponse { access })
    }

    #[instrument(skip(db, dto))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequestDto,
    ) -> Result<ProfileResponse, AppError> {
        let missing = dto.missing_role_fields();
        if !missing.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Missing required fields for {} registration: {}",
                dto.role,
                missing.join(", ")
            )));
        }

        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin registration transaction")
            .map_err(AppError::database)?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password, first_name, last_name, role,
                               phone_number, address, date_of_birth)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, username, email, first_name, last_name, role, phone_number,
                      address, date_of_birth, is_active, created_at, updated_at
            "#,
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.role)
        .bind(&dto.phone_number)
        .bind(&dto.address)
        .bind(dto.date_of_birth)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A user with this username or email already exists"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        match dto.role {
            UserRole::Teacher => {
                let teacher_id: Uuid = sqlx::query_scalar(
                    r#"
                    INSERT INTO teachers (user_id, employee_id, department, qualification,
                                          experience_years, specialization, hire_date)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING id
                    "#,
                )
                .bind(user.id)
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
                                dto.employee_id.as_deref().unwrap_or_default()
                            ));
                        }
                    }
                    AppError::database(anyhow::Error::from(e))
                })?;

                for subject_id in &dto.subject_ids {
                    sqlx::query(
                        "INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)",
                    )
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
            }
            UserRole::Student => {
                sqlx::query(
                    r#"
                    INSERT INTO students (user_id, student_code, roll_number, class_id, gender,
                                          guardian_name, guardian_phone, guardian_email,
                                          emergency_contact, admission_date, blood_group,
                                          medical_conditions)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(user.id)
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
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.is_unique_violation() {
                            return AppError::bad_request(anyhow::anyhow!(
                                "A student with this student code or roll number already exists"
                            ));
                        }
                        if db_err.is_foreign_key_violation() {
                            return AppError::bad_request(anyhow::anyhow!(
                                "Class {} does not exist",
                                dto.class_id.map(|id| id.to_string()).unwrap_or_default()
                            ));
                        }
                    }
                    AppError::database(anyhow::Error::from(e))
                })?;
            }
            UserRole::Admin | UserRole::Staff => {}
        }

        tx.commit()
            .await
            .context("Failed to commit registration transaction")
            .map_err(AppError::database)?;

        metrics::track_user_created(user.role.as_str());

        Ok(ProfileResponse::from(user))
    }
}
