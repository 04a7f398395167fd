pub mod seeder;

use sqlx::PgPool;

use crate::modules::users::model::UserRole;

use crate::utils::password::hash_password;

/// Create an admin account. Admins cannot be created through the API, so
/// the first one comes from the CLI.
pub async fn create_admin(
    db: &PgPool,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password = hash_password(password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (username, email, password, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(first_name)
    .bind(last_name)
    .bind(UserRole::Admin)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this username already exists".into());
    }

    Ok(())
}
