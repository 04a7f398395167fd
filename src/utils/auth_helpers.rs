//! Resolution of the requester's data-access scope.
//!
//! JWT claims carry the role; teachers and students additionally need
//! their profile row (and, for students, the enrolled class) to scope
//! queries. Controllers resolve the scope once and hand it to services.

use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::users::model::UserRole;

use crate::middleware::auth::AuthUser;
use crate::utils::errors::AppError;

/// What slice of the data the requester may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    Admin,
    Staff,
    Teacher {
        teacher_id: Uuid,
    },
    Student {
        student_id: Uuid,
        class_id: Option<Uuid>,
    },
    /// Role claims teacher or student, but no profile row exists yet.
    /// Lists come back empty and mutations are rejected.
    Unlinked,
}

impl AccessScope {
    pub fn is_admin(&self) -> bool {
        matches!(self, AccessScope::Admin)
    }

    pub fn teacher_id(&self) -> Option<Uuid> {
        match self {
            AccessScope::Teacher { teacher_id } => Some(*teacher_id),
            _ => None,
        }
    }

    pub fn student_id(&self) -> Option<Uuid> {
        match self {
            AccessScope::Student { student_id, .. } => Some(*student_id),
            _ => None,
        }
    }
}

pub async fn resolve_scope(db: &PgPool, auth_user: &AuthUser) -> Result<AccessScope, AppError> {
    let user_id = auth_user.user_id()?;

    match auth_user.role()? {
        UserRole::Admin => Ok(AccessScope::Admin),
        UserRole::Staff => Ok(AccessScope::Staff),
        UserRole::Teacher => {
            let row: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM teachers WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_optional(db)
                    .await
                    .context("Failed to resolve teacher profile")
                    .map_err(AppError::database)?;

            Ok(row
                .map(|(teacher_id,)| AccessScope::Teacher { teacher_id })
                .unwrap_or(AccessScope::Unlinked))
        }
        UserRole::Student => {
            let row: Option<(Uuid, Option<Uuid>)> =
                sqlx::query_as("SELECT id, class_id FROM students WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_optional(db)
                    .await
                    .context("Failed to resolve student profile")
                    .map_err(AppError::database)?;

            Ok(row
                .map(|(student_id, class_id)| AccessScope::Student {
                    student_id,
                    class_id,
                })
                .unwrap_or(AccessScope::Unlinked))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_accessors() {
        let teacher_id = Uuid::new_v4();
        let scope = AccessScope::Teacher { teacher_id };
        assert_eq!(scope.teacher_id(), Some(teacher_id));
        assert_eq!(scope.student_id(), None);
        assert!(!scope.is_admin());

        assert!(AccessScope::Admin.is_admin());
        assert_eq!(AccessScope::Unlinked.teacher_id(), None);
    }
}
