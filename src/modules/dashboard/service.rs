use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::service::AttendanceService;
use crate::modules::dashboard::model::{
    AdminDashboardStats, DashboardStats, StudentDashboardStats, TeacherDashboardStats,
};
use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;

async fn count(db: &PgPool, sql: &str) -> Result<i64, AppError> {
    sqlx::query_scalar(sql)
        .fetch_one(db)
        .await
        .context("Failed to compute dashboard count")
        .map_err(AppError::database)
}

async fn count_for(db: &PgPool, sql: &str, id: Uuid) -> Result<i64, AppError> {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to compute dashboard count")
        .map_err(AppError::database)
}

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool, scope: &AccessScope) -> Result<DashboardStats, AppError> {
        match scope {
            // Staff see the same read-only totals as admins.
            AccessScope::Admin | AccessScope::Staff => Ok(DashboardStats::Admin(
                Self::admin_stats(db).await?,
            )),
            AccessScope::Teacher { teacher_id } => Ok(DashboardStats::Teacher(
                Self::teacher_stats(db, *teacher_id).await?,
            )),
            AccessScope::Student { student_id, .. } => Ok(DashboardStats::Student(
                Self::student_stats(db, *student_id).await?,
            )),
            AccessScope::Unlinked => Ok(DashboardStats::Empty {}),
        }
    }

    async fn admin_stats(db: &PgPool) -> Result<AdminDashboardStats, AppError> {
        Ok(AdminDashboardStats {
            total_students: count(db, "SELECT COUNT(*) FROM students WHERE is_active").await?,
            total_teachers: count(db, "SELECT COUNT(*) FROM teachers WHERE is_active").await?,
            total_classes: count(db, "SELECT COUNT(*) FROM classes WHERE is_active").await?,
            total_subjects: count(db, "SELECT COUNT(*) FROM subjects").await?,
            total_assignments: count(db, "SELECT COUNT(*) FROM assignments WHERE is_active")
                .await?,
        })
    }

    async fn teacher_stats(db: &PgPool, teacher_id: Uuid) -> Result<TeacherDashboardStats, AppError> {
        Ok(TeacherDashboardStats {
            my_classes: count_for(
                db,
                "SELECT COUNT(*) FROM classes WHERE teacher_id = $1",
                teacher_id,
            )
            .await?,
            my_students: count_for(
                db,
                "SELECT COUNT(*) FROM students \
                 WHERE class_id IN (SELECT id FROM classes WHERE teacher_id = $1)",
                teacher_id,
            )
            .await?,
            pending_assignments: count_for(
                db,
                "SELECT COUNT(*) FROM assignments WHERE teacher_id = $1 AND due_date >= NOW()",
                teacher_id,
            )
            .await?,
            subjects_teaching: count_for(
                db,
                "SELECT COUNT(*) FROM teacher_subjects WHERE teacher_id = $1",
                teacher_id,
            )
            .await?,
        })
    }

    async fn student_stats(db: &PgPool, student_id: Uuid) -> Result<StudentDashboardStats, AppError> {
        let my_class: Option<String> = sqlx::query_scalar(
            "SELECT c.name FROM classes c \
             JOIN students s ON s.class_id = c.id \
             WHERE s.id = $1",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch the student's class")
        .map_err(AppError::database)?;

        let total_assignments = count_for(
            db,
            "SELECT COUNT(*) FROM assignments \
             WHERE class_id = (SELECT class_id FROM students WHERE id = $1)",
            student_id,
        )
        .await?;

        let completed_assignments = count_for(
            db,
            "SELECT COUNT(*) FROM grades WHERE student_id = $1",
            student_id,
        )
        .await?;

        Ok(StudentDashboardStats {
            my_class,
            total_assignments,
            completed_assignments,
            attendance_percentage: AttendanceService::attendance_percentage(db, student_id)
                .await?,
        })
    }
}
