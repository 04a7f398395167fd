//! Role-dependent dashboard payloads.

use serde::Serialize;
use utoipa::ToSchema;

/// System-wide totals, shown to admins and staff.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboardStats {
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_classes: i64,
    pub total_subjects: i64,
    pub total_assignments: i64,
}

/// A teacher's own workload.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherDashboardStats {
    pub my_classes: i64,
    pub my_students: i64,
    pub pending_assignments: i64,
    pub subjects_teaching: i64,
}

/// A student's own progress.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDashboardStats {
    pub my_class: Option<String>,
    pub total_assignments: i64,
    pub completed_assignments: i64,
    pub attendance_percentage: f64,
}

/// Dashboard payload, shaped by the requester's role.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardStats {
    Admin(AdminDashboardStats),
    Teacher(TeacherDashboardStats),
    Student(StudentDashboardStats),
    /// Teacher or student accounts without a profile row get an empty
    /// payload rather than an error.
    Empty {},
}
