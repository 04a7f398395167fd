use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequestDto,
};
use crate::modules::dashboard::model::{
    AdminDashboardStats, DashboardStats, StudentDashboardStats, TeacherDashboardStats,
};
use crate::utils::pagination::PaginationMeta;
use crate::modules::assignments::model::{
    AssignmentDetail, AssignmentType, CreateAssignmentDto,
    PaginatedAssignmentsResponse, UpdateAssignmentDto,
};
use crate::modules::attendance::model::{
    AttendanceDetail, AttendanceStatus, CreateAttendanceDto,
    PaginatedAttendanceResponse, UpdateAttendanceDto,
};
use crate::modules::classes::model::{
    ClassDetail, ClassListItem, CreateClassDto, PaginatedClassesResponse, UpdateClassDto,
};
use crate::modules::grades::model::{
    CreateGradeDto, GradeDetail, PaginatedGradesResponse, UpdateGradeDto,
};
use crate::modules::students::model::{
    CreateStudentDto, Gender, PaginatedStudentsResponse, Student, StudentDetail, StudentListItem,
    UpdateStudentDto,
};
use crate::modules::subjects::model::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, UpdateSubjectDto,
};
use crate::modules::teachers::model::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, TeacherDetail, TeacherListItem,
    UpdateTeacherDto,
};
use crate::modules::users::model::{
    ConvertToStudentDto, ConvertToTeacherDto, PaginatedUsersResponse, ProfileResponse, User,
    UserRole,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::health::controller::api_index,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::register_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::convert_to_teacher,
        crate::modules::users::controller::convert_to_student,
        crate::modules::dashboard::controller::dashboard_stats,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::teachers::controller::get_teacher_classes,
        crate::modules::teachers::controller::get_teacher_students,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::assignments::controller::get_assignments,
        crate::modules::assignments::controller::get_assignment,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::attendance::controller::get_attendance_records,
        crate::modules::attendance::controller::get_attendance_record,
        crate::modules::attendance::controller::create_attendance_record,
        crate::modules::attendance::controller::update_attendance_record,
        crate::modules::attendance::controller::delete_attendance_record,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            User,
            UserRole,
            ProfileResponse,
            PaginatedUsersResponse,
            ConvertToTeacherDto,
            ConvertToStudentDto,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            RegisterRequestDto,
            DashboardStats,
            AdminDashboardStats,
            TeacherDashboardStats,
            StudentDashboardStats,
            Gender,
            Student,
            StudentDetail,
            StudentListItem,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Teacher,
            TeacherDetail,
            TeacherListItem,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            ClassDetail,
            ClassListItem,
            CreateClassDto,
            UpdateClassDto,
            PaginatedClassesResponse,
            Subject,
            CreateSubjectDto,
            UpdateSubjectDto,
            PaginatedSubjectsResponse,
            AssignmentDetail,
            AssignmentType,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            PaginatedAssignmentsResponse,
            GradeDetail,
            CreateGradeDto,
            UpdateGradeDto,
            PaginatedGradesResponse,
            AttendanceDetail,
            AttendanceStatus,
            CreateAttendanceDto,
            UpdateAttendanceDto,
            PaginatedAttendanceResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Meta", description = "Health and service metadata"),
        (name = "Authentication", description = "Login, token refresh and registration"),
        (name = "Users", description = "User management and profile endpoints"),
        (name = "Dashboard", description = "Role-dependent statistics"),
        (name = "Students", description = "Student management endpoints"),
        (name = "Teachers", description = "Teacher management endpoints"),
        (name = "Classes", description = "Class management endpoints"),
        (name = "Subjects", description = "Subject management endpoints"),
        (name = "Assignments", description = "Assignment management endpoints"),
        (name = "Grades", description = "Grading endpoints"),
        (name = "Attendance", description = "Attendance endpoints")
    ),
    info(
        title = "Slateboard API",
        version = "0.1.0",
        description = "A school management REST API built with Rust, Axum and PostgreSQL featuring JWT-based authentication and role-scoped data access.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
