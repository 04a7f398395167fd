pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod grades;
pub mod health;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
