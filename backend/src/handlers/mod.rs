pub mod attendance;
pub mod auth;
pub mod auth_repo;
pub mod checkin;
pub mod classes;
pub mod contracts;
pub mod courses;
pub mod dashboard;
pub mod employees;
pub mod enrolments;
pub mod evaluations;
pub mod issues;
pub mod leave_requests;
pub mod makeup_classes;
pub mod rooms;
pub mod students;
