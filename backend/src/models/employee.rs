//! Employees and the role metadata that drives route authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::rules::validate_username;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a center employee.
pub struct Employee {
    /// Public sequential identifier (`EM001`, `EM002`, ...).
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Role describing the employee's privileges.
    pub role: EmployeeRole,
    /// Availability flag, present only for teachers.
    pub teacher_status: Option<TeacherStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum EmployeeRole {
    Teacher,
    #[serde(rename = "Learning Advisor")]
    #[sqlx(rename = "Learning Advisor")]
    LearningAdvisor,
    Manager,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Teacher => "Teacher",
            EmployeeRole::LearningAdvisor => "Learning Advisor",
            EmployeeRole::Manager => "Manager",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Teacher" => Some(EmployeeRole::Teacher),
            "Learning Advisor" => Some(EmployeeRole::LearningAdvisor),
            "Manager" => Some(EmployeeRole::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum TeacherStatus {
    Available,
    Unavailable,
}

impl TeacherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherStatus::Available => "Available",
            TeacherStatus::Unavailable => "Unavailable",
        }
    }
}

impl Employee {
    /// Constructs a new employee; teachers start out Available.
    pub fn new(
        id: String,
        full_name: String,
        email: String,
        phone_number: Option<String>,
        role: EmployeeRole,
    ) -> Self {
        let now = Utc::now();
        let teacher_status = match role {
            EmployeeRole::Teacher => Some(TeacherStatus::Available),
            _ => None,
        };
        Self {
            id,
            full_name,
            email,
            phone_number,
            role,
            teacher_status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self.role, EmployeeRole::Teacher)
    }

    pub fn is_advisor(&self) -> bool {
        matches!(self.role, EmployeeRole::LearningAdvisor)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self.role, EmployeeRole::Manager)
    }

    pub fn is_available_teacher(&self) -> bool {
        self.is_teacher() && matches!(self.teacher_status, Some(TeacherStatus::Available))
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating an employee together with its login account.
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub phone_number: Option<String>,
    pub role: EmployeeRole,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Partial update; role changes are rejected at the handler.
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<EmployeeRole>,
    pub teacher_status: Option<TeacherStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
/// Public-facing representation of an employee.
pub struct EmployeeResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: EmployeeRole,
    pub teacher_status: Option<TeacherStatus>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        EmployeeResponse {
            id: employee.id,
            full_name: employee.full_name,
            email: employee.email,
            phone_number: employee.phone_number,
            role: employee.role,
            teacher_status: employee.teacher_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serde_uses_display_names() {
        let r: EmployeeRole = serde_json::from_str("\"Learning Advisor\"").unwrap();
        assert_eq!(r, EmployeeRole::LearningAdvisor);
        let v = serde_json::to_value(EmployeeRole::LearningAdvisor).unwrap();
        assert_eq!(v, serde_json::json!("Learning Advisor"));
        assert_eq!(EmployeeRole::parse("Manager"), Some(EmployeeRole::Manager));
        assert_eq!(EmployeeRole::parse("Janitor"), None);
    }

    #[test]
    fn new_teacher_starts_available() {
        let teacher = Employee::new(
            "EM001".into(),
            "Tam Nguyen".into(),
            "tam@example.com".into(),
            None,
            EmployeeRole::Teacher,
        );
        assert!(teacher.is_available_teacher());

        let advisor = Employee::new(
            "EM002".into(),
            "Lan Pham".into(),
            "lan@example.com".into(),
            None,
            EmployeeRole::LearningAdvisor,
        );
        assert!(advisor.teacher_status.is_none());
        assert!(!advisor.is_available_teacher());
    }
}
