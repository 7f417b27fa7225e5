use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employee record as owned by the remote directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    /// ISO-8601 instant, e.g. `2024-03-05T00:00:00.000Z`.
    pub hire_date: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create/update body: every employee field except the server-assigned id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub hire_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorReason {
    Missing,
    InvalidEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: FieldErrorReason,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            FieldErrorReason::Missing => write!(f, "{} is required", self.field),
            FieldErrorReason::InvalidEmail => write!(f, "{} is not a valid email address", self.field),
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
            .expect("email pattern compiles")
    })
}

/// Matches the value as submitted; surrounding whitespace makes it invalid.
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

impl EmployeeDraft {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            hire_date: employee.hire_date.clone(),
        }
    }

    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("position", &self.position),
            ("department", &self.department),
            ("hireDate", &self.hire_date),
        ]
    }

    /// Checks every field is present and the email is well formed.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors: Vec<FieldError> = self
            .fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| FieldError {
                field,
                reason: FieldErrorReason::Missing,
            })
            .collect();

        if !self.email.trim().is_empty() && !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: "email",
                reason: FieldErrorReason::InvalidEmail,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
            department: self.department,
            hire_date: self.hire_date,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
