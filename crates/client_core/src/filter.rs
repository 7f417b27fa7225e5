//! Client-side narrowing of the loaded employee collection.

use std::collections::HashSet;

use shared::domain::Employee;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub department: Option<String>,
}

impl FilterCriteria {
    pub fn new(search_text: impl Into<String>, department: Option<String>) -> Self {
        Self {
            search_text: search_text.into(),
            department,
        }
    }

    pub fn clear(&mut self) {
        self.search_text.clear();
        self.department = None;
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.selected_department().is_none()
    }

    /// The department to match, treating an empty selection as "any".
    pub fn selected_department(&self) -> Option<&str> {
        self.department.as_deref().filter(|d| !d.is_empty())
    }
}

fn matches_search(employee: &Employee, needle: &str) -> bool {
    [
        &employee.first_name,
        &employee.last_name,
        &employee.email,
        &employee.position,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Keeps the employees matching both the search text and the department, in input order.
pub fn apply_filters(employees: &[Employee], criteria: &FilterCriteria) -> Vec<Employee> {
    let needle = criteria.search_text.to_lowercase();
    let department = criteria.selected_department();

    employees
        .iter()
        .filter(|employee| needle.is_empty() || matches_search(employee, &needle))
        .filter(|employee| department.map_or(true, |d| employee.department == d))
        .cloned()
        .collect()
}

/// Distinct department values in first-seen order.
pub fn distinct_departments(employees: &[Employee]) -> Vec<String> {
    let mut seen = HashSet::new();
    employees
        .iter()
        .filter(|employee| seen.insert(employee.department.as_str()))
        .map(|employee| employee.department.clone())
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
