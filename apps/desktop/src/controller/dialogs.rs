use async_trait::async_trait;
use shared::domain::{Employee, EmployeeDraft};

/// How a modal closed: with a payload, or dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Confirmed(T),
    Cancelled,
}

#[async_trait]
pub trait EmployeeDialogs: Send + Sync {
    async fn open_create(&self) -> DialogOutcome<EmployeeDraft>;
    /// `initial.hire_date` is a calendar date (`YYYY-MM-DD`).
    async fn open_edit(&self, initial: EmployeeDraft) -> DialogOutcome<EmployeeDraft>;
    async fn confirm_delete(&self, employee: &Employee) -> DialogOutcome<()>;
}
