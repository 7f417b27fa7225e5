//! Employee list view state: load, filter, and the create/edit/delete/logout actions.
//!
//! Directory failures are logged and leave the previously loaded collection in
//! place. Every successful mutation is followed by a full reload; nothing is
//! merged into the local copy.

use std::sync::Arc;

use client_core::{
    apply_filters, distinct_departments, hire_date, ClientError, DirectoryConnector,
    EmployeeDirectory, FilterCriteria, SessionStore,
};
use shared::domain::{Employee, EmployeeDraft, EmployeeId};
use tracing::{error, info, warn};

use crate::controller::{
    dialogs::{DialogOutcome, EmployeeDialogs},
    events::{UiError, UiErrorContext},
    navigation::{Navigator, Route},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Cancelled,
    /// The submitted form did not pass local validation; no request was sent.
    Invalid(Vec<String>),
    /// No record with that id in the loaded collection.
    NotFound,
    /// No session token; the view was redirected to login.
    RedirectedToLogin,
    Failed,
}

pub struct EmployeeListController<D: EmployeeDialogs> {
    session: Arc<SessionStore>,
    connector: Arc<dyn DirectoryConnector>,
    navigator: Arc<dyn Navigator>,
    dialogs: D,
    state: ListState,
    employees: Vec<Employee>,
    visible: Vec<Employee>,
    departments: Vec<String>,
    criteria: FilterCriteria,
    last_error: Option<UiError>,
}

impl<D: EmployeeDialogs> EmployeeListController<D> {
    pub fn new(
        session: Arc<SessionStore>,
        connector: Arc<dyn DirectoryConnector>,
        navigator: Arc<dyn Navigator>,
        dialogs: D,
    ) -> Self {
        Self {
            session,
            connector,
            navigator,
            dialogs,
            state: ListState::Idle,
            employees: Vec::new(),
            visible: Vec::new(),
            departments: Vec::new(),
            criteria: FilterCriteria::default(),
            last_error: None,
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn visible(&self) -> &[Employee] {
        &self.visible
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn find(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| &employee.id == id)
    }

    pub async fn activate(&mut self) -> ListState {
        self.reload().await
    }

    pub async fn reload(&mut self) -> ListState {
        self.state = ListState::Loading;

        let Some(directory) = self.directory(UiErrorContext::LoadEmployees).await else {
            return self.state;
        };

        match directory.list().await {
            Ok(employees) => {
                info!(count = employees.len(), "employees loaded");
                self.departments = distinct_departments(&employees);
                self.employees = employees;
                self.last_error = None;
                self.apply_filters();
                self.state = ListState::Loaded;
            }
            Err(err) => {
                error!("Error fetching employees: {err}");
                self.record(UiErrorContext::LoadEmployees, &err);
                self.state = ListState::Error;
            }
        }

        self.state
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.apply_filters();
    }

    pub fn set_department(&mut self, department: Option<String>) {
        self.criteria.department = department;
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.visible = apply_filters(&self.employees, &self.criteria);
    }

    /// Looks a record up on the server, bypassing the loaded collection.
    pub async fn fetch(&mut self, id: &EmployeeId) -> Option<Employee> {
        let directory = self.directory(UiErrorContext::FetchEmployee).await?;
        match directory.fetch(id).await {
            Ok(employee) => Some(employee),
            Err(err) => {
                error!(%id, "Error fetching employee: {err}");
                self.record(UiErrorContext::FetchEmployee, &err);
                None
            }
        }
    }

    pub async fn create(&mut self) -> MutationOutcome {
        let draft = match self.dialogs.open_create().await {
            DialogOutcome::Confirmed(draft) => draft,
            DialogOutcome::Cancelled => return MutationOutcome::Cancelled,
        };
        let draft = match normalize_submission(draft) {
            Ok(draft) => draft,
            Err(outcome) => return outcome,
        };

        let Some(directory) = self.directory(UiErrorContext::CreateEmployee).await else {
            return MutationOutcome::RedirectedToLogin;
        };
        match directory.create(&draft).await {
            Ok(created) => {
                info!(id = %created.id, "employee created");
                self.reload().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                error!("Error creating employee: {err}");
                self.record(UiErrorContext::CreateEmployee, &err);
                MutationOutcome::Failed
            }
        }
    }

    pub async fn edit(&mut self, employee: &Employee) -> MutationOutcome {
        let draft = match self.dialogs.open_edit(edit_form_for(employee)).await {
            DialogOutcome::Confirmed(draft) => draft,
            DialogOutcome::Cancelled => return MutationOutcome::Cancelled,
        };
        let draft = match normalize_submission(draft) {
            Ok(draft) => draft,
            Err(outcome) => return outcome,
        };

        let Some(directory) = self.directory(UiErrorContext::UpdateEmployee).await else {
            return MutationOutcome::RedirectedToLogin;
        };
        match directory.update(&employee.id, &draft).await {
            Ok(_) => {
                info!(id = %employee.id, "employee updated");
                self.reload().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                error!(id = %employee.id, "Error updating employee: {err}");
                self.record(UiErrorContext::UpdateEmployee, &err);
                MutationOutcome::Failed
            }
        }
    }

    pub async fn edit_by_id(&mut self, id: &EmployeeId) -> MutationOutcome {
        match self.find(id).cloned() {
            Some(employee) => self.edit(&employee).await,
            None => MutationOutcome::NotFound,
        }
    }

    pub async fn delete(&mut self, employee: &Employee) -> MutationOutcome {
        if let DialogOutcome::Cancelled = self.dialogs.confirm_delete(employee).await {
            return MutationOutcome::Cancelled;
        }

        let Some(directory) = self.directory(UiErrorContext::DeleteEmployee).await else {
            return MutationOutcome::RedirectedToLogin;
        };
        match directory.delete(&employee.id).await {
            Ok(()) => {
                info!(id = %employee.id, "employee deleted");
                self.reload().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                error!(id = %employee.id, "Error deleting employee: {err}");
                self.record(UiErrorContext::DeleteEmployee, &err);
                MutationOutcome::Failed
            }
        }
    }

    pub async fn delete_by_id(&mut self, id: &EmployeeId) -> MutationOutcome {
        match self.find(id).cloned() {
            Some(employee) => self.delete(&employee).await,
            None => MutationOutcome::NotFound,
        }
    }

    pub async fn logout(&mut self) {
        if let Err(err) = self.session.clear_session().await {
            error!("failed to clear session: {err}");
            self.record(UiErrorContext::Logout, &err);
        }
        self.employees.clear();
        self.visible.clear();
        self.departments.clear();
        self.criteria.clear();
        self.state = ListState::Idle;
        self.navigator.navigate(Route::Login);
    }

    /// Binds a directory client to the current session, or redirects to login.
    async fn directory(&mut self, context: UiErrorContext) -> Option<Arc<dyn EmployeeDirectory>> {
        match self.session.authenticated().await {
            Ok(session) => Some(self.connector.connect(session)),
            Err(ClientError::NotAuthenticated) => {
                warn!("no session token; redirecting to login");
                self.record(context, &ClientError::NotAuthenticated);
                self.state = ListState::Idle;
                self.navigator.navigate(Route::Login);
                None
            }
            Err(err) => {
                error!("failed to read session: {err}");
                self.record(context, &err);
                self.state = ListState::Error;
                None
            }
        }
    }

    fn record(&mut self, context: UiErrorContext, err: &ClientError) {
        self.last_error = Some(UiError::from_client_error(context, err));
    }
}

/// Edit form values: the record's fields with the hire date as a calendar date.
pub fn edit_form_for(employee: &Employee) -> EmployeeDraft {
    let mut draft = EmployeeDraft::from_employee(employee);
    if let Ok(date) = hire_date::to_calendar_date(&employee.hire_date) {
        draft.hire_date = date;
    }
    draft
}

/// Validates a submitted form and converts its hire date to an ISO instant.
fn normalize_submission(mut draft: EmployeeDraft) -> Result<EmployeeDraft, MutationOutcome> {
    if let Err(errors) = draft.validate() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        warn!(errors = ?messages, "employee form rejected");
        return Err(MutationOutcome::Invalid(messages));
    }

    match hire_date::to_iso_instant(&draft.hire_date) {
        Ok(instant) => {
            draft.hire_date = instant;
            Ok(draft)
        }
        Err(err) => {
            warn!("employee form rejected: {err}");
            Err(MutationOutcome::Invalid(vec![err.to_string()]))
        }
    }
}

#[cfg(test)]
#[path = "tests/employee_list_tests.rs"]
mod tests;
