use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use client_core::{
    AuthError, AuthenticatedSession, Authenticator, ClientError, DirectoryConnector,
    EmployeeDirectory, MemoryTokenStore, SessionStore,
};
use shared::domain::{Employee, EmployeeDraft, EmployeeId};

use crate::controller::dialogs::{DialogOutcome, EmployeeDialogs};

pub(crate) fn employee(id: &str, first: &str, department: &str) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone: "555-0100".to_string(),
        position: "Engineer".to_string(),
        department: department.to_string(),
        hire_date: "2024-03-05T00:00:00.000Z".to_string(),
    }
}

pub(crate) fn draft(first: &str, hire_date: &str) -> EmployeeDraft {
    EmployeeDraft {
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone: "555-0100".to_string(),
        position: "Engineer".to_string(),
        department: "Eng".to_string(),
        hire_date: hire_date.to_string(),
    }
}

pub(crate) async fn signed_in_session() -> Arc<SessionStore> {
    let session = SessionStore::new(Arc::new(MemoryTokenStore::default()));
    session.persist_token("tok123").await.expect("persist");
    Arc::new(session)
}

pub(crate) fn signed_out_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::default())))
}

pub(crate) enum AuthReply {
    Token(&'static str),
    Reject {
        status: u16,
        message: Option<&'static str>,
    },
}

pub(crate) struct FakeAuthenticator {
    reply: AuthReply,
    pub calls: Arc<AtomicUsize>,
}

impl FakeAuthenticator {
    pub fn new(reply: AuthReply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<String, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            AuthReply::Token(token) => Ok(token.to_string()),
            AuthReply::Reject { status, message } => Err(AuthError::Rejected {
                status: *status,
                message: message.map(str::to_string),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DirectoryCall {
    List,
    Fetch(EmployeeId),
    Create(EmployeeDraft),
    Update(EmployeeId, EmployeeDraft),
    Delete(EmployeeId),
}

#[derive(Default)]
pub(crate) struct FakeDirectory {
    employees: Mutex<Vec<Employee>>,
    calls: Mutex<Vec<DirectoryCall>>,
    fail_list: Mutex<bool>,
    fail_mutations: Mutex<bool>,
}

fn server_error(path: &str) -> ClientError {
    ClientError::Http {
        url: format!("http://directory.test{path}"),
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

impl FakeDirectory {
    pub fn with_employees(employees: Vec<Employee>) -> Arc<Self> {
        let directory = Self::default();
        *directory.employees.lock().expect("lock") = employees;
        Arc::new(directory)
    }

    pub fn set_employees(&self, employees: Vec<Employee>) {
        *self.employees.lock().expect("lock") = employees;
    }

    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock().expect("lock") = fail;
    }

    pub fn fail_mutations(&self, fail: bool) {
        *self.fail_mutations.lock().expect("lock") = fail;
    }

    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: DirectoryCall) {
        self.calls.lock().expect("lock").push(call);
    }

    fn mutations_fail(&self) -> bool {
        *self.fail_mutations.lock().expect("lock")
    }
}

#[async_trait]
impl EmployeeDirectory for FakeDirectory {
    async fn list(&self) -> client_core::error::Result<Vec<Employee>> {
        self.record(DirectoryCall::List);
        if *self.fail_list.lock().expect("lock") {
            return Err(server_error("/api/employees"));
        }
        Ok(self.employees.lock().expect("lock").clone())
    }

    async fn fetch(&self, id: &EmployeeId) -> client_core::error::Result<Employee> {
        self.record(DirectoryCall::Fetch(id.clone()));
        self.employees
            .lock()
            .expect("lock")
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| ClientError::Http {
                url: format!("http://directory.test/api/employees/{id}"),
                status: 404,
                message: "Employee not found".to_string(),
            })
    }

    async fn create(&self, draft: &EmployeeDraft) -> client_core::error::Result<Employee> {
        self.record(DirectoryCall::Create(draft.clone()));
        if self.mutations_fail() {
            return Err(server_error("/api/employees"));
        }
        let created = draft.clone().into_employee(EmployeeId::new("created"));
        self.employees.lock().expect("lock").push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &EmployeeId,
        draft: &EmployeeDraft,
    ) -> client_core::error::Result<Employee> {
        self.record(DirectoryCall::Update(id.clone(), draft.clone()));
        if self.mutations_fail() {
            return Err(server_error("/api/employees/id"));
        }
        Ok(draft.clone().into_employee(id.clone()))
    }

    async fn delete(&self, id: &EmployeeId) -> client_core::error::Result<()> {
        self.record(DirectoryCall::Delete(id.clone()));
        if self.mutations_fail() {
            return Err(server_error("/api/employees/id"));
        }
        self.employees.lock().expect("lock").retain(|e| &e.id != id);
        Ok(())
    }
}

pub(crate) struct FakeConnector {
    directory: Arc<FakeDirectory>,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new(directory: Arc<FakeDirectory>) -> Arc<Self> {
        Arc::new(Self {
            directory,
            tokens: Mutex::new(Vec::new()),
        })
    }
}

impl DirectoryConnector for FakeConnector {
    fn connect(&self, session: AuthenticatedSession) -> Arc<dyn EmployeeDirectory> {
        self.tokens
            .lock()
            .expect("lock")
            .push(session.token().expose().to_string());
        self.directory.clone()
    }
}

#[derive(Default)]
pub(crate) struct ScriptedDialogs {
    create: Mutex<VecDeque<DialogOutcome<EmployeeDraft>>>,
    edit: Mutex<VecDeque<DialogOutcome<EmployeeDraft>>>,
    delete: Mutex<VecDeque<DialogOutcome<()>>>,
    pub edit_initials: Mutex<Vec<EmployeeDraft>>,
}

impl ScriptedDialogs {
    pub fn on_create(self, outcome: DialogOutcome<EmployeeDraft>) -> Self {
        self.create.lock().expect("lock").push_back(outcome);
        self
    }

    pub fn on_edit(self, outcome: DialogOutcome<EmployeeDraft>) -> Self {
        self.edit.lock().expect("lock").push_back(outcome);
        self
    }

    pub fn on_delete(self, outcome: DialogOutcome<()>) -> Self {
        self.delete.lock().expect("lock").push_back(outcome);
        self
    }
}

#[async_trait]
impl EmployeeDialogs for ScriptedDialogs {
    async fn open_create(&self) -> DialogOutcome<EmployeeDraft> {
        self.create
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(DialogOutcome::Cancelled)
    }

    async fn open_edit(&self, initial: EmployeeDraft) -> DialogOutcome<EmployeeDraft> {
        self.edit_initials.lock().expect("lock").push(initial);
        self.edit
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(DialogOutcome::Cancelled)
    }

    async fn confirm_delete(&self, _employee: &Employee) -> DialogOutcome<()> {
        self.delete
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(DialogOutcome::Cancelled)
    }
}
