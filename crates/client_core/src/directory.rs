use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use shared::domain::{Employee, EmployeeDraft, EmployeeId};
use tracing::debug;

use crate::{
    config::ApiBase,
    error::Result,
    http,
    session::AuthenticatedSession,
};

/// CRUD operations against the remote employee resource.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>>;
    async fn fetch(&self, id: &EmployeeId) -> Result<Employee>;
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee>;
    async fn update(&self, id: &EmployeeId, draft: &EmployeeDraft) -> Result<Employee>;
    async fn delete(&self, id: &EmployeeId) -> Result<()>;
}

/// Builds a directory client bound to an authenticated session.
pub trait DirectoryConnector: Send + Sync {
    fn connect(&self, session: AuthenticatedSession) -> Arc<dyn EmployeeDirectory>;
}

pub struct HttpEmployeeDirectory {
    http: Client,
    api: ApiBase,
    session: AuthenticatedSession,
}

impl HttpEmployeeDirectory {
    pub fn new(http: Client, api: ApiBase, session: AuthenticatedSession) -> Self {
        Self { http, api, session }
    }

    fn bearer(&self) -> &str {
        self.session.token().expose()
    }
}

#[async_trait]
impl EmployeeDirectory for HttpEmployeeDirectory {
    async fn list(&self) -> Result<Vec<Employee>> {
        let url = self.api.employees_url();
        let res = http::send(&url, self.http.get(url.clone()).bearer_auth(self.bearer())).await?;
        let employees: Vec<Employee> = http::decode(&url, res).await?;
        debug!(count = employees.len(), "listed employees");
        Ok(employees)
    }

    async fn fetch(&self, id: &EmployeeId) -> Result<Employee> {
        let url = self.api.employee_url(id.as_str());
        let res = http::send(&url, self.http.get(url.clone()).bearer_auth(self.bearer())).await?;
        http::decode(&url, res).await
    }

    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee> {
        let url = self.api.employees_url();
        let res = http::send(
            &url,
            self.http
                .post(url.clone())
                .bearer_auth(self.bearer())
                .json(draft),
        )
        .await?;
        http::decode(&url, res).await
    }

    async fn update(&self, id: &EmployeeId, draft: &EmployeeDraft) -> Result<Employee> {
        let url = self.api.employee_url(id.as_str());
        let res = http::send(
            &url,
            self.http
                .put(url.clone())
                .bearer_auth(self.bearer())
                .json(draft),
        )
        .await?;
        http::decode(&url, res).await
    }

    async fn delete(&self, id: &EmployeeId) -> Result<()> {
        let url = self.api.employee_url(id.as_str());
        http::send(&url, self.http.delete(url.clone()).bearer_auth(self.bearer())).await?;
        Ok(())
    }
}

pub struct HttpDirectoryConnector {
    http: Client,
    api: ApiBase,
}

impl HttpDirectoryConnector {
    pub fn new(api: ApiBase) -> Self {
        Self {
            http: Client::new(),
            api,
        }
    }
}

impl DirectoryConnector for HttpDirectoryConnector {
    fn connect(&self, session: AuthenticatedSession) -> Arc<dyn EmployeeDirectory> {
        Arc::new(HttpEmployeeDirectory::new(
            self.http.clone(),
            self.api.clone(),
            session,
        ))
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
