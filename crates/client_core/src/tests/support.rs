use std::sync::Arc;

use axum::Router;
use shared::domain::{Employee, EmployeeId};
use tokio::net::TcpListener;

use crate::{
    config::ApiBase,
    session::{AuthenticatedSession, MemoryTokenStore, SessionStore},
};

pub(crate) async fn spawn_server(app: Router) -> ApiBase {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    ApiBase::parse(&format!("http://{addr}")).expect("base url")
}

pub(crate) async fn session_with_token(token: &str) -> AuthenticatedSession {
    let store = SessionStore::new(Arc::new(MemoryTokenStore::with_token(token)));
    store.authenticated().await.expect("token present")
}

pub(crate) fn employee(id: &str, first: &str, last: &str, department: &str) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!(
            "{}.{}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        phone: "555-0100".to_string(),
        position: "Engineer".to_string(),
        department: department.to_string(),
        hire_date: "2024-03-05T00:00:00.000Z".to_string(),
    }
}
