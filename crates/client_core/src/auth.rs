use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{LoginRequest, LoginResponse};
use thiserror::Error;
use tracing::{info, warn};

use crate::{config::ApiBase, http};

pub const LOGIN_FAILED_FALLBACK: &str = "Login failed. Please try again.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("login request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("login response was not understood: {0}")]
    Decode(#[source] reqwest::Error),
}

impl AuthError {
    /// Message shown to the user: the server's reason, else a generic fallback.
    pub fn display_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => LOGIN_FAILED_FALLBACK.to_string(),
        }
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;
}

pub struct HttpAuthenticator {
    http: Client,
    api: ApiBase,
}

impl HttpAuthenticator {
    pub fn new(api: ApiBase) -> Self {
        Self::with_client(Client::new(), api)
    }

    pub fn with_client(http: Client, api: ApiBase) -> Self {
        Self { http, api }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let url = self.api.login_url();
        let res = self
            .http
            .post(url)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(AuthError::Transport)?;

        if !res.status().is_success() {
            let rejection = http::rejection(res).await;
            warn!(status = rejection.status, username, "login rejected");
            return Err(AuthError::Rejected {
                status: rejection.status,
                message: rejection.reason,
            });
        }

        let body: LoginResponse = res.json().await.map_err(AuthError::Decode)?;
        info!(username, "login accepted");
        Ok(body.token)
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
