//! Error modeling for the controllers: what failed, where, and whether re-login helps.

use client_core::{AuthError, ClientError};
use shared::error::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Login,
    LoadEmployees,
    FetchEmployee,
    CreateEmployee,
    UpdateEmployee,
    DeleteEmployee,
    Logout,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::NotAuthenticated => UiErrorCategory::Auth,
            ClientError::Http { status, .. } => match ErrorCode::from_status(*status) {
                ErrorCode::Unauthorized | ErrorCode::Forbidden => UiErrorCategory::Auth,
                ErrorCode::Validation => UiErrorCategory::Validation,
                ErrorCode::NotFound | ErrorCode::Internal => UiErrorCategory::Unknown,
            },
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::InvalidBaseUrl { .. } => UiErrorCategory::Validation,
            ClientError::Decode { .. } | ClientError::TokenStore(_) => UiErrorCategory::Unknown,
        };

        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_auth_error(err: &AuthError) -> Self {
        let category = match err {
            AuthError::Rejected { status, .. } if matches!(*status, 401 | 403) => {
                UiErrorCategory::Auth
            }
            AuthError::Transport(_) => UiErrorCategory::Transport,
            _ => UiErrorCategory::Unknown,
        };

        Self {
            category,
            context: UiErrorContext::Login,
            message: err.display_message(),
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
