use std::sync::Arc;

use client_core::{Authenticator, SessionStore};
use tracing::{error, info};

use crate::controller::{
    events::{UiError, UiErrorContext},
    navigation::{Navigator, Route},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The form was incomplete; nothing was sent.
    Blocked,
    LoggedIn,
    Failed(String),
}

pub struct LoginController<A: Authenticator> {
    authenticator: A,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    form: LoginForm,
    state: LoginState,
    error: Option<UiError>,
}

impl<A: Authenticator> LoginController<A> {
    pub fn new(authenticator: A, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            authenticator,
            session,
            navigator,
            form: LoginForm::default(),
            state: LoginState::Idle,
            error: None,
        }
    }

    pub fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Message shown under the form after a failed attempt.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(UiError::message)
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.form.is_valid() && self.state != LoginState::Submitting
    }

    pub async fn submit(&mut self) -> LoginOutcome {
        if !self.can_submit() {
            return LoginOutcome::Blocked;
        }

        self.state = LoginState::Submitting;
        self.error = None;

        let token = match self
            .authenticator
            .authenticate(&self.form.username, &self.form.password)
            .await
        {
            Ok(token) => token,
            Err(err) => {
                let ui_error = UiError::from_auth_error(&err);
                let message = ui_error.message().to_string();
                self.error = Some(ui_error);
                self.state = LoginState::Idle;
                return LoginOutcome::Failed(message);
            }
        };

        if let Err(err) = self.session.persist_token(&token).await {
            error!("failed to persist session token: {err}");
            let ui_error = UiError::from_client_error(UiErrorContext::Login, &err);
            let message = ui_error.message().to_string();
            self.error = Some(ui_error);
            self.state = LoginState::Idle;
            return LoginOutcome::Failed(message);
        }

        info!(username = %self.form.username, "signed in");
        self.form.password.clear();
        self.state = LoginState::Succeeded;
        self.navigator.navigate(Route::Employees);
        LoginOutcome::LoggedIn
    }
}

#[cfg(test)]
#[path = "tests/login_tests.rs"]
mod tests;
