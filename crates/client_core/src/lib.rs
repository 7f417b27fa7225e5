//! Client library for the employee directory service: session handling, the
//! authenticated REST client, and the client-side filter engine.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
pub mod hire_date;
mod http;
pub mod session;

pub use auth::{AuthError, Authenticator, HttpAuthenticator, LOGIN_FAILED_FALLBACK};
pub use config::{load_settings, ApiBase, ClientSettings};
pub use directory::{
    DirectoryConnector, EmployeeDirectory, HttpDirectoryConnector, HttpEmployeeDirectory,
};
pub use error::{ClientError, TokenStoreError};
pub use filter::{apply_filters, distinct_departments, FilterCriteria};
pub use session::{
    AuthenticatedSession, BearerToken, FileTokenStore, MemoryTokenStore, SessionStore, TokenStore,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
