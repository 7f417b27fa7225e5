use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Failure body returned by the directory service, e.g. `{"error": "Invalid credentials"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerErrorBody {
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
    }
}
