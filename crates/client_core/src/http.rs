use reqwest::{RequestBuilder, Response};
use shared::protocol::ServerErrorBody;
use url::Url;

use crate::error::{ClientError, Result};

pub(crate) struct Rejection {
    pub status: u16,
    pub reason: Option<String>,
}

/// Reads the failure reason out of a non-2xx response body, if the server sent one.
pub(crate) async fn rejection(response: Response) -> Rejection {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let reason = ServerErrorBody::parse(&body).and_then(|body| body.reason().map(str::to_string));
    Rejection { status, reason }
}

pub(crate) async fn send(url: &Url, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

    if response.status().is_success() {
        return Ok(response);
    }

    let canonical = response
        .status()
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let Rejection { status, reason } = rejection(response).await;
    Err(ClientError::Http {
        url: url.to_string(),
        status,
        message: reason.unwrap_or(canonical),
    })
}

pub(crate) async fn decode<T: serde::de::DeserializeOwned>(url: &Url, response: Response) -> Result<T> {
    response.json().await.map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}
