use crate::model::{Property, PropertyDraft, PropertySummary};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401: the caller must re-authenticate.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// HTTP 409: the requested mutation collides with server state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Any other non-success status; the message is the body's `message`
    /// field, used verbatim in user-facing text.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    /// No response at all (DNS, timeout, connection reset).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// A success response whose body did not match the expected shape.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Short human-readable text for user-facing notices.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(m) | ApiError::Conflict(m) => m.clone(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(e) => e.to_string(),
            ApiError::Decode(e) => e.to_string(),
        }
    }
}

/// The remote service's five endpoints. One network round trip each, no
/// retries at this layer.
#[async_trait]
pub trait PropertyApi {
    async fn list_summaries(&self) -> Result<Vec<PropertySummary>, ApiError>;
    async fn get_by_id(&self, id: i64) -> Result<Property, ApiError>;
    async fn create(&self, draft: &PropertyDraft) -> Result<Property, ApiError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ApiError>;
    async fn search(&self) -> Result<Vec<Property>, ApiError>;
}

/// Non-success bodies carry a `message` field.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Classify a non-success response by status class. Kept free of I/O so the
/// mapping is testable without a server.
fn classify(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        401 => ApiError::Unauthorized(message),
        409 => ApiError::Conflict(message),
        _ => ApiError::Status { status, message },
    }
}

/// reqwest-backed gateway.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client with an explicit per-request timeout. The original had
    /// none, which left a hung request stuck forever.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a success body, or turn a non-success response into a typed
    /// failure.
    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(classify(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl PropertyApi for HttpApi {
    async fn list_summaries(&self) -> Result<Vec<PropertySummary>, ApiError> {
        let response = self.client.get(self.url("/api/properties")).send().await?;
        Self::read(response).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Property, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/property/{id}")))
            .send()
            .await?;
        Self::read(response).await
    }

    async fn create(&self, draft: &PropertyDraft) -> Result<Property, ApiError> {
        let response = self
            .client
            .post(self.url("/api/property"))
            .json(draft)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/property/{id}")))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await?;
            Err(classify(status.as_u16(), &body))
        }
    }

    async fn search(&self) -> Result<Vec<Property>, ApiError> {
        let response = self.client.get(self.url("/api/search")).send().await?;
        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_unauthorized_with_body_message() {
        let err = classify(401, r#"{"message": "token expired"}"#);
        assert!(matches!(err, ApiError::Unauthorized(m) if m == "token expired"));
    }

    #[test]
    fn status_409_maps_to_conflict() {
        let err = classify(409, r#"{"message": "address already listed"}"#);
        assert!(matches!(err, ApiError::Conflict(m) if m == "address already listed"));
    }

    #[test]
    fn other_statuses_keep_code_and_message() {
        let err = classify(500, r#"{"message": "boom"}"#);
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_json_body_falls_back_to_raw_text() {
        let err = classify(502, "Bad Gateway\n");
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
