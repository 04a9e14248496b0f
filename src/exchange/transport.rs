use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Path the message is posted to when an endpoint does not name one.
pub const DEFAULT_PATH: &str = "/send_message";

/// Form field carrying the message text.
pub const DEFAULT_FIELD: &str = "user_input";

/// What came back from the server for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// HTTP 200 with the decoded reply text.
    Message(String),
    /// Any other status. The body is not inspected.
    Status(u16),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to reach {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Delivers one message to the chat endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, text: &str) -> Result<Reply, TransportError>;
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    response: String,
}

/// Decodes a `{"response": "..."}` body.
pub fn parse_reply(body: &str) -> Result<String, TransportError> {
    let reply: SendMessageResponse = serde_json::from_str(body)?;
    Ok(reply.response)
}

/// Joins a base URL and a path with exactly one slash between them.
pub fn endpoint_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Posts messages as `application/x-www-form-urlencoded` bodies.
pub struct HttpTransport {
    client: Client,
    url: String,
    field: String,
}

impl HttpTransport {
    pub fn new(url: String, field: String) -> Self {
        Self {
            client: Client::new(),
            url,
            field,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, text: &str) -> Result<Reply, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[(self.field.as_str(), text)])
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Reply::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(TransportError::Body)?;
        parse_reply(&body).map(Reply::Message)
    }
}
