use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Graph error codes that signal throttling at the app, user or page level.
const RATE_LIMIT_CODES: &[i64] = &[4, 17, 32, 341, 613];

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        kind: Option<String>,
        message: String,
    },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl GraphError {
    /// Classify a non-2xx response body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error);

        let Some(detail) = detail else {
            if status == 401 {
                return GraphError::Auth(body.to_string());
            }
            return GraphError::Api {
                status,
                code: None,
                kind: None,
                message: body.to_string(),
            };
        };

        let message = detail.message.unwrap_or_else(|| body.to_string());
        match detail.code {
            Some(190) => return GraphError::Auth(message),
            Some(102) if detail.kind.as_deref() == Some("OAuthException") => {
                return GraphError::Auth(message)
            }
            Some(code) if RATE_LIMIT_CODES.contains(&code) => {
                return GraphError::RateLimited(message)
            }
            _ => {}
        }
        if status == 401 {
            return GraphError::Auth(message);
        }

        GraphError::Api {
            status,
            code: detail.code,
            kind: detail.kind,
            message,
        }
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Parse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<i64>,
}
