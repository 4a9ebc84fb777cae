use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unexpected response: {0}")]
    Decode(String),

    /// The API answered with `success: false`.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("token storage: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
