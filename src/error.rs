//! Error types shared across the chat front end and the query client.

use crate::session::SessionId;
use thiserror::Error;

/// Failures raised by the session store and session file import/export.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session name must not be blank")]
    InvalidName,

    #[error("unknown schema_version in {source_name}: {version}")]
    UnknownSchemaVersion { source_name: String, version: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures talking to the query/answer service. Every variant fails the turn the same way.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("query service returned status {0}")]
    Status(u16),

    #[error("malformed query service response: {0}")]
    MalformedResponse(String),
}

/// Failures surfaced to the user by a conversation turn.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Please enter a question.")]
    EmptyInput,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Schema upload rejections.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("unsupported schema file {0}: expected .sql, .json or .txt")]
    UnsupportedExtension(String),

    #[error("schema file {0} is not valid UTF-8")]
    InvalidUtf8(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_message_is_the_user_warning() {
        assert_eq!(ChatError::EmptyInput.to_string(), "Please enter a question.");
    }

    #[test]
    fn store_errors_convert_into_chat_errors() {
        let error: ChatError = StoreError::NotFound(SessionId::new(7)).into();
        assert_eq!(error.to_string(), "session 7 not found");
    }
}
