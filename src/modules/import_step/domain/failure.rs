use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Status text reported when the request never reached the server
pub const CONNECTIVITY_STATUS_TEXT: &str = "Unknown Error";

/// Message shown for every connectivity failure
pub const CONNECTIVITY_MESSAGE: &str = "ERROR: IMPOSSIBLE TO CONNECT TO SERVER (check your connexion)";

/// The three calls the import step makes against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Import,
    ValidData,
    Csv,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Import, Operation::ValidData, Operation::Csv];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Import => "import data",
            Operation::ValidData => "get valid data",
            Operation::Csv => "get CSV",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Operation::Import => 0,
            Operation::ValidData => 1,
            Operation::Csv => 2,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error body sent by the import service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn details_text(&self) -> Option<String> {
        match self.details.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never reached the server
    Connectivity,
    /// The server answered with an error
    ServerReported,
}

/// Failed backend call as seen by the import step
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{status} {status_text}")]
pub struct BackendFailure {
    pub status: u16,
    pub status_text: String,
    pub payload: Option<ErrorPayload>,
}

impl BackendFailure {
    pub fn connectivity() -> Self {
        Self {
            status: 0,
            status_text: CONNECTIVITY_STATUS_TEXT.to_string(),
            payload: None,
        }
    }

    pub fn server(status: u16, status_text: impl Into<String>, payload: Option<ErrorPayload>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            payload,
        }
    }

    pub fn kind(&self) -> FailureKind {
        if self.status_text == CONNECTIVITY_STATUS_TEXT {
            FailureKind::Connectivity
        } else {
            FailureKind::ServerReported
        }
    }

    /// Text shown to the user for this failure of `operation`
    ///
    /// Only the import call appends the payload details, as `message = details`.
    pub fn user_message(&self, operation: Operation) -> String {
        if self.kind() == FailureKind::Connectivity {
            return CONNECTIVITY_MESSAGE.to_string();
        }

        let Some(payload) = self.payload.as_ref() else {
            return self.fallback_message();
        };
        let Some(message) = payload.message.as_deref() else {
            return self.fallback_message();
        };

        match (operation, payload.details_text()) {
            (Operation::Import, Some(details)) => format!("{} = {}", message, details),
            _ => message.to_string(),
        }
    }

    fn fallback_message(&self) -> String {
        format!("ERROR: {} {}", self.status, self.status_text)
    }
}
