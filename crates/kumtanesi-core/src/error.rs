use thiserror::Error;

use crate::messages::MessageTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("empty message")]
    EmptyInput,

    #[error("message too long: {len} > {limit} characters")]
    OverLengthInput { limit: usize, len: usize },

    #[error("network error: {0}")]
    NetworkFailure(String),

    #[error("backend error: {}", .0.as_deref().unwrap_or("no reason given"))]
    BackendError(Option<String>),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ChatError {
    /// Text shown to the user for this failure
    pub fn user_text(&self, messages: &MessageTable) -> String {
        match self {
            ChatError::EmptyInput => messages.empty_input.clone(),
            ChatError::OverLengthInput { limit, .. } => messages.over_length_text(*limit),
            ChatError::NetworkFailure(_) => messages.network_failure.clone(),
            ChatError::BackendError(Some(reason)) => reason.clone(),
            ChatError::BackendError(None) | ChatError::MalformedResponse(_) => {
                messages.backend_fallback.clone()
            }
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::NetworkFailure(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
