//! Access to the server-held transcript.
//!
//! The backend is a black box reached through three endpoints; this module
//! defines the contract the controller depends on and the rules for reading
//! the backend's JSON replies.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ResponseVariant;
use crate::error::{ChatError, ChatResult};

/// One entry of the server-held transcript as returned by `/get_history`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Reply of `/clear_history`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ClearReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Transcript store reachable over the chat backend's endpoints
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /chat`; returns the assistant's reply text
    async fn send_chat(&self, message: &str) -> ChatResult<String>;

    /// `GET /get_history`
    async fn get_history(&self) -> ChatResult<Vec<HistoryEntry>>;

    /// `POST /clear_history`
    async fn clear_history(&self) -> ChatResult<ClearReply>;
}

#[derive(Deserialize)]
struct ChatReply {
    success: Option<bool>,
    status: Option<String>,
    response: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct HistoryReply {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Decide what a `/chat` reply means.
///
/// A reply succeeds only when the HTTP status is a success, the variant's
/// success indicator is set, and a `response` string is present.
pub fn interpret_chat_reply(
    status_ok: bool,
    body: &str,
    variant: ResponseVariant,
) -> ChatResult<String> {
    let reply: ChatReply =
        serde_json::from_str(body).map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

    let succeeded = match variant {
        ResponseVariant::SuccessFlag => reply.success == Some(true),
        ResponseVariant::StatusString => reply.status.as_deref() == Some("success"),
    };

    if status_ok && succeeded {
        reply
            .response
            .ok_or_else(|| ChatError::MalformedResponse("missing `response` field".to_string()))
    } else {
        Err(ChatError::BackendError(reply.error))
    }
}

pub fn interpret_history_reply(status_ok: bool, body: &str) -> ChatResult<Vec<HistoryEntry>> {
    if !status_ok {
        return Err(ChatError::BackendError(None));
    }
    let reply: HistoryReply =
        serde_json::from_str(body).map_err(|e| ChatError::MalformedResponse(e.to_string()))?;
    Ok(reply.history)
}

pub fn interpret_clear_reply(status_ok: bool, body: &str) -> ChatResult<ClearReply> {
    let reply: ClearReply =
        serde_json::from_str(body).map_err(|e| ChatError::MalformedResponse(e.to_string()))?;
    if !status_ok {
        return Err(ChatError::BackendError(reply.message));
    }
    Ok(reply)
}
