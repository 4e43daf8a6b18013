//! UI-agnostic chat state types
//!
//! This module contains data structures that are shared between the controller
//! and whatever surface renders the conversation (TUI, tests, etc.) and don't
//! depend on any specific UI framework.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    /// Build a message stamped with the current local time (`HH:MM`)
    pub fn now(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    /// Map a backend role string. `system` and unknown roles are not displayable.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

/// One rendered entry on the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageElement {
    pub message: Message,
    /// Locally synthesized error bubble rather than a real assistant reply
    pub is_error: bool,
}

impl MessageElement {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            message: Message::now(ChatRole::Assistant, content),
            is_error: true,
        }
    }

    pub fn role(&self) -> ChatRole {
        self.message.role
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }
}

/// Whether the input and send controls accept interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFormState {
    pub enabled: bool,
}

impl Default for SessionFormState {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Where a send operation is. The controller only ever rests in `Idle` or
/// `Sending`; the other phases are reported through `SendOutcome::phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    #[default]
    Idle,
    Rejected,
    Sending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// A transient toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn new(text: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}
