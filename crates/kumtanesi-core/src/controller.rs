//! Chat session controller
//!
//! Drives one conversation: validates input, renders the user's message right
//! away, calls the backend, and reconciles the reply with what is on screen.
//! Every operation comes in two forms. The `async` one runs start to finish;
//! the split one (`begin_*` / `apply_*`) lets an event loop run the network
//! call elsewhere and resume on its own thread with the result.

use crate::backend::{ChatBackend, ClearReply, HistoryEntry};
use crate::config::Config;
use crate::error::{ChatError, ChatResult};
use crate::messages::MessageTable;
use crate::state::{
    ChatRole, Message, MessageElement, Notification, NotificationLevel, SendPhase,
    SessionFormState,
};
use crate::surface::{ConfirmGate, RenderSurface};

/// A validated message whose request has not been issued yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    message: String,
}

impl PendingSend {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Issue the `/chat` request. Touches nothing but the backend.
    pub async fn dispatch<B: ChatBackend + ?Sized>(self, backend: &B) -> ChatResult<String> {
        backend.send_chat(&self.message).await
    }
}

#[derive(Debug)]
pub enum SendStart {
    /// Input failed validation; no request will be made
    Rejected(ChatError),
    /// A request is already in flight
    Busy,
    Dispatch(PendingSend),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(ChatError),
    Busy,
    Delivered(Message),
    Failed(ChatError),
}

impl SendOutcome {
    /// The phase the send ended in
    pub fn phase(&self) -> SendPhase {
        match self {
            SendOutcome::Rejected(_) => SendPhase::Rejected,
            SendOutcome::Busy => SendPhase::Sending,
            SendOutcome::Delivered(_) => SendPhase::Succeeded,
            SendOutcome::Failed(_) => SendPhase::Failed,
        }
    }
}

pub struct ChatSessionController<B, S> {
    backend: B,
    surface: S,
    messages: MessageTable,
    max_message_chars: Option<usize>,
    form: SessionFormState,
    phase: SendPhase,
}

impl<B: ChatBackend, S: RenderSurface> ChatSessionController<B, S> {
    pub fn new(
        backend: B,
        surface: S,
        messages: MessageTable,
        max_message_chars: Option<usize>,
    ) -> Self {
        Self {
            backend,
            surface,
            messages,
            max_message_chars,
            form: SessionFormState::default(),
            phase: SendPhase::Idle,
        }
    }

    pub fn from_config(backend: B, surface: S, config: &Config) -> Self {
        Self::new(
            backend,
            surface,
            config.messages.clone(),
            config.max_message_chars,
        )
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn messages(&self) -> &MessageTable {
        &self.messages
    }

    pub fn form(&self) -> SessionFormState {
        self.form
    }

    pub fn phase(&self) -> SendPhase {
        self.phase
    }

    pub fn max_message_chars(&self) -> Option<usize> {
        self.max_message_chars
    }

    /// Send one message and render the outcome
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        match self.begin_send(input) {
            SendStart::Rejected(err) => SendOutcome::Rejected(err),
            SendStart::Busy => SendOutcome::Busy,
            SendStart::Dispatch(pending) => {
                let result = pending.dispatch(&self.backend).await;
                self.finish_send(result)
            }
        }
    }

    /// Validate the input and, if accepted, render it and lock the form.
    pub fn begin_send(&mut self, input: &str) -> SendStart {
        if !self.form.enabled {
            tracing::debug!("send ignored while a request is in flight");
            return SendStart::Busy;
        }

        let message = match self.validate(input) {
            Ok(message) => message,
            Err(err) => {
                let level = match err {
                    ChatError::EmptyInput => NotificationLevel::Warning,
                    _ => NotificationLevel::Danger,
                };
                self.surface
                    .notify(Notification::new(err.user_text(&self.messages), level));
                return SendStart::Rejected(err);
            }
        };

        self.surface
            .append(MessageElement::new(Message::now(ChatRole::User, message.as_str())));
        self.surface.clear_input();
        self.set_form_enabled(false);
        self.surface.show_typing();
        self.phase = SendPhase::Sending;

        tracing::info!(chars = message.chars().count(), "sending chat message");
        SendStart::Dispatch(PendingSend { message })
    }

    /// Render the reply (or the failure) and hand the form back to the user.
    pub fn finish_send(&mut self, result: ChatResult<String>) -> SendOutcome {
        self.surface.hide_typing();

        let outcome = match result {
            Ok(reply) => {
                let message = Message::now(ChatRole::Assistant, reply);
                self.surface.append(MessageElement::new(message.clone()));
                SendOutcome::Delivered(message)
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");

                let reason = err.user_text(&self.messages);
                self.surface.append(MessageElement::error(reason.as_str()));
                self.surface.notify(Notification::new(
                    format!("{}{}", self.messages.send_failed_prefix, reason),
                    NotificationLevel::Danger,
                ));
                SendOutcome::Failed(err)
            }
        };

        self.set_form_enabled(true);
        self.surface.focus_input();
        self.phase = SendPhase::Idle;
        outcome
    }

    /// Fetch the server-held transcript and render it. Failures are only logged.
    pub async fn load_history(&mut self) -> usize {
        let result = self.backend.get_history().await;
        self.apply_history(result)
    }

    /// Replace everything but the welcome element with the transcript.
    /// Returns how many entries were rendered.
    pub fn apply_history(&mut self, result: ChatResult<Vec<HistoryEntry>>) -> usize {
        let history = match result {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load conversation history");
                return 0;
            }
        };

        if history.is_empty() {
            return 0;
        }

        self.surface.retain_first();

        let mut rendered = 0;
        for entry in history {
            match ChatRole::from_str(&entry.role) {
                Some(role) => {
                    self.surface
                        .append(MessageElement::new(Message::now(role, entry.content)));
                    rendered += 1;
                }
                None if entry.role == "system" => {}
                None => tracing::warn!(role = %entry.role, "skipping history entry with unknown role"),
            }
        }

        tracing::info!(rendered, "conversation history loaded");
        rendered
    }

    /// Ask the user whether the history should really be cleared
    pub fn confirm_clear(&self, gate: &mut impl ConfirmGate) -> bool {
        gate.confirm(&self.messages.clear_confirm)
    }

    /// Clear the server-held transcript after confirmation.
    /// Returns whether the surface was cleared.
    pub async fn clear_history(&mut self, gate: &mut impl ConfirmGate) -> bool {
        if !self.confirm_clear(gate) {
            tracing::debug!("clear history declined");
            return false;
        }

        let result = self.backend.clear_history().await;
        self.apply_clear(result)
    }

    pub fn apply_clear(&mut self, result: ChatResult<ClearReply>) -> bool {
        match result {
            Ok(reply) if reply.success => {
                self.surface.retain_first();
                let text = reply
                    .message
                    .unwrap_or_else(|| self.messages.history_cleared.clone());
                self.surface
                    .notify(Notification::new(text, NotificationLevel::Success));
                tracing::info!("conversation history cleared");
                true
            }
            Ok(_) => {
                tracing::warn!("backend refused to clear history");
                self.notify_clear_failed();
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to clear history");
                self.notify_clear_failed();
                false
            }
        }
    }

    fn notify_clear_failed(&mut self) {
        self.surface.notify(Notification::new(
            self.messages.clear_failed.as_str(),
            NotificationLevel::Danger,
        ));
    }

    fn validate(&self, input: &str) -> ChatResult<String> {
        let message = input.trim();

        if message.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        if let Some(limit) = self.max_message_chars {
            let len = message.chars().count();
            if len > limit {
                return Err(ChatError::OverLengthInput { limit, len });
            }
        }

        Ok(message.to_string())
    }

    fn set_form_enabled(&mut self, enabled: bool) {
        self.form.enabled = enabled;
        self.surface.set_form_enabled(enabled);
    }
}
