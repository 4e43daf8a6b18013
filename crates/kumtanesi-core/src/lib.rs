pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod messages;
pub mod state;
pub mod surface;

// Re-export main types for convenience
pub use backend::{ChatBackend, ClearReply, HistoryEntry, HttpBackend};
pub use config::{Config, ResponseVariant};
pub use controller::{ChatSessionController, PendingSend, SendOutcome, SendStart};
pub use error::{ChatError, ChatResult};
pub use format::{format_message, FormattedMessage, Segment, SpanStyle};
pub use messages::MessageTable;
pub use state::{
    ChatRole, Message, MessageElement, Notification, NotificationLevel, SendPhase,
    SessionFormState,
};
pub use surface::{ConfirmGate, RenderSurface};
