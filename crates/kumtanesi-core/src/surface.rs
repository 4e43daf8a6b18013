//! Contracts between the controller and whatever displays the conversation.

use crate::state::{MessageElement, Notification};

/// Ordered message list plus the input form and transient notifications.
///
/// The first element is treated as the welcome element: bulk removals keep it.
pub trait RenderSurface {
    fn append(&mut self, element: MessageElement);

    fn elements(&self) -> &[MessageElement];

    /// Remove every element except the first
    fn retain_first(&mut self);

    fn show_typing(&mut self);

    fn hide_typing(&mut self);

    fn set_form_enabled(&mut self, enabled: bool);

    fn clear_input(&mut self);

    fn focus_input(&mut self);

    fn notify(&mut self, notification: Notification);
}

/// Blocking yes/no question put to the user
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
