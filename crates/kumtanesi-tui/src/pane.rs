use kumtanesi_core::{
    format_message, ChatRole, Message, MessageElement, Notification, RenderSurface,
};

/// How long a toast stays up, in ticks (300ms each)
pub const TOAST_TICKS: u16 = 14;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub ticks_left: u16,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// The chat panel: rendered messages, the input box, and toasts
pub struct ChatPane {
    elements: Vec<MessageElement>,
    pub typing: bool,
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub form_enabled: bool,
    pub input_focused: bool,
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub toasts: Vec<Toast>,

    // Scroll state, dimensions updated during render
    pub scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
}

impl ChatPane {
    /// New pane whose first element is the welcome greeting
    pub fn new(welcome: &str) -> Self {
        Self {
            elements: vec![MessageElement::new(Message::now(ChatRole::Assistant, welcome))],
            typing: false,
            animation_frame: 0,
            form_enabled: true,
            input_focused: false,
            input: String::new(),
            cursor: 0,
            toasts: Vec::new(),
            scroll: 0,
            chat_height: 0,
            chat_width: 0,
        }
    }

    pub fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.form_enabled {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if !self.form_enabled || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
    }

    pub fn delete(&mut self) {
        if !self.form_enabled || self.cursor >= self.char_count() {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn blur_input(&mut self) {
        self.input_focused = false;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    /// Advance the typing animation and expire old toasts (called by Tick event)
    pub fn tick(&mut self) {
        if self.typing {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        for toast in &mut self.toasts {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
        }
        self.toasts.retain(|t| t.ticks_left > 0);
    }

    pub fn latest_toast(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Total rendered height of the conversation at the current width
    pub fn content_height(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;

        for element in &self.elements {
            total_lines += 1; // Role line
            for line in format_message(element.content()).lines {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count: usize = line.segments.iter().map(|s| s.text.chars().count()).sum();
                total_lines += char_count / wrap_width + 1;
            }
            total_lines += 1; // Blank line after message
        }

        if self.typing {
            total_lines += 2; // Role line + typing line
        }

        total_lines.min(u16::MAX as usize) as u16
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.content_height().saturating_sub(visible_height)
    }

    /// Scroll so the newest element (or the typing indicator) is visible
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }
}

impl RenderSurface for ChatPane {
    fn append(&mut self, element: MessageElement) {
        self.elements.push(element);
        self.scroll_to_bottom();
    }

    fn elements(&self) -> &[MessageElement] {
        &self.elements
    }

    fn retain_first(&mut self) {
        self.elements.truncate(1);
        self.scroll = 0;
    }

    fn show_typing(&mut self) {
        self.typing = true;
        self.animation_frame = 0;
        self.scroll_to_bottom();
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn set_form_enabled(&mut self, enabled: bool) {
        self.form_enabled = enabled;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn notify(&mut self, notification: Notification) {
        self.toasts.push(Toast {
            notification,
            ticks_left: TOAST_TICKS,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumtanesi_core::NotificationLevel;

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut pane = ChatPane::new("hoş geldin");
        for c in "çığ".chars() {
            pane.insert_char(c);
        }
        pane.cursor_left();
        pane.backspace();
        assert_eq!(pane.input, "çğ");
        assert_eq!(pane.cursor, 1);
        pane.cursor_home();
        pane.delete();
        assert_eq!(pane.input, "ğ");
        assert_eq!(pane.char_count(), 1);
    }

    #[test]
    fn test_disabled_form_ignores_typing() {
        let mut pane = ChatPane::new("hi");
        pane.set_form_enabled(false);
        pane.insert_char('a');
        assert!(pane.input.is_empty());
    }

    #[test]
    fn test_retain_first_keeps_welcome() {
        let mut pane = ChatPane::new("hoş geldin");
        pane.append(MessageElement::new(Message::now(ChatRole::User, "a")));
        pane.append(MessageElement::error("b"));
        pane.retain_first();
        assert_eq!(pane.elements().len(), 1);
        assert_eq!(pane.elements()[0].content(), "hoş geldin");
    }

    #[test]
    fn test_typing_animation_cycles_only_while_typing() {
        let mut pane = ChatPane::new("hi");
        pane.tick();
        assert_eq!(pane.animation_frame, 0);

        pane.show_typing();
        pane.tick();
        pane.tick();
        assert_eq!(pane.animation_frame, 2);
        pane.tick();
        assert_eq!(pane.animation_frame, 0);
    }

    #[test]
    fn test_toasts_expire() {
        let mut pane = ChatPane::new("hi");
        pane.notify(Notification::new("tamam", NotificationLevel::Success));
        for _ in 0..TOAST_TICKS - 1 {
            pane.tick();
        }
        assert_eq!(pane.latest_toast().unwrap().notification.text, "tamam");
        pane.tick();
        assert!(pane.latest_toast().is_none());
    }

    #[test]
    fn test_append_follows_bottom() {
        let mut pane = ChatPane::new("hi");
        pane.chat_height = 4;
        pane.chat_width = 40;
        for i in 0..5 {
            pane.append(MessageElement::new(Message::now(ChatRole::User, format!("m{}", i))));
        }
        // 6 elements * 3 lines each, 4 visible
        assert_eq!(pane.content_height(), 18);
        assert_eq!(pane.scroll, 14);

        pane.scroll_up(20);
        assert_eq!(pane.scroll, 0);
        pane.scroll_down(100);
        assert_eq!(pane.scroll, 14);

        // Paging past the end from a non-zero offset clamps instead of overflowing
        pane.scroll_down(u16::MAX);
        assert_eq!(pane.scroll, 14);
    }

    #[test]
    fn test_blur_and_focus_input() {
        let mut pane = ChatPane::new("hi");
        pane.focus_input();
        pane.blur_input();
        assert!(!pane.input_focused);
        pane.focus_input();
        assert!(pane.input_focused);
    }
}
