use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(),
        AppEvent::ChatReply(result) => {
            app.controller.finish_send(result);
        }
        AppEvent::HistoryLoaded(result) => {
            app.controller.apply_history(result);
        }
        AppEvent::HistoryCleared(result) => {
            app.controller.apply_clear(result);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_clear_confirm {
        handle_clear_confirm(app, key);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_clear();
        }
        KeyCode::Enter
            if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.pane_mut().insert_char('\n');
        }
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.pane_mut().backspace(),
        KeyCode::Delete => app.pane_mut().delete(),
        KeyCode::Left => app.pane_mut().cursor_left(),
        KeyCode::Right => app.pane_mut().cursor_right(),
        KeyCode::Home => app.pane_mut().cursor_home(),
        KeyCode::End => app.pane_mut().cursor_end(),
        KeyCode::Up => app.pane_mut().scroll_up(1),
        KeyCode::Down => app.pane_mut().scroll_down(1),
        KeyCode::PageUp => {
            let page = app.pane().chat_height.max(1);
            app.pane_mut().scroll_up(page);
        }
        KeyCode::PageDown => {
            let page = app.pane().chat_height.max(1);
            app.pane_mut().scroll_down(page);
        }
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.pane_mut().insert_char(c);
        }
        _ => {}
    }
}

fn handle_clear_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('e') | KeyCode::Enter => app.answer_clear(true),
        KeyCode::Char('n') | KeyCode::Char('h') | KeyCode::Esc => app.answer_clear(false),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumtanesi_core::{
        ChatError, ClearReply, Config, HistoryEntry, HttpBackend, NotificationLevel,
        RenderSurface, ResponseVariant,
    };
    use tokio::sync::mpsc;

    fn app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = Config::new();
        let backend = HttpBackend::new(&config.base_url, ResponseVariant::SuccessFlag).unwrap();
        (App::new(backend, &config, tx), rx)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_starts_with_welcome_and_focus() {
        let (app, _rx) = app();
        assert_eq!(app.pane().elements().len(), 1);
        assert!(app.pane().input_focused);
    }

    #[test]
    fn test_empty_enter_only_warns() {
        let (mut app, _rx) = app();
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.pane().elements().len(), 1);
        assert!(app.pane().form_enabled);
        let toast = app.pane().latest_toast().unwrap();
        assert_eq!(toast.notification.level, NotificationLevel::Warning);
    }

    #[test]
    fn test_alt_enter_inserts_newline() {
        let (mut app, _rx) = app();
        type_text(&mut app, "a");
        handle_event(&mut app, AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));
        type_text(&mut app, "b");
        assert_eq!(app.pane().input, "a\nb");
    }

    #[tokio::test]
    async fn test_reply_event_completes_send() {
        let (mut app, _rx) = app();
        type_text(&mut app, "merhaba");
        handle_event(&mut app, key(KeyCode::Enter));

        // Form locked and input cleared while the request is out
        assert!(!app.pane().form_enabled);
        assert!(app.pane().typing);
        assert!(app.pane().input.is_empty());
        type_text(&mut app, "x");
        assert!(app.pane().input.is_empty());

        handle_event(&mut app, AppEvent::ChatReply(Ok("Selam!".to_string())));
        assert!(app.pane().form_enabled);
        assert!(!app.pane().typing);
        let contents: Vec<&str> = app.pane().elements().iter().map(|e| e.content()).collect();
        assert_eq!(contents[1..], ["merhaba", "Selam!"]);
    }

    #[tokio::test]
    async fn test_failed_reply_event_restores_form() {
        let (mut app, _rx) = app();
        type_text(&mut app, "merhaba");
        handle_event(&mut app, key(KeyCode::Enter));
        handle_event(
            &mut app,
            AppEvent::ChatReply(Err(ChatError::NetworkFailure("refused".to_string()))),
        );

        assert!(app.pane().form_enabled);
        assert!(app.pane().elements().last().unwrap().is_error);
    }

    #[test]
    fn test_clear_dialog_declined_keeps_messages() {
        let (mut app, _rx) = app();
        handle_event(&mut app, AppEvent::HistoryLoaded(Ok(vec![HistoryEntry::new("user", "eski")])));
        assert_eq!(app.pane().elements().len(), 2);

        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL)),
        );
        assert!(app.show_clear_confirm);
        assert!(!app.pane().input_focused);
        handle_event(&mut app, key(KeyCode::Char('n')));

        assert!(!app.show_clear_confirm);
        assert!(app.pane().input_focused);
        assert!(!app.should_quit);
        assert_eq!(app.pane().elements().len(), 2);
    }

    #[test]
    fn test_cleared_event_keeps_welcome() {
        let (mut app, _rx) = app();
        handle_event(&mut app, AppEvent::HistoryLoaded(Ok(vec![HistoryEntry::new("user", "eski")])));
        handle_event(
            &mut app,
            AppEvent::HistoryCleared(Ok(ClearReply {
                success: true,
                message: None,
            })),
        );
        assert_eq!(app.pane().elements().len(), 1);
    }

    #[test]
    fn test_modified_letters_are_not_typed() {
        let (mut app, _rx) = app();
        type_text(&mut app, "a");
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)),
        );
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
        );
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)),
        );
        assert_eq!(app.pane().input, "aB");
    }

    #[test]
    fn test_escape_quits() {
        let (mut app, _rx) = app();
        handle_event(&mut app, key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
