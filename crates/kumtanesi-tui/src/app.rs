use kumtanesi_core::{
    ChatBackend, ChatSessionController, Config, HttpBackend, RenderSurface, SendStart,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::pane::ChatPane;
use crate::tui::AppEvent;

pub type Controller = ChatSessionController<HttpBackend, ChatPane>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub show_clear_confirm: bool,

    pub controller: Controller,
    pub base_url: String,

    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(backend: HttpBackend, config: &Config, events: UnboundedSender<AppEvent>) -> Self {
        let pane = ChatPane::new(&config.messages.welcome);
        let mut controller = ChatSessionController::from_config(backend, pane, config);
        controller.surface_mut().focus_input();

        Self {
            should_quit: false,
            show_clear_confirm: false,
            base_url: config.base_url.clone(),
            controller,
            events,
        }
    }

    pub fn pane(&self) -> &ChatPane {
        self.controller.surface()
    }

    pub fn pane_mut(&mut self) -> &mut ChatPane {
        self.controller.surface_mut()
    }

    /// Submit whatever is in the input box
    pub fn submit(&mut self) {
        let input = self.pane().input.clone();

        if let SendStart::Dispatch(pending) = self.controller.begin_send(&input) {
            let backend = self.controller.backend().clone();
            let tx = self.events.clone();
            tokio::spawn(async move {
                let result = pending.dispatch(&backend).await;
                let _ = tx.send(AppEvent::ChatReply(result));
            });
        }
    }

    /// Fetch the server-held transcript in the background
    pub fn load_history(&self) {
        let backend = self.controller.backend().clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = backend.get_history().await;
            let _ = tx.send(AppEvent::HistoryLoaded(result));
        });
    }

    pub fn request_clear(&mut self) {
        self.show_clear_confirm = true;
        self.pane_mut().blur_input();
    }

    /// The user answered the clear-history dialog
    pub fn answer_clear(&mut self, yes: bool) {
        self.show_clear_confirm = false;
        self.pane_mut().focus_input();

        if !self.controller.confirm_clear(&mut |_: &str| yes) {
            return;
        }

        let backend = self.controller.backend().clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = backend.clear_history().await;
            let _ = tx.send(AppEvent::HistoryCleared(result));
        });
    }

    pub fn tick(&mut self) {
        self.pane_mut().tick();
    }
}
