use crate::controller::ChatController;

/// Front-end state: the input buffer and the controller that owns the
/// transcript handle.
pub struct App {
    pub input: String,
    pub controller: ChatController,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: ChatController) -> App {
        App {
            input: String::new(),
            controller,
            should_quit: false,
        }
    }

    pub async fn submit(&mut self) {
        if let Some(id) = self.controller.submit(&mut self.input).await {
            log::debug!("Sent submission {}", id);
        }
    }

    pub async fn scroll_up(&self, lines: u16) {
        self.controller.transcript().lock().await.scroll_up(lines);
    }

    pub async fn scroll_down(&self, lines: u16) {
        self.controller.transcript().lock().await.scroll_down(lines);
    }
}
