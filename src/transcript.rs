use crate::chat_message;
use crate::message::Message;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The append target the controller writes into. The host owns it and
/// decides how it is drawn.
pub trait TranscriptView: Send + 'static {
    fn append(&mut self, message: Message);

    /// Moves the view so the newest message is fully visible.
    fn scroll_to_end(&mut self);
}

pub type SharedTranscript<V = Transcript> = Arc<Mutex<V>>;

/// In-memory transcript with line-based scroll state for the terminal pane.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    width: u16,
    height: u16,
    scroll: u16,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            width: 80,
            height: 20,
            scroll: 0,
        }
    }

    pub fn shared(self) -> SharedTranscript {
        Arc::new(Mutex::new(self))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Total rendered height: every message plus one blank separator line
    /// between neighbours.
    pub fn total_lines(&self) -> usize {
        let body: usize = self
            .messages
            .iter()
            .map(|m| chat_message::line_count(m, self.width))
            .sum();
        body + self.messages.len().saturating_sub(1)
    }

    pub fn max_scroll(&self) -> u16 {
        let overflow = self.total_lines().saturating_sub(self.height as usize);
        u16::try_from(overflow).unwrap_or(u16::MAX)
    }

    pub fn is_at_end(&self) -> bool {
        self.scroll >= self.max_scroll()
    }

    /// Called by the renderer with the pane size. A view pinned to the end
    /// stays pinned across resizes.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        let was_at_end = self.is_at_end();
        self.width = width.max(1);
        self.height = height;
        if was_at_end {
            self.scroll = self.max_scroll();
        } else {
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptView for Transcript {
    fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn scroll_to_end(&mut self) {
        self.scroll = self.max_scroll();
    }
}
