use chrono::{DateTime, Local};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One displayed chat turn. Fields are private: a message never changes
/// after it is created.
#[derive(Debug, Clone)]
pub struct Message {
    text: String,
    sender: Sender,
    timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

// Timestamps are display-only; two turns are equal when text and author match.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.sender == other.sender
    }
}

impl Eq for Message {}
