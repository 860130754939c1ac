// src/lib.rs

pub mod api;
pub mod app;
pub mod chat_message;
pub mod chat_view;
pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod key_handlers;
pub mod logging;
pub mod message;
pub mod models;
pub mod transcript;
pub mod ui;

pub use app::App;
pub use controller::{ChatController, SubmissionId};
pub use errors::{ChatError, ChatResult};
pub use message::{Message, Sender};
pub use transcript::{SharedTranscript, Transcript, TranscriptView};
