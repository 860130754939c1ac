// src/models.rs

use crate::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Successful body of `POST /chat`. Some server builds answer with `reply`
/// instead of `response`, and a body may carry both.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
}

impl ChatReply {
    /// `response` wins when both keys are present. `None` means the body
    /// had neither.
    pub fn into_text(self) -> Option<String> {
        self.response.or(self.reply)
    }
}

/// Body of `GET /history`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One server-side chat turn: `role` is `"user"` or `"model"`.
#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<String>,
}

impl HistoryEntry {
    /// Maps a server turn onto a transcript message. Anything not authored by
    /// the user is shown as the bot.
    pub fn into_message(self) -> Message {
        let text = self.parts.join("\n");
        if self.role == "user" {
            Message::user(text)
        } else {
            Message::bot(text)
        }
    }
}

/// Logs details of each API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use serde_json::json;

    fn reply_text(body: serde_json::Value) -> Option<String> {
        serde_json::from_value::<ChatReply>(body).unwrap().into_text()
    }

    #[test]
    fn test_reply_accepts_response_and_reply_keys() {
        assert_eq!(reply_text(json!({"response": "hello"})).as_deref(), Some("hello"));
        assert_eq!(reply_text(json!({"reply": "hello"})).as_deref(), Some("hello"));
    }

    #[test]
    fn test_reply_with_both_keys_prefers_response() {
        assert_eq!(
            reply_text(json!({"response": "hello", "reply": "hello"})).as_deref(),
            Some("hello")
        );
        assert_eq!(
            reply_text(json!({"response": "first", "reply": "second"})).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_reply_without_field_has_no_text() {
        assert_eq!(reply_text(json!({"status": "queued"})), None);
    }

    #[test]
    fn test_reply_with_wrong_type_is_rejected() {
        let res: Result<ChatReply, _> = serde_json::from_value(json!({"response": 42}));
        assert!(res.is_err());
    }

    #[test]
    fn test_request_serializes_message_field() {
        let body = serde_json::to_value(ChatRequest { message: "Hi" }).unwrap();
        assert_eq!(body, json!({"message": "Hi"}));
    }

    #[test]
    fn test_history_entry_roles() {
        let history: HistoryResponse = serde_json::from_value(json!({
            "history": [
                {"role": "model", "parts": ["Xin chào"]},
                {"role": "user", "parts": ["Có sách", "Dế Mèn không?"]}
            ]
        }))
        .unwrap();
        let messages: Vec<Message> = history
            .history
            .into_iter()
            .map(HistoryEntry::into_message)
            .collect();
        assert_eq!(messages[0].sender(), Sender::Bot);
        assert_eq!(messages[1].sender(), Sender::User);
        assert_eq!(messages[1].text(), "Có sách\nDế Mèn không?");
    }
}
