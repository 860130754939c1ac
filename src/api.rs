use crate::{
    config::Config,
    constants::{CHAT_PATH, HISTORY_PATH},
    errors::{ChatError, ChatResult},
    logging::log_api_call,
    message::Message,
    models::{ApiCallLog, ChatReply, ChatRequest, HistoryEntry, HistoryResponse},
};
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// HTTP client for the chat server.
///
/// The cookie store is enabled so the server's session cookie survives
/// between calls, the same way a browser keeps it for the page.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    history_timeout: Duration,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ChatResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            timeout,
            history_timeout: timeout,
        })
    }

    pub fn from_config(config: &Config) -> ChatResult<Self> {
        Ok(Self::new(config.endpoint.trim(), config.request_timeout())?
            .with_history_timeout(config.history_timeout()))
    }

    /// Caps the startup `/history` fetch, which runs before the terminal
    /// opens. Never longer than the client-wide timeout.
    pub fn with_history_timeout(mut self, history_timeout: Duration) -> Self {
        self.history_timeout = history_timeout.min(self.timeout);
        self
    }

    /// Posts one user message and returns the reply text.
    pub async fn send_message(&self, message: &str) -> ChatResult<String> {
        let url = format!("{}{}", self.base_url, CHAT_PATH);
        let summary = format!("message ({} chars)", message.chars().count());
        let started = Instant::now();

        let result = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await;

        let reply: ChatReply = self
            .finish(&url, summary, started, self.timeout, result)
            .await?;
        reply.into_text().ok_or_else(|| {
            ChatError::payload_error(format!("Response from {} has no reply field", url))
        })
    }

    /// Fetches the server-side conversation for this session.
    pub async fn fetch_history(&self) -> ChatResult<Vec<Message>> {
        let url = format!("{}{}", self.base_url, HISTORY_PATH);
        let started = Instant::now();

        let result = self
            .client
            .get(&url)
            .timeout(self.history_timeout)
            .send()
            .await;

        let history: HistoryResponse = self
            .finish(
                &url,
                "history".to_string(),
                started,
                self.history_timeout,
                result,
            )
            .await?;
        Ok(history
            .history
            .into_iter()
            .map(HistoryEntry::into_message)
            .collect())
    }

    /// Checks the status, reads the body and decodes it, logging one line
    /// per call whatever the outcome.
    async fn finish<T: DeserializeOwned>(
        &self,
        url: &str,
        request_summary: String,
        started: Instant,
        timeout: Duration,
        result: Result<Response, reqwest::Error>,
    ) -> ChatResult<T> {
        let mut entry = ApiCallLog {
            timestamp: Utc::now(),
            endpoint: url.to_string(),
            request_summary,
            response_status: 0,
            response_time_ms: 0,
        };

        let outcome = read_body(result, timeout, &mut entry).await;
        entry.response_time_ms = started.elapsed().as_millis();
        log_api_call(&entry);

        let body = outcome?;
        serde_json::from_str(&body).map_err(|e| {
            ChatError::payload_error(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}

async fn read_body(
    result: Result<Response, reqwest::Error>,
    timeout: Duration,
    entry: &mut ApiCallLog,
) -> ChatResult<String> {
    let response = result.map_err(|e| map_reqwest_error(e, timeout))?;

    let status = response.status();
    entry.response_status = status.as_u16();

    let body = response
        .text()
        .await
        .map_err(|e| map_reqwest_error(e, timeout))?;

    if !status.is_success() {
        return Err(ChatError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout(timeout)
    } else if e.is_decode() {
        ChatError::payload_error(e.to_string())
    } else {
        ChatError::transport_error(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "Hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hello!"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reply = client_for(&mock_server).send_message("Hi").await.unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            ChatClient::new(format!("{}/", mock_server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(client.send_message("x").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_message("Hi").await.unwrap_err();
        match err {
            ChatError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_payload_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_message("Hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Payload(_)));
    }

    #[tokio::test]
    async fn test_missing_reply_field_is_payload_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "queued", "queued": 1})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_message("Hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Payload(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(mock_server.uri(), Duration::from_millis(200)).unwrap();
        let err = client.send_message("Hi").await.unwrap_err();
        assert!(err.is_timeout(), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = ChatClient::new("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let err = client.send_message("Hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "history": [
                    {"role": "model", "parts": ["Book store xin chào quý khách!"]},
                    {"role": "user", "parts": ["Còn sách Nhà Giả Kim không?"]},
                    {"role": "model", "parts": ["Còn 3 cuốn."]}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let history = client_for(&mock_server).fetch_history().await.unwrap();
        let senders: Vec<Sender> = history.iter().map(|m| m.sender()).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
        assert_eq!(history[2].text(), "Còn 3 cuốn.");
    }

    #[tokio::test]
    async fn test_body_with_both_reply_keys_succeeds() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "hello", "reply": "hello"})),
            )
            .mount(&mock_server)
            .await;

        let reply = client_for(&mock_server).send_message("Hi").await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn test_slow_history_uses_its_own_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/history"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"history": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).with_history_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let err = client.fetch_history().await.unwrap_err();

        assert!(err.is_timeout(), "unexpected error: {:?}", err);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
