use crate::{
    api::ChatClient,
    config::Config,
    constants::{FALLBACK_MESSAGE, TIMEOUT_MESSAGE},
    errors::{ChatError, ChatResult},
    message::Message,
    transcript::{SharedTranscript, Transcript, TranscriptView},
};
use futures::future::join_all;
use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::{sync::Mutex, task::JoinHandle};

/// Identifies one submission for as long as its request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type InFlight = Arc<Mutex<HashMap<SubmissionId, JoinHandle<()>>>>;

/// The text shown in place of a reply. Raw error detail only goes to the log.
pub fn user_facing_text(err: &ChatError) -> &'static str {
    if err.is_timeout() {
        TIMEOUT_MESSAGE
    } else {
        FALLBACK_MESSAGE
    }
}

/// Wires the input buffer to the chat endpoint and the transcript.
///
/// Every accepted submission becomes its own task; tasks are not ordered
/// against each other and nothing blocks the caller while they run.
pub struct ChatController<V: TranscriptView = Transcript> {
    client: ChatClient,
    transcript: SharedTranscript<V>,
    in_flight: InFlight,
    next_id: AtomicU64,
}

impl<V: TranscriptView> ChatController<V> {
    pub fn new(client: ChatClient, transcript: SharedTranscript<V>) -> Self {
        Self {
            client,
            transcript,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transcript(&self) -> SharedTranscript<V> {
        Arc::clone(&self.transcript)
    }

    /// Submits whatever is in `input`.
    ///
    /// Blank input is ignored and left as typed. Otherwise the trimmed text
    /// is appended as a user message, `input` is cleared and the request is
    /// spawned; the reply (or the fallback text) is appended when it settles.
    pub async fn submit(&self, input: &mut String) -> Option<SubmissionId> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();

        append(&self.transcript, Message::user(text.clone())).await;
        input.clear();

        let id = SubmissionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        log::debug!("Submission {} accepted ({} chars)", id, text.chars().count());

        // Hold the registry while spawning so the task cannot deregister
        // before it has been registered.
        let mut in_flight = self.in_flight.lock().await;
        let handle = tokio::spawn(run_submission(
            id,
            text,
            self.client.clone(),
            Arc::clone(&self.transcript),
            Arc::clone(&self.in_flight),
        ));
        in_flight.insert(id, handle);

        Some(id)
    }

    pub async fn in_flight(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Waits until no submission is in flight, including ones submitted
    /// while waiting.
    pub async fn wait_idle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut in_flight = self.in_flight.lock().await;
                in_flight.drain().map(|(_, handle)| handle).collect()
            };
            if handles.is_empty() {
                return;
            }
            for result in join_all(handles).await {
                if let Err(e) = result {
                    log::error!("Submission task failed to complete: {}", e);
                }
            }
        }
    }

    /// Appends the server-side history for this session. Returns how many
    /// messages were restored.
    pub async fn restore_history(&self) -> ChatResult<usize> {
        let history = self.client.fetch_history().await?;
        let count = history.len();
        let mut transcript = self.transcript.lock().await;
        for message in history {
            transcript.append(message);
        }
        transcript.scroll_to_end();
        Ok(count)
    }

    pub async fn greet(&self, greeting: &str) {
        append(&self.transcript, Message::bot(greeting)).await;
    }

    /// Fills the transcript before the first submission: restored history if
    /// enabled and non-empty, otherwise the configured greeting.
    pub async fn start(&self, config: &Config) {
        if config.restore_history {
            match self.restore_history().await {
                Ok(0) => log::info!("Server history is empty"),
                Ok(count) => {
                    log::info!("Restored {} messages from server history", count);
                    return;
                }
                Err(e) => log::warn!("Could not restore history: {}", e),
            }
        }

        if let Some(greeting) = config.greeting.as_deref() {
            if !greeting.trim().is_empty() {
                self.greet(greeting).await;
            }
        }
    }
}

async fn append<V: TranscriptView>(transcript: &SharedTranscript<V>, message: Message) {
    let mut transcript = transcript.lock().await;
    transcript.append(message);
    transcript.scroll_to_end();
}

async fn run_submission<V: TranscriptView>(
    id: SubmissionId,
    text: String,
    client: ChatClient,
    transcript: SharedTranscript<V>,
    in_flight: InFlight,
) {
    let reply = match client.send_message(&text).await {
        Ok(reply) => {
            log::debug!("Submission {} answered", id);
            Message::bot(reply)
        }
        Err(e) => {
            log::error!("Submission {} failed: {}", id, e);
            Message::bot(user_facing_text(&e))
        }
    };

    append(&transcript, reply).await;
    in_flight.lock().await.remove(&id);
}
