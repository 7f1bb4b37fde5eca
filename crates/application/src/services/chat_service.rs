//! Chat service - Streaming tutor conversations
//!
//! Each session is an explicit handle holding its own history. Replies are
//! streamed through a bounded channel fed by a producer task; the consumer
//! unsubscribes by dropping the receiver, after which the producer keeps
//! draining so the finished reply still lands in the history.

use std::{collections::HashMap, sync::Arc};

use domain::{ChatMessage, ChatSessionId};
use futures::StreamExt;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::AiGatewayPort};

/// First message shown when a conversation opens
pub const CHAT_GREETING: &str = "Hello! I'm your AI study companion. Ask me anything about your subjects, topics, or revision.";

/// Appended to the stream when the model fails mid-reply
pub const CHAT_ERROR_MESSAGE: &str = "Sorry, I encountered an error.";

/// Appended to the stream when the AI service cannot be reached
pub const CHAT_CONNECTION_ERROR_MESSAGE: &str =
    "Connection failed. Please check your internet or refresh the page.";

/// Fixed instruction every tutor session starts from
pub const TUTOR_SYSTEM_INSTRUCTION: &str = "You are Pearl, a friendly and patient study companion \
for secondary school students in Uganda following the NCDC Competency-Based Curriculum (S1-S4). \
Explain concepts clearly and simply, use local Ugandan examples where they help, and encourage \
the student to think for themselves. Keep answers focused and concise. If a question is outside \
school subjects, gently steer the conversation back to learning.";

const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// One increment of a streamed reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatChunk {
    pub content: String,
    /// Set on the final chunk of a reply
    pub done: bool,
}

impl ChatChunk {
    fn delta(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    fn finished(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: true,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    history: Vec<ChatMessage>,
    valid: bool,
}

type Sessions = Arc<Mutex<HashMap<ChatSessionId, Session>>>;

/// Owns tutor chat sessions
pub struct ChatService {
    gateway: Arc<dyn AiGatewayPort>,
    sessions: Sessions,
    system_instruction: Arc<str>,
    channel_capacity: usize,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("sessions", &self.session_count())
            .field("channel_capacity", &self.channel_capacity)
            .finish_non_exhaustive()
    }
}

impl ChatService {
    pub fn new(gateway: Arc<dyn AiGatewayPort>) -> Self {
        Self {
            gateway,
            sessions: Arc::default(),
            system_instruction: Arc::from(TUTOR_SYSTEM_INSTRUCTION),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Open a new session with empty history
    pub fn create_session(&self) -> ChatSessionId {
        let id = ChatSessionId::new();
        self.sessions.lock().insert(id, Session {
            history: Vec::new(),
            valid: true,
        });
        info!(session = %id, "Chat session created");
        id
    }

    /// Tear down a session; returns whether it existed
    pub fn close_session(&self, id: ChatSessionId) -> bool {
        let removed = self.sessions.lock().remove(&id).is_some();
        if removed {
            info!(session = %id, "Chat session closed");
        }
        removed
    }

    /// Committed turns of a session
    pub fn history(&self, id: ChatSessionId) -> Option<Vec<ChatMessage>> {
        self.sessions.lock().get(&id).map(|s| s.history.clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Send a student message and stream the reply.
    ///
    /// The last chunk always has `done` set. Failures arrive as a final chunk
    /// carrying an apology; a connection failure also invalidates the session
    /// so the next send starts over with fresh history.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub fn send(
        &self,
        id: ChatSessionId,
        message: &str,
    ) -> Result<mpsc::Receiver<ChatChunk>, ApplicationError> {
        let history = {
            let mut sessions = self.sessions.lock();
            let session = sessions
                .get_mut(&id)
                .ok_or_else(|| ApplicationError::NotFound(format!("chat session {id}")))?;
            if !session.valid {
                debug!(session = %id, "Re-creating invalidated session");
                session.history.clear();
                session.valid = true;
            }
            session.history.clone()
        };

        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let producer = ReplyProducer {
            id,
            gateway: Arc::clone(&self.gateway),
            sessions: Arc::clone(&self.sessions),
            system_instruction: Arc::clone(&self.system_instruction),
            tx,
        };
        tokio::spawn(producer.run(history, message.to_string()));

        Ok(rx)
    }
}

struct ReplyProducer {
    id: ChatSessionId,
    gateway: Arc<dyn AiGatewayPort>,
    sessions: Sessions,
    system_instruction: Arc<str>,
    tx: mpsc::Sender<ChatChunk>,
}

impl ReplyProducer {
    async fn run(self, history: Vec<ChatMessage>, message: String) {
        let mut stream = match self
            .gateway
            .chat_stream(&self.system_instruction, &history, &message)
            .await
        {
            Ok(stream) => stream,
            Err(e) => return self.fail(&e).await,
        };

        let mut reply = String::new();
        let mut subscribed = true;
        while let Some(item) = stream.next().await {
            match item {
                Ok(delta) => {
                    reply.push_str(&delta);
                    if subscribed && self.tx.send(ChatChunk::delta(delta)).await.is_err() {
                        debug!(session = %self.id, "Chat consumer went away, draining reply");
                        subscribed = false;
                    }
                },
                Err(e) => return self.fail(&e).await,
            }
        }

        self.commit(message, reply);
        let _ = self.tx.send(ChatChunk::finished("")).await;
    }

    fn commit(&self, message: String, reply: String) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(&self.id) {
            session.history.push(ChatMessage::user(message));
            session.history.push(ChatMessage::assistant(reply));
        }
    }

    async fn fail(&self, error: &ApplicationError) {
        warn!(session = %self.id, error = %error, "Chat reply failed");
        let text = if error.is_connection_error() {
            if let Some(session) = self.sessions.lock().get_mut(&self.id) {
                session.valid = false;
            }
            CHAT_CONNECTION_ERROR_MESSAGE
        } else {
            CHAT_ERROR_MESSAGE
        };
        let _ = self.tx.send(ChatChunk::finished(text)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::stream;
    use mockall::Sequence;

    use super::*;
    use crate::ports::{MockAiGatewayPort, TextStream};

    fn reply(parts: &[&str]) -> TextStream {
        let items: Vec<Result<String, ApplicationError>> =
            parts.iter().map(|p| Ok((*p).to_string())).collect();
        Box::pin(stream::iter(items))
    }

    async fn collect(mut rx: mpsc::Receiver<ChatChunk>) -> Vec<ChatChunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test]
    async fn streams_reply_and_commits_history() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_chat_stream()
            .withf(|instruction, history, message| {
                instruction == TUTOR_SYSTEM_INSTRUCTION
                    && history.is_empty()
                    && message == "What is osmosis?"
            })
            .times(1)
            .returning(|_, _, _| Ok(reply(&["Osmosis is ", "diffusion of water."])));

        let service = ChatService::new(Arc::new(gateway));
        let id = service.create_session();
        let chunks = collect(service.send(id, "What is osmosis?").unwrap()).await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], ChatChunk::delta("Osmosis is "));
        assert!(chunks[2].done);

        let history = service.history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "What is osmosis?");
        assert_eq!(history[1].content, "Osmosis is diffusion of water.");
    }

    #[tokio::test]
    async fn second_turn_sees_prior_history() {
        let mut gateway = MockAiGatewayPort::new();
        let mut seq = Sequence::new();
        gateway
            .expect_chat_stream()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(reply(&["Hi!"])));
        gateway
            .expect_chat_stream()
            .withf(|_, history, _| history.len() == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(reply(&["Sure."])));

        let service = ChatService::new(Arc::new(gateway));
        let id = service.create_session();
        collect(service.send(id, "Hello").unwrap()).await;
        collect(service.send(id, "Help me revise").unwrap()).await;

        assert_eq!(service.history(id).unwrap().len(), 4);
    }

    #[tokio::test]
    async fn connection_error_invalidates_session() {
        let mut gateway = MockAiGatewayPort::new();
        let mut seq = Sequence::new();
        gateway
            .expect_chat_stream()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(reply(&["Hi!"])));
        gateway
            .expect_chat_stream()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(ApplicationError::Connection("reset".into())));
        gateway
            .expect_chat_stream()
            .withf(|_, history, _| history.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(reply(&["Welcome back."])));

        let service = ChatService::new(Arc::new(gateway));
        let id = service.create_session();
        collect(service.send(id, "Hello").unwrap()).await;

        let chunks = collect(service.send(id, "Are you there?").unwrap()).await;
        assert_eq!(chunks, vec![ChatChunk::finished(CHAT_CONNECTION_ERROR_MESSAGE)]);

        collect(service.send(id, "Hello again").unwrap()).await;
        assert_eq!(service.history(id).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mid_stream_error_keeps_partial_output_then_apologises() {
        let mut gateway = MockAiGatewayPort::new();
        gateway.expect_chat_stream().returning(|_, _, _| {
            let items = vec![
                Ok("Partial".to_string()),
                Err(ApplicationError::Generation("blocked".into())),
            ];
            Ok(Box::pin(stream::iter(items)) as TextStream)
        });

        let service = ChatService::new(Arc::new(gateway));
        let id = service.create_session();
        let chunks = collect(service.send(id, "Hi").unwrap()).await;

        assert_eq!(chunks, vec![
            ChatChunk::delta("Partial"),
            ChatChunk::finished(CHAT_ERROR_MESSAGE),
        ]);
        assert!(service.history(id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_receiver_still_commits_reply() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_chat_stream()
            .returning(|_, _, _| Ok(reply(&["a", "b", "c", "d"])));

        let service = ChatService::new(Arc::new(gateway)).with_channel_capacity(1);
        let id = service.create_session();
        drop(service.send(id, "Hi").unwrap());

        for _ in 0..100 {
            if service.history(id).is_some_and(|h| h.len() == 2) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let history = service.history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "abcd");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let service = ChatService::new(Arc::new(MockAiGatewayPort::new()));
        let err = service.send(ChatSessionId::new(), "Hi").unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn close_session_removes_it() {
        let service = ChatService::new(Arc::new(MockAiGatewayPort::new()));
        let id = service.create_session();
        assert_eq!(service.session_count(), 1);
        assert!(service.close_session(id));
        assert!(!service.close_session(id));
        assert!(service.history(id).is_none());
    }
}
