//! Conversation transcripts and the conversation-keyed store.
//!
//! Each conversation is an independent transcript seeded with the fixed
//! system prompt and addressed by a caller-supplied UUID. Concurrent callers
//! with different ids never observe each other's turns.

use std::collections::HashMap;

use shared_types::ChatMessage;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Instructions pinned to the top of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a chatbot assistant whose job is to ask the user questions and help classify their e-waste into the 10 EPA categories:\n\
Large household appliances, including cooling and freezing appliances\n\
Small household appliances\n\
IT equipment, including monitors\n\
Consumer electronics, including televisions\n\
Lamps and luminaires\n\
Toys\n\
Tools\n\
Medical devices\n\
Monitoring and control instruments\n\
Automatic dispensers\n\
\n\
Do not discuss about anything besides your objective. Help the user identify the category, quantity, and description of the waste.";

/// One user's transcript, oldest turn first.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// A fresh transcript holding only the system prompt.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::system(SYSTEM_PROMPT)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Serialize the transcript into the single prompt the model receives:
    /// one `role: content` line per turn, terminated by an `assistant:` cue.
    pub fn render_prompt(&self) -> String {
        let mut prompt = self
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str("\nassistant:");
        prompt
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Conversation-keyed transcript store.
///
/// The lock is held only while mutating or rendering a transcript, never
/// across an outbound model call.
pub struct ConversationStore {
    inner: Mutex<HashMap<Uuid, Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Append a user turn to the conversation (creating it if absent) and
    /// return the rendered prompt for the model call.
    pub async fn append_user(&self, id: Uuid, content: &str) -> String {
        let mut conversations = self.inner.lock().await;
        let conversation = conversations.entry(id).or_default();
        conversation.push_user(content);
        conversation.render_prompt()
    }

    /// Append the model's reply to the conversation.
    pub async fn append_assistant(&self, id: Uuid, content: &str) {
        let mut conversations = self.inner.lock().await;
        conversations.entry(id).or_default().push_assistant(content);
    }

    /// Snapshot a conversation's transcript, if it exists.
    pub async fn messages(&self, id: Uuid) -> Option<Vec<ChatMessage>> {
        let conversations = self.inner.lock().await;
        conversations.get(&id).map(|c| c.messages().to_vec())
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
