// file: src/transcript/conversation.rs
// description: append-only conversation transcript with time-derived message ids
// reference: internal data structures

use crate::models::{ChatMessage, Role};
use crate::pipeline::messages::GREETING;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered messages. There is no API to edit or delete one once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// A fresh transcript opened by the assistant greeting.
    pub fn new() -> Self {
        let mut transcript = Self::empty();
        transcript.push_assistant(GREETING);
        transcript
    }

    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.append(Role::User, text.into(), Utc::now())
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.append(Role::Assistant, text.into(), Utc::now())
    }

    fn append(&mut self, role: Role, text: String, now: DateTime<Utc>) -> &ChatMessage {
        let id = self.next_id(now);
        self.messages.push(ChatMessage::new(id.to_string(), role, text, now));
        &self.messages[self.messages.len() - 1]
    }

    /// Creation time in milliseconds, bumped past the previous id if needed.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        match self.last().and_then(|m| m.id.parse::<i64>().ok()) {
            Some(previous) if previous >= millis => previous + 1,
            _ => millis,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
