//! Chat demo state

use crate::html::safe_html;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub content: String,
    pub time: DateTime<Utc>,
    /// Sent by the local user
    pub is_own: bool,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, content: impl Into<String>, is_own: bool) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            time: Utc::now(),
            is_own,
        }
    }

    /// Message content rendered as escaped HTML
    pub fn html(&self) -> String {
        safe_html(&self.content)
    }
}

pub struct ChatLog {
    messages: RwLock<Vec<ChatMessage>>,
    /// Name chosen by the user; `None` falls back to the localized default
    username: RwLock<Option<String>>,
    default_username: RwLock<String>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            username: RwLock::new(None),
            default_username: RwLock::new(DEFAULT_USERNAME.to_string()),
        }
    }

    pub fn add_message(&self, message: ChatMessage) {
        self.messages.write().push(message);
    }

    pub fn clear_messages(&self) {
        self.messages.write().clear();
    }

    pub fn set_username(&self, name: impl Into<String>) {
        *self.username.write() = Some(name.into());
    }

    /// Name shown until the user picks one
    pub fn set_default_username(&self, name: impl Into<String>) {
        *self.default_username.write() = name.into();
    }

    pub fn username(&self) -> String {
        match &*self.username.read() {
            Some(name) => name.clone(),
            None => self.default_username.read().clone(),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}
