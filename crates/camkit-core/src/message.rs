//! Leveled user messages
//!
//! The editor never talks to a status bar or console directly. It emits
//! `(level, text)` pairs to a [`Notifier`], fire-and-forget.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Message severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    /// Informational message
    Info,
    /// An operation finished successfully
    Success,
    /// Recoverable problem, usually bad user input
    Warning,
    /// Operation failed
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Success => write!(f, "OK"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERR"),
        }
    }
}

/// A single emitted message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message level
    pub level: MessageLevel,
    /// Message text
    pub text: String,
    /// When the message was emitted
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create new message stamped with the current time
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Get formatted message
    pub fn formatted(&self) -> String {
        format!("[{}] {}", self.level, self.text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

/// Receiver of leveled status messages.
pub trait Notifier {
    fn emit(&self, level: MessageLevel, text: &str);

    fn info(&self, text: &str) {
        self.emit(MessageLevel::Info, text);
    }

    fn success(&self, text: &str) {
        self.emit(MessageLevel::Success, text);
    }

    fn warning(&self, text: &str) {
        self.emit(MessageLevel::Warning, text);
    }

    fn error(&self, text: &str) {
        self.emit(MessageLevel::Error, text);
    }
}

/// In-memory notifier that keeps every message and mirrors it to tracing.
///
/// Cloning shares the underlying buffer, so a host can keep one handle and
/// hand another to a session.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages emitted so far
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    /// Text of the most recent message, if any
    pub fn last_text(&self) -> Option<String> {
        self.messages.lock().last().map(|m| m.text.clone())
    }

    /// Remove and return all buffered messages
    pub fn drain(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Notifier for MessageLog {
    fn emit(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Info | MessageLevel::Success => tracing::info!(%level, "{}", text),
            MessageLevel::Warning => tracing::warn!("{}", text),
            MessageLevel::Error => tracing::error!("{}", text),
        }
        self.messages.lock().push(Message::new(level, text));
    }
}
