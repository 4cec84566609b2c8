//! Append-only conversation log and its JSON file format.

use crate::analysis::SentimentObservation;
use crate::emotion::{Emotion, EmotionReading};
use crate::error::Result;
use crate::sentiment::SentimentScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(rename = "sender")]
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    /// Present on scored user messages.
    #[serde(default)]
    pub sentiment: Option<SentimentScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_confidence: Option<f64>,
}

/// Ordered message log for a single chat.
///
/// Messages are only ever appended; nothing edits a logged message.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    messages: Vec<Message>,
}

/// On-disk layout of a saved conversation.
#[derive(Debug, Serialize, Deserialize)]
struct ConversationFile {
    conversation_id: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    duration_seconds: f64,
    #[serde(default)]
    message_count: usize,
    #[serde(default)]
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// New log with a timestamped id (`chat_YYYYmmdd_HHMMSS`).
    pub fn new() -> Self {
        let now = Utc::now();
        Self::with_id(format!("chat_{}", now.format("%Y%m%d_%H%M%S")))
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let conversation = Self {
            id: id.into(),
            started_at: Utc::now(),
            ended_at: None,
            messages: Vec::new(),
        };
        info!(id = %conversation.id, "conversation started");
        conversation
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Append a scored user message.
    pub fn push_user(
        &mut self,
        text: impl Into<String>,
        sentiment: SentimentScore,
        emotion: Option<Emotion>,
    ) -> &Message {
        self.push(Message {
            text: text.into(),
            role: Role::User,
            timestamp: Utc::now(),
            sentiment: Some(sentiment),
            emotion,
            emotion_confidence: None,
        })
    }

    /// Append a scored user message with the tagger's full reading.
    pub fn push_user_reading(
        &mut self,
        text: impl Into<String>,
        sentiment: SentimentScore,
        reading: Option<&EmotionReading>,
    ) -> &Message {
        self.push(Message {
            text: text.into(),
            role: Role::User,
            timestamp: Utc::now(),
            sentiment: Some(sentiment),
            emotion: reading.map(|r| r.primary),
            emotion_confidence: reading.map(|r| r.confidence),
        })
    }

    /// Append a bot reply.
    pub fn push_bot(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message {
            text: text.into(),
            role: Role::Bot,
            timestamp: Utc::now(),
            sentiment: None,
            emotion: None,
            emotion_confidence: None,
        })
    }

    /// Append an already-built message (used when replaying stored logs).
    pub fn push(&mut self, message: Message) -> &Message {
        debug!(
            role = %message.role,
            text = %crate::text::preview(&message.text, 50),
            "message logged"
        );
        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }

    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::User)
    }

    pub fn user_message_count(&self) -> usize {
        self.user_messages().count()
    }

    /// The last `n` messages, oldest first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Scored user messages as analysis input, indexed in user-message order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SentiscopeError::InvalidScore`] if a stored score is
    /// out of range.
    pub fn observations(&self) -> Result<Vec<SentimentObservation>> {
        self.user_messages()
            .filter_map(|m| m.sentiment.as_ref().map(|s| (m, s)))
            .enumerate()
            .map(|(index, (message, sentiment))| -> Result<SentimentObservation> {
                let observation = SentimentObservation::new(
                    index,
                    sentiment.score,
                    sentiment.label,
                    message.emotion.unwrap_or(Emotion::Neutral),
                    message.timestamp,
                )?;
                Ok(match message.emotion_confidence {
                    Some(confidence) => observation.with_emotion_confidence(confidence),
                    None => observation,
                })
            })
            .collect()
    }

    /// Mark the conversation finished. Later calls keep the first end time.
    pub fn end(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(Utc::now());
            info!(
                id = %self.id,
                messages = self.messages.len(),
                "conversation ended"
            );
        }
    }

    /// Seconds from start to end (or to now while still open).
    pub fn duration_secs(&self) -> f64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        ((end - self.started_at).num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    /// Default file name for this conversation with the given extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.id)
    }

    /// Write the log as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_json(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ConversationFile {
            conversation_id: self.id.clone(),
            start_time: self.started_at,
            end_time: self.ended_at,
            duration_seconds: self.duration_secs(),
            message_count: self.messages.len(),
            messages: self.messages.clone(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        info!(path = %path.display(), "conversation saved");
        Ok(path.to_path_buf())
    }

    /// Read a log written by [`save_json`](Self::save_json).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a saved conversation.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: ConversationFile = serde_json::from_str(&content)?;
        info!(path = %path.display(), "conversation loaded");
        Ok(Self {
            id: file.conversation_id,
            started_at: file.start_time,
            ended_at: file.end_time,
            messages: file.messages,
        })
    }
}
