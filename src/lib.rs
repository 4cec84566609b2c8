//! Sentiscope: sentiment tracking for conversations.
//!
//! Each user message is scored for sentiment and tagged with an emotion as
//! the conversation goes. When it ends, the analysis engine summarises the
//! whole sequence.
//!
//! # Architecture
//!
//! - **Scoring**: pluggable [`sentiment::SentimentScorer`] backends with
//!   comparative-phrase adjustment
//! - **Emotion**: keyword tagging via [`emotion::EmotionTagger`]
//! - **Analysis**: verdict, trend, key moments, emotion distribution and
//!   insights over a sequence of observations ([`analysis`])
//! - **Sessions**: the chat loop shared by the CLI and the HTTP server
//! - **Export**: JSON, CSV, text report and summary files

pub mod analysis;
pub mod app_dirs;
pub mod config;
pub mod conversation;
pub mod emotion;
pub mod error;
pub mod export;
pub mod logging;
pub mod reply;
pub mod report;
pub mod sentiment;
pub mod server;
pub mod session;
pub mod text;

pub use analysis::{
    AnalysisConfig, ConversationAnalyzer, ConversationSummary, SentimentObservation, Trend,
};
pub use config::SentiscopeConfig;
pub use conversation::{Conversation, Message, Role};
pub use emotion::{Emotion, EmotionTagger};
pub use error::{Result, SentiscopeError};
pub use sentiment::{SentimentEngine, SentimentLabel, SentimentScore, SentimentScorer};
pub use session::{ChatServices, ChatSession, Turn};
