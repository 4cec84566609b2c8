//! One chat session: score, tag, log and reply to each user turn, then
//! summarise when the conversation ends.
//!
//! [`ChatServices`] holds the shared, read-only pieces (scorer, tagger,
//! analyzer, reply settings) and hands out independent [`ChatSession`]s.
//! Sessions share nothing mutable, so concurrent conversations need no
//! coordination beyond whatever owns the sessions.

use crate::analysis::{ConversationAnalyzer, ConversationSummary};
use crate::config::SentiscopeConfig;
use crate::conversation::Conversation;
use crate::emotion::{EmotionReading, EmotionTagger, KeywordEmotionTagger};
use crate::error::{Result, SentiscopeError};
use crate::reply::{Responder, is_exit_command};
use crate::sentiment::{SentimentEngine, SentimentScore};
use crate::text;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared components used to build sessions.
#[derive(Clone)]
pub struct ChatServices {
    engine: Arc<SentimentEngine>,
    tagger: Option<Arc<dyn EmotionTagger>>,
    analyzer: ConversationAnalyzer,
    bot_name: String,
    context_window: usize,
    seed: Option<u64>,
}

impl std::fmt::Debug for ChatServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatServices")
            .field("engine", &self.engine)
            .field("emotion", &self.tagger.is_some())
            .field("analyzer", &self.analyzer)
            .field("bot_name", &self.bot_name)
            .finish_non_exhaustive()
    }
}

impl ChatServices {
    /// Assemble services from explicit parts. Emotion tagging is off until
    /// [`with_tagger`](Self::with_tagger) is called.
    pub fn new(engine: SentimentEngine, analyzer: ConversationAnalyzer) -> Self {
        Self {
            engine: Arc::new(engine),
            tagger: None,
            analyzer,
            bot_name: "Assistant".to_owned(),
            context_window: 10,
            seed: None,
        }
    }

    /// Build everything the config describes.
    ///
    /// # Errors
    ///
    /// Returns a config error for invalid thresholds.
    pub fn from_config(config: &SentiscopeConfig) -> Result<Self> {
        config.validate()?;
        let engine = SentimentEngine::from_config(&config.sentiment)?;
        let analyzer = ConversationAnalyzer::new(config.analysis_config()?)?;
        let mut services = Self::new(engine, analyzer);
        services.bot_name = config.chatbot.name.clone();
        services.context_window = config.chatbot.context_window;
        if config.emotion.enabled {
            services = services.with_tagger(KeywordEmotionTagger);
        }
        Ok(services)
    }

    #[must_use]
    pub fn with_tagger(mut self, tagger: impl EmotionTagger + 'static) -> Self {
        self.tagger = Some(Arc::new(tagger));
        self
    }

    /// Make every session's template choices reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn analyzer(&self) -> &ConversationAnalyzer {
        &self.analyzer
    }

    /// Start a session, optionally with a caller-chosen conversation id.
    pub fn start(&self, conversation_id: Option<String>) -> ChatSession {
        let responder = match self.seed {
            Some(seed) => Responder::seeded(&self.bot_name, self.context_window, seed),
            None => Responder::new(&self.bot_name, self.context_window),
        };
        let conversation = match conversation_id {
            Some(id) => Conversation::with_id(id),
            None => Conversation::new(),
        };
        ChatSession {
            engine: Arc::clone(&self.engine),
            tagger: self.tagger.clone(),
            analyzer: self.analyzer,
            responder,
            conversation,
        }
    }
}

/// Outcome of one user turn.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    /// The input after sanitising.
    pub input: String,
    pub reply: String,
    /// None for exit commands, which are not scored or logged.
    pub sentiment: Option<SentimentScore>,
    pub emotion: Option<EmotionReading>,
    /// The user asked to end the conversation.
    pub exit: bool,
}

/// A live conversation.
pub struct ChatSession {
    engine: Arc<SentimentEngine>,
    tagger: Option<Arc<dyn EmotionTagger>>,
    analyzer: ConversationAnalyzer,
    responder: Responder,
    conversation: Conversation,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("conversation", &self.conversation.id())
            .field("messages", &self.conversation.messages().len())
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_finished(&self) -> bool {
        self.conversation.is_ended()
    }

    /// Process one line of user input.
    ///
    /// Exit commands end the conversation and return a farewell without
    /// being logged. Anything else is scored, tagged, logged and answered.
    ///
    /// # Errors
    ///
    /// - [`SentiscopeError::InvalidInput`] for empty, blank or oversized text.
    /// - [`SentiscopeError::Session`] when the conversation already ended.
    pub fn handle(&mut self, input: &str) -> Result<Turn> {
        if self.conversation.is_ended() {
            return Err(SentiscopeError::Session(format!(
                "conversation {} has already ended",
                self.conversation.id()
            )));
        }
        let text = text::clean_input(input)?;

        if is_exit_command(&text) {
            let reply = self.responder.respond(&text, None);
            self.conversation.end();
            return Ok(Turn {
                input: text,
                reply,
                sentiment: None,
                emotion: None,
                exit: true,
            });
        }

        let sentiment = self.engine.analyze_text(&text);
        let emotion = self
            .tagger
            .as_ref()
            .map(|tagger| tagger.tag(&text, Some(sentiment.score)));
        debug!(
            score = sentiment.score,
            label = %sentiment.label,
            emotion = ?emotion.as_ref().map(|e| e.primary),
            "user message scored"
        );

        self.conversation
            .push_user_reading(text.clone(), sentiment.clone(), emotion.as_ref());
        let reply = self.responder.respond(&text, Some(&sentiment));
        self.conversation.push_bot(reply.clone());

        Ok(Turn {
            input: text,
            reply,
            sentiment: Some(sentiment),
            emotion,
            exit: false,
        })
    }

    /// End the conversation (if still open) and summarise it.
    ///
    /// Returns `Ok(None)` when no user message was scored.
    ///
    /// # Errors
    ///
    /// Propagates analysis errors.
    pub fn finish(&mut self) -> Result<Option<ConversationSummary>> {
        self.conversation.end();
        self.summary()
    }

    /// Summarise the messages logged so far without ending the conversation.
    ///
    /// # Errors
    ///
    /// Propagates analysis errors other than an empty log.
    pub fn summary(&self) -> Result<Option<ConversationSummary>> {
        let observations = self.conversation.observations()?;
        if observations.is_empty() {
            info!(id = %self.conversation.id(), "no scored messages to analyze");
            return Ok(None);
        }
        self.analyzer.analyze(&observations).map(Some)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::analysis::Trend;
    use crate::emotion::Emotion;
    use crate::sentiment::{SentimentLabel, SentimentThresholds};

    fn services() -> ChatServices {
        ChatServices::from_config(&SentiscopeConfig::default())
            .unwrap()
            .with_seed(3)
    }

    #[test]
    fn turn_is_scored_logged_and_answered() {
        let mut session = services().start(Some("s1".to_owned()));
        let turn = session.handle("  I love this, it is wonderful  ").unwrap();
        assert!(!turn.exit);
        assert_eq!(turn.sentiment.unwrap().label, SentimentLabel::Positive);
        assert_eq!(turn.emotion.unwrap().primary, Emotion::Joy);
        assert!(!turn.reply.is_empty());

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "I love this, it is wonderful");
        assert!(messages[0].emotion_confidence.is_some_and(|c| c > 0.0));
        let summary = session.summary().unwrap().unwrap();
        assert!(summary.emotions.average_confidence.contains_key(&Emotion::Joy));
    }

    #[test]
    fn exit_command_ends_without_logging() {
        let mut session = services().start(None);
        session.handle("this is terrible").unwrap();
        let turn = session.handle("bye").unwrap();
        assert!(turn.exit);
        assert!(turn.sentiment.is_none());
        assert!(session.is_finished());
        assert_eq!(session.conversation().user_message_count(), 1);
        assert!(matches!(
            session.handle("hello?"),
            Err(SentiscopeError::Session(_))
        ));
    }

    #[test]
    fn blank_input_is_rejected_and_not_logged() {
        let mut session = services().start(None);
        assert!(matches!(
            session.handle("   "),
            Err(SentiscopeError::InvalidInput(_))
        ));
        assert!(session.conversation().messages().is_empty());
    }

    #[test]
    fn finish_without_messages_has_no_summary() {
        let mut session = services().start(None);
        assert!(session.finish().unwrap().is_none());
        assert!(session.is_finished());
    }

    #[test]
    fn finish_summarises_scripted_scores() {
        let scores = [0.44, -0.73, 0.52];
        let engine = SentimentEngine::new(
            move |text: &str| {
                let i: usize = text.trim_start_matches('m').parse().unwrap();
                SentimentScore::from_score(scores[i], &SentimentThresholds::COMPOUND)
            },
            SentimentThresholds::COMPOUND,
        );
        let services = ChatServices::new(engine, ConversationAnalyzer::default()).with_seed(1);
        let mut session = services.start(None);
        for i in 0..3 {
            session.handle(&format!("m{i}")).unwrap();
        }
        let summary = session.finish().unwrap().unwrap();
        assert_eq!(summary.message_count, 3);
        assert_eq!(summary.trend.trend, Trend::Declining);
        assert_eq!(summary.emotions.dominant, Emotion::Neutral);
    }

    #[test]
    fn emotion_disabled_leaves_tags_empty() {
        let mut config = SentiscopeConfig::default();
        config.emotion.enabled = false;
        let mut session = ChatServices::from_config(&config).unwrap().start(None);
        let turn = session.handle("I am so happy").unwrap();
        assert!(turn.emotion.is_none());
        assert_eq!(session.conversation().messages()[0].emotion, None);
    }

    #[test]
    fn seeded_sessions_reply_identically() {
        let services = services();
        let mut a = services.start(None);
        let mut b = services.start(None);
        for text in ["the parcel arrived", "it was late", "whatever"] {
            assert_eq!(a.handle(text).unwrap().reply, b.handle(text).unwrap().reply);
        }
    }
}
