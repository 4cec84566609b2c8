//! Templated replies that acknowledge the user's sentiment.

use crate::sentiment::{SentimentLabel, SentimentScore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use tracing::debug;

const EXIT_COMMANDS: &[&str] = &["quit", "exit", "bye", "goodbye", "end", "stop"];

const FAREWELLS: &[&str] = &[
    "Thank you for chatting! Have a great day!",
    "It was nice talking with you. Goodbye!",
    "Thanks for the conversation. Take care!",
    "Goodbye! Feel free to come back anytime.",
];

const VERY_NEGATIVE: &[&str] = &[
    "I'm really sorry to hear that. I understand this is frustrating. Can you tell me more about what went wrong?",
    "I sense you're quite upset about this. I want to help resolve this. What can I do?",
    "I apologize for the negative experience. Let's work together to fix this. What happened?",
    "I'm sorry this has been disappointing. Your feedback is important to us. Can you share more details?",
];

const NEGATIVE: &[&str] = &[
    "I understand your concern. Let me help address this issue.",
    "I'm sorry to hear that. Can you provide more details so I can assist you better?",
    "I appreciate you sharing this. Let's work on finding a solution together.",
    "Thank you for your feedback. I'll make sure this is addressed properly.",
];

const VERY_POSITIVE: &[&str] = &[
    "I'm so glad to hear that! It makes me happy to know you're satisfied.",
    "That's wonderful! I'm thrilled that you're having a positive experience.",
    "Great to hear! I'm delighted that things are working well for you.",
    "That's fantastic! Thank you for the positive feedback.",
];

const POSITIVE: &[&str] = &[
    "I'm glad to hear that! Is there anything else I can help with?",
    "That's good to know! How else can I assist you today?",
    "Great! I'm happy to help. What would you like to know more about?",
    "Wonderful! Feel free to ask if you need anything else.",
];

const QUESTION: &[&str] = &[
    "That's an interesting question. Let me help you with that.",
    "I'd be happy to help answer that. Can you provide a bit more context?",
    "Good question! Let me think about how best to assist you.",
    "I understand you're asking about that. Here's what I can tell you...",
];

const GENERIC: &[&str] = &[
    "I understand. Can you tell me more about that?",
    "That's interesting. How can I help you with this?",
    "I see. What would you like to know more about?",
    "Got it. Is there something specific you'd like me to help with?",
    "I'm here to help. What can I do for you?",
    "Thanks for sharing. How can I assist you further?",
];

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings"];
const THANKS_WORDS: &[&str] = &["thank", "thanks", "appreciate"];

const GREETING_REPLY: &str = "Hello! I'm here to help. How can I assist you today?";
const THANKS_REPLY: &str = "You're welcome! I'm here if you need anything else.";

/// Scores beyond ±0.5 get the stronger templates.
const STRONG_SCORE: f64 = 0.5;

/// True for `quit`, `exit`, `bye`, `goodbye`, `end` and `stop` (any case,
/// surrounding whitespace ignored).
pub fn is_exit_command(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

/// Picks reply templates and keeps a short window of recent user input.
#[derive(Debug)]
pub struct Responder {
    name: String,
    rng: StdRng,
    context: VecDeque<String>,
    context_window: usize,
}

impl Responder {
    /// Responder seeded from OS entropy.
    pub fn new(name: impl Into<String>, context_window: usize) -> Self {
        Self::with_rng(name, context_window, StdRng::from_entropy())
    }

    /// Responder whose template choices repeat for a given seed.
    pub fn seeded(name: impl Into<String>, context_window: usize, seed: u64) -> Self {
        Self::with_rng(name, context_window, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, context_window: usize, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            rng,
            context: VecDeque::with_capacity(context_window),
            context_window: context_window.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recent user messages, oldest first.
    pub fn context(&self) -> impl Iterator<Item = &str> {
        self.context.iter().map(String::as_str)
    }

    pub fn reset_context(&mut self) {
        self.context.clear();
        debug!("reply context reset");
    }

    /// Reply to `text`, using its sentiment when available.
    pub fn respond(&mut self, text: &str, sentiment: Option<&SentimentScore>) -> String {
        self.context.push_back(text.to_owned());
        while self.context.len() > self.context_window {
            self.context.pop_front();
        }

        if is_exit_command(text) {
            return self.pick(FAREWELLS);
        }

        let templates = match sentiment {
            Some(s) if s.label == SentimentLabel::Negative && s.score < -STRONG_SCORE => {
                VERY_NEGATIVE
            }
            Some(s) if s.label == SentimentLabel::Negative => NEGATIVE,
            Some(s) if s.label == SentimentLabel::Positive && s.score > STRONG_SCORE => {
                VERY_POSITIVE
            }
            Some(s) if s.label == SentimentLabel::Positive => POSITIVE,
            _ => return self.default_reply(text),
        };
        self.pick(templates)
    }

    /// Reply for neutral or unscored input.
    fn default_reply(&mut self, text: &str) -> String {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if words.iter().any(|w| GREETING_WORDS.contains(w)) {
            return GREETING_REPLY.to_owned();
        }
        if text.contains('?') {
            return self.pick(QUESTION);
        }
        if THANKS_WORDS.iter().any(|w| lower.contains(w)) {
            return THANKS_REPLY.to_owned();
        }
        self.pick(GENERIC)
    }

    fn pick(&mut self, templates: &[&str]) -> String {
        templates
            .choose(&mut self.rng)
            .map(|s| (*s).to_owned())
            .unwrap_or_default()
    }
}
