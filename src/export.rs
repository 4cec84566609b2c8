//! File exports for finished conversations: CSV log, text report, JSON summary.

use crate::analysis::ConversationSummary;
use crate::config::DataConfig;
use crate::conversation::Conversation;
use crate::error::Result;
use crate::report::{RenderedSummary, text_report};
use csv::Writer;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

const CSV_HEADER: [&str; 5] = [
    "timestamp",
    "sender",
    "text",
    "sentiment_label",
    "sentiment_score",
];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// One row per message; bot rows carry `N/A` and `0.0` for sentiment.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(conversation: &Conversation, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for message in conversation.messages() {
        let (label, score) = match &message.sentiment {
            Some(s) => (s.label.as_str(), s.score),
            None => ("N/A", 0.0),
        };
        writer.write_record([
            message.timestamp.to_rfc3339(),
            message.role.as_str().to_owned(),
            message.text.clone(),
            label.to_owned(),
            score.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = conversation.messages().len(), "conversation exported to CSV");
    Ok(())
}

/// Plain-text report (see [`crate::report::text_report`]).
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_text_report(
    conversation: &Conversation,
    summary: Option<&ConversationSummary>,
    path: &Path,
) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, text_report(conversation, summary))?;
    info!(path = %path.display(), "report exported");
    Ok(())
}

/// Summary facts plus rendered sentences as pretty JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_summary_json(summary: &ConversationSummary, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(&RenderedSummary::new(summary))?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "summary exported");
    Ok(())
}

/// Files written by [`save_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedFiles {
    pub json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

impl SavedFiles {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [&self.json, &self.csv, &self.report, &self.summary]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

/// Save a finished conversation as the data config asks.
///
/// Nothing is written when `save_conversations` is off. Reports and summaries
/// are only written when a summary is available.
///
/// # Errors
///
/// Returns the first I/O or encoding error.
pub fn save_all(
    conversation: &Conversation,
    summary: Option<&ConversationSummary>,
    data: &DataConfig,
) -> Result<SavedFiles> {
    let mut saved = SavedFiles::default();
    if !data.save_conversations {
        return Ok(saved);
    }
    let dir = data.conversations_dir();

    if data.export_format.includes_json() {
        let path = dir.join(conversation.file_name("json"));
        saved.json = Some(conversation.save_json(&path)?);
    }
    if data.export_format.includes_csv() {
        let path = dir.join(conversation.file_name("csv"));
        write_csv(conversation, &path)?;
        saved.csv = Some(path);
    }
    if data.export_reports {
        let path = dir.join(format!("report_{}.txt", conversation.id()));
        write_text_report(conversation, summary, &path)?;
        saved.report = Some(path);

        if let Some(summary) = summary {
            let path = dir.join(format!("summary_{}.json", conversation.id()));
            write_summary_json(summary, &path)?;
            saved.summary = Some(path);
        }
    }
    Ok(saved)
}
