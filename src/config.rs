//! Configuration types for the chat loop, scoring and analysis.

use crate::analysis::AnalysisConfig;
use crate::error::{Result, SentiscopeError};
use crate::sentiment::SentimentThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentiscopeConfig {
    /// Per-message scoring.
    pub sentiment: SentimentConfig,
    /// Conversation-level aggregation thresholds.
    pub analysis: AnalysisSection,
    /// Emotion tagging.
    pub emotion: EmotionConfig,
    /// Reply generation.
    pub chatbot: ChatbotConfig,
    /// Terminal presentation.
    pub ui: UiConfig,
    /// Persistence and export.
    pub data: DataConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// HTTP API bind address.
    pub server: ServerConfig,
}

/// Which built-in scoring backend to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerBackend {
    /// Valence lexicon with a normalised compound score.
    #[default]
    Lexicon,
    /// Mean word polarity.
    Polarity,
}

/// Sentiment scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub backend: ScorerBackend,
    /// Overrides the backend's positive cutoff.
    pub positive_threshold: Option<f64>,
    /// Overrides the backend's negative cutoff.
    pub negative_threshold: Option<f64>,
    /// Rewrite scores of "better than this" style comparisons.
    pub comparative_adjustment: bool,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            backend: ScorerBackend::Lexicon,
            positive_threshold: None,
            negative_threshold: None,
            comparative_adjustment: true,
        }
    }
}

impl SentimentConfig {
    /// Resolve the effective thresholds: backend defaults with any overrides
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns a config error when the resulting pair is invalid.
    pub fn thresholds(&self) -> Result<SentimentThresholds> {
        let base = match self.backend {
            ScorerBackend::Lexicon => SentimentThresholds::COMPOUND,
            ScorerBackend::Polarity => SentimentThresholds::POLARITY,
        };
        SentimentThresholds::new(
            self.positive_threshold.unwrap_or(base.positive()),
            self.negative_threshold.unwrap_or(base.negative()),
        )
    }
}

/// Aggregation thresholds as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Minimum half-average difference that counts as a trend.
    pub trend_threshold: f64,
    /// Minimum consecutive score change that counts as a significant shift.
    pub shift_threshold: f64,
    /// Absolute score at or above which a message is an extreme moment.
    pub extreme_threshold: f64,
    /// Volatility above which the mood is called unstable.
    pub high_volatility: f64,
    /// Volatility below which the tone is called consistent.
    pub low_volatility: f64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            trend_threshold: defaults.trend_threshold,
            shift_threshold: defaults.shift_threshold,
            extreme_threshold: defaults.extreme_threshold,
            high_volatility: defaults.high_volatility,
            low_volatility: defaults.low_volatility,
        }
    }
}

/// Emotion tagging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    pub enabled: bool,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Reply generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotConfig {
    /// Name shown in front of bot replies.
    pub name: String,
    pub personality: String,
    /// Number of recent messages kept as reply context.
    pub context_window: usize,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            name: "Assistant".to_owned(),
            personality: "helpful".to_owned(),
            context_window: 10,
        }
    }
}

/// Terminal presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub use_colors: bool,
    /// Print the score next to each user message.
    pub show_scores: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_scores: true,
        }
    }
}

/// Format used when saving finished conversations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Both,
}

impl ExportFormat {
    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn includes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }
}

/// Persistence and export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub save_conversations: bool,
    pub export_format: ExportFormat,
    /// Write a plain-text analysis report next to each saved conversation.
    pub export_reports: bool,
    /// Output directory (None = platform data dir).
    pub data_dir: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            save_conversations: true,
            export_format: ExportFormat::Json,
            export_reports: true,
            data_dir: None,
        }
    }
}

impl DataConfig {
    /// Directory finished conversations are written to.
    pub fn conversations_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join("conversations"),
            None => crate::app_dirs::conversations_dir(),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
    /// Optional log file; stderr only when None.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            file: None,
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// HTTP API bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SentiscopeConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SentiscopeError::Config(e.to_string()))
    }

    /// Load from `path` when it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SentiscopeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Check every section that can be invalid.
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.analysis_config()?;
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(SentiscopeError::Config(format!(
                "unknown log level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        if self.chatbot.context_window == 0 {
            return Err(SentiscopeError::Config(
                "chatbot.context_window must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Build the validated aggregation configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error when the sentiment thresholds or any analysis
    /// threshold is invalid.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let config = AnalysisConfig {
            thresholds: self.sentiment.thresholds()?,
            trend_threshold: self.analysis.trend_threshold,
            shift_threshold: self.analysis.shift_threshold,
            extreme_threshold: self.analysis.extreme_threshold,
            high_volatility: self.analysis.high_volatility,
            low_volatility: self.analysis.low_volatility,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SentiscopeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sentiment.backend, ScorerBackend::Lexicon);
        assert!(config.sentiment.comparative_adjustment);
        assert_eq!(config.chatbot.context_window, 10);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SentiscopeConfig::default();
        config.sentiment.backend = ScorerBackend::Polarity;
        config.analysis.shift_threshold = 0.5;
        config.data.export_format = ExportFormat::Both;
        config.chatbot.name = "Echo".to_owned();
        config.save_to_file(&path).unwrap();

        let loaded = SentiscopeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.sentiment.backend, ScorerBackend::Polarity);
        assert!((loaded.analysis.shift_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(loaded.data.export_format, ExportFormat::Both);
        assert_eq!(loaded.chatbot.name, "Echo");
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = SentiscopeConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let config =
            SentiscopeConfig::load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();
        match SentiscopeConfig::from_file(&path) {
            Err(SentiscopeError::Config(_)) => {}
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: SentiscopeConfig = toml::from_str(
            r#"
[sentiment]
backend = "polarity"

[server]
port = 8080
"#,
        )
        .unwrap();
        assert_eq!(config.sentiment.backend, ScorerBackend::Polarity);
        assert!(config.sentiment.comparative_adjustment);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!((config.analysis.trend_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn backend_selects_default_thresholds() {
        let mut config = SentimentConfig::default();
        assert_eq!(config.thresholds().unwrap(), SentimentThresholds::COMPOUND);
        config.backend = ScorerBackend::Polarity;
        assert_eq!(config.thresholds().unwrap(), SentimentThresholds::POLARITY);
    }

    #[test]
    fn threshold_override_applies_to_one_side() {
        let config = SentimentConfig {
            positive_threshold: Some(0.3),
            ..SentimentConfig::default()
        };
        let t = config.thresholds().unwrap();
        assert!((t.positive() - 0.3).abs() < f64::EPSILON);
        assert!((t.negative() + 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn inverted_thresholds_fail_validation() {
        let mut config = SentiscopeConfig::default();
        config.sentiment.positive_threshold = Some(-0.2);
        config.sentiment.negative_threshold = Some(0.2);
        assert!(matches!(config.validate(), Err(SentiscopeError::Config(_))));
        assert!(config.analysis_config().is_err());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SentiscopeConfig::default();
        config.logging.level = "chatty".to_owned();
        assert!(config.validate().is_err());
        config.logging.level = "DEBUG".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_shift_threshold_fails_validation() {
        let mut config = SentiscopeConfig::default();
        config.analysis.shift_threshold = -0.1;
        assert!(config.analysis_config().is_err());
    }

    #[test]
    fn export_format_flags() {
        assert!(ExportFormat::Json.includes_json());
        assert!(!ExportFormat::Json.includes_csv());
        assert!(ExportFormat::Both.includes_json() && ExportFormat::Both.includes_csv());
    }

    #[test]
    fn conversations_dir_honours_data_dir() {
        let data = DataConfig {
            data_dir: Some(PathBuf::from("/srv/sentiscope")),
            ..DataConfig::default()
        };
        assert_eq!(
            data.conversations_dir(),
            PathBuf::from("/srv/sentiscope/conversations")
        );
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&SentiscopeConfig::default()).unwrap();
        assert!(toml_str.contains("[sentiment]"));
        assert!(toml_str.contains("trend_threshold"));
        assert!(toml_str.contains("backend = \"lexicon\""));
    }
}
