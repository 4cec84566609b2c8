//! CLI binary for sentiscope.

use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use sentiscope::analysis::ConversationSummary;
use sentiscope::report::{self, RenderedSummary};
use sentiscope::sentiment::SentimentLabel;
use sentiscope::{
    ChatServices, Conversation, ConversationAnalyzer, Emotion, SentiscopeConfig, Trend, Turn,
    export, logging, text,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sentiscope: sentiment tracking for conversations.
#[derive(Parser)]
#[command(name = "sentiscope", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Chat in the terminal and get an analysis when you leave.
    Chat,

    /// Analyze a saved conversation file.
    Analyze {
        /// Conversation JSON written by a previous chat.
        path: PathBuf,

        /// Print the analysis as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(SentiscopeConfig::default_config_path);
    let command = cli.command.unwrap_or(Command::Chat);
    if let Command::InitConfig { force } = command {
        return init_config(&config_path, force);
    }

    let config = SentiscopeConfig::load_or_default(&config_path)?;
    config.validate()?;

    let _log_guard = logging::init(&config.logging)?;
    if !config.ui.use_colors {
        colored::control::set_override(false);
    }

    match command {
        Command::Chat => run_chat(&config),
        Command::Analyze { path, json } => run_analyze(&config, &path, json),
        Command::InitConfig { .. } => Ok(()),
    }
}

fn rule() -> String {
    "=".repeat(60)
}

fn banner(title: &str) {
    println!("{}", rule().cyan());
    println!("{}", title.cyan().bold());
    println!("{}", rule().cyan());
    println!();
}

fn label_color(label: SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Negative => Color::Red,
        SentimentLabel::Neutral => Color::Yellow,
    }
}

fn label_emoji(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "😊",
        SentimentLabel::Negative => "😞",
        SentimentLabel::Neutral => "😐",
    }
}

fn print_indicator(turn: &Turn, show_scores: bool) {
    let Some(sentiment) = &turn.sentiment else {
        return;
    };
    let mut line = format!(
        "💭 Sentiment: {} {}",
        sentiment.label,
        label_emoji(sentiment.label)
    );
    if show_scores {
        line.push_str(&format!(" {:+.2}", sentiment.score));
    }
    if let Some(reading) = &turn.emotion
        && reading.primary != Emotion::Neutral
    {
        line.push_str(&format!(" | Emotion: {} {}", reading.primary.emoji(), reading.primary));
    }
    println!("{}", line.color(label_color(sentiment.label)));
}

fn run_chat(config: &SentiscopeConfig) -> anyhow::Result<()> {
    let services = ChatServices::from_config(config)?;
    let mut session = services.start(None);
    info!(id = %session.conversation().id(), "chat started");

    banner("=== Sentiscope ===");
    println!(
        "{}",
        format!(
            "Bot: Hello! I'm {}. I'm here to chat with you.",
            services.bot_name()
        )
        .green()
    );
    println!(
        "{}",
        "     Type 'quit', 'exit', or 'bye' to end the conversation.".yellow()
    );
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", "You: ".blue().bold());
        io::stdout().flush()?;

        // EOF ends the conversation like an exit command.
        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let turn = match session.handle(&line) {
            Ok(turn) => turn,
            Err(e) => {
                println!("{}", format!("Error: {e}").red());
                continue;
            }
        };
        if turn.exit {
            println!("{}", format!("Bot: {}", turn.reply).green());
            break;
        }
        print_indicator(&turn, config.ui.show_scores);
        println!("{}", format!("Bot: {}", turn.reply).green());
        println!();
    }

    let summary = session.finish()?;
    let conversation = session.conversation();
    print_analysis(conversation, summary.as_ref());

    let saved = export::save_all(conversation, summary.as_ref(), &config.data)?;
    for path in saved.paths() {
        println!("{}", format!("💾 Saved: {}", path.display()).cyan());
    }
    Ok(())
}

fn print_analysis(conversation: &Conversation, summary: Option<&ConversationSummary>) {
    println!();
    banner("=== Conversation Analysis ===");

    let Some(summary) = summary else {
        println!("{}", "No messages to analyze.".yellow());
        return;
    };

    println!(
        "{}",
        format!("📊 Total Messages: {}", conversation.user_message_count()).cyan()
    );
    println!(
        "{}",
        format!(
            "⏱️  Duration: {}",
            text::format_duration(conversation.duration_secs())
        )
        .cyan()
    );
    println!();
    print_summary(summary);
}

fn print_summary(summary: &ConversationSummary) {
    if summary.trend.trend != Trend::InsufficientData {
        println!(
            "{}",
            format!(
                "📈 Sentiment Trend: {}",
                report::trend_description(&summary.trend)
            )
            .magenta()
        );
        for moment in &summary.trend.key_moments {
            println!("   {}", report::key_moment_line(moment));
        }
        println!();
    }

    let verdict = &summary.verdict;
    println!(
        "{}",
        format!(
            "⚖️  Overall Sentiment: {} ({:+.3})",
            verdict.label, verdict.average_score
        )
        .color(label_color(verdict.label))
        .bold()
    );
    println!("   {}", report::reasoning(verdict));
    println!();

    if summary.emotions.total() > 0 {
        println!("{}", "😊 Emotion Analysis:".magenta());
        println!(
            "   Dominant Emotion: {}",
            report::dominant_emotion(&summary.emotions)
        );
        let breakdown = report::emotion_breakdown(&summary.emotions);
        if !breakdown.is_empty() {
            println!("   Distribution: {breakdown}");
        }
        let confidence = report::emotion_confidence(&summary.emotions);
        if !confidence.is_empty() {
            println!("   Average Confidence: {confidence}");
        }
        println!();
    }

    if !summary.insights.is_empty() {
        println!("{}", "🔍 Key Insights:".cyan());
        for insight in &summary.insights {
            println!("   - {insight}");
        }
        println!();
    }
}

fn run_analyze(config: &SentiscopeConfig, path: &Path, json: bool) -> anyhow::Result<()> {
    let conversation = Conversation::load_json(path)?;
    let observations = conversation.observations()?;
    if observations.is_empty() {
        println!("{}", "No messages to analyze.".yellow());
        return Ok(());
    }

    let analyzer = ConversationAnalyzer::new(config.analysis_config()?)?;
    let summary = analyzer.analyze(&observations)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&RenderedSummary::new(&summary))?
        );
    } else {
        print_analysis(&conversation, Some(&summary));
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    SentiscopeConfig::default().save_to_file(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
