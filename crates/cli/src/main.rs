use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kotoba_core::{AppConfig, ContentKind, Level, LevelFilter, SortKey};
use kotoba_service::StudyApp;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "kotoba")]
#[command(about = "Japanese study lists, quizzes and pronunciation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of a content list.
    List {
        /// vocabulary, grammar, conversation, question or reading
        kind: ContentKind,
        #[arg(short, long, default_value = "")]
        search: String,
        /// N5..N1 or "all"
        #[arg(short, long, default_value = "all")]
        level: LevelFilter,
        /// original, title, level or id
        #[arg(long, default_value = "original")]
        sort: SortKey,
        #[arg(long)]
        desc: bool,
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Bypass the list cache.
        #[arg(long)]
        refresh: bool,
    },
    /// Generate a multiple-choice question about a word.
    Quiz {
        word: String,
        #[arg(short, long, default_value = "N5")]
        level: Level,
    },
    /// Generate a short reading passage.
    Read {
        #[arg(short, long, default_value = "N5")]
        level: Level,
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Talk to the conversation partner.
    Chat {
        message: String,
        #[arg(short, long, default_value = "N5")]
        level: Level,
    },
    /// Synthesize pronunciation audio (cached) into a file.
    Say {
        text: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Remove expired and outdated entries from the audio cache.
    SweepAudio,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = StudyApp::from_config(AppConfig::from_env())?;

    match cli.command {
        Commands::List { kind, search, level, sort, desc, page, refresh } => {
            let args = commands::list::ListArgs { kind, search, level, sort, desc, page, refresh };
            commands::list::run_list(&app, args).await?;
        },
        Commands::Quiz { word, level } => commands::study::run_quiz(&app, &word, level).await?,
        Commands::Read { level, topic } => {
            commands::study::run_read(&app, level, topic.as_deref()).await?;
        },
        Commands::Chat { message, level } => {
            commands::study::run_chat(&app, &message, level).await?;
        },
        Commands::Say { text, out } => {
            let sweep = app.spawn_audio_sweep();
            let said = commands::audio::run_say(&app, &text, &out).await;
            if let Some(sweep) = sweep {
                sweep.finish().await;
            }
            said?;
        },
        Commands::SweepAudio => commands::audio::run_sweep(&app).await?,
    }

    Ok(())
}
