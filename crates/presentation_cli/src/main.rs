//! Pearl Notes CLI
//!
//! Browse the syllabus, generate notes and quizzes, listen to narration and
//! chat with the tutor from a terminal.

#![allow(clippy::print_stdout)]

mod audio;
mod chat;
mod render;

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, bail};
use application::{
    ChatService, NarrationService, NoteComposer, NotesRequest, PlaybackController, QuizService,
};
use clap::{Parser, Subcommand};
use domain::{ClassLevel, DetailLevel, SpeechClip, Subject, catalog};
use infrastructure::{AppConfig, build_cache, build_gateway, init_cli_telemetry};
use tracing::{info, warn};

use crate::audio::RodioOutput;

/// Pearl Notes CLI
#[derive(Parser)]
#[command(name = "pearl-notes-cli")]
#[command(author, version, about = "Pearl Notes study companion for the NCDC curriculum", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "PEARL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all subjects
    Subjects,

    /// List the topics of a subject for one class level
    ///
    /// Example: pearl-notes-cli topics biology S2
    Topics {
        /// Subject id or name
        subject: String,
        /// Class level (S1-S4)
        class: ClassLevel,
    },

    /// Search topics and subjects by name
    Search {
        query: String,
    },

    /// Generate (or load saved) notes for a topic
    ///
    /// Example: pearl-notes-cli notes S2 biology "Nutrition in Plants (Photosynthesis)" --detail detailed
    Notes {
        class: ClassLevel,
        subject: String,
        topic: String,

        /// concise or detailed
        #[arg(short, long, default_value = "concise")]
        detail: DetailLevel,

        /// Write the note HTML to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a five-question quiz for a topic
    Quiz {
        class: ClassLevel,
        subject: String,
        topic: String,
    },

    /// Read text aloud
    ///
    /// Example: pearl-notes-cli speak --file notes.html --output notes.wav --no-play
    Speak {
        /// Text to read; HTML is reduced to plain text
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save the narration as a WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not play through the speakers
        #[arg(long)]
        no_play: bool,
    },

    /// Manage saved notes
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Chat with the tutor
    Chat,
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved notes, newest first
    List,
    /// Delete one saved note by key
    Delete { key: String },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn find_subject(id_or_name: &str) -> anyhow::Result<&'static Subject> {
    catalog::resolve_subject(id_or_name).with_context(|| format!("Unknown subject: {id_or_name}"))
}

/// Syllabus spelling of `topic` when it names a catalog topic
fn topic_name(subject: &Subject, class: ClassLevel, topic: String) -> String {
    catalog::canonical_topic_name(subject.id, class, &topic).map_or(topic, str::to_string)
}

/// Services that need the gateway and the note cache
struct Services {
    notes: NoteComposer,
    quizzes: QuizService,
    narration: NarrationService,
    chat: ChatService,
}

impl Services {
    fn build(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = AppConfig::load_from(config_path).context("Failed to load configuration")?;
        if !config.gemini.has_api_key() {
            warn!("No Gemini API key configured");
        }

        let gateway = build_gateway(&config.gemini).context("Failed to initialize AI gateway")?;
        let cache = build_cache(&config.cache).context("Failed to open note cache")?;

        Ok(Self {
            notes: NoteComposer::new(Arc::clone(&gateway), cache).with_ttl(config.cache.note_ttl()),
            quizzes: QuizService::new(Arc::clone(&gateway)),
            narration: NarrationService::new(Arc::clone(&gateway)),
            chat: ChatService::new(gateway),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_telemetry(log_filter_from_verbosity(cli.verbose))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Subjects => render::subjects(&mut out, catalog::subjects())?,

        Commands::Topics { subject, class } => {
            let subject = find_subject(&subject)?;
            let topics = catalog::topics_for(subject.id, class);
            render::topics(&mut out, subject, class, &topics)?;
        },

        Commands::Search { query } => {
            render::search_results(&mut out, &query, &catalog::search(&query))?;
        },

        Commands::Notes {
            class,
            subject,
            topic,
            detail,
            output,
        } => {
            let subject = find_subject(&subject)?;
            let services = Services::build(cli.config.as_deref())?;
            let request = NotesRequest::new(topic_name(subject, class, topic), subject.name, class, detail);
            let note = services.notes.compose(&request).await;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &note.html_content)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Saved notes to {}", path.display())?;
                },
                None => render::note(&mut out, &note)?,
            }
        },

        Commands::Quiz {
            class,
            subject,
            topic,
        } => {
            let subject = find_subject(&subject)?;
            let topic = topic_name(subject, class, topic);
            let services = Services::build(cli.config.as_deref())?;
            let questions = services.quizzes.quiz_for(&topic, subject.name, class).await;
            render::quiz(&mut out, &topic, &questions)?;
        },

        Commands::Speak {
            text,
            file,
            output,
            no_play,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Nothing to read"),
            };

            let services = Services::build(cli.config.as_deref())?;
            let Some(clip) = services.narration.narrate(&text).await else {
                bail!("Speech is unavailable right now");
            };

            if let Some(path) = &output {
                tokio::fs::write(path, &clip.data)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(out, "Saved narration to {}", path.display())?;
            }
            if !no_play {
                play_to_end(&clip).await?;
            }
        },

        Commands::Saved { action } => {
            let services = Services::build(cli.config.as_deref())?;
            match action {
                SavedAction::List => {
                    render::saved_notes(&mut out, &services.notes.saved_notes().await?)?;
                },
                SavedAction::Delete { key } => {
                    services.notes.delete_saved(&key).await?;
                    writeln!(out, "Deleted {key}")?;
                },
            }
        },

        Commands::Chat => {
            let services = Services::build(cli.config.as_deref())?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            chat::run(&services.chat, input, &mut out).await?;
        },
    }

    Ok(())
}

/// Play a clip on the speakers, stopping early on Ctrl+C
async fn play_to_end(clip: &SpeechClip) -> anyhow::Result<()> {
    let (_stream, output) = RodioOutput::open()?;
    let player = PlaybackController::new(output);
    player.play(clip)?;
    info!(duration = ?clip.duration, "Playing narration");

    let finished = async {
        while player.is_playing() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    };
    tokio::select! {
        () = finished => {},
        _ = tokio::signal::ctrl_c() => player.stop(),
    }
    Ok(())
}
