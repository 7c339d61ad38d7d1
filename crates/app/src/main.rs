use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{Clock, DeckLoader, DeckSource, ProgressTracker, source_for};
use storage::repository::{KeyValueStore, Storage};
use tracing::info;
use ui::{App, UiApp, build_app_context};

mod logging;

const DEFAULT_DECK: &str = "cards/N2-grammar.json";
const DEFAULT_DB_URL: &str = "sqlite:benki.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDeck { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDeck { raw } => write!(f, "invalid --deck value: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    deck_source: Arc<dyn DeckSource>,
    progress_store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl UiApp for DesktopApp {
    fn deck_source(&self) -> Arc<dyn DeckSource> {
        Arc::clone(&self.deck_source)
    }

    fn progress_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.progress_store)
    }

    fn clock(&self) -> Clock {
        self.clock
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [ui]  [--deck <path-or-url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- stats [--deck <path-or-url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset [--deck <path-or-url>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --deck {DEFAULT_DECK}");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BENKI_DECK, BENKI_DB_URL, {}", logging::LOG_ENV);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Stats,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "stats" => Some(Self::Stats),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    command: Command,
    deck: String,
    db_url: String,
}

impl Args {
    /// Flags win over the environment, which wins over defaults.
    fn parse(
        argv: Vec<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut args = argv.into_iter().peekable();

        // Default behavior: launching UI when no subcommand is provided.
        let command = match args.peek() {
            Some(first) if !first.starts_with('-') => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.clone()))?;
                args.next();
                command
            }
            _ => Command::Ui,
        };

        let mut deck = env("BENKI_DECK").unwrap_or_else(|| DEFAULT_DECK.to_string());
        let mut db_url = env("BENKI_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--deck" => {
                    let value = require_value(&mut args, "--deck")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDeck { raw: value });
                    }
                    deck = value;
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            command,
            deck,
            db_url: normalize_sqlite_url(db_url),
        }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match Args::parse(argv, |key| std::env::var(key).ok()) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let clock = Clock::default_clock();
    let deck_source = source_for(&parsed.deck);
    info!(deck = %parsed.deck, db = %parsed.db_url, command = ?parsed.command, "starting");

    match parsed.command {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                deck_source,
                progress_store: Arc::clone(&storage.kv),
                clock,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Benki")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Stats => {
            let deck = DeckLoader::fetch(deck_source.as_ref()).await?;
            let tracker =
                ProgressTracker::open(Arc::clone(&storage.kv), deck.info().name(), clock).await;
            let stats = tracker.stats();
            println!("deck:      {} ({} cards)", deck.info().name(), deck.cards().len());
            println!("key:       {}", tracker.key());
            println!(
                "seen:      {}/{} ({:.1}%)",
                stats.seen, stats.total, stats.percent_seen
            );
            println!(
                "correct:   {} ({:.1}% of seen)",
                stats.correct, stats.percent_correct
            );
            println!("incorrect: {}", stats.incorrect);
            println!("sessions:  {}", tracker.record().study_sessions());
            if let Some(at) = tracker.record().last_studied() {
                println!("last:      {}", at.to_rfc3339());
            }
            Ok(())
        }
        Command::Reset => {
            let deck = DeckLoader::fetch(deck_source.as_ref()).await?;
            let mut tracker =
                ProgressTracker::open(Arc::clone(&storage.kv), deck.info().name(), clock).await;
            tracker.reset().await;
            println!("progress reset for {}", deck.info().name());
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
