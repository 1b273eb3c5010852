use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::{QuizSettings, QuizSettingsDraft};
use services::{AppServices, Clock, ContactService, QuizLoopService};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    InvalidPool { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPool { raw } => write!(f, "invalid --pool value: {raw}"),
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

fn parse_number(flag: &'static str, raw: &str) -> Result<u32, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidNumber {
        flag,
        raw: raw.to_string(),
    })
}

fn env_number(key: &str, flag: &'static str) -> Result<Option<u32>, ArgsError> {
    std::env::var(key)
        .ok()
        .map(|value| parse_number(flag, &value))
        .transpose()
}

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
    contact: Arc<ContactService>,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn contact(&self) -> Arc<ContactService> {
        Arc::clone(&self.contact)
    }
}

struct Args {
    db_url: String,
    pool: String,
    draft: QuizSettingsDraft,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --pool <url|path>        Question pool JSON (default: questions.json)");
    eprintln!("  --db <sqlite_url>        Settings database (default: sqlite://quiz.sqlite3)");
    eprintln!("  --take <n>               Questions per exam (default: 30)");
    eprintln!("  --pass-threshold <n>     Correct answers needed to pass (default: 24)");
    eprintln!("  --pool-version <tag>     Cache-busting tag for HTTP pools");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_POOL, QUIZ_DB_URL, QUIZ_TAKE, QUIZ_PASS_THRESHOLD, QUIZ_POOL_VERSION");
    eprintln!("  RUST_LOG controls log output (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            _ => None,
        }
    }
}

impl Args {
    fn parse_ui(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut pool = std::env::var("QUIZ_POOL").unwrap_or_else(|_| "questions.json".into());
        let mut draft = QuizSettingsDraft {
            take_count: env_number("QUIZ_TAKE", "--take")?,
            pass_threshold: env_number("QUIZ_PASS_THRESHOLD", "--pass-threshold")?,
            pool_version: std::env::var("QUIZ_POOL_VERSION").ok(),
            ..QuizSettingsDraft::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--pool" => {
                    let value = require_value(args, "--pool")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPool { raw: value });
                    }
                    pool = value;
                }
                "--take" => {
                    let value = require_value(args, "--take")?;
                    draft.take_count = Some(parse_number("--take", &value)?);
                }
                "--pass-threshold" => {
                    let value = require_value(args, "--pass-threshold")?;
                    draft.pass_threshold = Some(parse_number("--pass-threshold", &value)?);
                }
                "--pool-version" => {
                    draft.pool_version = Some(require_value(args, "--pool-version")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            pool,
            draft,
        })
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = match cmd {
        Command::Ui => Args::parse_ui(&mut iter),
    }
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings: QuizSettings = parsed.draft.validate()?;

    // Open + migrate SQLite at startup so the services stay storage-agnostic.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        &parsed.pool,
        Clock::default_clock(),
        settings,
    )
    .await?;

    info!(
        pool = %parsed.pool,
        db = %parsed.db_url,
        take = services.quiz_loop().settings().take_count(),
        "launching quiz"
    );

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                quiz_loop: services.quiz_loop(),
                contact: services.contact(),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Driving Theory Exam")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
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
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
