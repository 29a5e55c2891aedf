mod shell;

use std::fmt;
use std::path::PathBuf;

use brain_core::model::{GameKind, GameSettings, GameSettingsDraft, Language};
use tracing_subscriber::EnvFilter;

use crate::shell::{Output, Shell};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    Invalid {
        flag: &'static str,
        source: brain_core::Error,
    },
    UnreadableSettings { path: PathBuf, reason: String },
}

impl ArgsError {
    fn invalid(flag: &'static str, source: impl Into<brain_core::Error>) -> Self {
        ArgsError::Invalid {
            flag,
            source: source.into(),
        }
    }
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::Invalid { flag, source } => write!(f, "invalid {flag} value: {source}"),
            ArgsError::UnreadableSettings { path, reason } => {
                write!(f, "cannot read settings file {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ArgsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgsError::Invalid { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play    [--lang <code>] [--seed <n>] [--settings <json>]");
    eprintln!("                              [--game <id>] [--json]");
    eprintln!("  cargo run -p app -- catalog");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BRAIN_LANG, BRAIN_SEED, BRAIN_SETTINGS, BRAIN_LOG (falls back to RUST_LOG)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Catalog,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "catalog" => Some(Self::Catalog),
            _ => None,
        }
    }
}

struct Args {
    language: Option<Language>,
    seed: Option<u64>,
    settings: GameSettings,
    game: Option<GameKind>,
    json: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut language = match std::env::var("BRAIN_LANG") {
            Ok(raw) => Some(parse_language(raw)?),
            Err(_) => None,
        };
        let mut seed = match std::env::var("BRAIN_SEED") {
            Ok(raw) => Some(parse_seed(raw)?),
            Err(_) => None,
        };
        let mut settings_path = std::env::var_os("BRAIN_SETTINGS").map(PathBuf::from);
        let mut game = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lang" => language = Some(parse_language(require_value(args, "--lang")?)?),
                "--seed" => seed = Some(parse_seed(require_value(args, "--seed")?)?),
                "--settings" => settings_path = Some(require_value(args, "--settings")?.into()),
                "--game" => {
                    let raw = require_value(args, "--game")?;
                    game = Some(
                        raw.parse::<GameKind>()
                            .map_err(|e| ArgsError::invalid("--game", e))?,
                    );
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let settings = match settings_path {
            Some(path) => load_settings(path)?,
            None => GameSettings::default(),
        };

        Ok(Self {
            language,
            seed,
            settings,
            game,
            json,
        })
    }
}

fn parse_language(raw: String) -> Result<Language, ArgsError> {
    raw.parse::<Language>()
        .map_err(|e| ArgsError::invalid("--lang", e))
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

/// Missing keys fall back to their defaults.
fn load_settings(path: PathBuf) -> Result<GameSettings, ArgsError> {
    let unreadable = |reason: String| ArgsError::UnreadableSettings {
        path: path.clone(),
        reason,
    };
    let text = std::fs::read_to_string(&path).map_err(|e| unreadable(e.to_string()))?;
    let draft: GameSettingsDraft =
        serde_json::from_str(&text).map_err(|e| unreadable(e.to_string()))?;
    draft
        .validate()
        .map_err(|e| ArgsError::invalid("--settings", e))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BRAIN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Stdout belongs to the game; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
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
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Catalog => {
            for info in GameKind::ALL.map(GameKind::info) {
                println!(
                    "{} {:<16} {:<15} {}",
                    info.icon,
                    info.name,
                    info.kind.id(),
                    info.description
                );
            }
            Ok(())
        }
        Command::Play => {
            tracing::info!(seed = ?parsed.seed, "starting shell");
            let output = if parsed.json { Output::Json } else { Output::Text };
            let mut shell = Shell::new(parsed.settings, parsed.seed, output);
            shell.run(parsed.language, parsed.game).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_are_parsed() {
        let args = parse(&["--lang", "fr", "--seed", "9", "--game", "memoryNumbers", "--json"])
            .unwrap();
        assert_eq!(args.language, Some(Language::Fr));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.game, Some(GameKind::MemoryNumbers));
        assert!(args.json);
    }

    #[test]
    fn bad_values_carry_the_core_error() {
        let err = parse(&["--game", "chess"]).err().unwrap();
        assert!(matches!(
            err,
            ArgsError::Invalid {
                flag: "--game",
                source: brain_core::Error::GameKind(_),
            }
        ));
        assert_eq!(err.to_string(), "invalid --game value: unknown challenge id: chess");

        let err = parse(&["--lang", "xx"]).err().unwrap();
        assert!(matches!(
            err,
            ArgsError::Invalid {
                source: brain_core::Error::Language(_),
                ..
            }
        ));
        assert!(matches!(parse(&["--seed"]), Err(ArgsError::MissingValue { flag: "--seed" })));
    }

    #[test]
    fn settings_that_fail_validation_are_rejected() {
        let path = std::env::temp_dir().join(format!("brain-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "grid_size": 1 }"#).unwrap();
        let err = load_settings(path.clone()).err().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            ArgsError::Invalid {
                flag: "--settings",
                source: brain_core::Error::Settings(_),
            }
        ));
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
