//! Command-line handling for the `dine` binary.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use dine_core::{ConfigError, DineConfig};
use std::ffi::OsString;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Simulate the dining philosophers
#[derive(Parser, Debug, Clone)]
#[command(name = "dine")]
#[command(version, about = "Simulate N philosophers sharing N forks without deadlock", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    /// Number of philosophers (and forks)
    pub philosophers: usize,

    /// Meals each philosopher must eat
    pub hunger: u32,

    /// Seed for reproducible meal durations (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Shortest meal in milliseconds
    #[arg(long, default_value = "1")]
    pub min_eat_ms: u64,

    /// Longest meal in milliseconds
    #[arg(long, default_value = "100")]
    pub max_eat_ms: u64,

    /// Give up on a second fork after this many milliseconds and retry
    #[arg(long)]
    pub acquire_timeout_ms: Option<u64>,

    /// Do not draw the table, only print a summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose logging (to stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Why the command line was rejected.
#[derive(Debug, Error)]
pub enum CliError {
    /// `--help` or `--version` was requested
    #[error("{0}")]
    Info(String),

    /// Wrong number of arguments or unknown flag
    #[error("{reason}\n{usage}")]
    Usage { reason: &'static str, usage: String },

    /// An argument is not a valid number
    #[error("Error: {0}")]
    Parse(String),

    /// Arguments parsed but describe an impossible table
    #[error("Error: {0}")]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Info(_) => 0,
            _ => 1,
        }
    }
}

impl Args {
    /// Parses and classifies a command line.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Args::try_parse_from(args).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CliError::Info(e.to_string()),
            ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
                CliError::Parse(e.to_string().trim_start_matches("error: ").trim_end().to_string())
            }
            kind => CliError::Usage {
                reason: match kind {
                    ErrorKind::MissingRequiredArgument => "Missing arguments",
                    ErrorKind::UnknownArgument => "Too many or unknown arguments",
                    _ => "Invalid arguments",
                },
                usage: Args::command().render_usage().to_string(),
            },
        })
    }

    /// Builds and validates the table configuration.
    pub fn config(&self) -> Result<DineConfig, CliError> {
        let mut config = DineConfig::new(self.philosophers, self.hunger).with_eat_range(
            Duration::from_millis(self.min_eat_ms),
            Duration::from_millis(self.max_eat_ms),
        );
        if let Some(ms) = self.acquire_timeout_ms {
            config = config.with_acquire_timeout(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }
}

/// Installs the global fmt subscriber on stderr.
///
/// `RUST_LOG` wins over `default_level`; `verbose` raises the default to DEBUG.
pub fn init_tracing(default_level: Level, verbose: bool) {
    let level = if verbose { Level::DEBUG } else { default_level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    // A subscriber may already be installed (tests); keep the first one.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_arguments() {
        let args = Args::parse_from_args(["dine", "5", "3"]).unwrap();
        assert_eq!(args.philosophers, 5);
        assert_eq!(args.hunger, 3);
        assert!(args.seed.is_none());

        let config = args.config().unwrap();
        assert_eq!(config.philosophers, 5);
        assert_eq!(config.starting_hunger, 3);
        assert_eq!(config.max_eat, Duration::from_millis(100));
        assert!(config.acquire_timeout.is_none());
    }

    #[test]
    fn test_one_argument_is_usage_error() {
        let err = Args::parse_from_args(["dine", "5"]).unwrap_err();
        assert!(matches!(err, CliError::Usage { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("Missing arguments"));
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_no_arguments_is_usage_error() {
        let err = Args::parse_from_args(["dine"]).unwrap_err();
        assert!(matches!(err, CliError::Usage { .. }));
    }

    #[test]
    fn test_too_many_arguments_is_usage_error() {
        let err = Args::parse_from_args(["dine", "5", "3", "9"]).unwrap_err();
        assert!(matches!(err, CliError::Usage { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("Too many or unknown arguments"));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = Args::parse_from_args(["dine", "5", "3", "--feast"]).unwrap_err();
        assert!(err.to_string().starts_with("Too many or unknown arguments"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_negative_number_is_parse_error() {
        let err = Args::parse_from_args(["dine", "5", "-3"]).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
        assert!(err.to_string().contains("-3"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_oversized_table_is_rejected_without_crash() {
        let args = Args::parse_from_args(["dine", "18446744073709551615", "1", "-q"]).unwrap();
        let err = args.config().unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::TooManyPhilosophers(usize::MAX))
        ));
        assert_eq!(err.exit_code(), 1);

        let args = Args::parse_from_args(["dine", "100000000", "1"]).unwrap();
        assert!(matches!(
            args.config().unwrap_err(),
            CliError::Config(ConfigError::TooManyPhilosophers(100_000_000))
        ));
    }

    #[test]
    fn test_non_integer_is_parse_error() {
        let err = Args::parse_from_args(["dine", "abc", "5"]).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_zero_hunger_is_rejected_without_crash() {
        let args = Args::parse_from_args(["dine", "5", "0"]).unwrap();
        let err = args.config().unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::ZeroHunger)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_single_philosopher_is_rejected() {
        let args = Args::parse_from_args(["dine", "1", "3"]).unwrap();
        assert!(matches!(
            args.config().unwrap_err(),
            CliError::Config(ConfigError::TooFewPhilosophers(1))
        ));
    }

    #[test]
    fn test_help_exits_zero() {
        let err = Args::parse_from_args(["dine", "--help"]).unwrap_err();
        assert!(matches!(err, CliError::Info(_)));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_optional_flags() {
        let args = Args::parse_from_args([
            "dine",
            "7",
            "2",
            "--seed",
            "99",
            "--max-eat-ms",
            "10",
            "--acquire-timeout-ms",
            "3",
            "--quiet",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(99));
        assert!(args.quiet);

        let config = args.config().unwrap();
        assert_eq!(config.max_eat, Duration::from_millis(10));
        assert_eq!(config.acquire_timeout, Some(Duration::from_millis(3)));
    }

    #[test]
    fn test_inverted_eat_range_is_rejected() {
        let args =
            Args::parse_from_args(["dine", "3", "1", "--min-eat-ms", "50", "--max-eat-ms", "5"])
                .unwrap();
        assert!(matches!(
            args.config().unwrap_err(),
            CliError::Config(ConfigError::InvalidEatRange { .. })
        ));
    }
}
