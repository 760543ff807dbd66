//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Calltone - earnings-call tone dashboard client
///
/// Fetch pre-computed sentiment and strategic-focus analysis of quarterly
/// earnings-call transcripts from the analysis backend and render it as a
/// dashboard report.
///
/// Examples:
///   calltone --ticker NVDA --quarters 4
///   calltone --ticker AMD --format json --output amd.json
///   calltone --ticker NVDA --collect
///   calltone --clear-cache
///   calltone --health
///   calltone --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Stock ticker to analyze
    #[arg(short, long, default_value = "NVDA", env = "CALLTONE_TICKER")]
    pub ticker: String,

    /// Number of recent quarters to analyze (1-4)
    #[arg(short, long, default_value = "4", value_name = "COUNT")]
    pub quarters: usize,

    /// Backend API base URL
    #[arg(
        long,
        default_value = "http://localhost:5000",
        env = "CALLTONE_BACKEND_URL",
        value_name = "URL"
    )]
    pub backend_url: String,

    /// Output file path for the report
    ///
    /// Defaults to calltone_dashboard.md (or the config file setting).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Bypass the backend cache and force fresh collection/analysis
    #[arg(long)]
    pub no_cache: bool,

    /// Request timeout in seconds
    ///
    /// A full analysis of uncached quarters can take a while on the
    /// backend. Default: from config or 120s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Trigger transcript collection on the backend without analyzing
    #[arg(long)]
    pub collect: bool,

    /// Fetch and print the raw transcript payload instead of analyzing
    #[arg(long)]
    pub transcripts: bool,

    /// Clear the backend cache and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Check backend liveness and exit
    #[arg(long)]
    pub health: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .calltone.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(long)]
    pub quiet: bool,

    /// Generate a default .calltone.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format (the derived dashboard view)
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.ticker.trim().is_empty() {
            return Err("Ticker must not be empty".to_string());
        }

        if !self
            .ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(format!("Invalid ticker symbol: {}", self.ticker));
        }

        if !(1..=4).contains(&self.quarters) {
            return Err("Quarters must be between 1 and 4".to_string());
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err("Backend URL must start with 'http://' or 'https://'".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let operations = [self.collect, self.transcripts, self.clear_cache, self.health];
        if operations.iter().filter(|&&flag| flag).count() > 1 {
            return Err(
                "Only one of --collect, --transcripts, --clear-cache, --health may be used"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Ticker normalized to the uppercase form the backend expects.
    pub fn normalized_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            ticker: "NVDA".to_string(),
            quarters: 4,
            backend_url: "http://localhost:5000".to_string(),
            output: None,
            format: OutputFormat::Markdown,
            no_cache: false,
            timeout: None,
            collect: false,
            transcripts: false,
            clear_cache: false,
            health: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_quarters() {
        let mut args = make_args();
        args.quarters = 0;
        assert!(args.validate().is_err());

        args.quarters = 5;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_ticker() {
        let mut args = make_args();
        args.ticker = "".to_string();
        assert!(args.validate().is_err());

        args.ticker = "NV DA".to_string();
        assert!(args.validate().is_err());

        args.ticker = "BRK.B".to_string();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_backend_url() {
        let mut args = make_args();
        args.backend_url = "localhost:5000".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_verbosity() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_single_operation_flag() {
        let mut args = make_args();
        args.collect = true;
        assert!(args.validate().is_ok());

        args.health = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_normalized_ticker() {
        let mut args = make_args();
        args.ticker = " nvda ".to_string();
        assert_eq!(args.normalized_ticker(), "NVDA");
    }
}
