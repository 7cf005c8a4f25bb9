//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "llmledger")]
#[command(
    about = "Cost, tool-usage and model-capability accounting for hosted LLM playgrounds",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Filter from date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Filter until date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Show per-model breakdown
    #[arg(short, long, global = true)]
    pub(crate) breakdown: bool,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging (overridden by LLMLEDGER_LOG)
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Compact output (fewer columns, K/M/B token counts)
    #[arg(short = 'c', long, global = true)]
    pub(crate) compact: bool,

    /// Timezone for calendar dates (e.g., "UTC", "local", "America/New_York")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "en", "zh", "de")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Model store database path
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.compact && config.compact {
            self.compact = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.breakdown && config.breakdown {
            self.breakdown = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = color.into();
        }

        // String options: only apply if CLI didn't set them
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        if self.db.is_none() {
            self.db = config.db.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigColorMode;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["llmledger"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn config_fills_unset_options() {
        let config = Config {
            compact: true,
            breakdown: true,
            color: Some(ConfigColorMode::Never),
            timezone: Some("Asia/Tokyo".to_string()),
            db: Some(PathBuf::from("/tmp/models.db")),
            ..Config::default()
        };
        let cli = parse(&["summary", "usage.jsonl"]).with_config(&config);
        assert!(cli.compact);
        assert!(cli.breakdown);
        assert_eq!(cli.color, ColorMode::Never);
        assert_eq!(cli.timezone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/models.db")));
        assert!(!cli.use_color());
    }

    #[test]
    fn cli_flags_win_over_config() {
        let config = Config {
            color: Some(ConfigColorMode::Never),
            timezone: Some("Asia/Tokyo".to_string()),
            ..Config::default()
        };
        let cli = parse(&["daily", "usage.jsonl", "--color", "always", "--timezone", "UTC"])
            .with_config(&config);
        assert_eq!(cli.color, ColorMode::Always);
        assert_eq!(cli.timezone.as_deref(), Some("UTC"));
        assert!(cli.use_color());
    }

    #[test]
    fn no_color_beats_always() {
        let cli = parse(&["tools", "--color", "always", "--no-color"]);
        assert!(!cli.use_color());
    }
}
