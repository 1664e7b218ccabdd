//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use storeprobe::scenarios::Suite;

/// storeprobe: storefront UI and pet-store API end-to-end checks
#[derive(Parser, Debug)]
#[command(name = "storeprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML settings file; environment variables override it
    #[arg(short, long, global = true, env = "STOREPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the scenario catalogue
    List(ListArgs),

    /// Run scenarios against the configured targets
    Run(RunArgs),
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list cases in this suite
    #[arg(long)]
    pub suite: Option<SuiteArg>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Which suite to run
    #[arg(long, default_value = "all")]
    pub suite: SuiteArg,

    /// Only run cases whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Report format on stdout
    #[arg(long, default_value = "text")]
    pub format: FormatArg,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Stop at the first failed case
    #[arg(long)]
    pub fail_fast: bool,
}

/// Suite selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuiteArg {
    /// REST checks
    Api,
    /// Browser checks
    Ui,
    /// Both
    #[default]
    All,
}

impl SuiteArg {
    /// Library suite filter; `None` means every suite
    #[must_use]
    pub const fn suite(self) -> Option<Suite> {
        match self {
            Self::Api => Some(Suite::Api),
            Self::Ui => Some(Suite::Ui),
            Self::All => None,
        }
    }
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// One line per case plus a summary
    #[default]
    Text,
    /// Full report as JSON
    Json,
    /// JUnit XML
    Junit,
}

/// Color choice
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["storeprobe", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.suite, SuiteArg::All);
        assert_eq!(args.format, FormatArg::Text);
        assert!(args.filter.is_none());
        assert!(!args.headed);
    }

    #[test]
    fn test_run_with_everything() {
        let cli = Cli::try_parse_from([
            "storeprobe",
            "--config",
            "probe.yaml",
            "--log-json",
            "run",
            "--suite",
            "ui",
            "--filter",
            "checkout",
            "--format",
            "json",
            "--headed",
            "--fail-fast",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("probe.yaml")));
        assert!(cli.log_json);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.suite.suite(), Some(Suite::Ui));
        assert_eq!(args.filter.as_deref(), Some("checkout"));
        assert_eq!(args.format, FormatArg::Json);
        assert!(args.headed && args.fail_fast);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["storeprobe", "list", "--suite", "api", "--log-json"]).unwrap();
        assert!(cli.log_json);
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.suite, Some(SuiteArg::Api));
    }

    #[test]
    fn test_rejects_unknown_suite() {
        assert!(Cli::try_parse_from(["storeprobe", "run", "--suite", "web"]).is_err());
    }
}
