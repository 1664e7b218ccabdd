//! Command execution

use crate::commands::{Cli, ColorArg, Commands, FormatArg, ListArgs, RunArgs};
use crate::error::{CliError, CliResult};
use crate::output::{render_catalogue, render_report};
use console::Term;
use std::sync::Arc;
use storeprobe::driver::Launcher;
use storeprobe::runner::{Runner, SuiteReport};
use storeprobe::scenarios::{self, Suite};
use storeprobe::ProbeConfig;
use tracing::{info, warn};

/// What the process should report back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing failed
    Green,
    /// At least one case failed
    Red,
}

fn apply_color(choice: ColorArg) -> bool {
    match choice {
        ColorArg::Always => console::set_colors_enabled(true),
        ColorArg::Never => console::set_colors_enabled(false),
        ColorArg::Auto => {}
    }
    console::colors_enabled()
}

fn load_config(cli: &Cli) -> CliResult<ProbeConfig> {
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(CliError::config(format!("{} does not exist", path.display())));
        }
    }
    Ok(ProbeConfig::load(cli.config.as_deref())?)
}

#[cfg(feature = "browser")]
fn launcher(config: &ProbeConfig, headed: bool) -> Option<Arc<dyn Launcher>> {
    let mut browser = config.browser.clone();
    if headed {
        browser.headless = false;
    }
    Some(Arc::new(storeprobe::driver::CdpLauncher::new(browser)))
}

#[cfg(not(feature = "browser"))]
fn launcher(_config: &ProbeConfig, headed: bool) -> Option<Arc<dyn Launcher>> {
    if headed {
        warn!("--headed has no effect without the `browser` feature");
    }
    None
}

/// Run the parsed command line
pub async fn execute(cli: Cli) -> CliResult<Verdict> {
    let use_color = apply_color(cli.color);
    let config = load_config(&cli)?;
    match &cli.command {
        Commands::List(args) => list(args, use_color),
        Commands::Run(args) => run(&config, args, use_color).await,
    }
}

fn list(args: &ListArgs, use_color: bool) -> CliResult<Verdict> {
    let cases = scenarios::select(args.suite.and_then(|s| s.suite()), None);
    Term::stdout().write_str(&render_catalogue(&cases, use_color))?;
    Ok(Verdict::Green)
}

async fn run(config: &ProbeConfig, args: &RunArgs, use_color: bool) -> CliResult<Verdict> {
    let cases = scenarios::select(args.suite.suite(), args.filter.as_deref());
    if cases.is_empty() {
        warn!(filter = args.filter.as_deref(), "no case matches");
    }

    let mut runner = Runner::new(config.clone());
    let wants_browser = cases.iter().any(|c| c.suite() == Suite::Ui);
    if wants_browser {
        match launcher(config, args.headed) {
            Some(l) => runner = runner.with_launcher(l),
            None => info!("UI cases will be skipped: built without the `browser` feature"),
        }
    }
    if args.fail_fast {
        runner = runner.with_fail_fast();
    }

    let report = runner.run(&cases).await;
    Term::stdout().write_str(&format_report(&report, args.format, use_color)?)?;

    Ok(if report.is_green() {
        Verdict::Green
    } else {
        Verdict::Red
    })
}

fn format_report(report: &SuiteReport, format: FormatArg, use_color: bool) -> CliResult<String> {
    Ok(match format {
        FormatArg::Text => render_report(report, use_color),
        FormatArg::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            json
        }
        FormatArg::Junit => report.render_junit(),
    })
}
