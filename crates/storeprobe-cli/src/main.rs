//! storeprobe: storefront and pet-store end-to-end checks
//!
//! ## Usage
//!
//! ```bash
//! storeprobe list                          # Show every case
//! storeprobe run --suite api               # REST checks only
//! storeprobe run --filter checkout --headed
//! storeprobe --config probe.yaml run --format json
//! ```

use clap::Parser;
use std::process::ExitCode;
use storeprobe_cli::{execute, logging, Cli, CliResult, Verdict};

fn main() -> ExitCode {
    match run() {
        Ok(Verdict::Green) => ExitCode::SUCCESS,
        Ok(Verdict::Red) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run() -> CliResult<Verdict> {
    let cli = Cli::parse();
    logging::init(cli.log_json)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(cli))
}
