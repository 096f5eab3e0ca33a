//! `contagion` binary: runs the fixture scenarios and reports the results.
//!
//! With no arguments the report is printed and the program waits for Enter.
//! With `-e [PATH]` the report is written as JSON instead.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use contagion_harness::{HarnessConfig, TestSuite, run_all};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contagion")]
#[command(about = "Run all registry scenarios and show or export the results", long_about = None)]
struct Cli {
    /// Run all tests and save results on file (default test_result.json)
    #[arg(short, long, value_name = "FILE_PATH", num_args = 0..=1)]
    #[allow(clippy::option_option)]
    export: Option<Option<PathBuf>>,
}

/// Entry point for the harness.
///
/// # Errors
///
/// Returns an error if the configuration is malformed or the report cannot
/// be written.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = HarnessConfig::from_env().context("loading configuration")?;

    let mut suite = TestSuite::new(config.print_progress);
    let all_passed = run_all(&mut suite);
    tracing::info!(all_passed, "run complete");

    match cli.export {
        Some(path) => {
            let path = path.unwrap_or_else(|| config.export_path.clone());
            suite
                .export_to(&path)
                .with_context(|| format!("writing report to {}", path.display()))?;
        }
        None => {
            print!("{suite}");
            if config.wait_for_key {
                println!("Press enter to end...");
                let mut line = String::new();
                std::io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .context("waiting for Enter")?;
            }
        }
    }

    Ok(())
}
