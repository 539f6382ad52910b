use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod args;
pub mod commands;
mod exit_status;
pub mod report;

pub use args::{AnalyzeCommand, Arguments, CacheArgs, CacheCommand, Command, CommonArgs};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Some(Command::Analyze(cmd)) => commands::analyze::analyze(cmd),
        Some(Command::Cache(cmd)) => commands::cache::cache(cmd),
        Some(Command::Init) => commands::init::init(),
        None => Ok(ExitStatus::Success),
    }
}

/// Install the stderr diagnostics subscriber.
///
/// `RUST_LOG` takes precedence; otherwise warnings are shown, or debug events
/// from this crate with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "bibbias=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .without_time()
        .try_init();
}
