mod cli;

use crate::cli::Arguments;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use stopwatch::{Console, Stopwatch};
use tracing_log::LogTracer;

fn main() -> ExitCode {
    let arguments = Arguments::parse();
    if let Err(e) = set_log_level(&arguments) {
        eprintln!("Failed to configure logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::debug!(?arguments, "starting stopwatch");

    match run(arguments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(%e, "Unable to run the stopwatch");
            ExitCode::FAILURE
        }
    }
}

fn set_log_level(arguments: &Arguments) -> anyhow::Result<()> {
    LogTracer::init()?;

    let level = match arguments.verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn run(arguments: Arguments) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let redraw = !arguments.plain && stdout.is_terminal();

    let mut console = Console::new(io::stdin().lock(), stdout.lock(), Stopwatch::new())
        .with_redraw(redraw);
    console.run()?;

    tracing::debug!(elapsed = ?console.stopwatch().elapsed(), "Exiting");

    Ok(())
}
