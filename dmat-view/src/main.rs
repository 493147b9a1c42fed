//! Application entry point for the density-matrix viewer.
//!
//! Parses the command line, loads (or synthesizes) the element table and
//! hands playback to [`Viewer`] inside an eframe window.

mod cli;
mod viewer;

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dmat_core::{
    config::Config,
    player::Player,
    table::{DensityTable, MissingInputFile},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use cli::Args;
use viewer::Viewer;

const WINDOW_TITLE: &str = "Density Matrix";

/// Runs the viewer.
///
/// A missing input file is reported as a single line on stderr and exits
/// with status 1 before any window is created. Every other failure is
/// returned as an error chain.
fn main() -> Result<()> {
    let args = Args::parse();
    setup_stdout_logging()?;

    let config = args.into_config();
    let Some(table) = load_table(&config, &mut std::io::stderr())? else {
        std::process::exit(1);
    };

    let player = Player::new(table, config.mode)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 680.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(player)))),
    )
    .map_err(|err| anyhow!("Failed to run the display window: {err}"))
}

/// Loads the table selected by `config`.
///
/// ### Parameters
/// - `config` - Run configuration from the command line.
/// - `err_out` - Where the missing-file message is written (stderr in `main`).
///
/// ### Returns
/// `Ok(None)` after writing `Could not find input file <path>` to `err_out`
/// when the input file does not exist. Any other load failure is an error.
fn load_table(config: &Config, err_out: &mut impl Write) -> Result<Option<DensityTable>> {
    match DensityTable::from_config(config) {
        Ok(table) => Ok(Some(table)),
        Err(err) => match err.downcast_ref::<MissingInputFile>() {
            Some(missing) => {
                writeln!(err_out, "{missing}").context("Failed to report missing input file")?;
                Ok(None)
            }
            None => Err(err),
        },
    }
}

/// Installs a stdout fmt layer filtered by `RUST_LOG` (default `info`).
fn setup_stdout_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_ansi(true),
    );

    tracing::subscriber::set_global_default(subscriber)
        .with_context(|| "Failed to set up stdout logging")?;

    Ok(())
}
