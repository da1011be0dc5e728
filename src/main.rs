//! PngSweep binary: sets up logging and opens the converter window.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use pngsweep_gui::{native_options, PngSweepApp, PngSweepState};

const APP_ID: &str = "PngSweep";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "{APP_ID} starting");

    // Roots and default paths are resolved up front so the first frame has them.
    let state = PngSweepState::build();
    let options = native_options(pngsweep_gui::icon::generate_icon(64));

    eframe::run_native(
        APP_ID,
        options,
        Box::new(move |cc| Ok(Box::new(PngSweepApp::with_state(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("window event loop failed")?;

    tracing::info!("{APP_ID} closed");
    Ok(())
}
