#![cfg(not(target_arch = "wasm32"))]

use crate::create_app;
use crate::store::{AppError, Store};
use saccade::config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Entry point used by the native executable. Fails before opening a
/// window when the configured dataset cannot be loaded.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let config = config::load_or_default(&config::config_path());
    let table = saccade::load(&config.data_source)?;
    let label = config.data_source.to_string();
    let store = Store::new(Arc::new(table), config, label)?;

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Saccade Explorer",
        native_options,
        Box::new(move |cc| Ok(Box::new(create_app(cc, store)))),
    )?;
    Ok(())
}
