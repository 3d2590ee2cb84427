//! Desktop and browser front end for the saccade dashboard.

pub mod actions;
pub mod app;
pub mod effects;
pub mod plot_view;
pub mod state;
pub mod store;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use app::ExplorerApp;
use store::Store;

pub fn create_app(
    _cc: &eframe::CreationContext<'_>,
    store: Store,
) -> ExplorerApp {
    ExplorerApp::new(store)
}
