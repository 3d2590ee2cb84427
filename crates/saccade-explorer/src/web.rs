#![cfg(target_arch = "wasm32")]

use crate::create_app;
use crate::store::Store;
use eframe::{WebRunner, egui};
use saccade::{DashboardConfig, Table};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// A CSV file picked in the browser, not yet parsed.
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Files read by the async picker, handed to the next frame.
pub struct Uploads {
    sender: Sender<Upload>,
    receiver: Receiver<Upload>,
}

impl Default for Uploads {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }
}

impl Uploads {
    pub fn sender(&self) -> Sender<Upload> {
        self.sender.clone()
    }

    pub fn try_recv(&self) -> Option<Upload> {
        self.receiver.try_recv().ok()
    }
}

/// Launch the explorer inside the canvas referenced by `index.html`. The
/// dashboard starts empty until a CSV file is opened.
#[wasm_bindgen]
pub async fn start() -> Result<(), JsValue> {
    use web_sys::HtmlCanvasElement;

    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let canvas = document
        .get_element_by_id("the_canvas_id")
        .ok_or("Canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;

    let store = Store::new(
        Arc::new(Table::empty()),
        DashboardConfig::default(),
        "no dataset, use File → Open CSV…",
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let web_options = eframe::WebOptions::default();

    WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(move |cc| Ok(Box::new(create_app(cc, store)))),
        )
        .await
}

/// Request a CSV file from the user using the WASM-friendly dialog.
pub fn open_csv_dialog(ctx: egui::Context, uploads: Sender<Upload>) {
    use rfd::AsyncFileDialog;
    use wasm_bindgen_futures::spawn_local;

    let task = AsyncFileDialog::new()
        .add_filter("CSV", &["csv"])
        .pick_file();

    spawn_local(async move {
        if let Some(file) = task.await {
            let upload = Upload {
                name: file.file_name(),
                bytes: file.read().await,
            };
            if uploads.send(upload).is_err() {
                tracing::warn!("explorer closed before the file was read");
            }
            ctx.request_repaint();
        }
    });
}
