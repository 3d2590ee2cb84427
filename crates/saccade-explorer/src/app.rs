use crate::actions::Action;
use crate::plot_view::{self, Interaction};
use crate::state::State;
use crate::store::Store;
use eframe::egui;
use saccade::chart::PointData;
use saccade::PanelId;

// UI Constants
const PANEL_MARGIN: f32 = 8.0;
const MIN_PLOT_HEIGHT: f32 = 80.0;
/// Room left under each plot for its title and notices
const CAPTION_HEIGHT: f32 = 48.0;

pub struct ExplorerApp {
    state: State,
    #[cfg(target_arch = "wasm32")]
    uploads: crate::web::Uploads,
}

impl ExplorerApp {
    pub fn new(store: Store) -> Self {
        Self {
            state: State::new(store),
            #[cfg(target_arch = "wasm32")]
            uploads: crate::web::Uploads::default(),
        }
    }

    fn render_panel(
        &mut self,
        ui: &mut egui::Ui,
        panel: PanelId,
        height: f32,
    ) {
        let store = &self.state.store;
        let Some(output) = store.dashboard.output(panel) else {
            return;
        };
        let reset = store.needs_reset(panel);

        let interaction = plot_view::show(ui, panel, output, reset, height);
        if reset {
            self.state.dispatch(Action::MarkDrawn { panel });
        }
        match (panel, interaction) {
            (
                PanelId::Overview,
                Some(Interaction::Clicked(PointData::Participant(identity))),
            ) => self.state.dispatch(Action::ClickParticipant { identity }),
            (
                PanelId::Participant,
                Some(Interaction::Clicked(PointData::Trial(identity))),
            ) => self.state.dispatch(Action::ClickTrial { identity }),
            (PanelId::Histogram, Some(Interaction::Hovered(bin))) => {
                self.state.dispatch(Action::HoverBin { bin })
            }
            _ => {}
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV…").clicked() {
                        ui.close();
                        self.open_csv(ctx);
                    }
                    self.native_file_items(ui);
                });
            });
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_csv(&mut self, _ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            self.state.dispatch(Action::OpenDataset {
                source: saccade::DataSource::File(path),
            });
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn native_file_items(&mut self, ui: &mut egui::Ui) {
        if ui.button("Reload configured data").clicked() {
            ui.close();
            let config = self.state.store.dashboard.config();
            let source = config.data_source.clone();
            self.state.dispatch(Action::OpenDataset { source });
        }
        if ui.button("Save configuration…").clicked() {
            ui.close();
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name(saccade::config::CONFIG_FILE)
                .save_file()
            {
                self.state.dispatch(Action::SaveConfig { path });
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn open_csv(&mut self, ctx: &egui::Context) {
        crate::web::open_csv_dialog(ctx.clone(), self.uploads.sender());
    }

    // Remote and local paths cannot be used from the browser
    #[cfg(target_arch = "wasm32")]
    fn native_file_items(&mut self, _ui: &mut egui::Ui) {}

    #[cfg(target_arch = "wasm32")]
    fn receive_uploads(&mut self) {
        while let Some(upload) = self.uploads.try_recv() {
            match saccade::Table::from_reader(upload.bytes.as_slice()) {
                Ok(table) => self.state.dispatch(Action::ReplaceTable {
                    table,
                    label: upload.name,
                }),
                Err(e) => {
                    tracing::error!(file = %upload.name, "{e}");
                    self.state.store.error_message =
                        Some(format!("{}: {e}", upload.name));
                }
            }
        }
    }

    fn render_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let store = &self.state.store;
                let mut chosen = store.selected_measure.clone();
                egui::ComboBox::from_label("Measure")
                    .selected_text(chosen.name().to_owned())
                    .show_ui(ui, |ui| {
                        let measures = &store.dashboard.config().measures;
                        for measure in measures.iter() {
                            ui.selectable_value(
                                &mut chosen,
                                measure.clone(),
                                measure.name(),
                            );
                        }
                    });
                ui.separator();
                ui.label(format!(
                    "{} ({} rows)",
                    store.dataset_label,
                    store.dashboard.table().len()
                ));
                if chosen != store.selected_measure {
                    self.state
                        .dispatch(Action::SelectMeasure { measure: chosen });
                }
            });
        });
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(target_arch = "wasm32")]
        self.receive_uploads();

        self.render_menu_bar(ctx);
        self.render_controls(ctx);

        let available = ctx.available_rect();
        egui::SidePanel::left("left_panel")
            .exact_width(available.width() / 2.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(PANEL_MARGIN),
            )
            .show(ctx, |ui| {
                let height = (ui.available_height() / 2.0 - CAPTION_HEIGHT)
                    .max(MIN_PLOT_HEIGHT);
                self.render_panel(ui, PanelId::Overview, height);
                ui.separator();
                self.render_panel(ui, PanelId::Histogram, height);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let height = (ui.available_height() / 3.0 - CAPTION_HEIGHT)
                .max(MIN_PLOT_HEIGHT);
            self.render_panel(ui, PanelId::Participant, height);
            ui.separator();
            self.render_panel(ui, PanelId::Trial, height);
            ui.separator();
            self.render_panel(ui, PanelId::PixelSpace, height);
        });

        // Display error dialog if there's an error message
        if let Some(error) = self.state.store.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.dispatch(Action::ClearErrorMessage);
                    }
                });
        }

        self.state.flush_actions();
        self.state.flush_effects();
    }
}
