use saccade::config::{ConfigError, DashboardConfig, DefaultSelection};
use saccade::selection::InputId;
use saccade::{
    Dashboard, DataSource, DispatchError, Event, LoadError, Measure, PanelId,
    Table,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("window failed: {0}")]
    Window(#[from] eframe::Error),
}

pub struct Store {
    pub dashboard: Dashboard,
    /// Where the current table came from, shown in the status line
    pub dataset_label: String,
    /// Value of the measure drop-down
    pub selected_measure: Measure,
    /// Panels whose plot bounds must be re-fitted on the next draw
    refit: BTreeSet<PanelId>,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(
        table: Arc<Table>,
        config: DashboardConfig,
        dataset_label: impl Into<String>,
    ) -> Result<Self, AppError> {
        let dashboard = Dashboard::new(table, config)?;
        let selected_measure = dashboard.inputs().measure.clone();
        let refit = dashboard.order().iter().copied().collect();
        Ok(Self {
            dashboard,
            dataset_label: dataset_label.into(),
            selected_measure,
            refit,
            error_message: None,
        })
    }

    /// Forward an interaction to the dashboard; a rejected event becomes
    /// the error message. A hover only moves the highlight, so it leaves
    /// the plot bounds alone.
    pub fn dispatch_event(&mut self, event: Event) {
        let input = event.input();
        match self.dashboard.dispatch(event) {
            Ok(recomputed) => {
                tracing::debug!(?recomputed, "panels updated");
                if input != InputId::HistogramHover {
                    self.refit.extend(recomputed);
                }
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.error_message = Some(e.to_string());
            }
        }
        self.selected_measure = self.dashboard.inputs().measure.clone();
    }

    /// Rebuild the dashboard over a new table, keeping the configuration.
    pub fn replace_table(
        &mut self,
        table: Table,
        label: impl Into<String>,
    ) -> Result<(), AppError> {
        let config = self.dashboard.config().clone();
        *self = Self::new(Arc::new(table), config, label)?;
        Ok(())
    }

    pub fn load_dataset(
        &mut self,
        source: &DataSource,
    ) -> Result<(), AppError> {
        let table = saccade::load(source)?;
        self.replace_table(table, source.to_string())
    }

    /// Write the configuration with the current measure and selection as
    /// the new defaults.
    pub fn save_config(&self, path: &Path) -> Result<(), AppError> {
        let inputs = self.dashboard.inputs();
        let config = DashboardConfig {
            default_measure: inputs.measure.clone(),
            default_selection: DefaultSelection {
                participant: inputs.overview_click.participant.clone(),
                task: inputs.overview_click.task.clone(),
                trial: inputs.participant_click.trial,
            },
            ..self.dashboard.config().clone()
        };
        config.save_to_file(path)?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Whether the plot of `panel` must re-fit its bounds to new data.
    pub fn needs_reset(&self, panel: PanelId) -> bool {
        self.refit.contains(&panel)
    }

    pub fn mark_drawn(&mut self, panel: PanelId) {
        self.refit.remove(&panel);
    }
}
