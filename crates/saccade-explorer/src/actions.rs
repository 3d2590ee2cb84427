use crate::effects::Effect;
use crate::store::Store;
use saccade::selection::{ClickIdentity, HoverBin, TrialIdentity};
use saccade::{DataSource, Event, Measure, PanelId, Table};
use std::path::PathBuf;

/// Actions that can be dispatched to modify the explorer state
#[derive(Debug, Clone)]
pub enum Action {
    // Dashboard interactions
    /// Pick a measure in the drop-down
    SelectMeasure { measure: Measure },
    /// Click a participant on the overview chart
    ClickParticipant { identity: ClickIdentity },
    /// Click a trial on the participant chart
    ClickTrial { identity: TrialIdentity },
    /// Pointer moved over (or off) a histogram bin
    HoverBin { bin: Option<HoverBin> },

    // Plot bookkeeping
    /// The plot of `panel` has been fitted to its current output
    MarkDrawn { panel: PanelId },

    // Data
    /// Load a dataset from a URL or a local file
    OpenDataset { source: DataSource },
    /// Use a table parsed elsewhere (browser file picker)
    ReplaceTable { table: Table, label: String },
    /// Save the configuration, current selection included
    SaveConfig { path: PathBuf },
    /// Clear any error message
    ClearErrorMessage,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        Action::SelectMeasure { measure } => {
            store.dispatch_event(Event::MeasureSelected(measure));
            vec![]
        }
        Action::ClickParticipant { identity } => {
            store.dispatch_event(Event::OverviewClicked(identity));
            vec![]
        }
        Action::ClickTrial { identity } => {
            store.dispatch_event(Event::ParticipantClicked(identity));
            vec![]
        }
        Action::HoverBin { bin } => {
            // Sent every frame while the pointer is over the histogram
            if store.dashboard.inputs().histogram_hover != bin {
                store.dispatch_event(Event::HistogramHovered(bin));
            }
            vec![]
        }
        Action::MarkDrawn { panel } => {
            store.mark_drawn(panel);
            vec![]
        }
        Action::OpenDataset { source } => {
            vec![Effect::LoadDataset { source }]
        }
        Action::SaveConfig { path } => {
            vec![Effect::SaveConfig { path }]
        }
        Action::ReplaceTable { table, label } => {
            if let Err(e) = store.replace_table(table, label) {
                store.error_message = Some(e.to_string());
            }
            vec![]
        }
        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
    }
}
