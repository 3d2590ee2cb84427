use crate::actions::{self, Action};
use crate::effects::{self, Effect};
use crate::store::Store;

pub struct State {
    pub store: Store,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let mut effects = actions::update(&mut self.store, action);
            self.effect_queue.append(&mut effects);
        }
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            effects::run(&mut self.store, effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saccade::{DashboardConfig, DataSource, Measure, Table};
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn queued_actions_run_in_order_and_effects_after() {
        let table = Arc::new(Table::empty());
        let store =
            Store::new(table, DashboardConfig::default(), "empty").unwrap();
        let mut state = State::new(store);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Task,Group,Participant,Trial,Saccade,Amplitude,Level")
            .unwrap();
        writeln!(file, "GAP,BL,gapBL401ak,,,2.0,P").unwrap();
        let source = DataSource::File(file.path().to_path_buf());

        state.dispatch(Action::OpenDataset { source });
        state.dispatch(Action::SelectMeasure {
            measure: Measure::from("Amplitude"),
        });
        state.flush_actions();
        // Effects have not run yet
        assert!(state.store.dashboard.table().is_empty());
        assert_eq!(state.store.selected_measure, Measure::from("Amplitude"));

        state.flush_effects();
        assert_eq!(state.store.dashboard.table().len(), 1);
        assert_eq!(state.store.error_message, None);
    }
}
