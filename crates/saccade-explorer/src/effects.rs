use crate::store::Store;
use saccade::DataSource;
use std::path::PathBuf;

/// Work that must run outside the reducer (network and file IO)
#[derive(Debug, Clone)]
pub enum Effect {
    LoadDataset { source: DataSource },
    SaveConfig { path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    match effect {
        Effect::LoadDataset { source } => {
            if let Err(e) = store.load_dataset(&source) {
                tracing::error!(%source, "{e}");
                store.error_message = Some(e.to_string());
            }
        }
        Effect::SaveConfig { path } => {
            if let Err(e) = store.save_config(&path) {
                tracing::error!(path = %path.display(), "{e}");
                store.error_message = Some(e.to_string());
            }
        }
    }
}
