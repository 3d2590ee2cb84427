//! Linked charts over a saccade dataset: a table of participant, trial and
//! saccade rows, five panels derived from it, and a dispatcher that
//! recomputes exactly the panels an interaction affects.

pub mod chart;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod loader;
pub mod measure;
pub mod observation;
pub mod panels;
pub mod selection;
pub mod table;

pub use chart::{ChartSpec, Trace};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DispatchError, PanelOutput};
pub use loader::{DataSource, LoadError, load};
pub use measure::{Measure, MeasureCatalog};
pub use observation::{Level, Observation};
pub use panels::{PanelError, PanelId};
pub use selection::{Event, InputId, Inputs};
pub use table::Table;
