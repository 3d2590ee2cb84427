use crate::observation::{
    GROUP, LEVEL, Level, Observation, PARTICIPANT, SACCADE, TASK,
    TRIAL,
};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

/// Public copy of the saccade dataset the dashboard was built around.
pub const DEFAULT_DATA_URL: &str = "https://raw.githubusercontent.com/kwonelis/SaccadeData/master/all_single_saccade_data.csv";

const IDENTITY_COLUMNS: [&str; 6] =
    [TASK, GROUP, PARTICIPANT, TRIAL, SACCADE, LEVEL];

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),
    #[error("record {record}: unknown level \"{value}\"")]
    UnknownLevel { record: usize, value: String },
    #[error("record {record}: invalid integer \"{value}\" in column {column}")]
    InvalidInteger {
        record: usize,
        column: &'static str,
        value: String,
    },
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot fetch {0} on this target")]
    Unsupported(String),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_DATA_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load the whole dataset into memory.
pub fn load(source: &DataSource) -> Result<Table, LoadError> {
    let table = match source {
        DataSource::File(path) => {
            let file = std::fs::File::open(path).map_err(|source| {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            Table::from_reader(std::io::BufReader::new(file))?
        }
        DataSource::Url(url) => fetch(url)?,
    };
    tracing::info!(
        %source,
        rows = table.len(),
        numeric_columns = table.numeric_columns().len(),
        "dataset loaded"
    );
    Ok(table)
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch(url: &str) -> Result<Table, LoadError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })?;
    Table::from_reader(response)
}

#[cfg(target_arch = "wasm32")]
fn fetch(url: &str) -> Result<Table, LoadError> {
    Err(LoadError::Unsupported(url.to_string()))
}

fn parse_integer(
    raw: &str,
    record: usize,
    column: &'static str,
) -> Result<Option<i64>, LoadError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Some(i));
    }
    // Dataframe exports write integer columns holding blanks as floats
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(f as i64)),
        _ => Err(LoadError::InvalidInteger {
            record,
            column,
            value: raw.to_string(),
        }),
    }
}

impl Table {
    /// Parse CSV with a header row. Identity columns are typed, every other
    /// named column is numeric; empty or unparsable cells become `NaN`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let position = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| {
            position(name).ok_or(LoadError::MissingColumn(name))
        };
        let task_idx = require(TASK)?;
        let group_idx = require(GROUP)?;
        let participant_idx = require(PARTICIPANT)?;
        let level_idx = require(LEVEL)?;
        let trial_idx = position(TRIAL);
        let saccade_idx = position(SACCADE);

        // Unnamed headers are dataframe index columns
        let numeric: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty() && !IDENTITY_COLUMNS.contains(h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut rows = Vec::new();
        let mut unparsable = 0usize;
        for (n, record) in rdr.records().enumerate() {
            let record = record?;
            let record_no = n + 1;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let level_raw = field(level_idx);
            let level = Level::parse(level_raw).ok_or_else(|| {
                LoadError::UnknownLevel {
                    record: record_no,
                    value: level_raw.to_string(),
                }
            })?;

            let trial = match trial_idx {
                Some(idx) => parse_integer(field(idx), record_no, TRIAL)?,
                None => None,
            };
            let saccade = match saccade_idx {
                Some(idx) => {
                    parse_integer(field(idx), record_no, SACCADE)?
                }
                None => None,
            };

            let values = numeric
                .iter()
                .map(|(idx, _)| {
                    let raw = field(*idx);
                    if raw.is_empty() {
                        return f64::NAN;
                    }
                    raw.parse::<f64>().unwrap_or_else(|_| {
                        unparsable += 1;
                        f64::NAN
                    })
                })
                .collect();

            rows.push(Observation {
                task: field(task_idx).to_string(),
                group: field(group_idx).to_string(),
                participant: field(participant_idx).to_string(),
                trial,
                saccade,
                level,
                numeric: values,
            });
        }

        if unparsable > 0 {
            tracing::warn!(
                cells = unparsable,
                "non-numeric cells in numeric columns read as NaN"
            );
        }

        Ok(Table::new(
            numeric.into_iter().map(|(_, name)| name).collect(),
            rows,
        ))
    }
}
