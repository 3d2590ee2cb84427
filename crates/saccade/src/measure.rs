use crate::observation::{
    AMPLITUDE, DEGREE_DISTANCE, LATENCY, PEAK_VELOCITY, PIXEL_DISTANCE,
};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A selectable numeric column, plotted on the y axis.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Measure(String);

impl Measure {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Measure {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The measures offered in the selector, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureCatalog {
    measures: Vec<Measure>,
}

impl Default for MeasureCatalog {
    fn default() -> Self {
        Self::new(
            [
                AMPLITUDE,
                PEAK_VELOCITY,
                LATENCY,
                PIXEL_DISTANCE,
                DEGREE_DISTANCE,
            ]
            .into_iter()
            .map(Measure::from),
        )
    }
}

impl MeasureCatalog {
    /// Duplicates are dropped, first occurrence wins.
    pub fn new(measures: impl IntoIterator<Item = Measure>) -> Self {
        let mut unique: Vec<Measure> = Vec::new();
        for m in measures {
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        Self { measures: unique }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measure> {
        self.measures.iter()
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn contains(&self, measure: &Measure) -> bool {
        self.measures.contains(measure)
    }

    pub fn first(&self) -> Option<&Measure> {
        self.measures.first()
    }

    /// Measures in the catalog that the table has no column for.
    pub fn check_against(&self, table: &Table) -> Vec<Measure> {
        let missing: Vec<Measure> = self
            .measures
            .iter()
            .filter(|m| table.column_index(m.name()).is_none())
            .cloned()
            .collect();
        for m in &missing {
            tracing::warn!(measure = %m, "measure has no column in dataset");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lists_five_measures() {
        let catalog = MeasureCatalog::default();
        let names: Vec<&str> = catalog.iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec![
                "Amplitude",
                "Peak Velocity",
                "Latency",
                "Pixel Distance",
                "Degree Distance"
            ]
        );
        assert!(catalog.contains(&Measure::from("Latency")));
        assert!(!catalog.contains(&Measure::from("Time")));
    }

    #[test]
    fn duplicates_are_dropped() {
        let catalog = MeasureCatalog::new(
            ["Latency", "Amplitude", "Latency"].map(Measure::from),
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.first(), Some(&Measure::from("Latency")));
    }

    #[test]
    fn reports_measures_missing_from_table() {
        let csv = "Task,Group,Participant,Level,Amplitude,Latency\n\
                   GAP,BL,p1,P,1.0,2.0\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        let missing = MeasureCatalog::default().check_against(&table);
        assert_eq!(
            missing,
            vec![
                Measure::from("Peak Velocity"),
                Measure::from("Pixel Distance"),
                Measure::from("Degree Distance"),
            ]
        );
    }

    #[test]
    fn catalog_is_a_plain_json_list() {
        let catalog: MeasureCatalog =
            serde_json::from_str(r#"["Amplitude","Time"]"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            serde_json::to_string(&catalog).unwrap(),
            r#"["Amplitude","Time"]"#
        );
    }
}
