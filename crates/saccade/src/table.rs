use crate::observation::{Level, Observation};
use std::cmp::Ordering;

// ------------------------------------------------------------------
// Predicates
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Task,
    Group,
    Participant,
    Trial,
    Saccade,
    Level,
    Numeric(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            Op::Eq => ord == Ordering::Equal,
            Op::Ne => ord != Ordering::Equal,
            Op::Lt => ord == Ordering::Less,
            Op::Le => ord != Ordering::Greater,
            Op::Gt => ord == Ordering::Greater,
            Op::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Level(Level),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Level> for Value {
    fn from(level: Level) -> Self {
        Value::Level(level)
    }
}

/// `column op value`. Comparisons against a missing cell, or between
/// incompatible kinds, never match (not even for `Ne`).
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub op: Op,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: Column, op: Op, value: impl Into<Value>) -> Self {
        Self {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Eq, value)
    }

    pub fn level(level: Level) -> Self {
        Self::eq(Column::Level, level)
    }

    pub fn participant(name: &str) -> Self {
        Self::eq(Column::Participant, name)
    }

    pub fn trial(trial: i64) -> Self {
        Self::eq(Column::Trial, trial)
    }

    pub fn saccade(saccade: i64) -> Self {
        Self::eq(Column::Saccade, saccade)
    }
}

enum Cell<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
    Level(Level),
    Missing,
}

fn compare(cell: Cell<'_>, value: &Value) -> Option<Ordering> {
    match (cell, value) {
        (Cell::Text(a), Value::Text(b)) => Some(a.cmp(b.as_str())),
        (Cell::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Cell::Int(a), Value::Float(b)) => (a as f64).partial_cmp(b),
        (Cell::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Cell::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Cell::Level(a), Value::Level(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A predicate with its numeric column resolved against one table.
struct Bound<'p> {
    predicate: &'p Predicate,
    numeric_idx: Option<usize>,
}

impl Bound<'_> {
    fn matches(&self, row: &Observation) -> bool {
        let cell = match &self.predicate.column {
            Column::Task => Cell::Text(&row.task),
            Column::Group => Cell::Text(&row.group),
            Column::Participant => Cell::Text(&row.participant),
            Column::Trial => row.trial.map_or(Cell::Missing, Cell::Int),
            Column::Saccade => {
                row.saccade.map_or(Cell::Missing, Cell::Int)
            }
            Column::Level => Cell::Level(row.level),
            Column::Numeric(_) => match self.numeric_idx {
                Some(idx) => {
                    let v = row.numeric(idx);
                    if v.is_nan() { Cell::Missing } else { Cell::Float(v) }
                }
                None => Cell::Missing,
            },
        };
        compare(cell, &self.predicate.value)
            .is_some_and(|ord| self.predicate.op.accepts(ord))
    }
}

// ------------------------------------------------------------------
// Table
// ------------------------------------------------------------------

/// The in-memory dataset. Built once and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    numeric_columns: Vec<String>,
    rows: Vec<Observation>,
}

impl Table {
    pub(crate) fn new(
        numeric_columns: Vec<String>,
        rows: Vec<Observation>,
    ) -> Self {
        Self {
            numeric_columns,
            rows,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.numeric_columns.iter().position(|c| c == name)
    }

    /// Every row, in table order.
    pub fn all(&self) -> Selection<'_> {
        Selection {
            table: self,
            indices: (0..self.rows.len()).collect(),
        }
    }

    pub fn filter(&self, predicates: &[Predicate]) -> Selection<'_> {
        self.all().filter(predicates)
    }
}

// ------------------------------------------------------------------
// Selection
// ------------------------------------------------------------------

/// Row indices into a [`Table`], in table order.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    table: &'a Table,
    indices: Vec<usize>,
}

impl<'a> Selection<'a> {
    /// Narrow this selection; `self` is left untouched.
    pub fn filter(&self, predicates: &[Predicate]) -> Selection<'a> {
        let bound: Vec<Bound<'_>> = predicates
            .iter()
            .map(|predicate| Bound {
                predicate,
                numeric_idx: match &predicate.column {
                    Column::Numeric(name) => {
                        self.table.column_index(name)
                    }
                    _ => None,
                },
            })
            .collect();

        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| {
                let row = &self.table.rows[i];
                bound.iter().all(|b| b.matches(row))
            })
            .collect();

        Selection {
            table: self.table,
            indices,
        }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Table row indices of this selection.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn get(&self, position: usize) -> Option<&'a Observation> {
        let table = self.table;
        self.indices.get(position).map(|&i| &table.rows[i])
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Observation> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.rows[i])
    }

    /// Numeric column values in selection order. An unknown column
    /// yields all `NaN`.
    pub fn values(&self, column: &str) -> Vec<f64> {
        match self.table.column_index(column) {
            Some(idx) => self.rows().map(|r| r.numeric(idx)).collect(),
            None => vec![f64::NAN; self.len()],
        }
    }

    /// Distinct textual values of a column, in order of first appearance.
    pub fn distinct(&self, column: &Column) -> Vec<String> {
        let numeric_idx = match column {
            Column::Numeric(name) => self.table.column_index(name),
            _ => None,
        };
        let mut seen = Vec::new();
        for row in self.rows() {
            let value = match column {
                Column::Task => Some(row.task.clone()),
                Column::Group => Some(row.group.clone()),
                Column::Participant => Some(row.participant.clone()),
                Column::Trial => row.trial.map(|t| t.to_string()),
                Column::Saccade => row.saccade.map(|s| s.to_string()),
                Column::Level => Some(row.level.to_string()),
                Column::Numeric(_) => numeric_idx
                    .map(|idx| row.numeric(idx))
                    .filter(|v| !v.is_nan())
                    .map(|v| v.to_string()),
            };
            if let Some(value) = value
                && !seen.contains(&value)
            {
                seen.push(value);
            }
        }
        seen
    }
}
