use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Observation – one row of an NDVI table
// ---------------------------------------------------------------------------

/// A single NDVI sample for one zone on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Zone label as written in the source file, e.g. `"UAI 3"`.
    pub label: String,
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(label: impl Into<String>, date: NaiveDate, value: f64) -> Self {
        Self {
            label: label.into(),
            date,
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// ObservationTable – a loaded file
// ---------------------------------------------------------------------------

/// All observations of one file, kept in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    pub observations: Vec<Observation>,
}

impl ObservationTable {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .map(|o| o.label.as_str())
            .filter(|l| seen.insert(*l))
            .collect()
    }

    /// `(date, value)` pairs of every observation with exactly this label,
    /// in table order.
    pub fn series_for(&self, label: &str) -> Vec<(NaiveDate, f64)> {
        self.observations
            .iter()
            .filter(|o| o.label == label)
            .map(|o| (o.date, o.value))
            .collect()
    }

    /// Earliest and latest date in the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.first()?.date;
        Some(
            self.observations
                .iter()
                .fold((first, first), |(lo, hi), o| (lo.min(o.date), hi.max(o.date))),
        )
    }
}

// ---------------------------------------------------------------------------
// Source – which side of a comparison a series belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Baseline,
    Alternative,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Baseline => write!(f, "baseline"),
            Source::Alternative => write!(f, "alternative"),
        }
    }
}
