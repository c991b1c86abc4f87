use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{ObservationTable, Source};
use crate::color::SeriesColor;

// ---------------------------------------------------------------------------
// Comparison series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePattern {
    Solid,
    Dotted,
}

/// One styled line of a comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    /// Legend name, the exact label that was matched.
    pub name: String,
    pub group: Group,
    pub source: Source,
    pub color: SeriesColor,
    pub pattern: LinePattern,
    /// Sorted ascending by date.
    pub points: Vec<(NaiveDate, f64)>,
}

/// Label prefixes of the two tables being compared, e.g. `"UAI"` and `"MCDA UAI"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefixes {
    pub baseline: String,
    pub alternative: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            baseline: "UAI".to_string(),
            alternative: "MCDA UAI".to_string(),
        }
    }
}

/// Zone number taken from a label.
///
/// Kept as its decimal digits (leading zeros stripped) so runs of any length
/// are accepted. Ordered numerically: shorter digit strings first, then by
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group(String);

impl Group {
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Group(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Group {
    fn from(n: u64) -> Self {
        Group(n.to_string())
    }
}

impl Ord for Group {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Group {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group of the first run of ASCII digits in `label`, `None` if it has none.
pub fn extract_group(label: &str) -> Option<Group> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let rest = &label[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(Group::from_digits(&rest[..end]))
}

/// Sorted, distinct groups found in the labels of `table`.
pub fn discover_groups(table: &ObservationTable) -> Vec<Group> {
    table
        .observations
        .iter()
        .filter_map(|o| extract_group(&o.label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Pair baseline and alternative observations by zone number.
///
/// Groups come from the baseline labels only. Each side is then looked up
/// by exact label (`"{prefix} {n}"`), so an alternative label that differs
/// in spacing or case is treated as missing. Colours follow the group's
/// position in the sorted group list whether or not anything is emitted
/// for it.
pub fn build_comparison(
    baseline: &ObservationTable,
    alternative: &ObservationTable,
    prefixes: &Prefixes,
) -> Vec<ComparisonSeries> {
    let mut out = Vec::new();

    for (index, group) in discover_groups(baseline).into_iter().enumerate() {
        let color = SeriesColor::for_index(index);
        let sides = [
            (Source::Baseline, baseline, &prefixes.baseline, LinePattern::Dotted),
            (Source::Alternative, alternative, &prefixes.alternative, LinePattern::Solid),
        ];

        for (source, table, prefix, pattern) in sides {
            let name = format!("{prefix} {group}");
            let mut points = table.series_for(&name);
            if points.is_empty() {
                continue;
            }
            points.sort_by_key(|(date, _)| *date);
            log::trace!("{name}: {} points, {source}, {color}", points.len());

            out.push(ComparisonSeries {
                name,
                group: group.clone(),
                source,
                color,
                pattern,
                points,
            });
        }
    }

    log::debug!(
        "built {} comparison series from {} baseline / {} alternative rows",
        out.len(),
        baseline.len(),
        alternative.len()
    );
    out
}
