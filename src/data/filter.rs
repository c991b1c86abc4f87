use chrono::NaiveDate;

use super::model::ObservationTable;

// ---------------------------------------------------------------------------
// Date range selection
// ---------------------------------------------------------------------------

/// Inclusive date window chosen by the user for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The full span of `table`, or `None` if it has no rows.
    pub fn covering(table: &ObservationTable) -> Option<Self> {
        table
            .date_bounds()
            .map(|(start, end)| Self { start, end })
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Swap an inverted range and pull both ends inside `bounds`.
    pub fn clamp_to(self, bounds: DateRange) -> Self {
        let (start, end) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        Self {
            start: start.clamp(bounds.start, bounds.end),
            end: end.clamp(bounds.start, bounds.end),
        }
    }
}

/// Keep the observations dated inside `range`, preserving order.
pub fn filter_table(table: &ObservationTable, range: &DateRange) -> ObservationTable {
    ObservationTable::from_observations(
        table
            .observations
            .iter()
            .filter(|o| range.contains(o.date))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, day).unwrap()
    }

    fn table() -> ObservationTable {
        ObservationTable::from_observations(vec![
            Observation::new("UAI 1", d(1, 1), 0.1),
            Observation::new("UAI 1", d(2, 1), 0.2),
            Observation::new("UAI 2", d(3, 1), 0.3),
            Observation::new("UAI 1", d(4, 1), 0.4),
        ])
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let out = filter_table(&table(), &DateRange::new(d(2, 1), d(3, 1)));
        let values: Vec<f64> = out.observations.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![0.2, 0.3]);
    }

    #[test]
    fn covering_range_keeps_everything() {
        let t = table();
        let range = DateRange::covering(&t).unwrap();
        assert_eq!(filter_table(&t, &range), t);
        assert!(DateRange::covering(&ObservationTable::default()).is_none());
    }

    #[test]
    fn clamp_swaps_and_bounds() {
        let bounds = DateRange::new(d(1, 1), d(4, 1));
        let r = DateRange::new(d(6, 1), d(2, 1)).clamp_to(bounds);
        assert_eq!(r, DateRange::new(d(2, 1), d(4, 1)));
    }

    #[test]
    fn union_spans_both() {
        let a = DateRange::new(d(1, 1), d(2, 1));
        let b = DateRange::new(d(3, 1), d(5, 1));
        assert_eq!(a.union(b), DateRange::new(d(1, 1), d(5, 1)));
    }
}
