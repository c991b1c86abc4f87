use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::config::{ChartSpec, ComparisonSpec, DashboardConfig};
use crate::data::compare::{build_comparison, ComparisonSeries};
use crate::data::filter::{filter_table, DateRange};
use crate::data::loader::{load_table, LoadError};
use crate::data::model::ObservationTable;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Top-level pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Map,
    Charts,
    Documentation,
}

impl View {
    pub const ALL: [View; 3] = [View::Map, View::Charts, View::Documentation];

    pub fn title(self) -> &'static str {
        match self {
            View::Map => "Interactive Map",
            View::Charts => "NDVI Charts",
            View::Documentation => "Documentation",
        }
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// Outcome of loading one configured file.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    Loaded(ObservationTable),
    /// File does not exist; shown as a warning, not an error.
    Missing,
    Failed(String),
}

impl PanelData {
    pub fn table(&self) -> Option<&ObservationTable> {
        match self {
            PanelData::Loaded(t) => Some(t),
            _ => None,
        }
    }
}

/// A single-file chart with its date window.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub spec: ChartSpec,
    pub data: PanelData,
    /// Full span of the loaded data.
    pub bounds: Option<DateRange>,
    pub range: Option<DateRange>,
    /// Rows inside `range` (cached).
    pub visible: ObservationTable,
}

impl ChartPanel {
    fn new(spec: ChartSpec, data: PanelData) -> Self {
        let bounds = data.table().and_then(DateRange::covering);
        let visible = data.table().cloned().unwrap_or_default();
        Self {
            spec,
            data,
            bounds,
            range: bounds,
            visible,
        }
    }

    pub fn set_range(&mut self, range: DateRange) {
        let (Some(bounds), Some(table)) = (self.bounds, self.data.table()) else {
            return;
        };
        let range = range.clamp_to(bounds);
        self.visible = filter_table(table, &range);
        self.range = Some(range);
    }
}

/// A baseline/alternative pair drawn on one chart.
#[derive(Debug, Clone)]
pub struct ComparisonPanel {
    pub spec: ComparisonSpec,
    pub baseline: PanelData,
    pub alternative: PanelData,
    pub bounds: Option<DateRange>,
    pub range: Option<DateRange>,
    /// Series for the current range (cached).
    pub series: Vec<ComparisonSeries>,
}

impl ComparisonPanel {
    fn new(spec: ComparisonSpec, baseline: PanelData, alternative: PanelData) -> Self {
        let bounds = match (
            baseline.table().and_then(DateRange::covering),
            alternative.table().and_then(DateRange::covering),
        ) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
        let mut panel = Self {
            spec,
            baseline,
            alternative,
            bounds,
            range: bounds,
            series: Vec::new(),
        };
        panel.rebuild();
        panel
    }

    pub fn set_range(&mut self, range: DateRange) {
        if let Some(bounds) = self.bounds {
            self.range = Some(range.clamp_to(bounds));
            self.rebuild();
        }
    }

    /// Filter both tables to the current range, then pair them.
    fn rebuild(&mut self) {
        let empty = ObservationTable::default();
        let baseline = self.baseline.table().unwrap_or(&empty);
        let alternative = self.alternative.table().unwrap_or(&empty);

        self.series = match self.range {
            Some(range) => build_comparison(
                &filter_table(baseline, &range),
                &filter_table(alternative, &range),
                &self.spec.prefixes,
            ),
            None => build_comparison(baseline, alternative, &self.spec.prefixes),
        };
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Current page.
    pub view: View,

    pub charts: Vec<ChartPanel>,
    pub comparisons: Vec<ComparisonPanel>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self {
            config,
            view: View::default(),
            charts: Vec::new(),
            comparisons: Vec::new(),
            status_message: None,
        };
        state.reload();
        state
    }

    /// Re-read every configured file from the assets directory.
    ///
    /// Each distinct file is read once even when several panels use it.
    pub fn reload(&mut self) {
        let files: BTreeSet<&str> = self
            .config
            .charts
            .iter()
            .map(|c| c.file.as_str())
            .chain(self.config.comparisons.iter().flat_map(|c| {
                [c.baseline_file.as_str(), c.alternative_file.as_str()]
            }))
            .collect();
        let loaded: BTreeMap<&str, PanelData> =
            files.into_iter().map(|f| (f, self.load(f))).collect();
        let data = |file: &str| loaded.get(file).cloned().unwrap_or(PanelData::Missing);

        let charts = self
            .config
            .charts
            .iter()
            .map(|spec| ChartPanel::new(spec.clone(), data(&spec.file)))
            .collect();
        let comparisons = self
            .config
            .comparisons
            .iter()
            .map(|spec| {
                ComparisonPanel::new(
                    spec.clone(),
                    data(&spec.baseline_file),
                    data(&spec.alternative_file),
                )
            })
            .collect();

        let failures = loaded
            .values()
            .filter(|d| matches!(d, PanelData::Failed(_)))
            .count();
        self.status_message = (failures > 0).then(|| format!("{failures} file(s) failed to load"));
        self.charts = charts;
        self.comparisons = comparisons;
    }

    /// Point the dashboard at another assets folder and reload.
    pub fn set_assets_dir(&mut self, dir: PathBuf) {
        log::info!("assets directory set to {}", dir.display());
        self.config.assets_dir = dir;
        self.reload();
    }

    fn load(&self, file: &str) -> PanelData {
        let path = self.config.asset_path(file);
        match load_table(&path, &self.config.columns) {
            Ok(table) => {
                log::info!("Loaded {} observations from {}", table.len(), path.display());
                PanelData::Loaded(table)
            }
            Err(LoadError::NotFound(_)) => {
                log::warn!("{} is unavailable", path.display());
                PanelData::Missing
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                PanelData::Failed(format!("{file}: {e}"))
            }
        }
    }
}
