use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::compare::Prefixes;
use crate::data::loader::ColumnNames;

/// Environment variable naming the config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "NDVI_DASHBOARD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Directory the chart files are resolved against.
    pub assets_dir: PathBuf,
    pub map: MapSpec,
    pub columns: ColumnNames,
    pub charts: Vec<ChartSpec>,
    pub comparisons: Vec<ComparisonSpec>,
    pub documentation: Vec<DocSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub title: String,
    pub url: String,
}

/// One NDVI file drawn with a line per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub file: String,
    pub title: String,
}

/// Two NDVI files drawn on one chart, paired by zone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSpec {
    pub title: String,
    pub baseline_file: String,
    pub alternative_file: String,
    #[serde(default)]
    pub prefixes: Prefixes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSection {
    pub heading: String,
    pub body: String,
}

const MODIS_UAI: &str = "Bangweulu_MODIS_NDVI_TimeSeries_UAIs.csv";
const VIIRS_UAI: &str = "Bangweulu_VIIRS_NDVI_TimeSeries_UAIs.csv";
const MODIS_MCDA: &str = "Bangweulu_MODIS_NDVI_TimeSeries_MCDA_UAIs.csv";
const VIIRS_MCDA: &str = "Bangweulu_VIIRS_NDVI_TimeSeries_MCDA_UAIs.csv";

impl Default for DashboardConfig {
    fn default() -> Self {
        let chart = |file: &str, title: &str| ChartSpec {
            file: file.to_string(),
            title: title.to_string(),
        };
        let comparison = |title: &str, baseline: &str, alternative: &str| ComparisonSpec {
            title: title.to_string(),
            baseline_file: baseline.to_string(),
            alternative_file: alternative.to_string(),
            prefixes: Prefixes::default(),
        };

        Self {
            title: "Bangweulu GMA Dashboard".to_string(),
            assets_dir: PathBuf::from("assets"),
            map: MapSpec {
                title: "Forage Analysis Map".to_string(),
                url: "https://drive.google.com/uc?id=1EXQ8XAUNI1dexVMj15oQF0OqSOnQzyKH"
                    .to_string(),
            },
            columns: ColumnNames::default(),
            charts: vec![
                chart(MODIS_UAI, "UAI NDVI - MODIS"),
                chart(VIIRS_UAI, "UAI NDVI - VIIRS"),
                chart(MODIS_MCDA, "MCDA NDVI - MODIS"),
                chart(VIIRS_MCDA, "MCDA NDVI - VIIRS"),
            ],
            comparisons: vec![
                comparison("UAI vs MCDA NDVI - MODIS", MODIS_UAI, MODIS_MCDA),
                comparison("UAI vs MCDA NDVI - VIIRS", VIIRS_UAI, VIIRS_MCDA),
            ],
            documentation: vec![
                DocSection {
                    heading: "Workflow Overview".to_string(),
                    body: "This document outlines the geospatial workflow developed to generate \
                           edible vegetation masks and segment Unit Areas of Insurance (UAIs) \
                           using satellite-derived vegetation indices."
                        .to_string(),
                },
                DocSection {
                    heading: "Troubleshooting".to_string(),
                    body: "- If the map doesn't load, verify the Google Drive link.\n\
                           - Ensure all CSV files are present in the assets folder."
                        .to_string(),
                },
            ],
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Config path from the first CLI argument, then [`CONFIG_ENV`], then
    /// [`DEFAULT_CONFIG_FILE`].
    pub fn resolve_path(arg: Option<String>, env: Option<String>) -> PathBuf {
        arg.or(env)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Resolve the config path and load it. An unreadable or invalid file is
    /// an error; the dashboard does not start on defaults in that case.
    pub fn from_args(arg: Option<String>, env: Option<String>) -> Result<Self> {
        Self::load(&Self::resolve_path(arg, env))
    }

    pub fn asset_path(&self, file: &str) -> PathBuf {
        self.assets_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_four_charts_and_two_comparisons() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.charts.len(), 4);
        assert_eq!(cfg.comparisons.len(), 2);
        assert_eq!(cfg.comparisons[0].prefixes.alternative, "MCDA UAI");
        assert_eq!(
            cfg.asset_path(MODIS_UAI),
            Path::new("assets").join(MODIS_UAI)
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "assets_dir": "/data/ndvi", "columns": { "label": "Zone" } }"#,
        )
        .unwrap();

        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.assets_dir, PathBuf::from("/data/ndvi"));
        assert_eq!(cfg.columns.label, "Zone");
        assert_eq!(cfg.columns.date, "Date");
        assert_eq!(cfg.charts, DashboardConfig::default().charts);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(DashboardConfig::load(&path).is_err());
    }

    #[test]
    fn invalid_file_named_on_command_line_is_not_replaced_by_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "assets_dir": 42 }"#).unwrap();

        let arg = Some(path.to_string_lossy().into_owned());
        let err = DashboardConfig::from_args(arg, None).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));

        let env = Some(dir.path().join("absent.json").to_string_lossy().into_owned());
        assert_eq!(
            DashboardConfig::from_args(None, env).unwrap(),
            DashboardConfig::default()
        );
    }

    #[test]
    fn resolve_path_prefers_argument() {
        assert_eq!(
            DashboardConfig::resolve_path(Some("a.json".into()), Some("b.json".into())),
            PathBuf::from("a.json")
        );
        assert_eq!(
            DashboardConfig::resolve_path(None, Some("b.json".into())),
            PathBuf::from("b.json")
        );
        assert_eq!(
            DashboardConfig::resolve_path(None, None),
            PathBuf::from(DEFAULT_CONFIG_FILE)
        );
    }
}
