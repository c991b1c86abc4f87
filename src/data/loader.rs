use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, Date32Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Observation, ObservationTable};

// ---------------------------------------------------------------------------
// Errors and column configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },
    #[error("row {row}: '{value}' is not a valid date")]
    BadDate { row: usize, value: String },
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("converting arrow column: {0}")]
    Arrow(#[from] ArrowError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Header names of the three columns every NDVI table must have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub label: String,
    pub date: String,
    pub value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            label: "UAI".to_string(),
            date: "Date".to_string(),
            value: "NDVI".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an NDVI table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one observation per row
/// * `.json`    – `[{ "UAI": "UAI 1", "Date": "2023-01-01", "NDVI": 0.41 }, ...]`
/// * `.parquet` – one column per field; dates as text, Date32 or timestamps
pub fn load_table(path: &Path, columns: &ColumnNames) -> Result<ObservationTable> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?, columns),
        "json" => read_json(std::fs::File::open(path)?, columns),
        "parquet" | "pq" => load_parquet(path, columns),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Parse a date cell.
///
/// ISO forms are tried first, then month-first `MM/DD/YYYY`. Day-first
/// layouts are never accepted.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

fn parse_value(s: &str, row: usize, column: &str) -> Result<f64> {
    s.trim().parse::<f64>().map_err(|_| LoadError::BadValue {
        row,
        column: column.to_string(),
        value: s.to_string(),
    })
}

fn date_or_err(s: &str, row: usize) -> Result<NaiveDate> {
    parse_date(s).ok_or_else(|| LoadError::BadDate {
        row,
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Columns are located by exact header name; any other columns are ignored.
pub fn read_csv<R: Read>(source: R, columns: &ColumnNames) -> Result<ObservationTable> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
    };
    let label_idx = position(&columns.label)?;
    let date_idx = position(&columns.date)?;
    let value_idx = position(&columns.value)?;

    let mut observations = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let label = record.get(label_idx).unwrap_or("");
        let date = date_or_err(record.get(date_idx).unwrap_or(""), row)?;
        let value = parse_value(record.get(value_idx).unwrap_or(""), row, &columns.value)?;

        observations.push(Observation::new(label, date, value));
    }

    Ok(ObservationTable::from_observations(observations))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`.
pub fn read_json<R: Read>(source: R, columns: &ColumnNames) -> Result<ObservationTable> {
    let root: JsonValue = serde_json::from_reader(source)?;
    let records = root.as_array().ok_or_else(|| LoadError::BadValue {
        row: 0,
        column: "<root>".to_string(),
        value: "expected a top-level array".to_string(),
    })?;

    let mut observations = Vec::with_capacity(records.len());

    for (row, rec) in records.iter().enumerate() {
        let field = |name: &str| {
            rec.get(name).ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
        };

        let label = match field(&columns.label)? {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        let date = match field(&columns.date)? {
            JsonValue::String(s) => date_or_err(s, row)?,
            other => date_or_err(&other.to_string(), row)?,
        };
        let value = match field(&columns.value)? {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| LoadError::BadValue {
            row,
            column: columns.value.clone(),
            value: rec[columns.value.as_str()].to_string(),
        })?;

        observations.push(Observation::new(label, date, value));
    }

    Ok(ObservationTable::from_observations(observations))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// The label column is read as text, the value column is cast to Float64,
/// the date column may be text, Date32/Date64 or a timestamp.
fn load_parquet(path: &Path, columns: &ColumnNames) -> Result<ObservationTable> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut observations = Vec::new();
    let mut row_base = 0;

    for batch in reader {
        let batch = batch?;
        let schema = batch.schema();
        let column = |name: &str| -> Result<Arc<dyn Array>> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn {
                    column: name.to_string(),
                })?;
            Ok(batch.column(idx).clone())
        };

        let labels = cast(&column(&columns.label)?, &DataType::Utf8)?;
        let labels = downcast::<StringArray>(&labels, &columns.label)?;
        let values = cast(&column(&columns.value)?, &DataType::Float64)?;
        let values = downcast::<Float64Array>(&values, &columns.value)?;
        let dates = column(&columns.date)?;

        let text_dates = matches!(dates.data_type(), DataType::Utf8 | DataType::LargeUtf8);
        let dates = if text_dates {
            cast(&dates, &DataType::Utf8)?
        } else {
            cast(&dates, &DataType::Date32)?
        };
        let (text, days) = if text_dates {
            (Some(downcast::<StringArray>(&dates, &columns.date)?), None)
        } else {
            (None, Some(downcast::<Date32Array>(&dates, &columns.date)?))
        };

        for i in 0..batch.num_rows() {
            let row = row_base + i;
            let missing_date = || LoadError::BadDate {
                row,
                value: String::new(),
            };
            if dates.is_null(i) {
                return Err(missing_date());
            }
            let date = match (text, days) {
                (Some(text), _) => date_or_err(text.value(i), row)?,
                (_, Some(days)) => days.value_as_date(i).ok_or_else(missing_date)?,
                (None, None) => return Err(missing_date()),
            };
            if values.is_null(i) {
                return Err(LoadError::BadValue {
                    row,
                    column: columns.value.clone(),
                    value: String::new(),
                });
            }
            let label = if labels.is_null(i) { "" } else { labels.value(i) };

            observations.push(Observation::new(label, date, values.value(i)));
        }
        row_base += batch.num_rows();
    }

    Ok(ObservationTable::from_observations(observations))
}

fn downcast<'a, T: 'static>(array: &'a Arc<dyn Array>, column: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| LoadError::BadValue {
            row: 0,
            column: column.to_string(),
            value: format!("{:?}", array.data_type()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{ArrayRef, Float32Array, Int64Array, TimestampMillisecondArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_date_accepts_iso_and_month_first() {
        assert_eq!(parse_date("2023-02-01"), Some(d(2023, 2, 1)));
        assert_eq!(parse_date("2023-02-01 00:00:00"), Some(d(2023, 2, 1)));
        assert_eq!(parse_date("2023-02-01T12:30:00"), Some(d(2023, 2, 1)));
        assert_eq!(parse_date("2023-02-01T12:30:00Z"), Some(d(2023, 2, 1)));
        assert_eq!(parse_date("02/01/2023"), Some(d(2023, 2, 1)));
        // Day-first dates are not accepted.
        assert_eq!(parse_date("25/01/2023"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn csv_reads_required_columns_and_ignores_others() {
        let data = "system:index,UAI,Date,NDVI,.geo\n\
                    0,UAI 1,2023-01-01,0.41,{}\n\
                    1,UAI 2,01/17/2023,0.38,{}\n";
        let table = read_csv(data.as_bytes(), &ColumnNames::default()).unwrap();
        assert_eq!(
            table.observations,
            vec![
                Observation::new("UAI 1", d(2023, 1, 1), 0.41),
                Observation::new("UAI 2", d(2023, 1, 17), 0.38),
            ]
        );
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let data = "UAI,NDVI\nUAI 1,0.4\n";
        match read_csv(data.as_bytes(), &ColumnNames::default()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "Date"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_missing_identifier_column_is_reported() {
        let data = "Zone,Date,NDVI\nUAI 1,2023-01-01,0.4\n";
        match read_csv(data.as_bytes(), &ColumnNames::default()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "UAI"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_bad_date_and_value_fail_fast() {
        let bad_date = "UAI,Date,NDVI\nUAI 1,2023-01-01,0.4\nUAI 1,not-a-date,0.5\n";
        assert!(matches!(
            read_csv(bad_date.as_bytes(), &ColumnNames::default()),
            Err(LoadError::BadDate { row: 1, .. })
        ));

        let bad_value = "UAI,Date,NDVI\nUAI 1,2023-01-01,\n";
        assert!(matches!(
            read_csv(bad_value.as_bytes(), &ColumnNames::default()),
            Err(LoadError::BadValue { row: 0, .. })
        ));
    }

    #[test]
    fn csv_header_only_is_an_empty_table() {
        let table = read_csv("UAI,Date,NDVI\n".as_bytes(), &ColumnNames::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn csv_honours_custom_column_names() {
        let columns = ColumnNames {
            label: "zone".to_string(),
            date: "day".to_string(),
            value: "ndvi".to_string(),
        };
        let data = "zone,day,ndvi\nMCDA UAI 3,2023-04-01,0.6\n";
        let table = read_csv(data.as_bytes(), &columns).unwrap();
        assert_eq!(table.labels(), vec!["MCDA UAI 3"]);
    }

    #[test]
    fn json_records_are_loaded() {
        let data = r#"[
            {"UAI": "UAI 1", "Date": "2023-01-01", "NDVI": 0.4},
            {"UAI": "UAI 1", "Date": "2023-02-01", "NDVI": "0.5"}
        ]"#;
        let table = read_json(data.as_bytes(), &ColumnNames::default()).unwrap();
        assert_eq!(table.series_for("UAI 1"), vec![(d(2023, 1, 1), 0.4), (d(2023, 2, 1), 0.5)]);
    }

    #[test]
    fn json_missing_field_is_reported() {
        let data = r#"[{"UAI": "UAI 1", "NDVI": 0.4}]"#;
        assert!(matches!(
            read_json(data.as_bytes(), &ColumnNames::default()),
            Err(LoadError::MissingColumn { .. })
        ));
    }

    #[test]
    fn load_table_distinguishes_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");
        assert!(matches!(
            load_table(&missing, &ColumnNames::default()),
            Err(LoadError::NotFound(_))
        ));

        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "hello").unwrap();
        assert!(matches!(
            load_table(&txt, &ColumnNames::default()),
            Err(LoadError::UnsupportedExtension(_))
        ));

        let csv_path = dir.path().join("ndvi.csv");
        let mut f = std::fs::File::create(&csv_path).unwrap();
        writeln!(f, "UAI,Date,NDVI\nUAI 4,2023-06-01,0.7").unwrap();
        drop(f);
        let table = load_table(&csv_path, &ColumnNames::default()).unwrap();
        assert_eq!(table.len(), 1);
    }

    fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> (tempfile::TempDir, std::path::PathBuf) {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(
            schema.clone(),
            columns.into_iter().map(|(_, array)| array).collect(),
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ndvi.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        (dir, path)
    }

    fn labels() -> ArrayRef {
        Arc::new(StringArray::from(vec!["UAI 1", "UAI 2"]))
    }

    #[test]
    fn parquet_with_date32_column_is_loaded() {
        // 19358 days after 1970-01-01 is 2023-01-01.
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            ("Date", Arc::new(Date32Array::from(vec![19358, 19359]))),
            ("NDVI", Arc::new(Float64Array::from(vec![0.3, 0.6]))),
        ]);

        let table = load_table(&path, &ColumnNames::default()).unwrap();
        assert_eq!(
            table.observations,
            vec![
                Observation::new("UAI 1", d(2023, 1, 1), 0.3),
                Observation::new("UAI 2", d(2023, 1, 2), 0.6),
            ]
        );
    }

    #[test]
    fn parquet_text_dates_and_float32_values_are_loaded() {
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            ("Date", Arc::new(StringArray::from(vec!["2023-01-01", "02/15/2023"]))),
            ("NDVI", Arc::new(Float32Array::from(vec![0.5f32, 0.25]))),
        ]);

        let table = load_table(&path, &ColumnNames::default()).unwrap();
        assert_eq!(
            table.observations,
            vec![
                Observation::new("UAI 1", d(2023, 1, 1), 0.5),
                Observation::new("UAI 2", d(2023, 2, 15), 0.25),
            ]
        );
    }

    #[test]
    fn parquet_timestamp_dates_and_integer_values_are_loaded() {
        // 2023-01-01T12:00:00Z and 2023-03-05T00:00:00Z in milliseconds.
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            (
                "Date",
                Arc::new(TimestampMillisecondArray::from(vec![
                    1_672_574_400_000,
                    1_677_974_400_000,
                ])),
            ),
            ("NDVI", Arc::new(Int64Array::from(vec![1, 0]))),
        ]);

        let table = load_table(&path, &ColumnNames::default()).unwrap();
        assert_eq!(
            table.observations,
            vec![
                Observation::new("UAI 1", d(2023, 1, 1), 1.0),
                Observation::new("UAI 2", d(2023, 3, 5), 0.0),
            ]
        );
    }

    #[test]
    fn parquet_null_text_date_is_a_bad_date() {
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            ("Date", Arc::new(StringArray::from(vec![Some("2023-01-01"), None]))),
            ("NDVI", Arc::new(Float64Array::from(vec![0.3, 0.6]))),
        ]);

        assert!(matches!(
            load_table(&path, &ColumnNames::default()),
            Err(LoadError::BadDate { row: 1, .. })
        ));
    }

    #[test]
    fn parquet_unparsable_text_date_is_a_bad_date() {
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            ("Date", Arc::new(StringArray::from(vec!["2023-01-01", "31/12/2023"]))),
            ("NDVI", Arc::new(Float64Array::from(vec![0.3, 0.6]))),
        ]);

        match load_table(&path, &ColumnNames::default()) {
            Err(LoadError::BadDate { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "31/12/2023");
            }
            other => panic!("expected BadDate, got {other:?}"),
        }
    }

    #[test]
    fn parquet_null_ndvi_is_a_bad_value() {
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            ("Date", Arc::new(Date32Array::from(vec![19358, 19359]))),
            ("NDVI", Arc::new(Float64Array::from(vec![None, Some(0.6)]))),
        ]);

        match load_table(&path, &ColumnNames::default()) {
            Err(LoadError::BadValue { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "NDVI");
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let (_dir, path) = write_parquet(vec![
            ("UAI", labels()),
            ("NDVI", Arc::new(Float64Array::from(vec![0.3, 0.6]))),
        ]);

        match load_table(&path, &ColumnNames::default()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "Date"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
