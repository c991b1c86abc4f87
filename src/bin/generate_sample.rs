//! Writes synthetic NDVI time series for every file the dashboard expects.
//!
//! Usage: `generate_sample [OUTPUT_DIR] [--parquet]` (default `assets`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    label: String,
    date: NaiveDate,
    ndvi: f64,
}

/// Seasonal NDVI: green peak in the Feb–Mar rains, trough in the dry season.
fn seasonal_ndvi(date: NaiveDate, base: f64, amplitude: f64) -> f64 {
    let phase = (date.ordinal() as f64 - 60.0) / 365.25 * 2.0 * std::f64::consts::PI;
    base + amplitude * phase.cos()
}

fn generate(prefix: &str, zones: u32, step_days: i64, rng: &mut SimpleRng) -> Vec<Row> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();

    let mut rows = Vec::new();
    for zone in 1..=zones {
        let base = 0.35 + 0.03 * zone as f64;
        let amplitude = 0.15 + 0.01 * (zone % 4) as f64;
        let mut date = start;
        while date <= end {
            let ndvi = (seasonal_ndvi(date, base, amplitude) + rng.gauss(0.0, 0.02)).clamp(-1.0, 1.0);
            rows.push(Row {
                label: format!("{prefix} {zone}"),
                date,
                ndvi,
            });
            date += Duration::days(step_days);
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["UAI", "Date", "NDVI"])?;
    for row in rows {
        writer.write_record([
            row.label.clone(),
            row.date.format("%Y-%m-%d").to_string(),
            format!("{:.4}", row.ndvi),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let schema = Arc::new(Schema::new(vec![
        Field::new("UAI", DataType::Utf8, false),
        Field::new("Date", DataType::Date32, false),
        Field::new("NDVI", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(
                rows.iter()
                    .map(|r| (r.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.ndvi).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parquet = args.iter().any(|a| a == "--parquet");
    let out_dir = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("assets");
    let out_dir = Path::new(out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // MODIS: 16-day composites, VIIRS: 8-day composites.
    let files = [
        ("Bangweulu_MODIS_NDVI_TimeSeries_UAIs", "UAI", 16),
        ("Bangweulu_VIIRS_NDVI_TimeSeries_UAIs", "UAI", 8),
        ("Bangweulu_MODIS_NDVI_TimeSeries_MCDA_UAIs", "MCDA UAI", 16),
        ("Bangweulu_VIIRS_NDVI_TimeSeries_MCDA_UAIs", "MCDA UAI", 8),
    ];

    for (stem, prefix, step) in files {
        let rows = generate(prefix, 7, step, &mut rng);
        let csv_path = out_dir.join(format!("{stem}.csv"));
        write_csv(&csv_path, &rows)?;
        println!("Wrote {} observations to {}", rows.len(), csv_path.display());

        if parquet {
            let pq_path = out_dir.join(format!("{stem}.parquet"));
            write_parquet(&pq_path, &rows)?;
            println!("Wrote {}", pq_path.display());
        }
    }

    Ok(())
}
