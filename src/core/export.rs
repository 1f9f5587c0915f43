use crate::domain::model::Trace;
use crate::domain::ports::Storage;
use crate::utils::error::{NewtonError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TRACE_JSON: &str = "trace.json";
pub const ITERATES_CSV: &str = "iterates.csv";
pub const CURVE_CSV: &str = "curve.csv";
pub const TANGENTS_CSV: &str = "tangents.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Serialize)]
struct TraceDocument<'a> {
    generated_at: DateTime<Utc>,
    message: String,
    #[serde(flatten)]
    trace: &'a Trace,
}

#[derive(Serialize)]
struct IterateRow {
    step: usize,
    x: f64,
    fx: f64,
}

#[derive(Serialize)]
struct TangentRow {
    step: usize,
    x_start: f64,
    y_start: f64,
    x_end: f64,
    y_end: f64,
}

/// Writes a [`Trace`] for an external charting tool.
pub struct TraceExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> TraceExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes every requested format and returns the file names that were produced.
    pub fn export(&self, trace: &Trace, formats: &[OutputFormat]) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in formats {
            match format {
                OutputFormat::Json => {
                    self.write_json(trace)?;
                    written.push(TRACE_JSON.to_string());
                }
                OutputFormat::Csv => {
                    self.write_csv(trace)?;
                    written.extend([ITERATES_CSV, CURVE_CSV, TANGENTS_CSV].map(String::from));
                }
            }
        }

        tracing::debug!("Exported {} files", written.len());
        Ok(written)
    }

    fn write_json(&self, trace: &Trace) -> Result<()> {
        let document = TraceDocument {
            generated_at: Utc::now(),
            message: trace.message(),
            trace,
        };
        let json = serde_json::to_string_pretty(&document)?;
        self.storage.write_file(TRACE_JSON, json.as_bytes())
    }

    fn write_csv(&self, trace: &Trace) -> Result<()> {
        let iterate_rows = trace
            .iterates
            .iter()
            .zip(trace.residuals())
            .enumerate()
            .map(|(step, (x, &fx))| IterateRow { step, x, fx });
        self.storage
            .write_file(ITERATES_CSV, &to_csv(iterate_rows)?)?;

        self.storage
            .write_file(CURVE_CSV, &to_csv(trace.curve_sample().iter())?)?;

        let tangent_rows = trace.tangents().iter().map(|t| TangentRow {
            step: t.step,
            x_start: t.start.x,
            y_start: t.start.y,
            x_end: t.end.x,
            y_end: t.end.y,
        });
        self.storage
            .write_file(TANGENTS_CSV, &to_csv(tangent_rows)?)?;

        Ok(())
    }
}

fn to_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| NewtonError::IoError(e.into_error()))
}
