//! Export of simulated series as CSV or JSON.
//!
//! Files are written atomically: the data goes to a temp file in the
//! destination directory, is synced, then renamed over the target.

use crate::{ClampPolicy, Error, RegimenParameters, Result, Series, SeriesSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

/// How a series is rendered for output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidInput {
                field: "format",
                value: other.to_string(),
            }),
        }
    }
}

/// Everything needed to reproduce and plot one run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    pub parameters: RegimenParameters,
    pub clamp_policy: ClampPolicy,
    pub summary: SeriesSummary,
    pub samples: Series,
}

impl SimulationReport {
    pub fn new(
        parameters: RegimenParameters,
        clamp_policy: ClampPolicy,
        summary: SeriesSummary,
        samples: Series,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            parameters,
            clamp_policy,
            summary,
            samples,
        }
    }
}

/// Write `time,quantity` rows with a header line
pub fn write_csv<W: Write>(series: &Series, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for sample in series {
        writer.serialize(sample)?;
    }

    writer.flush()?;
    tracing::debug!("Wrote {} samples as CSV", series.len());
    Ok(())
}

/// Render the series as CSV text
pub fn to_csv(series: &Series) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(series, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Render a report as pretty JSON. NaN and infinite quantities become `null`.
pub fn to_json(report: &SimulationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    // Temp file must live on the same filesystem for the rename to be atomic
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}
