//! Time-series export: one CSV row per tick, plus read-back for charting.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

pub const CSV_HEADER: &str = "tick,female,male";

/// Population counts as observed at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSeriesRow {
    pub tick: u64,
    pub female: u64,
    pub male: u64,
}

/// Where the simulation sends its per-tick rows.
pub trait RowSink {
    fn emit(&mut self, row: &TimeSeriesRow) -> Result<()>;
}

impl RowSink for Vec<TimeSeriesRow> {
    fn emit(&mut self, row: &TimeSeriesRow) -> Result<()> {
        self.push(*row);
        Ok(())
    }
}

pub fn csv_file_name(species: &str) -> String {
    format!("{species}_population.csv")
}

/// Appends one CSV row per tick to `{species}_population.csv`.
pub struct CsvSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl CsvSink {
    pub fn create(out_dir: impl AsRef<Path>, species: &str) -> Result<Self> {
        let path = out_dir.as_ref().join(csv_file_name(species));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create csv file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(Self { writer, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered rows and hand back the file path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush csv file {}", self.path.display()))?;
        Ok(self.path)
    }
}

impl RowSink for CsvSink {
    fn emit(&mut self, row: &TimeSeriesRow) -> Result<()> {
        writeln!(self.writer, "{},{},{}", row.tick, row.female, row.male)
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        Ok(())
    }
}

/// Read a finished export back into memory for the chart renderer.
pub fn read_series(path: impl AsRef<Path>) -> Result<Vec<TimeSeriesRow>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read csv file {}", path.display()))?;
    let mut lines = data.lines();
    match lines.next() {
        Some(header) if header.trim() == CSV_HEADER => {}
        other => bail!(
            "{}: expected header '{CSV_HEADER}', found {:?}",
            path.display(),
            other
        ),
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let mut next_int = |name: &str| -> Result<u64> {
            fields
                .next()
                .and_then(|field| field.trim().parse().ok())
                .with_context(|| {
                    format!("{} line {}: bad '{name}' field", path.display(), index + 2)
                })
        };
        rows.push(TimeSeriesRow {
            tick: next_int("tick")?,
            female: next_int("female")?,
            male: next_int("male")?,
        });
    }
    Ok(rows)
}
