use super::ensure_parent;
use crate::{
    Result, ScraperError,
    output::{self, OutputFormatter},
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub inputs: Vec<PathBuf>,
    pub columns: Vec<String>,
    pub rows_read: usize,
    pub duplicates_removed: usize,
    pub rows_written: usize,
    pub output: PathBuf,
    pub backup: PathBuf,
}

/// Rows from several CSV files, aligned on the union of their headers.
#[derive(Debug, Default)]
struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn column(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        self.columns.push(name.to_string());
        self.index.insert(name.to_string(), self.columns.len() - 1);
        self.columns.len() - 1
    }

    fn read(&mut self, path: &Path) -> Result<usize> {
        let mut reader = csv::Reader::from_path(path)?;
        let mapping: Vec<usize> = reader
            .headers()?
            .clone()
            .iter()
            .map(|h| self.column(h))
            .collect();

        let mut count = 0;
        for record in reader.records() {
            let record = record?;
            let mut row = vec![String::new(); self.columns.len()];
            for (field, &col) in record.iter().zip(&mapping) {
                row[col] = field.to_string();
            }
            self.rows.push(row);
            count += 1;
        }
        Ok(count)
    }

    /// Pads rows read before later files introduced new columns, then drops
    /// exact duplicates keeping the first occurrence.
    fn dedup(&mut self) -> usize {
        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }

        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    fn write(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Concatenates the partial result files in order, removes duplicate rows and
/// writes `output` plus an identical `backup`.
///
/// Nothing is written unless every input exists and parses.
pub fn merge_partials(inputs: &[PathBuf], output: &Path, backup: &Path) -> Result<MergeReport> {
    let missing: Vec<PathBuf> = inputs.iter().filter(|p| !p.exists()).cloned().collect();
    if !missing.is_empty() {
        tracing::warn!(
            "The following files are missing: {}",
            missing
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Err(ScraperError::MergeInputMissing { missing });
    }

    let mut table = Table::default();
    let mut rows_read = 0;
    for input in inputs {
        let count = table.read(input)?;
        tracing::info!("Read {} rows from {}", count, input.display());
        rows_read += count;
    }

    let duplicates_removed = table.dedup();
    if duplicates_removed > 0 {
        tracing::info!("Removed {} duplicate rows", duplicates_removed);
    }

    table.write(output)?;
    tracing::info!("Merged {} rows into {}", table.rows.len(), output.display());

    ensure_parent(backup)?;
    fs::copy(output, backup)?;
    tracing::info!("Created backup at {}", backup.display());

    Ok(MergeReport {
        inputs: inputs.to_vec(),
        columns: table.columns,
        rows_read,
        duplicates_removed,
        rows_written: table.rows.len(),
        output: output.to_path_buf(),
        backup: backup.to_path_buf(),
    })
}

impl OutputFormatter for MergeReport {
    fn format_text(&self) -> String {
        use crate::output::text;
        let mut lines = vec![text::section("Merge")];
        for input in &self.inputs {
            lines.push(text::bullet(&input.display().to_string()));
        }
        lines.push(text::key_value("Rows read", &self.rows_read.to_string()));
        lines.push(text::key_value(
            "Duplicates removed",
            &self.duplicates_removed.to_string(),
        ));
        lines.push(text::success(&format!(
            "Wrote {} rows to {} (backup: {})",
            self.rows_written,
            self.output.display(),
            self.backup.display()
        )));
        lines.join("\n")
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(self, pretty)
    }
}
