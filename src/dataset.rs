//! In-memory tabular exports: a fixed header plus ordered string rows.

use std::path::Path;

use crate::config::MeasureUnit;
use crate::Result;

/// An ordered set of records with a shared header, as loaded from one
/// store's CSV export. Rows are kept as strings; the core never interprets
/// cell contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Reads a CSV export. Short rows are padded to header width so that
    /// ragged exports (hand-edited sheets) still line up by column.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path.as_ref())?;
        let header: Vec<String> = reader
            .headers()?
            .iter()
            .map(|field| field.to_string())
            .collect();
        let width = header.len();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
            if row.len() < width {
                row.resize(width, String::new());
            }
            rows.push(row);
        }
        Ok(Self { header, rows })
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path.as_ref())?;
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Measured size of the data rows. The header is excluded so that the
    /// measure of a dataset equals the sum of its chunks' measures.
    pub fn measured_size(&self, unit: MeasureUnit) -> u64 {
        self.rows.iter().map(|row| row_measure(row, unit)).sum()
    }
}

/// Measure of one row: 1 in row units, or the serialized CSV length in byte
/// units (field bytes plus comma separators plus a newline). The classifier
/// and splitter both go through this function.
pub fn row_measure(row: &[String], unit: MeasureUnit) -> u64 {
    match unit {
        MeasureUnit::Rows => 1,
        MeasureUnit::Bytes => {
            let fields: u64 = row.iter().map(|field| field.len() as u64).sum();
            let separators = row.len().saturating_sub(1) as u64;
            fields + separators + 1
        }
    }
}

/// A contiguous run of a dataset's rows bound for one spreadsheet, carrying
/// the shared header and its absolute position in the source dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row_start: usize,
}

impl Chunk {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>, row_start: usize) -> Self {
        Self {
            header,
            rows,
            row_start,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Absolute half-open row range `[start, end)` within the source dataset.
    pub fn row_range(&self) -> (usize, usize) {
        (self.row_start, self.row_start + self.rows.len())
    }

    pub fn measured_size(&self, unit: MeasureUnit) -> u64 {
        self.rows.iter().map(|row| row_measure(row, unit)).sum()
    }
}
