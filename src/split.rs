//! Size classification and contiguous splitting of oversized datasets.
//!
//! Works like segment rollover in an append-only store: rows are packed into
//! the current chunk until the next row would push it past the threshold,
//! then a new chunk is started. Greedy packing yields the minimum number of
//! contiguous chunks because row measures are additive.

use crate::config::{MeasureUnit, UploadConfig};
use crate::dataset::{row_measure, Chunk, Dataset};
use crate::{Error, Result};

/// Whether a dataset fits one spreadsheet unit or must be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Fits,
    Oversized,
}

/// Pure classification against the threshold. An empty dataset always fits.
pub fn classify(dataset: &Dataset, threshold: u64, unit: MeasureUnit) -> Fit {
    if dataset.measured_size(unit) <= threshold {
        Fit::Fits
    } else {
        Fit::Oversized
    }
}

/// Splits a dataset into ordered chunks, each measuring at most the
/// threshold, preserving row order. A fitting dataset comes back as exactly
/// one chunk. Every chunk carries the full header.
///
/// Fails with [`Error::UnsplittableRow`] if any single row alone exceeds the
/// threshold; truncating a row is never acceptable for inventory data.
pub fn split(dataset: &Dataset, config: &UploadConfig) -> Result<Vec<Chunk>> {
    let threshold = config.size_threshold;
    let unit = config.unit;

    if classify(dataset, threshold, unit) == Fit::Fits {
        return Ok(vec![Chunk::new(
            dataset.header().to_vec(),
            dataset.rows().to_vec(),
            0,
        )]);
    }

    let mut chunks = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();
    let mut current_start = 0usize;
    let mut current_size = 0u64;

    for (index, row) in dataset.rows().iter().enumerate() {
        let measured = row_measure(row, unit);
        if measured > threshold {
            return Err(Error::UnsplittableRow {
                row_index: index,
                measured,
                threshold,
            });
        }
        if current_size + measured > threshold && !current.is_empty() {
            chunks.push(Chunk::new(
                dataset.header().to_vec(),
                std::mem::take(&mut current),
                current_start,
            ));
            current_start = index;
            current_size = 0;
        }
        current.push(row.clone());
        current_size += measured;
    }
    if !current.is_empty() {
        chunks.push(Chunk::new(
            dataset.header().to_vec(),
            current,
            current_start,
        ));
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: usize) -> Dataset {
        let header = vec!["sku".to_string(), "qty".to_string()];
        let rows = (0..rows)
            .map(|i| vec![format!("sku-{i}"), "1".to_string()])
            .collect();
        Dataset::new(header, rows)
    }

    #[test]
    fn empty_dataset_fits() {
        let ds = Dataset::new(vec!["sku".to_string()], Vec::new());
        assert_eq!(classify(&ds, 0, MeasureUnit::Rows), Fit::Fits);
        assert_eq!(classify(&ds, 0, MeasureUnit::Bytes), Fit::Fits);
    }

    #[test]
    fn fitting_dataset_is_one_chunk() {
        let ds = dataset(10);
        let config = UploadConfig::new(10, MeasureUnit::Rows);
        let chunks = split(&ds, &config).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].rows(), ds.rows());
        assert_eq!(chunks[0].row_range(), (0, 10));
    }

    #[test]
    fn chunk_boundaries_are_contiguous() {
        let ds = dataset(7);
        let config = UploadConfig::new(3, MeasureUnit::Rows);
        let chunks = split(&ds, &config).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].row_range(), (0, 3));
        assert_eq!(chunks[1].row_range(), (3, 6));
        assert_eq!(chunks[2].row_range(), (6, 7));
        for chunk in &chunks {
            assert_eq!(chunk.header(), ds.header());
        }
    }

    #[test]
    fn byte_split_respects_threshold_per_chunk() {
        let ds = dataset(20);
        let per_row = row_measure(&ds.rows()[19], MeasureUnit::Bytes);
        let config = UploadConfig::new(per_row * 3, MeasureUnit::Bytes);
        let chunks = split(&ds, &config).unwrap();
        for chunk in &chunks {
            assert!(chunk.measured_size(MeasureUnit::Bytes) <= config.size_threshold);
        }
        let total: usize = chunks.iter().map(|c| c.rows().len()).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn single_oversized_row_is_rejected() {
        let header = vec!["blob".to_string()];
        let ds = Dataset::new(header, vec![vec!["x".repeat(100)]]);
        let config = UploadConfig::new(50, MeasureUnit::Bytes);
        let err = split(&ds, &config).unwrap_err();
        assert!(matches!(err, Error::UnsplittableRow { row_index: 0, .. }));
    }
}
