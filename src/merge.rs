//! Recombining a store's rotated sheet history into one dataset.
//!
//! Rotation splits a store's inventory across spreadsheets over time, and
//! operators occasionally add columns between rotations. The merge aligns
//! columns by name: the output header is the union of part headers in
//! first-seen order, and cells a part never had come back empty.

use crate::dataset::Dataset;
use crate::registry::{Registry, SpreadsheetId};
use crate::Result;

/// External capability that reads a whole spreadsheet back as a dataset.
pub trait SheetReader {
    fn read_sheet(&mut self, id: &SpreadsheetId) -> Result<Dataset>;
}

/// Concatenates parts in order under a column-union header. Parts with no
/// rows are skipped.
pub fn merge_datasets(parts: &[Dataset]) -> Dataset {
    let mut union: Vec<String> = Vec::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        for column in part.header() {
            if !union.contains(column) {
                union.push(column.clone());
            }
        }
    }

    let mut rows = Vec::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        let positions: Vec<Option<usize>> = union
            .iter()
            .map(|column| part.header().iter().position(|c| c == column))
            .collect();
        for row in part.rows() {
            let aligned: Vec<String> = positions
                .iter()
                .map(|position| match position {
                    Some(index) => row.get(*index).cloned().unwrap_or_default(),
                    None => String::new(),
                })
                .collect();
            rows.push(aligned);
        }
    }

    Dataset::new(union, rows)
}

/// Reads every spreadsheet in the store's registry history, oldest first,
/// and merges them into one dataset.
pub fn merge_history(
    registry: &dyn Registry,
    store: &str,
    reader: &mut dyn SheetReader,
) -> Result<Dataset> {
    let ids = registry.all(store);
    log::info!("merging store={store}: {} sheet(s)", ids.len());
    let mut parts = Vec::with_capacity(ids.len());
    for id in ids {
        parts.push(reader.read_sheet(id)?);
    }
    Ok(merge_datasets(&parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn merge_aligns_new_columns() {
        let old = Dataset::new(
            row(&["sku", "qty"]),
            vec![row(&["a-1", "5"])],
        );
        let new = Dataset::new(
            row(&["sku", "qty", "colour"]),
            vec![row(&["b-1", "2", "BLAC"])],
        );

        let merged = merge_datasets(&[old, new]);
        assert_eq!(merged.header(), row(&["sku", "qty", "colour"]).as_slice());
        assert_eq!(merged.rows()[0], row(&["a-1", "5", ""]));
        assert_eq!(merged.rows()[1], row(&["b-1", "2", "BLAC"]));
    }

    #[test]
    fn empty_parts_are_skipped() {
        let empty = Dataset::new(row(&["sku"]), Vec::new());
        let full = Dataset::new(row(&["sku"]), vec![row(&["a-1"])]);
        let merged = merge_datasets(&[empty, full]);
        assert_eq!(merged.row_count(), 1);
        assert_eq!(merged.header(), row(&["sku"]).as_slice());
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged = merge_datasets(&[]);
        assert!(merged.is_empty());
        assert!(merged.header().is_empty());
    }
}
