use sheetroll::{classify, split, Dataset, Error, Fit, MeasureUnit, UploadConfig};
use tempfile::tempdir;

fn inventory_dataset(rows: usize) -> Dataset {
    let header = vec![
        "sku".to_string(),
        "variant_id".to_string(),
        "qty".to_string(),
    ];
    let rows = (0..rows)
        .map(|i| {
            vec![
                format!("TS-BLAC-{i}"),
                format!("gid://product-variant/{i}"),
                (i % 40).to_string(),
            ]
        })
        .collect();
    Dataset::new(header, rows)
}

#[test]
fn concatenated_chunks_reproduce_row_order() {
    let dataset = inventory_dataset(1_234);
    let config = UploadConfig::new(100, MeasureUnit::Rows);

    let chunks = split(&dataset, &config).expect("split");
    let rebuilt: Vec<Vec<String>> = chunks
        .iter()
        .flat_map(|chunk| chunk.rows().iter().cloned())
        .collect();
    assert_eq!(rebuilt, dataset.rows());

    // Chunk ranges tile the dataset without gaps or overlap.
    let mut expected_start = 0;
    for chunk in &chunks {
        let (start, end) = chunk.row_range();
        assert_eq!(start, expected_start);
        expected_start = end;
    }
    assert_eq!(expected_start, dataset.row_count());
}

#[test]
fn quarter_million_rows_split_into_three_chunks() {
    let dataset = inventory_dataset(250_000);
    let config = UploadConfig::new(100_000, MeasureUnit::Rows);

    let chunks = split(&dataset, &config).expect("split");
    let sizes: Vec<usize> = chunks.iter().map(|chunk| chunk.rows().len()).collect();
    assert_eq!(sizes, [100_000, 100_000, 50_000]);
    for chunk in &chunks {
        assert_eq!(chunk.header(), dataset.header());
    }
}

#[test]
fn oversized_single_row_is_unsplittable() {
    let dataset = Dataset::new(
        vec!["sku".to_string(), "notes".to_string()],
        vec![vec!["TS-1".to_string(), "y".repeat(4096)]],
    );
    let config = UploadConfig::new(1024, MeasureUnit::Bytes);

    let err = split(&dataset, &config).expect_err("must refuse");
    match err {
        Error::UnsplittableRow {
            row_index,
            measured,
            threshold,
        } => {
            assert_eq!(row_index, 0);
            assert!(measured > threshold);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn classification_is_pure() {
    let dataset = inventory_dataset(50);
    for _ in 0..3 {
        assert_eq!(classify(&dataset, 50, MeasureUnit::Rows), Fit::Fits);
        assert_eq!(classify(&dataset, 49, MeasureUnit::Rows), Fit::Oversized);
    }
}

#[test]
fn empty_dataset_fits_as_one_empty_chunk() {
    let dataset = Dataset::new(vec!["sku".to_string()], Vec::new());
    assert_eq!(classify(&dataset, 0, MeasureUnit::Bytes), Fit::Fits);

    let config = UploadConfig::new(0, MeasureUnit::Bytes);
    let chunks = split(&dataset, &config).expect("split");
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].rows().is_empty());
    assert_eq!(chunks[0].row_range(), (0, 0));
}

#[test]
fn csv_round_trip_preserves_dataset() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("inventory_map_acme_1.csv");

    let dataset = inventory_dataset(32);
    dataset.write_csv_path(&path).expect("write csv");
    let reloaded = Dataset::from_csv_path(&path).expect("read csv");
    assert_eq!(reloaded, dataset);
}
