use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sheetroll::config::{DEFAULT_HARD_BYTES, DEFAULT_TITLE_PREFIX};
use sheetroll::{split, Dataset, JsonRegistry, MeasureUnit, Registry, RotationEngine, UploadConfig};

#[derive(Parser)]
#[command(name = "sheetroll-plan")]
#[command(about = "Dry-run the chunk/target plan for one store's CSV export")]
struct Cli {
    /// Input CSV export path
    #[arg(long)]
    input: PathBuf,

    /// Store identifier
    #[arg(long)]
    store: String,

    /// Registry JSON path (store -> ordered spreadsheet ids)
    #[arg(long)]
    registry: PathBuf,

    /// Chunk size threshold, in the selected unit
    #[arg(long, default_value_t = DEFAULT_HARD_BYTES)]
    threshold: u64,

    /// Measurement unit (rows or bytes)
    #[arg(long, default_value = "bytes")]
    unit: MeasureUnit,

    /// Title prefix for spreadsheets that would be provisioned
    #[arg(long, default_value = DEFAULT_TITLE_PREFIX)]
    title_prefix: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let registry = JsonRegistry::open(&cli.registry)
        .with_context(|| format!("open registry {}", cli.registry.display()))?;
    let dataset = Dataset::from_csv_path(&cli.input)
        .with_context(|| format!("read csv {}", cli.input.display()))?;

    let mut config = UploadConfig::new(cli.threshold, cli.unit);
    config.title_prefix = cli.title_prefix;

    let chunks = split(&dataset, &config)?;
    // Read-only: report the current target, or the title a real run would
    // provision under, without touching the registry.
    let engine = RotationEngine::new(registry, config.title_prefix.clone());
    let target = match engine.registry().current_target(&cli.store) {
        Some(id) => id.to_string(),
        None => format!("(new: {})", engine.next_title(&cli.store)),
    };

    println!(
        "plan store={} rows={} chunks={} unit={} threshold={}",
        cli.store,
        dataset.row_count(),
        chunks.len(),
        config.unit,
        config.size_threshold
    );
    for (index, chunk) in chunks.iter().enumerate() {
        let (start, end) = chunk.row_range();
        println!(
            "chunk {index}: rows {start}..{end} size={} target={target}",
            chunk.measured_size(config.unit)
        );
    }
    if chunks.len() > 1 {
        println!("note: later chunks rotate to new spreadsheets as targets fill");
    }

    Ok(())
}
