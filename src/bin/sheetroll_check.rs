use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sheetroll::config::DEFAULT_TITLE_PREFIX;
use sheetroll::{find_parts, latest_part, JsonRegistry, SizeLevel, SizeLevels};

const MIB: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(name = "sheetroll-check")]
#[command(about = "Report sizes of exported part CSVs against rotation thresholds")]
struct Cli {
    /// Directory holding exported part files
    #[arg(long)]
    dir: PathBuf,

    /// Store to check; repeatable. Defaults to every store in the registry.
    #[arg(long = "store")]
    stores: Vec<String>,

    /// Registry JSON path, used to enumerate stores when none are given
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Part filename prefix
    #[arg(long, default_value = DEFAULT_TITLE_PREFIX)]
    prefix: String,

    /// Warn threshold in MiB
    #[arg(long, default_value_t = 40)]
    warn_mb: u64,

    /// Alert threshold in MiB
    #[arg(long, default_value_t = 50)]
    alert_mb: u64,

    /// Hard (rotation) threshold in MiB
    #[arg(long, default_value_t = 60)]
    hard_mb: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let stores = if cli.stores.is_empty() {
        let Some(path) = cli.registry.as_ref() else {
            bail!("pass --store at least once or --registry to enumerate stores");
        };
        let registry = JsonRegistry::open(path)
            .with_context(|| format!("open registry {}", path.display()))?;
        registry.stores().map(str::to_string).collect()
    } else {
        cli.stores.clone()
    };

    let levels = SizeLevels {
        warn_bytes: cli.warn_mb * MIB,
        alert_bytes: cli.alert_mb * MIB,
        hard_bytes: cli.hard_mb * MIB,
    };

    for store in &stores {
        let parts = find_parts(&cli.dir, &cli.prefix, store)
            .with_context(|| format!("scan {}", cli.dir.display()))?;
        if parts.is_empty() {
            println!("store {store}: no parts found");
            continue;
        }
        for part in &parts {
            println!(
                "store {store}: part {} {} {:.2} MiB",
                part.index,
                part.path.display(),
                part.size_bytes as f64 / MIB as f64
            );
        }
        if let Some(latest) = latest_part(&parts) {
            let level = SizeLevel::classify(latest.size_bytes, &levels);
            println!(
                "store {store}: latest part {} -> [{level}] {:.2} MiB",
                latest.index,
                latest.size_bytes as f64 / MIB as f64
            );
            if level == SizeLevel::Hard {
                log::warn!("store {store} is at the hard limit; next upload will rotate");
            }
        }
    }

    Ok(())
}
