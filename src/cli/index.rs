//! Index command implementation

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::cli::{build_pipeline, IndexArgs};
use crate::core::config::Config;
use crate::index::TantivyBackend;
use crate::pipeline::NameRecord;
use crate::service::NameSearchService;

/// Run the index command
pub async fn run(args: IndexArgs) -> Result<()> {
    let start = Instant::now();

    let config = Config::load()?;
    Config::ensure_home()?;

    let content = std::fs::read_to_string(&args.records)
        .with_context(|| format!("Failed to read {}", args.records.display()))?;
    let records: Vec<NameRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of records", args.records.display()))?;

    let backend = Arc::new(TantivyBackend::from_home()?);
    if args.force {
        backend.delete_index(&config.search.index_name)?;
    }

    let service = NameSearchService::new(build_pipeline(&config, args.local), backend, &config.search);
    let count = service.index_records(&records).await?;

    info!(file = %args.records.display(), records = count, "Index command complete");
    println!(
        "Indexed {} records into '{}' in {:.2}s",
        count,
        service.index_name(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
