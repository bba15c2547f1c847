//! Sample command implementation

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::cli::{build_pipeline, SampleArgs};
use crate::core::config::Config;
use crate::index::TantivyBackend;
use crate::sample;
use crate::service::NameSearchService;

/// Run the sample command
pub async fn run(args: SampleArgs) -> Result<()> {
    let start = Instant::now();

    // Reject a bad count before touching config or the index
    sample::validate_count(args.count)?;

    let config = Config::load()?;
    Config::ensure_home()?;

    let backend = Arc::new(TantivyBackend::from_home()?);
    let service = NameSearchService::new(build_pipeline(&config, args.local), backend, &config.search);
    let count = service.index_sample(args.count).await?;

    info!(records = count, "Sample command complete");
    println!(
        "Indexed {} sample records into '{}' in {:.2}s",
        count,
        service.index_name(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
