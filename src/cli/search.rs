//! Search command implementation

use anyhow::Result;
use std::sync::Arc;

use crate::cli::{build_pipeline, OutputFormat, SearchArgs};
use crate::core::config::Config;
use crate::index::TantivyBackend;
use crate::output::format_response;
use crate::service::NameSearchService;

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let limit = args.limit.unwrap_or(config.search.default_limit);

    let backend = Arc::new(TantivyBackend::from_home()?);
    let service = NameSearchService::new(build_pipeline(&config, args.local), backend, &config.search);

    let response = service.search(&args.query, limit).await?;

    print!("{}", format_response(&response, OutputFormat::from_flag(args.json)));
    Ok(())
}
