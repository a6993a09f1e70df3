//! Crawler module for listing page fetching and ingestion
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching of listing pages
//! - Record extraction from listing markup
//! - Per-page workers that feed records to a sink
//! - The dispatcher that fans workers out and joins them

mod dispatcher;
mod extractor;
mod fetcher;
mod info;
mod worker;

#[cfg(test)]
mod testing;

pub use dispatcher::{Dispatcher, HarvestSummary, PageFailure};
pub use extractor::PageExtractor;
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use info::{extract_year, split_info, InfoFields};
pub use worker::{process_page, run_worker, PageOutcome, PageReport};

use crate::config::Config;
use crate::storage::open_storage;
use std::sync::Arc;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Open the storage and its connection pool
/// 2. Build the HTTP client
/// 3. Launch one worker per configured page offset
/// 4. Wait for every worker and summarize
///
/// Per-page failures end up in the summary; only setup failures
/// (storage, client) are returned as errors.
///
/// # Arguments
///
/// * `config` - The harvest configuration
pub async fn harvest(config: &Config) -> crate::Result<HarvestSummary> {
    let storage = Arc::new(open_storage(&config.storage)?);
    let fetcher = Arc::new(HttpFetcher::from_config(&config.crawler, &config.request)?);
    let dispatcher = Dispatcher::new(fetcher, PageExtractor::new(), storage);

    Ok(dispatcher.run(&config.page_offsets()).await)
}
