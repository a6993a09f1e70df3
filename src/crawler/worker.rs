//! Fetch worker: one listing page from request to storage
//!
//! A worker fetches its page, extracts the records and hands each one to the
//! sink. Whatever happens, it sends exactly one [`PageOutcome`] on its
//! completion channel, so the dispatcher's join cannot hang on a failed page.

use crate::crawler::extractor::PageExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::storage::{store_record, RecordSink};
use crate::HarvestError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Per-page counts for a page that was fetched and parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Records extracted (items with a poster URL)
    pub extracted: usize,
    /// Records the sink accepted
    pub saved: usize,
    /// Records the sink rejected
    pub failed: usize,
}

/// Completion signal sent by every worker
#[derive(Debug)]
pub struct PageOutcome {
    pub offset: u32,
    pub result: Result<PageReport, HarvestError>,
}

/// Fetches, extracts and stores one page
///
/// Fetch and parse errors end the page early and are returned; sink
/// failures are counted in the report and never stop the loop.
pub async fn process_page<F, S>(
    offset: u32,
    fetcher: &F,
    extractor: &PageExtractor,
    sink: &Arc<S>,
) -> Result<PageReport, HarvestError>
where
    F: PageFetcher + ?Sized,
    S: RecordSink + 'static,
{
    let url = fetcher.page_url(offset);
    let body = fetcher.fetch_page(offset).await?;
    let records = extractor.parse_page(&body, &url)?;

    let mut report = PageReport {
        extracted: records.len(),
        ..Default::default()
    };

    for record in records {
        tracing::info!("{}", record);

        let sink = Arc::clone(sink);
        let saved = tokio::task::spawn_blocking(move || store_record(sink.as_ref(), &record))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Insert task for offset {} died: {}", offset, e);
                false
            });

        if saved {
            report.saved += 1;
        } else {
            report.failed += 1;
        }
    }

    Ok(report)
}

/// Runs one page to completion and signals `done` exactly once
///
/// # Arguments
///
/// * `offset` - Result offset of the page to fetch
/// * `fetcher` - Page source
/// * `extractor` - Listing extractor
/// * `sink` - Where records are stored
/// * `done` - Completion channel; skipped when `None`
pub async fn run_worker<F, S>(
    offset: u32,
    fetcher: Arc<F>,
    extractor: Arc<PageExtractor>,
    sink: Arc<S>,
    done: Option<mpsc::Sender<PageOutcome>>,
) where
    F: PageFetcher + ?Sized,
    S: RecordSink + 'static,
{
    let result = process_page(offset, fetcher.as_ref(), &extractor, &sink).await;

    match &result {
        Ok(report) => tracing::info!(
            "Page {} done: {} extracted, {} saved, {} failed",
            offset,
            report.extracted,
            report.saved,
            report.failed
        ),
        Err(e) => tracing::error!("Page {} failed: {}", offset, e),
    }

    if let Some(done) = done {
        if done.send(PageOutcome { offset, result }).await.is_err() {
            tracing::debug!("Completion receiver for page {} already gone", offset);
        }
    }
}
