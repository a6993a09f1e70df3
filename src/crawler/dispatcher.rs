//! Dispatcher - launches one worker per page and joins them
//!
//! Every page in the run gets its own task, all started at once. The
//! dispatcher then waits for one completion signal per task and folds the
//! outcomes into a [`HarvestSummary`]. Per-page failures are collected here
//! instead of aborting the run, so the caller decides pass/fail once every
//! worker has finished.

use crate::crawler::extractor::PageExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::worker::{run_worker, PageOutcome};
use crate::storage::RecordSink;
use crate::HarvestError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// A page that did not complete
#[derive(Debug)]
pub struct PageFailure {
    pub offset: u32,
    pub error: HarvestError,
}

/// Aggregate result of one run
#[derive(Debug, Default)]
pub struct HarvestSummary {
    /// Workers launched
    pub pages: usize,
    pub records_extracted: usize,
    pub records_saved: usize,
    pub records_failed: usize,
    /// Pages whose fetch or parse failed, ordered by offset
    pub failures: Vec<PageFailure>,
    /// Wall-clock time from launch to the last signal
    pub elapsed: Duration,
}

impl HarvestSummary {
    /// Folds worker outcomes into a summary
    pub fn from_outcomes(outcomes: Vec<PageOutcome>, elapsed: Duration) -> Self {
        let mut summary = Self {
            pages: outcomes.len(),
            elapsed,
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.result {
                Ok(report) => {
                    summary.records_extracted += report.extracted;
                    summary.records_saved += report.saved;
                    summary.records_failed += report.failed;
                }
                Err(error) => summary.failures.push(PageFailure {
                    offset: outcome.offset,
                    error,
                }),
            }
        }

        summary.failures.sort_by_key(|failure| failure.offset);
        summary
    }

    /// True when every page was fetched and parsed
    ///
    /// Rejected inserts do not fail the run.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of pages that completed
    pub fn pages_succeeded(&self) -> usize {
        self.pages - self.failures.len()
    }
}

/// Launches page workers and waits for all of them
pub struct Dispatcher<F: ?Sized, S> {
    fetcher: Arc<F>,
    extractor: Arc<PageExtractor>,
    sink: Arc<S>,
}

impl<F, S> Dispatcher<F, S>
where
    F: PageFetcher + ?Sized + 'static,
    S: RecordSink + 'static,
{
    /// Creates a dispatcher over explicitly constructed collaborators
    pub fn new(fetcher: Arc<F>, extractor: PageExtractor, sink: Arc<S>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            sink,
        }
    }

    /// Runs one worker per offset and joins them
    ///
    /// Returns once every worker has signalled. A worker that dies without
    /// signalling (a panic) closes its end of the channel; its offset is then
    /// reported as [`HarvestError::WorkerLost`] rather than waited on.
    ///
    /// # Arguments
    ///
    /// * `offsets` - One entry per page to fetch
    pub async fn run(&self, offsets: &[u32]) -> HarvestSummary {
        let start = Instant::now();
        let (tx, mut rx) = mpsc::channel(offsets.len().max(1));

        tracing::info!("Launching {} page workers", offsets.len());
        for &offset in offsets {
            tokio::spawn(run_worker(
                offset,
                Arc::clone(&self.fetcher),
                Arc::clone(&self.extractor),
                Arc::clone(&self.sink),
                Some(tx.clone()),
            ));
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(offsets.len());
        while outcomes.len() < offsets.len() {
            match rx.recv().await {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }

        if outcomes.len() < offsets.len() {
            outcomes.extend(lost_workers(offsets, &outcomes));
        }

        tracing::info!("All {} page workers reported", offsets.len());
        HarvestSummary::from_outcomes(outcomes, start.elapsed())
    }
}

/// Outcomes for offsets that were launched but never reported
fn lost_workers(offsets: &[u32], reported: &[PageOutcome]) -> Vec<PageOutcome> {
    let mut pending: HashMap<u32, usize> = HashMap::new();
    for &offset in offsets {
        *pending.entry(offset).or_default() += 1;
    }
    for outcome in reported {
        if let Some(count) = pending.get_mut(&outcome.offset) {
            *count = count.saturating_sub(1);
        }
    }

    let mut lost = Vec::new();
    for (offset, count) in pending {
        for _ in 0..count {
            tracing::error!("Worker for page {} exited without reporting", offset);
            lost.push(PageOutcome {
                offset,
                result: Err(HarvestError::WorkerLost { offset }),
            });
        }
    }
    lost
}
