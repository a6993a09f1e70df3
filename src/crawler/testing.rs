//! In-crate fakes for worker and dispatcher tests

use crate::crawler::PageFetcher;
use crate::record::MovieRecord;
use crate::storage::{rejected_write, RecordSink, StorageResult};
use crate::HarvestError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Builds a listing page with one item per `(title, poster)` pair
pub fn listing_page(items: &[(&str, Option<&str>)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, poster)| {
            let img = match poster {
                Some(src) => format!(r#"<img src="{}">"#, src),
                None => "<img>".to_string(),
            };
            format!(
                r#"<li><div class="item"><div class="pic"><a>{}</a></div><div class="info"><div class="hd"><a><span>{}</span></a></div><div class="bd"><p>Director: D Cast: C
1999 / US</p><div class="star"><span class="rating_num">8.0</span></div></div></div></div></li>"#,
                img, title
            )
        })
        .collect();

    format!(
        r#"<html><body><div id="content"><div><div class="article"><ol>{}</ol></div></div></div></body></html>"#,
        body
    )
}

/// What the fake fetcher does for one offset
pub enum FakePage {
    Body(String),
    Status(u16),
    Panic,
}

/// Serves canned pages by offset
pub struct FakeFetcher {
    pages: HashMap<u32, FakePage>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(pages: impl IntoIterator<Item = (u32, FakePage)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    fn page_url(&self, offset: u32) -> String {
        format!("fake://top250?start={}", offset)
    }

    async fn fetch_page(&self, offset: u32) -> Result<String, HarvestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(&offset) {
            Some(FakePage::Body(body)) => Ok(body.clone()),
            Some(FakePage::Status(status)) => Err(HarvestError::HttpStatus {
                url: self.page_url(offset),
                status: *status,
            }),
            Some(FakePage::Panic) => panic!("fetcher blew up at offset {}", offset),
            None => Err(HarvestError::HttpStatus {
                url: self.page_url(offset),
                status: 404,
            }),
        }
    }
}

/// Keeps every record it accepts; rejects titles listed in `reject`
#[derive(Default)]
pub struct RecordingSink {
    reject: Vec<String>,
    pub stored: Mutex<Vec<MovieRecord>>,
    pub attempts: AtomicUsize,
}

impl RecordingSink {
    pub fn rejecting(titles: &[&str]) -> Self {
        Self {
            reject: titles.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .stored
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.title.clone())
            .collect();
        titles.sort();
        titles
    }
}

impl RecordSink for RecordingSink {
    fn insert(&self, record: &MovieRecord) -> StorageResult<i64> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject.contains(&record.title) {
            return Err(rejected_write(format!("rejected {}", record.title)));
        }
        let mut stored = self.stored.lock().unwrap();
        stored.push(record.clone());
        Ok(stored.len() as i64)
    }
}
