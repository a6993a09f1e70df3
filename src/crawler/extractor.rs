//! Listing page extractor
//!
//! Turns the markup of one Top 250 listing page into [`MovieRecord`]s.
//! Items are found under a fixed structural path; each field comes from a
//! fixed nested element. Missing nodes produce empty fields, except the
//! poster image: an item without a poster `src` is dropped entirely.

use crate::crawler::info::split_info;
use crate::record::MovieRecord;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};

const LISTING_SELECTOR: &str = "#content div.article ol";
const ITEM_SELECTOR: &str = "#content > div > div.article > ol > li > div";
const TITLE_SELECTOR: &str = "div.info > div.hd > a > span:nth-child(1)";
const POSTER_SELECTOR: &str = "div.pic > a > img";
const INFO_SELECTOR: &str = "div.info > div.bd > p:nth-child(1)";
const RATING_SELECTOR: &str = "div.info > div.bd > div > span.rating_num";
const QUOTE_SELECTOR: &str = "div.info > div.bd > p.quote > span";

/// Compiled selectors for one listing layout
#[derive(Debug, Clone)]
pub struct PageExtractor {
    listing: Selector,
    item: Selector,
    title: Selector,
    poster: Selector,
    info: Selector,
    rating: Selector,
    quote: Selector,
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageExtractor {
    /// Compiles the listing selectors
    pub fn new() -> Self {
        Self {
            listing: selector(LISTING_SELECTOR),
            item: selector(ITEM_SELECTOR),
            title: selector(TITLE_SELECTOR),
            poster: selector(POSTER_SELECTOR),
            info: selector(INFO_SELECTOR),
            rating: selector(RATING_SELECTOR),
            quote: selector(QUOTE_SELECTOR),
        }
    }

    /// Lazily yields one record per listing item that has a poster URL
    ///
    /// Never fails; a document without the listing yields nothing.
    pub fn records<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = MovieRecord> + 'a {
        document
            .select(&self.item)
            .filter_map(move |item| self.extract_item(item))
    }

    /// Parses a whole page and collects its records
    ///
    /// # Arguments
    ///
    /// * `html` - Raw page markup
    /// * `source` - Page URL, used for error context
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<MovieRecord>)` - Records of every item with a poster URL
    /// * `Err(HarvestError::HtmlParse)` - The page has no listing at all
    ///   (blocked, captcha, or a layout change)
    pub fn parse_page(&self, html: &str, source: &str) -> Result<Vec<MovieRecord>, HarvestError> {
        let document = Html::parse_document(html);

        if document.select(&self.listing).next().is_none() {
            return Err(HarvestError::HtmlParse {
                url: source.to_string(),
                message: format!("no element matches '{}'", LISTING_SELECTOR),
            });
        }

        Ok(self.records(&document).collect())
    }

    /// Builds a record from one item node, or `None` without a poster URL
    fn extract_item(&self, item: ElementRef<'_>) -> Option<MovieRecord> {
        let picture = item
            .select(&self.poster)
            .next()
            .and_then(|img| img.value().attr("src"))?
            .to_string();

        let title = select_text(item, &self.title);
        let info = select_text(item, &self.info);
        let fields = split_info(info.trim());

        Some(MovieRecord {
            title,
            director: fields.director,
            picture,
            actor: fields.actor,
            year: fields.year,
            score: clean_inline(&select_text(item, &self.rating)),
            quote: clean_inline(&select_text(item, &self.quote)),
        })
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("listing selectors are valid CSS")
}

/// Concatenated text of every element matching `selector` under `element`
fn select_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|matched| matched.text())
        .collect()
}

/// Drops newlines and surrounding whitespace
fn clean_inline(text: &str) -> String {
    text.replace('\n', "").trim().to_string()
}
