//! Movie record definitions
//!
//! A [`MovieRecord`] is one entry scraped from a listing page. Records are
//! built by the extractor, handed to a [`RecordSink`](crate::storage::RecordSink)
//! exactly once, and then dropped.

use std::fmt;

/// One movie entry extracted from a listing page
///
/// Field names follow the columns of the `douban_movies` table. Every field
/// except `picture` may be empty when the corresponding node was missing from
/// the markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieRecord {
    /// Movie title
    pub title: String,

    /// Director name(s), as written on the page
    pub director: String,

    /// Poster image URL; always present on a constructed record
    pub picture: String,

    /// Cast name(s), as written on the page
    pub actor: String,

    /// Release year (first digit run of the info block)
    pub year: String,

    /// Rating as a decimal string, e.g. "9.7"
    pub score: String,

    /// Tagline; often empty
    pub quote: String,
}

impl MovieRecord {
    /// Returns the values in `douban_movies` column order
    ///
    /// Order: Title, Director, Picture, Actor, Year, Score, Quote.
    pub fn columns(&self) -> [&str; 7] {
        [
            &self.title,
            &self.director,
            &self.picture,
            &self.actor,
            &self.year,
            &self.score,
            &self.quote,
        ]
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{}] dir: {} | cast: {}",
            self.title, self.year, self.score, self.director, self.actor
        )?;
        if !self.quote.is_empty() {
            write!(f, " | \"{}\"", self.quote)?;
        }
        Ok(())
    }
}
