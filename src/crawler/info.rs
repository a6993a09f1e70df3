//! Info block splitting
//!
//! Each listing item carries one free-text paragraph holding the director,
//! the cast and a line starting with the release year, e.g.
//!
//! ```text
//! 导演: 弗兰克·德拉邦特 Frank Darabont   主演: 蒂姆·罗宾斯 Tim Robbins /...
//! 1994 / 美国 / 犯罪 剧情
//! ```
//!
//! [`split_info`] turns that paragraph into its parts without touching the
//! network or the DOM.

use regex::Regex;
use std::sync::OnceLock;

/// Director and cast as split out of an info paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoFields {
    pub director: String,
    pub actor: String,
    pub year: String,
}

// Both the English labels and the site's own labels are accepted.
const DIRECTOR_MARKER: &str = r"(?:Director:|导演:)";
const CAST_MARKER: &str = r"(?:Cast:|主演:)";

fn director_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("{}(.*?){}", DIRECTOR_MARKER, CAST_MARKER))
            .expect("director pattern is valid")
    })
}

fn cast_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"{}([^\n(]*)", CAST_MARKER)).expect("cast pattern is valid")
    })
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("year pattern is valid"))
}

/// Splits an info paragraph into director, cast and year
///
/// - director: text between the director label and the first cast label
///   after it, on one line
/// - cast: text after the cast label up to a newline or `(`
/// - year: the first digit run anywhere in `info`
///
/// A field whose label is missing comes back empty. The year is not scoped
/// to the year line, so a digit inside a name wins over the real year.
pub fn split_info(info: &str) -> InfoFields {
    InfoFields {
        director: capture_trimmed(director_re(), info),
        actor: capture_trimmed(cast_re(), info),
        year: extract_year(info),
    }
}

/// Returns the first run of ASCII digits in `info`, or an empty string
pub fn extract_year(info: &str) -> String {
    year_re()
        .find(info)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn capture_trimmed(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
