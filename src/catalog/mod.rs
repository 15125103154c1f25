//! Remote catalog access split across logical submodules.

mod fetch;
mod graphql;

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use crate::models::BookRecord;

pub use fetch::{CatalogFetch, FetchState};
pub use graphql::{GraphqlCatalog, BOOKS_QUERY, DEFAULT_ENDPOINT};

/// Anything that can hand over the full catalog in one response.
pub trait CatalogSource {
    fn fetch_books(&self) -> Result<Vec<BookRecord>, CatalogError>;
}

/// Failures while loading the catalog. All of them are fatal for the
/// catalog views but never for the process.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog query failed: {0}")]
    GraphQl(String),

    #[error("could not decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog response did not contain any books")]
    MissingBooks,

    #[error("catalog fetch stopped before reporting a result")]
    Interrupted,
}

/// Titles double as identity keys, so repeated titles collapse into one
/// reading-list entry. Report them once at load time.
pub fn duplicate_titles(books: &[BookRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for book in books {
        if !seen.insert(book.title.as_str()) && !duplicates.contains(&book.title.as_str()) {
            duplicates.push(book.title.as_str());
        }
    }
    duplicates
}

pub(crate) fn warn_on_duplicates(books: &[BookRecord]) {
    for title in duplicate_titles(books) {
        warn!(title, "catalog contains duplicate title; entries will share identity");
    }
}
