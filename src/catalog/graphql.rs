use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{warn_on_duplicates, CatalogError, CatalogSource};
use crate::models::BookRecord;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/";

/// The single query the client ever sends.
pub const BOOKS_QUERY: &str = "query Books { books { author coverPhotoURL readingLevel title } }";

/// Error bodies are echoed into the UI, so keep them short.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<BooksData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct BooksData {
    books: Option<Vec<Option<BookRecord>>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Blocking GraphQL client for the books endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlCatalog {
    client: Client,
    endpoint: String,
}

impl GraphqlCatalog {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CatalogError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CatalogSource for GraphqlCatalog {
    fn fetch_books(&self) -> Result<Vec<BookRecord>, CatalogError> {
        info!(endpoint = %self.endpoint, "fetching catalog");
        let request_error = |source| CatalogError::Request {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT, concat!("catalog-browser/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({ "query": BOOKS_QUERY }))
            .send()
            .map_err(request_error)?;

        let status = response.status();
        let raw = response.text().map_err(request_error)?;
        debug!(%status, bytes = raw.len(), "catalog response received");

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: truncate_body(&raw),
            });
        }

        parse_books(&raw)
    }
}

/// Decode a GraphQL envelope into the catalog. Null entries are skipped.
pub(crate) fn parse_books(raw: &str) -> Result<Vec<BookRecord>, CatalogError> {
    let envelope: GraphqlResponse = serde_json::from_str(raw)?;

    if !envelope.errors.is_empty() {
        let messages: Vec<&str> = envelope
            .errors
            .iter()
            .map(|err| err.message.as_str())
            .collect();
        return Err(CatalogError::GraphQl(messages.join("; ")));
    }

    let entries = envelope
        .data
        .and_then(|data| data.books)
        .ok_or(CatalogError::MissingBooks)?;

    let total = entries.len();
    let books: Vec<BookRecord> = entries.into_iter().flatten().collect();
    if books.len() < total {
        warn!(skipped = total - books.len(), "catalog contained null entries");
    }

    warn_on_duplicates(&books);
    info!(books = books.len(), "catalog decoded");
    Ok(books)
}

fn truncate_body(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
