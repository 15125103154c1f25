use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{error, info};

use super::{CatalogError, CatalogSource};
use crate::models::BookRecord;

/// The three observable outcomes of the one-shot catalog load.
#[derive(Debug)]
pub enum FetchState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }
}

/// Handle on a catalog load running on a background thread. The UI loop
/// polls it every tick; the worker sends exactly one result.
pub struct CatalogFetch {
    rx: Receiver<Result<Vec<BookRecord>, CatalogError>>,
    done: bool,
}

impl CatalogFetch {
    pub fn spawn<S>(source: S) -> Self
    where
        S: CatalogSource + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = source.fetch_books();
            // The receiver is gone only when the UI already exited.
            let _ = tx.send(result);
        });
        Self { rx, done: false }
    }

    /// Non-blocking check. Returns the result exactly once; later calls and
    /// calls while the worker is still running return `None`.
    pub fn poll(&mut self) -> Option<Result<Vec<BookRecord>, CatalogError>> {
        if self.done {
            return None;
        }
        let result = match self.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(CatalogError::Interrupted),
        };
        self.done = true;
        match &result {
            Ok(books) => info!(books = books.len(), "catalog fetch finished"),
            Err(err) => error!(error = %err, "catalog fetch failed"),
        }
        Some(result)
    }
}
