use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

/// Minimal GraphQL server answering every POST with a canned response.
pub struct CatalogStub {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl CatalogStub {
    pub fn with_books(books: Value) -> Self {
        Self::spawn(200, json!({ "data": { "books": books } }).to_string())
    }

    pub fn spawn(status: u16, body: String) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start catalog stub server");
        let addr = server.server_addr();
        let endpoint = format!("http://{addr}/");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            if request.method() != &tiny_http::Method::Post {
                let _ = request.respond(
                    tiny_http::Response::from_string("method not allowed").with_status_code(405),
                );
                continue;
            }

            let mut payload = String::new();
            if request.as_reader().read_to_string(&mut payload).is_err() {
                let _ = request.respond(
                    tiny_http::Response::from_string("invalid request body").with_status_code(400),
                );
                continue;
            }
            seen.lock().expect("request log").push(payload);

            let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("content type header");
            let _ = request.respond(
                tiny_http::Response::from_string(body.clone())
                    .with_status_code(status)
                    .with_header(header),
            );
        });

        Self {
            endpoint,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Catalog with `count` books alternating between levels B and E.
#[allow(dead_code)]
pub fn numbered_books(count: usize) -> Value {
    let books: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Book {i:02}"),
                "author": "Stub Author",
                "readingLevel": if i % 2 == 0 { "B" } else { "E" },
                "coverPhotoURL": format!("assets/book{i:02}.webp"),
            })
        })
        .collect();
    Value::Array(books)
}
