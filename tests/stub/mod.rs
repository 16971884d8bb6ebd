#![allow(dead_code)]

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub static PDF_BYTES: &[u8] = b"%PDF-1.4\n%bookstand test fixture\n%%EOF\n";

/// Catalog response with two volumes: one fully populated and
/// downloadable, one missing authors, thumbnail, and access info.
pub const TWO_VOLUMES_JSON: &str = r#"{
  "kind": "books#volumes",
  "totalItems": 2,
  "items": [
    {
      "id": "abc123",
      "volumeInfo": {
        "title": "Dune",
        "authors": ["Frank Herbert"],
        "imageLinks": { "thumbnail": "__BASE__/thumbs/dune.jpg" }
      },
      "accessInfo": { "pdf": { "downloadLink": "__BASE__/files/dune.pdf" } }
    },
    {
      "id": "def456",
      "volumeInfo": { "title": "Dune Messiah" }
    }
  ]
}"#;

pub const EMPTY_VOLUMES_JSON: &str = r#"{ "kind": "books#volumes", "totalItems": 0, "items": [] }"#;

pub struct CatalogStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CatalogStub {
    /// Full request URLs (path + query) seen on `/volumes`.
    pub fn volume_requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Serves `/volumes` with the given status and body (`__BASE__` in the
/// body becomes the server's base URL) and `/files/dune.pdf` with a
/// small PDF fixture.
pub fn spawn_catalog_stub(volumes_status: u16, volumes_body: &str) -> CatalogStub {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let addr = server.server_addr();
    let base_url = format!("http://{addr}");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let body_template = volumes_body.to_owned();
    let thread_base = base_url.clone();
    let thread_requests = Arc::clone(&requests);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let url = request.url().to_string();
            let path = url.split('?').next().unwrap_or(&url).to_owned();

            if path == "/volumes" {
                thread_requests.lock().expect("requests lock").push(url);
                let body = body_template.replace("__BASE__", &thread_base);
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(volumes_status)
                    .with_header(
                        tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"application/json"[..],
                        )
                        .expect("build header"),
                    );
                let _ = request.respond(response);
            } else if path == "/files/dune.pdf" {
                let response = tiny_http::Response::from_data(PDF_BYTES.to_vec()).with_header(
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/pdf"[..])
                        .expect("build header"),
                );
                let _ = request.respond(response);
            } else {
                let _ = request
                    .respond(tiny_http::Response::from_string("not found").with_status_code(404));
            }
        }
    });

    CatalogStub {
        base_url,
        requests,
        shutdown: shutdown_tx,
        handle: Some(handle),
    }
}
