//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Raw requests captured by a mock backend, in order of arrival.
#[derive(Clone, Default)]
pub struct RequestCapture {
    inner: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RequestCapture {
    fn push(&self, request: Vec<u8>) {
        self.inner.lock().unwrap().push(request);
    }

    pub fn count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// The most recent request as lossy UTF-8.
    pub fn last(&self) -> String {
        let requests = self.inner.lock().unwrap();
        let last = requests.last().expect("no request captured");
        String::from_utf8_lossy(last).to_string()
    }

    /// First line of the most recent request.
    pub fn last_request_line(&self) -> String {
        self.last()
            .lines()
            .next()
            .expect("captured request is empty")
            .to_string()
    }
}

/// Canned behavior for a mock extension backend.
#[derive(Clone)]
pub struct BackendResponse {
    pub status_line: &'static str,
    /// Raw header lines, written before the framing headers. May repeat
    /// names to exercise duplicate-header relay.
    pub header_lines: Vec<String>,
    pub body: &'static str,
    pub delay: Duration,
}

impl BackendResponse {
    pub fn ok(body: &'static str) -> Self {
        Self {
            status_line: "200 OK",
            header_lines: Vec::new(),
            body,
            delay: Duration::ZERO,
        }
    }
}

/// Start a mock extension backend that records every request and replies
/// with the canned response. Binds an ephemeral port.
pub async fn start_backend(response: BackendResponse) -> (SocketAddr, RequestCapture) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let capture = RequestCapture::default();
    let cap = capture.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let cap = cap.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                cap.push(request);

                if !response.delay.is_zero() {
                    tokio::time::sleep(response.delay).await;
                }

                let mut raw = format!("HTTP/1.1 {}\r\n", response.status_line);
                for line in &response.header_lines {
                    raw.push_str(line);
                    raw.push_str("\r\n");
                }
                raw.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.body.len(),
                    response.body
                ));
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, capture)
}

/// Read one HTTP/1.1 request: headers, then a Content-Length body.
async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        if let Some(end) = find_subsequence(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);

            let total = end + 4 + content_length;
            while buf.len() < total {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return buf;
        }

        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return buf;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
