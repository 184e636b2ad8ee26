//! Minimal HTTP/1.1 server speaking JSON for client integration tests.
//!
//! Answers each incoming request with the next scripted reply, repeating the
//! last one once the script runs dry, and records every request so tests can
//! assert what went over the wire. Connections are handled one at a time so
//! reply order matches request order.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u32,
    pub body: String,
}

impl Reply {
    pub fn json(status: u32, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// What one request looked like on the wire.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    /// Path plus query string, as sent in the request line.
    pub target: String,
    pub headers: Vec<String>,
    pub body: String,
}

impl Seen {
    pub fn has_header(&self, wanted: &str) -> bool {
        self.headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case(wanted))
    }
}

/// Handle to a running server. The server runs until the process exits.
pub struct Server {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Server {
    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread answering with `replies` in order.
pub fn start(replies: Vec<Reply>) -> Server {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_bg = Arc::clone(&seen);
    thread::spawn(move || {
        let mut served = 0usize;
        for stream in listener.incoming().flatten() {
            let reply = replies
                .get(served)
                .or_else(|| replies.last())
                .cloned()
                .unwrap_or(Reply {
                    status: 500,
                    body: "{}".to_string(),
                });
            served += 1;
            handle(stream, reply, &seen_bg);
        }
    });
    Server {
        base_url: format!("http://127.0.0.1:{}/", port),
        seen,
    }
}

fn handle(mut stream: std::net::TcpStream, reply: Reply, seen: &Mutex<Vec<Seen>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    // Read until the header block ends and the declared body is complete.
    let header_end = loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) => break None,
            Ok(n) => n,
            Err(_) => break None,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            let declared = content_length(&buf[..end]).unwrap_or(0);
            if buf.len() >= end + declared {
                break Some(end);
            }
        }
    };
    let Some(header_end) = header_end else { return };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let target = request_line.next().unwrap_or("").to_string();
    let headers = lines
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    seen.lock().unwrap().push(Seen {
        method,
        target,
        headers,
        body,
    });

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        status_text(reply.status),
        reply.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(reply.body.as_bytes());
}

/// Byte offset just past the blank line separating headers from body.
fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

fn content_length(head: &[u8]) -> Option<usize> {
    let head = std::str::from_utf8(head).ok()?;
    for line in head.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().ok();
            }
        }
    }
    None
}

fn status_text(status: u32) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
