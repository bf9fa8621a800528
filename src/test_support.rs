// src/test_support.rs
// =============================================================================
// Minimal HTTP/1.1 server for tests.
//
// Serves scripted replies per path from a background thread, one thread per
// connection, always with `Connection: close`. It records every request line
// with its arrival time, the User-Agent it carried, and the highest number of
// requests it was ever serving at once.
//
// Reply bodies may contain `{base}`, replaced by the server's base URL, so a
// sitemap can point back at the server itself.
// =============================================================================

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    head_status: Option<u16>,
    location: Option<String>,
    body: String,
    hang_up_on_get: bool,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Reply {
            status,
            head_status: None,
            location: None,
            body: String::new(),
            hang_up_on_get: false,
        }
    }

    /// A different status for HEAD requests only
    pub fn head_status(mut self, status: u16) -> Self {
        self.head_status = Some(status);
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Close the connection without answering GET requests
    pub fn hang_up_on_get(mut self) -> Self {
        self.hang_up_on_get = true;
        self
    }
}

#[derive(Default)]
struct Recorded {
    requests: Vec<String>,
    arrivals: Vec<Instant>,
    user_agents: Vec<String>,
}

struct Shared {
    base: String,
    routes: HashMap<String, Reply>,
    recorded: Mutex<Recorded>,
    latency_ms: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

pub struct TestServer {
    shared: Arc<Shared>,
}

impl TestServer {
    /// Starts serving `routes`; unknown paths get 404
    pub fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        let shared = Arc::new(Shared {
            base: format!("http://127.0.0.1:{}", port),
            routes: routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
            recorded: Mutex::new(Recorded::default()),
            latency_ms: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });

        let server = Arc::clone(&shared);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let server = Arc::clone(&server);
                thread::spawn(move || handle(stream, &server));
            }
        });

        TestServer { shared }
    }

    /// Delays every reply by `latency`
    pub fn with_latency(self, latency: Duration) -> Self {
        self.shared
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.shared.base, path)
    }

    /// Request lines seen so far, as "METHOD /path"
    pub fn requests(&self) -> Vec<String> {
        self.shared.recorded.lock().unwrap().requests.clone()
    }

    /// When each request in `requests()` arrived
    pub fn arrivals(&self) -> Vec<Instant> {
        self.shared.recorded.lock().unwrap().arrivals.clone()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.shared.recorded.lock().unwrap().user_agents.clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.split_once(' ').map(|(_, p)| p) == Some(path))
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }
}

/// A URL on a port nothing listens on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, server: &Shared) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));

    let Some(head) = read_request_head(&mut stream) else {
        return;
    };
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let user_agent = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();

    {
        let mut recorded = server.recorded.lock().unwrap();
        recorded.requests.push(format!("{} {}", method, path));
        recorded.arrivals.push(Instant::now());
        recorded.user_agents.push(user_agent);
    }

    let now = server.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    server.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let latency = server.latency_ms.load(Ordering::SeqCst);
    if latency > 0 {
        thread::sleep(Duration::from_millis(latency));
    }
    // Leave the in-flight window before answering, so a client that waits for
    // this reply can never be counted together with it
    server.in_flight.fetch_sub(1, Ordering::SeqCst);

    let is_head = method.eq_ignore_ascii_case("HEAD");
    let reply = server
        .routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Reply::status(404));
    if reply.hang_up_on_get && method.eq_ignore_ascii_case("GET") {
        return;
    }
    let status = match (is_head, reply.head_status) {
        (true, Some(head_status)) => head_status,
        _ => reply.status,
    };
    let body = reply.body.replace("{base}", &server.base);

    let mut response = format!("HTTP/1.1 {} {}\r\n", status, reason(status));
    if let Some(location) = &reply.location {
        response.push_str(&format!("Location: {}\r\n", location));
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));
    if !is_head {
        response.push_str(&body);
    }

    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn read_request_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8(buf).ok()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        404 => "Not Found",
        405 => "Method Not Allowed",
        410 => "Gone",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
