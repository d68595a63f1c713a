//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes (path -> behavior) and records every request
//! path it sees. Unknown paths get 404. One thread per connection; the server
//! runs until the process exits.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Bare status, empty body.
    Status(u16),
    /// Close the connection without answering.
    Drop,
    /// 503 for the first `failures` requests, then 200 with `body`.
    Flaky { failures: usize, body: Vec<u8> },
    /// 200 with `body` after waiting `delay`.
    Delayed { delay: Duration, body: Vec<u8> },
}

impl Route {
    pub fn text(body: &str) -> Self {
        Route::Body(body.as_bytes().to_vec())
    }
}

struct RouteState {
    route: Route,
    served: AtomicUsize,
}

pub struct PlaylistServer {
    base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl PlaylistServer {
    /// `http://127.0.0.1:<port>` + `path` (path starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Request paths in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, path: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

pub fn start(routes: Vec<(&str, Route)>) -> PlaylistServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, RouteState>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| {
                (
                    path.to_string(),
                    RouteState {
                        route,
                        served: AtomicUsize::new(0),
                    },
                )
            })
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));
    {
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });
    }
    PlaylistServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, RouteState>, hits: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(path.clone());

    let Some(state) = routes.get(&path) else {
        respond(&mut stream, 404, b"");
        return;
    };
    let nth = state.served.fetch_add(1, Ordering::SeqCst);
    match &state.route {
        Route::Body(body) => respond(&mut stream, 200, body),
        Route::Status(code) => respond(&mut stream, *code, b""),
        Route::Drop => {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        Route::Flaky { failures, body } => {
            if nth < *failures {
                respond(&mut stream, 503, b"");
            } else {
                respond(&mut stream, 200, body);
            }
        }
        Route::Delayed { delay, body } => {
            thread::sleep(*delay);
            respond(&mut stream, 200, body);
        }
    }
}

fn respond(stream: &mut TcpStream, code: u16, body: &[u8]) {
    let reason = match code {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        code,
        reason,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
