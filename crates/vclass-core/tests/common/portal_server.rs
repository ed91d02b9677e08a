//! Minimal HTTP/1.1 server imitating the portal pages for integration tests.
//!
//! Login page hands out a token and a session cookie; a correct POST sets an
//! auth cookie and redirects to the dashboard; the dashboard only renders
//! for requests carrying that cookie.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const USERNAME: &str = "student";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-42";

const LOGIN_PAGE: &str = r#"<html><body>
<form action="/login/index.php" method="post" id="login">
  <input type="hidden" name="logintoken" value="tok-42">
  <input type="text" name="username"><input type="password" name="password">
</form></body></html>"#;

const LOGIN_FAILED: &str = r#"<html><body>
<div class="loginerrors"><a id="loginerrormessage">Invalid login, please try again</a></div>
</body></html>"#;

const DASHBOARD: &str = r#"<html><body>
<ul class="unlist">
  <li><div class="column c1"><a href="/course/view.php?id=1">Algoritma - Budi</a></div></li>
  <li><div class="column c1"><a href="/course/view.php?id=2">Basis Data - Siti</a></div></li>
</ul>
<section class="block_timeline">
  <div class="course_name">Algoritma - Budi</div>
  <div class="activityinstance"><a href="/mod/assign/view.php?id=9">Tugas Sorting</a></div>
  <span class="due_date">Senin, 3 Maret</span>
</section>
</body></html>"#;

const COURSE_1: &str = r#"<html><body><div id="intro"><p>Dasar-dasar algoritma.</p></div></body></html>"#;
const COURSE_2: &str = r#"<html><body><div id="summary">No intro here.</div></body></html>"#;

#[derive(Debug, Default)]
pub struct Counters {
    /// Remaining 503 answers for `/flaky`.
    pub flaky_failures: AtomicUsize,
    pub flaky_hits: AtomicUsize,
}

/// Starts the server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345") and shared counters.
pub fn start() -> (String, Arc<Counters>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let counters = Arc::new(Counters::default());
    let shared = Arc::clone(&counters);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let counters = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &counters));
        }
    });
    (format!("http://127.0.0.1:{}", port), counters)
}

/// A base URL nothing listens on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

struct Request {
    method: String,
    path: String,
    cookies: String,
    body: String,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let mut content_length = 0usize;
    let mut cookies = String::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("cookie") {
                cookies = value.trim().to_string();
            }
        }
    }
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(Request {
        method,
        path,
        cookies,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        status,
        body.len(),
        extra_headers,
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn form_value<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn handle(mut stream: TcpStream, counters: &Counters) {
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    let authed = req.cookies.contains("MoodleAuth=1");
    let has_session = req.cookies.contains("MoodleSession=s1");
    match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/login/index.php") => respond(
            &mut stream,
            "200 OK",
            "Set-Cookie: MoodleSession=s1; Path=/\r\n",
            LOGIN_PAGE,
        ),
        ("POST", "/login/index.php") => {
            let ok = has_session
                && form_value(&req.body, "username") == Some(USERNAME)
                && form_value(&req.body, "password") == Some(PASSWORD)
                && form_value(&req.body, "logintoken") == Some(TOKEN);
            if ok {
                respond(
                    &mut stream,
                    "303 See Other",
                    "Set-Cookie: MoodleAuth=1; Path=/\r\nLocation: /my/\r\n",
                    "",
                );
            } else {
                respond(&mut stream, "200 OK", "", LOGIN_FAILED);
            }
        }
        ("GET", "/my/") if authed => respond(&mut stream, "200 OK", "", DASHBOARD),
        ("GET", "/my/") => respond(
            &mut stream,
            "303 See Other",
            "Location: /login/index.php\r\n",
            "",
        ),
        ("GET", "/course/view.php?id=1") if authed => respond(&mut stream, "200 OK", "", COURSE_1),
        ("GET", "/course/view.php?id=2") if authed => respond(&mut stream, "200 OK", "", COURSE_2),
        ("GET", "/flaky") => {
            counters.flaky_hits.fetch_add(1, Ordering::SeqCst);
            let remaining = counters.flaky_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                counters.flaky_failures.store(remaining - 1, Ordering::SeqCst);
                respond(&mut stream, "503 Service Unavailable", "", "down");
            } else {
                respond(&mut stream, "200 OK", "", "up");
            }
        }
        _ => respond(&mut stream, "404 Not Found", "", "not found"),
    }
}
