//! Minimal HTTP/1.1 conversion endpoint for integration tests.
//!
//! Accepts `multipart/form-data` POSTs, records the parts of every request and
//! answers with a fixed status and body. Answers `Expect: 100-continue` so
//! curl does not stall on larger uploads.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use base64::Engine as _;

/// What the server answers to every request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub location: Option<String>,
}

impl Reply {
    /// 200 with a well-formed envelope carrying `payload` as a data URL.
    pub fn converted(payload: &[u8], mime: &str, method: Option<&str>) -> Self {
        let data_url = format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(payload)
        );
        let mut data = serde_json::json!({
            "dataUrl": data_url,
            "originalSize": 0,
            "convertedSize": payload.len(),
            "reductionPercentage": 0.0,
            "fileName": "server-chosen-name.bin",
        });
        if let Some(m) = method {
            data["conversionMethod"] = serde_json::Value::from(m);
        }
        Self {
            status: 200,
            body: serde_json::json!({ "data": data }).to_string(),
            location: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            location: None,
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self {
            status,
            body: String::new(),
            location: Some(location.to_string()),
        }
    }
}

/// One multipart part as received.
#[derive(Debug, Clone, Default)]
pub struct Part {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Parts of one request, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub path: String,
    pub parts: BTreeMap<String, Part>,
}

impl Captured {
    pub fn field(&self, name: &str) -> Option<String> {
        self.parts
            .get(name)
            .map(|p| String::from_utf8_lossy(&p.data).into_owned())
    }
}

pub struct ConvertServer {
    pub url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl ConvertServer {
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// Starts the server on an ephemeral port. Runs until the process exits.
pub fn start(reply: Reply) -> ConvertServer {
    start_with(move |_| reply.clone())
}

/// Like `start`, but picks the reply per request from what was uploaded.
pub fn start_with<F>(respond: F) -> ConvertServer
where
    F: Fn(&Captured) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    let respond = Arc::new(respond);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let respond = Arc::clone(&respond);
            let sink = Arc::clone(&sink);
            thread::spawn(move || handle(stream, &*respond, &sink));
        }
    });
    ConvertServer {
        url: format!("http://127.0.0.1:{}/api/convert", port),
        captured,
    }
}

fn handle(mut stream: TcpStream, respond: &dyn Fn(&Captured) -> Reply, sink: &Mutex<Vec<Captured>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let mut buf = Vec::new();
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let mut chunk = [0u8; 8192];
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut body = buf.split_off(header_end + 4);

    let path = head
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let header = |name: &str| {
        head.lines().skip(1).find_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim().to_string())
        })
    };
    let content_length: usize = header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    if header("expect").is_some_and(|v| v.eq_ignore_ascii_case("100-continue")) {
        let _ = stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n");
    }
    while body.len() < content_length {
        let mut chunk = [0u8; 65536];
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }

    let boundary = header("content-type").and_then(|ct| {
        ct.split(';')
            .find_map(|p| p.trim().strip_prefix("boundary=").map(|b| b.trim_matches('"').to_string()))
    });
    let parts = boundary
        .map(|b| parse_multipart(&body, &b))
        .unwrap_or_default();
    let captured = Captured { path, parts };
    let reply = respond(&captured);
    sink.lock().unwrap().push(captured);

    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        reply.status,
        reply.body.len(),
        reply
            .location
            .as_deref()
            .map(|l| format!("Location: {}\r\n", l))
            .unwrap_or_default()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(reply.body.as_bytes());
}

fn parse_multipart(body: &[u8], boundary: &str) -> BTreeMap<String, Part> {
    let delimiter = format!("--{}", boundary);
    let mut parts = BTreeMap::new();
    for section in split(body, delimiter.as_bytes()).into_iter().skip(1) {
        if section.starts_with(b"--") {
            break;
        }
        let section = section.strip_prefix(b"\r\n").unwrap_or(section);
        let section = section.strip_suffix(b"\r\n").unwrap_or(section);
        let Some(split_at) = find(section, b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&section[..split_at]);
        let mut name = None;
        let mut part = Part {
            data: section[split_at + 4..].to_vec(),
            ..Part::default()
        };
        for line in headers.lines() {
            let Some((k, v)) = line.split_once(':') else {
                continue;
            };
            if k.trim().eq_ignore_ascii_case("content-type") {
                part.content_type = Some(v.trim().to_string());
            } else if k.trim().eq_ignore_ascii_case("content-disposition") {
                name = disposition_param(v, "name");
                part.file_name = disposition_param(v, "filename");
            }
        }
        if let Some(name) = name {
            parts.insert(name, part);
        }
    }
    parts
}

fn disposition_param(value: &str, key: &str) -> Option<String> {
    value.split(';').find_map(|p| {
        let (k, v) = p.trim().split_once('=')?;
        (k == key).then(|| v.trim_matches('"').to_string())
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    let mut rest = haystack;
    while let Some(pos) = find(rest, needle) {
        out.push(&rest[..pos]);
        rest = &rest[pos + needle.len()..];
    }
    out.push(rest);
    out
}
