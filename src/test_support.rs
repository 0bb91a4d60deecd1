//! Test utilities for the blocking HTTP adapters.
//!
//! [`CannedServer`] answers each incoming connection with the next canned
//! response and records what the client sent, so tests can check request
//! lines, headers and bodies without a real service.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// One request as the server received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// For example `GET /service/job-1 HTTP/1.1`.
    pub line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Local HTTP server that serves `responses` in order, one per connection.
///
/// Every response closes its connection. The test must issue exactly as many
/// requests as there are responses, otherwise [`CannedServer::requests`]
/// blocks.
#[derive(Debug)]
pub struct CannedServer {
    pub base_url: String,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl CannedServer {
    pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local address"));

        let handle = thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| {
                    let (stream, _) = listener.accept().expect("accept");
                    let mut reader = BufReader::new(stream);
                    let request = read_request(&mut reader);
                    let mut stream = reader.into_inner();
                    write!(
                        stream,
                        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    )
                    .expect("write response");
                    request
                })
                .collect()
        });

        Self { base_url, handle }
    }

    /// Wait for every canned response to be served and return the requests.
    pub fn requests(self) -> Vec<RecordedRequest> {
        self.handle.join().expect("server thread")
    }
}

fn read_request(reader: &mut BufReader<TcpStream>) -> RecordedRequest {
    let mut line = String::new();
    reader.read_line(&mut line).expect("request line");

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).expect("header line");
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).expect("request body");

    RecordedRequest {
        line: line.trim_end().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}
