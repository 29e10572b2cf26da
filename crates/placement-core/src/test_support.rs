use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

use url::Url;

#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

pub struct OneShotServer {
    url: Url,
    handle: JoinHandle<CapturedRequest>,
}

impl OneShotServer {
    pub fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let port = listener.local_addr().expect("local addr").port();
        let url = Url::parse(&format!("http://127.0.0.1:{port}/predict")).expect("server url");
        let body = body.to_string();

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            serve(stream, status, &body)
        });

        Self { url, handle }
    }

    pub fn unused_url() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        Url::parse(&format!("http://127.0.0.1:{port}/predict")).expect("unused url")
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    pub fn finish(self) -> CapturedRequest {
        self.handle.join().expect("server thread")
    }
}

fn serve(stream: TcpStream, status: u16, body: &str) -> CapturedRequest {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut captured = CapturedRequest::default();

    reader
        .read_line(&mut captured.request_line)
        .expect("request line");
    captured.request_line = captured.request_line.trim_end().to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("header line");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            if key.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().expect("content length");
            }
            captured.headers.push((key, value));
        }
    }

    let mut raw_body = vec![0u8; content_length];
    reader.read_exact(&mut raw_body).expect("request body");
    captured.body = String::from_utf8(raw_body).expect("utf8 body");

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(response.as_bytes())
        .expect("write response");
    stream.flush().expect("flush response");

    captured
}
