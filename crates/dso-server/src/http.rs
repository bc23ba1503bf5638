//! Minimal HTTP/1.1 request reader and response writer.
//!
//! Supports exactly what the API needs: a request line, headers, and a body
//! delimited by `Content-Length`, including the `Expect: 100-continue`
//! handshake. Every connection carries one request and is closed after the
//! response.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, Take};

/// Upper bound on the request line plus headers, in bytes.
pub const MAX_HEAD_BYTES: usize = 16 * 1024;

/// Upper bound on the number of request headers.
pub const MAX_HEADERS: usize = 64;

/// How long a rejected connection is kept open to absorb unread input.
pub const LINGER_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on unread input discarded before closing.
pub const MAX_DRAIN_BYTES: u64 = 8 * 1024 * 1024;

const CONTINUE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

/// Errors raised while reading a request.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before a full request arrived.
    #[error("connection closed before the request was complete")]
    UnexpectedEof,

    /// The request line is not `METHOD TARGET HTTP/1.x`.
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// A header line has no colon or an empty name.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    /// Too many header lines.
    #[error("too many headers (limit {0})")]
    TooManyHeaders(usize),

    /// Request line and headers exceed [`MAX_HEAD_BYTES`].
    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// `Content-Length` is not a non-negative integer.
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// The body is larger than the configured limit.
    #[error("request body of {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge {
        /// Declared body size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Chunked or other transfer codings are not accepted.
    #[error("Transfer-Encoding is not supported; send Content-Length")]
    UnsupportedTransferEncoding,

    /// An `Expect` value other than `100-continue`.
    #[error("unsupported expectation: {0:?}")]
    UnsupportedExpectation(String),

    /// The full request did not arrive in time.
    #[error("request not received within {0:?}")]
    Timeout(Duration),
}

impl HttpError {
    /// Status to answer with, or `None` when the connection is unusable.
    pub fn status(&self) -> Option<Status> {
        match self {
            HttpError::Io(_) | HttpError::UnexpectedEof => None,
            HttpError::BodyTooLarge { .. } => Some(Status::PayloadTooLarge),
            HttpError::HeadTooLarge(_) | HttpError::TooManyHeaders(_) => {
                Some(Status::HeaderFieldsTooLarge)
            }
            HttpError::UnsupportedTransferEncoding => Some(Status::NotImplemented),
            HttpError::UnsupportedExpectation(_) => Some(Status::ExpectationFailed),
            HttpError::Timeout(_) => Some(Status::RequestTimeout),
            _ => Some(Status::BadRequest),
        }
    }
}

/// Response status codes used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    RequestTimeout,
    PayloadTooLarge,
    ExpectationFailed,
    HeaderFieldsTooLarge,
    InternalServerError,
    NotImplemented,
}

impl Status {
    /// Numeric status code.
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NoContent => 204,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::RequestTimeout => 408,
            Status::PayloadTooLarge => 413,
            Status::ExpectationFailed => 417,
            Status::HeaderFieldsTooLarge => 431,
            Status::InternalServerError => 500,
            Status::NotImplemented => 501,
        }
    }

    /// Standard reason phrase.
    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NoContent => "No Content",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::RequestTimeout => "Request Timeout",
            Status::PayloadTooLarge => "Payload Too Large",
            Status::ExpectationFailed => "Expectation Failed",
            Status::HeaderFieldsTooLarge => "Request Header Fields Too Large",
            Status::InternalServerError => "Internal Server Error",
            Status::NotImplemented => "Not Implemented",
        }
    }
}

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Other(String),
}

impl Method {
    fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }

    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Other(s) => s,
        }
    }
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Path component of the request target, query string removed.
    pub path: String,
    /// Header name/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `Origin` header, if present.
    pub fn origin(&self) -> Option<&str> {
        self.header("Origin")
    }
}

/// Reads one request, giving up with [`HttpError::Timeout`] after `timeout`.
pub async fn read_request_within<S>(
    stream: &mut S,
    max_body_bytes: usize,
    timeout: Duration,
) -> Result<Request, HttpError>
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    tokio::time::timeout(timeout, read_request(stream, max_body_bytes))
        .await
        .map_err(|_| HttpError::Timeout(timeout))?
}

/// Reads one request from `stream`.
///
/// A request carrying `Expect: 100-continue` gets the interim `100 Continue`
/// written back once its declared body is known to fit.
pub async fn read_request<S>(stream: &mut S, max_body_bytes: usize) -> Result<Request, HttpError>
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    let mut head = (&mut *stream).take(MAX_HEAD_BYTES as u64);

    let request_line = match read_head_line(&mut head).await? {
        Some(line) => line,
        None => return Err(HttpError::UnexpectedEof),
    };
    let (method, path) = parse_request_line(&request_line)?;

    let mut headers = Vec::new();
    loop {
        let line = read_head_line(&mut head)
            .await?
            .ok_or(HttpError::UnexpectedEof)?;
        if line.is_empty() {
            break;
        }
        if headers.len() == MAX_HEADERS {
            return Err(HttpError::TooManyHeaders(MAX_HEADERS));
        }
        let (name, value) = line
            .split_once(':')
            .filter(|(name, _)| !name.trim().is_empty())
            .ok_or_else(|| HttpError::MalformedHeader(line.clone()))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let mut request = Request {
        method,
        path,
        headers,
        body: Vec::new(),
    };

    if request.header("Transfer-Encoding").is_some() {
        return Err(HttpError::UnsupportedTransferEncoding);
    }

    let content_length = match request.header("Content-Length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| HttpError::InvalidContentLength(value.to_string()))?,
        None => 0,
    };
    if content_length > max_body_bytes {
        return Err(HttpError::BodyTooLarge {
            size: content_length,
            limit: max_body_bytes,
        });
    }

    if let Some(expect) = request.header("Expect") {
        if !expect.eq_ignore_ascii_case("100-continue") {
            return Err(HttpError::UnsupportedExpectation(expect.to_string()));
        }
        if content_length > 0 {
            stream.write_all(CONTINUE).await?;
            stream.flush().await?;
        }
    }

    let mut body = vec![0u8; content_length];
    stream.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HttpError::UnexpectedEof
        } else {
            HttpError::Io(e)
        }
    })?;
    request.body = body;

    Ok(request)
}

/// Reads one CRLF- or LF-terminated line of the request head.
///
/// Returns `None` on a clean EOF before any byte.
async fn read_head_line<R>(head: &mut Take<R>) -> Result<Option<String>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = head.read_until(b'\n', &mut buf).await?;
    if n == 0 && head.limit() > 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        // Either the peer hung up mid-line or the head limit cut the line.
        return Err(if head.limit() == 0 {
            HttpError::HeadTooLarge(MAX_HEAD_BYTES)
        } else {
            HttpError::UnexpectedEof
        });
    }
    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn parse_request_line(line: &str) -> Result<(Method, String), HttpError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(HttpError::MalformedRequestLine(line.to_string()));
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::MalformedRequestLine(line.to_string()));
    }

    let path = target.split(['?', '#']).next().unwrap_or(target).to_string();
    Ok((Method::parse(method), path))
}

/// Closes our side of `stream`, then discards whatever the peer is still
/// sending, up to [`MAX_DRAIN_BYTES`] or [`LINGER_TIMEOUT`].
///
/// Used after rejecting a request whose body was never read. Closing a socket
/// with unread input makes the kernel send a reset, which can destroy the
/// response before the peer reads it.
pub async fn linger_close<S>(stream: &mut S)
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    if stream.shutdown().await.is_err() {
        return;
    }
    let mut unread = (&mut *stream).take(MAX_DRAIN_BYTES);
    let _ = tokio::time::timeout(
        LINGER_TIMEOUT,
        tokio::io::copy(&mut unread, &mut tokio::io::sink()),
    )
    .await;
}

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status line code.
    pub status: Status,
    /// Extra headers. `Content-Length` and `Connection` are added on write.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// An empty response with the given status.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A response carrying a JSON body.
    pub fn json(status: Status, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds several headers.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serializes the status line and headers.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.code(),
            self.status.reason()
        );
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");
        head.into_bytes()
    }

    /// Writes the full response and flushes.
    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.head_bytes()).await?;
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{duplex, BufReader};

    /// Feeds `raw` to the reader and returns its result plus anything it wrote back.
    async fn exchange(raw: &[u8], max_body: usize) -> (Result<Request, HttpError>, Vec<u8>) {
        let (mut client, server) = duplex(256 * 1024);
        client.write_all(raw).await.unwrap();
        client.shutdown().await.unwrap();

        let mut stream = BufReader::new(server);
        let result = read_request(&mut stream, max_body).await;
        drop(stream);

        let mut written = Vec::new();
        client.read_to_end(&mut written).await.unwrap();
        (result, written)
    }

    async fn parse(raw: &[u8], max_body: usize) -> Result<Request, HttpError> {
        exchange(raw, max_body).await.0
    }

    #[tokio::test]
    async fn test_parse_post_with_body() {
        let raw = b"POST /modulate?x=1 HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n{}";
        let request = parse(raw, 1024).await.unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/modulate");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_parse_bare_lf_lines() {
        let raw = b"OPTIONS /modulate HTTP/1.0\nOrigin: http://localhost:3000\n\n";
        let request = parse(raw, 1024).await.unwrap();
        assert_eq!(request.method, Method::Options);
        assert_eq!(request.origin(), Some("http://localhost:3000"));
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let raw = b"POST /modulate HTTP/1.1\r\nContent-Length: 100\r\n\r\n";
        let err = parse(raw, 10).await.unwrap_err();
        assert!(matches!(err, HttpError::BodyTooLarge { size: 100, limit: 10 }));
        assert_eq!(err.status(), Some(Status::PayloadTooLarge));
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let raw = b"POST /modulate HTTP/1.1\r\nContent-Length: 10\r\n\r\n{}";
        let err = parse(raw, 1024).await.unwrap_err();
        assert!(matches!(err, HttpError::UnexpectedEof));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_malformed_request_line() {
        let err = parse(b"HELLO\r\n\r\n", 1024).await.unwrap_err();
        assert!(matches!(err, HttpError::MalformedRequestLine(_)));
        assert_eq!(err.status(), Some(Status::BadRequest));
    }

    #[tokio::test]
    async fn test_bad_content_length() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
        let err = parse(raw, 1024).await.unwrap_err();
        assert!(matches!(err, HttpError::InvalidContentLength(_)));
    }

    #[tokio::test]
    async fn test_chunked_rejected() {
        let raw = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n";
        let err = parse(raw, 1024).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::NotImplemented));
    }

    #[tokio::test]
    async fn test_oversized_head() {
        let mut raw = b"GET / HTTP/1.1\r\nX-Long: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_HEAD_BYTES));
        raw.extend_from_slice(b"\r\n\r\n");
        let err = parse(&raw, 1024).await.unwrap_err();
        assert!(matches!(err, HttpError::HeadTooLarge(_)));
    }

    #[tokio::test]
    async fn test_expect_continue_gets_interim_response() {
        let raw = b"POST /modulate HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 2\r\n\r\n{}";
        let (result, written) = exchange(raw, 1024).await;
        assert_eq!(result.unwrap().body, b"{}".to_vec());
        assert_eq!(written, CONTINUE.to_vec());
    }

    #[tokio::test]
    async fn test_expect_continue_skipped_for_oversized_body() {
        let raw = b"POST /modulate HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 100\r\n\r\n";
        let (result, written) = exchange(raw, 10).await;
        assert_eq!(result.unwrap_err().status(), Some(Status::PayloadTooLarge));
        assert!(written.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_expectation() {
        let raw = b"POST /modulate HTTP/1.1\r\nExpect: teapot\r\nContent-Length: 2\r\n\r\n{}";
        let err = parse(raw, 1024).await.unwrap_err();
        assert!(matches!(err, HttpError::UnsupportedExpectation(_)));
        assert_eq!(err.status(), Some(Status::ExpectationFailed));
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        let (mut client, server) = duplex(1024);
        client
            .write_all(b"POST /modulate HTTP/1.1\r\nContent-Length: 10\r\n\r\n{")
            .await
            .unwrap();

        let mut stream = BufReader::new(server);
        let timeout = Duration::from_millis(50);
        let err = read_request_within(&mut stream, 1024, timeout)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Timeout(t) if t == timeout));
        assert_eq!(err.status(), Some(Status::RequestTimeout));
        drop(client);
    }

    #[tokio::test]
    async fn test_linger_close_drains_unread_input() {
        let (mut client, server) = duplex(64 * 1024);
        let mut raw = b"POST /modulate HTTP/1.1\r\nContent-Length: 40000\r\n\r\n".to_vec();
        raw.extend(std::iter::repeat(b'1').take(40_000));
        client.write_all(&raw).await.unwrap();
        client.shutdown().await.unwrap();

        let mut stream = BufReader::new(server);
        let err = read_request(&mut stream, 16).await.unwrap_err();
        Response::json(err.status().unwrap(), "{}")
            .write_to(stream.get_mut())
            .await
            .unwrap();
        linger_close(&mut stream).await;

        let mut leftover = Vec::new();
        stream.read_to_end(&mut leftover).await.unwrap();
        assert!(leftover.is_empty());

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        assert!(response.starts_with(b"HTTP/1.1 413 Payload Too Large\r\n"));
    }

    #[tokio::test]
    async fn test_empty_connection() {
        let err = parse(b"", 1024).await.unwrap_err();
        assert!(matches!(err, HttpError::UnexpectedEof));
    }

    #[test]
    fn test_response_head() {
        let response = Response::json(Status::BadRequest, "{}").with_header("Vary", "Origin");
        let head = String::from_utf8(response.head_bytes()).unwrap();
        assert_eq!(
            head,
            "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nVary: Origin\r\nContent-Length: 2\r\nConnection: close\r\n\r\n"
        );
    }
}
