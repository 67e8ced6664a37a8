use crate::json::{from_json, to_json, JsonError, ToJson};
use crate::records::{
    ApiError, AuthenticateRequest, AuthenticateResponse, InvalidateRequest, RefreshRequest,
    RefreshResponse, SignoutRequest, ValidateRequest,
};
use alloc::string::String;
use bytes::{Buf, BytesMut};
use core::fmt::{Display, Formatter, Write as _};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

///
/// An error resulting from an operation against the Yggdrasil API.
#[derive(Debug)]
pub enum YggdrasilError {
    ///
    /// The server answered with an unexpected HTTP status. If the response body was parseable as
    /// an [`ApiError`], it is attached; if not, the status alone is surfaced and `api` stays
    /// `None`.
    Status {
        ///
        /// The HTTP status code.
        status: u16,

        ///
        /// The error reported by Yggdrasil itself, if any. When this is `None` it should be
        /// assumed that the API could not be contacted or behaved in an unexpected manner.
        api: Option<ApiError>,
    },

    ///
    /// A success response carried a body this crate could not parse.
    Json(JsonError),

    ///
    /// The byte stream failed, or the response was not intelligible HTTP.
    Io(io::Error),
}

impl Display for YggdrasilError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            YggdrasilError::Status { status, api } => {
                write!(f, "HTTP status {status}")?;
                if let Some(api) = api {
                    write!(f, ": {} - {}", api.error, api.error_message)?;
                    if let Some(cause) = &api.cause {
                        write!(f, " - {cause}")?;
                    }
                }
                Ok(())
            }
            YggdrasilError::Json(e) => write!(f, "response body: {e}"),
            YggdrasilError::Io(e) => e.fmt(f),
        }
    }
}

impl core::error::Error for YggdrasilError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            YggdrasilError::Status { .. } => None,
            YggdrasilError::Json(e) => Some(e),
            YggdrasilError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for YggdrasilError {
    fn from(value: io::Error) -> Self {
        YggdrasilError::Io(value)
    }
}

///
/// A request record that knows its endpoint and how to interpret the server's answer.
pub trait ApiRequest: ToJson {
    ///
    /// The request target, e.g. `/authenticate`.
    const ENDPOINT: &'static str;

    ///
    /// What a successful exchange produces.
    type Response;

    ///
    /// Maps an HTTP status and response body to the typed result.
    ///
    /// # Errors
    /// [`YggdrasilError::Status`] for unexpected statuses (with the body parsed as [`ApiError`]
    /// where possible), [`YggdrasilError::Json`] for unparseable success bodies.
    fn interpret(status: u16, body: &str) -> Result<Self::Response, YggdrasilError>;
}

///
/// Builds the error for a non-success status, attaching the body as an [`ApiError`] if it
/// parses as one.
fn status_error(status: u16, body: &str) -> YggdrasilError {
    YggdrasilError::Status {
        status,
        api: from_json::<ApiError>(body).ok(),
    }
}

impl ApiRequest for AuthenticateRequest {
    const ENDPOINT: &'static str = "/authenticate";

    type Response = AuthenticateResponse;

    fn interpret(status: u16, body: &str) -> Result<Self::Response, YggdrasilError> {
        if status != 200 {
            return Err(status_error(status, body));
        }

        from_json(body).map_err(YggdrasilError::Json)
    }
}

impl ApiRequest for RefreshRequest {
    const ENDPOINT: &'static str = "/refresh";

    type Response = RefreshResponse;

    fn interpret(status: u16, body: &str) -> Result<Self::Response, YggdrasilError> {
        if status != 200 {
            return Err(status_error(status, body));
        }

        from_json(body).map_err(YggdrasilError::Json)
    }
}

impl ApiRequest for ValidateRequest {
    const ENDPOINT: &'static str = "/validate";

    ///
    /// Whether the access token is still usable.
    type Response = bool;

    fn interpret(status: u16, body: &str) -> Result<Self::Response, YggdrasilError> {
        match status {
            204 => Ok(true),
            403 => Ok(false),
            _ => Err(status_error(status, body)),
        }
    }
}

impl ApiRequest for SignoutRequest {
    const ENDPOINT: &'static str = "/signout";

    type Response = ();

    fn interpret(status: u16, body: &str) -> Result<Self::Response, YggdrasilError> {
        match status {
            204 => Ok(()),
            _ => Err(status_error(status, body)),
        }
    }
}

impl ApiRequest for InvalidateRequest {
    const ENDPOINT: &'static str = "/invalidate";

    type Response = ();

    fn interpret(status: u16, body: &str) -> Result<Self::Response, YggdrasilError> {
        match status {
            204 => Ok(()),
            _ => Err(status_error(status, body)),
        }
    }
}

fn malformed() -> YggdrasilError {
    YggdrasilError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "malformed HTTP response",
    ))
}

fn unexpected_eof() -> YggdrasilError {
    YggdrasilError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed mid-response",
    ))
}

fn find_blank_line(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|window| window == b"\r\n\r\n")
}

///
/// Submits one Yggdrasil request over `stream` and interprets the response.
///
/// The request is sent as `POST <endpoint> HTTP/1.1` with the caller's `extra_headers` (e.g.
/// `Host`, `User-Agent`) followed by `Content-Type: application/json; charset=utf-8` and a
/// `Content-Length`; the body is the request's JSON serialization. The caller owns the stream:
/// connection establishment, TLS, timeouts, and cancellation all happen on its side of the
/// [`AsyncRead`]/[`AsyncWrite`] boundary.
///
/// `scratch` is the read buffer; it must outlive the call and should be reused across requests
/// to amortize allocation. The operation is single-shot: concurrent use of one stream is
/// undefined, and the connection should not be reused if this returns an error.
///
/// # Errors
/// [`YggdrasilError::Io`] for stream failures and unintelligible responses, otherwise whatever
/// [`ApiRequest::interpret`] yields for the response status and body.
pub async fn submit<S, R>(
    stream: &mut S,
    scratch: &mut BytesMut,
    request: &R,
    extra_headers: &[(&str, &str)],
) -> Result<R::Response, YggdrasilError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: ApiRequest + ?Sized,
{
    let body = to_json(request);

    let mut head = String::new();
    let _ = write!(head, "POST {} HTTP/1.1\r\n", R::ENDPOINT);
    for (name, value) in extra_headers {
        let _ = write!(head, "{name}: {value}\r\n");
    }
    let _ = write!(head, "Content-Type: application/json; charset=utf-8\r\n");
    let _ = write!(head, "Content-Length: {}\r\n\r\n", body.len());

    tracing::debug!(endpoint = R::ENDPOINT, "submitting Yggdrasil request");

    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.flush().await?;

    // response head
    let head_len = loop {
        if let Some(pos) = find_blank_line(scratch) {
            break pos;
        }

        if stream.read_buf(scratch).await? == 0 {
            return Err(unexpected_eof());
        }
    };

    let head = core::str::from_utf8(&scratch[..head_len]).map_err(|_| malformed())?;
    let mut lines = head.split("\r\n");

    let status_line = lines.next().ok_or_else(malformed)?;
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(malformed)?;

    let mut content_length = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = Some(value.trim().parse::<usize>().map_err(|_| malformed())?);
            }
        }
    }

    scratch.advance(head_len + 4);

    // response body: either exactly Content-Length bytes, or (absent the header) whatever the
    // server sends before closing the connection
    let body_bytes = match content_length {
        Some(length) => {
            while scratch.len() < length {
                if stream.read_buf(scratch).await? == 0 {
                    return Err(unexpected_eof());
                }
            }

            scratch.split_to(length)
        }
        None => {
            while stream.read_buf(scratch).await? != 0 {}
            scratch.split()
        }
    };

    let body = core::str::from_utf8(&body_bytes).map_err(|_| malformed())?;

    tracing::debug!(status, "Yggdrasil response received");

    R::interpret(status, body)
}
