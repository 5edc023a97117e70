//! Common types used throughout the middleware pipeline.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

/// The HTTP request type used in the middleware pipeline.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building pipeline-generated responses.
pub trait ResponseExt {
    /// Creates a response with no body.
    fn empty(status: StatusCode) -> Response;

    /// Creates an `application/json` response from a serializable body.
    fn json<T: Serialize>(status: StatusCode, body: &T) -> Response;
}

impl ResponseExt for Response {
    fn empty(status: StatusCode) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        response
    }

    fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        let mut response = http::Response::new(Full::new(Bytes::from(bytes)));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

/// Returns the URL a request was made to.
///
/// Origin-form request targets are completed with the `Host` header when
/// one is present.
pub fn request_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.authority().is_some() {
        return uri.to_string();
    }

    let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
    match request
        .headers()
        .get(http::header::HOST)
        .and_then(|h| h.to_str().ok())
    {
        Some(host) => format!("http://{host}{target}"),
        None => target.to_string(),
    }
}
