//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URL onto the configured target
//! - Strip hop-by-hop headers in both directions
//! - Stream request and response bodies without buffering
//! - Tee the response through a `ResponseObserver` when one is attached
//!
//! # Design Decisions
//! - No retries and no redirects; the client sees what the upstream said
//! - Only the wait for the response head is bounded; streamed bodies are not
//! - Connection failures become 502, a late response head becomes 504

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use hyper::body::Body as HttpBody;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::observer::ResponseObserver;

/// Headers that describe one connection and must not be relayed.
static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Error building the upstream client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream target '{0}': {1}")]
    Target(String, url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Client for the API the proxy sits in front of.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    target: Url,
    response_timeout: Duration,
}

impl Upstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let target = Url::parse(&config.target).map_err(|e| UpstreamError::Target(config.target.clone(), e))?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            target,
            response_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    /// Send `request` upstream and relay the answer.
    pub async fn forward(&self, request: Request<Body>, observer: Option<ResponseObserver>) -> Response {
        let (parts, body) = request.into_parts();
        let url = rewrite_url(&self.target, &parts.uri);

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        if observer.is_some() {
            // Cached bodies are replayed without their original headers.
            headers.remove(header::ACCEPT_ENCODING);
        }

        tracing::debug!(method = %parts.method, url = %url, "Forwarding upstream");
        let mut outbound = self.client.request(parts.method, url).headers(headers);
        if !HttpBody::is_end_stream(&body) {
            outbound = outbound.body(streaming_body(body));
        }
        let send = outbound.send();

        let upstream = match tokio::time::timeout(self.response_timeout, send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Upstream error");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
            Err(_) => {
                tracing::error!(timeout = ?self.response_timeout, "Upstream timed out");
                return (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out").into_response();
            }
        };

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);
        tracing::info!(status = %status, "Upstream responded");
        tracing::debug!(headers = ?headers, "Upstream response headers");

        if observer.is_some() {
            // Chunked framing makes the server poll the stream to its end,
            // which is where the copy is stored.
            headers.remove(header::CONTENT_LENGTH);
        }

        let stream = upstream.bytes_stream().boxed();
        let body = match observer {
            Some(observer) => Body::from_stream(observer.observe(status, stream)),
            None => Body::from_stream(stream),
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

/// Join the target's path with the request path (one slash between them)
/// and append both query strings.
pub fn rewrite_url(target: &Url, uri: &Uri) -> Url {
    let mut url = target.clone();

    let base = target.path();
    let path = uri.path();
    let joined = match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    };
    url.set_path(&joined);

    let query = [target.query(), uri.query()]
        .into_iter()
        .flatten()
        .filter(|q| !q.is_empty())
        .collect::<Vec<_>>()
        .join("&");
    url.set_query(if query.is_empty() { None } else { Some(&query) });

    url
}

/// Remove hop-by-hop headers, including any the `Connection` header names.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Relay an inbound body through a channel so the outbound client gets a
/// `Sync` stream. Frames are passed on as they arrive.
fn streaming_body(body: Body) -> reqwest::Body {
    let (tx, rx) = mpsc::channel::<Result<bytes::Bytes, axum::Error>>(16);
    tokio::spawn(async move {
        let mut frames = body.into_data_stream();
        while let Some(frame) = frames.next().await {
            let failed = frame.is_err();
            if tx.send(frame).await.is_err() || failed {
                break;
            }
        }
    });
    reqwest::Body::wrap_stream(ReceiverStream::new(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn rewrite_onto_bare_host() {
        let uri: Uri = "/v1/messages?beta=true".parse().unwrap();
        assert_eq!(
            rewrite_url(&url("https://api.anthropic.com"), &uri).as_str(),
            "https://api.anthropic.com/v1/messages?beta=true"
        );
    }

    #[test]
    fn rewrite_joins_base_path() {
        let uri: Uri = "/v1/messages".parse().unwrap();
        assert_eq!(
            rewrite_url(&url("http://127.0.0.1:9000/api"), &uri).as_str(),
            "http://127.0.0.1:9000/api/v1/messages"
        );
        assert_eq!(
            rewrite_url(&url("http://127.0.0.1:9000/api/"), &uri).as_str(),
            "http://127.0.0.1:9000/api/v1/messages"
        );
    }

    #[test]
    fn rewrite_merges_queries() {
        let uri: Uri = "/v1/models?limit=5".parse().unwrap();
        assert_eq!(
            rewrite_url(&url("http://upstream/?key=abc"), &uri).as_str(),
            "http://upstream/v1/models?key=abc&limit=5"
        );
    }

    #[test]
    fn hop_by_hop_headers_are_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", HeaderValue::from_static("secret"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 2);
        assert!(headers.contains_key(header::CONTENT_TYPE));
        assert!(headers.contains_key("x-api-key"));
    }
}
