//! Per-request decision: answer locally, rewrite, or pass through.

use axum::{
    body::{Body, Bytes},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::assets::{AssetStore, ContextNotes};
use crate::cache::{ContentHash, ResponseCache};
use crate::config::{ContextConfig, InterceptionConfig};
use crate::emulation;
use crate::observability::metrics;
use crate::payload::RequestPayload;
use crate::pipeline::{self, PassContext};

/// What the server should do with a request.
pub enum Disposition {
    /// Answered without contacting the upstream.
    Handled(Response),
    /// Forward this re-encoded request.
    Rewritten(Request<Body>),
    /// Forward unchanged. A `cache_key` asks for the response to be recorded.
    PassThrough {
        request: Request<Body>,
        cache_key: Option<ContentHash>,
    },
}

impl Disposition {
    fn pass(request: Request<Body>) -> Self {
        Self::PassThrough {
            request,
            cache_key: None,
        }
    }
}

/// Applies the interception rules to inbound requests.
#[derive(Debug, Clone)]
pub struct RequestInterceptor {
    settings: InterceptionConfig,
    context: ContextConfig,
    assets: Arc<AssetStore>,
    cache: Arc<ResponseCache>,
    body_limit: usize,
}

impl RequestInterceptor {
    pub fn new(
        settings: InterceptionConfig,
        context: ContextConfig,
        assets: Arc<AssetStore>,
        cache: Arc<ResponseCache>,
        body_limit: usize,
    ) -> Self {
        Self {
            settings,
            context,
            assets,
            cache,
            body_limit,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub async fn intercept(&self, request: Request<Body>) -> Disposition {
        if request.method() != Method::POST {
            return Disposition::pass(request);
        }
        let path = request.uri().path();
        let is_messages = path == self.settings.messages_path;
        let is_count_tokens = path == self.settings.count_tokens_path;
        if !is_messages && !is_count_tokens {
            return Disposition::pass(request);
        }

        let (parts, body) = request.into_parts();
        let raw = match axum::body::to_bytes(body, self.body_limit).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
                return Disposition::Handled((StatusCode::BAD_REQUEST, "Failed to read request body").into_response());
            }
        };

        if is_messages {
            self.messages(parts, raw).await
        } else {
            self.count_tokens(parts, raw)
        }
    }

    async fn messages(&self, parts: Parts, raw: Bytes) -> Disposition {
        let mut payload: RequestPayload = match serde_json::from_slice(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Messages body is not a recognizable request; forwarding as is");
                metrics::record_interception("passthrough");
                return Disposition::pass(Request::from_parts(parts, Body::from(raw)));
            }
        };

        if pipeline::should_suppress(&payload, &self.settings) {
            tracing::info!(model = %payload.model, "Suppressed verb generation request");
            metrics::record_interception("suppressed");
            return Disposition::Handled(emulation::streamed_reply());
        }

        let notes = if pipeline::wants_context_notes(&payload, &self.settings) {
            ContextNotes::load(&self.context).await
        } else {
            ContextNotes::default()
        };
        let assets = self.assets.current();
        let ctx = PassContext::new(&self.settings, &assets, &notes);

        if !pipeline::run(&mut payload, &ctx) {
            metrics::record_interception("passthrough");
            return Disposition::pass(Request::from_parts(parts, Body::from(raw)));
        }

        match serde_json::to_vec(&payload) {
            Ok(encoded) => {
                tracing::debug!(before = raw.len(), after = encoded.len(), "Rewrote messages request");
                metrics::record_interception("rewritten");
                let mut parts = parts;
                set_content_length(&mut parts.headers, encoded.len());
                Disposition::Rewritten(Request::from_parts(parts, Body::from(encoded)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode rewritten request; forwarding original");
                metrics::record_interception("passthrough");
                Disposition::pass(Request::from_parts(parts, Body::from(raw)))
            }
        }
    }

    fn count_tokens(&self, parts: Parts, raw: Bytes) -> Disposition {
        let hash = ContentHash::of(&raw);
        match self.cache.get(&hash) {
            Some(cached) => {
                tracing::info!(hash = %hash.short(), "Token count served from cache");
                metrics::record_cache_lookup(true);
                Disposition::Handled(cached_response(cached))
            }
            None => {
                tracing::debug!(hash = %hash.short(), "Token count cache miss");
                metrics::record_cache_lookup(false);
                Disposition::PassThrough {
                    request: Request::from_parts(parts, Body::from(raw)),
                    cache_key: Some(hash),
                }
            }
        }
    }
}

fn set_content_length(headers: &mut HeaderMap, len: usize) {
    headers.remove(header::TRANSFER_ENCODING);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
}

fn cached_response(body: Bytes) -> Response {
    let len = body.len();
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    response
}
