//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Hand each request to the interceptor, then to the upstream
//! - Drain in-flight requests on shutdown

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, Request},
    response::Response,
    routing::any,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assets::AssetStore;
use crate::cache::ResponseCache;
use crate::config::ProxyConfig;
use crate::http::observer::ResponseObserver;
use crate::http::upstream::{Upstream, UpstreamError};
use crate::intercept::{Disposition, RequestInterceptor};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub interceptor: Arc<RequestInterceptor>,
    pub upstream: Arc<Upstream>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and assets.
    pub fn new(config: ProxyConfig, assets: Arc<AssetStore>) -> Result<Self, UpstreamError> {
        let upstream = Arc::new(Upstream::new(&config.upstream)?);
        let interceptor = Arc::new(RequestInterceptor::new(
            config.interception.clone(),
            config.context.clone(),
            assets,
            Arc::new(ResponseCache::new()),
            config.listener.max_body_bytes,
        ));

        let state = AppState { interceptor, upstream };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            // Outer bound; the upstream client's own 504 normally fires first.
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.upstream.request_timeout_secs + config.upstream.connect_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires, then drain.
    ///
    /// The shutdown subscription is taken before the future is returned, so
    /// a trigger that races the first poll is not lost.
    pub fn run(
        self,
        listener: TcpListener,
        shutdown: &Shutdown,
    ) -> impl Future<Output = Result<(), std::io::Error>> + Send + 'static {
        let mut stop = shutdown.subscribe();
        async move {
            let addr = listener.local_addr()?;
            tracing::info!(
                address = %addr,
                target = %self.config.upstream.target,
                "HTTP server starting"
            );

            axum::serve(listener, self.router)
                .with_graceful_shutdown(async move {
                    let _ = stop.recv().await;
                    tracing::info!("Shutdown signal received");
                })
                .await?;

            tracing::info!("HTTP server stopped");
            Ok(())
        }
    }
}

/// Intercept, then forward whatever still needs the upstream.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        host = request.headers().get(header::HOST).and_then(|v| v.to_str().ok()).unwrap_or(""),
        "Received request"
    );

    let response = match state.interceptor.intercept(request).await {
        Disposition::Handled(response) => response,
        Disposition::Rewritten(request) => state.upstream.forward(request, None).await,
        Disposition::PassThrough { request, cache_key } => {
            let observer = cache_key.map(|key| ResponseObserver::new(state.interceptor.cache().clone(), key));
            state.upstream.forward(request, observer).await
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
