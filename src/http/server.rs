//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (tracing, request ID)
//! - Resolve each request to a machine's extension API endpoint
//! - Forward the request and relay the backend response verbatim
//! - Map transport failures to caller-facing 5xx responses
//!
//! # Design Decisions
//! - One handler for every path and method; routing happens in the
//!   resolver, not in Axum's route table
//! - Resolution failures end in 404 here and are never retried
//! - The backend's status, headers and body pass through untouched;
//!   a non-2xx backend response is not an error

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::headers::{HeaderRelay, PassthroughRelay};
use crate::http::proxy::{ProxyClient, ProxyError, ProxyRequest};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::registry::MachineRegistry;
use crate::routing::EndpointResolver;

/// Application state injected into the proxy handler.
///
/// Immutable after construction; shared across all request tasks.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<EndpointResolver>,
    pub client: ProxyClient,
    pub header_relay: Arc<dyn HeaderRelay>,
    pub upstream_deadline: Option<Duration>,
}

/// HTTP server for the machine extension proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and registry.
    pub fn new(config: ProxyConfig, registry: Arc<dyn MachineRegistry>) -> Self {
        let resolver = Arc::new(EndpointResolver::new(registry, config.extension.api_port));

        let client: ProxyClient = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            resolver,
            client,
            header_relay: Arc::new(PassthroughRelay),
            upstream_deadline: config.timeouts.upstream_secs.map(Duration::from_secs),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
///
/// Resolves the machine endpoint, forwards the request and relays the
/// response. Always produces a response.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "proxying request"
    );

    let base_url = match state.resolver.resolve(&path).await {
        Ok(url) => url,
        Err(reason) => {
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                reason = %reason,
                "request not forwarded"
            );
            metrics::record_request(method.as_str(), StatusCode::NOT_FOUND.as_u16(), started);
            return (
                StatusCode::NOT_FOUND,
                format!("Request can't be forwarded to machine. No machine id is found in {path}"),
            )
                .into_response();
        }
    };

    let proxy_request = ProxyRequest::assemble(base_url, request, state.header_relay.as_ref());

    match proxy_request
        .execute(&state.client, state.upstream_deadline)
        .await
    {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(method.as_str(), status.as_u16(), started);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            let status = match error {
                ProxyError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            tracing::error!(
                request_id = %request_id,
                path = %path,
                error = %error,
                "upstream exchange failed"
            );
            metrics::record_request(method.as_str(), status.as_u16(), started);
            (status, "Upstream request failed").into_response()
        }
    }
}
