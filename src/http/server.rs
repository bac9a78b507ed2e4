//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Compile the route table from configuration
//! - Create the Axum Router with the dispatch fallback
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch matched requests to the view handler
//! - Answer unmatched paths with 404
//!
//! # Design Decisions
//! - Routes match the percent-decoded path, so `0%3A4` and `0:4` resolve alike
//! - A path that does not decode to UTF-8 is a 400, not a 404

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::handler::{EchoHandler, ViewHandler};
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::observability::metrics;
use crate::routing::{iviewer_routes, RouteError, RouteTable, View};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable<View>>,
    pub handler: Arc<dyn ViewHandler>,
}

/// HTTP server for the iviewer routes.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    table: Arc<RouteTable<View>>,
}

impl HttpServer {
    /// Create a server answering with `EchoHandler`.
    pub fn new(config: ServerConfig) -> Result<Self, RouteError> {
        Self::with_handler(config, Arc::new(EchoHandler))
    }

    /// Create a server dispatching matched requests to `handler`.
    pub fn with_handler(config: ServerConfig, handler: Arc<dyn ViewHandler>) -> Result<Self, RouteError> {
        let table = Arc::new(iviewer_routes(&config.routing.mount_prefix)?);

        let state = AppState {
            table: table.clone(),
            handler,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            table,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn table(&self) -> &Arc<RouteTable<View>> {
        &self.table
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_prefix = %self.table.mount_prefix(),
            routes = self.table.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request path and hand it to the view handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().to_string();
    let path = match percent_decode_str(request.uri().path()).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            tracing::warn!(request_id = %request_id, path = %request.uri().path(), "Path is not valid UTF-8");
            metrics::record_request(metrics::NO_ROUTE, 400, start_time);
            return (StatusCode::BAD_REQUEST, "Request path is not valid UTF-8").into_response();
        }
    };

    let matched = match state.table.resolve(&path) {
        Some(m) => m,
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(metrics::NO_ROUTE, 404, start_time);
            return (StatusCode::NOT_FOUND, "No matching route found").into_response();
        }
    };

    let route = matched.name.clone();
    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %path,
        route = %route,
        view = %matched.handler,
        "Dispatching request"
    );

    let response = state.handler.handle(matched, request).await;
    metrics::record_request(&route, response.status().as_u16(), start_time);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteMatch;
    use async_trait::async_trait;
    use tower::ServiceExt;

    fn config(prefix: &str) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.routing.mount_prefix = prefix.to_string();
        config
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unmatched_path_is_404() {
        let server = HttpServer::new(config("/")).unwrap();
        let response = get(server.router(), "/unknown/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let server = HttpServer::new(config("/")).unwrap();
        let response = get(server.router(), "/shape_stats").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_invalid_mount_prefix() {
        assert!(matches!(
            HttpServer::new(config("iviewer")),
            Err(RouteError::InvalidMountPrefix(_))
        ));
    }

    #[tokio::test]
    async fn test_percent_encoded_path_is_decoded() {
        let server = HttpServer::new(config("/")).unwrap();

        let response = get(server.router(), "/rois_by_plane/5/2/0%3A4/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["params"]["the_t"], "0:4");

        let response = get(server.router(), "/persist%5Frois/").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_utf8_path_is_400() {
        let server = HttpServer::new(config("/")).unwrap();
        let response = get(server.router(), "/image_data/%FF/").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    struct Teapot;

    #[async_trait]
    impl ViewHandler for Teapot {
        async fn handle(&self, matched: RouteMatch<View>, _request: Request<Body>) -> Response {
            (StatusCode::IM_A_TEAPOT, matched.handler.to_string()).into_response()
        }
    }

    #[tokio::test]
    async fn test_custom_handler_receives_view() {
        let server = HttpServer::with_handler(config("/iviewer/"), Arc::new(Teapot)).unwrap();
        let response = get(server.router(), "/iviewer/well_images/").await;
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"well_images");
    }
}
