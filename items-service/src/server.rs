//! HTTP server with graceful shutdown

use axum::{error_handling::HandleErrorLayer, http::HeaderName, BoxError, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::{Error, Result},
    middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer},
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrap the application router in the transport middleware stack
    ///
    /// Outermost first: request ID assignment, request ID propagation,
    /// sensitive header masking, tracing, timeout, CORS (unless `off`).
    /// A timed-out request gets the standard 500 body.
    pub fn with_middleware(&self, app: Router) -> Result<Router> {
        let request_id_header = self.request_id_header()?;

        let middleware = ServiceBuilder::new()
            .layer(request_id_layer(request_id_header.clone()))
            .layer(request_id_propagation_layer(request_id_header))
            .layer(sensitive_headers_layer())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(self.config.service.timeout())
            .option_layer(self.build_cors_layer());

        Ok(app.layer(middleware))
    }

    /// Run the server with the given router until SIGINT or SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.with_middleware(app)?;

        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server is running on http://localhost:{}", addr.port());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn request_id_header(&self) -> Result<HeaderName> {
        let name = &self.config.middleware.request_id_header;
        HeaderName::try_from(name.as_str()).map_err(|e| {
            Error::from(figment::Error::from(format!(
                "invalid middleware.request_id_header '{}': {}",
                name, e
            )))
        })
    }

    /// Log middleware configuration for debugging
    fn log_middleware_config(&self) {
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: enabled");
        tracing::info!(
            "  - Request ID header: {}",
            self.config.middleware.request_id_header
        );
        tracing::info!(
            "  - Request body limit: {} KB",
            self.config.middleware.body_limit_kb
        );
        tracing::info!("  - CORS mode: {}", self.config.middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
    }

    /// Build CORS layer based on configuration; `None` when CORS is off
    fn build_cors_layer(&self) -> Option<CorsLayer> {
        match self.config.middleware.cors_mode.as_str() {
            "off" => None,
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                Some(CorsLayer::permissive())
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                Some(CorsLayer::new())
            }
            other => {
                tracing::warn!("Unknown CORS mode: {}, leaving CORS off", other);
                None
            }
        }
    }
}

/// Render errors raised by the middleware stack (timeouts) as JSON
async fn handle_middleware_error(err: BoxError) -> Error {
    if err.is::<Elapsed>() {
        Error::Internal("Request timed out".to_string())
    } else {
        Error::Internal(err.to_string())
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{routes::router, state::AppState};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app_with_middleware(config: Config) -> Router {
        let server = Server::new(config.clone());
        let state = AppState::from_config(config);
        server.with_middleware(router(state)).unwrap()
    }

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }

    #[tokio::test]
    async fn test_response_carries_generated_request_id() {
        let app = app_with_middleware(Config::default());
        let request = Request::builder().uri("/items").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers()["x-request-id"].to_str().unwrap();
        assert!(id.starts_with("req_"));
    }

    #[tokio::test]
    async fn test_client_request_id_is_propagated() {
        let mut config = Config::default();
        config.middleware.request_id_header = "x-correlation-id".to_string();
        let app = app_with_middleware(config);
        let request = Request::builder()
            .uri("/items/doesNotExist")
            .header("x-correlation-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-correlation-id"], "abc-123");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_renders_internal_error() {
        async fn slow() -> &'static str {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            "late"
        }

        let mut config = Config::default();
        config.service.timeout_secs = 1;
        let app = Server::new(config)
            .with_middleware(Router::new().route("/slow", axum::routing::get(slow)))
            .unwrap();
        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "message": "Something went wrong on the server.",
                "error": "Request timed out",
            })
        );
    }

    #[tokio::test]
    async fn test_no_cors_headers_by_default() {
        let app = app_with_middleware(Config::default());
        let request = Request::builder()
            .uri("/items")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }

    #[tokio::test]
    async fn test_permissive_cors_when_configured() {
        let mut config = Config::default();
        config.middleware.cors_mode = "permissive".to_string();
        let app = app_with_middleware(config);
        let request = Request::builder()
            .uri("/items")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_invalid_request_id_header_is_config_error() {
        let mut config = Config::default();
        config.middleware.request_id_header = "not a header".to_string();
        let server = Server::new(config);

        let err = server.with_middleware(Router::new()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
