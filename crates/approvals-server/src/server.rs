use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use approvals_core::{ApprovalError, ApprovalStore, ApprovalsWorkflow};

use crate::{config::AppConfig, handlers, middleware as app_middleware, store::HttpApprovalStore};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub workflow: ApprovalsWorkflow,
    /// Static link table rendered on the approvals page.
    pub links: Arc<BTreeMap<String, String>>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, store: Arc<dyn ApprovalStore>) -> Self {
        Self {
            workflow: ApprovalsWorkflow::new(store),
            links: Arc::new(cfg.approvals.links.clone()),
        }
    }
}

pub struct ApprovalsServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig, store: Arc<dyn ApprovalStore>) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route(
            "/approvals",
            get(handlers::approvals_get).post(handlers::approvals_post),
        )
        .route("/healthz", get(handlers::healthz))
        .with_state(AppState::new(cfg, store))
        // Middleware stack (outermost last: request id -> trace -> body limit)
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = tracing::field::Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    store: Option<Arc<dyn ApprovalStore>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            store: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses `store` instead of the HTTP store configured by `approvals.uri`.
    pub fn with_store(mut self, store: Arc<dyn ApprovalStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validates the configuration and builds the server.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `approvals.uri` is missing or invalid
    /// and no store was supplied.
    pub fn build(self) -> Result<ApprovalsServer, ApprovalError> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let uri = self
                    .config
                    .approvals
                    .store_url()
                    .map_err(ApprovalError::configuration)?;
                tracing::info!(uri = %uri, "Using HTTP approvals store");
                Arc::new(HttpApprovalStore::new(
                    uri,
                    self.config.approvals.request_timeout(),
                )?)
            }
        };

        let app = build_app(&self.config, store);

        Ok(ApprovalsServer {
            addr: self.addr,
            app,
        })
    }
}

impl ApprovalsServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApprovalsConfig;
    use approvals_core::{Grant, GrantStatus, InMemoryApprovalStore, Principal};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    #[test]
    fn test_build_requires_store_uri() {
        let err = ServerBuilder::new().build().err().unwrap();
        assert!(matches!(err, ApprovalError::Configuration { .. }));
    }

    #[test]
    fn test_build_with_configured_uri() {
        let cfg = AppConfig {
            approvals: ApprovalsConfig {
                uri: Some("http://127.0.0.1:9/approvals".into()),
                ..ApprovalsConfig::default()
            },
            ..AppConfig::default()
        };
        let server = ServerBuilder::new().with_config(cfg).build().unwrap();
        assert_eq!(server.addr().port(), 8080);
    }

    #[test]
    fn test_supplied_store_skips_uri_check() {
        let server = ServerBuilder::new()
            .with_store(Arc::new(InMemoryApprovalStore::new()))
            .build()
            .unwrap();
        assert_eq!(server.addr(), AppConfig::default().addr());
    }

    #[tokio::test]
    async fn test_router_serves_approvals_form() {
        let store = Arc::new(InMemoryApprovalStore::new());
        store
            .insert(
                &Principal::bearer("t"),
                vec![Grant::new("app1", "read", GrantStatus::Approved)],
            )
            .await;
        let app = build_app(&AppConfig::default(), store.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/approvals")
                    .header(header::AUTHORIZATION, "Bearer t")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/approvals")
                    .header(header::AUTHORIZATION, "Bearer t")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(""))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let grants = store.grants(&Principal::bearer("t")).await;
        assert_eq!(grants[0].status, GrantStatus::Denied);
    }
}
