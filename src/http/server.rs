//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wire the upstream stack: reqwest transport → retries → client → snapshot
//!   source → service
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, metrics)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::DirectoryConfig;
use crate::directory::{
    DirectoryClient, DirectoryService, DirectorySnapshotCache, EmployeeDirectory, PassThroughSource,
    SnapshotSource,
};
use crate::http::handlers::*;
use crate::http::middleware::track_requests;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::resilience::{RetryPolicy, RetryingTransport};
use crate::upstream::HttpTransport;

/// Errors while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: DirectoryService,
}

/// HTTP server for the directory API.
pub struct HttpServer {
    router: Router,
    config: DirectoryConfig,
}

impl HttpServer {
    /// Create a new HTTP server talking to the configured upstream.
    pub fn new(config: DirectoryConfig) -> Result<Self, ServerError> {
        let service = build_service(&config)?;
        Ok(Self::with_service(config, service))
    }

    /// Create a server around an already wired service.
    pub fn with_service(config: DirectoryConfig, service: DirectoryService) -> Self {
        let router = Self::build_router(&config, AppState { service });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DirectoryConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/v1/employee", get(list_employees).post(create_employee))
            .route("/api/v1/employee/search/{fragment}", get(search_employees))
            .route("/api/v1/employee/highestSalary", get(highest_salary))
            .route(
                "/api/v1/employee/topTenHighestEarningEmployeeNames",
                get(top_earners),
            )
            .route("/api/v1/employee/{id}", get(get_employee).delete(delete_employee))
            .route("/health", get(health))
            .route("/admin/cache", get(cache_status))
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
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

/// Assemble the upstream stack described by `config`.
pub fn build_service(config: &DirectoryConfig) -> Result<DirectoryService, ServerError> {
    let transport = RetryingTransport::new(
        HttpTransport::new(&config.upstream)?,
        RetryPolicy::from(&config.retries),
    );
    let client: Arc<dyn EmployeeDirectory> =
        Arc::new(DirectoryClient::new(Arc::new(transport), &config.upstream.base_url)?);

    let snapshots: Arc<dyn SnapshotSource> = if config.cache.enabled {
        Arc::new(DirectorySnapshotCache::new(client.clone()))
    } else {
        tracing::warn!("Snapshot cache disabled, every read goes upstream");
        Arc::new(PassThroughSource::new(client.clone()))
    };

    Ok(DirectoryService::new(client, snapshots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::{alice, bob, FakeDirectory};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    const TOP_EARNERS_URI: &str = "/api/v1/employee/topTenHighestEarningEmployeeNames";

    fn server(directory: Vec<crate::directory::Employee>) -> (Arc<FakeDirectory>, Router) {
        let directory = Arc::new(FakeDirectory::with(directory));
        let cache = Arc::new(DirectorySnapshotCache::new(directory.clone()));
        let service = DirectoryService::new(directory.clone(), cache);
        let server = HttpServer::with_service(DirectoryConfig::default(), service);
        (directory, server.router())
    }

    async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_read_routes() {
        let (directory, router) = server(vec![alice(), bob()]);

        let (status, body) = call(&router, "GET", "/api/v1/employee", None).await;
        assert_eq!(status, StatusCode::OK);
        let employees: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(employees[0]["employee_name"], "Alice");
        assert_eq!(employees[1]["employee_name"], "Bob");

        let (status, body) = call(&router, "GET", "/api/v1/employee/highestSalary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1000");

        let (_, body) = call(&router, "GET", TOP_EARNERS_URI, None).await;
        assert_eq!(body, r#"["Alice","Bob"]"#);

        let (_, body) = call(&router, "GET", "/api/v1/employee/search/ali", None).await;
        let found: Vec<crate::directory::Employee> = serde_json::from_str(&body).unwrap();
        assert_eq!(found, vec![alice()]);

        assert_eq!(directory.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_directory_routes() {
        let (_, router) = server(Vec::new());

        let (status, body) = call(&router, "GET", "/api/v1/employee/highestSalary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "0");

        let (status, body) = call(&router, "GET", TOP_EARNERS_URI, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_, router) = server(vec![alice()]);

        let (status, _) = call(&router, "GET", "/api/v1/employee/1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&router, "GET", "/api/v1/employee/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let (directory, router) = server(vec![alice()]);

        let (status, body) = call(
            &router,
            "POST",
            "/api/v1/employee",
            Some(r#"{"name":"Charlie","salary":80000,"age":28,"title":"QA Engineer"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(created["employee_name"], "Charlie");
        assert_eq!(created["employee_salary"], 80000);

        let (status, _) = call(
            &router,
            "POST",
            "/api/v1/employee",
            Some(r#"{"name":"","salary":80000,"age":28,"title":"QA Engineer"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&router, "DELETE", "/api/v1/employee/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Alice");

        let (status, _) = call(&router, "DELETE", "/api/v1/employee/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = call(&router, "GET", "/api/v1/employee", None).await;
        let names: Vec<crate::directory::Employee> = serde_json::from_str(&body).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, "Charlie");
        assert_eq!(directory.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_create_body_is_bad_request() {
        let (directory, router) = server(vec![alice()]);

        let bodies = [
            r#"{"name":"Carol","age":30,"title":"CTO"}"#,
            r#"{"name":"Carol","salary":-5,"age":30,"title":"CTO"}"#,
            "not json",
        ];
        for body in bodies {
            let (status, message) = call(&router, "POST", "/api/v1/employee", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert!(message.starts_with("Invalid employee input"), "message: {message}");
        }
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health_and_cache_status() {
        let (_, router) = server(vec![alice()]);

        let (status, body) = call(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"ok\""));

        call(&router, "GET", "/api/v1/employee", None).await;
        let (status, body) = call(&router, "GET", "/admin/cache", None).await;
        assert_eq!(status, StatusCode::OK);
        let cache: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(cache["populated"], true);
        assert_eq!(cache["records"], 1);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let (_, router) = server(vec![alice()]);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn test_build_service_rejects_bad_url() {
        let mut config = DirectoryConfig::default();
        config.upstream.base_url = "not a url".to_string();
        assert!(matches!(build_service(&config), Err(ServerError::BaseUrl(_))));
    }
}
