//! Route registration: collects module routes + system endpoints.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::info;

/// Build the complete router: `/`, `/health`, and every module under `/api`.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut api = Router::new();
    for (name, router) in module_routes {
        info!("mounting module {name} under /api");
        api = api.merge(router);
    }

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn(log_request))
}

/// Log one line per request: method, path, status, latency.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let resp = next.run(req).await;

    info!(
        %method,
        path = %uri.path(),
        status = resp.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    resp
}

/// Static service description.
async fn index() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "message": "IssueForge API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "SQLite",
        "endpoints": [
            "GET /api/issues - Get all issues",
            "POST /api/issues - Create new issue",
            "PUT /api/issues/{id} - Update issue by ID",
            "DELETE /api/issues/{id} - Delete issue by ID",
        ],
    }))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use issueforge_core::Module;
    use issueforge_issue::IssueModule;
    use issueforge_sql::{SQLStore, SqliteStore};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let module = IssueModule::new(db).unwrap();
        build_router(vec![(module.name(), module.routes())])
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn index_describes_service() {
        let (status, body) = get_json(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "IssueForge API");
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn issues_mounted_under_api() {
        let (status, body) = get_json(app(), "/api/issues").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
