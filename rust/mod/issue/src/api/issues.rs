use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use issueforge_core::ServiceError;

use crate::model::{CreateIssueRequest, Issue, IssueId, UpdateIssueRequest};
use crate::service::IssueService;

type ServiceState = Arc<IssueService>;

pub fn router(service: Arc<IssueService>) -> Router {
    Router::new()
        .route("/issues", get(list_issues).post(create_issue))
        .route("/issues/{id}", put(update_issue).delete(delete_issue))
        .with_state(service)
}

/// Report malformed bodies as validation failures (400) rather than the
/// extractor's own status codes.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ServiceError::Validation(rejection.body_text()))
}

// ---------------------------------------------------------------------------
// GET /issues
// ---------------------------------------------------------------------------

async fn list_issues(State(svc): State<ServiceState>) -> Result<Json<Vec<Issue>>, ServiceError> {
    Ok(Json(svc.list()?))
}

// ---------------------------------------------------------------------------
// POST /issues
// ---------------------------------------------------------------------------

async fn create_issue(
    State(svc): State<ServiceState>,
    payload: Result<Json<CreateIssueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Issue>), ServiceError> {
    let issue = svc.create(body(payload)?)?;
    Ok((StatusCode::CREATED, Json(issue)))
}

// ---------------------------------------------------------------------------
// PUT /issues/{id}
// ---------------------------------------------------------------------------

async fn update_issue(
    State(svc): State<ServiceState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateIssueRequest>, JsonRejection>,
) -> Result<Json<Issue>, ServiceError> {
    // The id is checked first so a bad id wins over a bad body.
    let id = IssueId::from_param(&id)?;
    let issue = svc.update(&id, body(payload)?)?;
    Ok(Json(issue))
}

// ---------------------------------------------------------------------------
// DELETE /issues/{id}
// ---------------------------------------------------------------------------

async fn delete_issue(
    State(svc): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = IssueId::from_param(&id)?;
    let issue = svc.delete(&id)?;
    Ok(Json(serde_json::json!({
        "message": "Issue deleted successfully",
        "deletedIssue": issue,
    })))
}
