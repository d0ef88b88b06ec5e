//! Route handlers for the employee API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::directory::{CacheStatus, DirectoryError, Employee, EmployeeCreateRequest, TOP_EARNERS};
use crate::http::server::AppState;

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::InvalidInput(_) | DirectoryError::CreationFailed => {
                StatusCode::BAD_REQUEST
            }
            DirectoryError::DeletionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

pub async fn cache_status(State(state): State<AppState>) -> Response {
    match state.service.cache_status() {
        Some(status) => Json::<CacheStatus>(status).into_response(),
        None => (StatusCode::NOT_FOUND, "Snapshot cache disabled").into_response(),
    }
}

pub async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    Json(state.service.all().await)
}

pub async fn search_employees(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Json<Vec<Employee>> {
    Json(state.service.search_by_name(&fragment).await)
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, DirectoryError> {
    state.service.find_by_id(&id).await.map(Json)
}

pub async fn highest_salary(State(state): State<AppState>) -> Json<u64> {
    Json(state.service.highest_salary().await)
}

pub async fn top_earners(State(state): State<AppState>) -> Response {
    let names = state.service.top_earner_names(TOP_EARNERS).await;
    if names.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(names).into_response()
    }
}

pub async fn create_employee(
    State(state): State<AppState>,
    request: Result<Json<EmployeeCreateRequest>, JsonRejection>,
) -> Result<Json<Employee>, DirectoryError> {
    let Json(request) =
        request.map_err(|rejection| DirectoryError::InvalidInput(rejection.body_text()))?;
    state.service.create(&request).await.map(Json)
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, DirectoryError> {
    state.service.delete_by_id(&id).await
}
