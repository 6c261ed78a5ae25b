use crate::infra::{selection_from, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use enrollment::dashboard::dataset::LoadDiagnostics;
use enrollment::dashboard::filter::{available_years, default_years};
use enrollment::dashboard::{
    export_csv_bytes, DashboardReport, Dataset, FilteredTable, EXPORT_FILE_NAME,
};
use enrollment::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct YearsQuery {
    /// Comma separated; absent selects the most recent years, empty selects none.
    #[serde(default)]
    pub(crate) years: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct YearsResponse {
    pub(crate) available_years: Vec<i32>,
    pub(crate) default_years: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    pub(crate) available_years: Vec<i32>,
    pub(crate) default_years: Vec<i32>,
    pub(crate) diagnostics: LoadDiagnostics,
    pub(crate) report: DashboardReport,
}

pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/years", get(years_endpoint))
        .route("/api/v1/dashboard", get(dashboard_endpoint))
        .route("/api/v1/dashboard/upload", post(upload_endpoint))
        .route("/api/v1/export", get(export_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn years_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<YearsResponse>, AppError> {
    let dataset = state.dataset()?;
    Ok(Json(YearsResponse {
        available_years: available_years(&dataset),
        default_years: default_years(&dataset, state.dashboard.default_year_window),
    }))
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<YearsQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dataset = state.dataset()?;
    build_response(&dataset, &query, state.dashboard.default_year_window).map(Json)
}

pub(crate) async fn upload_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<YearsQuery>,
    body: String,
) -> Result<Json<DashboardResponse>, AppError> {
    let dataset = state
        .cache
        .load_bytes(body.as_bytes())
        .map_err(AppError::Upload)?;
    info!(rows = dataset.len(), "uploaded dataset accepted");
    build_response(&dataset, &query, state.dashboard.default_year_window).map(Json)
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<YearsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let dataset = state.dataset()?;
    let selection = selection_from(query.years.as_deref()).map_err(AppError::InvalidRequest)?;
    let table = FilteredTable::select(&dataset, &selection, state.dashboard.default_year_window);
    let body = export_csv_bytes(&table)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

fn build_response(
    dataset: &Dataset,
    query: &YearsQuery,
    window: usize,
) -> Result<DashboardResponse, AppError> {
    let selection = selection_from(query.years.as_deref()).map_err(AppError::InvalidRequest)?;
    let table = FilteredTable::select(dataset, &selection, window);

    Ok(DashboardResponse {
        available_years: available_years(dataset),
        default_years: default_years(dataset, window),
        diagnostics: dataset.diagnostics().clone(),
        report: DashboardReport::build(&table),
    })
}
