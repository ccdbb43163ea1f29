//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};

use crate::reach::{Analyzer, ReachError, TransitProvider};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router<P>(state: AppState<P>) -> Router
where
    P: TransitProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/reachable", get(reachable::<P>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Find stops reachable from a point within a time budget.
async fn reachable<P>(
    State(state): State<AppState<P>>,
    headers: HeaderMap,
    query: Result<Query<ReachableQuery>, QueryRejection>,
) -> Result<Response, AppError>
where
    P: TransitProvider + Send + Sync + 'static,
{
    let Query(query) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let request = query
        .to_request(timetable_now())
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let analyzer = Analyzer::new(state.provider.as_ref(), state.config.as_ref());
    let report = analyzer.analyze(&request).await?;

    info!(
        lat = request.latitude,
        lon = request.longitude,
        radius = request.radius_m,
        calendar = %request.calendar,
        departure = %request.departure,
        results = report.results.len(),
        "Reachability query"
    );

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = ReachableResultsTemplate::new(&request, &report);
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(ReachableResponse::from(&report)).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<ReachError> for AppError {
    fn from(e: ReachError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn html_accept_detection() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_html(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!accepts_html(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(accepts_html(&headers));
    }

    #[test]
    fn reach_errors_are_bad_requests() {
        let response = AppError::from(ReachError::NoModes).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal {
            message: "boom".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
