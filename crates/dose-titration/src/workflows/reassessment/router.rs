use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ExperienceLevel, ReassessmentSubmission};
use super::service::{ReassessmentService, ReassessmentServiceError};
use super::sink::SubmissionSink;

/// Dose/time pair used to preview experience before the full form is filled in.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceQuery {
    pub current_dose: String,
    pub time_on_current_medication: String,
}

/// Router builder exposing the reassessment endpoints.
pub fn reassessment_router<S>(service: Arc<ReassessmentService<S>>) -> Router
where
    S: SubmissionSink + 'static,
{
    Router::new()
        .route("/api/v1/reassessments", post(assess_handler::<S>))
        .route(
            "/api/v1/reassessments/experience",
            post(experience_handler::<S>),
        )
        .route("/api/v1/reassessments/options", get(options_handler::<S>))
        .with_state(service)
}

pub(crate) async fn assess_handler<S>(
    State(service): State<Arc<ReassessmentService<S>>>,
    submission: Result<axum::Json<ReassessmentSubmission>, JsonRejection>,
) -> Response
where
    S: SubmissionSink + 'static,
{
    // malformed or mistyped bodies keep axum's status but use the error shape below
    let axum::Json(submission) = match submission {
        Ok(submission) => submission,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match service.assess(submission) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(ReassessmentServiceError::Validation(failure)) => {
            let payload = json!({
                "error": failure.to_string(),
                "fields": failure.errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn experience_handler<S>(
    State(service): State<Arc<ReassessmentService<S>>>,
    axum::Json(query): axum::Json<ExperienceQuery>,
) -> Response
where
    S: SubmissionSink + 'static,
{
    match service.preview_experience(&query.current_dose, &query.time_on_current_medication) {
        Some(details) => {
            let payload = json!({
                "level": details.level,
                "tel": details.tel,
                "numeric_tier": details.numeric_tier,
                "time_on_med_months": details.time_on_med_months,
                "asks_dose_preference": details.level != ExperienceLevel::Beginner,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        None => {
            let payload = json!({
                "error": "unknown dose or time on medication",
                "current_dose": query.current_dose,
                "time_on_current_medication": query.time_on_current_medication,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn options_handler<S>(
    State(service): State<Arc<ReassessmentService<S>>>,
) -> Response
where
    S: SubmissionSink + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog())).into_response()
}
