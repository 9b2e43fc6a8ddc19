use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::assessment::AssessmentSubmission;
use super::domain::SessionId;
use super::service::InterviewSessionService;
use super::store::SessionStore;
use crate::error::AppError;

const CV_FIELD: &str = "file";
const DEFAULT_CV_FILENAME: &str = "cv.txt";

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) answer: String,
    #[serde(default)]
    pub(crate) timestamp: Option<DateTime<Utc>>,
}

type SharedService<S> = State<Arc<InterviewSessionService<S>>>;

/// HTTP surface for the session lifecycle.
pub fn interview_router<S>(service: Arc<InterviewSessionService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(start_handler::<S>))
        .route("/api/v1/sessions/:session_id/cv", post(upload_cv_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id/question",
            get(question_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/answers",
            post(answer_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/interview/complete",
            post(complete_interview_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/assessment",
            post(start_assessment_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/assessment/submission",
            post(submit_assessment_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/report",
            post(generate_report_handler::<S>).get(fetch_report_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/status",
            get(status_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/transcript",
            get(transcript_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<S>(State(service): SharedService<S>) -> Response
where
    S: SessionStore + 'static,
{
    let view = service.start_session();
    (StatusCode::CREATED, Json(view)).into_response()
}

pub(crate) async fn upload_cv_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let (filename, document) = read_cv_field(&mut multipart).await?;
    let attachment = service
        .attach_cv(&SessionId(session_id), &document, &filename)
        .await?;
    Ok((StatusCode::OK, Json(attachment)).into_response())
}

async fn read_cv_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError::Upload(error.to_string()))?
    {
        if field.name() != Some(CV_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_CV_FILENAME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| AppError::Upload(error.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::Upload("uploaded file is empty".to_string()));
        }
        return Ok((filename, bytes.to_vec()));
    }

    Err(AppError::Upload(format!("missing `{CV_FIELD}` field")))
}

pub(crate) async fn question_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let prompt = service.current_question(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(prompt)).into_response())
}

pub(crate) async fn answer_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let progress = service
        .submit_answer(&SessionId(session_id), request.answer, request.timestamp)
        .await?;
    Ok((StatusCode::OK, Json(progress)).into_response())
}

pub(crate) async fn complete_interview_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let completion = service.complete_interview(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(completion)).into_response())
}

pub(crate) async fn start_assessment_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let assessment = service.start_assessment(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(assessment)).into_response())
}

pub(crate) async fn submit_assessment_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
    Json(submission): Json<AssessmentSubmission>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let result = service
        .submit_assessment(&SessionId(session_id), submission)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(result)).into_response())
}

pub(crate) async fn generate_report_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let report = service.generate_report(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(report)).into_response())
}

pub(crate) async fn fetch_report_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let report = service.report(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(report)).into_response())
}

pub(crate) async fn status_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let view = service.status(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(view)).into_response())
}

pub(crate) async fn transcript_handler<S>(
    State(service): SharedService<S>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let view = service.transcript(&SessionId(session_id)).await?;
    Ok((StatusCode::OK, Json(view)).into_response())
}
