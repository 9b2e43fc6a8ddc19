use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::interview::router::{answer_handler, start_handler, AnswerRequest};
use crate::workflows::interview::InterviewCapabilities;

const BOUNDARY: &str = "interview-boundary";

fn multipart_request(uri: &str, field: &str, filename: &str, contents: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
Content-Type: text/plain\r\n\r\n\
{contents}\r\n\
--{BOUNDARY}--\r\n"
    );
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn start_handler_returns_created_view() {
    let (service, store) = build_service(InterviewCapabilities::local());
    let response = start_handler::<MemoryStore>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "initialized");
    assert_eq!(body["progress"]["cv_uploaded"], false);

    let id = body["session_id"].as_str().expect("session id");
    assert_eq!(store.records.lock().unwrap().len(), 1);
    assert!(!id.is_empty());
}

#[tokio::test]
async fn answer_handler_before_cv_is_conflict() {
    let (service, _) = build_service(InterviewCapabilities::local());
    let id = service.start_session().session_id;

    let response = answer_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path(id.0.clone()),
        axum::Json(AnswerRequest {
            answer: "Too early.".to_string(),
            timestamp: None,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("initialized"));
}

#[tokio::test]
async fn unknown_session_status_is_not_found() {
    let (service, _) = build_service(InterviewCapabilities::local());
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/sessions/nope/status"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "session nope not found");
}

#[tokio::test]
async fn upload_then_question_flow_over_http() {
    let (service, _) = build_service(InterviewCapabilities::local());
    let id = service.start_session().session_id;
    let router = router_with_service(service);

    let upload = router
        .clone()
        .oneshot(multipart_request(
            &format!("/api/v1/sessions/{id}/cv"),
            "file",
            "jordan.txt",
            RESUME,
        ))
        .await
        .unwrap();
    assert_eq!(upload.status(), StatusCode::OK);
    let attachment = read_json_body(upload).await;
    assert_eq!(attachment["status"], "cv_uploaded");
    assert_eq!(attachment["questions_generated"], 8);
    assert!(attachment.get("degraded_reason").is_none());

    let question = router
        .clone()
        .oneshot(get_request(&format!("/api/v1/sessions/{id}/question")))
        .await
        .unwrap();
    assert_eq!(question.status(), StatusCode::OK);
    let prompt = read_json_body(question).await;
    assert_eq!(prompt["status"], "question");
    assert_eq!(prompt["question_number"], 1);
    assert_eq!(prompt["max_questions"], 8);

    let answer = router
        .clone()
        .oneshot(json_request(
            &format!("/api/v1/sessions/{id}/answers"),
            json!({ "answer": "I build payment APIs and mentor two engineers on the ledger team today." }),
        ))
        .await
        .unwrap();
    assert_eq!(answer.status(), StatusCode::OK);
    let progress = read_json_body(answer).await;
    assert_eq!(progress["questions_answered"], 1);
    assert_eq!(progress["interview_complete"], false);

    let status = router
        .oneshot(get_request(&format!("/api/v1/sessions/{id}/status")))
        .await
        .unwrap();
    let view = read_json_body(status).await;
    assert_eq!(view["status"], "interview_active");
    assert_eq!(view["progress"]["questions_answered"], 1);
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() {
    let (service, _) = build_service(InterviewCapabilities::local());
    let id = service.start_session().session_id;
    let router = router_with_service(service);

    let response = router
        .oneshot(multipart_request(
            &format!("/api/v1/sessions/{id}/cv"),
            "attachment",
            "jordan.txt",
            RESUME,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("missing `file` field"));
}

#[tokio::test]
async fn report_routes_follow_lifecycle() {
    let (service, _) = build_service(scripted_capabilities(
        coding_profile(),
        generated_questions(2),
    ));
    let id = session_with_cv(&service).await;
    let router = router_with_service(service);
    let report_uri = format!("/api/v1/sessions/{id}/report");

    let early = router
        .clone()
        .oneshot(Request::post(&report_uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(early.status(), StatusCode::CONFLICT);

    let complete = router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/sessions/{id}/interview/complete"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(complete.status(), StatusCode::OK);

    let assessment = router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/sessions/{id}/assessment"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let payload = read_json_body(assessment).await;
    assert_eq!(payload["type"], "coding");
    assert_eq!(payload["language"], "Python");

    let submission = router
        .clone()
        .oneshot(json_request(
            &format!("/api/v1/sessions/{id}/assessment/submission"),
            json!({ "code": "def solve(xs): return sorted(xs)" }),
        ))
        .await
        .unwrap();
    assert_eq!(submission.status(), StatusCode::ACCEPTED);

    let generated = router
        .clone()
        .oneshot(Request::post(&report_uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(generated.status(), StatusCode::OK);

    let fetched = router.oneshot(get_request(&report_uri)).await.unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    let report = read_json_body(fetched).await;
    assert_eq!(report["recommendation"]["decision"], "Maybe");
    assert_eq!(report["session_metadata"]["completion_status"], "completed");
    assert_eq!(report["overall_evaluation"]["overall_score"], 3.0);
}
