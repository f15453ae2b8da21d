use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use form_agent::{build_report, HolisticAnalysis, QaResult, SessionReport, SummaryResult};
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::payloads::*;
use crate::state::AppState;
use crate::ui::INDEX_HTML;

// Uploads beyond this are cut off by the body limit layer.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/documents", get(list_documents))
        .route("/qa", post(qa))
        .route("/summary", post(summary))
        .route("/holistic", post(holistic))
        .route("/report", get(report))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Accept one or more files, extract their text, and store them in the
/// session. Files that fail extraction are reported and dropped; a good
/// file is never rejected because a sibling failed.
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut processed = Vec::new();
    let mut errors = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart payload: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read {}: {}", filename, e)))?;

        match state.agent.process_form(&filename, &bytes) {
            Ok(document) => {
                log::info!(
                    "Processed {}: {} characters extracted",
                    document.name,
                    document.text.chars().count()
                );
                processed.push(DocumentSummary {
                    id: document.id.clone(),
                    name: document.name.clone(),
                    format: document.format,
                    text_length: document.text.chars().count(),
                });
                state.session.write().await.upsert_document(document);
            }
            Err(err) => {
                log::warn!("Failed to process {}: {:#}", filename, err);
                errors.push(UploadError {
                    filename,
                    message: format!("{:#}", err),
                });
            }
        }
    }

    if processed.is_empty() {
        if let Some(first) = errors.first() {
            return Err(ApiError::unprocessable(format!(
                "error processing {}: {}",
                first.filename, first.message
            )));
        }
        return Err(ApiError::bad_request("no file found in upload"));
    }

    Ok(Json(UploadResponse { processed, errors }))
}

async fn list_documents(State(state): State<Arc<AppState>>) -> Json<Vec<DocumentSummary>> {
    let session = state.session.read().await;
    let documents = session
        .documents
        .iter()
        .map(|d| DocumentSummary {
            id: d.id.clone(),
            name: d.name.clone(),
            format: d.format,
            text_length: d.text.chars().count(),
        })
        .collect();
    Json(documents)
}

async fn qa(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QaPayload>,
) -> Result<Json<QaResult>, ApiError> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::bad_request("question must not be empty"));
    }

    let document = {
        let session = state.session.read().await;
        session.find_document(&payload.document).cloned()
    }
    .ok_or_else(|| ApiError::not_found(format!("no document named {}", payload.document)))?;

    let answer = state
        .agent
        .answer_question(&document, &payload.question)
        .await
        .map_err(ApiError::upstream)?;

    let result = QaResult {
        document: document.name,
        question: payload.question,
        answer,
    };
    state.session.write().await.last_qa = Some(result.clone());
    Ok(Json(result))
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SummaryPayload>,
) -> Result<Json<SummaryResult>, ApiError> {
    let document = {
        let session = state.session.read().await;
        session.find_document(&payload.document).cloned()
    }
    .ok_or_else(|| ApiError::not_found(format!("no document named {}", payload.document)))?;

    let summary = state
        .agent
        .generate_summary(&document)
        .await
        .map_err(ApiError::upstream)?;

    let result = SummaryResult {
        document: document.name,
        summary,
    };
    state.session.write().await.last_summary = Some(result.clone());
    Ok(Json(result))
}

async fn holistic(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<HolisticPayload>,
) -> Result<Json<HolisticAnalysis>, ApiError> {
    if payload.documents.len() < 2 {
        return Err(ApiError::bad_request(
            "select at least two documents for holistic analysis",
        ));
    }
    if payload.prompt.trim().is_empty() {
        return Err(ApiError::bad_request("prompt must not be empty"));
    }

    let documents = {
        let session = state.session.read().await;
        let mut selected = Vec::with_capacity(payload.documents.len());
        for key in &payload.documents {
            let document = session
                .find_document(key)
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("no document named {}", key)))?;
            selected.push(document);
        }
        selected
    };

    let refs: Vec<&form_agent::Document> = documents.iter().collect();
    let analysis = state
        .agent
        .holistic_analysis(&refs, &payload.prompt)
        .await
        .map_err(ApiError::upstream)?;

    state.session.write().await.last_holistic = Some(analysis.clone());
    Ok(Json(analysis))
}

/// The full session report as a JSON download.
async fn report(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    let report: SessionReport = build_report(
        &session.documents,
        session.last_qa.as_ref(),
        session.last_summary.as_ref(),
        session.last_holistic.as_ref(),
    );
    (
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"intelligent_form_report.json\"",
        )],
        Json(report),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use form_agent::{FormAgent, MockProvider};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state(mock: Arc<MockProvider>) -> Arc<AppState> {
        Arc::new(AppState::new(FormAgent::new(mock, None)))
    }

    fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
        let boundary = "test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upload_stores_the_document_and_lists_it() {
        let state = test_state(Arc::new(MockProvider::new()));

        let response = router(state.clone())
            .oneshot(upload_request("note.txt", b"hello from the upload test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["processed"][0]["name"], "note.txt");
        assert!(body["processed"][0]["text_length"].as_u64().unwrap() > 0);

        let response = router(state)
            .oneshot(Request::builder().uri("/documents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listing = response_json(response).await;
        assert_eq!(listing.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected_with_a_message() {
        let state = test_state(Arc::new(MockProvider::new()));

        let response = router(state)
            .oneshot(upload_request("contract.docx", b"PK\x03\x04"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("not supported"));
    }

    #[tokio::test]
    async fn reupload_with_the_same_name_replaces_the_document() {
        let state = test_state(Arc::new(MockProvider::new()));

        router(state.clone())
            .oneshot(upload_request("note.txt", b"first version"))
            .await
            .unwrap();
        router(state.clone())
            .oneshot(upload_request("note.txt", b"second version, longer"))
            .await
            .unwrap();

        let session = state.session.read().await;
        assert_eq!(session.documents.len(), 1);
        assert!(session.documents[0].text.contains("second version"));
    }

    #[tokio::test]
    async fn repeated_question_hits_the_cache_not_the_provider() {
        let mock = Arc::new(MockProvider::with_responses(["The total is $120.00"]));
        let state = test_state(mock.clone());

        router(state.clone())
            .oneshot(upload_request("invoice.txt", b"Total due: $120.00"))
            .await
            .unwrap();

        let payload = json!({"document": "invoice.txt", "question": "What is the total?"});
        let first = response_json(
            router(state.clone())
                .oneshot(json_request("/qa", payload.clone()))
                .await
                .unwrap(),
        )
        .await;
        let second = response_json(
            router(state.clone())
                .oneshot(json_request("/qa", payload))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(first["answer"], "The total is $120.00");
        assert_eq!(first["answer"], second["answer"]);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn qa_against_an_unknown_document_is_a_404() {
        let state = test_state(Arc::new(MockProvider::new()));

        let response = router(state)
            .oneshot(json_request(
                "/qa",
                json!({"document": "missing.txt", "question": "anything?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn holistic_needs_two_documents() {
        let state = test_state(Arc::new(MockProvider::new()));

        router(state.clone())
            .oneshot(upload_request("a.txt", b"alpha"))
            .await
            .unwrap();

        let response = router(state)
            .oneshot(json_request(
                "/holistic",
                json!({"documents": ["a.txt"], "prompt": "compare"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn holistic_runs_per_document_then_synthesizes() {
        let mock = Arc::new(MockProvider::with_responses([
            "answer from a",
            "answer from b",
            "combined answer",
        ]));
        let state = test_state(mock.clone());

        router(state.clone())
            .oneshot(upload_request("a.txt", b"alpha"))
            .await
            .unwrap();
        router(state.clone())
            .oneshot(upload_request("b.txt", b"bravo"))
            .await
            .unwrap();

        let response = router(state)
            .oneshot(json_request(
                "/holistic",
                json!({"documents": ["a.txt", "b.txt"], "prompt": "compare the contents"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["intermediary_results"].as_array().unwrap().len(), 2);
        assert_eq!(body["final_synthesis"], "combined answer");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn report_has_one_entry_per_document_and_downloads_as_attachment() {
        let state = test_state(Arc::new(MockProvider::with_responses(["an answer"])));

        router(state.clone())
            .oneshot(upload_request("a.txt", b"alpha"))
            .await
            .unwrap();
        router(state.clone())
            .oneshot(upload_request("b.txt", b"bravo"))
            .await
            .unwrap();
        router(state.clone())
            .oneshot(json_request(
                "/qa",
                json!({"document": "a.txt", "question": "what?"}),
            ))
            .await
            .unwrap();

        let response = router(state)
            .oneshot(Request::builder().uri("/report").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("intelligent_form_report.json"));

        let body = response_json(response).await;
        assert_eq!(body["forms_data"].as_object().unwrap().len(), 2);
        assert_eq!(body["single_form_qa_result"]["answer"], "an answer");
    }
}
