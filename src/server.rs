//! HTTP API.
//!
//! The web counterpart of the CLI: upload documents, list them, ask
//! questions, and read back the persisted conversations.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version and answer mode) |
//! | `GET`  | `/documents` | List stored documents (without content) |
//! | `POST` | `/documents` | Upload one document: `{"filename", "content"}` |
//! | `POST` | `/ask` | Answer `{"query"}`; returns `{answer, sources, confidence}` |
//! | `GET`  | `/conversations` | Persisted question/answer exchanges |
//! | `POST` | `/feedback` | Rate an answer: `{"conversation_id"?, "rating", "comment"?}` |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "filename must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500). A failed generation
//! call is not an error: `/ask` still answers 200 with the failure described
//! in `answer` and `confidence` 0.0.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use doc_advisor_core::models::{Conversation, Feedback};
use doc_advisor_core::AnswerResult;

use crate::advisor::Advisor;
use crate::config::Config;
use crate::history::validate_rating;

/// Starts the HTTP server on `[server].bind` and runs until the process ends.
pub async fn run_server(config: &Config, advisor: Advisor) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(advisor);

    println!("Advisor API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router; exposed separately so tests can serve it on any port.
pub fn router(advisor: Advisor) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/documents", get(handle_list_documents).post(handle_upload))
        .route("/ask", post(handle_ask))
        .route("/conversations", get(handle_conversations))
        .route("/feedback", post(handle_feedback))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(advisor)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "request failed");
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal".to_string(),
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    answer_mode: String,
}

async fn handle_health(State(advisor): State<Advisor>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        answer_mode: advisor.answerer_name().to_string(),
    })
}

// ============ /documents ============

/// Document listing entry; content is omitted to keep listings small.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub filename: String,
    pub uploaded_at: String,
    pub chars: usize,
}

async fn handle_list_documents(
    State(advisor): State<Advisor>,
) -> Result<Json<Vec<DocumentSummary>>, AppError> {
    let docs = advisor.documents().await?;
    Ok(Json(
        docs.iter()
            .map(|d| DocumentSummary {
                filename: d.filename.clone(),
                uploaded_at: d.uploaded_at.to_rfc3339(),
                chars: d.content.chars().count(),
            })
            .collect(),
    ))
}

#[derive(Deserialize)]
struct UploadRequest {
    #[serde(default)]
    filename: String,
    #[serde(default)]
    content: String,
}

async fn handle_upload(
    State(advisor): State<Advisor>,
    Json(req): Json<UploadRequest>,
) -> Result<(StatusCode, Json<DocumentSummary>), AppError> {
    if req.filename.trim().is_empty() {
        return Err(bad_request("filename must not be empty"));
    }
    let content = req.content.replace("\r\n", "\n");
    let doc = advisor.upload(&req.filename, &content).await?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentSummary {
            filename: doc.filename,
            uploaded_at: doc.uploaded_at.to_rfc3339(),
            chars: doc.content.chars().count(),
        }),
    ))
}

// ============ POST /ask ============

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct AskResponse {
    #[serde(flatten)]
    result: AnswerResult,
    conversation_id: String,
}

async fn handle_ask(
    State(advisor): State<Advisor>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let (result, conversation) = advisor.ask(req.query.trim()).await?;
    Ok(Json(AskResponse {
        result,
        conversation_id: conversation.id,
    }))
}

// ============ GET /conversations ============

async fn handle_conversations(
    State(advisor): State<Advisor>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    Ok(Json(advisor.conversations().await?))
}

// ============ POST /feedback ============

#[derive(Deserialize)]
struct FeedbackRequest {
    #[serde(default)]
    conversation_id: Option<String>,
    rating: i32,
    #[serde(default)]
    comment: String,
}

async fn handle_feedback(
    State(advisor): State<Advisor>,
    Json(req): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    validate_rating(req.rating).map_err(|e| bad_request(e.to_string()))?;
    let feedback = advisor
        .feedback(req.conversation_id, req.rating, &req.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
