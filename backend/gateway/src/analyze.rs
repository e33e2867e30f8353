//! Analysis endpoints.
//!
//! `/analyze` is the single-shot image endpoint with raw classifier output.
//! `/api/analyze/*` speak the message protocol's reply shapes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use truthlens_coordinator::Coordinator;
use truthlens_core::{data_url, Message, Reply, StoredResult, TruthLensError};

use crate::server::GatewayState;

pub const NO_TEXT_RESULT: &str =
    "VERDICT: Unknown\nCONFIDENCE SCORE: --\nANALYSIS: No readable text found in image.";
pub const ERROR_RESULT: &str = "VERDICT: Error\nCONFIDENCE SCORE: 0%\nANALYSIS: AI processing failed.";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(default)]
    pub image_data: String,
}

/// Handler for `POST /analyze`.
pub async fn analyze(
    State(state): State<GatewayState>,
    Json(payload): Json<AnalyzeRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(image) = payload.image.filter(|i| !i.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No image data provided"})),
        );
    };

    match ocr_and_classify(&state.coordinator, &image).await {
        Ok(Some((text, result))) => (StatusCode::OK, Json(json!({"text": text, "result": result}))),
        Ok(None) => (StatusCode::OK, Json(json!({"result": NO_TEXT_RESULT}))),
        Err(e) => {
            error!(error = %e, "Single-shot analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"result": ERROR_RESULT})),
            )
        }
    }
}

/// `Ok(None)` when the image holds no text at all. Short text is still classified.
async fn ocr_and_classify(
    coordinator: &Coordinator,
    image: &str,
) -> Result<Option<(String, String)>, TruthLensError> {
    let image = data_url::ensure_data_url(image);
    data_url::decode(&image)?;

    let text = coordinator.recognize(&image).await?;
    if text.is_empty() {
        info!("No readable text in submitted image");
        return Ok(None);
    }
    let result = coordinator.classify_raw(&text).await?;
    Ok(Some((text, result)))
}

fn reply_response(reply: Reply) -> (StatusCode, Json<Reply>) {
    let status = if reply.is_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    (status, Json(reply))
}

fn bus_failure(e: TruthLensError) -> (StatusCode, Json<Reply>) {
    error!(error = %e, "Coordinator unreachable");
    (StatusCode::SERVICE_UNAVAILABLE, Json(Reply::error(e)))
}

/// Handler for `POST /api/analyze/text`.
pub async fn analyze_text(
    State(state): State<GatewayState>,
    Json(payload): Json<TextRequest>,
) -> (StatusCode, Json<Reply>) {
    match state
        .client
        .send_message(Message::AnalyzeText { text: payload.text })
        .await
    {
        Ok(reply) => reply_response(reply),
        Err(e) => bus_failure(e),
    }
}

/// Handler for `POST /api/analyze/image`.
pub async fn analyze_image(
    State(state): State<GatewayState>,
    Json(payload): Json<ImageRequest>,
) -> (StatusCode, Json<Reply>) {
    match state
        .client
        .send_message(Message::AnalyzeImage {
            image_data: payload.image_data,
        })
        .await
    {
        Ok(reply) => reply_response(reply),
        Err(e) => bus_failure(e),
    }
}

/// Handler for `GET /api/latest`. 404 until something has been analyzed.
pub async fn latest(
    State(state): State<GatewayState>,
) -> Result<Json<StoredResult>, (StatusCode, Json<Value>)> {
    state
        .coordinator
        .results()
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "No analysis result yet"})),
            )
        })
}
