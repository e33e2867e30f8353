//! Optical Character Recognition (OCR)
//!
//! Posts image data URLs to the OCR.space parse endpoint and turns its reply
//! into usable text or a typed failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde_json::Value;
use tracing::{debug, info, warn};

use truthlens_core::{data_url, OcrProvider, TruthLensError, MIN_OCR_TEXT_CHARS};

pub const DEFAULT_ENDPOINT: &str = "https://api.ocr.space/parse/image";

/// Fixed request options sent with every OCR call.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    pub language: String,
    pub engine: u8,
    pub detect_orientation: bool,
    pub scale: bool,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            engine: 2,
            detect_orientation: true,
            scale: true,
        }
    }
}

/// Client for the OCR.space HTTP API.
pub struct OcrSpaceClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    options: OcrOptions,
}

impl OcrSpaceClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            options: OcrOptions::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_options(mut self, options: OcrOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => warn!(error = %e, "Failed to build OCR HTTP client; request timeout not applied"),
        }
        self
    }

    fn form(&self, image_data: &str) -> Form {
        Form::new()
            .text("base64Image", data_url::ensure_data_url(image_data))
            .text("language", self.options.language.clone())
            .text("isOverlayRequired", "false")
            .text("detectOrientation", self.options.detect_orientation.to_string())
            .text("scale", self.options.scale.to_string())
            .text("OCREngine", self.options.engine.to_string())
    }
}

#[async_trait]
impl OcrProvider for OcrSpaceClient {
    fn name(&self) -> &str {
        "ocr.space"
    }

    async fn recognize(&self, image_data: &str) -> Result<String, TruthLensError> {
        debug!(bytes = image_data.len(), "Posting image to OCR API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .multipart(self.form(image_data))
            .send()
            .await
            .map_err(|e| TruthLensError::Network(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "OCR API returned an error status");
            return Err(TruthLensError::OcrRequestFailed);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| TruthLensError::OcrRequestFailed)?;

        parse_ocr_response(&body)
    }
}

/// Interpret an OCR.space reply body.
pub fn parse_ocr_response(body: &Value) -> Result<String, TruthLensError> {
    if body["IsErroredOnProcessing"].as_bool().unwrap_or(false) {
        let message = error_message(&body["ErrorMessage"])
            .unwrap_or_else(|| "OCR processing failed".to_string());
        return Err(TruthLensError::OcrProcessing(message));
    }
    Ok(body["ParsedResults"][0]["ParsedText"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

// ErrorMessage arrives as either a string or an array of strings.
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Run OCR and reject output too short to classify.
pub async fn extract_text(
    provider: &dyn OcrProvider,
    image_data: &str,
) -> Result<String, TruthLensError> {
    let raw = provider.recognize(image_data).await?;
    let text = raw.trim();
    if text.chars().count() < MIN_OCR_TEXT_CHARS {
        info!(provider = provider.name(), "OCR found no usable text");
        return Err(TruthLensError::NoTextFound);
    }
    info!(provider = provider.name(), chars = text.chars().count(), "OCR completed");
    Ok(text.to_string())
}
