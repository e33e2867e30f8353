//! Config defaults: applies default values to a parsed config.

use crate::schema::{
    CaptureConfig, ClassifierConfig, GatewayConfig, LoggingConfig, OcrConfig, TruthLensConfig,
};

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_OCR_ENGINE: u8 = 2;

pub const DEFAULT_CLASSIFIER_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// HTTP timeout for both remote services.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_GATEWAY_BIND: &str = "127.0.0.1";
pub const DEFAULT_GATEWAY_PORT: u16 = 8787;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_POST_TEXT_HOSTS: &[&str] = &["twitter.com", "x.com"];
pub const DEFAULT_IMAGE_HINT_HOSTS: &[&str] = &["instagram.com"];
pub const DEFAULT_POST_TEXT_SELECTOR: &str = r#"article [data-testid="tweetText"]"#;

pub(crate) fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TruthLensConfig) -> TruthLensConfig {
    let config = apply_ocr_defaults(config);
    let config = apply_classifier_defaults(config);
    let config = apply_gateway_defaults(config);
    let config = apply_logging_defaults(config);
    apply_capture_defaults(config)
}

fn apply_ocr_defaults(mut config: TruthLensConfig) -> TruthLensConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    ocr.endpoint.get_or_insert_with(|| DEFAULT_OCR_ENDPOINT.to_string());
    ocr.language.get_or_insert_with(|| DEFAULT_OCR_LANGUAGE.to_string());
    ocr.engine.get_or_insert(DEFAULT_OCR_ENGINE);
    ocr.timeout_secs.get_or_insert(DEFAULT_TIMEOUT_SECS);
    config
}

fn apply_classifier_defaults(mut config: TruthLensConfig) -> TruthLensConfig {
    let classifier = config.classifier.get_or_insert_with(ClassifierConfig::default);
    classifier
        .endpoint
        .get_or_insert_with(|| DEFAULT_CLASSIFIER_ENDPOINT.to_string());
    classifier
        .model
        .get_or_insert_with(|| DEFAULT_CLASSIFIER_MODEL.to_string());
    classifier.temperature.get_or_insert(DEFAULT_TEMPERATURE);
    classifier.max_tokens.get_or_insert(DEFAULT_MAX_TOKENS);
    classifier.timeout_secs.get_or_insert(DEFAULT_TIMEOUT_SECS);
    config
}

fn apply_gateway_defaults(mut config: TruthLensConfig) -> TruthLensConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    gateway
        .bind
        .get_or_insert_with(|| DEFAULT_GATEWAY_BIND.to_string());
    gateway.port.get_or_insert(DEFAULT_GATEWAY_PORT);
    gateway.cors_permissive.get_or_insert(true);
    config
}

fn apply_logging_defaults(mut config: TruthLensConfig) -> TruthLensConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

fn apply_capture_defaults(mut config: TruthLensConfig) -> TruthLensConfig {
    let capture = config.capture.get_or_insert_with(CaptureConfig::default);
    capture
        .post_text_hosts
        .get_or_insert_with(|| to_strings(DEFAULT_POST_TEXT_HOSTS));
    capture
        .image_hint_hosts
        .get_or_insert_with(|| to_strings(DEFAULT_IMAGE_HINT_HOSTS));
    capture
        .post_text_selector
        .get_or_insert_with(|| DEFAULT_POST_TEXT_SELECTOR.to_string());
    config
}
