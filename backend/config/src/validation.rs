//! Config validation: checks with user-friendly error messages.

use crate::schema::TruthLensConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TruthLensConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_ocr(config, &mut report);
    validate_classifier(config, &mut report);
    validate_gateway(config, &mut report);
    validate_capture(config, &mut report);
    report
}

fn validate_ocr(config: &TruthLensConfig, report: &mut ValidationReport) {
    let ocr = config.ocr();
    if ocr.endpoint().trim().is_empty() {
        report.error("ocr.endpoint", "OCR endpoint cannot be empty");
    }
    if ocr.api_key().trim().is_empty() {
        report.warn("ocr.apiKey", "No OCR API key configured; image analysis will fail");
    }
    if ocr.timeout_secs() == 0 {
        report.error("ocr.timeoutSecs", "timeoutSecs must be > 0");
    }
}

fn validate_classifier(config: &TruthLensConfig, report: &mut ValidationReport) {
    let classifier = config.classifier();
    if classifier.endpoint().trim().is_empty() {
        report.error("classifier.endpoint", "Classifier endpoint cannot be empty");
    }
    if classifier.api_key().trim().is_empty() {
        report.warn(
            "classifier.apiKey",
            "No classifier API key configured; text analysis will fail",
        );
    }
    if classifier.model().trim().is_empty() {
        report.error("classifier.model", "Model cannot be empty");
    }
    let temperature = classifier.temperature();
    if !(0.0..=2.0).contains(&temperature) {
        report.error(
            "classifier.temperature",
            format!("temperature {temperature} is outside [0, 2]"),
        );
    }
    if classifier.max_tokens() == 0 {
        report.error("classifier.maxTokens", "maxTokens must be > 0");
    }
    if classifier.timeout_secs() == 0 {
        report.error("classifier.timeoutSecs", "timeoutSecs must be > 0");
    }
}

fn validate_gateway(config: &TruthLensConfig, report: &mut ValidationReport) {
    let gateway = config.gateway();
    if gateway.port() == 0 {
        report.error("gateway.port", "Port must be > 0");
    } else if gateway.port() < 1024 {
        report.warn(
            "gateway.port",
            format!(
                "Port {} requires elevated privileges; consider using a port >= 1024",
                gateway.port()
            ),
        );
    }
    if gateway.bind().parse::<std::net::IpAddr>().is_err() {
        report.error(
            "gateway.bind",
            format!("'{}' is not an IP address", gateway.bind()),
        );
    }
}

fn validate_capture(config: &TruthLensConfig, report: &mut ValidationReport) {
    let capture = config.capture();
    if capture.post_text_selector().trim().is_empty() && !capture.post_text_hosts().is_empty() {
        report.error(
            "capture.postTextSelector",
            "A selector is required when postTextHosts is set",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassifierConfig, GatewayConfig, OcrConfig};

    fn keyed() -> TruthLensConfig {
        TruthLensConfig {
            ocr: Some(OcrConfig {
                api_key: Some("K1".into()),
                ..Default::default()
            }),
            classifier: Some(ClassifierConfig {
                api_key: Some("sk-x".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_only_warns_about_keys() {
        let report = validate(&TruthLensConfig::default());
        assert!(report.is_valid());
        let paths: Vec<_> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["ocr.apiKey", "classifier.apiKey"]);
    }

    #[test]
    fn test_keyed_config_is_clean() {
        let report = validate(&keyed());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_bad_values_are_errors() {
        let mut config = keyed();
        config.classifier = Some(ClassifierConfig {
            api_key: Some("sk-x".into()),
            temperature: Some(3.5),
            max_tokens: Some(0),
            endpoint: Some(" ".into()),
            ..Default::default()
        });
        config.gateway = Some(GatewayConfig {
            port: Some(0),
            bind: Some("localhost:80".into()),
            ..Default::default()
        });

        let report = validate(&config);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"classifier.temperature"));
        assert!(paths.contains(&"classifier.maxTokens"));
        assert!(paths.contains(&"classifier.endpoint"));
        assert!(paths.contains(&"gateway.port"));
        assert!(paths.contains(&"gateway.bind"));
    }
}
