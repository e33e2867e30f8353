//! Wires the coordinator and its providers from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use truthlens_capture::PlatformRules;
use truthlens_classifier::providers::openai::OpenAiProvider;
use truthlens_classifier::{Classifier, ClassifierSettings};
use truthlens_config::TruthLensConfig;
use truthlens_coordinator::{Coordinator, UnavailableScreenCapture};
use truthlens_core::{Component, MessageBus, Origin, RuntimeClient};
use truthlens_understanding::{OcrOptions, OcrSpaceClient};

/// A started coordinator and the bus that reaches it.
pub struct Runtime {
    pub bus: MessageBus,
    pub coordinator: Coordinator,
}

impl Runtime {
    /// Build providers from `config` and start the coordinator task.
    pub fn start(config: &TruthLensConfig) -> anyhow::Result<Self> {
        let ocr_config = config.ocr();
        let ocr = OcrSpaceClient::new(ocr_config.api_key())
            .with_endpoint(ocr_config.endpoint())
            .with_options(OcrOptions {
                language: ocr_config.language().to_string(),
                engine: ocr_config.engine(),
                ..OcrOptions::default()
            })
            .with_timeout(Duration::from_secs(ocr_config.timeout_secs()));

        let classifier_config = config.classifier();
        let provider = OpenAiProvider::new(classifier_config.api_key())
            .with_base_url(classifier_config.endpoint())
            .with_timeout(Duration::from_secs(classifier_config.timeout_secs()));
        let classifier = Classifier::new(
            Arc::new(provider),
            ClassifierSettings {
                model: classifier_config.model().to_string(),
                temperature: classifier_config.temperature(),
                max_tokens: classifier_config.max_tokens(),
            },
        );

        let mut bus = MessageBus::new();
        let coordinator = Coordinator::new(
            Arc::new(UnavailableScreenCapture),
            Arc::new(ocr),
            classifier,
            bus.relay_sender(),
        );

        let rx = bus
            .take_coordinator_rx()
            .ok_or_else(|| anyhow::anyhow!("coordinator receiver already taken"))?;
        let task = coordinator.clone();
        tokio::spawn(async move {
            if let Err(e) = task.start(rx).await {
                error!(error = %e, "Coordinator task failed");
            }
        });

        info!(
            ocr = coordinator.ocr_provider(),
            classifier = coordinator.classifier().provider_name(),
            model = classifier_config.model(),
            "Coordinator started"
        );
        Ok(Self { bus, coordinator })
    }

    /// Client for requests made on behalf of a caller outside the extension.
    pub fn client(&self) -> RuntimeClient {
        self.bus.client(Origin::External)
    }
}

/// Capture rules as configured.
pub fn platform_rules(config: &TruthLensConfig) -> PlatformRules {
    let capture = config.capture();
    PlatformRules {
        post_text_hosts: capture.post_text_hosts(),
        image_hint_hosts: capture.image_hint_hosts(),
        post_text_selector: capture.post_text_selector().to_string(),
    }
}
