//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{info, instrument};

use truthlens_capture::PlatformRules;
use truthlens_coordinator::Coordinator;
use truthlens_core::{Message, RuntimeClient};

use crate::{analyze, capture_api, health_api, ws_server};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub coordinator: Coordinator,
    /// Client speaking for this gateway on the message bus.
    pub client: RuntimeClient,
    pub relay_tx: broadcast::Sender<Message>,
    /// Capture rules served to page contexts.
    pub rules: PlatformRules,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(
        coordinator: Coordinator,
        client: RuntimeClient,
        relay_tx: broadcast::Sender<Message>,
    ) -> Self {
        Self {
            coordinator,
            client,
            relay_tx,
            rules: PlatformRules::default(),
            started_at: Instant::now(),
        }
    }

    pub fn with_platform_rules(mut self, rules: PlatformRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Build the router with every gateway route.
pub fn build_router(state: GatewayState, cors_permissive: bool) -> Router {
    let app = Router::new()
        .route("/analyze", post(analyze::analyze))
        .route("/api/analyze/text", post(analyze::analyze_text))
        .route("/api/analyze/image", post(analyze::analyze_image))
        .route("/api/latest", get(analyze::latest))
        .route("/api/capture/rules", get(capture_api::rules))
        .route("/api/capture/classify", post(capture_api::classify))
        .route("/api/health", get(health_api::get_health))
        .route("/api/ws", get(ws_server::ws_handler))
        .with_state(state);

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Starts the gateway and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState, cors_permissive: bool) -> Result<()> {
    let app = build_router(state, cors_permissive);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind gateway on {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("gateway server failed")?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use truthlens_classifier::providers::MockProvider;
    use truthlens_classifier::{Classifier, ClassifierSettings};
    use truthlens_coordinator::UnavailableScreenCapture;
    use truthlens_core::{Component, MessageBus, OcrProvider, Origin, TruthLensError};

    /// OCR fake: returns the configured text, or fails with the given processing error.
    pub(crate) struct FixedOcr(pub Result<&'static str, &'static str>);

    #[async_trait]
    impl OcrProvider for FixedOcr {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn recognize(&self, _image_data: &str) -> Result<String, TruthLensError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(TruthLensError::OcrProcessing(msg.to_string())),
            }
        }
    }

    /// Wire a coordinator on a fresh bus and return the gateway state for it.
    pub(crate) fn test_state(ocr: FixedOcr, provider: MockProvider) -> GatewayState {
        let mut bus = MessageBus::new();
        let coordinator = Coordinator::new(
            Arc::new(UnavailableScreenCapture),
            Arc::new(ocr),
            Classifier::new(Arc::new(provider), ClassifierSettings::default()),
            bus.relay_sender(),
        );
        let rx = bus.take_coordinator_rx().unwrap();
        let component = coordinator.clone();
        tokio::spawn(async move { component.start(rx).await });
        GatewayState::new(coordinator, bus.client(Origin::External), bus.relay_sender())
    }

    /// Serve the router on an ephemeral port and return its base URL.
    pub(crate) async fn spawn_gateway(state: GatewayState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, build_router(state, true)).await });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_health_route() {
        let base = spawn_gateway(test_state(FixedOcr(Ok("")), MockProvider::new("mock"))).await;
        let body: serde_json::Value = reqwest::get(format!("{base}/api/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "truthlens");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let base = spawn_gateway(test_state(FixedOcr(Ok("")), MockProvider::new("mock"))).await;
        let status = reqwest::get(format!("{base}/v1/chat/completions"))
            .await
            .unwrap()
            .status();
        assert_eq!(status.as_u16(), 404);
    }
}
