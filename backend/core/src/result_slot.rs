use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::AnalysisResult;

/// The most recent successful analysis, as kept in session storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub stored_at: DateTime<Utc>,
}

/// Session-scoped single-slot store. Each write replaces the previous result.
#[derive(Debug, Clone, Default)]
pub struct ResultSlot {
    inner: Arc<RwLock<Option<StoredResult>>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, result: AnalysisResult, extracted_text: Option<String>) {
        *self.inner.write().await = Some(StoredResult {
            result,
            extracted_text,
            stored_at: Utc::now(),
        });
    }

    pub async fn latest(&self) -> Option<StoredResult> {
        self.inner.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
