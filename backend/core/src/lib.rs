pub mod channel;
pub mod data_url;
pub mod error;
pub mod message;
pub mod result_slot;
pub mod traits;
pub mod types;

pub use channel::{MessageBus, RuntimeClient};
pub use error::TruthLensError;
pub use message::{Envelope, Message, Reply};
pub use result_slot::{ResultSlot, StoredResult};
pub use traits::{Component, LlmProvider, LlmRequest, LlmResponse, OcrProvider, ScreenCapture};
pub use types::{
    clamp_confidence, AnalysisResult, CaptureRequest, ImageAnalysis, Origin, TabInfo, Verdict,
    DEFAULT_CONFIDENCE, MIN_OCR_TEXT_CHARS,
};
