use thiserror::Error;

/// Top-level error type for the TruthLens runtime.
///
/// The `Display` text of each variant is what the panel shows to the user,
/// so wording changes here are user-visible.
#[derive(Debug, Error)]
pub enum TruthLensError {
    #[error("No text provided for analysis")]
    EmptyInput,

    #[error("Network error. Please check your internet connection.")]
    Network(String),

    #[error("Invalid API key. Please check your API key.")]
    Unauthorized,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("Classifier server error. Please try again later.")]
    ServerError,

    #[error("API request failed: {status} - {message}")]
    ApiStatus { status: u16, message: String },

    #[error("Invalid response from classification API")]
    MalformedResponse(String),

    #[error("OCR API request failed")]
    OcrRequestFailed,

    #[error("{0}")]
    OcrProcessing(String),

    #[error("No text found in image. Try a clearer image with better contrast.")]
    NoTextFound,

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Could not establish connection. Receiving end does not exist.")]
    NoListener,

    #[error("No response from {0}")]
    NoResponse(&'static str),

    #[error("{0}")]
    Remote(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TruthLensError {
    /// Map a non-success HTTP status from the classification API to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => Self::Unauthorized,
            429 => Self::RateLimited,
            500 => Self::ServerError,
            _ => Self::ApiStatus {
                status,
                message: message.into(),
            },
        }
    }
}
