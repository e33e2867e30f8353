pub mod ocr;

pub use ocr::{extract_text, parse_ocr_response, OcrOptions, OcrSpaceClient};
