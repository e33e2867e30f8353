pub mod classifier;
pub mod prompt;
pub mod providers;
pub mod reply;

pub use classifier::{Classifier, ClassifierSettings};
pub use reply::parse_reply;
