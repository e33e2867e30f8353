pub mod coordinator;
pub mod screen;

pub use coordinator::Coordinator;
pub use screen::UnavailableScreenCapture;
