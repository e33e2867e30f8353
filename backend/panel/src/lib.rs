pub mod mode;
pub mod panel;
pub mod result_view;
pub mod tab;
pub mod transcript;

pub use mode::{InputMode, ModeAction};
pub use panel::Panel;
pub use result_view::ResultView;
pub use tab::TabHost;
pub use transcript::{ChatEntry, Transcript};
