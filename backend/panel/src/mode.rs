use serde::{Deserialize, Serialize};

/// The panel's three-way exclusive input toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Text,
    Image,
    Capture,
}

/// What the host UI should do after a mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    /// Focus the text input.
    FocusInput,
    /// Open the file picker; the chosen file comes back through `Panel::upload_file`.
    OpenFilePicker,
    /// The page scan already ran.
    Scanned,
}

impl InputMode {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            InputMode::Text => Some("Type or paste news text here..."),
            _ => None,
        }
    }
}
