/// Shape of every emitted entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggerFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable line; `color` forces ANSI escapes on or off.
    Text { color: bool },
}

impl LoggerFormat {
    pub fn from_flags(text: bool, color: bool) -> Self {
        if text {
            LoggerFormat::Text { color }
        } else {
            LoggerFormat::Json
        }
    }
}
