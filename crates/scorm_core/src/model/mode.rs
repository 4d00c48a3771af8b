//! Display mode of one attempt.

use std::fmt::{Display, Formatter};

/// Store key holding the display mode.
pub const MODE_KEY: &str = "cmi.mode";
/// Store key holding the completion status.
pub const COMPLETION_STATUS_KEY: &str = "cmi.completion_status";
/// Completion status that forces review mode.
pub const COMPLETED: &str = "completed";

/// Whether content may mutate the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Read/write.
    Normal,
    /// Read-only.
    Review,
}

impl Mode {
    /// Interprets the raw stored mode.
    ///
    /// Only an exact `normal` grants write access; missing or unrecognized
    /// values fall back to read-only `Review`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("normal") => Self::Normal,
            _ => Self::Review,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Review => "review",
        }
    }

    pub fn allows_set(self) -> bool {
        self == Self::Normal
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
