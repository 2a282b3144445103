use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter applied to each frame.
///
/// The host passes modes as integer codes. Codes outside the known set
/// are not an error: [`ProcessingMode::from_code`] returns `None` and the
/// filter bank passes the frame through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Canny-style hysteresis edge map.
    #[default]
    EdgeDetect,
    /// Sobel gradient magnitude.
    GradientMagnitude,
    /// Luma only.
    Grayscale,
}

impl ProcessingMode {
    pub const ALL: [ProcessingMode; 3] = [
        ProcessingMode::EdgeDetect,
        ProcessingMode::GradientMagnitude,
        ProcessingMode::Grayscale,
    ];

    /// Map a host mode code to a mode. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::EdgeDetect),
            1 => Some(Self::GradientMagnitude),
            2 => Some(Self::Grayscale),
            _ => None,
        }
    }

    /// Integer code used at the host boundary.
    pub fn code(self) -> i32 {
        match self {
            Self::EdgeDetect => 0,
            Self::GradientMagnitude => 1,
            Self::Grayscale => 2,
        }
    }

    /// Next mode in the toggle cycle, wrapping back to `EdgeDetect`.
    pub fn next(self) -> Self {
        match self {
            Self::EdgeDetect => Self::GradientMagnitude,
            Self::GradientMagnitude => Self::Grayscale,
            Self::Grayscale => Self::EdgeDetect,
        }
    }

    /// Short upper-case label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            Self::EdgeDetect => "CANNY",
            Self::GradientMagnitude => "SOBEL",
            Self::Grayscale => "GRAYSCALE",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
