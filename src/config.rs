// Limits of the on-screen controls and the per-session knobs that are not
// part of EditorState.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Smallest brush the slider allows (image pixels).
pub const BRUSH_MIN: f32 = 5.0;
/// Largest brush the slider allows (image pixels).
pub const BRUSH_MAX: f32 = 100.0;
pub const BRUSH_DEFAULT: f32 = 20.0;

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;

/// Same default the browser uses for JPEG data URLs (0.92).
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Exports are named `background-removed.<ext>`.
pub const EXPORT_STEM: &str = "background-removed";

/// How keep-mode samples combine within one stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepPolicy {
    /// Each sample intersects the whole buffer with its own disc.
    /// A moving keep stroke therefore only keeps the last disc.
    #[default]
    PerSample,
    /// Discs are unioned for the duration of the stroke and the buffer is
    /// intersected once, on pointer-up.
    StrokeUnion,
}

impl FromStr for KeepPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-sample" | "sample" => Ok(KeepPolicy::PerSample),
            "stroke-union" | "union" => Ok(KeepPolicy::StrokeUnion),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepPolicy::PerSample => write!(f, "per-sample"),
            KeepPolicy::StrokeUnion => write!(f, "stroke-union"),
        }
    }
}

/// Settings fixed for the lifetime of an editing session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub keep_policy: KeepPolicy,
    /// Maximum number of snapshots kept, pristine load included.
    /// `None` keeps every stroke.
    pub history_limit: Option<usize>,
    /// 1..=100
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keep_policy: KeepPolicy::PerSample,
            history_limit: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}
