use std::{fmt, str::FromStr};

use crate::foundation::error::{DpError, DpResult};

pub use kurbo::{Point, Rect, Vec2};

/// Side of the visible preview surface, in pixels.
pub const PREVIEW_SIZE: u32 = 400;
/// Side of the hidden export surface, in pixels.
pub const HIGH_RES_SIZE: u32 = 3000;
/// Linear factor between preview space and export space.
pub const SCALE_RATIO: f64 = HIGH_RES_SIZE as f64 / PREVIEW_SIZE as f64;

/// Smallest user scale multiplier.
pub const MIN_SCALE: f64 = 0.5;
/// Largest user scale multiplier.
pub const MAX_SCALE: f64 = 3.0;
/// Half-range of the x/y position sliders.
pub const OFFSET_SLIDER_LIMIT: f64 = 200.0;

/// Academic status; selects the decorative frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// First year.
    Freshman,
    /// Second year.
    Sophomore,
    /// Third year.
    Junior,
    /// Fourth year.
    Senior,
}

impl Status {
    /// Every status, in academic order.
    pub const ALL: [Status; 4] = [
        Status::Freshman,
        Status::Sophomore,
        Status::Junior,
        Status::Senior,
    ];

    /// Lowercase identifier used in URLs and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Freshman => "freshman",
            Status::Sophomore => "sophomore",
            Status::Junior => "junior",
            Status::Senior => "senior",
        }
    }

    /// Capitalized, human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Status::Freshman => "Freshman",
            Status::Sophomore => "Sophomore",
            Status::Junior => "Junior",
            Status::Senior => "Senior",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DpError;

    fn from_str(s: &str) -> DpResult<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == needle)
            .ok_or_else(|| DpError::validation(format!("unknown status '{s}'")))
    }
}

/// Identity collected upstream; read-only for the compositor.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserSelection {
    /// Display name, also used for the export file name.
    pub name: String,
    /// Class section.
    pub section: String,
    /// Academic status.
    pub status: Status,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
