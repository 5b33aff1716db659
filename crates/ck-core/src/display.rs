//! Display mode: which curves the renderer should draw.
//!
//! The mode is never stored. It is a pure function of two primary inputs,
//! the show-all flag and whether the curve-level selection is empty, and is
//! recomputed on every read.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayMode {
    /// Only the active curve is drawn.
    ActiveOnly,
    /// The curve-level selection is drawn.
    Selected,
    /// Every loaded curve is drawn.
    AllVisible,
}

impl DisplayMode {
    /// `AllVisible` if show-all is set, else `Selected` if any curve is
    /// selected, else `ActiveOnly`.
    pub fn from_inputs(show_all: bool, has_selected_curves: bool) -> Self {
        if show_all {
            Self::AllVisible
        } else if has_selected_curves {
            Self::Selected
        } else {
            Self::ActiveOnly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveOnly => "ACTIVE_ONLY",
            Self::Selected => "SELECTED",
            Self::AllVisible => "ALL_VISIBLE",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
