//! Notification kinds and payloads.
//!
//! Each notification is a [`StoreEvent`] variant carrying an owned payload.
//! Observers never receive references into store-owned data.

use std::collections::BTreeSet;
use std::fmt;

use ck_core::ViewState;
use serde::{Deserialize, Serialize};

/// One channel per notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    CurvesChanged,
    SelectionChanged,
    ActiveCurveChanged,
    FrameChanged,
    ViewChanged,
    CurveVisibilityChanged,
    SelectionStateChanged,
}

impl SignalKind {
    pub const ALL: [SignalKind; 7] = [
        SignalKind::CurvesChanged,
        SignalKind::SelectionChanged,
        SignalKind::ActiveCurveChanged,
        SignalKind::FrameChanged,
        SignalKind::ViewChanged,
        SignalKind::CurveVisibilityChanged,
        SignalKind::SelectionStateChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurvesChanged => "curves_changed",
            Self::SelectionChanged => "selection_changed",
            Self::ActiveCurveChanged => "active_curve_changed",
            Self::FrameChanged => "frame_changed",
            Self::ViewChanged => "view_changed",
            Self::CurveVisibilityChanged => "curve_visibility_changed",
            Self::SelectionStateChanged => "selection_state_changed",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change announced by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A curve was created, replaced, edited or deleted.
    CurvesChanged { curve: String },
    /// The point selection of one curve changed.
    SelectionChanged {
        curve: String,
        indices: BTreeSet<usize>,
    },
    ActiveCurveChanged { curve: Option<String> },
    FrameChanged { frame: i32 },
    ViewChanged { view: ViewState },
    CurveVisibilityChanged { curve: String, visible: bool },
    /// Curve-level selection or the show-all flag changed.
    SelectionStateChanged {
        curves: BTreeSet<String>,
        show_all: bool,
    },
}

impl StoreEvent {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::CurvesChanged { .. } => SignalKind::CurvesChanged,
            Self::SelectionChanged { .. } => SignalKind::SelectionChanged,
            Self::ActiveCurveChanged { .. } => SignalKind::ActiveCurveChanged,
            Self::FrameChanged { .. } => SignalKind::FrameChanged,
            Self::ViewChanged { .. } => SignalKind::ViewChanged,
            Self::CurveVisibilityChanged { .. } => SignalKind::CurveVisibilityChanged,
            Self::SelectionStateChanged { .. } => SignalKind::SelectionStateChanged,
        }
    }

    /// Coalescing key: inside a batch, a later event with the same key
    /// replaces the payload of an earlier one.
    pub fn key(&self) -> EventKey {
        let subject = match self {
            Self::CurvesChanged { curve }
            | Self::SelectionChanged { curve, .. }
            | Self::CurveVisibilityChanged { curve, .. } => Some(curve.clone()),
            Self::ActiveCurveChanged { .. }
            | Self::FrameChanged { .. }
            | Self::ViewChanged { .. }
            | Self::SelectionStateChanged { .. } => None,
        };
        EventKey {
            kind: self.kind(),
            subject,
        }
    }
}

/// `(kind, subject)` pair used to deduplicate pending notifications.
///
/// The subject is the curve name for per-curve kinds and `None` for
/// store-wide kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub kind: SignalKind,
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_curve_events_key_by_name() {
        let a = StoreEvent::CurvesChanged {
            curve: "A".to_string(),
        };
        let b = StoreEvent::CurvesChanged {
            curve: "B".to_string(),
        };
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().subject.as_deref(), Some("A"));
    }

    #[test]
    fn store_wide_events_share_one_key() {
        let first = StoreEvent::FrameChanged { frame: 1 };
        let last = StoreEvent::FrameChanged { frame: 99 };
        assert_eq!(first.key(), last.key());
    }

    #[test]
    fn selection_and_curve_kinds_do_not_collide() {
        let curves = StoreEvent::CurvesChanged {
            curve: "A".to_string(),
        };
        let selection = StoreEvent::SelectionChanged {
            curve: "A".to_string(),
            indices: BTreeSet::new(),
        };
        assert_ne!(curves.key(), selection.key());
    }

    #[test]
    fn kind_names() {
        assert_eq!(SignalKind::SelectionStateChanged.to_string(), "selection_state_changed");
        assert_eq!(SignalKind::ALL.len(), 7);
    }
}
