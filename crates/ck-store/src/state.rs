//! Primary (non-derived) store state.
//!
//! Nothing here is computed from anything else. Derived values live in
//! [`crate::derived`] and are recomputed from these fields on every read.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use ck_core::{CurvePoint, ViewState};
use serde::{Deserialize, Serialize};

/// First frame of a freshly opened document.
pub const DEFAULT_FRAME: i32 = 1;

/// Per-curve display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveMetadata {
    pub visible: bool,
}

impl Default for CurveMetadata {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Curve points are held behind `Arc` so snapshots can share them; edits go
/// through `Arc::make_mut`, which copies only while a snapshot still holds
/// the old sequence.
#[derive(Debug, Clone)]
pub(crate) struct StoreState {
    pub curves: HashMap<String, Arc<Vec<CurvePoint>>>,
    pub point_selection: HashMap<String, BTreeSet<usize>>,
    pub metadata: HashMap<String, CurveMetadata>,
    pub active_curve: Option<String>,
    pub current_frame: i32,
    pub view: ViewState,
    pub selected_curves: BTreeSet<String>,
    pub show_all: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            curves: HashMap::new(),
            point_selection: HashMap::new(),
            metadata: HashMap::new(),
            active_curve: None,
            current_frame: DEFAULT_FRAME,
            view: ViewState::default(),
            selected_curves: BTreeSet::new(),
            show_all: false,
        }
    }
}

impl StoreState {
    pub fn metadata_of(&self, name: &str) -> CurveMetadata {
        self.metadata.get(name).copied().unwrap_or_default()
    }

    pub fn selection_of(&self, name: &str) -> BTreeSet<usize> {
        self.point_selection.get(name).cloned().unwrap_or_default()
    }

    /// Drop selected indices at or past `len`. Returns the surviving set when
    /// anything was dropped.
    pub fn trim_selection(&mut self, name: &str, len: usize) -> Option<BTreeSet<usize>> {
        let current = self.point_selection.get(name)?;
        if current.iter().all(|&i| i < len) {
            return None;
        }
        let kept: BTreeSet<usize> = current.iter().copied().filter(|&i| i < len).collect();
        tracing::debug!(
            curve = name,
            dropped = current.len() - kept.len(),
            "dropping point selection past the end of the curve"
        );
        self.put_selection(name, kept.clone());
        Some(kept)
    }

    /// Store a point selection, dropping the entry when it is empty.
    pub fn put_selection(&mut self, name: &str, indices: BTreeSet<usize>) {
        if indices.is_empty() {
            self.point_selection.remove(name);
        } else {
            self.point_selection.insert(name.to_string(), indices);
        }
    }
}
