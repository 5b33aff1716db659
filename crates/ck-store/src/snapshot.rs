//! Frozen, immutable copies of the whole store.
//!
//! A [`StoreSnapshot`] shares curve point buffers with the store through
//! `Arc`, so taking one is cheap even with tens of thousands of points. The
//! store copies a buffer before editing it while a snapshot still holds it,
//! so a snapshot never observes later mutations. Snapshots are `Send + Sync`
//! and can be handed to a render thread.

use std::collections::BTreeSet;

use ck_core::{CurvePoint, DisplayMode, ViewState};

use crate::derived;
use crate::state::{CurveMetadata, StoreState};

#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    state: StoreState,
}

impl StoreSnapshot {
    pub(crate) fn new(state: StoreState) -> Self {
        Self { state }
    }

    /// Points of a curve, or `None` if the curve was not loaded.
    pub fn curve(&self, name: &str) -> Option<&[CurvePoint]> {
        self.state.curves.get(name).map(|points| points.as_slice())
    }

    /// Sorted curve names.
    pub fn curve_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.state.curves.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn curve_count(&self) -> usize {
        self.state.curves.len()
    }

    pub fn point_count(&self) -> usize {
        self.state.curves.values().map(|points| points.len()).sum()
    }

    pub fn selection(&self, name: &str) -> Option<&BTreeSet<usize>> {
        self.state.point_selection.get(name)
    }

    pub fn metadata(&self, name: &str) -> CurveMetadata {
        self.state.metadata_of(name)
    }

    pub fn active_curve(&self) -> Option<&str> {
        self.state.active_curve.as_deref()
    }

    pub fn current_frame(&self) -> i32 {
        self.state.current_frame
    }

    pub fn view(&self) -> ViewState {
        self.state.view
    }

    pub fn selected_curves(&self) -> &BTreeSet<String> {
        &self.state.selected_curves
    }

    pub fn show_all_curves(&self) -> bool {
        self.state.show_all
    }

    /// Derived from this snapshot's own inputs.
    pub fn display_mode(&self) -> DisplayMode {
        derived::display_mode(&self.state)
    }

    pub fn visible_curve_names(&self) -> Vec<String> {
        derived::visible_curve_names(&self.state)
    }

    pub fn frame_range(&self) -> Option<(i32, i32)> {
        derived::frame_range(&self.state)
    }
}
