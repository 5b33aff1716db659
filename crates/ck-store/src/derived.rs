//! Derived state.
//!
//! Pure functions of the primary state with no cached fields, so they cannot
//! fall out of sync with their inputs. They are evaluated on every read,
//! including while a batch is open.

use ck_core::{DisplayMode, frame_bounds};

use crate::state::StoreState;

pub(crate) fn display_mode(state: &StoreState) -> DisplayMode {
    DisplayMode::from_inputs(state.show_all, !state.selected_curves.is_empty())
}

/// Names the renderer should draw, sorted. Dangling names in the active
/// curve or the curve-level selection are filtered out here.
pub(crate) fn visible_curve_names(state: &StoreState) -> Vec<String> {
    let loaded_and_visible =
        |name: &String| state.curves.contains_key(name) && state.metadata_of(name).visible;

    let mut names: Vec<String> = match display_mode(state) {
        DisplayMode::AllVisible => state
            .curves
            .keys()
            .filter(|name| loaded_and_visible(*name))
            .cloned()
            .collect(),
        DisplayMode::Selected => state
            .selected_curves
            .iter()
            .chain(state.active_curve.iter())
            .filter(|name| loaded_and_visible(*name))
            .cloned()
            .collect(),
        // The active curve is drawn even when hidden, it is the edit target.
        DisplayMode::ActiveOnly => state
            .active_curve
            .iter()
            .filter(|name| state.curves.contains_key(*name))
            .cloned()
            .collect(),
    };
    names.sort();
    names.dedup();
    names
}

/// Smallest and largest frame across every loaded curve.
pub(crate) fn frame_range(state: &StoreState) -> Option<(i32, i32)> {
    state
        .curves
        .values()
        .filter_map(|points| frame_bounds(points))
        .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
}

/// Curves that currently have at least one selected point, sorted.
pub(crate) fn curves_with_selection(state: &StoreState) -> Vec<String> {
    let mut names: Vec<String> = state
        .point_selection
        .iter()
        .filter(|(_, indices)| !indices.is_empty())
        .map(|(name, _)| name.clone())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::CurvePoint;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn state_with(curves: &[(&str, &[i32])]) -> StoreState {
        let mut state = StoreState::default();
        for (name, frames) in curves {
            let points = frames.iter().map(|&f| CurvePoint::new(f, 0.0, 0.0)).collect();
            state.curves.insert(name.to_string(), Arc::new(points));
        }
        state
    }

    #[test]
    fn active_only_ignores_dangling_active() {
        let mut state = state_with(&[("A", &[1])]);
        state.active_curve = Some("Missing".to_string());
        assert!(visible_curve_names(&state).is_empty());
        state.active_curve = Some("A".to_string());
        assert_eq!(visible_curve_names(&state), vec!["A".to_string()]);
    }

    #[test]
    fn selected_mode_includes_active_and_skips_hidden() {
        let mut state = state_with(&[("A", &[1]), ("B", &[1]), ("C", &[1])]);
        state.selected_curves = BTreeSet::from(["B".to_string(), "Ghost".to_string()]);
        state.active_curve = Some("A".to_string());
        assert_eq!(display_mode(&state), DisplayMode::Selected);
        assert_eq!(visible_curve_names(&state), vec!["A", "B"]);

        state.metadata.insert("B".to_string(), crate::CurveMetadata { visible: false });
        assert_eq!(visible_curve_names(&state), vec!["A"]);
    }

    #[test]
    fn all_visible_lists_every_loaded_curve() {
        let mut state = state_with(&[("B", &[1]), ("A", &[1])]);
        state.show_all = true;
        assert_eq!(visible_curve_names(&state), vec!["A", "B"]);
    }

    #[test]
    fn frame_range_spans_all_curves() {
        let state = state_with(&[("A", &[3, 9]), ("B", &[-2, 4]), ("Empty", &[])]);
        assert_eq!(frame_range(&state), Some((-2, 9)));
        assert_eq!(frame_range(&StoreState::default()), None);
    }
}
