//! The curve store: single source of truth for curve editing state.
//!
//! Every accessor returns an owned copy; nothing hands out a reference into
//! store-owned data. Every mutator asserts the owner context, validates its
//! arguments before touching state, applies the change, and then either
//! delivers the resulting notification or parks it in the open batch.
//!
//! State is always read under the state lock and notifications are always
//! delivered after it is released, so observers can read or mutate the store
//! from inside their callbacks.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ck_core::{CoreError, CurvePoint, DisplayMode, PointStatus, ViewState, validate_points};

use crate::batch::{BatchGuard, BatchQueue, Routed};
use crate::config::StoreConfig;
use crate::derived;
use crate::dispatch::{Dispatcher, SubscriptionId};
use crate::error::{StoreError, StoreResult};
use crate::event::{SignalKind, StoreEvent};
use crate::guard::OwnerGuard;
use crate::snapshot::StoreSnapshot;
use crate::state::{CurveMetadata, StoreState};
use crate::stats::{NotificationStats, StatsCounters};

#[derive(Debug)]
pub struct CurveStore {
    config: StoreConfig,
    guard: OwnerGuard,
    state: Mutex<StoreState>,
    batch: BatchQueue,
    dispatcher: Dispatcher,
    stats: StatsCounters,
}

impl Default for CurveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveStore {
    /// Create a store owned by the calling thread.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store owned by the calling thread with explicit options.
    pub fn with_config(config: StoreConfig) -> Self {
        let guard = OwnerGuard::current(config.owner_label.clone());
        Self {
            config,
            guard,
            state: Mutex::new(StoreState::default()),
            batch: BatchQueue::new(),
            dispatcher: Dispatcher::new(),
            stats: StatsCounters::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn owner_guard(&self) -> &OwnerGuard {
        &self.guard
    }

    #[track_caller]
    fn read(&self, operation: &'static str) -> MutexGuard<'_, StoreState> {
        if self.config.guard_reads {
            self.guard.assert_owner(operation);
        }
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[track_caller]
    fn write(&self, operation: &'static str) -> MutexGuard<'_, StoreState> {
        self.guard.assert_owner(operation);
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: StoreEvent) {
        match self.batch.route(event) {
            Routed::Immediate(event) => {
                self.dispatcher.emit(&event);
                self.stats.record_dispatch(1);
            }
            Routed::Queued { coalesced } => {
                if coalesced {
                    self.stats.record_coalesced();
                }
            }
        }
    }

    fn notify_all(&self, events: Vec<StoreEvent>) {
        for event in events {
            self.notify(event);
        }
    }

    // ------------------------------------------------------------------
    // Curve data
    // ------------------------------------------------------------------

    /// Copy of a curve's points. An unknown name yields an empty sequence;
    /// use [`has_curve`](Self::has_curve) to tell absent from empty.
    pub fn get_curve_data(&self, name: &str) -> Vec<CurvePoint> {
        self.read("get_curve_data")
            .curves
            .get(name)
            .map(|points| points.as_ref().clone())
            .unwrap_or_default()
    }

    /// Replace a curve wholesale, creating it if needed.
    ///
    /// The sequence is validated first (finite coordinates, unique frames);
    /// on failure nothing changes. If the new curve is shorter than before,
    /// point-selection indices at or past the new length are dropped and a
    /// `selection_changed` follows the `curves_changed`.
    pub fn set_curve_data(&self, name: &str, points: Vec<CurvePoint>) -> StoreResult<()> {
        self.guard.assert_owner("set_curve_data");
        validate_points(&points).map_err(|err| StoreError::invalid(name, err))?;

        let mut events = vec![StoreEvent::CurvesChanged {
            curve: name.to_string(),
        }];
        {
            let mut state = self.write("set_curve_data");
            let len = points.len();
            state.curves.insert(name.to_string(), Arc::new(points));

            if let Some(kept) = state.trim_selection(name, len) {
                events.push(StoreEvent::SelectionChanged {
                    curve: name.to_string(),
                    indices: kept,
                });
            }
        }
        self.notify_all(events);
        Ok(())
    }

    /// Remove a curve with its point selection and metadata. The active curve
    /// and the curve-level selection drop the name too. Returns false if the
    /// curve was not loaded.
    pub fn delete_curve(&self, name: &str) -> bool {
        let events = {
            let mut state = self.write("delete_curve");
            if state.curves.remove(name).is_none() {
                return false;
            }
            let mut events = vec![StoreEvent::CurvesChanged {
                curve: name.to_string(),
            }];
            if state.point_selection.remove(name).is_some() {
                events.push(StoreEvent::SelectionChanged {
                    curve: name.to_string(),
                    indices: BTreeSet::new(),
                });
            }
            state.metadata.remove(name);
            if state.active_curve.as_deref() == Some(name) {
                state.active_curve = None;
                events.push(StoreEvent::ActiveCurveChanged { curve: None });
            }
            if state.selected_curves.remove(name) {
                events.push(StoreEvent::SelectionStateChanged {
                    curves: state.selected_curves.clone(),
                    show_all: state.show_all,
                });
            }
            events
        };
        self.notify_all(events);
        true
    }

    pub fn has_curve(&self, name: &str) -> bool {
        self.read("has_curve").curves.contains_key(name)
    }

    /// Number of points in a curve, zero if unknown.
    pub fn curve_len(&self, name: &str) -> usize {
        self.read("curve_len").curves.get(name).map_or(0, |p| p.len())
    }

    /// Sorted names of every loaded curve.
    pub fn curve_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read("curve_names").curves.keys().cloned().collect();
        names.sort();
        names
    }

    /// Copy of every curve.
    pub fn all_curve_data(&self) -> HashMap<String, Vec<CurvePoint>> {
        self.read("all_curve_data")
            .curves
            .iter()
            .map(|(name, points)| (name.clone(), points.as_ref().clone()))
            .collect()
    }

    /// `(name, points)` of the active curve, or `None` when there is no
    /// active curve or it is not loaded yet.
    pub fn active_curve_data(&self) -> Option<(String, Vec<CurvePoint>)> {
        let state = self.read("active_curve_data");
        let name = state.active_curve.as_ref()?;
        let points = state.curves.get(name)?;
        Some((name.clone(), points.as_ref().clone()))
    }

    /// Index and copy of the point at `frame`.
    pub fn point_at_frame(&self, name: &str, frame: i32) -> Option<(usize, CurvePoint)> {
        let state = self.read("point_at_frame");
        let points = state.curves.get(name)?;
        let index = ck_core::index_of_frame(points, frame)?;
        Some((index, points[index]))
    }

    // ------------------------------------------------------------------
    // Point editing
    // ------------------------------------------------------------------

    fn edit_point<F>(
        &self,
        operation: &'static str,
        name: &str,
        index: usize,
        edit: F,
    ) -> StoreResult<CurvePoint>
    where
        F: FnOnce(&mut CurvePoint),
    {
        let updated = {
            let mut state = self.write(operation);
            let points = state
                .curves
                .get_mut(name)
                .ok_or_else(|| StoreError::UnknownCurve {
                    name: name.to_string(),
                })?;
            let mut updated =
                *points
                    .get(index)
                    .ok_or_else(|| StoreError::PointIndexOutOfRange {
                        name: name.to_string(),
                        index,
                        len: points.len(),
                    })?;
            edit(&mut updated);
            updated
                .validate()
                .map_err(|err| StoreError::invalid(name, err))?;
            if let Some(clash) = points
                .iter()
                .enumerate()
                .position(|(i, p)| i != index && p.frame == updated.frame)
            {
                return Err(StoreError::invalid(
                    name,
                    CoreError::DuplicateFrame {
                        frame: updated.frame,
                        index: clash,
                    },
                ));
            }
            Arc::make_mut(points)[index] = updated;
            updated
        };
        self.notify(StoreEvent::CurvesChanged {
            curve: name.to_string(),
        });
        Ok(updated)
    }

    /// Replace one point in place.
    pub fn update_point(&self, name: &str, index: usize, point: CurvePoint) -> StoreResult<()> {
        self.edit_point("update_point", name, index, |p| *p = point)
            .map(|_| ())
    }

    /// Move one point, keeping its frame and status. This is the drag path.
    pub fn set_point_position(&self, name: &str, index: usize, x: f64, y: f64) -> StoreResult<()> {
        self.edit_point("set_point_position", name, index, |p| {
            p.x = x;
            p.y = y;
        })
        .map(|_| ())
    }

    pub fn set_point_status(
        &self,
        name: &str,
        index: usize,
        status: PointStatus,
    ) -> StoreResult<()> {
        self.edit_point("set_point_status", name, index, |p| p.status = status)
            .map(|_| ())
    }

    /// Append a point, creating the curve if it does not exist. Returns the
    /// new point's index. A point selection set before the curve existed is
    /// trimmed to the new length.
    pub fn add_point(&self, name: &str, point: CurvePoint) -> StoreResult<usize> {
        self.guard.assert_owner("add_point");
        point
            .validate()
            .map_err(|err| StoreError::invalid(name, err))?;
        let mut events = vec![StoreEvent::CurvesChanged {
            curve: name.to_string(),
        }];
        let index = {
            let mut state = self.write("add_point");
            let created = !state.curves.contains_key(name);
            let points = state.curves.entry(name.to_string()).or_default();
            if let Some(clash) = ck_core::index_of_frame(points, point.frame) {
                return Err(StoreError::invalid(
                    name,
                    CoreError::DuplicateFrame {
                        frame: point.frame,
                        index: clash,
                    },
                ));
            }
            let points = Arc::make_mut(points);
            points.push(point);
            let len = points.len();
            if created && let Some(kept) = state.trim_selection(name, len) {
                events.push(StoreEvent::SelectionChanged {
                    curve: name.to_string(),
                    indices: kept,
                });
            }
            len - 1
        };
        self.notify_all(events);
        Ok(index)
    }

    /// Remove one point. Selected indices above it shift down by one and the
    /// removed index leaves the selection.
    pub fn remove_point(&self, name: &str, index: usize) -> StoreResult<CurvePoint> {
        let (removed, events) = {
            let mut state = self.write("remove_point");
            let points = state
                .curves
                .get_mut(name)
                .ok_or_else(|| StoreError::UnknownCurve {
                    name: name.to_string(),
                })?;
            if index >= points.len() {
                return Err(StoreError::PointIndexOutOfRange {
                    name: name.to_string(),
                    index,
                    len: points.len(),
                });
            }
            let removed = Arc::make_mut(points).remove(index);

            let mut events = vec![StoreEvent::CurvesChanged {
                curve: name.to_string(),
            }];
            let current = state.selection_of(name);
            let shifted: BTreeSet<usize> = current
                .iter()
                .filter(|&&i| i != index)
                .map(|&i| if i > index { i - 1 } else { i })
                .collect();
            if shifted != current {
                state.put_selection(name, shifted.clone());
                events.push(StoreEvent::SelectionChanged {
                    curve: name.to_string(),
                    indices: shifted,
                });
            }
            (removed, events)
        };
        self.notify_all(events);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Point-level selection
    // ------------------------------------------------------------------

    /// Copy of a curve's selected point indices (empty if none).
    pub fn get_selection(&self, name: &str) -> BTreeSet<usize> {
        self.read("get_selection").selection_of(name)
    }

    /// Replace a curve's point selection.
    ///
    /// On a loaded curve every index must be in range, otherwise nothing
    /// changes. On a curve that is not loaded yet the selection is accepted
    /// with a warning and trimmed when the data arrives. Setting the current
    /// value again is a no-op.
    pub fn set_selection<I>(&self, name: &str, indices: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = usize>,
    {
        self.apply_selection("set_selection", name, indices.into_iter().collect())
    }

    fn apply_selection(
        &self,
        operation: &'static str,
        name: &str,
        indices: BTreeSet<usize>,
    ) -> StoreResult<()> {
        {
            let mut state = self.write(operation);
            match state.curves.get(name) {
                Some(points) => {
                    if let Some(&max) = indices.last()
                        && max >= points.len()
                    {
                        return Err(StoreError::PointIndexOutOfRange {
                            name: name.to_string(),
                            index: max,
                            len: points.len(),
                        });
                    }
                }
                None => {
                    tracing::warn!(
                        curve = name,
                        "point selection set on a curve that is not loaded"
                    );
                }
            }
            if state.selection_of(name) == indices {
                return Ok(());
            }
            state.put_selection(name, indices.clone());
        }
        self.notify(StoreEvent::SelectionChanged {
            curve: name.to_string(),
            indices,
        });
        Ok(())
    }

    pub fn add_to_selection(&self, name: &str, index: usize) -> StoreResult<()> {
        let mut indices = self.get_selection(name);
        indices.insert(index);
        self.apply_selection("add_to_selection", name, indices)
    }

    pub fn remove_from_selection(&self, name: &str, index: usize) -> StoreResult<()> {
        let mut indices = self.get_selection(name);
        if !indices.remove(&index) {
            return Ok(());
        }
        self.apply_selection("remove_from_selection", name, indices)
    }

    /// Select every point of a loaded curve.
    pub fn select_all_points(&self, name: &str) -> StoreResult<()> {
        let len = {
            let state = self.read("select_all_points");
            state
                .curves
                .get(name)
                .map(|points| points.len())
                .ok_or_else(|| StoreError::UnknownCurve {
                    name: name.to_string(),
                })?
        };
        self.apply_selection("select_all_points", name, (0..len).collect())
    }

    /// Clear the point selection of one curve, or of every curve.
    pub fn clear_selection(&self, name: Option<&str>) {
        let events: Vec<StoreEvent> = {
            let mut state = self.write("clear_selection");
            let cleared: Vec<String> = match name {
                Some(name) => state
                    .point_selection
                    .remove(name)
                    .map(|_| vec![name.to_string()])
                    .unwrap_or_default(),
                None => {
                    let mut names: Vec<String> =
                        state.point_selection.drain().map(|(name, _)| name).collect();
                    names.sort();
                    names
                }
            };
            cleared
                .into_iter()
                .map(|curve| StoreEvent::SelectionChanged {
                    curve,
                    indices: BTreeSet::new(),
                })
                .collect()
        };
        self.notify_all(events);
    }

    /// Sorted names of curves with at least one selected point.
    pub fn curves_with_selection(&self) -> Vec<String> {
        derived::curves_with_selection(&self.read("curves_with_selection"))
    }

    // ------------------------------------------------------------------
    // Active curve
    // ------------------------------------------------------------------

    pub fn active_curve(&self) -> Option<String> {
        self.read("active_curve").active_curve.clone()
    }

    /// Set or clear the active curve. A name that is not loaded is accepted
    /// with a warning so a session can be restored before its data.
    pub fn set_active_curve(&self, name: Option<&str>) {
        {
            let mut state = self.write("set_active_curve");
            if state.active_curve.as_deref() == name {
                return;
            }
            if let Some(name) = name
                && !state.curves.contains_key(name)
            {
                tracing::warn!(curve = name, "active curve set to a curve that is not loaded");
            }
            state.active_curve = name.map(str::to_string);
        }
        self.notify(StoreEvent::ActiveCurveChanged {
            curve: name.map(str::to_string),
        });
    }

    // ------------------------------------------------------------------
    // Frame and view
    // ------------------------------------------------------------------

    pub fn current_frame(&self) -> i32 {
        self.read("current_frame").current_frame
    }

    pub fn set_current_frame(&self, frame: i32) {
        {
            let mut state = self.write("set_current_frame");
            if state.current_frame == frame {
                return;
            }
            state.current_frame = frame;
        }
        self.notify(StoreEvent::FrameChanged { frame });
    }

    pub fn view_state(&self) -> ViewState {
        self.read("view_state").view
    }

    /// Replace the view parameters as a unit.
    pub fn set_view_state(&self, view: ViewState) -> StoreResult<()> {
        self.guard.assert_owner("set_view_state");
        view.validate()
            .map_err(|err| StoreError::invalid("view", err))?;
        {
            let mut state = self.write("set_view_state");
            if state.view == view {
                return Ok(());
            }
            state.view = view;
        }
        self.notify(StoreEvent::ViewChanged { view });
        Ok(())
    }

    pub fn set_zoom(&self, zoom: f64) -> StoreResult<()> {
        self.set_view_state(self.view_state().with_zoom(zoom))
    }

    pub fn set_pan(&self, pan_x: f64, pan_y: f64) -> StoreResult<()> {
        self.set_view_state(self.view_state().with_pan(pan_x, pan_y))
    }

    pub fn set_viewport_size(&self, width: u32, height: u32) -> StoreResult<()> {
        self.set_view_state(self.view_state().with_viewport(width, height))
    }

    // ------------------------------------------------------------------
    // Curve-level selection and display mode
    // ------------------------------------------------------------------

    /// Copy of the curve-level selection.
    pub fn get_selected_curves(&self) -> BTreeSet<String> {
        self.read("get_selected_curves").selected_curves.clone()
    }

    /// Replace the curve-level selection. Names that are not loaded are kept
    /// and logged; renderers filter them at read time. Setting the current
    /// value again is a no-op.
    pub fn set_selected_curves<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let event = {
            let mut state = self.write("set_selected_curves");
            if state.selected_curves == names {
                return;
            }
            let missing: Vec<&String> = names
                .iter()
                .filter(|name| !state.curves.contains_key(*name))
                .collect();
            if !missing.is_empty() {
                tracing::warn!(
                    ?missing,
                    "selected curves are not loaded; keeping them until data arrives"
                );
            }
            state.selected_curves = names;
            StoreEvent::SelectionStateChanged {
                curves: state.selected_curves.clone(),
                show_all: state.show_all,
            }
        };
        self.notify(event);
    }

    pub fn get_show_all_curves(&self) -> bool {
        self.read("get_show_all_curves").show_all
    }

    pub fn set_show_all_curves(&self, show_all: bool) {
        let event = {
            let mut state = self.write("set_show_all_curves");
            if state.show_all == show_all {
                return;
            }
            state.show_all = show_all;
            StoreEvent::SelectionStateChanged {
                curves: state.selected_curves.clone(),
                show_all,
            }
        };
        self.notify(event);
    }

    /// Which curves to render, computed from show-all and the curve-level
    /// selection on every call.
    pub fn display_mode(&self) -> DisplayMode {
        derived::display_mode(&self.read("display_mode"))
    }

    /// Sorted names of the curves the renderer should draw right now.
    pub fn visible_curve_names(&self) -> Vec<String> {
        derived::visible_curve_names(&self.read("visible_curve_names"))
    }

    /// Smallest and largest frame across every loaded curve.
    pub fn frame_range(&self) -> Option<(i32, i32)> {
        derived::frame_range(&self.read("frame_range"))
    }

    // ------------------------------------------------------------------
    // Curve metadata
    // ------------------------------------------------------------------

    pub fn curve_metadata(&self, name: &str) -> CurveMetadata {
        self.read("curve_metadata").metadata_of(name)
    }

    pub fn set_curve_visibility(&self, name: &str, visible: bool) {
        {
            let mut state = self.write("set_curve_visibility");
            if state.metadata_of(name).visible == visible {
                return;
            }
            if !state.curves.contains_key(name) {
                tracing::warn!(curve = name, "visibility set on a curve that is not loaded");
            }
            state
                .metadata
                .entry(name.to_string())
                .or_default()
                .visible = visible;
        }
        self.notify(StoreEvent::CurveVisibilityChanged {
            curve: name.to_string(),
            visible,
        });
    }

    // ------------------------------------------------------------------
    // Batching
    // ------------------------------------------------------------------

    /// Open a batch. While open, state changes stay visible to readers but
    /// notifications are deduplicated by `(kind, subject)` and held until
    /// [`end_batch`](Self::end_batch). Nested calls are ignored with a
    /// warning. Returns true if this call opened the batch.
    pub fn begin_batch(&self) -> bool {
        self.guard.assert_owner("begin_batch");
        if self.batch.begin() {
            tracing::debug!("batch opened");
            true
        } else {
            tracing::warn!("begin_batch called while a batch is already open; ignoring");
            false
        }
    }

    /// Close the open batch and deliver each pending notification once, in
    /// first-insertion order. Observers run after the batch is closed, so
    /// mutations they make are delivered immediately. Returns the number of
    /// notifications delivered.
    pub fn end_batch(&self) -> usize {
        self.guard.assert_owner("end_batch");
        let Some(events) = self.batch.end() else {
            tracing::warn!("end_batch called without an open batch; ignoring");
            return 0;
        };
        self.stats.record_batch_closed();
        tracing::debug!(pending = events.len(), "batch closed");
        let count = events.len();
        for event in &events {
            self.dispatcher.emit(event);
        }
        self.stats.record_dispatch(count as u64);
        count
    }

    /// Open a batch scoped to the returned guard.
    pub fn batch(&self) -> BatchGuard<'_> {
        let owns = self.begin_batch();
        BatchGuard::new(self, owns)
    }

    /// Run `f` inside a batch and close it afterwards.
    pub fn transaction<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        let _batch = self.batch();
        f(self)
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_open()
    }

    /// Number of distinct notifications waiting in the open batch.
    pub fn pending_notifications(&self) -> usize {
        self.batch.pending_len()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&self, kind: SignalKind, observer: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.guard.assert_owner("subscribe");
        self.dispatcher.subscribe(kind, Arc::new(observer))
    }

    /// Register one observer on several kinds.
    pub fn subscribe_many<F>(&self, kinds: &[SignalKind], observer: F) -> Vec<SubscriptionId>
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.guard.assert_owner("subscribe_many");
        let observer: crate::dispatch::Observer = Arc::new(observer);
        kinds
            .iter()
            .map(|kind| self.dispatcher.subscribe(*kind, Arc::clone(&observer)))
            .collect()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.guard.assert_owner("unsubscribe");
        self.dispatcher.unsubscribe(id)
    }

    pub fn on_frame_changed<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.subscribe(SignalKind::FrameChanged, move |event| {
            if let StoreEvent::FrameChanged { frame } = event {
                observer(*frame);
            }
        })
    }

    pub fn on_curves_changed<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.subscribe(SignalKind::CurvesChanged, move |event| {
            if let StoreEvent::CurvesChanged { curve } = event {
                observer(curve);
            }
        })
    }

    pub fn on_selection_state_changed<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&BTreeSet<String>, bool) + Send + Sync + 'static,
    {
        self.subscribe(SignalKind::SelectionStateChanged, move |event| {
            if let StoreEvent::SelectionStateChanged { curves, show_all } = event {
                observer(curves, *show_all);
            }
        })
    }

    // ------------------------------------------------------------------
    // Snapshots and diagnostics
    // ------------------------------------------------------------------

    /// Frozen copy of the whole store, cheap to take and safe to send to
    /// another thread.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.read("snapshot").clone())
    }

    pub fn stats(&self) -> NotificationStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}
