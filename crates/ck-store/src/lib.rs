//! Centralized reactive state store for interactive curve editing.
//!
//! The store holds curve geometry, per-curve point selection, the active
//! curve, the playback frame, view parameters and curve-level selection, and
//! announces every change to registered observers.
//!
//! # Architecture
//!
//! - **Single writer**: the thread that constructs a [`CurveStore`] owns it.
//!   Any mutation from another thread panics (see [`guard`]).
//! - **Snapshots only**: every getter returns an owned copy; [`StoreSnapshot`]
//!   freezes the whole store for a render thread.
//! - **Derived, never stored**: [`DisplayMode`](ck_core::DisplayMode) and the
//!   visible-curve list are recomputed from primary state on each read.
//! - **Batching**: inside [`CurveStore::begin_batch`] /
//!   [`CurveStore::end_batch`] state stays readable immediately while
//!   notifications are coalesced per `(kind, subject)` and delivered once.
//!
//! ```
//! use ck_core::{CurvePoint, DisplayMode};
//! use ck_store::CurveStore;
//!
//! let store = CurveStore::new();
//! store.set_curve_data("A", vec![CurvePoint::new(1, 0.0, 0.0)]).unwrap();
//! store.set_selected_curves(["A"]);
//! assert_eq!(store.display_mode(), DisplayMode::Selected);
//! ```

pub mod batch;
pub mod config;
mod derived;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod guard;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod store;

pub use batch::BatchGuard;
pub use config::StoreConfig;
pub use dispatch::{Observer, SubscriptionId};
pub use error::{StoreError, StoreResult};
pub use event::{EventKey, SignalKind, StoreEvent};
pub use guard::OwnerGuard;
pub use snapshot::StoreSnapshot;
pub use state::CurveMetadata;
pub use stats::NotificationStats;
pub use store::CurveStore;
