//! ck-core: data model for the curve editor.
//!
//! Contains:
//! - point (curve points, point status, curve-level validation)
//! - view (zoom / pan / viewport parameters)
//! - display (display mode derived from curve-level selection)
//! - numeric (finite and positive checks)
//! - error (shared error types)

pub mod display;
pub mod error;
pub mod numeric;
pub mod point;
pub mod view;

pub use display::DisplayMode;
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use point::{CurvePoint, PointStatus, frame_bounds, index_of_frame, validate_points};
pub use view::ViewState;
