//! Curve points and curve-level validation.
//!
//! A curve is an ordered sequence of [`CurvePoint`]s. Points are not required
//! to be sorted by frame, but frames must be unique within one curve so that
//! frame lookups are unambiguous.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::numeric::ensure_finite;

/// Tracking / keying status of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStatus {
    #[default]
    Normal,
    Interpolated,
    Keyframe,
    Endframe,
    Tracked,
}

impl PointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Interpolated => "interpolated",
            Self::Keyframe => "keyframe",
            Self::Endframe => "endframe",
            Self::Tracked => "tracked",
        }
    }
}

impl fmt::Display for PointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub frame: i32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub status: PointStatus,
}

impl CurvePoint {
    /// Create a point with [`PointStatus::Normal`].
    pub fn new(frame: i32, x: f64, y: f64) -> Self {
        Self {
            frame,
            x,
            y,
            status: PointStatus::Normal,
        }
    }

    pub fn with_status(mut self, status: PointStatus) -> Self {
        self.status = status;
        self
    }

    /// Reject non-finite coordinates.
    pub fn validate(&self) -> CoreResult<()> {
        ensure_finite(self.x, "point x")?;
        ensure_finite(self.y, "point y")?;
        Ok(())
    }
}

impl From<(i32, f64, f64)> for CurvePoint {
    fn from((frame, x, y): (i32, f64, f64)) -> Self {
        Self::new(frame, x, y)
    }
}

impl From<(i32, f64, f64, PointStatus)> for CurvePoint {
    fn from((frame, x, y, status): (i32, f64, f64, PointStatus)) -> Self {
        Self { frame, x, y, status }
    }
}

/// Validate a whole point sequence: finite coordinates and unique frames.
///
/// Nothing is modified; callers apply the sequence only after this passes.
pub fn validate_points(points: &[CurvePoint]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        point.validate()?;
        if !seen.insert(point.frame) {
            return Err(CoreError::DuplicateFrame {
                frame: point.frame,
                index,
            });
        }
    }
    Ok(())
}

/// Position of the point at `frame`, if any.
pub fn index_of_frame(points: &[CurvePoint], frame: i32) -> Option<usize> {
    points.iter().position(|p| p.frame == frame)
}

/// Smallest and largest frame in the sequence.
pub fn frame_bounds(points: &[CurvePoint]) -> Option<(i32, i32)> {
    let first = points.first()?.frame;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.frame), hi.max(p.frame))),
    )
}
