// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Rejection returned by validated configuration constructors and setters.
///
/// A setter that returns `Err` leaves the previous configuration untouched.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The minimum zoom must be at least `1.0`.
    #[error("minimum zoom {0} is below 1.0")]
    MinZoomBelowOne(f64),
    /// The maximum zoom must be at least `1.0`.
    #[error("maximum zoom {0} is below 1.0")]
    MaxZoomBelowOne(f64),
    /// The maximum zoom must not be smaller than the minimum zoom.
    #[error("zoom range is inverted: min {min} > max {max}")]
    InvertedZoomRange {
        /// Requested minimum zoom.
        min: f64,
        /// Requested maximum zoom.
        max: f64,
    },
    /// Zoom values must be finite.
    #[error("zoom value {0} is not finite")]
    NonFiniteZoom(f64),
    /// The minimap size must be finite and non-negative.
    #[error("minimap size {0} is negative")]
    NegativeMinimapSize(f64),
    /// A smoothing constant is outside its valid range.
    #[error("smoothing constant `{name}` has invalid value {value}")]
    InvalidSmoothing {
        /// Name of the rejected constant.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Fling damping must be finite and positive.
    #[error("fling damping {0} must be positive")]
    InvalidFlingDamping(f64),
    /// Touch slop must be finite and non-negative.
    #[error("touch slop {0} is negative")]
    NegativeTouchSlop(f64),
    /// The minimum fling velocity must be finite and non-negative.
    #[error("minimum fling velocity {0} is negative")]
    NegativeFlingVelocity(f64),
    /// The double-tap zoom preset must be finite and at least `1.0`.
    #[error("double-tap zoom {0} is below 1.0")]
    DoubleTapZoomBelowOne(f64),
}
