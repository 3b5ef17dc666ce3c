// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated configuration for [`ZoomView`](crate::ZoomView).
//!
//! Every fallible setter returns a [`ConfigError`] instead of coercing the
//! value, and leaves the receiver unchanged on rejection.

use crate::error::ConfigError;
use crate::minimap::MinimapConfig;

/// Inclusive zoom range with `1.0 <= min <= max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

impl ZoomLimits {
    /// Creates a validated zoom range.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() {
            return Err(ConfigError::NonFiniteZoom(min));
        }
        if !max.is_finite() {
            return Err(ConfigError::NonFiniteZoom(max));
        }
        if min < 1.0 {
            return Err(ConfigError::MinZoomBelowOne(min));
        }
        if max < 1.0 {
            return Err(ConfigError::MaxZoomBelowOne(max));
        }
        if max < min {
            return Err(ConfigError::InvertedZoomRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Returns a copy with a new minimum, validated against the current maximum.
    pub fn with_min(self, min: f64) -> Result<Self, ConfigError> {
        Self::new(min, self.max)
    }

    /// Returns a copy with a new maximum, validated against the current minimum.
    pub fn with_max(self, max: f64) -> Result<Self, ConfigError> {
        Self::new(self.min, max)
    }

    /// Minimum zoom factor.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum zoom factor.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps `zoom` into the range.
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 1.0, max: 3.0 }
    }
}

/// How a fling gesture is treated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlingMode {
    /// Flings are reported as not consumed.
    Ignore,
    /// Flings glide the content with a decelerating animation.
    ///
    /// The travel in content units is `velocity / (zoom * damping)`, so the
    /// same screen velocity travels less content when zoomed in.
    Decelerate {
        /// Damping constant; must be finite and positive.
        damping: f64,
    },
}

impl Default for FlingMode {
    fn default() -> Self {
        Self::Decelerate { damping: 10.0 }
    }
}

/// Thresholds used when recognizing gestures from raw pointer input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    touch_slop: f64,
    double_tap_timeout_ms: u64,
    min_fling_velocity: f64,
    fling: FlingMode,
}

impl GestureConfig {
    /// Distance in view pixels a single pointer must travel before it scrolls.
    #[must_use]
    pub fn touch_slop(&self) -> f64 {
        self.touch_slop
    }

    /// Sets the scroll threshold.
    pub fn with_touch_slop(mut self, slop: f64) -> Result<Self, ConfigError> {
        if slop < 0.0 || !slop.is_finite() {
            return Err(ConfigError::NegativeTouchSlop(slop));
        }
        self.touch_slop = slop;
        Ok(self)
    }

    /// Window in milliseconds within which a second tap makes a double tap.
    #[must_use]
    pub fn double_tap_timeout_ms(&self) -> u64 {
        self.double_tap_timeout_ms
    }

    /// Sets the double‑tap window.
    #[must_use]
    pub fn with_double_tap_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.double_tap_timeout_ms = timeout_ms;
        self
    }

    /// Release speed in view pixels per second above which a scroll becomes a fling.
    #[must_use]
    pub fn min_fling_velocity(&self) -> f64 {
        self.min_fling_velocity
    }

    /// Sets the fling speed threshold.
    pub fn with_min_fling_velocity(mut self, velocity: f64) -> Result<Self, ConfigError> {
        if velocity < 0.0 || !velocity.is_finite() {
            return Err(ConfigError::NegativeFlingVelocity(velocity));
        }
        self.min_fling_velocity = velocity;
        Ok(self)
    }

    /// Fling treatment.
    #[must_use]
    pub fn fling(&self) -> FlingMode {
        self.fling
    }

    /// Sets the fling treatment.
    pub fn with_fling(mut self, fling: FlingMode) -> Result<Self, ConfigError> {
        if let FlingMode::Decelerate { damping } = fling {
            if damping <= 0.0 || !damping.is_finite() {
                return Err(ConfigError::InvalidFlingDamping(damping));
            }
        }
        self.fling = fling;
        Ok(self)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: 30.0,
            double_tap_timeout_ms: 200,
            min_fling_velocity: 50.0,
            fling: FlingMode::default(),
        }
    }
}

/// Constants for continuous per‑frame smoothing.
///
/// Each frame a value first moves toward its goal by at most a fixed step
/// (snapping once within a step), then blends the remaining distance by a
/// ratio. Steps must be positive, blends must lie in `(0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingConfig {
    zoom_step: f64,
    zoom_blend: f64,
    offset_step: f64,
    offset_blend: f64,
}

impl SmoothingConfig {
    /// Creates validated smoothing constants.
    pub fn new(
        zoom_step: f64,
        zoom_blend: f64,
        offset_step: f64,
        offset_blend: f64,
    ) -> Result<Self, ConfigError> {
        check_step("zoom_step", zoom_step)?;
        check_blend("zoom_blend", zoom_blend)?;
        check_step("offset_step", offset_step)?;
        check_blend("offset_blend", offset_blend)?;
        Ok(Self {
            zoom_step,
            zoom_blend,
            offset_step,
            offset_blend,
        })
    }

    /// Fixed homing step for zoom.
    #[must_use]
    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    /// Proportional blend for zoom.
    #[must_use]
    pub fn zoom_blend(&self) -> f64 {
        self.zoom_blend
    }

    /// Fixed homing step for offsets, in content units.
    #[must_use]
    pub fn offset_step(&self) -> f64 {
        self.offset_step
    }

    /// Proportional blend for offsets.
    #[must_use]
    pub fn offset_blend(&self) -> f64 {
        self.offset_blend
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.01,
            zoom_blend: 0.2,
            offset_step: 0.1,
            offset_blend: 0.35,
        }
    }
}

fn check_step(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidSmoothing { name, value })
    }
}

fn check_blend(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSmoothing { name, value })
    }
}

/// Which animation model turns gestures into on‑screen motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Gestures apply immediately; double taps, programmatic zooms and flings
    /// run fixed‑duration eased tweens.
    #[default]
    Tween,
    /// Gestures move a goal state and the displayed state eases toward it
    /// every frame.
    Smooth,
}

/// Animation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Animation model.
    pub mode: MotionMode,
    /// Duration of animated zooms in milliseconds.
    pub zoom_duration_ms: u64,
    /// Duration of fling glides in milliseconds.
    pub fling_duration_ms: u64,
    /// Constants used in [`MotionMode::Smooth`].
    pub smoothing: SmoothingConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            mode: MotionMode::default(),
            zoom_duration_ms: 300,
            fling_duration_ms: 300,
            smoothing: SmoothingConfig::default(),
        }
    }
}

/// Complete configuration of a [`ZoomView`](crate::ZoomView).
#[derive(Clone, Debug, Default)]
pub struct ZoomConfig {
    limits: ZoomLimits,
    double_tap_zoom: Option<f64>,
    gestures: GestureConfig,
    motion: MotionConfig,
    minimap: MinimapConfig,
}

impl ZoomConfig {
    /// Default double‑tap zoom preset, capped by the maximum zoom.
    pub const DEFAULT_DOUBLE_TAP_ZOOM: f64 = 3.0;

    /// Zoom range.
    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Sets the zoom range.
    #[must_use]
    pub fn with_limits(mut self, limits: ZoomLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Zoom a double tap toggles to from the minimum, capped by the maximum zoom.
    #[must_use]
    pub fn double_tap_zoom(&self) -> f64 {
        self.double_tap_zoom
            .unwrap_or(Self::DEFAULT_DOUBLE_TAP_ZOOM)
            .clamp(self.limits.min(), self.limits.max())
    }

    /// Sets the double‑tap zoom preset.
    pub fn with_double_tap_zoom(mut self, zoom: f64) -> Result<Self, ConfigError> {
        if zoom < 1.0 || !zoom.is_finite() {
            return Err(ConfigError::DoubleTapZoomBelowOne(zoom));
        }
        self.double_tap_zoom = Some(zoom);
        Ok(self)
    }

    /// Gesture recognition settings.
    #[must_use]
    pub fn gestures(&self) -> GestureConfig {
        self.gestures
    }

    /// Sets the gesture recognition settings.
    #[must_use]
    pub fn with_gestures(mut self, gestures: GestureConfig) -> Self {
        self.gestures = gestures;
        self
    }

    /// Animation settings.
    #[must_use]
    pub fn motion(&self) -> MotionConfig {
        self.motion
    }

    /// Sets the animation settings.
    #[must_use]
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Minimap settings.
    #[must_use]
    pub fn minimap(&self) -> &MinimapConfig {
        &self.minimap
    }

    /// Sets the minimap settings.
    #[must_use]
    pub fn with_minimap(mut self, minimap: MinimapConfig) -> Self {
        self.minimap = minimap;
        self
    }

    pub(crate) fn limits_mut(&mut self) -> &mut ZoomLimits {
        &mut self.limits
    }

    pub(crate) fn minimap_mut(&mut self) -> &mut MinimapConfig {
        &mut self.minimap
    }
}

#[cfg(test)]
mod tests {
    use super::{FlingMode, GestureConfig, SmoothingConfig, ZoomConfig, ZoomLimits};
    use crate::error::ConfigError;

    #[test]
    fn limits_reject_invalid_ranges() {
        assert_eq!(
            ZoomLimits::new(0.5, 3.0),
            Err(ConfigError::MinZoomBelowOne(0.5))
        );
        assert_eq!(
            ZoomLimits::default().with_max(0.5),
            Err(ConfigError::MaxZoomBelowOne(0.5))
        );
        assert_eq!(
            ZoomLimits::new(4.0, 2.0),
            Err(ConfigError::InvertedZoomRange { min: 4.0, max: 2.0 })
        );
        assert!(matches!(
            ZoomLimits::new(1.0, f64::INFINITY),
            Err(ConfigError::NonFiniteZoom(_))
        ));
        assert!(ZoomLimits::new(f64::NAN, 2.0).is_err());
    }

    #[test]
    fn limits_clamp() {
        let limits = ZoomLimits::new(1.5, 4.0).unwrap();
        assert_eq!(limits.clamp(0.2), 1.5);
        assert_eq!(limits.clamp(9.0), 4.0);
        assert_eq!(limits.clamp(2.0), 2.0);
    }

    #[test]
    fn double_tap_zoom_is_capped_by_max() {
        let cfg = ZoomConfig::default().with_limits(ZoomLimits::new(1.0, 2.0).unwrap());
        assert_eq!(cfg.double_tap_zoom(), 2.0);
        let cfg = ZoomConfig::default();
        assert_eq!(cfg.double_tap_zoom(), 3.0);
        assert!(ZoomConfig::default().with_double_tap_zoom(0.9).is_err());
    }

    #[test]
    fn gesture_setters_validate() {
        let cfg = GestureConfig::default();
        assert!(cfg.with_touch_slop(-1.0).is_err());
        assert!(cfg.with_min_fling_velocity(f64::NAN).is_err());
        assert_eq!(
            cfg.with_fling(FlingMode::Decelerate { damping: 0.0 }),
            Err(ConfigError::InvalidFlingDamping(0.0))
        );
        let ignore = cfg.with_fling(FlingMode::Ignore).unwrap();
        assert_eq!(ignore.fling(), FlingMode::Ignore);
    }

    #[test]
    fn smoothing_rejects_out_of_range_constants() {
        assert!(SmoothingConfig::new(0.01, 0.2, 0.1, 0.35).is_ok());
        assert_eq!(
            SmoothingConfig::new(0.0, 0.2, 0.1, 0.35),
            Err(ConfigError::InvalidSmoothing {
                name: "zoom_step",
                value: 0.0
            })
        );
        assert!(SmoothingConfig::new(0.01, 1.5, 0.1, 0.35).is_err());
    }
}
