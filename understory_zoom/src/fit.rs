// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fit/clamp policy keeping the content covering or centered in the viewport.
//!
//! Along each axis, content that is smaller than the viewport at the current
//! zoom is centered; larger content may scroll, but never so far that a gap
//! opens between a content edge and the matching viewport edge.
//!
//! Axes with a non‑positive viewport or content extent (or a non‑positive
//! zoom) are left untouched.

use core::ops::RangeInclusive;

use kurbo::{Size, Vec2};

use crate::transform::TransformState;

/// Applies the fit policy to a single axis and returns the adjusted offset.
#[must_use]
pub fn fit_axis(offset: f64, viewport: f64, content: f64, zoom: f64) -> f64 {
    if viewport <= 0.0 || content <= 0.0 || zoom <= 0.0 {
        return offset;
    }
    let span = viewport / zoom;
    if viewport > content * zoom {
        (span - content) / 2.0
    } else {
        // Rounding can push `span - content` a hair above zero right at the
        // boundary; keep the range well formed.
        offset.clamp((span - content).min(0.0), 0.0)
    }
}

/// Applies the fit policy to both axes of `state`.
#[must_use]
pub fn fit(state: TransformState, viewport: Size, content: Size) -> TransformState {
    let offset = Vec2::new(
        fit_axis(state.offset.x, viewport.width, content.width, state.zoom),
        fit_axis(state.offset.y, viewport.height, content.height, state.zoom),
    );
    state.with_offset(offset)
}

/// Returns the range of offsets the fit policy accepts along one axis.
///
/// A centered axis yields a single‑value range. Degenerate inputs yield
/// `None`.
#[must_use]
pub fn axis_bounds(viewport: f64, content: f64, zoom: f64) -> Option<RangeInclusive<f64>> {
    if viewport <= 0.0 || content <= 0.0 || zoom <= 0.0 {
        return None;
    }
    let span = viewport / zoom;
    if viewport > content * zoom {
        let centered = (span - content) / 2.0;
        Some(centered..=centered)
    } else {
        Some((span - content).min(0.0)..=0.0)
    }
}

/// Offset ranges accepted by the fit policy on both axes.
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetBounds {
    /// Valid horizontal offsets.
    pub x: RangeInclusive<f64>,
    /// Valid vertical offsets.
    pub y: RangeInclusive<f64>,
}

impl OffsetBounds {
    /// Returns `true` if `offset` lies inside both ranges.
    #[must_use]
    pub fn contains(&self, offset: Vec2) -> bool {
        self.x.contains(&offset.x) && self.y.contains(&offset.y)
    }
}

/// Returns the offsets the fit policy accepts at `zoom`, or `None` for degenerate sizes.
#[must_use]
pub fn offset_bounds(viewport: Size, content: Size, zoom: f64) -> Option<OffsetBounds> {
    Some(OffsetBounds {
        x: axis_bounds(viewport.width, content.width, zoom)?,
        y: axis_bounds(viewport.height, content.height, zoom)?,
    })
}
