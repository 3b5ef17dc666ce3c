// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Zoom level and content offset applied to the child surface.
///
/// Offsets are expressed in content‑space units and applied **before**
/// scaling, so a content point `p` lands in the view at
/// `(p + offset) * zoom`.
///
/// The state is a plain `Copy` value: reading it once yields a consistent
/// snapshot of all three fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Uniform zoom factor.
    pub zoom: f64,
    /// Translation in content units, applied before scaling.
    pub offset: Vec2,
}

impl TransformState {
    /// Unzoomed state with no offset.
    pub const IDENTITY: Self = Self {
        zoom: 1.0,
        offset: Vec2::ZERO,
    };

    /// Creates a state from a zoom factor and an offset.
    #[must_use]
    pub const fn new(zoom: f64, offset: Vec2) -> Self {
        Self { zoom, offset }
    }

    /// Returns a copy with a different offset.
    #[must_use]
    pub const fn with_offset(self, offset: Vec2) -> Self {
        Self {
            zoom: self.zoom,
            offset,
        }
    }

    /// Content → view transform: translate by the offset, then scale.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(self.offset)
    }

    /// Maps a content‑space point into view coordinates.
    #[must_use]
    pub fn content_to_view(self, pt: Point) -> Point {
        ((pt.to_vec2() + self.offset) * self.zoom).to_point()
    }

    /// Maps a view‑space point into content coordinates.
    #[must_use]
    pub fn view_to_content(self, pt: Point) -> Point {
        (pt.to_vec2() / self.zoom - self.offset).to_point()
    }

    /// Content‑space rectangle currently visible through a viewport of the given size.
    #[must_use]
    pub fn visible_content_rect(self, viewport: Size) -> Rect {
        let origin = (-self.offset).to_point();
        Rect::from_origin_size(origin, viewport / self.zoom)
    }

    /// Rezooms to `new_zoom` keeping the content under `focus` fixed in view space.
    ///
    /// `new_zoom` is used as given; callers clamp it into their zoom limits
    /// first. Non‑positive zoom values on either side leave the state
    /// unchanged.
    #[must_use]
    pub fn rezoomed(self, new_zoom: f64, focus: Point) -> Self {
        if self.zoom <= 0.0 || new_zoom <= 0.0 {
            return self;
        }
        let anchor = self.view_to_content(focus);
        Self {
            zoom: new_zoom,
            offset: focus.to_vec2() / new_zoom - anchor.to_vec2(),
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Crossing of the minimum zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomEdge {
    /// Zoom left the minimum level upwards.
    Started,
    /// Zoom came back down to the minimum level.
    Ended,
}

impl ZoomEdge {
    /// Returns the edge crossed when zoom changes from `previous` to `next`.
    ///
    /// Both values are expected to be clamped into the zoom limits already, so
    /// reaching the minimum is an exact comparison. Changes that stay at the
    /// minimum, or stay above it, cross nothing.
    #[must_use]
    pub fn between(previous: f64, next: f64, min_zoom: f64) -> Option<Self> {
        if previous == min_zoom && next > previous {
            Some(Self::Started)
        } else if next == min_zoom && previous > next {
            Some(Self::Ended)
        } else {
            None
        }
    }
}
