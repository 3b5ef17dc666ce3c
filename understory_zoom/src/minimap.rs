// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimap projection: a scaled overview of the content with a thumb marking
//! the visible region.
//!
//! [`project`] computes a [`MinimapGeometry`] from the current transform. The
//! geometry is plain data; hosts draw it with whatever renderer they use, and
//! feed pointer positions back through [`MinimapGeometry::offset_at`] to jump
//! the viewport.

use alloc::format;
use alloc::string::String;

use kurbo::{Point, Rect, RoundedRect, Size, Vec2};
use peniko::Color;

use crate::error::ConfigError;
use crate::transform::TransformState;

bitflags::bitflags! {
    /// Viewport corner the minimap is anchored to. Empty means top‑left.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MinimapAlignment: u8 {
        /// Anchor to the right edge.
        const RIGHT  = 0x01;
        /// Anchor to the bottom edge.
        const BOTTOM = 0x02;
    }
}

/// Colors and dimensions used to draw the minimap.
#[derive(Clone, Copy, Debug)]
pub struct MinimapStyle {
    /// Fill of the visible‑region thumb.
    pub thumb: Color,
    /// Fill of the map background.
    pub background: Color,
    /// Outline of the map background.
    pub stroke: Color,
    /// Zoom caption color.
    pub caption: Color,
    /// Corner radius of background and thumb.
    pub corner_radius: f64,
    /// Outline width.
    pub stroke_width: f64,
    /// Caption font size.
    pub caption_size: f64,
}

impl Default for MinimapStyle {
    fn default() -> Self {
        Self {
            thumb: Color::from_rgba8(0xff, 0xff, 0xff, 0x40),
            background: Color::from_rgba8(0x00, 0x00, 0x00, 0x70),
            stroke: Color::from_rgba8(0x80, 0x80, 0x80, 0x70),
            caption: Color::WHITE,
            corner_radius: 16.0,
            stroke_width: 2.0,
            caption_size: 10.0,
        }
    }
}

/// Minimap settings.
#[derive(Clone, Debug)]
pub struct MinimapConfig {
    /// Whether the minimap is shown and interactive.
    pub enabled: bool,
    size: Option<f64>,
    /// Inset from the anchored viewport corner.
    pub margin: Vec2,
    /// Anchored viewport corner.
    pub alignment: MinimapAlignment,
    /// Drawing style.
    pub style: MinimapStyle,
}

impl MinimapConfig {
    /// Length of the larger map side. `None` means a quarter of the smaller viewport side.
    #[must_use]
    pub fn size(&self) -> Option<f64> {
        self.size
    }

    /// Sets the length of the larger map side.
    pub fn with_size(mut self, size: Option<f64>) -> Result<Self, ConfigError> {
        if let Some(side) = size {
            if side < 0.0 || !side.is_finite() {
                return Err(ConfigError::NegativeMinimapSize(side));
            }
        }
        self.size = size;
        Ok(self)
    }

    /// Resolves the configured side length for a viewport.
    #[must_use]
    pub fn side_for(&self, viewport: Size) -> f64 {
        self.size
            .unwrap_or_else(|| viewport.width.min(viewport.height) / 4.0)
    }
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: None,
            margin: Vec2::new(10.0, 10.0),
            alignment: MinimapAlignment::empty(),
            style: MinimapStyle::default(),
        }
    }
}

/// Map size preserving the content aspect ratio, with the larger side equal to `side`.
#[must_use]
pub fn map_size(content: Size, side: f64) -> Option<Size> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(content.width) || !usable(content.height) || !usable(side) {
        return None;
    }
    Some(if content.width >= content.height {
        Size::new(side, side * content.height / content.width)
    } else {
        Size::new(side * content.width / content.height, side)
    })
}

/// Projected minimap for one transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapGeometry {
    /// Top‑left corner in view coordinates.
    pub origin: Point,
    /// Map background in minimap‑local coordinates.
    pub background: Rect,
    /// Visible region in minimap‑local coordinates.
    pub thumb: Rect,
    /// Content size the map represents.
    pub content: Size,
    /// Visible content extent, `viewport / zoom`.
    pub span: Size,
    /// Zoom the geometry was projected at.
    pub zoom: f64,
}

impl MinimapGeometry {
    /// Map bounds in view coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.background + self.origin.to_vec2()
    }

    /// Returns `true` if the view point lies on the map.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        self.bounds().contains(pt)
    }

    /// Offset that centers the content point under the view point `pt`.
    ///
    /// The result is not fitted; callers run it through the fit policy.
    #[must_use]
    pub fn offset_at(&self, pt: Point) -> Vec2 {
        let local = pt - self.origin;
        let map = self.background.size();
        Vec2::new(
            -(local.x / map.width * self.content.width) + self.span.width / 2.0,
            -(local.y / map.height * self.content.height) + self.span.height / 2.0,
        )
    }

    /// Zoom caption, e.g. `x2.5`.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("x{:.1}", self.zoom)
    }

    /// Caption baseline origin in minimap‑local coordinates.
    #[must_use]
    pub fn caption_origin(&self, style: &MinimapStyle) -> Point {
        Point::new(10.0, 10.0 + style.caption_size)
    }

    /// Rounded map background in minimap‑local coordinates.
    #[must_use]
    pub fn background_shape(&self, style: &MinimapStyle) -> RoundedRect {
        RoundedRect::from_rect(self.background, style.corner_radius)
    }

    /// Rounded thumb in minimap‑local coordinates.
    #[must_use]
    pub fn thumb_shape(&self, style: &MinimapStyle) -> RoundedRect {
        RoundedRect::from_rect(self.thumb, style.corner_radius)
    }
}

/// Projects the minimap for `state`.
///
/// Returns `None` when the minimap is disabled, the view is not zoomed past
/// `min_zoom`, or any size is degenerate.
#[must_use]
pub fn project(
    state: TransformState,
    viewport: Size,
    content: Size,
    config: &MinimapConfig,
    min_zoom: f64,
) -> Option<MinimapGeometry> {
    if !config.enabled || state.zoom <= min_zoom || state.zoom <= 0.0 {
        return None;
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }
    let map = map_size(content, config.side_for(viewport))?;
    let span = viewport / state.zoom;
    let visible = state.visible_content_rect(viewport);
    let thumb = Rect::new(
        (visible.x0 / content.width * map.width).clamp(0.0, map.width),
        (visible.y0 / content.height * map.height).clamp(0.0, map.height),
        (visible.x1 / content.width * map.width).clamp(0.0, map.width),
        (visible.y1 / content.height * map.height).clamp(0.0, map.height),
    );
    let x = if config.alignment.contains(MinimapAlignment::RIGHT) {
        viewport.width - config.margin.x - map.width
    } else {
        config.margin.x
    };
    let y = if config.alignment.contains(MinimapAlignment::BOTTOM) {
        viewport.height - config.margin.y - map.height
    } else {
        config.margin.y
    };
    Some(MinimapGeometry {
        origin: Point::new(x, y),
        background: Rect::from_origin_size(Point::ZERO, map),
        thumb,
        content,
        span,
        zoom: state.zoom,
    })
}
