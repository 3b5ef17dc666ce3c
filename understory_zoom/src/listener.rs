// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer hooks for zoom state changes and taps.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Receives zoom notifications from a [`ZoomView`](crate::ZoomView).
///
/// Every method has a no‑op default. `on_zoom_started` and `on_zoom_ended`
/// fire once per crossing of the minimum zoom, so they always pair up.
pub trait ZoomListener {
    /// Zoom left the minimum level.
    fn on_zoom_started(&mut self) {}

    /// A pinch changed the transform.
    fn on_zooming(&mut self, _zoom: f64, _offset: Vec2) {}

    /// Zoom returned to the minimum level.
    fn on_zoom_ended(&mut self) {}

    /// A double tap at `position`. Return `true` to suppress the built‑in zoom toggle.
    fn on_double_tap(&mut self, _position: Point) -> bool {
        false
    }

    /// A single tap outside the minimap.
    fn on_click(&mut self, _position: Point) {}
}

impl ZoomListener for () {}

/// Recorded listener notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomEvent {
    /// See [`ZoomListener::on_zoom_started`].
    Started,
    /// See [`ZoomListener::on_zooming`].
    Zooming {
        /// Zoom after the change.
        zoom: f64,
        /// Offset after the change.
        offset: Vec2,
    },
    /// See [`ZoomListener::on_zoom_ended`].
    Ended,
    /// See [`ZoomListener::on_double_tap`].
    DoubleTap(Point),
    /// See [`ZoomListener::on_click`].
    Click(Point),
}

/// Records every notification; double taps are never consumed.
impl ZoomListener for Vec<ZoomEvent> {
    fn on_zoom_started(&mut self) {
        self.push(ZoomEvent::Started);
    }

    fn on_zooming(&mut self, zoom: f64, offset: Vec2) {
        self.push(ZoomEvent::Zooming { zoom, offset });
    }

    fn on_zoom_ended(&mut self) {
        self.push(ZoomEvent::Ended);
    }

    fn on_double_tap(&mut self, position: Point) -> bool {
        self.push(ZoomEvent::DoubleTap(position));
        false
    }

    fn on_click(&mut self, position: Point) {
        self.push(ZoomEvent::Click(position));
    }
}
