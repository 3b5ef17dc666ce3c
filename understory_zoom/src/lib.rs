// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoom --heading-base-level=0

//! Understory Zoom: pan/zoom interaction for a single child surface.
//!
//! This crate turns pinch, scroll, fling, tap and double‑tap input into a
//! uniform zoom factor and a content offset, keeps that transform inside
//! configured limits and a fit policy, and exposes it as a [`kurbo::Affine`]
//! for drawing. It focuses on:
//! - Transform state (zoom + pre‑scale offset) and focus‑preserving rezoom.
//! - A fit/clamp policy that centers small content and never opens a gap
//!   beside large content.
//! - Gesture recognition from raw pointer events.
//! - Host‑clocked animation: eased tweens or per‑frame smoothing.
//! - An optional minimap with a thumb marking the visible region.
//!
//! It does **not** own a window, event loop or renderer. Callers are
//! expected to:
//! - Feed pointer events (or already decoded gestures) with a monotonic
//!   timestamp in milliseconds.
//! - Call [`ZoomView::advance`] once per frame while it reports pending work.
//! - Draw their content through a [`Surface`] implementation, or apply
//!   [`ZoomView::transform`] themselves.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_zoom::{ZoomEvent, ZoomView};
//!
//! let mut view = ZoomView::default();
//! view.set_viewport(Size::new(800.0, 600.0));
//! view.set_content_size(Some(Size::new(800.0, 600.0)));
//!
//! let mut events: Vec<ZoomEvent> = Vec::new();
//! view.zoom_to(2.0, Point::new(400.0, 300.0), &mut events);
//! assert_eq!(view.zoom(), 2.0);
//! assert_eq!(events, [ZoomEvent::Started]);
//!
//! // The content point under the focus stays put.
//! let under = view.state().view_to_content(Point::new(400.0, 300.0));
//! assert_eq!(under, Point::new(400.0, 300.0));
//! ```
//!
//! ## Animated double tap
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_zoom::{Gesture, ZoomView};
//!
//! let mut view = ZoomView::default();
//! view.set_viewport(Size::new(400.0, 400.0));
//! view.set_content_size(Some(Size::new(400.0, 400.0)));
//!
//! let tap = Gesture::DoubleTap { position: Point::new(100.0, 100.0) };
//! view.handle_gesture(tap, 0, &mut ());
//!
//! let mut now = 0;
//! while view.advance(now, &mut ()) {
//!     now += 16;
//! }
//! assert_eq!(view.zoom(), 3.0);
//! ```
//!
//! ## Design notes
//!
//! - Offsets are content‑space units applied before scaling:
//!   `view = (content + offset) * zoom`.
//! - [`ZoomView`] is the single writer of its state; readers get `Copy`
//!   snapshots.
//! - Invalid configuration is rejected with a [`ConfigError`] rather than
//!   coerced, and a rejected update leaves the previous value in place.
//! - Nothing reads a clock or spawns work; timing is entirely host‑driven.

#![no_std]

extern crate alloc;

pub mod animation;
pub mod config;
mod error;
pub mod fit;
mod listener;
pub mod minimap;
pub mod recognizer;
mod surface;
pub mod timing;
mod transform;
mod view;

pub use config::{
    FlingMode, GestureConfig, MotionConfig, MotionMode, SmoothingConfig, ZoomConfig, ZoomLimits,
};
pub use error::ConfigError;
pub use listener::{ZoomEvent, ZoomListener};
pub use minimap::{MinimapAlignment, MinimapConfig, MinimapGeometry, MinimapStyle};
pub use recognizer::{Gesture, PointerInput};
pub use surface::Surface;
pub use transform::{TransformState, ZoomEdge};
pub use view::{ZoomView, ZoomViewDebugInfo};
