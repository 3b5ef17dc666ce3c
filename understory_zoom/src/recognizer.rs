// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture recognition from raw pointer input.
//!
//! [`GestureRecognizer`] turns a stream of [`PointerInput`] events into
//! decoded [`Gesture`]s: single‑pointer scrolls and flings, taps and double
//! taps, and two‑pointer pinches. It keeps no clock; every call takes the host
//! timestamp in milliseconds.
//!
//! ## States
//!
//! - `Idle`: no pointer down.
//! - `SingleTouch`: one pointer down. Movement past the touch slop scrolls;
//!   a release without scrolling is a tap.
//! - `MultiTouch`: two pointers down, pinching.
//! - `Lingering`: a pinch ended but some pointer is still down; input is
//!   ignored until every pointer is released.
//!
//! Taps arm a double‑tap window. A second tap inside the window yields
//! [`Gesture::DoubleTap`]; otherwise [`GestureRecognizer::poll`] yields
//! [`Gesture::SingleTap`] once the window closes.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_zoom::config::GestureConfig;
//! use understory_zoom::recognizer::{Gesture, GestureRecognizer, PointerInput};
//!
//! let mut rec = GestureRecognizer::new(GestureConfig::default());
//! let at = Point::new(40.0, 40.0);
//! rec.handle(PointerInput::Down { id: 1, position: at }, 0);
//! rec.handle(PointerInput::Up { id: 1, position: at }, 30);
//! assert!(rec.poll(100).is_none());
//! assert_eq!(rec.poll(230), Some(Gesture::SingleTap { position: at }));
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::config::GestureConfig;
use crate::timing::{DeadlineTimer, TimerHandle};

/// Samples older than this at release time do not contribute to fling velocity.
const VELOCITY_STALE_MS: u64 = 100;

/// Raw pointer event in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// A pointer went down.
    Down {
        /// Host pointer identifier.
        id: u64,
        /// Position in view coordinates.
        position: Point,
    },
    /// A pointer moved.
    Move {
        /// Host pointer identifier.
        id: u64,
        /// Position in view coordinates.
        position: Point,
    },
    /// A pointer was released.
    Up {
        /// Host pointer identifier.
        id: u64,
        /// Position in view coordinates.
        position: Point,
    },
    /// The host cancelled the whole pointer sequence.
    Cancel,
}

/// Decoded gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// A pinch started.
    ScaleBegin {
        /// Midpoint between the two pointers.
        focus: Point,
    },
    /// Pinch update.
    Scale {
        /// Ratio of the current span to the previous span.
        factor: f64,
        /// Midpoint between the two pointers.
        focus: Point,
        /// Pointer distance at the previous update.
        previous_span: f64,
        /// Pointer distance now.
        current_span: f64,
    },
    /// The pinch ended.
    ScaleEnd,
    /// Scroll by `delta` view pixels, measured as previous minus current position.
    Scroll {
        /// Distance scrolled since the previous event.
        delta: Vec2,
    },
    /// A scroll was released fast enough to fling.
    Fling {
        /// Finger velocity in view pixels per second.
        velocity: Vec2,
    },
    /// Second tap inside the double‑tap window.
    DoubleTap {
        /// Position of the first tap.
        position: Point,
    },
    /// A tap that was not followed by a second tap in time.
    SingleTap {
        /// Position of the tap.
        position: Point,
    },
}

/// Gestures produced by a single input.
pub type GestureBatch = SmallVec<[Gesture; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    SingleTouch,
    MultiTouch,
    Lingering,
}

#[derive(Clone, Copy, Debug)]
struct Tracked {
    id: u64,
    position: Point,
}

/// Pointer session state machine.
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    phase: Phase,
    pointers: SmallVec<[Tracked; 2]>,
    start: Point,
    last: Point,
    sample_pos: Point,
    sample_ms: u64,
    velocity: Vec2,
    scrolling: bool,
    click_enabled: bool,
    last_span: f64,
    last_focus: Point,
    tap_timer: DeadlineTimer,
    pending_tap: Option<(TimerHandle, Point)>,
}

impl GestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            pointers: SmallVec::new(),
            start: Point::ZERO,
            last: Point::ZERO,
            sample_pos: Point::ZERO,
            sample_ms: 0,
            velocity: Vec2::ZERO,
            scrolling: false,
            click_enabled: false,
            last_span: 0.0,
            last_focus: Point::ZERO,
            tap_timer: DeadlineTimer::default(),
            pending_tap: None,
        }
    }

    /// Replaces the thresholds. Takes effect for the next pointer session.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Returns `true` when no pointer is down and no tap is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle && !self.tap_timer.is_pending()
    }

    /// Returns `true` while any pointer session is in progress.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Returns `true` while two pointers are pinching.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.phase == Phase::MultiTouch
    }

    /// Deadline at which [`poll`](Self::poll) will yield a pending single tap.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.tap_timer.deadline()
    }

    /// Drops the session and any pending tap without emitting gestures.
    pub fn reset(&mut self) {
        self.tap_timer.cancel();
        self.pending_tap = None;
        self.pointers.clear();
        self.phase = Phase::Idle;
        self.scrolling = false;
        self.click_enabled = false;
        self.velocity = Vec2::ZERO;
    }

    /// Emits a pending single tap once its double‑tap window has closed.
    pub fn poll(&mut self, now_ms: u64) -> Option<Gesture> {
        let fired = self.tap_timer.poll(now_ms)?;
        let (handle, position) = self.pending_tap.take()?;
        (handle == fired).then_some(Gesture::SingleTap { position })
    }

    /// Feeds one pointer event and returns the gestures it completes.
    pub fn handle(&mut self, input: PointerInput, now_ms: u64) -> GestureBatch {
        let mut out = GestureBatch::new();
        // A window that closed without being polled still yields its tap first.
        if let Some(expired) = self.poll(now_ms) {
            out.push(expired);
        }
        match input {
            PointerInput::Down { id, position } => self.on_down(id, position, now_ms, &mut out),
            PointerInput::Move { id, position } => self.on_move(id, position, now_ms, &mut out),
            PointerInput::Up { id, position } => self.on_up(id, position, now_ms, &mut out),
            PointerInput::Cancel => {
                if self.phase == Phase::MultiTouch {
                    out.push(Gesture::ScaleEnd);
                }
                self.reset();
            }
        }
        out
    }

    fn on_down(&mut self, id: u64, position: Point, now_ms: u64, out: &mut GestureBatch) {
        if let Some(p) = self.pointers.iter_mut().find(|p| p.id == id) {
            p.position = position;
            return;
        }
        self.pointers.push(Tracked { id, position });
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::SingleTouch;
                self.start = position;
                self.last = position;
                self.sample_pos = position;
                self.sample_ms = now_ms;
                self.velocity = Vec2::ZERO;
                self.scrolling = false;
                self.click_enabled = true;
            }
            Phase::SingleTouch => {
                self.drop_pending_tap();
                self.scrolling = false;
                self.click_enabled = false;
                self.phase = Phase::MultiTouch;
                let (span, focus) = self.pinch_metrics();
                self.last_span = span;
                self.last_focus = focus;
                tracing::debug!(pinch_span = span, "pinch started");
                out.push(Gesture::ScaleBegin { focus });
            }
            Phase::MultiTouch | Phase::Lingering => {}
        }
    }

    fn on_move(&mut self, id: u64, position: Point, now_ms: u64, out: &mut GestureBatch) {
        let Some(p) = self.pointers.iter_mut().find(|p| p.id == id) else {
            return;
        };
        p.position = position;
        match self.phase {
            Phase::SingleTouch => {
                self.sample(position, now_ms);
                if !self.scrolling {
                    let slop = self.config.touch_slop();
                    if (position - self.start).hypot2() <= slop * slop {
                        return;
                    }
                    self.scrolling = true;
                    self.click_enabled = false;
                    // A tap still waiting on its window is not a click once the next touch drags.
                    self.drop_pending_tap();
                }
                let delta = self.last - position;
                self.last = position;
                if delta != Vec2::ZERO {
                    out.push(Gesture::Scroll { delta });
                }
            }
            Phase::MultiTouch => {
                let (span, focus) = self.pinch_metrics();
                if self.last_span > 0.0 && span > 0.0 {
                    out.push(Gesture::Scale {
                        factor: span / self.last_span,
                        focus,
                        previous_span: self.last_span,
                        current_span: span,
                    });
                }
                let travel = self.last_focus - focus;
                if travel != Vec2::ZERO {
                    out.push(Gesture::Scroll { delta: travel });
                }
                self.last_span = span;
                self.last_focus = focus;
            }
            Phase::Idle | Phase::Lingering => {}
        }
    }

    fn on_up(&mut self, id: u64, position: Point, now_ms: u64, out: &mut GestureBatch) {
        let Some(index) = self.pointers.iter().position(|p| p.id == id) else {
            return;
        };
        self.pointers.remove(index);
        match self.phase {
            Phase::SingleTouch => {
                self.phase = Phase::Idle;
                if self.scrolling {
                    self.sample(position, now_ms);
                    let min = self.config.min_fling_velocity();
                    if self.velocity.hypot2() >= min * min && self.velocity != Vec2::ZERO {
                        out.push(Gesture::Fling {
                            velocity: self.velocity,
                        });
                    }
                } else if self.click_enabled {
                    self.on_tap(position, now_ms, out);
                }
                self.scrolling = false;
                self.click_enabled = false;
            }
            Phase::MultiTouch => {
                tracing::debug!("pinch ended");
                out.push(Gesture::ScaleEnd);
                self.phase = if self.pointers.is_empty() {
                    Phase::Idle
                } else {
                    Phase::Lingering
                };
            }
            Phase::Lingering => {
                if self.pointers.is_empty() {
                    self.phase = Phase::Idle;
                }
            }
            Phase::Idle => {}
        }
    }

    fn on_tap(&mut self, position: Point, now_ms: u64, out: &mut GestureBatch) {
        if let Some((handle, first)) = self.pending_tap.take() {
            self.tap_timer.cancel_handle(handle);
            out.push(Gesture::DoubleTap { position: first });
        } else {
            let handle = self
                .tap_timer
                .schedule(now_ms, self.config.double_tap_timeout_ms());
            self.pending_tap = Some((handle, position));
        }
    }

    fn drop_pending_tap(&mut self) {
        if let Some((handle, _)) = self.pending_tap.take() {
            self.tap_timer.cancel_handle(handle);
        }
    }

    fn sample(&mut self, position: Point, now_ms: u64) {
        let dt = now_ms.saturating_sub(self.sample_ms);
        if dt > VELOCITY_STALE_MS {
            self.velocity = Vec2::ZERO;
        } else if dt > 0 {
            self.velocity = (position - self.sample_pos) * (1000.0 / dt as f64);
        }
        if dt > 0 {
            self.sample_pos = position;
            self.sample_ms = now_ms;
        }
    }

    fn pinch_metrics(&self) -> (f64, Point) {
        match self.pointers.as_slice() {
            [a, b, ..] => (
                (a.position - b.position).length(),
                a.position.midpoint(b.position),
            ),
            [a] => (0.0, a.position),
            [] => (0.0, self.last_focus),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::{Gesture, GestureRecognizer, PointerInput};
    use crate::config::GestureConfig;

    fn down(id: u64, x: f64, y: f64) -> PointerInput {
        PointerInput::Down {
            id,
            position: Point::new(x, y),
        }
    }

    fn mv(id: u64, x: f64, y: f64) -> PointerInput {
        PointerInput::Move {
            id,
            position: Point::new(x, y),
        }
    }

    fn up(id: u64, x: f64, y: f64) -> PointerInput {
        PointerInput::Up {
            id,
            position: Point::new(x, y),
        }
    }

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(GestureConfig::default())
    }

    #[test]
    fn small_moves_stay_within_slop() {
        let mut rec = recognizer();
        rec.handle(down(1, 100.0, 100.0), 0);
        assert!(rec.handle(mv(1, 110.0, 110.0), 10).is_empty());
        let out = rec.handle(mv(1, 140.0, 100.0), 20);
        assert_eq!(
            out.as_slice(),
            &[Gesture::Scroll {
                delta: Vec2::new(-40.0, 0.0)
            }]
        );
        let out = rec.handle(mv(1, 150.0, 105.0), 30);
        assert_eq!(
            out.as_slice(),
            &[Gesture::Scroll {
                delta: Vec2::new(-10.0, -5.0)
            }]
        );
    }

    #[test]
    fn fast_release_flings() {
        let mut rec = recognizer();
        rec.handle(down(1, 0.0, 0.0), 0);
        rec.handle(mv(1, 50.0, 0.0), 10);
        rec.handle(mv(1, 100.0, 0.0), 20);
        let out = rec.handle(up(1, 150.0, 0.0), 30);
        assert_eq!(
            out.as_slice(),
            &[Gesture::Fling {
                velocity: Vec2::new(5000.0, 0.0)
            }]
        );
        assert!(rec.is_idle());
    }

    #[test]
    fn paused_release_does_not_fling() {
        let mut rec = recognizer();
        rec.handle(down(1, 0.0, 0.0), 0);
        rec.handle(mv(1, 100.0, 0.0), 10);
        let out = rec.handle(up(1, 100.0, 0.0), 500);
        assert!(out.is_empty());
    }

    #[test]
    fn second_tap_in_window_is_a_double_tap() {
        let mut rec = recognizer();
        rec.handle(down(1, 10.0, 10.0), 0);
        assert!(rec.handle(up(1, 10.0, 10.0), 20).is_empty());
        rec.handle(down(1, 12.0, 12.0), 100);
        let out = rec.handle(up(1, 12.0, 12.0), 120);
        assert_eq!(
            out.as_slice(),
            &[Gesture::DoubleTap {
                position: Point::new(10.0, 10.0)
            }]
        );
        assert_eq!(rec.poll(10_000), None);
    }

    #[test]
    fn expired_tap_is_delivered_before_the_next_input() {
        let mut rec = recognizer();
        rec.handle(down(1, 5.0, 5.0), 0);
        rec.handle(up(1, 5.0, 5.0), 10);
        let out = rec.handle(down(1, 9.0, 9.0), 400);
        assert_eq!(
            out.as_slice(),
            &[Gesture::SingleTap {
                position: Point::new(5.0, 5.0)
            }]
        );
    }

    #[test]
    fn second_pointer_cancels_tap_and_pinches() {
        let mut rec = recognizer();
        rec.handle(down(1, 100.0, 100.0), 0);
        let out = rec.handle(down(2, 200.0, 100.0), 5);
        assert_eq!(
            out.as_slice(),
            &[Gesture::ScaleBegin {
                focus: Point::new(150.0, 100.0)
            }]
        );
        assert!(rec.is_pinching());

        let out = rec.handle(mv(2, 300.0, 100.0), 15);
        assert_eq!(
            out.as_slice(),
            &[
                Gesture::Scale {
                    factor: 2.0,
                    focus: Point::new(200.0, 100.0),
                    previous_span: 100.0,
                    current_span: 200.0,
                },
                Gesture::Scroll {
                    delta: Vec2::new(-50.0, 0.0)
                },
            ]
        );

        assert_eq!(
            rec.handle(up(2, 300.0, 100.0), 20).as_slice(),
            &[Gesture::ScaleEnd]
        );
        // The remaining pointer is ignored until it lifts.
        assert!(rec.handle(mv(1, 10.0, 10.0), 25).is_empty());
        assert!(rec.handle(up(1, 10.0, 10.0), 30).is_empty());
        assert!(rec.is_idle());
        assert_eq!(rec.poll(10_000), None);
    }

    #[test]
    fn dragging_after_a_tap_drops_the_pending_tap() {
        let mut rec = recognizer();
        rec.handle(down(1, 100.0, 100.0), 0);
        rec.handle(up(1, 100.0, 100.0), 20);
        rec.handle(down(1, 100.0, 100.0), 100);
        let out = rec.handle(mv(1, 200.0, 100.0), 150);
        assert_eq!(
            out.as_slice(),
            &[Gesture::Scroll {
                delta: Vec2::new(-100.0, 0.0)
            }]
        );
        assert_eq!(rec.next_deadline(), None);
        assert_eq!(rec.poll(220), None);
        assert!(rec.handle(up(1, 200.0, 100.0), 500).is_empty());
        assert!(rec.is_idle());
    }

    #[test]
    fn cancel_ends_pinch() {
        let mut rec = recognizer();
        rec.handle(down(1, 0.0, 0.0), 0);
        rec.handle(down(2, 10.0, 0.0), 0);
        assert_eq!(
            rec.handle(PointerInput::Cancel, 5).as_slice(),
            &[Gesture::ScaleEnd]
        );
        assert!(rec.is_idle());
    }
}
