// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host‑clocked motion: fixed‑duration tweens and per‑frame smoothing.
//!
//! Nothing here reads a clock. The host passes a monotonic timestamp in
//! milliseconds to [`Animator::step`] once per frame and applies the returned
//! state (after settling it into the zoom limits and the fit policy).

use kurbo::{Point, Vec2};

use crate::config::SmoothingConfig;
use crate::transform::TransformState;

/// Easing curve applied to normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end (smoothstep).
    #[default]
    AccelerateDecelerate,
    /// Fast start, slow end.
    Decelerate,
}

impl Easing {
    /// Maps progress `t` (clamped to `[0, 1]`) through the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => t * t * (3.0 - 2.0 * t),
            Self::Decelerate => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
        }
    }
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Moves `current` toward `goal` by at most `step`, snapping once within a step.
#[must_use]
pub fn bias(current: f64, goal: f64, step: f64) -> f64 {
    if (goal - current).abs() <= step {
        goal
    } else if goal > current {
        current + step
    } else {
        current - step
    }
}

/// One smoothing frame from `current` toward `goal`.
#[must_use]
pub fn smooth_toward(
    current: TransformState,
    goal: TransformState,
    smoothing: &SmoothingConfig,
) -> TransformState {
    let zoom = lerp(
        bias(current.zoom, goal.zoom, smoothing.zoom_step()),
        goal.zoom,
        smoothing.zoom_blend(),
    );
    let step = smoothing.offset_step();
    let biased = Vec2::new(
        bias(current.offset.x, goal.offset.x, step),
        bias(current.offset.y, goal.offset.y, step),
    );
    TransformState::new(zoom, biased.lerp(goal.offset, smoothing.offset_blend()))
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TweenKind {
    Zoom { from: f64, to: f64, focus: Point },
    Pan { from: Vec2, to: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tween {
    kind: TweenKind,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl Tween {
    fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }

    fn sample(&self, current: TransformState, t: f64) -> TransformState {
        let eased = self.easing.apply(t);
        match self.kind {
            TweenKind::Zoom { from, to, focus } => {
                let zoom = if t >= 1.0 { to } else { lerp(from, to, eased) };
                current.rezoomed(zoom, focus)
            }
            TweenKind::Pan { from, to } => {
                let offset = if t >= 1.0 { to } else { from.lerp(to, eased) };
                current.with_offset(offset)
            }
        }
    }
}

/// Drives the active animation, if any.
///
/// At most one animation runs at a time: starting a tween replaces any running
/// tween or smoothing goal, and vice versa.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    tween: Option<Tween>,
    goal: Option<TransformState>,
}

impl Animator {
    /// Starts a zoom tween from `from` to `to` about the view point `focus`.
    pub fn tween_zoom(
        &mut self,
        from: f64,
        to: f64,
        focus: Point,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) {
        self.goal = None;
        self.tween = Some(Tween {
            kind: TweenKind::Zoom { from, to, focus },
            start_ms,
            duration_ms,
            easing,
        });
    }

    /// Starts an offset tween from `from` to `to`.
    pub fn tween_pan(
        &mut self,
        from: Vec2,
        to: Vec2,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) {
        self.goal = None;
        self.tween = Some(Tween {
            kind: TweenKind::Pan { from, to },
            start_ms,
            duration_ms,
            easing,
        });
    }

    /// Replaces the smoothing goal, cancelling any running tween.
    pub fn set_goal(&mut self, goal: TransformState) {
        self.tween = None;
        self.goal = Some(goal);
    }

    /// Current smoothing goal, if smoothing is active.
    #[must_use]
    pub fn goal(&self) -> Option<TransformState> {
        self.goal
    }

    /// Stops any running animation.
    pub fn cancel(&mut self) {
        self.tween = None;
        self.goal = None;
    }

    /// Returns `true` while a tween or smoothing goal is pending.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tween.is_some() || self.goal.is_some()
    }

    /// Computes the next frame from `current` at time `now_ms`.
    ///
    /// Returns `None` when nothing is animating. The animation finishes on the
    /// frame that reaches its target exactly.
    pub fn step(
        &mut self,
        current: TransformState,
        now_ms: u64,
        smoothing: &SmoothingConfig,
    ) -> Option<TransformState> {
        if let Some(tween) = self.tween {
            let t = tween.progress(now_ms);
            if t >= 1.0 {
                self.tween = None;
            }
            return Some(tween.sample(current, t));
        }
        let goal = self.goal?;
        let next = smooth_toward(current, goal, smoothing);
        if next == goal {
            self.goal = None;
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::{Animator, Easing, bias, smooth_toward};
    use crate::config::SmoothingConfig;
    use crate::transform::TransformState;

    #[test]
    fn easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::AccelerateDecelerate,
            Easing::Decelerate,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_eq!(Easing::AccelerateDecelerate.apply(0.5), 0.5);
        assert!(Easing::Decelerate.apply(0.5) > 0.5);
    }

    #[test]
    fn bias_snaps_within_one_step() {
        assert_eq!(bias(1.0, 1.005, 0.01), 1.005);
        assert_eq!(bias(1.0, 2.0, 0.01), 1.01);
        assert_eq!(bias(2.0, 1.0, 0.5), 1.5);
    }

    #[test]
    fn smoothing_converges_to_goal() {
        let smoothing = SmoothingConfig::default();
        let goal = TransformState::new(2.5, Vec2::new(-300.0, -120.0));
        let mut current = TransformState::IDENTITY;
        let mut frames = 0;
        while current != goal {
            current = smooth_toward(current, goal, &smoothing);
            frames += 1;
            assert!(frames < 1000, "smoothing did not converge");
        }
    }

    #[test]
    fn zoom_tween_lands_exactly_and_stops() {
        let mut animator = Animator::default();
        let focus = Point::new(100.0, 50.0);
        animator.tween_zoom(1.0, 3.0, focus, 1000, 300, Easing::AccelerateDecelerate);
        let smoothing = SmoothingConfig::default();

        let start = TransformState::IDENTITY;
        let mid = animator.step(start, 1150, &smoothing).unwrap();
        assert!(mid.zoom > 1.0 && mid.zoom < 3.0);
        assert!(animator.is_active());

        let end = animator.step(mid, 1400, &smoothing).unwrap();
        assert_eq!(end.zoom, 3.0);
        assert!(!animator.is_active());
        assert!(animator.step(end, 1500, &smoothing).is_none());
    }

    #[test]
    fn pan_tween_interpolates_offset() {
        let mut animator = Animator::default();
        let to = Vec2::new(-200.0, -40.0);
        animator.tween_pan(Vec2::ZERO, to, 0, 100, Easing::Linear);
        let smoothing = SmoothingConfig::default();
        let state = TransformState::new(2.0, Vec2::ZERO);
        let half = animator.step(state, 50, &smoothing).unwrap();
        assert_eq!(half.offset, Vec2::new(-100.0, -20.0));
        let done = animator.step(half, 100, &smoothing).unwrap();
        assert_eq!(done.offset, to);
        assert_eq!(done.zoom, 2.0);
    }

    #[test]
    fn goal_replaces_tween() {
        let mut animator = Animator::default();
        animator.tween_pan(Vec2::ZERO, Vec2::new(1.0, 1.0), 0, 100, Easing::Linear);
        animator.set_goal(TransformState::IDENTITY);
        assert_eq!(animator.goal(), Some(TransformState::IDENTITY));
        animator.cancel();
        assert!(!animator.is_active());
    }
}
