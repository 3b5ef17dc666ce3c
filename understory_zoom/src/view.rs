// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::animation::{Animator, Easing};
use crate::config::{FlingMode, GestureConfig, MotionConfig, MotionMode, ZoomConfig, ZoomLimits};
use crate::error::ConfigError;
use crate::fit::fit;
use crate::listener::ZoomListener;
use crate::minimap::{MinimapConfig, MinimapGeometry, project};
use crate::recognizer::{Gesture, GestureRecognizer, PointerInput};
use crate::surface::Surface;
use crate::transform::{TransformState, ZoomEdge};

/// Pan/zoom controller for a single child surface.
///
/// `ZoomView` owns the [`TransformState`] and is its only writer. It:
/// - Interprets decoded [`Gesture`]s, or raw [`PointerInput`] through its own
///   [`GestureRecognizer`].
/// - Keeps zoom inside the configured [`ZoomLimits`] and the offset inside the
///   fit policy (see [`crate::fit`]).
/// - Runs animations when the host calls [`advance`](Self::advance) once per frame.
/// - Notifies a [`ZoomListener`] when zoom leaves or returns to the minimum.
///
/// Every mutating call takes the host timestamp and listener explicitly; the
/// view keeps no clock and no callbacks.
#[derive(Clone, Debug)]
pub struct ZoomView {
    config: ZoomConfig,
    viewport: Size,
    content: Option<Size>,
    state: TransformState,
    animator: Animator,
    recognizer: GestureRecognizer,
    enabled: bool,
    pinching: bool,
    pending_end: bool,
    minimap_drag: Option<u64>,
}

impl ZoomView {
    /// Creates a view at the minimum zoom with no offset.
    ///
    /// The viewport starts empty and there is no content until
    /// [`set_viewport`](Self::set_viewport) and
    /// [`set_content_size`](Self::set_content_size) (or
    /// [`render`](Self::render)) provide them.
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        let min = config.limits().min();
        Self {
            recognizer: GestureRecognizer::new(config.gestures()),
            config,
            viewport: Size::ZERO,
            content: None,
            state: TransformState::new(min, Vec2::ZERO),
            animator: Animator::default(),
            enabled: true,
            pinching: false,
            pending_end: false,
            minimap_drag: None,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Current transform snapshot.
    #[must_use]
    pub fn state(&self) -> TransformState {
        self.state
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    /// Current offset in content units.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.state.offset
    }

    /// Content → view transform, or `None` while there is no content.
    #[must_use]
    pub fn transform(&self) -> Option<Affine> {
        self.content.map(|_| self.state.to_affine())
    }

    /// Viewport size in view pixels.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Content size, if known.
    #[must_use]
    pub fn content_size(&self) -> Option<Size> {
        self.content
    }

    /// Returns `true` unless input has been disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` while an animation is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// Earliest timestamp at which [`advance`](Self::advance) has pending tap work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.recognizer.next_deadline()
    }

    /// Updates the viewport size and re‑fits.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.refit();
    }

    /// Updates the content size and re‑fits. `None` means there is no content.
    pub fn set_content_size(&mut self, content: Option<Size>) {
        self.content = content;
        self.refit();
    }

    /// Replaces the zoom limits, clamping the current zoom into them.
    pub fn set_zoom_limits(&mut self, limits: ZoomLimits, listener: &mut impl ZoomListener) {
        let was_zoomed = self.state.zoom > self.config.limits().min();
        *self.config.limits_mut() = limits;
        self.state = self.settle(self.state);
        if let Some(goal) = self.animator.goal() {
            self.animator.set_goal(self.settle(goal));
        }
        let now_zoomed = self.state.zoom > limits.min();
        let edge = match (was_zoomed, now_zoomed) {
            (true, false) => Some(ZoomEdge::Ended),
            (false, true) => Some(ZoomEdge::Started),
            _ => None,
        };
        self.deliver(edge, listener);
    }

    /// Sets the minimum zoom. On `Err` nothing changes.
    pub fn set_min_zoom(
        &mut self,
        min: f64,
        listener: &mut impl ZoomListener,
    ) -> Result<(), ConfigError> {
        let limits = self
            .config
            .limits()
            .with_min(min)
            .inspect_err(|err| tracing::debug!(%err, "rejected minimum zoom"))?;
        self.set_zoom_limits(limits, listener);
        Ok(())
    }

    /// Sets the maximum zoom. On `Err` nothing changes.
    pub fn set_max_zoom(
        &mut self,
        max: f64,
        listener: &mut impl ZoomListener,
    ) -> Result<(), ConfigError> {
        let limits = self
            .config
            .limits()
            .with_max(max)
            .inspect_err(|err| tracing::debug!(%err, "rejected maximum zoom"))?;
        self.set_zoom_limits(limits, listener);
        Ok(())
    }

    /// Sets the double‑tap zoom preset. On `Err` nothing changes.
    pub fn set_double_tap_zoom(&mut self, zoom: f64) -> Result<(), ConfigError> {
        self.config = self
            .config
            .clone()
            .with_double_tap_zoom(zoom)
            .inspect_err(|err| tracing::debug!(%err, "rejected double-tap zoom"))?;
        Ok(())
    }

    /// Replaces the gesture thresholds. Takes effect for the next pointer session.
    pub fn set_gestures(&mut self, gestures: GestureConfig) {
        self.config = self.config.clone().with_gestures(gestures);
        self.recognizer.set_config(gestures);
    }

    /// Replaces the animation settings. Switching modes stops the running animation.
    pub fn set_motion(&mut self, motion: MotionConfig) {
        if motion.mode != self.config.motion().mode {
            self.animator.cancel();
        }
        self.config = self.config.clone().with_motion(motion);
    }

    /// Replaces the minimap settings.
    pub fn set_minimap(&mut self, minimap: MinimapConfig) {
        *self.config.minimap_mut() = minimap;
    }

    /// Sets the minimap size. On `Err` nothing changes.
    pub fn set_minimap_size(&mut self, size: Option<f64>) -> Result<(), ConfigError> {
        let minimap = self
            .config
            .minimap()
            .clone()
            .with_size(size)
            .inspect_err(|err| tracing::debug!(%err, "rejected minimap size"))?;
        self.set_minimap(minimap);
        Ok(())
    }

    /// Shows or hides the minimap.
    pub fn set_minimap_enabled(&mut self, enabled: bool) {
        self.config.minimap_mut().enabled = enabled;
        if !enabled {
            self.minimap_drag = None;
        }
    }

    /// Enables or disables input.
    ///
    /// Disabling drops any pointer session and animation and resets
    /// immediately to the minimum zoom about the viewport center.
    pub fn set_enabled(&mut self, enabled: bool, listener: &mut impl ZoomListener) {
        if enabled == self.enabled {
            return;
        }
        tracing::debug!(enabled, "zoom input toggled");
        self.enabled = enabled;
        if enabled {
            return;
        }
        self.recognizer.reset();
        self.minimap_drag = None;
        self.animator.cancel();
        self.end_pinch(listener);
        let center = (self.viewport.to_vec2() / 2.0).to_point();
        let reset = self.state.rezoomed(self.config.limits().min(), center);
        let settled = self.settle(reset);
        self.commit(settled, listener);
    }

    /// Zooms immediately to `zoom` (clamped) keeping the content under `focus` fixed.
    pub fn zoom_to(&mut self, zoom: f64, focus: Point, listener: &mut impl ZoomListener) {
        if !zoom.is_finite() {
            tracing::debug!(zoom, "ignoring non-finite zoom request");
            return;
        }
        self.animator.cancel();
        let target = self.config.limits().clamp(zoom);
        let settled = self.settle(self.state.rezoomed(target, focus));
        self.commit(settled, listener);
    }

    /// Animates to `zoom` (clamped) about `focus`, starting at `now_ms`.
    ///
    /// The transform changes as [`advance`](Self::advance) is called.
    pub fn animate_zoom(&mut self, zoom: f64, focus: Point, now_ms: u64) {
        if !zoom.is_finite() {
            tracing::debug!(zoom, "ignoring non-finite zoom request");
            return;
        }
        let target = self.config.limits().clamp(zoom);
        let motion = self.config.motion();
        match motion.mode {
            MotionMode::Tween => self.animator.tween_zoom(
                self.state.zoom,
                target,
                focus,
                now_ms,
                motion.zoom_duration_ms,
                Easing::AccelerateDecelerate,
            ),
            MotionMode::Smooth => {
                let goal = self.settle(self.working_state().rezoomed(target, focus));
                self.animator.set_goal(goal);
            }
        }
    }

    /// Interprets one decoded gesture. Returns `true` if it was consumed.
    pub fn handle_gesture(
        &mut self,
        gesture: Gesture,
        now_ms: u64,
        listener: &mut impl ZoomListener,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        tracing::trace!(?gesture, "interpreting gesture");
        match gesture {
            Gesture::ScaleBegin { .. } => {
                self.pinching = true;
                if self.config.motion().mode == MotionMode::Tween {
                    self.animator.cancel();
                }
                true
            }
            Gesture::Scale {
                factor,
                focus,
                previous_span,
                current_span,
            } => {
                if !factor.is_finite() || factor <= 0.0 {
                    return false;
                }
                let working = self.working_state();
                let zoom = self.config.limits().clamp(working.zoom * factor);
                let applied = self.apply(working.rezoomed(zoom, focus), listener);
                if previous_span != current_span {
                    listener.on_zooming(applied.zoom, applied.offset);
                }
                true
            }
            Gesture::ScaleEnd => {
                self.end_pinch(listener);
                true
            }
            Gesture::Scroll { delta } => {
                let working = self.working_state();
                let offset = working.offset - delta / working.zoom;
                self.apply(working.with_offset(offset), listener);
                true
            }
            Gesture::Fling { velocity } => self.fling(velocity, now_ms),
            Gesture::DoubleTap { position } => {
                if listener.on_double_tap(position) {
                    return true;
                }
                let min = self.config.limits().min();
                if self.working_state().zoom <= min {
                    self.animate_zoom(self.config.double_tap_zoom(), position, now_ms);
                } else {
                    let center = (self.viewport.to_vec2() / 2.0).to_point();
                    self.animate_zoom(min, center, now_ms);
                }
                true
            }
            Gesture::SingleTap { position } => {
                match self.minimap().filter(|geo| geo.contains(position)) {
                    Some(geo) => self.jump_to_minimap(&geo, position, listener),
                    None => listener.on_click(position),
                }
                true
            }
        }
    }

    /// Feeds one raw pointer event. Returns `true` if it was consumed.
    ///
    /// A pointer that goes down on a visible minimap drags the viewport across
    /// the map until it is released; that sequence bypasses gesture recognition.
    pub fn handle_pointer(
        &mut self,
        input: PointerInput,
        now_ms: u64,
        listener: &mut impl ZoomListener,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(consumed) = self.minimap_pointer(input, listener) {
            return consumed;
        }
        // A finger landing on gliding content stops it.
        if matches!(input, PointerInput::Down { .. })
            && !self.recognizer.is_tracking()
            && self.config.motion().mode == MotionMode::Tween
        {
            self.animator.cancel();
        }
        for gesture in self.recognizer.handle(input, now_ms) {
            self.handle_gesture(gesture, now_ms, listener);
        }
        true
    }

    /// Runs one frame: delivers expired taps and steps the running animation.
    ///
    /// Returns `true` if the host should keep calling `advance`.
    pub fn advance(&mut self, now_ms: u64, listener: &mut impl ZoomListener) -> bool {
        if let Some(tap) = self.recognizer.poll(now_ms) {
            self.handle_gesture(tap, now_ms, listener);
        }
        let smoothing = self.config.motion().smoothing;
        if let Some(next) = self.animator.step(self.state, now_ms, &smoothing) {
            let settled = self.settle(next);
            self.commit(settled, listener);
        }
        self.animator.is_active() || self.recognizer.next_deadline().is_some()
    }

    /// Minimap geometry for the current state, if the minimap is visible.
    #[must_use]
    pub fn minimap(&self) -> Option<MinimapGeometry> {
        let content = self.content?;
        project(
            self.state,
            self.viewport,
            content,
            self.config.minimap(),
            self.config.limits().min(),
        )
    }

    /// Draws `surface` under the current transform.
    ///
    /// Picks up content size changes from the surface first. Frames without
    /// content are skipped. Draw errors are logged and absorbed. Returns the
    /// minimap to draw on top, if any.
    pub fn render<S: Surface>(&mut self, surface: &mut S) -> Option<MinimapGeometry> {
        let Some(content) = surface.content_size() else {
            tracing::trace!("no content; skipping frame");
            if self.content.is_some() {
                self.set_content_size(None);
            }
            return None;
        };
        if self.content != Some(content) {
            self.set_content_size(Some(content));
        }
        if let Err(err) = surface.draw(self.state.to_affine()) {
            tracing::warn!(%err, "surface draw failed");
        }
        self.minimap()
    }

    /// Cancels every pending animation, tap and pointer session.
    ///
    /// A zoom end held back by an unfinished pinch is delivered to `listener`.
    /// Afterwards [`advance`](Self::advance) is a no‑op until new input arrives.
    pub fn teardown(&mut self, listener: &mut impl ZoomListener) {
        self.animator.cancel();
        self.recognizer.reset();
        self.minimap_drag = None;
        self.end_pinch(listener);
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ZoomViewDebugInfo {
        let limits = self.config.limits();
        ZoomViewDebugInfo {
            viewport: self.viewport,
            content: self.content,
            visible_content_rect: self
                .content
                .map(|_| self.state.visible_content_rect(self.viewport)),
            zoom: self.state.zoom,
            offset: self.state.offset,
            min_zoom: limits.min(),
            max_zoom: limits.max(),
            mode: self.config.motion().mode,
            enabled: self.enabled,
            pinching: self.pinching,
            animating: self.animator.is_active(),
            goal: self.animator.goal(),
            minimap: self.minimap(),
        }
    }

    fn fling(&mut self, velocity: Vec2, now_ms: u64) -> bool {
        let FlingMode::Decelerate { damping } = self.config.gestures().fling() else {
            return false;
        };
        let working = self.working_state();
        let travel = velocity / (working.zoom * damping);
        let target = self.settle(working.with_offset(working.offset + travel));
        let motion = self.config.motion();
        match motion.mode {
            MotionMode::Tween => self.animator.tween_pan(
                self.state.offset,
                target.offset,
                now_ms,
                motion.fling_duration_ms,
                Easing::Decelerate,
            ),
            MotionMode::Smooth => self.animator.set_goal(target),
        }
        true
    }

    fn minimap_pointer(
        &mut self,
        input: PointerInput,
        listener: &mut impl ZoomListener,
    ) -> Option<bool> {
        match (self.minimap_drag, input) {
            (None, PointerInput::Down { id, position }) if !self.recognizer.is_tracking() => {
                let geo = self.minimap().filter(|geo| geo.contains(position))?;
                self.minimap_drag = Some(id);
                self.jump_to_minimap(&geo, position, listener);
                Some(true)
            }
            (None, _) => None,
            (Some(drag), PointerInput::Move { id, position }) if id == drag => {
                if let Some(geo) = self.minimap() {
                    self.jump_to_minimap(&geo, position, listener);
                }
                Some(true)
            }
            (Some(drag), PointerInput::Up { id, position }) if id == drag => {
                if let Some(geo) = self.minimap() {
                    self.jump_to_minimap(&geo, position, listener);
                }
                self.minimap_drag = None;
                Some(true)
            }
            (Some(_), PointerInput::Cancel) => {
                self.minimap_drag = None;
                Some(true)
            }
            (Some(_), _) => Some(true),
        }
    }

    fn jump_to_minimap(
        &mut self,
        geo: &MinimapGeometry,
        position: Point,
        listener: &mut impl ZoomListener,
    ) {
        self.animator.cancel();
        let next = self.settle(self.state.with_offset(geo.offset_at(position)));
        self.commit(next, listener);
    }

    /// State gestures build on: the smoothing goal if one is pending.
    fn working_state(&self) -> TransformState {
        match self.config.motion().mode {
            MotionMode::Smooth => self.animator.goal().unwrap_or(self.state),
            MotionMode::Tween => self.state,
        }
    }

    /// Settles `next` and installs it as the displayed state or the goal.
    fn apply(&mut self, next: TransformState, listener: &mut impl ZoomListener) -> TransformState {
        let settled = self.settle(next);
        match self.config.motion().mode {
            MotionMode::Tween => {
                self.animator.cancel();
                self.commit(settled, listener);
            }
            MotionMode::Smooth => self.animator.set_goal(settled),
        }
        settled
    }

    /// Clamps zoom into the limits and applies the fit policy.
    fn settle(&self, state: TransformState) -> TransformState {
        let state = TransformState::new(self.config.limits().clamp(state.zoom), state.offset);
        match self.content {
            Some(content) => fit(state, self.viewport, content),
            None => state,
        }
    }

    fn refit(&mut self) {
        self.state = self.settle(self.state);
        if let Some(goal) = self.animator.goal() {
            self.animator.set_goal(self.settle(goal));
        }
    }

    fn commit(&mut self, next: TransformState, listener: &mut impl ZoomListener) {
        let previous = self.state.zoom;
        self.state = next;
        let edge = ZoomEdge::between(previous, next.zoom, self.config.limits().min());
        self.deliver(edge, listener);
    }

    /// Notifies an edge; `Ended` waits for the pinch to finish.
    fn deliver(&mut self, edge: Option<ZoomEdge>, listener: &mut impl ZoomListener) {
        match edge {
            Some(ZoomEdge::Started) => {
                if core::mem::take(&mut self.pending_end) {
                    tracing::trace!("pinch returned above minimum zoom");
                } else {
                    tracing::debug!(zoom = self.state.zoom, "zoom started");
                    listener.on_zoom_started();
                }
            }
            Some(ZoomEdge::Ended) if self.pinching => self.pending_end = true,
            Some(ZoomEdge::Ended) => {
                tracing::debug!("zoom ended");
                listener.on_zoom_ended();
            }
            None => {}
        }
    }

    fn end_pinch(&mut self, listener: &mut impl ZoomListener) {
        self.pinching = false;
        if core::mem::take(&mut self.pending_end) {
            tracing::debug!("zoom ended");
            listener.on_zoom_ended();
        }
    }
}

impl Default for ZoomView {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

/// Debug snapshot of a [`ZoomView`] state.
#[derive(Clone, Copy, Debug)]
pub struct ZoomViewDebugInfo {
    /// Viewport size in view pixels.
    pub viewport: Size,
    /// Content size, if known.
    pub content: Option<Size>,
    /// Content‑space rectangle currently visible, if there is content.
    pub visible_content_rect: Option<Rect>,
    /// Current zoom factor.
    pub zoom: f64,
    /// Current offset in content units.
    pub offset: Vec2,
    /// Minimum zoom factor.
    pub min_zoom: f64,
    /// Maximum zoom factor.
    pub max_zoom: f64,
    /// Animation model.
    pub mode: MotionMode,
    /// Whether input is accepted.
    pub enabled: bool,
    /// Whether a pinch is in progress.
    pub pinching: bool,
    /// Whether an animation is running.
    pub animating: bool,
    /// Smoothing goal, in [`MotionMode::Smooth`].
    pub goal: Option<TransformState>,
    /// Visible minimap, if any.
    pub minimap: Option<MinimapGeometry>,
}
