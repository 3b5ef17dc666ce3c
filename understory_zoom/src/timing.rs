// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single‑slot deadline timer driven by host timestamps.
//!
//! Scheduling returns a [`TimerHandle`]; rescheduling or cancelling bumps the
//! generation so stale handles no longer match.

/// Identifies one scheduling of a [`DeadlineTimer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    generation: u64,
}

/// A timer holding at most one pending deadline.
#[derive(Clone, Debug, Default)]
pub struct DeadlineTimer {
    deadline: Option<u64>,
    generation: u64,
}

impl DeadlineTimer {
    /// Schedules the timer to fire `delay_ms` after `now_ms`, replacing any pending deadline.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) -> TimerHandle {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = Some(now_ms.saturating_add(delay_ms));
        TimerHandle {
            generation: self.generation,
        }
    }

    /// Cancels the pending deadline, if any.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Cancels the pending deadline only if it still belongs to `handle`.
    ///
    /// Returns `true` if something was cancelled.
    pub fn cancel_handle(&mut self, handle: TimerHandle) -> bool {
        if self.deadline.is_some() && handle.generation == self.generation {
            self.cancel();
            true
        } else {
            false
        }
    }

    /// Returns `true` while a deadline is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline in host milliseconds.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Fires the timer if its deadline is at or before `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<TimerHandle> {
        match self.deadline {
            Some(deadline) if deadline <= now_ms => {
                self.deadline = None;
                Some(TimerHandle {
                    generation: self.generation,
                })
            }
            _ => None,
        }
    }
}
