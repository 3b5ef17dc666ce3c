// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single child being zoomed.

use kurbo::{Affine, Size};

/// Content drawn under the zoom transform.
pub trait Surface {
    /// Error reported by [`draw`](Self::draw).
    type Error: core::fmt::Display;

    /// Laid‑out size of the content, or `None` if there is nothing to show.
    fn content_size(&self) -> Option<Size>;

    /// Draws the content with `transform` mapping content to view coordinates.
    fn draw(&mut self, transform: Affine) -> Result<(), Self::Error>;
}
