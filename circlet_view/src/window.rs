// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View windows over the static layout, and the camera that maps them to the screen.

use kurbo::{Affine, Circle, Point, Size};

/// Smallest diameter a window may have, so zero-radius leaves still give a finite camera.
const MIN_DIAMETER: f64 = 1e-3;

/// Square region of layout space to show: a center and a diameter, both in layout pixels.
///
/// Zooming never touches the layout; it only moves this window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewWindow {
    /// Layout-space point shown at the surface center.
    pub center: Point,
    /// Layout-space extent mapped onto the surface's usable extent.
    pub diameter: f64,
}

impl ViewWindow {
    /// Create a window from its parts.
    pub const fn new(center: Point, diameter: f64) -> Self {
        Self { center, diameter }
    }

    /// Window framing `circle`, with `padding` extra pixels of diameter so the stroke stays
    /// visible.
    pub fn around(circle: Circle, padding: f64) -> Self {
        Self::new(
            circle.center,
            (2.0 * circle.radius + padding).max(MIN_DIAMETER),
        )
    }

    /// Linear interpolation of center and diameter; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.center.lerp(other.center, t),
            self.diameter + (other.diameter - self.diameter) * t,
        )
    }
}

/// Mapping from layout space to screen space for one [`ViewWindow`].
///
/// With `k = (min(width, height) - 2 · padding) / diameter`, a layout point `p` lands at
/// `surface_center + (p - window.center) · k` and a radius `r` becomes `r · k`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    transform: Affine,
    scale: f64,
}

impl Camera {
    /// Camera showing `window` on a surface of `surface` size with `padding` reserved per edge.
    pub fn new(surface: Size, padding: f64, window: ViewWindow) -> Self {
        let extent = surface.min_side() - 2.0 * padding;
        let scale = extent / window.diameter.max(MIN_DIAMETER);
        let transform = Affine::translate(surface.to_rect().center().to_vec2())
            * Affine::scale(scale)
            * Affine::translate(-window.center.to_vec2());
        Self { transform, scale }
    }

    /// Layout-to-screen affine transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Uniform zoom factor `k`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a layout point to the screen.
    pub fn to_screen(&self, point: Point) -> Point {
        self.transform * point
    }

    /// Map a layout circle to the screen.
    pub fn circle_to_screen(&self, circle: Circle) -> Circle {
        Circle::new(self.to_screen(circle.center), circle.radius * self.scale)
    }

    /// Map a screen point back to layout space.
    pub fn to_layout(&self, point: Point) -> Point {
        self.transform.inverse() * point
    }
}
