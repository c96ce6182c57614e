// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based interpolation between two view windows.

use crate::window::ViewWindow;

/// Easing curve applied to normalized tween progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cubic ease-in for the first half, ease-out for the second.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map progress `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// One camera transition from a starting window to a target window.
///
/// A tween is tagged with the generation of the transition that created it. Whoever owns the
/// tween bumps the generation whenever it replaces or cancels a transition, so stale frames
/// can always be told apart from current ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: ViewWindow,
    to: ViewWindow,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
    generation: u64,
}

/// Sample of a [`Tween`] at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenFrame {
    /// Interpolated window; exactly the target once `finished`.
    pub window: ViewWindow,
    /// Generation of the transition this frame belongs to.
    pub generation: u64,
    /// Whether the transition has reached its target.
    pub finished: bool,
}

impl Tween {
    /// Create a tween starting at `start_ms`.
    pub fn new(
        from: ViewWindow,
        to: ViewWindow,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
        generation: u64,
    ) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
            generation,
        }
    }

    /// Window the tween started from.
    pub fn from(&self) -> ViewWindow {
        self.from
    }

    /// Window the tween ends at.
    pub fn to(&self) -> ViewWindow {
        self.to
    }

    /// Generation tag.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Linear progress in `[0, 1]`. Times before the start count as the start.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }

    /// Sample the tween at `now_ms`.
    pub fn sample(&self, now_ms: u64) -> TweenFrame {
        let t = self.progress(now_ms);
        let finished = t >= 1.0;
        let window = if finished {
            self.to
        } else {
            self.from.lerp(self.to, self.easing.apply(t))
        };
        TweenFrame {
            window,
            generation: self.generation,
            finished,
        }
    }
}
