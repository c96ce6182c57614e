// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition while circles move under the pointer.
//!
//! During a zoom transition every circle slides and grows, so the node under the pointer at
//! release time may differ from the one that was pressed. [`ClickState`] keeps the user's
//! intent: a press and release on the same target is always a click, and a release over a
//! different target still clicks the pressed one when the pointer stayed within a distance
//! and a time tolerance.
//!
//! ```
//! use circlet_view::{ClickResult, ClickState, ClickTarget};
//! use kurbo::Point;
//!
//! let mut clicks = ClickState::with_thresholds(Some(5.0), Some(300));
//! clicks.on_down(ClickTarget::Background, Point::new(10.0, 10.0), 1_000);
//! // The pointer barely moved, but a circle slid underneath it.
//! let result = clicks.on_up(&ClickTarget::Background, Point::new(12.0, 11.0), 1_150);
//! assert_eq!(result, ClickResult::Click(ClickTarget::Background));
//! ```

use circlet_pack::NodeId;
use kurbo::Point;

/// What a pointer press landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    /// A node's circle (the deepest one under the pointer).
    Node(NodeId),
    /// Empty surface outside the root circle.
    Background,
}

/// An active pointer press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press {
    /// Target under the pointer at press time.
    pub target: ClickTarget,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Press timestamp in milliseconds.
    pub down_time: u64,
    /// True once the pointer moved past the distance threshold.
    pub distance_exceeded: bool,
}

/// Outcome of a pointer release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult {
    /// Click the given target.
    Click(ClickTarget),
    /// No click; carries the pressed target if there was a press.
    Suppressed(Option<ClickTarget>),
}

/// Press/release state machine for a single pointer.
#[derive(Clone, Debug)]
pub struct ClickState {
    press: Option<Press>,
    /// Distance before a release over a different target stops counting as a click.
    pub distance_threshold: Option<f64>,
    /// Time in milliseconds before a release over a different target stops counting as a click.
    pub time_threshold: Option<u64>,
}

impl ClickState {
    /// Click state with a 5 pixel and 300 millisecond tolerance.
    pub fn new() -> Self {
        Self::with_thresholds(Some(5.0), Some(300))
    }

    /// Click state with custom tolerances; `None` means unlimited.
    ///
    /// With both set to `None`, only same-target releases click.
    pub fn with_thresholds(distance_threshold: Option<f64>, time_threshold: Option<u64>) -> Self {
        Self {
            press: None,
            distance_threshold,
            time_threshold,
        }
    }

    /// Record a press, replacing any earlier one.
    pub fn on_down(&mut self, target: ClickTarget, position: Point, timestamp: u64) {
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: timestamp,
            distance_exceeded: false,
        });
    }

    /// Track pointer movement during a press.
    ///
    /// Returns the pressed target the first time the pointer moves past the distance threshold.
    pub fn on_move(&mut self, position: Point) -> Option<ClickTarget> {
        let press = self.press.as_mut()?;
        let threshold = self.distance_threshold?;
        if press.distance_exceeded || press.down_position.distance(position) <= threshold {
            return None;
        }
        press.distance_exceeded = true;
        Some(press.target)
    }

    /// Resolve a release over `current_target`.
    pub fn on_up(
        &mut self,
        current_target: &ClickTarget,
        position: Point,
        timestamp: u64,
    ) -> ClickResult {
        let Some(press) = self.press.take() else {
            return ClickResult::Suppressed(None);
        };
        if press.target == *current_target {
            return ClickResult::Click(press.target);
        }
        if self.distance_threshold.is_none() && self.time_threshold.is_none() {
            return ClickResult::Suppressed(Some(press.target));
        }
        if press.distance_exceeded {
            return ClickResult::Suppressed(Some(press.target));
        }

        let distance_ok = self
            .distance_threshold
            .is_none_or(|t| press.down_position.distance(position) <= t);
        let time_ok = self
            .time_threshold
            .is_none_or(|t| timestamp.saturating_sub(press.down_time) <= t);
        if distance_ok && time_ok {
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Drop the active press. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Whether a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// The active press, if any.
    pub fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new()
    }
}
