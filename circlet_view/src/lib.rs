// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circlet View: a zoomable focus view over a circle-packed hierarchy.
//!
//! This crate turns a [`circlet_pack::Layout`] into an interactive view:
//!
//! - **State** ([`ViewState`]): the focus node, the camera [`ViewWindow`], and an optional
//!   hover [`HighlightSet`]. It is an explicit value owned by the view and passed to
//!   [`render`]; there is no global state.
//! - **Rendering** ([`render`]): a pure function producing a [`DrawList`] of backend-agnostic
//!   [`DrawCommand`]s. Any renderer can consume it through the [`Backend`] trait.
//! - **Zoom**: focusing a node starts a [`Tween`] from the current, possibly mid-flight, camera
//!   window to one framing the node. The layout is never recomputed while zooming.
//! - **Input** ([`HierarchyFocusView::handle`]): pointer moves become hover highlights, and
//!   press/release pairs become clicks through [`ClickState`], which tolerates circles moving
//!   under the pointer.
//!
//! ## Label and emphasis rules
//!
//! A label is visible iff its node is a child of the root while the root is focused, a child of
//! the focus whose displayed radius exceeds [`Theme::label_threshold`], or the focus itself when
//! it is not the root. Circles are drawn in one of three [`Emphasis`] tiers: the focus, the
//! path from the root to the focus, and everything else. While hovering, the hovered lineage
//! takes the middle tier and everything else the lowest.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use circlet_pack::TreeNode;
//! use circlet_view::{HierarchyFocusView, ViewOptions};
//!
//! let tree = TreeNode::branch("A", [TreeNode::leaf("B", 6.0), TreeNode::leaf("C", 4.0)]);
//! let mut view = HierarchyFocusView::mount(&Size::new(600.0, 600.0), &tree, ViewOptions::default())
//!     .unwrap();
//!
//! let b = view.layout().hierarchy().find_path(&["B"]).unwrap();
//! let c = view.layout().hierarchy().find_path(&["C"]).unwrap();
//! assert!(view.render().label_for(c).is_some());
//!
//! // Zoom into B at t = 0 ms and let the 600 ms transition finish.
//! assert!(view.zoom(b, 0));
//! let frame = view.tick(600).unwrap();
//! assert!(frame.finished);
//!
//! let frame = view.render();
//! assert!(frame.label_for(b).is_some());
//! assert!(frame.label_for(c).is_none());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`, `circlet_pack`, `thiserror`, and
//!   `tracing`.
//! - `libm`: `no_std` floating-point support through `kurbo`'s `libm` feature.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod pointer;
mod render;
mod state;
mod style;
mod tween;
mod view;
mod window;

pub use pointer::{ClickResult, ClickState, ClickTarget, Press};
pub use render::{
    Backend, CircleCommand, DrawCommand, DrawList, LabelCommand, NodeMarks, label_visible,
    node_marks, render,
};
pub use state::{HighlightSet, ViewState};
pub use style::{Color, Emphasis, LabelStyle, Opacity, Palette, Theme};
pub use tween::{Easing, Tween, TweenFrame};
pub use view::{HierarchyFocusView, Surface, ViewError, ViewEvent, ViewOptions};
pub use window::{Camera, ViewWindow};
