// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circlet Pack: weighted hierarchies laid out as nested circles.
//!
//! Circlet Pack is the geometry half of a zoomable circle-packing view.
//!
//! - Describes a weighted tree with [`TreeNode`] (names, optional short labels, typed
//!   [`Category`], explicit weights, and a layout-only bias).
//! - Flattens it into a [`Hierarchy`]: a pre-order arena with non-owning parent links,
//!   used for lineage and ancestor queries.
//! - Packs it into a fixed-size surface with [`Layout::build`]: every node gets a
//!   [`kurbo::Circle`] such that children lie inside their parent and siblings never overlap.
//!
//! The layout is a pure function of its input. Siblings are placed heaviest first and ties
//! keep input order, so the same tree and surface always produce the same circles.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use circlet_pack::{Layout, TreeNode};
//!
//! let tree = TreeNode::branch(
//!     "A",
//!     [TreeNode::leaf("B", 6.0), TreeNode::leaf("C", 4.0)],
//! );
//! let layout = Layout::build(&tree, Size::new(400.0, 300.0), 10.0).unwrap();
//!
//! let root = layout.root();
//! assert_eq!(layout.circle(root).radius, 140.0);
//!
//! let b = layout.hierarchy().find_path(&["B"]).unwrap();
//! let c = layout.hierarchy().find_path(&["C"]).unwrap();
//! let ratio = layout.circle(b).radius / layout.circle(c).radius;
//! assert!((ratio - (6.0_f64 / 4.0).sqrt()).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`, `thiserror`, and `tracing`.
//! - `libm`: `no_std` floating-point support through `kurbo`'s `libm` feature.
//! - `serde`: derives `Serialize`/`Deserialize` for [`TreeNode`] and [`Category`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod enclose;
mod error;
mod hierarchy;
mod layout;
mod siblings;
mod tree;

pub use enclose::enclose;
pub use error::InvalidInput;
pub use hierarchy::{Ancestors, Hierarchy, Lineage, NodeId};
pub use layout::{Layout, PackOptions};
pub use siblings::pack_siblings;
pub use tree::{Category, TreeNode};
