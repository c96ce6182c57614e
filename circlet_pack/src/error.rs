// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input validation errors.

use alloc::string::String;

/// A malformed tree or surface rejected while building a [`Layout`](crate::Layout).
///
/// This is the only error kind the packing core produces. It is raised synchronously and
/// never recovered from internally: a tree that fails validation produces no layout at all.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    /// A node carries a negative weight.
    #[error("node `{name}` has negative weight {weight}")]
    NegativeWeight {
        /// Name of the offending node.
        name: String,
        /// The rejected weight.
        weight: f64,
    },
    /// A node carries a NaN or infinite weight.
    #[error("node `{name}` has non-finite weight")]
    NonFiniteWeight {
        /// Name of the offending node.
        name: String,
    },
    /// A node carries a bias that is not a positive finite number.
    #[error("node `{name}` has invalid bias {bias}; bias must be positive and finite")]
    InvalidBias {
        /// Name of the offending node.
        name: String,
        /// The rejected bias.
        bias: f64,
    },
    /// The tree has no positive weight anywhere, so there is nothing to lay out.
    #[error("tree `{root}` is empty: no node carries a positive weight")]
    EmptyTree {
        /// Name of the root node.
        root: String,
    },
    /// Two children of the same parent share a name.
    #[error("node `{parent}` has more than one child named `{name}`")]
    DuplicateSibling {
        /// Name of the parent node.
        parent: String,
        /// The duplicated child name.
        name: String,
    },
    /// The surface is not finite or leaves no room once padding is reserved.
    #[error("surface {width}x{height} leaves no room for a padding of {padding}")]
    DegenerateSurface {
        /// Surface width in pixels.
        width: f64,
        /// Surface height in pixels.
        height: f64,
        /// Requested padding in pixels.
        padding: f64,
    },
}
