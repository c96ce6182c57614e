// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit view state passed to rendering.

use circlet_pack::{Hierarchy, Layout, Lineage, NodeId};

use crate::style::Emphasis;
use crate::window::{Camera, ViewWindow};

/// The hovered node together with all of its ancestors, root first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightSet {
    lineage: Lineage,
}

impl HighlightSet {
    /// Highlight `hovered` and its ancestors.
    pub fn new(hierarchy: &Hierarchy, hovered: NodeId) -> Self {
        Self {
            lineage: hierarchy.lineage(hovered),
        }
    }

    /// The node under the pointer.
    pub fn hovered(&self) -> NodeId {
        self.lineage[self.lineage.len() - 1]
    }

    /// Highlighted nodes, root first, ending with the hovered node.
    pub fn nodes(&self) -> &[NodeId] {
        &self.lineage
    }

    /// Returns true if `id` is the hovered node or one of its ancestors.
    pub fn contains(&self, id: NodeId) -> bool {
        self.lineage.contains(&id)
    }
}

/// Everything that changes between frames of one view: focus, camera window, hover.
///
/// The layout itself is not part of the state; it is rebuilt only on resize or data change.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    /// Node currently zoomed into.
    pub focus: NodeId,
    /// Camera window, possibly mid-transition.
    pub window: ViewWindow,
    /// Hover highlight, if the pointer is over a node.
    pub highlight: Option<HighlightSet>,
}

impl ViewState {
    /// State settled on `focus`, with no hover.
    pub fn settled(layout: &Layout, focus: NodeId) -> Self {
        Self {
            focus,
            window: ViewWindow::around(layout.circle(focus), layout.options().padding),
            highlight: None,
        }
    }

    /// Camera for the current window.
    pub fn camera(&self, layout: &Layout) -> Camera {
        Camera::new(layout.surface(), layout.options().padding, self.window)
    }

    /// Emphasis tier of `id`.
    ///
    /// While hovering, the hovered lineage is [`Emphasis::Lineage`] and everything else is
    /// [`Emphasis::Unrelated`]. Otherwise the focus is [`Emphasis::Focused`], its ancestors are
    /// [`Emphasis::Lineage`], and the rest is [`Emphasis::Unrelated`].
    pub fn emphasis(&self, hierarchy: &Hierarchy, id: NodeId) -> Emphasis {
        if let Some(highlight) = &self.highlight {
            return if highlight.contains(id) {
                Emphasis::Lineage
            } else {
                Emphasis::Unrelated
            };
        }
        if id == self.focus {
            Emphasis::Focused
        } else if hierarchy.is_ancestor_of(id, self.focus) {
            Emphasis::Lineage
        } else {
            Emphasis::Unrelated
        }
    }
}
