// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend-agnostic draw commands for one frame.

use alloc::string::String;
use alloc::vec::Vec;

use circlet_pack::{Hierarchy, Layout, NodeId};
use kurbo::{Circle, Point, Size};

use crate::state::ViewState;
use crate::style::{Color, Emphasis, Opacity, Theme};

bitflags::bitflags! {
    /// Per-node relationship to the current view state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeMarks: u8 {
        /// Node is the root.
        const ROOT          = 0b0000_0001;
        /// Node is the focus.
        const FOCUS         = 0b0000_0010;
        /// Node is on the path from the root to the focus, focus included.
        const FOCUS_LINEAGE = 0b0000_0100;
        /// Node is the hovered node or one of its ancestors.
        const HOVER_LINEAGE = 0b0000_1000;
        /// Clicking the node changes focus.
        const CLICKABLE     = 0b0001_0000;
        /// Node has a visible label this frame.
        const LABELED       = 0b0010_0000;
    }
}

/// A circle to draw, in screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleCommand {
    /// Node drawn.
    pub node: NodeId,
    /// Screen-space circle.
    pub circle: Circle,
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
    /// Fill and outline opacity.
    pub opacity: Opacity,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Emphasis tier the opacity was taken from.
    pub emphasis: Emphasis,
    /// Relationship flags.
    pub marks: NodeMarks,
    /// Path from the root, e.g. `"Design Methods → Behavioral"`.
    pub tooltip: String,
}

/// A label to draw, centered on `position`.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelCommand {
    /// Node labeled.
    pub node: NodeId,
    /// Label text.
    pub text: String,
    /// Screen-space anchor (the circle's center).
    pub position: Point,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font weight.
    pub font_weight: u16,
    /// Text color.
    pub color: Color,
    /// Width the backend should wrap the text to.
    pub max_width: f64,
}

/// One drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Background {
        /// Surface size.
        size: Size,
        /// Fill color.
        color: Color,
    },
    /// Draw a node's circle.
    Circle(CircleCommand),
    /// Draw a node's label.
    Label(LabelCommand),
}

/// A renderer able to replay a [`DrawList`].
pub trait Backend {
    /// Fill the surface.
    fn background(&mut self, size: Size, color: Color);
    /// Draw a circle.
    fn circle(&mut self, command: &CircleCommand);
    /// Draw a label.
    fn label(&mut self, command: &LabelCommand);
}

/// Ordered draw commands for one frame: the background, then each node's circle followed by its
/// label if visible, in pre-order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// All commands in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Circle commands in draw order.
    pub fn circles(&self) -> impl Iterator<Item = &CircleCommand> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    /// Label commands in draw order.
    pub fn labels(&self) -> impl Iterator<Item = &LabelCommand> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label(label) => Some(label),
            _ => None,
        })
    }

    /// The circle command of `node`.
    pub fn circle_for(&self, node: NodeId) -> Option<&CircleCommand> {
        self.circles().find(|c| c.node == node)
    }

    /// The label command of `node`, if its label is visible.
    pub fn label_for(&self, node: NodeId) -> Option<&LabelCommand> {
        self.labels().find(|l| l.node == node)
    }

    /// Feed every command to `backend` in order.
    pub fn replay(&self, backend: &mut impl Backend) {
        for command in &self.commands {
            match command {
                DrawCommand::Background { size, color } => backend.background(*size, *color),
                DrawCommand::Circle(circle) => backend.circle(circle),
                DrawCommand::Label(label) => backend.label(label),
            }
        }
    }
}

/// Whether `node`'s label is shown when `focus` is the focus and the node is displayed with
/// `displayed_radius` screen pixels.
///
/// A label is shown iff the node is a child of the root while the root is focused, or a child
/// of the focus large enough to exceed `threshold`, or the focus itself (unless that is the
/// root).
pub fn label_visible(
    hierarchy: &Hierarchy,
    focus: NodeId,
    node: NodeId,
    displayed_radius: f64,
    threshold: f64,
) -> bool {
    let root = hierarchy.root();
    let parent = hierarchy.parent(node);
    (focus == root && parent == Some(root))
        || (parent == Some(focus) && displayed_radius > threshold)
        || (node == focus && node != root)
}

/// Relationship flags of `id` under `state`.
pub fn node_marks(hierarchy: &Hierarchy, state: &ViewState, id: NodeId) -> NodeMarks {
    let mut marks = NodeMarks::empty();
    marks.set(NodeMarks::ROOT, id == hierarchy.root());
    marks.set(NodeMarks::FOCUS, id == state.focus);
    marks.set(
        NodeMarks::FOCUS_LINEAGE,
        hierarchy.is_ancestor_of(id, state.focus),
    );
    marks.set(
        NodeMarks::HOVER_LINEAGE,
        state.highlight.as_ref().is_some_and(|h| h.contains(id)),
    );
    marks.set(NodeMarks::CLICKABLE, id != state.focus);
    marks
}

/// Produce the draw commands for `layout` seen through `state`.
///
/// Pure: the same inputs always yield the same list.
pub fn render(layout: &Layout, state: &ViewState, theme: &Theme) -> DrawList {
    let hierarchy = layout.hierarchy();
    let camera = state.camera(layout);
    let mut commands = Vec::with_capacity(1 + 2 * hierarchy.len());
    commands.push(DrawCommand::Background {
        size: layout.surface(),
        color: theme.background,
    });

    for (id, circle) in layout.iter() {
        let screen = camera.circle_to_screen(circle);
        let depth = hierarchy.depth(id);
        let mut marks = node_marks(hierarchy, state, id);
        let labeled = label_visible(
            hierarchy,
            state.focus,
            id,
            screen.radius,
            theme.label_threshold,
        );
        marks.set(NodeMarks::LABELED, labeled);

        let emphasis = state.emphasis(hierarchy, id);
        let palette = theme.palette(
            hierarchy.category(id),
            marks.intersects(NodeMarks::FOCUS | NodeMarks::HOVER_LINEAGE),
        );
        commands.push(DrawCommand::Circle(CircleCommand {
            node: id,
            circle: screen,
            fill: palette.fill,
            stroke: palette.stroke,
            opacity: theme.opacity(emphasis),
            stroke_width: theme.stroke_width(depth),
            emphasis,
            marks,
            tooltip: hierarchy.path_label(id),
        }));

        if labeled {
            let style = theme.label_style(depth);
            let large = screen.radius > theme.label_threshold * 1.5;
            commands.push(DrawCommand::Label(LabelCommand {
                node: id,
                text: hierarchy.label(id).into(),
                position: screen.center,
                font_size: if large { style.large_size } else { style.size },
                font_weight: if marks.contains(NodeMarks::HOVER_LINEAGE) {
                    style.hover_weight
                } else {
                    style.weight
                },
                color: style.color,
                max_width: theme
                    .min_label_width
                    .max(screen.radius * theme.label_width_factor),
            }));
        }
    }

    tracing::trace!(commands = commands.len(), "rendered frame");
    DrawList { commands }
}
