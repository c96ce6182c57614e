// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle-packing layout of a [`Hierarchy`] inside a fixed-size surface.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point, Size};

use crate::error::InvalidInput;
use crate::hierarchy::{Hierarchy, NodeId};
use crate::siblings::pack_siblings;
use crate::tree::TreeNode;

/// Spacing options for [`Layout::build_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackOptions {
    /// Pixels reserved between the root circle and the nearest surface edge.
    ///
    /// The root radius is `min(width, height) / 2 - padding`. Views also add this value to a
    /// focused circle's diameter so borders are never cut off when zoomed in.
    pub padding: f64,
    /// Approximate pixel gap between sibling circles, and between children and their parent.
    pub sibling_padding: f64,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            padding: 40.0,
            sibling_padding: 3.0,
        }
    }
}

/// A hierarchy annotated with one circle per node, in surface pixel coordinates.
///
/// Invariants, up to floating-point tolerance:
/// - the root circle is centered in the surface with radius `min(width, height) / 2 - padding`;
/// - every child circle lies inside its parent's circle;
/// - sibling circles do not overlap;
/// - among siblings of the same shape, area is proportional to `weight × bias`.
///
/// A layout is immutable. Zooming only moves a camera over it; resizing builds a new one with
/// [`Layout::resized`].
#[derive(Clone, Debug)]
pub struct Layout {
    hierarchy: Hierarchy,
    circles: Vec<Circle>,
    surface: Size,
    options: PackOptions,
}

impl Layout {
    /// Pack `tree` into a `surface` keeping `padding` pixels free around the root.
    ///
    /// Uses [`PackOptions::default`] for the sibling gap.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] if the tree fails validation (see [`Hierarchy::from_tree`]),
    /// has no positive weight, or the surface cannot hold the padding.
    pub fn build(tree: &TreeNode, surface: Size, padding: f64) -> Result<Self, InvalidInput> {
        Self::build_with(
            tree,
            surface,
            &PackOptions {
                padding,
                ..PackOptions::default()
            },
        )
    }

    /// Pack `tree` into `surface` with explicit spacing options.
    ///
    /// # Errors
    ///
    /// See [`Layout::build`].
    pub fn build_with(
        tree: &TreeNode,
        surface: Size,
        options: &PackOptions,
    ) -> Result<Self, InvalidInput> {
        Self::from_hierarchy(Hierarchy::from_tree(tree)?, surface, options)
    }

    /// Pack an already validated hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::EmptyTree`] when nothing has positive weight and
    /// [`InvalidInput::DegenerateSurface`] when the surface cannot hold the padding.
    pub fn from_hierarchy(
        hierarchy: Hierarchy,
        surface: Size,
        options: &PackOptions,
    ) -> Result<Self, InvalidInput> {
        let outer = outer_radius(surface, options)?;
        let circles = Packer::new(&hierarchy).layout(surface, outer, options)?;
        tracing::debug!(
            nodes = hierarchy.len(),
            width = surface.width,
            height = surface.height,
            root_radius = outer,
            "packed hierarchy"
        );
        Ok(Self {
            hierarchy,
            circles,
            surface,
            options: *options,
        })
    }

    /// Rebuild the same hierarchy for a new surface size.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::DegenerateSurface`] if the new surface cannot hold the padding.
    pub fn resized(&self, surface: Size) -> Result<Self, InvalidInput> {
        Self::from_hierarchy(self.hierarchy.clone(), surface, &self.options)
    }

    /// The laid-out hierarchy.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.hierarchy.root()
    }

    /// Surface size this layout was built for.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Options this layout was built with.
    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    /// Circle of a node in surface coordinates.
    pub fn circle(&self, id: NodeId) -> Circle {
        self.circles[id.idx()]
    }

    /// Iterate `(node, circle)` pairs in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Circle)> + '_ {
        self.hierarchy.iter().zip(self.circles.iter().copied())
    }

    /// Deepest node whose circle contains `point`, inflating every circle by `tolerance`.
    ///
    /// Returns `None` when the point only hits the background. When several nodes at the same
    /// depth match (only possible with a tolerance), the later one in pre-order wins.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for (id, circle) in self.iter() {
            if circle.center.distance(point) > circle.radius + tolerance {
                continue;
            }
            let deeper = best.is_none_or(|b| {
                self.hierarchy.depth(id) >= self.hierarchy.depth(b)
            });
            if deeper {
                best = Some(id);
            }
        }
        best
    }
}

fn outer_radius(surface: Size, options: &PackOptions) -> Result<f64, InvalidInput> {
    let degenerate = || InvalidInput::DegenerateSurface {
        width: surface.width,
        height: surface.height,
        padding: options.padding,
    };
    if !(surface.is_finite() && options.padding.is_finite() && options.padding >= 0.0) {
        return Err(degenerate());
    }
    let radius = surface.min_side() / 2.0 - options.padding;
    if radius > 0.0 {
        Ok(radius)
    } else {
        Err(degenerate())
    }
}

/// Per-node packing inputs derived once from the hierarchy.
struct Packer<'a> {
    hierarchy: &'a Hierarchy,
    /// `weight × bias`, the value that drives circle areas.
    layout_weight: Vec<f64>,
    /// Uniform scale of a node's child frame, so explicit weights and biases inflate the
    /// whole subtree instead of distorting it.
    frame_scale: Vec<f64>,
    /// Product of `frame_scale` from the root down to the node, inclusive.
    cumulative_scale: Vec<f64>,
    /// Internal nodes with a positive layout weight whose children all weigh zero. They are
    /// sized like leaves and their children collapse onto the center.
    solid: Vec<bool>,
    /// Children in packing order: heaviest first, input order on ties.
    order: Vec<Vec<NodeId>>,
}

/// Result of one packing pass, in parent-frame units.
struct Pass {
    radius: Vec<f64>,
    offset: Vec<Point>,
}

impl<'a> Packer<'a> {
    fn new(hierarchy: &'a Hierarchy) -> Self {
        let n = hierarchy.len();
        let mut layout_weight = alloc::vec![0.0; n];
        let mut frame_scale = alloc::vec![1.0; n];
        let mut solid = alloc::vec![false; n];
        for id in hierarchy.iter().rev() {
            let children = hierarchy.children(id);
            let bias = hierarchy.bias(id);
            if children.is_empty() {
                layout_weight[id.idx()] = hierarchy.weight(id) * bias;
                continue;
            }
            let natural: f64 = children.iter().map(|c| layout_weight[c.idx()]).sum();
            let own = if hierarchy.has_explicit_weight(id) {
                hierarchy.weight(id)
            } else {
                natural
            };
            layout_weight[id.idx()] = own * bias;
            if natural > 0.0 {
                frame_scale[id.idx()] = (layout_weight[id.idx()] / natural).sqrt();
            } else {
                solid[id.idx()] = layout_weight[id.idx()] > 0.0;
            }
        }

        let mut cumulative_scale = alloc::vec![1.0; n];
        for id in hierarchy.iter() {
            let above = hierarchy
                .parent(id)
                .map_or(1.0, |p| cumulative_scale[p.idx()]);
            cumulative_scale[id.idx()] = above * frame_scale[id.idx()];
        }

        let order = hierarchy
            .iter()
            .map(|id| {
                let mut children = hierarchy.children(id).to_vec();
                children.sort_by(|a, b| {
                    layout_weight[b.idx()].total_cmp(&layout_weight[a.idx()])
                });
                children
            })
            .collect();

        Self {
            hierarchy,
            layout_weight,
            frame_scale,
            cumulative_scale,
            solid,
            order,
        }
    }

    fn layout(
        &self,
        surface: Size,
        outer: f64,
        options: &PackOptions,
    ) -> Result<Vec<Circle>, InvalidInput> {
        let root = self.hierarchy.root();
        let empty = || InvalidInput::EmptyTree {
            root: self.hierarchy.name(root).into(),
        };

        // First pass without padding to learn the layout-to-pixel scale, so the second pass
        // can express the pixel gap in layout units.
        let unpadded = self.pass(|_| 0.0);
        let root_radius = unpadded.radius[root.idx()];
        if !(root_radius > 0.0 && root_radius.is_finite()) {
            return Err(empty());
        }
        let gap = options.sibling_padding.max(0.0);
        let pass = if gap > 0.0 {
            let scale = outer / root_radius;
            self.pass(|id| {
                let frame = scale * self.cumulative_scale[id.idx()];
                if frame > 0.0 { gap / (2.0 * frame) } else { 0.0 }
            })
        } else {
            unpadded
        };

        let scale = outer / pass.radius[root.idx()];
        let mut circles = alloc::vec![Circle::new(Point::ORIGIN, 0.0); self.hierarchy.len()];
        circles[root.idx()] = Circle::new(surface.to_rect().center(), outer);
        for id in self.hierarchy.iter().skip(1) {
            let Some(parent) = self.hierarchy.parent(id) else {
                unreachable!("only the root lacks a parent");
            };
            let frame = scale * self.cumulative_scale[parent.idx()];
            let origin = circles[parent.idx()].center;
            circles[id.idx()] = Circle::new(
                origin + pass.offset[id.idx()].to_vec2() * frame,
                pass.radius[id.idx()] * frame,
            );
        }
        Ok(circles)
    }

    /// Pack bottom-up. `padding(node)` is the inflation applied to that node's children, in
    /// the node's own frame units.
    fn pass(&self, padding: impl Fn(NodeId) -> f64) -> Pass {
        let n = self.hierarchy.len();
        let mut radius = alloc::vec![0.0; n];
        let mut offset = alloc::vec![Point::ORIGIN; n];
        let mut scratch: Vec<Circle> = Vec::new();
        for id in self.hierarchy.iter().rev() {
            let order = &self.order[id.idx()];
            if order.is_empty() {
                radius[id.idx()] = self.layout_weight[id.idx()].max(0.0).sqrt();
                continue;
            }
            let pad = padding(id);
            scratch.clear();
            scratch.extend(
                order
                    .iter()
                    .map(|c| Circle::new(Point::ORIGIN, radius[c.idx()] + pad)),
            );
            let enclosing = pack_siblings(&mut scratch);
            for (child, placed) in order.iter().zip(&scratch) {
                offset[child.idx()] = placed.center;
            }
            let packed = self.frame_scale[id.idx()] * (enclosing + pad);
            radius[id.idx()] = if self.solid[id.idx()] {
                packed.max(self.layout_weight[id.idx()].sqrt())
            } else {
                packed
            };
        }
        Pass { radius, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const EPS: f64 = 1e-6;

    fn design_methods() -> TreeNode {
        let pair = |name: &str, a: (&str, f64), b: (&str, f64)| {
            TreeNode::branch(name, [TreeNode::leaf(a.0, a.1), TreeNode::leaf(b.0, b.1)])
        };
        TreeNode::branch(
            "Design Methods",
            [
                TreeNode::branch(
                    "Analytical",
                    [
                        pair("Spatial Reasoning", ("Thresholds", 6.0), ("Comparisons", 6.0)),
                        pair("Index Logic", ("Synthesis", 7.0), ("Clarity First", 6.0)),
                    ],
                ),
                TreeNode::branch(
                    "Behavioral",
                    [
                        pair("Decision Context", ("Constraints", 6.0), ("Substitutions", 6.0)),
                        pair("Feedback Design", ("Cues", 7.0), ("Friction", 6.0)),
                    ],
                ),
                TreeNode::branch(
                    "Community",
                    [
                        TreeNode::branch("Neighborhoods", [TreeNode::leaf("Local", 7.0)]),
                        TreeNode::branch("Institutions", [TreeNode::leaf("Procurement", 8.0)]),
                    ],
                ),
                TreeNode::branch(
                    "Speculative",
                    [TreeNode::branch("Futures", [TreeNode::leaf("Agency", 10.0)])],
                ),
            ],
        )
    }

    fn assert_geometry(layout: &Layout) {
        let h = layout.hierarchy();
        for id in h.iter().skip(1) {
            let parent = h.parent(id).unwrap();
            let (c, p) = (layout.circle(id), layout.circle(parent));
            assert!(
                c.center.distance(p.center) + c.radius <= p.radius + EPS,
                "`{}` escapes `{}`",
                h.name(id),
                h.name(parent)
            );
        }
        for id in h.iter() {
            let kids = h.children(id);
            for (i, &a) in kids.iter().enumerate() {
                for &b in &kids[i + 1..] {
                    let (ca, cb) = (layout.circle(a), layout.circle(b));
                    assert!(
                        ca.center.distance(cb.center) >= ca.radius + cb.radius - EPS,
                        "`{}` overlaps `{}`",
                        h.name(a),
                        h.name(b)
                    );
                }
            }
        }
    }

    #[test]
    fn root_is_centered_and_bounded() {
        let layout = Layout::build(&design_methods(), Size::new(900.0, 700.0), 40.0).unwrap();
        let root = layout.circle(layout.root());
        assert_eq!(root.center, Point::new(450.0, 350.0));
        assert_eq!(root.radius, 310.0);
    }

    #[test]
    fn containment_and_non_overlap() {
        for surface in [Size::new(900.0, 900.0), Size::new(320.0, 640.0)] {
            let layout = Layout::build(&design_methods(), surface, 10.0).unwrap();
            assert_geometry(&layout);
        }
        let tight = Layout::build_with(
            &design_methods(),
            Size::new(500.0, 500.0),
            &PackOptions {
                padding: 0.0,
                sibling_padding: 0.0,
            },
        )
        .unwrap();
        assert_geometry(&tight);
    }

    #[test]
    fn two_leaves_follow_weight_ratio() {
        let tree = TreeNode::branch("A", [TreeNode::leaf("B", 6.0), TreeNode::leaf("C", 4.0)]);
        let layout = Layout::build(&tree, Size::new(600.0, 600.0), 20.0).unwrap();
        let h = layout.hierarchy();
        let b = layout.circle(h.find_path(&["B"]).unwrap());
        let c = layout.circle(h.find_path(&["C"]).unwrap());
        let ratio = b.radius / c.radius;
        assert!((ratio - 1.5_f64.sqrt()).abs() < 1e-9, "ratio {ratio}");
        assert_eq!(h.weight(h.root()), 10.0);
        assert_geometry(&layout);
    }

    #[test]
    fn heavier_twins_take_proportional_area() {
        let twin = |name: &str, w: f64| {
            TreeNode::branch(
                name,
                [TreeNode::leaf("x", w), TreeNode::leaf("y", w), TreeNode::leaf("z", w / 2.0)],
            )
        };
        let tree = TreeNode::branch("root", [twin("light", 2.0), twin("heavy", 6.0)]);
        let layout = Layout::build_with(
            &tree,
            Size::new(800.0, 800.0),
            &PackOptions {
                padding: 0.0,
                sibling_padding: 0.0,
            },
        )
        .unwrap();
        let h = layout.hierarchy();
        let light = layout.circle(h.find_path(&["light"]).unwrap());
        let heavy = layout.circle(h.find_path(&["heavy"]).unwrap());
        let area_ratio = (heavy.radius * heavy.radius) / (light.radius * light.radius);
        assert!((area_ratio - 3.0).abs() < 1e-6, "area ratio {area_ratio}");
    }

    #[test]
    fn bias_inflates_layout_but_not_weight() {
        let tree = TreeNode::branch(
            "root",
            [
                TreeNode::branch("plain", [TreeNode::leaf("a", 4.0), TreeNode::leaf("b", 4.0)]),
                TreeNode::branch("biased", [TreeNode::leaf("a", 4.0), TreeNode::leaf("b", 4.0)])
                    .with_bias(2.0),
            ],
        );
        let layout = Layout::build_with(
            &tree,
            Size::new(800.0, 800.0),
            &PackOptions {
                padding: 0.0,
                sibling_padding: 0.0,
            },
        )
        .unwrap();
        let h = layout.hierarchy();
        let plain = h.find_path(&["plain"]).unwrap();
        let biased = h.find_path(&["biased"]).unwrap();
        assert_eq!(h.weight(plain), h.weight(biased));
        let (p, b) = (layout.circle(plain), layout.circle(biased));
        let area_ratio = (b.radius * b.radius) / (p.radius * p.radius);
        assert!((area_ratio - 2.0).abs() < 1e-6, "area ratio {area_ratio}");
        assert_geometry(&layout);
    }

    #[test]
    fn explicit_internal_weight_scales_subtree() {
        let tree = TreeNode::branch(
            "root",
            [
                TreeNode::branch("sum", [TreeNode::leaf("a", 1.0), TreeNode::leaf("b", 1.0)]),
                TreeNode::branch("override", [TreeNode::leaf("a", 1.0), TreeNode::leaf("b", 1.0)])
                    .with_weight(8.0),
            ],
        );
        let opts = PackOptions {
            padding: 0.0,
            sibling_padding: 0.0,
        };
        let layout = Layout::build_with(&tree, Size::new(400.0, 400.0), &opts).unwrap();
        let h = layout.hierarchy();
        let sum = layout.circle(h.find_path(&["sum"]).unwrap());
        let over = layout.circle(h.find_path(&["override"]).unwrap());
        let area_ratio = (over.radius * over.radius) / (sum.radius * sum.radius);
        assert!((area_ratio - 4.0).abs() < 1e-6, "area ratio {area_ratio}");
        assert_eq!(h.weight(h.root()), 10.0);
        assert_geometry(&layout);
    }

    #[test]
    fn deterministic_and_input_order_ties() {
        let tree = TreeNode::branch(
            "root",
            [
                TreeNode::leaf("first", 1.0),
                TreeNode::leaf("second", 1.0),
                TreeNode::leaf("third", 1.0),
            ],
        );
        let size = Size::new(300.0, 300.0);
        let a = Layout::build(&tree, size, 5.0).unwrap();
        let b = Layout::build(&tree, size, 5.0).unwrap();
        for ((_, ca), (_, cb)) in a.iter().zip(b.iter()) {
            assert_eq!(ca.center, cb.center);
            assert_eq!(ca.radius, cb.radius);
        }
        // With equal weights the first input child is placed first, left of the second.
        let h = a.hierarchy();
        let first = a.circle(h.find_path(&["first"]).unwrap());
        let second = a.circle(h.find_path(&["second"]).unwrap());
        assert!(first.center.x < second.center.x);
    }

    #[test]
    fn single_node_tree() {
        let layout = Layout::build(&TreeNode::leaf("solo", 3.0), Size::new(100.0, 80.0), 0.0)
            .unwrap();
        let root = layout.circle(layout.root());
        assert_eq!(root.center, Point::new(50.0, 40.0));
        assert_eq!(root.radius, 40.0);
    }

    #[test]
    fn rejects_empty_and_degenerate_input() {
        let size = Size::new(200.0, 200.0);
        assert!(matches!(
            Layout::build(&TreeNode::new("nothing"), size, 10.0),
            Err(InvalidInput::EmptyTree { .. })
        ));
        let zeros = TreeNode::branch("z", vec![TreeNode::leaf("a", 0.0), TreeNode::leaf("b", 0.0)]);
        assert!(matches!(
            Layout::build(&zeros, size, 10.0),
            Err(InvalidInput::EmptyTree { .. })
        ));
        let tree = TreeNode::branch("ok", [TreeNode::leaf("a", 1.0)]);
        assert!(matches!(
            Layout::build(&tree, Size::new(50.0, 10.0), 5.0),
            Err(InvalidInput::DegenerateSurface { .. })
        ));
        assert!(matches!(
            Layout::build(&tree, Size::new(f64::INFINITY, 10.0), 0.0),
            Err(InvalidInput::DegenerateSurface { .. })
        ));
        assert!(matches!(
            Layout::build(&TreeNode::branch("n", [TreeNode::leaf("a", -2.0)]), size, 1.0),
            Err(InvalidInput::NegativeWeight { .. })
        ));
    }

    #[test]
    fn zero_weight_leaf_is_a_point_inside_parent() {
        let tree = TreeNode::branch("r", [TreeNode::leaf("a", 5.0), TreeNode::leaf("ghost", 0.0)]);
        let layout = Layout::build(&tree, Size::new(200.0, 200.0), 10.0).unwrap();
        let ghost = layout.hierarchy().find_path(&["ghost"]).unwrap();
        assert_eq!(layout.circle(ghost).radius, 0.0);
        assert_geometry(&layout);
    }

    #[test]
    fn explicit_weight_over_zero_children_sizes_like_a_leaf() {
        let tree = TreeNode::branch(
            "r",
            [
                TreeNode::branch("A", [TreeNode::leaf("x", 0.0)]).with_weight(5.0),
                TreeNode::leaf("B", 5.0),
            ],
        );
        let layout = Layout::build(&tree, Size::new(400.0, 400.0), 10.0).unwrap();
        let h = layout.hierarchy();
        let a = h.find_path(&["A"]).unwrap();
        let b = h.find_path(&["B"]).unwrap();
        let x = h.find_path(&["A", "x"]).unwrap();
        assert_eq!(h.weight(a), 5.0);
        let (ca, cb) = (layout.circle(a), layout.circle(b));
        assert!(
            (ca.radius - cb.radius).abs() < EPS,
            "equal weights, equal radii: {} vs {}",
            ca.radius,
            cb.radius
        );
        assert!(layout.circle(x).center.distance(ca.center) < EPS);
        assert_eq!(layout.circle(x).radius, 0.0);
        let near_center = ca.center + kurbo::Vec2::new(1.0, 0.0);
        assert_eq!(layout.hit_test(near_center, 0.0), Some(a));
        assert_geometry(&layout);

        let solo = TreeNode::branch("r", [TreeNode::new("x")]).with_weight(5.0);
        let layout = Layout::build(&solo, Size::new(200.0, 200.0), 10.0).unwrap();
        let root = layout.circle(layout.root());
        assert_eq!(root.radius, 90.0);
        let x = layout.hierarchy().find_path(&["x"]).unwrap();
        assert!(layout.circle(x).center.distance(root.center) < EPS);
        assert_geometry(&layout);
    }

    #[test]
    fn resized_keeps_hierarchy() {
        let layout = Layout::build(&design_methods(), Size::new(400.0, 400.0), 10.0).unwrap();
        let bigger = layout.resized(Size::new(800.0, 600.0)).unwrap();
        assert_eq!(bigger.hierarchy().len(), layout.hierarchy().len());
        assert_eq!(bigger.circle(bigger.root()).radius, 290.0);
        assert_geometry(&bigger);
    }

    #[test]
    fn hit_test_returns_deepest() {
        let layout = Layout::build(&design_methods(), Size::new(600.0, 600.0), 10.0).unwrap();
        let h = layout.hierarchy();
        let agency = h.find_path(&["Speculative", "Futures", "Agency"]).unwrap();
        assert_eq!(layout.hit_test(layout.circle(agency).center, 0.0), Some(agency));
        assert_eq!(layout.hit_test(Point::new(1.0, 1.0), 0.0), None);
        let root = layout.circle(layout.root());
        let rim = root.center + kurbo::Vec2::new(root.radius - 0.5, 0.0);
        assert_eq!(layout.hit_test(rim, 0.0), Some(layout.root()));
    }
}
