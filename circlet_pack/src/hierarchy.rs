// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pre-order arena over a validated [`TreeNode`].

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::InvalidInput;
use crate::tree::{Category, TreeNode};

/// Identifier of a node within one [`Hierarchy`].
///
/// Ids are dense pre-order indices: the root is always the first id, and every parent comes
/// before its children. An id is only meaningful for the hierarchy that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Pre-order position of this node.
    pub const fn index(self) -> usize {
        self.idx()
    }
}

/// Root-first lineage of a node: the node itself and all of its ancestors.
pub type Lineage = SmallVec<[NodeId; 8]>;

#[derive(Clone, Debug)]
struct Node {
    name: String,
    display_name: Option<String>,
    category: Category,
    weight: f64,
    explicit_weight: bool,
    bias: f64,
    depth: u16,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A validated weighted tree stored as a pre-order arena.
///
/// Ownership runs strictly root → children; each node additionally records its parent id,
/// which is only used for upward lookups ([`Hierarchy::ancestors`], [`Hierarchy::lineage`]).
#[derive(Clone, Debug)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    by_name: HashMap<(Option<NodeId>, String), NodeId>,
}

impl Hierarchy {
    /// Validate `tree` and flatten it.
    ///
    /// Weights are resolved bottom-up: explicit weights are kept, missing leaf weights are zero,
    /// missing internal weights are the sum of the children. Categories missing from the input
    /// are resolved from the node label.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] for negative or non-finite weights, non-positive biases, or
    /// duplicate sibling names. Empty trees are only rejected when packed.
    pub fn from_tree(tree: &TreeNode) -> Result<Self, InvalidInput> {
        let mut hierarchy = Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
        };
        let mut stack: Vec<(&TreeNode, Option<NodeId>, u16)> = alloc::vec![(tree, None, 0)];
        while let Some((input, parent, depth)) = stack.pop() {
            validate(input)?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            let id = NodeId(hierarchy.nodes.len() as u32);
            if hierarchy
                .by_name
                .insert((parent, input.name.clone()), id)
                .is_some()
            {
                let parent_name = parent.map_or_else(String::new, |p| {
                    hierarchy.nodes[p.idx()].name.clone()
                });
                return Err(InvalidInput::DuplicateSibling {
                    parent: parent_name,
                    name: input.name.clone(),
                });
            }
            hierarchy.nodes.push(Node {
                name: input.name.clone(),
                display_name: input.display_name.clone(),
                category: input
                    .category
                    .unwrap_or_else(|| Category::from_label(input.label())),
                weight: input.weight.unwrap_or(0.0),
                explicit_weight: input.weight.is_some(),
                bias: input.bias,
                depth,
                parent,
                children: Vec::with_capacity(input.children.len()),
            });
            if let Some(p) = parent {
                hierarchy.nodes[p.idx()].children.push(id);
            }
            // Reversed so that children pop, and therefore get ids, in input order.
            for child in input.children.iter().rev() {
                stack.push((child, Some(id), depth.saturating_add(1)));
            }
        }

        // Pre-order guarantees children sit after their parent, so a reverse sweep is bottom-up.
        for i in (0..hierarchy.nodes.len()).rev() {
            let node = &hierarchy.nodes[i];
            if node.explicit_weight || node.children.is_empty() {
                continue;
            }
            let sum = node
                .children
                .iter()
                .map(|c| hierarchy.nodes[c.idx()].weight)
                .sum();
            hierarchy.nodes[i].weight = sum;
        }
        Ok(hierarchy)
    }

    /// The root node.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a hierarchy holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` belongs to this hierarchy's id range.
    pub fn contains(&self, id: NodeId) -> bool {
        id.idx() < self.nodes.len()
    }

    /// Iterate all nodes in pre-order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = NodeId> + DoubleEndedIterator + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// Full name of a node.
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Label shown for a node: the short display name if present, otherwise the name.
    pub fn label(&self, id: NodeId) -> &str {
        let node = self.node(id);
        node.display_name.as_deref().unwrap_or(&node.name)
    }

    /// Resolved category of a node.
    pub fn category(&self, id: NodeId) -> Category {
        self.node(id).category
    }

    /// Reported weight: the explicit weight, or the sum of the children's weights.
    pub fn weight(&self, id: NodeId) -> f64 {
        self.node(id).weight
    }

    /// Returns true if the input carried an explicit weight for this node.
    pub fn has_explicit_weight(&self, id: NodeId) -> bool {
        self.node(id).explicit_weight
    }

    /// Layout-only bias of a node.
    pub fn bias(&self, id: NodeId) -> f64 {
        self.node(id).bias
    }

    /// Depth below the root (root is 0).
    pub fn depth(&self, id: NodeId) -> u16 {
        self.node(id).depth
    }

    /// Parent of a node, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of a node in input order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns true if the node has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).children.is_empty()
    }

    /// Walk from `id` up to the root, following parent links only.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            next: Some(id),
        }
    }

    /// The root-first path from the root down to `id`, inclusive.
    pub fn lineage(&self, id: NodeId) -> Lineage {
        let mut lineage: Lineage = self.ancestors(id).collect();
        lineage.reverse();
        lineage
    }

    /// Returns true if `ancestor` lies on the path from the root to `id` (inclusive).
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        // Ancestors are strictly shallower, so the walk can stop once it passes their depth.
        let depth = self.depth(ancestor);
        self.ancestors(id)
            .take_while(|n| self.depth(*n) >= depth)
            .any(|n| n == ancestor)
    }

    /// Human-readable path such as `"Design Methods → Behavioral → Cues"`.
    pub fn path_label(&self, id: NodeId) -> String {
        let mut out = String::new();
        for (i, n) in self.lineage(id).into_iter().enumerate() {
            if i > 0 {
                out.push_str(" → ");
            }
            out.push_str(self.name(n));
        }
        out
    }

    /// Look up a node by the names on its path below the root.
    ///
    /// An empty path returns the root.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut current = self.root();
        for name in path {
            current = *self
                .by_name
                .get(&(Some(current), String::from(name.as_ref())))?;
        }
        Some(current)
    }

    /// The names on the path from just below the root down to `id`.
    ///
    /// This is the inverse of [`Hierarchy::find_path`] and survives a rebuild of the tree.
    pub fn name_path(&self, id: NodeId) -> Vec<&str> {
        self.lineage(id)
            .into_iter()
            .skip(1)
            .map(|n| self.name(n))
            .collect()
    }

    /// Access a node; panics if `id` belongs to another hierarchy.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id.idx())
            .expect("NodeId does not belong to this hierarchy")
    }
}

/// Iterator returned by [`Hierarchy::ancestors`]: the node first, the root last.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    hierarchy: &'a Hierarchy,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

fn validate(node: &TreeNode) -> Result<(), InvalidInput> {
    if let Some(weight) = node.weight {
        if !weight.is_finite() {
            return Err(InvalidInput::NonFiniteWeight {
                name: node.name.clone(),
            });
        }
        if weight < 0.0 {
            return Err(InvalidInput::NegativeWeight {
                name: node.name.clone(),
                weight,
            });
        }
    }
    if !(node.bias.is_finite() && node.bias > 0.0) {
        return Err(InvalidInput::InvalidBias {
            name: node.name.clone(),
            bias: node.bias,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> TreeNode {
        TreeNode::branch(
            "Design Methods",
            [
                TreeNode::branch(
                    "Behavioral",
                    [
                        TreeNode::leaf("Constraints", 6.0),
                        TreeNode::leaf("Substitutions", 6.0),
                    ],
                ),
                TreeNode::branch("Speculative", [TreeNode::leaf("Agency", 10.0)])
                    .with_weight(4.0),
                TreeNode::leaf("Other", 1.0),
            ],
        )
    }

    #[test]
    fn ids_are_pre_order() {
        let h = Hierarchy::from_tree(&sample()).unwrap();
        let names: Vec<&str> = h.iter().map(|n| h.name(n)).collect();
        assert_eq!(
            names,
            [
                "Design Methods",
                "Behavioral",
                "Constraints",
                "Substitutions",
                "Speculative",
                "Agency",
                "Other"
            ]
        );
        assert_eq!(h.len(), 7);
        for id in h.iter().skip(1) {
            let parent = h.parent(id).unwrap();
            assert!(parent < id, "parents precede children");
            assert_eq!(h.depth(id), h.depth(parent) + 1);
        }
    }

    #[test]
    fn weights_sum_unless_explicit() {
        let h = Hierarchy::from_tree(&sample()).unwrap();
        let behavioral = h.find_path(&["Behavioral"]).unwrap();
        let speculative = h.find_path(&["Speculative"]).unwrap();
        assert_eq!(h.weight(behavioral), 12.0);
        assert!(!h.has_explicit_weight(behavioral));
        assert_eq!(h.weight(speculative), 4.0, "explicit weight wins over the sum");
        assert_eq!(h.weight(h.root()), 17.0);
    }

    #[test]
    fn categories_resolve_once() {
        let tree = TreeNode::branch(
            "root",
            [
                TreeNode::leaf("Behavioral", 1.0),
                TreeNode::leaf("Futures", 1.0).with_category(Category::Speculative),
                TreeNode::leaf("Interface-driven", 1.0).with_display_name("Interface"),
            ],
        );
        let h = Hierarchy::from_tree(&tree).unwrap();
        let kinds: Vec<Category> = h.iter().skip(1).map(|n| h.category(n)).collect();
        assert_eq!(
            kinds,
            [
                Category::Behavioral,
                Category::Speculative,
                Category::Interface
            ]
        );
    }

    #[test]
    fn lineage_is_root_first_for_every_node() {
        let h = Hierarchy::from_tree(&sample()).unwrap();
        for id in h.iter() {
            let lineage = h.lineage(id);
            assert_eq!(lineage.first().copied(), Some(h.root()));
            assert_eq!(lineage.last().copied(), Some(id));
            assert_eq!(lineage.len(), usize::from(h.depth(id)) + 1);
            for pair in lineage.windows(2) {
                assert_eq!(h.parent(pair[1]), Some(pair[0]));
            }
        }
        assert_eq!(h.lineage(h.root()).as_slice(), &[h.root()]);
    }

    #[test]
    fn ancestor_queries() {
        let h = Hierarchy::from_tree(&sample()).unwrap();
        let behavioral = h.find_path(&["Behavioral"]).unwrap();
        let cues = h.find_path(&["Behavioral", "Constraints"]).unwrap();
        let agency = h.find_path(&["Speculative", "Agency"]).unwrap();
        assert!(h.is_ancestor_of(h.root(), agency));
        assert!(h.is_ancestor_of(behavioral, cues));
        assert!(h.is_ancestor_of(cues, cues));
        assert!(!h.is_ancestor_of(behavioral, agency));
        assert!(!h.is_ancestor_of(cues, behavioral));
        assert_eq!(
            h.path_label(cues),
            "Design Methods → Behavioral → Constraints"
        );
        assert_eq!(h.name_path(cues), ["Behavioral", "Constraints"]);
        assert_eq!(h.find_path::<&str>(&[]), Some(h.root()));
        assert_eq!(h.find_path(&["Nope"]), None);
    }

    #[test]
    fn rejects_invalid_weights_and_bias() {
        let negative = TreeNode::branch("r", [TreeNode::leaf("x", -1.0)]);
        assert_eq!(
            Hierarchy::from_tree(&negative).unwrap_err(),
            InvalidInput::NegativeWeight {
                name: "x".into(),
                weight: -1.0
            }
        );

        let nan = TreeNode::branch("r", [TreeNode::leaf("x", f64::NAN)]);
        assert!(matches!(
            Hierarchy::from_tree(&nan),
            Err(InvalidInput::NonFiniteWeight { .. })
        ));

        let bias = TreeNode::branch("r", [TreeNode::leaf("x", 1.0).with_bias(0.0)]);
        assert!(matches!(
            Hierarchy::from_tree(&bias),
            Err(InvalidInput::InvalidBias { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_siblings_only() {
        let dup = TreeNode::branch("r", vec![TreeNode::leaf("x", 1.0), TreeNode::leaf("x", 2.0)]);
        assert_eq!(
            Hierarchy::from_tree(&dup).unwrap_err(),
            InvalidInput::DuplicateSibling {
                parent: "r".into(),
                name: "x".into()
            }
        );

        // Same name under different parents is fine.
        let cousins = TreeNode::branch(
            "r",
            [
                TreeNode::branch("a", [TreeNode::leaf("x", 1.0)]),
                TreeNode::branch("b", [TreeNode::leaf("x", 1.0)]),
            ],
        );
        assert!(Hierarchy::from_tree(&cousins).is_ok());
    }
}
