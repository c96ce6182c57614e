// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input schema: the hand-authored weighted tree.

use alloc::string::String;
use alloc::vec::Vec;

/// Typed category of a node, used by styling (for example accent colors).
///
/// When a [`TreeNode`] carries no explicit category, the [`Hierarchy`](crate::Hierarchy)
/// resolves one from its label with [`Category::from_label`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Category {
    /// Analytical methods (spatial reasoning, index logic).
    Analytical,
    /// Behavioral methods (decision context, feedback design).
    Behavioral,
    /// Interface-driven methods (translation, interaction).
    Interface,
    /// Community-scale methods (neighborhoods, institutions).
    Community,
    /// Speculative methods (futures).
    Speculative,
    /// Anything else.
    #[default]
    Uncategorized,
}

impl Category {
    /// Resolve a category from a node label.
    ///
    /// Matching is on the leading word, ignoring ASCII case, so both `"Interface"` and
    /// `"Interface-driven"` resolve to [`Category::Interface`].
    pub fn from_label(label: &str) -> Self {
        let head = label
            .split(|c: char| c.is_whitespace() || c == '-')
            .next()
            .unwrap_or("");
        const TABLE: [(&str, Category); 5] = [
            ("analytical", Category::Analytical),
            ("behavioral", Category::Behavioral),
            ("interface", Category::Interface),
            ("community", Category::Community),
            ("speculative", Category::Speculative),
        ];
        TABLE
            .iter()
            .find(|(key, _)| head.eq_ignore_ascii_case(key))
            .map_or(Self::Uncategorized, |&(_, category)| category)
    }
}

/// One node of the input tree.
///
/// Leaves without a weight weigh zero. Internal nodes without a weight weigh the sum of their
/// children. `bias` only inflates the node's area in the layout; the reported weight is untouched.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    /// Display label, unique among siblings.
    pub name: String,
    /// Optional short label shown instead of `name`.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "short", skip_serializing_if = "Option::is_none")
    )]
    pub display_name: Option<String>,
    /// Explicit weight; `None` means "derived".
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "value", skip_serializing_if = "Option::is_none")
    )]
    pub weight: Option<f64>,
    /// Layout-only area multiplier.
    #[cfg_attr(feature = "serde", serde(default = "unit_bias"))]
    pub bias: f64,
    /// Explicit category; `None` resolves from the label.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub category: Option<Category>,
    /// Children in input order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<TreeNode>,
}

#[cfg(feature = "serde")]
fn unit_bias() -> f64 {
    1.0
}

impl TreeNode {
    /// Create a childless node with no weight.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            weight: None,
            bias: 1.0,
            category: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf with an explicit weight.
    pub fn leaf(name: impl Into<String>, weight: f64) -> Self {
        Self::new(name).with_weight(weight)
    }

    /// Create an internal node whose weight is derived from `children`.
    pub fn branch(name: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        Self {
            children: children.into_iter().collect(),
            ..Self::new(name)
        }
    }

    /// Set an explicit weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the short label.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the layout bias.
    #[must_use]
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Set an explicit category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// The label shown for this node.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
