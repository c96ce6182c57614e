// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors, opacity tiers and typography.

use core::fmt;

use circlet_pack::Category;

/// Opaque sRGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "each channel is masked to its low byte on purpose."
    )]
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// Formats as a CSS hex color, e.g. `#fafaf9`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How strongly a circle is drawn relative to the current focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// The focus node itself.
    Focused,
    /// On the path from the root to the focus, or in the hovered lineage.
    Lineage,
    /// Everything else.
    Unrelated,
}

/// Fill and stroke opacity pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Opacity {
    /// Fill opacity in `[0, 1]`.
    pub fill: f64,
    /// Stroke opacity in `[0, 1]`.
    pub stroke: f64,
}

/// Fill and stroke color pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Circle fill.
    pub fill: Color,
    /// Circle outline.
    pub stroke: Color,
}

/// Text style for one label tier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LabelStyle {
    /// Font size in pixels.
    pub size: f64,
    /// Font size once the circle is comfortably large.
    pub large_size: f64,
    /// Font weight.
    pub weight: u16,
    /// Font weight while the node is in the hovered lineage.
    pub hover_weight: u16,
    /// Text color.
    pub color: Color,
}

/// Visual configuration for [`render`](crate::render).
///
/// `Theme::default()` reproduces the "Design Methods" figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Surface background.
    pub background: Color,
    /// Colors for ordinary circles.
    pub base: Palette,
    /// Colors for accented circles.
    pub accent_palette: Palette,
    /// Category that receives the accent palette when focused or hovered; `None` disables it.
    pub accent: Option<Category>,
    /// Opacity of the focus node.
    pub focused: Opacity,
    /// Opacity of the root-to-focus path and of the hovered lineage.
    pub lineage: Opacity,
    /// Opacity of everything else.
    pub unrelated: Opacity,
    /// Displayed radius, in pixels, a focus child needs before its label is shown.
    pub label_threshold: f64,
    /// Labels of the root's children.
    pub top_label: LabelStyle,
    /// Labels below depth 1.
    pub nested_label: LabelStyle,
    /// Outline width of the root's children.
    pub top_stroke_width: f64,
    /// Outline width of every other circle.
    pub nested_stroke_width: f64,
    /// Smallest wrapping width handed to label backends.
    pub min_label_width: f64,
    /// Label wrapping width as a multiple of the displayed radius.
    pub label_width_factor: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u32(0xfafaf9),
            base: Palette {
                fill: Color::from_rgb_u32(0xf5f5f5),
                stroke: Color::from_rgb_u32(0xd8d8d8),
            },
            accent_palette: Palette {
                fill: Color::from_rgb_u32(0xf2f7eb),
                stroke: Color::from_rgb_u32(0xa8c48a),
            },
            accent: Some(Category::Behavioral),
            focused: Opacity {
                fill: 0.18,
                stroke: 0.6,
            },
            lineage: Opacity {
                fill: 0.12,
                stroke: 0.35,
            },
            unrelated: Opacity {
                fill: 0.05,
                stroke: 0.15,
            },
            label_threshold: 20.0,
            top_label: LabelStyle {
                size: 14.0,
                large_size: 16.0,
                weight: 600,
                hover_weight: 600,
                color: Color::from_rgb_u32(0x222222),
            },
            nested_label: LabelStyle {
                size: 11.0,
                large_size: 12.0,
                weight: 400,
                hover_weight: 500,
                color: Color::from_rgb_u32(0x444444),
            },
            top_stroke_width: 2.5,
            nested_stroke_width: 1.2,
            min_label_width: 30.0,
            label_width_factor: 1.4,
        }
    }
}

impl Theme {
    /// Opacity pair for an emphasis tier.
    pub fn opacity(&self, emphasis: Emphasis) -> Opacity {
        match emphasis {
            Emphasis::Focused => self.focused,
            Emphasis::Lineage => self.lineage,
            Emphasis::Unrelated => self.unrelated,
        }
    }

    /// Colors for a circle of `category`; `highlighted` is true for the focus node and for
    /// nodes in the hovered lineage.
    pub fn palette(&self, category: Category, highlighted: bool) -> Palette {
        if highlighted && self.accent == Some(category) {
            self.accent_palette
        } else {
            self.base
        }
    }

    /// Label style tier for a node at `depth`.
    pub fn label_style(&self, depth: u16) -> &LabelStyle {
        if depth <= 1 {
            &self.top_label
        } else {
            &self.nested_label
        }
    }

    /// Outline width for a node at `depth`.
    pub fn stroke_width(&self, depth: u16) -> f64 {
        if depth == 1 {
            self.top_stroke_width
        } else {
            self.nested_stroke_width
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn colors_format_as_hex() {
        assert_eq!(Color::from_rgb_u32(0xfafaf9).to_string(), "#fafaf9");
        assert_eq!(Color::rgb(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn three_distinct_tiers() {
        let theme = Theme::default();
        let f = theme.opacity(Emphasis::Focused);
        let l = theme.opacity(Emphasis::Lineage);
        let u = theme.opacity(Emphasis::Unrelated);
        assert!(f.fill > l.fill && l.fill > u.fill, "fill tiers are ordered");
        assert!(f.stroke > l.stroke && l.stroke > u.stroke, "stroke tiers are ordered");
    }

    #[test]
    fn accent_only_when_highlighted() {
        let theme = Theme::default();
        assert_eq!(theme.palette(Category::Behavioral, true), theme.accent_palette);
        assert_eq!(theme.palette(Category::Behavioral, false), theme.base);
        assert_eq!(theme.palette(Category::Analytical, true), theme.base);
        let plain = Theme {
            accent: None,
            ..Theme::default()
        };
        assert_eq!(plain.palette(Category::Behavioral, true), plain.base);
    }

    #[test]
    fn depth_tiers() {
        let theme = Theme::default();
        assert_eq!(theme.stroke_width(1), 2.5);
        assert_eq!(theme.stroke_width(0), 1.2);
        assert_eq!(theme.stroke_width(3), 1.2);
        assert_eq!(theme.label_style(1).weight, 600);
        assert_eq!(theme.label_style(2).hover_weight, 500);
    }
}
