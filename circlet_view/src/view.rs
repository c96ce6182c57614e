// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoomable focus view: layout, state, transitions and input in one place.

use alloc::string::String;
use alloc::vec::Vec;

use circlet_pack::{InvalidInput, Layout, NodeId, PackOptions, TreeNode};
use kurbo::{Point, Size};

use crate::pointer::{ClickResult, ClickState, ClickTarget};
use crate::render::{DrawList, render};
use crate::state::{HighlightSet, ViewState};
use crate::style::Theme;
use crate::tween::{Easing, Tween, TweenFrame};
use crate::window::ViewWindow;

/// Errors raised while mounting or rebuilding a view.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ViewError {
    /// The tree or the surface size was rejected by the layout.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    /// The host surface is missing or reports an unusable size.
    #[error("surface is unavailable or has no usable size")]
    SurfaceUnavailable {
        /// Size reported by the surface, if any.
        size: Option<Size>,
    },
}

/// Host surface a view is mounted on.
pub trait Surface {
    /// Current size in pixels, or `None` if the surface does not exist (yet).
    fn pixel_size(&self) -> Option<Size>;
}

impl Surface for Size {
    fn pixel_size(&self) -> Option<Size> {
        Some(*self)
    }
}

impl Surface for Option<Size> {
    fn pixel_size(&self) -> Option<Size> {
        *self
    }
}

/// Input delivered to [`HierarchyFocusView::handle`]. Positions are in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    /// Pointer moved.
    PointerMove(Point),
    /// Pointer left the surface.
    PointerLeave,
    /// Primary button pressed.
    PointerDown(Point),
    /// Primary button released.
    PointerUp(Point),
    /// Surface changed size.
    Resize(Size),
    /// Escape key.
    Escape,
}

/// Configuration of a [`HierarchyFocusView`].
#[derive(Clone, Debug, PartialEq)]
pub struct ViewOptions {
    /// Layout spacing.
    pub pack: PackOptions,
    /// Zoom transition length in milliseconds.
    pub transition_ms: u64,
    /// Zoom transition curve.
    pub easing: Easing,
    /// Colors, opacities and typography.
    pub theme: Theme,
    /// Pointer travel, in pixels, tolerated between press and release on different targets.
    pub click_distance: Option<f64>,
    /// Time, in milliseconds, tolerated between press and release on different targets.
    pub click_time_ms: Option<u64>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            pack: PackOptions::default(),
            transition_ms: 600,
            easing: Easing::CubicInOut,
            theme: Theme::default(),
            click_distance: Some(5.0),
            click_time_ms: Some(300),
        }
    }
}

/// A zoomable circle-packing view with focus, lineage and hover semantics.
///
/// The layout is computed once per tree and surface size. Zooming only moves the camera
/// window, animated by a single cancellable [`Tween`]: each new transition bumps a generation
/// counter, so only the latest one ever reports completion.
///
/// All time-dependent methods take a monotonic timestamp in milliseconds supplied by the host.
#[derive(Clone, Debug)]
pub struct HierarchyFocusView {
    layout: Layout,
    state: ViewState,
    options: ViewOptions,
    tween: Option<Tween>,
    generation: u64,
    clicks: ClickState,
}

impl HierarchyFocusView {
    /// Mount a view for `tree` on `surface`, focused on the root.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SurfaceUnavailable`] if the surface reports no size or a
    /// non-positive one, and [`ViewError::InvalidInput`] if the layout rejects the tree.
    pub fn mount(
        surface: &impl Surface,
        tree: &TreeNode,
        options: ViewOptions,
    ) -> Result<Self, ViewError> {
        let reported = surface.pixel_size();
        let Some(size) = reported.filter(|s| s.is_finite() && s.width > 0.0 && s.height > 0.0)
        else {
            tracing::warn!(?reported, "cannot mount view: surface unavailable");
            return Err(ViewError::SurfaceUnavailable { size: reported });
        };
        Self::new(tree, size, options)
    }

    /// Build a view for `tree` at a known surface `size`, focused on the root.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidInput`] if the layout rejects the tree or the size.
    pub fn new(tree: &TreeNode, size: Size, options: ViewOptions) -> Result<Self, ViewError> {
        let layout = Layout::build_with(tree, size, &options.pack)?;
        let state = ViewState::settled(&layout, layout.root());
        let clicks = ClickState::with_thresholds(options.click_distance, options.click_time_ms);
        Ok(Self {
            layout,
            state,
            options,
            tween: None,
            generation: 0,
            clicks,
        })
    }

    /// Current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// View configuration.
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Node currently focused.
    pub fn focus(&self) -> NodeId {
        self.state.focus
    }

    /// Generation of the latest transition; bumped by every zoom and every cancellation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The transition in flight, if any.
    pub fn transition(&self) -> Option<&Tween> {
        self.tween.as_ref()
    }

    /// Whether a zoom transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Draw commands for the current state.
    pub fn render(&self) -> DrawList {
        render(&self.layout, &self.state, &self.options.theme)
    }

    /// Highlight `node` and its ancestors. Focus is unchanged.
    pub fn hover(&mut self, node: NodeId) -> &HighlightSet {
        self.state
            .highlight
            .insert(HighlightSet::new(self.layout.hierarchy(), node))
    }

    /// Drop the hover highlight, reverting to focus styling. Returns `true` if one was active.
    pub fn hover_end(&mut self) -> bool {
        self.state.highlight.take().is_some()
    }

    /// Zoom to `target`, starting from wherever the camera is at `now_ms`.
    ///
    /// Returns `false` without touching anything when `target` is already the focus.
    pub fn zoom(&mut self, target: NodeId, now_ms: u64) -> bool {
        if target == self.state.focus {
            return false;
        }
        let from = self.window_at(now_ms);
        let to = ViewWindow::around(self.layout.circle(target), self.layout.options().padding);
        self.generation += 1;
        self.tween = Some(Tween::new(
            from,
            to,
            now_ms,
            self.options.transition_ms,
            self.options.easing,
            self.generation,
        ));
        self.state.focus = target;
        self.state.window = from;
        self.state.highlight = None;
        tracing::debug!(
            node = self.layout.hierarchy().name(target),
            generation = self.generation,
            "zoom"
        );
        true
    }

    /// Respond to a click: nodes become the focus, the background returns to the root.
    pub fn click(&mut self, target: ClickTarget, now_ms: u64) -> bool {
        match target {
            ClickTarget::Node(node) => self.zoom(node, now_ms),
            ClickTarget::Background => self.zoom(self.layout.root(), now_ms),
        }
    }

    /// Return to the root.
    pub fn escape(&mut self, now_ms: u64) -> bool {
        self.zoom(self.layout.root(), now_ms)
    }

    /// Advance the transition to `now_ms`.
    ///
    /// Returns `None` when idle. The frame that reports `finished` settles the window on the
    /// exact target and ends the transition, so completion is reported once.
    pub fn tick(&mut self, now_ms: u64) -> Option<TweenFrame> {
        let frame = self.tween?.sample(now_ms);
        self.state.window = frame.window;
        if frame.finished {
            self.tween = None;
            tracing::debug!(generation = frame.generation, "transition settled");
        }
        Some(frame)
    }

    /// Rebuild the layout for a new surface size, keeping the focus.
    ///
    /// Any transition in flight is cancelled, a pending press is dropped, and the camera snaps
    /// to the focus.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidInput`] if the new size cannot hold the layout; the view is
    /// left unchanged in that case.
    pub fn resize(&mut self, size: Size) -> Result<(), ViewError> {
        let layout = self.layout.resized(size)?;
        self.cancel_transition();
        self.clicks.cancel();
        self.layout = layout;
        self.state.window =
            ViewWindow::around(self.layout.circle(self.state.focus), self.layout.options().padding);
        tracing::debug!(width = size.width, height = size.height, "resized view");
        Ok(())
    }

    /// Replace the data, keeping the focus if a node with the same name path still exists.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidInput`] if the new tree is rejected; the view is left
    /// unchanged in that case.
    pub fn replace_tree(&mut self, tree: &TreeNode) -> Result<(), ViewError> {
        let layout = Layout::build_with(tree, self.layout.surface(), &self.options.pack)?;
        let path: Vec<String> = self
            .layout
            .hierarchy()
            .name_path(self.state.focus)
            .into_iter()
            .map(String::from)
            .collect();
        let focus = layout.hierarchy().find_path(&path).unwrap_or_else(|| {
            tracing::debug!(?path, "focused node is gone, returning to root");
            layout.root()
        });
        self.cancel_transition();
        self.clicks.cancel();
        self.state = ViewState::settled(&layout, focus);
        self.layout = layout;
        Ok(())
    }

    /// Node under a surface-space point, using the camera at the last tick.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        let camera = self.state.camera(&self.layout);
        self.layout.hit_test(camera.to_layout(point), 0.0)
    }

    /// Feed one input event.
    ///
    /// Returns `true` when the view changed and should be redrawn.
    ///
    /// # Errors
    ///
    /// Only [`ViewEvent::Resize`] can fail; see [`HierarchyFocusView::resize`].
    pub fn handle(&mut self, event: ViewEvent, now_ms: u64) -> Result<bool, ViewError> {
        match event {
            ViewEvent::PointerMove(point) => {
                self.clicks.on_move(point);
                let hit = self.node_at(point);
                let current = self.state.highlight.as_ref().map(HighlightSet::hovered);
                if hit == current {
                    return Ok(false);
                }
                match hit {
                    Some(node) => {
                        self.hover(node);
                    }
                    None => {
                        self.hover_end();
                    }
                }
                Ok(true)
            }
            ViewEvent::PointerLeave => {
                self.clicks.cancel();
                Ok(self.hover_end())
            }
            ViewEvent::PointerDown(point) => {
                self.clicks.on_down(self.target_at(point), point, now_ms);
                Ok(false)
            }
            ViewEvent::PointerUp(point) => {
                match self.clicks.on_up(&self.target_at(point), point, now_ms) {
                    ClickResult::Click(target) => Ok(self.click(target, now_ms)),
                    ClickResult::Suppressed(_) => Ok(false),
                }
            }
            ViewEvent::Resize(size) => self.resize(size).map(|()| true),
            ViewEvent::Escape => Ok(self.escape(now_ms)),
        }
    }

    fn target_at(&self, point: Point) -> ClickTarget {
        self.node_at(point)
            .map_or(ClickTarget::Background, ClickTarget::Node)
    }

    fn window_at(&self, now_ms: u64) -> ViewWindow {
        self.tween
            .map_or(self.state.window, |t| t.sample(now_ms).window)
    }

    fn cancel_transition(&mut self) {
        if let Some(tween) = self.tween.take() {
            self.generation += 1;
            tracing::trace!(cancelled = tween.generation(), "transition cancelled");
        }
    }
}
