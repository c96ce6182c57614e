// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The "Design Methods" figure driven by a scripted pointer session, rendered to SVG.
//!
//! This example shows how to:
//! - load a weighted tree from JSON (`circlet_pack` with the `serde` feature),
//! - mount a `HierarchyFocusView` on a surface,
//! - feed pointer, resize and keyboard events with host timestamps,
//! - replay each frame's `DrawList` into a small SVG backend, with the figure's title and
//!   interaction hint drawn on top.
//!
//! Run:
//! - `cargo run -p circlet_demos --example design_methods > design_methods.svg`
//! - `RUST_LOG=circlet_view=debug cargo run -p circlet_demos --example design_methods`
//!
//! Pass a directory as the first argument to also write every frame as `frame-NNN.svg`.

use std::fmt::Write as _;
use std::path::PathBuf;

use circlet_pack::TreeNode;
use circlet_view::{
    Backend, CircleCommand, Color, HierarchyFocusView, LabelCommand, ViewEvent, ViewOptions,
};
use kurbo::{Point, Size};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DESIGN_METHODS: &str = r#"{
  "name": "Design Methods",
  "value": 100,
  "children": [
    { "name": "Analytical", "value": 25, "children": [
      { "name": "Spatial reasoning", "value": 8, "children": [
        { "name": "Threshold reading", "value": 4 },
        { "name": "Comparative overlays", "value": 4 }
      ]},
      { "name": "Index-as-argument", "value": 9, "children": [
        { "name": "Synthesis narrative", "value": 9 }
      ]}
    ]},
    { "name": "Behavioral", "value": 25, "children": [
      { "name": "Decision conditions", "value": 8, "children": [
        { "name": "Constraints framing", "value": 4 },
        { "name": "Substitution pathways", "value": 4 }
      ]},
      { "name": "Feedback design", "value": 9, "children": [
        { "name": "Cues + friction", "value": 9 }
      ]}
    ]},
    { "name": "Interface-driven", "short": "Interface", "value": 25, "children": [
      { "name": "Translation layer", "value": 8, "children": [
        { "name": "Legibility patterns", "value": 4 },
        { "name": "Actionability heuristics", "value": 4 }
      ]},
      { "name": "Interaction grammar", "value": 9, "children": [
        { "name": "Hover highlight", "value": 4 },
        { "name": "Scenario toggles", "value": 5 }
      ]}
    ]},
    { "name": "Community-scale", "value": 15, "children": [
      { "name": "Neighborhood scenarios", "value": 7, "children": [
        { "name": "Localized interventions", "value": 7 }
      ]},
      { "name": "Institutional pathways", "value": 8, "children": [
        { "name": "Procurement levers", "value": 8 }
      ]}
    ]},
    { "name": "Speculative", "value": 10, "bias": 1.3, "children": [
      { "name": "Futures", "value": 10, "children": [
        { "name": "Risk & agency", "value": 10 }
      ]}
    ]}
  ]
}"#;

/// Collects draw commands into an SVG document.
#[derive(Debug, Default)]
struct SvgBackend {
    body: String,
    size: Size,
}

const TITLE: &str = "Design Methods";
const HINT: &str = "Click circles to zoom | Click background to zoom out";
const TITLE_COLOR: Color = Color::from_rgb_u32(0x444444);
const HINT_COLOR: Color = Color::from_rgb_u32(0xbbbbbb);

impl SvgBackend {
    /// Close the document, drawing the figure title and the interaction hint on top.
    fn finish(mut self) -> String {
        let (w, h) = (self.size.width, self.size.height);
        let _ = writeln!(
            self.body,
            "  <text x=\"{:.2}\" y=\"20\" text-anchor=\"middle\" font-size=\"16\" \
             font-weight=\"600\" fill=\"{TITLE_COLOR}\">{TITLE}</text>",
            w / 2.0,
        );
        let _ = writeln!(
            self.body,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"9\" \
             fill=\"{HINT_COLOR}\">{HINT}</text>",
            w / 2.0,
            h - 8.0,
        );
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" font-family=\"Lexend Deca, sans-serif\">\n{body}</svg>\n",
            body = self.body,
        )
    }
}

impl Backend for SvgBackend {
    fn background(&mut self, size: Size, color: Color) {
        self.size = size;
        let _ = writeln!(
            self.body,
            "  <rect width=\"{}\" height=\"{}\" fill=\"{color}\"/>",
            size.width, size.height
        );
    }

    fn circle(&mut self, c: &CircleCommand) {
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" fill-opacity=\"{}\" \
             stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"><title>{}</title></circle>",
            c.circle.center.x,
            c.circle.center.y,
            c.circle.radius,
            c.fill,
            c.opacity.fill,
            c.stroke,
            c.opacity.stroke,
            c.stroke_width,
            escape(&c.tooltip),
        );
    }

    fn label(&mut self, l: &LabelCommand) {
        let _ = writeln!(
            self.body,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" \
             font-size=\"{}px\" font-weight=\"{}\" fill=\"{}\" data-max-width=\"{:.1}\">{}</text>",
            l.position.x,
            l.position.y,
            l.font_size,
            l.font_weight,
            l.color,
            l.max_width,
            escape(&l.text),
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circlet_view=debug,circlet_pack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let frame_dir = std::env::args_os().nth(1).map(PathBuf::from);
    let tree: TreeNode = serde_json::from_str(DESIGN_METHODS)?;
    let mut view =
        HierarchyFocusView::mount(&Size::new(900.0, 900.0), &tree, ViewOptions::default())?;

    let center_of = |view: &HierarchyFocusView, path: &[&str]| -> Option<Point> {
        let node = view.layout().hierarchy().find_path(path)?;
        view.render().circle_for(node).map(|c| c.circle.center)
    };

    let behavioral = center_of(&view, &["Behavioral"]).ok_or("missing Behavioral")?;
    let mut script: Vec<(u64, ViewEvent)> = vec![
        (0, ViewEvent::PointerMove(behavioral)),
        (40, ViewEvent::PointerDown(behavioral)),
        (90, ViewEvent::PointerUp(behavioral)),
    ];
    // Halfway into the zoom, the window is resized; the transition is cancelled and the
    // view snaps to Behavioral at the new size.
    script.push((390, ViewEvent::Resize(Size::new(1200.0, 800.0))));

    let mut frames = Vec::new();
    let mut now = 0;
    let mut pending = script.into_iter().peekable();
    while now <= 3_000 {
        while let Some((_, event)) = pending.next_if(|(at, _)| *at <= now) {
            if view.handle(event, now)? {
                tracing::info!(?event, now, "event changed the view");
            }
        }
        view.tick(now);
        if now % 100 == 0 {
            frames.push(view.render());
        }
        if now == 1_000 {
            // Dive into a leaf, then press Escape once it has settled.
            let leaf = center_of(&view, &["Behavioral", "Feedback design", "Cues + friction"])
                .ok_or("missing leaf")?;
            view.handle(ViewEvent::PointerDown(leaf), now)?;
            view.handle(ViewEvent::PointerUp(leaf), now + 20)?;
        }
        if now == 2_000 {
            view.handle(ViewEvent::Escape, now)?;
        }
        now += 10;
    }

    let focus = view.focus();
    tracing::info!(
        frames = frames.len(),
        focus = view.layout().hierarchy().name(focus),
        "session finished"
    );

    if let Some(dir) = frame_dir {
        std::fs::create_dir_all(&dir)?;
        for (i, frame) in frames.iter().enumerate() {
            let mut svg = SvgBackend::default();
            frame.replay(&mut svg);
            std::fs::write(dir.join(format!("frame-{i:03}.svg")), svg.finish())?;
        }
    }

    let mut svg = SvgBackend::default();
    view.render().replay(&mut svg);
    print!("{}", svg.finish());
    Ok(())
}
