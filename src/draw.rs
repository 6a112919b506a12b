//! Canvas overlays for the detected face.
//! Purely cosmetic: a frame without enough landmarks simply draws less.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::detector::Point;

pub const MARKER_RADIUS: f64 = 2.0;
pub const MARKER_STYLE: &str = "white";
pub const EMOJI_FONT: &str = "40px 'Segoe UI Emoji'";
/// Horizontal shift so the emoji sits beside the face rather than on it.
pub const EMOJI_OFFSET_X: f64 = 50.0;

/// 2D context of the canvas with id `canvas_id`, if the page has one.
pub fn canvas_context(doc: &Document, canvas_id: &str) -> Option<CanvasRenderingContext2d> {
    let canvas: HtmlCanvasElement = doc.get_element_by_id(canvas_id)?.dyn_into().ok()?;
    canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Small circle at every landmark.
pub fn draw_feature_points(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    ctx.set_stroke_style(&JsValue::from_str(MARKER_STYLE));
    for p in points.iter().filter(|p| p.is_finite()) {
        ctx.begin_path();
        ctx.arc(p.x, p.y, MARKER_RADIUS, 0.0, std::f64::consts::TAU).ok();
        ctx.stroke();
    }
}

/// Draw `glyph` next to the face, anchored on the first two landmarks.
pub fn draw_emoji(ctx: &CanvasRenderingContext2d, glyph: &str, points: &[Point]) {
    let Some((x, y)) = emoji_anchor(points) else {
        return;
    };
    ctx.set_font(EMOJI_FONT);
    ctx.fill_text(glyph, x, y).ok();
}

/// Text position for the emoji: x from landmark 0, y from landmark 1.
pub fn emoji_anchor(points: &[Point]) -> Option<(f64, f64)> {
    let x = points.first()?.x;
    let y = points.get(1)?.y;
    (x.is_finite() && y.is_finite()).then(|| (x - EMOJI_OFFSET_X, y))
}
