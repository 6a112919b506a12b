//! Page text regions: target emoji, score, log and per-frame results.
//! Missing elements are skipped so the game still runs on a partial page.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::unicode::glyph;

pub const TARGET_ID: &str = "target";
pub const SCORE_ID: &str = "score";
pub const CAMERA_ID: &str = "camera";
pub const FACE_CANVAS_ID: &str = "face_video_canvas";
pub const FACE_VIDEO_ID: &str = "face_video";

pub const WIN_MESSAGE: &str = "Congratulations! You won!";

/// Scrolling text panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Logs,
    Results,
    /// Win banner; pages without it get an `alert` instead.
    Notice,
}

impl Region {
    pub fn id(self) -> &'static str {
        match self {
            Region::Logs => "logs",
            Region::Results => "results",
            Region::Notice => "notice",
        }
    }
}

pub fn score_text(current: u32, max: u32) -> String {
    format!("Score: {} / {}", current, max)
}

#[derive(Clone, Debug)]
pub struct Display {
    doc: Document,
}

impl Display {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn set_target_emoji(&self, code: u32) {
        let text = glyph(code).map(String::from).unwrap_or_default();
        self.set_text(TARGET_ID, &text);
    }

    pub fn set_score(&self, current: u32, max: u32) {
        self.set_text(SCORE_ID, &score_text(current, max));
    }

    /// Append one line to a panel.
    pub fn log(&self, region: Region, msg: &str) {
        if let Err(e) = self.append_line(region, msg) {
            console_warn!("could not write to #{}: {:?}", region.id(), e);
        }
    }

    pub fn clear(&self, region: Region) {
        self.set_text(region.id(), "");
    }

    /// Toggle an element between `display: block` and `display: none`.
    pub fn set_visible(&self, id: &str, visible: bool) {
        let Some(el) = self
            .doc
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let value = if visible { "block" } else { "none" };
        el.style().set_property("display", value).ok();
    }

    pub fn notify_win(&self) {
        if self.doc.get_element_by_id(Region::Notice.id()).is_some() {
            self.log(Region::Notice, WIN_MESSAGE);
        } else if let Some(win) = web_sys::window() {
            win.alert_with_message(WIN_MESSAGE).ok();
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn append_line(&self, region: Region, msg: &str) -> Result<(), JsValue> {
        let Some(panel) = self.doc.get_element_by_id(region.id()) else {
            return Ok(());
        };
        let span = self.doc.create_element("span")?;
        span.set_text_content(Some(msg));
        panel.append_child(&span)?;
        let br = self.doc.create_element("br")?;
        panel.append_child(&br)?;
        Ok(())
    }
}
