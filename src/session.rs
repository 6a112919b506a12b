//! Event wiring between the detector, the page and the game.
//!
//! `Session` is the detector-free part: it reports, draws and scores frames
//! against a `Display`. `App` owns the detector handle, one `Session` and the
//! detector listener closures. Every callback reaches `App` through a `Weak`,
//! so the closures held by `App` do not keep it alive on their own; the
//! `MimicMe` handle returned to JS is the owner. Dropping it detaches the
//! listeners from the detector before the closures go away.
//!
//! Callbacks never hold the session borrow while calling into the detector,
//! so a detector that fires events synchronously cannot double-borrow.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::detector::{self, CameraDetector, DetectionFrame};
use crate::display::{CAMERA_ID, Display, FACE_CANVAS_ID, FACE_VIDEO_ID, Region};
use crate::draw;
use crate::game::{EntropyPicker, Game, GameConfig, TargetPicker, Update};

/// Buttons wired to the start / stop / reset commands when present.
pub const START_BUTTON_ID: &str = "start";
pub const STOP_BUTTON_ID: &str = "stop";
pub const RESET_BUTTON_ID: &str = "reset";

pub const WINNER_LOG: &str = "Winner winner!";

/// Game state plus the page it reports to.
pub struct Session {
    game: Game,
    picker: Box<dyn TargetPicker>,
    display: Display,
}

impl Session {
    pub fn new(game: Game, picker: Box<dyn TargetPicker>, display: Display) -> Self {
        Self { game, picker, display }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn init_game(&mut self) {
        let target = self.game.init(&mut *self.picker);
        self.display.set_target_emoji(target);
        self.display.set_score(self.game.score(), self.game.max_score());
        self.display.log(Region::Logs, "Game started.");
    }

    /// Report, draw and score one frame. Returns what the game made of it,
    /// or `None` when the frame has no face.
    pub fn handle_frame(&mut self, frame: &DetectionFrame) -> Option<Update> {
        self.display.clear(Region::Results);
        for line in frame.report_lines() {
            self.display.log(Region::Results, &line);
        }
        let face = frame.first_face()?;
        let glyph = face.emojis.dominant_emoji.as_str();

        // No canvas yet: skip the overlay for this frame, still score it.
        if let Some(ctx) = draw::canvas_context(self.display.document(), FACE_CANVAS_ID) {
            draw::draw_feature_points(&ctx, face.feature_points.as_slice());
            draw::draw_emoji(&ctx, glyph, face.feature_points.as_slice());
        }

        let outcome = self.game.update(glyph, frame.timestamp, &mut *self.picker);
        match outcome {
            Update::Scored { target, score } => {
                self.display.set_target_emoji(target);
                self.display.set_score(score, self.game.max_score());
            }
            Update::Won { target, score } => {
                self.display.set_target_emoji(target);
                self.display.set_score(score, self.game.max_score());
                console_log!("game won with score {}", score);
                self.display.log(Region::Logs, WINNER_LOG);
            }
            Update::Ignored | Update::Mismatch | Update::BadTimestamp | Update::Holding { .. } => {}
        }
        Some(outcome)
    }
}

/// Closures registered on the detector; kept so they can be re-attached.
struct Listeners {
    webcam_allowed: Closure<dyn FnMut()>,
    webcam_denied: Closure<dyn FnMut()>,
    stopped: Closure<dyn FnMut()>,
    initialized: Closure<dyn FnMut()>,
    image_results: Closure<dyn FnMut(JsValue, JsValue, f64)>,
}

impl Listeners {
    fn new(app: Weak<App>) -> Self {
        // Wrap an `App` method so it runs only while the app is alive.
        fn lifecycle(app: &Weak<App>, f: fn(&App)) -> Closure<dyn FnMut()> {
            let app = app.clone();
            Closure::wrap(Box::new(move || {
                if let Some(app) = app.upgrade() {
                    f(&app);
                }
            }) as Box<dyn FnMut()>)
        }

        let frames = app.clone();
        Self {
            webcam_allowed: lifecycle(&app, App::on_webcam_connect_success),
            webcam_denied: lifecycle(&app, App::on_webcam_connect_failure),
            stopped: lifecycle(&app, App::on_stop_success),
            initialized: lifecycle(&app, App::on_initialize_success),
            image_results: Closure::wrap(Box::new(move |faces: JsValue, _image: JsValue, timestamp: f64| {
                if let Some(app) = frames.upgrade() {
                    app.on_image_results(&faces, timestamp);
                }
            }) as Box<dyn FnMut(JsValue, JsValue, f64)>),
        }
    }
}

pub struct App {
    detector: CameraDetector,
    session: RefCell<Session>,
    listeners: Listeners,
    attached: Cell<bool>,
}

impl App {
    fn new(doc: Document, config: GameConfig) -> Result<Rc<App>, JsValue> {
        let game = Game::new(config)?;
        let root = doc
            .get_element_by_id(CAMERA_ID)
            .ok_or_else(|| JsValue::from_str("no #camera element"))?;
        let detector = CameraDetector::create(&root)?;
        let app = Rc::new_cyclic(|weak: &Weak<App>| App {
            detector,
            session: RefCell::new(Session::new(game, Box::new(EntropyPicker::new()), Display::new(doc))),
            listeners: Listeners::new(weak.clone()),
            attached: Cell::new(false),
        });
        app.attach_listeners();
        Ok(app)
    }

    fn log(&self, msg: &str) {
        self.session.borrow().display.log(Region::Logs, msg);
    }

    fn attach_listeners(&self) {
        if self.attached.replace(true) {
            return;
        }
        let l = &self.listeners;
        let d = &self.detector;
        d.add_event_listener(detector::ON_WEBCAM_CONNECT_SUCCESS, l.webcam_allowed.as_ref().unchecked_ref());
        d.add_event_listener(detector::ON_WEBCAM_CONNECT_FAILURE, l.webcam_denied.as_ref().unchecked_ref());
        d.add_event_listener(detector::ON_STOP_SUCCESS, l.stopped.as_ref().unchecked_ref());
        d.add_event_listener(detector::ON_INITIALIZE_SUCCESS, l.initialized.as_ref().unchecked_ref());
        d.add_event_listener(detector::ON_IMAGE_RESULTS_SUCCESS, l.image_results.as_ref().unchecked_ref());
    }

    fn detach_listeners(&self) {
        self.detector.remove_event_listeners();
        self.attached.set(false);
    }

    // --- Detector callbacks ----------------------------------------------------

    fn on_webcam_connect_success(&self) {
        self.log("Webcam access allowed");
    }

    fn on_webcam_connect_failure(&self) {
        self.log("webcam denied");
        console_warn!("Webcam access denied");
    }

    fn on_stop_success(&self) {
        let session = self.session.borrow();
        session.display.log(Region::Logs, "The detector reports stopped");
        session.display.clear(Region::Results);
        session.game.stop();
        session.display.log(Region::Logs, "Game stopped.");
    }

    fn on_initialize_success(&self) {
        let mut session = self.session.borrow_mut();
        session.display.log(Region::Logs, "The detector reports initialized");
        // Show the canvas instead of the raw video so overlays are visible.
        session.display.set_visible(FACE_CANVAS_ID, true);
        session.display.set_visible(FACE_VIDEO_ID, false);
        session.init_game();
    }

    fn on_image_results(&self, faces: &JsValue, timestamp: f64) {
        let frame = match DetectionFrame::from_js(faces, timestamp) {
            Ok(frame) => frame,
            Err(e) => {
                console_warn!("dropping malformed detector frame: {:?}", e);
                return;
            }
        };
        let outcome = self.session.borrow_mut().handle_frame(&frame);
        if let Some(Update::Won { .. }) = outcome {
            self.stop();
            self.session.borrow().display.notify_win();
        }
    }

    // --- UI commands -----------------------------------------------------------

    pub fn start(&self) {
        if !self.detector.is_running() {
            self.session.borrow().display.clear(Region::Logs);
            self.attach_listeners();
            self.detector.start();
        }
        self.log("Start button pressed");
    }

    pub fn stop(&self) {
        self.log("Stop button pressed");
        if self.detector.is_running() {
            self.detach_listeners();
            self.detector.stop();
        }
    }

    pub fn reset(&self) {
        self.log("Reset button pressed");
        if self.detector.is_running() {
            self.detector.reset();
        }
        let mut session = self.session.borrow_mut();
        session.display.clear(Region::Results);
        session.display.clear(Region::Logs);
        session.init_game();
    }

    fn wire_buttons(app: &Rc<App>, doc: &Document) -> Result<(), JsValue> {
        let commands: [(&str, fn(&App)); 3] = [
            (START_BUTTON_ID, App::start),
            (STOP_BUTTON_ID, App::stop),
            (RESET_BUTTON_ID, App::reset),
        ];
        for (id, command) in commands {
            let Some(button) = doc.get_element_by_id(id) else {
                continue;
            };
            let weak = Rc::downgrade(app);
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                if let Some(app) = weak.upgrade() {
                    command(&app);
                }
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // The detector must not call into closures that are about to be freed.
        self.detector.remove_event_listeners();
        if self.detector.is_running() {
            self.detector.stop();
        }
    }
}

/// Handle to a running game. Keep it alive for as long as the page plays;
/// freeing it detaches and stops the detector, and the buttons go inert.
#[wasm_bindgen]
pub struct MimicMe {
    app: Rc<App>,
}

#[wasm_bindgen]
impl MimicMe {
    pub fn start(&self) {
        self.app.start();
    }

    pub fn stop(&self) {
        self.app.stop();
    }

    pub fn reset(&self) {
        self.app.reset();
    }

    pub fn score(&self) -> u32 {
        self.app.session.borrow().game.score()
    }

    pub fn target_emoji(&self) -> Option<u32> {
        self.app.session.borrow().game.target()
    }
}

/// Build the detector and session, attach all listeners and buttons.
pub fn launch(config: GameConfig) -> Result<MimicMe, JsValue> {
    let win = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let app = App::new(doc.clone(), config)?;
    App::wire_buttons(&app, &doc)?;
    console_log!("Mimic Me! ready");
    Ok(MimicMe { app })
}
