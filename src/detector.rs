//! Affectiva `affdex` SDK boundary.
//!
//! The SDK does all capture and classification; this module only declares the
//! pieces of `affdex.CameraDetector` the game calls and the shape of the face
//! data it hands back on every frame.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;
use web_sys::Element;

// Detector event names.
pub const ON_WEBCAM_CONNECT_SUCCESS: &str = "onWebcamConnectSuccess";
pub const ON_WEBCAM_CONNECT_FAILURE: &str = "onWebcamConnectFailure";
pub const ON_STOP_SUCCESS: &str = "onStopSuccess";
pub const ON_INITIALIZE_SUCCESS: &str = "onInitializeSuccess";
pub const ON_IMAGE_RESULTS_SUCCESS: &str = "onImageResultsSuccess";

/// Camera image size requested from the SDK.
pub const CAMERA_WIDTH: u32 = 640;
pub const CAMERA_HEIGHT: u32 = 480;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = affdex)]
    pub type CameraDetector;

    #[wasm_bindgen(catch, constructor, js_namespace = affdex)]
    fn new(root: &Element, width: u32, height: u32, face_mode: &JsValue) -> Result<CameraDetector, JsValue>;

    #[wasm_bindgen(method, js_name = detectAllEmotions)]
    fn detect_all_emotions(this: &CameraDetector);
    #[wasm_bindgen(method, js_name = detectAllExpressions)]
    fn detect_all_expressions(this: &CameraDetector);
    #[wasm_bindgen(method, js_name = detectAllEmojis)]
    fn detect_all_emojis(this: &CameraDetector);
    #[wasm_bindgen(method, js_name = detectAllAppearance)]
    fn detect_all_appearance(this: &CameraDetector);

    #[wasm_bindgen(method, getter = isRunning)]
    fn is_running_raw(this: &CameraDetector) -> JsValue;

    #[wasm_bindgen(method)]
    pub fn start(this: &CameraDetector);
    #[wasm_bindgen(method)]
    pub fn stop(this: &CameraDetector);
    #[wasm_bindgen(method)]
    pub fn reset(this: &CameraDetector);

    #[wasm_bindgen(method, js_name = addEventListener)]
    pub fn add_event_listener(this: &CameraDetector, event: &str, callback: &js_sys::Function);
    /// Without arguments the SDK drops every registered listener.
    #[wasm_bindgen(method, js_name = removeEventListener)]
    pub fn remove_event_listeners(this: &CameraDetector);
}

impl CameraDetector {
    /// Build a camera detector inside `root` with every classifier enabled.
    pub fn create(root: &Element) -> Result<CameraDetector, JsValue> {
        let mode = large_faces_mode()?;
        let detector = CameraDetector::new(root, CAMERA_WIDTH, CAMERA_HEIGHT, &mode)?;
        detector.detect_all_emotions();
        detector.detect_all_expressions();
        detector.detect_all_emojis();
        detector.detect_all_appearance();
        Ok(detector)
    }

    pub fn is_running(&self) -> bool {
        self.is_running_raw().as_bool().unwrap_or(false)
    }
}

/// `affdex.FaceDetectorMode.LARGE_FACES`, or an error if the SDK script is missing.
fn large_faces_mode() -> Result<JsValue, JsValue> {
    let affdex = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("affdex"))?;
    if affdex.is_undefined() {
        return Err(JsValue::from_str("affdex SDK not loaded"));
    }
    let modes = js_sys::Reflect::get(&affdex, &JsValue::from_str("FaceDetectorMode"))?;
    js_sys::Reflect::get(&modes, &JsValue::from_str("LARGE_FACES"))
}

// --- Frame data model --------------------------------------------------------

/// A landmark position. Coordinates the SDK left out or sent as `null`
/// come through as NaN; see [`Point::is_finite`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
    #[serde(default = "missing_coord", deserialize_with = "nullable_coord")]
    pub x: f64,
    #[serde(default = "missing_coord", deserialize_with = "nullable_coord")]
    pub y: f64,
}

impl Point {
    pub const MISSING: Point = Point { x: f64::NAN, y: f64::NAN };

    /// Both coordinates are usable for drawing.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn missing_coord() -> f64 {
    f64::NAN
}

fn nullable_coord<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
}

/// Facial landmarks in SDK order. The SDK may serialize them either as an
/// array or as an object keyed by landmark index.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawFeaturePoints")]
pub struct FeaturePoints(pub Vec<Point>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeaturePoints {
    List(Vec<Option<Point>>),
    Keyed(BTreeMap<String, Option<Point>>),
}

impl From<RawFeaturePoints> for FeaturePoints {
    fn from(raw: RawFeaturePoints) -> Self {
        // A null landmark keeps its slot so later indices stay put.
        let fill = |p: Option<Point>| p.unwrap_or(Point::MISSING);
        match raw {
            RawFeaturePoints::List(points) => FeaturePoints(points.into_iter().map(fill).collect()),
            RawFeaturePoints::Keyed(map) => {
                let mut entries: Vec<(String, Option<Point>)> = map.into_iter().collect();
                // numeric ids first in numeric order ("10" after "9"), others after
                entries.sort_by_key(|(id, _)| (id.parse::<usize>().unwrap_or(usize::MAX), id.clone()));
                FeaturePoints(entries.into_iter().map(|(_, p)| fill(p)).collect())
            }
        }
    }
}

impl FeaturePoints {
    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Emojis {
    pub dominant_emoji: String,
}

/// One detected face as reported by the SDK. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Face {
    pub feature_points: FeaturePoints,
    pub expressions: Map<String, Value>,
    pub emotions: Map<String, Value>,
    pub appearance: Map<String, Value>,
    pub emojis: Emojis,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionFrame {
    pub faces: Vec<Face>,
    /// Seconds since the detector started.
    pub timestamp: f64,
}

impl DetectionFrame {
    pub fn from_faces_json(json: &str, timestamp: f64) -> Result<Self, serde_json::Error> {
        let faces: Vec<Face> = serde_json::from_str(json)?;
        Ok(Self { faces, timestamp })
    }

    /// Parse the `faces` argument of an `onImageResultsSuccess` callback.
    pub fn from_js(faces: &JsValue, timestamp: f64) -> Result<Self, JsValue> {
        let json: String = js_sys::JSON::stringify(faces)?.into();
        Self::from_faces_json(&json, timestamp).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The game only follows one player.
    pub fn first_face(&self) -> Option<&Face> {
        self.faces.first()
    }

    /// Lines for the per-frame results panel.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Timestamp: {:.2}", self.timestamp),
            format!("Number of faces found: {}", self.faces.len()),
        ];
        if let Some(face) = self.first_face() {
            lines.push(format!("Appearance: {}", to_json(&face.appearance)));
            lines.push(format!("Emotions: {}", to_json(&rounded(&face.emotions))));
            lines.push(format!("Expressions: {}", to_json(&rounded(&face.expressions))));
            lines.push(format!("Emoji: {}", face.emojis.dominant_emoji));
        }
        lines
    }
}

/// Round numeric scores to whole numbers; other values pass through.
fn rounded(scores: &Map<String, Value>) -> Map<String, Value> {
    scores
        .iter()
        .map(|(k, v)| {
            let v = match v.as_f64() {
                Some(f) if f.is_finite() => Value::from(f.round() as i64),
                _ => v.clone(),
            };
            (k.clone(), v)
        })
        .collect()
}

fn to_json(map: &Map<String, Value>) -> String {
    serde_json::to_string(map).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"[{
        "featurePoints": [{"x": 100.0, "y": 50.0}, {"x": 120.5, "y": 60.25}],
        "emotions": {"joy": 97.6, "anger": 0.2, "valence": -12.5},
        "expressions": {"smile": 99.49, "browRaise": 3.5},
        "appearance": {"gender": "Female", "glasses": "No", "age": "25 - 34"},
        "emojis": {"relaxed": 0.01, "dominantEmoji": "😃"},
        "measurements": {"interocularDistance": 61.2}
    }]"#;

    #[test]
    fn test_parses_sdk_face() {
        let frame = DetectionFrame::from_faces_json(FRAME, 1.234).unwrap();
        assert_eq!(frame.faces.len(), 1);
        let face = frame.first_face().unwrap();
        assert_eq!(face.emojis.dominant_emoji, "😃");
        assert_eq!(face.feature_points.as_slice()[1], Point { x: 120.5, y: 60.25 });
        assert_eq!(face.appearance["gender"], "Female");
    }

    #[test]
    fn test_keyed_feature_points_sorted_numerically() {
        let json = r#"[{"featurePoints": {
            "10": {"x": 10.0, "y": 10.0},
            "2": {"x": 2.0, "y": 2.0},
            "0": {"x": 0.0, "y": 0.0}
        }}]"#;
        let frame = DetectionFrame::from_faces_json(json, 0.0).unwrap();
        let xs: Vec<f64> = frame.faces[0].feature_points.as_slice().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 10.0]);
    }

    #[test]
    fn test_missing_fields_default() {
        let frame = DetectionFrame::from_faces_json("[{}]", 0.0).unwrap();
        let face = &frame.faces[0];
        assert!(face.feature_points.as_slice().is_empty());
        assert_eq!(face.emojis.dominant_emoji, "");
    }

    #[test]
    fn test_null_landmarks_keep_the_frame() {
        let json = r#"[{
            "featurePoints": [{"x": null, "y": 5.0}, null, {"x": 3.0}, {"x": 1.0, "y": 2.0}],
            "emojis": {"dominantEmoji": "☺"}
        }]"#;
        let frame = DetectionFrame::from_faces_json(json, 2.0).unwrap();
        let face = frame.first_face().unwrap();
        assert_eq!(face.emojis.dominant_emoji, "☺");

        let pts = face.feature_points.as_slice();
        assert_eq!(pts.len(), 4);
        assert!(pts[0].x.is_nan());
        assert_eq!(pts[0].y, 5.0);
        assert!(!pts[1].is_finite());
        assert!(pts[2].y.is_nan());
        assert_eq!(pts[3], Point { x: 1.0, y: 2.0 });
        assert!(pts[3].is_finite());
    }

    #[test]
    fn test_rejects_non_array_payload() {
        assert!(DetectionFrame::from_faces_json(r#"{"faces": 1}"#, 0.0).is_err());
    }

    #[test]
    fn test_report_lines_round_scores() {
        let frame = DetectionFrame::from_faces_json(FRAME, 1.234).unwrap();
        let lines = frame.report_lines();
        assert_eq!(lines[0], "Timestamp: 1.23");
        assert_eq!(lines[1], "Number of faces found: 1");
        assert_eq!(lines[2], r#"Appearance: {"age":"25 - 34","gender":"Female","glasses":"No"}"#);
        assert_eq!(lines[3], r#"Emotions: {"anger":0,"joy":98,"valence":-13}"#);
        assert_eq!(lines[4], r#"Expressions: {"browRaise":4,"smile":99}"#);
        assert_eq!(lines[5], "Emoji: 😃");
    }

    #[test]
    fn test_report_without_faces_has_only_header() {
        let frame = DetectionFrame::from_faces_json("[]", 7.0).unwrap();
        assert_eq!(frame.report_lines(), vec!["Timestamp: 7.00", "Number of faces found: 0"]);
    }
}
