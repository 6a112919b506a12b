// Game configuration: typed settings, JSON loading and validation.
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::DETECTABLE_EMOJIS;

/// Emojis used as targets unless a config says otherwise. A subset of
/// `DETECTABLE_EMOJIS` that players can reproduce reliably.
pub const DEFAULT_CANDIDATES: &[u32] = &[128528, 9786, 128515, 128521, 128535, 128561];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GameConfig {
    /// Points needed to win.
    pub max_score: u32,
    /// Pool the target emoji is drawn from (uniformly, repeats allowed).
    pub candidate_emojis: Vec<u32>,
    /// Seconds the expression must be held; scoring needs strictly more.
    #[serde(rename = "holdDurationSeconds")]
    pub hold_duration_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_score: 1,
            candidate_emojis: DEFAULT_CANDIDATES.to_vec(),
            hold_duration_secs: 1.0,
        }
    }
}

impl GameConfig {
    /// Parse a JSON object such as `{"maxScore": 3, "holdDurationSeconds": 0.5}`.
    /// Missing fields keep their defaults. The result is validated.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_score == 0 {
            return Err(ConfigError::ZeroMaxScore);
        }
        if self.candidate_emojis.is_empty() {
            return Err(ConfigError::EmptyCandidates);
        }
        if !self.hold_duration_secs.is_finite() || self.hold_duration_secs < 0.0 {
            return Err(ConfigError::InvalidHoldDuration(self.hold_duration_secs));
        }
        // A target the detector can never report would make the game unwinnable.
        if let Some(&code) = self
            .candidate_emojis
            .iter()
            .find(|c| !DETECTABLE_EMOJIS.contains(c))
        {
            return Err(ConfigError::UndetectableEmoji(code));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid game config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("maxScore must be at least 1")]
    ZeroMaxScore,

    #[error("candidateEmojis must not be empty")]
    EmptyCandidates,

    #[error("holdDurationSeconds must be a non-negative number, got {0}")]
    InvalidHoldDuration(f64),

    #[error("emoji {0} cannot be reported by the detector")]
    UndetectableEmoji(u32),
}

impl From<ConfigError> for JsValue {
    fn from(e: ConfigError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
