use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/hint`. Fields are free-form puzzle state.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllableHintRequest {
    #[serde(default)]
    pub target_syllable: Option<Value>,
    /// Slot contents, `null` entries are empty slots.
    #[serde(default)]
    pub slots: Option<Value>,
    #[serde(default)]
    pub letters: Option<Value>,
}

/// Body of `POST /api/match/hint`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHintRequest {
    #[serde(default)]
    pub target_word: Option<Value>,
    #[serde(default)]
    pub options: Option<Value>,
}

/// Body of `POST /api/math/hint`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathHintRequest {
    #[serde(default)]
    pub target_number: Option<Value>,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResponse {
    pub hint: String,
}

impl HintResponse {
    pub fn new(hint: impl Into<String>) -> Self {
        Self { hint: hint.into() }
    }
}
