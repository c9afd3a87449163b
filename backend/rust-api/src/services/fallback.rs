//! Static content served whenever the completion call is unusable.

use serde_json::Value;

use crate::models::exercise::Exercise;

use super::prompts::render_scalar;

/// The four AI-backed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SyllableHint,
    Exercises,
    MatchHint,
    MathHint,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::SyllableHint => "/api/hint",
            Endpoint::Exercises => "/api/exercises",
            Endpoint::MatchHint => "/api/match/hint",
            Endpoint::MathHint => "/api/math/hint",
        }
    }

    /// Metrics label.
    pub fn label(self) -> &'static str {
        match self {
            Endpoint::SyllableHint => "syllable_hint",
            Endpoint::Exercises => "exercises",
            Endpoint::MatchHint => "match_hint",
            Endpoint::MathHint => "math_hint",
        }
    }
}

/// Why a fallback was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    UpstreamError,
    EmptyOutput,
    InvalidOutput,
    InvalidInput,
}

impl FallbackReason {
    pub fn label(self) -> &'static str {
        match self {
            FallbackReason::UpstreamError => "upstream_error",
            FallbackReason::EmptyOutput => "empty_output",
            FallbackReason::InvalidOutput => "invalid_output",
            FallbackReason::InvalidInput => "invalid_input",
        }
    }
}

pub const SYLLABLE_HINT_ON_ERROR: &str = "Junta la consonante con la vocal 🙂";
pub const SYLLABLE_HINT_ON_EMPTY: &str = "Junta la consonante con su vocal 😊";
pub const MATH_HINT: &str = "Cuenta despacito con tu dedo: uno, dos, tres…";
pub const NO_AI_MARKER: &str = "no_ai";

/// Built-in exercise list as (consonant, vowel) pairs.
pub const EXERCISE_PAIRS: [(&str, &str); 5] = [
    ("M", "A"),
    ("P", "E"),
    ("L", "I"),
    ("S", "O"),
    ("T", "U"),
];

pub fn syllable_hint(reason: FallbackReason) -> String {
    match reason {
        FallbackReason::UpstreamError => SYLLABLE_HINT_ON_ERROR,
        FallbackReason::EmptyOutput
        | FallbackReason::InvalidOutput
        | FallbackReason::InvalidInput => SYLLABLE_HINT_ON_EMPTY,
    }
    .to_string()
}

/// `Empieza con "<first character, upper-cased>".`
///
/// A missing or `null` word gives `Empieza con "".` rather than a literal
/// `U`/`N` initial.
pub fn match_hint(target_word: Option<&Value>) -> String {
    let word = render_scalar(target_word);
    let initial: String = word
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    format!("Empieza con \"{}\".", initial)
}

pub fn math_hint() -> String {
    MATH_HINT.to_string()
}

/// The built-in list truncated to `count`.
pub fn exercises(count: usize) -> Vec<Exercise> {
    EXERCISE_PAIRS
        .iter()
        .take(count)
        .map(|(consonant, vowel)| Exercise::new(consonant, vowel))
        .collect()
}
