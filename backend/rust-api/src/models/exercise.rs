use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_EXERCISE_COUNT: usize = 5;

/// Body of `POST /api/exercises`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExerciseRequest {
    #[serde(default)]
    pub count: Option<Value>,
}

impl ExerciseRequest {
    /// Requested number of exercises.
    ///
    /// Absent or `null` means the default of 5. Negative numbers and values that
    /// are not numbers at all ask for nothing; fractions are truncated.
    pub fn count(&self) -> usize {
        match &self.count {
            None | Some(Value::Null) => DEFAULT_EXERCISE_COUNT,
            Some(Value::Number(n)) => {
                if let Some(u) = n.as_u64() {
                    usize::try_from(u).unwrap_or(usize::MAX)
                } else if let Some(f) = n.as_f64() {
                    if f.is_finite() && f > 0.0 {
                        f.trunc() as usize
                    } else {
                        0
                    }
                } else {
                    0
                }
            }
            Some(Value::String(s)) => s.trim().parse::<usize>().unwrap_or(0),
            Some(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub syllable: String,
    pub letters: [String; 2],
    pub hint: String,
}

impl Exercise {
    pub fn new(consonant: &str, vowel: &str) -> Self {
        Self {
            syllable: format!("{}{}", consonant, vowel),
            letters: [consonant.to_string(), vowel.to_string()],
            hint: format!("{} + {}", consonant, vowel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseResponse {
    /// Present only in degraded mode (`"no_ai"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub exercises: Vec<Exercise>,
}
