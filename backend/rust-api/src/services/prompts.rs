//! Prompt construction for every endpoint.
//!
//! Caller values are pasted into the user message as-is: no escaping and no
//! length limit. The only client is the game frontend behind the CORS origin.

use serde_json::Value;

use super::completion_client::ChatMessage;

pub const SYLLABLE_HINT_MAX_TOKENS: u32 = 60;
pub const EXERCISES_MAX_TOKENS: u32 = 200;
pub const MATCH_HINT_MAX_TOKENS: u32 = 50;
pub const MATH_HINT_MAX_TOKENS: u32 = 40;

pub const SYSTEM_KID_SPANISH: &str = "\
Eres una tutora de lectoescritura para niños de 3-4 años.
Responde SIEMPRE en español de Perú, con 1 frase corta.
Evita tecnicismos. Usa ejemplos con M, P, L, S, T y vocales.
Nunca incluyas enlaces.";

pub const SYSTEM_MATCH: &str = "\
Eres una tutora de lectoescritura para niños de 3-4 años.
Responde en español de Perú con 1 frase corta.
No reveles la respuesta exacta; da pista por sonido inicial o idea simple.";

pub const SYSTEM_MATH: &str = "\
Eres una tutora para niños de 3-4 años.
Responde en español de Perú, con 1 sola frase muy corta.
No digas el número exacto; da una ayuda como \"Cuenta con tu dedo\" o \"Mira de uno en uno\".";

pub fn syllable_hint(
    target_syllable: Option<&Value>,
    slots: Option<&Value>,
    letters: Option<&Value>,
) -> Vec<ChatMessage> {
    let user = format!(
        "Estamos armando la sílaba \"{}\". Casillas: {} (null=vacío). \
         Letras disponibles: {}. \
         Da UNA sola pista muy breve y positiva para un niño de 3-4 años.",
        render_scalar(target_syllable),
        render_json(slots),
        join_list(letters),
    );

    vec![ChatMessage::system(SYSTEM_KID_SPANISH), ChatMessage::user(user)]
}

pub fn exercises(count: usize) -> Vec<ChatMessage> {
    let user = format!(
        "Crea {} ejercicios de sílabas abiertas (CV). \
         Solo consonantes: M, P, L, S, T. Solo vocales: A, E, I, O, U. \
         Devuélvelos en JSON estrictamente como un arreglo de objetos:\n\
         [\n  {{\"syllable\":\"MA\",\"letters\":[\"M\",\"A\"],\"hint\":\"M + A\"}},\n  ...\n]\n\
         Sin texto extra.",
        count
    );

    vec![ChatMessage::system(SYSTEM_KID_SPANISH), ChatMessage::user(user)]
}

pub fn match_hint(target_word: Option<&Value>, options: Option<&Value>) -> Vec<ChatMessage> {
    let user = format!(
        "Juego: emparejar palabra con imagen.\n\
         Palabra objetivo: \"{}\".\n\
         Otras palabras en pantalla: {}.\n\
         Da UNA pista muy breve. Ej.: \"Empieza con Ssss\" o \"Da luz y está en el cielo\".",
        render_scalar(target_word),
        join_list(options),
    );

    vec![ChatMessage::system(SYSTEM_MATCH), ChatMessage::user(user)]
}

pub fn math_hint(target_number: Option<&Value>, options: Option<&Value>) -> Vec<ChatMessage> {
    let user = format!(
        "Juego: contar manzanas.\n\
         Número correcto (no lo digas): {}.\n\
         Opciones en pantalla: {}.\n\
         Da UNA pista muy breve, amable y sin revelar la respuesta.",
        render_scalar(target_number),
        join_list(options),
    );

    vec![ChatMessage::system(SYSTEM_MATH), ChatMessage::user(user)]
}

/// Strings verbatim, other JSON literally, absent/`null` as nothing.
pub fn render_scalar(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Compact JSON; absent renders as an empty list.
fn render_json(value: Option<&Value>) -> String {
    value
        .map(Value::to_string)
        .unwrap_or_else(|| "[]".to_string())
}

/// Array items joined with ", " (null items empty); anything else is empty.
/// The math route rejects non-list options before building its prompt.
fn join_list(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| render_scalar(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}
