use serde_json::Value as JsonValue;

use crate::CallerError;

/// Text returned when a successful response carries no candidate text.
pub const NO_RESPONSE_TEXT: &str = "No response from AI.";

/// Pulls `candidates[0].content.parts[0].text` out of a 2xx body.
///
/// A missing, empty or wrongly typed shape is not an error and yields
/// [`NO_RESPONSE_TEXT`]; only a body that is not JSON at all fails.
pub(crate) fn extract_candidate_text(body: &str) -> Result<String, CallerError> {
    let response = serde_json::from_str::<JsonValue>(body).map_err(|err| {
        CallerError::Decode(format!("invalid generate-content response JSON: {err}"))
    })?;

    let text = response
        .get("candidates")
        .and_then(JsonValue::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(JsonValue::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(JsonValue::as_str);

    Ok(text.unwrap_or(NO_RESPONSE_TEXT).to_owned())
}
