use serde::de::DeserializeOwned;

use crate::errors::CoreError;

/// Slice of `text` from the first `open` to the last `close`, inclusive.
///
/// Models like to wrap their JSON in prose or code fences.
fn span(text: &str, open: char, close: char) -> Result<&str, CoreError> {
    match (text.find(open), text.rfind(close)) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(CoreError::Deserialization("No JSON found in response".into())),
    }
}

/// Deserialize the JSON object embedded in a model answer.
pub(crate) fn parse_object<T: DeserializeOwned>(text: &str) -> Result<T, CoreError> {
    Ok(serde_json::from_str(span(text, '{', '}')?)?)
}

/// Deserialize the JSON array embedded in a model answer.
pub(crate) fn parse_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, CoreError> {
    Ok(serde_json::from_str(span(text, '[', ']')?)?)
}
