//! Extractor output parsing

use crate::error::EnricherError;
use serde_json::Value;
use volt_domain::Mention;

/// Parse extractor output into mentions
///
/// Accepts a JSON array of strings, or plain text with one mention per line
/// (blank lines ignored). Any other JSON value, broken JSON, or a non-string
/// array item is [`EnricherError::MalformedInput`].
pub fn parse_mentions(text: &str) -> Result<Vec<Mention>, EnricherError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return parse_json(trimmed);
    }

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_json(text: &str) -> Result<Vec<Mention>, EnricherError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| EnricherError::MalformedInput(format!("invalid JSON: {}", e)))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(EnricherError::MalformedInput(format!(
                "expected a JSON array of strings, found {}",
                kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(mention) => Ok(mention),
            other => Err(EnricherError::MalformedInput(format!(
                "mention {} is {}, expected a string",
                index,
                kind(&other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
