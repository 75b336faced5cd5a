//! Response normalization
//!
//! Reviewer replies arrive as free-form text: fenced markdown, prose around a
//! JSON body, or clean JSON. [`normalize`] extracts the structured payload,
//! tolerating formatting noise, and never raises — on failure it returns the
//! caller's fallback with `used_fallback` set so callers must pattern-match
//! success vs. fallback instead of relying on an always-succeeding call.
//! Shape hints are advisory: a mismatch warns, it does not reject.

use serde_json::Value;

/// Advisory expectation about the shape of the normalized value
#[derive(Debug, Clone)]
pub enum ShapeHint {
    /// Expect a JSON object, optionally carrying the listed keys
    Object { expected_keys: Vec<String> },
    /// Expect a JSON array
    Array,
}

impl ShapeHint {
    pub fn object(keys: &[&str]) -> Self {
        ShapeHint::Object {
            expected_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn check(&self, value: &Value) -> Option<String> {
        match self {
            ShapeHint::Object { expected_keys } => {
                let Value::Object(map) = value else {
                    return Some("expected a JSON object".to_string());
                };
                let missing: Vec<&str> = expected_keys
                    .iter()
                    .filter(|k| !map.contains_key(k.as_str()))
                    .map(|k| k.as_str())
                    .collect();
                if missing.is_empty() {
                    None
                } else {
                    Some(format!("missing expected keys: {}", missing.join(", ")))
                }
            }
            ShapeHint::Array => {
                if value.is_array() {
                    None
                } else {
                    Some("expected a JSON array".to_string())
                }
            }
        }
    }
}

/// Outcome of normalization.
///
/// `used_fallback` distinguishes a parsed reply from the substituted default;
/// `warnings` carries advisory shape mismatches and parse diagnostics.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub value: Value,
    pub used_fallback: bool,
    pub warnings: Vec<String>,
}

impl Normalized {
    pub fn is_fallback(&self) -> bool {
        self.used_fallback
    }
}

/// Normalize raw reviewer output into structured data.
///
/// Extraction order:
/// 1. the whole text as JSON
/// 2. the body of the first fenced code block
/// 3. the outermost `{...}` or `[...]` span in the text
///
/// Idempotent: normalizing already-normalized structured content returns the
/// same structure with no warnings.
pub fn normalize(raw: &str, fallback: Value, hint: Option<&ShapeHint>) -> Normalized {
    let mut warnings = Vec::new();

    let parsed = parse_direct(raw)
        .or_else(|| parse_fenced(raw))
        .or_else(|| parse_embedded(raw));

    match parsed {
        Some(value) => {
            if let Some(hint) = hint
                && let Some(mismatch) = hint.check(&value)
            {
                warnings.push(format!("shape mismatch (advisory): {}", mismatch));
            }
            Normalized {
                value,
                used_fallback: false,
                warnings,
            }
        }
        None => {
            warnings.push("no structured payload found, using fallback".to_string());
            Normalized {
                value: fallback,
                used_fallback: true,
                warnings,
            }
        }
    }
}

fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok()
}

/// Extract the body of the first ``` fence pair, dropping the language tag.
fn parse_fenced(raw: &str) -> Option<Value> {
    let start = raw.find("```")?;
    let after_fence = &raw[start + 3..];
    // Skip the language tag line ("json", "yaml", or empty)
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    serde_json::from_str(body[..end].trim()).ok()
}

/// Extract the outermost JSON object or array embedded in prose.
fn parse_embedded(raw: &str) -> Option<Value> {
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let Some(start) = raw.find(open)
            && let Some(end) = raw.rfind(close)
            && end > start
        {
            if let Ok(value) = serde_json::from_str::<Value>(&raw[start..=end]) {
                return Some(value);
            }
        }
    }
    None
}
