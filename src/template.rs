use crate::error::MvcError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

const PLACEHOLDER_PREFIX: &str = "{args.index.";

/// Placeholder token for the positional argument at `index`.
pub fn placeholder(index: usize) -> String {
    format!("{{args.index.{}}}", index)
}

pub fn encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

pub fn decode(encoded: &str) -> Result<String, MvcError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| MvcError::CorruptData(format!("script body is not valid base64 ({})", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| MvcError::CorruptData("script body is not valid UTF-8".to_string()))
}

/// Decodes `body` and fills each `{args.index.N}` that `lookup` answers.
pub fn resolve<'a>(body: &str, lookup: impl FnMut(usize) -> Option<&'a str>) -> Result<String, MvcError> {
    let text = decode(body)?;
    Ok(substitute(&text, lookup))
}

/// Single pass over `text`, replacing each well-formed placeholder whose
/// index `lookup` answers. Unanswered or malformed tokens stay verbatim and
/// substituted values are never rescanned.
pub fn substitute<'a>(text: &str, mut lookup: impl FnMut(usize) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
        out.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_PREFIX.len()..];
        let digits = after.bytes().take_while(|b| b.is_ascii_digit()).count();
        let canonical = digits == 1 || (digits > 1 && !after.starts_with('0'));
        let value = if canonical && after[digits..].starts_with('}') {
            after[..digits].parse::<usize>().ok().and_then(&mut lookup)
        } else {
            None
        };
        match value {
            Some(value) => {
                out.push_str(value);
                rest = &after[digits + 1..];
            }
            None => {
                out.push_str(PLACEHOLDER_PREFIX);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
