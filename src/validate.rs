use crate::error::{ErrorCode, GenError, Result};
use crate::request::GenerationRequest;
use regex::Regex;

/// Format contract for one request: exact length, ASCII letters, digits only when allowed.
#[derive(Debug, Clone)]
pub struct UsernameRule {
    length: usize,
    full_match: Regex,
    disallowed: Regex,
}

impl UsernameRule {
    pub fn for_request(request: &GenerationRequest) -> Result<Self> {
        let class = if request.allow_numbers() { "A-Za-z0-9" } else { "A-Za-z" };
        let length = request.desired_length();
        Ok(Self {
            length,
            full_match: compile(&format!("^[{class}]{{{length}}}$"))?,
            disallowed: compile(&format!("[^{class}]"))?,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// True only when the whole candidate matches; no partial matches.
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.full_match.is_match(candidate)
    }

    /// Strips disallowed characters, then truncates to the target length.
    /// What survives is ASCII, so truncating by bytes is truncating by characters.
    pub fn refine(&self, candidate: &str) -> String {
        let mut refined = self.disallowed.replace_all(candidate, "").into_owned();
        refined.truncate(self.length.min(refined.len()));
        refined
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GenError::Validation {
        code: ErrorCode::ValidationFailed,
        message: format!("Could not build username pattern: {e}"),
        context: pattern.to_string(),
    })
}

/// Drops a leading label such as "Answer:" from a raw completion.
///
/// Everything after the FIRST colon is kept and trimmed; text without a colon is only trimmed.
pub fn extract_after_label(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => raw,
    }
}
