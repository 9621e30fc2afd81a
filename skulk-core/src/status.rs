use std::fmt;
use std::str::FromStr;

use crate::error::StatusCodeError;

/// An HTTP status code, a three-digit pattern with `x` wildcards, or the
/// `idk` sentinel used when no status could be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCode {
    Exact(u16),
    Pattern(String),
    Unknown,
}

impl StatusCode {
    pub fn from_u16(code: u16) -> Result<Self, StatusCodeError> {
        if (100..600).contains(&code) {
            Ok(StatusCode::Exact(code))
        } else {
            Err(StatusCodeError(code.to_string()))
        }
    }

    /// Exact codes compare by value; patterns never do.
    pub fn is_exact(&self) -> bool {
        !matches!(self, StatusCode::Pattern(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Exact(code) if (200..300).contains(code))
    }

    /// Wildcard-aware comparison. An `x` digit matches anything on either
    /// side and `idk` compares as `xxx`. Commutative.
    pub fn matches(&self, other: &StatusCode) -> bool {
        if self.is_exact() && other.is_exact() {
            return self == other;
        }
        let ours = self.triple();
        let theirs = other.triple();
        ours.chars()
            .zip(theirs.chars())
            .all(|(a, b)| a == b || a == 'x' || b == 'x')
    }

    fn triple(&self) -> String {
        match self {
            StatusCode::Exact(code) => format!("{code:03}"),
            StatusCode::Pattern(pattern) => pattern.clone(),
            StatusCode::Unknown => "xxx".to_string(),
        }
    }
}

impl FromStr for StatusCode {
    type Err = StatusCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_ascii_lowercase();
        if token == "idk" {
            return Ok(StatusCode::Unknown);
        }
        if token.len() != 3 || !token.chars().all(|c| c.is_ascii_digit() || c == 'x') {
            return Err(StatusCodeError(s.to_string()));
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            let code = token
                .parse::<u16>()
                .map_err(|_| StatusCodeError(s.to_string()))?;
            return StatusCode::from_u16(code).map_err(|_| StatusCodeError(s.to_string()));
        }
        // A pattern starting with a digit still has to be a plausible class.
        if let Some(first) = token.chars().next() {
            if first.is_ascii_digit() && !('1'..='5').contains(&first) {
                return Err(StatusCodeError(s.to_string()));
            }
        }
        Ok(StatusCode::Pattern(token))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Exact(code) => write!(f, "{code}"),
            StatusCode::Pattern(pattern) => write!(f, "{pattern}"),
            StatusCode::Unknown => write!(f, "idk"),
        }
    }
}
