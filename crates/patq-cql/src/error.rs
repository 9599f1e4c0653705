//! Syntax error type with positioned, human-readable explanations.

use thiserror::Error;

/// A CQL syntax error.
///
/// The grammar could not match at some offset: missing operand, unexpected
/// token, unterminated subquery or quote, or trailing unparsed input. The
/// whole parse is discarded; nothing is recovered or truncated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at char {offset})")]
pub struct ParseError {
    /// The original query string.
    pub input: String,
    /// 0-based character offset at which matching could proceed no further.
    pub offset: usize,
    /// What the grammar expected at the failure position.
    pub message: String,
}

impl ParseError {
    /// Creates an error at `offset` into `input`.
    pub fn new(input: &str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            offset,
            message: message.into(),
        }
    }

    /// Multi-line explanation: the query, a caret line marking the offset,
    /// and the failure description.
    ///
    /// ```text
    /// foo=
    ///     ^
    /// expected term (at char 4)
    /// ```
    pub fn explanation(&self) -> String {
        format!(
            "{}\n{}^\n{} (at char {})",
            self.input,
            " ".repeat(self.offset),
            self.message,
            self.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_single_line() {
        let err = ParseError::new("foo=", 4, "expected term");
        assert_eq!(err.to_string(), "expected term (at char 4)");
    }

    #[test]
    fn explanation_places_caret_at_offset() {
        let err = ParseError::new("foo=", 4, "expected term");
        assert_eq!(err.explanation(), "foo=\n    ^\nexpected term (at char 4)");
    }

    #[test]
    fn explanation_caret_at_start() {
        let err = ParseError::new("", 0, "expected index");
        assert_eq!(err.explanation(), "\n^\nexpected index (at char 0)");
    }
}
