//! Error types for the block model
//!
//! Parsing pattern text is the only operation that fails at runtime; its
//! [`ParseError`] carries the syntax engine's diagnostic verbatim. Model
//! errors come from the invariant-checking constructors and tree edits.

use regblocks_syntax::{Span, SyntaxError};
use thiserror::Error;

use crate::flags::FlagSet;

/// Pattern text that could not be turned into blocks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable diagnostic, ready to show to the user
    pub message: String,
    /// Location of the problem in the pattern, when known
    pub span: Option<Span>,
}

impl ParseError {
    /// Wrap a syntax engine diagnostic, naming the pattern it was raised for
    pub(crate) fn syntax(pattern: &str, flags: &FlagSet, err: SyntaxError) -> Self {
        ParseError {
            message: format!("Invalid regular expression: /{}/{}: {}", pattern, flags, err),
            span: Some(err.span),
        }
    }

    /// Valid syntax that has no block counterpart
    pub(crate) fn unsupported(pattern: &str, flags: &FlagSet, what: &str, span: Span) -> Self {
        ParseError {
            message: format!(
                "Invalid regular expression: /{}/{}: Unsupported syntax: {}",
                pattern, flags, what
            ),
            span: Some(span),
        }
    }
}

/// Violations of the block model's invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A name was given to a group marked non-capturing
    #[error("non-capturing group cannot be named '{0}'")]
    NamedNonCapturingGroup(String),

    /// Group numbers start at 1
    #[error("backreference index must be at least 1")]
    ZeroBackrefIndex,

    /// A path that does not lead to a node
    #[error("no node at path {0}")]
    InvalidPath(String),
}

/// Result type alias for parsing
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use regblocks_syntax::SyntaxErrorKind;

    #[test]
    fn test_syntax_error_message() {
        let flags = FlagSet::parse("gi");
        let err = SyntaxError::new(SyntaxErrorKind::UnterminatedGroup, Span::new(0, 2));
        let err = ParseError::syntax("(a", &flags, err);
        assert_eq!(
            err.to_string(),
            "Invalid regular expression: /(a/gi: Unterminated group"
        );
        assert_eq!(err.span, Some(Span::new(0, 2)));
    }

    #[test]
    fn test_unsupported_message() {
        let flags = FlagSet::parse("u");
        let span = Span::new(0, 5);
        let err = ParseError::unsupported(r"\p{L}", &flags, "unicode property escape", span);
        assert_eq!(
            err.message,
            r"Invalid regular expression: /\p{L}/u: Unsupported syntax: unicode property escape"
        );
    }

    #[test]
    fn test_model_error_display() {
        assert_eq!(
            ModelError::NamedNonCapturingGroup("x".to_string()).to_string(),
            "non-capturing group cannot be named 'x'"
        );
        assert_eq!(
            ModelError::InvalidPath("[3]".to_string()).to_string(),
            "no node at path [3]"
        );
    }
}
