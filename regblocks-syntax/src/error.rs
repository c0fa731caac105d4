//! Error types for the syntax parser
//!
//! Diagnostics use the wording ECMAScript engines report for the same
//! mistakes, so callers can surface them to users unchanged.

use std::fmt;
use thiserror::Error;

/// A syntax error with the location of the offending input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct SyntaxError {
    /// The specific kind of syntax error
    pub kind: SyntaxErrorKind,
    /// Byte range in the pattern where the error was detected
    pub span: Span,
}

impl SyntaxError {
    /// Create a new syntax error
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }

    /// Byte offset where the error starts
    pub fn position(&self) -> usize {
        self.span.start
    }
}

/// Specific kinds of syntax errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A quantifier with no preceding atom, or following an assertion
    #[error("Nothing to repeat")]
    NothingToRepeat,

    /// `(` without a matching `)`
    #[error("Unterminated group")]
    UnterminatedGroup,

    /// `)` without a matching `(`
    #[error("Unmatched ')'")]
    UnmatchedParen,

    /// A stray `{`, `}` or `]` in unicode mode
    #[error("Lone quantifier brackets")]
    LoneQuantifierBrackets,

    /// `[` without a matching `]`
    #[error("Unterminated character class")]
    UnterminatedCharacterClass,

    /// A class range such as `z-a`
    #[error("Range out of order in character class")]
    RangeOutOfOrder,

    /// A counted quantifier such as `{3,2}`
    #[error("numbers out of order in {{}} quantifier")]
    QuantifierOutOfOrder,

    /// A counted quantifier whose bounds do not fit in 32 bits
    #[error("Quantifier bound too large")]
    QuantifierTooLarge,

    /// A trailing backslash
    #[error("\\ at end of pattern")]
    TrailingBackslash,

    /// An escape that is not allowed in the current mode
    #[error("Invalid escape")]
    InvalidEscape,

    /// A decimal escape that is neither a backreference nor `\0` (unicode mode)
    #[error("Invalid decimal escape")]
    InvalidDecimalEscape,

    /// A class escape used as a range endpoint (unicode mode)
    #[error("Invalid class escape")]
    InvalidClassEscape,

    /// A malformed `\u` escape
    #[error("Invalid Unicode escape")]
    InvalidUnicodeEscape,

    /// A `\u` escape naming an unpaired surrogate outside brackets
    #[error("Lone surrogate is not supported")]
    LoneSurrogate,

    /// Groups and lookarounds nested past the parser's limit
    #[error("Regular expression too deeply nested")]
    NestingTooDeep,

    /// A malformed `\p{...}` escape
    #[error("Invalid property name")]
    InvalidPropertyName,

    /// An unsupported `(?` group prefix
    #[error("Invalid group")]
    InvalidGroup,

    /// A malformed `(?<name>` group name
    #[error("Invalid capture group name")]
    InvalidGroupName,

    /// Two capture groups sharing a name
    #[error("Duplicate capture group name")]
    DuplicateGroupName(String),

    /// `\k<name>` referring to a group that does not exist
    #[error("Invalid named capture referenced")]
    UndefinedGroupName(String),

    /// A malformed `\k` escape
    #[error("Invalid named reference")]
    InvalidNamedReference,
}

/// A span representing a location in the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create an empty span at a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Result type alias for syntax operations
pub type Result<T> = std::result::Result<T, SyntaxError>;
