//! Regblocks syntax library
//!
//! An ECMAScript regular expression parser that produces a generic syntax
//! tree. It validates patterns the way a JavaScript engine does and reports
//! the same diagnostics, but it performs no matching.

pub mod ast;
pub mod error;
pub mod groups;
pub mod lexer;
pub mod parser;

pub use ast::{
    Alternation, Assertion, AssertionKind, Ast, Backref, BackrefTarget, Char, Class, ClassEscape,
    ClassEscapeKind, ClassItem, Concat, Group, GroupKind, LookAround, LookDirection, Pattern,
    Property, Repetition, RepetitionKind,
};
pub use error::{Result, Span, SyntaxError, SyntaxErrorKind};
pub use groups::{GroupInfo, GroupRegistry, GroupRegistryError, GroupScan};
pub use lexer::Lexer;
pub use parser::{MAX_NESTING, Parser, parse};
