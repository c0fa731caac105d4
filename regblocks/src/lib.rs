//! Regblocks Core Library
//!
//! Typed building blocks for regular expressions, kept in sync with
//! ECMAScript pattern text in both directions: [`serialize`] renders blocks
//! as a pattern, [`parse`] recovers blocks from a pattern.

pub mod charclass;
pub mod convert;
pub mod edit;
pub mod error;
pub mod flags;
pub mod inspect;
pub mod node;
pub mod serialize;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use charclass::decompose_char_class;
pub use convert::{Parsed, parse};
pub use edit::{NodePath, Step, contains_path, get_at, insert_at, remove_at, replace_at};
pub use error::{ModelError, ParseError, Result};
pub use flags::FlagSet;
pub use inspect::{Inspection, inspect};
pub use node::{
    AnchorKind, BackrefTarget, BoundaryKind, CharClassPayload, LookDirection, NamedSets, Node,
    PredefKind, Quantifier, validate,
};
pub use regblocks_syntax::Span;
pub use serialize::{Sequence, escape_class, escape_literal, serialize};
