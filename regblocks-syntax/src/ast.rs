//! Generic abstract syntax tree for ECMAScript regular expressions
//!
//! The tree is a faithful picture of the pattern text: every construct the
//! grammar accepts has a variant here, and every node records the span of
//! text it came from. Character classes additionally keep their raw body so
//! consumers can re-emit them byte for byte.

use crate::error::Span;

/// A fully parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The top-level expression
    pub ast: Ast,
    /// Number of capturing groups in the pattern
    pub capture_count: u32,
    /// Names of named groups, in order of appearance
    pub group_names: Vec<String>,
}

/// An expression in the generic syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// The empty expression (an empty pattern or alternative)
    Empty(Span),
    /// A single character, escaped or not
    Char(Char),
    /// The wildcard `.`
    Dot(Span),
    /// A class escape outside brackets: `\d`, `\W`, ...
    ClassEscape(ClassEscape),
    /// A unicode property escape outside brackets: `\p{L}`
    Property(Property),
    /// A bracket expression `[...]`
    Class(Class),
    /// A parenthesized group
    Group(Group),
    /// A zero-width assertion: `^`, `$`, `\b`, `\B`
    Assertion(Assertion),
    /// A lookahead or lookbehind
    LookAround(LookAround),
    /// A backreference `\1` or `\k<name>`
    Backref(Backref),
    /// A repeated expression
    Repetition(Repetition),
    /// A sequence of expressions
    Concat(Concat),
    /// Alternatives separated by `|`
    Alternation(Alternation),
}

impl Ast {
    /// The span of pattern text this expression covers
    pub fn span(&self) -> Span {
        match self {
            Ast::Empty(span) | Ast::Dot(span) => *span,
            Ast::Char(c) => c.span,
            Ast::ClassEscape(e) => e.span,
            Ast::Property(p) => p.span,
            Ast::Class(c) => c.span,
            Ast::Group(g) => g.span,
            Ast::Assertion(a) => a.span,
            Ast::LookAround(l) => l.span,
            Ast::Backref(b) => b.span,
            Ast::Repetition(r) => r.span,
            Ast::Concat(c) => c.span,
            Ast::Alternation(a) => a.span,
        }
    }

    /// Whether this expression is a plain character
    pub fn is_char(&self) -> bool {
        matches!(self, Ast::Char(_))
    }
}

/// A single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char {
    /// The character value after escape processing
    pub value: char,
    /// Whether the character was written as an escape sequence
    pub escaped: bool,
    pub span: Span,
}

/// A class escape `\d \D \w \W \s \S`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassEscape {
    pub kind: ClassEscapeKind,
    pub span: Span,
}

/// The six shorthand classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassEscapeKind {
    Digit,
    NotDigit,
    Word,
    NotWord,
    Space,
    NotSpace,
}

impl ClassEscapeKind {
    /// Map an escape letter to its class, if it names one
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'd' => Some(ClassEscapeKind::Digit),
            'D' => Some(ClassEscapeKind::NotDigit),
            'w' => Some(ClassEscapeKind::Word),
            'W' => Some(ClassEscapeKind::NotWord),
            's' => Some(ClassEscapeKind::Space),
            'S' => Some(ClassEscapeKind::NotSpace),
            _ => None,
        }
    }
}

/// A unicode property escape `\p{Name}` / `\P{Name=Value}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub negated: bool,
    pub name: String,
    pub value: Option<String>,
    pub span: Span,
}

/// A bracket expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    /// Whether the class starts with `^`
    pub negated: bool,
    /// The parsed class members
    pub items: Vec<ClassItem>,
    /// The text between the brackets, after any `^`
    pub raw: String,
    pub span: Span,
}

/// A member of a bracket expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Char(char),
    Range(char, char),
    /// A lone surrogate, e.g. `\uD800`
    CodeUnit(u32),
    /// A range with a lone surrogate at either end, e.g. `\uD800-\uDFFF`
    CodeUnitRange(u32, u32),
    Escape(ClassEscapeKind),
    Property(Property),
}

/// A parenthesized group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub ast: Box<Ast>,
    pub span: Span,
}

/// The flavour of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// `(...)` or `(?<name>...)`, with its 1-based capture index
    Capturing { index: u32, name: Option<String> },
    /// `(?:...)`
    NonCapturing,
}

/// A simple zero-width assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assertion {
    pub kind: AssertionKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    /// `^`
    Start,
    /// `$`
    End,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

/// A lookaround assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookAround {
    pub direction: LookDirection,
    /// `true` for `(?!` and `(?<!`
    pub negated: bool,
    pub ast: Box<Ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookDirection {
    Ahead,
    Behind,
}

/// A backreference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backref {
    pub target: BackrefTarget,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackrefTarget {
    Index(u32),
    Name(String),
}

/// A repeated expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    pub kind: RepetitionKind,
    pub greedy: bool,
    pub ast: Box<Ast>,
    pub span: Span,
}

/// How many times an expression repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionKind {
    /// `?`
    ZeroOrOne,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `{from}`, `{from,}` or `{from,to}`
    Range { from: u32, to: Option<u32> },
}

/// A sequence of expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concat {
    pub asts: Vec<Ast>,
    pub span: Span,
}

/// Alternatives separated by `|`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation {
    pub asts: Vec<Ast>,
    pub span: Span,
}
