//! Typed building blocks of a regular expression
//!
//! A pattern is an ordered list of [`Node`] values. Container nodes (groups,
//! alternations, lookarounds) own their children, so a whole tree is a plain
//! value: cloning it yields an independent copy and equality is structural.
//!
//! With the `serde` feature the types use the JSON vocabulary of the block
//! editor: nodes are tagged by `"type"`, quantifiers by `"kind"`.
//! Deserializing bypasses the constructors, so run [`validate`] on trees
//! that arrive as JSON.

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How many times a node may repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum Quantifier {
    /// Exactly once (no suffix)
    #[default]
    One,
    /// `?`
    ZeroOrOne { greedy: bool },
    /// `+`
    OneOrMore { greedy: bool },
    /// `*`
    ZeroOrMore { greedy: bool },
    /// `{n}`
    Exact { n: u32, greedy: bool },
    /// `{n,}`
    AtLeast { n: u32, greedy: bool },
    /// `{min,max}`
    Range { min: u32, max: u32, greedy: bool },
}

impl Quantifier {
    /// Whether this is the implicit "exactly once"
    pub fn is_one(&self) -> bool {
        matches!(self, Quantifier::One)
    }

    /// Whether the quantifier prefers longer matches. `One` counts as greedy.
    pub fn is_greedy(&self) -> bool {
        match *self {
            Quantifier::One => true,
            Quantifier::ZeroOrOne { greedy }
            | Quantifier::OneOrMore { greedy }
            | Quantifier::ZeroOrMore { greedy }
            | Quantifier::Exact { greedy, .. }
            | Quantifier::AtLeast { greedy, .. }
            | Quantifier::Range { greedy, .. } => greedy,
        }
    }

    /// The same repetition with the given greediness
    pub fn with_greedy(self, greedy: bool) -> Self {
        match self {
            Quantifier::One => Quantifier::One,
            Quantifier::ZeroOrOne { .. } => Quantifier::ZeroOrOne { greedy },
            Quantifier::OneOrMore { .. } => Quantifier::OneOrMore { greedy },
            Quantifier::ZeroOrMore { .. } => Quantifier::ZeroOrMore { greedy },
            Quantifier::Exact { n, .. } => Quantifier::Exact { n, greedy },
            Quantifier::AtLeast { n, .. } => Quantifier::AtLeast { n, greedy },
            Quantifier::Range { min, max, .. } => Quantifier::Range { min, max, greedy },
        }
    }
}

/// Predefined character sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PredefKind {
    /// `\d`
    Digit,
    /// `\D`
    NonDigit,
    /// `\w`
    Word,
    /// `\W`
    NonWord,
    /// `\s`
    Space,
    /// `\S`
    NonSpace,
    /// `.`
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AnchorKind {
    /// `^`
    Start,
    /// `$`
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoundaryKind {
    /// `\b`
    Word,
    /// `\B`
    NonWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LookDirection {
    Ahead,
    Behind,
}

/// What a backreference points at: a group index or a group name, never both
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackrefTarget {
    Index(NonZeroU32),
    Name(String),
}

/// The five named ranges a character class is decomposed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NamedSets {
    /// `a-z`
    #[cfg_attr(feature = "serde", serde(rename = "az"))]
    pub lower: bool,
    /// `A-Z`
    #[cfg_attr(feature = "serde", serde(rename = "AZ"))]
    pub upper: bool,
    /// `0-9`
    #[cfg_attr(feature = "serde", serde(rename = "d09"))]
    pub digit: bool,
    /// `_`
    pub underscore: bool,
    /// `\s`
    pub whitespace: bool,
}

impl NamedSets {
    /// Class text of each named range, in decomposition and rendering order
    pub const RANGES: [&'static str; 5] = ["a-z", "A-Z", "0-9", "_", "\\s"];

    pub(crate) fn from_flags([lower, upper, digit, underscore, whitespace]: [bool; 5]) -> Self {
        NamedSets {
            lower,
            upper,
            digit,
            underscore,
            whitespace,
        }
    }

    fn flags(&self) -> [bool; 5] {
        [
            self.lower,
            self.upper,
            self.digit,
            self.underscore,
            self.whitespace,
        ]
    }

    /// Class text of the enabled ranges, in rendering order
    pub fn enabled(&self) -> impl Iterator<Item = &'static str> {
        Self::RANGES
            .into_iter()
            .zip(self.flags())
            .filter_map(|(text, on)| on.then_some(text))
    }

    /// Whether no named range is set
    pub fn is_empty(&self) -> bool {
        !self.flags().contains(&true)
    }
}

/// Contents of a bracket expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharClassPayload {
    /// `[^...]`
    pub negate: bool,
    pub sets: NamedSets,
    /// Remaining members, escaped on output
    pub custom: String,
    /// Original bracket body, re-emitted verbatim when present
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub raw: Option<String>,
}

/// One building block of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Node {
    /// Text matched verbatim
    Literal {
        text: String,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// A predefined character set
    Predef {
        which: PredefKind,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// Start or end of input; cannot repeat
    Anchor { which: AnchorKind },
    /// Word or non-word boundary
    Boundary {
        which: BoundaryKind,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// A bracket expression
    CharClass {
        payload: CharClassPayload,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// A group; a named group is always capturing
    Group {
        capturing: bool,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        name: Option<String>,
        #[cfg_attr(feature = "serde", serde(rename = "nodes", default))]
        children: Vec<Node>,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// Alternatives; each branch is a sequence and may be empty
    Alternation {
        branches: Vec<Vec<Node>>,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// Lookahead or lookbehind
    Look {
        direction: LookDirection,
        positive: bool,
        #[cfg_attr(feature = "serde", serde(rename = "nodes", default))]
        children: Vec<Node>,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
    /// Backreference to a capture group
    Backref {
        #[cfg_attr(feature = "serde", serde(rename = "ref"))]
        target: BackrefTarget,
        #[cfg_attr(feature = "serde", serde(default))]
        quant: Quantifier,
    },
}

impl Node {
    pub fn literal(text: impl Into<String>) -> Self {
        Node::Literal {
            text: text.into(),
            quant: Quantifier::One,
        }
    }

    pub fn predef(which: PredefKind) -> Self {
        Node::Predef {
            which,
            quant: Quantifier::One,
        }
    }

    pub fn anchor(which: AnchorKind) -> Self {
        Node::Anchor { which }
    }

    pub fn boundary(which: BoundaryKind) -> Self {
        Node::Boundary {
            which,
            quant: Quantifier::One,
        }
    }

    pub fn char_class(payload: CharClassPayload) -> Self {
        Node::CharClass {
            payload,
            quant: Quantifier::One,
        }
    }

    /// Create a group. Supplying a name makes the group capturing.
    pub fn group(capturing: bool, name: Option<String>, children: Vec<Node>) -> Self {
        Node::Group {
            capturing: capturing || name.is_some(),
            name,
            children,
            quant: Quantifier::One,
        }
    }

    /// Create a group, rejecting a name on a non-capturing group
    pub fn try_group(
        capturing: bool,
        name: Option<String>,
        children: Vec<Node>,
    ) -> Result<Self, ModelError> {
        match name {
            Some(name) if !capturing => Err(ModelError::NamedNonCapturingGroup(name)),
            name => Ok(Node::group(capturing, name, children)),
        }
    }

    /// Create an alternation. An empty branch list becomes one empty branch.
    pub fn alternation(mut branches: Vec<Vec<Node>>) -> Self {
        if branches.is_empty() {
            branches.push(Vec::new());
        }
        Node::Alternation {
            branches,
            quant: Quantifier::One,
        }
    }

    pub fn look(direction: LookDirection, positive: bool, children: Vec<Node>) -> Self {
        Node::Look {
            direction,
            positive,
            children,
            quant: Quantifier::One,
        }
    }

    /// Backreference by group number; group numbers start at 1
    pub fn backref_index(index: u32) -> Result<Self, ModelError> {
        let index = NonZeroU32::new(index).ok_or(ModelError::ZeroBackrefIndex)?;
        Ok(Node::Backref {
            target: BackrefTarget::Index(index),
            quant: Quantifier::One,
        })
    }

    /// Backreference by group name
    pub fn backref_name(name: impl Into<String>) -> Self {
        Node::Backref {
            target: BackrefTarget::Name(name.into()),
            quant: Quantifier::One,
        }
    }

    /// The same node with a different quantifier. Anchors are returned unchanged.
    pub fn with_quant(mut self, quantifier: Quantifier) -> Self {
        if let Some(slot) = self.quant_mut() {
            *slot = quantifier;
        }
        self
    }

    /// The node's quantifier; anchors always report `One`
    pub fn quant(&self) -> Quantifier {
        match self {
            Node::Anchor { .. } => Quantifier::One,
            Node::Literal { quant, .. }
            | Node::Predef { quant, .. }
            | Node::Boundary { quant, .. }
            | Node::CharClass { quant, .. }
            | Node::Group { quant, .. }
            | Node::Alternation { quant, .. }
            | Node::Look { quant, .. }
            | Node::Backref { quant, .. } => *quant,
        }
    }

    fn quant_mut(&mut self) -> Option<&mut Quantifier> {
        match self {
            Node::Anchor { .. } => None,
            Node::Literal { quant, .. }
            | Node::Predef { quant, .. }
            | Node::Boundary { quant, .. }
            | Node::CharClass { quant, .. }
            | Node::Group { quant, .. }
            | Node::Alternation { quant, .. }
            | Node::Look { quant, .. }
            | Node::Backref { quant, .. } => Some(quant),
        }
    }

    /// Children of a group or lookaround
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Group { children, .. } | Node::Look { children, .. } => Some(children),
            _ => None,
        }
    }

    /// The `"type"` tag of this node
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal { .. } => "literal",
            Node::Predef { .. } => "predef",
            Node::Anchor { .. } => "anchor",
            Node::Boundary { .. } => "boundary",
            Node::CharClass { .. } => "charclass",
            Node::Group { .. } => "group",
            Node::Alternation { .. } => "alternation",
            Node::Look { .. } => "look",
            Node::Backref { .. } => "backref",
        }
    }
}

/// Check the invariants the constructors enforce, across a whole tree
pub fn validate(nodes: &[Node]) -> Result<(), ModelError> {
    for node in nodes {
        match node {
            Node::Group {
                capturing: false,
                name: Some(name),
                ..
            } => return Err(ModelError::NamedNonCapturingGroup(name.clone())),
            Node::Group { children, .. } | Node::Look { children, .. } => validate(children)?,
            Node::Alternation { branches, .. } => {
                for branch in branches {
                    validate(branch)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
