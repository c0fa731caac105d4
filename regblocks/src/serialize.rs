//! Rendering blocks as pattern text
//!
//! Serialization is total: every tree renders, and nothing is validated.

use std::fmt::{self, Write};

use crate::node::{
    AnchorKind, BackrefTarget, BoundaryKind, CharClassPayload, LookDirection, Node, PredefKind,
    Quantifier,
};

/// Characters escaped in literal text
pub const LITERAL_METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Characters escaped in the custom part of a character class
pub const CLASS_METACHARACTERS: &[char] = &['\\', ']', '-', '^'];

/// Render a sequence of nodes as a pattern
///
/// # Example
/// ```
/// use regblocks::{Node, Quantifier, serialize};
///
/// let nodes = vec![Node::literal("a.b").with_quant(Quantifier::OneOrMore { greedy: false })];
/// assert_eq!(serialize(&nodes), r"a\.b+?");
/// ```
pub fn serialize(nodes: &[Node]) -> String {
    Sequence(nodes).to_string()
}

/// Escape every metacharacter in `text` with a backslash
pub fn escape_literal(text: &str) -> String {
    escape_with(text, LITERAL_METACHARACTERS)
}

/// Escape text for use inside brackets
pub fn escape_class(text: &str) -> String {
    escape_with(text, CLASS_METACHARACTERS)
}

fn escape_with(text: &str, specials: &[char]) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if specials.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A borrowed node sequence that displays as pattern text
#[derive(Debug, Clone, Copy)]
pub struct Sequence<'a>(pub &'a [Node]);

impl fmt::Display for Sequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut after_numbered_ref = false;
        for node in self.0 {
            match node {
                // a bare digit here would extend the group number of `\N`
                Node::Literal { text, quant } if after_numbered_ref => {
                    let mut chars = text.chars();
                    match chars.next() {
                        Some(digit) if digit.is_ascii_digit() => write!(
                            f,
                            "\\x{:02x}{}{}",
                            u32::from(digit),
                            escape_literal(chars.as_str()),
                            quant
                        )?,
                        _ => write!(f, "{}", node)?,
                    }
                }
                _ => write!(f, "{}", node)?,
            }
            after_numbered_ref = matches!(
                node,
                Node::Backref {
                    target: BackrefTarget::Index(_),
                    quant: Quantifier::One,
                }
            );
        }
        Ok(())
    }
}

/// Contents of a group or lookaround.
///
/// A lone unquantified alternation is already delimited by the enclosing
/// parentheses, so its branches are written without another `(?:` wrapper.
struct Body<'a>(&'a [Node]);

impl fmt::Display for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [Node::Alternation {
                branches,
                quant: Quantifier::One,
            }] => write!(f, "{}", Branches(branches)),
            nodes => write!(f, "{}", Sequence(nodes)),
        }
    }
}

struct Branches<'a>(&'a [Vec<Node>]);

impl fmt::Display for Branches<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, branch) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_char('|')?;
            }
            write!(f, "{}", Sequence(branch))?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal { text, quant } => write!(f, "{}{}", escape_literal(text), quant),
            Node::Predef { which, quant } => write!(f, "{}{}", which.as_str(), quant),
            Node::Anchor { which } => f.write_str(match which {
                AnchorKind::Start => "^",
                AnchorKind::End => "$",
            }),
            Node::Boundary { which, quant } => {
                let text = match which {
                    BoundaryKind::Word => "\\b",
                    BoundaryKind::NonWord => "\\B",
                };
                write!(f, "{}{}", text, quant)
            }
            Node::CharClass { payload, quant } => write!(f, "{}{}", payload, quant),
            Node::Group {
                capturing,
                name,
                children,
                quant,
            } => {
                f.write_char('(')?;
                match (capturing, name) {
                    (true, Some(name)) => write!(f, "?<{}>", name)?,
                    (true, None) => {}
                    (false, _) => f.write_str("?:")?,
                }
                write!(f, "{}){}", Body(children), quant)
            }
            Node::Alternation { branches, quant } => {
                write!(f, "(?:{}){}", Branches(branches), quant)
            }
            Node::Look {
                direction,
                positive,
                children,
                quant,
            } => {
                let lead = match (direction, positive) {
                    (LookDirection::Ahead, true) => "(?=",
                    (LookDirection::Ahead, false) => "(?!",
                    (LookDirection::Behind, true) => "(?<=",
                    (LookDirection::Behind, false) => "(?<!",
                };
                write!(f, "{}{}){}", lead, Body(children), quant)
            }
            Node::Backref { target, quant } => match target {
                BackrefTarget::Index(index) => write!(f, "\\{}{}", index, quant),
                BackrefTarget::Name(name) => write!(f, "\\k<{}>{}", name, quant),
            },
        }
    }
}

impl PredefKind {
    /// Pattern text of the set
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefKind::Digit => "\\d",
            PredefKind::NonDigit => "\\D",
            PredefKind::Word => "\\w",
            PredefKind::NonWord => "\\W",
            PredefKind::Space => "\\s",
            PredefKind::NonSpace => "\\S",
            PredefKind::Any => ".",
        }
    }
}

/// Bracket expression text, without any quantifier
impl fmt::Display for CharClassPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        if self.negate {
            f.write_char('^')?;
        }
        match &self.raw {
            Some(raw) => f.write_str(raw)?,
            None => {
                for range in self.sets.enabled() {
                    f.write_str(range)?;
                }
                f.write_str(&escape_class(&self.custom))?;
            }
        }
        f.write_char(']')
    }
}

/// The suffix written after a quantified node
impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Quantifier::One => return Ok(()),
            Quantifier::ZeroOrOne { .. } => f.write_char('?')?,
            Quantifier::OneOrMore { .. } => f.write_char('+')?,
            Quantifier::ZeroOrMore { .. } => f.write_char('*')?,
            Quantifier::Exact { n, .. } => write!(f, "{{{}}}", n)?,
            Quantifier::AtLeast { n, .. } => write!(f, "{{{},}}", n)?,
            Quantifier::Range { min, max, .. } => write!(f, "{{{},{}}}", min, max)?,
        }
        if !self.is_greedy() {
            f.write_char('?')?;
        }
        Ok(())
    }
}
