//! Turning pattern text into blocks
//!
//! The text is first parsed into a generic syntax tree by `regblocks-syntax`,
//! then converted node by node. Runs of plain characters collapse into a
//! single literal so `abc` becomes one block, not three.

use regblocks_syntax::{
    self as syntax, AssertionKind, Ast, ClassEscapeKind, GroupKind, Parser, Pattern,
    RepetitionKind,
};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::charclass::decompose_char_class;
use crate::error::{ParseError, Result};
use crate::flags::FlagSet;
use crate::node::{
    AnchorKind, BoundaryKind, LookDirection, Node, PredefKind, Quantifier,
};

/// Blocks recovered from a pattern, with the normalized flags
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Parsed {
    pub nodes: Vec<Node>,
    pub flags: FlagSet,
}

/// Parse pattern text into blocks.
///
/// Unknown characters in `flags` are ignored; the `u` flag switches the
/// syntax engine to unicode mode.
///
/// # Example
/// ```
/// use regblocks::{Node, Quantifier, parse};
///
/// let parsed = parse("a{2,3}", "ig").unwrap();
/// assert_eq!(
///     parsed.nodes,
///     vec![Node::literal("a").with_quant(Quantifier::Range { min: 2, max: 3, greedy: true })]
/// );
/// assert_eq!(parsed.flags.to_string(), "gi");
/// ```
pub fn parse(pattern: &str, flags: &str) -> Result<Parsed> {
    let flags = FlagSet::parse(flags);
    let syntax = parse_syntax(pattern, &flags)?;
    let nodes = convert_pattern(pattern, &flags, &syntax)?;
    Ok(Parsed { nodes, flags })
}

pub(crate) fn parse_syntax(pattern: &str, flags: &FlagSet) -> Result<Pattern> {
    Parser::new(pattern)
        .unicode(flags.unicode)
        .parse()
        .map_err(|err| ParseError::syntax(pattern, flags, err))
}

pub(crate) fn convert_pattern(
    pattern: &str,
    flags: &FlagSet,
    syntax: &Pattern,
) -> Result<Vec<Node>> {
    Converter { pattern, flags }.sequence(&syntax.ast)
}

struct Converter<'a> {
    pattern: &'a str,
    flags: &'a FlagSet,
}

impl Converter<'_> {
    /// Convert an expression that stands for a whole sequence: a pattern, a
    /// group body, or one branch of an alternation.
    fn sequence(&self, ast: &Ast) -> Result<Vec<Node>> {
        match ast {
            Ast::Empty(_) => Ok(Vec::new()),
            Ast::Concat(concat) => self.terms(&concat.asts),
            Ast::Alternation(alt) => Ok(vec![self.alternation(&alt.asts)?]),
            other => self.terms(std::slice::from_ref(other)),
        }
    }

    fn terms(&self, asts: &[Ast]) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut run = String::new();

        for ast in asts {
            match ast {
                Ast::Char(c) => run.push(c.value),
                Ast::Empty(_) => {}
                other => {
                    flush(&mut run, &mut nodes);
                    nodes.push(self.node(other)?);
                }
            }
        }
        flush(&mut run, &mut nodes);
        Ok(nodes)
    }

    fn alternation(&self, branches: &[Ast]) -> Result<Node> {
        let mut converted = Vec::with_capacity(branches.len());
        for branch in branches {
            converted.push(self.sequence(branch)?);
        }
        Ok(Node::alternation(converted))
    }

    /// Convert an expression that occupies a single block
    fn node(&self, ast: &Ast) -> Result<Node> {
        let node = match ast {
            Ast::Char(c) => Node::literal(c.value),
            Ast::Dot(_) => Node::predef(PredefKind::Any),
            Ast::ClassEscape(escape) => Node::predef(predef_kind(escape.kind)),
            Ast::Property(property) => {
                return Err(ParseError::unsupported(
                    self.pattern,
                    self.flags,
                    "unicode property escape",
                    property.span,
                ));
            }
            Ast::Class(class) => {
                let mut payload = decompose_char_class(&class.raw);
                payload.negate = class.negated;
                Node::char_class(payload)
            }
            Ast::Group(group) => {
                let children = self.sequence(&group.ast)?;
                match &group.kind {
                    GroupKind::Capturing { name, .. } => Node::group(true, name.clone(), children),
                    GroupKind::NonCapturing => Node::group(false, None, children),
                }
            }
            Ast::Assertion(assertion) => match assertion.kind {
                AssertionKind::Start => Node::anchor(AnchorKind::Start),
                AssertionKind::End => Node::anchor(AnchorKind::End),
                AssertionKind::WordBoundary => Node::boundary(BoundaryKind::Word),
                AssertionKind::NotWordBoundary => Node::boundary(BoundaryKind::NonWord),
            },
            Ast::LookAround(look) => {
                let direction = match look.direction {
                    syntax::LookDirection::Ahead => LookDirection::Ahead,
                    syntax::LookDirection::Behind => LookDirection::Behind,
                };
                Node::look(direction, !look.negated, self.sequence(&look.ast)?)
            }
            Ast::Backref(backref) => match &backref.target {
                syntax::BackrefTarget::Index(index) => Node::backref_index(*index)
                    .map_err(|_| {
                        ParseError::unsupported(
                            self.pattern,
                            self.flags,
                            "backreference to group 0",
                            backref.span,
                        )
                    })?,
                syntax::BackrefTarget::Name(name) => Node::backref_name(name.clone()),
            },
            Ast::Repetition(rep) => {
                self.node(&rep.ast)?.with_quant(quantifier(rep.kind, rep.greedy))
            }
            Ast::Alternation(alt) => self.alternation(&alt.asts)?,
            // A sequence where one block is expected keeps its grouping
            Ast::Concat(_) | Ast::Empty(_) => Node::group(false, None, self.sequence(ast)?),
        };
        Ok(node)
    }
}

fn flush(run: &mut String, nodes: &mut Vec<Node>) {
    if !run.is_empty() {
        nodes.push(Node::literal(std::mem::take(run)));
    }
}

fn predef_kind(kind: ClassEscapeKind) -> PredefKind {
    match kind {
        ClassEscapeKind::Digit => PredefKind::Digit,
        ClassEscapeKind::NotDigit => PredefKind::NonDigit,
        ClassEscapeKind::Word => PredefKind::Word,
        ClassEscapeKind::NotWord => PredefKind::NonWord,
        ClassEscapeKind::Space => PredefKind::Space,
        ClassEscapeKind::NotSpace => PredefKind::NonSpace,
    }
}

fn quantifier(kind: RepetitionKind, greedy: bool) -> Quantifier {
    match kind {
        RepetitionKind::ZeroOrOne => Quantifier::ZeroOrOne { greedy },
        RepetitionKind::ZeroOrMore => Quantifier::ZeroOrMore { greedy },
        RepetitionKind::OneOrMore => Quantifier::OneOrMore { greedy },
        RepetitionKind::Range { from, to: None } => Quantifier::AtLeast { n: from, greedy },
        RepetitionKind::Range { from, to: Some(to) } if to == from => {
            Quantifier::Exact { n: from, greedy }
        }
        RepetitionKind::Range { from, to: Some(to) } => Quantifier::Range {
            min: from,
            max: to,
            greedy,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BackrefTarget, NamedSets};

    fn nodes(pattern: &str) -> Vec<Node> {
        parse(pattern, "").unwrap().nodes
    }

    #[test]
    fn test_parses_literals() {
        assert_eq!(nodes("abc"), vec![Node::literal("abc")]);
        assert_eq!(nodes(r"a\.b\/"), vec![Node::literal("a.b/")]);
        assert_eq!(nodes(""), vec![]);
    }

    #[test]
    fn test_parses_groups_and_alternation() {
        let alt = Node::alternation(vec![vec![Node::literal("a")], vec![Node::literal("b")]]);
        assert_eq!(nodes("(a|b)"), vec![Node::group(true, None, vec![alt])]);
    }

    #[test]
    fn test_parses_quantifiers() {
        assert_eq!(
            nodes("a{2,3}"),
            vec![Node::literal("a").with_quant(Quantifier::Range { min: 2, max: 3, greedy: true })]
        );
        assert_eq!(
            nodes("x{4}y{1,}?"),
            vec![
                Node::literal("x").with_quant(Quantifier::Exact { n: 4, greedy: true }),
                Node::literal("y").with_quant(Quantifier::AtLeast { n: 1, greedy: false }),
            ]
        );
    }

    #[test]
    fn test_parses_lookarounds() {
        assert_eq!(
            nodes("(?=a)b"),
            vec![
                Node::look(LookDirection::Ahead, true, vec![Node::literal("a")]),
                Node::literal("b"),
            ]
        );
        assert_eq!(
            nodes("(?<!x)"),
            vec![Node::look(LookDirection::Behind, false, vec![Node::literal("x")])]
        );
    }

    #[test]
    fn test_quantified_char_splits_run() {
        assert_eq!(
            nodes("abc+d"),
            vec![
                Node::literal("ab"),
                Node::literal("c").with_quant(Quantifier::OneOrMore { greedy: true }),
                Node::literal("d"),
            ]
        );
    }

    #[test]
    fn test_predefs_anchors_and_boundaries() {
        assert_eq!(
            nodes(r"^\d\D\w\W\s\S.\b\B$"),
            vec![
                Node::anchor(AnchorKind::Start),
                Node::predef(PredefKind::Digit),
                Node::predef(PredefKind::NonDigit),
                Node::predef(PredefKind::Word),
                Node::predef(PredefKind::NonWord),
                Node::predef(PredefKind::Space),
                Node::predef(PredefKind::NonSpace),
                Node::predef(PredefKind::Any),
                Node::boundary(BoundaryKind::Word),
                Node::boundary(BoundaryKind::NonWord),
                Node::anchor(AnchorKind::End),
            ]
        );
    }

    #[test]
    fn test_char_class_is_decomposed() {
        let parsed = nodes("[^a-z0-9.]*");
        let [Node::CharClass { payload, quant }] = parsed.as_slice() else {
            panic!("expected one char class, got {:?}", parsed);
        };
        assert!(payload.negate);
        assert_eq!(
            payload.sets,
            NamedSets {
                lower: true,
                digit: true,
                ..NamedSets::default()
            }
        );
        assert_eq!(payload.custom, ".");
        assert_eq!(payload.raw.as_deref(), Some("a-z0-9."));
        assert_eq!(*quant, Quantifier::ZeroOrMore { greedy: true });
    }

    #[test]
    fn test_named_group_and_backrefs() {
        assert_eq!(
            nodes(r"(?<q>['])x\k<q>\1"),
            vec![
                Node::group(
                    true,
                    Some("q".to_string()),
                    vec![Node::char_class(decompose_char_class("'"))]
                ),
                Node::literal("x"),
                Node::backref_name("q"),
                Node::backref_index(1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_backref_target_index() {
        let parsed = nodes(r"(a)(b)\2");
        assert!(matches!(
            &parsed[2],
            Node::Backref { target: BackrefTarget::Index(n), .. } if n.get() == 2
        ));
    }

    #[test]
    fn test_empty_branch() {
        assert_eq!(
            nodes("a|"),
            vec![Node::alternation(vec![vec![Node::literal("a")], vec![]])]
        );
    }

    #[test]
    fn test_branches_are_sequences() {
        assert_eq!(
            nodes(r"ab\d|(?:c)"),
            vec![Node::alternation(vec![
                vec![Node::literal("ab"), Node::predef(PredefKind::Digit)],
                vec![Node::group(false, None, vec![Node::literal("c")])],
            ])]
        );
    }

    #[test]
    fn test_quantified_group() {
        assert_eq!(
            nodes("(?:ab)+?"),
            vec![Node::group(false, None, vec![Node::literal("ab")])
                .with_quant(Quantifier::OneOrMore { greedy: false })]
        );
    }

    #[test]
    fn test_flags_are_normalized() {
        let parsed = parse("a", "yxgi").unwrap();
        assert_eq!(parsed.flags.to_string(), "giy");
    }

    #[test]
    fn test_syntax_errors_are_reported() {
        let err = parse("(a", "").unwrap_err();
        assert_eq!(err.message, "Invalid regular expression: /(a/: Unterminated group");

        let err = parse("*a", "g").unwrap_err();
        assert_eq!(err.message, "Invalid regular expression: /*a/g: Nothing to repeat");
        assert!(err.span.is_some());
    }

    #[test]
    fn test_unicode_flag_reaches_syntax_engine() {
        assert_eq!(nodes(r"\u{41}").len(), 1);
        assert_eq!(parse(r"\u{41}", "u").unwrap().nodes, vec![Node::literal("A")]);
    }

    #[test]
    fn test_property_escape_unsupported() {
        let err = parse(r"\p{L}", "u").unwrap_err();
        assert!(err.message.contains("Unsupported syntax"));
        // inside a class it is kept in the raw body
        assert!(parse(r"[\p{L}]", "u").is_ok());
    }
}
