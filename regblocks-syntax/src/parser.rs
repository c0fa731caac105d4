//! Parser for ECMAScript regex patterns
//!
//! A recursive descent parser that turns pattern text into the generic
//! [`Ast`]. It follows the ECMAScript grammar including the web-compat
//! relaxations (Annex B) that apply outside unicode mode.
//!
//! Grammar (in order of precedence, lowest to highest):
//!   disjunction := alternative ( '|' alternative )*
//!   alternative := term*
//!   term        := atom quantifier?
//!   quantifier  := ( '*' | '+' | '?' | '{' n (',' m?)? '}' ) '?'?
//!   atom        := char | '.' | '^' | '$' | escape | class | group
//!   group       := '(' ( '?:' | '?=' | '?!' | '?<=' | '?<!' | '?<' name '>' )? disjunction ')'
//!   class       := '[' '^'? ( class_atom ( '-' class_atom )? )* ']'

use crate::ast::{
    Alternation, Assertion, AssertionKind, Ast, Backref, BackrefTarget, Char, Class, ClassEscape,
    ClassEscapeKind, ClassItem, Concat, Group, GroupKind, LookAround, LookDirection, Pattern,
    Property, Repetition, RepetitionKind,
};
use crate::error::{Result, Span, SyntaxError, SyntaxErrorKind};
use crate::groups::{GroupRegistry, GroupRegistryError, GroupScan};
use crate::lexer::Lexer;

/// Characters that may be identity-escaped in unicode mode
const SYNTAX_CHARS: &str = "^$\\.*+?()[]{}|/";

/// Deepest group or lookaround nesting accepted
pub const MAX_NESTING: usize = 128;

/// Parser for regex patterns
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    unicode: bool,
    scan: GroupScan,
    groups: GroupRegistry,
    named_refs: Vec<(String, Span)>,
    depth: usize,
}

/// A single member parsed inside brackets, before range assembly
enum ClassAtom {
    /// A code point, or a lone surrogate code unit
    Char(u32),
    Escape(ClassEscapeKind),
    Property(Property),
}

impl From<ClassAtom> for ClassItem {
    fn from(atom: ClassAtom) -> Self {
        match atom {
            ClassAtom::Char(code) => match char::from_u32(code) {
                Some(c) => ClassItem::Char(c),
                None => ClassItem::CodeUnit(code),
            },
            ClassAtom::Escape(kind) => ClassItem::Escape(kind),
            ClassAtom::Property(p) => ClassItem::Property(p),
        }
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input string
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            unicode: false,
            scan: GroupScan::default(),
            groups: GroupRegistry::new(),
            named_refs: Vec::new(),
            depth: 0,
        }
    }

    /// Parse with unicode-mode (`u` flag) rules
    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    /// Parse the entire input and return the pattern
    pub fn parse(&mut self) -> Result<Pattern> {
        self.scan = GroupScan::of(self.lexer.input());
        let ast = self.parse_disjunction()?;

        // Only an unmatched ')' stops the top-level disjunction early
        if !self.lexer.is_eof() {
            let pos = self.lexer.position();
            return Err(self.error(SyntaxErrorKind::UnmatchedParen, pos));
        }

        for (name, span) in &self.named_refs {
            if !self.groups.has_name(name) {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UndefinedGroupName(name.clone()),
                    *span,
                ));
            }
        }

        Ok(Pattern {
            ast,
            capture_count: self.groups.group_count(),
            group_names: self.groups.names(),
        })
    }

    fn error(&self, kind: SyntaxErrorKind, start: usize) -> SyntaxError {
        SyntaxError::new(kind, Span::new(start, self.lexer.position()))
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.lexer.position())
    }

    /// disjunction := alternative ( '|' alternative )*
    fn parse_disjunction(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        let mut alternatives = vec![self.parse_alternative()?];

        while self.lexer.eat('|') {
            alternatives.push(self.parse_alternative()?);
        }

        if alternatives.len() == 1 {
            return Ok(alternatives.remove(0));
        }
        Ok(Ast::Alternation(Alternation {
            asts: alternatives,
            span: self.span_from(start),
        }))
    }

    /// alternative := term*
    fn parse_alternative(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        let mut terms = Vec::new();

        while let Some(c) = self.lexer.peek() {
            if c == '|' || c == ')' {
                break;
            }
            terms.push(self.parse_term()?);
        }

        match terms.len() {
            0 => Ok(Ast::Empty(Span::at(start))),
            1 => Ok(terms.remove(0)),
            _ => Ok(Ast::Concat(Concat {
                asts: terms,
                span: self.span_from(start),
            })),
        }
    }

    /// term := atom quantifier?
    fn parse_term(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        let atom = self.parse_atom()?;

        let quant_start = self.lexer.position();
        let Some((kind, greedy)) = self.parse_quantifier()? else {
            return Ok(atom);
        };
        if !self.is_quantifiable(&atom) {
            return Err(self.error(SyntaxErrorKind::NothingToRepeat, quant_start));
        }

        Ok(Ast::Repetition(Repetition {
            kind,
            greedy,
            ast: Box::new(atom),
            span: self.span_from(start),
        }))
    }

    fn is_quantifiable(&self, atom: &Ast) -> bool {
        match atom {
            Ast::Assertion(_) => false,
            // Annex B allows quantified lookaheads outside unicode mode
            Ast::LookAround(look) => look.direction == LookDirection::Ahead && !self.unicode,
            _ => true,
        }
    }

    /// quantifier := ( '*' | '+' | '?' | braces ) '?'?
    fn parse_quantifier(&mut self) -> Result<Option<(RepetitionKind, bool)>> {
        let kind = match self.lexer.peek() {
            Some('*') => {
                self.lexer.advance();
                RepetitionKind::ZeroOrMore
            }
            Some('+') => {
                self.lexer.advance();
                RepetitionKind::OneOrMore
            }
            Some('?') => {
                self.lexer.advance();
                RepetitionKind::ZeroOrOne
            }
            Some('{') => match self.parse_braces()? {
                Some(kind) => kind,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        let greedy = !self.lexer.eat('?');
        Ok(Some((kind, greedy)))
    }

    /// Try to read `{n}`, `{n,}` or `{n,m}`.
    ///
    /// Outside unicode mode a brace that does not form a quantifier is a
    /// literal, so this consumes nothing and returns `None` in that case.
    fn parse_braces(&mut self) -> Result<Option<RepetitionKind>> {
        let start = self.lexer.position();
        self.lexer.advance();

        let bounds = self.lexer.read_decimal().and_then(|from| {
            let to = if self.lexer.eat(',') {
                self.lexer.read_decimal()
            } else {
                Some(from)
            };
            self.lexer.eat('}').then_some((from, to))
        });

        let Some((from, to)) = bounds else {
            if self.unicode {
                return Err(self.error(SyntaxErrorKind::LoneQuantifierBrackets, start));
            }
            self.lexer.reset(start);
            return Ok(None);
        };

        if let Some(to) = to {
            if to < from {
                return Err(self.error(SyntaxErrorKind::QuantifierOutOfOrder, start));
            }
        }
        let narrow = |n: u64| u32::try_from(n).ok();
        let from = narrow(from);
        let to = to.map(narrow);
        match (from, to) {
            (Some(from), None) => Ok(Some(RepetitionKind::Range { from, to: None })),
            (Some(from), Some(Some(to))) => Ok(Some(RepetitionKind::Range { from, to: Some(to) })),
            _ => Err(self.error(SyntaxErrorKind::QuantifierTooLarge, start)),
        }
    }

    /// atom := char | '.' | '^' | '$' | escape | class | group
    fn parse_atom(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        let Some(c) = self.lexer.peek() else {
            return Ok(Ast::Empty(Span::at(start)));
        };

        match c {
            '^' | '$' => {
                self.lexer.advance();
                let kind = if c == '^' {
                    AssertionKind::Start
                } else {
                    AssertionKind::End
                };
                Ok(Ast::Assertion(Assertion {
                    kind,
                    span: self.span_from(start),
                }))
            }
            '.' => {
                self.lexer.advance();
                Ok(Ast::Dot(self.span_from(start)))
            }
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '\\' => self.parse_atom_escape(),
            '*' | '+' | '?' => {
                self.lexer.advance();
                Err(self.error(SyntaxErrorKind::NothingToRepeat, start))
            }
            '{' => {
                if self.parse_braces()?.is_some() {
                    return Err(self.error(SyntaxErrorKind::NothingToRepeat, start));
                }
                self.lexer.advance();
                Ok(self.char_node('{', false, start))
            }
            '}' | ']' if self.unicode => {
                self.lexer.advance();
                Err(self.error(SyntaxErrorKind::LoneQuantifierBrackets, start))
            }
            _ => {
                self.lexer.advance();
                Ok(self.char_node(c, false, start))
            }
        }
    }

    fn char_node(&self, value: char, escaped: bool, start: usize) -> Ast {
        Ast::Char(Char {
            value,
            escaped,
            span: self.span_from(start),
        })
    }

    /// group := '(' prefix? disjunction ')'
    fn parse_group(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        self.lexer.advance();
        if self.depth >= MAX_NESTING {
            return Err(self.error(SyntaxErrorKind::NestingTooDeep, start));
        }

        enum Opened {
            Group(GroupKind),
            Look(LookDirection, bool),
        }

        let opened = if self.lexer.eat('?') {
            if self.lexer.eat(':') {
                Opened::Group(GroupKind::NonCapturing)
            } else if self.lexer.eat('=') {
                Opened::Look(LookDirection::Ahead, false)
            } else if self.lexer.eat('!') {
                Opened::Look(LookDirection::Ahead, true)
            } else if self.lexer.eat_str("<=") {
                Opened::Look(LookDirection::Behind, false)
            } else if self.lexer.eat_str("<!") {
                Opened::Look(LookDirection::Behind, true)
            } else if self.lexer.eat('<') {
                let name = self.parse_group_name(start)?;
                let index = self.register_group(Some(name.clone()), start)?;
                Opened::Group(GroupKind::Capturing {
                    index,
                    name: Some(name),
                })
            } else {
                return Err(self.error(SyntaxErrorKind::InvalidGroup, start));
            }
        } else {
            let index = self.register_group(None, start)?;
            Opened::Group(GroupKind::Capturing { index, name: None })
        };

        self.depth += 1;
        let ast = self.parse_disjunction();
        self.depth -= 1;
        let ast = Box::new(ast?);
        if !self.lexer.eat(')') {
            return Err(self.error(SyntaxErrorKind::UnterminatedGroup, start));
        }
        let span = self.span_from(start);

        Ok(match opened {
            Opened::Group(kind) => Ast::Group(Group { kind, ast, span }),
            Opened::Look(direction, negated) => Ast::LookAround(LookAround {
                direction,
                negated,
                ast,
                span,
            }),
        })
    }

    /// Read `name>` after `(?<`
    fn parse_group_name(&mut self, start: usize) -> Result<String> {
        let name = self.lexer.read_identifier().map(str::to_string);
        let closed = name.is_some() && self.lexer.eat('>');
        match name {
            Some(name) if closed => Ok(name),
            _ => Err(self.error(SyntaxErrorKind::InvalidGroupName, start)),
        }
    }

    fn register_group(&mut self, name: Option<String>, start: usize) -> Result<u32> {
        self.groups.register_group(name).map_err(|err| match err {
            GroupRegistryError::DuplicateGroupName(name) => {
                self.error(SyntaxErrorKind::DuplicateGroupName(name), start)
            }
        })
    }

    /// An escape outside brackets
    fn parse_atom_escape(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        self.lexer.advance();
        let Some(c) = self.lexer.peek() else {
            return Err(self.error(SyntaxErrorKind::TrailingBackslash, start));
        };

        if let Some(kind) = ClassEscapeKind::from_letter(c) {
            self.lexer.advance();
            return Ok(Ast::ClassEscape(ClassEscape {
                kind,
                span: self.span_from(start),
            }));
        }

        match c {
            'b' | 'B' => {
                self.lexer.advance();
                let kind = if c == 'b' {
                    AssertionKind::WordBoundary
                } else {
                    AssertionKind::NotWordBoundary
                };
                Ok(Ast::Assertion(Assertion {
                    kind,
                    span: self.span_from(start),
                }))
            }
            'p' | 'P' if self.unicode => {
                let property = self.parse_property(start)?;
                Ok(Ast::Property(property))
            }
            'k' => self.parse_named_backref(start),
            '1'..='9' => self.parse_decimal_escape(start),
            _ => {
                let code = self.parse_character_escape(start, false)?;
                let value = char::from_u32(code)
                    .ok_or_else(|| self.error(SyntaxErrorKind::LoneSurrogate, start))?;
                Ok(self.char_node(value, true, start))
            }
        }
    }

    /// `\N`: a backreference when N names an existing group, else a legacy escape
    fn parse_decimal_escape(&mut self, start: usize) -> Result<Ast> {
        let digits_start = self.lexer.position();
        let value = self.lexer.read_decimal().unwrap_or(0);

        if value >= 1 && value <= u64::from(self.scan.count) {
            return Ok(Ast::Backref(Backref {
                target: BackrefTarget::Index(value as u32),
                span: self.span_from(start),
            }));
        }
        if self.unicode {
            return Err(self.error(SyntaxErrorKind::InvalidDecimalEscape, start));
        }

        self.lexer.reset(digits_start);
        let value = self.legacy_decimal_char();
        Ok(self.char_node(value, true, start))
    }

    /// Legacy meaning of `\N` outside unicode mode: octal, or `8`/`9` verbatim
    fn legacy_decimal_char(&mut self) -> char {
        match self.lexer.read_legacy_octal() {
            Some(code) => char::from_u32(code).unwrap_or('\0'),
            None => self.lexer.advance().unwrap_or('\0'),
        }
    }

    /// `\k<name>`
    fn parse_named_backref(&mut self, start: usize) -> Result<Ast> {
        self.lexer.advance();
        if !self.unicode && !self.scan.has_named {
            // without named groups `\k` is an identity escape
            return Ok(self.char_node('k', true, start));
        }

        if !self.lexer.eat('<') {
            return Err(self.error(SyntaxErrorKind::InvalidNamedReference, start));
        }
        let name = self.lexer.read_identifier().map(str::to_string);
        let Some(name) = name.filter(|_| self.lexer.eat('>')) else {
            return Err(self.error(SyntaxErrorKind::InvalidNamedReference, start));
        };

        let span = self.span_from(start);
        self.named_refs.push((name.clone(), span));
        Ok(Ast::Backref(Backref {
            target: BackrefTarget::Name(name),
            span,
        }))
    }

    /// `\p{Name}` or `\P{Name=Value}`, lexer positioned at `p`/`P`
    fn parse_property(&mut self, start: usize) -> Result<Property> {
        let negated = self.lexer.advance() == Some('P');
        if !self.lexer.eat('{') {
            return Err(self.error(SyntaxErrorKind::InvalidPropertyName, start));
        }

        let body_start = self.lexer.position();
        while let Some(c) = self.lexer.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '=' {
                self.lexer.advance();
            } else {
                break;
            }
        }
        let body = self.lexer.slice(body_start, self.lexer.position());
        if !self.lexer.eat('}') {
            return Err(self.error(SyntaxErrorKind::InvalidPropertyName, start));
        }

        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if name.is_empty() || value.is_some_and(|v| v.is_empty() || v.contains('=')) {
            return Err(self.error(SyntaxErrorKind::InvalidPropertyName, start));
        }

        Ok(Property {
            negated,
            name: name.to_string(),
            value: value.map(str::to_string),
            span: self.span_from(start),
        })
    }

    /// A character escape; the lexer is positioned just after the backslash.
    ///
    /// Returns a code point, which is a lone surrogate when `\u` names one.
    fn parse_character_escape(&mut self, start: usize, in_class: bool) -> Result<u32> {
        let after_backslash = self.lexer.position();
        let Some(c) = self.lexer.advance() else {
            return Err(self.error(SyntaxErrorKind::TrailingBackslash, start));
        };

        let value = match c {
            't' => '\t',
            'n' => '\n',
            'v' => '\u{0B}',
            'f' => '\u{0C}',
            'r' => '\r',
            'c' => return self.parse_control_escape(start, after_backslash, in_class),
            '0' if !self.lexer.peek().is_some_and(|d| d.is_ascii_digit()) => '\0',
            '0'..='9' if self.unicode => {
                return Err(self.error(SyntaxErrorKind::InvalidDecimalEscape, start));
            }
            '0'..='9' => {
                self.lexer.reset(after_backslash);
                self.legacy_decimal_char()
            }
            'x' => match self.lexer.read_hex_exact(2) {
                Some(code) => return Ok(code),
                None if self.unicode => {
                    return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
                }
                None => 'x',
            },
            'u' => return self.parse_unicode_escape(start),
            '-' if in_class => '-',
            _ if self.unicode && !SYNTAX_CHARS.contains(c) => {
                return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
            }
            _ => c,
        };
        Ok(u32::from(value))
    }

    /// `\c` and its control letter; the lexer is just after `c`
    fn parse_control_escape(
        &mut self,
        start: usize,
        after_backslash: usize,
        in_class: bool,
    ) -> Result<u32> {
        let lenient = in_class && !self.unicode;
        let control = self
            .lexer
            .peek()
            .filter(|l| l.is_ascii_alphabetic() || (lenient && (l.is_ascii_digit() || *l == '_')));
        match control {
            Some(letter) => {
                self.lexer.advance();
                Ok(u32::from(letter) % 32)
            }
            None if self.unicode => Err(self.error(SyntaxErrorKind::InvalidEscape, start)),
            None => {
                // `\c` not followed by a letter is a literal backslash
                self.lexer.reset(after_backslash);
                Ok(u32::from('\\'))
            }
        }
    }

    /// `\uHHHH`, `\u{H...}` or a surrogate pair; the lexer is just after `u`.
    ///
    /// An unpaired surrogate comes back as its code unit.
    fn parse_unicode_escape(&mut self, start: usize) -> Result<u32> {
        if self.unicode && self.lexer.eat('{') {
            let code = self.lexer.read_hex_bounded(0x10FFFF);
            let closed = code.is_some() && self.lexer.eat('}');
            return match code {
                Some(code) if closed => Ok(code),
                _ => Err(self.error(SyntaxErrorKind::InvalidUnicodeEscape, start)),
            };
        }

        let Some(unit) = self.lexer.read_hex_exact(4) else {
            if self.unicode {
                return Err(self.error(SyntaxErrorKind::InvalidUnicodeEscape, start));
            }
            return Ok(u32::from('u'));
        };

        if (0xD800..=0xDBFF).contains(&unit) {
            let mark = self.lexer.position();
            if self.lexer.eat_str("\\u") {
                if let Some(low @ 0xDC00..=0xDFFF) = self.lexer.read_hex_exact(4) {
                    return Ok(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00));
                }
            }
            self.lexer.reset(mark);
        }
        Ok(unit)
    }

    /// class := '[' '^'? items ']'
    fn parse_class(&mut self) -> Result<Ast> {
        let start = self.lexer.position();
        self.lexer.advance();
        let negated = self.lexer.eat('^');
        let body_start = self.lexer.position();
        let mut items = Vec::new();

        loop {
            match self.lexer.peek() {
                None => {
                    return Err(self.error(SyntaxErrorKind::UnterminatedCharacterClass, start));
                }
                Some(']') => break,
                Some(_) => {}
            }

            let atom_start = self.lexer.position();
            let low = self.parse_class_atom(start)?;
            let is_range = self.lexer.peek() == Some('-')
                && !matches!(self.lexer.peek_nth(1), None | Some(']'));
            if !is_range {
                items.push(low.into());
                continue;
            }

            self.lexer.advance();
            let high = self.parse_class_atom(start)?;
            match (low, high) {
                (ClassAtom::Char(lo), ClassAtom::Char(hi)) => {
                    if lo > hi {
                        return Err(self.error(SyntaxErrorKind::RangeOutOfOrder, atom_start));
                    }
                    items.push(match (char::from_u32(lo), char::from_u32(hi)) {
                        (Some(lo), Some(hi)) => ClassItem::Range(lo, hi),
                        _ => ClassItem::CodeUnitRange(lo, hi),
                    });
                }
                _ if self.unicode => {
                    return Err(self.error(SyntaxErrorKind::InvalidClassEscape, atom_start));
                }
                (low, high) => {
                    items.push(low.into());
                    items.push(ClassItem::Char('-'));
                    items.push(high.into());
                }
            }
        }

        let raw = self.lexer.slice(body_start, self.lexer.position()).to_string();
        self.lexer.advance();

        Ok(Ast::Class(Class {
            negated,
            items,
            raw,
            span: self.span_from(start),
        }))
    }

    fn parse_class_atom(&mut self, class_start: usize) -> Result<ClassAtom> {
        let start = self.lexer.position();
        match self.lexer.advance() {
            None => Err(self.error(SyntaxErrorKind::UnterminatedCharacterClass, class_start)),
            Some('\\') => {
                let Some(c) = self.lexer.peek() else {
                    let kind = SyntaxErrorKind::UnterminatedCharacterClass;
                    return Err(self.error(kind, class_start));
                };
                if let Some(kind) = ClassEscapeKind::from_letter(c) {
                    self.lexer.advance();
                    return Ok(ClassAtom::Escape(kind));
                }
                match c {
                    'b' => {
                        self.lexer.advance();
                        Ok(ClassAtom::Char(0x08))
                    }
                    'p' | 'P' if self.unicode => {
                        Ok(ClassAtom::Property(self.parse_property(start)?))
                    }
                    '1'..='9' if self.unicode => {
                        Err(self.error(SyntaxErrorKind::InvalidClassEscape, start))
                    }
                    _ => Ok(ClassAtom::Char(self.parse_character_escape(start, true)?)),
                }
            }
            Some(c) => Ok(ClassAtom::Char(u32::from(c))),
        }
    }
}

/// Parse a regex pattern string into a generic AST (non-unicode mode)
pub fn parse(input: &str) -> Result<Pattern> {
    Parser::new(input).parse()
}
