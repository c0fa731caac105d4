//! Character cursor over a regex pattern
//!
//! ECMAScript regex tokens depend on context (inside or outside brackets,
//! unicode mode, whether a brace forms a valid quantifier), so the parser
//! drives this cursor directly instead of consuming a token stream. Positions
//! are byte offsets into the pattern.

/// Cursor for reading a regex pattern character by character
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input string
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// The full pattern text
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move back to an earlier position returned by [`Lexer::position`]
    pub fn reset(&mut self, position: usize) {
        debug_assert!(self.input.is_char_boundary(position));
        self.position = position;
    }

    /// Check if all input has been consumed
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Text between two positions
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Peek at the current character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Peek `n` characters ahead of the current one
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    /// Consume and return the current character
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consume `expected` if it is the current character
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `expected` if the remaining input starts with it
    pub fn eat_str(&mut self, expected: &str) -> bool {
        if self.input[self.position..].starts_with(expected) {
            self.position += expected.len();
            true
        } else {
            false
        }
    }

    /// Read a run of decimal digits, saturating on overflow
    pub fn read_decimal(&mut self) -> Option<u64> {
        let start = self.position;
        let mut value: u64 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(u64::from(d));
            self.position += 1;
        }
        (self.position > start).then_some(value)
    }

    /// Read exactly `count` hex digits, consuming nothing on failure
    pub fn read_hex_exact(&mut self, count: usize) -> Option<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..count {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    value = value * 16 + d;
                    self.position += 1;
                }
                None => {
                    self.position = start;
                    return None;
                }
            }
        }
        Some(value)
    }

    /// Read one or more hex digits, failing once the value exceeds `max`
    pub fn read_hex_bounded(&mut self, max: u32) -> Option<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
            value = value.checked_mul(16)?.checked_add(d)?;
            if value > max {
                return None;
            }
            self.position += 1;
        }
        (self.position > start).then_some(value)
    }

    /// Read a legacy octal escape body: up to three octal digits, at most `\377`
    pub fn read_legacy_octal(&mut self) -> Option<u32> {
        let first = self.peek().and_then(|c| c.to_digit(8))?;
        self.position += 1;
        let mut value = first;
        let max_len = if first <= 3 { 3 } else { 2 };
        for _ in 1..max_len {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    value = value * 8 + d;
                    self.position += 1;
                }
                None => break,
            }
        }
        Some(value)
    }

    /// Check if a character can start a group name
    fn is_identifier_start(c: char) -> bool {
        c.is_alphabetic() || c == '_' || c == '$'
    }

    /// Check if a character can continue a group name
    fn is_identifier_char(c: char) -> bool {
        Self::is_identifier_start(c) || c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}'
    }

    /// Read a group name; consumes nothing if no name starts here
    pub fn read_identifier(&mut self) -> Option<&'a str> {
        let start = self.position;
        match self.peek() {
            Some(c) if Self::is_identifier_start(c) => self.position += c.len_utf8(),
            _ => return None,
        }
        while let Some(c) = self.peek() {
            if Self::is_identifier_char(c) {
                self.position += c.len_utf8();
            } else {
                break;
            }
        }
        Some(&self.input[start..self.position])
    }
}
