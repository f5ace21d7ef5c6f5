//! Character cursor for traversing the source text.
//!
//! Handles UTF-8 decoding and line/column bookkeeping so the lexer itself
//! only has to reason about characters, not bytes.

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, position: 0, line: 1, column: 1 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    #[inline]
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    /// Character `offset` *characters* ahead of the cursor (not bytes).
    pub fn peek_char(&self, offset: usize) -> char {
        self.source[self.position..].chars().nth(offset).unwrap_or('\0')
    }

    fn char_at(&self, nth: usize) -> char {
        self.source[self.position..].chars().nth(nth).unwrap_or('\0')
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.source[self.position..].chars().next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }
}
