//! The maximal-munch scanner (spec §4.1): byte stream → token stream,
//! stripping whitespace and nested block comments, classifying identifiers
//! against the keyword table.

use lumen_util::{Span, Symbol};

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{keyword_from_ident, Token};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), token_start: 0, token_start_line: 1, token_start_column: 1 }
    }

    fn start_span(&mut self) {
        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();
    }

    fn span(&self) -> Span {
        Span::new(self.token_start, self.cursor.position(), self.token_start_line, self.token_start_column)
    }

    /// Scans and returns the next token together with its span.
    pub fn next_token(&mut self) -> Result<(Token, Span), LexError> {
        self.skip_whitespace_and_comments()?;
        self.start_span();

        if self.cursor.is_at_end() {
            return Ok((Token::Eof, self.span()));
        }

        let c = self.cursor.current_char();
        let tok = match c {
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            ';' => self.single(Token::Semicolon),
            ',' => self.single(Token::Comma),
            ':' => self.single(Token::Colon),
            '.' => {
                self.cursor.advance();
                if self.cursor.current_char() == '(' {
                    self.cursor.advance();
                    Token::DotLParen
                } else {
                    Token::Dot
                }
            }
            '+' => self.single(Token::Plus),
            '-' => {
                self.cursor.advance();
                if self.cursor.current_char() == '>' {
                    self.cursor.advance();
                    Token::Arrow
                } else {
                    Token::Minus
                }
            }
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '=' => {
                self.cursor.advance();
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    Token::EqEq
                } else {
                    Token::Eq
                }
            }
            '!' => {
                self.cursor.advance();
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.current_char() {
                    '=' => {
                        self.cursor.advance();
                        Token::Le
                    }
                    '-' => {
                        self.cursor.advance();
                        Token::LArrow
                    }
                    _ => Token::Lt,
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '&' => {
                self.cursor.advance();
                if self.cursor.current_char() == '&' {
                    self.cursor.advance();
                    Token::AndAnd
                } else {
                    return Err(LexError::BadChar { ch: '&', span: self.span() });
                }
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.current_char() == '|' {
                    self.cursor.advance();
                    Token::OrOr
                } else {
                    return Err(LexError::BadChar { ch: '|', span: self.span() });
                }
            }
            '"' => self.lex_string()?,
            c if c.is_ascii_digit() => self.lex_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c => return Err(LexError::BadChar { ch: c, span: self.span() }),
        };

        Ok((tok, self.span()))
    }

    fn single(&mut self, tok: Token) -> Token {
        self.cursor.advance();
        tok
    }

    fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        match keyword_from_ident(text) {
            Some(kw) => kw,
            None => {
                if text == "mod" {
                    Token::Mod
                } else {
                    Token::Ident(Symbol::intern(text))
                }
            }
        }
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| LexError::IntOverflow { span: self.span() })
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString { span: self.span() });
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    let escaped = self.cursor.current_char();
                    self.cursor.advance();
                    value.push(match escaped {
                        '\\' => '\\',
                        '"' => '"',
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                other => {
                    value.push(other);
                    self.cursor.advance();
                }
            }
        }
        Ok(Token::Str(Symbol::intern(&value)))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            if self.cursor.is_at_end() {
                return Ok(());
            }
            match self.cursor.current_char() {
                c if c.is_whitespace() => {
                    self.cursor.advance();
                }
                '(' if self.cursor.peek_char(1) == '*' => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skips a (possibly nested) `(* ... *)` block comment with a depth
    /// counter, per spec §4.1.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        self.start_span();
        self.cursor.advance(); // (
        self.cursor.advance(); // *
        let mut depth: u32 = 1;

        while depth > 0 {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedComment { span: self.span() });
            }
            if self.cursor.current_char() == '(' && self.cursor.peek_char(1) == '*' {
                self.cursor.advance();
                self.cursor.advance();
                depth += 1;
            } else if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == ')' {
                self.cursor.advance();
                self.cursor.advance();
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }
        Ok(())
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenizes the whole source up front, matching how the parser consumes
/// it (a `Vec` rather than a pull-iterator, since a lex error is fatal and
/// the parser never wants to resume past one).
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, LexError> {
    tracing::debug!(bytes = source.len(), "tokenizing source");
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let (tok, span) = lexer.next_token()?;
        let is_eof = tok == Token::Eof;
        tokens.push((tok, span));
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn lexes_keywords_and_idents() {
        assert_eq!(
            toks("let rec x = 1 in x"),
            vec![
                Token::Let,
                Token::Rec,
                Token::Ident(Symbol::intern("x")),
                Token::Eq,
                Token::Int(1),
                Token::In,
                Token::Ident(Symbol::intern("x")),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_two_char_operators_greedily() {
        assert_eq!(toks("<= >= == != && || -> <-"), vec![
            Token::Le, Token::Ge, Token::EqEq, Token::NotEq,
            Token::AndAnd, Token::OrOr, Token::Arrow, Token::LArrow, Token::Eof,
        ]);
    }

    #[test]
    fn lexes_array_index_punctuation() {
        assert_eq!(toks("a.(0)"), vec![
            Token::Ident(Symbol::intern("a")), Token::DotLParen, Token::Int(0), Token::RParen, Token::Eof,
        ]);
    }

    #[test]
    fn lexes_field_access_dot() {
        assert_eq!(toks("p.x"), vec![
            Token::Ident(Symbol::intern("p")), Token::Dot, Token::Ident(Symbol::intern("x")), Token::Eof,
        ]);
    }

    #[test]
    fn skips_nested_block_comments() {
        assert_eq!(toks("(* outer (* inner *) still outer *) 1"), vec![Token::Int(1), Token::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        assert!(matches!(tokenize("(* never closes"), Err(LexError::UnterminatedComment { .. })));
    }

    #[test]
    fn unterminated_string_is_fatal() {
        assert!(matches!(tokenize("\"abc"), Err(LexError::UnterminatedString { .. })));
    }

    #[test]
    fn illegal_character_is_fatal() {
        assert!(matches!(tokenize("@"), Err(LexError::BadChar { ch: '@', .. })));
    }

    #[test]
    fn integer_overflow_is_fatal() {
        assert!(matches!(tokenize("99999999999999999999"), Err(LexError::IntOverflow { .. })));
    }

    #[test]
    fn string_escapes_are_processed() {
        assert_eq!(toks("\"a\\nb\\t\\\"c\\\"\""), vec![Token::Str(Symbol::intern("a\nb\t\"c\"")), Token::Eof]);
    }

    #[test]
    fn mod_keyword_lexes_as_mod_operator() {
        assert_eq!(toks("7 mod 2"), vec![Token::Int(7), Token::Mod, Token::Int(2), Token::Eof]);
    }
}
