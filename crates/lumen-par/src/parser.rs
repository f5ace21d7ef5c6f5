//! Recursive-descent parser over the precedence table in spec §4.2,
//! implemented as stratified nonterminals (one function per precedence
//! level) rather than a generic binding-power loop, since application
//! binds *tighter* than prefix `-`/`!` here (ML-family precedence: `- f x`
//! parses as `-(f x)`), which a uniform Pratt table would obscure.

use lumen_ast::{BinOp, Expr, FieldDecl, FieldInit, Param, Program, Ty, UnOp};
use lumen_lex::Token;
use lumen_util::{Span, Symbol};

use crate::error::ParseError;

/// Placeholder `Strct` name for a record literal parsed without an explicit
/// type name (every record literal, per spec §4.2's `atom` grammar).
/// `lumen-check` resolves the real name by matching field sets against `D`
/// and must never see this sentinel reach the evaluator unresolved.
pub const UNRESOLVED_RECORD_NAME: &str = "$unresolved-record";

/// Binding-power documentation only; the actual precedence is encoded by
/// which `parse_*` function calls which (see module doc).
#[doc(hidden)]
pub mod bp {
    pub const OR: u8 = 2;
    pub const AND: u8 = 4;
    pub const COMPARISON: u8 = 6;
    pub const ADDITIVE: u8 = 8;
    pub const MULTIPLICATIVE: u8 = 10;
    pub const UNARY: u8 = 12;
    pub const APPLICATION: u8 = 14;
    pub const POSTFIX: u8 = 16;
}

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

/// Parses an already-lexed token stream (spec §4.2). Lexing is a separate
/// fatal stage upstream; this never sees a `LexError`.
pub fn parse_tokens(tokens: Vec<(Token, Span)>) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens);
    let root = parser.parse_program()?;
    parser.expect_eof()?;
    Ok(Program { root })
}

impl Parser {
    fn new(tokens: Vec<(Token, Span)>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ---- token stream helpers -------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|(t, _)| t).unwrap_or(&Token::Eof)
    }

    fn span(&self) -> Span {
        self.tokens[self.pos].1
    }

    fn advance(&mut self) -> (Token, Span) {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, tok: &Token) -> bool {
        self.peek() == tok
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.check(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Token) -> Result<Span, ParseError> {
        if self.check(tok) {
            Ok(self.advance().1)
        } else {
            Err(ParseError::Unexpected {
                expected: tok.describe(),
                found: self.peek().describe(),
                span: self.span(),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<(Symbol, Span), ParseError> {
        match self.peek().clone() {
            Token::Ident(s) => {
                let span = self.span();
                self.advance();
                Ok((s, span))
            }
            _ => Err(ParseError::ExpectedIdentifier { span: self.span() }),
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        if self.check(&Token::Eof) {
            Ok(())
        } else {
            Err(ParseError::Unexpected {
                expected: "end of input".to_string(),
                found: self.peek().describe(),
                span: self.span(),
            })
        }
    }

    // ---- program: type_decls expression EOF -----------------------------------

    fn parse_program(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Type) {
            let (name, fields, decl_span) = self.parse_type_decl()?;
            self.expect(&Token::In)?;
            let cont = self.parse_program()?;
            let span = decl_span.to(cont.span());
            Ok(Expr::TypeDecl(name, fields, Box::new(cont), span))
        } else {
            self.parse_expr()
        }
    }

    /// `type IDENT = { field (';' field)* [';'] }`, like the grammar says —
    /// the `'in'` that follows it in concrete programs is consumed by the
    /// caller, matching how `let ... in` threads its own continuation.
    fn parse_type_decl(&mut self) -> Result<(Symbol, Vec<FieldDecl>, Span), ParseError> {
        let start = self.expect(&Token::Type)?;
        let (name, _) = self.expect_ident()?;
        self.expect(&Token::Eq)?;
        self.expect(&Token::LBrace)?;

        let mut fields = Vec::new();
        if !self.check(&Token::RBrace) {
            loop {
                fields.push(self.parse_field_decl()?);
                if !self.eat(&Token::Semicolon) {
                    break;
                }
                if self.check(&Token::RBrace) {
                    break;
                }
            }
        }
        let end = self.expect(&Token::RBrace)?;
        Ok((name, fields, start.to(end)))
    }

    fn parse_field_decl(&mut self) -> Result<FieldDecl, ParseError> {
        let mutable = self.eat(&Token::Mutable);
        let (name, _) = self.expect_ident()?;
        self.expect(&Token::Colon)?;
        let ty = self.parse_type()?;
        Ok(FieldDecl { name, ty, mutable })
    }

    // ---- types: atom_type ('->' type)? -----------------------------------------

    fn parse_type(&mut self) -> Result<Ty, ParseError> {
        let from = self.parse_atom_type()?;
        if self.eat(&Token::Arrow) {
            let to = self.parse_type()?;
            Ok(Ty::arrow(from, to))
        } else {
            Ok(from)
        }
    }

    fn parse_atom_type(&mut self) -> Result<Ty, ParseError> {
        let mut ty = match self.peek().clone() {
            Token::KwInt => {
                self.advance();
                Ty::Int
            }
            Token::KwBool => {
                self.advance();
                Ty::Bool
            }
            Token::KwUnit => {
                self.advance();
                Ty::Unit
            }
            Token::KwString => {
                self.advance();
                Ty::String
            }
            Token::Ident(name) => {
                self.advance();
                Ty::Record(name)
            }
            Token::LParen => {
                let open = self.span();
                self.advance();
                let inner = self.parse_type()?;
                if !self.eat(&Token::RParen) {
                    return Err(ParseError::UnclosedParenthesis { span: open });
                }
                inner
            }
            _ => {
                return Err(ParseError::Unexpected {
                    expected: "a type".to_string(),
                    found: self.peek().describe(),
                    span: self.span(),
                })
            }
        };
        while self.check(&Token::KwArray) {
            self.advance();
            ty = Ty::array(ty);
        }
        Ok(ty)
    }

    // ---- expression ------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_impl(true)
    }

    /// Same as `parse_expr`, but stops before a top-level `;`. Used inside
    /// `;`-delimited lists (struct-literal fields, array elements) so the
    /// list separator isn't swallowed as a `Seq`. `let`'s body and `if`'s
    /// else-branch are the only unterminated tail slots, so this mode
    /// threads through those two and nowhere else: every other sub-slot
    /// (a `let`'s value, a condition, a `then`-branch, a `while` body) is
    /// already unambiguously bounded by a following keyword.
    fn parse_expr_no_seq(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_impl(false)
    }

    fn parse_expr_impl(&mut self, allow_seq: bool) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Let => self.parse_let(allow_seq),
            Token::If => self.parse_if(allow_seq),
            Token::While => self.parse_while_tail(allow_seq),
            _ if allow_seq => self.parse_seq(),
            _ => self.parse_assign(),
        }
    }

    fn parse_let(&mut self, allow_seq: bool) -> Result<Expr, ParseError> {
        let start = self.expect(&Token::Let)?;
        let is_rec = self.eat(&Token::Rec);
        let (name, _) = self.expect_ident()?;

        let params = self.parse_params()?;
        let ret_ty = if self.eat(&Token::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Token::In)?;
        let body = self.parse_expr_impl(allow_seq)?;
        let span = start.to(body.span());

        let bound = if params.is_empty() {
            value
        } else {
            let ret_ty = ret_ty.ok_or_else(|| ParseError::Unexpected {
                expected: "':' return type annotation on a multi-parameter let".to_string(),
                found: self.peek().describe(),
                span: self.span(),
            })?;
            Expr::fun(params, value, ret_ty, span)
        };

        if is_rec {
            let fun_ty = match &bound {
                Expr::Fun(params, _, ret, _) => {
                    Ty::curried_arrow(&params.iter().map(|p| p.ty.clone()).collect::<Vec<_>>(), ret.clone())
                }
                _ => {
                    return Err(ParseError::Unexpected {
                        expected: "a function definition after 'let rec'".to_string(),
                        found: "a non-function binding".to_string(),
                        span,
                    })
                }
            };
            Ok(Expr::Let(
                name,
                Box::new(Expr::Fix(name, fun_ty, Box::new(bound), span)),
                Box::new(body),
                span,
            ))
        } else {
            Ok(Expr::Let(name, Box::new(bound), Box::new(body), span))
        }
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        while self.check(&Token::LParen) {
            self.advance();
            let (name, _) = self.expect_ident()?;
            self.expect(&Token::Colon)?;
            let ty = self.parse_type()?;
            self.expect(&Token::RParen)?;
            params.push(Param { name, ty });
        }
        Ok(params)
    }

    fn parse_if(&mut self, allow_seq: bool) -> Result<Expr, ParseError> {
        let start = self.expect(&Token::If)?;
        let cond = self.parse_expr()?;
        self.expect(&Token::Then)?;
        let then_branch = self.parse_expr()?;
        self.expect(&Token::Else)?;
        let else_branch = self.parse_expr_impl(allow_seq)?;
        let span = start.to(else_branch.span());
        Ok(Expr::If(Box::new(cond), Box::new(then_branch), Box::new(else_branch), span))
    }

    fn parse_while(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&Token::While)?;
        let cond = self.parse_expr()?;
        self.expect(&Token::Do)?;
        let body = self.parse_expr()?;
        let end = self.expect(&Token::Done)?;
        Ok(Expr::While(Box::new(cond), Box::new(body), start.to(end)))
    }

    /// A `while ... done` is itself a valid left operand of `;`, unlike a
    /// bare assign/application expression it isn't reachable through
    /// `parse_assign`, so `parse_seq` can't pick it up on its own. Parse it
    /// directly and, in tail position, fold in the rest of the sequence.
    fn parse_while_tail(&mut self, allow_seq: bool) -> Result<Expr, ParseError> {
        let lhs = self.parse_while()?;
        if allow_seq && self.eat(&Token::Semicolon) {
            let rhs = self.parse_expr()?;
            let span = lhs.span().to(rhs.span());
            Ok(Expr::Seq(Box::new(lhs), Box::new(rhs), span))
        } else {
            Ok(lhs)
        }
    }

    /// seq_expr := assign_expr (';' expression)?, right-assoc at `;`.
    fn parse_seq(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_assign()?;
        if self.eat(&Token::Semicolon) {
            let rhs = self.parse_expr()?;
            let span = lhs.span().to(rhs.span());
            Ok(Expr::Seq(Box::new(lhs), Box::new(rhs), span))
        } else {
            Ok(lhs)
        }
    }

    /// `<-` is not in the binary precedence table: it attaches to whatever
    /// postfix/application form was just parsed, turning it into an
    /// `Assign`/`SetF`/`SetA` node depending on the target's shape.
    fn parse_assign(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_or()?;
        if self.eat(&Token::LArrow) {
            let value = self.parse_assign()?;
            let span = target.span().to(value.span());
            return match target {
                Expr::Var(name, _) => Ok(Expr::Assign(name, Box::new(value), span)),
                Expr::GetF(obj, field, _) => Ok(Expr::SetF(obj, field, Box::new(value), span)),
                Expr::GetA(arr, idx, _) => Ok(Expr::SetA(arr, idx, Box::new(value), span)),
                _ => Err(ParseError::Unexpected {
                    expected: "a variable, field, or array slot on the left of '<-'".to_string(),
                    found: "a non-assignable expression".to_string(),
                    span,
                }),
            };
        }
        Ok(target)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_and()?;
        while self.check(&Token::OrOr) {
            self.advance();
            let rhs = self.parse_and()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Bop(BinOp::Or, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_comparison()?;
        while self.check(&Token::AndAnd) {
            self.advance();
            let rhs = self.parse_comparison()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Bop(BinOp::And, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                Token::Lt => BinOp::Lt,
                Token::Le => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::Ge => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Bop(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Bop(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Mod => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::Bop(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    /// Unary `-`/`!` bind looser than application (ML precedence): `- f x`
    /// parses as `-(f x)`, so this level wraps a full `parse_application`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Minus => Some(UnOp::Neg),
            Token::Bang => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.span();
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.to(operand.span());
            Ok(Expr::Uop(op, Box::new(operand), span))
        } else {
            self.parse_application()
        }
    }

    /// app := postfix postfix*, left-assoc: `f x y` = `App(App(f,x),y)`.
    fn parse_application(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_postfix()?;
        while self.starts_atom() {
            let arg = self.parse_postfix()?;
            let span = expr.span().to(arg.span());
            expr = Expr::App(Box::new(expr), Box::new(arg), span);
        }
        Ok(expr)
    }

    fn starts_atom(&self) -> bool {
        matches!(
            self.peek(),
            Token::Ident(_)
                | Token::Int(_)
                | Token::Str(_)
                | Token::True
                | Token::False
                | Token::LParen
                | Token::LBracket
        )
    }

    /// postfix := atom ('.' IDENT | '.(' expression ')')*
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.eat(&Token::Dot) {
                let (field, field_span) = self.expect_ident()?;
                let span = expr.span().to(field_span);
                expr = Expr::GetF(Box::new(expr), field, span);
            } else if self.eat(&Token::DotLParen) {
                let index = self.parse_expr()?;
                let end = self.expect(&Token::RParen)?;
                let span = expr.span().to(end);
                expr = Expr::GetA(Box::new(expr), Box::new(index), span);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let span = self.span();
        match self.peek().clone() {
            Token::Int(n) => {
                self.advance();
                Ok(Expr::Int(n, span))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expr::String(s, span))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Bool(true, span))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Bool(false, span))
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Var(name, span))
            }
            Token::LParen => {
                self.advance();
                if self.check(&Token::RParen) {
                    let end = self.advance().1;
                    return Ok(Expr::Unit(span.to(end)));
                }
                let inner = self.parse_expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(ParseError::UnclosedParenthesis { span });
                }
                Ok(inner)
            }
            Token::LBracket => self.parse_array_literal(span),
            Token::LBrace => self.parse_struct_literal(span),
            _ => Err(ParseError::Unexpected {
                expected: "an expression".to_string(),
                found: self.peek().describe(),
                span,
            }),
        }
    }

    /// `{ field_assignments }` (spec §4.2 `atom`) carries no type name in
    /// concrete syntax — unlike a `type` declaration, a record literal never
    /// spells out which `D` entry it belongs to. The parser records a
    /// sentinel name here; `lumen-check` resolves the real one by matching
    /// the literal's field-name set against the declared record types.
    fn parse_struct_literal(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect(&Token::LBrace)?;
        let mut fields = Vec::new();
        if !self.check(&Token::RBrace) {
            loop {
                let (field_name, _) = self.expect_ident()?;
                self.expect(&Token::Eq)?;
                let value = self.parse_expr_no_seq()?;
                fields.push(FieldInit { name: field_name, value });
                if !self.eat(&Token::Semicolon) {
                    break;
                }
                if self.check(&Token::RBrace) {
                    break;
                }
            }
        }
        let end = self.expect(&Token::RBrace)?;
        Ok(Expr::Strct(Symbol::intern(UNRESOLVED_RECORD_NAME), fields, start.to(end)))
    }

    fn parse_array_literal(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect(&Token::LBracket)?;
        let mut elements = Vec::new();
        if !self.check(&Token::RBracket) {
            loop {
                elements.push(self.parse_expr_no_seq()?);
                if !self.eat(&Token::Semicolon) {
                    break;
                }
                if self.check(&Token::RBracket) {
                    break;
                }
            }
        }
        let end = self.expect(&Token::RBracket)?;
        Ok(Expr::Array(elements, start.to(end)))
    }
}
