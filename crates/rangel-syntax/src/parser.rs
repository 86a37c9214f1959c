//! Recursive descent parser for range expressions.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr     := conj ( (',' | '|') conj )*
//! conj     := unary ( '&' unary )*
//! unary    := '!' unary | selector
//! selector := comparison | modulo | wildcard | bracket | group | value-led
//! value    := arithmetic over integers, `begin`, `end`
//! ```
//!
//! A value-led selector is a bare membership literal, `lo..hi`, or
//! `lo..step..hi`. An opening `(` is tried as an `(a,b)`-style interval
//! first and falls back to a parenthesized group.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use thiserror::Error;

/// Parser error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token at {span}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("invalid character at {span}: {message}")]
    InvalidToken { message: String, span: Span },
    #[error("invalid syntax at {span}: {message}")]
    InvalidSyntax { message: String, span: Span },
}

impl ParseError {
    /// Get the source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::InvalidToken { span, .. } => *span,
            ParseError::InvalidSyntax { span, .. } => *span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a complete range expression.
pub fn parse(source: &str) -> ParseResult<Expr> {
    Parser::new(source).parse_complete()
}

/// Parser for range-expression source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from source text.
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
        }
    }

    /// Parse an expression and require that it consumes all input.
    pub fn parse_complete(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        if !self.is_at_end() {
            return Err(self.unexpected("end of expression"));
        }
        Ok(expr)
    }

    /// Parse a disjunction: `a, b` / `a | b`.
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_conjunction()?;
        while matches!(self.peek_kind(), TokenKind::Comma | TokenKind::Pipe) {
            self.advance();
            let right = self.parse_conjunction()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Or(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    /// Parse a conjunction: `a & b`.
    fn parse_conjunction(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while self.check(&TokenKind::Amp) {
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::And(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        if self.check(&TokenKind::Bang) {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::Not(Box::new(operand)), span));
        }
        self.parse_selector()
    }

    fn parse_selector(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                let op = match self.peek_kind() {
                    TokenKind::Lt => CmpOp::Lt,
                    TokenKind::Le => CmpOp::Le,
                    TokenKind::Gt => CmpOp::Gt,
                    _ => CmpOp::Ge,
                };
                self.advance();
                let value = self.parse_value()?;
                let span = start.merge(value.span);
                Ok(Expr::new(ExprKind::Compare { op, value }, span))
            }

            TokenKind::Percent => {
                self.advance();
                let modulus = self.parse_value()?;
                let mut span = start.merge(modulus.span);
                let remainder = if self.check(&TokenKind::EqEq) {
                    self.advance();
                    let rem = self.parse_value()?;
                    span = span.merge(rem.span);
                    Some(rem)
                } else {
                    None
                };
                Ok(Expr::new(ExprKind::Modulo { modulus, remainder }, span))
            }

            TokenKind::Star => {
                self.advance();
                // `*4` was never multiplication in selector position; the
                // legacy rewriter rejected the residue it produced there.
                if self.at_value_start() {
                    return Err(ParseError::InvalidSyntax {
                        message: "wildcard cannot be followed by a value".to_string(),
                        span: start.merge(self.current_span()),
                    });
                }
                Ok(Expr::new(ExprKind::Wildcard, start))
            }

            TokenKind::LBracket => self.parse_bracket(),

            TokenKind::LParen => {
                // `(a,b)`-style intervals and parenthesized groups share a
                // leading `(`; try the interval shape first.
                let saved = self.pos;
                if let Ok(expr) = self.parse_bracket() {
                    return Ok(expr);
                }
                self.pos = saved;
                self.advance(); // (
                let mut expr = self.parse_expr()?;
                let close = self.current_span();
                self.expect(TokenKind::RParen)?;
                expr.span = start.merge(close);
                Ok(expr)
            }

            TokenKind::Integer(_) | TokenKind::Begin | TokenKind::End | TokenKind::Minus
            | TokenKind::Plus => {
                let lo = self.parse_value()?;
                if self.check(&TokenKind::DotDot) {
                    self.advance();
                    let second = self.parse_value()?;
                    if self.check(&TokenKind::DotDot) {
                        self.advance();
                        let hi = self.parse_value()?;
                        let span = start.merge(hi.span);
                        Ok(Expr::new(
                            ExprKind::Range {
                                lo,
                                step: Some(second),
                                hi,
                            },
                            span,
                        ))
                    } else {
                        let span = start.merge(second.span);
                        Ok(Expr::new(
                            ExprKind::Range {
                                lo,
                                step: None,
                                hi: second,
                            },
                            span,
                        ))
                    }
                } else {
                    let span = lo.span;
                    Ok(Expr::new(ExprKind::Literal(lo), span))
                }
            }

            TokenKind::Error(message) => Err(ParseError::InvalidToken {
                message,
                span: start,
            }),

            _ => Err(self.unexpected("a selector")),
        }
    }

    /// Parse an interval: `[a,b]`, `(a,b)`, `[a,b)`, `(a,b]`.
    fn parse_bracket(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        let lo_strict = match self.peek_kind() {
            TokenKind::LBracket => false,
            TokenKind::LParen => true,
            _ => return Err(self.unexpected("`[` or `(`")),
        };
        self.advance();

        let lo = self.parse_value()?;
        self.expect(TokenKind::Comma)?;
        let hi = self.parse_value()?;

        let hi_strict = match self.peek_kind() {
            TokenKind::RParen => true,
            TokenKind::RBracket => false,
            _ => return Err(self.unexpected("`]` or `)`")),
        };
        let close = self.current_span();
        self.advance();

        Ok(Expr::new(
            ExprKind::Bracket {
                lo,
                lo_strict,
                hi,
                hi_strict,
            },
            start.merge(close),
        ))
    }

    // === Value (arithmetic) parsing with precedence climbing ===

    fn parse_value(&mut self) -> ParseResult<NumExpr> {
        self.parse_value_prec(0)
    }

    fn parse_value_prec(&mut self, min_prec: u8) -> ParseResult<NumExpr> {
        let mut left = self.parse_value_atom()?;

        while let Some(op) = self.peek_arith_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            // All tiers are left-associative
            let right = self.parse_value_prec(prec + 1)?;
            let span = left.span.merge(right.span);
            left = NumExpr::new(
                NumKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn peek_arith_op(&self) -> Option<ArithOp> {
        match self.peek_kind() {
            TokenKind::Plus => Some(ArithOp::Add),
            TokenKind::Minus => Some(ArithOp::Sub),
            TokenKind::Star => Some(ArithOp::Mul),
            TokenKind::Slash => Some(ArithOp::Div),
            TokenKind::Percent => Some(ArithOp::Mod),
            _ => None,
        }
    }

    fn parse_value_atom(&mut self) -> ParseResult<NumExpr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(NumExpr::new(NumKind::Int(n), start))
            }
            TokenKind::Begin => {
                self.advance();
                Ok(NumExpr::new(NumKind::Begin, start))
            }
            TokenKind::End => {
                self.advance();
                Ok(NumExpr::new(NumKind::End, start))
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_value_atom()?;
                let span = start.merge(operand.span);
                Ok(NumExpr::new(NumKind::Neg(Box::new(operand)), span))
            }
            // Unary plus is a no-op
            TokenKind::Plus => {
                self.advance();
                self.parse_value_atom()
            }
            TokenKind::Error(message) => Err(ParseError::InvalidToken {
                message,
                span: start,
            }),
            _ => Err(self.unexpected("a number")),
        }
    }

    // === Token helpers ===

    fn peek_kind(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn at_value_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Integer(_)
                | TokenKind::Begin
                | TokenKind::End
                | TokenKind::Minus
                | TokenKind::Plus
        )
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", kind)))
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek_kind().to_string(),
            span: self.current_span(),
        }
    }
}
