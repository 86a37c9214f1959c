//! Lexer for range expressions.
//!
//! Converts expression text into a stream of tokens. The token alphabet is
//! deliberately closed: any character outside it lexes to an error token,
//! which is what makes the downstream predicate injection-safe without a
//! separate character whitelist.

use crate::token::{Span, Token, TokenKind};
use std::str::Chars;

/// Lexer for range-expression source text.
pub struct Lexer<'a> {
    /// Source text being lexed.
    source: &'a str,
    /// Character iterator.
    chars: Chars<'a>,
    /// Current byte position.
    pos: usize,
    /// Start position of current token.
    token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
            token_start: 0,
        }
    }

    /// Tokenize the entire source, returning all tokens including EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.token_start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        // Number literal
        if c.is_ascii_digit() {
            return self.lex_number();
        }

        // Keyword (`begin` / `end`); any other word is an error
        if c.is_alphabetic() || c == '_' {
            return self.lex_word();
        }

        // Operators and punctuation
        self.lex_operator_or_punctuation()
    }

    /// Skip whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peek at the next character (after current) without consuming.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    /// Advance to the next character, returning the current one.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Create a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.token_start, self.pos))
    }

    /// Get the text of the current token.
    fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    /// Lex a number literal.
    ///
    /// A fractional part is consumed but dropped: `2.7` lexes as `2`. A `.`
    /// followed by another `.` is left for the `..` operator.
    fn lex_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let integer_end = self.pos;

        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance(); // .
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let text = &self.source[self.token_start..integer_end];
        match text.parse::<i64>() {
            Ok(n) => self.make_token(TokenKind::Integer(n)),
            Err(_) => self.make_token(TokenKind::Error(format!("integer out of range: {}", text))),
        }
    }

    /// Lex a word: either a keyword or an error.
    fn lex_word(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.token_text();
        match TokenKind::keyword(text) {
            Some(keyword) => self.make_token(keyword),
            None => self.make_token(TokenKind::Error(format!(
                "`{}` is not part of the range syntax",
                text
            ))),
        }
    }

    /// Lex an operator or punctuation.
    fn lex_operator_or_punctuation(&mut self) -> Token {
        let c = self.advance().unwrap();

        let kind = match c {
            ',' => TokenKind::Comma,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Error("expected `==`".to_string())
                }
            }
            // `&` and `&&` are the same operator in the surface syntax
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                }
                TokenKind::Amp
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                }
                TokenKind::Pipe
            }
            '.' => {
                if self.peek() == Some('.') {
                    self.advance();
                    TokenKind::DotDot
                } else {
                    TokenKind::Error("stray `.`".to_string())
                }
            }
            _ => TokenKind::Error(format!("`{}` is not part of the range syntax", c)),
        };

        self.make_token(kind)
    }
}
