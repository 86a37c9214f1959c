//! Token types and source span tracking for the range-expression lexer.

use std::fmt;

/// A span in the expression source, tracking byte offsets.
///
/// Range expressions are single-line inputs, so there is no line/column
/// bookkeeping; byte offsets are enough to label diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.start)
    }
}

/// The kind of token.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Integer literal. Float literals are floored to their integer part at
    /// lex time; fractional selectors are unsupported.
    Integer(i64),
    /// `begin` keyword (the domain's lower bound).
    Begin,
    /// `end` keyword (the domain's upper bound).
    End,
    /// `..`
    DotDot,
    /// `,`
    Comma,
    /// `*` (wildcard or multiplication, depending on position)
    Star,
    /// `/`
    Slash,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `%`
    Percent,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    EqEq,
    /// `!`
    Bang,
    /// `&` or `&&` (equivalent in the surface syntax)
    Amp,
    /// `|` or `||` (equivalent in the surface syntax)
    Pipe,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// Lexing error (character outside the DSL alphabet, stray `.`, ...).
    Error(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a keyword by its text.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "begin" => Some(TokenKind::Begin),
            "end" => Some(TokenKind::End),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Begin => write!(f, "begin"),
            TokenKind::End => write!(f, "end"),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Le => write!(f, "<="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Ge => write!(f, ">="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Amp => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Error(msg) => write!(f, "error: {}", msg),
            TokenKind::Eof => write!(f, "end of expression"),
        }
    }
}

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Source span.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Check if this is the EOF token.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
