//! Abstract syntax tree for range expressions.
//!
//! A range expression is a boolean selection over a single integer
//! candidate. Selectors (literals, intervals, comparisons, divisibility
//! tests) combine with `!`, `&`, and `,`/`|`. The numeric operands of
//! selectors are arithmetic [`NumExpr`] trees, folded to constants against
//! the domain bounds before evaluation.

use crate::token::Span;

/// A selection expression over one integer candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,
    /// Source span.
    pub span: Span,
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Bare value: membership test, candidate equals the value.
    Literal(NumExpr),
    /// `*` — matches every candidate.
    Wildcard,
    /// Prefix comparison, e.g. `<= end - 1`.
    Compare {
        /// Comparison operator.
        op: CmpOp,
        /// Right-hand value.
        value: NumExpr,
    },
    /// `%n` (candidate divisible by `n`) or `%n == m` (remainder is `m`).
    Modulo {
        /// The divisor.
        modulus: NumExpr,
        /// Expected remainder; `None` means zero (plain divisibility).
        remainder: Option<NumExpr>,
    },
    /// `lo..hi` (inclusive) or `lo..step..hi` (stepped).
    Range {
        /// Lower endpoint (upper for a negative step).
        lo: NumExpr,
        /// Step, when the three-part form is used.
        step: Option<NumExpr>,
        /// Upper endpoint (lower for a negative step).
        hi: NumExpr,
    },
    /// Interval with per-endpoint strictness: `[a,b]`, `(a,b)`, `[a,b)`, `(a,b]`.
    Bracket {
        /// Lower endpoint.
        lo: NumExpr,
        /// Whether the lower endpoint is excluded (`(` rather than `[`).
        lo_strict: bool,
        /// Upper endpoint.
        hi: NumExpr,
        /// Whether the upper endpoint is excluded (`)` rather than `]`).
        hi_strict: bool,
    },
    /// `!expr`
    Not(Box<Expr>),
    /// `a & b`
    And(Box<Expr>, Box<Expr>),
    /// `a, b` or `a | b` (comma and pipe are the same disjunction)
    Or(Box<Expr>, Box<Expr>),
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// Surface symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// An arithmetic value expression.
#[derive(Debug, Clone, PartialEq)]
pub struct NumExpr {
    /// The kind of value expression.
    pub kind: NumKind,
    /// Source span.
    pub span: Span,
}

impl NumExpr {
    /// Create a new value expression.
    pub fn new(kind: NumKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum NumKind {
    /// Integer literal.
    Int(i64),
    /// `begin` — the domain's lower bound.
    Begin,
    /// `end` — the domain's upper bound.
    End,
    /// Unary negation.
    Neg(Box<NumExpr>),
    /// Binary arithmetic.
    Binary {
        /// Operator.
        op: ArithOp,
        /// Left operand.
        left: Box<NumExpr>,
        /// Right operand.
        right: Box<NumExpr>,
    },
}

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (truncating toward zero)
    Div,
    /// `%` (remainder, truncating toward zero)
    Mod,
}

impl ArithOp {
    /// Binding strength, higher binds tighter.
    ///
    /// The legacy engine reduced `*`,`/` everywhere first, then `+`,`-`,
    /// then `%`, so binary `%` is the LOOSEST tier: `10%3+1` means
    /// `10 % (3+1)`. Each tier is left-associative.
    pub fn precedence(&self) -> u8 {
        match self {
            ArithOp::Mod => 1,
            ArithOp::Add | ArithOp::Sub => 2,
            ArithOp::Mul | ArithOp::Div => 3,
        }
    }

    /// Surface symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}
