//! Constant folding of value expressions.
//!
//! Substitutes the `begin`/`end` keywords with the resolved domain bounds
//! and reduces every value expression to a single integer. The legacy
//! tier ordering (`*`,`/` reduce first, then `+`,`-`, then binary `%`)
//! is encoded as parser precedence, so folding here is a plain
//! post-order walk.

use rangel_syntax::{ArithOp, NumExpr, NumKind, Span};
use thiserror::Error;

/// Folding error.
#[derive(Debug, Error)]
pub enum FoldError {
    #[error("division by zero at {span}")]
    DivisionByZero { span: Span },

    #[error("modulo by zero at {span}")]
    ModuloByZero { span: Span },

    #[error("arithmetic overflow at {span}")]
    Overflow { span: Span },
}

impl FoldError {
    /// Get the source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            FoldError::DivisionByZero { span } => *span,
            FoldError::ModuloByZero { span } => *span,
            FoldError::Overflow { span } => *span,
        }
    }
}

/// The resolved domain bounds that `begin` and `end` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Lower bound (`begin`).
    pub begin: i64,
    /// Upper bound (`end`).
    pub end: i64,
}

/// Fold a value expression to a single integer.
///
/// Division and modulo truncate toward zero. A zero divisor is an error:
/// the legacy engine turned `5/0` into the text `Infinity`, which then
/// failed its own character validation.
pub fn fold(value: &NumExpr, bounds: &Bounds) -> Result<i64, FoldError> {
    match &value.kind {
        NumKind::Int(n) => Ok(*n),
        NumKind::Begin => Ok(bounds.begin),
        NumKind::End => Ok(bounds.end),
        NumKind::Neg(inner) => fold(inner, bounds)?
            .checked_neg()
            .ok_or(FoldError::Overflow { span: value.span }),
        NumKind::Binary { op, left, right } => {
            let l = fold(left, bounds)?;
            let r = fold(right, bounds)?;
            let span = value.span;
            match op {
                ArithOp::Add => l.checked_add(r).ok_or(FoldError::Overflow { span }),
                ArithOp::Sub => l.checked_sub(r).ok_or(FoldError::Overflow { span }),
                ArithOp::Mul => l.checked_mul(r).ok_or(FoldError::Overflow { span }),
                ArithOp::Div => {
                    if r == 0 {
                        return Err(FoldError::DivisionByZero { span });
                    }
                    l.checked_div(r).ok_or(FoldError::Overflow { span })
                }
                ArithOp::Mod => {
                    if r == 0 {
                        return Err(FoldError::ModuloByZero { span });
                    }
                    l.checked_rem(r).ok_or(FoldError::Overflow { span })
                }
            }
        }
    }
}
