//! Predicate compilation and evaluation, plus the `range` entry point.
//!
//! A parsed expression is compiled against the resolved domain bounds into
//! a [`Predicate`]: a closed tree over one integer candidate with every
//! value already folded to an `i64`. Being a typed structure, the
//! predicate cannot smuggle anything past evaluation; the legacy string
//! whitelist has no counterpart here.

use crate::domain::{self, Available, Domain};
use crate::fold::{fold, Bounds, FoldError};
use rangel_syntax::{parse, CmpOp, Expr, ExprKind, ParseError, Span};
use thiserror::Error;
use tracing::debug;

/// Range evaluation error.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("arithmetic error: {0}")]
    Fold(#[from] FoldError),

    #[error("no integer bounds found in domain spec `{spec}`")]
    NoBounds { spec: String },

    #[error("integer out of range in domain bounds: `{text}`")]
    BoundOutOfRange { text: String },
}

impl RangeError {
    /// Get the expression span for this error, when one exists.
    pub fn span(&self) -> Option<Span> {
        match self {
            RangeError::Parse(e) => Some(e.span()),
            RangeError::Fold(e) => Some(e.span()),
            RangeError::NoBounds { .. } => None,
            RangeError::BoundOutOfRange { .. } => None,
        }
    }
}

/// A compiled, closed predicate over one integer candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate(Pred);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pred {
    /// Membership: candidate equals the value.
    Literal(i64),
    /// Matches unconditionally.
    Wildcard,
    /// Candidate compared against a constant.
    Compare { op: CmpOp, value: i64 },
    /// Candidate remainder modulo `modulus` equals `remainder` (0 if absent).
    Divisible {
        modulus: i64,
        remainder: Option<i64>,
    },
    /// Inclusive interval, `lo..hi`.
    Interval { lo: i64, hi: i64 },
    /// Stepped interval, `lo..step..hi`; a negative step mirrors the bounds.
    Stepped { lo: i64, step: i64, hi: i64 },
    /// Interval with per-endpoint strictness.
    Bracket {
        lo: i64,
        lo_strict: bool,
        hi: i64,
        hi_strict: bool,
    },
    Not(Box<Pred>),
    And(Box<Pred>, Box<Pred>),
    Or(Box<Pred>, Box<Pred>),
}

impl Predicate {
    /// Test a candidate against this predicate.
    pub fn matches(&self, x: i64) -> bool {
        matches_pred(&self.0, x)
    }
}

fn matches_pred(pred: &Pred, x: i64) -> bool {
    match pred {
        Pred::Literal(n) => x == *n,
        Pred::Wildcard => true,
        Pred::Compare { op, value } => match op {
            CmpOp::Lt => x < *value,
            CmpOp::Le => x <= *value,
            CmpOp::Gt => x > *value,
            CmpOp::Ge => x >= *value,
        },
        Pred::Divisible { modulus, remainder } => {
            if *modulus == 0 {
                // Legacy quirk: `!(x % 0)` was `!NaN`, so `%0` matches
                // everything while `%0 == m` matches nothing.
                return remainder.is_none();
            }
            x.wrapping_rem(*modulus) == remainder.unwrap_or(0)
        }
        Pred::Interval { lo, hi } => *lo <= x && x <= *hi,
        Pred::Stepped { lo, step, hi } => {
            let in_span = if *step < 0 {
                *hi <= x && x <= *lo
            } else {
                *lo <= x && x <= *hi
            };
            // Step 0 degenerates to the plain interval (legacy `!NaN`)
            let on_step = *step == 0 || x.wrapping_sub(*lo).wrapping_rem(*step) == 0;
            in_span && on_step
        }
        Pred::Bracket {
            lo,
            lo_strict,
            hi,
            hi_strict,
        } => {
            let above = if *lo_strict { x > *lo } else { x >= *lo };
            let below = if *hi_strict { x < *hi } else { x <= *hi };
            above && below
        }
        Pred::Not(operand) => !matches_pred(operand, x),
        Pred::And(left, right) => matches_pred(left, x) && matches_pred(right, x),
        Pred::Or(left, right) => matches_pred(left, x) || matches_pred(right, x),
    }
}

/// Compile a parsed expression against the resolved domain bounds.
pub fn compile(expr: &Expr, bounds: &Bounds) -> Result<Predicate, FoldError> {
    Ok(Predicate(compile_pred(expr, bounds)?))
}

/// Parse and compile an expression in one step.
pub fn compile_str(source: &str, bounds: &Bounds) -> Result<Predicate, RangeError> {
    let expr = parse(source)?;
    Ok(compile(&expr, bounds)?)
}

fn compile_pred(expr: &Expr, bounds: &Bounds) -> Result<Pred, FoldError> {
    Ok(match &expr.kind {
        ExprKind::Literal(v) => Pred::Literal(fold(v, bounds)?),
        ExprKind::Wildcard => Pred::Wildcard,
        ExprKind::Compare { op, value } => Pred::Compare {
            op: *op,
            value: fold(value, bounds)?,
        },
        ExprKind::Modulo { modulus, remainder } => Pred::Divisible {
            modulus: fold(modulus, bounds)?,
            remainder: remainder.as_ref().map(|r| fold(r, bounds)).transpose()?,
        },
        ExprKind::Range { lo, step, hi } => match step {
            None => Pred::Interval {
                lo: fold(lo, bounds)?,
                hi: fold(hi, bounds)?,
            },
            Some(step) => Pred::Stepped {
                lo: fold(lo, bounds)?,
                step: fold(step, bounds)?,
                hi: fold(hi, bounds)?,
            },
        },
        ExprKind::Bracket {
            lo,
            lo_strict,
            hi,
            hi_strict,
        } => Pred::Bracket {
            lo: fold(lo, bounds)?,
            lo_strict: *lo_strict,
            hi: fold(hi, bounds)?,
            hi_strict: *hi_strict,
        },
        ExprKind::Not(operand) => Pred::Not(Box::new(compile_pred(operand, bounds)?)),
        ExprKind::And(left, right) => Pred::And(
            Box::new(compile_pred(left, bounds)?),
            Box::new(compile_pred(right, bounds)?),
        ),
        ExprKind::Or(left, right) => Pred::Or(
            Box::new(compile_pred(left, bounds)?),
            Box::new(compile_pred(right, bounds)?),
        ),
    })
}

/// Resolve `available`, compile `expr` against the resolved bounds, and
/// collect the matching candidates in domain order.
///
/// No sorting and no deduplication: order and multiplicity mirror the
/// domain's iteration order. An expression that is empty after trimming
/// selects nothing (the legacy engine evaluated it to a falsy value for
/// every candidate).
pub fn range(expr: &str, available: impl Into<Available>) -> Result<Vec<i64>, RangeError> {
    let domain = domain::resolve(expr, available.into())?;
    if expr.trim().is_empty() {
        return Ok(Vec::new());
    }

    match domain {
        Domain::Empty => Ok(Vec::new()),

        Domain::Set { values, begin, end } => {
            let predicate = compile_str(expr, &Bounds { begin, end })?;
            debug!(begin, end, candidates = values.len(), "evaluating set domain");
            Ok(values
                .into_iter()
                .filter(|&x| predicate.matches(x))
                .collect())
        }

        Domain::Gen(mut generator) => {
            let bounds = Bounds {
                begin: generator.begin(),
                end: generator.end(),
            };
            let predicate = compile_str(expr, &bounds)?;
            debug!(bounds.begin, bounds.end, "evaluating generator domain");
            let mut solution = Vec::new();
            while !generator.is_finished() {
                let x = generator.next();
                if predicate.matches(x) {
                    solution.push(x);
                }
            }
            Ok(solution)
        }
    }
}

/// Single-argument form: the expression doubles as its own domain spec.
pub fn range_self(expr: &str) -> Result<Vec<i64>, RangeError> {
    range(expr, Available::Spec(expr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds { begin: 0, end: 100 };

    fn pred(source: &str) -> Predicate {
        compile_str(source, &BOUNDS).unwrap()
    }

    fn matches_of(source: &str, candidates: impl IntoIterator<Item = i64>) -> Vec<i64> {
        let p = pred(source);
        candidates.into_iter().filter(|&x| p.matches(x)).collect()
    }

    #[test]
    fn test_literal_and_wildcard() {
        assert_eq!(matches_of("5", 0..10), vec![5]);
        assert_eq!(matches_of("*", 0..4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(matches_of("<3", 0..6), vec![0, 1, 2]);
        assert_eq!(matches_of("<=3", 0..6), vec![0, 1, 2, 3]);
        assert_eq!(matches_of(">3", 0..6), vec![4, 5]);
        assert_eq!(matches_of(">=3", 0..6), vec![3, 4, 5]);
    }

    #[test]
    fn test_divisibility() {
        assert_eq!(matches_of("%3", 1..10), vec![3, 6, 9]);
        assert_eq!(matches_of("%3 == 1", 0..10), vec![1, 4, 7]);
        assert_eq!(matches_of("!%4", 0..6), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_modulus_zero_quirk() {
        // `%0` matches everything, `%0 == m` matches nothing
        assert_eq!(matches_of("%0", 0..3), vec![0, 1, 2]);
        assert_eq!(matches_of("%0 == 1", 0..3), Vec::<i64>::new());
    }

    #[test]
    fn test_intervals() {
        assert_eq!(matches_of("2..5", 0..8), vec![2, 3, 4, 5]);
        assert_eq!(matches_of("[2,5]", 0..8), vec![2, 3, 4, 5]);
        assert_eq!(matches_of("(2,5)", 0..8), vec![3, 4]);
        assert_eq!(matches_of("[2,5)", 0..8), vec![2, 3, 4]);
        assert_eq!(matches_of("(2,5]", 0..8), vec![3, 4, 5]);
    }

    #[test]
    fn test_stepped_interval() {
        assert_eq!(matches_of("1..3..10", 0..12), vec![1, 4, 7, 10]);
        // Negative step mirrors the endpoint comparisons
        assert_eq!(matches_of("10..-3..1", 0..12), vec![1, 4, 7, 10]);
        // Step 0 degenerates to the plain interval
        assert_eq!(matches_of("3..0..5", 0..8), vec![3, 4, 5]);
    }

    #[test]
    fn test_inverted_interval_is_empty() {
        assert_eq!(matches_of("5..2", 0..8), Vec::<i64>::new());
    }

    #[test]
    fn test_begin_end_fold_into_predicate() {
        let p = compile_str("begin..begin+2", &Bounds { begin: 4, end: 9 }).unwrap();
        assert!(p.matches(4) && p.matches(6) && !p.matches(7));

        let p = compile_str(">=end-1", &Bounds { begin: 4, end: 9 }).unwrap();
        assert!(!p.matches(7) && p.matches(8) && p.matches(9));
    }

    #[test]
    fn test_connective_semantics() {
        assert_eq!(matches_of(">2 & <6", 0..10), vec![3, 4, 5]);
        assert_eq!(matches_of("1, 8", 0..10), vec![1, 8]);
        assert_eq!(matches_of("!(2..8)", 0..10), vec![0, 1, 9]);
    }

    #[test]
    fn test_compile_rejects_bad_input() {
        assert!(matches!(
            compile_str("2..5; rm", &BOUNDS),
            Err(RangeError::Parse(_))
        ));
        assert!(matches!(
            compile_str("5/0", &BOUNDS),
            Err(RangeError::Fold(_))
        ));
    }
}
