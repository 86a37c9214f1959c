//! Availability-domain resolution.
//!
//! The availability argument of [`range`](crate::range) can be an explicit
//! integer list, a caller-supplied generator, or a domain spec string that
//! is itself a range expression. Resolution runs to completion before the
//! outer expression is compiled, so a bad domain fails before any
//! candidate is tested.

use crate::eval::{self, RangeError};
use std::fmt;
use tracing::debug;

/// The generator protocol: a lazily stepped integer domain.
///
/// The engine only ever calls these four methods; the cursor state belongs
/// to the generator. `next` is never called again once `is_finished`
/// returns true. A generator whose `is_finished` never returns true makes
/// evaluation loop forever; that is a caller contract violation the engine
/// does not detect.
pub trait Generator {
    /// The domain's lower bound, substituted for the `begin` keyword.
    fn begin(&self) -> i64;
    /// The domain's upper bound, substituted for the `end` keyword.
    fn end(&self) -> i64;
    /// Produce the next candidate and advance the cursor.
    fn next(&mut self) -> i64;
    /// Whether the cursor is exhausted.
    fn is_finished(&self) -> bool;
}

/// The availability domain, as supplied by the caller.
pub enum Available {
    /// An ordered list of candidates; duplicates and ordering are preserved.
    List(Vec<i64>),
    /// A domain spec string, itself a range expression.
    Spec(String),
    /// A caller-supplied generator.
    Generator(Box<dyn Generator>),
}

impl fmt::Debug for Available {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Available::List(values) => f.debug_tuple("List").field(values).finish(),
            Available::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
            Available::Generator(g) => f
                .debug_struct("Generator")
                .field("begin", &g.begin())
                .field("end", &g.end())
                .finish_non_exhaustive(),
        }
    }
}

impl From<Vec<i64>> for Available {
    fn from(values: Vec<i64>) -> Self {
        Available::List(values)
    }
}

impl From<&[i64]> for Available {
    fn from(values: &[i64]) -> Self {
        Available::List(values.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Available {
    fn from(values: [i64; N]) -> Self {
        Available::List(values.to_vec())
    }
}

impl From<&str> for Available {
    fn from(spec: &str) -> Self {
        Available::Spec(spec.to_string())
    }
}

impl From<String> for Available {
    fn from(spec: String) -> Self {
        Available::Spec(spec)
    }
}

impl From<Box<dyn Generator>> for Available {
    fn from(generator: Box<dyn Generator>) -> Self {
        Available::Generator(generator)
    }
}

/// A resolved domain: a concrete iteration source plus bounds.
pub enum Domain {
    /// The domain is empty; the solution is empty without evaluation.
    Empty,
    /// Materialized candidates in iteration order, with precomputed bounds.
    Set {
        values: Vec<i64>,
        begin: i64,
        end: i64,
    },
    /// A caller-supplied generator, stepped during evaluation.
    Gen(Box<dyn Generator>),
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Empty => f.write_str("Empty"),
            Domain::Set { values, begin, end } => f
                .debug_struct("Set")
                .field("values", values)
                .field("begin", begin)
                .field("end", end)
                .finish(),
            Domain::Gen(g) => f
                .debug_struct("Gen")
                .field("begin", &g.begin())
                .field("end", &g.end())
                .finish_non_exhaustive(),
        }
    }
}

/// The synthetic `+1`-step generator used to materialize spec domains.
#[derive(Debug, Clone)]
pub struct StepGenerator {
    begin: i64,
    end: i64,
    cursor: i64,
    done: bool,
}

impl StepGenerator {
    /// Create a generator stepping from `begin` through `end` inclusive.
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            cursor: begin,
            done: begin > end,
        }
    }
}

impl Generator for StepGenerator {
    fn begin(&self) -> i64 {
        self.begin
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn next(&mut self) -> i64 {
        let value = self.cursor;
        // The explicit flag keeps `end == i64::MAX` from overflowing
        if self.cursor < self.end {
            self.cursor += 1;
        } else {
            self.done = true;
        }
        value
    }

    fn is_finished(&self) -> bool {
        self.done
    }
}

/// Extract every signed integer literal from a string, left to right.
///
/// A `-` or `+` immediately preceding a digit run is taken as its sign,
/// matching the legacy global-regex scan: `"3-2"` yields `[3, -2]`. Runs
/// too long for `i64` are dropped here; [`resolve`] reports them as
/// errors when they would have become domain bounds.
pub fn scan_integers(s: &str) -> Vec<i64> {
    scan_runs(s)
        .into_iter()
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// The signed digit runs of `s`, as text.
fn scan_runs(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let signed = (bytes[i] == b'-' || bytes[i] == b'+')
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_digit();
        if !signed && !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        if signed {
            i += 1;
        }
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }

        runs.push(&s[start..i]);
    }

    runs
}

/// Scan for domain bounds; an oversized run is an error rather than a
/// silently missing bound.
fn scan_bounds(s: &str) -> Result<Vec<i64>, RangeError> {
    scan_runs(s)
        .into_iter()
        .map(|run| {
            run.parse().map_err(|_| RangeError::BoundOutOfRange {
                text: run.to_string(),
            })
        })
        .collect()
}

/// Resolve the availability domain for `expr`.
///
/// For spec-string domains this materializes the domain by evaluating the
/// spec against a synthetic `+1`-step generator spanning the integer
/// literals found in the spec (falling back to the literals of `expr`
/// itself when the spec has none, which is what makes a bare `"*"` spec
/// usable).
pub fn resolve(expr: &str, available: Available) -> Result<Domain, RangeError> {
    match available {
        Available::List(values) => {
            if values.is_empty() {
                return Ok(Domain::Empty);
            }
            let begin = *values.iter().min().unwrap_or(&0);
            let end = *values.iter().max().unwrap_or(&0);
            Ok(Domain::Set { values, begin, end })
        }

        Available::Generator(generator) => Ok(Domain::Gen(generator)),

        Available::Spec(spec) => {
            let mut literals = scan_bounds(&spec)?;
            if literals.is_empty() {
                literals = scan_bounds(expr)?;
            }
            let (Some(&lo), Some(&hi)) = (literals.iter().min(), literals.iter().max()) else {
                return Err(RangeError::NoBounds { spec });
            };
            debug!(lo, hi, spec = spec.as_str(), "materializing spec domain");

            let generator: Box<dyn Generator> = Box::new(StepGenerator::new(lo, hi));
            let values = eval::range(&spec, Available::Generator(generator))?;
            if values.is_empty() {
                return Ok(Domain::Empty);
            }
            let begin = *values.iter().min().unwrap_or(&0);
            let end = *values.iter().max().unwrap_or(&0);
            Ok(Domain::Set { values, begin, end })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_integers() {
        assert_eq!(scan_integers("[-2,12]"), vec![-2, 12]);
        assert_eq!(scan_integers(">6 & !>27"), vec![6, 27]);
        assert_eq!(scan_integers("3-2"), vec![3, -2]);
        assert_eq!(scan_integers("1+2"), vec![1, 2]);
        assert_eq!(scan_integers("*"), Vec::<i64>::new());
        assert_eq!(scan_integers(""), Vec::<i64>::new());
    }

    #[test]
    fn test_oversized_bound_is_an_error_not_no_bounds() {
        let err = resolve("*", Available::Spec("99999999999999999999".to_string())).unwrap_err();
        assert!(matches!(err, RangeError::BoundOutOfRange { .. }));

        // The expression-fallback path reports it the same way
        let err = resolve(
            "1..99999999999999999999",
            Available::Spec("*".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, RangeError::BoundOutOfRange { .. }));
    }

    #[test]
    fn test_empty_list_short_circuits() {
        let domain = resolve("*", Available::List(vec![])).unwrap();
        assert!(matches!(domain, Domain::Empty));
    }

    #[test]
    fn test_list_bounds() {
        let domain = resolve("*", Available::List(vec![5, -1, 3])).unwrap();
        match domain {
            Domain::Set { values, begin, end } => {
                assert_eq!(values, vec![5, -1, 3]);
                assert_eq!(begin, -1);
                assert_eq!(end, 5);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_spec_domain_materializes() {
        let domain = resolve("*", Available::Spec("[-2,12]".to_string())).unwrap();
        match domain {
            Domain::Set { values, begin, end } => {
                assert_eq!(values, (-2..=12).collect::<Vec<_>>());
                assert_eq!(begin, -2);
                assert_eq!(end, 12);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_spec_domain_filters_itself() {
        // ">6 & !>27" scans to bounds 6..27, then filters itself down to 7..27
        let domain = resolve("<=19", Available::Spec(">6 & !>27".to_string())).unwrap();
        match domain {
            Domain::Set { values, begin, end } => {
                assert_eq!(values, (7..=27).collect::<Vec<_>>());
                assert_eq!(begin, 7);
                assert_eq!(end, 27);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_spec_without_literals_uses_expr_bounds() {
        // "*" has no literals, so the bounds come from the expression
        let domain = resolve("3..5", Available::Spec("*".to_string())).unwrap();
        match domain {
            Domain::Set { values, .. } => assert_eq!(values, vec![3, 4, 5]),
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_no_bounds_anywhere_is_an_error() {
        let err = resolve("*", Available::Spec("*".to_string())).unwrap_err();
        assert!(matches!(err, RangeError::NoBounds { .. }));
    }

    #[test]
    fn test_step_generator() {
        let mut g = StepGenerator::new(-1, 2);
        assert_eq!((g.begin(), g.end()), (-1, 2));
        let mut seen = Vec::new();
        while !g.is_finished() {
            seen.push(g.next());
        }
        assert_eq!(seen, vec![-1, 0, 1, 2]);
    }
}
