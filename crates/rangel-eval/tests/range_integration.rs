//! End-to-end tests for `range` across all three domain representations.

use rangel_eval::{range, range_self, Available, Generator, RangeError};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn empty_explicit_list_short_circuits() {
    assert_eq!(range("2..5", vec![]).unwrap(), Vec::<i64>::new());
    assert_eq!(range("*", vec![]).unwrap(), Vec::<i64>::new());
    // Even a malformed expression: the empty domain wins before compilation
    assert_eq!(range("!!!", vec![]).unwrap(), Vec::<i64>::new());
}

#[test]
fn wildcard_returns_the_domain_verbatim() {
    let domain = vec![9, -3, 9, 0, 42];
    assert_eq!(range("*", domain.clone()).unwrap(), domain);
}

#[test]
fn empty_expression_selects_nothing() {
    assert_eq!(range("", vec![1, 2, 3]).unwrap(), Vec::<i64>::new());
    assert_eq!(range("  ", vec![1, 2, 3]).unwrap(), Vec::<i64>::new());
}

#[test]
fn spec_domain_bracket() {
    assert_eq!(
        range("2..5, >8 & !11", "[-2,12]").unwrap(),
        vec![2, 3, 4, 5, 9, 10, 12]
    );
}

#[test]
fn spec_domain_filters_itself_before_the_outer_expression() {
    assert_eq!(
        range("<=19, 22, %5", ">6 & !>27").unwrap(),
        vec![7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 22, 25]
    );
}

#[test]
fn wildcard_spec_takes_bounds_from_the_expression() {
    assert_eq!(
        range("(3,8) & !%4, 22, (10,12]", "*").unwrap(),
        vec![5, 6, 7, 11, 12, 22]
    );
}

#[test]
fn solution_order_and_multiplicity_mirror_the_domain() {
    assert_eq!(
        range(">0", vec![5, 2, 5, -1, 3]).unwrap(),
        vec![5, 2, 5, 3]
    );
}

#[test]
fn self_referential_single_argument_form() {
    assert_eq!(range_self("2..5").unwrap(), vec![2, 3, 4, 5]);
    assert_eq!(range_self(">3 & <=6").unwrap(), vec![4, 5, 6]);
}

#[test]
fn spec_domain_without_any_integer_errors() {
    let err = range("*", "!").unwrap_err();
    assert!(matches!(err, RangeError::NoBounds { .. }));
}

#[test]
fn idempotence_across_calls() {
    let first = range("2..5, >8 & !11", "[-2,12]").unwrap();
    let second = range("2..5, >8 & !11", "[-2,12]").unwrap();
    assert_eq!(first, second);

    let first = range_self("1..2..9").unwrap();
    let second = range_self("1..2..9").unwrap();
    assert_eq!(first, second);
}

#[test]
fn begin_end_keywords_against_an_explicit_list() {
    // begin = -2, end = 12
    assert_eq!(
        range("begin..begin+2, end", (-2..=12).collect::<Vec<_>>()).unwrap(),
        vec![-2, -1, 0, 12]
    );
}

/// Fibonacci generator over the generator protocol: emits 0, 1, 1, 2, 3,
/// 5, 8, 13, 21 and finishes once the next value would pass `end`.
struct Fibonacci {
    current: i64,
    next: i64,
    end: i64,
}

impl Fibonacci {
    fn new(end: i64) -> Self {
        Self {
            current: 0,
            next: 1,
            end,
        }
    }
}

impl Generator for Fibonacci {
    fn begin(&self) -> i64 {
        0
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn next(&mut self) -> i64 {
        let value = self.current;
        self.current = self.next;
        self.next = value + self.next;
        value
    }

    fn is_finished(&self) -> bool {
        self.current > self.end
    }
}

fn fib_available() -> Available {
    Available::Generator(Box::new(Fibonacci::new(21)))
}

#[test]
fn generator_domain_under_wildcard() {
    assert_eq!(
        range("*", fib_available()).unwrap(),
        vec![0, 1, 1, 2, 3, 5, 8, 13, 21]
    );
}

#[test]
fn generator_domain_filtered_by_comparison() {
    assert_eq!(range(">4", fib_available()).unwrap(), vec![5, 8, 13, 21]);
    assert_eq!(range("<4", fib_available()).unwrap(), vec![0, 1, 1, 2, 3]);
}

#[test]
fn generator_bounds_feed_begin_end() {
    // begin = 0, end = 21
    assert_eq!(range(">=end-8", fib_available()).unwrap(), vec![13, 21]);
}

/// Wraps a generator and counts `next` calls, to prove rejection happens
/// before any candidate is stepped.
struct Counted {
    inner: Fibonacci,
    calls: Rc<Cell<usize>>,
}

impl Generator for Counted {
    fn begin(&self) -> i64 {
        self.inner.begin()
    }

    fn end(&self) -> i64 {
        self.inner.end()
    }

    fn next(&mut self) -> i64 {
        self.calls.set(self.calls.get() + 1);
        self.inner.next()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

#[test]
fn malformed_expressions_are_rejected_before_evaluation() {
    for expr in ["2..5; rm -rf /", "alert(1)", "x", "5 | | 3", "==4", "2…5"] {
        let calls = Rc::new(Cell::new(0));
        let counted = Counted {
            inner: Fibonacci::new(21),
            calls: calls.clone(),
        };
        let result = range(expr, Available::Generator(Box::new(counted)));
        assert!(result.is_err(), "expected rejection of {:?}", expr);
        assert_eq!(calls.get(), 0, "candidates were stepped for {:?}", expr);
    }
}

#[test]
fn domain_failure_surfaces_before_outer_expression_errors() {
    // The spec string has no integers and neither does the expression, so
    // resolution fails; the unparseable outer expression is never reached.
    let err = range("!!", "*").unwrap_err();
    assert!(matches!(err, RangeError::NoBounds { .. }));
}
