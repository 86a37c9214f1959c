//! Domain resolution and predicate evaluation for range expressions.
//!
//! The entry point is [`range`]: it resolves the availability domain,
//! compiles the expression into a closed integer predicate, and collects
//! the matching candidates in domain order.

pub mod domain;
pub mod eval;
pub mod fold;

pub use domain::{resolve, scan_integers, Available, Domain, Generator, StepGenerator};
pub use eval::{compile, compile_str, range, range_self, Predicate, RangeError};
pub use fold::{fold, Bounds, FoldError};
