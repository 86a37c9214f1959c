//! Pretty printer for parsed range expressions.
//!
//! Produces a normalized surface form that reparses to the same tree:
//! comma for top-level disjunction (`|` inside parentheses, where a comma
//! would reparse as a bracket interval), single `&` for conjunction, no
//! redundant parentheses except where precedence requires them.

use crate::ast::*;

/// Pretty print an expression to a string.
pub fn pretty_print_expr(expr: &Expr) -> String {
    let mut printer = PrettyPrinter::new();
    printer.print_expr(expr, Prec::Or);
    printer.output
}

/// Pretty print a value expression to a string.
pub fn pretty_print_value(value: &NumExpr) -> String {
    let mut printer = PrettyPrinter::new();
    printer.print_value(value);
    printer.output
}

/// Boolean-level precedence, loosest first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Or,
    And,
    Not,
}

struct PrettyPrinter {
    output: String,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn print_expr(&mut self, expr: &Expr, prec: Prec) {
        match &expr.kind {
            ExprKind::Literal(v) => self.print_value(v),
            ExprKind::Wildcard => self.write("*"),
            ExprKind::Compare { op, value } => {
                self.write(op.symbol());
                self.print_value(value);
            }
            ExprKind::Modulo { modulus, remainder } => {
                self.write("%");
                self.print_value(modulus);
                if let Some(rem) = remainder {
                    self.write(" == ");
                    self.print_value(rem);
                }
            }
            ExprKind::Range { lo, step, hi } => {
                self.print_value(lo);
                self.write("..");
                if let Some(step) = step {
                    self.print_value(step);
                    self.write("..");
                }
                self.print_value(hi);
            }
            ExprKind::Bracket {
                lo,
                lo_strict,
                hi,
                hi_strict,
            } => {
                self.write(if *lo_strict { "(" } else { "[" });
                self.print_value(lo);
                self.write(",");
                self.print_value(hi);
                self.write(if *hi_strict { ")" } else { "]" });
            }
            ExprKind::Not(operand) => {
                self.write("!");
                self.print_expr(operand, Prec::Not);
            }
            ExprKind::And(left, right) => {
                let parens = prec > Prec::And;
                if parens {
                    self.write("(");
                }
                self.print_expr(left, Prec::And);
                self.write(" & ");
                self.print_expr(right, Prec::And);
                if parens {
                    self.write(")");
                }
            }
            ExprKind::Or(left, right) => {
                let parens = prec > Prec::Or;
                if parens {
                    self.write("(");
                }
                self.print_expr(left, Prec::Or);
                // `(a, b)` is bracket-interval syntax, so a parenthesized
                // disjunction must use the pipe spelling to stay a group
                self.write(if parens { " | " } else { ", " });
                self.print_expr(right, Prec::Or);
                if parens {
                    self.write(")");
                }
            }
        }
    }

    // Values have no grouping syntax in the surface language, and parsed
    // trees are already grouped the way the precedence tiers dictate, so
    // operands print flat.
    fn print_value(&mut self, value: &NumExpr) {
        match &value.kind {
            NumKind::Int(n) => self.write(&n.to_string()),
            NumKind::Begin => self.write("begin"),
            NumKind::End => self.write("end"),
            NumKind::Neg(inner) => {
                self.write("-");
                self.print_value(inner);
            }
            NumKind::Binary { op, left, right } => {
                self.print_value(left);
                self.write(op.symbol());
                self.print_value(right);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(source: &str) -> String {
        pretty_print_expr(&parse(source).unwrap())
    }

    #[test]
    fn test_pretty_selectors() {
        assert_eq!(roundtrip("2 .. 5"), "2..5");
        assert_eq!(roundtrip("1..2..9"), "1..2..9");
        assert_eq!(roundtrip("<=19"), "<=19");
        assert_eq!(roundtrip("%5==2"), "%5 == 2");
        assert_eq!(roundtrip("[2, 5)"), "[2,5)");
        assert_eq!(roundtrip("*"), "*");
    }

    #[test]
    fn test_pretty_connectives() {
        assert_eq!(roundtrip("2..5,>8&&!11"), "2..5, >8 & !11");
        assert_eq!(roundtrip("1 | 2"), "1, 2");
    }

    #[test]
    fn test_pretty_parenthesizes_groups() {
        assert_eq!(roundtrip("!(2..5, 9)"), "!(2..5 | 9)");
        assert_eq!(roundtrip("(2..5, 9) & >0"), "(2..5 | 9) & >0");
        // `(1,2)` is interval-shaped, so it stays a bracket, not a group
        assert_eq!(roundtrip("!(1, 2)"), "!(1,2)");
    }

    #[test]
    fn test_printed_groups_stay_disjunctions() {
        // A comma inside parentheses would reparse as a bracket interval:
        // `!(1|2)` excludes {1, 2}, `!(1,2)` excludes nothing over integers
        let printed = roundtrip("!(1|2)");
        assert_eq!(printed, "!(1 | 2)");
        match &parse(&printed).unwrap().kind {
            ExprKind::Not(inner) => assert!(matches!(inner.kind, ExprKind::Or(_, _))),
            other => panic!("expected a negated disjunction, got {:?}", other),
        }

        let printed = roundtrip("(1|2) & >0");
        assert_eq!(printed, "(1 | 2) & >0");
        match &parse(&printed).unwrap().kind {
            ExprKind::And(left, _) => assert!(matches!(left.kind, ExprKind::Or(_, _))),
            other => panic!("expected a conjunction, got {:?}", other),
        }

        // Left-nested disjunctions keep the comma for inner separators;
        // the pipe before the close paren still defeats the bracket shape
        let printed = roundtrip("!(1, 2, 3)");
        assert_eq!(printed, "!(1, 2 | 3)");
        match &parse(&printed).unwrap().kind {
            ExprKind::Not(inner) => assert!(matches!(inner.kind, ExprKind::Or(_, _))),
            other => panic!("expected a negated disjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_pretty_values() {
        assert_eq!(roundtrip("begin+1..end-1"), "begin+1..end-1");
        assert_eq!(roundtrip("-3"), "-3");
    }

    #[test]
    fn test_pretty_reparses() {
        for source in ["2..5, >8 & !11", "(3,8) & !%4, 22, (10,12]", "%3"] {
            let once = roundtrip(source);
            let twice = pretty_print_expr(&parse(&once).unwrap());
            assert_eq!(once, twice);
        }
    }
}
