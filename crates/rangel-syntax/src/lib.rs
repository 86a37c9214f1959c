//! Lexer, parser, and AST for the rangel range-expression DSL.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse, ParseError, Parser};
pub use pretty::{pretty_print_expr, pretty_print_value};
pub use token::{Span, Token, TokenKind};
