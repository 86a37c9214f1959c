//! Command-line interface for the rangel range-expression engine.

use clap::{Parser, Subcommand};
use miette::{Diagnostic, NamedSource, SourceSpan};
use rangel_eval::{range, range_self, Available, RangeError};
use rangel_syntax::pretty_print_expr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("RANGEL_GIT_HASH"),
    ")"
);

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("parse error: {message}")]
    #[diagnostic(code(rangel::parse_error))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{message}")]
    Eval { message: String },

    #[error("invalid integer in --list: {message}")]
    BadList { message: String },
}

impl CliError {
    fn from_range_error(e: RangeError, source: Arc<String>) -> Self {
        match e.span() {
            Some(span) => CliError::Parse {
                message: e.to_string(),
                src: NamedSource::new("expression", source),
                span: (span.start, span.len()).into(),
            },
            None => CliError::Eval {
                message: e.to_string(),
            },
        }
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "rangel", version, long_version = LONG_VERSION)]
#[command(about = "Resolve range expressions against integer domains", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an expression and print its normalized form
    Parse {
        /// The range expression
        expr: String,

        /// Show the full syntax tree
        #[arg(short, long)]
        verbose: bool,
    },

    /// Evaluate an expression against an availability domain
    Eval {
        /// The range expression; omitting it selects nothing
        expr: Option<String>,

        /// Domain spec string (itself a range expression)
        #[arg(short, long, conflicts_with = "list")]
        available: Option<String>,

        /// Explicit comma-separated list of integers
        #[arg(short, long)]
        list: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if matches!(
        &cli.command,
        Commands::Parse { verbose: true, .. } | Commands::Eval { verbose: true, .. }
    ) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Parse { expr, verbose } => cmd_parse(&expr, verbose),
        Commands::Eval {
            expr,
            available,
            list,
            ..
        } => cmd_eval(expr.as_deref(), available, list),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn cmd_parse(expr: &str, verbose: bool) -> CliResult<()> {
    let source = Arc::new(expr.to_string());

    let parsed = rangel_syntax::parse(expr).map_err(|e| {
        CliError::from_range_error(RangeError::Parse(e), source.clone())
    })?;

    if verbose {
        println!("{:#?}", parsed);
    }
    println!("{}", pretty_print_expr(&parsed));
    Ok(())
}

fn cmd_eval(expr: Option<&str>, available: Option<String>, list: Option<String>) -> CliResult<()> {
    // No expression selects nothing, whatever the domain
    let Some(expr) = expr else {
        println!();
        return Ok(());
    };
    let source = Arc::new(expr.to_string());

    let solution = match (available, list) {
        (Some(spec), None) => range(expr, Available::Spec(spec)),
        (None, Some(list)) => {
            let values = parse_list(&list)?;
            range(expr, values)
        }
        (None, None) => range_self(expr),
        // clap's conflicts_with makes this unreachable
        (Some(_), Some(_)) => unreachable!(),
    }
    .map_err(|e| CliError::from_range_error(e, source))?;

    debug!(matches = solution.len(), "evaluation complete");
    println!(
        "{}",
        solution
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(())
}

fn parse_list(list: &str) -> CliResult<Vec<i64>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|e| CliError::BadList {
                message: format!("{}: {}", s, e),
            })
        })
        .collect()
}
