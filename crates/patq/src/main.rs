//! Command-line front end for the `patq` CQL parser.
//!
//! The binary is the "surrounding layer" of the grammar engine: it owns
//! the usage contract (an empty query never reaches the grammar), prints
//! syntax errors with their caret explanation, and renders parsed trees
//! for inspection.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use patq_cql::{ParseError, Statement};

#[derive(Parser)]
#[command(name = "patq")]
#[command(about = "Parse and inspect CQL patent-search queries")]
/// Top-level CLI options.
struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    command: Commands,
}

#[derive(Subcommand)]
/// Supported `patq` subcommands.
enum Commands {
    /// Parse a query and print its tree
    Parse {
        /// CQL query
        query: String,

        /// Output the tree as JSON
        #[arg(long)]
        json: bool,

        /// Output the canonical query string instead of the tree
        #[arg(long, conflicts_with = "json")]
        canonical: bool,
    },

    /// Validate queries, reporting the first syntax error
    Check {
        /// CQL queries
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Print the search keywords extracted from a query
    Keywords {
        /// CQL query
        query: String,

        /// Output the keywords as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            query,
            json,
            canonical,
        } => cmd_parse(&query, json, canonical),
        Commands::Check { queries } => cmd_check(&queries),
        Commands::Keywords { query, json } => cmd_keywords(&query, json),
    }
}

/// Checks the usage contract and runs the parser.
///
/// An empty query is a caller error, reported without grammar diagnostics;
/// anything else that fails gets the positioned explanation.
fn run_parser(query: &str) -> Result<Statement, ExitCode> {
    if query.trim().is_empty() {
        eprintln!("error: empty query");
        return Err(ExitCode::FAILURE);
    }

    patq_cql::parse(query).map_err(|err| {
        report_syntax_error(&err);
        ExitCode::FAILURE
    })
}

/// Prints a syntax error with its caret explanation to stderr.
fn report_syntax_error(err: &ParseError) {
    eprintln!("error: query syntax error");
    for line in err.explanation().lines() {
        eprintln!("  {line}");
    }
}

/// Implements `patq parse`.
fn cmd_parse(query: &str, json: bool, canonical: bool) -> ExitCode {
    let stmt = match run_parser(query) {
        Ok(stmt) => stmt,
        Err(code) => return code,
    };

    if json {
        match serde_json::to_string_pretty(&stmt) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if canonical {
        println!("{}", stmt.to_query_string());
    } else {
        // Display already ends with a newline
        print!("{stmt}");
    }

    ExitCode::SUCCESS
}

/// Implements `patq check`.
fn cmd_check(queries: &[String]) -> ExitCode {
    for query in queries {
        if let Err(code) = run_parser(query) {
            return code;
        }
    }

    let plural = if queries.len() == 1 { "query" } else { "queries" };
    println!("{} {plural} ok", queries.len());
    ExitCode::SUCCESS
}

/// Implements `patq keywords`.
fn cmd_keywords(query: &str, json: bool) -> ExitCode {
    let stmt = match run_parser(query) {
        Ok(stmt) => stmt,
        Err(code) => return code,
    };

    let keywords = stmt.keywords();
    if json {
        match serde_json::to_string(&keywords) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for keyword in &keywords {
            println!("{keyword}");
        }
    }

    ExitCode::SUCCESS
}
