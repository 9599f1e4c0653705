//! CQL query parsing and AST for patent metadata search.
//!
//! This crate parses the Contextual-Query-Language dialect used to search
//! structured patent metadata (title, applicant, classification, date) and
//! returns a query tree for downstream search components to translate:
//!
//! - **Triples**: `ti=bicycle` - compare a field against a term
//! - **Bare terms**: `pizza` - search the default field
//! - **Subqueries**: `(a=1 and b=2)` - parenthesized nesting
//! - **Shortcut subqueries**: `ab=(wheel or tyre)` - distribute an operator
//! - **Connectives**: `and`/`und`, `or`/`oder`, `not`/`nicht`, `prox`/`nahe`
//! - **Proximity**: `laser (10a) beam` - neighbourhood operators in terms
//! - **Comments**: `-- to end of line`
//!
//! Parsing is pure and stateless; the operator tables are `const` data, so
//! concurrent callers share nothing mutable. Callers own the returned tree
//! and are responsible for logging [`ParseError::explanation`].
//!
//! # Example
//!
//! ```
//! use patq_cql::{Condition, parse};
//!
//! let stmt = parse("ti=bicycle and pa=siemens").unwrap();
//! assert!(matches!(stmt.first, Condition::Triple { .. }));
//! assert_eq!(stmt.to_query_string(), "ti = bicycle AND pa = siemens");
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexicon;
mod ops;
mod parser;

pub use ast::{Condition, Statement, Term};
pub use error::ParseError;
pub use lexicon::{is_separator, is_term_char, is_wildcard};
pub use ops::{BoolOp, CompareOp, NearKind, NearOp};
pub use parser::parse;
