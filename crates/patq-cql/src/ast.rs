//! Query abstract syntax tree.
//!
//! Represents parsed CQL statements before the surrounding service layer
//! translates them into a backend search request. Trees are plain values:
//! immutable once produced and owned by the caller.

use std::fmt;

use serde::Serialize;

use crate::{
    lexicon::is_wildcard,
    ops::{BoolOp, CompareOp, NearOp},
};

/// A search term: the value side of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Term {
    /// One or more term atoms joined by neighbourhood operators.
    Atoms {
        /// The atoms, in query order. Never empty.
        atoms: Vec<String>,
        /// The joining operators; `ops.len() == atoms.len() - 1`.
        ops: Vec<NearOp>,
    },

    /// A quoted literal, stored verbatim minus the surrounding quotes.
    Quoted(String),
}

impl Term {
    /// Creates a single-atom term.
    pub fn atom(text: impl Into<String>) -> Self {
        Self::Atoms {
            atoms: vec![text.into()],
            ops: Vec::new(),
        }
    }

    /// Renders the term in canonical query text.
    fn write_query_string(&self, out: &mut String) {
        match self {
            Self::Atoms { atoms, ops } => {
                out.push_str(&atoms[0]);
                for (op, atom) in ops.iter().zip(&atoms[1..]) {
                    out.push_str(" (");
                    out.push_str(&op.symbol());
                    out.push_str(") ");
                    out.push_str(atom);
                }
            }
            Self::Quoted(text) => {
                // pick the quote character that keeps the content intact;
                // content with both kinds needs escaping
                if text.contains('"') {
                    if text.contains('\'') {
                        out.push('"');
                        out.push_str(&text.replace('\\', "\\\\").replace('"', "\\\""));
                        out.push('"');
                    } else {
                        out.push('\'');
                        out.push_str(text);
                        out.push('\'');
                    }
                } else {
                    out.push('"');
                    out.push_str(text);
                    out.push('"');
                }
            }
        }
    }

    /// Collects the plain search keywords carried by this term.
    fn collect_keywords(&self, keywords: &mut Vec<String>) {
        match self {
            Self::Atoms { atoms, .. } => {
                for atom in atoms {
                    let word = atom.trim_matches(is_wildcard);
                    if !word.is_empty() {
                        push_unique(keywords, word);
                    }
                }
            }
            Self::Quoted(text) => {
                if !text.is_empty() {
                    push_unique(keywords, text);
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_query_string(&mut out);
        f.write_str(&out)
    }
}

/// A single condition inside a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Condition {
    /// Explicit field comparison: `index op term`.
    Triple {
        /// Field identifier, e.g. `ti` or `pa`.
        index: String,
        /// Comparison operator.
        op: CompareOp,
        /// Value side.
        term: Term,
    },

    /// A fully parenthesized nested statement: `(a=b and c=d)`.
    Subquery {
        /// The nested statement.
        inner: Box<Statement>,
    },

    /// A bare term with no index or operator, implying the default search
    /// field: `pizza`.
    ShortcutTriple {
        /// The bare term.
        term: Term,
    },

    /// A comparison distributed over a parenthesized sub-expression:
    /// `index op (a and b)`.
    ShortcutSubquery {
        /// Field identifier.
        index: String,
        /// Comparison operator.
        op: CompareOp,
        /// The parenthesized statement the comparison distributes over.
        inner: Box<Statement>,
    },
}

impl Condition {
    /// Renders the condition in canonical query text.
    fn write_query_string(&self, out: &mut String) {
        match self {
            Self::Triple { index, op, term } => {
                out.push_str(index);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                term.write_query_string(out);
            }
            Self::Subquery { inner } => {
                out.push('(');
                inner.write_query_string(out);
                out.push(')');
            }
            Self::ShortcutTriple { term } => term.write_query_string(out),
            Self::ShortcutSubquery { index, op, inner } => {
                out.push_str(index);
                out.push(' ');
                out.push_str(op.as_str());
                out.push_str(" (");
                inner.write_query_string(out);
                out.push(')');
            }
        }
    }

    /// Formats the condition as an indented tree node.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Triple { index, op, term } => {
                writeln!(f, "{prefix}Triple({index} {op} {term})")
            }
            Self::Subquery { inner } => {
                writeln!(f, "{prefix}Subquery")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::ShortcutTriple { term } => writeln!(f, "{prefix}ShortcutTriple({term})"),
            Self::ShortcutSubquery { index, op, inner } => {
                writeln!(f, "{prefix}ShortcutSubquery({index} {op})")?;
                inner.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Collects keywords from this condition into `keywords`.
    fn collect_keywords(&self, keywords: &mut Vec<String>) {
        match self {
            Self::Triple { term, .. } | Self::ShortcutTriple { term } => {
                term.collect_keywords(keywords);
            }
            Self::Subquery { inner } | Self::ShortcutSubquery { inner, .. } => {
                inner.collect_keywords(keywords);
            }
        }
    }
}

/// A parsed CQL statement: a condition chain joined by boolean operators.
///
/// The chain is right-associative: `a=1 and b=2 or c=3` groups as
/// `a=1 AND (b=2 OR c=3)`. All four connectives bind with equal strength;
/// downstream consumers depend on this grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// The leading condition.
    pub first: Condition,
    /// Trailing `(connective, statement)` pairs.
    pub rest: Vec<(BoolOp, Statement)>,
}

impl Statement {
    /// Wraps a single condition.
    pub fn condition(first: Condition) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    /// Renders the statement back to canonical query text.
    ///
    /// Canonical output re-parses to a structurally identical tree:
    /// triples as `index op term`, connectives as their upper-case English
    /// keyword, neighbourhood operators parenthesized with single spaces,
    /// quoted terms double-quoted where possible.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        self.write_query_string(&mut out);
        out
    }

    /// Renders into `out`.
    fn write_query_string(&self, out: &mut String) {
        self.first.write_query_string(out);
        for (op, stmt) in &self.rest {
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            stmt.write_query_string(out);
        }
    }

    /// Collects the plain search keywords mentioned anywhere in the tree,
    /// in query order, deduplicated.
    ///
    /// Wildcards are trimmed from atom edges; quoted literals are kept
    /// verbatim. The surrounding service layer feeds these to result
    /// highlighting.
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords = Vec::new();
        self.collect_keywords(&mut keywords);
        keywords
    }

    /// Collects keywords from this statement into `keywords`.
    fn collect_keywords(&self, keywords: &mut Vec<String>) {
        self.first.collect_keywords(keywords);
        for (_, stmt) in &self.rest {
            stmt.collect_keywords(keywords);
        }
    }

    /// Formats the statement as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        self.first.fmt_tree(f, indent)?;
        let prefix = "  ".repeat(indent);
        for (op, stmt) in &self.rest {
            writeln!(f, "{prefix}{op}")?;
            stmt.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Appends `word` unless already collected.
fn push_unique(keywords: &mut Vec<String>, word: &str) {
    if !keywords.iter().any(|k| k == word) {
        keywords.push(word.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::NearKind;

    fn triple(index: &str, op: CompareOp, term: &str) -> Condition {
        Condition::Triple {
            index: index.into(),
            op,
            term: Term::atom(term),
        }
    }

    #[test]
    fn query_string_for_triple() {
        let stmt = Statement::condition(triple("ti", CompareOp::Eq, "bicycle"));
        assert_eq!(stmt.to_query_string(), "ti = bicycle");
    }

    #[test]
    fn query_string_for_chain_uses_english_connectives() {
        let stmt = Statement {
            first: triple("a", CompareOp::Eq, "1"),
            rest: vec![(
                BoolOp::And,
                Statement {
                    first: triple("b", CompareOp::Eq, "2"),
                    rest: vec![(
                        BoolOp::Or,
                        Statement::condition(triple("c", CompareOp::Eq, "3")),
                    )],
                },
            )],
        };
        assert_eq!(stmt.to_query_string(), "a = 1 AND b = 2 OR c = 3");
    }

    #[test]
    fn query_string_for_neighboured_term() {
        let term = Term::Atoms {
            atoms: vec!["laser".into(), "beam".into()],
            ops: vec![NearOp {
                kind: NearKind::A,
                distance: Some(10),
            }],
        };
        let stmt = Statement::condition(Condition::ShortcutTriple { term });
        assert_eq!(stmt.to_query_string(), "laser (10A) beam");
    }

    #[test]
    fn query_string_for_subqueries() {
        let inner = Statement::condition(triple("a", CompareOp::Eq, "1"));
        let stmt = Statement::condition(Condition::Subquery {
            inner: Box::new(inner.clone()),
        });
        assert_eq!(stmt.to_query_string(), "(a = 1)");

        let stmt = Statement::condition(Condition::ShortcutSubquery {
            index: "ti".into(),
            op: CompareOp::Eq,
            inner: Box::new(inner),
        });
        assert_eq!(stmt.to_query_string(), "ti = (a = 1)");
    }

    #[test]
    fn quoted_term_prefers_double_quotes() {
        let stmt = Statement::condition(Condition::ShortcutTriple {
            term: Term::Quoted("laser welding".into()),
        });
        assert_eq!(stmt.to_query_string(), "\"laser welding\"");
    }

    #[test]
    fn quoted_term_with_double_quote_switches_to_single() {
        let stmt = Statement::condition(Condition::ShortcutTriple {
            term: Term::Quoted("say \"hi\"".into()),
        });
        assert_eq!(stmt.to_query_string(), "'say \"hi\"'");
    }

    #[test]
    fn keywords_trim_wildcards_and_dedup() {
        let stmt = Statement {
            first: Condition::Triple {
                index: "ti".into(),
                op: CompareOp::Eq,
                term: Term::atom("bicycl?"),
            },
            rest: vec![(
                BoolOp::Or,
                Statement::condition(Condition::ShortcutTriple {
                    term: Term::atom("bicycl!"),
                }),
            )],
        };
        assert_eq!(stmt.keywords(), vec!["bicycl"]);
    }

    #[test]
    fn keywords_walk_subqueries_and_quoted_terms() {
        let inner = Statement {
            first: triple("ab", CompareOp::Eq, "wheel"),
            rest: vec![(
                BoolOp::And,
                Statement::condition(Condition::ShortcutTriple {
                    term: Term::Quoted("disc brake".into()),
                }),
            )],
        };
        let stmt = Statement::condition(Condition::ShortcutSubquery {
            index: "bi".into(),
            op: CompareOp::Eq,
            inner: Box::new(inner),
        });
        assert_eq!(stmt.keywords(), vec!["wheel", "disc brake"]);
    }

    #[test]
    fn keywords_from_neighboured_atoms() {
        let term = Term::Atoms {
            atoms: vec!["laser".into(), "beam".into()],
            ops: vec![NearOp {
                kind: NearKind::W,
                distance: None,
            }],
        };
        let stmt = Statement::condition(Condition::ShortcutTriple { term });
        assert_eq!(stmt.keywords(), vec!["laser", "beam"]);
    }

    #[test]
    fn display_renders_indented_tree() {
        let inner = Statement::condition(triple("b", CompareOp::Eq, "2"));
        let stmt = Statement {
            first: triple("a", CompareOp::Eq, "1"),
            rest: vec![(
                BoolOp::And,
                Statement::condition(Condition::Subquery {
                    inner: Box::new(inner),
                }),
            )],
        };
        let rendered = stmt.to_string();
        assert!(rendered.contains("Triple(a = 1)"));
        assert!(rendered.contains("AND"));
        assert!(rendered.contains("Subquery"));
        assert!(rendered.contains("  Triple(b = 2)"));
    }
}
