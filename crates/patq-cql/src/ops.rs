//! Operator tables for the CQL dialect.
//!
//! Three independent tables: boolean connectives, comparison operators and
//! neighbourhood (proximity) operators. All tables are `const` data, built
//! before first use and never mutated, so concurrent parses share them
//! without locking.

use std::fmt;

use serde::{Serialize, Serializer};

/// A boolean connective joining conditions in a statement.
///
/// Each connective has an English and a German keyword form; both are
/// matched case-insensitively and canonicalize to the English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// `AND` / `UND`
    And,
    /// `OR` / `ODER`
    Or,
    /// `NOT` / `NICHT`
    Not,
    /// `PROX` / `NAHE`
    Prox,
}

/// Keyword aliases for the boolean connectives, lower-cased.
const BOOL_KEYWORDS: &[(&str, BoolOp)] = &[
    ("and", BoolOp::And),
    ("und", BoolOp::And),
    ("or", BoolOp::Or),
    ("oder", BoolOp::Or),
    ("not", BoolOp::Not),
    ("nicht", BoolOp::Not),
    ("prox", BoolOp::Prox),
    ("nahe", BoolOp::Prox),
];

impl BoolOp {
    /// Canonical upper-case English keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Prox => "PROX",
        }
    }

    /// Looks up an isolated keyword, case-insensitively.
    ///
    /// The caller is responsible for token isolation: `word` must be a
    /// complete alphanumeric run, so that `android` never matches `and`.
    pub fn from_keyword(word: &str) -> Option<Self> {
        BOOL_KEYWORDS
            .iter()
            .find(|(alias, _)| word.eq_ignore_ascii_case(alias))
            .map(|&(_, op)| op)
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BoolOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A binary comparison operator between an index and a term.
///
/// Three syntactic families: symbolic (`=`, `!=`, ...), Perl-style
/// mnemonics (`eq`, `ne`, ...) and named CQL relations (`exact`, `any`,
/// ...). The families are kept distinct in the tree; downstream backends
/// translate them individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `eq`
    TextEq,
    /// `ne`
    TextNe,
    /// `lt`
    TextLt,
    /// `gt`
    TextGt,
    /// `le`
    TextLe,
    /// `ge`
    TextGe,
    /// `exact`
    Exact,
    /// `within`
    Within,
    /// `encloses`
    Encloses,
    /// `all`
    All,
    /// `any`
    Any,
    /// `any/relevant`
    AnyRelevant,
    /// `any/rel.lr`
    AnyRelLr,
}

/// Comparison operator table.
///
/// Ordered by pattern length, longest first, so that a prefix match at the
/// cursor never truncates a longer operator (`any/relevant` before `any`,
/// `<=` before `<`).
const COMPARE_OPS: &[(&str, CompareOp)] = &[
    ("any/relevant", CompareOp::AnyRelevant),
    ("any/rel.lr", CompareOp::AnyRelLr),
    ("encloses", CompareOp::Encloses),
    ("within", CompareOp::Within),
    ("exact", CompareOp::Exact),
    ("all", CompareOp::All),
    ("any", CompareOp::Any),
    ("<=", CompareOp::Le),
    (">=", CompareOp::Ge),
    ("!=", CompareOp::Ne),
    ("eq", CompareOp::TextEq),
    ("ne", CompareOp::TextNe),
    ("lt", CompareOp::TextLt),
    ("gt", CompareOp::TextGt),
    ("le", CompareOp::TextLe),
    ("ge", CompareOp::TextGe),
    ("=", CompareOp::Eq),
    ("<", CompareOp::Lt),
    (">", CompareOp::Gt),
];

impl CompareOp {
    /// Canonical spelling, the table's defining form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::TextEq => "eq",
            Self::TextNe => "ne",
            Self::TextLt => "lt",
            Self::TextGt => "gt",
            Self::TextLe => "le",
            Self::TextGe => "ge",
            Self::Exact => "exact",
            Self::Within => "within",
            Self::Encloses => "encloses",
            Self::All => "all",
            Self::Any => "any",
            Self::AnyRelevant => "any/relevant",
            Self::AnyRelLr => "any/rel.lr",
        }
    }

    /// Matches a comparison operator at `pos`, case-insensitively.
    ///
    /// Returns the operator and the number of characters consumed. Longest
    /// alternatives win by table order; there is no trailing word-boundary
    /// check, matching the maximal-munch behavior of the operator table.
    pub fn match_at(chars: &[char], pos: usize) -> Option<(Self, usize)> {
        let rest = chars.get(pos..)?;
        COMPARE_OPS.iter().find_map(|&(pattern, op)| {
            let len = pattern.chars().count();
            let candidate = rest.get(..len)?;
            pattern
                .chars()
                .zip(candidate)
                .all(|(p, &c)| p.eq_ignore_ascii_case(&c))
                .then_some((op, len))
        })
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CompareOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The base symbol of a neighbourhood operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearKind {
    /// `(W)` / `(nW)`: atoms in the given order, within `n` words.
    W,
    /// `(NOTW)`: negated word adjacency.
    NotW,
    /// `(A)` / `(nA)`: atoms in any order, within `n` words.
    A,
    /// `(P)`: atoms within the same paragraph.
    P,
    /// `(L)`: atoms within the same line.
    L,
}

impl NearKind {
    /// The upper-case base symbol.
    fn as_str(self) -> &'static str {
        match self {
            Self::W => "W",
            Self::NotW => "NOTW",
            Self::A => "A",
            Self::P => "P",
            Self::L => "L",
        }
    }

    /// True for the forms that accept an embedded distance (`(10W)`,
    /// `(10A)`).
    fn takes_distance(self) -> bool {
        matches!(self, Self::W | Self::A)
    }
}

/// A neighbourhood (proximity) operator between two term atoms.
///
/// Written in queries as a parenthesized symbol, e.g. `(W)` or `(10a)`.
/// Captured case-insensitively and canonicalized to upper case; the
/// distance digits, where present, are captured as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearOp {
    /// Base symbol.
    pub kind: NearKind,
    /// Embedded distance for the parametrized `W`/`A` forms.
    pub distance: Option<u32>,
}

impl NearOp {
    /// Matches a neighbourhood operator at `pos`.
    ///
    /// The match spans optional whitespace around the parenthesized symbol
    /// and inside the parentheses; whitespace is part of the match but not
    /// of the captured value. Returns the operator and the number of
    /// characters consumed, or `None` and leaves interpretation of the
    /// parenthesis to the grammar (a subquery opener, for instance).
    pub fn match_at(chars: &[char], pos: usize) -> Option<(Self, usize)> {
        let mut cur = pos;
        skip_spaces(chars, &mut cur);
        if chars.get(cur) != Some(&'(') {
            return None;
        }
        cur += 1;
        skip_spaces(chars, &mut cur);

        let digit_start = cur;
        while chars.get(cur).is_some_and(char::is_ascii_digit) {
            cur += 1;
        }
        let digits: String = chars[digit_start..cur].iter().collect();

        let word_start = cur;
        while chars.get(cur).is_some_and(|c| c.is_ascii_alphabetic()) {
            cur += 1;
        }
        let word: String = chars[word_start..cur]
            .iter()
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let kind = match word.as_str() {
            "W" => NearKind::W,
            "NOTW" => NearKind::NotW,
            "A" => NearKind::A,
            "P" => NearKind::P,
            "L" => NearKind::L,
            _ => return None,
        };
        if !digits.is_empty() && !kind.takes_distance() {
            return None;
        }

        skip_spaces(chars, &mut cur);
        if chars.get(cur) != Some(&')') {
            return None;
        }
        cur += 1;
        skip_spaces(chars, &mut cur);

        let distance = if digits.is_empty() {
            None
        } else {
            // a distance too large for u32 is not a plausible operator
            Some(digits.parse().ok()?)
        };

        Some((Self { kind, distance }, cur - pos))
    }

    /// Canonical symbol without the parentheses, e.g. `10A` or `NOTW`.
    pub fn symbol(&self) -> String {
        match self.distance {
            Some(n) => format!("{n}{}", self.kind.as_str()),
            None => self.kind.as_str().to_string(),
        }
    }
}

impl fmt::Display for NearOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

impl Serialize for NearOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.symbol())
    }
}

/// Advances `cur` past any whitespace.
fn skip_spaces(chars: &[char], cur: &mut usize) {
    while chars.get(*cur).is_some_and(|c| c.is_whitespace()) {
        *cur += 1;
    }
}
