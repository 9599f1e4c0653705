//! Recursive descent parser for the CQL grammar.
//!
//! # Grammar
//!
//! Ordered alternatives, tried top to bottom:
//!
//! ```text
//! statement → condition (boolop statement)*
//! condition → index binop term                 Triple
//!           | "(" statement ")"                Subquery
//!           | term !binop                      ShortcutTriple
//!           | index binop "(" statement ")"    ShortcutSubquery
//! term      → atom (nearop atom)* | quoted
//! index     → [A-Za-z0-9]+
//! ```
//!
//! All four boolean connectives bind with equal strength and group to the
//! right: `a=1 and b=2 or c=3` is `a=1 AND (b=2 OR c=3)`. Downstream
//! consumers depend on this flat, right-associative grouping. Comments
//! (`--` to end of line) are skipped wherever whitespace is.
//!
//! The parser scans characters directly instead of running over a token
//! stream: a neighbourhood operator like `(10A)` is an operator only
//! between two term atoms, while `(` anywhere else opens a subquery, so
//! token boundaries depend on grammar context. The cursor indexes a
//! `Vec<char>`, which keeps reported error offsets in characters.

use crate::{
    ast::{Condition, Statement, Term},
    error::ParseError,
    lexicon::is_term_char,
    ops::{BoolOp, CompareOp, NearOp},
};

/// Maximum subquery nesting depth. Bounds recursion and backtracking on
/// pathologically nested inputs.
const MAX_DEPTH: usize = 64;

/// Marker for a failed rule. The position and expectation live in the
/// parser's furthest-failure slot.
struct Fail;

/// Internal result of a grammar rule.
type PResult<T> = Result<T, Fail>;

/// Parses a complete CQL query string.
///
/// The grammar must consume the entire input; trailing unparsed text is a
/// hard failure, not a truncated success. Each call is pure, synchronous
/// and CPU-bound, with no shared mutable state, so any number of callers
/// may parse concurrently.
///
/// On failure the returned [`ParseError`] carries the original input and
/// the 0-based character offset at which matching could proceed no
/// further; [`ParseError::explanation`] renders the caret form. The parser
/// itself performs no logging.
pub fn parse(input: &str) -> Result<Statement, ParseError> {
    let mut parser = Parser::new(input);
    match parser.parse_statement() {
        Ok(stmt) => {
            parser.skip_trivia();
            if parser.at_end() {
                Ok(stmt)
            } else {
                Err(ParseError::new(input, parser.pos, "expected end of input"))
            }
        }
        Err(Fail) => {
            let (offset, expected) = parser.furthest.unwrap_or((0, "expected condition"));
            Err(ParseError::new(input, offset, expected))
        }
    }
}

/// Recursive descent parser over a character cursor.
struct Parser {
    /// The input as characters, so positions are character offsets.
    chars: Vec<char>,
    /// Current cursor position.
    pos: usize,
    /// Current subquery nesting depth.
    depth: usize,
    /// Furthest failure seen so far: `(position, expectation)`. On a tie
    /// the first recorded expectation is kept.
    furthest: Option<(usize, &'static str)>,
}

impl Parser {
    /// Creates a parser over `input`.
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
            furthest: None,
        }
    }

    // -- cursor primitives ------------------------------------------------

    /// Returns the character at the cursor without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Advances the cursor by one character.
    fn bump(&mut self) {
        self.pos += 1;
    }

    /// True once the whole input is consumed.
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skips whitespace and `--` line comments. Comments are lexical noise
    /// permitted anywhere whitespace is.
    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }
            if self.peek() == Some('-') && self.chars.get(self.pos + 1) == Some(&'-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    /// Records a failure at the cursor.
    fn fail<T>(&mut self, expected: &'static str) -> PResult<T> {
        self.fail_at(self.pos, expected)
    }

    /// Records a failure at `at` if it is the furthest seen, then fails.
    fn fail_at<T>(&mut self, at: usize, expected: &'static str) -> PResult<T> {
        if self.furthest.is_none_or(|(pos, _)| at > pos) {
            self.furthest = Some((at, expected));
        }
        Err(Fail)
    }

    // -- grammar rules ----------------------------------------------------

    /// `statement → condition (boolop statement)*`
    ///
    /// Parsed as a flat condition chain and folded to the right, which
    /// yields the same tree as the right-recursive grammar while keeping
    /// stack depth independent of chain length.
    fn parse_statement(&mut self) -> PResult<Statement> {
        let first = self.parse_condition()?;
        let mut chain = Vec::new();
        loop {
            let mark = self.pos;
            let Some(op) = self.try_bool_op() else { break };
            match self.parse_condition() {
                Ok(cond) => chain.push((op, cond)),
                Err(Fail) => {
                    // the keyword turned out to start trailing input, not
                    // a connective with an operand
                    self.pos = mark;
                    break;
                }
            }
        }
        Ok(fold_chain(first, chain))
    }

    /// Matches a boolean connective keyword at the cursor.
    ///
    /// The keyword is taken as a maximal identifier run before the lookup,
    /// so `android` never matches `and`. Restores the cursor on failure.
    fn try_bool_op(&mut self) -> Option<BoolOp> {
        let mark = self.pos;
        self.skip_trivia();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        let op = BoolOp::from_keyword(&word);
        if op.is_none() {
            self.pos = mark;
        }
        op
    }

    /// `condition` with its four ordered alternatives.
    fn parse_condition(&mut self) -> PResult<Condition> {
        let mark = self.pos;

        if let Ok(cond) = self.parse_triple() {
            return Ok(cond);
        }
        self.pos = mark;

        if let Ok(inner) = self.parse_subquery() {
            return Ok(Condition::Subquery {
                inner: Box::new(inner),
            });
        }
        self.pos = mark;

        if let Ok(cond) = self.parse_shortcut_triple() {
            return Ok(cond);
        }
        self.pos = mark;

        let result = self.parse_shortcut_subquery();
        if result.is_err() {
            self.pos = mark;
        }
        result
    }

    /// `index binop term` → [`Condition::Triple`]
    fn parse_triple(&mut self) -> PResult<Condition> {
        let index = self.parse_index()?;
        let op = self.parse_compare_op()?;
        let term = self.parse_term()?;
        Ok(Condition::Triple { index, op, term })
    }

    /// `term !binop` → [`Condition::ShortcutTriple`]
    ///
    /// The negative lookahead exists for error accuracy: a term trailed by
    /// a comparison operator was a malformed triple, and rejecting it here
    /// lets the triple branch's "expected term" surface for inputs like
    /// `foo=`.
    fn parse_shortcut_triple(&mut self) -> PResult<Condition> {
        let term = self.parse_term()?;
        let mark = self.pos;
        self.skip_trivia();
        if CompareOp::match_at(&self.chars, self.pos).is_some() {
            let at = self.pos;
            self.pos = mark;
            return self.fail_at(at, "unexpected comparison operator");
        }
        self.pos = mark;
        Ok(Condition::ShortcutTriple { term })
    }

    /// `index binop "(" statement ")"` → [`Condition::ShortcutSubquery`]
    fn parse_shortcut_subquery(&mut self) -> PResult<Condition> {
        let index = self.parse_index()?;
        let op = self.parse_compare_op()?;
        let inner = self.parse_subquery()?;
        Ok(Condition::ShortcutSubquery {
            index,
            op,
            inner: Box::new(inner),
        })
    }

    /// A parenthesized statement, shared by both subquery forms.
    fn parse_subquery(&mut self) -> PResult<Statement> {
        self.skip_trivia();
        if self.peek() != Some('(') {
            return self.fail("expected '('");
        }
        self.bump();
        let inner = self.parse_nested_statement()?;
        self.skip_trivia();
        if self.peek() != Some(')') {
            return self.fail("expected ')'");
        }
        self.bump();
        Ok(inner)
    }

    /// Recurses into `statement` with the depth guard applied.
    fn parse_nested_statement(&mut self) -> PResult<Statement> {
        if self.depth >= MAX_DEPTH {
            return self.fail("maximum nesting depth exceeded");
        }
        self.depth += 1;
        let result = self.parse_statement();
        self.depth -= 1;
        result
    }

    /// `index → [A-Za-z0-9]+`
    fn parse_index(&mut self) -> PResult<String> {
        self.skip_trivia();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.bump();
        }
        if self.pos == start {
            return self.fail("expected index");
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// A comparison operator, via the operator table.
    fn parse_compare_op(&mut self) -> PResult<CompareOp> {
        self.skip_trivia();
        match CompareOp::match_at(&self.chars, self.pos) {
            Some((op, len)) => {
                self.pos += len;
                Ok(op)
            }
            None => self.fail("expected comparison operator"),
        }
    }

    /// `term → atom (nearop atom)* | quoted`
    ///
    /// The first character decides the alternative: a quote opens a quoted
    /// literal, anything else must start an atom sequence.
    fn parse_term(&mut self) -> PResult<Term> {
        self.skip_trivia();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_quoted_term(quote),
            _ => self.parse_atom_term(),
        }
    }

    /// One or more term atoms joined by neighbourhood operators.
    fn parse_atom_term(&mut self) -> PResult<Term> {
        let Some(first) = self.scan_atom() else {
            return self.fail("expected term");
        };
        let mut atoms = vec![first];
        let mut ops = Vec::new();
        loop {
            let mark = self.pos;
            let Some((op, len)) = NearOp::match_at(&self.chars, self.pos) else {
                break;
            };
            self.pos += len;
            let Some(atom) = self.scan_atom() else {
                // an operator without a following atom is not part of the
                // term; leave it for the surrounding grammar
                self.pos = mark;
                break;
            };
            ops.push(op);
            atoms.push(atom);
        }
        Ok(Term::Atoms { atoms, ops })
    }

    /// A maximal run of term characters.
    fn scan_atom(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_term_char) {
            self.bump();
        }
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }

    /// A quoted literal. The content is stored verbatim minus the
    /// surrounding quotes; a backslash keeps the next character from
    /// terminating the literal and both are kept as written.
    fn parse_quoted_term(&mut self, quote: char) -> PResult<Term> {
        self.bump();
        let mut content = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(Term::Quoted(content));
                }
                Some('\\') => {
                    content.push('\\');
                    self.bump();
                    if let Some(c) = self.peek() {
                        content.push(c);
                        self.bump();
                    }
                }
                Some(c) => {
                    content.push(c);
                    self.bump();
                }
                None => return self.fail("unterminated quoted string"),
            }
        }
    }
}

/// Builds the right-associative statement chain from a flat condition
/// list: `a AND b OR c` becomes `a AND (b OR c)`.
fn fold_chain(first: Condition, chain: Vec<(BoolOp, Condition)>) -> Statement {
    let mut iter = chain.into_iter().rev();
    let Some((mut op, last)) = iter.next() else {
        return Statement::condition(first);
    };
    let mut stmt = Statement::condition(last);
    for (prev_op, cond) in iter {
        stmt = Statement {
            first: cond,
            rest: vec![(op, stmt)],
        };
        op = prev_op;
    }
    Statement {
        first,
        rest: vec![(op, stmt)],
    }
}
