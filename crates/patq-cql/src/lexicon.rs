//! Character classes for CQL term bodies.
//!
//! Pure classification predicates consumed by the parser when it builds
//! term-atom spans. The classes follow the DEPATISnet expert-search dialect:
//! wildcards `? ! #` and the separators that appear in classification
//! symbols (`H04L12/433`, `F17D5-00`), numeric values (`2.45`) and date
//! shorthands (`M11-2009`).

/// Returns true for the wildcard characters accepted inside a term atom.
pub fn is_wildcard(c: char) -> bool {
    matches!(c, '?' | '!' | '#')
}

/// Returns true for the separator characters accepted inside a term atom.
pub fn is_separator(c: char) -> bool {
    matches!(c, '/' | ',' | '.' | '-')
}

/// Returns true when `c` may appear in a term atom: any Unicode
/// alphanumeric, or a separator, or a wildcard.
pub fn is_term_char(c: char) -> bool {
    (c.is_alphanumeric() && !c.is_whitespace()) || is_separator(c) || is_wildcard(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards() {
        assert!(is_wildcard('?'));
        assert!(is_wildcard('!'));
        assert!(is_wildcard('#'));
        assert!(!is_wildcard('*'));
    }

    #[test]
    fn separators() {
        for c in ['/', ',', '.', '-'] {
            assert!(is_separator(c));
        }
        assert!(!is_separator(':'));
    }

    #[test]
    fn term_chars_cover_unicode_alphanumerics() {
        assert!(is_term_char('a'));
        assert!(is_term_char('Z'));
        assert!(is_term_char('7'));
        assert!(is_term_char('ä'));
        assert!(is_term_char('ß'));
        assert!(is_term_char('漢'));
    }

    #[test]
    fn term_chars_include_separators_and_wildcards() {
        assert!(is_term_char('/'));
        assert!(is_term_char('-'));
        assert!(is_term_char('?'));
        assert!(is_term_char('#'));
    }

    #[test]
    fn term_chars_exclude_whitespace_and_syntax() {
        assert!(!is_term_char(' '));
        assert!(!is_term_char('\t'));
        assert!(!is_term_char('('));
        assert!(!is_term_char(')'));
        assert!(!is_term_char('='));
        assert!(!is_term_char('"'));
    }
}
