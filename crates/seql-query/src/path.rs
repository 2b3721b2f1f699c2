//! Field-path grammar.
//!
//! Canonical field paths carry a single leading separator followed by
//! dot-joined segments, e.g. `.actor.user.name`. The leading separator
//! disambiguates paths from literal strings inside filter values; it is
//! stripped exactly once when a path is emitted into a backend document.

use crate::error::{QueryError, Result};

/// Leading separator and segment joiner of canonical field paths.
pub const SEPARATOR: char = '.';

/// Check a field path against the grammar: non-empty, leading separator,
/// no empty segments (which also rejects the bare separator `"."`).
pub fn validate(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(QueryError::EmptyFieldPath);
    }
    let Some(rest) = path.strip_prefix(SEPARATOR) else {
        return Err(QueryError::FieldPathSeparator(path.to_string()));
    };
    if rest.is_empty() || rest.split(SEPARATOR).any(str::is_empty) {
        return Err(QueryError::FieldPathSegment(path.to_string()));
    }
    Ok(())
}

/// Strip the single leading separator for emission into a backend document.
///
/// Idempotent: a path that no longer starts with the separator is returned
/// unchanged, so repeated stripping never removes a second character.
pub fn emit(path: &str) -> &str {
    path.strip_prefix(SEPARATOR).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert!(validate(".severity").is_ok());
        assert!(validate(".actor.user.name").is_ok());
        assert!(validate(".src_endpoint.ip").is_ok());
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(validate(""), Err(QueryError::EmptyFieldPath)));
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            validate("severity"),
            Err(QueryError::FieldPathSeparator(_))
        ));
    }

    #[test]
    fn test_bare_separator_rejected() {
        // "." has one empty segment; the no-empty-segments rule applies
        // uniformly rather than special-casing root access.
        assert!(matches!(
            validate("."),
            Err(QueryError::FieldPathSegment(_))
        ));
    }

    #[test]
    fn test_empty_segments() {
        assert!(validate("..name").is_err());
        assert!(validate(".actor..name").is_err());
        assert!(validate(".actor.").is_err());
    }

    #[test]
    fn test_emit_strips_exactly_one_separator() {
        assert_eq!(emit(".actor.user.name"), "actor.user.name");
        assert_eq!(emit("actor.user.name"), "actor.user.name");
        // idempotent: a second strip does not eat into the name
        assert_eq!(emit(emit(".severity")), "severity");
    }
}
