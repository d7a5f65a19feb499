//! Identifier validation and escaping control.
//!
//! Column and table tokens must match one of four shapes: a plain
//! (optionally dotted) identifier, an aggregate call, a scalar call, or an
//! arithmetic expression over identifiers. Plain identifiers are the only
//! shape a dialect escapes; calls and expressions pass through verbatim.

use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

/// Environment variable that force-disables identifier escaping process-wide
/// when set to a falsy value (`0`, `false`, `no`, `off`, or empty).
pub const ESCAPE_IDENTIFIERS_ENV: &str = "SQLSCRIBE_ESCAPE_IDENTIFIERS";

fn plain_identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("invalid built-in identifier regex")
    })
}

fn aggregate_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i:COUNT|SUM|AVG|MIN|MAX|DISTINCT)\([^()]*\)$")
            .expect("invalid built-in aggregate regex")
    })
}

fn scalar_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?i:ABS|CEIL|FLOOR|SQRT|ROUND|TRUNC|SIGN|EXP|LN|POWER|UPPER|LOWER|LENGTH|CONCAT|TRIM|LTRIM|RTRIM|REVERSE)\([^()]*\)$",
        )
        .expect("invalid built-in scalar regex")
    })
}

fn expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.()'\s]+([-+*/][A-Za-z0-9_.()'\s]+)+$")
            .expect("invalid built-in expression regex")
    })
}

fn alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid built-in alias regex")
    })
}

fn alias_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+AS\s+").expect("invalid built-in alias split regex"))
}

/// How a validated token should be treated by the escaping layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenShape {
    /// Plain identifier, subject to dialect escaping
    Plain,
    /// Wildcard `*`, passed through verbatim
    Wildcard,
    /// Aggregate/scalar call or arithmetic expression, passed through verbatim
    Verbatim,
}

/// Classify a column/table token, rejecting anything that matches no shape.
pub(crate) fn classify(token: &str) -> Result<TokenShape> {
    if token == "*" {
        return Ok(TokenShape::Wildcard);
    }
    if plain_identifier_re().is_match(token) {
        return Ok(TokenShape::Plain);
    }
    if aggregate_call_re().is_match(token)
        || scalar_call_re().is_match(token)
        || expression_re().is_match(token)
    {
        return Ok(TokenShape::Verbatim);
    }
    Err(Error::invalid_identifier(token))
}

/// Validate a column name at `Column` construction time.
pub(crate) fn validate_column_name(name: &str) -> Result<()> {
    classify(name).map(|_| ())
}

/// Validate a bare (optionally schema-dotted) identifier, the shape table
/// and schema names must take.
pub fn validate_plain_identifier(token: &str) -> Result<()> {
    if plain_identifier_re().is_match(token) {
        Ok(())
    } else {
        Err(Error::invalid_identifier(token))
    }
}

/// Validate an alias against the simple identifier pattern.
pub fn validate_alias(alias: &str) -> Result<()> {
    if alias_re().is_match(alias) {
        Ok(())
    } else {
        Err(Error::invalid_identifier(alias))
    }
}

/// Split a token on its ` AS ` marker, if present.
///
/// Returns the column part and the raw (unvalidated) alias part.
pub(crate) fn split_alias(token: &str) -> (&str, Option<&str>) {
    match alias_split_re().splitn(token, 2).collect::<Vec<_>>()[..] {
        [column, alias] => (column.trim(), Some(alias.trim())),
        _ => (token.trim(), None),
    }
}

/// The process-wide escaping override from [`ESCAPE_IDENTIFIERS_ENV`].
///
/// Read once per process; `Some(false)` forces escaping off everywhere,
/// anything else defers to the per-builder toggle.
pub(crate) fn env_escape_override() -> Option<bool> {
    static OVERRIDE: OnceLock<Option<bool>> = OnceLock::new();
    *OVERRIDE.get_or_init(|| {
        std::env::var(ESCAPE_IDENTIFIERS_ENV)
            .ok()
            .map(|v| !is_falsy(&v))
    })
}

/// Whether an environment flag value counts as falsy.
pub(crate) fn is_falsy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// Resolve the effective escaping switch for one builder.
pub(crate) fn escaping_enabled(builder_flag: bool) -> bool {
    match env_escape_override() {
        Some(false) => false,
        _ => builder_flag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers() {
        assert_eq!(classify("employees").unwrap(), TokenShape::Plain);
        assert_eq!(classify("schema.table").unwrap(), TokenShape::Plain);
        assert_eq!(classify("_private").unwrap(), TokenShape::Plain);
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(classify("*").unwrap(), TokenShape::Wildcard);
    }

    #[test]
    fn test_aggregate_and_scalar_calls() {
        assert_eq!(classify("COUNT(*)").unwrap(), TokenShape::Verbatim);
        assert_eq!(classify("avg(unit_price)").unwrap(), TokenShape::Verbatim);
        assert_eq!(classify("ROUND(salary, 2)").unwrap(), TokenShape::Verbatim);
        assert_eq!(
            classify("CONCAT(first_name, last_name)").unwrap(),
            TokenShape::Verbatim
        );
    }

    #[test]
    fn test_arithmetic_expressions() {
        assert_eq!(
            classify("table1.column1 + table2.column2").unwrap(),
            TokenShape::Verbatim
        );
        assert_eq!(classify("(a + b) * c").unwrap(), TokenShape::Verbatim);
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        assert!(classify("invalid column!").is_err());
        assert!(classify("1starts_with_digit").is_err());
        assert!(classify("a; DROP TABLE users").is_err());
        assert!(classify("").is_err());
    }

    #[test]
    fn test_alias_validation() {
        assert!(validate_alias("full_name").is_ok());
        assert!(validate_alias("e").is_ok());
        assert!(validate_alias("$something$not$allowed").is_err());
        assert!(validate_alias("two words").is_err());
    }

    #[test]
    fn test_alias_splitting() {
        assert_eq!(split_alias("first_name AS name"), ("first_name", Some("name")));
        assert_eq!(split_alias("first_name as name"), ("first_name", Some("name")));
        assert_eq!(split_alias("first_name"), ("first_name", None));
    }

    #[test]
    fn test_falsy_flag_values() {
        assert!(is_falsy("0"));
        assert!(is_falsy("false"));
        assert!(is_falsy("False"));
        assert!(is_falsy("NO"));
        assert!(is_falsy("off"));
        assert!(is_falsy(""));
        assert!(!is_falsy("1"));
        assert!(!is_falsy("true"));
    }
}
