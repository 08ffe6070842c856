//! Statement classification used to decide which statements get a comment.

use once_cell::sync::Lazy;
use regex::Regex;

/// SQL statement kinds the commenter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperation {
    Select,
    Insert,
    Update,
    Delete,
    /// Anything else: DDL, `SET`, transaction control, vendor statements.
    Other,
}

impl SqlOperation {
    /// Returns the operation as a string suitable for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlOperation::Select => "SELECT",
            SqlOperation::Insert => "INSERT",
            SqlOperation::Update => "UPDATE",
            SqlOperation::Delete => "DELETE",
            SqlOperation::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for SqlOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Skips whitespace and leading block or line comments, captures the first word
static LEADING_KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?s:\s|/\*.*?\*/|--[^\n]*(?:\n|$))*([A-Za-z]+)").unwrap()
});

/// Parse the SQL operation type from a statement.
pub fn parse_operation(sql: &str) -> SqlOperation {
    let Some(keyword) = LEADING_KEYWORD_REGEX
        .captures(sql)
        .and_then(|caps| caps.get(1))
    else {
        return SqlOperation::Other;
    };

    match keyword.as_str().to_ascii_uppercase().as_str() {
        "SELECT" | "WITH" => SqlOperation::Select,
        "INSERT" | "REPLACE" => SqlOperation::Insert,
        "UPDATE" => SqlOperation::Update,
        "DELETE" => SqlOperation::Delete,
        _ => SqlOperation::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select() {
        assert_eq!(parse_operation("SELECT * FROM users"), SqlOperation::Select);
        assert_eq!(parse_operation("select id from orders"), SqlOperation::Select);
        assert_eq!(
            parse_operation("WITH cte AS (SELECT 1) SELECT * FROM cte"),
            SqlOperation::Select
        );
    }

    #[test]
    fn test_parse_insert() {
        assert_eq!(
            parse_operation("INSERT INTO users (name) VALUES ('test')"),
            SqlOperation::Insert
        );
        assert_eq!(
            parse_operation("REPLACE INTO users (id) VALUES (1)"),
            SqlOperation::Insert
        );
    }

    #[test]
    fn test_parse_update() {
        assert_eq!(
            parse_operation("UPDATE users SET name = 'test' WHERE id = 1"),
            SqlOperation::Update
        );
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse_operation("DELETE FROM users WHERE id = 1"),
            SqlOperation::Delete
        );
    }

    #[test]
    fn test_parse_skips_leading_comments() {
        assert_eq!(
            parse_operation("  /* hint */ /* multi\nline */ SELECT 1"),
            SqlOperation::Select
        );
        assert_eq!(
            parse_operation("-- fetch users\n  delete from users"),
            SqlOperation::Delete
        );
    }

    #[test]
    fn test_parse_other() {
        assert_eq!(parse_operation("CREATE TABLE t (id int)"), SqlOperation::Other);
        assert_eq!(parse_operation("SET search_path TO app"), SqlOperation::Other);
        assert_eq!(parse_operation("BEGIN"), SqlOperation::Other);
        assert_eq!(parse_operation(""), SqlOperation::Other);
        assert_eq!(parse_operation("-- only a comment"), SqlOperation::Other);
        assert_eq!(parse_operation("(SELECT 1)"), SqlOperation::Other);
    }
}
