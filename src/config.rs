//! Configuration for comment behavior.

use crate::comment::SqlComment;
use crate::parser::SqlOperation;

/// Set of statement kinds that receive a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementKinds {
    pub select: bool,
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
    /// Raw statements that are none of the above (DDL, `SET`, ...).
    pub other: bool,
}

impl StatementKinds {
    /// Every statement kind.
    pub const fn all() -> Self {
        Self {
            select: true,
            insert: true,
            update: true,
            delete: true,
            other: true,
        }
    }

    /// No statement kind. Useful as a starting point with [`Self::with`].
    pub const fn none() -> Self {
        Self {
            select: false,
            insert: false,
            update: false,
            delete: false,
            other: false,
        }
    }

    /// Select, insert, update and delete, skipping everything else.
    pub const fn dml() -> Self {
        Self {
            other: false,
            ..Self::all()
        }
    }

    /// Enable one more kind.
    pub fn with(mut self, operation: SqlOperation) -> Self {
        match operation {
            SqlOperation::Select => self.select = true,
            SqlOperation::Insert => self.insert = true,
            SqlOperation::Update => self.update = true,
            SqlOperation::Delete => self.delete = true,
            SqlOperation::Other => self.other = true,
        }
        self
    }

    /// Whether statements of `operation` kind receive a comment.
    pub fn contains(&self, operation: SqlOperation) -> bool {
        match operation {
            SqlOperation::Select => self.select,
            SqlOperation::Insert => self.insert,
            SqlOperation::Update => self.update,
            SqlOperation::Delete => self.delete,
            SqlOperation::Other => self.other,
        }
    }
}

impl Default for StatementKinds {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration options for SQL commenting.
///
/// # Example
///
/// ```rust
/// use sea_orm_sqlcommenter::{CommenterConfig, StatementKinds};
///
/// let config = CommenterConfig::default()
///     .application("billing")
///     .with_statement_kinds(StatementKinds::dml())
///     .with_comment_logging(true);
/// ```
#[derive(Debug, Clone)]
pub struct CommenterConfig {
    /// Tags attached to every statement, before any per-query tags.
    /// Per-query tags win on collision.
    /// Default: empty
    pub default_tags: SqlComment,

    /// Statement kinds that receive a comment.
    /// Default: all
    pub kinds: StatementKinds,

    /// Whether to add the `db_driver` tag (e.g. `sea-orm:postgresql`).
    /// Default: `false`
    pub include_db_driver: bool,

    /// Whether to emit a debug event with the rendered comment for each
    /// annotated statement.
    /// Default: `false`
    pub log_comments: bool,

    /// Database name to include in log events.
    /// Default: `None`
    pub database_name: Option<String>,
}

impl Default for CommenterConfig {
    fn default() -> Self {
        Self {
            default_tags: SqlComment::new(),
            kinds: StatementKinds::all(),
            include_db_driver: false,
            log_comments: false,
            database_name: None,
        }
    }
}

impl CommenterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `application` tag on every statement.
    pub fn application(self, name: impl Into<String>) -> Self {
        self.with_default_tag("application", name)
    }

    /// Add a tag attached to every statement.
    pub fn with_default_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_tags = self.default_tags.with_tag(key, value);
        self
    }

    /// Merge a set of tags into those attached to every statement.
    pub fn with_default_tags(mut self, tags: impl Into<SqlComment>) -> Self {
        self.default_tags = self.default_tags.with_tags(tags.into());
        self
    }

    /// Restrict commenting to the given statement kinds.
    pub fn with_statement_kinds(mut self, kinds: StatementKinds) -> Self {
        self.kinds = kinds;
        self
    }

    /// Enable or disable the `db_driver` tag.
    pub fn with_db_driver_tag(mut self, enabled: bool) -> Self {
        self.include_db_driver = enabled;
        self
    }

    /// Enable or disable logging of rendered comments.
    ///
    /// Comments carry whatever the application tags queries with, so this
    /// is best kept off where tag values are sensitive.
    pub fn with_comment_logging(mut self, enabled: bool) -> Self {
        self.log_comments = enabled;
        self
    }

    /// Set a database name to include in log events.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = Some(name.into());
        self
    }

    /// Create a development-friendly configuration that logs every comment
    /// and tags statements with the driver.
    pub fn development() -> Self {
        Self {
            include_db_driver: true,
            log_comments: true,
            ..Self::default()
        }
    }

    /// Create a production configuration with comment logging off.
    pub fn production() -> Self {
        Self {
            include_db_driver: true,
            log_comments: false,
            ..Self::default()
        }
    }
}

impl From<SqlComment> for CommenterConfig {
    fn from(default_tags: SqlComment) -> Self {
        Self {
            default_tags,
            ..Self::default()
        }
    }
}
