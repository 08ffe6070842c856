//! # sea-orm-sqlcommenter
//!
//! [sqlcommenter](https://google.github.io/sqlcommenter/) style query tagging for SeaORM.
//!
//! This crate appends a trailing block comment with key/value tags to every SQL
//! statement SeaORM sends to the database, so slow query logs and database
//! observability tooling can be correlated with the application request that
//! issued the query.
//!
//! ## Features
//!
//! - **Drop-in Connection**: `CommentedConnection` implements `ConnectionTrait`
//! - **Per-query Tags**: attach tags to a single query with `.tag()` / `.tags()`
//! - **Deterministic Output**: keys are always rendered in sorted order
//! - **Injection Safe**: keys and values are percent-encoded, so a tag can never
//!   close the comment early
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sea_orm::Database;
//! use sea_orm_sqlcommenter::prelude::*;
//!
//! let db = Database::connect("postgres://localhost/mydb").await?
//!     .with_sqlcommenter_config(CommenterConfig::default().application("api"));
//!
//! // SELECT ... /*application='api',endpoint='%2Fusers'*/
//! let users = Users::find().all(&db.tag("endpoint", "/users")).await?;
//! ```
//!
//! ## Wire Format
//!
//! | Input | Comment |
//! |-------|---------|
//! | `{"application": "value", "endpoint": "/test/path"}` | `/*application='value',endpoint='%2Ftest%2Fpath'*/` |
//! | `{"application": "'  value  '"}` | `/*application='%27%20%20value%20%20%27'*/` |
//! | `{}` | *(nothing appended)* |

mod comment;
mod config;
mod connection;
mod parser;

pub use comment::{append_comment, escape_key, escape_value, SqlComment};
pub use config::{CommenterConfig, StatementKinds};
pub use connection::{CommentedConnection, SqlCommenterExt, TaggedConnection};
pub use parser::{parse_operation, SqlOperation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CommentedConnection, CommenterConfig, SqlComment, SqlCommenterExt};
}
