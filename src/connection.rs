//! Commenting database connection wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    ExecResult, IsolationLevel, QueryResult, Statement, StreamTrait, TransactionError,
    TransactionTrait,
};

use crate::comment::{append_comment, SqlComment};
use crate::config::CommenterConfig;
use crate::parser::parse_operation;

const TARGET: &str = "sea_orm_sqlcommenter";

/// A SeaORM connection that appends a sqlcommenter comment to every statement.
///
/// This wrapper implements `ConnectionTrait`, `StreamTrait`, and `TransactionTrait`,
/// making it a drop-in replacement for `DatabaseConnection`. Statements run
/// directly against it carry the configured default tags; use [`Self::tag`] or
/// [`Self::tags`] to attach tags to a single query.
///
/// # Example
///
/// ```rust,ignore
/// use sea_orm::Database;
/// use sea_orm_sqlcommenter::{CommentedConnection, CommenterConfig};
///
/// let db = Database::connect("postgres://localhost/mydb").await?;
/// let db = CommentedConnection::new(db, CommenterConfig::default().application("api"));
///
/// // SELECT ... /*application='api',route='%2Fusers'*/
/// let users = Users::find().all(&db.tag("route", "/users")).await?;
/// ```
///
/// # Transactions
///
/// `TransactionTrait` hands out plain `DatabaseTransaction`s, so statements run
/// inside [`TransactionTrait::begin`] or [`TransactionTrait::transaction`] are
/// not commented. Use [`Self::begin_commented`] to keep commenting inside a
/// transaction.
#[derive(Debug, Clone)]
pub struct CommentedConnection<C = DatabaseConnection> {
    inner: C,
    config: Arc<CommenterConfig>,
}

impl<C> CommentedConnection<C> {
    /// Create a new commented connection with the given configuration.
    pub fn new(connection: C, config: CommenterConfig) -> Self {
        Self {
            inner: connection,
            config: Arc::new(config),
        }
    }

    /// Create a new commented connection with default configuration.
    pub fn wrap(connection: C) -> Self {
        Self::new(connection, CommenterConfig::default())
    }

    /// Get a reference to the underlying connection.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get the commenter configuration.
    pub fn config(&self) -> &CommenterConfig {
        &self.config
    }

    /// Consume the wrapper and return the inner connection.
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Attach a single tag to the next statement(s) run through the returned
    /// context.
    pub fn tag(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> TaggedConnection<'_, C> {
        self.attach(SqlComment::tag(key, value))
    }

    /// Attach a set of tags to the next statement(s) run through the returned
    /// context.
    pub fn tags<I, K, V>(&self, tags: I) -> TaggedConnection<'_, C>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attach(SqlComment::tags(tags))
    }

    /// Attach an existing tag set.
    pub fn attach(&self, comment: SqlComment) -> TaggedConnection<'_, C> {
        TaggedConnection {
            conn: self,
            tags: comment,
        }
    }
}

impl<C: ConnectionTrait> CommentedConnection<C> {
    /// Get the `db_driver` tag value for the backend.
    fn db_driver(&self) -> &'static str {
        match self.inner.get_database_backend() {
            DbBackend::Postgres => "sea-orm:postgresql",
            DbBackend::MySql => "sea-orm:mysql",
            DbBackend::Sqlite => "sea-orm:sqlite",
        }
    }

    /// Build the full tag set for a statement: driver, defaults, then the
    /// per-query tags, each layer winning over the previous one.
    pub(crate) fn comment_for(&self, tags: Option<&SqlComment>) -> SqlComment {
        let mut comment = if self.config.include_db_driver {
            SqlComment::tag("db_driver", self.db_driver())
                .with_tags(self.config.default_tags.clone())
        } else {
            self.config.default_tags.clone()
        };

        if let Some(tags) = tags {
            comment = comment.merge(tags);
        }

        comment
    }

    /// Append the comment to `sql` if its statement kind is enabled.
    fn annotate_sql(&self, sql: &mut String, tags: Option<&SqlComment>) {
        let operation = parse_operation(sql);
        if !self.config.kinds.contains(operation) {
            tracing::trace!(
                target: TARGET,
                { db.operation = %operation },
                "Statement kind not commented"
            );
            return;
        }

        let comment = self.comment_for(tags);
        if comment.is_empty() {
            return;
        }

        if self.config.log_comments {
            tracing::debug!(
                target: TARGET,
                {
                    db.operation = %operation,
                    db.name = self.config.database_name.as_deref(),
                    comment = %comment,
                },
                "Appending SQL comment"
            );
        }

        append_comment(sql, &comment);
    }

    fn annotate(&self, mut stmt: Statement, tags: Option<&SqlComment>) -> Statement {
        self.annotate_sql(&mut stmt.sql, tags);
        stmt
    }

    async fn execute_with(
        &self,
        stmt: Statement,
        tags: Option<&SqlComment>,
    ) -> Result<ExecResult, DbErr> {
        let stmt = self.annotate(stmt, tags);
        self.inner.execute(stmt).await
    }

    async fn execute_unprepared_with(
        &self,
        sql: &str,
        tags: Option<&SqlComment>,
    ) -> Result<ExecResult, DbErr> {
        let mut sql = sql.to_owned();
        self.annotate_sql(&mut sql, tags);
        self.inner.execute_unprepared(&sql).await
    }

    async fn query_one_with(
        &self,
        stmt: Statement,
        tags: Option<&SqlComment>,
    ) -> Result<Option<QueryResult>, DbErr> {
        let stmt = self.annotate(stmt, tags);
        self.inner.query_one(stmt).await
    }

    async fn query_all_with(
        &self,
        stmt: Statement,
        tags: Option<&SqlComment>,
    ) -> Result<Vec<QueryResult>, DbErr> {
        let stmt = self.annotate(stmt, tags);
        self.inner.query_all(stmt).await
    }
}

impl<C> CommentedConnection<C>
where
    C: TransactionTrait + Send + Sync,
{
    /// Begin a transaction whose statements are still commented.
    pub async fn begin_commented(
        &self,
    ) -> Result<CommentedConnection<DatabaseTransaction>, DbErr> {
        let txn = self.inner.begin().await?;
        tracing::debug!(target: TARGET, "Began commented transaction");

        Ok(CommentedConnection {
            inner: txn,
            config: Arc::clone(&self.config),
        })
    }
}

impl CommentedConnection<DatabaseTransaction> {
    /// Commit the underlying transaction.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.inner.commit().await
    }

    /// Roll back the underlying transaction.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.inner.rollback().await
    }
}

impl From<DatabaseConnection> for CommentedConnection {
    fn from(connection: DatabaseConnection) -> Self {
        Self::wrap(connection)
    }
}

impl<C> AsRef<C> for CommentedConnection<C> {
    fn as_ref(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ConnectionTrait> ConnectionTrait for CommentedConnection<C> {
    fn get_database_backend(&self) -> DbBackend {
        self.inner.get_database_backend()
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        self.execute_with(stmt, None).await
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.execute_unprepared_with(sql, None).await
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        self.query_one_with(stmt, None).await
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        self.query_all_with(stmt, None).await
    }

    fn support_returning(&self) -> bool {
        self.inner.support_returning()
    }

    fn is_mock_connection(&self) -> bool {
        self.inner.is_mock_connection()
    }
}

impl<C> StreamTrait for CommentedConnection<C>
where
    C: ConnectionTrait + StreamTrait,
{
    type Stream<'a>
        = C::Stream<'a>
    where
        Self: 'a;

    fn stream<'a>(
        &'a self,
        stmt: Statement,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Stream<'a>, DbErr>> + 'a + Send>> {
        let stmt = self.annotate(stmt, None);
        self.inner.stream(stmt)
    }
}

#[async_trait]
impl<C> TransactionTrait for CommentedConnection<C>
where
    C: TransactionTrait + Send + Sync,
{
    async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.inner.begin().await
    }

    async fn begin_with_config(
        &self,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Result<DatabaseTransaction, DbErr> {
        self.inner
            .begin_with_config(isolation_level, access_mode)
            .await
    }

    async fn transaction<F, T, E>(&self, callback: F) -> Result<T, TransactionError<E>>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: std::fmt::Display + std::fmt::Debug + Send,
    {
        self.inner.transaction(callback).await
    }

    async fn transaction_with_config<F, T, E>(
        &self,
        callback: F,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Result<T, TransactionError<E>>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: std::fmt::Display + std::fmt::Debug + Send,
    {
        self.inner
            .transaction_with_config(callback, isolation_level, access_mode)
            .await
    }
}

/// A per-query context carrying tags for the statements run through it.
///
/// Created by [`CommentedConnection::tag`] and friends. Further calls to
/// [`Self::tag`] merge into the accumulated tags, the most recent attachment
/// winning on key collision.
pub struct TaggedConnection<'a, C = DatabaseConnection> {
    conn: &'a CommentedConnection<C>,
    tags: SqlComment,
}

impl<'a, C> TaggedConnection<'a, C> {
    /// Attach another tag, overriding any earlier value for `key`.
    pub fn tag(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attach(SqlComment::tag(key, value))
    }

    /// Attach another set of tags, overriding earlier values on collision.
    pub fn tags<I, K, V>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attach(SqlComment::tags(tags))
    }

    /// Merge an existing tag set into this context.
    pub fn attach(self, comment: SqlComment) -> Self {
        Self {
            conn: self.conn,
            tags: self.tags.merge(&comment),
        }
    }

    /// Tags attached to this context so far.
    pub fn comment(&self) -> &SqlComment {
        &self.tags
    }

    /// The connection statements are forwarded to.
    pub fn connection(&self) -> &'a CommentedConnection<C> {
        self.conn
    }
}

impl<C> Clone for TaggedConnection<'_, C> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            tags: self.tags.clone(),
        }
    }
}

impl<C> std::fmt::Debug for TaggedConnection<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedConnection")
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> ConnectionTrait for TaggedConnection<'a, C> {
    fn get_database_backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        self.conn.execute_with(stmt, Some(&self.tags)).await
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.conn
            .execute_unprepared_with(sql, Some(&self.tags))
            .await
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        self.conn.query_one_with(stmt, Some(&self.tags)).await
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        self.conn.query_all_with(stmt, Some(&self.tags)).await
    }

    fn support_returning(&self) -> bool {
        self.conn.support_returning()
    }

    fn is_mock_connection(&self) -> bool {
        self.conn.is_mock_connection()
    }
}

impl<'a, C> StreamTrait for TaggedConnection<'a, C>
where
    C: ConnectionTrait + StreamTrait,
{
    type Stream<'b>
        = C::Stream<'b>
    where
        Self: 'b;

    fn stream<'b>(
        &'b self,
        stmt: Statement,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Stream<'b>, DbErr>> + 'b + Send>> {
        let stmt = self.conn.annotate(stmt, Some(&self.tags));
        self.conn.inner.stream(stmt)
    }
}

/// Extension trait for easy wrapping of database connections.
pub trait SqlCommenterExt {
    /// Wrap this connection with default commenter configuration.
    fn with_sqlcommenter(self) -> CommentedConnection;

    /// Wrap this connection with custom commenter configuration.
    fn with_sqlcommenter_config(self, config: CommenterConfig) -> CommentedConnection;
}

impl SqlCommenterExt for DatabaseConnection {
    fn with_sqlcommenter(self) -> CommentedConnection {
        CommentedConnection::wrap(self)
    }

    fn with_sqlcommenter_config(self, config: CommenterConfig) -> CommentedConnection {
        CommentedConnection::new(self, config)
    }
}
