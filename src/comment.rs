//! Tag sets and their rendering as sqlcommenter comments.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Bytes left as-is in a URL path segment; everything else is encoded
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// A set of tags to attach to a SQL statement.
///
/// Keys are kept in ascending byte-wise order, which is also the order they
/// are rendered in, so the same mapping always produces the same comment no
/// matter how it was built.
///
/// # Example
///
/// ```rust
/// use sea_orm_sqlcommenter::SqlComment;
///
/// let comment = SqlComment::tag("endpoint", "/test/path").with_tag("application", "value");
/// assert_eq!(
///     comment.render(),
///     "/*application='value',endpoint='%2Ftest%2Fpath'*/"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlComment {
    tags: BTreeMap<String, String>,
}

impl SqlComment {
    /// Create an empty tag set. It renders to an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tag set holding a single tag.
    pub fn tag(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(key.into(), value.into());
        Self { tags }
    }

    /// Create a tag set from any key/value mapping.
    ///
    /// If the iterator yields the same key twice, the last value is kept.
    pub fn tags<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        tags.into_iter().collect()
    }

    /// Merge `incoming` over this set, returning a new set.
    ///
    /// The result holds the keys of both sets; on collision the value from
    /// `incoming` wins. Neither input is modified.
    pub fn merge(&self, incoming: &SqlComment) -> SqlComment {
        let mut tags = self.tags.clone();
        tags.extend(
            incoming
                .tags
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        SqlComment { tags }
    }

    /// Add a tag, overwriting any previous value for `key`.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Merge another set into this one, the other set winning on collision.
    pub fn with_tags(mut self, other: SqlComment) -> Self {
        self.tags.extend(other.tags);
        self
    }

    /// Value of the tag named `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether there are no tags, in which case nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the tags in render order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the tags as a block comment, e.g. `/*application='value'*/`.
    ///
    /// Returns an empty string when there are no tags.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SqlComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tags.is_empty() {
            return Ok(());
        }

        f.write_str("/*")?;
        for (i, (key, value)) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", escape_key(key), escape_value(value))?;
        }
        f.write_str("*/")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SqlComment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tags: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SqlComment {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tags
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl From<HashMap<String, String>> for SqlComment {
    fn from(tags: HashMap<String, String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for SqlComment {
    fn from(tags: BTreeMap<String, String>) -> Self {
        Self { tags }
    }
}

/// Percent-encode a tag key as a URL path segment.
///
/// Only alphanumerics and `- _ . ~ $ & + : = @` pass through unchanged, so
/// the result never contains `/`, `*`, quotes or `,`.
pub fn escape_key(key: &str) -> String {
    utf8_percent_encode(key, PATH_SEGMENT).to_string()
}

/// Percent-encode a tag value and wrap it in single quotes.
pub fn escape_value(value: &str) -> String {
    format!("'{}'", utf8_percent_encode(value, PATH_SEGMENT))
}

/// Append the rendered comment to `sql`, separated by a single space.
///
/// Leaves `sql` untouched when `comment` has no tags.
pub fn append_comment(sql: &mut String, comment: &SqlComment) {
    if comment.is_empty() {
        return;
    }
    sql.push(' ');
    sql.push_str(&comment.render());
}
