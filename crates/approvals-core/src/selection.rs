//! Selection keys submitted by the approvals form.
//!
//! Each checkbox on the approvals page carries the key of one grant. A key is
//! the pair `(client_id, scope)`; on the form it is written as
//! `client_id-scope` with `%` and `-` inside either part escaped as `%25` and
//! `%2D`, so the single literal `-` always separates the two parts.
//!
//! ```text
//! ("app1", "read")           -> "app1-read"
//! ("my-app", "user/*.read")  -> "my%2Dapp-user/*.read"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::types::Grant;

const DELIMITER: char = '-';

/// Identifies one grant by client and scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    client_id: String,
    scope: String,
}

/// Reasons a submitted form value could not be read as a [`SelectionKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionKeyError {
    #[error("selection key has no '-' delimiter")]
    MissingDelimiter,

    #[error("selection key has more than one unescaped '-'")]
    AmbiguousDelimiter,

    #[error("selection key has an invalid escape sequence")]
    InvalidEscape,
}

impl SelectionKey {
    /// Creates a key from its parts.
    pub fn new(client_id: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scope: scope.into(),
        }
    }

    /// The key identifying `grant`.
    #[must_use]
    pub fn for_grant(grant: &Grant) -> Self {
        Self::new(grant.client_id.as_str(), grant.scope.as_str())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Form encoding of this key.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.client_id.len() + self.scope.len() + 1);
        escape_into(&self.client_id, &mut out);
        out.push(DELIMITER);
        escape_into(&self.scope, &mut out);
        out
    }

    /// Parses a form value produced by [`SelectionKey::encode`].
    ///
    /// Either part may be empty, since `encode` writes one for an empty
    /// client id or scope. Plain `client-scope` strings whose parts contain an
    /// unescaped `-` (such as `my-app-read`) are not accepted; they are
    /// rejected as ambiguous.
    pub fn decode(raw: &str) -> Result<Self, SelectionKeyError> {
        let mut parts = raw.split(DELIMITER);
        let (client_id, scope) = match (parts.next(), parts.next(), parts.next()) {
            (Some(c), Some(s), None) => (c, s),
            (_, None, _) => return Err(SelectionKeyError::MissingDelimiter),
            _ => return Err(SelectionKeyError::AmbiguousDelimiter),
        };
        Ok(Self {
            client_id: unescape(client_id)?,
            scope: unescape(scope)?,
        })
    }

    /// Returns `true` if this key identifies `grant`.
    #[must_use]
    pub fn matches(&self, grant: &Grant) -> bool {
        self.client_id == grant.client_id && self.scope == grant.scope
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for SelectionKey {
    type Err = SelectionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn escape_into(part: &str, out: &mut String) {
    for c in part.chars() {
        match c {
            '%' => out.push_str("%25"),
            DELIMITER => out.push_str("%2D"),
            other => out.push(other),
        }
    }
}

fn unescape(part: &str) -> Result<String, SelectionKeyError> {
    let mut out = String::with_capacity(part.len());
    let mut chars = part.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let hi = chars.next().ok_or(SelectionKeyError::InvalidEscape)?;
        let lo = chars.next().ok_or(SelectionKeyError::InvalidEscape)?;
        match (hi, lo.to_ascii_uppercase()) {
            ('2', '5') => out.push('%'),
            ('2', 'D') => out.push(DELIMITER),
            _ => return Err(SelectionKeyError::InvalidEscape),
        }
    }
    Ok(out)
}

/// The set of grants a user checked in one submission.
///
/// Malformed values are dropped and counted; they never fail a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: HashSet<SelectionKey>,
    rejected: usize,
}

impl Selection {
    /// Builds a selection from raw form values.
    pub fn from_form_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for value in values {
            match SelectionKey::decode(value.as_ref()) {
                Ok(key) => {
                    selection.keys.insert(key);
                }
                Err(e) => {
                    tracing::debug!(value = %value.as_ref(), error = %e, "Ignoring malformed selection key");
                    selection.rejected += 1;
                }
            }
        }
        selection
    }

    #[must_use]
    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if the user checked `grant`.
    #[must_use]
    pub fn contains_grant(&self, grant: &Grant) -> bool {
        self.keys.contains(&SelectionKey::for_grant(grant))
    }

    /// Number of distinct well-formed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of submitted values that were not valid keys.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionKey> {
        self.keys.iter()
    }
}

impl FromIterator<SelectionKey> for Selection {
    fn from_iter<T: IntoIterator<Item = SelectionKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
            rejected: 0,
        }
    }
}
