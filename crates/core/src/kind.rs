//! Concrete entity kinds.
//!
//! Every entity carries a namespaced kind key (e.g. `natural:zombie`). Target
//! weighting and the per-kind spatial buckets are keyed by it, so ordering is
//! lexical by `(namespace, path)` and stable across runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace used when a key omits one.
pub const DEFAULT_NAMESPACE: &str = "natural";

/// Path of the kind every connected player carries.
pub const PLAYER_PATH: &str = "player";

/// Error returned when parsing an invalid [`EntityKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KindError {
    /// Input was empty or whitespace.
    #[error("entity kind cannot be empty")]
    Empty,
    /// One of the two segments was empty.
    #[error("entity kind {segment} cannot be empty")]
    EmptySegment {
        /// `"namespace"` or `"path"`.
        segment: &'static str,
    },
    /// A segment exceeded its length limit.
    #[error("entity kind {segment} too long (max {max})")]
    TooLong {
        /// `"namespace"` or `"path"`.
        segment: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// A segment contained a character outside its allowed set.
    #[error("entity kind {segment} has invalid character {found:?}")]
    InvalidChar {
        /// `"namespace"` or `"path"`.
        segment: &'static str,
        /// Offending character.
        found: char,
    },
}

/// Namespaced concrete type of an entity, `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKind {
    namespace: String,
    path: String,
}

impl EntityKind {
    /// Parse `namespace:path`, or `path` in the [`DEFAULT_NAMESPACE`].
    pub fn parse(input: &str) -> Result<Self, KindError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(KindError::Empty);
        }

        let (namespace, path) = input
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, input));

        check_segment("namespace", namespace, 64, |c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
        })?;
        check_segment("path", path, 128, |c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/')
        })?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// The kind shared by all players.
    pub fn player() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: PLAYER_PATH.to_string(),
        }
    }

    /// Whether this is the player kind.
    pub fn is_player(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE && self.path == PLAYER_PATH
    }

    /// Kind namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Kind path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn check_segment(
    segment: &'static str,
    value: &str,
    max: usize,
    allowed: impl Fn(char) -> bool,
) -> Result<(), KindError> {
    if value.is_empty() {
        return Err(KindError::EmptySegment { segment });
    }
    if value.len() > max {
        return Err(KindError::TooLong { segment, max });
    }
    match value.chars().find(|c| !allowed(*c)) {
        Some(found) => Err(KindError::InvalidChar { segment, found }),
        None => Ok(()),
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for EntityKind {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityKind {
    type Error = KindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.to_string()
    }
}
