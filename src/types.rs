//! Core value types shared by the builder, randomizer and orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an experimental condition.
///
/// Labels carry no ordering semantics; only equality and hashing are used by the
/// randomization engine. Anonymous designs produce `Index` labels, named designs
/// produce `Name` labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Index(u64),
    Name(String),
}

impl Label {
    /// Parse a label from user text.
    ///
    /// Base-10 unsigned integers become `Index`, everything else becomes `Name`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<u64>() {
            Ok(index) => Label::Index(index),
            Err(_) => Label::Name(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Index(index) => write!(f, "{}", index),
            Label::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for Label {
    fn from(index: u64) -> Self {
        Label::Index(index)
    }
}

impl From<u32> for Label {
    fn from(index: u32) -> Self {
        Label::Index(u64::from(index))
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::Name(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::Name(name)
    }
}

/// Ordered list of trial labels.
pub type Sequence = Vec<Label>;

/// Ordered list of blocks; block order is preserved end-to-end.
pub type Blocks = Vec<Sequence>;

/// Convenience constructor used heavily in tests and the CLI.
pub fn labels<I, T>(items: I) -> Sequence
where
    I: IntoIterator<Item = T>,
    T: Into<Label>,
{
    items.into_iter().map(Into::into).collect()
}
