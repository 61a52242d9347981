//! Idea and IdeaList - the session-scoped accumulator
//!
//! An `IdeaList` is a plain value: the session owns it and threads it through
//! `append` / `clear`, getting a new list back each time.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single generated content idea
///
/// Always one line of non-empty text. Construct with [`Idea::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Idea(String);

impl Idea {
    /// Create an idea from text, collapsing it onto one line
    ///
    /// Returns `None` if the text is empty after trimming.
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref();
        let single_line = if text.contains(['\n', '\r']) {
            text.split(['\n', '\r'])
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            text.trim().to_string()
        };

        if single_line.is_empty() {
            None
        } else {
            Some(Self(single_line))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Idea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Idea {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Idea {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Idea::new(&value).ok_or_else(|| "idea must not be empty".to_string())
    }
}

impl From<Idea> for String {
    fn from(idea: Idea) -> Self {
        idea.0
    }
}

/// Ordered ideas in generation order; duplicates are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaList {
    ideas: Vec<Idea>,
}

impl IdeaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate `more` after the existing ideas
    pub fn append(mut self, more: impl IntoIterator<Item = Idea>) -> Self {
        let before = self.ideas.len();
        self.ideas.extend(more);
        debug!(before, after = self.ideas.len(), "IdeaList::append: called");
        self
    }

    /// Drop every idea, returning an empty list
    pub fn clear(self) -> Self {
        debug!(dropped = self.ideas.len(), "IdeaList::clear: called");
        Self::new()
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Idea> {
        self.ideas.iter()
    }

    pub fn as_slice(&self) -> &[Idea] {
        &self.ideas
    }
}

impl From<Vec<Idea>> for IdeaList {
    fn from(ideas: Vec<Idea>) -> Self {
        Self { ideas }
    }
}

impl FromIterator<Idea> for IdeaList {
    fn from_iter<I: IntoIterator<Item = Idea>>(iter: I) -> Self {
        Self {
            ideas: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for IdeaList {
    type Item = Idea;
    type IntoIter = std::vec::IntoIter<Idea>;

    fn into_iter(self) -> Self::IntoIter {
        self.ideas.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdeaList {
    type Item = &'a Idea;
    type IntoIter = std::slice::Iter<'a, Idea>;

    fn into_iter(self) -> Self::IntoIter {
        self.ideas.iter()
    }
}
