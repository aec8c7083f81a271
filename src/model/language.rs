// Language hints attached to a vocabulary.
//
// Tags are opaque: there is no registry of known languages. A hint is
// normalized (trimmed, lowercased) and rejected only when it cannot be a
// tag at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::BuildError;

/// A normalized language tag such as `en` or `de-at`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageHint {
    inner: String,
}

impl LanguageHint {
    /// Normalize and validate a tag.
    ///
    /// Accepts ASCII letters, digits, `-` and `_`. Anything else, or an
    /// empty string, is an `UnknownLanguageHint`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, BuildError> {
        let raw = raw.as_ref();
        let normalized = raw.trim().to_ascii_lowercase();
        let plausible = !normalized.is_empty()
            && normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !plausible {
            return Err(BuildError::UnknownLanguageHint {
                hint: raw.to_string(),
            });
        }
        Ok(Self { inner: normalized })
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl TryFrom<String> for LanguageHint {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LanguageHint> for String {
    fn from(value: LanguageHint) -> Self {
        value.inner
    }
}

impl PartialEq<str> for LanguageHint {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for LanguageHint {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

/// The language argument a caller passes to `build`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LanguageHintInput {
    #[default]
    Absent,
    Identifier(String),
    Resolved(LanguageHint),
}

impl LanguageHintInput {
    /// Turn the input into a normalized tag, if any.
    pub fn resolve(self) -> Result<Option<LanguageHint>, BuildError> {
        match self {
            LanguageHintInput::Absent => Ok(None),
            LanguageHintInput::Identifier(raw) => LanguageHint::parse(raw).map(Some),
            LanguageHintInput::Resolved(hint) => Ok(Some(hint)),
        }
    }
}

impl From<&str> for LanguageHintInput {
    fn from(value: &str) -> Self {
        LanguageHintInput::Identifier(value.to_string())
    }
}

impl From<String> for LanguageHintInput {
    fn from(value: String) -> Self {
        LanguageHintInput::Identifier(value)
    }
}

impl From<LanguageHint> for LanguageHintInput {
    fn from(value: LanguageHint) -> Self {
        LanguageHintInput::Resolved(value)
    }
}

impl<T: Into<LanguageHintInput>> From<Option<T>> for LanguageHintInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(LanguageHintInput::Absent, Into::into)
    }
}
