// Vocabulary — ordered unique terms with a stable term→id mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::BuildError;
use super::language::LanguageHint;

/// An ordered set of unique terms; a term's position is its id.
///
/// The lookup index is rebuilt on deserialization and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredVocabulary")]
pub struct Vocabulary {
    language: Option<LanguageHint>,
    terms: Vec<String>,
    #[serde(skip_serializing)]
    ids: HashMap<String, usize>,
}

/// The on-disk form of a vocabulary, before the duplicate check.
#[derive(Deserialize)]
pub(crate) struct StoredVocabulary {
    pub(crate) language: Option<LanguageHint>,
    pub(crate) terms: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting duplicate terms.
    pub fn new(language: Option<LanguageHint>, terms: Vec<String>) -> Result<Self, BuildError> {
        let mut ids = HashMap::with_capacity(terms.len());
        for (id, term) in terms.iter().enumerate() {
            if let Some(&first) = ids.get(term) {
                return Err(BuildError::DuplicateTerm {
                    term: term.clone(),
                    first,
                    second: id,
                });
            }
            ids.insert(term.clone(), id);
        }
        Ok(Self {
            language,
            terms,
            ids,
        })
    }

    pub fn language(&self) -> Option<&LanguageHint> {
        self.language.as_ref()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All terms in id order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn get_id(&self, term: &str) -> Option<usize> {
        self.ids.get(term).copied()
    }

    pub fn get_term(&self, id: usize) -> Option<&str> {
        self.terms.get(id).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.ids.contains_key(term)
    }

    /// Iterate `(id, term)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.terms.iter().map(String::as_str).enumerate()
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language && self.terms == other.terms
    }
}

impl TryFrom<StoredVocabulary> for Vocabulary {
    type Error = BuildError;

    fn try_from(value: StoredVocabulary) -> Result<Self, Self::Error> {
        Self::new(value.language, value.terms)
    }
}
