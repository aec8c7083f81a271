// Error types for building and loading topic-model containers.
//
// Every failure here is a construction-time failure: the container is
// either fully valid or it does not exist. Messages name the offending
// index so a broken upstream model can be tracked down.

use std::fmt;

use thiserror::Error;

use super::coerce::Scalar;

/// Why a container could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatch),

    #[error("type coercion failed: {0}")]
    TypeCoercion(#[from] CoercionError),

    #[error("unknown language hint {hint:?}")]
    UnknownLanguageHint { hint: String },

    #[error("duplicate term {term:?} at indices {first} and {second}")]
    DuplicateTerm {
        term: String,
        first: usize,
        second: usize,
    },
}

/// A cross-array consistency check that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeMismatch {
    #[error("topic {topic} has {actual} weights but the vocabulary has {expected} terms")]
    TopicLength {
        topic: usize,
        expected: usize,
        actual: usize,
    },

    #[error("term frequency has {actual} entries but the vocabulary has {expected} terms")]
    TermFrequencyLength { expected: usize, actual: usize },

    #[error("document {document} has {actual} topic weights but the model has {expected} topics")]
    DocumentTopicLength {
        document: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{lengths} document lengths but {distributions} document-topic distributions")]
    DocumentCount {
        lengths: usize,
        distributions: usize,
    },

    #[error("document {document} is missing (source reports {count} documents)")]
    MissingDocument { document: usize, count: usize },

    #[error("{location} is not a finite weight")]
    NonFiniteWeight { location: Location },
}

/// The scalar type an element was being converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Term,
    Weight,
    Count,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Term => f.write_str("term"),
            Target::Weight => f.write_str("weight"),
            Target::Count => f.write_str("count"),
        }
    }
}

/// Where in the source model an element came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Term { index: usize },
    TopicWeight { topic: usize, word: usize },
    DocumentLength { document: usize },
    DocumentWeight { document: usize, topic: usize },
    TermFrequency { index: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Term { index } => write!(f, "vocabulary[{index}]"),
            Location::TopicWeight { topic, word } => write!(f, "topic[{topic}][{word}]"),
            Location::DocumentLength { document } => write!(f, "doc_lengths[{document}]"),
            Location::DocumentWeight { document, topic } => {
                write!(f, "doc_topic_dists[{document}][{topic}]")
            }
            Location::TermFrequency { index } => write!(f, "term_frequency[{index}]"),
        }
    }
}

/// A single element that could not be converted.
///
/// Coercion stops at the first failing element, so there is exactly one
/// of these per failed build.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{location}: cannot convert {value} to a {target}")]
pub struct CoercionError {
    pub location: Location,
    pub target: Target,
    pub value: Scalar,
}
