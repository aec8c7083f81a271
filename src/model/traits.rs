// Source model traits — the surface a fitted model must expose to be converted.
//
// Anything that can answer these questions can be turned into a
// `TopicModelContainer`: an in-memory trainer, a JSON dump, or another
// container. Elements come back as `Scalar`s and are converted by the
// builder, so implementors don't have to pre-coerce anything.

use super::coerce::Scalar;

/// One document of a fitted model.
pub trait SourceDocument {
    /// Number of tokens in the document.
    fn length(&self) -> Scalar;

    /// The document's weight for each topic, in topic order.
    fn topic_dist(&self) -> Vec<Scalar>;
}

impl<D: SourceDocument + ?Sized> SourceDocument for &D {
    fn length(&self) -> Scalar {
        (**self).length()
    }

    fn topic_dist(&self) -> Vec<Scalar> {
        (**self).topic_dist()
    }
}

/// A fitted topic model that can be read into a container.
///
/// Implementations are only read from; building never mutates the source.
pub trait TopicModelSource {
    type Document<'a>: SourceDocument
    where
        Self: 'a;

    /// Number of topics (K).
    fn topic_count(&self) -> usize;

    /// Number of documents the model was fitted on.
    fn document_count(&self) -> usize;

    /// Word weights of one topic, in vocabulary order. `topic < topic_count()`.
    fn topic_word_dist(&self, topic: usize) -> Vec<Scalar>;

    /// Document by index, `None` when the index is out of range.
    fn document(&self, index: usize) -> Option<Self::Document<'_>>;

    /// Vocabulary terms in id order.
    fn vocabulary_terms(&self) -> Vec<Scalar>;

    /// Corpus-wide frequency of each term, in id order.
    fn vocabulary_frequencies(&self) -> Vec<Scalar>;
}
