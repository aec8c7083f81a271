// TopicModelContainer — a validated, immutable snapshot of a fitted topic model.
//
// The container owns copies of four arrays plus a vocabulary:
//
//   topics           K × V   topic → word weight
//   term_frequency   V       corpus-wide count per term
//   doc_topic_dists  D × K   document → topic weight
//   doc_lengths      D       tokens per document
//
// All cross-array shapes are checked before a container is handed out, and
// there is no way to mutate one afterwards. Deserialization goes through the
// same checks, so a container read from disk is as trustworthy as one built
// in memory. Each topic's word ranking is derived once the checks pass.

use std::fmt;
use std::io::{self, Write};

use approx::relative_eq;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::coerce::{to_count, to_term, to_weight, Scalar};
use super::errors::{BuildError, Location, ShapeMismatch};
use super::language::LanguageHintInput;
use super::ranking::{TopicRanking, WordMeta};
use super::traits::{SourceDocument, TopicModelSource};
use super::vocabulary::{StoredVocabulary, Vocabulary};

/// A validated topic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredContainer")]
pub struct TopicModelContainer {
    vocabulary: Vocabulary,
    topics: Vec<Vec<f64>>,
    term_frequency: Vec<u64>,
    doc_topic_dists: Vec<Vec<f64>>,
    doc_lengths: Vec<u64>,
    #[serde(skip_serializing)]
    rankings: Vec<TopicRanking>,
}

/// The on-disk form of a container, before any validation.
#[derive(Deserialize)]
pub(crate) struct StoredContainer {
    vocabulary: StoredVocabulary,
    topics: Vec<Vec<f64>>,
    term_frequency: Vec<u64>,
    doc_topic_dists: Vec<Vec<f64>>,
    doc_lengths: Vec<u64>,
}

impl TryFrom<StoredContainer> for TopicModelContainer {
    type Error = BuildError;

    fn try_from(value: StoredContainer) -> Result<Self, Self::Error> {
        Self::from_parts(
            Vocabulary::try_from(value.vocabulary)?,
            value.topics,
            value.term_frequency,
            value.doc_topic_dists,
            value.doc_lengths,
        )
    }
}

/// Summary statistics over one topic's word weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopicStats {
    pub topic_id: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub average: f64,
}

impl TopicModelContainer {
    /// Read a fitted model into a new container.
    ///
    /// Every element is coerced first (terms, topic weights, documents,
    /// frequencies, in that order), then the shapes are checked. The first
    /// failure aborts the build; the source is never modified.
    pub fn build<S>(source: &S, language: impl Into<LanguageHintInput>) -> Result<Self, BuildError>
    where
        S: TopicModelSource + ?Sized,
    {
        let language = language.into().resolve()?;

        let terms = source
            .vocabulary_terms()
            .iter()
            .enumerate()
            .map(|(index, value)| to_term(value, Location::Term { index }))
            .collect::<Result<Vec<_>, _>>()?;
        let vocabulary = Vocabulary::new(language, terms)?;

        let topics = (0..source.topic_count())
            .map(|topic| {
                source
                    .topic_word_dist(topic)
                    .iter()
                    .enumerate()
                    .map(|(word, value)| to_weight(value, Location::TopicWeight { topic, word }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = source.document_count();
        let mut doc_lengths = Vec::with_capacity(count);
        let mut doc_topic_dists = Vec::with_capacity(count);
        for document in 0..count {
            let doc = source
                .document(document)
                .ok_or(ShapeMismatch::MissingDocument { document, count })?;
            doc_lengths.push(to_count(
                &doc.length(),
                Location::DocumentLength { document },
            )?);
            let dist = doc
                .topic_dist()
                .iter()
                .enumerate()
                .map(|(topic, value)| to_weight(value, Location::DocumentWeight { document, topic }))
                .collect::<Result<Vec<_>, _>>()?;
            doc_topic_dists.push(dist);
        }

        let term_frequency = source
            .vocabulary_frequencies()
            .iter()
            .enumerate()
            .map(|(index, value)| to_count(value, Location::TermFrequency { index }))
            .collect::<Result<Vec<_>, _>>()?;

        let container = Self::from_parts(
            vocabulary,
            topics,
            term_frequency,
            doc_topic_dists,
            doc_lengths,
        )?;

        debug!(
            topics = container.topic_count(),
            vocabulary = container.vocabulary_size(),
            documents = container.document_count(),
            "Built topic model container"
        );
        Ok(container)
    }

    /// Assemble a container from already-typed arrays, checking every shape
    /// and rejecting weights that are NaN or infinite.
    pub fn from_parts(
        vocabulary: Vocabulary,
        topics: Vec<Vec<f64>>,
        term_frequency: Vec<u64>,
        doc_topic_dists: Vec<Vec<f64>>,
        doc_lengths: Vec<u64>,
    ) -> Result<Self, BuildError> {
        let container = Self {
            vocabulary,
            topics,
            term_frequency,
            doc_topic_dists,
            doc_lengths,
            rankings: Vec::new(),
        };
        if let Err(mismatch) = container.check_shapes() {
            warn!(%mismatch, "Rejected inconsistent topic model");
            return Err(mismatch.into());
        }
        Ok(container.ranked())
    }

    fn ranked(mut self) -> Self {
        self.rankings = self
            .topics
            .iter()
            .map(|weights| TopicRanking::new(weights, &self.vocabulary))
            .collect();
        self
    }

    fn check_shapes(&self) -> Result<(), ShapeMismatch> {
        let vocabulary_size = self.vocabulary.len();
        for (topic, weights) in self.topics.iter().enumerate() {
            if weights.len() != vocabulary_size {
                return Err(ShapeMismatch::TopicLength {
                    topic,
                    expected: vocabulary_size,
                    actual: weights.len(),
                });
            }
        }

        if self.term_frequency.len() != vocabulary_size {
            return Err(ShapeMismatch::TermFrequencyLength {
                expected: vocabulary_size,
                actual: self.term_frequency.len(),
            });
        }

        if self.doc_topic_dists.len() != self.doc_lengths.len() {
            return Err(ShapeMismatch::DocumentCount {
                lengths: self.doc_lengths.len(),
                distributions: self.doc_topic_dists.len(),
            });
        }

        let k = self.topics.len();
        for (document, dist) in self.doc_topic_dists.iter().enumerate() {
            if dist.len() != k {
                return Err(ShapeMismatch::DocumentTopicLength {
                    document,
                    expected: k,
                    actual: dist.len(),
                });
            }
        }

        for (topic, weights) in self.topics.iter().enumerate() {
            if let Some(word) = weights.iter().position(|w| !w.is_finite()) {
                return Err(ShapeMismatch::NonFiniteWeight {
                    location: Location::TopicWeight { topic, word },
                });
            }
        }
        for (document, dist) in self.doc_topic_dists.iter().enumerate() {
            if let Some(topic) = dist.iter().position(|w| !w.is_finite()) {
                return Err(ShapeMismatch::NonFiniteWeight {
                    location: Location::DocumentWeight { document, topic },
                });
            }
        }
        Ok(())
    }

    // --- Shape ---

    /// Number of topics (K).
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_count(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Total number of tokens across all documents, saturating at `u64::MAX`.
    pub fn total_tokens(&self) -> u64 {
        self.doc_lengths
            .iter()
            .fold(0u64, |total, &length| total.saturating_add(length))
    }

    // --- Arrays ---

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn topics(&self) -> &[Vec<f64>] {
        &self.topics
    }

    pub fn topic(&self, topic_id: usize) -> Option<&[f64]> {
        self.topics.get(topic_id).map(Vec::as_slice)
    }

    pub fn term_frequency(&self) -> &[u64] {
        &self.term_frequency
    }

    pub fn doc_topic_dists(&self) -> &[Vec<f64>] {
        &self.doc_topic_dists
    }

    pub fn doc_lengths(&self) -> &[u64] {
        &self.doc_lengths
    }

    // --- Lookups ---

    pub fn probability(&self, topic_id: usize, word_id: usize) -> Option<f64> {
        self.topics.get(topic_id)?.get(word_id).copied()
    }

    pub fn probability_by_term(&self, topic_id: usize, term: &str) -> Option<f64> {
        self.probability(topic_id, self.vocabulary.get_id(term)?)
    }

    /// The weight of one word in every topic, in topic order.
    pub fn topic_probabilities_for(&self, word_id: usize) -> Option<Vec<f64>> {
        if word_id >= self.vocabulary_size() {
            return None;
        }
        Some(self.topics.iter().map(|topic| topic[word_id]).collect())
    }

    /// The `n` heaviest words of a topic, heaviest first.
    ///
    /// Equal weights are ordered by ascending term.
    pub fn top_words(&self, topic_id: usize, n: usize) -> Option<Vec<(&str, f64)>> {
        let topic = self.topics.get(topic_id)?;
        let best = self.n_best_for_topic(topic_id, n)?;
        Some(
            best.iter()
                .filter_map(|&word_id| {
                    self.vocabulary
                        .get_term(word_id)
                        .map(|term| (term, topic[word_id]))
                })
                .collect(),
        )
    }

    // --- Rankings ---

    pub fn word_meta(&self, topic_id: usize, word_id: usize) -> Option<WordMeta> {
        let rank = self.rankings.get(topic_id)?.by_word.get(word_id)?;
        Some(WordMeta {
            topic_id,
            word_id,
            probability: self.topics[topic_id][word_id],
            position: rank.position,
            importance: rank.importance,
        })
    }

    pub fn word_meta_by_term(&self, topic_id: usize, term: &str) -> Option<WordMeta> {
        self.word_meta(topic_id, self.vocabulary.get_id(term)?)
    }

    /// Every word id of a topic, heaviest first.
    pub fn words_for_topic_sorted(&self, topic_id: usize) -> Option<&[usize]> {
        self.rankings
            .get(topic_id)
            .map(|ranking| ranking.sorted.as_slice())
    }

    /// The ids of the `n` heaviest words of a topic.
    pub fn n_best_for_topic(&self, topic_id: usize, n: usize) -> Option<&[usize]> {
        let sorted = self.words_for_topic_sorted(topic_id)?;
        Some(&sorted[..n.min(sorted.len())])
    }

    /// The ids of the `n` heaviest words of every topic, in topic order.
    pub fn n_best_for_topics(&self, n: usize) -> Vec<&[usize]> {
        self.rankings
            .iter()
            .map(|ranking| &ranking.sorted[..n.min(ranking.sorted.len())])
            .collect()
    }

    /// The highest importance in a topic, i.e. its number of distinct
    /// weights minus one.
    pub fn max_importance(&self, topic_id: usize) -> Option<usize> {
        self.rankings
            .get(topic_id)
            .map(|ranking| ranking.max_importance)
    }

    /// Every word of the topic that shares `word_id`'s importance, by
    /// position. Includes the word itself.
    pub fn all_similar_important(
        &self,
        topic_id: usize,
        word_id: usize,
    ) -> Option<Vec<WordMeta>> {
        let importance = self.word_meta(topic_id, word_id)?.importance;
        Some(
            self.rankings[topic_id]
                .sorted
                .iter()
                .filter_map(|&other| self.word_meta(topic_id, other))
                .skip_while(|meta| meta.importance < importance)
                .take_while(|meta| meta.importance == importance)
                .collect(),
        )
    }

    pub fn topic_stats(&self, topic_id: usize) -> Option<TopicStats> {
        let topic = self.topics.get(topic_id)?;
        if topic.is_empty() {
            return Some(TopicStats {
                topic_id,
                min: 0.0,
                max: 0.0,
                sum: 0.0,
                average: 0.0,
            });
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in topic {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        Some(TopicStats {
            topic_id,
            min,
            max,
            sum,
            average: sum / topic.len() as f64,
        })
    }

    // --- Derived models ---

    /// A copy where every topic and every document distribution sums to 1.
    ///
    /// Rows whose sum is zero, subnormal, or would scale a weight past the
    /// finite range are copied unchanged, so the result is always loadable.
    pub fn normalize(&self) -> Self {
        fn normalize_rows(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
            rows.iter()
                .map(|row| {
                    let sum: f64 = row.iter().sum();
                    if !sum.is_normal() {
                        return row.clone();
                    }
                    let scaled: Vec<f64> = row.iter().map(|value| value / sum).collect();
                    if scaled.iter().all(|value| value.is_finite()) {
                        scaled
                    } else {
                        row.clone()
                    }
                })
                .collect()
        }

        Self {
            vocabulary: self.vocabulary.clone(),
            topics: normalize_rows(&self.topics),
            term_frequency: self.term_frequency.clone(),
            doc_topic_dists: normalize_rows(&self.doc_topic_dists),
            doc_lengths: self.doc_lengths.clone(),
            rankings: Vec::new(),
        }
        .ranked()
    }

    /// Whether two models describe the same topics, matching words by term.
    ///
    /// Vocabulary order may differ; weights are compared with a relative
    /// tolerance. Documents are not compared.
    pub fn seems_equal_to(&self, other: &Self) -> bool {
        if self.topic_count() != other.topic_count()
            || self.vocabulary_size() != other.vocabulary_size()
        {
            return false;
        }

        let mut mapping = Vec::with_capacity(self.vocabulary_size());
        for (word_id, term) in self.vocabulary.iter() {
            let Some(other_id) = other.vocabulary.get_id(term) else {
                return false;
            };
            if self.term_frequency[word_id] != other.term_frequency[other_id] {
                return false;
            }
            mapping.push(other_id);
        }

        self.topics
            .iter()
            .zip(&other.topics)
            .all(|(topic, other_topic)| {
                topic
                    .iter()
                    .zip(&mapping)
                    .all(|(value, &other_id)| relative_eq!(*value, other_topic[other_id]))
            })
    }

    // --- Text output ---

    /// Write the `n` best words of every topic as plain text.
    pub fn show_to(&self, n: usize, out: &mut impl Write) -> io::Result<()> {
        for topic_id in 0..self.topic_count() {
            if topic_id != 0 {
                writeln!(out)?;
            }
            writeln!(out, "Topic({topic_id}):")?;
            for &word_id in self.n_best_for_topic(topic_id, n).unwrap_or_default() {
                let (Some(term), Some(meta)) = (
                    self.vocabulary.get_term(word_id),
                    self.word_meta(topic_id, word_id),
                ) else {
                    continue;
                };
                writeln!(out, "    {term}: {} ({})", meta.probability, meta.rank())?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TopicModelContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Topic Model:")?;
        for (topic_id, topic) in self.topics.iter().enumerate() {
            write!(f, "\n    Topic({topic_id})")?;
            for ((word_id, term), weight) in self.vocabulary.iter().zip(topic) {
                write!(f, "\n        '{term}'({word_id}): {weight}")?;
            }
        }
        match self.vocabulary.language() {
            Some(language) => write!(f, "\nVocabulary({language}): {} terms", self.vocabulary_size()),
            None => write!(f, "\nVocabulary: {} terms", self.vocabulary_size()),
        }
    }
}

/// One document of a container, borrowed.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    pub length: u64,
    pub topic_dist: &'a [f64],
}

impl SourceDocument for DocumentView<'_> {
    fn length(&self) -> Scalar {
        Scalar::UInt(self.length)
    }

    fn topic_dist(&self) -> Vec<Scalar> {
        self.topic_dist.iter().copied().map(Scalar::Float).collect()
    }
}

// A container can be read back as a source, e.g. to re-tag its language.
impl TopicModelSource for TopicModelContainer {
    type Document<'a>
        = DocumentView<'a>
    where
        Self: 'a;

    fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn document_count(&self) -> usize {
        self.doc_lengths.len()
    }

    fn topic_word_dist(&self, topic: usize) -> Vec<Scalar> {
        self.topics
            .get(topic)
            .map(|weights| weights.iter().copied().map(Scalar::Float).collect())
            .unwrap_or_default()
    }

    fn document(&self, index: usize) -> Option<DocumentView<'_>> {
        Some(DocumentView {
            length: *self.doc_lengths.get(index)?,
            topic_dist: self.doc_topic_dists.get(index)?,
        })
    }

    fn vocabulary_terms(&self) -> Vec<Scalar> {
        self.vocabulary
            .terms()
            .iter()
            .map(|term| Scalar::Text(term.clone()))
            .collect()
    }

    fn vocabulary_frequencies(&self) -> Vec<Scalar> {
        self.term_frequency.iter().copied().map(Scalar::UInt).collect()
    }
}
