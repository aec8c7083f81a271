// ModelSnapshot — a fitted model dumped to JSON by whatever trained it.
//
// The field names mirror the attributes trainers commonly expose
// (`k`, `used_vocabs`, `used_vocab_freq`, per-topic word distributions and
// per-document topic distributions). Elements are kept as `Scalar`s so the
// container build does all type checking in one place.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::coerce::Scalar;
use super::traits::{SourceDocument, TopicModelSource};

/// One document of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub length: Scalar,
    pub topic_dist: Vec<Scalar>,
}

/// A serialized fitted model, readable as a `TopicModelSource`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub k: usize,
    pub used_vocabs: Vec<Scalar>,
    pub used_vocab_freq: Vec<Scalar>,
    /// Word distribution per topic; index `t` holds topic `t`.
    pub topic_word_dists: Vec<Vec<Scalar>>,
    #[serde(default)]
    pub docs: Vec<SnapshotDocument>,
}

impl ModelSnapshot {
    /// Parse a snapshot from a JSON string.
    ///
    /// `k` is authoritative: distributions listed past topic `k - 1` are
    /// ignored, with a warning.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).context("Model snapshot is not valid JSON")?;
        let ignored = snapshot.ignored_topics();
        if ignored > 0 {
            warn!(
                k = snapshot.k,
                listed = snapshot.topic_word_dists.len(),
                "Ignoring {ignored} topic distributions beyond k"
            );
        }
        Ok(snapshot)
    }

    /// Number of listed topic distributions that `k` leaves out.
    pub fn ignored_topics(&self) -> usize {
        self.topic_word_dists.len().saturating_sub(self.k)
    }

    /// Read a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model snapshot {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse model snapshot {}", path.display()))
    }
}

impl SourceDocument for SnapshotDocument {
    fn length(&self) -> Scalar {
        self.length.clone()
    }

    fn topic_dist(&self) -> Vec<Scalar> {
        self.topic_dist.clone()
    }
}

impl TopicModelSource for ModelSnapshot {
    type Document<'a>
        = &'a SnapshotDocument
    where
        Self: 'a;

    fn topic_count(&self) -> usize {
        self.k
    }

    fn document_count(&self) -> usize {
        self.docs.len()
    }

    // A topic listed in `k` but missing from the dump reads as empty, which
    // the build reports as a shape mismatch.
    fn topic_word_dist(&self, topic: usize) -> Vec<Scalar> {
        self.topic_word_dists.get(topic).cloned().unwrap_or_default()
    }

    fn document(&self, index: usize) -> Option<&SnapshotDocument> {
        self.docs.get(index)
    }

    fn vocabulary_terms(&self) -> Vec<Scalar> {
        self.used_vocabs.clone()
    }

    fn vocabulary_frequencies(&self) -> Vec<Scalar> {
        self.used_vocab_freq.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "k": 2,
        "used_vocabs": ["a", "b", "c"],
        "used_vocab_freq": [5, 3, "2"],
        "topic_word_dists": [[0.1, 0.2, 0.7], [0.5, 0.3, 0.2]],
        "docs": [{"length": 10, "topic_dist": [0.6, 0.4]}]
    }"#;

    #[test]
    fn parses_a_dump() {
        let snapshot = ModelSnapshot::from_json_str(DUMP).unwrap();
        assert_eq!(snapshot.topic_count(), 2);
        assert_eq!(snapshot.document_count(), 1);
        assert_eq!(snapshot.vocabulary_frequencies()[2], Scalar::Text("2".to_string()));
        assert_eq!(snapshot.document(0).unwrap().length(), Scalar::UInt(10));
        assert!(snapshot.document(1).is_none());
    }

    #[test]
    fn missing_topic_reads_as_empty() {
        let snapshot = ModelSnapshot::from_json_str(DUMP).unwrap();
        assert!(snapshot.topic_word_dist(5).is_empty());
    }

    #[test]
    fn topics_past_k_are_ignored() {
        let json = DUMP.replace("\"k\": 2", "\"k\": 1");
        let snapshot = ModelSnapshot::from_json_str(&json).unwrap();
        assert_eq!(snapshot.topic_count(), 1);
        assert_eq!(snapshot.ignored_topics(), 1);
        assert_eq!(ModelSnapshot::from_json_str(DUMP).unwrap().ignored_topics(), 0);
    }

    #[test]
    fn docs_default_to_empty() {
        let snapshot = ModelSnapshot::from_json_str(
            r#"{"k": 0, "used_vocabs": [], "used_vocab_freq": [], "topic_word_dists": []}"#,
        )
        .unwrap();
        assert!(snapshot.docs.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ModelSnapshot::from_json_str("{\"k\": ").is_err());
    }
}
