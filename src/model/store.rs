// JSON persistence for containers.
//
// Only what is needed to write a container out and read the same container
// back. Loading re-runs every check `build` runs, so a hand-edited file that
// breaks an invariant is refused instead of producing a half-valid model.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::container::{StoredContainer, TopicModelContainer};
use super::errors::BuildError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed container JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored container is invalid: {0}")]
    Invalid(#[from] BuildError),
}

fn validate(stored: StoredContainer) -> Result<TopicModelContainer, StoreError> {
    Ok(TopicModelContainer::try_from(stored)?)
}

pub fn to_json_string(container: &TopicModelContainer) -> Result<String, StoreError> {
    Ok(serde_json::to_string(container)?)
}

pub fn from_json_str(json: &str) -> Result<TopicModelContainer, StoreError> {
    validate(serde_json::from_str(json)?)
}

/// Write a container to `path` as JSON.
pub fn save_json(container: &TopicModelContainer, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, container)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        topics = container.topic_count(),
        vocabulary = container.vocabulary_size(),
        "Saved topic model container"
    );
    Ok(())
}

/// Read and validate a container from a JSON file.
pub fn load_json(path: impl AsRef<Path>) -> Result<TopicModelContainer, StoreError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let container = validate(serde_json::from_reader(reader)?)?;

    info!(
        path = %path.display(),
        topics = container.topic_count(),
        documents = container.document_count(),
        "Loaded topic model container"
    );
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::errors::ShapeMismatch;

    #[test]
    fn tampered_shape_is_invalid_not_malformed() {
        let json = r#"{
            "vocabulary": {"language": "en", "terms": ["a", "b"]},
            "topics": [[0.5]],
            "term_frequency": [1, 1],
            "doc_topic_dists": [],
            "doc_lengths": []
        }"#;
        let err = from_json_str(json).unwrap_err();
        assert!(
            matches!(
                err,
                StoreError::Invalid(BuildError::ShapeMismatch(ShapeMismatch::TopicLength {
                    topic: 0,
                    expected: 2,
                    actual: 1,
                }))
            ),
            "{err:?}"
        );
    }

    #[test]
    fn duplicate_terms_are_invalid() {
        let json = r#"{
            "vocabulary": {"language": null, "terms": ["a", "a"]},
            "topics": [],
            "term_frequency": [1, 1],
            "doc_topic_dists": [],
            "doc_lengths": []
        }"#;
        assert!(matches!(
            from_json_str(json),
            Err(StoreError::Invalid(BuildError::DuplicateTerm { .. }))
        ));
    }

    #[test]
    fn truncated_json_is_malformed() {
        assert!(matches!(
            from_json_str("{\"topics\": ["),
            Err(StoreError::Json(_))
        ));
    }
}
