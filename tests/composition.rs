// Composition tests — the data flow between modules:
//   ModelSnapshot (JSON) -> build -> normalize -> store -> load
// Files are written to temporary directories only.

use approx::assert_relative_eq;
use tempfile::TempDir;

use topicbridge::model::snapshot::ModelSnapshot;
use topicbridge::model::store::{self, StoreError};
use topicbridge::model::{
    BuildError, LanguageHint, LanguageHintInput, ShapeMismatch, TopicModelContainer, Vocabulary,
};

const DUMP: &str = r#"{
    "k": 2,
    "used_vocabs": ["apple", "banana", "cherry", "date"],
    "used_vocab_freq": [12, 7, "3", 1.0],
    "topic_word_dists": [
        [0.40, 0.30, 0.20, 0.10],
        [0.05, 0.15, 0.30, 0.50]
    ],
    "docs": [
        {"length": 8, "topic_dist": [0.9, 0.1]},
        {"length": 5, "topic_dist": [0.2, 0.8]},
        {"length": 10, "topic_dist": [0.5, 0.5]}
    ]
}"#;

fn built(language: impl Into<LanguageHintInput>) -> TopicModelContainer {
    let snapshot = ModelSnapshot::from_json_str(DUMP).unwrap();
    TopicModelContainer::build(&snapshot, language).unwrap()
}

// ============================================================
// Snapshot -> Container
// ============================================================

#[test]
fn snapshot_builds_into_container() {
    let model = built("EN");

    assert_eq!(model.topic_count(), 2);
    assert_eq!(model.vocabulary_size(), 4);
    assert_eq!(model.document_count(), 3);
    assert_eq!(model.total_tokens(), 23);
    assert_eq!(model.term_frequency(), &[12, 7, 3, 1]);
    assert_eq!(model.vocabulary().language().unwrap().as_str(), "en");

    let top = model.top_words(1, 2).unwrap();
    assert_eq!(top, vec![("date", 0.50), ("cherry", 0.30)]);
}

#[test]
fn snapshot_with_missing_topic_is_a_shape_mismatch() {
    let json = DUMP.replace("\"k\": 2", "\"k\": 3");
    let snapshot = ModelSnapshot::from_json_str(&json).unwrap();
    let err = TopicModelContainer::build(&snapshot, LanguageHintInput::Absent).unwrap_err();
    assert_eq!(
        err,
        BuildError::ShapeMismatch(ShapeMismatch::TopicLength {
            topic: 2,
            expected: 4,
            actual: 0,
        })
    );
}

#[test]
fn snapshot_file_loads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, DUMP).unwrap();

    let snapshot = ModelSnapshot::load(&path).unwrap();
    assert_eq!(snapshot.k, 2);
    assert!(ModelSnapshot::load(dir.path().join("missing.json")).is_err());
}

// ============================================================
// Container -> Container
// ============================================================

#[test]
fn container_rebuilds_into_an_equal_container() {
    let model = built("en");
    let rebuilt =
        TopicModelContainer::build(&model, LanguageHint::parse("en").unwrap()).unwrap();
    assert_eq!(rebuilt, model);
}

#[test]
fn rebuilding_can_retag_the_language() {
    let model = built(LanguageHintInput::Absent);
    let tagged = TopicModelContainer::build(&model, "de").unwrap();
    assert_eq!(tagged.vocabulary().language().unwrap().as_str(), "de");
    assert_eq!(tagged.topics(), model.topics());
}

#[test]
fn normalized_distributions_sum_to_one() {
    let raw = {
        let vocabulary = Vocabulary::new(None, vec!["x".into(), "y".into(), "z".into()]).unwrap();
        TopicModelContainer::from_parts(
            vocabulary,
            vec![vec![1.0, 2.0, 5.0], vec![3.0, 3.0, 3.0]],
            vec![4, 4, 4],
            vec![vec![2.0, 6.0]],
            vec![12],
        )
        .unwrap()
    };

    let normalized = raw.normalize();
    for topic in normalized.topics() {
        assert_relative_eq!(topic.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
    assert_relative_eq!(normalized.doc_topic_dists()[0][1], 0.75);
    assert_eq!(normalized.term_frequency(), raw.term_frequency());
}

#[test]
fn seems_equal_ignores_vocabulary_order() {
    let model = built(LanguageHintInput::Absent);

    let reordered = TopicModelContainer::from_parts(
        Vocabulary::new(
            None,
            vec!["date".into(), "cherry".into(), "banana".into(), "apple".into()],
        )
        .unwrap(),
        vec![
            vec![0.10, 0.20, 0.30, 0.40],
            vec![0.50, 0.30, 0.15, 0.05],
        ],
        vec![1, 3, 7, 12],
        vec![],
        vec![],
    )
    .unwrap();

    assert!(model.seems_equal_to(&reordered));
    assert!(reordered.seems_equal_to(&model));
    assert_ne!(model, reordered);
}

#[test]
fn seems_equal_detects_changed_weights() {
    let model = built(LanguageHintInput::Absent);
    let mut topics = model.topics().to_vec();
    topics[0][0] = 0.41;
    let changed = TopicModelContainer::from_parts(
        model.vocabulary().clone(),
        topics,
        model.term_frequency().to_vec(),
        model.doc_topic_dists().to_vec(),
        model.doc_lengths().to_vec(),
    )
    .unwrap();
    assert!(!model.seems_equal_to(&changed));
}

// ============================================================
// Container -> Store -> Container
// ============================================================

#[test]
fn container_survives_a_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("container.json");

    let model = built("en");
    store::save_json(&model, &path).unwrap();
    let loaded = store::load_json(&path).unwrap();

    assert_eq!(loaded, model);
    assert_eq!(loaded.vocabulary().get_id("cherry"), Some(2));
}

#[test]
fn container_survives_a_string_round_trip() {
    let model = built(LanguageHintInput::Absent).normalize();
    let json = store::to_json_string(&model).unwrap();
    let loaded = store::from_json_str(&json).unwrap();
    assert_eq!(loaded, model);
    assert!(loaded.vocabulary().language().is_none());
}

#[test]
fn normalized_container_with_cancelling_weights_reloads() {
    let model = TopicModelContainer::from_parts(
        Vocabulary::new(None, vec!["x".into(), "y".into(), "z".into()]).unwrap(),
        vec![vec![1e300, -1e300, 5e-324]],
        vec![1, 1, 1],
        vec![],
        vec![],
    )
    .unwrap()
    .normalize();

    let json = store::to_json_string(&model).unwrap();
    let loaded = store::from_json_str(&json).unwrap();
    assert_eq!(loaded, model);
}

#[test]
fn rankings_survive_a_round_trip() {
    let model = built("en");
    let json = store::to_json_string(&model).unwrap();
    assert!(!json.contains("rankings"));

    let loaded = store::from_json_str(&json).unwrap();
    assert_eq!(loaded.words_for_topic_sorted(1), Some(&[3, 2, 1, 0][..]));
    assert_eq!(loaded.word_meta(1, 2), model.word_meta(1, 2));
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = store::load_json(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)), "{err:?}");
}

#[test]
fn tampered_file_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("container.json");

    let model = built("en");
    let mut value: serde_json::Value =
        serde_json::from_str(&store::to_json_string(&model).unwrap()).unwrap();
    value["term_frequency"] = serde_json::json!([1, 2]);
    std::fs::write(&path, value.to_string()).unwrap();

    let err = store::load_json(&path).unwrap_err();
    assert!(
        matches!(
            err,
            StoreError::Invalid(BuildError::ShapeMismatch(
                ShapeMismatch::TermFrequencyLength {
                    expected: 4,
                    actual: 2
                }
            ))
        ),
        "{err:?}"
    );
}
