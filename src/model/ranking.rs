// Per-topic word rankings.
//
// Every word of a topic gets two ranks:
//
//   position    its index when the topic is sorted heaviest first
//   importance  a dense rank over the distinct weights, so words with equal
//               weight share one importance
//
// Equal weights are ordered by ascending term. Rankings are derived from
// the weights once, when a container is assembled, and never stored.

use serde::Serialize;

use super::vocabulary::Vocabulary;

/// Position and importance of one word within one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WordRank {
    pub(crate) position: usize,
    pub(crate) importance: usize,
}

/// The ranking of a single topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TopicRanking {
    /// Word ids, heaviest first.
    pub(crate) sorted: Vec<usize>,
    /// Rank of each word, indexed by word id.
    pub(crate) by_word: Vec<WordRank>,
    pub(crate) max_importance: usize,
}

impl TopicRanking {
    /// Rank one topic. `weights.len()` must equal the vocabulary size and
    /// every weight must be finite.
    pub(crate) fn new(weights: &[f64], vocabulary: &Vocabulary) -> Self {
        let terms = vocabulary.terms();
        let mut sorted: Vec<usize> = (0..weights.len()).collect();
        sorted.sort_by(|&a, &b| {
            weights[b]
                .total_cmp(&weights[a])
                .then_with(|| terms[a].cmp(&terms[b]))
        });

        let mut by_word = vec![
            WordRank {
                position: 0,
                importance: 0,
            };
            weights.len()
        ];
        let mut importance = 0;
        let mut previous: Option<f64> = None;
        for (position, &word_id) in sorted.iter().enumerate() {
            let weight = weights[word_id];
            if let Some(prev) = previous {
                if prev != weight {
                    importance += 1;
                }
            }
            previous = Some(weight);
            by_word[word_id] = WordRank {
                position,
                importance,
            };
        }

        Self {
            sorted,
            by_word,
            max_importance: importance,
        }
    }
}

/// Everything known about one word in one topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WordMeta {
    pub topic_id: usize,
    pub word_id: usize,
    pub probability: f64,
    /// 0-based index in the topic sorted heaviest first.
    pub position: usize,
    /// 0-based dense rank over the topic's distinct weights.
    pub importance: usize,
}

impl WordMeta {
    /// 1-based position.
    pub fn rank(&self) -> usize {
        self.position + 1
    }

    /// 1-based importance.
    pub fn importance_rank(&self) -> usize {
        self.importance + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(words: &[&str]) -> Vocabulary {
        Vocabulary::new(None, words.iter().map(|w| w.to_string()).collect()).unwrap()
    }

    #[test]
    fn positions_follow_descending_weight() {
        let ranking = TopicRanking::new(&[0.1, 0.7, 0.2], &vocabulary(&["a", "b", "c"]));
        assert_eq!(ranking.sorted, vec![1, 2, 0]);
        assert_eq!(ranking.by_word[0].position, 2);
        assert_eq!(ranking.by_word[1].position, 0);
        assert_eq!(ranking.max_importance, 2);
    }

    #[test]
    fn equal_weights_share_importance_and_sort_by_term() {
        // ids 0 and 2 tie; "apple" sorts before "pear"
        let ranking = TopicRanking::new(&[0.3, 0.4, 0.3], &vocabulary(&["pear", "fig", "apple"]));
        assert_eq!(ranking.sorted, vec![1, 2, 0]);
        assert_eq!(ranking.by_word[2].importance, 1);
        assert_eq!(ranking.by_word[0].importance, 1);
        assert_eq!(ranking.by_word[0].position, 2);
        assert_eq!(ranking.max_importance, 1);
    }

    #[test]
    fn empty_topic_has_no_words() {
        let ranking = TopicRanking::new(&[], &vocabulary(&[]));
        assert!(ranking.sorted.is_empty());
        assert_eq!(ranking.max_importance, 0);
    }
}
