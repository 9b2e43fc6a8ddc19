use serde::{Deserialize, Serialize};

/// Limits that bound interview length and decide when an answer counts as short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerConfig {
    pub max_answers: usize,
    pub short_answer_words: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_answers: 8,
            short_answer_words: 15,
        }
    }
}
