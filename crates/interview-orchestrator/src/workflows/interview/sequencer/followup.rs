use crate::workflows::interview::domain::word_count;

/// Phrases that mark a question as already being a follow-up.
pub const FOLLOW_UP_MARKERS: [&str; 3] = ["elaborate", "specific example", "could you provide"];

pub const PROJECT_PROBE: &str =
    "Could you elaborate on the specific challenges you faced in that project?";
pub const EXAMPLE_PROBE: &str =
    "Can you give me a specific example of how you handled that situation?";
pub const OUTCOME_PROBE: &str = "Could you provide the outcome of that experience?";
pub const DETAIL_PROBE: &str = "Could you provide more details about that?";

pub fn looks_like_follow_up(question: &str) -> bool {
    let lowered = question.to_lowercase();
    FOLLOW_UP_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Strategy deciding whether a (question, answer) pair earns one inserted probe.
pub trait FollowUpPolicy: Send + Sync {
    fn tag(&self) -> &'static str;

    fn follow_up(&self, question: &str, answer: &str) -> Option<String>;
}

/// Canned probes picked by keyword match against the question text.
#[derive(Debug, Clone, Copy)]
pub struct KeywordFollowUpPolicy {
    short_answer_words: usize,
}

impl KeywordFollowUpPolicy {
    pub fn new(short_answer_words: usize) -> Self {
        Self { short_answer_words }
    }
}

impl Default for KeywordFollowUpPolicy {
    fn default() -> Self {
        Self::new(15)
    }
}

impl FollowUpPolicy for KeywordFollowUpPolicy {
    fn tag(&self) -> &'static str {
        "keyword"
    }

    fn follow_up(&self, question: &str, answer: &str) -> Option<String> {
        if word_count(answer) >= self.short_answer_words || looks_like_follow_up(question) {
            return None;
        }

        let question = question.to_lowercase();
        let probe = if question.contains("project") {
            PROJECT_PROBE
        } else if question.contains("team") || question.contains("work") {
            EXAMPLE_PROBE
        } else if question.contains("experience") {
            OUTCOME_PROBE
        } else {
            DETAIL_PROBE
        };

        Some(probe.to_string())
    }
}
