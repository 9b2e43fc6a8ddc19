mod config;
mod followup;

pub use config::SequencerConfig;
pub use followup::{
    looks_like_follow_up, FollowUpPolicy, KeywordFollowUpPolicy, DETAIL_PROBE, EXAMPLE_PROBE,
    FOLLOW_UP_MARKERS, OUTCOME_PROBE, PROJECT_PROBE,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{word_count, AnswerRecord, Session, SessionStatus};

/// What a question read returns: the next unanswered prompt or the terminal marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionPrompt {
    Question {
        question: String,
        question_number: usize,
        total_questions: usize,
        answered_questions: usize,
        max_questions: usize,
    },
    InterviewComplete,
}

/// Bookkeeping returned after an answer is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerProgress {
    pub next_question_available: bool,
    pub interview_complete: bool,
    pub questions_answered: usize,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("no unanswered question is pending")]
    NoPendingQuestion,
}

/// Drives the question cursor, the termination rule, and follow-up insertion.
#[derive(Clone)]
pub struct QuestionSequencer {
    config: SequencerConfig,
    policy: Arc<dyn FollowUpPolicy>,
}

impl QuestionSequencer {
    pub fn new(config: SequencerConfig) -> Self {
        let policy = Arc::new(KeywordFollowUpPolicy::new(config.short_answer_words));
        Self::with_policy(config, policy)
    }

    pub fn with_policy(config: SequencerConfig, policy: Arc<dyn FollowUpPolicy>) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> SequencerConfig {
        self.config
    }

    /// Cursor consumed the list, or the answer cap was reached.
    pub fn termination_reached(&self, session: &Session) -> bool {
        session.current_question_index >= session.questions.len()
            || session.answers.len() >= self.config.max_answers
    }

    /// Observe the cursor. Flips the session to `interview_complete` when termination already holds.
    pub fn next_question(&self, session: &mut Session) -> QuestionPrompt {
        if session.status.interview_closed() {
            return QuestionPrompt::InterviewComplete;
        }
        if self.termination_reached(session) {
            session.advance_to(SessionStatus::InterviewComplete);
            return QuestionPrompt::InterviewComplete;
        }

        session.advance_to(SessionStatus::InterviewActive);
        let question = session.questions[session.current_question_index].clone();
        QuestionPrompt::Question {
            question,
            question_number: session.current_question_index + 1,
            total_questions: session.questions.len(),
            answered_questions: session.answers.len(),
            max_questions: self.config.max_answers,
        }
    }

    /// Bind `answer` to the pending question, advance the cursor, then decide on termination or
    /// a follow-up appended at the end of the list.
    pub fn record_answer(
        &self,
        session: &mut Session,
        answer: String,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AnswerProgress, SequenceError> {
        let question = session
            .pending_question()
            .ok_or(SequenceError::NoPendingQuestion)?
            .to_string();

        session.advance_to(SessionStatus::InterviewActive);
        let words = word_count(&answer);
        session.answers.push(AnswerRecord {
            question: question.clone(),
            answer,
            timestamp,
        });
        session.current_question_index += 1;

        let answered = session.answers.len();
        let mut follow_up = None;

        if self.termination_reached(session) {
            session.advance_to(SessionStatus::InterviewComplete);
        } else if answered < self.config.max_answers.saturating_sub(1)
            && words < self.config.short_answer_words
            && !looks_like_follow_up(&question)
        {
            let latest = &session.answers[answered - 1];
            follow_up = self.policy.follow_up(&latest.question, &latest.answer);
            if let Some(probe) = &follow_up {
                debug!(
                    session_id = %session.id,
                    policy = self.policy.tag(),
                    words,
                    "appending follow-up question"
                );
                session.questions.push(probe.clone());
            }
        }

        let interview_complete = session.status.interview_closed();
        Ok(AnswerProgress {
            next_question_available: !interview_complete
                && session.current_question_index < session.questions.len(),
            interview_complete,
            questions_answered: answered,
            total_questions: session.questions.len(),
            follow_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::interview::domain::SessionId;

    fn session_with(questions: &[&str]) -> Session {
        let mut session = Session::new(SessionId("seq".to_string()), Utc::now());
        session.status = SessionStatus::CvUploaded;
        session.questions = questions.iter().map(|q| q.to_string()).collect();
        session
    }

    #[test]
    fn reading_marks_interview_active() {
        let sequencer = QuestionSequencer::new(SequencerConfig::default());
        let mut session = session_with(&["Tell me about yourself."]);

        match sequencer.next_question(&mut session) {
            QuestionPrompt::Question {
                question_number,
                total_questions,
                max_questions,
                ..
            } => {
                assert_eq!(question_number, 1);
                assert_eq!(total_questions, 1);
                assert_eq!(max_questions, 8);
            }
            other => panic!("expected a question, got {other:?}"),
        }
        assert_eq!(session.status, SessionStatus::InterviewActive);
    }

    #[test]
    fn short_answer_appends_probe_at_end() {
        let sequencer = QuestionSequencer::new(SequencerConfig::default());
        let mut session = session_with(&["Describe a recent project.", "Why us?", "Questions?"]);

        let progress = sequencer
            .record_answer(&mut session, "It went fine.".to_string(), None)
            .expect("answer recorded");

        assert_eq!(progress.follow_up.as_deref(), Some(PROJECT_PROBE));
        assert_eq!(session.questions.last().map(String::as_str), Some(PROJECT_PROBE));
        assert_eq!(session.questions[1], "Why us?");
        assert_eq!(session.current_question_index, 1);
        assert!(progress.next_question_available);
    }

    #[test]
    fn answering_last_question_terminates() {
        let sequencer = QuestionSequencer::new(SequencerConfig::default());
        let mut session = session_with(&["Only question?"]);

        let progress = sequencer
            .record_answer(&mut session, "Yes.".to_string(), None)
            .expect("answer recorded");

        assert!(progress.interview_complete);
        assert!(!progress.next_question_available);
        assert_eq!(progress.follow_up, None);
        assert_eq!(session.status, SessionStatus::InterviewComplete);
        assert_eq!(sequencer.next_question(&mut session), QuestionPrompt::InterviewComplete);
    }

    #[test]
    fn no_probe_when_cap_leaves_no_room() {
        let config = SequencerConfig {
            max_answers: 3,
            short_answer_words: 15,
        };
        let sequencer = QuestionSequencer::new(config);
        let mut session = session_with(&["Why?", "How?", "What?", "When?"]);

        sequencer
            .record_answer(&mut session, "Because.".to_string(), None)
            .expect("first answer");
        assert_eq!(session.questions.len(), 5);

        let progress = sequencer
            .record_answer(&mut session, "Somehow.".to_string(), None)
            .expect("second answer");
        assert_eq!(progress.follow_up, None, "answers == cap - 1 leaves no room");
        assert_eq!(session.questions.len(), 5);
    }

    #[test]
    fn recording_without_pending_question_fails() {
        let sequencer = QuestionSequencer::new(SequencerConfig::default());
        let mut session = session_with(&[]);
        assert_eq!(
            sequencer.record_answer(&mut session, "hello".to_string(), None),
            Err(SequenceError::NoPendingQuestion)
        );
        assert!(session.answers.is_empty());
    }
}
