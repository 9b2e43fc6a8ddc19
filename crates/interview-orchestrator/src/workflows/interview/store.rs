use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use super::domain::{AnswerRecord, Session, SessionId, SessionStatus};

/// External key-value record store for sessions. Writes are best-effort; the registry holds the
/// authoritative copy while the process is alive.
pub trait SessionStore: Send + Sync {
    fn create(&self, session: &Session) -> Result<(), StoreError>;
    fn update(&self, session: &Session) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session record already exists")]
    Conflict,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// In-process map of live sessions. Each entry carries its own async mutex so every
/// state-machine step on one session runs as a single writer while other sessions proceed.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        let guard = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    /// Registers `session` unless another handle won the race for the same id.
    pub fn adopt(&self, session: Session) -> SessionHandle {
        let mut guard = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        guard
            .entry(session.id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(session)))
            .clone()
    }

    pub(crate) fn len(&self) -> usize {
        let guard = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        guard.len()
    }
}

/// Progress flags returned by the status operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub cv_uploaded: bool,
    pub questions_answered: usize,
    pub total_questions: usize,
    pub assessment_complete: bool,
    pub report_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub progress: SessionProgress,
}

impl From<&Session> for SessionStatusView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            status: session.status,
            created_at: session.created_at,
            progress: SessionProgress {
                cv_uploaded: session.profile.is_some(),
                questions_answered: session.answers.len(),
                total_questions: session.questions.len(),
                assessment_complete: session.assessment_result.is_some(),
                report_generated: session.report.is_some(),
            },
        }
    }
}

/// Debug view of the question cursor and the tail of the answer log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTranscriptView {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub answers_count: usize,
    pub max_questions: usize,
    pub questions: Vec<String>,
    pub last_answers: Vec<AnswerRecord>,
}

impl SessionTranscriptView {
    pub const TAIL: usize = 3;

    pub fn new(session: &Session, max_questions: usize) -> Self {
        let tail_start = session.answers.len().saturating_sub(Self::TAIL);
        Self {
            session_id: session.id.clone(),
            status: session.status,
            current_question_index: session.current_question_index,
            total_questions: session.questions.len(),
            answers_count: session.answers.len(),
            max_questions,
            questions: session.questions.clone(),
            last_answers: session.answers[tail_start..].to_vec(),
        }
    }
}
