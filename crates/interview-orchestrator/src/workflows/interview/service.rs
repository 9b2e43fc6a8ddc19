use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::assessment::{
    canonical_assessment, Assessment, AssessmentEvaluator, AssessmentResult, AssessmentSelector,
    AssessmentSubmission, CatalogAssessmentAuthor, KeywordAssessmentSelector,
    UnreviewedWrittenScorer, WrittenSubmissionScorer,
};
use super::capabilities::fallback::{
    fallback_profile, fallback_questions, frame_questions, GENERAL_ROLE,
};
use super::capabilities::local::{
    PlainTextProfileExtractor, TemplateQuestionGenerator, UnavailableRater,
};
use super::capabilities::{
    AssessmentAuthor, CapabilityOutcome, ProfileExtractor, QuestionGenerator, RatingCapability,
};
use super::domain::{CandidateProfile, Session, SessionId, SessionStatus};
use super::report::{Report, ReportCompiler};
use super::scoring::ScoringAggregator;
use super::sequencer::{AnswerProgress, FollowUpPolicy, QuestionPrompt, QuestionSequencer};
use super::store::{
    SessionHandle, SessionRegistry, SessionStatusView, SessionStore, SessionTranscriptView,
};
use crate::config::InterviewConfig;

/// External collaborators wired into the engine.
#[derive(Clone)]
pub struct InterviewCapabilities {
    pub extractor: Arc<dyn ProfileExtractor>,
    pub questions: Arc<dyn QuestionGenerator>,
    pub rater: Arc<dyn RatingCapability>,
    pub author: Arc<dyn AssessmentAuthor>,
    pub written: Arc<dyn WrittenSubmissionScorer>,
}

impl InterviewCapabilities {
    /// In-process implementations only. Ratings degrade to neutral scores.
    pub fn local() -> Self {
        Self {
            extractor: Arc::new(PlainTextProfileExtractor),
            questions: Arc::new(TemplateQuestionGenerator),
            rater: Arc::new(UnavailableRater),
            author: Arc::new(CatalogAssessmentAuthor),
            written: Arc::new(UnreviewedWrittenScorer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvAttachment {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub cv_summary: String,
    pub questions_generated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewCompletion {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub questions_answered: usize,
}

/// Session state machine over a registry of live sessions and a best-effort record store.
pub struct InterviewSessionService<S> {
    store: Arc<S>,
    registry: SessionRegistry,
    extractor: Arc<dyn ProfileExtractor>,
    questions: Arc<dyn QuestionGenerator>,
    author: Arc<dyn AssessmentAuthor>,
    sequencer: QuestionSequencer,
    selector: Arc<dyn AssessmentSelector>,
    evaluator: AssessmentEvaluator,
    reports: ReportCompiler,
}

impl<S> InterviewSessionService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        capabilities: InterviewCapabilities,
        config: InterviewConfig,
    ) -> Self {
        let scoring = ScoringAggregator::new(capabilities.rater.clone());
        let evaluator =
            AssessmentEvaluator::with_written_scorer(capabilities.rater, capabilities.written);

        Self {
            store,
            registry: SessionRegistry::new(),
            extractor: capabilities.extractor,
            questions: capabilities.questions,
            author: capabilities.author,
            sequencer: QuestionSequencer::new(config.sequencer()),
            selector: Arc::new(KeywordAssessmentSelector),
            evaluator,
            reports: ReportCompiler::new(scoring, config.assessment_time_limit_minutes),
        }
    }

    pub fn with_follow_up_policy(mut self, policy: Arc<dyn FollowUpPolicy>) -> Self {
        self.sequencer = QuestionSequencer::with_policy(self.sequencer.config(), policy);
        self
    }

    pub fn with_assessment_selector(mut self, selector: Arc<dyn AssessmentSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn live_sessions(&self) -> usize {
        self.registry.len()
    }

    pub fn start_session(&self) -> SessionStatusView {
        let session = Session::new(SessionId::generate(), Utc::now());
        if let Err(error) = self.store.create(&session) {
            warn!(
                session_id = %session.id,
                %error,
                "session store create failed; continuing in memory"
            );
        }
        info!(session_id = %session.id, "interview session started");

        let view = SessionStatusView::from(&session);
        self.registry.adopt(session);
        view
    }

    /// Replace the profile, regenerate questions, and reset the interview. Extraction and
    /// generation failures fall back to flagged defaults instead of failing the call.
    pub async fn attach_cv(
        &self,
        id: &SessionId,
        document: &[u8],
        filename: &str,
    ) -> Result<CvAttachment, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        ensure(&session, "upload a CV", |status| !status.interview_closed())?;

        let extracted = CapabilityOutcome::recover(
            "profile_extractor",
            self.extractor.extract(document, filename).await,
            |error| fallback_profile(document, filename, &error.to_string()),
        );
        let degraded_reason = extracted.reason().map(str::to_string);
        let profile = normalise_profile(extracted.into_value(), filename);

        let questions = CapabilityOutcome::recover(
            "question_generator",
            self.questions.generate(&profile).await.map(frame_questions),
            |_| fallback_questions(),
        )
        .into_value();

        session.questions = questions;
        session.current_question_index = 0;
        session.answers.clear();
        let cv_summary = profile.summary.clone();
        session.profile = Some(profile);
        if session.advance_to(SessionStatus::CvUploaded) {
            info!(session_id = %session.id, status = %session.status, "cv attached");
        }
        self.persist(&session);

        Ok(CvAttachment {
            session_id: session.id.clone(),
            status: session.status,
            cv_summary,
            questions_generated: session.questions.len(),
            degraded_reason,
        })
    }

    pub async fn current_question(
        &self,
        id: &SessionId,
    ) -> Result<QuestionPrompt, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        ensure(&session, "read a question", |status| {
            status != SessionStatus::Initialized
        })?;

        let before = session.status;
        let prompt = self.sequencer.next_question(&mut session);
        if session.status != before {
            self.log_transition(&session, before);
            self.persist(&session);
        }
        Ok(prompt)
    }

    pub async fn submit_answer(
        &self,
        id: &SessionId,
        answer: String,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AnswerProgress, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        ensure(&session, "submit an answer", |status| {
            matches!(
                status,
                SessionStatus::CvUploaded | SessionStatus::InterviewActive
            )
        })?;

        let before = session.status;
        let progress = self
            .sequencer
            .record_answer(&mut session, answer, timestamp)
            .map_err(|_| SessionServiceError::InvalidState {
                operation: "submit an answer",
                status: session.status,
            })?;
        if session.status != before {
            self.log_transition(&session, before);
        }
        self.persist(&session);
        Ok(progress)
    }

    /// Force the interview closed. Repeating it, or calling it after the interview moved on,
    /// leaves the status unchanged.
    pub async fn complete_interview(
        &self,
        id: &SessionId,
    ) -> Result<InterviewCompletion, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;

        let before = session.status;
        if session.advance_to(SessionStatus::InterviewComplete) {
            self.log_transition(&session, before);
            self.persist(&session);
        }

        Ok(InterviewCompletion {
            session_id: session.id.clone(),
            status: session.status,
            questions_answered: session.answers.len(),
        })
    }

    /// Select and author the assessment. Starting twice returns the payload already issued.
    pub async fn start_assessment(
        &self,
        id: &SessionId,
    ) -> Result<Assessment, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;

        if session.status == SessionStatus::AssessmentActive {
            if let Some(existing) = &session.assessment {
                return Ok(existing.clone());
            }
        }
        ensure(&session, "start an assessment", |status| {
            matches!(
                status,
                SessionStatus::InterviewComplete | SessionStatus::AssessmentActive
            )
        })?;

        let profile = session.profile.clone().unwrap_or_default();
        let kind = self.selector.select(&profile);
        let assessment = CapabilityOutcome::recover(
            "assessment_author",
            self.author.author(kind, &profile).await,
            |_| canonical_assessment(kind, &profile),
        )
        .into_value();

        info!(
            session_id = %session.id,
            selector = self.selector.tag(),
            kind = kind.label(),
            "assessment selected"
        );
        session.assessment = Some(assessment.clone());
        let before = session.status;
        if session.advance_to(SessionStatus::AssessmentActive) {
            self.log_transition(&session, before);
        }
        self.persist(&session);

        Ok(assessment)
    }

    pub async fn submit_assessment(
        &self,
        id: &SessionId,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentResult, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        ensure(&session, "submit an assessment", |status| {
            status == SessionStatus::AssessmentActive
        })?;
        let Some(assessment) = session.assessment.clone() else {
            return Err(SessionServiceError::InvalidState {
                operation: "submit an assessment",
                status: session.status,
            });
        };

        let result = self
            .evaluator
            .evaluate(&assessment, &submission, Utc::now())
            .await;
        session.assessment_result = Some(result.clone());
        let before = session.status;
        if session.advance_to(SessionStatus::AssessmentComplete) {
            self.log_transition(&session, before);
        }
        self.persist(&session);

        Ok(result)
    }

    /// Compile and store the report, marking the session completed. Regenerating overwrites.
    pub async fn generate_report(&self, id: &SessionId) -> Result<Report, SessionServiceError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        ensure(&session, "generate a report", SessionStatus::interview_closed)?;

        let before = session.status;
        session.advance_to(SessionStatus::Completed);
        let report = self.reports.compile(&session, Utc::now()).await;
        session.report = Some(report.clone());
        if session.status != before {
            self.log_transition(&session, before);
        }
        info!(
            session_id = %session.id,
            overall_score = report.overall_evaluation.overall_score,
            recommendation = %report.recommendation.decision,
            "report generated"
        );
        self.persist(&session);

        Ok(report)
    }

    pub async fn report(&self, id: &SessionId) -> Result<Report, SessionServiceError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        session
            .report
            .clone()
            .ok_or(SessionServiceError::InvalidState {
                operation: "fetch a report",
                status: session.status,
            })
    }

    pub async fn status(&self, id: &SessionId) -> Result<SessionStatusView, SessionServiceError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        Ok(SessionStatusView::from(&*session))
    }

    pub async fn transcript(
        &self,
        id: &SessionId,
    ) -> Result<SessionTranscriptView, SessionServiceError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        Ok(SessionTranscriptView::new(
            &session,
            self.sequencer.config().max_answers,
        ))
    }

    /// Registry first; on a miss the record store is consulted and the session rehydrated.
    fn session(&self, id: &SessionId) -> Result<SessionHandle, SessionServiceError> {
        if let Some(handle) = self.registry.get(id) {
            return Ok(handle);
        }

        match self.store.fetch(id) {
            Ok(Some(session)) => {
                info!(session_id = %id, "session rehydrated from store");
                Ok(self.registry.adopt(session))
            }
            Ok(None) => Err(SessionServiceError::NotFound(id.clone())),
            Err(error) => {
                warn!(session_id = %id, %error, "session store fetch failed");
                Err(SessionServiceError::NotFound(id.clone()))
            }
        }
    }

    fn persist(&self, session: &Session) {
        if let Err(error) = self.store.update(session) {
            warn!(
                session_id = %session.id,
                %error,
                "session store update failed; continuing in memory"
            );
        }
    }

    fn log_transition(&self, session: &Session, from: SessionStatus) {
        info!(session_id = %session.id, %from, to = %session.status, "session status changed");
    }
}

fn ensure(
    session: &Session,
    operation: &'static str,
    allowed: impl Fn(SessionStatus) -> bool,
) -> Result<(), SessionServiceError> {
    if allowed(session.status) {
        Ok(())
    } else {
        Err(SessionServiceError::InvalidState {
            operation,
            status: session.status,
        })
    }
}

fn normalise_profile(mut profile: CandidateProfile, filename: &str) -> CandidateProfile {
    if profile.role_fit.trim().is_empty() {
        profile.role_fit = GENERAL_ROLE.to_string();
    }
    if profile.original_filename.is_none() {
        profile.original_filename = Some(filename.to_string());
    }
    profile
}

/// Error raised by the session service. Capability and store failures never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionServiceError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("cannot {operation} while session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },
}
