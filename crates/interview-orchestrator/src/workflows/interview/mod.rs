//! Interview orchestration: the session state machine, adaptive question sequencing, assessment
//! dispatch, and the scoring pipeline that ends in a hire recommendation.
//!
//! External collaborators (résumé extraction, question generation, rubric rating, assessment
//! authoring) sit behind the traits in [`capabilities`]; their failures degrade to deterministic
//! defaults and never fail a session operation.

pub mod assessment;
pub mod capabilities;
pub mod domain;
pub mod report;
pub mod router;
pub mod scoring;
pub mod sequencer;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use assessment::{
    Assessment, AssessmentKind, AssessmentResult, AssessmentScores, AssessmentSelector,
    AssessmentSubmission, KeywordAssessmentSelector, UnreviewedWrittenScorer,
    WrittenSubmissionScorer,
};
pub use capabilities::{
    AssessmentAuthor, CapabilityError, CapabilityOutcome, MeritDimension, MeritRating,
    ProfileExtractor, QuestionGenerator, RatingCapability,
};
pub use domain::{
    AnswerRecord, CandidateProfile, EducationEntry, ExperienceEntry, Session, SessionId,
    SessionStatus,
};
pub use report::{Report, ReportCompiler};
pub use router::interview_router;
pub use scoring::{
    InterviewScores, OverallEvaluation, Recommendation, RecommendationTier, ScoringAggregator,
    ScoringWeights,
};
pub use sequencer::{
    AnswerProgress, FollowUpPolicy, KeywordFollowUpPolicy, QuestionPrompt, QuestionSequencer,
    SequencerConfig,
};
pub use service::{
    CvAttachment, InterviewCapabilities, InterviewCompletion, InterviewSessionService,
    SessionServiceError,
};
pub use store::{
    SessionProgress, SessionRegistry, SessionStatusView, SessionStore, SessionTranscriptView,
    StoreError,
};
