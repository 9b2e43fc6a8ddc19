//! Contracts for the external collaborators the engine leans on: résumé extraction, question
//! generation, rubric rating, and assessment authoring.
//!
//! Implementations may fail freely. The engine never propagates a [`CapabilityError`]; it wraps
//! every call in [`CapabilityOutcome`] and substitutes the deterministic values from [`fallback`].

pub mod fallback;
pub mod local;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::assessment::{Assessment, AssessmentKind};
use super::domain::{AnswerRecord, CandidateProfile};

/// Failure reported by an external capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("capability returned malformed output: {0}")]
    Malformed(String),
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Result of calling a capability once the engine has applied its fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityOutcome<T> {
    Success(T),
    Degraded { value: T, reason: String },
}

impl<T> CapabilityOutcome<T> {
    /// Keep a successful value, or log the failure and substitute `fallback`.
    pub fn recover<F>(
        capability: &'static str,
        result: Result<T, CapabilityError>,
        fallback: F,
    ) -> Self
    where
        F: FnOnce(&CapabilityError) -> T,
    {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => {
                warn!(capability, %error, "capability degraded to fallback");
                let value = fallback(&error);
                Self::Degraded {
                    value,
                    reason: error.to_string(),
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Success(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Success(value) | Self::Degraded { value, .. } => value,
        }
    }
}

/// The five MERIT dimensions applied to interview answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeritDimension {
    Communication,
    Technical,
    ProblemSolving,
    Professionalism,
    CultureFit,
}

impl MeritDimension {
    pub const fn ordered() -> [MeritDimension; 5] {
        [
            MeritDimension::Communication,
            MeritDimension::Technical,
            MeritDimension::ProblemSolving,
            MeritDimension::Professionalism,
            MeritDimension::CultureFit,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            MeritDimension::Communication => "communication",
            MeritDimension::Technical => "technical",
            MeritDimension::ProblemSolving => "problem_solving",
            MeritDimension::Professionalism => "professionalism",
            MeritDimension::CultureFit => "culture_fit",
        }
    }
}

/// Raw rubric output for a whole transcript. Scores are nominally 1-5 and get clamped later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritRating {
    pub communication: u8,
    pub technical: u8,
    pub problem_solving: u8,
    pub professionalism: u8,
    pub culture_fit: u8,
    #[serde(default)]
    pub overall: Option<f64>,
    #[serde(default)]
    pub feedback: BTreeMap<MeritDimension, String>,
    #[serde(default)]
    pub notes: String,
}

impl MeritRating {
    pub fn score(&self, dimension: MeritDimension) -> u8 {
        match dimension {
            MeritDimension::Communication => self.communication,
            MeritDimension::Technical => self.technical,
            MeritDimension::ProblemSolving => self.problem_solving,
            MeritDimension::Professionalism => self.professionalism,
            MeritDimension::CultureFit => self.culture_fit,
        }
    }
}

/// Context handed to the rater for a full question/answer transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptRatingRequest {
    pub candidate_summary: String,
    pub role_fit: String,
    pub exchanges: Vec<AnswerRecord>,
}

impl TranscriptRatingRequest {
    /// Q/A rendering used by prompt-driven raters.
    pub fn transcript(&self) -> String {
        self.exchanges
            .iter()
            .map(|record| format!("Q: {}\nA: {}", record.question, record.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRatingRequest {
    pub title: String,
    pub requirements: Vec<String>,
    pub language: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRating {
    pub correctness: u8,
    pub quality: u8,
    pub efficiency: u8,
    pub understanding: u8,
    #[serde(default)]
    pub feedback: String,
}

/// Résumé bytes to structured profile.
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(
        &self,
        document: &[u8],
        filename: &str,
    ) -> Result<CandidateProfile, CapabilityError>;
}

/// Produces the tailored questions placed between the fixed opening and closing prompts.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, profile: &CandidateProfile) -> Result<Vec<String>, CapabilityError>;
}

/// Rubric scoring for transcripts and code submissions.
#[async_trait]
pub trait RatingCapability: Send + Sync {
    async fn rate_transcript(
        &self,
        request: &TranscriptRatingRequest,
    ) -> Result<MeritRating, CapabilityError>;

    async fn rate_code(&self, request: &CodeRatingRequest) -> Result<CodeRating, CapabilityError>;
}

/// Builds the assessment payload for an already selected variant.
#[async_trait]
pub trait AssessmentAuthor: Send + Sync {
    async fn author(
        &self,
        kind: AssessmentKind,
        profile: &CandidateProfile,
    ) -> Result<Assessment, CapabilityError>;
}
