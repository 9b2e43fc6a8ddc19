mod catalog;
mod evaluation;
mod selection;

pub use catalog::{canonical_assessment, CatalogAssessmentAuthor};
pub use evaluation::{
    AssessmentEvaluator, UnreviewedWrittenScorer, WrittenReview, WrittenSubmissionScorer,
};
pub use selection::{AssessmentSelector, KeywordAssessmentSelector, CODING_TECHNOLOGIES};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assessment variant chosen from the candidate's role signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Coding,
    BusinessCase,
    Analytical,
}

impl AssessmentKind {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentKind::Coding => "coding",
            AssessmentKind::BusinessCase => "business_case",
            AssessmentKind::Analytical => "analytical",
        }
    }

    pub fn is_written(self) -> bool {
        !matches!(self, AssessmentKind::Coding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentScenario {
    pub context: String,
    pub problem: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Structured payload handed to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub scenario: Option<AssessmentScenario>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub evaluation_criteria: Vec<String>,
    pub time_limit_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Freeform candidate submission. Coding variants read `code`, written variants `response`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentSubmission {
    pub code: Option<String>,
    pub response: Option<String>,
}

impl AssessmentSubmission {
    pub fn content(&self) -> &str {
        self.code
            .as_deref()
            .or(self.response.as_deref())
            .unwrap_or_default()
    }
}

/// Type-specific raw sub-scores, each nominally 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentScores {
    Coding {
        correctness: u8,
        quality: u8,
        efficiency: u8,
        understanding: u8,
    },
    Written {
        analysis: u8,
        solution: u8,
        communication: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub kind: AssessmentKind,
    pub scores: AssessmentScores,
    pub feedback: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}
