mod config;
mod policy;
mod rules;

pub use config::ScoringWeights;
pub use policy::{Recommendation, RecommendationTier};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::assessment::{AssessmentKind, AssessmentResult};
use super::capabilities::fallback::{neutral_merit_rating, GENERAL_ROLE};
use super::capabilities::{
    CapabilityOutcome, MeritDimension, RatingCapability, TranscriptRatingRequest,
};
use super::domain::{AnswerRecord, CandidateProfile};

/// Normalised MERIT scores for a transcript, each clamped to 1-5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewScores {
    pub communication: u8,
    pub technical: u8,
    pub problem_solving: u8,
    pub professionalism: u8,
    pub culture_fit: u8,
    pub overall: f64,
    #[serde(default)]
    pub feedback: BTreeMap<MeritDimension, String>,
    #[serde(default)]
    pub notes: String,
    /// Set when the scores are neutral defaults rather than a real rating.
    #[serde(default)]
    pub degraded: bool,
}

impl InterviewScores {
    pub fn score(&self, dimension: MeritDimension) -> u8 {
        match dimension {
            MeritDimension::Communication => self.communication,
            MeritDimension::Technical => self.technical,
            MeritDimension::ProblemSolving => self.problem_solving,
            MeritDimension::Professionalism => self.professionalism,
            MeritDimension::CultureFit => self.culture_fit,
        }
    }

    pub fn strengths(&self) -> Vec<String> {
        rules::strengths(self)
    }

    pub fn improvements(&self) -> Vec<String> {
        rules::improvements(self)
    }
}

/// Assessment sub-scores flattened for reporting. `overall_score` is 0 when nothing was submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AssessmentKind>,
    #[serde(default)]
    pub sub_scores: BTreeMap<String, u8>,
    pub overall_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interview_score: f64,
    pub assessment_score: f64,
    pub cv_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallEvaluation {
    pub overall_score: f64,
    pub recommendation: RecommendationTier,
    pub confidence_level: String,
    pub score_breakdown: ScoreBreakdown,
}

/// Turns raw capability output into bounded scores and the weighted overall evaluation.
#[derive(Clone)]
pub struct ScoringAggregator {
    rater: Arc<dyn RatingCapability>,
    weights: ScoringWeights,
}

impl ScoringAggregator {
    pub fn new(rater: Arc<dyn RatingCapability>) -> Self {
        Self::with_weights(rater, ScoringWeights::default())
    }

    pub fn with_weights(rater: Arc<dyn RatingCapability>, weights: ScoringWeights) -> Self {
        Self { rater, weights }
    }

    /// Rates the whole transcript once. No answers, or a failed rater, yields neutral 3s.
    pub async fn score_interview(
        &self,
        profile: Option<&CandidateProfile>,
        answers: &[AnswerRecord],
    ) -> InterviewScores {
        if answers.is_empty() {
            let neutral = neutral_merit_rating("no interview answers recorded");
            return rules::interview_scores(neutral, true);
        }

        let request = TranscriptRatingRequest {
            candidate_summary: profile.map(|p| p.summary.clone()).unwrap_or_default(),
            role_fit: profile
                .map(|p| p.role_fit.clone())
                .filter(|role| !role.trim().is_empty())
                .unwrap_or_else(|| GENERAL_ROLE.to_string()),
            exchanges: answers.to_vec(),
        };

        let outcome = CapabilityOutcome::recover(
            "transcript_rater",
            self.rater.rate_transcript(&request).await,
            |error| neutral_merit_rating(&error.to_string()),
        );
        let degraded = outcome.is_degraded();
        rules::interview_scores(outcome.into_value(), degraded)
    }

    pub fn score_assessment(&self, result: Option<&AssessmentResult>) -> AssessmentSummary {
        rules::assessment_summary(result)
    }

    pub fn evaluate(
        &self,
        profile: Option<&CandidateProfile>,
        interview: &InterviewScores,
        assessment: &AssessmentSummary,
    ) -> OverallEvaluation {
        let overall_score = policy::weighted_overall(interview.overall, assessment, &self.weights);
        let tier = RecommendationTier::from_score(overall_score);

        OverallEvaluation {
            overall_score,
            recommendation: tier,
            confidence_level: tier.confidence().to_string(),
            score_breakdown: ScoreBreakdown {
                interview_score: policy::round_to_hundredths(interview.overall),
                assessment_score: policy::round_to_hundredths(assessment.overall_score),
                cv_quality: policy::round_to_hundredths(rules::cv_quality(profile)),
            },
        }
    }
}
