use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Assessment, AssessmentResult, AssessmentScores, AssessmentSubmission};
use crate::workflows::interview::capabilities::fallback::neutral_code_rating;
use crate::workflows::interview::capabilities::{
    CapabilityError, CapabilityOutcome, CodeRatingRequest, RatingCapability,
};

/// Scores for business-case and analytical submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenReview {
    pub analysis: u8,
    pub solution: u8,
    pub communication: u8,
    pub feedback: String,
}

#[async_trait]
pub trait WrittenSubmissionScorer: Send + Sync {
    async fn score(
        &self,
        assessment: &Assessment,
        submission: &AssessmentSubmission,
    ) -> Result<WrittenReview, CapabilityError>;
}

/// Placeholder written-assessment scorer: it does not read the submission and always returns
/// 4/4/4. Swap in a real reviewer through [`AssessmentEvaluator::with_written_scorer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreviewedWrittenScorer;

#[async_trait]
impl WrittenSubmissionScorer for UnreviewedWrittenScorer {
    async fn score(
        &self,
        _assessment: &Assessment,
        _submission: &AssessmentSubmission,
    ) -> Result<WrittenReview, CapabilityError> {
        Ok(WrittenReview {
            analysis: 4,
            solution: 4,
            communication: 4,
            feedback: "Well-structured response with clear reasoning. Good problem identification and practical solutions.".to_string(),
        })
    }
}

/// Dispatches a submission to the scorer for its declared assessment type.
#[derive(Clone)]
pub struct AssessmentEvaluator {
    rater: Arc<dyn RatingCapability>,
    written: Arc<dyn WrittenSubmissionScorer>,
}

impl AssessmentEvaluator {
    pub fn with_written_scorer(
        rater: Arc<dyn RatingCapability>,
        written: Arc<dyn WrittenSubmissionScorer>,
    ) -> Self {
        Self { rater, written }
    }

    pub async fn evaluate(
        &self,
        assessment: &Assessment,
        submission: &AssessmentSubmission,
        submitted_at: DateTime<Utc>,
    ) -> AssessmentResult {
        if assessment.kind.is_written() {
            let outcome = CapabilityOutcome::recover(
                "written_scorer",
                self.written.score(assessment, submission).await,
                |_| WrittenReview {
                    analysis: 3,
                    solution: 3,
                    communication: 3,
                    feedback: "Assessment evaluation failed - manual review required".to_string(),
                },
            );
            let degraded_reason = outcome.reason().map(str::to_string);
            let review = outcome.into_value();
            return AssessmentResult {
                kind: assessment.kind,
                scores: AssessmentScores::Written {
                    analysis: clamp_rating(review.analysis),
                    solution: clamp_rating(review.solution),
                    communication: clamp_rating(review.communication),
                },
                feedback: review.feedback,
                submitted_at,
                degraded_reason,
            };
        }

        let request = CodeRatingRequest {
            title: assessment.title.clone(),
            requirements: assessment.requirements.clone(),
            language: assessment.language.clone(),
            code: submission.content().to_string(),
        };
        let outcome = CapabilityOutcome::recover(
            "code_rater",
            self.rater.rate_code(&request).await,
            |_| neutral_code_rating(),
        );
        let degraded_reason = outcome.reason().map(str::to_string);
        let rating = outcome.into_value();

        AssessmentResult {
            kind: assessment.kind,
            scores: AssessmentScores::Coding {
                correctness: clamp_rating(rating.correctness),
                quality: clamp_rating(rating.quality),
                efficiency: clamp_rating(rating.efficiency),
                understanding: clamp_rating(rating.understanding),
            },
            feedback: rating.feedback,
            submitted_at,
            degraded_reason,
        }
    }
}

pub(crate) fn clamp_rating(score: u8) -> u8 {
    score.clamp(1, 5)
}
