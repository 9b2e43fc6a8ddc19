use serde::{Deserialize, Serialize};

use super::config::ScoringWeights;
use super::AssessmentSummary;

/// Four-tier hiring decision. Boundaries are closed at the lower end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationTier {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    #[serde(rename = "Hire")]
    Hire,
    #[serde(rename = "Maybe")]
    Maybe,
    #[serde(rename = "No Hire")]
    NoHire,
}

impl RecommendationTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            RecommendationTier::StrongHire
        } else if score >= 3.5 {
            RecommendationTier::Hire
        } else if score >= 2.5 {
            RecommendationTier::Maybe
        } else {
            RecommendationTier::NoHire
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RecommendationTier::StrongHire => "Strong Hire",
            RecommendationTier::Hire => "Hire",
            RecommendationTier::Maybe => "Maybe",
            RecommendationTier::NoHire => "No Hire",
        }
    }

    pub const fn confidence(self) -> &'static str {
        match self {
            RecommendationTier::StrongHire | RecommendationTier::NoHire => "High",
            RecommendationTier::Hire => "Medium-High",
            RecommendationTier::Maybe => "Medium",
        }
    }

    pub const fn reasoning(self) -> &'static str {
        match self {
            RecommendationTier::StrongHire => "Exceptional candidate who exceeded expectations across all evaluation criteria. Ready for immediate hiring.",
            RecommendationTier::Hire => "Strong candidate who meets role requirements with good potential for growth. Recommended for hire.",
            RecommendationTier::Maybe => "Candidate shows promise but has some gaps. Consider for junior role or with additional training.",
            RecommendationTier::NoHire => "Candidate does not currently meet the role requirements. Consider for future opportunities after skill development.",
        }
    }

    pub fn next_steps(self) -> Vec<String> {
        let steps: [&str; 4] = match self {
            RecommendationTier::StrongHire => [
                "Schedule final interview with hiring manager",
                "Prepare offer package",
                "Check references",
                "Begin onboarding preparation",
            ],
            RecommendationTier::Hire => [
                "Schedule follow-up interview with team lead",
                "Verify specific technical skills if needed",
                "Check references",
                "Prepare offer discussion",
            ],
            RecommendationTier::Maybe => [
                "Schedule additional technical interview",
                "Consider pairing with senior developer for assessment",
                "Evaluate for alternative roles",
                "Provide feedback and reassess in 3-6 months",
            ],
            RecommendationTier::NoHire => [
                "Provide constructive feedback to candidate",
                "Keep profile for future opportunities",
                "Consider referral to other suitable positions",
                "Maintain positive candidate experience",
            ],
        };
        steps.iter().map(|step| step.to_string()).collect()
    }

    pub fn follow_up_required(self) -> bool {
        matches!(self, RecommendationTier::Maybe)
    }
}

impl std::fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision with its fixed explanation, as reported to reviewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub decision: RecommendationTier,
    pub reasoning: String,
    pub confidence: String,
    pub follow_up_required: bool,
}

impl From<RecommendationTier> for Recommendation {
    fn from(tier: RecommendationTier) -> Self {
        Self {
            decision: tier,
            reasoning: tier.reasoning().to_string(),
            confidence: tier.confidence().to_string(),
            follow_up_required: tier.follow_up_required(),
        }
    }
}

/// Weighted blend rounded to two decimals; the rounded value is what gets tiered.
pub(crate) fn weighted_overall(
    interview_overall: f64,
    assessment: &AssessmentSummary,
    weights: &ScoringWeights,
) -> f64 {
    let raw = if assessment.completed {
        interview_overall * weights.interview + assessment.overall_score * weights.assessment
    } else {
        interview_overall
    };
    round_to_hundredths(raw)
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
