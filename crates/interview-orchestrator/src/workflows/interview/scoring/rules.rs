use std::collections::BTreeMap;

use super::{AssessmentSummary, InterviewScores};
use crate::workflows::interview::assessment::{AssessmentResult, AssessmentScores};
use crate::workflows::interview::capabilities::{MeritDimension, MeritRating};
use crate::workflows::interview::domain::CandidateProfile;

pub(crate) const STRENGTH_THRESHOLD: u8 = 4;
pub(crate) const IMPROVEMENT_THRESHOLD: u8 = 3;

pub(crate) const NEUTRAL_STRENGTH: &str = "Shows potential in multiple areas";
pub(crate) const NEUTRAL_IMPROVEMENT: &str = "No significant areas of concern identified";

fn rubric_score(score: u8) -> u8 {
    score.clamp(1, 5)
}

pub(crate) fn interview_scores(rating: MeritRating, degraded: bool) -> InterviewScores {
    let communication = rubric_score(rating.communication);
    let technical = rubric_score(rating.technical);
    let problem_solving = rubric_score(rating.problem_solving);
    let professionalism = rubric_score(rating.professionalism);
    let culture_fit = rubric_score(rating.culture_fit);

    let mean = f64::from(
        u16::from(communication)
            + u16::from(technical)
            + u16::from(problem_solving)
            + u16::from(professionalism)
            + u16::from(culture_fit),
    ) / 5.0;
    let overall = rating
        .overall
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(1.0, 5.0))
        .unwrap_or(mean);

    InterviewScores {
        communication,
        technical,
        problem_solving,
        professionalism,
        culture_fit,
        overall,
        feedback: rating.feedback,
        notes: rating.notes,
        degraded,
    }
}

pub(crate) fn assessment_summary(result: Option<&AssessmentResult>) -> AssessmentSummary {
    let Some(result) = result else {
        return AssessmentSummary {
            completed: false,
            kind: None,
            sub_scores: BTreeMap::new(),
            overall_score: 0.0,
        };
    };

    let sub_scores: BTreeMap<String, u8> = match result.scores {
        AssessmentScores::Coding {
            correctness,
            quality,
            efficiency,
            ..
        } => [
            ("correctness", correctness),
            ("quality", quality),
            ("efficiency", efficiency),
        ]
        .into_iter()
        .map(|(name, score)| (name.to_string(), rubric_score(score)))
        .collect(),
        AssessmentScores::Written {
            analysis,
            solution,
            communication,
        } => [
            ("analysis", analysis),
            ("solution", solution),
            ("communication", communication),
        ]
        .into_iter()
        .map(|(name, score)| (name.to_string(), rubric_score(score)))
        .collect(),
    };

    let total: u16 = sub_scores.values().map(|score| u16::from(*score)).sum();
    let overall_score = f64::from(total) / sub_scores.len() as f64;

    AssessmentSummary {
        completed: true,
        kind: Some(result.kind),
        sub_scores,
        overall_score,
    }
}

/// Starts at 3.0: +0.3 for a summary, +0.4 for two or more roles, +0.3 for five or more skills.
pub(crate) fn cv_quality(profile: Option<&CandidateProfile>) -> f64 {
    let Some(profile) = profile else {
        return 3.0;
    };

    let mut score: f64 = 3.0;
    if !profile.summary.trim().is_empty() {
        score += 0.3;
    }
    if profile.experience.len() >= 2 {
        score += 0.4;
    }
    if profile.skills.len() >= 5 {
        score += 0.3;
    }
    score.min(5.0)
}

fn strength_label(dimension: MeritDimension) -> &'static str {
    match dimension {
        MeritDimension::Communication => "Excellent communication skills",
        MeritDimension::Technical => "Strong technical knowledge",
        MeritDimension::ProblemSolving => "Good problem-solving approach",
        MeritDimension::Professionalism => "Consistently professional presence",
        MeritDimension::CultureFit => "Great cultural fit",
    }
}

fn improvement_label(dimension: MeritDimension) -> &'static str {
    match dimension {
        MeritDimension::Communication => "Communication clarity",
        MeritDimension::Technical => "Technical depth",
        MeritDimension::ProblemSolving => "Structured problem-solving",
        MeritDimension::Professionalism => "Professional presentation",
        MeritDimension::CultureFit => "Alignment with team culture and work ethic",
    }
}

pub(crate) fn strengths(scores: &InterviewScores) -> Vec<String> {
    let found: Vec<String> = MeritDimension::ordered()
        .into_iter()
        .filter(|dimension| scores.score(*dimension) >= STRENGTH_THRESHOLD)
        .map(|dimension| strength_label(dimension).to_string())
        .collect();

    if found.is_empty() {
        vec![NEUTRAL_STRENGTH.to_string()]
    } else {
        found
    }
}

pub(crate) fn improvements(scores: &InterviewScores) -> Vec<String> {
    let found: Vec<String> = MeritDimension::ordered()
        .into_iter()
        .filter(|dimension| scores.score(*dimension) < IMPROVEMENT_THRESHOLD)
        .map(|dimension| improvement_label(dimension).to_string())
        .collect();

    if found.is_empty() {
        vec![NEUTRAL_IMPROVEMENT.to_string()]
    } else {
        found
    }
}
