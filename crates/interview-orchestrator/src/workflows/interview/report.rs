use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::capabilities::fallback::{truncate_chars, GENERAL_ROLE};
use super::domain::{
    AnswerRecord, CandidateProfile, EducationEntry, Session, SessionId, SessionStatus,
};
use super::scoring::{
    AssessmentSummary, InterviewScores, OverallEvaluation, Recommendation, ScoringAggregator,
};

const UNKNOWN: &str = "Unknown";
const KEY_SKILL_LIMIT: usize = 8;
const TECHNOLOGY_LIMIT: usize = 10;
const NOTABLE_RESPONSE_LIMIT: usize = 3;
const NOTABLE_RESPONSE_CHARS: usize = 100;
const YEARS_PER_ROLE: u32 = 2;
const MINUTES_PER_ANSWER: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    pub email: String,
    pub role_applied: String,
    pub evaluation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    Doctorate,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "Bachelor's")]
    Bachelors,
    Other,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl EducationLevel {
    /// Highest level signalled by any degree title.
    pub fn from_entries(education: &[EducationEntry]) -> Self {
        if education.is_empty() {
            return EducationLevel::NotSpecified;
        }

        let degrees: Vec<String> = education
            .iter()
            .map(|entry| entry.degree.to_lowercase())
            .collect();

        if mentions(&degrees, &["phd", "doctorate"]) {
            EducationLevel::Doctorate
        } else if mentions(&degrees, &["master", "mba"]) {
            EducationLevel::Masters
        } else if mentions(&degrees, &["bachelor", "degree"]) {
            EducationLevel::Bachelors
        } else {
            EducationLevel::Other
        }
    }
}

fn mentions(degrees: &[String], needles: &[&str]) -> bool {
    degrees
        .iter()
        .any(|degree| needles.iter().any(|needle| degree.contains(needle)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvAnalysis {
    pub summary: String,
    pub experience_years: u32,
    pub key_skills: Vec<String>,
    pub technologies: Vec<String>,
    pub education_level: EducationLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewEvaluation {
    pub questions_answered: usize,
    pub scores: InterviewScores,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub notable_responses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentEvaluation {
    pub completed: bool,
    pub scores: AssessmentSummary,
    pub performance_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub session_id: SessionId,
    pub duration_minutes: u32,
    pub completion_status: SessionStatus,
}

/// Write-once evaluation artifact. Regenerating replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub candidate_info: CandidateInfo,
    pub cv_analysis: CvAnalysis,
    pub interview_evaluation: InterviewEvaluation,
    pub assessment_evaluation: AssessmentEvaluation,
    pub overall_evaluation: OverallEvaluation,
    pub recommendation: Recommendation,
    pub next_steps: Vec<String>,
    pub session_metadata: SessionMetadata,
}

/// Assembles a [`Report`] from a session snapshot.
#[derive(Clone)]
pub struct ReportCompiler {
    scoring: ScoringAggregator,
    assessment_time_limit_minutes: u32,
}

impl ReportCompiler {
    pub fn new(scoring: ScoringAggregator, assessment_time_limit_minutes: u32) -> Self {
        Self {
            scoring,
            assessment_time_limit_minutes,
        }
    }

    pub async fn compile(&self, session: &Session, generated_at: DateTime<Utc>) -> Report {
        let profile = session.profile.as_ref();

        let interview = self.scoring.score_interview(profile, &session.answers).await;
        let assessment = self
            .scoring
            .score_assessment(session.assessment_result.as_ref());
        let overall = self.scoring.evaluate(profile, &interview, &assessment);
        let tier = overall.recommendation;

        Report {
            candidate_info: candidate_info(profile, generated_at),
            cv_analysis: cv_analysis(profile),
            interview_evaluation: InterviewEvaluation {
                questions_answered: session.answers.len(),
                strengths: interview.strengths(),
                areas_for_improvement: interview.improvements(),
                notable_responses: notable_responses(&session.answers),
                scores: interview,
            },
            assessment_evaluation: AssessmentEvaluation {
                completed: assessment.completed,
                performance_summary: performance_summary(&assessment).to_string(),
                scores: assessment,
            },
            overall_evaluation: overall,
            recommendation: Recommendation::from(tier),
            next_steps: tier.next_steps(),
            session_metadata: SessionMetadata {
                session_id: session.id.clone(),
                duration_minutes: self.estimated_duration(session),
                completion_status: session.status,
            },
        }
    }

    fn estimated_duration(&self, session: &Session) -> u32 {
        let answered = u32::try_from(session.answers.len()).unwrap_or(u32::MAX);
        let mut minutes = answered.saturating_mul(MINUTES_PER_ANSWER);
        if session.assessment_result.is_some() {
            minutes = minutes.saturating_add(self.assessment_time_limit_minutes);
        }
        minutes
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn candidate_info(
    profile: Option<&CandidateProfile>,
    generated_at: DateTime<Utc>,
) -> CandidateInfo {
    match profile {
        Some(profile) => CandidateInfo {
            name: non_empty_or(&profile.candidate_name, UNKNOWN),
            email: non_empty_or(&profile.email, UNKNOWN),
            role_applied: non_empty_or(&profile.role_fit, GENERAL_ROLE),
            evaluation_date: generated_at,
        },
        None => CandidateInfo {
            name: UNKNOWN.to_string(),
            email: UNKNOWN.to_string(),
            role_applied: GENERAL_ROLE.to_string(),
            evaluation_date: generated_at,
        },
    }
}

fn cv_analysis(profile: Option<&CandidateProfile>) -> CvAnalysis {
    let Some(profile) = profile else {
        return CvAnalysis {
            summary: String::new(),
            experience_years: 0,
            key_skills: Vec::new(),
            technologies: Vec::new(),
            education_level: EducationLevel::NotSpecified,
        };
    };

    let roles = u32::try_from(profile.experience.len()).unwrap_or(u32::MAX);
    CvAnalysis {
        summary: profile.summary.clone(),
        experience_years: roles.saturating_mul(YEARS_PER_ROLE),
        key_skills: profile.skills.iter().take(KEY_SKILL_LIMIT).cloned().collect(),
        technologies: profile
            .technologies
            .iter()
            .take(TECHNOLOGY_LIMIT)
            .cloned()
            .collect(),
        education_level: EducationLevel::from_entries(&profile.education),
    }
}

fn notable_responses(answers: &[AnswerRecord]) -> Vec<String> {
    if answers.len() < 2 {
        return vec!["Limited interview responses available".to_string()];
    }

    answers
        .iter()
        .take(NOTABLE_RESPONSE_LIMIT)
        .enumerate()
        .map(|(index, record)| {
            format!(
                "Question {}: {}...",
                index + 1,
                truncate_chars(&record.answer, NOTABLE_RESPONSE_CHARS)
            )
        })
        .collect()
}

fn performance_summary(assessment: &AssessmentSummary) -> &'static str {
    if !assessment.completed {
        return "Assessment not completed";
    }

    let score = assessment.overall_score;
    if score >= 4.0 {
        "Excellent performance on technical assessment"
    } else if score >= 3.0 {
        "Good performance with minor areas for improvement"
    } else if score >= 2.0 {
        "Adequate performance but needs development"
    } else {
        "Below expectations - requires significant improvement"
    }
}
