use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::{Assessment, AssessmentResult};
use super::report::Report;

/// Identifier wrapper for interview sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a session. Variants are declared in transition order so the derived
/// ordering doubles as the "no backward transitions" rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initialized,
    CvUploaded,
    InterviewActive,
    InterviewComplete,
    AssessmentActive,
    AssessmentComplete,
    Completed,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SessionStatus::Initialized => "initialized",
            SessionStatus::CvUploaded => "cv_uploaded",
            SessionStatus::InterviewActive => "interview_active",
            SessionStatus::InterviewComplete => "interview_complete",
            SessionStatus::AssessmentActive => "assessment_active",
            SessionStatus::AssessmentComplete => "assessment_complete",
            SessionStatus::Completed => "completed",
        }
    }

    /// True once no further interview questions may be served.
    pub fn interview_closed(self) -> bool {
        self >= SessionStatus::InterviewComplete
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub year: String,
}

/// Structured extraction of a résumé. Replaced wholesale on re-upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub candidate_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub technologies: Vec<String>,
    pub role_fit: String,
    pub original_filename: Option<String>,
    pub raw_text: String,
    /// Populated only on the fallback profile produced when extraction fails.
    pub error: Option<String>,
}

/// One answered question. The question text is copied so the log survives list growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl AnswerRecord {
    pub fn word_count(&self) -> usize {
        word_count(&self.answer)
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The unit of work: one end-to-end candidate evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub profile: Option<CandidateProfile>,
    pub questions: Vec<String>,
    pub current_question_index: usize,
    pub answers: Vec<AnswerRecord>,
    pub assessment: Option<Assessment>,
    pub assessment_result: Option<AssessmentResult>,
    pub report: Option<Report>,
}

impl Session {
    pub fn new(id: SessionId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            status: SessionStatus::Initialized,
            profile: None,
            questions: Vec::new(),
            current_question_index: 0,
            answers: Vec::new(),
            assessment: None,
            assessment_result: None,
            report: None,
        }
    }

    /// Move forward to `next`. Returns false (and leaves the status alone) when `next` is not ahead.
    pub fn advance_to(&mut self, next: SessionStatus) -> bool {
        if next > self.status {
            self.status = next;
            true
        } else {
            false
        }
    }

    pub fn pending_question(&self) -> Option<&str> {
        self.questions
            .get(self.current_question_index)
            .map(String::as_str)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }
}
