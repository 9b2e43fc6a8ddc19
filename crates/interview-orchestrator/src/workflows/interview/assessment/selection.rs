use super::AssessmentKind;
use crate::workflows::interview::domain::CandidateProfile;

/// Technologies that route a candidate to the coding variant.
pub const CODING_TECHNOLOGIES: [&str; 5] = ["python", "javascript", "java", "react", "node"];

/// Strategy picking the assessment variant for a profile.
pub trait AssessmentSelector: Send + Sync {
    fn tag(&self) -> &'static str;

    fn select(&self, profile: &CandidateProfile) -> AssessmentKind;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordAssessmentSelector;

impl AssessmentSelector for KeywordAssessmentSelector {
    fn tag(&self) -> &'static str {
        "keyword"
    }

    fn select(&self, profile: &CandidateProfile) -> AssessmentKind {
        let codes = profile.technologies.iter().any(|technology| {
            let technology = technology.trim().to_lowercase();
            CODING_TECHNOLOGIES.contains(&technology.as_str())
        });
        if codes {
            return AssessmentKind::Coding;
        }

        let role = profile.role_fit.to_lowercase();
        if role.contains("product") || role.contains("manager") {
            AssessmentKind::BusinessCase
        } else {
            AssessmentKind::Analytical
        }
    }
}
