//! Deterministic, in-process capability implementations. They let the service run without a
//! generative backend while exercising the same contracts.

use async_trait::async_trait;

use super::fallback::{scrape_email, truncate_chars, GENERAL_ROLE, RAW_TEXT_LIMIT};
use super::{
    CapabilityError, CodeRating, CodeRatingRequest, MeritRating, ProfileExtractor,
    QuestionGenerator, RatingCapability, TranscriptRatingRequest,
};
use crate::workflows::interview::domain::{CandidateProfile, EducationEntry, ExperienceEntry};

/// Reads UTF-8 résumés written as `Heading: value` lines.
///
/// Recognised headings: `Name`, `Email`, `Phone`, `Role`, `Summary`, `Skills`, `Technologies`,
/// `Experience` (`company | role | duration | description`, repeatable), and `Education`
/// (`institution | degree | field | year`, repeatable). Other lines are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextProfileExtractor;

#[async_trait]
impl ProfileExtractor for PlainTextProfileExtractor {
    async fn extract(
        &self,
        document: &[u8],
        filename: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        if filename.to_ascii_lowercase().ends_with(".pdf") {
            return Err(CapabilityError::Unsupported(format!(
                "{filename}: PDF extraction is not available in-process"
            )));
        }
        let text = std::str::from_utf8(document).map_err(|err| {
            CapabilityError::Unsupported(format!("{filename} is not UTF-8 text ({err})"))
        })?;

        let mut profile = CandidateProfile {
            original_filename: Some(filename.to_string()),
            raw_text: truncate_chars(text, RAW_TEXT_LIMIT),
            ..CandidateProfile::default()
        };

        for line in text.lines() {
            let Some((heading, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match heading.trim().to_ascii_lowercase().as_str() {
                "name" => profile.candidate_name = value.to_string(),
                "email" => profile.email = value.to_string(),
                "phone" => profile.phone = Some(value.to_string()),
                "role" => profile.role_fit = value.to_string(),
                "summary" => profile.summary = value.to_string(),
                "skills" => profile.skills.extend(split_list(value)),
                "technologies" => profile.technologies.extend(split_list(value)),
                "experience" => {
                    let mut parts = value.split('|').map(|part| part.trim().to_string());
                    profile.experience.push(ExperienceEntry {
                        company: parts.next().unwrap_or_default(),
                        role: parts.next().unwrap_or_default(),
                        duration: parts.next().unwrap_or_default(),
                        description: parts.next().unwrap_or_default(),
                    });
                }
                "education" => {
                    let mut parts = value.split('|').map(|part| part.trim().to_string());
                    profile.education.push(EducationEntry {
                        institution: parts.next().unwrap_or_default(),
                        degree: parts.next().unwrap_or_default(),
                        field: parts.next().unwrap_or_default(),
                        year: parts.next().unwrap_or_default(),
                    });
                }
                _ => {}
            }
        }

        if profile.candidate_name.is_empty() {
            return Err(CapabilityError::Malformed(format!(
                "{filename} has no Name heading"
            )));
        }
        if profile.email.is_empty() {
            profile.email = scrape_email(text).unwrap_or_default();
        }
        if profile.role_fit.is_empty() {
            profile.role_fit = GENERAL_ROLE.to_string();
        }

        Ok(profile)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Builds behavioural, technical, and situational questions from the profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateQuestionGenerator;

#[async_trait]
impl QuestionGenerator for TemplateQuestionGenerator {
    async fn generate(&self, profile: &CandidateProfile) -> Result<Vec<String>, CapabilityError> {
        if let Some(error) = &profile.error {
            return Err(CapabilityError::Unsupported(format!(
                "profile was not extracted cleanly: {error}"
            )));
        }

        let mut questions = Vec::new();

        if let Some(latest) = profile.experience.first() {
            questions.push(format!(
                "Tell me about your work as {} at {}. Which project are you most proud of there?",
                non_empty(&latest.role, "a team member"),
                non_empty(&latest.company, "your last company"),
            ));
        }
        if let Some(technology) = profile.technologies.first() {
            questions.push(format!(
                "How have you used {technology} in production, and what trade-offs did you run into?"
            ));
        }
        if let Some(skill) = profile.skills.iter().find(|skill| {
            !profile
                .technologies
                .iter()
                .any(|tech| tech.eq_ignore_ascii_case(skill))
        }) {
            questions.push(format!(
                "Describe a situation where your {skill} skills made a difference for your team."
            ));
        }

        questions.push(
            "Describe a time when you disagreed with a colleague. How did you resolve it?"
                .to_string(),
        );
        questions.push(
            "Tell me about a mistake you made at work and what you changed afterwards.".to_string(),
        );
        questions.push(format!(
            "If you joined us tomorrow as a {}, what would you focus on in your first 90 days?",
            non_empty(&profile.role_fit, GENERAL_ROLE)
        ));

        Ok(questions)
    }
}

fn non_empty<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Rater used when no rubric backend is configured. Every call degrades to neutral scores.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRater;

#[async_trait]
impl RatingCapability for UnavailableRater {
    async fn rate_transcript(
        &self,
        _request: &TranscriptRatingRequest,
    ) -> Result<MeritRating, CapabilityError> {
        Err(CapabilityError::Unavailable(
            "no rating backend configured".to_string(),
        ))
    }

    async fn rate_code(&self, _request: &CodeRatingRequest) -> Result<CodeRating, CapabilityError> {
        Err(CapabilityError::Unavailable(
            "no rating backend configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Name: Ada Park\n\
Email: ada.park@example.com\n\
Role: Senior Backend Developer\n\
Summary: Backend engineer focused on payments.\n\
Skills: Mentoring, API design, Rust\n\
Technologies: Rust, Python, PostgreSQL\n\
Experience: Ledgerly | Staff Engineer | 2021 - 2024 | Led settlement rewrite\n\
Experience: Paybox | Backend Engineer | 2018 - 2021 | Built fraud checks\n\
Education: State University | Bachelor of Science | Computer Science | 2018\n";

    #[tokio::test]
    async fn extracts_headings_into_profile() {
        let profile = PlainTextProfileExtractor
            .extract(RESUME.as_bytes(), "ada.txt")
            .await
            .expect("plain text extracts");

        assert_eq!(profile.candidate_name, "Ada Park");
        assert_eq!(profile.role_fit, "Senior Backend Developer");
        assert_eq!(profile.skills.len(), 3);
        assert_eq!(profile.technologies, vec!["Rust", "Python", "PostgreSQL"]);
        assert_eq!(profile.experience.len(), 2);
        assert_eq!(profile.experience[0].company, "Ledgerly");
        assert_eq!(profile.education[0].degree, "Bachelor of Science");
        assert!(profile.error.is_none());
    }

    #[tokio::test]
    async fn rejects_pdf_and_nameless_documents() {
        let pdf = PlainTextProfileExtractor
            .extract(b"%PDF-1.7", "cv.PDF")
            .await;
        assert!(matches!(pdf, Err(CapabilityError::Unsupported(_))));

        let nameless = PlainTextProfileExtractor
            .extract(b"Skills: Rust", "cv.txt")
            .await;
        assert!(matches!(nameless, Err(CapabilityError::Malformed(_))));
    }

    #[tokio::test]
    async fn template_questions_reference_profile() {
        let profile = PlainTextProfileExtractor
            .extract(RESUME.as_bytes(), "ada.txt")
            .await
            .expect("plain text extracts");
        let questions = TemplateQuestionGenerator
            .generate(&profile)
            .await
            .expect("questions generated");

        assert_eq!(questions.len(), 6);
        assert!(questions[0].contains("Staff Engineer at Ledgerly"));
        assert!(questions[1].contains("Rust"));
        assert!(questions[2].contains("Mentoring"));
    }

    #[tokio::test]
    async fn template_generator_refuses_fallback_profiles() {
        let profile = CandidateProfile {
            error: Some("CV parsing failed".to_string()),
            ..CandidateProfile::default()
        };
        assert!(TemplateQuestionGenerator.generate(&profile).await.is_err());
    }
}
