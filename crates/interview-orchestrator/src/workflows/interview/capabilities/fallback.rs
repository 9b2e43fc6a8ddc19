use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{CodeRating, MeritDimension, MeritRating};
use crate::workflows::interview::domain::CandidateProfile;

pub const OPENING_PROMPT: &str = "Hi! Thanks for joining this interview session. Let's start with you telling me a bit about yourself and your current role.";
pub const CLOSING_PROMPT: &str = "That covers the main questions I had. Do you have any questions about the role, company, or anything else you'd like to discuss?";

const FALLBACK_QUESTIONS: [&str; 8] = [
    "Hi! Thanks for joining this interview session. Tell me about yourself and your background.",
    "What interests you most about this opportunity?",
    "Describe a challenging project you've worked on recently.",
    "How do you approach problem-solving in your work?",
    "Tell me about a time you had to learn something new quickly.",
    "How do you handle working under pressure or tight deadlines?",
    "What are your career goals for the next few years?",
    "Do you have any questions for me about the role or company?",
];

pub const RAW_TEXT_LIMIT: usize = 1000;
pub const UNKNOWN_EMAIL: &str = "unknown@example.com";
pub const GENERAL_ROLE: &str = "General";

/// Place generated questions between the fixed opening and closing prompts.
pub fn frame_questions(generated: Vec<String>) -> Vec<String> {
    let mut questions = Vec::with_capacity(generated.len() + 2);
    questions.push(OPENING_PROMPT.to_string());
    questions.extend(
        generated
            .into_iter()
            .map(|question| question.trim().to_string())
            .filter(|question| !question.is_empty()),
    );
    questions.push(CLOSING_PROMPT.to_string());
    questions
}

/// Generic list used when question generation fails. Already carries its own opening and closing.
pub fn fallback_questions() -> Vec<String> {
    FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

pub fn fallback_profile(document: &[u8], filename: &str, reason: &str) -> CandidateProfile {
    let text = String::from_utf8_lossy(document);
    CandidateProfile {
        candidate_name: "Unknown".to_string(),
        email: scrape_email(&text).unwrap_or_else(|| UNKNOWN_EMAIL.to_string()),
        phone: None,
        summary: "CV analysis failed - manual review required".to_string(),
        experience: Vec::new(),
        skills: Vec::new(),
        education: Vec::new(),
        technologies: Vec::new(),
        role_fit: GENERAL_ROLE.to_string(),
        original_filename: Some(filename.to_string()),
        raw_text: truncate_chars(&text, RAW_TEXT_LIMIT),
        error: Some(format!("CV parsing failed: {reason}")),
    }
}

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b";

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN)).as_ref().ok()
}

/// First `local@domain.tld` match anywhere in the text.
pub fn scrape_email(text: &str) -> Option<String> {
    email_pattern()?
        .find(text)
        .map(|found| found.as_str().to_string())
}

pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Neutral 3/5 across the rubric, flagged with the failure reason.
pub fn neutral_merit_rating(reason: &str) -> MeritRating {
    let feedback: BTreeMap<MeritDimension, String> = MeritDimension::ordered()
        .into_iter()
        .map(|dimension| (dimension, "Unable to evaluate - technical error".to_string()))
        .collect();

    MeritRating {
        communication: 3,
        technical: 3,
        problem_solving: 3,
        professionalism: 3,
        culture_fit: 3,
        overall: Some(3.0),
        feedback,
        notes: format!("Interview evaluation failed: {reason}"),
    }
}

pub fn neutral_code_rating() -> CodeRating {
    CodeRating {
        correctness: 3,
        quality: 3,
        efficiency: 3,
        understanding: 3,
        feedback: "Assessment evaluation failed - manual review required".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_wraps_generated_questions() {
        let questions = frame_questions(vec![
            "Walk me through your last release.".to_string(),
            "   ".to_string(),
        ]);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0], OPENING_PROMPT);
        assert_eq!(questions[1], "Walk me through your last release.");
        assert_eq!(questions[2], CLOSING_PROMPT);
    }

    #[test]
    fn fallback_list_has_eight_items() {
        assert_eq!(fallback_questions().len(), 8);
    }

    #[test]
    fn fallback_profile_scrapes_email_and_flags_error() {
        let document = b"Jane Roe\nContact: <jane.roe@example.org>, +1 555 0100";
        let profile = fallback_profile(document, "cv.pdf", "extractor offline");
        assert_eq!(profile.email, "jane.roe@example.org");
        assert_eq!(profile.role_fit, "General");
        assert_eq!(profile.original_filename.as_deref(), Some("cv.pdf"));
        assert!(profile
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("extractor offline"));
    }

    #[test]
    fn fallback_profile_defaults_email_when_absent() {
        let profile = fallback_profile(&[0xff, 0xfe, 0x00], "cv.bin", "binary");
        assert_eq!(profile.email, UNKNOWN_EMAIL);
        assert!(profile.raw_text.chars().count() <= RAW_TEXT_LIMIT);
    }

    #[test]
    fn email_scrape_rejects_near_misses() {
        assert_eq!(scrape_email("reach me @ home or at foo@bar"), None);
        assert_eq!(
            scrape_email("ping a.b+cv@mail.example.com."),
            Some("a.b+cv@mail.example.com".to_string())
        );
    }

    #[test]
    fn email_scrape_ignores_labels_and_separators() {
        let expected = Some("jane.roe@example.org".to_string());
        assert_eq!(scrape_email("Email:jane.roe@example.org"), expected);
        assert_eq!(scrape_email("mailto:jane.roe@example.org"), expected);
        assert_eq!(
            scrape_email("jane@x.com,bob@y.com"),
            Some("jane@x.com".to_string())
        );
    }
}
