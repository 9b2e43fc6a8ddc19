use async_trait::async_trait;

use super::{Assessment, AssessmentKind, AssessmentScenario};
use crate::workflows::interview::capabilities::{AssessmentAuthor, CapabilityError};
use crate::workflows::interview::domain::CandidateProfile;

const DEFAULT_LANGUAGE: &str = "JavaScript";

/// Hardcoded payload for each variant. Used directly by [`CatalogAssessmentAuthor`] and as the
/// fallback whenever a generating author fails.
pub fn canonical_assessment(kind: AssessmentKind, profile: &CandidateProfile) -> Assessment {
    match kind {
        AssessmentKind::Coding => coding(profile),
        AssessmentKind::BusinessCase => business_case(),
        AssessmentKind::Analytical => analytical(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn coding(profile: &CandidateProfile) -> Assessment {
    let language = profile
        .technologies
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    Assessment {
        kind: AssessmentKind::Coding,
        title: "Array Manipulation Challenge".to_string(),
        description: "Given an array of integers, implement a function that finds the two numbers that sum to a target value.".to_string(),
        scenario: None,
        requirements: strings(&[
            "Function should return indices of the two numbers",
            "Assume exactly one solution exists",
            "Handle edge cases appropriately",
        ]),
        evaluation_criteria: strings(&[
            "Correctness of solution",
            "Code quality and readability",
            "Time and space complexity",
            "Edge case handling",
        ]),
        time_limit_minutes: 30,
        example_input: Some("arr = [2, 7, 11, 15], target = 9".to_string()),
        example_output: Some("[0, 1] (because arr[0] + arr[1] = 2 + 7 = 9)".to_string()),
        language: Some(language),
        starter_code: Some(
            "// Implement your solution here\nfunction twoSum(nums, target) {\n    // Your code here\n}"
                .to_string(),
        ),
        format: None,
    }
}

fn business_case() -> Assessment {
    Assessment {
        kind: AssessmentKind::BusinessCase,
        title: "Product Strategy Challenge".to_string(),
        description: "You're tasked with improving user engagement for a mobile app that has seen declining daily active users over the past 3 months.".to_string(),
        scenario: Some(AssessmentScenario {
            context: "Mobile fitness app with 100K users".to_string(),
            problem: "30% decline in daily active users".to_string(),
            details: strings(&[
                "Average session time: 3 minutes (down from 5 minutes)",
                "Feature usage: Main workout feature used by 40% of users",
                "User feedback: 'App feels repetitive', 'Not enough variety'",
            ]),
        }),
        requirements: strings(&[
            "Identify 3 potential root causes",
            "Propose 2 solution strategies with rationale",
            "Define success metrics for each solution",
            "Create a 90-day implementation timeline",
        ]),
        evaluation_criteria: strings(&[
            "Problem analysis depth",
            "Solution creativity and feasibility",
            "Metrics selection and reasoning",
            "Implementation planning",
        ]),
        time_limit_minutes: 45,
        example_input: None,
        example_output: None,
        language: None,
        starter_code: None,
        format: Some("Written response with clear sections".to_string()),
    }
}

fn analytical() -> Assessment {
    Assessment {
        kind: AssessmentKind::Analytical,
        title: "Process Improvement Challenge".to_string(),
        description: "Analyze a workflow problem and propose improvements".to_string(),
        scenario: Some(AssessmentScenario {
            context: "Customer support team handling 500+ tickets/day".to_string(),
            problem: "Response time has increased from 2 hours to 8 hours".to_string(),
            details: strings(&[
                "Tickets arrive via email and chat",
                "Manual assignment to available agents",
                "Agents work through tickets in order received",
                "Complex issues escalated to senior agents",
            ]),
        }),
        requirements: strings(&[
            "Identify bottlenecks in current process",
            "Propose 3 improvement solutions",
            "Prioritize solutions with justification",
            "Estimate impact and implementation effort",
        ]),
        evaluation_criteria: strings(&[
            "Problem identification accuracy",
            "Solution practicality",
            "Prioritization reasoning",
            "Communication clarity",
        ]),
        time_limit_minutes: 30,
        example_input: None,
        example_output: None,
        language: None,
        starter_code: None,
        format: Some("Structured written response".to_string()),
    }
}

/// Author that always serves the canonical catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogAssessmentAuthor;

#[async_trait]
impl AssessmentAuthor for CatalogAssessmentAuthor {
    async fn author(
        &self,
        kind: AssessmentKind,
        profile: &CandidateProfile,
    ) -> Result<Assessment, CapabilityError> {
        Ok(canonical_assessment(kind, profile))
    }
}
