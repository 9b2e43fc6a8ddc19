use crate::infra::InMemorySessionStore;
use chrono::Utc;
use clap::Args;
use interview_orchestrator::config::InterviewConfig;
use interview_orchestrator::error::AppError;
use interview_orchestrator::workflows::interview::{
    AssessmentSubmission, InterviewCapabilities, InterviewSessionService, QuestionPrompt, Report,
    SessionId,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_RESUME: &str = "Name: Morgan Diaz\n\
Email: morgan.diaz@example.com\n\
Role: Backend Developer\n\
Summary: Backend developer focused on reliable payment services.\n\
Skills: API design, Incident response, Mentoring, Testing, Observability\n\
Technologies: Python, PostgreSQL, Kafka\n\
Experience: Northpay | Senior Developer | 2021 - 2024 | Led the settlement pipeline rewrite\n\
Experience: Cartly | Developer | 2018 - 2021 | Built the checkout service\n\
Education: Lakeside University | Bachelor of Science | Computer Science | 2018\n";

const DETAILED_ANSWER: &str = "In my last role I owned the settlement service end to end. I broke the rewrite into small releases, paired with the on-call team, and measured error rates after every deploy.";
const SHORT_ANSWER: &str = "It went well overall.";
const DEMO_SUBMISSION: &str = "def two_sum(nums, target):\n    seen = {}\n    for i, n in enumerate(nums):\n        if target - n in seen:\n            return [seen[target - n], i]\n        seen[n] = i\n";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Plain-text résumé (`Heading: value` lines). Defaults to a built-in sample.
    #[arg(long)]
    pub(crate) cv: Option<PathBuf>,
    /// Answer tersely so the sequencer appends follow-up probes.
    #[arg(long)]
    pub(crate) short_answers: bool,
    /// Print the outcome as JSON instead of a readable summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct DemoOutcome<'a> {
    session_id: &'a SessionId,
    follow_ups: &'a [String],
    report: &'a Report,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        cv,
        short_answers,
        json,
    } = args;

    let (document, filename) = match cv {
        Some(path) => {
            let bytes = std::fs::read(&path)?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cv.txt".to_string());
            (bytes, name)
        }
        None => (SAMPLE_RESUME.as_bytes().to_vec(), "sample-cv.txt".to_string()),
    };

    let store = Arc::new(InMemorySessionStore::default());
    let service = InterviewSessionService::new(
        store.clone(),
        InterviewCapabilities::local(),
        InterviewConfig::default(),
    );

    let id = service.start_session().session_id;
    let attachment = service.attach_cv(&id, &document, &filename).await?;
    if !json {
        println!("Interview session {}", id);
        println!(
            "- CV {} attached -> {} questions prepared",
            filename, attachment.questions_generated
        );
        if let Some(reason) = &attachment.degraded_reason {
            println!("  CV extraction degraded: {}", reason);
        }
    }

    let answer = if short_answers {
        SHORT_ANSWER
    } else {
        DETAILED_ANSWER
    };
    let mut follow_ups = Vec::new();
    while let QuestionPrompt::Question {
        question,
        question_number,
        ..
    } = service.current_question(&id).await?
    {
        let progress = service
            .submit_answer(&id, answer.to_string(), Some(Utc::now()))
            .await?;
        if !json {
            println!("  Q{}: {}", question_number, question);
        }
        if let Some(probe) = progress.follow_up {
            if !json {
                println!("      follow-up queued: {}", probe);
            }
            follow_ups.push(probe);
        }
    }

    let assessment = service.start_assessment(&id).await?;
    let submission = if assessment.kind.is_written() {
        AssessmentSubmission {
            code: None,
            response: Some(DETAILED_ANSWER.to_string()),
        }
    } else {
        AssessmentSubmission {
            code: Some(DEMO_SUBMISSION.to_string()),
            response: None,
        }
    };
    let result = service.submit_assessment(&id, submission).await?;
    let report = service.generate_report(&id).await?;

    if json {
        let outcome = DemoOutcome {
            session_id: &id,
            follow_ups: &follow_ups,
            report: &report,
        };
        match serde_json::to_string_pretty(&outcome) {
            Ok(body) => println!("{}", body),
            Err(err) => println!("Demo outcome unavailable: {}", err),
        }
        return Ok(());
    }

    println!(
        "- Assessment: {} ({}, {} min) -> {}",
        assessment.title,
        assessment.kind.label(),
        assessment.time_limit_minutes,
        result.feedback
    );
    render_report(&report);
    println!("- Sessions persisted: {}", store.len());

    Ok(())
}

fn render_report(report: &Report) {
    let overall = &report.overall_evaluation;
    println!("\nEvaluation for {}", report.candidate_info.name);
    println!(
        "- Overall {:.2} -> {} (confidence {})",
        overall.overall_score, report.recommendation.decision, overall.confidence_level
    );
    println!(
        "  Interview {:.2} | Assessment {:.2} | CV quality {:.2}",
        overall.score_breakdown.interview_score,
        overall.score_breakdown.assessment_score,
        overall.score_breakdown.cv_quality
    );
    if report.interview_evaluation.scores.degraded {
        println!("  Interview rating degraded: {}", report.interview_evaluation.scores.notes);
    }
    println!("  Reasoning: {}", report.recommendation.reasoning);

    println!("Strengths");
    for strength in &report.interview_evaluation.strengths {
        println!("  - {}", strength);
    }
    println!("Areas for improvement");
    for area in &report.interview_evaluation.areas_for_improvement {
        println!("  - {}", area);
    }
    println!("Next steps");
    for step in &report.next_steps {
        println!("  - {}", step);
    }
    println!(
        "Session {} | {} answers | ~{} min | {}",
        report.session_metadata.session_id,
        report.interview_evaluation.questions_answered,
        report.session_metadata.duration_minutes,
        report.session_metadata.completion_status
    );
}
