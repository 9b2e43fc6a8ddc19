use super::common::*;
use std::sync::Arc;

use crate::workflows::interview::assessment::{AssessmentKind, AssessmentSubmission};
use crate::workflows::interview::capabilities::local::UnavailableRater;
use crate::workflows::interview::capabilities::MeritDimension;
use crate::workflows::interview::domain::{CandidateProfile, SessionId, SessionStatus};
use crate::workflows::interview::scoring::{RecommendationTier, ScoringAggregator};
use crate::workflows::interview::{InterviewCapabilities, InterviewSessionService};

async fn answer_and_close(service: &InterviewSessionService<MemoryStore>, id: &SessionId) {
    for _ in 0..3 {
        service
            .submit_answer(id, words(20), None)
            .await
            .expect("answer accepted");
    }
    service
        .complete_interview(id)
        .await
        .expect("manual completion");
}

fn rated_capabilities(profile: CandidateProfile, rater: ScriptedRater) -> InterviewCapabilities {
    InterviewCapabilities {
        rater: Arc::new(rater),
        ..scripted_capabilities(profile, generated_questions(6))
    }
}

#[tokio::test]
async fn interview_only_score_of_four_point_two_is_hire() {
    let rater = ScriptedRater::new(merit([5, 4, 4, 3, 5], None), 3);
    let (service, _) = build_service(rated_capabilities(coding_profile(), rater));
    let id = session_with_cv(&service).await;
    answer_and_close(&service, &id).await;

    let report = service.generate_report(&id).await.expect("report");

    assert!(!report.assessment_evaluation.completed);
    assert_eq!(report.assessment_evaluation.scores.overall_score, 0.0);
    assert_eq!(
        report.assessment_evaluation.performance_summary,
        "Assessment not completed"
    );
    assert_eq!(report.overall_evaluation.overall_score, 4.2);
    assert_eq!(report.recommendation.decision, RecommendationTier::Hire);
    assert_eq!(report.overall_evaluation.confidence_level, "Medium-High");
    assert!(!report.recommendation.follow_up_required);
    assert_eq!(report.next_steps, RecommendationTier::Hire.next_steps());
}

#[tokio::test]
async fn interview_three_with_assessment_five_blends_to_hire() {
    let rater = ScriptedRater::new(merit([3, 3, 3, 3, 3], Some(3.0)), 5);
    let (service, _) = build_service(rated_capabilities(coding_profile(), rater));
    let id = session_with_cv(&service).await;
    answer_and_close(&service, &id).await;

    let assessment = service.start_assessment(&id).await.expect("assessment");
    assert_eq!(assessment.kind, AssessmentKind::Coding);
    service
        .submit_assessment(
            &id,
            AssessmentSubmission {
                code: Some("def two_sum(nums, target): ...".to_string()),
                response: None,
            },
        )
        .await
        .expect("submission scored");

    let report = service.generate_report(&id).await.expect("report");

    assert!(report.assessment_evaluation.completed);
    assert_eq!(report.assessment_evaluation.scores.overall_score, 5.0);
    assert_eq!(report.overall_evaluation.overall_score, 3.8);
    assert_eq!(report.recommendation.decision, RecommendationTier::Hire);
    assert_eq!(report.overall_evaluation.score_breakdown.interview_score, 3.0);
    assert_eq!(report.overall_evaluation.score_breakdown.assessment_score, 5.0);
    assert_eq!(
        report.assessment_evaluation.performance_summary,
        "Excellent performance on technical assessment"
    );
    assert_eq!(report.session_metadata.duration_minutes, 3 * 3 + 45);
    assert_eq!(report.session_metadata.completion_status, SessionStatus::Completed);
}

#[tokio::test]
async fn failed_rating_degrades_to_neutral_maybe() {
    let (service, _) = build_service(scripted_capabilities(
        coding_profile(),
        generated_questions(6),
    ));
    let id = session_with_cv(&service).await;
    answer_and_close(&service, &id).await;

    let report = service.generate_report(&id).await.expect("report");
    let scores = &report.interview_evaluation.scores;

    assert!(scores.degraded);
    assert!(scores.notes.starts_with("Interview evaluation failed"));
    for dimension in MeritDimension::ordered() {
        assert_eq!(scores.score(dimension), 3);
        assert_eq!(
            scores.feedback.get(&dimension).map(String::as_str),
            Some("Unable to evaluate - technical error")
        );
    }
    assert_eq!(report.overall_evaluation.overall_score, 3.0);
    assert_eq!(report.recommendation.decision, RecommendationTier::Maybe);
    assert!(report.recommendation.follow_up_required);
    assert_eq!(
        report.interview_evaluation.strengths,
        vec!["Shows potential in multiple areas".to_string()]
    );
}

#[tokio::test]
async fn written_assessment_uses_unreviewed_stub_scores() {
    let rater = ScriptedRater::new(merit([2, 2, 2, 2, 2], None), 1);
    let (service, _) = build_service(rated_capabilities(product_profile(), rater));
    let id = session_with_cv(&service).await;
    answer_and_close(&service, &id).await;

    let assessment = service.start_assessment(&id).await.expect("assessment");
    assert_eq!(assessment.kind, AssessmentKind::BusinessCase);
    let result = service
        .submit_assessment(
            &id,
            AssessmentSubmission {
                code: None,
                response: Some("Root causes: content fatigue.".to_string()),
            },
        )
        .await
        .expect("submission scored");
    assert_eq!(result.degraded_reason, None);

    let report = service.generate_report(&id).await.expect("report");
    assert_eq!(report.assessment_evaluation.scores.overall_score, 4.0);
    // 0.6 * 2.0 + 0.4 * 4.0
    assert_eq!(report.overall_evaluation.overall_score, 2.8);
    assert_eq!(report.recommendation.decision, RecommendationTier::Maybe);
    assert_eq!(
        report.interview_evaluation.areas_for_improvement.len(),
        5,
        "every dimension under three is flagged"
    );
}

#[tokio::test]
async fn aggregator_without_answers_skips_the_rater() {
    let aggregator = ScoringAggregator::new(Arc::new(ScriptedRater::new(
        merit([5, 5, 5, 5, 5], None),
        5,
    )));
    let scores = aggregator.score_interview(None, &[]).await;
    assert!(scores.degraded);
    assert_eq!(scores.overall, 3.0);

    let unavailable = ScoringAggregator::new(Arc::new(UnavailableRater));
    let assessment = unavailable.score_assessment(None);
    let overall = unavailable.evaluate(Some(&coding_profile()), &scores, &assessment);
    assert_eq!(overall.overall_score, 3.0);
    assert!((overall.score_breakdown.cv_quality - 3.7).abs() < 1e-9);
}
