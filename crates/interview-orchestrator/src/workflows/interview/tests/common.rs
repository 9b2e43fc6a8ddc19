use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::InterviewConfig;
use crate::workflows::interview::assessment::{Assessment, AssessmentKind};
use crate::workflows::interview::capabilities::{
    AssessmentAuthor, CapabilityError, CodeRating, CodeRatingRequest, MeritRating,
    ProfileExtractor, QuestionGenerator, RatingCapability, TranscriptRatingRequest,
};
use crate::workflows::interview::domain::{CandidateProfile, ExperienceEntry, Session, SessionId};
use crate::workflows::interview::store::{SessionStore, StoreError};
use crate::workflows::interview::{
    interview_router, InterviewCapabilities, InterviewSessionService,
};

pub(super) const RESUME: &str = "Name: Jordan Lee\n\
Email: jordan.lee@example.com\n\
Role: Backend Developer\n\
Summary: Backend developer building payment APIs.\n\
Skills: API design, Mentoring, Testing, SQL, Incident response\n\
Technologies: Python, PostgreSQL, Redis\n\
Experience: Finlane | Senior Developer | 2021 - 2024 | Owned the ledger service\n\
Experience: Shopwise | Developer | 2018 - 2021 | Built checkout flows\n\
Education: City University | Bachelor of Science | Computer Science | 2018\n";

pub(super) fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

pub(super) fn generated_questions(count: usize) -> Vec<String> {
    (1..=count)
        .map(|index| format!("Question {index}: how do you approach topic {index}?"))
        .collect()
}

pub(super) fn merit(scores: [u8; 5], overall: Option<f64>) -> MeritRating {
    MeritRating {
        communication: scores[0],
        technical: scores[1],
        problem_solving: scores[2],
        professionalism: scores[3],
        culture_fit: scores[4],
        overall,
        feedback: BTreeMap::new(),
        notes: "scripted".to_string(),
    }
}

pub(super) fn coding_profile() -> CandidateProfile {
    CandidateProfile {
        candidate_name: "Jordan Lee".to_string(),
        email: "jordan.lee@example.com".to_string(),
        summary: "Backend developer".to_string(),
        experience: vec![ExperienceEntry::default(), ExperienceEntry::default()],
        skills: vec!["API design".to_string()],
        technologies: vec!["Python".to_string()],
        role_fit: "Backend Developer".to_string(),
        ..CandidateProfile::default()
    }
}

pub(super) fn product_profile() -> CandidateProfile {
    CandidateProfile {
        candidate_name: "Sam Rivera".to_string(),
        technologies: vec!["Figma".to_string()],
        role_fit: "Product Manager".to_string(),
        ..CandidateProfile::default()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl MemoryStore {
    pub(super) fn stored(&self, id: &SessionId) -> Option<Session> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn seed(&self, session: Session) {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(session.id.clone(), session);
    }
}

impl SessionStore for MemoryStore {
    fn create(&self, session: &Session) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn update(&self, session: &Session) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn create(&self, _session: &Session) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _session: &Session) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<Session>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct ScriptedExtractor(pub(super) CandidateProfile);

#[async_trait]
impl ProfileExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        _document: &[u8],
        _filename: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingExtractor;

#[async_trait]
impl ProfileExtractor for FailingExtractor {
    async fn extract(
        &self,
        _document: &[u8],
        _filename: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        Err(CapabilityError::Malformed("extractor returned prose".to_string()))
    }
}

pub(super) struct ScriptedQuestions(pub(super) Vec<String>);

#[async_trait]
impl QuestionGenerator for ScriptedQuestions {
    async fn generate(&self, _profile: &CandidateProfile) -> Result<Vec<String>, CapabilityError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingQuestions;

#[async_trait]
impl QuestionGenerator for FailingQuestions {
    async fn generate(&self, _profile: &CandidateProfile) -> Result<Vec<String>, CapabilityError> {
        Err(CapabilityError::Unavailable("model timeout".to_string()))
    }
}

pub(super) struct ScriptedRater {
    pub(super) merit: MeritRating,
    pub(super) code: CodeRating,
}

impl ScriptedRater {
    pub(super) fn new(merit: MeritRating, code_score: u8) -> Self {
        Self {
            merit,
            code: CodeRating {
                correctness: code_score,
                quality: code_score,
                efficiency: code_score,
                understanding: code_score,
                feedback: "scripted review".to_string(),
            },
        }
    }
}

#[async_trait]
impl RatingCapability for ScriptedRater {
    async fn rate_transcript(
        &self,
        _request: &TranscriptRatingRequest,
    ) -> Result<MeritRating, CapabilityError> {
        Ok(self.merit.clone())
    }

    async fn rate_code(&self, _request: &CodeRatingRequest) -> Result<CodeRating, CapabilityError> {
        Ok(self.code.clone())
    }
}

pub(super) struct FailingAuthor;

#[async_trait]
impl AssessmentAuthor for FailingAuthor {
    async fn author(
        &self,
        _kind: AssessmentKind,
        _profile: &CandidateProfile,
    ) -> Result<Assessment, CapabilityError> {
        Err(CapabilityError::Unavailable("authoring offline".to_string()))
    }
}

/// Local capabilities with a scripted profile and question list.
pub(super) fn scripted_capabilities(
    profile: CandidateProfile,
    questions: Vec<String>,
) -> InterviewCapabilities {
    InterviewCapabilities {
        extractor: Arc::new(ScriptedExtractor(profile)),
        questions: Arc::new(ScriptedQuestions(questions)),
        ..InterviewCapabilities::local()
    }
}

pub(super) fn build_service(
    capabilities: InterviewCapabilities,
) -> (InterviewSessionService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service =
        InterviewSessionService::new(store.clone(), capabilities, InterviewConfig::default());
    (service, store)
}

/// Session with a CV attached, ready to serve its first question.
pub(super) async fn session_with_cv(
    service: &InterviewSessionService<MemoryStore>,
) -> SessionId {
    let id = service.start_session().session_id;
    service
        .attach_cv(&id, RESUME.as_bytes(), "jordan.txt")
        .await
        .expect("cv attaches");
    id
}

pub(super) fn router_with_service(service: InterviewSessionService<MemoryStore>) -> axum::Router {
    interview_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
