use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::reassessment::catalog::ReferenceCatalog;
use crate::workflows::reassessment::domain::{AnswerSet, ReassessmentSubmission};
use crate::workflows::reassessment::evaluation::{RecommendationResult, TitrationEngine};
use crate::workflows::reassessment::sink::{SinkError, SubmissionPayload, SubmissionSink};
use crate::workflows::reassessment::{reassessment_router, ReassessmentService};

pub(crate) fn catalog() -> Arc<ReferenceCatalog> {
    Arc::new(ReferenceCatalog::standard())
}

fn last_dose() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 10).expect("valid date")
}

/// Tier 1 beginner losing 7-12 pounds with no side effects and a satisfaction of 4.
pub(crate) fn answers() -> AnswerSet {
    AnswerSet {
        current_dose: "10units".to_string(),
        time_on_current_medication: "lessthan2months".to_string(),
        date_of_last_dose: last_dose(),
        weight_loss_4_weeks: "7-12pounds".to_string(),
        current_weight_lbs: 212.5,
        side_effects: vec!["No side effects".to_string()],
        other_side_effect_text: String::new(),
        nausea_medication_requested: None,
        appetite_control: "just_right".to_string(),
        food_cravings: "sometimes".to_string(),
        satisfaction_rating: 4,
        missed_doses_4_weeks: 0,
        patient_preference: None,
        weight_gain_efforts: Vec::new(),
    }
}

/// Tier 3 patient on medication for six months or more.
pub(crate) fn expert_answers() -> AnswerSet {
    AnswerSet {
        current_dose: "40units".to_string(),
        time_on_current_medication: "6plusmonths".to_string(),
        weight_loss_4_weeks: "4-6pounds".to_string(),
        satisfaction_rating: 3,
        ..answers()
    }
}

pub(crate) fn submission() -> ReassessmentSubmission {
    ReassessmentSubmission {
        patient_id: Some("PATIENT_123".to_string()),
        current_dose: "10units".to_string(),
        time_on_current_medication: "lessthan2months".to_string(),
        date_of_last_dose: Some(last_dose()),
        weight_loss_4_weeks: "7-12pounds".to_string(),
        current_weight: Some(212.5),
        side_effects: vec!["No side effects".to_string()],
        other_side_effect_text: String::new(),
        nausea_medication_preference: None,
        appetite_control: "just_right".to_string(),
        food_cravings: "sometimes".to_string(),
        satisfaction_rating: 4,
        missed_doses_4_weeks: Some(0),
        patient_preference: None,
        weight_gain_efforts: Vec::new(),
    }
}

pub(crate) fn chest_pain_submission() -> ReassessmentSubmission {
    let mut submission = submission();
    submission.side_effects = vec!["Mild nausea (manageable)".to_string(), "Chest pain".to_string()];
    submission
}

pub(crate) fn evaluate(answers: &AnswerSet) -> RecommendationResult {
    let catalog = catalog();
    let experience = catalog
        .experience_for(&answers.current_dose, &answers.time_on_current_medication)
        .expect("fixture codes resolve");
    TitrationEngine::new(catalog).recommend(answers, &experience)
}

pub(crate) fn build_service() -> (ReassessmentService<MemorySink>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let service = ReassessmentService::new(catalog(), sink.clone());
    (service, sink)
}

#[derive(Default, Clone)]
pub(crate) struct MemorySink {
    payloads: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl MemorySink {
    pub(crate) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("sink mutex poisoned").clone()
    }
}

impl SubmissionSink for MemorySink {
    fn record(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
        self.payloads
            .lock()
            .expect("sink mutex poisoned")
            .push(payload);
        Ok(())
    }
}

pub(crate) struct OfflineSink;

impl SubmissionSink for OfflineSink {
    fn record(&self, _payload: SubmissionPayload) -> Result<(), SinkError> {
        Err(SinkError::Transport("audit log offline".to_string()))
    }
}

pub(crate) fn router_with_service(service: ReassessmentService<MemorySink>) -> axum::Router {
    reassessment_router(Arc::new(service))
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
