use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::ReferenceCatalog;
use super::domain::{AnswerSet, AssessmentId, PatientPreference};
use super::evaluation::{AlternativeRecommendation, CriticalAlert, RecommendationResult, Scores};

/// Outbound hook receiving every completed assessment (audit log, EHR bridge, analytics).
pub trait SubmissionSink: Send + Sync {
    fn record(&self, payload: SubmissionPayload) -> Result<(), SinkError>;
}

/// Sink delivery error.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("submission sink unavailable: {0}")]
    Transport(String),
    #[error("submission payload could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Serialized record of one reassessment as handed to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub assessment_id: AssessmentId,
    pub patient_id: Option<String>,
    pub reassessment_date: DateTime<Utc>,
    pub current_tier_value: String,
    pub current_tier_mapped: String,
    pub time_on_medication_months: f64,
    pub responses: SubmissionResponses,
    pub calculated_scores: Scores,
    pub recommendation: PayloadRecommendation,
    pub flags: PayloadFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_alert: Option<CriticalAlert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponses {
    pub date_of_last_dose: NaiveDate,
    pub weight_loss_4weeks: String,
    pub current_weight: f64,
    pub side_effects: Vec<String>,
    pub other_side_effect_text: String,
    pub nausea_medication_preference: Option<bool>,
    pub appetite_control: String,
    pub food_cravings: String,
    pub satisfaction_rating: u8,
    pub missed_doses_4weeks: u32,
    pub patient_preference: Option<PatientPreference>,
    pub weight_gain_efforts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadRecommendation {
    pub primary: String,
    pub primary_product_id: Option<String>,
    pub reasoning: String,
    pub alternatives: Vec<AlternativeRecommendation>,
    pub safety_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadFlags {
    pub important: Vec<String>,
    pub critical: Vec<String>,
    pub requires_physician_review: bool,
}

impl SubmissionPayload {
    pub fn build(
        assessment_id: AssessmentId,
        patient_id: Option<String>,
        reassessment_date: DateTime<Utc>,
        answers: &AnswerSet,
        result: &RecommendationResult,
        catalog: &ReferenceCatalog,
    ) -> Self {
        let current_tier_mapped = catalog
            .dose(&answers.current_dose)
            .map(|dose| dose.tier_name)
            .unwrap_or("Unknown")
            .to_string();
        let time_on_medication_months = catalog
            .time_on_medication(&answers.time_on_current_medication)
            .map(|option| option.months)
            .unwrap_or(0.0);

        Self {
            assessment_id,
            patient_id,
            reassessment_date,
            current_tier_value: answers.current_dose.clone(),
            current_tier_mapped,
            time_on_medication_months,
            responses: SubmissionResponses {
                date_of_last_dose: answers.date_of_last_dose,
                weight_loss_4weeks: answers.weight_loss_4_weeks.clone(),
                current_weight: answers.current_weight_lbs,
                side_effects: answers.side_effects.clone(),
                other_side_effect_text: answers.other_side_effect_text.clone(),
                nausea_medication_preference: answers.nausea_medication_requested,
                appetite_control: answers.appetite_control.clone(),
                food_cravings: answers.food_cravings.clone(),
                satisfaction_rating: answers.satisfaction_rating,
                missed_doses_4weeks: answers.missed_doses_4_weeks,
                patient_preference: answers.patient_preference,
                weight_gain_efforts: answers.weight_gain_efforts.clone(),
            },
            calculated_scores: result.scores.clone(),
            recommendation: PayloadRecommendation {
                primary: result.primary_recommendation.clone(),
                primary_product_id: result.primary_product_id.clone(),
                reasoning: result.reasoning.clone(),
                alternatives: result.alternative_recommendations.clone(),
                safety_flags: result.safety_flags.clone(),
            },
            flags: PayloadFlags {
                important: result.important_flags.clone(),
                critical: result.critical_flags.clone(),
                requires_physician_review: result.requires_physician_review,
            },
            critical_alert: result.critical_alert.clone(),
        }
    }
}

/// Sink that writes payloads to the tracing pipeline.
#[derive(Debug, Clone, Copy)]
pub struct TracingSubmissionSink {
    log_payloads: bool,
}

impl TracingSubmissionSink {
    pub fn new(log_payloads: bool) -> Self {
        Self { log_payloads }
    }
}

impl Default for TracingSubmissionSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SubmissionSink for TracingSubmissionSink {
    fn record(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
        if !self.log_payloads {
            info!(
                assessment_id = %payload.assessment_id.0,
                review = payload.flags.requires_physician_review,
                "reassessment recorded"
            );
            return Ok(());
        }

        let body = serde_json::to_string(&payload)?;
        info!(
            assessment_id = %payload.assessment_id.0,
            payload = %body,
            "reassessment recorded"
        );
        Ok(())
    }
}
