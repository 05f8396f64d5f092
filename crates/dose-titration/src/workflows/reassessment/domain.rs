use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for a completed reassessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Raw questionnaire submission as it arrives from the form or the CLI.
///
/// Every field is optional at this stage; the validator decides what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassessmentSubmission {
    pub patient_id: Option<String>,
    pub current_dose: String,
    pub time_on_current_medication: String,
    pub date_of_last_dose: Option<NaiveDate>,
    pub weight_loss_4_weeks: String,
    pub current_weight: Option<f64>,
    pub side_effects: Vec<String>,
    pub other_side_effect_text: String,
    pub nausea_medication_preference: Option<String>,
    pub appetite_control: String,
    pub food_cravings: String,
    /// `0` means the question was left unanswered.
    pub satisfaction_rating: u8,
    pub missed_doses_4_weeks: Option<i64>,
    pub patient_preference: Option<String>,
    pub weight_gain_efforts: Vec<String>,
}

/// Validated questionnaire answers consumed by the titration engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub current_dose: String,
    pub time_on_current_medication: String,
    pub date_of_last_dose: NaiveDate,
    pub weight_loss_4_weeks: String,
    pub current_weight_lbs: f64,
    pub side_effects: Vec<String>,
    pub other_side_effect_text: String,
    pub nausea_medication_requested: Option<bool>,
    pub appetite_control: String,
    pub food_cravings: String,
    pub satisfaction_rating: u8,
    pub missed_doses_4_weeks: u32,
    pub patient_preference: Option<PatientPreference>,
    pub weight_gain_efforts: Vec<String>,
}

/// Dose change the patient asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientPreference {
    Increase,
    Maintain,
    Decrease,
    Unsure,
}

impl PatientPreference {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "increase" => Some(Self::Increase),
            "maintain" => Some(Self::Maintain),
            "decrease" => Some(Self::Decrease),
            "unsure" => Some(Self::Unsure),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PatientPreference::Increase => "increase",
            PatientPreference::Maintain => "maintain",
            PatientPreference::Decrease => "decrease",
            PatientPreference::Unsure => "unsure",
        }
    }
}

/// How much latitude the engine gives the patient when proposing tier changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Expert => "expert",
        }
    }
}

/// Experience classification derived once per assessment from tier and months on medication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceLevelDetails {
    pub level: ExperienceLevel,
    /// Time-on-current-level ordinal, 1 through 4.
    pub tel: u8,
    pub numeric_tier: f64,
    pub time_on_med_months: f64,
}
