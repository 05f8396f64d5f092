use std::sync::Arc;

use serde::Serialize;

use super::catalog::{
    ReferenceCatalog, GAINING_WEIGHT, MODERATE_NAUSEA, OTHER_SIDE_EFFECT, SIGNIFICANT_VOMITING,
};
use super::domain::{
    AnswerSet, ExperienceLevel, ExperienceLevelDetails, PatientPreference, ReassessmentSubmission,
};

const MIN_WEIGHT_LBS: f64 = 50.0;
const MAX_WEIGHT_LBS: f64 = 500.0;

/// One rejected questionnaire field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field error found in a submission, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

/// Submission that passed validation, ready for the titration engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAssessment {
    pub patient_id: Option<String>,
    pub answers: AnswerSet,
    pub experience: ExperienceLevelDetails,
}

/// Form-level checks turning a raw submission into an answer set.
#[derive(Debug, Clone)]
pub struct SubmissionValidator {
    catalog: Arc<ReferenceCatalog>,
}

impl SubmissionValidator {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn validate(
        &self,
        submission: ReassessmentSubmission,
    ) -> Result<ValidatedAssessment, ValidationFailure> {
        let mut errors = Vec::new();
        let mut reject = |field: &'static str, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        };

        if blank(&submission.current_dose) {
            reject("current_dose", "Current dose is required.");
        } else if self.catalog.dose(&submission.current_dose).is_none() {
            reject("current_dose", "Current dose is not a recognised option.");
        }

        if blank(&submission.time_on_current_medication) {
            reject(
                "time_on_current_medication",
                "Time on current medication is required.",
            );
        } else if self
            .catalog
            .time_on_medication(&submission.time_on_current_medication)
            .is_none()
        {
            reject(
                "time_on_current_medication",
                "Time on current medication is not a recognised option.",
            );
        }

        if submission.date_of_last_dose.is_none() {
            reject("date_of_last_dose", "Date of last dose is required.");
        }

        if blank(&submission.weight_loss_4_weeks) {
            reject(
                "weight_loss_4_weeks",
                "Weight loss information is required.",
            );
        }

        match submission.current_weight {
            None => reject("current_weight", "Current weight is required."),
            Some(weight)
                if !weight.is_finite() || !(MIN_WEIGHT_LBS..=MAX_WEIGHT_LBS).contains(&weight) =>
            {
                reject("current_weight", "Weight must be between 50 and 500 lbs.")
            }
            Some(_) => {}
        }

        if submission.side_effects.is_empty() {
            reject("side_effects", "Please select your side effect status.");
        }
        if submission
            .side_effects
            .iter()
            .any(|value| value == OTHER_SIDE_EFFECT)
            && blank(&submission.other_side_effect_text)
        {
            reject(
                "other_side_effect_text",
                "Please specify other side effects.",
            );
        }

        if blank(&submission.appetite_control) {
            reject(
                "appetite_control",
                "Appetite control information is required.",
            );
        }
        if blank(&submission.food_cravings) {
            reject("food_cravings", "Food cravings information is required.");
        } else if self.catalog.food_craving(&submission.food_cravings).is_none() {
            reject(
                "food_cravings",
                "Food cravings answer is not a recognised option.",
            );
        }

        match submission.satisfaction_rating {
            0 => reject("satisfaction_rating", "Patient satisfaction is required."),
            1..=5 => {}
            _ => reject(
                "satisfaction_rating",
                "Patient satisfaction must be between 1 and 5.",
            ),
        }

        let missed_doses = match submission.missed_doses_4_weeks {
            None => {
                reject(
                    "missed_doses_4_weeks",
                    "Information on missed doses is required.",
                );
                None
            }
            Some(count) if count < 0 => {
                reject(
                    "missed_doses_4_weeks",
                    "Missed doses must be a non-negative number.",
                );
                None
            }
            // any count past the adherence threshold reads the same
            Some(count) => Some(u32::try_from(count).unwrap_or(u32::MAX)),
        };

        let experience = self.catalog.experience_for(
            &submission.current_dose,
            &submission.time_on_current_medication,
        );

        let preference = match answered(&submission.patient_preference) {
            None => None,
            Some(value) => match PatientPreference::parse(value) {
                Some(preference) => Some(preference),
                None => {
                    reject(
                        "patient_preference",
                        "Dose preference is not a recognised option.",
                    );
                    None
                }
            },
        };
        let needs_preference = experience
            .map(|details| details.level != ExperienceLevel::Beginner)
            .unwrap_or(false);
        if needs_preference && answered(&submission.patient_preference).is_none() {
            reject(
                "patient_preference",
                "Dose preference is required for your experience level.",
            );
        }

        if submission.weight_loss_4_weeks == GAINING_WEIGHT
            && submission.weight_gain_efforts.is_empty()
        {
            reject(
                "weight_gain_efforts",
                "Please select efforts made if gaining weight.",
            );
        }
        if submission
            .weight_gain_efforts
            .iter()
            .any(|effort| self.catalog.weight_gain_effort(effort).is_none())
        {
            reject(
                "weight_gain_efforts",
                "Weight gain efforts contain an unrecognised option.",
            );
        }

        let asks_nausea_medication = submission
            .side_effects
            .iter()
            .any(|value| value == MODERATE_NAUSEA || value == SIGNIFICANT_VOMITING);
        let nausea_answer = answered(&submission.nausea_medication_preference);
        let nausea_medication_requested = match nausea_answer.map(parse_yes_no) {
            None => None,
            Some(Some(requested)) => Some(requested),
            Some(None) => {
                reject(
                    "nausea_medication_preference",
                    "Nausea medication preference must be yes or no.",
                );
                None
            }
        };
        if asks_nausea_medication && nausea_answer.is_none() {
            reject(
                "nausea_medication_preference",
                "Nausea medication preference is required.",
            );
        }

        let (Some(experience), Some(date_of_last_dose), Some(current_weight_lbs), Some(missed)) = (
            experience,
            submission.date_of_last_dose,
            submission.current_weight,
            missed_doses,
        ) else {
            return Err(ValidationFailure { errors });
        };
        if !errors.is_empty() {
            return Err(ValidationFailure { errors });
        }

        let answers = AnswerSet {
            current_dose: submission.current_dose,
            time_on_current_medication: submission.time_on_current_medication,
            date_of_last_dose,
            weight_loss_4_weeks: submission.weight_loss_4_weeks,
            current_weight_lbs,
            side_effects: submission.side_effects,
            other_side_effect_text: submission.other_side_effect_text,
            nausea_medication_requested,
            appetite_control: submission.appetite_control,
            food_cravings: submission.food_cravings,
            satisfaction_rating: submission.satisfaction_rating,
            missed_doses_4_weeks: missed,
            patient_preference: preference,
            weight_gain_efforts: submission.weight_gain_efforts,
        };

        Ok(ValidatedAssessment {
            patient_id: submission
                .patient_id
                .filter(|id| !id.trim().is_empty()),
            answers,
            experience,
        })
    }
}

fn answered(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}
