use super::common::*;
use crate::workflows::reassessment::domain::{
    ExperienceLevel, PatientPreference, ReassessmentSubmission,
};
use crate::workflows::reassessment::validation::SubmissionValidator;

fn validator() -> SubmissionValidator {
    SubmissionValidator::new(catalog())
}

#[test]
fn complete_submission_produces_answers_and_experience() {
    let validated = validator()
        .validate(submission())
        .expect("fixture is valid");

    assert_eq!(validated.patient_id.as_deref(), Some("PATIENT_123"));
    assert_eq!(validated.answers, answers());
    assert_eq!(validated.experience.level, ExperienceLevel::Beginner);
    assert_eq!(validated.experience.tel, 1);
}

#[test]
fn empty_submission_reports_every_required_field() {
    let failure = validator()
        .validate(ReassessmentSubmission::default())
        .expect_err("nothing answered");

    let fields: Vec<&str> = failure.errors.iter().map(|error| error.field).collect();
    assert_eq!(
        fields,
        vec![
            "current_dose",
            "time_on_current_medication",
            "date_of_last_dose",
            "weight_loss_4_weeks",
            "current_weight",
            "side_effects",
            "appetite_control",
            "food_cravings",
            "satisfaction_rating",
            "missed_doses_4_weeks",
        ]
    );
    assert_eq!(
        failure.message_for("current_dose"),
        Some("Current dose is required.")
    );
    assert_eq!(failure.to_string(), "10 field(s) failed validation");
}

#[test]
fn weight_must_be_plausible() {
    for weight in [49.9, 500.5, f64::NAN] {
        let mut submission = submission();
        submission.current_weight = Some(weight);

        let failure = validator().validate(submission).expect_err("rejected");
        assert_eq!(
            failure.message_for("current_weight"),
            Some("Weight must be between 50 and 500 lbs.")
        );
    }
}

#[test]
fn negative_missed_doses_are_rejected() {
    let mut submission = submission();
    submission.missed_doses_4_weeks = Some(-1);

    let failure = validator().validate(submission).expect_err("rejected");
    assert_eq!(
        failure.message_for("missed_doses_4_weeks"),
        Some("Missed doses must be a non-negative number.")
    );
}

#[test]
fn oversized_missed_dose_counts_saturate_instead_of_failing() {
    let mut submission = submission();
    submission.missed_doses_4_weeks = Some(i64::from(u32::MAX) + 1);

    let validated = validator().validate(submission).expect("accepted");
    assert_eq!(validated.answers.missed_doses_4_weeks, u32::MAX);
}

#[test]
fn conditional_questions_become_required() {
    let mut submission = submission();
    submission.side_effects = vec!["Moderate nausea".to_string(), "Other".to_string()];
    submission.weight_loss_4_weeks = "gaining_weight".to_string();

    let failure = validator().validate(submission).expect_err("rejected");

    assert_eq!(
        failure.message_for("other_side_effect_text"),
        Some("Please specify other side effects.")
    );
    assert_eq!(
        failure.message_for("weight_gain_efforts"),
        Some("Please select efforts made if gaining weight.")
    );
    assert_eq!(
        failure.message_for("nausea_medication_preference"),
        Some("Nausea medication preference is required.")
    );
}

#[test]
fn non_beginners_must_state_a_dose_preference() {
    let mut submission = submission();
    submission.current_dose = "20units".to_string();
    submission.time_on_current_medication = "3months".to_string();

    let failure = validator()
        .validate(submission.clone())
        .expect_err("preference missing");
    assert_eq!(
        failure.message_for("patient_preference"),
        Some("Dose preference is required for your experience level.")
    );

    submission.patient_preference = Some("Maintain".to_string());
    let validated = validator().validate(submission).expect("preference given");
    assert_eq!(validated.experience.level, ExperienceLevel::Intermediate);
    assert_eq!(
        validated.answers.patient_preference,
        Some(PatientPreference::Maintain)
    );
}

#[test]
fn unknown_dose_codes_are_rejected() {
    let mut submission = submission();
    submission.current_dose = "25units".to_string();

    let failure = validator().validate(submission).expect_err("unknown dose");
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].field, "current_dose");
}

#[test]
fn nausea_preference_is_parsed_as_yes_or_no() {
    let mut submission = submission();
    submission.side_effects = vec!["Moderate nausea".to_string()];
    submission.nausea_medication_preference = Some("yes".to_string());

    let validated = validator().validate(submission.clone()).expect("valid");
    assert_eq!(validated.answers.nausea_medication_requested, Some(true));

    submission.nausea_medication_preference = Some("perhaps".to_string());
    let failure = validator().validate(submission).expect_err("rejected");
    assert_eq!(
        failure.message_for("nausea_medication_preference"),
        Some("Nausea medication preference must be yes or no.")
    );
}

#[test]
fn unscored_answers_must_still_be_catalog_options() {
    let mut submission = submission();
    submission.food_cravings = "constantly".to_string();
    submission.weight_loss_4_weeks = "gaining_weight".to_string();
    submission.weight_gain_efforts = vec!["exercise".to_string(), "fasting".to_string()];

    let failure = validator().validate(submission).expect_err("rejected");
    let fields: Vec<&str> = failure.errors.iter().map(|error| error.field).collect();
    assert_eq!(fields, vec!["food_cravings", "weight_gain_efforts"]);
}
