use crate::infra::InMemorySubmissionSink;
use chrono::{Local, NaiveDate};
use clap::Args;
use dose_titration::error::AppError;
use dose_titration::workflows::reassessment::{
    AssessmentOutcome, ReassessmentService, ReassessmentServiceError, ReassessmentSubmission,
    ReferenceCatalog,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Questionnaire submission stored as JSON
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Attach or override the patient identifier
    #[arg(long)]
    pub(crate) patient_id: Option<String>,
    /// Print the full submission payload instead of the summary
    #[arg(long)]
    pub(crate) payload: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date of last dose used for every scenario (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) last_dose: Option<NaiveDate>,
    /// Print the submission payload recorded for each scenario.
    #[arg(long)]
    pub(crate) show_payloads: bool,
}

fn service() -> (
    ReassessmentService<InMemorySubmissionSink>,
    Arc<InMemorySubmissionSink>,
) {
    let sink = Arc::new(InMemorySubmissionSink::default());
    let service = ReassessmentService::new(Arc::new(ReferenceCatalog::standard()), sink.clone());
    (service, sink)
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        patient_id,
        payload,
    } = args;

    let raw = std::fs::read_to_string(&input)?;
    let mut submission: ReassessmentSubmission = serde_json::from_str(&raw)?;
    if patient_id.is_some() {
        submission.patient_id = patient_id;
    }

    let (service, sink) = service();
    let outcome = match service.assess(submission) {
        Ok(outcome) => outcome,
        Err(ReassessmentServiceError::Validation(failure)) => {
            println!("Submission rejected ({failure}):");
            for error in &failure.errors {
                println!("  - {}: {}", error.field, error.message);
            }
            return Err(ReassessmentServiceError::Validation(failure).into());
        }
        Err(err) => return Err(err.into()),
    };

    if payload {
        for recorded in sink.payloads() {
            println!("{}", serde_json::to_string_pretty(&recorded)?);
        }
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_catalog() -> Result<(), AppError> {
    let catalog = ReferenceCatalog::standard();
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        last_dose,
        show_payloads,
    } = args;
    let last_dose = last_dose.unwrap_or_else(|| Local::now().date_naive());

    let (service, sink) = service();
    println!("Dose titration reassessment demo");

    for (title, submission) in scenarios(last_dose) {
        println!("\n{title}");
        match service.assess(submission) {
            Ok(outcome) => render_outcome(&outcome),
            Err(err) => println!("  Assessment unavailable: {}", err),
        }
    }

    if show_payloads {
        println!("\nRecorded submission payloads:");
        for payload in sink.payloads() {
            match serde_json::to_string_pretty(&payload) {
                Ok(json) => println!("{}", json),
                Err(err) => println!("  Payload unavailable: {}", err),
            }
        }
    } else {
        println!(
            "\n{} submission payload(s) recorded (pass --show-payloads to print them)",
            sink.payloads().len()
        );
    }

    Ok(())
}

fn render_outcome(outcome: &AssessmentOutcome) {
    let result = &outcome.recommendation;
    println!(
        "- Assessment {} -> {}",
        outcome.assessment_id.0, result.primary_recommendation
    );
    if let Some(product) = &result.primary_product_id {
        println!("  Product: {}", product);
    }
    println!(
        "  Experience: {} (TEL {}, tier {})",
        result.scores.experience_level.label(),
        result.scores.tel,
        result.scores.numeric_tier
    );
    println!(
        "  Scores: WLS {} | SES {} | ASS {} | PSS {} | TRS {:.1}",
        result.scores.wls, result.scores.ses, result.scores.ass, result.scores.pss, result.scores.trs
    );
    println!("  Reasoning: {}", result.reasoning);

    if let Some(alert) = &result.critical_alert {
        println!("  !! {}: {}", alert.title, alert.description);
    }
    for flag in &result.safety_flags {
        println!("  Safety: {}", flag);
    }
    for flag in &result.critical_flags {
        println!("  Critical: {}", flag);
    }
    for flag in &result.important_flags {
        println!("  Important: {}", flag);
    }
    if !result.alternative_recommendations.is_empty() {
        println!("  Alternatives:");
        for alternative in &result.alternative_recommendations {
            println!(
                "    - {} ({})",
                alternative.recommendation, alternative.product_id
            );
        }
    }
    println!(
        "  Physician review: {}",
        if result.requires_physician_review {
            "required"
        } else {
            "not required"
        }
    );
}

fn baseline(last_dose: NaiveDate) -> ReassessmentSubmission {
    ReassessmentSubmission {
        patient_id: Some("DEMO-001".to_string()),
        current_dose: "10units".to_string(),
        time_on_current_medication: "lessthan2months".to_string(),
        date_of_last_dose: Some(last_dose),
        weight_loss_4_weeks: "7-12pounds".to_string(),
        current_weight: Some(214.0),
        side_effects: vec!["No side effects".to_string()],
        appetite_control: "just_right".to_string(),
        food_cravings: "sometimes".to_string(),
        satisfaction_rating: 4,
        missed_doses_4_weeks: Some(0),
        ..ReassessmentSubmission::default()
    }
}

fn scenarios(last_dose: NaiveDate) -> Vec<(&'static str, ReassessmentSubmission)> {
    let fast_beginner = baseline(last_dose);

    let mut emergency = baseline(last_dose);
    emergency.patient_id = Some("DEMO-002".to_string());
    emergency.side_effects = vec![
        "Mild nausea (manageable)".to_string(),
        "Chest pain".to_string(),
    ];

    let mut expert = baseline(last_dose);
    expert.patient_id = Some("DEMO-003".to_string());
    expert.current_dose = "40units".to_string();
    expert.time_on_current_medication = "6plusmonths".to_string();
    expert.weight_loss_4_weeks = "4-6pounds".to_string();
    expert.satisfaction_rating = 3;
    expert.patient_preference = Some("decrease".to_string());

    let mut maintenance = baseline(last_dose);
    maintenance.patient_id = Some("DEMO-004".to_string());
    maintenance.weight_loss_4_weeks = "2-3pounds".to_string();

    let mut vomiting = baseline(last_dose);
    vomiting.patient_id = Some("DEMO-005".to_string());
    vomiting.current_dose = "20units".to_string();
    vomiting.weight_loss_4_weeks = "4-6pounds".to_string();
    vomiting.side_effects = vec!["Significant vomiting".to_string()];
    vomiting.nausea_medication_preference = Some("yes".to_string());

    vec![
        ("Tier 1 beginner losing 7-12 pounds", fast_beginner),
        ("Chest pain reported alongside mild nausea", emergency),
        ("Tier 3 expert asking for a decrease", expert),
        ("Stable Tier 1 beginner", maintenance),
        ("Significant vomiting on Tier 2", vomiting),
    ]
}
