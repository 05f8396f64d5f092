//! End-to-end coverage for the reassessment workflow.
//!
//! Scenarios run through the public service facade and HTTP router only, the way the API binary
//! consumes the crate.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use dose_titration::workflows::reassessment::{
        ReassessmentService, ReassessmentSubmission, ReferenceCatalog, SinkError,
        SubmissionPayload, SubmissionSink,
    };

    pub(super) fn submission() -> ReassessmentSubmission {
        ReassessmentSubmission {
            patient_id: Some("PATIENT_777".to_string()),
            current_dose: "40units".to_string(),
            time_on_current_medication: "6plusmonths".to_string(),
            date_of_last_dose: NaiveDate::from_ymd_opt(2026, 10, 12),
            weight_loss_4_weeks: "4-6pounds".to_string(),
            current_weight: Some(188.0),
            side_effects: vec!["No side effects".to_string()],
            appetite_control: "just_right".to_string(),
            food_cravings: "not_really".to_string(),
            satisfaction_rating: 3,
            missed_doses_4_weeks: Some(1),
            patient_preference: Some("decrease".to_string()),
            ..ReassessmentSubmission::default()
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingSink {
        payloads: Mutex<Vec<SubmissionPayload>>,
    }

    impl RecordingSink {
        pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
            self.payloads.lock().expect("sink mutex poisoned").clone()
        }
    }

    impl SubmissionSink for RecordingSink {
        fn record(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
            self.payloads
                .lock()
                .expect("sink mutex poisoned")
                .push(payload);
            Ok(())
        }
    }

    pub(super) fn service() -> (Arc<ReassessmentService<RecordingSink>>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let service = ReassessmentService::new(Arc::new(ReferenceCatalog::standard()), sink.clone());
        (Arc::new(service), sink)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use dose_titration::workflows::reassessment::{
    reassessment_router, Decision, PreferredChange, ReassessmentServiceError,
};
use serde_json::{json, Value};
use tower::ServiceExt;

#[test]
fn expert_preference_flows_into_the_recorded_payload() {
    let (service, sink) = common::service();

    let outcome = service.assess(common::submission()).expect("assessment succeeds");

    assert_eq!(
        outcome.recommendation.primary_recommendation,
        "PATIENT PREFERENCE: Decrease to 30 units weekly (0.75mg Semaglutide)"
    );
    assert!(matches!(
        outcome.recommendation.decision,
        Decision::PatientPreference {
            change: PreferredChange::Decrease,
            ..
        }
    ));

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].patient_id.as_deref(), Some("PATIENT_777"));
    assert_eq!(payloads[0].current_tier_mapped, "Tier 3");
    assert_eq!(
        payloads[0].recommendation.primary_product_id.as_deref(),
        Some("T2_MAINTAIN")
    );
}

#[test]
fn expert_without_a_preference_is_rejected() {
    let (service, sink) = common::service();
    let mut submission = common::submission();
    submission.patient_preference = None;

    match service.assess(submission) {
        Err(ReassessmentServiceError::Validation(failure)) => {
            assert_eq!(failure.errors[0].field, "patient_preference");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(sink.payloads().is_empty());
}

#[tokio::test]
async fn router_serves_assessments_end_to_end() {
    let (service, sink) = common::service();
    let router = reassessment_router(service);

    let mut submission = common::submission();
    submission.weight_loss_4_weeks = "gt20pounds".to_string();

    let response = router
        .oneshot(
            Request::post("/api/v1/reassessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&submission).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");

    assert_eq!(
        payload["recommendation"]["primary_recommendation"],
        json!("DECREASE DOSE to 30 units weekly (0.75mg Semaglutide)")
    );
    assert_eq!(payload["recommendation"]["requires_physician_review"], json!(true));
    assert!(payload["recommendation"]["important_flags"]
        .as_array()
        .is_some_and(|flags| flags.is_empty()));
    assert_eq!(sink.payloads().len(), 1);
}
