//! Dose-titration reassessment: reference tables, scoring, the decision waterfall, and the
//! validator/sink/service/router plumbing around them.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod experience;
pub mod router;
pub mod service;
pub mod sink;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{DoseOption, OptionFlag, ReferenceCatalog};
pub use domain::{
    AnswerSet, AssessmentId, ExperienceLevel, ExperienceLevelDetails, PatientPreference,
    ReassessmentSubmission,
};
pub use evaluation::{
    AlternativeRecommendation, CriticalAlert, Decision, DoseTarget, MaintainReason,
    PreferredChange, RecommendationResult, Scores, TitrationEngine,
};
pub use experience::classify_experience;
pub use router::reassessment_router;
pub use service::{AssessmentOutcome, ReassessmentService, ReassessmentServiceError};
pub use sink::{SinkError, SubmissionPayload, SubmissionSink, TracingSubmissionSink};
pub use validation::{FieldError, SubmissionValidator, ValidatedAssessment, ValidationFailure};
