mod policy;
mod refinement;
mod rules;

pub use policy::{Decision, DoseTarget, MaintainReason, PreferredChange};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::ReferenceCatalog;
use super::domain::{AnswerSet, ExperienceLevel, ExperienceLevelDetails};
use policy::{score_matrix, terminal_outcome, RuleContext};

/// Stateless evaluator that applies the titration protocol to one answer set.
#[derive(Debug, Clone)]
pub struct TitrationEngine {
    catalog: Arc<ReferenceCatalog>,
}

impl TitrationEngine {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn recommend(
        &self,
        answers: &AnswerSet,
        experience: &ExperienceLevelDetails,
    ) -> RecommendationResult {
        let (scores, side_effects) = rules::score_answers(answers, experience, &self.catalog);
        let seeded = rules::seed_flags(answers, &side_effects, &self.catalog);

        let context = RuleContext {
            answers,
            experience,
            scores: &scores,
            side_effects: &side_effects,
            catalog: &self.catalog,
        };

        let outcome = match terminal_outcome(&context) {
            Some(outcome) => outcome,
            None => refinement::refine(&context, score_matrix(&context)),
        };

        let mut safety_flags = seeded.safety;
        safety_flags.extend(outcome.flags.safety);
        let mut important_flags = seeded.important;
        important_flags.extend(outcome.flags.important);
        let mut critical_flags = seeded.critical;
        critical_flags.extend(outcome.flags.critical);

        let requires_physician_review = outcome.physician_review
            || !critical_flags.is_empty()
            || !safety_flags.is_empty()
            || !important_flags.is_empty();

        RecommendationResult {
            primary_recommendation: outcome.decision.summary(),
            primary_product_id: outcome.decision.product_id().map(str::to_string),
            reasoning: outcome.reasoning,
            alternative_recommendations: outcome.alternatives,
            safety_flags,
            important_flags,
            critical_flags,
            requires_physician_review,
            critical_alert: outcome.critical_alert,
            scores,
            decision: outcome.decision,
        }
    }
}

/// Numeric sub-scores and the weighted composite behind a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "WLS")]
    pub wls: i8,
    #[serde(rename = "SES")]
    pub ses: u8,
    #[serde(rename = "ASS")]
    pub ass: i8,
    #[serde(rename = "PSS")]
    pub pss: i8,
    #[serde(rename = "TEL")]
    pub tel: u8,
    #[serde(rename = "TRS")]
    pub trs: f64,
    pub experience_level: ExperienceLevel,
    pub numeric_tier: f64,
}

/// Secondary option shown next to the primary recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeRecommendation {
    pub recommendation: String,
    pub product_id: String,
}

/// Payload that must interrupt the patient-facing flow until acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalAlert {
    pub title: String,
    pub description: String,
}

/// Evaluation output: the rendered recommendation, its audit flags, and the scores behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub primary_recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_product_id: Option<String>,
    pub reasoning: String,
    pub alternative_recommendations: Vec<AlternativeRecommendation>,
    /// Mandatory patient actions.
    pub safety_flags: Vec<String>,
    /// Advisory notes for the reviewing physician.
    pub important_flags: Vec<String>,
    /// Audit-trail severity markers.
    pub critical_flags: Vec<String>,
    pub requires_physician_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_alert: Option<CriticalAlert>,
    pub scores: Scores,
    pub decision: Decision,
}
