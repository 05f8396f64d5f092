use serde::{Deserialize, Serialize};

use super::super::catalog::{
    same_tier, DoseOption, ReferenceCatalog, TIER_ONE, TIER_ONE_MAINTENANCE, TIER_TWO,
    TIER_TWO_MAINTENANCE,
};
use super::super::domain::{AnswerSet, ExperienceLevelDetails};
use super::rules::{FlagSet, SideEffectSignals};
use super::{AlternativeRecommendation, CriticalAlert, Scores};

pub(crate) const EMERGENCY_ALERT_TITLE: &str = "Critical Health Alert!";

/// Catalog entry a decision points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseTarget {
    pub label: String,
    pub product_id: String,
    pub tier: f64,
}

impl From<&DoseOption> for DoseTarget {
    fn from(dose: &DoseOption) -> Self {
        Self {
            label: dose.label.to_string(),
            product_id: dose.product_id.to_string(),
            tier: dose.tier,
        }
    }
}

/// Why the engine chose to hold the current tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintainReason {
    Stable,
    Adherence,
    Caution,
    IncreaseCapped,
}

/// Structured titration decision; the patient-facing text is rendered from it by
/// [`Decision::summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    Stop,
    Decrease {
        target: Option<DoseTarget>,
        mandatory: bool,
    },
    Increase {
        target: Option<DoseTarget>,
    },
    Maintain {
        at: Option<DoseTarget>,
        reason: MaintainReason,
    },
    MoveToMaintenance {
        target: DoseTarget,
    },
    PatientPreference {
        change: PreferredChange,
        target: DoseTarget,
    },
    Consult,
}

/// Direction of a patient preference that was promoted to the primary recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredChange {
    Increase,
    Maintain,
    Decrease,
}

impl Decision {
    pub fn summary(&self) -> String {
        match self {
            Decision::Stop => "STOP MEDICATION & SEEK IMMEDIATE MEDICAL CARE".to_string(),
            Decision::Decrease {
                target: Some(target),
                ..
            } => format!("DECREASE DOSE to {}", target.label),
            Decision::Decrease {
                target: None,
                mandatory: true,
            } => "DECREASE DOSE (specifics TBD by physician)".to_string(),
            Decision::Decrease {
                target: None,
                mandatory: false,
            } => "DECREASE DOSE".to_string(),
            Decision::Increase {
                target: Some(target),
            } => format!("INCREASE DOSE to {}", target.label),
            Decision::Increase { target: None } => {
                "INCREASE DOSE (Consider max dose or consult)".to_string()
            }
            Decision::Maintain { at, reason } => match (reason, at) {
                (MaintainReason::Adherence, _) => "MAINTAIN DOSE & FOCUS ON ADHERENCE".to_string(),
                (MaintainReason::Caution, _) => "MAINTAIN DOSE with caution".to_string(),
                (MaintainReason::IncreaseCapped, Some(at)) => {
                    format!("MAINTAIN DOSE at {}", at.label)
                }
                (MaintainReason::Stable | MaintainReason::IncreaseCapped, _) => {
                    "MAINTAIN DOSE".to_string()
                }
            },
            Decision::MoveToMaintenance { target } => {
                format!("MOVE TO MAINTENANCE TIER: {}", target.label)
            }
            Decision::PatientPreference { change, target } => {
                let option = match change {
                    PreferredChange::Increase => format!("Increase to {}", target.label),
                    PreferredChange::Decrease => format!("Decrease to {}", target.label),
                    PreferredChange::Maintain => format!("Maintain {}", target.label),
                };
                format!("PATIENT PREFERENCE: {option}")
            }
            Decision::Consult => "Consult with healthcare provider.".to_string(),
        }
    }

    pub fn product_id(&self) -> Option<&str> {
        match self {
            Decision::Decrease { target, .. } | Decision::Increase { target } => {
                target.as_ref().map(|target| target.product_id.as_str())
            }
            Decision::Maintain { at, .. } => at.as_ref().map(|at| at.product_id.as_str()),
            Decision::MoveToMaintenance { target } | Decision::PatientPreference { target, .. } => {
                Some(target.product_id.as_str())
            }
            Decision::Stop | Decision::Consult => None,
        }
    }

    /// Stops and mandatory decreases are never overridden by patient preference.
    pub fn is_safety_override(&self) -> bool {
        matches!(
            self,
            Decision::Stop
                | Decision::Decrease {
                    mandatory: true,
                    ..
                }
        )
    }

    pub fn is_increase(&self) -> bool {
        matches!(self, Decision::Increase { .. })
    }

    pub fn is_maintain(&self) -> bool {
        matches!(self, Decision::Maintain { .. })
    }
}

/// Read-only inputs shared by every rule.
pub(crate) struct RuleContext<'a> {
    pub answers: &'a AnswerSet,
    pub experience: &'a ExperienceLevelDetails,
    pub scores: &'a Scores,
    pub side_effects: &'a SideEffectSignals,
    pub catalog: &'a ReferenceCatalog,
}

impl RuleContext<'_> {
    pub fn tier(&self) -> f64 {
        self.experience.numeric_tier
    }

    pub fn current_dose(&self) -> Option<DoseTarget> {
        self.catalog.dose_at_tier(self.tier()).map(DoseTarget::from)
    }

    pub fn lower_dose(&self) -> Option<DoseTarget> {
        self.catalog.next_lower_dose(self.tier()).map(DoseTarget::from)
    }

    pub fn higher_dose(&self) -> Option<DoseTarget> {
        self.catalog.next_higher_dose(self.tier()).map(DoseTarget::from)
    }

    /// Stable, content patient with negligible side effects.
    pub fn maintenance_ready(&self) -> bool {
        self.scores.wls == 0 && self.scores.pss >= 1 && self.scores.ses <= 1
    }
}

/// Result of a single rule, merged with the seeded flags by the engine.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleOutcome {
    pub decision: Decision,
    pub reasoning: String,
    pub alternatives: Vec<AlternativeRecommendation>,
    pub flags: FlagSet,
    pub physician_review: bool,
    pub critical_alert: Option<CriticalAlert>,
}

impl RuleOutcome {
    fn new(decision: Decision, reasoning: impl Into<String>) -> Self {
        Self {
            decision,
            reasoning: reasoning.into(),
            alternatives: Vec::new(),
            flags: FlagSet::default(),
            physician_review: false,
            critical_alert: None,
        }
    }

    fn with_review(mut self) -> Self {
        self.physician_review = true;
        self
    }
}

type TerminalRule = fn(&RuleContext<'_>) -> Option<RuleOutcome>;

/// Safety overrides and the adherence gate, in priority order.
const TERMINAL_RULES: [TerminalRule; 4] = [
    emergency_override,
    dangerous_weight_loss,
    significant_vomiting,
    adherence_gate,
];

pub(crate) fn terminal_outcome(context: &RuleContext<'_>) -> Option<RuleOutcome> {
    TERMINAL_RULES.iter().find_map(|rule| rule(context))
}

fn emergency_override(context: &RuleContext<'_>) -> Option<RuleOutcome> {
    if !context.side_effects.severe_symptom && context.scores.ses < 5 {
        return None;
    }

    let mut outcome = RuleOutcome::new(
        Decision::Stop,
        "Severe symptoms reported (e.g., chest pain, severe dizziness). This requires immediate medical attention.",
    )
    .with_review();
    outcome.flags.safety.extend([
        "Discontinue medication immediately.".to_string(),
        "Contact your doctor or emergency services.".to_string(),
    ]);
    outcome
        .flags
        .critical
        .push("Severe symptoms reported - Emergency Protocol Triggered".to_string());
    outcome.critical_alert = Some(CriticalAlert {
        title: EMERGENCY_ALERT_TITLE.to_string(),
        description: "You've reported severe symptoms. Please stop your medication and seek immediate medical attention from your doctor or emergency services.".to_string(),
    });
    Some(outcome)
}

fn dangerous_weight_loss(context: &RuleContext<'_>) -> Option<RuleOutcome> {
    if context.scores.wls < 4 {
        return None;
    }

    let mut outcome = RuleOutcome::new(
        Decision::Decrease {
            target: context.lower_dose(),
            mandatory: true,
        },
        "Weight loss is dangerously fast. Dose decrease is required. Medical consultation needed.",
    )
    .with_review();
    outcome.flags.safety.push(
        "Your weight loss rate is very high. A dose decrease and medical consultation are mandatory."
            .to_string(),
    );
    outcome
        .flags
        .critical
        .push("Dangerously fast weight loss - Medical Consultation Required".to_string());
    Some(outcome)
}

fn significant_vomiting(context: &RuleContext<'_>) -> Option<RuleOutcome> {
    if !context.side_effects.significant_vomiting || context.scores.ses != 4 {
        return None;
    }

    let mut outcome = RuleOutcome::new(
        Decision::Decrease {
            target: context.lower_dose(),
            mandatory: true,
        },
        "Significant vomiting reported. Dose decrease is required. Consider anti-nausea medication.",
    )
    .with_review();
    outcome.flags.safety.push(
        "Significant vomiting requires a dose decrease. Your physician may also prescribe anti-nausea medication."
            .to_string(),
    );
    outcome
        .flags
        .critical
        .push("Significant vomiting - Dose Decrease & Anti-Nausea Offered".to_string());
    if context.answers.nausea_medication_requested == Some(true) {
        outcome
            .flags
            .important
            .push("Patient requested nausea medication.".to_string());
    }
    Some(outcome)
}

fn adherence_gate(context: &RuleContext<'_>) -> Option<RuleOutcome> {
    let missed = context.answers.missed_doses_4_weeks;
    if context.scores.wls > -1 || missed <= 2 {
        return None;
    }

    let mut outcome = RuleOutcome::new(
        Decision::Maintain {
            at: context.current_dose(),
            reason: MaintainReason::Adherence,
        },
        format!(
            "You've missed {missed} doses. Consistent medication use is key before considering a dose change."
        ),
    );
    outcome
        .flags
        .safety
        .push("Focus on taking your medication as prescribed for the next 4 weeks.".to_string());
    Some(outcome)
}

/// Score-based decision; always yields a result, falling back to a consultation.
pub(crate) fn score_matrix(context: &RuleContext<'_>) -> RuleOutcome {
    let Scores { wls, ses, trs, .. } = *context.scores;

    if trs >= 4.0 && wls >= 3 {
        return RuleOutcome::new(
            Decision::Decrease {
                target: context.lower_dose(),
                mandatory: false,
            },
            "Weight loss is progressing very quickly. A dose decrease is recommended.",
        )
        .with_review();
    }

    if (2.0..4.0).contains(&trs) && (1..=2).contains(&wls) && ses <= 2 {
        return RuleOutcome::new(
            Decision::Increase {
                target: context.higher_dose(),
            },
            "Good progress with tolerable side effects. An increase may optimize results.",
        );
    }

    if (-1.0..2.0).contains(&trs) && (0..=1).contains(&wls) && ses <= 1 {
        return stable_maintenance(context);
    }

    if trs < -1.0 && wls <= 0 && ses <= 2 {
        return RuleOutcome::new(
            Decision::Increase {
                target: context.higher_dose(),
            },
            "Progress seems insufficient. An increase may be beneficial, provided adherence is good.",
        );
    }

    if (3..5).contains(&ses) {
        return cautious_decrease(context);
    }

    RuleOutcome::new(Decision::Consult, "Standard consultation needed.")
}

fn stable_maintenance(context: &RuleContext<'_>) -> RuleOutcome {
    let mut outcome = RuleOutcome::new(
        Decision::Maintain {
            at: context.current_dose(),
            reason: MaintainReason::Stable,
        },
        "You're in an ideal range. Let's maintain this effective level.",
    );

    if context.maintenance_ready() {
        outcome.reasoning.push_str(
            " This is a perfect state for maintenance. Consider a maintenance tier if available.",
        );
        let maintenance = maintenance_tier_for(context.tier())
            .and_then(|tier| context.catalog.dose_at_tier(tier));
        if let Some(dose) = maintenance {
            outcome.alternatives.push(AlternativeRecommendation {
                recommendation: format!("Move to Maintenance {}", dose.label),
                product_id: dose.product_id.to_string(),
            });
        }
    }

    outcome
}

fn cautious_decrease(context: &RuleContext<'_>) -> RuleOutcome {
    let reasoning =
        "Side effects are concerning. Consider decreasing dose or maintaining with close monitoring.";
    let current = context.current_dose();

    match context.lower_dose() {
        Some(lower) => {
            let mut outcome = RuleOutcome::new(
                Decision::Decrease {
                    target: Some(lower),
                    mandatory: false,
                },
                reasoning,
            )
            .with_review();
            if let Some(current) = current {
                outcome.alternatives.push(AlternativeRecommendation {
                    recommendation: format!("MAINTAIN {} with caution", current.label),
                    product_id: current.product_id,
                });
            }
            outcome
        }
        None => RuleOutcome::new(
            Decision::Maintain {
                at: current,
                reason: MaintainReason::Caution,
            },
            reasoning,
        )
        .with_review(),
    }
}

/// Half-step maintenance variant of an integer ramp tier.
pub(crate) fn maintenance_tier_for(tier: f64) -> Option<f64> {
    if same_tier(tier, TIER_ONE) {
        Some(TIER_ONE_MAINTENANCE)
    } else if same_tier(tier, TIER_TWO) {
        Some(TIER_TWO_MAINTENANCE)
    } else {
        None
    }
}
