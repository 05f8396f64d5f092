use super::super::catalog::{same_tier, TIER_ONE, TIER_ONE_MAINTENANCE, TIER_THREE, TIER_TWO};
use super::super::domain::{ExperienceLevel, PatientPreference};
use super::policy::{
    maintenance_tier_for, Decision, DoseTarget, MaintainReason, PreferredChange, RuleContext,
    RuleOutcome,
};
use super::AlternativeRecommendation;

/// Adjust a score-matrix outcome to the patient's experience tier.
pub(crate) fn refine(context: &RuleContext<'_>, mut outcome: RuleOutcome) -> RuleOutcome {
    let experience = context.experience;

    if experience.level == ExperienceLevel::Beginner || experience.tel <= 2 {
        refine_beginner(context, &mut outcome);
    } else if experience.level == ExperienceLevel::Intermediate || experience.tel == 3 {
        refine_intermediate(context, &mut outcome);
    } else {
        refine_expert(context, &mut outcome);
    }

    outcome
}

fn refine_beginner(context: &RuleContext<'_>, outcome: &mut RuleOutcome) {
    let tier = context.tier();

    if outcome.decision.is_increase() {
        // never skip past Tier 2 in one step
        let capped = if same_tier(tier, TIER_ONE) || same_tier(tier, TIER_ONE_MAINTENANCE) {
            context.catalog.dose_at_tier(TIER_TWO).map(DoseTarget::from)
        } else {
            None
        };

        if let Some(target) = capped {
            outcome.decision = Decision::Increase {
                target: Some(target),
            };
            outcome.reasoning =
                "Conservative increase recommended for your experience level.".to_string();
        } else if let Some(current) = context.current_dose() {
            outcome.decision = Decision::Maintain {
                at: Some(current),
                reason: MaintainReason::IncreaseCapped,
            };
            outcome.reasoning =
                "Maintaining current dose. Consult physician for further increases.".to_string();
        }
    }

    if same_tier(tier, TIER_ONE) {
        promote_to_maintenance(
            context,
            outcome,
            "Excellent progress on Tier 1. Moving to Tier 1.5 for maintenance is recommended.",
        );
    }
}

fn refine_intermediate(context: &RuleContext<'_>, outcome: &mut RuleOutcome) {
    let tier = context.tier();
    if !same_tier(tier, TIER_TWO) {
        return;
    }

    if outcome.decision.is_increase() {
        if let Some(tier_three) = context.catalog.dose_at_tier(TIER_THREE) {
            outcome.decision = Decision::Increase {
                target: Some(DoseTarget::from(tier_three)),
            };
        }
    }

    promote_to_maintenance(
        context,
        outcome,
        "Excellent progress on Tier 2. Moving to Tier 2.5 for maintenance is recommended.",
    );
}

fn promote_to_maintenance(context: &RuleContext<'_>, outcome: &mut RuleOutcome, reasoning: &str) {
    if !outcome.decision.is_maintain() || !context.maintenance_ready() {
        return;
    }

    let maintenance = maintenance_tier_for(context.tier())
        .and_then(|tier| context.catalog.dose_at_tier(tier))
        .map(DoseTarget::from);
    if let Some(target) = maintenance {
        outcome.decision = Decision::MoveToMaintenance { target };
        outcome.reasoning = reasoning.to_string();
    }
}

fn refine_expert(context: &RuleContext<'_>, outcome: &mut RuleOutcome) {
    let scores = context.scores;
    let tier = context.tier();

    outcome.reasoning = format!(
        "As an experienced user, here's data-driven insight: TRS={:.1}, WLS={}, SES={}, ASS={}, PSS={}. Consider these options:",
        scores.trs, scores.wls, scores.ses, scores.ass, scores.pss
    );

    let current = context.current_dose();
    if let Some(current) = &current {
        outcome.alternatives.push(AlternativeRecommendation {
            recommendation: format!("Continue {}", current.label),
            product_id: current.product_id.clone(),
        });
    }
    for dose in context.catalog.doses() {
        if !same_tier(dose.tier, tier) {
            outcome.alternatives.push(AlternativeRecommendation {
                recommendation: format!("Switch to {}", dose.label),
                product_id: dose.product_id.to_string(),
            });
        }
    }

    let Some(preference) = context.answers.patient_preference else {
        return;
    };
    let preferred = match preference {
        PatientPreference::Increase => context
            .higher_dose()
            .map(|target| (PreferredChange::Increase, target)),
        PatientPreference::Decrease => context
            .lower_dose()
            .map(|target| (PreferredChange::Decrease, target)),
        PatientPreference::Maintain => current.map(|target| (PreferredChange::Maintain, target)),
        PatientPreference::Unsure => None,
    };
    let Some((change, target)) = preferred else {
        return;
    };

    if outcome.decision.is_safety_override() {
        outcome.flags.important.push(format!(
            "Patient preferred {} but system override due to safety/efficacy.",
            preference.label()
        ));
        return;
    }

    outcome.decision = Decision::PatientPreference { change, target };
    outcome.reasoning = format!(
        "Based on your preference and overall assessment. Original system suggestion was different. TRS={:.1}.",
        scores.trs
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::reassessment::catalog::{ReferenceCatalog, TIER_TWO_MAINTENANCE};
    use crate::workflows::reassessment::domain::ExperienceLevelDetails;
    use crate::workflows::reassessment::evaluation::rules::{FlagSet, SideEffectSignals};
    use crate::workflows::reassessment::evaluation::Scores;
    use crate::workflows::reassessment::tests::common::answers;

    fn scores(details: &ExperienceLevelDetails, wls: i8, ses: u8, pss: i8) -> Scores {
        Scores {
            wls,
            ses,
            ass: 0,
            pss,
            tel: details.tel,
            trs: f64::from(wls) * 2.0 - f64::from(ses) * 1.5 + f64::from(pss) * 0.5,
            experience_level: details.level,
            numeric_tier: details.numeric_tier,
        }
    }

    fn increase_outcome() -> RuleOutcome {
        RuleOutcome {
            decision: Decision::Increase { target: None },
            reasoning: "matrix".to_string(),
            alternatives: Vec::new(),
            flags: FlagSet::default(),
            physician_review: false,
            critical_alert: None,
        }
    }

    #[test]
    fn beginner_at_tier_two_is_held_in_place() {
        let catalog = ReferenceCatalog::standard();
        let details = ExperienceLevelDetails {
            level: ExperienceLevel::Beginner,
            tel: 2,
            numeric_tier: TIER_TWO,
            time_on_med_months: 1.0,
        };
        let answers = answers();
        let scores = scores(&details, 1, 0, 1);
        let signals = SideEffectSignals::default();
        let context = RuleContext {
            answers: &answers,
            experience: &details,
            scores: &scores,
            side_effects: &signals,
            catalog: &catalog,
        };

        let refined = refine(&context, increase_outcome());

        assert_eq!(
            refined.decision.summary(),
            "MAINTAIN DOSE at 20 units weekly (0.5mg Semaglutide)"
        );
        assert!(refined.reasoning.contains("Consult physician"));
    }

    #[test]
    fn safety_overrides_keep_priority_over_expert_preference() {
        let catalog = ReferenceCatalog::standard();
        let details = ExperienceLevelDetails {
            level: ExperienceLevel::Expert,
            tel: 4,
            numeric_tier: TIER_TWO_MAINTENANCE,
            time_on_med_months: 6.0,
        };
        let mut answers = answers();
        answers.patient_preference = Some(PatientPreference::Increase);
        let scores = scores(&details, 4, 0, 0);
        let signals = SideEffectSignals::default();
        let context = RuleContext {
            answers: &answers,
            experience: &details,
            scores: &scores,
            side_effects: &signals,
            catalog: &catalog,
        };
        let mut outcome = increase_outcome();
        outcome.decision = Decision::Decrease {
            target: None,
            mandatory: true,
        };

        let refined = refine(&context, outcome);

        assert!(refined.decision.is_safety_override());
        assert_eq!(
            refined.flags.important,
            vec!["Patient preferred increase but system override due to safety/efficacy."]
        );
    }
}
