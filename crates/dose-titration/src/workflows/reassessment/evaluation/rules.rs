use super::super::catalog::{OptionFlag, ReferenceCatalog, NO_SIDE_EFFECTS, SIGNIFICANT_VOMITING};
use super::super::domain::{AnswerSet, ExperienceLevelDetails};
use super::Scores;

pub(crate) const WLS_WEIGHT: f64 = 2.0;
pub(crate) const SES_WEIGHT: f64 = -1.5;
pub(crate) const ASS_WEIGHT: f64 = 1.0;
pub(crate) const PSS_WEIGHT: f64 = 0.5;

/// Severity reading over the selected side effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SideEffectSignals {
    pub score: u8,
    pub critical_labels: Vec<String>,
    pub significant_vomiting: bool,
    pub severe_symptom: bool,
}

/// Flags collected before and during rule evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FlagSet {
    pub safety: Vec<String>,
    pub important: Vec<String>,
    pub critical: Vec<String>,
}

pub(crate) fn weight_loss_score(catalog: &ReferenceCatalog, value: &str) -> i8 {
    catalog.weight_loss(value).map(|option| option.wls).unwrap_or(0)
}

/// Worst selected severity, never a sum.
///
/// "No side effects" pins the score to zero even when other codes are present. The
/// critical-label, vomiting and severe-symptom signals still read every selection so a
/// contradictory answer cannot hide an emergency.
pub(crate) fn side_effect_signals(
    catalog: &ReferenceCatalog,
    selections: &[String],
) -> SideEffectSignals {
    let mut signals = SideEffectSignals::default();
    let mut worst = 0;

    for value in selections {
        if value == SIGNIFICANT_VOMITING {
            signals.significant_vomiting = true;
        }
        let Some(option) = catalog.side_effect(value) else {
            continue;
        };
        worst = worst.max(option.ses);
        if option.flag == Some(OptionFlag::Critical) {
            signals.critical_labels.push(option.label.to_string());
        }
        if option.ses == 5 {
            signals.severe_symptom = true;
        }
    }

    let declared_none = selections.iter().any(|value| value == NO_SIDE_EFFECTS);
    signals.score = if declared_none { 0 } else { worst };
    signals
}

pub(crate) fn appetite_score(catalog: &ReferenceCatalog, value: &str) -> i8 {
    catalog.appetite(value).map(|option| option.ass).unwrap_or(0)
}

pub(crate) fn satisfaction_score(catalog: &ReferenceCatalog, rating: u8) -> i8 {
    catalog
        .satisfaction(rating)
        .map(|option| option.pss)
        .unwrap_or(0)
}

pub(crate) fn total_response_score(wls: i8, ses: u8, ass: i8, pss: i8) -> f64 {
    f64::from(wls) * WLS_WEIGHT
        + f64::from(ses) * SES_WEIGHT
        + f64::from(ass) * ASS_WEIGHT
        + f64::from(pss) * PSS_WEIGHT
}

pub(crate) fn score_answers(
    answers: &AnswerSet,
    experience: &ExperienceLevelDetails,
    catalog: &ReferenceCatalog,
) -> (Scores, SideEffectSignals) {
    let wls = weight_loss_score(catalog, &answers.weight_loss_4_weeks);
    let side_effects = side_effect_signals(catalog, &answers.side_effects);
    let ass = appetite_score(catalog, &answers.appetite_control);
    let pss = satisfaction_score(catalog, answers.satisfaction_rating);
    let trs = total_response_score(wls, side_effects.score, ass, pss);

    let scores = Scores {
        wls,
        ses: side_effects.score,
        ass,
        pss,
        tel: experience.tel,
        trs,
        experience_level: experience.level,
        numeric_tier: experience.numeric_tier,
    };

    (scores, side_effects)
}

/// Flags implied by the answers themselves, independent of the final decision.
pub(crate) fn seed_flags(
    answers: &AnswerSet,
    side_effects: &SideEffectSignals,
    catalog: &ReferenceCatalog,
) -> FlagSet {
    let mut flags = FlagSet {
        critical: side_effects.critical_labels.clone(),
        ..FlagSet::default()
    };

    if let Some(option) = catalog.weight_loss(&answers.weight_loss_4_weeks) {
        match option.flag {
            Some(OptionFlag::Important) => flags
                .important
                .push(format!("Weight loss: {}", option.label)),
            Some(OptionFlag::Critical) => flags
                .critical
                .push(format!("Weight loss: {}", option.label)),
            None => {}
        }
    }

    if let Some(option) = catalog.appetite(&answers.appetite_control) {
        if option.flag == Some(OptionFlag::Important) {
            flags.important.push(format!("Appetite: {}", option.label));
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selections(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn side_effect_score_is_the_maximum_not_the_sum() {
        let catalog = ReferenceCatalog::standard();
        let signals = side_effect_signals(
            &catalog,
            &selections(&["Mild nausea (manageable)", "Moderate nausea", "Other"]),
        );
        assert_eq!(signals.score, 2);
        assert!(signals.critical_labels.is_empty());
        assert!(!signals.severe_symptom);
    }

    #[test]
    fn unknown_codes_score_zero() {
        let catalog = ReferenceCatalog::standard();
        assert_eq!(weight_loss_score(&catalog, "lost-a-lot"), 0);
        assert_eq!(appetite_score(&catalog, "ravenous"), 0);
        assert_eq!(satisfaction_score(&catalog, 9), 0);
        assert_eq!(side_effect_signals(&catalog, &selections(&["Hiccups"])).score, 0);
    }

    #[test]
    fn critical_effects_collect_their_long_labels() {
        let catalog = ReferenceCatalog::standard();
        let signals = side_effect_signals(
            &catalog,
            &selections(&["Significant vomiting", "Dizziness (severe or causing falls)"]),
        );
        assert_eq!(signals.score, 4);
        assert!(signals.significant_vomiting);
        assert_eq!(
            signals.critical_labels,
            vec![
                "Significant vomiting (e.g., multiple times a day, unable to keep fluids down)"
                    .to_string(),
                "Dizziness (severe or causing falls)".to_string(),
            ]
        );
    }

    #[test]
    fn declaring_no_side_effects_pins_the_score_but_keeps_emergency_signals() {
        let catalog = ReferenceCatalog::standard();
        let signals =
            side_effect_signals(&catalog, &selections(&["No side effects", "Chest pain"]));
        assert_eq!(signals.score, 0);
        assert!(signals.severe_symptom);
    }

    #[test]
    fn total_response_score_weights_each_dimension() {
        assert_eq!(total_response_score(2, 0, 0, 1), 4.5);
        assert_eq!(total_response_score(-2, 4, 3, -2), -8.0);
        assert_eq!(total_response_score(1, 1, -1, 0), -0.5);
    }
}
