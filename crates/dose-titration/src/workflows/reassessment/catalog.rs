use serde::Serialize;

use super::domain::ExperienceLevelDetails;
use super::experience::classify_experience;

pub const TIER_ONE: f64 = 1.0;
pub const TIER_ONE_MAINTENANCE: f64 = 1.5;
pub const TIER_TWO: f64 = 2.0;
pub const TIER_TWO_MAINTENANCE: f64 = 2.5;
pub const TIER_THREE: f64 = 3.0;
pub const MICRODOSE_TIER: f64 = 0.5;

pub const NO_SIDE_EFFECTS: &str = "No side effects";
pub const MODERATE_NAUSEA: &str = "Moderate nausea";
pub const SIGNIFICANT_VOMITING: &str = "Significant vomiting";
pub const OTHER_SIDE_EFFECT: &str = "Other";
pub const GAINING_WEIGHT: &str = "gaining_weight";

/// Severity marker attached to a questionnaire option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionFlag {
    Important,
    Critical,
}

/// One rung of the dose ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseOption {
    pub value: &'static str,
    pub label: &'static str,
    pub tier: f64,
    pub tier_name: &'static str,
    pub product_id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOnMedicationOption {
    pub value: &'static str,
    pub label: &'static str,
    pub months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightLossOption {
    pub value: &'static str,
    pub label: &'static str,
    pub wls: i8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<OptionFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideEffectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub ses: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<OptionFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppetiteOption {
    pub value: &'static str,
    pub label: &'static str,
    pub ass: i8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<OptionFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionOption {
    pub rating: u8,
    pub label: &'static str,
    pub pss: i8,
}

/// Unscored multiple-choice answer (food cravings, preferences, efforts).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Read-only lookup tables for one titration protocol.
///
/// The catalog is an explicit value handed to the engine and validator; nothing in the crate
/// reaches for a global table.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceCatalog {
    doses: Vec<DoseOption>,
    time_on_medication: Vec<TimeOnMedicationOption>,
    weight_loss: Vec<WeightLossOption>,
    side_effects: Vec<SideEffectOption>,
    appetite_control: Vec<AppetiteOption>,
    food_cravings: Vec<ChoiceOption>,
    satisfaction: Vec<SatisfactionOption>,
    patient_preferences: Vec<ChoiceOption>,
    weight_gain_efforts: Vec<ChoiceOption>,
}

impl ReferenceCatalog {
    /// Semaglutide ramp/maintenance protocol.
    pub fn standard() -> Self {
        Self {
            doses: standard_doses(),
            time_on_medication: standard_time_on_medication(),
            weight_loss: standard_weight_loss(),
            side_effects: standard_side_effects(),
            appetite_control: standard_appetite_control(),
            food_cravings: vec![
                ChoiceOption {
                    value: "not_really",
                    label: "Not really",
                },
                ChoiceOption {
                    value: "sometimes",
                    label: "Sometimes",
                },
                ChoiceOption {
                    value: "quite_often",
                    label: "Quite often",
                },
            ],
            satisfaction: standard_satisfaction(),
            patient_preferences: vec![
                ChoiceOption {
                    value: "increase",
                    label: "Increase my dose",
                },
                ChoiceOption {
                    value: "maintain",
                    label: "Stay at the same dose",
                },
                ChoiceOption {
                    value: "decrease",
                    label: "Decrease my dose",
                },
                ChoiceOption {
                    value: "unsure",
                    label: "I'm not sure, please recommend",
                },
            ],
            weight_gain_efforts: vec![
                ChoiceOption {
                    value: "dietician",
                    label: "Seen a dietician",
                },
                ChoiceOption {
                    value: "calories",
                    label: "Decreased calorie intake",
                },
                ChoiceOption {
                    value: "exercise",
                    label: "Started exercise program",
                },
                ChoiceOption {
                    value: "stress",
                    label: "Working on stress management",
                },
                ChoiceOption {
                    value: "none",
                    label: "None of the above",
                },
            ],
        }
    }

    /// Replace the dose ladder, keeping every other table.
    pub fn with_doses(mut self, doses: Vec<DoseOption>) -> Self {
        self.doses = doses;
        self
    }

    pub fn doses(&self) -> &[DoseOption] {
        &self.doses
    }

    pub fn dose(&self, value: &str) -> Option<&DoseOption> {
        self.doses.iter().find(|dose| dose.value == value)
    }

    pub fn dose_at_tier(&self, tier: f64) -> Option<&DoseOption> {
        self.doses.iter().find(|dose| same_tier(dose.tier, tier))
    }

    /// Entry with the smallest tier strictly above `tier`, regardless of list order.
    pub fn next_higher_dose(&self, tier: f64) -> Option<&DoseOption> {
        self.doses
            .iter()
            .filter(|dose| dose.tier > tier && !same_tier(dose.tier, tier))
            .min_by(|a, b| a.tier.total_cmp(&b.tier))
    }

    /// Entry with the largest tier strictly below `tier`, regardless of list order.
    pub fn next_lower_dose(&self, tier: f64) -> Option<&DoseOption> {
        self.doses
            .iter()
            .filter(|dose| dose.tier < tier && !same_tier(dose.tier, tier))
            .max_by(|a, b| a.tier.total_cmp(&b.tier))
    }

    pub fn time_on_medication(&self, value: &str) -> Option<&TimeOnMedicationOption> {
        self.time_on_medication
            .iter()
            .find(|option| option.value == value)
    }

    pub fn weight_loss(&self, value: &str) -> Option<&WeightLossOption> {
        self.weight_loss.iter().find(|option| option.value == value)
    }

    pub fn side_effect(&self, value: &str) -> Option<&SideEffectOption> {
        self.side_effects.iter().find(|option| option.value == value)
    }

    pub fn appetite(&self, value: &str) -> Option<&AppetiteOption> {
        self.appetite_control
            .iter()
            .find(|option| option.value == value)
    }

    pub fn food_craving(&self, value: &str) -> Option<&ChoiceOption> {
        self.food_cravings.iter().find(|option| option.value == value)
    }

    pub fn satisfaction(&self, rating: u8) -> Option<&SatisfactionOption> {
        self.satisfaction
            .iter()
            .find(|option| option.rating == rating)
    }

    pub fn weight_gain_effort(&self, value: &str) -> Option<&ChoiceOption> {
        self.weight_gain_efforts
            .iter()
            .find(|option| option.value == value)
    }

    pub fn weight_loss_options(&self) -> &[WeightLossOption] {
        &self.weight_loss
    }

    pub fn side_effect_options(&self) -> &[SideEffectOption] {
        &self.side_effects
    }

    pub fn appetite_options(&self) -> &[AppetiteOption] {
        &self.appetite_control
    }

    pub fn satisfaction_options(&self) -> &[SatisfactionOption] {
        &self.satisfaction
    }

    /// Classify experience from raw questionnaire codes; `None` when either code is unknown.
    pub fn experience_for(
        &self,
        dose_value: &str,
        time_value: &str,
    ) -> Option<ExperienceLevelDetails> {
        let dose = self.dose(dose_value)?;
        let time = self.time_on_medication(time_value)?;
        Some(classify_experience(dose.tier, time.months))
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

pub(crate) fn same_tier(left: f64, right: f64) -> bool {
    (left - right).abs() < f64::EPSILON
}

fn standard_doses() -> Vec<DoseOption> {
    vec![
        DoseOption {
            value: "10units",
            label: "10 units weekly (0.25mg Semaglutide)",
            tier: TIER_ONE,
            tier_name: "Tier 1",
            product_id: "T1_RAMP",
        },
        DoseOption {
            value: "15units",
            label: "15 units weekly (0.38mg Semaglutide)",
            tier: TIER_ONE_MAINTENANCE,
            tier_name: "Tier 1.5",
            product_id: "T1_MAINTAIN",
        },
        DoseOption {
            value: "20units",
            label: "20 units weekly (0.5mg Semaglutide)",
            tier: TIER_TWO,
            tier_name: "Tier 2",
            product_id: "T2_RAMP",
        },
        DoseOption {
            value: "30units",
            label: "30 units weekly (0.75mg Semaglutide)",
            tier: TIER_TWO_MAINTENANCE,
            tier_name: "Tier 2.5",
            product_id: "T2_MAINTAIN",
        },
        DoseOption {
            value: "40units",
            label: "40 units weekly (1.0mg Semaglutide)",
            tier: TIER_THREE,
            tier_name: "Tier 3",
            product_id: "T3_RAMP",
        },
        DoseOption {
            value: "5units_micro",
            label: "Microdose (5 units weekly Semaglutide)",
            tier: MICRODOSE_TIER,
            tier_name: "Microdose",
            product_id: "MICRO_MAINTAIN",
        },
    ]
}

fn standard_time_on_medication() -> Vec<TimeOnMedicationOption> {
    [
        ("lessthan1month", "< 1 month", 0.5),
        ("1month", "1 month", 1.0),
        ("lessthan2months", "< 2 months", 1.5),
        ("2months", "2 months", 2.0),
        ("lessthan3months", "< 3 months", 2.5),
        ("3months", "3 months", 3.0),
        ("4months", "4 months", 4.0),
        ("5months", "5 months", 5.0),
        ("6plusmonths", "6+ months", 6.0),
    ]
    .into_iter()
    .map(|(value, label, months)| TimeOnMedicationOption {
        value,
        label,
        months,
    })
    .collect()
}

fn standard_weight_loss() -> Vec<WeightLossOption> {
    vec![
        WeightLossOption {
            value: GAINING_WEIGHT,
            label: "I'm gaining weight",
            wls: -2,
            flag: Some(OptionFlag::Important),
        },
        WeightLossOption {
            value: "0-1pounds",
            label: "0-1 pounds",
            wls: -1,
            flag: None,
        },
        WeightLossOption {
            value: "2-3pounds",
            label: "2-3 pounds",
            wls: 0,
            flag: None,
        },
        WeightLossOption {
            value: "4-6pounds",
            label: "4-6 pounds",
            wls: 1,
            flag: None,
        },
        WeightLossOption {
            value: "7-12pounds",
            label: "7-12 pounds",
            wls: 2,
            flag: None,
        },
        WeightLossOption {
            value: "13-20pounds",
            label: "13-20 pounds",
            wls: 3,
            flag: Some(OptionFlag::Important),
        },
        WeightLossOption {
            value: "gt20pounds",
            label: "More than 20 pounds",
            wls: 4,
            flag: Some(OptionFlag::Critical),
        },
    ]
}

fn standard_side_effects() -> Vec<SideEffectOption> {
    vec![
        SideEffectOption {
            value: NO_SIDE_EFFECTS,
            label: "No side effects",
            ses: 0,
            flag: None,
        },
        SideEffectOption {
            value: "Mild nausea (manageable)",
            label: "Mild nausea (manageable)",
            ses: 1,
            flag: None,
        },
        SideEffectOption {
            value: MODERATE_NAUSEA,
            label: "Moderate nausea",
            ses: 2,
            flag: None,
        },
        SideEffectOption {
            value: SIGNIFICANT_VOMITING,
            label: "Significant vomiting (e.g., multiple times a day, unable to keep fluids down)",
            ses: 4,
            flag: Some(OptionFlag::Critical),
        },
        SideEffectOption {
            value: "Abdominal pain (severe or persistent)",
            label: "Abdominal pain (severe or persistent)",
            ses: 4,
            flag: Some(OptionFlag::Critical),
        },
        SideEffectOption {
            value: "Dizziness (severe or causing falls)",
            label: "Dizziness (severe or causing falls)",
            ses: 4,
            flag: Some(OptionFlag::Critical),
        },
        SideEffectOption {
            value: "Chest pain",
            label: "Chest pain",
            ses: 5,
            flag: Some(OptionFlag::Critical),
        },
        // physician reviews the free text; scored as mild until then
        SideEffectOption {
            value: OTHER_SIDE_EFFECT,
            label: "Other (please specify below)",
            ses: 1,
            flag: None,
        },
    ]
}

fn standard_appetite_control() -> Vec<AppetiteOption> {
    vec![
        AppetiteOption {
            value: "always_hungry",
            label: "I'm always hungry!",
            ass: -2,
            flag: None,
        },
        AppetiteOption {
            value: "somewhat_decreased",
            label: "Somewhat decreased appetite",
            ass: -1,
            flag: None,
        },
        AppetiteOption {
            value: "just_right",
            label: "Yes, just where I want to be",
            ass: 0,
            flag: None,
        },
        AppetiteOption {
            value: "too_much_suppression",
            label: "Way too much appetite suppression, can't eat",
            ass: 3,
            flag: Some(OptionFlag::Important),
        },
    ]
}

fn standard_satisfaction() -> Vec<SatisfactionOption> {
    [
        (1, "Very Unhappy", -2),
        (2, "Unhappy", -1),
        (3, "Neutral", 0),
        (4, "Happy", 1),
        (5, "Very Happy", 2),
    ]
    .into_iter()
    .map(|(rating, label, pss)| SatisfactionOption { rating, label, pss })
    .collect()
}
