use super::catalog::{
    same_tier, TIER_ONE, TIER_ONE_MAINTENANCE, TIER_THREE, TIER_TWO, TIER_TWO_MAINTENANCE,
};
use super::domain::{ExperienceLevel, ExperienceLevelDetails};

/// Derive experience level and TEL from the current tier and months on medication.
///
/// Tiers outside the ladder (microdose included) classify as expert with TEL 4.
pub fn classify_experience(numeric_tier: f64, time_on_med_months: f64) -> ExperienceLevelDetails {
    let tel = time_on_level(numeric_tier, time_on_med_months);

    let mut level = if numeric_tier <= TIER_TWO && time_on_med_months < 3.0 {
        ExperienceLevel::Beginner
    } else if numeric_tier <= TIER_TWO {
        ExperienceLevel::Intermediate
    } else {
        ExperienceLevel::Expert
    };

    // TEL only ever promotes
    if tel == 3 && level == ExperienceLevel::Beginner {
        level = ExperienceLevel::Intermediate;
    }
    if tel == 4 && level != ExperienceLevel::Expert {
        level = ExperienceLevel::Expert;
    }

    ExperienceLevelDetails {
        level,
        tel,
        numeric_tier,
        time_on_med_months,
    }
}

fn time_on_level(tier: f64, months: f64) -> u8 {
    if same_tier(tier, TIER_ONE) {
        if months < 2.0 {
            1
        } else {
            2
        }
    } else if same_tier(tier, TIER_ONE_MAINTENANCE) {
        2
    } else if same_tier(tier, TIER_TWO) {
        if months < 3.0 {
            2
        } else {
            3
        }
    } else if same_tier(tier, TIER_TWO_MAINTENANCE) {
        3
    } else {
        // tier 3, microdose and anything unrecognised
        4
    }
}
