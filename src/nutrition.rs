// ABOUTME: Deterministic nutrition math: BMR, TDEE, calorie and macro targets
// ABOUTME: Pure functions over profile numbers; no IO and no model calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Nutrition calculations
//!
//! All targets are computed server-side so the model only writes meal
//! suggestions around fixed numbers, never the numbers themselves.

use crate::prompts::MacroTargets;

/// Basal metabolic rate via the Mifflin-St Jeor equation
///
/// Weight in kg, height in cm, age in years. Any gender other than
/// `female` uses the male constant.
#[must_use]
pub fn calculate_mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: i64, gender: &str) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let age = age as f64;
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    if gender == "female" {
        base - 161.0
    } else {
        base + 5.0
    }
}

/// Total daily energy expenditure from BMR and activity
///
/// Training days, when known, override the self-reported activity level:
/// 5+ days maps to very active, 3+ to moderately active, 1+ to lightly
/// active.
#[must_use]
pub fn calculate_tdee(bmr: f64, activity_level: Option<&str>, days_per_week: Option<i64>) -> f64 {
    if let Some(days) = days_per_week {
        if days >= 5 {
            return bmr * 1.725;
        }
        if days >= 3 {
            return bmr * 1.55;
        }
        if days >= 1 {
            return bmr * 1.375;
        }
    }

    let multiplier = match activity_level {
        Some("lightly_active") => 1.375,
        Some("moderately_active") => 1.55,
        Some("very_active") => 1.725,
        Some("extremely_active") => 1.9,
        _ => 1.2,
    };
    bmr * multiplier
}

/// Daily calorie target for a goal: 20% deficit for `cut`, 10% surplus for
/// `bulk`, maintenance otherwise
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn calculate_target_calories(tdee: f64, goal: &str) -> i64 {
    let calories = match goal {
        "cut" => tdee * 0.8,
        "bulk" => tdee * 1.1,
        _ => tdee,
    };
    calories.round() as i64
}

/// Macro split for a calorie target
///
/// Protein scales with bodyweight by goal (2.2 g/kg cut, 1.8 bulk, 2.0
/// otherwise), fat is fixed at 0.9 g/kg, and carbs take the remaining
/// calories, clamped at zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn calculate_macros(calories: i64, weight_kg: f64, goal: &str) -> MacroTargets {
    let protein_per_kg = match goal {
        "cut" => 2.2,
        "bulk" => 1.8,
        _ => 2.0,
    };
    let protein_g = (weight_kg * protein_per_kg).round() as i64;
    let fats_g = (weight_kg * 0.9).round() as i64;

    let remaining = calories - protein_g * 4 - fats_g * 9;
    #[allow(clippy::cast_precision_loss)]
    let carbs_g = ((remaining as f64) / 4.0).round() as i64;

    MacroTargets {
        protein_g,
        carbs_g: carbs_g.max(0),
        fats_g,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bmr_matches_reference_values() {
        // 80kg, 180cm, 30yo male: 800 + 1125 - 150 + 5
        let male = calculate_mifflin_st_jeor(80.0, 180.0, 30, "male");
        assert!((male - 1780.0).abs() < 0.001);

        // Same person, female constant: 800 + 1125 - 150 - 161
        let female = calculate_mifflin_st_jeor(80.0, 180.0, 30, "female");
        assert!((female - 1614.0).abs() < 0.001);

        // Unrecognized gender falls back to the male constant
        let other = calculate_mifflin_st_jeor(80.0, 180.0, 30, "other");
        assert!((other - male).abs() < f64::EPSILON);
    }

    #[test]
    fn training_days_override_activity_level() {
        let bmr = 1800.0;
        assert!((calculate_tdee(bmr, Some("sedentary"), Some(5)) - bmr * 1.725).abs() < 0.001);
        assert!((calculate_tdee(bmr, Some("sedentary"), Some(3)) - bmr * 1.55).abs() < 0.001);
        assert!((calculate_tdee(bmr, Some("sedentary"), Some(1)) - bmr * 1.375).abs() < 0.001);
    }

    #[test]
    fn activity_level_applies_without_training_days() {
        let bmr = 1800.0;
        assert!((calculate_tdee(bmr, Some("very_active"), None) - bmr * 1.725).abs() < 0.001);
        assert!((calculate_tdee(bmr, None, None) - bmr * 1.2).abs() < 0.001);
        assert!((calculate_tdee(bmr, Some("sedentary"), Some(0)) - bmr * 1.2).abs() < 0.001);
    }

    #[test]
    fn calorie_targets_follow_goal() {
        assert_eq!(calculate_target_calories(2000.0, "cut"), 1600);
        assert_eq!(calculate_target_calories(2000.0, "bulk"), 2200);
        assert_eq!(calculate_target_calories(2000.0, "recomp"), 2000);
        assert_eq!(calculate_target_calories(2000.0, "strength"), 2000);
    }

    #[test]
    fn macros_balance_to_calories() {
        let macros = calculate_macros(2400, 80.0, "cut");
        assert_eq!(macros.protein_g, 176);
        assert_eq!(macros.fats_g, 72);
        // Remaining calories to carbs: (2400 - 704 - 648) / 4
        assert_eq!(macros.carbs_g, 262);
    }

    #[test]
    fn carbs_never_go_negative() {
        let macros = calculate_macros(500, 120.0, "cut");
        assert_eq!(macros.carbs_g, 0);
    }
}
