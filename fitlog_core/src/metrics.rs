//! Derived-metrics engine: BMI, BMR, and calorie estimation.
//!
//! Pure functions with no state and no I/O. Input validation is the
//! caller's job; the fallback body weight for calorie estimates lives
//! in [`crate::config`], never in these signatures.

use crate::Gender;

/// MET multipliers per activity intensity class.
pub const MET_WARM_UP: f64 = 3.0;
pub const MET_WORKOUT: f64 = 6.0;
pub const MET_COOL_DOWN: f64 = 2.5;
pub const MET_DEFAULT: f64 = 5.0;

/// Body weight assumed when no user profile exists. Overridable via
/// `[metrics] fallback_weight_kg` in the config file.
pub const FALLBACK_WEIGHT_KG: f64 = 70.0;

/// MET multiplier for a category; unknown categories get a mid-range
/// default so free-form buckets still produce a calorie estimate.
pub fn met_for(category: &str) -> f64 {
    match category {
        "Warm-up" => MET_WARM_UP,
        "Workout" => MET_WORKOUT,
        "Cool-down" => MET_COOL_DOWN,
        _ => MET_DEFAULT,
    }
}

/// MET-based calorie estimate for one session.
pub fn calories(category: &str, duration_minutes: u32, weight_kg: f64) -> f64 {
    met_for(category) * 3.5 * weight_kg / 200.0 * f64::from(duration_minutes)
}

/// Body Mass Index.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Basal Metabolic Rate, Mifflin-St Jeor.
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Round to two decimals for stored/displayed derived values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calories_workout_fixed_point() {
        // 6.0 * 3.5 * 80 / 200 * 10
        assert_eq!(calories("Workout", 10, 80.0), 84.0);
    }

    #[test]
    fn test_calories_unknown_category_uses_default_met() {
        assert_eq!(calories("Boxing", 10, 80.0), 5.0 * 3.5 * 80.0 / 200.0 * 10.0);
    }

    #[test]
    fn test_calories_deterministic() {
        let first = calories("Warm-up", 7, 63.5);
        let second = calories("Warm-up", 7, 63.5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bmi_fixed_point() {
        assert_eq!(round2(bmi(60.0, 165.0)), 22.04);
    }

    #[test]
    fn test_bmr_female_fixed_point() {
        // 10*60 + 6.25*165 - 5*28 - 161
        assert_eq!(bmr(60.0, 165.0, 28, Gender::Female), 1330.25);
    }

    #[test]
    fn test_bmr_male_offset() {
        let female = bmr(80.0, 180.0, 35, Gender::Female);
        let male = bmr(80.0, 180.0, 35, Gender::Male);
        assert_eq!(male - female, 166.0);
    }
}
