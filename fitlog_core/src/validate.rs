//! Form-field validation for the routing layer's raw inputs.
//!
//! Every check returns a Result carrying human-readable messages; the
//! caller decides how to present them. Nothing here touches the disk,
//! so a rejected input can never leave partial state behind.

use crate::{metrics, Gender, UserProfile, DEFAULT_WEEKLY_CAL_GOAL};

pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const HEIGHT_RANGE_CM: (f64, f64) = (50.0, 250.0);
pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 400.0);

/// Parse a duration form field into whole minutes.
///
/// Rejects anything that is not a positive whole number, including
/// "0", "-5", and non-numeric text.
pub fn parse_duration(raw: &str) -> std::result::Result<u32, String> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 && minutes <= i64::from(u32::MAX) => Ok(minutes as u32),
        _ => Err("Duration must be a positive whole number.".to_string()),
    }
}

/// Trim and reject a blank exercise name.
pub fn parse_exercise(raw: &str) -> std::result::Result<String, String> {
    let exercise = raw.trim();
    if exercise.is_empty() {
        Err("Please provide both exercise and duration.".to_string())
    } else {
        Ok(exercise.to_string())
    }
}

/// Raw user-profile form fields as received from the routing layer.
#[derive(Clone, Debug, Default)]
pub struct UserForm {
    pub name: String,
    pub regn_id: String,
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
}

impl UserForm {
    /// Validate every field and build the profile with derived BMI/BMR.
    ///
    /// All failures are collected; nothing is applied partially. The
    /// derived values are rounded to two decimals for storage.
    pub fn validate(&self) -> std::result::Result<UserProfile, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name is required.".to_string());
        }

        let regn_id = self.regn_id.trim();
        if regn_id.is_empty() {
            errors.push("Registration ID is required.".to_string());
        }

        let age = match self.age.trim().parse::<u32>() {
            Ok(age) if (AGE_RANGE.0..=AGE_RANGE.1).contains(&age) => Some(age),
            _ => {
                errors.push(format!(
                    "Age out of range ({}-{}).",
                    AGE_RANGE.0, AGE_RANGE.1
                ));
                None
            }
        };

        let gender = match Gender::parse(&self.gender) {
            Some(gender) => Some(gender),
            None => {
                errors.push("Gender must be M or F.".to_string());
                None
            }
        };

        let height_cm = match self.height.trim().parse::<f64>() {
            Ok(h) if (HEIGHT_RANGE_CM.0..=HEIGHT_RANGE_CM.1).contains(&h) => Some(h),
            _ => {
                errors.push(format!(
                    "Height out of range ({:.0}-{:.0}).",
                    HEIGHT_RANGE_CM.0, HEIGHT_RANGE_CM.1
                ));
                None
            }
        };

        let weight_kg = match self.weight.trim().parse::<f64>() {
            Ok(w) if (WEIGHT_RANGE_KG.0..=WEIGHT_RANGE_KG.1).contains(&w) => Some(w),
            _ => {
                errors.push(format!(
                    "Weight out of range ({:.0}-{:.0}).",
                    WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1
                ));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // All Somes: errors is empty only when every field parsed.
        let (age, gender, height_cm, weight_kg) = (
            age.expect("validated"),
            gender.expect("validated"),
            height_cm.expect("validated"),
            weight_kg.expect("validated"),
        );

        Ok(UserProfile {
            name: name.to_string(),
            regn_id: regn_id.to_string(),
            age,
            gender,
            height_cm,
            weight_kg,
            bmi: metrics::round2(metrics::bmi(weight_kg, height_cm)),
            bmr: metrics::round2(metrics::bmr(weight_kg, height_cm, age, gender)),
            weekly_cal_goal: DEFAULT_WEEKLY_CAL_GOAL,
        })
    }
}
