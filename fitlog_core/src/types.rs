//! Core domain types for the fitlog workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout entries and the category-bucketed ledger
//! - The single-user profile with derived biometrics
//! - Serialization formats for both persisted documents

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Categories that are always present in a ledger, in display order.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Warm-up", "Workout", "Cool-down"];

/// Default weekly calorie goal for a freshly saved profile.
pub const DEFAULT_WEEKLY_CAL_GOAL: u32 = 2000;

/// Timestamp format used in the persisted workout document.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Workout Types
// ============================================================================

/// One logged workout session.
///
/// Calories are computed once when the entry is created and never
/// recomputed, even if the user profile changes later. The calendar
/// date is stored redundantly alongside the timestamp so day-bucketed
/// aggregation never has to re-parse timestamps.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    pub exercise: String,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub calories: f64,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
}

impl WorkoutEntry {
    /// Create an entry at the given moment; the date is derived from it.
    pub fn new(
        exercise: impl Into<String>,
        duration_minutes: u32,
        calories: f64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            exercise: exercise.into(),
            duration_minutes,
            calories,
            date: timestamp.date(),
            timestamp,
        }
    }
}

/// The category-bucketed collection of workout entries.
///
/// Buckets keep insertion order: the default categories first, then any
/// dynamically created categories in creation order. Within a bucket,
/// entries are in chronological append order. The ledger serializes as
/// a JSON object whose key order is the bucket order.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutLedger {
    buckets: Vec<(String, Vec<WorkoutEntry>)>,
}

impl Default for WorkoutLedger {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_CATEGORIES
                .iter()
                .map(|c| (c.to_string(), Vec::new()))
                .collect(),
        }
    }
}

impl WorkoutLedger {
    /// Append an entry to a category, creating the bucket if the
    /// category is not yet known (free-form categories are accepted).
    pub fn push(&mut self, category: &str, entry: WorkoutEntry) {
        match self.buckets.iter_mut().find(|(name, _)| name == category) {
            Some((_, entries)) => entries.push(entry),
            None => self.buckets.push((category.to_string(), vec![entry])),
        }
    }

    /// Entries for a category, if the bucket exists.
    pub fn entries(&self, category: &str) -> Option<&[WorkoutEntry]> {
        self.buckets
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Iterate buckets in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WorkoutEntry])> {
        self.buckets
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Category names in ledger order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|(_, entries)| entries.len()).sum()
    }

    /// Total logged minutes across all buckets.
    pub fn total_minutes(&self) -> u64 {
        self.buckets
            .iter()
            .flat_map(|(_, entries)| entries)
            .map(|e| u64::from(e.duration_minutes))
            .sum()
    }

    /// Ensure every default category is present, in canonical order,
    /// ahead of any dynamically created buckets.
    ///
    /// Documents written by older schema revisions may be missing some
    /// of the default categories; loading normalizes them back in as
    /// empty buckets.
    pub fn normalize(&mut self) {
        let mut buckets = Vec::with_capacity(self.buckets.len().max(DEFAULT_CATEGORIES.len()));
        for category in DEFAULT_CATEGORIES {
            let entries = match self.buckets.iter().position(|(name, _)| name == category) {
                Some(idx) => self.buckets.remove(idx).1,
                None => Vec::new(),
            };
            buckets.push((category.to_string(), entries));
        }
        buckets.append(&mut self.buckets);
        self.buckets = buckets;
    }
}

impl Serialize for WorkoutLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (category, entries) in &self.buckets {
            map.serialize_entry(category, entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WorkoutLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LedgerVisitor;

        impl<'de> Visitor<'de> for LedgerVisitor {
            type Value = WorkoutLedger;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category name to workout entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut buckets = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((category, entries)) =
                    access.next_entry::<String, Vec<WorkoutEntry>>()?
                {
                    buckets.push((category, entries));
                }
                Ok(WorkoutLedger { buckets })
            }
        }

        deserializer.deserialize_map(LedgerVisitor)
    }
}

// ============================================================================
// User Profile Types
// ============================================================================

/// Gender code used by the BMR formula, serialized as "M"/"F".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Parse the single-letter form-field code, case-insensitively.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "M" | "m" => Some(Gender::Male),
            "F" | "f" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The single-user biometric profile.
///
/// `bmi` and `bmr` are derived once at save time from the biometric
/// fields and stored alongside them. The profile is created or
/// overwritten wholesale by a validated save; absence is a valid state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub regn_id: String,
    pub age: u32,
    pub gender: Gender,
    #[serde(rename = "height")]
    pub height_cm: f64,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmr: f64,
    #[serde(default = "default_weekly_cal_goal")]
    pub weekly_cal_goal: u32,
}

fn default_weekly_cal_goal() -> u32 {
    DEFAULT_WEEKLY_CAL_GOAL
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
    }

    fn entry(exercise: &str) -> WorkoutEntry {
        WorkoutEntry::new(exercise, 10, 84.0, test_timestamp())
    }

    #[test]
    fn test_default_ledger_has_all_categories() {
        let ledger = WorkoutLedger::default();
        let categories: Vec<_> = ledger.categories().collect();
        assert_eq!(categories, vec!["Warm-up", "Workout", "Cool-down"]);
        assert_eq!(ledger.entry_count(), 0);
    }

    #[test]
    fn test_push_unknown_category_creates_bucket_at_end() {
        let mut ledger = WorkoutLedger::default();
        ledger.push("Stretching", entry("Hamstring Stretch"));

        let categories: Vec<_> = ledger.categories().collect();
        assert_eq!(
            categories,
            vec!["Warm-up", "Workout", "Cool-down", "Stretching"]
        );
        assert_eq!(ledger.entries("Stretching").unwrap().len(), 1);
    }

    #[test]
    fn test_entries_keep_append_order() {
        let mut ledger = WorkoutLedger::default();
        ledger.push("Workout", entry("Push-ups"));
        ledger.push("Workout", entry("Squats"));

        let entries = ledger.entries("Workout").unwrap();
        assert_eq!(entries[0].exercise, "Push-ups");
        assert_eq!(entries[1].exercise, "Squats");
    }

    #[test]
    fn test_entry_date_derived_from_timestamp() {
        let e = entry("Jog");
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_ledger_serde_preserves_bucket_order() {
        let mut ledger = WorkoutLedger::default();
        ledger.push("Workout", entry("Push-ups"));
        ledger.push("Yoga", entry("Sun Salutation"));

        let json = serde_json::to_string_pretty(&ledger).unwrap();
        let parsed: WorkoutLedger = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, ledger);
        let categories: Vec<_> = parsed.categories().collect();
        assert_eq!(categories, vec!["Warm-up", "Workout", "Cool-down", "Yoga"]);
    }

    #[test]
    fn test_timestamp_serialized_with_second_resolution() {
        let json = serde_json::to_value(entry("Jog")).unwrap();
        assert_eq!(json["timestamp"], "2024-03-15 07:30:00");
        assert_eq!(json["date"], "2024-03-15");
    }

    #[test]
    fn test_normalize_restores_missing_default_categories() {
        let json = r#"{"Workout": [], "Yoga": []}"#;
        let mut ledger: WorkoutLedger = serde_json::from_str(json).unwrap();
        ledger.normalize();

        let categories: Vec<_> = ledger.categories().collect();
        assert_eq!(categories, vec!["Warm-up", "Workout", "Cool-down", "Yoga"]);
    }

    #[test]
    fn test_user_profile_serde_roundtrip_with_goal_default() {
        let json = r#"{
            "name": "Alice",
            "regn_id": "REG123",
            "age": 28,
            "gender": "F",
            "height": 165.0,
            "weight": 60.0,
            "bmi": 22.04,
            "bmr": 1330.25
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.weekly_cal_goal, DEFAULT_WEEKLY_CAL_GOAL);
    }
}
