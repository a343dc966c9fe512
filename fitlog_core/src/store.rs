//! Durable ledger store with atomic replace and writer exclusion.
//!
//! Both documents (workout ledger, user profile) are persisted whole on
//! every write: a temp file is written next to the canonical path and
//! atomically renamed over it, so a crash mid-write never leaves a
//! half-written document. Corrupt or missing documents are silently
//! recovered to defaults so the logging path stays available after a
//! partial write from a crash.
//!
//! Mutating operations are read-modify-write sequences over shared
//! files and are serialized two ways: an in-process mutex per document,
//! plus an exclusive lock on a sidecar lock file so independent
//! processes sharing one data directory cannot lose updates either.

use crate::{metrics, Error, Result, UserForm, UserProfile, WorkoutEntry, WorkoutLedger};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;

/// Workout document file name inside the data directory.
pub const WORKOUTS_FILE: &str = "workouts.json";

/// User document file name inside the data directory.
pub const USER_FILE: &str = "user.json";

/// Owns the persistence boundary for the two documents.
///
/// The store holds no long-lived in-memory copy of either document;
/// every operation re-loads from disk, mutates a private copy, and
/// writes back. Callers always receive owned values, never a live
/// reference into shared state.
pub struct LedgerStore {
    workouts_path: PathBuf,
    user_path: PathBuf,
    fallback_weight_kg: f64,
    weekly_cal_goal: u32,
    workout_guard: Mutex<()>,
    user_guard: Mutex<()>,
}

impl LedgerStore {
    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            workouts_path: data_dir.join(WORKOUTS_FILE),
            user_path: data_dir.join(USER_FILE),
            fallback_weight_kg: metrics::FALLBACK_WEIGHT_KG,
            weekly_cal_goal: crate::types::DEFAULT_WEEKLY_CAL_GOAL,
            workout_guard: Mutex::new(()),
            user_guard: Mutex::new(()),
        }
    }

    /// Create a store with settings taken from the application config.
    pub fn from_config(config: &crate::Config) -> Self {
        let mut store = Self::new(config.data.data_dir.clone());
        store.fallback_weight_kg = config.metrics.fallback_weight_kg;
        store.weekly_cal_goal = config.metrics.weekly_cal_goal;
        store
    }

    /// Override the body weight assumed when no profile exists.
    pub fn with_fallback_weight(mut self, weight_kg: f64) -> Self {
        self.fallback_weight_kg = weight_kg;
        self
    }

    /// Override the weekly calorie goal applied to saved profiles.
    pub fn with_weekly_cal_goal(mut self, goal: u32) -> Self {
        self.weekly_cal_goal = goal;
        self
    }

    pub fn workouts_path(&self) -> &Path {
        &self.workouts_path
    }

    pub fn user_path(&self) -> &Path {
        &self.user_path
    }

    // ========================================================================
    // Workout document
    // ========================================================================

    /// Load the workout ledger.
    ///
    /// A missing or corrupt document is recovered to the default empty
    /// ledger (logged, never surfaced), and the category set is
    /// normalized so every default category is present.
    pub fn load_workouts(&self) -> WorkoutLedger {
        let mut ledger: WorkoutLedger = read_document(&self.workouts_path).unwrap_or_default();
        ledger.normalize();
        ledger
    }

    /// Durably replace the workout document with the given ledger.
    pub fn save_workouts(&self, ledger: &WorkoutLedger) -> Result<()> {
        let _guard = lock(&self.workout_guard);
        let _file_lock = FileLockGuard::acquire(&self.workouts_path)?;
        write_document(&self.workouts_path, ledger)
    }

    /// Validate, enrich, and append one entry under the workout guard.
    ///
    /// Validation happens before any I/O: a blank exercise or a
    /// non-positive/non-numeric duration is rejected with no filesystem
    /// effect. The calorie estimate uses the saved profile's weight, or
    /// the configured fallback when no profile exists.
    pub fn append_entry(
        &self,
        category: &str,
        exercise: &str,
        duration: &str,
    ) -> Result<WorkoutEntry> {
        let mut errors = Vec::new();
        let exercise = match crate::validate::parse_exercise(exercise) {
            Ok(exercise) => Some(exercise),
            Err(message) => {
                errors.push(message);
                None
            }
        };
        let duration_minutes = match crate::validate::parse_duration(duration) {
            Ok(minutes) => Some(minutes),
            Err(message) => {
                errors.push(message);
                None
            }
        };
        let (Some(exercise), Some(duration_minutes)) = (exercise, duration_minutes) else {
            return Err(Error::Validation(errors));
        };

        let weight_kg = self
            .load_user()
            .map(|profile| profile.weight_kg)
            .unwrap_or(self.fallback_weight_kg);
        let calories = metrics::calories(category, duration_minutes, weight_kg);
        let entry = WorkoutEntry::new(
            exercise,
            duration_minutes,
            calories,
            chrono::Local::now().naive_local(),
        );

        // Entire load-mutate-save sequence runs under both guards so a
        // concurrent append cannot load the same prior state and have
        // the later save discard the earlier entry.
        let _guard = lock(&self.workout_guard);
        let _file_lock = FileLockGuard::acquire(&self.workouts_path)?;

        let mut ledger: WorkoutLedger = read_document(&self.workouts_path).unwrap_or_default();
        ledger.normalize();
        ledger.push(category, entry.clone());
        write_document(&self.workouts_path, &ledger)?;

        tracing::info!(
            "Appended {} ({} min) to {}",
            entry.exercise,
            entry.duration_minutes,
            category
        );
        Ok(entry)
    }

    // ========================================================================
    // User document
    // ========================================================================

    /// Load the user profile; absence (or corruption) yields None.
    pub fn load_user(&self) -> Option<UserProfile> {
        read_document(&self.user_path)
    }

    /// Durably replace the user document with the given profile.
    pub fn save_user(&self, profile: &UserProfile) -> Result<()> {
        let _guard = lock(&self.user_guard);
        let _file_lock = FileLockGuard::acquire(&self.user_path)?;
        write_document(&self.user_path, profile)
    }

    /// Validate raw form fields and persist the resulting profile.
    pub fn save_user_form(&self, form: &UserForm) -> Result<UserProfile> {
        let mut profile = form.validate().map_err(Error::Validation)?;
        profile.weekly_cal_goal = self.weekly_cal_goal;
        self.save_user(&profile)?;
        tracing::info!("Saved profile for {} (BMI {})", profile.name, profile.bmi);
        Ok(profile)
    }
}

fn lock(guard: &Mutex<()>) -> std::sync::MutexGuard<'_, ()> {
    guard.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive cross-process lock held for a load-mutate-save sequence.
///
/// Taken on a sidecar `.lock` file rather than the document itself,
/// because the atomic-rename save replaces the document inode and would
/// silently release a lock held on the old one.
struct FileLockGuard {
    file: File,
}

impl FileLockGuard {
    fn acquire(document_path: &Path) -> Result<Self> {
        if let Some(parent) = document_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock_path = sidecar_lock_path(document_path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(lock_path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn sidecar_lock_path(document_path: &Path) -> PathBuf {
    let mut name = document_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    document_path.with_file_name(name)
}

/// Read and parse a document with shared locking.
///
/// Any failure (missing file, unreadable file, malformed JSON) is
/// logged and reported as None; the caller substitutes defaults. This
/// is the availability-over-strict-durability tradeoff: logging a new
/// session still works even when history was unreadable.
fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        tracing::debug!("No document at {:?}, using defaults", path);
        return None;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Using defaults.", path, e);
            return None;
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Using defaults.", path, e);
        return None;
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {:?}: {}. Using defaults.", path, e);
        return None;
    }
    let _ = file.unlock();

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Using defaults.", path, e);
            None
        }
    }
}

/// Atomically replace a document.
///
/// Writes to a unique temp file in the same directory, syncs, then
/// renames over the canonical path. On failure the temp file is removed
/// when it drops, so no stray siblings accumulate.
fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("document path {:?} has no parent", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    let _ = temp.as_file().unlock();

    temp.persist(path).map_err(|e| {
        tracing::warn!("Failed to persist {:?}: {}", path, e.error);
        Error::Io(e.error)
    })?;

    tracing::debug!("Saved document to {:?}", path);
    Ok(())
}
