//! Arena-backed JSON store with file locking and atomic commits.
//!
//! All entities live in one JSON document of keyed tables. Every domain
//! operation is a single unit of work: load the document, validate and
//! mutate in memory, then one atomic commit (temp file + fsync + rename).
//! A failure before the commit leaves no trace; a failure at commit time
//! leaves the previous document intact.
//!
//! Uniqueness rules that must survive racing writers (per-user name
//! uniqueness, single active session) are re-verified at commit time and
//! surface as [`Error::Conflict`], distinct from the services' pre-check
//! errors.

use crate::{Error, Exercise, ExerciseSet, PlanExercise, Result, WorkoutPlan, WorkoutSession};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// File name of the store document inside the data directory
pub const STORE_FILE: &str = "ironlog.json";

/// The full persisted document: one keyed table per entity
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub exercises: HashMap<Uuid, Exercise>,
    #[serde(default)]
    pub plans: HashMap<Uuid, WorkoutPlan>,
    #[serde(default)]
    pub plan_exercises: HashMap<Uuid, PlanExercise>,
    #[serde(default)]
    pub sessions: HashMap<Uuid, WorkoutSession>,
    #[serde(default)]
    pub sets: HashMap<Uuid, ExerciseSet>,
}

impl StoreData {
    /// Point lookup scoped by ownership; a foreign user's exercise is
    /// indistinguishable from a missing one
    pub fn exercise(&self, id: Uuid, user_id: &str) -> Option<&Exercise> {
        self.exercises.get(&id).filter(|e| e.user_id == user_id)
    }

    pub fn plan(&self, id: Uuid, user_id: &str) -> Option<&WorkoutPlan> {
        self.plans.get(&id).filter(|p| p.user_id == user_id)
    }

    pub fn session(&self, id: Uuid, user_id: &str) -> Option<&WorkoutSession> {
        self.sessions.get(&id).filter(|s| s.user_id == user_id)
    }

    /// All entries of a plan, in table order
    pub fn entries_for_plan(&self, plan_id: Uuid) -> Vec<&PlanExercise> {
        self.plan_exercises
            .values()
            .filter(|pe| pe.plan_id == plan_id)
            .collect()
    }

    /// All sets logged in a session, in table order
    pub fn sets_for_session(&self, session_id: Uuid) -> Vec<&ExerciseSet> {
        self.sets
            .values()
            .filter(|s| s.session_id == session_id)
            .collect()
    }

    /// The user's active session, if any (at most one by invariant)
    pub fn active_session(&self, user_id: &str) -> Option<&WorkoutSession> {
        self.sessions
            .values()
            .find(|s| s.user_id == user_id && s.is_active())
    }

    /// Constraints enforced at commit time regardless of what the services
    /// checked beforehand
    fn verify_constraints(&self) -> Result<()> {
        let mut exercise_names = HashSet::new();
        for exercise in self.exercises.values() {
            let key = (exercise.user_id.as_str(), exercise.name.trim());
            if !exercise_names.insert(key) {
                return Err(Error::Conflict(format!(
                    "duplicate exercise name '{}' for user",
                    exercise.name
                )));
            }
        }

        let mut plan_names = HashSet::new();
        for plan in self.plans.values() {
            let key = (plan.user_id.as_str(), plan.name.trim());
            if !plan_names.insert(key) {
                return Err(Error::Conflict(format!(
                    "duplicate plan name '{}' for user",
                    plan.name
                )));
            }
        }

        let mut active_users = HashSet::new();
        for session in self.sessions.values().filter(|s| s.is_active()) {
            if !active_users.insert(session.user_id.as_str()) {
                return Err(Error::Conflict(format!(
                    "more than one active session for user '{}'",
                    session.user_id
                )));
            }
        }

        Ok(())
    }
}

/// Handle to the on-disk store document
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Bind a store to `<dir>/ironlog.json`
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document with a shared lock
    ///
    /// A missing file is an empty store. A file that exists but cannot be
    /// parsed is an error: the store holds real training history, so it is
    /// never silently reset.
    fn load(&self) -> Result<StoreData> {
        if !self.path.exists() {
            tracing::debug!("No store file at {:?}, starting empty", self.path);
            return Ok(StoreData::default());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let data = serde_json::from_str::<StoreData>(&contents)?;
        tracing::debug!(
            "Loaded store: {} exercises, {} plans, {} sessions, {} sets",
            data.exercises.len(),
            data.plans.len(),
            data.sessions.len(),
            data.sets.len()
        );
        Ok(data)
    }

    /// Verify constraints and atomically replace the document
    fn commit(&self, data: &StoreData) -> Result<()> {
        data.verify_constraints()?;

        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        // Temp file in the same directory so the rename is atomic
        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Committed store to {:?}", self.path);
        Ok(())
    }

    /// Run a read-only query against a fresh load of the document
    pub fn read<T>(&self, f: impl FnOnce(&StoreData) -> Result<T>) -> Result<T> {
        let data = self.load()?;
        f(&data)
    }

    /// Run one unit of work: load, mutate via the closure, commit
    ///
    /// If the closure fails, nothing is written. If a commit-time
    /// constraint check fails, nothing is written and the caller sees
    /// [`Error::Conflict`].
    pub fn update<T>(&self, f: impl FnOnce(&mut StoreData) -> Result<T>) -> Result<T> {
        let mut data = self.load()?;
        let value = f(&mut data)?;
        self.commit(&data)?;
        Ok(value)
    }
}
