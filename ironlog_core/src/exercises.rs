//! Exercise catalog operations.
//!
//! CRUD over user-scoped exercise definitions. Deletion is gatekept
//! against use in plans and in logged history, each with its own message
//! so callers can tell the two apart.

use crate::{Error, Exercise, ExerciseKind, Result, Store};
use chrono::Utc;
use uuid::Uuid;

/// All of a user's exercises, name ascending
pub fn list(store: &Store, user_id: &str) -> Result<Vec<Exercise>> {
    store.read(|data| {
        let mut out: Vec<Exercise> = data
            .exercises
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    })
}

pub fn get(store: &Store, id: Uuid, user_id: &str) -> Result<Exercise> {
    store.read(|data| {
        data.exercise(id, user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Exercise not found.".into()))
    })
}

pub fn create(store: &Store, user_id: &str, name: &str, kind: ExerciseKind) -> Result<Exercise> {
    let name = name.trim().to_string();

    store.update(|data| {
        let taken = data
            .exercises
            .values()
            .any(|e| e.user_id == user_id && e.name == name);
        if taken {
            return Err(Error::DuplicateName(
                "An exercise with this name already exists.".into(),
            ));
        }

        let exercise = Exercise {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: name.clone(),
            kind,
            created_at: Utc::now(),
        };
        data.exercises.insert(exercise.id, exercise.clone());

        tracing::info!("Created exercise '{}' ({})", exercise.name, exercise.kind);
        Ok(exercise)
    })
}

pub fn update(
    store: &Store,
    id: Uuid,
    user_id: &str,
    name: &str,
    kind: ExerciseKind,
) -> Result<Exercise> {
    let name = name.trim().to_string();

    store.update(|data| {
        if data.exercise(id, user_id).is_none() {
            return Err(Error::NotFound("Exercise not found.".into()));
        }

        let conflict = data
            .exercises
            .values()
            .any(|e| e.user_id == user_id && e.name == name && e.id != id);
        if conflict {
            return Err(Error::DuplicateName(
                "An exercise with this name already exists.".into(),
            ));
        }

        let exercise = data
            .exercises
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Exercise not found.".into()))?;
        exercise.name = name.clone();
        exercise.kind = kind;
        Ok(exercise.clone())
    })
}

pub fn delete(store: &Store, id: Uuid, user_id: &str) -> Result<()> {
    store.update(|data| {
        if data.exercise(id, user_id).is_none() {
            return Err(Error::NotFound("Exercise not found.".into()));
        }

        if data.plan_exercises.values().any(|pe| pe.exercise_id == id) {
            return Err(Error::InUse(
                "Cannot delete exercise: it is used in one or more workout plans.".into(),
            ));
        }

        if data.sets.values().any(|s| s.exercise_id == id) {
            return Err(Error::InUse(
                "Cannot delete exercise: it has been logged in workout sessions.".into(),
            ));
        }

        data.exercises.remove(&id);
        tracing::info!("Deleted exercise {}", id);
        Ok(())
    })
}
