//! Workout plan composition operations.
//!
//! Plans own an ordered list of exercise entries addressed by a zero-based
//! `order_index`. Adding always appends; removing tolerates the resulting
//! gap; `reorder` applies whatever positions the caller supplies. Any
//! structural change bumps the plan's `updated_at`.

use crate::{Error, Exercise, PlanExercise, Result, Store, StoreData, WorkoutPlan};
use chrono::Utc;
use uuid::Uuid;

/// A plan entry joined with its exercise definition
#[derive(Clone, Debug)]
pub struct PlanExerciseDetail {
    pub entry: PlanExercise,
    pub exercise: Exercise,
}

/// A plan with its entries eagerly joined
#[derive(Clone, Debug)]
pub struct PlanDetail {
    pub plan: WorkoutPlan,
    pub exercises: Vec<PlanExerciseDetail>,
}

/// Join a plan with its entries, optionally sorted by position
pub(crate) fn assemble(data: &StoreData, plan: &WorkoutPlan, ordered: bool) -> PlanDetail {
    let mut exercises: Vec<PlanExerciseDetail> = data
        .entries_for_plan(plan.id)
        .into_iter()
        .filter_map(|entry| {
            data.exercises.get(&entry.exercise_id).map(|exercise| PlanExerciseDetail {
                entry: entry.clone(),
                exercise: exercise.clone(),
            })
        })
        .collect();

    if ordered {
        exercises.sort_by_key(|d| d.entry.order_index);
    }

    PlanDetail {
        plan: plan.clone(),
        exercises,
    }
}

/// All of a user's plans, name ascending, entries joined in no particular
/// order
pub fn list(store: &Store, user_id: &str) -> Result<Vec<PlanDetail>> {
    store.read(|data| {
        let mut plans: Vec<&WorkoutPlan> = data
            .plans
            .values()
            .filter(|p| p.user_id == user_id)
            .collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(plans
            .into_iter()
            .map(|plan| assemble(data, plan, false))
            .collect())
    })
}

/// A single plan with entries sorted by `order_index`
pub fn get(store: &Store, id: Uuid, user_id: &str) -> Result<PlanDetail> {
    store.read(|data| {
        let plan = data
            .plan(id, user_id)
            .ok_or_else(|| Error::NotFound("Workout plan not found.".into()))?;
        Ok(assemble(data, plan, true))
    })
}

pub fn create(store: &Store, user_id: &str, name: &str) -> Result<WorkoutPlan> {
    let name = name.trim().to_string();

    store.update(|data| {
        let taken = data
            .plans
            .values()
            .any(|p| p.user_id == user_id && p.name == name);
        if taken {
            return Err(Error::DuplicateName(
                "A workout plan with this name already exists.".into(),
            ));
        }

        let now = Utc::now();
        let plan = WorkoutPlan {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: name.clone(),
            created_at: now,
            updated_at: now,
        };
        data.plans.insert(plan.id, plan.clone());

        tracing::info!("Created plan '{}'", plan.name);
        Ok(plan)
    })
}

pub fn rename(store: &Store, id: Uuid, user_id: &str, name: &str) -> Result<WorkoutPlan> {
    let name = name.trim().to_string();

    store.update(|data| {
        if data.plan(id, user_id).is_none() {
            return Err(Error::NotFound("Workout plan not found.".into()));
        }

        let conflict = data
            .plans
            .values()
            .any(|p| p.user_id == user_id && p.name == name && p.id != id);
        if conflict {
            return Err(Error::DuplicateName(
                "A workout plan with this name already exists.".into(),
            ));
        }

        let plan = data
            .plans
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Workout plan not found.".into()))?;
        plan.name = name.clone();
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    })
}

/// Append an exercise to the end of a plan
///
/// The new entry's `order_index` is one past the current maximum (0 for an
/// empty plan); this is an append, never an insert.
pub fn add_exercise(
    store: &Store,
    plan_id: Uuid,
    user_id: &str,
    exercise_id: Uuid,
    sets: i32,
    target_reps: i32,
) -> Result<PlanExercise> {
    store.update(|data| {
        if data.plan(plan_id, user_id).is_none() {
            return Err(Error::NotFound("Workout plan not found.".into()));
        }
        if data.exercise(exercise_id, user_id).is_none() {
            return Err(Error::NotFound("Exercise not found.".into()));
        }

        let order_index = data
            .entries_for_plan(plan_id)
            .iter()
            .map(|pe| pe.order_index)
            .max()
            .map_or(0, |max| max + 1);

        let entry = PlanExercise {
            id: Uuid::new_v4(),
            plan_id,
            exercise_id,
            order_index,
            sets,
            target_reps,
        };
        data.plan_exercises.insert(entry.id, entry.clone());
        touch(data, plan_id);
        Ok(entry)
    })
}

/// Change an entry's set/rep targets; its position is untouched
pub fn update_entry(
    store: &Store,
    plan_exercise_id: Uuid,
    user_id: &str,
    sets: i32,
    target_reps: i32,
) -> Result<PlanExercise> {
    store.update(|data| {
        let plan_id = owned_entry_plan(data, plan_exercise_id, user_id)?;

        let entry = data
            .plan_exercises
            .get_mut(&plan_exercise_id)
            .ok_or_else(|| Error::NotFound("Plan exercise not found.".into()))?;
        entry.sets = sets;
        entry.target_reps = target_reps;
        let entry = entry.clone();

        touch(data, plan_id);
        Ok(entry)
    })
}

/// Remove an entry from its plan
///
/// Remaining entries keep their old `order_index`; the gap left by the
/// removed entry is tolerated until the caller reorders.
pub fn remove_entry(store: &Store, plan_exercise_id: Uuid, user_id: &str) -> Result<()> {
    store.update(|data| {
        let plan_id = owned_entry_plan(data, plan_exercise_id, user_id)?;

        data.plan_exercises.remove(&plan_exercise_id);
        touch(data, plan_id);
        Ok(())
    })
}

/// Apply a caller-supplied ordering to a plan's entries
///
/// Each id's position in `ordered_ids` becomes its entry's `order_index`.
/// Ids that match no entry of this plan are silently ignored, and entries
/// not mentioned keep their old index; the caller is responsible for
/// supplying the complete sequence if contiguity is to be preserved.
pub fn reorder(store: &Store, plan_id: Uuid, user_id: &str, ordered_ids: &[Uuid]) -> Result<()> {
    store.update(|data| {
        if data.plan(plan_id, user_id).is_none() {
            return Err(Error::NotFound("Workout plan not found.".into()));
        }

        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(entry) = data.plan_exercises.get_mut(id) {
                if entry.plan_id == plan_id {
                    entry.order_index = position as i32;
                }
            }
        }

        touch(data, plan_id);
        Ok(())
    })
}

/// Delete a plan, its entries, and every session's reference to it
///
/// Sessions that were started from this plan keep their snapshotted plan
/// name; only the weak back-reference is cleared. Everything happens in
/// one commit.
pub fn delete(store: &Store, id: Uuid, user_id: &str) -> Result<()> {
    store.update(|data| {
        if data.plan(id, user_id).is_none() {
            return Err(Error::NotFound("Workout plan not found.".into()));
        }

        let mut cleared = 0usize;
        for session in data.sessions.values_mut() {
            if session.plan_id == Some(id) {
                session.plan_id = None;
                cleared += 1;
            }
        }

        data.plan_exercises.retain(|_, pe| pe.plan_id != id);
        data.plans.remove(&id);

        tracing::info!("Deleted plan {} (cleared {} session references)", id, cleared);
        Ok(())
    })
}

/// Resolve an entry to its plan, checking ownership transitively
fn owned_entry_plan(data: &StoreData, plan_exercise_id: Uuid, user_id: &str) -> Result<Uuid> {
    data.plan_exercises
        .get(&plan_exercise_id)
        .and_then(|pe| data.plan(pe.plan_id, user_id).map(|p| p.id))
        .ok_or_else(|| Error::NotFound("Plan exercise not found.".into()))
}

fn touch(data: &mut StoreData, plan_id: Uuid) {
    if let Some(plan) = data.plans.get_mut(&plan_id) {
        plan.updated_at = Utc::now();
    }
}
