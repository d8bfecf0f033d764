//! Workout session tracking.
//!
//! At most one session per user is active at a time. An active session
//! accepts set logging and body-weight updates; completing it freezes it
//! permanently, while cancelling hard-deletes the session and its sets.
//! Tonnage is recomputed from scratch after every mutation.

use crate::{
    plans, tonnage, Error, ExerciseSet, PlanDetail, Result, Store, StoreData, WorkoutSession,
};
use chrono::Utc;
use uuid::Uuid;

/// A session joined with its sets (oldest first) and, when the weak plan
/// reference survives, the plan it was started from
#[derive(Clone, Debug)]
pub struct SessionDetail {
    pub session: WorkoutSession,
    pub sets: Vec<ExerciseSet>,
    pub plan: Option<PlanDetail>,
}

fn assemble(data: &StoreData, session: &WorkoutSession) -> SessionDetail {
    let mut sets: Vec<ExerciseSet> = data
        .sets_for_session(session.id)
        .into_iter()
        .cloned()
        .collect();
    sets.sort_by_key(|s| s.recorded_at);

    let plan = session
        .plan_id
        .and_then(|plan_id| data.plans.get(&plan_id))
        .map(|plan| plans::assemble(data, plan, true));

    SessionDetail {
        session: session.clone(),
        sets,
        plan,
    }
}

/// Full resummation over the session's current sets (never incremental)
fn recompute_tonnage(data: &mut StoreData, session_id: Uuid) {
    let body_weight = data.sessions.get(&session_id).and_then(|s| s.body_weight);
    let total = {
        let sets = data.sets_for_session(session_id);
        tonnage::session_tonnage(&sets, body_weight)
    };
    if let Some(session) = data.sessions.get_mut(&session_id) {
        session.tonnage = total;
    }
}

/// Start a session from a plan, snapshotting the plan's name
pub fn start(
    store: &Store,
    user_id: &str,
    plan_id: Uuid,
    body_weight: Option<f64>,
) -> Result<WorkoutSession> {
    store.update(|data| {
        if data.active_session(user_id).is_some() {
            return Err(Error::SessionAlreadyActive);
        }

        let plan = data
            .plan(plan_id, user_id)
            .ok_or_else(|| Error::NotFound("Workout plan not found.".into()))?;

        let session = WorkoutSession {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            plan_id: Some(plan_id),
            plan_name: plan.name.clone(),
            body_weight,
            started_at: Utc::now(),
            completed_at: None,
            tonnage: 0.0,
        };
        data.sessions.insert(session.id, session.clone());

        tracing::info!("Started session from plan '{}'", session.plan_name);
        Ok(session)
    })
}

/// Change the session's recorded body weight, recomputing tonnage
///
/// A body-weight change retroactively affects every bodyweight and
/// assisted set already logged in the session.
pub fn update_body_weight(
    store: &Store,
    session_id: Uuid,
    user_id: &str,
    body_weight: Option<f64>,
) -> Result<WorkoutSession> {
    store.update(|data| {
        let session = data
            .session(session_id, user_id)
            .ok_or_else(|| Error::NotFound("Session not found.".into()))?;
        if !session.is_active() {
            return Err(Error::SessionCompleted(
                "Cannot modify a completed session.".into(),
            ));
        }

        if let Some(session) = data.sessions.get_mut(&session_id) {
            session.body_weight = body_weight;
        }
        recompute_tonnage(data, session_id);

        data.session(session_id, user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Session not found.".into()))
    })
}

/// Log a set against an exercise within an active session
///
/// The set number is one past the count of this exercise's existing sets
/// in the session; the exercise's name and kind are snapshotted onto the
/// set and never resynced.
pub fn log_set(
    store: &Store,
    session_id: Uuid,
    user_id: &str,
    exercise_id: Uuid,
    reps: i32,
    weight: f64,
) -> Result<ExerciseSet> {
    store.update(|data| {
        let session = data
            .session(session_id, user_id)
            .ok_or_else(|| Error::NotFound("Session not found.".into()))?;
        if !session.is_active() {
            return Err(Error::SessionCompleted(
                "Cannot add sets to a completed session.".into(),
            ));
        }

        let exercise = data
            .exercise(exercise_id, user_id)
            .ok_or_else(|| Error::NotFound("Exercise not found.".into()))?;

        let existing = data
            .sets
            .values()
            .filter(|s| s.session_id == session_id && s.exercise_id == exercise_id)
            .count() as i32;

        let set = ExerciseSet {
            id: Uuid::new_v4(),
            session_id,
            exercise_id,
            exercise_name: exercise.name.clone(),
            exercise_kind: exercise.kind,
            set_number: existing + 1,
            reps,
            weight,
            recorded_at: Utc::now(),
        };
        data.sets.insert(set.id, set.clone());
        recompute_tonnage(data, session_id);

        tracing::debug!("Logged {}", set);
        Ok(set)
    })
}

/// Edit a set's reps and weight; its number and exercise are untouched
pub fn update_set(
    store: &Store,
    set_id: Uuid,
    user_id: &str,
    reps: i32,
    weight: f64,
) -> Result<ExerciseSet> {
    store.update(|data| {
        let session_id = owned_set_session(data, set_id, user_id)?;
        require_active(data, session_id, "Cannot modify sets in a completed session.")?;

        let set = data
            .sets
            .get_mut(&set_id)
            .ok_or_else(|| Error::NotFound("Set not found.".into()))?;
        set.reps = reps;
        set.weight = weight;
        let set = set.clone();

        recompute_tonnage(data, session_id);
        Ok(set)
    })
}

/// Remove a set, renumbering the exercise's later sets to close the gap
pub fn delete_set(store: &Store, set_id: Uuid, user_id: &str) -> Result<()> {
    store.update(|data| {
        let session_id = owned_set_session(data, set_id, user_id)?;
        require_active(data, session_id, "Cannot delete sets from a completed session.")?;

        let removed = data
            .sets
            .remove(&set_id)
            .ok_or_else(|| Error::NotFound("Set not found.".into()))?;

        for set in data.sets.values_mut() {
            if set.session_id == session_id
                && set.exercise_id == removed.exercise_id
                && set.set_number > removed.set_number
            {
                set.set_number -= 1;
            }
        }

        recompute_tonnage(data, session_id);
        Ok(())
    })
}

/// Freeze the session; no further mutation is permitted afterwards
pub fn complete(store: &Store, session_id: Uuid, user_id: &str) -> Result<WorkoutSession> {
    store.update(|data| {
        let session = data
            .session(session_id, user_id)
            .ok_or_else(|| Error::NotFound("Session not found.".into()))?;
        if !session.is_active() {
            return Err(Error::AlreadyCompleted);
        }

        let session = data
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::NotFound("Session not found.".into()))?;
        session.completed_at = Some(Utc::now());

        tracing::info!(
            "Completed session '{}' at {:.1} lbs tonnage",
            session.plan_name,
            session.tonnage
        );
        Ok(session.clone())
    })
}

/// Abandon an active session: the session and its sets are hard-deleted,
/// leaving no persisted trace
pub fn cancel(store: &Store, session_id: Uuid, user_id: &str) -> Result<()> {
    store.update(|data| {
        let session = data
            .session(session_id, user_id)
            .ok_or_else(|| Error::NotFound("Session not found.".into()))?;
        if !session.is_active() {
            return Err(Error::SessionCompleted(
                "Cannot cancel a completed session.".into(),
            ));
        }

        data.sets.retain(|_, s| s.session_id != session_id);
        data.sessions.remove(&session_id);

        tracing::info!("Cancelled session {}", session_id);
        Ok(())
    })
}

/// The user's active session with its full graph, or None
pub fn get_active(store: &Store, user_id: &str) -> Result<Option<SessionDetail>> {
    store.read(|data| {
        Ok(data
            .active_session(user_id)
            .map(|session| assemble(data, session)))
    })
}

/// Any owned session with its full graph
pub fn get(store: &Store, session_id: Uuid, user_id: &str) -> Result<SessionDetail> {
    store.read(|data| {
        let session = data
            .session(session_id, user_id)
            .ok_or_else(|| Error::NotFound("Session not found.".into()))?;
        Ok(assemble(data, session))
    })
}

/// The user's sessions, newest first
pub fn list_recent(store: &Store, user_id: &str, limit: usize) -> Result<Vec<WorkoutSession>> {
    store.read(|data| {
        let mut sessions: Vec<WorkoutSession> = data
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions.truncate(limit);
        Ok(sessions)
    })
}

/// Resolve a set to its session, checking ownership transitively
fn owned_set_session(data: &StoreData, set_id: Uuid, user_id: &str) -> Result<Uuid> {
    data.sets
        .get(&set_id)
        .and_then(|s| data.session(s.session_id, user_id).map(|ses| ses.id))
        .ok_or_else(|| Error::NotFound("Set not found.".into()))
}

fn require_active(data: &StoreData, session_id: Uuid, message: &str) -> Result<()> {
    match data.sessions.get(&session_id) {
        Some(session) if session.is_active() => Ok(()),
        Some(_) => Err(Error::SessionCompleted(message.into())),
        None => Err(Error::NotFound("Session not found.".into())),
    }
}
