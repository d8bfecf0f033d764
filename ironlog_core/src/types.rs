//! Core domain types for the Ironlog strength tracker.
//!
//! This module defines the entities shared across the system:
//! - Exercise definitions and their load semantics
//! - Workout plans and their ordered exercise entries
//! - Workout sessions and logged sets
//!
//! All entities are scoped to an opaque user identifier and addressed by
//! stable `Uuid` keys; relationships are foreign-key fields resolved at
//! query time, never owning references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Exercises
// ============================================================================

/// How a set's effective load is derived for tonnage
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// External load only (barbell, dumbbell, machine)
    Standard,
    /// The lifter's body weight counts as load, plus any added weight
    Bodyweight,
    /// Body weight plus a signed weight field; assistance is logged as a
    /// negative weight
    Assisted,
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Standard => write!(f, "standard"),
            ExerciseKind::Bodyweight => write!(f, "bodyweight"),
            ExerciseKind::Assisted => write!(f, "assisted"),
        }
    }
}

/// A user-defined exercise (e.g. "Bench Press")
///
/// Names are unique per user, case-sensitive, compared after trimming.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub kind: ExerciseKind,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Plans
// ============================================================================

/// A named, ordered collection of exercises with set/rep targets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on any structural change to the plan or its entries
    pub updated_at: DateTime<Utc>,
}

/// One (exercise, targets, position) entry within a workout plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanExercise {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub exercise_id: Uuid,
    /// Zero-based position within the plan
    pub order_index: i32,
    pub sets: i32,
    pub target_reps: i32,
}

// ============================================================================
// Sessions
// ============================================================================

/// A timed workout session; `completed_at == None` means active
///
/// At most one session per user may be active at a time. `plan_name` is a
/// snapshot taken at start and survives later renames or deletion of the
/// plan; `plan_id` is a weak reference that plan deletion clears.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: String,
    pub plan_id: Option<Uuid>,
    pub plan_name: String,
    pub body_weight: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Derived: always the tonnage algorithm applied to the current sets
    /// and body weight, never edited independently
    pub tonnage: f64,
}

impl WorkoutSession {
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// A logged set: reps × weight against an exercise within a session
///
/// `exercise_name` and `exercise_kind` are snapshots taken when the set is
/// logged; renaming the exercise later does not rewrite history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub exercise_kind: ExerciseKind,
    /// 1-based, contiguous per exercise within the session
    pub set_number: i32,
    pub reps: i32,
    pub weight: f64,
    pub recorded_at: DateTime<Utc>,
}

impl fmt::Display for ExerciseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{}: {:.1} lbs x {} reps",
            self.exercise_name, self.set_number, self.weight, self.reps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_kind_serde_snake_case() {
        let json = serde_json::to_string(&ExerciseKind::Bodyweight).unwrap();
        assert_eq!(json, "\"bodyweight\"");

        let parsed: ExerciseKind = serde_json::from_str("\"assisted\"").unwrap();
        assert_eq!(parsed, ExerciseKind::Assisted);
    }

    #[test]
    fn test_session_active_flag() {
        let mut session = WorkoutSession {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            plan_id: None,
            plan_name: "Push Day".into(),
            body_weight: None,
            started_at: Utc::now(),
            completed_at: None,
            tonnage: 0.0,
        };
        assert!(session.is_active());

        session.completed_at = Some(Utc::now());
        assert!(!session.is_active());
    }

    #[test]
    fn test_set_display() {
        let set = ExerciseSet {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            exercise_name: "Bench Press".into(),
            exercise_kind: ExerciseKind::Standard,
            set_number: 2,
            reps: 8,
            weight: 135.0,
            recorded_at: Utc::now(),
        };
        assert_eq!(set.to_string(), "Bench Press #2: 135.0 lbs x 8 reps");
    }
}
