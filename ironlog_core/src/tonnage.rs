//! Tonnage computation.
//!
//! Tonnage is the total mechanical work of a session: the sum over all
//! logged sets of reps × effective weight. It is always recomputed as a
//! full resummation over the current set list after any mutation, never
//! maintained incrementally, so the stored value cannot drift from the
//! sets it summarizes.

use crate::{ExerciseKind, ExerciseSet};

/// The load one set contributes per rep
///
/// Bodyweight and assisted exercises count the lifter's mass as load on
/// top of the signed weight field; assistance is logged as a negative
/// weight, which this function does not special-case. A session with no
/// recorded body weight contributes zero body mass.
pub fn effective_weight(kind: ExerciseKind, weight: f64, body_weight: Option<f64>) -> f64 {
    match kind {
        ExerciseKind::Standard => weight,
        ExerciseKind::Bodyweight | ExerciseKind::Assisted => body_weight.unwrap_or(0.0) + weight,
    }
}

/// Total tonnage for a session's current sets and body weight
pub fn session_tonnage(sets: &[&ExerciseSet], body_weight: Option<f64>) -> f64 {
    sets.iter()
        .map(|set| set.reps as f64 * effective_weight(set.exercise_kind, set.weight, body_weight))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn set(kind: ExerciseKind, reps: i32, weight: f64) -> ExerciseSet {
        ExerciseSet {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            exercise_name: "Test".into(),
            exercise_kind: kind,
            set_number: 1,
            reps,
            weight,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_standard_uses_external_load_only() {
        assert_eq!(
            effective_weight(ExerciseKind::Standard, 135.0, Some(180.0)),
            135.0
        );
    }

    #[test]
    fn test_bodyweight_adds_lifter_mass() {
        assert_eq!(
            effective_weight(ExerciseKind::Bodyweight, 25.0, Some(180.0)),
            205.0
        );
    }

    #[test]
    fn test_assisted_subtracts_via_negative_weight() {
        assert_eq!(
            effective_weight(ExerciseKind::Assisted, -40.0, Some(180.0)),
            140.0
        );
    }

    #[test]
    fn test_missing_body_weight_counts_as_zero() {
        assert_eq!(effective_weight(ExerciseKind::Bodyweight, 10.0, None), 10.0);
    }

    #[test]
    fn test_empty_session_is_zero() {
        assert_eq!(session_tonnage(&[], Some(180.0)), 0.0);
    }

    #[test]
    fn test_mixed_session() {
        let bench = set(ExerciseKind::Standard, 8, 135.0);
        let pullup = set(ExerciseKind::Bodyweight, 5, 0.0);
        let dips = set(ExerciseKind::Assisted, 10, -40.0);

        let sets: Vec<&ExerciseSet> = vec![&bench, &pullup, &dips];
        // 8*135 + 5*180 + 10*(180-40)
        assert_eq!(session_tonnage(&sets, Some(180.0)), 1080.0 + 900.0 + 1400.0);
    }

    #[test]
    fn test_body_weight_change_affects_all_bodyweight_sets() {
        let a = set(ExerciseKind::Bodyweight, 5, 0.0);
        let b = set(ExerciseKind::Bodyweight, 5, 0.0);
        let sets: Vec<&ExerciseSet> = vec![&a, &b];

        assert_eq!(session_tonnage(&sets, Some(180.0)), 1800.0);
        assert_eq!(session_tonnage(&sets, Some(175.0)), 1750.0);
    }
}
