//! Timetable genetic operators.
//!
//! - [`random_sessions`] / [`build_individual`]: random initial timetables
//! - [`single_point_crossover`] / [`crossover`]: splice two gene lists at one cut
//! - [`relocate_mutation`] / [`mutate`]: move one session to a random slot
//!
//! The gene-list variants leave scoring to the caller; the `Timetable`
//! variants return freshly scored timetables.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::fitness::Evaluator;
use super::types::{Session, Timetable};
use crate::problem::{Name, ProblemInstance};

// ============================================================================
// Initialization
// ============================================================================

/// Picks a uniformly random (day, timeslot, room).
///
/// Returns `None` if any of the three domains is empty.
pub fn random_placement<R: Rng>(
    instance: &ProblemInstance,
    rng: &mut R,
) -> Option<(Name, Name, Name)> {
    let day = instance.days().choose(rng)?.clone();
    let timeslot = instance.timeslots().choose(rng)?.clone();
    let room = instance.rooms().choose(rng)?.clone();
    Some((day, timeslot, room))
}

/// Generates one random gene list.
///
/// For every subject and every batch taking it, `hours_per_week` sessions
/// are placed at random with a random eligible faculty member. Subjects
/// nobody can teach are skipped. Without rooms, days or timeslots the list
/// is empty.
pub fn random_sessions<R: Rng>(instance: &ProblemInstance, rng: &mut R) -> Vec<Session> {
    let mut sessions = Vec::with_capacity(instance.session_count());

    for subject in instance.subjects() {
        let faculty = instance.eligible_faculty(&subject.code);
        if faculty.is_empty() {
            continue;
        }
        for batch in &subject.batches {
            for _ in 0..subject.hours_per_week {
                let Some((day, timeslot, room)) = random_placement(instance, rng) else {
                    return Vec::new();
                };
                let Some(member) = faculty.choose(rng) else {
                    break;
                };
                sessions.push(Session {
                    day,
                    timeslot,
                    room,
                    batch: batch.clone(),
                    subject: subject.code.clone(),
                    faculty: member.clone(),
                });
            }
        }
    }
    sessions
}

/// Creates one random, scored timetable.
pub fn build_individual<R: Rng>(evaluator: &Evaluator<'_>, rng: &mut R) -> Timetable {
    Timetable::new(random_sessions(evaluator.instance(), rng), evaluator)
}

// ============================================================================
// Crossover
// ============================================================================

/// Single-point crossover on gene lists.
///
/// A cut is drawn in `[1, n - 1]`, `n` being the shorter parent's length.
/// Child A takes `parent1[..cut] + parent2[cut..]`, child B the complement,
/// so together the children hold exactly the parents' sessions. Parents
/// with fewer than two sessions are returned as copies.
pub fn single_point_crossover<R: Rng>(
    parent1: &[Session],
    parent2: &[Session],
    rng: &mut R,
) -> (Vec<Session>, Vec<Session>) {
    let n = parent1.len().min(parent2.len());
    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cut = rng.random_range(1..n);
    let child1 = parent1[..cut].iter().chain(&parent2[cut..]).cloned().collect();
    let child2 = parent2[..cut].iter().chain(&parent1[cut..]).cloned().collect();
    (child1, child2)
}

/// Crosses two timetables and scores both children.
pub fn crossover<R: Rng>(
    parent1: &Timetable,
    parent2: &Timetable,
    evaluator: &Evaluator<'_>,
    rng: &mut R,
) -> (Timetable, Timetable) {
    let (a, b) = single_point_crossover(parent1.sessions(), parent2.sessions(), rng);
    (Timetable::new(a, evaluator), Timetable::new(b, evaluator))
}

// ============================================================================
// Mutation
// ============================================================================

/// With probability `rate`, replaces one random session by a copy moved to
/// a random day, timeslot and room.
///
/// Batch, subject and faculty never change. Returns `true` if a session
/// was replaced.
pub fn relocate_mutation<R: Rng>(
    sessions: &mut [Session],
    instance: &ProblemInstance,
    rate: f64,
    rng: &mut R,
) -> bool {
    if rng.random_range(0.0..1.0) >= rate || sessions.is_empty() {
        return false;
    }
    let idx = rng.random_range(0..sessions.len());
    match random_placement(instance, rng) {
        Some((day, timeslot, room)) => {
            sessions[idx] = sessions[idx].relocated(day, timeslot, room);
            true
        }
        None => false,
    }
}

/// Applies [`relocate_mutation`] and returns a freshly scored timetable.
///
/// The result is rescored even when no session moved.
pub fn mutate<R: Rng>(
    timetable: Timetable,
    evaluator: &Evaluator<'_>,
    rate: f64,
    rng: &mut R,
) -> Timetable {
    let mut sessions = timetable.into_sessions();
    relocate_mutation(&mut sessions, evaluator.instance(), rate, rng);
    Timetable::new(sessions, evaluator)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::FitnessWeights;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn campus() -> ProblemInstance {
        ProblemInstance::builder()
            .rooms(["R1", "R2", "R3"])
            .batches(["B1", "B2"])
            .standard_week()
            .subject("CS101", "Intro to CS", 3, ["B1", "B2"])
            .subject("MA101", "Maths I", 4, ["B1", "B2"])
            .subject("AI201", "Intro to AI", 2, ["B1"])
            .subject("EE201", "Basic Electronics", 3, ["B2"])
            .faculty("F1", ["CS101", "AI201"])
            .faculty("F2", ["MA101", "CS101"])
            .faculty("F3", ["EE201"])
            .build()
            .unwrap()
    }

    fn multiset(sessions: &[Session]) -> HashMap<&Session, usize> {
        let mut m = HashMap::new();
        for s in sessions {
            *m.entry(s).or_insert(0) += 1;
        }
        m
    }

    // ---- Initialization ----

    #[test]
    fn test_random_sessions_meet_quota_and_eligibility() {
        let inst = campus();
        let mut rng = create_rng(42);
        let sessions = random_sessions(&inst, &mut rng);
        assert_eq!(sessions.len(), inst.session_count());
        assert_eq!(sessions.len(), 6 + 8 + 2 + 3);

        for s in &sessions {
            assert!(inst.is_faculty_eligible(&s.faculty, &s.subject), "{s}");
            assert!(inst.is_batch_eligible(&s.batch, &s.subject), "{s}");
            assert!(inst.has_room(&s.room));
            assert!(inst.day_index(&s.day).is_some());
            assert!(inst.timeslot_index(&s.timeslot).is_some());
        }
        // Quota component is zero by construction.
        assert_eq!(crate::ga::breakdown(&sessions, &inst).quota_deviation, 0);
    }

    #[test]
    fn test_subject_without_faculty_is_skipped() {
        let inst = ProblemInstance::builder()
            .rooms(["R1"])
            .batches(["B1"])
            .standard_week()
            .subject("S", "Staffed", 2, ["B1"])
            .subject("U", "Unstaffed", 3, ["B1"])
            .faculty("F", ["S"])
            .build()
            .unwrap();
        let mut rng = create_rng(1);
        let sessions = random_sessions(&inst, &mut rng);
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| &*s.subject == "S"));
    }

    #[test]
    fn test_no_rooms_gives_empty_individual() {
        let inst = ProblemInstance::builder()
            .batches(["B1"])
            .standard_week()
            .subject("S", "S", 2, ["B1"])
            .faculty("F", ["S"])
            .build()
            .unwrap();
        let eval = Evaluator::new(&inst, FitnessWeights::default());
        let mut rng = create_rng(1);
        assert!(build_individual(&eval, &mut rng).is_empty());
    }

    #[test]
    fn test_build_individual_scored() {
        let inst = campus();
        let eval = Evaluator::new(&inst, FitnessWeights::default());
        let mut rng = create_rng(5);
        let t = build_individual(&eval, &mut rng);
        assert_eq!(t.fitness(), eval.evaluate(t.sessions()));
    }

    // ---- Crossover ----

    #[test]
    fn test_crossover_splices_at_cut() {
        let inst = campus();
        let mut rng = create_rng(9);
        let p1 = random_sessions(&inst, &mut rng);
        let p2 = random_sessions(&inst, &mut rng);
        let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);

        let n = p1.len();
        assert_eq!(c1.len(), n);
        assert_eq!(c2.len(), n);
        // Some cut in [1, n-1] explains both children.
        let explained = (1..n).any(|cut| {
            c1[..cut] == p1[..cut]
                && c1[cut..] == p2[cut..]
                && c2[..cut] == p2[..cut]
                && c2[cut..] == p1[cut..]
        });
        assert!(explained);
    }

    #[test]
    fn test_crossover_degenerate_parents_copied() {
        let mut rng = create_rng(1);
        let one = vec![Session::new("Mon", "9-10", "R1", "B1", "S", "F")];
        let many = vec![
            Session::new("Tue", "9-10", "R1", "B1", "S", "F"),
            Session::new("Wed", "9-10", "R1", "B1", "S", "F"),
        ];
        let (a, b) = single_point_crossover(&one, &many, &mut rng);
        assert_eq!(a, one);
        assert_eq!(b, many);

        let (a, b) = single_point_crossover(&[], &[], &mut rng);
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn test_crossover_children_rescored() {
        let inst = campus();
        let eval = Evaluator::new(&inst, FitnessWeights::default());
        let mut rng = create_rng(11);
        let p1 = build_individual(&eval, &mut rng);
        let p2 = build_individual(&eval, &mut rng);
        let (c1, c2) = crossover(&p1, &p2, &eval, &mut rng);
        assert_eq!(c1.fitness(), eval.evaluate(c1.sessions()));
        assert_eq!(c2.fitness(), eval.evaluate(c2.sessions()));
    }

    // ---- Mutation ----

    #[test]
    fn test_mutation_rate_zero_is_noop() {
        let inst = campus();
        let mut rng = create_rng(2);
        let original = random_sessions(&inst, &mut rng);
        let mut sessions = original.clone();
        for _ in 0..100 {
            assert!(!relocate_mutation(&mut sessions, &inst, 0.0, &mut rng));
        }
        assert_eq!(sessions, original);
    }

    #[test]
    fn test_mutation_moves_at_most_one_session() {
        let inst = campus();
        let mut rng = create_rng(3);
        let original = random_sessions(&inst, &mut rng);
        let mut sessions = original.clone();
        assert!(relocate_mutation(&mut sessions, &inst, 1.0, &mut rng));
        let changed = sessions
            .iter()
            .zip(&original)
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= 1);
    }

    #[test]
    fn test_mutation_on_empty_list() {
        let inst = campus();
        let mut rng = create_rng(3);
        let mut sessions: Vec<Session> = Vec::new();
        assert!(!relocate_mutation(&mut sessions, &inst, 1.0, &mut rng));
    }

    #[test]
    fn test_mutate_rescores() {
        let inst = campus();
        let eval = Evaluator::new(&inst, FitnessWeights::default());
        let mut rng = create_rng(4);
        for _ in 0..20 {
            let t = build_individual(&eval, &mut rng);
            let m = mutate(t, &eval, 1.0, &mut rng);
            assert_eq!(m.fitness(), eval.evaluate(m.sessions()));
        }
    }

    // ---- Properties ----

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_crossover_is_closed(seed in any::<u64>()) {
            let inst = campus();
            let mut rng = create_rng(seed);
            let p1 = random_sessions(&inst, &mut rng);
            let p2 = random_sessions(&inst, &mut rng);
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);

            prop_assert_eq!(c1.len(), p1.len());
            prop_assert_eq!(c2.len(), p2.len());

            let mut parents: Vec<Session> = p1.clone();
            parents.extend(p2.iter().cloned());
            let mut children: Vec<Session> = c1.clone();
            children.extend(c2.iter().cloned());
            prop_assert_eq!(multiset(&parents), multiset(&children));
        }

        #[test]
        fn prop_mutation_keeps_assignment(seed in any::<u64>()) {
            let inst = campus();
            let mut rng = create_rng(seed);
            let original = random_sessions(&inst, &mut rng);
            let mut sessions = original.clone();
            relocate_mutation(&mut sessions, &inst, 1.0, &mut rng);

            for (after, before) in sessions.iter().zip(&original) {
                prop_assert_eq!(&after.batch, &before.batch);
                prop_assert_eq!(&after.subject, &before.subject);
                prop_assert_eq!(&after.faculty, &before.faculty);
                prop_assert!(inst.is_faculty_eligible(&after.faculty, &after.subject));
            }
        }
    }
}
