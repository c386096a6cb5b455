//! Conflict scoring.
//!
//! A timetable's fitness is a non-negative penalty, lower is better and 0
//! means feasible. Three kinds of violation are counted:
//!
//! | Component | Unit | Default weight |
//! |-----------|------|----------------|
//! | Faculty, room and batch double-booking | each occupant beyond the first of a (day, timeslot, resource) key | 10 |
//! | Hour quota | `|assigned - required|` per (batch, subject) | 1 |
//! | Fatigue | each session beyond the second in a run of adjacent timeslots | 1 |
//!
//! Clashes are charged per excess occupant, so a three-way clash costs
//! twice as much as a two-way one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Session;
use crate::problem::ProblemInstance;

/// Penalty weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Per excess occupant of a (day, timeslot, faculty|room|batch) key.
    pub hard: u64,
    /// Per session of quota deviation.
    pub quota: u64,
    /// Per session beyond the second in a consecutive run.
    pub fatigue: u64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            hard: 10,
            quota: 1,
            fatigue: 1,
        }
    }
}

impl FitnessWeights {
    /// Every violation costs 1.
    pub fn flat() -> Self {
        Self {
            hard: 1,
            quota: 1,
            fatigue: 1,
        }
    }
}

/// Unweighted violation counts of one session list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub faculty_clashes: u64,
    pub room_clashes: u64,
    pub batch_clashes: u64,
    pub quota_deviation: u64,
    pub fatigue: u64,
}

impl FitnessBreakdown {
    /// Sum of all clash counts.
    pub fn hard_violations(&self) -> u64 {
        self.faculty_clashes + self.room_clashes + self.batch_clashes
    }

    /// Weighted total, saturating at `u64::MAX`.
    pub fn total(&self, weights: &FitnessWeights) -> u64 {
        self.hard_violations()
            .saturating_mul(weights.hard)
            .saturating_add(self.quota_deviation.saturating_mul(weights.quota))
            .saturating_add(self.fatigue.saturating_mul(weights.fatigue))
    }
}

/// Scores session lists against one instance.
///
/// Cheap to copy; shared by reference with parallel evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    instance: &'a ProblemInstance,
    weights: FitnessWeights,
}

impl<'a> Evaluator<'a> {
    pub fn new(instance: &'a ProblemInstance, weights: FitnessWeights) -> Self {
        Self { instance, weights }
    }

    pub fn instance(&self) -> &'a ProblemInstance {
        self.instance
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    pub fn evaluate(&self, sessions: &[Session]) -> u64 {
        breakdown(sessions, self.instance).total(&self.weights)
    }
}

/// Weighted fitness of `sessions`.
pub fn evaluate(sessions: &[Session], instance: &ProblemInstance, weights: &FitnessWeights) -> u64 {
    breakdown(sessions, instance).total(weights)
}

/// Counts every violation in `sessions`.
pub fn breakdown(sessions: &[Session], instance: &ProblemInstance) -> FitnessBreakdown {
    let mut faculty: HashMap<(&str, &str, &str), u64> = HashMap::new();
    let mut rooms: HashMap<(&str, &str, &str), u64> = HashMap::new();
    let mut batches: HashMap<(&str, &str, &str), u64> = HashMap::new();

    for s in sessions {
        *faculty.entry((&*s.day, &*s.timeslot, &*s.faculty)).or_default() += 1;
        *rooms.entry((&*s.day, &*s.timeslot, &*s.room)).or_default() += 1;
        *batches.entry((&*s.day, &*s.timeslot, &*s.batch)).or_default() += 1;
    }

    FitnessBreakdown {
        faculty_clashes: excess(&faculty),
        room_clashes: excess(&rooms),
        batch_clashes: excess(&batches),
        quota_deviation: quota_deviation(sessions, instance),
        fatigue: fatigue(sessions, instance),
    }
}

fn excess<K>(occupancy: &HashMap<K, u64>) -> u64 {
    occupancy.values().map(|&k| k.saturating_sub(1)).sum()
}

/// Sum of `|assigned - required|` over every (batch, subject) pair that is
/// either required by the instance or present in `sessions`.
fn quota_deviation(sessions: &[Session], instance: &ProblemInstance) -> u64 {
    let mut balance: HashMap<(&str, &str), i64> = HashMap::new();
    for subject in instance.subjects() {
        for batch in &subject.batches {
            balance.insert((&**batch, &*subject.code), i64::from(subject.hours_per_week));
        }
    }
    for s in sessions {
        *balance.entry((&*s.batch, &*s.subject)).or_insert(0) -= 1;
    }
    balance.values().map(|v| v.unsigned_abs()).sum()
}

/// Penalizes runs of more than two timeslot-adjacent sessions per batch and day.
///
/// Adjacency follows the instance's declared timeslot order. Sessions with an
/// unknown timeslot do not take part.
fn fatigue(sessions: &[Session], instance: &ProblemInstance) -> u64 {
    let mut days: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for s in sessions {
        if let Some(slot) = instance.timeslot_index(&s.timeslot) {
            days.entry((&*s.batch, &*s.day)).or_default().push(slot);
        }
    }

    let mut penalty = 0;
    for slots in days.values_mut() {
        slots.sort_unstable();
        let mut run = 1;
        for pair in slots.windows(2) {
            if pair[1] == pair[0] + 1 {
                run += 1;
            } else {
                run = 1;
            }
            if run > 2 {
                penalty += 1;
            }
        }
    }
    penalty
}
