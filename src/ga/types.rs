//! Genes and chromosomes.
//!
//! A [`Session`] is one scheduled class; a [`Timetable`] is an ordered list
//! of sessions together with its fitness. The only way to obtain a
//! `Timetable` is through its constructors, which always score the session
//! list, so a cached fitness can never go stale.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fitness::Evaluator;
use crate::error::InstanceError;
use crate::problem::Name;

/// One scheduled class occurrence.
///
/// A plain value: operators replace sessions wholesale instead of editing
/// them, and no two timetables share one mutably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    pub day: Name,
    pub timeslot: Name,
    pub room: Name,
    pub batch: Name,
    pub subject: Name,
    pub faculty: Name,
}

impl Session {
    pub fn new(
        day: impl Into<Name>,
        timeslot: impl Into<Name>,
        room: impl Into<Name>,
        batch: impl Into<Name>,
        subject: impl Into<Name>,
        faculty: impl Into<Name>,
    ) -> Self {
        Self {
            day: day.into(),
            timeslot: timeslot.into(),
            room: room.into(),
            batch: batch.into(),
            subject: subject.into(),
            faculty: faculty.into(),
        }
    }

    /// Returns a copy placed at a different day, timeslot and room.
    ///
    /// Batch, subject and faculty are kept.
    pub fn relocated(&self, day: Name, timeslot: Name, room: Name) -> Self {
        Self {
            day,
            timeslot,
            room,
            ..self.clone()
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.day, self.timeslot, self.room, self.batch, self.subject, self.faculty
        )
    }
}

/// A complete candidate timetable.
///
/// Lower fitness is better; 0 means no clash, every quota met and no batch
/// sits through more than two consecutive sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    sessions: Vec<Session>,
    fitness: u64,
}

impl Timetable {
    /// Scores `sessions` and wraps them.
    ///
    /// The sessions are assumed to reference the evaluator's instance;
    /// use [`try_new`](Self::try_new) for lists from outside the solver.
    pub fn new(sessions: Vec<Session>, evaluator: &Evaluator<'_>) -> Self {
        let fitness = evaluator.evaluate(&sessions);
        Self { sessions, fitness }
    }

    /// Like [`new`](Self::new), but first checks that every session refers
    /// to known identifiers and eligible batch/faculty pairings.
    pub fn try_new(sessions: Vec<Session>, evaluator: &Evaluator<'_>) -> Result<Self, InstanceError> {
        let instance = evaluator.instance();
        for (index, s) in sessions.iter().enumerate() {
            let unknown = |field: &'static str, value: &Name| InstanceError::UnknownReference {
                index,
                field,
                value: value.to_string(),
            };
            if instance.day_index(&s.day).is_none() {
                return Err(unknown("day", &s.day));
            }
            if instance.timeslot_index(&s.timeslot).is_none() {
                return Err(unknown("timeslot", &s.timeslot));
            }
            if !instance.has_room(&s.room) {
                return Err(unknown("room", &s.room));
            }
            if !instance.has_batch(&s.batch) {
                return Err(unknown("batch", &s.batch));
            }
            if instance.subject(&s.subject).is_none() {
                return Err(unknown("subject", &s.subject));
            }
            if !instance.is_batch_eligible(&s.batch, &s.subject) {
                return Err(InstanceError::IneligibleBatch {
                    index,
                    batch: s.batch.to_string(),
                    subject: s.subject.to_string(),
                });
            }
            if !instance.is_faculty_eligible(&s.faculty, &s.subject) {
                return Err(InstanceError::IneligibleFaculty {
                    index,
                    faculty: s.faculty.to_string(),
                    subject: s.subject.to_string(),
                });
            }
        }
        Ok(Self::new(sessions, evaluator))
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn fitness(&self) -> u64 {
        self.fitness
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns `true` if the fitness is 0.
    pub fn is_feasible(&self) -> bool {
        self.fitness == 0
    }

    /// Sessions of one batch, in gene order.
    pub fn for_batch<'a>(&'a self, batch: &'a str) -> impl Iterator<Item = &'a Session> + 'a {
        self.sessions.iter().filter(move |s| &*s.batch == batch)
    }

    /// Gives up the session list, e.g. to build a modified copy.
    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions
    }
}
