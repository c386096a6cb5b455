//! The immutable scheduling universe.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::payload::InstancePayload;
use crate::error::InstanceError;

/// Shared identifier of a room, day, timeslot, batch, subject or faculty member.
///
/// Reference counted so that sessions can be cloned freely during crossover.
pub type Name = Arc<str>;

/// Days used by [`InstanceBuilder::standard_week`].
pub const STANDARD_DAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

/// Timeslots used by [`InstanceBuilder::standard_week`].
pub const STANDARD_TIMESLOTS: [&str; 5] = ["9-10", "10-11", "11-12", "1-2", "2-3"];

/// A subject with its weekly quota and the batches that take it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject code, unique within an instance.
    pub code: Name,
    /// Display name.
    pub name: String,
    /// Required number of sessions per week for each eligible batch.
    pub hours_per_week: u32,
    /// Batches that take this subject.
    pub batches: Vec<Name>,
}

/// A faculty member and the subject codes they can teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub name: Name,
    pub subjects: Vec<Name>,
}

/// Immutable description of one timetabling problem.
///
/// Built with [`ProblemInstance::builder`] or deserialized from an
/// [`InstancePayload`]. Days and timeslots are ordered; their position
/// defines adjacency for the consecutive-session rule.
///
/// The instance is `Sync` and is shared by reference across parallel runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InstancePayload", into = "InstancePayload")]
pub struct ProblemInstance {
    rooms: Vec<Name>,
    days: Vec<Name>,
    timeslots: Vec<Name>,
    batches: Vec<Name>,
    subjects: Vec<Subject>,
    faculty: Vec<Faculty>,

    day_index: HashMap<Name, usize>,
    timeslot_index: HashMap<Name, usize>,
    subject_index: HashMap<Name, usize>,
    /// Parallel to `subjects`.
    eligible_faculty: Vec<Vec<Name>>,
}

impl ProblemInstance {
    /// Starts building an instance.
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    pub fn rooms(&self) -> &[Name] {
        &self.rooms
    }

    pub fn days(&self) -> &[Name] {
        &self.days
    }

    pub fn timeslots(&self) -> &[Name] {
        &self.timeslots
    }

    pub fn batches(&self) -> &[Name] {
        &self.batches
    }

    /// Subjects in declaration order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Faculty in declaration order.
    pub fn faculty(&self) -> &[Faculty] {
        &self.faculty
    }

    /// Looks up a subject by code.
    pub fn subject(&self, code: &str) -> Option<&Subject> {
        self.subject_index.get(code).map(|&i| &self.subjects[i])
    }

    /// Position of `day` in the declared day order.
    pub fn day_index(&self, day: &str) -> Option<usize> {
        self.day_index.get(day).copied()
    }

    /// Position of `timeslot` in the declared timeslot order.
    pub fn timeslot_index(&self, timeslot: &str) -> Option<usize> {
        self.timeslot_index.get(timeslot).copied()
    }

    /// Faculty members eligible to teach `subject`, in declaration order.
    ///
    /// Empty for unknown subjects.
    pub fn eligible_faculty(&self, subject: &str) -> &[Name] {
        self.subject_index
            .get(subject)
            .map(|&i| self.eligible_faculty[i].as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if `faculty` may teach `subject`.
    pub fn is_faculty_eligible(&self, faculty: &str, subject: &str) -> bool {
        self.eligible_faculty(subject)
            .iter()
            .any(|f| &**f == faculty)
    }

    /// Returns `true` if `batch` takes `subject`.
    pub fn is_batch_eligible(&self, batch: &str, subject: &str) -> bool {
        self.subject(subject)
            .is_some_and(|s| s.batches.iter().any(|b| &**b == batch))
    }

    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.iter().any(|r| &**r == room)
    }

    pub fn has_batch(&self, batch: &str) -> bool {
        self.batches.iter().any(|b| &**b == batch)
    }

    /// Weekly sessions `batch` must receive for `subject`; 0 if the batch
    /// does not take the subject.
    pub fn required_hours(&self, batch: &str, subject: &str) -> u32 {
        match self.subject(subject) {
            Some(s) if s.batches.iter().any(|b| &**b == batch) => s.hours_per_week,
            _ => 0,
        }
    }

    /// Subjects no faculty member can teach.
    ///
    /// The solver silently omits their sessions; callers should surface
    /// this list to the user.
    pub fn unsatisfiable_subjects(&self) -> Vec<&Subject> {
        self.subjects
            .iter()
            .zip(&self.eligible_faculty)
            .filter(|(_, fac)| fac.is_empty())
            .map(|(s, _)| s)
            .collect()
    }

    /// Number of sessions each generated individual contains.
    pub fn session_count(&self) -> usize {
        if !self.has_slots() {
            return 0;
        }
        self.subjects
            .iter()
            .zip(&self.eligible_faculty)
            .filter(|(_, fac)| !fac.is_empty())
            .map(|(s, _)| s.hours_per_week as usize * s.batches.len())
            .sum()
    }

    /// Returns `true` if there is at least one (day, timeslot, room) to place a session in.
    pub fn has_slots(&self) -> bool {
        !self.rooms.is_empty() && !self.days.is_empty() && !self.timeslots.is_empty()
    }

    /// Pre-generation checks a data provider should run before solving.
    ///
    /// The solver itself never requires this: degenerate instances simply
    /// yield empty or penalized timetables.
    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.rooms.is_empty() {
            return Err(InstanceError::Empty("rooms"));
        }
        if self.batches.is_empty() {
            return Err(InstanceError::Empty("batches"));
        }
        if self.subjects.is_empty() {
            return Err(InstanceError::Empty("subjects"));
        }
        if self.faculty.is_empty() {
            return Err(InstanceError::Empty("faculty"));
        }
        if self.days.is_empty() {
            return Err(InstanceError::Empty("days"));
        }
        if self.timeslots.is_empty() {
            return Err(InstanceError::Empty("timeslots"));
        }
        if self.faculty.iter().all(|f| f.subjects.is_empty()) {
            return Err(InstanceError::NoFacultyAssignments);
        }

        for subject in &self.subjects {
            if let Some(batch) = subject.batches.iter().find(|b| !self.has_batch(b)) {
                return Err(InstanceError::UnknownBatch {
                    subject: subject.code.to_string(),
                    batch: batch.to_string(),
                });
            }
        }
        for member in &self.faculty {
            if let Some(code) = member.subjects.iter().find(|c| self.subject(c).is_none()) {
                return Err(InstanceError::UnknownSubject {
                    faculty: member.name.to_string(),
                    subject: code.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`ProblemInstance`].
///
/// ```
/// use u_timetable::problem::ProblemInstance;
///
/// let instance = ProblemInstance::builder()
///     .rooms(["R1", "R2"])
///     .batches(["B1"])
///     .standard_week()
///     .subject("CS101", "Intro to CS", 3, ["B1"])
///     .faculty("Dr. Smith", ["CS101"])
///     .build()
///     .unwrap();
///
/// assert_eq!(instance.session_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    rooms: Vec<Name>,
    days: Vec<Name>,
    timeslots: Vec<Name>,
    batches: Vec<Name>,
    subjects: Vec<Subject>,
    faculty: Vec<Faculty>,
}

impl InstanceBuilder {
    pub fn rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.rooms.extend(rooms.into_iter().map(Into::into));
        self
    }

    /// Appends days; order defines adjacency.
    pub fn days<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.days.extend(days.into_iter().map(Into::into));
        self
    }

    /// Appends timeslots; order defines adjacency within a day.
    pub fn timeslots<I, S>(mut self, timeslots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.timeslots.extend(timeslots.into_iter().map(Into::into));
        self
    }

    pub fn batches<I, S>(mut self, batches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.batches.extend(batches.into_iter().map(Into::into));
        self
    }

    /// Uses a Monday–Friday week with five teaching slots.
    pub fn standard_week(self) -> Self {
        self.days(STANDARD_DAYS).timeslots(STANDARD_TIMESLOTS)
    }

    /// Adds a subject taken by `batches`, `hours_per_week` sessions each.
    pub fn subject<I, S>(
        mut self,
        code: impl Into<Name>,
        name: impl Into<String>,
        hours_per_week: u32,
        batches: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.subjects.push(Subject {
            code: code.into(),
            name: name.into(),
            hours_per_week,
            batches: batches.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds a faculty member able to teach `subjects`.
    pub fn faculty<I, S>(mut self, name: impl Into<Name>, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.faculty.push(Faculty {
            name: name.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Builds the instance.
    ///
    /// Fails only on a malformed shape: duplicate days, timeslots, subject
    /// codes or faculty names, a batch listed twice for one subject, or a
    /// subject listed twice for one faculty member. Empty domains are
    /// accepted.
    pub fn build(self) -> Result<ProblemInstance, InstanceError> {
        let day_index = index_unique(&self.days, InstanceError::DuplicateDay)?;
        let timeslot_index = index_unique(&self.timeslots, InstanceError::DuplicateTimeslot)?;
        let subject_codes: Vec<Name> = self.subjects.iter().map(|s| s.code.clone()).collect();
        let subject_index = index_unique(&subject_codes, InstanceError::DuplicateSubject)?;
        let faculty_names: Vec<Name> = self.faculty.iter().map(|f| f.name.clone()).collect();
        index_unique(&faculty_names, InstanceError::DuplicateFaculty)?;

        for subject in &self.subjects {
            index_unique(&subject.batches, |batch| InstanceError::DuplicateSubjectBatch {
                subject: subject.code.to_string(),
                batch,
            })?;
        }
        for member in &self.faculty {
            index_unique(&member.subjects, |code| InstanceError::DuplicateFacultySubject {
                faculty: member.name.to_string(),
                subject: code,
            })?;
        }

        let eligible_faculty = self
            .subjects
            .iter()
            .map(|subject| {
                self.faculty
                    .iter()
                    .filter(|f| f.subjects.iter().any(|c| *c == subject.code))
                    .map(|f| f.name.clone())
                    .collect()
            })
            .collect();

        Ok(ProblemInstance {
            rooms: self.rooms,
            days: self.days,
            timeslots: self.timeslots,
            batches: self.batches,
            subjects: self.subjects,
            faculty: self.faculty,
            day_index,
            timeslot_index,
            subject_index,
            eligible_faculty,
        })
    }
}

fn index_unique(
    names: &[Name],
    duplicate: impl FnOnce(String) -> InstanceError,
) -> Result<HashMap<Name, usize>, InstanceError> {
    let mut index = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            return Err(duplicate(name.to_string()));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProblemInstance {
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
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookups() {
        let inst = sample();
        assert_eq!(inst.timeslot_index("11-12"), Some(2));
        assert_eq!(inst.day_index("Fri"), Some(4));
        assert_eq!(inst.timeslot_index("8-9"), None);
        assert_eq!(inst.subject("MA101").map(|s| s.hours_per_week), Some(4));
        assert!(inst.has_room("R2"));
        assert!(!inst.has_batch("B3"));
    }

    #[test]
    fn test_eligible_faculty_in_declaration_order() {
        let inst = sample();
        let names: Vec<&str> = inst.eligible_faculty("CS101").iter().map(|f| &**f).collect();
        assert_eq!(names, vec!["F1", "F2"]);
        assert!(inst.is_faculty_eligible("F2", "MA101"));
        assert!(!inst.is_faculty_eligible("F1", "MA101"));
        assert!(inst.eligible_faculty("XX999").is_empty());
    }

    #[test]
    fn test_required_hours() {
        let inst = sample();
        assert_eq!(inst.required_hours("B1", "AI201"), 2);
        assert_eq!(inst.required_hours("B2", "AI201"), 0);
        assert_eq!(inst.required_hours("B1", "XX999"), 0);
    }

    #[test]
    fn test_unsatisfiable_subjects_and_session_count() {
        let inst = sample();
        let missing: Vec<&str> = inst
            .unsatisfiable_subjects()
            .iter()
            .map(|s| &*s.code)
            .collect();
        assert_eq!(missing, vec!["EE201"]);
        // CS101 3*2 + MA101 4*2 + AI201 2*1; EE201 has no faculty.
        assert_eq!(inst.session_count(), 16);
    }

    #[test]
    fn test_session_count_without_rooms() {
        let inst = ProblemInstance::builder()
            .batches(["B1"])
            .standard_week()
            .subject("S", "S", 2, ["B1"])
            .faculty("F", ["S"])
            .build()
            .unwrap();
        assert!(!inst.has_slots());
        assert_eq!(inst.session_count(), 0);
    }

    #[test]
    fn test_duplicate_timeslot_rejected() {
        let err = ProblemInstance::builder()
            .timeslots(["9-10", "9-10"])
            .build()
            .unwrap_err();
        assert_eq!(err, InstanceError::DuplicateTimeslot("9-10".into()));
    }

    #[test]
    fn test_duplicate_subject_rejected() {
        let err = ProblemInstance::builder()
            .subject("S", "a", 1, ["B"])
            .subject("S", "b", 1, ["B"])
            .build()
            .unwrap_err();
        assert_eq!(err, InstanceError::DuplicateSubject("S".into()));
    }

    #[test]
    fn test_batch_listed_twice_for_subject_rejected() {
        // Repeats would double the sessions but count once towards the quota.
        let err = ProblemInstance::builder()
            .rooms(["R1"])
            .batches(["B1"])
            .days(["Mon"])
            .timeslots(["1", "2", "3", "4", "5", "6"])
            .subject("S", "S", 1, ["B1", "B1"])
            .faculty("F", ["S"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::DuplicateSubjectBatch {
                subject: "S".into(),
                batch: "B1".into(),
            }
        );
    }

    #[test]
    fn test_subject_listed_twice_for_faculty_rejected() {
        let err = ProblemInstance::builder()
            .subject("S", "S", 1, ["B1"])
            .faculty("F", ["S", "S"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::DuplicateFacultySubject {
                faculty: "F".into(),
                subject: "S".into(),
            }
        );
    }

    #[test]
    fn test_empty_domains_build() {
        let inst = ProblemInstance::builder().build().unwrap();
        assert_eq!(inst.session_count(), 0);
        assert_eq!(inst.validate(), Err(InstanceError::Empty("rooms")));
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_no_assignments() {
        let inst = ProblemInstance::builder()
            .rooms(["R1"])
            .batches(["B1"])
            .standard_week()
            .subject("S", "S", 1, ["B1"])
            .faculty("F", Vec::<&str>::new())
            .build()
            .unwrap();
        assert_eq!(inst.validate(), Err(InstanceError::NoFacultyAssignments));
    }

    #[test]
    fn test_validate_unknown_references() {
        let inst = ProblemInstance::builder()
            .rooms(["R1"])
            .batches(["B1"])
            .standard_week()
            .subject("S", "S", 1, ["B9"])
            .faculty("F", ["S"])
            .build()
            .unwrap();
        assert!(matches!(
            inst.validate(),
            Err(InstanceError::UnknownBatch { .. })
        ));

        let inst = ProblemInstance::builder()
            .rooms(["R1"])
            .batches(["B1"])
            .standard_week()
            .subject("S", "S", 1, ["B1"])
            .faculty("F", ["S", "T"])
            .build()
            .unwrap();
        assert_eq!(
            inst.validate(),
            Err(InstanceError::UnknownSubject {
                faculty: "F".into(),
                subject: "T".into()
            })
        );
    }
}
