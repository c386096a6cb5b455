//! Provider-facing payload.
//!
//! Mirrors the JSON document a CRUD layer produces from its database:
//!
//! ```json
//! {
//!   "rooms": ["R1"],
//!   "batches": ["B1"],
//!   "days": ["Mon", "Tue"],
//!   "timeslots": ["9-10", "10-11"],
//!   "subjects": { "CS101": { "name": "Intro to CS", "hours_per_week": 3, "batches": ["B1"] } },
//!   "faculty": { "Dr. Smith": { "subjects": ["CS101"] } }
//! }
//! ```
//!
//! Subject and faculty maps are ordered by key, which fixes gene order for
//! a given document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::instance::{Name, ProblemInstance};
use crate::error::InstanceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePayload {
    #[serde(default)]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub batches: Vec<String>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub timeslots: Vec<String>,
    #[serde(default)]
    pub subjects: BTreeMap<String, SubjectPayload>,
    #[serde(default)]
    pub faculty: BTreeMap<String, FacultyPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hours_per_week: u32,
    #[serde(default)]
    pub batches: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyPayload {
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl TryFrom<InstancePayload> for ProblemInstance {
    type Error = InstanceError;

    fn try_from(payload: InstancePayload) -> Result<Self, Self::Error> {
        let mut builder = ProblemInstance::builder()
            .rooms(payload.rooms)
            .batches(payload.batches)
            .days(payload.days)
            .timeslots(payload.timeslots);
        for (code, subject) in payload.subjects {
            builder = builder.subject(code, subject.name, subject.hours_per_week, subject.batches);
        }
        for (name, member) in payload.faculty {
            builder = builder.faculty(name, member.subjects);
        }
        builder.build()
    }
}

impl From<ProblemInstance> for InstancePayload {
    fn from(instance: ProblemInstance) -> Self {
        InstancePayload {
            rooms: names(instance.rooms()),
            batches: names(instance.batches()),
            days: names(instance.days()),
            timeslots: names(instance.timeslots()),
            subjects: instance
                .subjects()
                .iter()
                .map(|s| {
                    (
                        s.code.to_string(),
                        SubjectPayload {
                            name: s.name.clone(),
                            hours_per_week: s.hours_per_week,
                            batches: names(&s.batches),
                        },
                    )
                })
                .collect(),
            faculty: instance
                .faculty()
                .iter()
                .map(|f| {
                    (
                        f.name.to_string(),
                        FacultyPayload {
                            subjects: names(&f.subjects),
                        },
                    )
                })
                .collect(),
        }
    }
}

fn names(list: &[Name]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}
