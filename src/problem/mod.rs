//! Problem instance: rooms, days, timeslots, batches, subjects and faculty.
//!
//! - [`ProblemInstance`]: immutable, validated-shape scheduling universe
//! - [`InstanceBuilder`]: programmatic construction
//! - [`InstancePayload`]: the wire shape handed over by a data provider

mod instance;
mod payload;

pub use instance::{
    Faculty, InstanceBuilder, Name, ProblemInstance, Subject, STANDARD_DAYS, STANDARD_TIMESLOTS,
};
pub use payload::{FacultyPayload, InstancePayload, SubjectPayload};
