//! Classroom timetabling with a genetic algorithm.
//!
//! Assigns every required (subject, batch, hour) a day, timeslot, room and
//! eligible faculty member so that no faculty member, room or batch is
//! double-booked, weekly quotas are met and no batch sits through more than
//! two consecutive sessions.
//!
//! - [`problem`]: the immutable problem instance and its provider payload
//! - [`ga`]: fitness model, operators, search loop and ranked runs
//! - [`random`]: seeded generators for reproducible runs
//! - [`error`]: contract-violation errors
//!
//! The search is a heuristic with a fixed generation budget and early
//! stopping on stagnation. It does not guarantee a feasible timetable; a
//! non-zero fitness reports what remains unresolved.
//!
//! ```
//! use u_timetable::ga::{solve, SearchConfig};
//! use u_timetable::problem::ProblemInstance;
//!
//! let instance = ProblemInstance::builder()
//!     .rooms(["R1", "R2"])
//!     .batches(["B1"])
//!     .standard_week()
//!     .subject("CS101", "Intro to CS", 3, ["B1"])
//!     .subject("MA101", "Maths I", 4, ["B1"])
//!     .faculty("Dr. Smith", ["CS101"])
//!     .faculty("Dr. Jones", ["MA101"])
//!     .build()
//!     .unwrap();
//!
//! let options = solve(&instance, &SearchConfig::default().with_seed(7)).unwrap();
//! assert_eq!(options.len(), 3);
//! assert!(options[0].fitness() <= options[2].fitness());
//! ```

pub mod error;
pub mod ga;
pub mod problem;
pub mod random;

pub use error::{ConfigError, InstanceError, TimetableError};
