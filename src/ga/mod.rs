//! Genetic-algorithm timetable solver.
//!
//! A timetable is encoded as an ordered list of [`Session`] genes, one per
//! required (subject, batch, hour). The search minimizes a weighted conflict
//! score computed by [`fitness`].
//!
//! # Key Types
//!
//! - [`Session`] / [`Timetable`]: gene and chromosome
//! - [`Evaluator`] / [`FitnessWeights`]: scoring
//! - [`SearchConfig`]: algorithm parameters (population size, rates, limits)
//! - [`SearchRunner`]: executes one evolutionary run
//! - [`Aggregator`]: runs several searches in parallel and ranks them
//!
//! # Submodules
//!
//! - [`operators`]: initialization, single-point crossover, relocation mutation
//! - [`fitness`]: hard and soft constraint scoring
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod aggregate;
mod config;
pub mod fitness;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use aggregate::{solve, Aggregator, RankedOption};
pub use config::SearchConfig;
pub use fitness::{breakdown, evaluate, Evaluator, FitnessBreakdown, FitnessWeights};
pub use runner::{SearchOutcome, SearchRunner, StagnationTracker, Termination};
pub use selection::tournament;
pub use types::{Session, Timetable};
