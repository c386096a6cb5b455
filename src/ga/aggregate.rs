//! Multiple ranked options.
//!
//! [`Aggregator`] runs [`SearchRunner`] `config.runs` times on rayon's pool,
//! each run with its own generator, joins them and ranks the results by
//! fitness so a user can choose between alternatives.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use super::config::SearchConfig;
use super::runner::{SearchOutcome, SearchRunner};
use crate::error::Result;
use crate::problem::ProblemInstance;
use crate::random::{create_rng, derive_seed};

/// One ranked alternative.
#[derive(Debug, Clone, Serialize)]
pub struct RankedOption {
    /// 1-based rank; option 1 has the lowest fitness.
    pub option: usize,

    /// Fitness of the best timetable, repeated at the top level.
    pub fitness: u64,

    /// Index of the run that produced it.
    pub run: usize,

    #[serde(flatten)]
    pub outcome: SearchOutcome,
}

impl RankedOption {
    pub fn fitness(&self) -> u64 {
        self.fitness
    }
}

/// Runs independent searches and ranks them.
///
/// With `config.seed = Some(s)`, run `i` is seeded with
/// [`derive_seed(s, i)`](crate::random::derive_seed), so the whole ranking
/// is reproducible.
pub struct Aggregator;

impl Aggregator {
    /// Runs `config.runs` searches and returns them sorted ascending by fitness.
    ///
    /// Ties keep run order.
    pub fn run(instance: &ProblemInstance, config: &SearchConfig) -> Result<Vec<RankedOption>> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Like [`run`](Self::run); the flag is shared by every run.
    pub fn run_with_cancel(
        instance: &ProblemInstance,
        config: &SearchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Vec<RankedOption>> {
        config.validate()?;

        let base = config.seed.unwrap_or_else(rand::random);
        tracing::info!(runs = config.runs, seed = base, "starting ranked search");

        let outcomes: Vec<SearchOutcome> = (0..config.runs)
            .into_par_iter()
            .map(|run| -> Result<SearchOutcome> {
                let seed = derive_seed(base, run as u64);
                let mut rng = create_rng(seed);
                let mut outcome =
                    SearchRunner::run_with_rng(instance, config, &mut rng, cancel.as_deref())?;
                outcome.seed = Some(seed);
                Ok(outcome)
            })
            .collect::<Result<_>>()?;

        let mut ranked: Vec<(usize, SearchOutcome)> = outcomes.into_iter().enumerate().collect();
        ranked.sort_by_key(|(_, outcome)| outcome.fitness());

        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(i, (run, outcome))| RankedOption {
                option: i + 1,
                fitness: outcome.fitness(),
                run,
                outcome,
            })
            .collect())
    }
}

/// Ranks `config.runs` independent runs. Shorthand for [`Aggregator::run`].
pub fn solve(instance: &ProblemInstance, config: &SearchConfig) -> Result<Vec<RankedOption>> {
    Aggregator::run(instance, config)
}
