//! The generation loop.
//!
//! [`SearchRunner`] seeds a population, then per generation:
//! sort → convergence check → stagnation check → elitism + offspring.
//! A run ends in one of the [`Termination`] states and always yields the
//! lowest-fitness timetable of its final population.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use super::config::SearchConfig;
use super::fitness::Evaluator;
use super::operators::{random_sessions, relocate_mutation, single_point_crossover};
use super::selection::tournament;
use super::types::{Session, Timetable};
use crate::error::Result;
use crate::problem::ProblemInstance;
use crate::random::create_rng;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The best timetable reached fitness 0.
    Converged,
    /// No strict improvement for `stagnation_limit` generations.
    Stagnated,
    /// `max_generations` were used up.
    Exhausted,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimedOut,
    /// The instance admits no session at all; nothing was searched.
    NoSessions,
}

/// Result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Lowest-fitness timetable of the final population.
    pub best: Timetable,

    /// Generations entered (sorted and checked).
    pub generations: usize,

    pub termination: Termination,

    /// Best fitness of the population at each generation entered.
    pub fitness_history: Vec<u64>,

    /// Seed of the run's generator, when the runner created it.
    pub seed: Option<u64>,
}

impl SearchOutcome {
    pub fn fitness(&self) -> u64 {
        self.best.fitness()
    }
}

/// Tracks generations without strict improvement of the best-ever fitness.
///
/// ```
/// use u_timetable::ga::StagnationTracker;
///
/// let mut t = StagnationTracker::new();
/// assert!(t.observe(30));
/// assert!(!t.observe(30));
/// assert_eq!(t.stagnant_for(), 1);
/// assert!(t.observe(12));
/// assert_eq!(t.stagnant_for(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagnationTracker {
    best: Option<u64>,
    stagnant: usize,
}

impl StagnationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a generation's best fitness.
    ///
    /// Returns `true` and resets the counter on strict improvement;
    /// otherwise increments the counter by one.
    pub fn observe(&mut self, fitness: u64) -> bool {
        match self.best {
            Some(best) if fitness >= best => {
                self.stagnant += 1;
                false
            }
            _ => {
                self.best = Some(fitness);
                self.stagnant = 0;
                true
            }
        }
    }

    /// Best fitness observed so far.
    pub fn best(&self) -> Option<u64> {
        self.best
    }

    /// Consecutive generations without strict improvement.
    pub fn stagnant_for(&self) -> usize {
        self.stagnant
    }
}

/// Executes the timetable GA.
///
/// # Usage
///
/// ```
/// use u_timetable::ga::{SearchConfig, SearchRunner, Termination};
/// use u_timetable::problem::ProblemInstance;
///
/// let instance = ProblemInstance::builder()
///     .rooms(["R1"])
///     .batches(["B1"])
///     .days(["Mon"])
///     .timeslots(["9-10", "10-11"])
///     .subject("CS101", "Intro to CS", 2, ["B1"])
///     .faculty("Dr. Smith", ["CS101"])
///     .build()
///     .unwrap();
///
/// let config = SearchConfig::default().with_seed(42);
/// let outcome = SearchRunner::run(&instance, &config).unwrap();
/// assert_eq!(outcome.termination, Termination::Converged);
/// assert_eq!(outcome.fitness(), 0);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs one search.
    ///
    /// Fails only if `config` is invalid.
    pub fn run(instance: &ProblemInstance, config: &SearchConfig) -> Result<SearchOutcome> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs one search with an optional cancellation flag.
    ///
    /// The flag is checked at the start of every generation; once set, the
    /// run returns the best timetable of its current population.
    pub fn run_with_cancel(
        instance: &ProblemInstance,
        config: &SearchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchOutcome> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let mut outcome = Self::run_with_rng(instance, config, &mut rng, cancel.as_deref())?;
        outcome.seed = Some(seed);
        Ok(outcome)
    }

    /// Runs one search drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored; the same generator state always produces
    /// the same outcome.
    #[tracing::instrument(
        level = "debug",
        name = "GA search",
        skip_all,
        fields(population = config.population_size, sessions = instance.session_count())
    )]
    pub fn run_with_rng<R: Rng>(
        instance: &ProblemInstance,
        config: &SearchConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<SearchOutcome> {
        config.validate()?;

        let evaluator = Evaluator::new(instance, config.weights);
        let deadline = config
            .time_limit_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        // 1. Initialize population
        let genes: Vec<Vec<Session>> = (0..config.population_size)
            .map(|_| random_sessions(instance, rng))
            .collect();

        if genes.iter().all(Vec::is_empty) {
            tracing::warn!(
                "initial population is empty; check rooms, days, timeslots and faculty-subject assignments"
            );
            return Ok(SearchOutcome {
                best: Timetable::new(Vec::new(), &evaluator),
                generations: 0,
                termination: Termination::NoSessions,
                fitness_history: Vec::new(),
                seed: None,
            });
        }

        // 2. Evaluate initial population
        let mut population = evaluate_all(genes, &evaluator, config.parallel);

        let mut tracker = StagnationTracker::new();
        let mut fitness_history = Vec::with_capacity(config.max_generations.min(1024));
        let mut generations = 0;
        let mut termination = Termination::Exhausted;

        // 3. Evolutionary loop
        for generation in 0..config.max_generations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                termination = Termination::Cancelled;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                termination = Termination::TimedOut;
                break;
            }

            // Sort population by fitness (ascending = best first)
            population.sort_by_key(Timetable::fitness);
            generations = generation + 1;

            let best = population[0].fitness();
            fitness_history.push(best);

            if best == 0 {
                termination = Termination::Converged;
                break;
            }

            if tracker.observe(best) {
                tracing::debug!(generation, fitness = best, "new best fitness");
            }

            if config.stagnation_limit > 0 && tracker.stagnant_for() >= config.stagnation_limit {
                termination = Termination::Stagnated;
                break;
            }

            population = next_generation(&population, &evaluator, config, rng);
            tracing::trace!(generation, best, "generation complete");
        }

        let best = population
            .into_iter()
            .min_by_key(Timetable::fitness)
            .unwrap_or_else(|| Timetable::new(Vec::new(), &evaluator));

        tracing::info!(
            ?termination,
            generations,
            fitness = best.fitness(),
            "search finished"
        );

        Ok(SearchOutcome {
            best,
            generations,
            termination,
            fitness_history,
            seed: None,
        })
    }
}

/// Builds the next generation from a population sorted best-first.
///
/// The top `elite_count` timetables are carried over unchanged; the rest
/// are offspring of tournament-selected parents, crossed at one point and
/// possibly mutated.
fn next_generation<R: Rng>(
    population: &[Timetable],
    evaluator: &Evaluator<'_>,
    config: &SearchConfig,
    rng: &mut R,
) -> Vec<Timetable> {
    let size = config.population_size;
    let elite_count = config.elite_count().min(population.len());

    let mut offspring: Vec<Vec<Session>> = Vec::with_capacity(size - elite_count);
    while elite_count + offspring.len() < size {
        let (Some(p1), Some(p2)) = (
            tournament(population, config.tournament_size, rng),
            tournament(population, config.tournament_size, rng),
        ) else {
            break;
        };
        let (c1, c2) =
            single_point_crossover(population[p1].sessions(), population[p2].sessions(), rng);

        for mut child in [c1, c2] {
            if elite_count + offspring.len() >= size {
                break;
            }
            relocate_mutation(&mut child, evaluator.instance(), config.mutation_rate, rng);
            offspring.push(child);
        }
    }

    let mut next = Vec::with_capacity(size);
    next.extend_from_slice(&population[..elite_count]);
    next.extend(evaluate_all(offspring, evaluator, config.parallel));
    next
}

/// Scores gene lists, in parallel when requested.
fn evaluate_all(
    genes: Vec<Vec<Session>>,
    evaluator: &Evaluator<'_>,
    parallel: bool,
) -> Vec<Timetable> {
    if parallel {
        genes
            .into_par_iter()
            .map(|sessions| Timetable::new(sessions, evaluator))
            .collect()
    } else {
        genes
            .into_iter()
            .map(|sessions| Timetable::new(sessions, evaluator))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
