//! Search configuration.
//!
//! [`SearchConfig`] holds all parameters that control the evolutionary loop
//! and the number of independent runs. It is an ordinary value: concurrent
//! runs each read their own copy, and nothing is process-wide.

use serde::{Deserialize, Serialize};

use super::fitness::FitnessWeights;
use crate::error::ConfigError;

/// Configuration for the timetable GA.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 300);
/// assert_eq!(config.stagnation_limit, 50);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(5)
///     .with_elite_ratio(0.1)
///     .with_mutation_rate(0.1)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of timetables in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Number of distinct contestants per tournament.
    pub tournament_size: usize,

    /// Fraction of the population carried over unchanged (0.0–1.0).
    ///
    /// The elite count is `floor(population_size * elite_ratio)`.
    pub elite_ratio: f64,

    /// Probability of relocating one session of an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Generations without strict improvement of the best-ever fitness
    /// before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Penalty weights of the fitness function.
    pub weights: FitnessWeights,

    /// Whether offspring are scored in parallel using rayon.
    ///
    /// Does not affect results: scoring is deterministic.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed per call.
    pub seed: Option<u64>,

    /// Optional wall-clock limit per run in milliseconds.
    ///
    /// Checked at the start of each generation, so a run may overshoot by
    /// one generation's worth of work.
    pub time_limit_ms: Option<u64>,

    /// Number of independent runs the aggregator ranks.
    pub runs: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            tournament_size: 5,
            elite_ratio: 0.1,
            mutation_rate: 0.1,
            stagnation_limit: 50,
            weights: FitnessWeights::default(),
            parallel: true,
            seed: None,
            time_limit_ms: None,
            runs: 3,
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the number of independent runs.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Number of elites carried into each next generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    /// Preset for quick feasibility checks.
    ///
    /// - Population: 50, Generations: 100, Stagnation limit: 20, Time limit: 10s
    ///
    /// The time limit makes a seeded run machine-dependent: a slow host may
    /// stop with [`TimedOut`](super::Termination::TimedOut) before the
    /// generation a fast one reaches. Clear `time_limit_ms` for reproducible
    /// results.
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            stagnation_limit: 20,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset matching the defaults. Has no time limit, so seeded runs
    /// reproduce on any machine.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for large timetables.
    ///
    /// - Population: 150, Generations: 500, Stagnation limit: 80, Time limit: 60s
    ///
    /// Like [`fast()`](Self::fast), the time limit can end a seeded run early.
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            max_generations: 500,
            stagnation_limit: 80,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Picks a preset from the number of sessions per timetable.
    ///
    /// - `session_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ session_count < 200` → [`balanced()`](Self::balanced)
    /// - `session_count ≥ 200` → [`quality()`](Self::quality)
    pub fn auto_select(session_count: usize) -> Self {
        if session_count < 50 {
            Self::fast()
        } else if session_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if self.elite_count() >= self.population_size {
            return Err(ConfigError::EliteFillsPopulation);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.runs == 0 {
            return Err(ConfigError::NoRuns);
        }
        Ok(())
    }
}
