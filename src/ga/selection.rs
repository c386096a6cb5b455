//! Parent selection.
//!
//! Tournament selection: draw `k` distinct individuals uniformly at random
//! and keep the one with the lowest fitness. Larger `k` means stronger
//! selection pressure; the solver uses `k = 5`.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::seq::index;
use rand::Rng;

use super::types::Timetable;

/// Returns the index of the tournament winner, or `None` for an empty
/// population.
///
/// Contestants are drawn without replacement; `k` is clamped to
/// `1..=population.len()`. Ties go to the contestant drawn first.
pub fn tournament<R: Rng>(population: &[Timetable], k: usize, rng: &mut R) -> Option<usize> {
    let n = population.len();
    if n == 0 {
        return None;
    }

    let contestants = index::sample(rng, n, k.clamp(1, n));
    contestants
        .iter()
        .reduce(|best, idx| {
            if population[idx].fitness() < population[best].fitness() {
                idx
            } else {
                best
            }
        })
}
