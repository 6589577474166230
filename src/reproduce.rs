//! Functions related to reproducing on the specie and global population scale.

use crate::{
    crossover::crossover,
    genome::{Genome, InnoGen},
    random::Happens,
};
use rand::Rng;

/// Two distinct members of `pool`, or `None` if it has fewer than 2
#[inline]
pub fn uniq_2<'a, T>(pool: &'a [T], rng: &mut impl Rng) -> Option<(&'a T, &'a T)> {
    let len = pool.len();
    if len < 2 {
        return None;
    }

    let l = rng.random_range(0..len);
    let r = rng.random_range(0..len - 1);
    Some((&pool[l], &pool[if r >= l { r + 1 } else { r }]))
}

/// Two parents out of `pool`. A lone member is paired with itself
pub fn parents<'a, T>(pool: &'a [T], rng: &mut impl Rng) -> Option<(&'a T, &'a T)> {
    match pool {
        [] => None,
        [lone] => Some((lone, lone)),
        _ => uniq_2(pool, rng),
    }
}

/// Cross `l` with `r` and mutate the child
pub fn offspring(l: &Genome, r: &Genome, rng: &mut impl Happens, innogen: &mut InnoGen) -> Genome {
    let mut child = crossover(l, r, rng);
    child.mutate(rng, innogen);
    child
}

/// Allocate a share of `population` to every specie, proportional to its average fitness.
/// Negative averages are worth nothing, and if no specie is worth anything every specie gets an
/// even share. Shares are floored, so they may not add up to the whole population.
pub fn population_alloc(averages: &[f64], population: usize) -> Vec<usize> {
    if averages.is_empty() {
        return vec![];
    }

    let fit_total = averages.iter().fold(0., |acc, n| acc + n.max(0.));
    if !(fit_total > 0.) || !fit_total.is_finite() {
        return vec![population / averages.len(); averages.len()];
    }

    let population_f = population as f64;
    averages
        .iter()
        .map(|avg| f64::floor(population_f * avg.max(0.) / fit_total) as usize)
        .collect()
}
