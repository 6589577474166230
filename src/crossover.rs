//! Crossover reproduction, and the genetic distance used to decide specie membership. Both align
//! genes by innovation id.

use crate::{
    config::Config,
    genome::{Connection, Genome},
    random::{EvolutionEvent, Happens},
};
use fxhash::{FxHashMap, FxHashSet};

/// Number of genes that appear in exactly one of `l` and `r`
pub fn disjoint_excess_count(l: &[Connection], r: &[Connection]) -> usize {
    let l_innos = l.iter().map(Connection::inno).collect::<FxHashSet<_>>();
    let r_innos = r.iter().map(Connection::inno).collect::<FxHashSet<_>>();
    l_innos.symmetric_difference(&r_innos).count()
}

/// Mean absolute weight difference across matching genes.
/// If genomes share no matching genes, their average diff is 0
pub fn avg_param_diff(l: &[Connection], r: &[Connection]) -> f64 {
    let (short, long) = match (l.len(), r.len()) {
        (0, _) | (_, 0) => return 0.,
        (l_len, r_len) if l_len < r_len => (l, r),
        _ => (r, l),
    };

    let s_weights = short
        .iter()
        .map(|c| (c.inno, c.weight))
        .collect::<FxHashMap<usize, f64>>();

    let mut count = 0.;
    let diff_sum = long
        .iter()
        .filter_map(|c| {
            s_weights.get(&c.inno).map(|s_w| {
                count += 1.;
                (s_w - c.weight).abs()
            })
        })
        .sum::<f64>();

    if count == 0. {
        0.
    } else {
        diff_sum / count
    }
}

/// Compatibility distance between two gene lists, normalized by the longer one
pub fn delta(
    l: &[Connection],
    r: &[Connection],
    disjoint_coefficient: f64,
    param_coefficient: f64,
) -> f64 {
    let n = l.len().max(r.len());
    if n == 0 {
        return 0.;
    }

    disjoint_coefficient * disjoint_excess_count(l, r) as f64 / n as f64
        + param_coefficient * avg_param_diff(l, r)
}

pub fn compatibility_distance(l: &Genome, r: &Genome, config: &Config) -> f64 {
    delta(
        l.connections(),
        r.connections(),
        config.disjoint_coefficient,
        config.param_coefficient,
    )
}

pub fn is_same_specie(l: &Genome, r: &Genome, config: &Config) -> bool {
    compatibility_distance(l, r, config) < config.specie_threshold
}

/// Produce a child of `l` and `r`. Matching genes come from either parent at random. Genes only
/// one parent has come from the fitter parent, or from both with [EvolutionEvent::KeepExclusive]
/// odds when the parents are equally fit. Every gene is copied, so the child shares nothing with
/// its parents.
pub fn crossover(l: &Genome, r: &Genome, rng: &mut impl Happens) -> Genome {
    let equal = l.fitness == r.fitness;
    let (fit, unfit) = if r.fitness > l.fitness { (r, l) } else { (l, r) };

    let unfit_genes = unfit
        .connections()
        .iter()
        .map(|c| (c.inno, c))
        .collect::<FxHashMap<_, _>>();
    let fit_innos = fit
        .connections()
        .iter()
        .map(Connection::inno)
        .collect::<FxHashSet<_>>();

    let mut child = Genome::new(fit.sensory(), fit.action());
    for gene in fit.connections() {
        match unfit_genes.get(&gene.inno) {
            Some(other) => {
                let pick = if rng.happens(EvolutionEvent::PickLeft) {
                    gene
                } else {
                    *other
                };
                child.inherit(pick.clone());
            }
            None => {
                if !equal || rng.happens(EvolutionEvent::KeepExclusive) {
                    child.inherit(gene.clone());
                }
            }
        }
    }

    if equal {
        for gene in unfit
            .connections()
            .iter()
            .filter(|c| !fit_innos.contains(&c.inno))
        {
            if rng.happens(EvolutionEvent::KeepExclusive) {
                child.inherit(gene.clone());
            }
        }
    }

    child.extend_biases(unfit.biases());
    child.extend_biases(fit.biases());
    child
}
