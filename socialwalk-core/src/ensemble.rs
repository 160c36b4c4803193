//! Repeated independent walks over one frozen graph.
//!
//! Every walk owns a [`SmallRng`] seeded from the ensemble's base seed and
//! the walk index, so results do not depend on how walks are scheduled. With
//! the `parallel` feature the walks run on the rayon pool; without it they run
//! one after another on the calling thread.

use rand::{SeedableRng, rngs::SmallRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    Result,
    attributes::Node,
    error::NetworkError,
    graph::SocialGraph,
    walk::{
        WalkConfig,
        metropolis::{MetropolisHastingsReport, TransitionRule, metropolis_hastings_walk},
        simple::{RandomWalkReport, random_walk},
    },
};

/// SplitMix64 increment (the 64-bit golden ratio) used for per-walk seed
/// derivation.
const WALK_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Derives the seed of walk `walk_index` from `base_seed`.
#[inline]
#[must_use]
pub fn mix_walk_seed(base_seed: u64, walk_index: usize) -> u64 {
    splitmix64(base_seed ^ ((walk_index as u64).wrapping_add(1).wrapping_mul(WALK_SEED_SPACING)))
}

#[inline]
const fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(WALK_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Mean and population standard deviation of a per-walk statistic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    /// Mean across walks.
    pub mean: f64,
    /// Population standard deviation across walks.
    pub std_dev: f64,
}

impl Estimate {
    /// Summary of a single walk: its value with no spread.
    ///
    /// # Examples
    /// ```
    /// use socialwalk_core::Estimate;
    ///
    /// assert_eq!(Estimate::exact(0.3).std_dev, 0.0);
    /// ```
    #[must_use]
    pub const fn exact(mean: f64) -> Self {
        Self { mean, std_dev: 0.0 }
    }

    #[expect(clippy::cast_precision_loss, reason = "walk counts are far below 2^52")]
    #[expect(clippy::float_arithmetic, reason = "summary statistics are fractional")]
    fn from_samples(samples: impl Iterator<Item = f64> + Clone) -> Self {
        let count = samples.clone().count();
        if count == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let mean = samples.clone().sum::<f64>() / count as f64;
        let variance = samples.map(|value| (value - mean).powi(2)).sum::<f64>() / count as f64;
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// Aggregated outcome of [`random_walk_ensemble`].
#[derive(Clone, Debug, PartialEq)]
pub struct RandomWalkEnsemble {
    reports: Vec<RandomWalkReport>,
    observed: Estimate,
    unbiased: Estimate,
}

impl RandomWalkEnsemble {
    /// Per-walk reports in walk-index order.
    #[must_use]
    pub fn reports(&self) -> &[RandomWalkReport] {
        &self.reports
    }

    /// Summary of the observed probabilities.
    #[must_use]
    pub const fn observed(&self) -> Estimate {
        self.observed
    }

    /// Summary of the inverse-degree weighted probabilities.
    #[must_use]
    pub const fn unbiased(&self) -> Estimate {
        self.unbiased
    }
}

/// Aggregated outcome of [`metropolis_hastings_ensemble`].
#[derive(Clone, Debug, PartialEq)]
pub struct MetropolisHastingsEnsemble {
    reports: Vec<MetropolisHastingsReport>,
    probability: Estimate,
}

impl MetropolisHastingsEnsemble {
    /// Per-walk reports in walk-index order.
    #[must_use]
    pub fn reports(&self) -> &[MetropolisHastingsReport] {
        &self.reports
    }

    /// Summary of the per-walk focus probabilities.
    #[must_use]
    pub const fn probability(&self) -> Estimate {
        self.probability
    }
}

/// Runs `walks` independent simple random walks.
///
/// # Errors
/// Returns [`NetworkError::InvalidConfiguration`] when `walks` is zero, and
/// the first error any walk reports otherwise.
///
/// # Examples
/// ```
/// use socialwalk_core::{SocialGraph, WalkConfig, assign_categories, random_walk_ensemble};
///
/// let nodes = assign_categories(10, 0.5)?;
/// let graph = SocialGraph::complete(10);
/// let ensemble = random_walk_ensemble(&graph, &nodes, &WalkConfig::new(100), 8, 42)?;
/// assert_eq!(ensemble.reports().len(), 8);
/// assert!((ensemble.observed().mean - 0.5).abs() < 0.15);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[instrument(
    name = "core.random_walk_ensemble",
    err,
    skip(graph, nodes, config),
    fields(steps = config.steps()),
)]
pub fn random_walk_ensemble(
    graph: &SocialGraph,
    nodes: &[Node],
    config: &WalkConfig,
    walks: usize,
    base_seed: u64,
) -> Result<RandomWalkEnsemble> {
    let reports = run_indexed(walks, |index| {
        let mut rng = SmallRng::seed_from_u64(mix_walk_seed(base_seed, index));
        random_walk(graph, nodes, config, &mut rng)
    })?;
    let ensemble = RandomWalkEnsemble {
        observed: Estimate::from_samples(reports.iter().map(RandomWalkReport::observed_probability)),
        unbiased: Estimate::from_samples(reports.iter().map(RandomWalkReport::unbiased_probability)),
        reports,
    };
    info!(
        observed = ensemble.observed.mean,
        unbiased = ensemble.unbiased.mean,
        "random walk ensemble completed"
    );
    Ok(ensemble)
}

/// Runs `walks` independent Metropolis-Hastings walks with `rule`.
///
/// # Errors
/// Returns [`NetworkError::InvalidConfiguration`] when `walks` is zero, and
/// the first error any walk reports otherwise.
#[instrument(
    name = "core.metropolis_hastings_ensemble",
    err,
    skip(graph, nodes, config, rule),
    fields(steps = config.steps()),
)]
pub fn metropolis_hastings_ensemble<T>(
    graph: &SocialGraph,
    nodes: &[Node],
    config: &WalkConfig,
    rule: &T,
    walks: usize,
    base_seed: u64,
) -> Result<MetropolisHastingsEnsemble>
where
    T: TransitionRule + Sync + ?Sized,
{
    let reports = run_indexed(walks, |index| {
        let mut rng = SmallRng::seed_from_u64(mix_walk_seed(base_seed, index));
        metropolis_hastings_walk(graph, nodes, config, rule, &mut rng)
    })?;
    let ensemble = MetropolisHastingsEnsemble {
        probability: Estimate::from_samples(
            reports.iter().map(MetropolisHastingsReport::probability),
        ),
        reports,
    };
    info!(
        probability = ensemble.probability.mean,
        "metropolis-hastings ensemble completed"
    );
    Ok(ensemble)
}

fn run_indexed<T, F>(walks: usize, walk: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Send + Sync,
{
    if walks == 0 {
        return Err(NetworkError::invalid_configuration(
            "an ensemble needs at least one walk",
        ));
    }
    #[cfg(feature = "parallel")]
    {
        (0..walks).into_par_iter().map(walk).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..walks).map(walk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::attributes::assign_categories;

    #[rstest]
    fn walk_seeds_are_distinct() {
        let seeds: std::collections::HashSet<u64> =
            (0..64).map(|index| mix_walk_seed(7, index)).collect();
        assert_eq!(seeds.len(), 64);
    }

    #[rstest]
    fn estimate_of_constant_samples_has_no_spread() {
        let estimate = Estimate::from_samples([0.25_f64; 4].into_iter());
        assert_eq!(estimate.mean, 0.25);
        assert_eq!(estimate.std_dev, 0.0);
    }

    #[rstest]
    fn ensembles_are_reproducible() {
        let nodes = assign_categories(12, 0.25).expect("valid population");
        let graph = SocialGraph::complete(12);
        let config = WalkConfig::new(60);
        let first = random_walk_ensemble(&graph, &nodes, &config, 6, 99).expect("ensemble runs");
        let second = random_walk_ensemble(&graph, &nodes, &config, 6, 99).expect("ensemble runs");
        assert_eq!(first, second);
    }

    #[rstest]
    fn ensemble_matches_individually_seeded_walks() {
        let nodes = assign_categories(10, 0.3).expect("valid population");
        let graph = SocialGraph::complete(10);
        let config = WalkConfig::new(40);
        let ensemble = random_walk_ensemble(&graph, &nodes, &config, 5, 17).expect("ensemble runs");
        let sequential: Vec<RandomWalkReport> = (0..5)
            .map(|index| {
                let mut rng = SmallRng::seed_from_u64(mix_walk_seed(17, index));
                random_walk(&graph, &nodes, &config, &mut rng).expect("walk runs")
            })
            .collect();
        assert_eq!(ensemble.reports(), sequential.as_slice());
    }

    #[rstest]
    fn exact_estimate_has_no_spread() {
        assert_eq!(
            Estimate::exact(0.4),
            Estimate {
                mean: 0.4,
                std_dev: 0.0
            }
        );
    }

    #[rstest]
    fn empty_ensemble_is_rejected() {
        let nodes = assign_categories(4, 0.5).expect("valid population");
        let graph = SocialGraph::complete(4);
        let err = metropolis_hastings_ensemble(
            &graph,
            &nodes,
            &WalkConfig::new(5),
            &crate::MetropolisHastings,
            0,
            1,
        )
        .expect_err("zero walks must be rejected");
        assert!(matches!(err, NetworkError::InvalidConfiguration { .. }));
    }
}
