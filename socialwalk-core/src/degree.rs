//! Gaussian degree targets keyed by ordered category pairs.

use std::f64::consts::PI;

use rand::Rng;

use crate::{Result, category::Category, error::NetworkError};

/// Normal distribution from which a node draws how many partners of one
/// category it wants.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use socialwalk_core::DegreeDistribution;
///
/// let fixed = DegreeDistribution::new(4.4, 0.0)?;
/// let mut rng = SmallRng::seed_from_u64(7);
/// assert_eq!(fixed.sample(&mut rng), 4);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegreeDistribution {
    mean: f64,
    std_dev: f64,
}

impl DegreeDistribution {
    /// Creates a distribution after checking both parameters are finite and
    /// non-negative.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidConfiguration`] for negative or
    /// non-finite parameters.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        let distribution = Self { mean, std_dev };
        distribution.validate()?;
        Ok(distribution)
    }

    /// Mean of the distribution.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation of the distribution.
    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Draws a degree target: a Gaussian sample clipped below at zero and
    /// rounded to the nearest integer.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is clipped to be non-negative and rounded first"
    )]
    #[expect(clippy::float_arithmetic, reason = "Gaussian scaling is floating-point")]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw = self.mean + self.std_dev * standard_normal_sample(rng);
        if draw.is_finite() {
            draw.max(0.0).round() as usize
        } else {
            0
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [("mean", self.mean), ("std_dev", self.std_dev)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::invalid_configuration(format!(
                    "degree distribution {name} must be finite and non-negative (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// The four degree distributions governing graph generation, one per ordered
/// `(node category, partner category)` pair.
///
/// # Examples
/// ```
/// use socialwalk_core::{Category, ConnectionProfile};
///
/// let profile = ConnectionProfile::default();
/// let male_male = profile.distribution(Category::Male, Category::Male);
/// assert_eq!((male_male.mean(), male_male.std_dev()), (23.0, 5.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionProfile {
    /// How many males a male wants to befriend.
    pub male_to_male: DegreeDistribution,
    /// How many females a male wants to befriend.
    pub male_to_female: DegreeDistribution,
    /// How many males a female wants to befriend.
    pub female_to_male: DegreeDistribution,
    /// How many females a female wants to befriend.
    pub female_to_female: DegreeDistribution,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            male_to_male: DegreeDistribution {
                mean: 23.0,
                std_dev: 5.0,
            },
            male_to_female: DegreeDistribution {
                mean: 5.0,
                std_dev: 3.0,
            },
            female_to_male: DegreeDistribution {
                mean: 5.0,
                std_dev: 3.0,
            },
            female_to_female: DegreeDistribution {
                mean: 12.0,
                std_dev: 3.0,
            },
        }
    }
}

impl ConnectionProfile {
    /// Builds a profile from `(mean, std_dev)` pairs in
    /// male→male, male→female, female→male, female→female order.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidConfiguration`] when any parameter is
    /// negative or non-finite.
    ///
    /// # Examples
    /// ```
    /// use socialwalk_core::ConnectionProfile;
    ///
    /// let profile = ConnectionProfile::from_pairs((20.0, 6.0), (6.0, 4.0), (4.0, 2.0), (10.0, 3.0))?;
    /// assert_eq!(profile.female_to_male.mean(), 4.0);
    /// assert!(ConnectionProfile::from_pairs((1.0, -1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0)).is_err());
    /// # Ok::<(), socialwalk_core::NetworkError>(())
    /// ```
    pub fn from_pairs(
        male_to_male: (f64, f64),
        male_to_female: (f64, f64),
        female_to_male: (f64, f64),
        female_to_female: (f64, f64),
    ) -> Result<Self> {
        Ok(Self {
            male_to_male: DegreeDistribution::new(male_to_male.0, male_to_male.1)?,
            male_to_female: DegreeDistribution::new(male_to_female.0, male_to_female.1)?,
            female_to_male: DegreeDistribution::new(female_to_male.0, female_to_male.1)?,
            female_to_female: DegreeDistribution::new(female_to_female.0, female_to_female.1)?,
        })
    }

    /// Returns the distribution a node of category `from` uses for partners
    /// of category `to`.
    #[must_use]
    pub const fn distribution(&self, from: Category, to: Category) -> &DegreeDistribution {
        match (from, to) {
            (Category::Male, Category::Male) => &self.male_to_male,
            (Category::Male, Category::Female) => &self.male_to_female,
            (Category::Female, Category::Male) => &self.female_to_male,
            (Category::Female, Category::Female) => &self.female_to_female,
        }
    }

    /// Re-checks every distribution; fields are public so a profile can be
    /// assembled without going through [`DegreeDistribution::new`].
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidConfiguration`] for the first invalid
    /// distribution.
    pub fn validate(&self) -> Result<()> {
        for from in Category::ALL {
            for to in Category::ALL {
                self.distribution(from, to).validate()?;
            }
        }
        Ok(())
    }
}

/// Draws a standard normal sample with the Box-Muller transform.
#[expect(
    clippy::float_arithmetic,
    reason = "Box-Muller transform requires floating-point arithmetic"
)]
pub(crate) fn standard_normal_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let mut u1 = rng.gen_range(0.0_f64..1.0_f64);
    if u1 <= f64::EPSILON {
        u1 = f64::EPSILON;
    }
    let u2 = rng.gen_range(0.0_f64..1.0_f64);
    let radius = (-2.0_f64 * u1.ln()).sqrt();
    radius * (2.0_f64 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    #[rstest]
    #[case::negative_mean(-1.0, 1.0)]
    #[case::negative_std(1.0, -0.5)]
    #[case::nan_mean(f64::NAN, 1.0)]
    #[case::infinite_std(1.0, f64::INFINITY)]
    fn rejects_invalid_parameters(#[case] mean: f64, #[case] std_dev: f64) {
        let err = DegreeDistribution::new(mean, std_dev).expect_err("parameters must be rejected");
        assert!(matches!(err, NetworkError::InvalidConfiguration { .. }));
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(2.5, 3)]
    #[case(2.49, 2)]
    fn zero_spread_rounds_mean(#[case] mean: f64, #[case] expected: usize) {
        let distribution = DegreeDistribution::new(mean, 0.0).expect("valid distribution");
        let mut rng = SmallRng::seed_from_u64(11);
        assert!((0..16).all(|_| distribution.sample(&mut rng) == expected));
    }

    #[rstest]
    fn samples_are_clipped_at_zero() {
        // A mean of zero with a wide spread draws negative values half the time.
        let distribution = DegreeDistribution::new(0.0, 10.0).expect("valid distribution");
        let mut rng = SmallRng::seed_from_u64(3);
        let draws: Vec<usize> = (0..256).map(|_| distribution.sample(&mut rng)).collect();
        assert!(draws.contains(&0));
        assert!(draws.iter().any(|&draw| draw > 0));
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "sample mean check")]
    #[expect(clippy::cast_precision_loss, reason = "small sample counts")]
    fn sample_mean_tracks_distribution_mean() {
        let distribution = DegreeDistribution::new(20.0, 4.0).expect("valid distribution");
        let mut rng = SmallRng::seed_from_u64(42);
        let draws = 4_000_usize;
        let total: usize = (0..draws).map(|_| distribution.sample(&mut rng)).sum();
        let mean = total as f64 / draws as f64;
        assert!((mean - 20.0).abs() < 0.5, "sample mean {mean} strayed from 20");
    }

    #[rstest]
    fn profile_selects_ordered_pair() {
        let profile = ConnectionProfile::from_pairs((1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0))
            .expect("valid profile");
        let means: Vec<f64> = Category::ALL
            .iter()
            .flat_map(|&from| Category::ALL.map(|to| profile.distribution(from, to).mean()))
            .collect();
        assert_eq!(means, [1.0, 2.0, 3.0, 4.0]);
    }

    #[rstest]
    fn validate_catches_hand_built_profiles() {
        let mut profile = ConnectionProfile::default();
        profile.female_to_female = DegreeDistribution {
            mean: -3.0,
            std_dev: 1.0,
        };
        assert!(profile.validate().is_err());
    }
}
