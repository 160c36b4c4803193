//! Category assignment for a fixed node population.
//!
//! The first `floor(node_count * male_ratio)` ids are male and the rest
//! female. Edge generation never depends on id order, so no shuffling is
//! performed.

use crate::{
    Result,
    category::{Category, CategoryCounts},
    error::NetworkError,
};

/// A network member.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Node {
    /// Identifier in `0..node_count`.
    pub id: usize,
    /// Category fixed at creation.
    pub category: Category,
}

/// Returns the number of male nodes for `node_count` and `male_ratio`.
///
/// The product is truncated towards zero.
///
/// # Errors
/// Returns [`NetworkError::InvalidConfiguration`] when `node_count` is zero or
/// `male_ratio` is not strictly between zero and one.
///
/// # Examples
/// ```
/// use socialwalk_core::male_count;
///
/// assert_eq!(male_count(10, 0.5)?, 5);
/// assert_eq!(male_count(7, 0.4)?, 2);
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the product lies in [0, node_count) once the ratio is validated"
)]
#[expect(clippy::float_arithmetic, reason = "ratio scaling is floating-point")]
pub fn male_count(node_count: usize, male_ratio: f64) -> Result<usize> {
    validate_population(node_count, male_ratio)?;
    let males = (node_count as f64 * male_ratio).floor() as usize;
    Ok(males.min(node_count))
}

/// Builds `node_count` nodes with ids `0..node_count`, the first
/// [`male_count`] of which are male.
///
/// # Errors
/// Returns [`NetworkError::InvalidConfiguration`] under the same conditions
/// as [`male_count`].
///
/// # Examples
/// ```
/// use socialwalk_core::{Category, assign_categories};
///
/// let nodes = assign_categories(4, 0.5)?;
/// let categories: Vec<_> = nodes.iter().map(|node| node.category).collect();
/// assert_eq!(
///     categories,
///     [Category::Male, Category::Male, Category::Female, Category::Female],
/// );
/// # Ok::<(), socialwalk_core::NetworkError>(())
/// ```
pub fn assign_categories(node_count: usize, male_ratio: f64) -> Result<Vec<Node>> {
    let males = male_count(node_count, male_ratio)?;
    Ok((0..node_count)
        .map(|id| Node {
            id,
            category: if id < males {
                Category::Male
            } else {
                Category::Female
            },
        })
        .collect())
}

/// Tallies the categories of `nodes`.
#[must_use]
pub fn census(nodes: &[Node]) -> CategoryCounts {
    nodes.iter().map(|node| node.category).collect()
}

pub(crate) fn validate_population(node_count: usize, male_ratio: f64) -> Result<()> {
    if node_count == 0 {
        return Err(NetworkError::invalid_configuration(
            "node_count must be greater than zero",
        ));
    }
    if !male_ratio.is_finite() || male_ratio <= 0.0 || male_ratio >= 1.0 {
        return Err(NetworkError::invalid_configuration(format!(
            "male_ratio must lie strictly between 0 and 1 (got {male_ratio})"
        )));
    }
    Ok(())
}
