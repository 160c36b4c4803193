//! Node categories and category tallies.

use std::fmt;

/// Binary attribute carried by every node.
///
/// # Examples
/// ```
/// use socialwalk_core::Category;
///
/// assert_eq!(Category::Male.other(), Category::Female);
/// assert_eq!(Category::Female.as_str(), "female");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Category {
    /// Category A.
    Male,
    /// Category B.
    Female,
}

impl Category {
    /// Both categories in canonical order.
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    /// Returns the opposite category.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }

    /// Returns the lowercase label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiset of categories, stored as one counter per category.
///
/// # Examples
/// ```
/// use socialwalk_core::{Category, CategoryCounts};
///
/// let mut counts = CategoryCounts::default();
/// counts.record(Category::Female);
/// counts.record(Category::Female);
/// counts.record(Category::Male);
/// assert_eq!(counts.total(), 3);
/// assert_eq!(counts.get(Category::Female), 2);
/// assert_eq!(counts.fraction(Category::Male), Some(1.0 / 3.0));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CategoryCounts {
    male: usize,
    female: usize,
}

impl CategoryCounts {
    /// Builds a tally from explicit counters.
    #[must_use]
    pub const fn new(male: usize, female: usize) -> Self {
        Self { male, female }
    }

    /// Adds one observation of `category`.
    pub const fn record(&mut self, category: Category) {
        match category {
            Category::Male => self.male += 1,
            Category::Female => self.female += 1,
        }
    }

    /// Returns the count recorded for `category`.
    #[must_use]
    pub const fn get(&self, category: Category) -> usize {
        match category {
            Category::Male => self.male,
            Category::Female => self.female,
        }
    }

    /// Returns the number of observations across both categories.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.male + self.female
    }

    /// Returns the share of observations belonging to `category`, or `None`
    /// when nothing has been recorded.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "tallies are far below 2^52 in any realistic walk"
    )]
    #[expect(clippy::float_arithmetic, reason = "fractions are floating-point ratios")]
    pub fn fraction(&self, category: Category) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.get(category) as f64 / total as f64)
    }

    /// Returns the category with fewer observations; ties resolve to
    /// [`Category::Female`].
    #[must_use]
    pub const fn minority(&self) -> Category {
        if self.male < self.female {
            Category::Male
        } else {
            Category::Female
        }
    }
}

impl FromIterator<Category> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut counts = Self::default();
        for category in iter {
            counts.record(category);
        }
        counts
    }
}

impl fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "male: {}, female: {}", self.male, self.female)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::fewer_males(CategoryCounts::new(3, 7), Category::Male)]
    #[case::fewer_females(CategoryCounts::new(7, 3), Category::Female)]
    #[case::tie(CategoryCounts::new(5, 5), Category::Female)]
    fn minority_prefers_smaller_tally(#[case] counts: CategoryCounts, #[case] expected: Category) {
        assert_eq!(counts.minority(), expected);
    }

    #[rstest]
    fn fraction_is_none_when_empty() {
        assert_eq!(CategoryCounts::default().fraction(Category::Male), None);
    }

    #[rstest]
    fn collects_from_iterator() {
        let counts: CategoryCounts = [Category::Male, Category::Female, Category::Female]
            .into_iter()
            .collect();
        assert_eq!(counts, CategoryCounts::new(1, 2));
        assert_eq!(counts.to_string(), "male: 1, female: 2");
    }
}
