//! Filters
//!
//! Shopper-selected catalog filters. Each axis is a [`FilterSet`]; an empty set places no
//! restriction on that axis.

use rust_decimal::Decimal;
use smallvec::SmallVec;

/// A set of lower-cased filter values, kept sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: SmallVec<[String; 5]>,
}

impl FilterSet {
    /// Create a new filter set from owned strings.
    #[must_use]
    pub fn new(values: SmallVec<[String; 5]>) -> Self {
        let mut set = Self {
            values: values
                .into_iter()
                .map(|value| value.trim().to_lowercase())
                .filter(|value| !value.is_empty())
                .collect(),
        };

        set.values.sort();
        set.values.dedup();

        set
    }

    /// Create a new filter set from string slices.
    pub fn from_strs(values: &[&str]) -> Self {
        Self::new(values.iter().map(ToString::to_string).collect())
    }

    /// Add a value to the set.
    pub fn add(&mut self, value: &str) {
        let value = value.trim().to_lowercase();

        if value.is_empty() {
            return;
        }

        if let Err(pos) = self.values.binary_search(&value) {
            self.values.insert(pos, value);
        }
    }

    /// Remove a value from the set.
    pub fn remove(&mut self, value: &str) {
        let value = value.trim().to_lowercase();

        if let Ok(pos) = self.values.binary_search(&value) {
            self.values.remove(pos);
        }
    }

    /// Whether `value` is selected, ignoring case.
    pub fn contains(&self, value: &str) -> bool {
        self.values
            .binary_search(&value.trim().to_lowercase())
            .is_ok()
    }

    /// Whether `candidate` contains any selected value as a case-insensitive substring.
    ///
    /// An empty set matches nothing; callers decide whether an empty set means "unrestricted".
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();

        self.values
            .iter()
            .any(|value| candidate.contains(value.as_str()))
    }

    /// Whether the set has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of selected values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over the selected values.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for FilterSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(ToString::to_string).collect())
    }
}

/// Active catalog filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Selected product types
    pub product_types: FilterSet,

    /// Selected colors
    pub colors: FilterSet,

    /// Selected sizes
    pub sizes: FilterSet,

    /// Highest effective price shown
    pub max_price: Decimal,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            product_types: FilterSet::default(),
            colors: FilterSet::default(),
            sizes: FilterSet::default(),
            max_price: Decimal::MAX,
        }
    }
}

impl FilterState {
    /// Filters with no restriction on any axis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given product types.
    #[must_use]
    pub fn with_product_types(mut self, product_types: &[&str]) -> Self {
        self.product_types = FilterSet::from_strs(product_types);
        self
    }

    /// Restrict to the given colors.
    #[must_use]
    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = FilterSet::from_strs(colors);
        self
    }

    /// Restrict to the given sizes.
    #[must_use]
    pub fn with_sizes(mut self, sizes: &[&str]) -> Self {
        self.sizes = FilterSet::from_strs(sizes);
        self
    }

    /// Cap the effective price.
    #[must_use]
    pub fn with_max_price(mut self, max_price: Decimal) -> Self {
        self.max_price = max_price;
        self
    }

    /// Whether any variant-level axis (color or size) narrows the variant list.
    pub fn narrows_variants(&self) -> bool {
        !self.colors.is_empty() || !self.sizes.is_empty()
    }
}
