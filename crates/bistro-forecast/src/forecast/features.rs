use serde::Serialize;
use std::collections::BTreeMap;

/// Named inputs the trained models were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Year,
    Month,
    SalesQty,
    SalesAmount,
    Rating,
    CityCode,
    CuisineCode,
}

impl Feature {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Year,
            Self::Month,
            Self::SalesQty,
            Self::SalesAmount,
            Self::Rating,
            Self::CityCode,
            Self::CuisineCode,
        ]
    }

    /// Column name used in the training data and in artifact `feature_names`.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::SalesQty => "sales_qty",
            Self::SalesAmount => "sales_amount",
            Self::Rating => "Ratings",
            Self::CityCode => "City_encoded",
            Self::CuisineCode => "Cuisine_encoded",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|feature| feature.column() == column)
    }
}

/// Feature mapping handed to one prediction stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    values: BTreeMap<Feature, f64>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.values.insert(feature, value);
        self
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.values.get(&feature).copied()
    }

    /// Looks a value up by training column name.
    pub fn column(&self, name: &str) -> Option<f64> {
        Feature::from_column(name).and_then(|feature| self.get(feature))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
