use super::domain::{ForecastRequest, InputError};
use super::encoder::{EncodedLabel, LabelEncoder, UnknownLabel, UnknownLabelPolicy};
use super::features::{Feature, FeatureSet};
use super::predictor::PredictionError;
use super::registry::ModelRegistry;
use super::report::ForecastReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

pub const MONTHS_IN_YEAR: usize = 12;
const SUCCESS_CLASSES: usize = 2;
const MAX_RATING: f64 = 5.0;

/// The five dependent prediction steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Rating,
    Sales,
    Success,
    CityAffinity,
    MonthAffinity,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Sales => "sales",
            Self::Success => "success probability",
            Self::CityAffinity => "city affinity",
            Self::MonthAffinity => "month affinity",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which categorical input an encoding concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    City,
    Cuisine,
}

impl CategoricalField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Cuisine => "cuisine",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("unknown {}: {source}", .field.label())]
    UnknownLabel {
        field: CategoricalField,
        source: UnknownLabel,
    },
    #[error("{stage} stage failed: {source}")]
    Prediction {
        stage: Stage,
        source: PredictionError,
    },
}

impl ForecastError {
    fn at(stage: Stage) -> impl FnOnce(PredictionError) -> Self {
        move |source| Self::Prediction { stage, source }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProbability {
    pub city: String,
    pub probability: f64,
}

/// Raw stage outputs for one request. Distributions are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_rating: f64,
    pub predicted_sales: f64,
    pub success_probability: f64,
    /// Every vocabulary city, most likely first.
    pub city_distribution: Vec<CityProbability>,
    /// Index 0 is January.
    pub month_distribution: Vec<f64>,
}

impl PredictionResult {
    pub fn best_city(&self) -> Option<&CityProbability> {
        self.city_distribution.first()
    }

    /// Calendar month (1-12) with the highest probability; the earliest wins ties.
    pub fn best_month(&self) -> u8 {
        let mut best = (0, f64::NEG_INFINITY);
        for (index, probability) in self.month_distribution.iter().copied().enumerate() {
            if probability > best.1 {
                best = (index, probability);
            }
        }
        (best.0 + 1) as u8
    }
}

/// Prediction plus non-fatal observations made while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub warnings: Vec<String>,
}

/// Runs the staged forecast against an injected [`ModelRegistry`].
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    registry: ModelRegistry,
    policy: UnknownLabelPolicy,
}

impl ForecastEngine {
    pub fn new(registry: ModelRegistry, policy: UnknownLabelPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn cities(&self) -> &[String] {
        self.registry.city_encoder.classes()
    }

    pub fn cuisines(&self) -> &[String] {
        self.registry.cuisine_encoder.classes()
    }

    /// Predicts and assembles the full dashboard report.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastReport, ForecastError> {
        let outcome = self.predict(request)?;
        let report = ForecastReport::build(request, outcome);
        info!(
            restaurant = %request.restaurant_name,
            best_city = report.best_city.as_deref().unwrap_or("-"),
            best_month = report.best_month,
            success = report.prediction.success_probability,
            warnings = report.warnings.len(),
            "forecast ready"
        );
        Ok(report)
    }

    /// Runs rating, sales, success, city and month stages in dependency order.
    ///
    /// Any stage failure aborts the whole request.
    pub fn predict(&self, request: &ForecastRequest) -> Result<PredictionOutcome, ForecastError> {
        request.validate()?;

        let mut warnings = Vec::new();
        let city_code = self.encode(
            &self.registry.city_encoder,
            CategoricalField::City,
            &request.city,
            &mut warnings,
        )?;
        let cuisine_code = self.encode(
            &self.registry.cuisine_encoder,
            CategoricalField::Cuisine,
            &request.cuisine,
            &mut warnings,
        )?;

        let year = f64::from(request.year);
        let month = f64::from(request.month);
        let sales_qty = f64::from(request.sales_qty);
        let sales_amount = request.sales_amount as f64;
        let city_code = city_code as f64;
        let cuisine_code = cuisine_code as f64;

        let rating_features = FeatureSet::new()
            .with(Feature::Year, year)
            .with(Feature::Month, month)
            .with(Feature::SalesQty, sales_qty)
            .with(Feature::SalesAmount, sales_amount)
            .with(Feature::CityCode, city_code)
            .with(Feature::CuisineCode, cuisine_code);
        let predicted_rating = self
            .registry
            .rating
            .predict(&rating_features)
            .and_then(finite)
            .map_err(ForecastError::at(Stage::Rating))?
            .clamp(0.0, MAX_RATING);
        debug!(stage = %Stage::Rating, predicted_rating, "stage complete");

        let sales_features = FeatureSet::new()
            .with(Feature::Year, year)
            .with(Feature::Month, month)
            .with(Feature::SalesQty, sales_qty)
            .with(Feature::Rating, predicted_rating)
            .with(Feature::CityCode, city_code)
            .with(Feature::CuisineCode, cuisine_code);
        let predicted_sales = self
            .registry
            .sales
            .predict(&sales_features)
            .and_then(finite)
            .map_err(ForecastError::at(Stage::Sales))?
            .max(0.0);
        debug!(stage = %Stage::Sales, predicted_sales, "stage complete");

        let success_features = FeatureSet::new()
            .with(Feature::Rating, predicted_rating)
            .with(Feature::SalesQty, sales_qty)
            .with(Feature::SalesAmount, sales_amount)
            .with(Feature::CityCode, city_code)
            .with(Feature::CuisineCode, cuisine_code)
            .with(Feature::Year, year)
            .with(Feature::Month, month);
        let success_probability = self
            .registry
            .success
            .predict_probabilities(&success_features)
            .and_then(|raw| percentages(raw, SUCCESS_CLASSES))
            .map_err(ForecastError::at(Stage::Success))?[1];
        debug!(stage = %Stage::Success, success_probability, "stage complete");

        let city_features = FeatureSet::new()
            .with(Feature::CuisineCode, cuisine_code)
            .with(Feature::Rating, predicted_rating)
            .with(Feature::SalesQty, sales_qty)
            .with(Feature::SalesAmount, sales_amount)
            .with(Feature::Year, year)
            .with(Feature::Month, month);
        let city_distribution = self
            .registry
            .city
            .predict_probabilities(&city_features)
            .and_then(|raw| percentages(raw, self.registry.city_encoder.len()))
            .map(|probabilities| rank_cities(&self.registry.city_encoder, probabilities))
            .map_err(ForecastError::at(Stage::CityAffinity))?;
        debug!(stage = %Stage::CityAffinity, cities = city_distribution.len(), "stage complete");

        let month_features = FeatureSet::new()
            .with(Feature::Rating, predicted_rating)
            .with(Feature::SalesQty, sales_qty)
            .with(Feature::SalesAmount, sales_amount)
            .with(Feature::CityCode, city_code)
            .with(Feature::CuisineCode, cuisine_code)
            .with(Feature::Year, year);
        let month_distribution = self
            .registry
            .month
            .predict_probabilities(&month_features)
            .and_then(|raw| percentages(raw, MONTHS_IN_YEAR))
            .map_err(ForecastError::at(Stage::MonthAffinity))?;
        debug!(stage = %Stage::MonthAffinity, "stage complete");

        Ok(PredictionOutcome {
            result: PredictionResult {
                predicted_rating,
                predicted_sales,
                success_probability,
                city_distribution,
                month_distribution,
            },
            warnings,
        })
    }

    fn encode(
        &self,
        encoder: &LabelEncoder,
        field: CategoricalField,
        label: &str,
        warnings: &mut Vec<String>,
    ) -> Result<usize, ForecastError> {
        let EncodedLabel { code, fallback } = encoder
            .encode(label, self.policy)
            .map_err(|source| ForecastError::UnknownLabel { field, source })?;

        if fallback {
            let substitute = encoder.inverse(code).unwrap_or("code 0");
            warn!(
                field = field.label(),
                label, substitute, "label outside vocabulary, using fallback"
            );
            warnings.push(format!(
                "{} '{}' is not in the model vocabulary; predictions use '{}' instead",
                field.label(),
                label,
                substitute
            ));
        }

        Ok(code)
    }
}

fn finite(value: f64) -> Result<f64, PredictionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PredictionError::NonFinite)
    }
}

/// Rescales a class distribution to percentages summing to 100.
fn percentages(raw: Vec<f64>, expected: usize) -> Result<Vec<f64>, PredictionError> {
    if raw.len() != expected {
        return Err(PredictionError::DistributionShape {
            expected,
            actual: raw.len(),
        });
    }
    if raw.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(PredictionError::DegenerateDistribution);
    }
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(PredictionError::DegenerateDistribution);
    }
    Ok(raw.into_iter().map(|p| p / total * 100.0).collect())
}

/// Pairs probabilities with vocabulary labels, most likely first. The sort is
/// stable, so ties keep vocabulary order.
fn rank_cities(encoder: &LabelEncoder, probabilities: Vec<f64>) -> Vec<CityProbability> {
    let mut ranked: Vec<CityProbability> = encoder
        .classes()
        .iter()
        .zip(probabilities)
        .map(|(city, probability)| CityProbability {
            city: city.clone(),
            probability,
        })
        .collect();
    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    ranked
}
