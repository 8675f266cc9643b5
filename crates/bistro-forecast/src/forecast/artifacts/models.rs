use super::super::features::FeatureSet;
use super::super::predictor::{PredictionError, ProbabilityPredictor, ScalarPredictor};
use serde::{Deserialize, Serialize};

/// Prediction capability an artifact must offer for its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Scalar,
    Probabilities,
    Encoder,
}

impl Capability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Probabilities => "probability",
            Self::Encoder => "label encoding",
        }
    }
}

/// Serialized model, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Logistic(LinearModel),
    Softmax(SoftmaxModel),
    Constant(ConstantModel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

/// Multinomial logistic regression; one coefficient row per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

/// Fixed outputs regardless of input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantModel {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelFormatError {
    #[error("{features} feature names but {coefficients} coefficients")]
    CoefficientCount {
        features: usize,
        coefficients: usize,
    },
    #[error("{rows} coefficient rows but {intercepts} intercepts")]
    ClassCount { rows: usize, intercepts: usize },
    #[error("softmax model needs at least two classes")]
    TooFewClasses,
    #[error("constant model defines neither a value nor probabilities")]
    EmptyConstant,
    #[error("model parameters must be finite")]
    NonFinite,
}

impl ModelArtifact {
    /// Checks internal consistency after deserialization.
    pub fn validate(&self) -> Result<(), ModelFormatError> {
        match self {
            Self::Linear(model) | Self::Logistic(model) => model.validate(),
            Self::Softmax(model) => model.validate(),
            Self::Constant(model) => {
                if model.value.is_none() && model.probabilities.is_none() {
                    Err(ModelFormatError::EmptyConstant)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Self::Linear(_), Capability::Scalar) => true,
            (Self::Logistic(_) | Self::Softmax(_), Capability::Probabilities) => true,
            (Self::Constant(model), Capability::Scalar) => model.value.is_some(),
            (Self::Constant(model), Capability::Probabilities) => model.probabilities.is_some(),
            _ => false,
        }
    }
}

impl LinearModel {
    fn validate(&self) -> Result<(), ModelFormatError> {
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ModelFormatError::CoefficientCount {
                features: self.feature_names.len(),
                coefficients: self.coefficients.len(),
            });
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelFormatError::NonFinite);
        }
        Ok(())
    }

    fn decision(&self, features: &FeatureSet) -> Result<f64, PredictionError> {
        weighted_sum(&self.feature_names, &self.coefficients, self.intercept, features)
    }
}

impl SoftmaxModel {
    fn validate(&self) -> Result<(), ModelFormatError> {
        if self.coefficients.len() != self.intercepts.len() {
            return Err(ModelFormatError::ClassCount {
                rows: self.coefficients.len(),
                intercepts: self.intercepts.len(),
            });
        }
        if self.coefficients.len() < 2 {
            return Err(ModelFormatError::TooFewClasses);
        }
        for row in &self.coefficients {
            if row.len() != self.feature_names.len() {
                return Err(ModelFormatError::CoefficientCount {
                    features: self.feature_names.len(),
                    coefficients: row.len(),
                });
            }
            if row.iter().any(|c| !c.is_finite()) {
                return Err(ModelFormatError::NonFinite);
            }
        }
        if self.intercepts.iter().any(|c| !c.is_finite()) {
            return Err(ModelFormatError::NonFinite);
        }
        Ok(())
    }

    fn probabilities(&self, features: &FeatureSet) -> Result<Vec<f64>, PredictionError> {
        let logits = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| weighted_sum(&self.feature_names, row, *intercept, features))
            .collect::<Result<Vec<_>, _>>()?;

        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(PredictionError::NonFinite);
        }
        let exps: Vec<f64> = logits.iter().map(|logit| (logit - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(exps.into_iter().map(|value| value / total).collect())
    }
}

fn weighted_sum(
    names: &[String],
    coefficients: &[f64],
    intercept: f64,
    features: &FeatureSet,
) -> Result<f64, PredictionError> {
    let mut total = intercept;
    for (name, coefficient) in names.iter().zip(coefficients) {
        let value = features
            .column(name)
            .ok_or_else(|| PredictionError::MissingFeature(name.clone()))?;
        total += coefficient * value;
    }
    if total.is_finite() {
        Ok(total)
    } else {
        Err(PredictionError::NonFinite)
    }
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

impl ScalarPredictor for ModelArtifact {
    fn predict(&self, features: &FeatureSet) -> Result<f64, PredictionError> {
        match self {
            Self::Linear(model) => model.decision(features),
            Self::Constant(ConstantModel {
                value: Some(value), ..
            }) => Ok(*value),
            _ => Err(PredictionError::Unsupported(Capability::Scalar.label())),
        }
    }
}

impl ProbabilityPredictor for ModelArtifact {
    fn predict_probabilities(&self, features: &FeatureSet) -> Result<Vec<f64>, PredictionError> {
        match self {
            Self::Logistic(model) => {
                let positive = sigmoid(model.decision(features)?);
                Ok(vec![1.0 - positive, positive])
            }
            Self::Softmax(model) => model.probabilities(features),
            Self::Constant(ConstantModel {
                probabilities: Some(probabilities),
                ..
            }) => Ok(probabilities.clone()),
            _ => Err(PredictionError::Unsupported(
                Capability::Probabilities.label(),
            )),
        }
    }
}
