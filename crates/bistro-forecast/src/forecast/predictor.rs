//! Capabilities the orchestrator needs from a trained model.
//!
//! Any backend works: a deserialized artifact, a hand-written rule table or a
//! fixed stub in tests.

use super::features::FeatureSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("feature '{0}' is required by the model but was not supplied")]
    MissingFeature(String),
    #[error("model does not provide {0} predictions")]
    Unsupported(&'static str),
    #[error("model produced a non-finite value")]
    NonFinite,
    #[error("expected {expected} probabilities, model produced {actual}")]
    DistributionShape { expected: usize, actual: usize },
    #[error("probabilities must be finite, non-negative and have a positive total")]
    DegenerateDistribution,
}

/// Regression-style model producing one value.
pub trait ScalarPredictor: Send + Sync {
    fn predict(&self, features: &FeatureSet) -> Result<f64, PredictionError>;
}

/// Classifier producing one probability per class, in class order.
pub trait ProbabilityPredictor: Send + Sync {
    fn predict_probabilities(&self, features: &FeatureSet) -> Result<Vec<f64>, PredictionError>;
}
