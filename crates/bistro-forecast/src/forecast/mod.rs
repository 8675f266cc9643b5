pub mod artifacts;
pub mod domain;
mod encoder;
pub mod engine;
pub mod features;
pub mod predictor;
pub mod reasoning;
mod registry;
pub mod report;
pub mod router;

pub use artifacts::{ArtifactError, ArtifactId, ArtifactLoader};
pub use domain::{ForecastRequest, InputError};
pub use encoder::{EncodedLabel, LabelEncoder, UnknownLabel, UnknownLabelPolicy};
pub use engine::{
    CategoricalField, CityProbability, ForecastEngine, ForecastError, PredictionOutcome,
    PredictionResult, Stage,
};
pub use predictor::{PredictionError, ProbabilityPredictor, ScalarPredictor};
pub use registry::ModelRegistry;
pub use report::{write_city_csv, ForecastReport};
pub use router::forecast_router;
