use super::artifacts::{ArtifactError, ArtifactId, ArtifactLoader, Capability, ModelArtifact};
use super::encoder::LabelEncoder;
use super::predictor::{ProbabilityPredictor, ScalarPredictor};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// The five predictors and two encoders a forecast needs, loaded once and
/// shared read-only afterwards.
#[derive(Clone)]
pub struct ModelRegistry {
    pub rating: Arc<dyn ScalarPredictor>,
    pub sales: Arc<dyn ScalarPredictor>,
    pub success: Arc<dyn ProbabilityPredictor>,
    pub city: Arc<dyn ProbabilityPredictor>,
    pub month: Arc<dyn ProbabilityPredictor>,
    pub city_encoder: Arc<LabelEncoder>,
    pub cuisine_encoder: Arc<LabelEncoder>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("cities", &self.city_encoder.len())
            .field("cuisines", &self.cuisine_encoder.len())
            .finish_non_exhaustive()
    }
}

impl ModelRegistry {
    pub fn from_dir(directory: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        Self::load(&ArtifactLoader::new(directory.as_ref()))
    }

    /// Loads every required artifact, failing with the full list of the ones
    /// that are missing, unreadable or lack the capability their slot needs.
    pub fn load(loader: &ArtifactLoader) -> Result<Self, ArtifactError> {
        let mut missing = Vec::new();

        let rating = scalar(loader, ArtifactId::Ratings, &mut missing);
        let sales = scalar(loader, ArtifactId::Sales, &mut missing);
        let city = probabilities(loader, ArtifactId::City, &mut missing);
        let success = probabilities(loader, ArtifactId::Success, &mut missing);
        let month = probabilities(loader, ArtifactId::Month, &mut missing);
        let city_encoder = encoder(loader, ArtifactId::CityEncoder, &mut missing);
        let cuisine_encoder = encoder(loader, ArtifactId::CuisineEncoder, &mut missing);

        let (
            Some(rating),
            Some(sales),
            Some(city),
            Some(success),
            Some(month),
            Some(city_encoder),
            Some(cuisine_encoder),
        ) = (
            rating,
            sales,
            city,
            success,
            month,
            city_encoder,
            cuisine_encoder,
        )
        else {
            return Err(ArtifactError::Unavailable {
                directory: loader.root().to_path_buf(),
                missing,
            });
        };

        info!(
            directory = %loader.root().display(),
            cities = city_encoder.len(),
            cuisines = cuisine_encoder.len(),
            "model registry loaded"
        );

        Ok(Self {
            rating,
            sales,
            success,
            city,
            month,
            city_encoder,
            cuisine_encoder,
        })
    }
}

fn model(
    loader: &ArtifactLoader,
    id: ArtifactId,
    missing: &mut Vec<ArtifactId>,
) -> Option<Arc<ModelArtifact>> {
    let Some(model) = loader.load_model(id) else {
        missing.push(id);
        return None;
    };

    if !model.supports(id.capability()) {
        warn!(
            artifact = %id,
            capability = id.capability().label(),
            "artifact lacks required capability"
        );
        missing.push(id);
        return None;
    }

    Some(model)
}

fn scalar(
    loader: &ArtifactLoader,
    id: ArtifactId,
    missing: &mut Vec<ArtifactId>,
) -> Option<Arc<dyn ScalarPredictor>> {
    model(loader, id, missing).map(|model| model as Arc<dyn ScalarPredictor>)
}

fn probabilities(
    loader: &ArtifactLoader,
    id: ArtifactId,
    missing: &mut Vec<ArtifactId>,
) -> Option<Arc<dyn ProbabilityPredictor>> {
    model(loader, id, missing).map(|model| model as Arc<dyn ProbabilityPredictor>)
}

fn encoder(
    loader: &ArtifactLoader,
    id: ArtifactId,
    missing: &mut Vec<ArtifactId>,
) -> Option<Arc<LabelEncoder>> {
    debug_assert_eq!(id.capability(), Capability::Encoder);
    let encoder = loader.load_encoder(id);
    if encoder.is_none() {
        missing.push(id);
    }
    encoder
}
