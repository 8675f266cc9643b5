//! Loading of the seven pre-trained artifacts from a directory.

mod models;

pub use models::{
    Capability, ConstantModel, LinearModel, ModelArtifact, ModelFormatError, SoftmaxModel,
};

use super::encoder::LabelEncoder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Fixed identifiers of the artifacts the forecaster depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactId {
    Ratings,
    Sales,
    City,
    Success,
    Month,
    CityEncoder,
    CuisineEncoder,
}

impl ArtifactId {
    pub const fn required() -> [Self; 7] {
        [
            Self::Ratings,
            Self::Sales,
            Self::City,
            Self::Success,
            Self::Month,
            Self::CityEncoder,
            Self::CuisineEncoder,
        ]
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Ratings => "model_ratings.json",
            Self::Sales => "model_sales.json",
            Self::City => "model_city.json",
            Self::Success => "model_success.json",
            Self::Month => "model_month.json",
            Self::CityEncoder => "encoder_city.json",
            Self::CuisineEncoder => "encoder_cuisine.json",
        }
    }

    pub const fn capability(self) -> Capability {
        match self {
            Self::Ratings | Self::Sales => Capability::Scalar,
            Self::City | Self::Success | Self::Month => Capability::Probabilities,
            Self::CityEncoder | Self::CuisineEncoder => Capability::Encoder,
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArtifactError {
    #[error("missing or unreadable artifacts in {}: {}", .directory.display(), list(.missing))]
    Unavailable {
        directory: PathBuf,
        missing: Vec<ArtifactId>,
    },
}

fn list(ids: &[ArtifactId]) -> String {
    ids.iter()
        .map(|id| id.file_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, thiserror::Error)]
enum LoadFailure {
    #[error("unable to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("inconsistent model: {0}")]
    Format(#[from] ModelFormatError),
}

/// Reads artifacts from `root` and keeps every successful load for reuse.
///
/// Failed loads are not cached, and nothing is ever evicted.
#[derive(Debug)]
pub struct ArtifactLoader {
    root: PathBuf,
    models: Mutex<HashMap<ArtifactId, Arc<ModelArtifact>>>,
    encoders: Mutex<HashMap<ArtifactId, Arc<LabelEncoder>>>,
}

impl ArtifactLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            models: Mutex::new(HashMap::new()),
            encoders: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: ArtifactId) -> PathBuf {
        self.root.join(id.file_name())
    }

    /// Returns the model stored under `id`, or `None` when it cannot be loaded.
    pub fn load_model(&self, id: ArtifactId) -> Option<Arc<ModelArtifact>> {
        let mut cache = self.models.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = cache.get(&id) {
            return Some(model.clone());
        }

        let model = self
            .read::<ModelArtifact>(id)
            .and_then(|model| {
                model.validate()?;
                Ok(model)
            })
            .map_err(|failure| self.report(id, failure))
            .ok()?;

        let model = Arc::new(model);
        cache.insert(id, model.clone());
        Some(model)
    }

    /// Returns the label encoder stored under `id`, or `None` when it cannot be loaded.
    pub fn load_encoder(&self, id: ArtifactId) -> Option<Arc<LabelEncoder>> {
        let mut cache = self.encoders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(encoder) = cache.get(&id) {
            return Some(encoder.clone());
        }

        let encoder = self
            .read::<LabelEncoder>(id)
            .map_err(|failure| self.report(id, failure))
            .ok()?;

        let encoder = Arc::new(encoder);
        cache.insert(id, encoder.clone());
        Some(encoder)
    }

    fn read<T: DeserializeOwned>(&self, id: ArtifactId) -> Result<T, LoadFailure> {
        let path = self.path_for(id);
        let raw = std::fs::read(&path)?;
        let value = serde_json::from_slice(&raw)?;
        debug!(artifact = %id, path = %path.display(), "artifact loaded");
        Ok(value)
    }

    fn report(&self, id: ArtifactId, failure: LoadFailure) {
        warn!(
            artifact = %id,
            path = %self.path_for(id).display(),
            error = %failure,
            "artifact unavailable"
        );
    }
}
