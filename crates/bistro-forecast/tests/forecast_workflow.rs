//! End-to-end forecasts against the JSON artifacts under `tests/fixtures`.

use std::fs;
use std::path::{Path, PathBuf};

use bistro_forecast::forecast::{
    ArtifactError, ArtifactId, ForecastEngine, ForecastError, ForecastRequest, ModelRegistry,
    PredictionError, Stage, UnknownLabelPolicy,
};
use bistro_forecast::forecast::report::SuccessBand;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn engine(policy: UnknownLabelPolicy) -> ForecastEngine {
    let registry = ModelRegistry::from_dir(fixture("artifacts")).expect("fixture artifacts load");
    ForecastEngine::new(registry, policy)
}

fn delhi_request() -> ForecastRequest {
    ForecastRequest {
        user_name: "Asha".to_string(),
        restaurant_name: "Tandoor Junction".to_string(),
        city: "Delhi".to_string(),
        cuisine: "North Indian".to_string(),
        year: 2024,
        month: 7,
        sales_qty: 20,
        sales_amount: 1500,
        known_rating: 4.0,
    }
}

#[test]
fn forecast_composes_summary_from_fixture_models() {
    let report = engine(UnknownLabelPolicy::Fallback)
        .forecast(&delhi_request())
        .expect("forecast succeeds");

    let prediction = &report.prediction;
    assert!((prediction.predicted_rating - 3.8).abs() < 1e-9);
    assert!((prediction.predicted_sales - 38_500.0).abs() < 1e-6);
    assert!((prediction.success_probability - 68.997).abs() < 1e-3);
    assert_eq!(report.success_band, SuccessBand::Moderate);

    let ranked: Vec<&str> = prediction
        .city_distribution
        .iter()
        .map(|entry| entry.city.as_str())
        .collect();
    assert_eq!(ranked, ["Delhi", "Mumbai", "Bangalore", "Chennai", "Kolkata"]);

    let city_total: f64 = prediction.city_distribution.iter().map(|c| c.probability).sum();
    let month_total: f64 = prediction.month_distribution.iter().sum();
    assert!((city_total - 100.0).abs() < 1e-3);
    assert!((month_total - 100.0).abs() < 1e-3);

    assert_eq!(report.best_month, 12);
    assert_eq!(report.best_month_name, "December");
    assert_eq!(
        report.month_reasoning,
        "Christmas & New Year outing spike | North Indian cuisine performs well in colder months | Winter festival season improves overall food demand | Delhi winters increase cravings for warm food & street food"
    );

    assert!(report.summary.contains("Tandoor Junction"));
    assert!(report.summary.contains("₹38,500"));
    assert!(report.summary.contains("**Delhi, Mumbai, Bangalore**"));
    assert!(report.summary.contains("**Month 12** in **Delhi**"));
    assert_eq!(report.sales_display, "₹38,500");
    assert!(report.warnings.is_empty());
}

#[test]
fn unknown_city_uses_first_vocabulary_entry_and_warns() {
    let mut request = delhi_request();
    request.city = "Atlantis".to_string();

    let fallback = engine(UnknownLabelPolicy::Fallback)
        .forecast(&request)
        .expect("fallback keeps the request alive");
    assert_eq!(fallback.warnings.len(), 1);
    assert!(fallback.warnings[0].contains("Bangalore"));

    let mut bangalore = delhi_request();
    bangalore.city = "Bangalore".to_string();
    let direct = engine(UnknownLabelPolicy::Fallback)
        .forecast(&bangalore)
        .expect("forecast succeeds");
    assert_eq!(
        fallback.prediction.predicted_rating,
        direct.prediction.predicted_rating
    );
}

#[test]
fn reject_policy_refuses_unknown_cuisine() {
    let mut request = delhi_request();
    request.cuisine = "Martian".to_string();

    let error = engine(UnknownLabelPolicy::Reject)
        .forecast(&request)
        .expect_err("unknown cuisine rejected");
    assert!(matches!(error, ForecastError::UnknownLabel { .. }));
}

#[test]
fn missing_artifacts_prevent_engine_construction() {
    let error = ModelRegistry::from_dir(fixture("partial")).expect_err("artifacts missing");
    let ArtifactError::Unavailable { missing, .. } = error;
    assert_eq!(
        missing,
        vec![
            ArtifactId::City,
            ArtifactId::Success,
            ArtifactId::Month,
            ArtifactId::CuisineEncoder,
        ]
    );

    let error = ModelRegistry::from_dir(fixture("does-not-exist")).expect_err("nothing loads");
    let ArtifactError::Unavailable { missing, .. } = error;
    assert_eq!(missing, ArtifactId::required().to_vec());
}

#[test]
fn artifact_without_required_capability_counts_as_missing() {
    let dir = std::env::temp_dir().join(format!("bistro-capability-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir");
    for id in ArtifactId::required() {
        fs::copy(fixture("artifacts").join(id.file_name()), dir.join(id.file_name()))
            .expect("copy fixture");
    }
    fs::copy(
        fixture("artifacts").join("model_success.json"),
        dir.join("model_ratings.json"),
    )
    .expect("overwrite ratings with a classifier");

    let error = ModelRegistry::from_dir(&dir).expect_err("classifier cannot predict a rating");
    let ArtifactError::Unavailable { missing, .. } = error;
    assert_eq!(missing, vec![ArtifactId::Ratings]);
}

#[test]
fn city_model_disagreeing_with_vocabulary_fails_the_request() {
    let registry = ModelRegistry::from_dir(fixture("mismatched")).expect("artifacts load");
    let engine = ForecastEngine::new(registry, UnknownLabelPolicy::Fallback);

    let error = engine
        .forecast(&delhi_request())
        .expect_err("city stage fails");
    assert_eq!(
        error,
        ForecastError::Prediction {
            stage: Stage::CityAffinity,
            source: PredictionError::DistributionShape {
                expected: 5,
                actual: 3,
            },
        }
    );
}
