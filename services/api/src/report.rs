use crate::infra::load_engine;
use bistro_forecast::config::AppConfig;
use bistro_forecast::error::AppError;
use bistro_forecast::forecast::domain::{
    DEFAULT_KNOWN_RATING, DEFAULT_MONTH, DEFAULT_RESTAURANT_NAME, DEFAULT_SALES_AMOUNT,
    DEFAULT_SALES_QTY, DEFAULT_USER_NAME, DEFAULT_YEAR,
};
use bistro_forecast::forecast::{write_city_csv, ForecastReport, ForecastRequest};
use bistro_forecast::telemetry;
use clap::Args;
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ForecastArgs {
    /// Name used in the greeting
    #[arg(long, default_value = DEFAULT_USER_NAME)]
    pub(crate) user_name: String,
    #[arg(long, default_value = DEFAULT_RESTAURANT_NAME)]
    pub(crate) restaurant_name: String,
    /// City label (defaults to the first city the models know)
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Cuisine label (defaults to the first cuisine the models know)
    #[arg(long)]
    pub(crate) cuisine: Option<String>,
    #[arg(long, default_value_t = DEFAULT_YEAR, value_parser = clap::value_parser!(i32).range(2020..=2025))]
    pub(crate) year: i32,
    #[arg(long, default_value_t = DEFAULT_MONTH, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub(crate) month: u8,
    #[arg(long, default_value_t = DEFAULT_SALES_QTY)]
    pub(crate) sales_qty: u32,
    /// Monthly sales amount in rupees
    #[arg(long, default_value_t = DEFAULT_SALES_AMOUNT)]
    pub(crate) sales_amount: u64,
    /// Current rating between 1.0 and 5.0
    #[arg(long, default_value_t = DEFAULT_KNOWN_RATING)]
    pub(crate) known_rating: f32,
    /// Override the directory holding the model artifacts
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Also write the full city ranking to this CSV file
    #[arg(long)]
    pub(crate) cities_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct VocabularyArgs {
    /// Override the directory holding the model artifacts
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
}

fn load_config(artifact_dir: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(directory) = artifact_dir {
        config.artifacts.directory = directory;
    }
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let ForecastArgs {
        user_name,
        restaurant_name,
        city,
        cuisine,
        year,
        month,
        sales_qty,
        sales_amount,
        known_rating,
        artifact_dir,
        json,
        cities_csv,
    } = args;

    let config = load_config(artifact_dir)?;
    let engine = load_engine(&config.artifacts)?;

    let request = ForecastRequest {
        user_name,
        restaurant_name,
        city: city
            .or_else(|| engine.cities().first().cloned())
            .unwrap_or_default(),
        cuisine: cuisine
            .or_else(|| engine.cuisines().first().cloned())
            .unwrap_or_default(),
        year,
        month,
        sales_qty,
        sales_amount,
        known_rating,
    };

    let report = engine.forecast(&request)?;

    if let Some(path) = cities_csv {
        let file = BufWriter::new(File::create(&path)?);
        write_city_csv(&report, file)?;
        info!(path = %path.display(), "city ranking exported");
    }

    if json {
        let body = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{body}");
    } else {
        let text = render_report(&report)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        print!("{text}");
    }

    Ok(())
}

pub(crate) fn run_vocabulary(args: VocabularyArgs) -> Result<(), AppError> {
    let config = load_config(args.artifact_dir)?;
    let engine = load_engine(&config.artifacts)?;

    println!("Cities ({})", engine.cities().len());
    for city in engine.cities() {
        println!("- {city}");
    }
    println!("\nCuisines ({})", engine.cuisines().len());
    for cuisine in engine.cuisines() {
        println!("- {cuisine}");
    }
    Ok(())
}

pub(crate) fn render_report(report: &ForecastReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let prediction = &report.prediction;

    writeln!(out, "{} Here are your predictions:", report.greeting)?;
    writeln!(
        out,
        "\nPredicted rating: {:.2} / 5  {}",
        prediction.predicted_rating,
        report.rating_stars.glyphs()
    )?;
    writeln!(out, "Expected monthly sales: {}", report.sales_display)?;
    writeln!(
        out,
        "Success probability: {:.2}% ({})",
        prediction.success_probability, report.success_band_label
    )?;

    writeln!(out, "\nTop cities")?;
    for entry in &report.city_table {
        writeln!(
            out,
            "{:>2}. {:<20} {:>6.2}%",
            entry.rank, entry.city, entry.probability
        )?;
    }

    writeln!(out, "\nMonth probabilities")?;
    for entry in &report.month_chart {
        writeln!(out, "{} {:>6.2}%", entry.month_name, entry.probability)?;
    }

    writeln!(
        out,
        "\nBest month: {} ({})\nReason: {}",
        report.best_month, report.best_month_name, report.month_reasoning
    )?;

    let input = &report.input;
    writeln!(out, "\nYour input")?;
    writeln!(out, "- Restaurant: {}", input.restaurant_name)?;
    writeln!(out, "- City: {}", input.city)?;
    writeln!(out, "- Cuisine: {}", input.cuisine)?;
    writeln!(out, "- Period: {}-{:02}", input.year, input.month)?;
    writeln!(out, "- Sales quantity: {}", input.sales_qty)?;
    writeln!(out, "- Sales amount: {}", input.sales_amount)?;
    writeln!(out, "- Current rating: {:.1}", input.known_rating)?;

    if !report.warnings.is_empty() {
        writeln!(out, "\nWarnings")?;
        for warning in &report.warnings {
            writeln!(out, "- {warning}")?;
        }
    }

    writeln!(out, "\n{}", report.summary)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_forecast::forecast::{ForecastEngine, ModelRegistry, UnknownLabelPolicy};
    use std::path::Path;

    fn fixture_engine() -> ForecastEngine {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/bistro-forecast/tests/fixtures/artifacts");
        let registry = ModelRegistry::from_dir(dir).expect("fixture artifacts load");
        ForecastEngine::new(registry, UnknownLabelPolicy::Fallback)
    }

    #[test]
    fn rendered_report_lists_cities_months_and_summary() {
        let request = ForecastRequest {
            user_name: "Asha".to_string(),
            restaurant_name: "Spice Route".to_string(),
            city: "Kolkata".to_string(),
            cuisine: "Atlantean".to_string(),
            year: 2024,
            month: 7,
            sales_qty: 20,
            sales_amount: 1500,
            known_rating: 4.0,
        };
        let report = fixture_engine().forecast(&request).expect("forecast");
        let text = render_report(&report).expect("report renders");

        assert!(text.starts_with("Hello, Asha! Here are your predictions:"));
        assert!(text.contains(" 1. Delhi"));
        assert!(text.contains("Dec "));
        assert!(text.contains("Best month: 12 (December)"));
        assert!(text.contains("- Cuisine: Atlantean"));
        assert!(text.contains("Warnings"));
        assert!(text.contains("Overall Summary for **Spice Route**"));
    }
}
