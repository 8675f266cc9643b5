mod format;
mod summary;
pub mod views;

pub use format::{format_inr, star_rating};
pub use summary::compose;
pub use views::{
    CityRankingEntry, ForecastReport, MonthProbabilityEntry, StarRating, SuccessBand,
};

use super::domain::ForecastRequest;
use super::engine::{CityProbability, PredictionOutcome};
use super::reasoning;
use chrono::Month;
use std::io;

pub const CITY_TABLE_ROWS: usize = 8;
pub const CITY_CHART_BARS: usize = 6;

impl ForecastReport {
    pub fn build(request: &ForecastRequest, outcome: PredictionOutcome) -> Self {
        let PredictionOutcome { result, warnings } = outcome;

        let best_city = result.best_city().map(|entry| entry.city.clone());
        let best_month = result.best_month();
        let month_reasoning = reasoning::explain(best_month, &request.city, &request.cuisine);
        let summary = compose(
            &request.restaurant_name,
            result.predicted_rating,
            result.predicted_sales,
            &result.city_distribution,
            best_month,
            &month_reasoning,
        );
        let success_band = SuccessBand::from_probability(result.success_probability);

        let month_chart = result
            .month_distribution
            .iter()
            .zip(1u8..)
            .map(|(probability, month)| MonthProbabilityEntry {
                month,
                month_name: short_month_name(month),
                probability: *probability,
            })
            .collect();

        Self {
            greeting: format!("Hello, {}!", request.user_name),
            input: request.clone(),
            rating_stars: star_rating(result.predicted_rating),
            sales_display: format_inr(result.predicted_sales),
            success_band,
            success_band_label: success_band.label(),
            best_city,
            best_month,
            best_month_name: month_name(best_month),
            month_reasoning,
            city_table: ranking(&result.city_distribution, CITY_TABLE_ROWS),
            city_chart: ranking(&result.city_distribution, CITY_CHART_BARS),
            month_chart,
            summary,
            warnings,
            prediction: result,
        }
    }

    /// Every vocabulary city in rank order, not just the table rows.
    pub fn full_ranking(&self) -> Vec<CityRankingEntry> {
        ranking(&self.prediction.city_distribution, usize::MAX)
    }
}

/// Writes the full city ranking as CSV with a `rank,city,probability` header.
pub fn write_city_csv<W: io::Write>(report: &ForecastReport, writer: W) -> Result<(), csv::Error> {
    let mut table = csv::Writer::from_writer(writer);
    for entry in report.full_ranking() {
        table.serialize(entry)?;
    }
    table.flush()?;
    Ok(())
}

fn ranking(cities: &[CityProbability], limit: usize) -> Vec<CityRankingEntry> {
    cities
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, entry)| CityRankingEntry {
            rank: index + 1,
            city: entry.city.clone(),
            probability: entry.probability,
        })
        .collect()
}

fn month_name(month: u8) -> &'static str {
    Month::try_from(month).map(|m| m.name()).unwrap_or("Unknown")
}

fn short_month_name(month: u8) -> &'static str {
    let name = month_name(month);
    name.get(..3).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::super::engine::PredictionResult;
    use super::*;

    fn outcome() -> PredictionOutcome {
        let cities = [
            "Mumbai", "Delhi", "Pune", "Goa", "Kochi", "Surat", "Indore", "Patna", "Agra",
        ];
        let mut month_distribution = vec![5.0; 12];
        month_distribution[11] = 45.0;
        PredictionOutcome {
            result: PredictionResult {
                predicted_rating: 4.3,
                predicted_sales: 125000.0,
                success_probability: 55.5,
                city_distribution: cities
                    .iter()
                    .enumerate()
                    .map(|(index, city)| CityProbability {
                        city: (*city).to_string(),
                        probability: 20.0 - index as f64,
                    })
                    .collect(),
                month_distribution,
            },
            warnings: vec!["city 'Atlantis' is not in the model vocabulary".to_string()],
        }
    }

    fn request() -> ForecastRequest {
        ForecastRequest {
            user_name: "Asha".to_string(),
            restaurant_name: "Spice Route".to_string(),
            city: "Bangalore".to_string(),
            cuisine: "Cafe".to_string(),
            year: 2024,
            month: 7,
            sales_qty: 20,
            sales_amount: 1500,
            known_rating: 4.0,
        }
    }

    #[test]
    fn build_assembles_presentation_fields() {
        let report = ForecastReport::build(&request(), outcome());

        assert_eq!(report.greeting, "Hello, Asha!");
        assert_eq!(report.sales_display, "₹125,000");
        assert_eq!(report.success_band, SuccessBand::Moderate);
        assert_eq!(report.best_city.as_deref(), Some("Mumbai"));
        assert_eq!(report.best_month, 12);
        assert_eq!(report.best_month_name, "December");
        assert_eq!(
            report.month_reasoning,
            "Christmas & New Year outing spike | Winter festival season improves overall food demand | Holiday season + IT crowd outings boost December sales"
        );
        assert_eq!(report.city_table.len(), CITY_TABLE_ROWS);
        assert_eq!(report.city_chart.len(), CITY_CHART_BARS);
        assert_eq!(report.city_table[0].rank, 1);
        assert_eq!(report.month_chart[0].month_name, "Jan");
        assert_eq!(report.month_chart[11].month_name, "Dec");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.summary.contains(&report.month_reasoning));
    }

    #[test]
    fn success_bands_follow_gauge_thresholds() {
        assert_eq!(SuccessBand::from_probability(39.99), SuccessBand::Low);
        assert_eq!(SuccessBand::from_probability(40.0), SuccessBand::Moderate);
        assert_eq!(SuccessBand::from_probability(70.0), SuccessBand::High);
    }

    #[test]
    fn csv_export_covers_every_city() {
        let report = ForecastReport::build(&request(), outcome());
        let mut buffer = Vec::new();
        write_city_csv(&report, &mut buffer).expect("csv written");

        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("rank,city,probability"));
        assert_eq!(lines.next(), Some("1,Mumbai,20.0"));
        assert_eq!(text.lines().count(), 10);
    }
}
