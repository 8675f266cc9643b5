use super::super::domain::ForecastRequest;
use super::super::engine::PredictionResult;
use serde::Serialize;

/// Predicted rating rounded to half stars, out of five.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarRating {
    pub rounded: f64,
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    pub fn glyphs(&self) -> String {
        let mut out = "★".repeat(usize::from(self.full));
        if self.half {
            out.push('✦');
        }
        out.push_str(&"☆".repeat(usize::from(self.empty)));
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessBand {
    Low,
    Moderate,
    High,
}

impl SuccessBand {
    pub fn from_probability(percent: f64) -> Self {
        if percent < 40.0 {
            Self::Low
        } else if percent < 70.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRankingEntry {
    pub rank: usize,
    pub city: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthProbabilityEntry {
    pub month: u8,
    pub month_name: &'static str,
    pub probability: f64,
}

/// Everything the dashboard renders for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub greeting: String,
    pub input: ForecastRequest,
    pub prediction: PredictionResult,
    pub rating_stars: StarRating,
    pub sales_display: String,
    pub success_band: SuccessBand,
    pub success_band_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_city: Option<String>,
    pub best_month: u8,
    pub best_month_name: &'static str,
    pub month_reasoning: String,
    pub city_table: Vec<CityRankingEntry>,
    pub city_chart: Vec<CityRankingEntry>,
    pub month_chart: Vec<MonthProbabilityEntry>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
