use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const SUPPORTED_YEARS: RangeInclusive<i32> = 2020..=2025;
pub const KNOWN_RATING_RANGE: RangeInclusive<f32> = 1.0..=5.0;

pub const DEFAULT_USER_NAME: &str = "Guest User";
pub const DEFAULT_RESTAURANT_NAME: &str = "My Neon Bistro";
pub const DEFAULT_YEAR: i32 = 2024;
pub const DEFAULT_MONTH: u8 = 7;
pub const DEFAULT_SALES_QTY: u32 = 20;
pub const DEFAULT_SALES_AMOUNT: u64 = 1500;
pub const DEFAULT_KNOWN_RATING: f32 = 4.0;

/// A single form submission describing the restaurant to forecast.
///
/// Field aliases accept the capitalised keys the dashboard frontend posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(alias = "Resturant_Name", alias = "Restaurant_Name")]
    pub restaurant_name: String,
    #[serde(alias = "City")]
    pub city: String,
    #[serde(alias = "Cuisine")]
    pub cuisine: String,
    pub year: i32,
    pub month: u8,
    pub sales_qty: u32,
    pub sales_amount: u64,
    #[serde(default = "default_known_rating", alias = "Ratings")]
    pub known_rating: f32,
}

fn default_user_name() -> String {
    DEFAULT_USER_NAME.to_string()
}

fn default_known_rating() -> f32 {
    DEFAULT_KNOWN_RATING
}

impl ForecastRequest {
    /// Checks the same bounds the intake form enforces.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.restaurant_name.trim().is_empty() {
            return Err(InputError::Blank("restaurant_name"));
        }
        if !SUPPORTED_YEARS.contains(&self.year) {
            return Err(InputError::YearOutOfRange(self.year));
        }
        if !(1..=12).contains(&self.month) {
            return Err(InputError::MonthOutOfRange(self.month));
        }
        if !KNOWN_RATING_RANGE.contains(&self.known_rating) {
            return Err(InputError::RatingOutOfRange(self.known_rating));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("year {0} is outside the supported range 2020-2025")]
    YearOutOfRange(i32),
    #[error("month {0} must be between 1 and 12")]
    MonthOutOfRange(u8),
    #[error("known rating {0} must be between 1.0 and 5.0")]
    RatingOutOfRange(f32),
}
