use super::views::StarRating;

const MAX_STARS: f64 = 5.0;

/// Rupee amount rounded to whole units with comma-separated thousands.
///
/// Halves round to even. Non-finite values are rendered as-is.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rounded = amount.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0.0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

pub fn star_rating(rating: f64) -> StarRating {
    let rounded = if rating.is_finite() {
        ((rating * 2.0).round_ties_even() / 2.0).clamp(0.0, MAX_STARS)
    } else {
        0.0
    };
    let full = rounded.floor() as u8;
    let half = rounded - f64::from(full) >= 0.5;
    let empty = 5 - full - u8::from(half);

    StarRating {
        rounded,
        full,
        half,
        empty,
    }
}
