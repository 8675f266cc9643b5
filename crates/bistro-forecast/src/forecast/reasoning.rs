//! Heuristic explanation of why a launch month performs well.
//!
//! Rules are evaluated in a fixed order (festival, seasonal, city) and every
//! matching rule contributes its reason. When nothing matches a single
//! default reason is returned.

pub const REASON_SEPARATOR: &str = " | ";
pub const DEFAULT_REASON: &str = "Stable demand patterns for this month";

const SUMMER: [u8; 3] = [4, 5, 6];
const WINTER: [u8; 4] = [11, 12, 1, 2];
const COLD_ITEM_KEYWORDS: [&str; 3] = ["ice", "juice", "shake"];

/// Lower-cased view of the inputs shared by every rule.
struct MonthContext {
    month: u8,
    city: String,
    cuisine: String,
}

impl MonthContext {
    fn is_summer(&self) -> bool {
        SUMMER.contains(&self.month)
    }

    fn is_winter(&self) -> bool {
        WINTER.contains(&self.month)
    }

    fn serves_cold_items(&self) -> bool {
        COLD_ITEM_KEYWORDS
            .iter()
            .any(|keyword| self.cuisine.contains(keyword))
    }
}

struct MonthRule {
    applies: fn(&MonthContext) -> bool,
    reason: fn(&MonthContext) -> &'static str,
}

fn festival_reason(month: u8) -> Option<&'static str> {
    match month {
        1 => Some("New Year celebrations"),
        2 => Some("Valentine's season dine-outs"),
        9 => Some("Festive build-up demand before Puja"),
        10 => Some("Durga Puja & Diwali shopping spike"),
        11 => Some("Diwali season + winter kickoff demand"),
        12 => Some("Christmas & New Year outing spike"),
        _ => None,
    }
}

const RULES: [MonthRule; 10] = [
    MonthRule {
        applies: |ctx| festival_reason(ctx.month).is_some(),
        reason: |ctx| festival_reason(ctx.month).unwrap_or(DEFAULT_REASON),
    },
    MonthRule {
        applies: |ctx| ctx.is_summer() && ctx.serves_cold_items(),
        reason: |_| "High summer demand for cold beverages / ice-based items",
    },
    MonthRule {
        applies: |ctx| ctx.is_summer() && !ctx.serves_cold_items(),
        reason: |_| "Summer season brings increased footfall & outdoor eating",
    },
    MonthRule {
        applies: |ctx| ctx.is_winter() && ctx.cuisine.contains("chinese"),
        reason: |_| "Winter boosts demand for hot Chinese dishes",
    },
    MonthRule {
        applies: |ctx| ctx.is_winter() && ctx.cuisine.contains("north"),
        reason: |_| "North Indian cuisine performs well in colder months",
    },
    MonthRule {
        applies: |ctx| ctx.is_winter(),
        reason: |_| "Winter festival season improves overall food demand",
    },
    MonthRule {
        applies: |ctx| ctx.city.contains("kolkata") && matches!(ctx.month, 9 | 10),
        reason: |_| "Kolkata sees massive demand due to Durga Puja",
    },
    MonthRule {
        applies: |ctx| ctx.city.contains("delhi") && ctx.is_winter(),
        reason: |_| "Delhi winters increase cravings for warm food & street food",
    },
    MonthRule {
        applies: |ctx| ctx.city.contains("chennai") && ctx.is_summer(),
        reason: |_| "Chennai heat increases sales of cold drinks & juices",
    },
    MonthRule {
        applies: |ctx| ctx.city.contains("bangalore") && ctx.month == 12,
        reason: |_| "Holiday season + IT crowd outings boost December sales",
    },
];

/// Every matching reason in evaluation order, or the default reason alone.
pub fn reasons(month: u8, city: &str, cuisine: &str) -> Vec<&'static str> {
    let context = MonthContext {
        month,
        city: city.to_lowercase(),
        cuisine: cuisine.to_lowercase(),
    };

    let mut matched: Vec<&'static str> = RULES
        .iter()
        .filter(|rule| (rule.applies)(&context))
        .map(|rule| (rule.reason)(&context))
        .collect();

    if matched.is_empty() {
        matched.push(DEFAULT_REASON);
    }
    matched
}

/// Explains `month` for the given city and cuisine as one `" | "`-joined line.
pub fn explain(month: u8, city: &str, cuisine: &str) -> String {
    reasons(month, city, cuisine).join(REASON_SEPARATOR)
}
