use super::super::engine::CityProbability;
use super::format::format_inr;

const TOP_CITY_COUNT: usize = 3;

/// Renders the closing business summary as markdown.
///
/// `ranked_cities` must already be ordered most likely first; the first entry
/// is named in the final recommendation.
pub fn compose(
    restaurant_name: &str,
    rating: f64,
    sales: f64,
    ranked_cities: &[CityProbability],
    best_month: u8,
    reason_text: &str,
) -> String {
    let city_list = ranked_cities
        .iter()
        .take(TOP_CITY_COUNT)
        .map(|entry| entry.city.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let best_city = ranked_cities
        .first()
        .map(|entry| entry.city.as_str())
        .unwrap_or("your chosen city");
    let revenue = format_inr(sales);

    format!(
        "### Overall Summary for **{restaurant_name}**

#### Expected Rating
Your restaurant is predicted to achieve a **rating of {rating:.2} / 5**, indicating strong customer satisfaction potential.

#### Expected Monthly Sales
Estimated monthly revenue: **{revenue}**
This is based on historical patterns and your cuisine/category performance.

#### Top 3 Recommended Cities
Based on demand patterns, your restaurant would perform best in:
**{city_list}**

These cities show high customer activity and strong alignment with your cuisine profile.

#### Best Month to Launch
**Month {best_month}** is the strongest launch window.
**Why?** {reason_text}

Launching during this month gives the highest probability of early traction and seasonal visibility.

---

### Final Recommendation
If you plan to launch soon, choose **Month {best_month}** in **{best_city}** for the best initial impact.
This combination gives the strongest early-stage performance in both **sales** and **ratings**.
"
    )
}
