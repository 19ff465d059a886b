use chrono::Utc;

use crate::aggregate::AggregateResult;

/// Race counts ordered for presentation: descending by count, then by name.
/// The aggregate itself is unordered; this ordering is a display choice.
pub fn race_counts_sorted(result: &AggregateResult) -> Vec<(&str, u64)> {
    let mut counts: Vec<(&str, u64)> = result
        .race_count
        .iter()
        .map(|(race, count)| (race.as_str(), *count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}

/// The ten labeled report lines, race counts expanded to one line each.
pub fn render_lines(result: &AggregateResult) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Number of each race:".to_string());
    for (race, count) in race_counts_sorted(result) {
        lines.push(format!("  {}: {}", race, count));
    }
    lines.push(format!("Average age of men: {:.1}", result.average_age_men));
    lines.push(format!(
        "Percentage with Bachelors degrees: {:.1}%",
        result.percentage_bachelors
    ));
    lines.push(format!(
        "Percentage with advanced education that earn >50K: {:.1}%",
        result.percentage_advanced_education_rich
    ));
    lines.push(format!(
        "Percentage without advanced education that earn >50K: {:.1}%",
        result.percentage_non_advanced_education_rich
    ));
    lines.push(format!(
        "Minimum work hours per week: {}",
        result.min_work_hours
    ));
    lines.push(format!(
        "Percentage of rich among those who work fewest hours: {:.1}%",
        result.rich_percentage_min_hours
    ));
    lines.push(format!(
        "Country with highest percentage of rich: {}",
        result.highest_rich_country
    ));
    lines.push(format!(
        "Highest percentage of rich people in country: {:.1}%",
        result.highest_rich_country_percentage
    ));
    lines.push(format!(
        "Top occupation in India for those earning >50K: {}",
        result.top_india_occupation
    ));
    lines
}

/// Full console transcript with a generation timestamp header.
pub fn render_console(result: &AggregateResult) -> String {
    let mut out = format!(
        "Demographic data report (generated {})\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    for line in render_lines(result) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// The same result as a pretty-printed JSON document.
pub fn render_json(result: &AggregateResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_result() -> AggregateResult {
        let mut race_count = BTreeMap::new();
        race_count.insert("Black".to_string(), 3u64);
        race_count.insert("White".to_string(), 7u64);
        race_count.insert("Asian-Pac-Islander".to_string(), 3u64);
        AggregateResult {
            race_count,
            average_age_men: 39.4,
            percentage_bachelors: 16.4,
            percentage_advanced_education_rich: 46.5,
            percentage_non_advanced_education_rich: 17.4,
            min_work_hours: 1,
            rich_percentage_min_hours: 10.0,
            highest_rich_country: "Iran".to_string(),
            highest_rich_country_percentage: 41.9,
            top_india_occupation: "Prof-specialty".to_string(),
        }
    }

    #[test]
    fn race_presentation_order_is_count_then_name() {
        let result = sample_result();
        let sorted = race_counts_sorted(&result);
        assert_eq!(
            sorted,
            vec![("White", 7), ("Asian-Pac-Islander", 3), ("Black", 3)]
        );
    }

    #[test]
    fn renders_one_line_per_metric_plus_races() {
        let lines = render_lines(&sample_result());
        // 1 race header + 3 races + 9 remaining metrics
        assert_eq!(lines.len(), 13);
        assert!(lines.contains(&"Average age of men: 39.4".to_string()));
        assert!(lines.contains(&"Minimum work hours per week: 1".to_string()));
        assert!(lines
            .contains(&"Country with highest percentage of rich: Iran".to_string()));
    }

    #[test]
    fn whole_number_decimals_keep_one_decimal_place() {
        let mut result = sample_result();
        result.average_age_men = 35.0;
        let lines = render_lines(&result);
        assert!(lines.contains(&"Average age of men: 35.0".to_string()));
        assert!(lines.contains(
            &"Percentage of rich among those who work fewest hours: 10.0%".to_string()
        ));
    }

    #[test]
    fn json_round_trips_the_field_names() {
        let json = render_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["average_age_men"], 39.4);
        assert_eq!(value["race_count"]["White"], 7);
        assert_eq!(value["top_india_occupation"], "Prof-specialty");
    }
}
