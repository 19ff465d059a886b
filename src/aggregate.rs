//! The one computational component: derives ten independent aggregate
//! metrics from an immutable survey table in a single pure call.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::record::{Table, REQUIRED_COLUMNS};

/// Education levels counted as "advanced" when splitting the table for the
/// rich-percentage partition.
pub const ADVANCED_EDUCATION: &'static [&'static str] = &["Bachelors", "Masters", "Doctorate"];

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("required column `{0}` is missing from the input table")]
    MissingColumn(&'static str),
    #[error("cannot compute {field}: no records in the {group} group")]
    EmptyGroup {
        field: &'static str,
        group: &'static str,
    },
}

/// All ten metrics, computed once per call and immutable afterwards.
///
/// Decimal fields are rounded half away from zero to one decimal place.
/// Where a "highest" country or occupation is tied, the lexicographically
/// smallest name wins, so results are reproducible across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub race_count: BTreeMap<String, u64>,
    pub average_age_men: f64,
    pub percentage_bachelors: f64,
    pub percentage_advanced_education_rich: f64,
    pub percentage_non_advanced_education_rich: f64,
    pub min_work_hours: u32,
    pub rich_percentage_min_hours: f64,
    pub highest_rich_country: String,
    pub highest_rich_country_percentage: f64,
    pub top_india_occupation: String,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn percent(part: usize, whole: usize) -> f64 {
    round1(part as f64 / whole as f64 * 100.0)
}

fn is_advanced(education: &str) -> bool {
    ADVANCED_EDUCATION.contains(&education)
}

/// Compute every metric over a read-only borrow of the table.
///
/// Fails with `MissingColumn` before touching any row, and with
/// `EmptyGroup` whenever a percentage's denominator group has no members;
/// a divide-by-zero is never silently turned into NaN or 0.
pub fn compute(table: &Table) -> Result<AggregateResult, AggregateError> {
    for column in REQUIRED_COLUMNS {
        if !table.has_column(column) {
            return Err(AggregateError::MissingColumn(column));
        }
    }
    if table.is_empty() {
        return Err(AggregateError::EmptyGroup {
            field: "min_work_hours",
            group: "all records",
        });
    }

    let rows = table.rows();
    let total = rows.len();

    let mut race_count = BTreeMap::<String, u64>::new();
    for row in rows {
        *race_count.entry(row.race.clone()).or_default() += 1;
    }

    let men_ages: Vec<u32> = rows
        .iter()
        .filter(|r| r.sex == crate::record::Sex::Male)
        .map(|r| r.age)
        .collect();
    if men_ages.is_empty() {
        return Err(AggregateError::EmptyGroup {
            field: "average_age_men",
            group: "male",
        });
    }
    let average_age_men = round1(men_ages.iter().map(|&a| a as f64).sum::<f64>() / men_ages.len() as f64);

    let bachelors = rows.iter().filter(|r| r.education == "Bachelors").count();
    let percentage_bachelors = percent(bachelors, total);

    // Advanced / non-advanced split the table exactly in two.
    let mut advanced_total = 0usize;
    let mut advanced_rich = 0usize;
    let mut other_total = 0usize;
    let mut other_rich = 0usize;
    for row in rows {
        if is_advanced(&row.education) {
            advanced_total += 1;
            advanced_rich += row.salary.is_rich() as usize;
        } else {
            other_total += 1;
            other_rich += row.salary.is_rich() as usize;
        }
    }
    if advanced_total == 0 {
        return Err(AggregateError::EmptyGroup {
            field: "percentage_advanced_education_rich",
            group: "advanced-education",
        });
    }
    if other_total == 0 {
        return Err(AggregateError::EmptyGroup {
            field: "percentage_non_advanced_education_rich",
            group: "non-advanced-education",
        });
    }
    let percentage_advanced_education_rich = percent(advanced_rich, advanced_total);
    let percentage_non_advanced_education_rich = percent(other_rich, other_total);

    // The table is non-empty, so a minimum exists and the group of rows at
    // the minimum is non-empty as well.
    let min_work_hours = rows.iter().map(|r| r.hours_per_week).min().unwrap_or(0);
    let min_hours_total = rows
        .iter()
        .filter(|r| r.hours_per_week == min_work_hours)
        .count();
    let min_hours_rich = rows
        .iter()
        .filter(|r| r.hours_per_week == min_work_hours && r.salary.is_rich())
        .count();
    let rich_percentage_min_hours = percent(min_hours_rich, min_hours_total);

    // Per-country rich share. BTreeMap iteration is in key order, and the
    // strict comparison keeps the first maximum seen, so ties resolve to
    // the lexicographically smallest country.
    let mut by_country = BTreeMap::<&str, (usize, usize)>::new();
    for row in rows {
        let entry = by_country.entry(row.native_country.as_str()).or_default();
        entry.0 += row.salary.is_rich() as usize;
        entry.1 += 1;
    }
    let mut best_country: Option<(&str, f64)> = None;
    for (country, (rich, count)) in &by_country {
        let share = *rich as f64 / *count as f64 * 100.0;
        if best_country.map_or(true, |(_, best)| share > best) {
            best_country = Some((country, share));
        }
    }
    // by_country has at least one entry when the table is non-empty
    let (highest_rich_country, highest_share) = best_country.unwrap_or(("", 0.0));
    let highest_rich_country_percentage = round1(highest_share);

    let mut india_occupations = BTreeMap::<&str, u64>::new();
    for row in rows {
        if row.native_country == "India" && row.salary.is_rich() {
            if let Some(occupation) = row.occupation.as_deref() {
                *india_occupations.entry(occupation).or_default() += 1;
            }
        }
    }
    let mut top_occupation: Option<(&str, u64)> = None;
    for (occupation, count) in &india_occupations {
        if top_occupation.map_or(true, |(_, best)| *count > best) {
            top_occupation = Some((occupation, *count));
        }
    }
    let top_india_occupation = match top_occupation {
        Some((occupation, _)) => occupation.to_string(),
        None => {
            return Err(AggregateError::EmptyGroup {
                field: "top_india_occupation",
                group: "rich-in-India",
            })
        }
    };

    Ok(AggregateResult {
        race_count,
        average_age_men,
        percentage_bachelors,
        percentage_advanced_education_rich,
        percentage_non_advanced_education_rich,
        min_work_hours,
        rich_percentage_min_hours,
        highest_rich_country: highest_rich_country.to_string(),
        highest_rich_country_percentage,
        top_india_occupation,
    })
}
