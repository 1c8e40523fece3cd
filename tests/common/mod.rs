//! Helpers for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pushkind_mealplan::domain::filter::{QuickFilterDefinition, QuickFilterType};
use pushkind_mealplan::domain::recipe::RecipeCardRecord;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fixed "now" shared by the recency fixtures.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn record(
    id: i64,
    name: &str,
    category: &str,
    meal_type: &str,
    dietary: Option<&str>,
    total_time: Option<u32>,
    created_at: &str,
) -> RecipeCardRecord {
    let mut record = RecipeCardRecord::new(id, name);
    record.category = Some(category.to_string());
    record.meal_type = Some(meal_type.to_string());
    record.dietary_preference = dietary.map(str::to_string);
    record.total_time = total_time;
    record.created_at = Some(created_at.to_string());
    record
}

/// Small recipe book covering every filterable field.
pub fn sample_recipes() -> Vec<RecipeCardRecord> {
    let mut pancakes = record(
        1,
        "Buttermilk Pancakes",
        "Baking",
        "breakfast",
        Some("vegetarian"),
        Some(25),
        "2024-04-29T08:00:00Z",
    );
    pancakes.is_favorite = true;

    vec![
        pancakes,
        record(
            2,
            "Lentil Soup",
            "Soup",
            "dinner",
            Some("vegan"),
            Some(45),
            "2024-03-01T10:00:00Z",
        ),
        record(
            3,
            "Chicken Caesar",
            "Salad",
            "lunch",
            None,
            Some(20),
            "2024-04-30T12:00:00Z",
        ),
        record(
            4,
            "Overnight Oats",
            "Breakfast Bowls",
            "breakfast",
            Some("vegan"),
            None,
            "2024-04-20",
        ),
        record(
            5,
            "Beef Stew",
            "Soup",
            "dinner",
            None,
            Some(180),
            "not a date",
        ),
    ]
}

fn definition(id: &str, kind: QuickFilterType, value: Option<&str>) -> QuickFilterDefinition {
    QuickFilterDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind,
        value: value.map(str::to_string),
    }
}

/// Quick-filter catalog matching the embedded defaults.
pub fn quick_filter_catalog() -> Vec<QuickFilterDefinition> {
    vec![
        definition("breakfast", QuickFilterType::MealType, Some("breakfast")),
        definition("dinner", QuickFilterType::MealType, Some("dinner")),
        definition("vegan", QuickFilterType::Dietary, Some("vegan")),
        definition("favorites", QuickFilterType::Favorite, None),
        definition("quick", QuickFilterType::Time, Some("30")),
        definition("new", QuickFilterType::New, Some("7")),
    ]
}

pub fn ids(records: &[RecipeCardRecord]) -> Vec<String> {
    records.iter().map(|record| record.id.to_string()).collect()
}
