//! Canonical filter configuration and the descriptors derived from it.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{CookTimeMinutes, RecencyDays};

/// Canonical filter configuration applied to recipe lists.
///
/// Different categories combine with AND, values inside one category combine
/// with OR. Empty sets and `None` scalars mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub search_term: String,
    pub categories: BTreeSet<String>,
    pub meal_types: BTreeSet<String>,
    pub dietary_preferences: BTreeSet<String>,
    pub favorites_only: bool,
    pub max_cook_time: Option<CookTimeMinutes>,
    pub new_days: Option<RecencyDays>,
}

impl FilterState {
    /// Returns `true` when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty() && self.active_count() == 0
    }

    /// Number of active constraints, one per set member.
    ///
    /// The search term is not counted: it is shown in its own input rather
    /// than as a chip.
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + self.meal_types.len()
            + self.dietary_preferences.len()
            + usize::from(self.favorites_only)
            + usize::from(self.max_cook_time.is_some())
            + usize::from(self.new_days.is_some())
    }

    /// Resets every field to its empty value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Kind of constraint an [`ActiveFilterDescriptor`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActiveFilterType {
    Category,
    MealType,
    Dietary,
    Favorite,
    Time,
    New,
}

impl ActiveFilterType {
    /// String representation used by the view layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::MealType => "mealType",
            Self::Dietary => "dietary",
            Self::Favorite => "favorite",
            Self::Time => "time",
            Self::New => "new",
        }
    }
}

impl Display for ActiveFilterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display-ready description of a single active constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilterDescriptor {
    #[serde(rename = "type")]
    pub kind: ActiveFilterType,
    pub value: String,
    pub label: String,
}

/// Kind of constraint a quick filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickFilterType {
    MealType,
    Dietary,
    Favorite,
    Time,
    New,
}

/// Entry of the quick-filter catalog shown above recipe lists.
///
/// `value` holds the meal type or dietary tag for set filters, and the
/// number of minutes/days for `time`/`new`. It is ignored for `favorite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFilterDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuickFilterType,
    #[serde(default)]
    pub value: Option<String>,
}

/// Human-readable labels for filter values, keyed by raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterLabels {
    pub categories: HashMap<String, String>,
    #[serde(alias = "meal_types")]
    pub meal_types: HashMap<String, String>,
    #[serde(alias = "dietary_preferences")]
    pub dietary_preferences: HashMap<String, String>,
}

impl FilterLabels {
    /// Label lookup with fallback to the raw value.
    pub fn resolve(&self, kind: ActiveFilterType, value: &str) -> String {
        let table = match kind {
            ActiveFilterType::Category => &self.categories,
            ActiveFilterType::MealType => &self.meal_types,
            ActiveFilterType::Dietary => &self.dietary_preferences,
            _ => return value.to_string(),
        };
        table
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}
