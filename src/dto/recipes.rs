use serde::Deserialize;

use crate::domain::recipe::RecipeCardRecord;
use crate::domain::types::RecipeId;

/// Recipe as returned by the backend list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeDto {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub dietary_preference: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RecipeDto {
    /// Prep plus cook time, `None` when the backend sent neither.
    pub fn total_time(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
        }
    }
}

impl From<RecipeDto> for RecipeCardRecord {
    fn from(value: RecipeDto) -> Self {
        let total_time = value.total_time();
        Self {
            id: value.id,
            name: value.name,
            category: value.category,
            meal_type: value.meal_type,
            dietary_preference: value.dietary_preference,
            total_time,
            is_favorite: value.is_favorite,
            created_at: value.created_at,
        }
    }
}
