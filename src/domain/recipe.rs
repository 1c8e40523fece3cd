use serde::{Deserialize, Serialize};

use crate::domain::types::RecipeId;

/// Read-only projection of a recipe used by list and grid views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCardRecord {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub dietary_preference: Option<String>,
    /// Total time in minutes.
    #[serde(default)]
    pub total_time: Option<u32>,
    #[serde(default)]
    pub is_favorite: bool,
    /// ISO-8601 creation timestamp as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RecipeCardRecord {
    /// Creates a record with only the mandatory fields populated.
    pub fn new(id: impl Into<RecipeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            meal_type: None,
            dietary_preference: None,
            total_time: None,
            is_favorite: false,
            created_at: None,
        }
    }
}
