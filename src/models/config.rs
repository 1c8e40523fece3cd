//! Layered application settings.
//!
//! Values come from the embedded `config/default.yaml`, an optional YAML file
//! and `MEALPLAN__*` environment variables, later sources winning.

use std::collections::HashSet;
use std::path::Path;

use chrono::Duration;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::filter::{FilterLabels, QuickFilterDefinition, QuickFilterType};
use crate::domain::types::{CookTimeMinutes, RecencyDays, TypeConstraintError};
use crate::services::navigation::{DEFAULT_BYPASS_TIMEOUT_MS, bypass_timeout_from_millis};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.yaml");

/// Prefix of environment overrides, e.g. `MEALPLAN__NAVIGATION__BYPASS_TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "MEALPLAN";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Config(#[from] ConfigError),
    #[error("quick filter '{id}' is invalid: {source}")]
    QuickFilter {
        id: String,
        source: TypeConstraintError,
    },
    #[error("quick filter id '{0}' is defined more than once")]
    DuplicateQuickFilter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Lifetime of the bypass flag set by a confirmed navigation.
    pub bypass_timeout_ms: u64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            bypass_timeout_ms: DEFAULT_BYPASS_TIMEOUT_MS,
        }
    }
}

impl NavigationSettings {
    pub fn bypass_timeout(&self) -> Duration {
        bypass_timeout_from_millis(self.bypass_timeout_ms)
    }
}

/// Quick-filter catalog, label tables and guard timing.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub quick_filters: Vec<QuickFilterDefinition>,
    #[serde(default)]
    pub labels: FilterLabels,
    #[serde(default)]
    pub navigation: NavigationSettings,
}

impl Settings {
    /// Loads and validates settings, reading `path` on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Yaml));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks the quick-filter catalog.
    ///
    /// Ids must be unique and non-empty; set filters need a value and
    /// time/new filters a positive whole number.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut seen = HashSet::new();
        for definition in &self.quick_filters {
            let id = definition.id.trim();
            if id.is_empty() {
                return Err(SettingsError::QuickFilter {
                    id: definition.id.clone(),
                    source: TypeConstraintError::EmptyString("quick filter id"),
                });
            }
            if !seen.insert(id) {
                return Err(SettingsError::DuplicateQuickFilter(id.to_string()));
            }
            validate_quick_filter_value(definition).map_err(|source| {
                SettingsError::QuickFilter {
                    id: id.to_string(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

fn validate_quick_filter_value(
    definition: &QuickFilterDefinition,
) -> Result<(), TypeConstraintError> {
    let value = definition.value.as_deref().map(str::trim).unwrap_or_default();
    match definition.kind {
        QuickFilterType::Favorite => Ok(()),
        QuickFilterType::MealType | QuickFilterType::Dietary if value.is_empty() => {
            Err(TypeConstraintError::EmptyString("quick filter value"))
        }
        QuickFilterType::MealType | QuickFilterType::Dietary => Ok(()),
        QuickFilterType::Time => CookTimeMinutes::parse(value).map(|_| ()),
        QuickFilterType::New => RecencyDays::parse(value).map(|_| ()),
    }
}
