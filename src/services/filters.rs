//! Recipe list filtering and translation between filter encodings.
//!
//! Two UI surfaces encode the same filter state differently: the quick-filter
//! bar toggles catalog ids, the filter drawer stores `"<prefix>:<value>"`
//! strings. Both are translated into the canonical [`FilterState`] before
//! [`apply_filters`] runs, and back again when a surface is re-rendered.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::domain::filter::{
    ActiveFilterDescriptor, ActiveFilterType, FilterLabels, FilterState, QuickFilterDefinition,
    QuickFilterType,
};
use crate::domain::recipe::RecipeCardRecord;
use crate::domain::types::{CookTimeMinutes, RecencyDays};

/// Literal used by the filter drawer for the favorites toggle.
pub const FAVORITES_FILTER: &str = "favorites";

const CATEGORY_PREFIX: &str = "category";
const MEAL_TYPE_PREFIX: &str = "mealType";
const DIETARY_PREFIX: &str = "dietary";

/// Filters `records` by `state` using the current time for the recency check.
///
/// The output is an order-preserving subsequence of the input.
pub fn apply_filters(records: Vec<RecipeCardRecord>, state: &FilterState) -> Vec<RecipeCardRecord> {
    apply_filters_at(records, state, Utc::now())
}

/// Same as [`apply_filters`] but evaluates the recency window against `now`.
pub fn apply_filters_at(
    records: Vec<RecipeCardRecord>,
    state: &FilterState,
    now: DateTime<Utc>,
) -> Vec<RecipeCardRecord> {
    if state.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| matches_filters(record, state, now))
        .collect()
}

/// Returns `true` if `record` satisfies every active constraint of `state`.
pub fn matches_filters(record: &RecipeCardRecord, state: &FilterState, now: DateTime<Utc>) -> bool {
    matches_search(record, &state.search_term)
        && matches_set(record.category.as_deref(), &state.categories)
        && matches_set(record.meal_type.as_deref(), &state.meal_types)
        && matches_set(
            record.dietary_preference.as_deref(),
            &state.dietary_preferences,
        )
        && (!state.favorites_only || record.is_favorite)
        && matches_cook_time(record.total_time, state.max_cook_time)
        && matches_recency(record.created_at.as_deref(), state.new_days, now)
}

fn matches_search(record: &RecipeCardRecord, search_term: &str) -> bool {
    let term = search_term.trim();
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();

    std::iter::once(Some(record.name.as_str()))
        .chain([
            record.category.as_deref(),
            record.meal_type.as_deref(),
            record.dietary_preference.as_deref(),
        ])
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

fn matches_set(value: Option<&str>, allowed: &BTreeSet<String>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    value.is_some_and(|value| allowed.contains(value))
}

fn matches_cook_time(total_time: Option<u32>, max: Option<CookTimeMinutes>) -> bool {
    match max {
        None => true,
        Some(max) => total_time.is_some_and(|time| time != 0 && time <= max.get()),
    }
}

fn matches_recency(
    created_at: Option<&str>,
    days: Option<RecencyDays>,
    now: DateTime<Utc>,
) -> bool {
    let Some(days) = days else {
        return true;
    };
    let cutoff = now - Duration::days(i64::from(days.get()));
    created_at
        .and_then(parse_timestamp)
        .is_some_and(|created| created >= cutoff)
}

/// Parses the timestamp formats the backend is known to emit.
///
/// Offset-less values are interpreted as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
}

/// Translates selected quick-filter ids into a canonical filter state.
///
/// Duplicate ids are processed once, ids missing from `catalog` are ignored.
/// Later `time`/`new` selections overwrite earlier ones.
pub fn quick_filters_to_recipe_filters<S: AsRef<str>>(
    ids: &[S],
    catalog: &[QuickFilterDefinition],
) -> FilterState {
    let mut state = FilterState::default();
    let mut seen = HashSet::new();

    for id in ids.iter().map(AsRef::as_ref) {
        if !seen.insert(id) {
            continue;
        }
        let Some(definition) = catalog.iter().find(|definition| definition.id == id) else {
            log::debug!("Ignoring unknown quick filter id: {id}");
            continue;
        };
        apply_quick_filter(&mut state, definition);
    }

    state
}

fn apply_quick_filter(state: &mut FilterState, definition: &QuickFilterDefinition) {
    let value = definition.value.as_deref().map(str::trim).unwrap_or_default();

    match definition.kind {
        QuickFilterType::MealType if !value.is_empty() => {
            state.meal_types.insert(value.to_string());
        }
        QuickFilterType::Dietary if !value.is_empty() => {
            state.dietary_preferences.insert(value.to_string());
        }
        QuickFilterType::Favorite => state.favorites_only = true,
        QuickFilterType::Time => match CookTimeMinutes::parse(value) {
            Ok(minutes) => state.max_cook_time = Some(minutes),
            Err(e) => log::warn!("Quick filter '{}' has an invalid value: {e}", definition.id),
        },
        QuickFilterType::New => match RecencyDays::parse(value) {
            Ok(days) => state.new_days = Some(days),
            Err(e) => log::warn!("Quick filter '{}' has an invalid value: {e}", definition.id),
        },
        QuickFilterType::MealType | QuickFilterType::Dietary => {
            log::warn!("Quick filter '{}' has no value", definition.id);
        }
    }
}

/// Returns the catalog ids whose constraint is currently active in `state`.
pub fn recipe_filters_to_quick_filters(
    state: &FilterState,
    catalog: &[QuickFilterDefinition],
) -> BTreeSet<String> {
    catalog
        .iter()
        .filter(|definition| quick_filter_is_active(state, definition))
        .map(|definition| definition.id.clone())
        .collect()
}

fn quick_filter_is_active(state: &FilterState, definition: &QuickFilterDefinition) -> bool {
    let value = definition.value.as_deref().map(str::trim).unwrap_or_default();
    match definition.kind {
        QuickFilterType::MealType => state.meal_types.contains(value),
        QuickFilterType::Dietary => state.dietary_preferences.contains(value),
        QuickFilterType::Favorite => state.favorites_only,
        QuickFilterType::Time => CookTimeMinutes::parse(value)
            .is_ok_and(|minutes| state.max_cook_time == Some(minutes)),
        QuickFilterType::New => {
            RecencyDays::parse(value).is_ok_and(|days| state.new_days == Some(days))
        }
    }
}

/// Translates `"<prefix>:<value>"` strings into a canonical filter state.
///
/// Known prefixes are `category`, `mealType` and `dietary`; the literal
/// `"favorites"` enables the favorites toggle. Anything else is ignored.
pub fn prefixed_filters_to_recipe_filters<S: AsRef<str>>(values: &[S]) -> FilterState {
    let mut state = FilterState::default();

    for raw in values.iter().map(AsRef::as_ref) {
        if raw == FAVORITES_FILTER {
            state.favorites_only = true;
            continue;
        }

        let Some((prefix, value)) = raw.split_once(':') else {
            log::debug!("Ignoring unprefixed filter value: {raw}");
            continue;
        };
        if value.is_empty() {
            log::debug!("Ignoring filter value with empty payload: {raw}");
            continue;
        }

        let target = match prefix {
            CATEGORY_PREFIX => &mut state.categories,
            MEAL_TYPE_PREFIX => &mut state.meal_types,
            DIETARY_PREFIX => &mut state.dietary_preferences,
            _ => {
                log::debug!("Ignoring filter value with unknown prefix: {raw}");
                continue;
            }
        };
        target.insert(value.to_string());
    }

    state
}

/// Encodes the set and favorites fields of `state` as prefixed strings.
pub fn recipe_filters_to_prefixed(state: &FilterState) -> Vec<String> {
    let prefixed = |prefix: &str, values: &BTreeSet<String>| {
        values
            .iter()
            .map(|value| format!("{prefix}:{value}"))
            .collect::<Vec<_>>()
    };

    let mut encoded = prefixed(CATEGORY_PREFIX, &state.categories);
    encoded.extend(prefixed(MEAL_TYPE_PREFIX, &state.meal_types));
    encoded.extend(prefixed(DIETARY_PREFIX, &state.dietary_preferences));
    if state.favorites_only {
        encoded.push(FAVORITES_FILTER.to_string());
    }
    encoded
}

/// Overlays a converter's output on `base`.
///
/// Sets are unioned and the favorites toggle is OR-ed. Scalars and the search
/// term are taken from `overlay` when it sets them, otherwise kept from `base`.
pub fn merge_filters(base: &FilterState, overlay: &FilterState) -> FilterState {
    let union = |a: &BTreeSet<String>, b: &BTreeSet<String>| -> BTreeSet<String> {
        a.union(b).cloned().collect()
    };

    FilterState {
        search_term: if overlay.search_term.trim().is_empty() {
            base.search_term.clone()
        } else {
            overlay.search_term.clone()
        },
        categories: union(&base.categories, &overlay.categories),
        meal_types: union(&base.meal_types, &overlay.meal_types),
        dietary_preferences: union(&base.dietary_preferences, &overlay.dietary_preferences),
        favorites_only: base.favorites_only || overlay.favorites_only,
        max_cook_time: overlay.max_cook_time.or(base.max_cook_time),
        new_days: overlay.new_days.or(base.new_days),
    }
}

/// Builds one descriptor per active constraint.
///
/// Order is fixed: categories, meal types, dietary preferences, favorites,
/// time, new.
pub fn get_active_filters_list(
    state: &FilterState,
    labels: Option<&FilterLabels>,
) -> Vec<ActiveFilterDescriptor> {
    let describe = |kind: ActiveFilterType, value: &str| ActiveFilterDescriptor {
        kind,
        value: value.to_string(),
        label: labels.map_or_else(|| value.to_string(), |labels| labels.resolve(kind, value)),
    };

    let mut active = Vec::with_capacity(state.active_count());
    active.extend(
        state
            .categories
            .iter()
            .map(|value| describe(ActiveFilterType::Category, value)),
    );
    active.extend(
        state
            .meal_types
            .iter()
            .map(|value| describe(ActiveFilterType::MealType, value)),
    );
    active.extend(
        state
            .dietary_preferences
            .iter()
            .map(|value| describe(ActiveFilterType::Dietary, value)),
    );

    if state.favorites_only {
        active.push(ActiveFilterDescriptor {
            kind: ActiveFilterType::Favorite,
            value: "true".to_string(),
            label: "Favorites".to_string(),
        });
    }
    if let Some(minutes) = state.max_cook_time {
        active.push(ActiveFilterDescriptor {
            kind: ActiveFilterType::Time,
            value: minutes.to_string(),
            label: format!("Under {minutes} min"),
        });
    }
    if let Some(days) = state.new_days {
        active.push(ActiveFilterDescriptor {
            kind: ActiveFilterType::New,
            value: days.to_string(),
            label: format!("New (last {days} days)"),
        });
    }

    active
}

/// Returns a copy of `state` without the constraint named by `descriptor`.
pub fn remove_filter(state: &FilterState, descriptor: &ActiveFilterDescriptor) -> FilterState {
    let mut next = state.clone();
    match descriptor.kind {
        ActiveFilterType::Category => {
            next.categories.remove(&descriptor.value);
        }
        ActiveFilterType::MealType => {
            next.meal_types.remove(&descriptor.value);
        }
        ActiveFilterType::Dietary => {
            next.dietary_preferences.remove(&descriptor.value);
        }
        ActiveFilterType::Favorite => next.favorites_only = false,
        ActiveFilterType::Time => next.max_cook_time = None,
        ActiveFilterType::New => next.new_days = None,
    }
    next
}

/// Returns `true` if any constraint other than the search term is active.
pub fn has_active_filters(state: &FilterState) -> bool {
    state.active_count() > 0
}

/// Returns the all-empty filter state.
pub fn clear_all_filters() -> FilterState {
    FilterState::default()
}
