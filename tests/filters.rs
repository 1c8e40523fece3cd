use pushkind_mealplan::domain::filter::{ActiveFilterType, FilterLabels, FilterState};
use pushkind_mealplan::services::filters::{
    apply_filters_at, clear_all_filters, get_active_filters_list, has_active_filters,
    merge_filters, prefixed_filters_to_recipe_filters, quick_filters_to_recipe_filters,
    recipe_filters_to_prefixed, recipe_filters_to_quick_filters, remove_filter,
};

mod common;

use common::{ids, init_logging, now, quick_filter_catalog, sample_recipes};

#[test]
fn quick_filters_narrow_the_recipe_book() {
    init_logging();
    let catalog = quick_filter_catalog();

    let state = quick_filters_to_recipe_filters(&["breakfast", "quick"], &catalog);
    assert_eq!(ids(&apply_filters_at(sample_recipes(), &state, now())), ["1"]);

    let state = quick_filters_to_recipe_filters(&["vegan", "dinner"], &catalog);
    assert_eq!(ids(&apply_filters_at(sample_recipes(), &state, now())), ["2"]);

    let state = quick_filters_to_recipe_filters(&["new"], &catalog);
    assert_eq!(
        ids(&apply_filters_at(sample_recipes(), &state, now())),
        ["1", "3"]
    );
}

#[test]
fn search_is_case_insensitive_and_preserves_order() {
    let state = FilterState {
        search_term: "VEG".to_string(),
        ..Default::default()
    };
    assert_eq!(
        ids(&apply_filters_at(sample_recipes(), &state, now())),
        ["1", "2", "4"]
    );
}

#[test]
fn empty_state_returns_input_unchanged() {
    let records = sample_recipes();
    let filtered = apply_filters_at(records.clone(), &clear_all_filters(), now());
    assert_eq!(filtered, records);
}

#[test]
fn drawer_and_quick_bar_combine_into_one_state() {
    init_logging();
    let catalog = quick_filter_catalog();
    let drawer = prefixed_filters_to_recipe_filters(&[
        "category:Soup",
        "category:Salad",
        "bogus",
        "cuisine:thai",
    ]);
    let quick = quick_filters_to_recipe_filters(&["dinner", "unknown-id"], &catalog);

    let state = merge_filters(&drawer, &quick);
    assert_eq!(
        ids(&apply_filters_at(sample_recipes(), &state, now())),
        ["2", "5"]
    );
    assert_eq!(
        recipe_filters_to_prefixed(&state),
        ["category:Salad", "category:Soup", "mealType:dinner"]
    );
    assert_eq!(
        recipe_filters_to_quick_filters(&state, &catalog)
            .into_iter()
            .collect::<Vec<_>>(),
        ["dinner"]
    );
}

#[test]
fn chips_can_be_removed_one_at_a_time() {
    let catalog = quick_filter_catalog();
    let mut state = quick_filters_to_recipe_filters(&["vegan", "favorites", "quick"], &catalog);
    state.categories.insert("Soup".to_string());

    let mut labels = FilterLabels::default();
    labels
        .dietary_preferences
        .insert("vegan".to_string(), "Vegan".to_string());

    let chips = get_active_filters_list(&state, Some(&labels));
    let kinds: Vec<ActiveFilterType> = chips.iter().map(|chip| chip.kind).collect();
    assert_eq!(
        kinds,
        [
            ActiveFilterType::Category,
            ActiveFilterType::Dietary,
            ActiveFilterType::Favorite,
            ActiveFilterType::Time,
        ]
    );
    assert_eq!(chips[1].label, "Vegan");
    assert_eq!(chips[3].label, "Under 30 min");

    for chip in &chips {
        state = remove_filter(&state, chip);
    }
    assert!(!has_active_filters(&state));
    assert_eq!(state, FilterState::default());
}

#[test]
fn descriptors_serialize_with_type_key() {
    let state = prefixed_filters_to_recipe_filters(&["favorites"]);
    let chips = get_active_filters_list(&state, None);
    assert_eq!(
        serde_json::to_value(&chips).unwrap(),
        serde_json::json!([{ "type": "favorite", "value": "true", "label": "Favorites" }])
    );
}
