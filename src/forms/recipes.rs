use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use validator::ValidateUrl;

use crate::forms::validation::{
    FieldConstraints, FieldInput, FieldRule, FieldValue, FormSchema, FormValidation,
    ValidationResult, optional, string_field, validate_form, validate_integer, validate_number,
    validate_string,
};
use crate::services::quantity::{format_quantity_with_unit, parse_quantity};

pub const RECIPE_NAME_MAX_LENGTH: f64 = 255.0;
pub const DESCRIPTION_MAX_LENGTH: f64 = 2000.0;
pub const INSTRUCTIONS_MAX_LENGTH: f64 = 10000.0;
pub const SERVINGS_MIN: f64 = 1.0;
pub const SERVINGS_MAX: f64 = 100.0;
pub const TIME_MAX_MINUTES: f64 = 1440.0;
pub const QUANTITY_MAX: f64 = 10000.0;
pub const INGREDIENT_NAME_MAX_LENGTH: f64 = 255.0;
pub const UNIT_MAX_LENGTH: f64 = 50.0;
pub const URL_MAX_LENGTH: f64 = 2048.0;
pub const TAG_MAX_LENGTH: f64 = 100.0;
pub const MEAL_PLAN_NAME_MAX_LENGTH: f64 = 100.0;
pub const SHOPPING_ITEM_NAME_MAX_LENGTH: f64 = 255.0;

pub fn validate_recipe_name(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new()
            .required()
            .min(1.0)
            .max(RECIPE_NAME_MAX_LENGTH)
            .label("Recipe name"),
    )
}

pub fn validate_description(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new()
            .max(DESCRIPTION_MAX_LENGTH)
            .label("Description"),
    )
}

pub fn validate_instructions(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new()
            .max(INSTRUCTIONS_MAX_LENGTH)
            .label("Instructions"),
    )
}

pub fn validate_servings(input: impl Into<FieldInput>) -> ValidationResult<Option<f64>> {
    validate_integer(
        input,
        &FieldConstraints::new()
            .required()
            .min(SERVINGS_MIN)
            .max(SERVINGS_MAX)
            .label("Servings"),
    )
}

pub fn validate_prep_time(input: impl Into<FieldInput>) -> ValidationResult<Option<f64>> {
    validate_integer(input, &time_constraints("Prep time"))
}

pub fn validate_cook_time(input: impl Into<FieldInput>) -> ValidationResult<Option<f64>> {
    validate_integer(input, &time_constraints("Cook time"))
}

fn time_constraints(label: &str) -> FieldConstraints {
    FieldConstraints::new()
        .min(0.0)
        .max(TIME_MAX_MINUTES)
        .label(label)
}

/// Validates an ingredient quantity.
///
/// Text input is read with [`parse_quantity`] first so that "1 ½" and "3/4"
/// are accepted alongside plain decimals.
pub fn validate_quantity(input: impl Into<FieldInput>) -> ValidationResult<Option<f64>> {
    let input = match input.into() {
        FieldInput::Text(text) => match parse_quantity(&text) {
            Some(quantity) => FieldInput::Number(quantity),
            None => FieldInput::Text(text),
        },
        other => other,
    };
    validate_number(
        input,
        &FieldConstraints::new()
            .min(0.0)
            .max(QUANTITY_MAX)
            .label("Quantity"),
    )
}

pub fn validate_ingredient_name(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new()
            .required()
            .min(1.0)
            .max(INGREDIENT_NAME_MAX_LENGTH)
            .label("Ingredient name"),
    )
}

pub fn validate_unit(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new().max(UNIT_MAX_LENGTH).label("Unit"),
    )
}

pub fn validate_source_url(input: &str) -> ValidationResult<String> {
    let result = validate_string(
        input,
        &FieldConstraints::new().max(URL_MAX_LENGTH).label("Source URL"),
    );
    if result.is_valid() && !result.value().is_empty() && !result.value().as_str().validate_url() {
        return ValidationResult::invalid(result.into_value(), "Source URL must be a valid URL");
    }
    result
}

pub fn validate_meal_plan_name(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new()
            .required()
            .min(1.0)
            .max(MEAL_PLAN_NAME_MAX_LENGTH)
            .label("Meal plan name"),
    )
}

pub fn validate_shopping_item_name(input: &str) -> ValidationResult<String> {
    validate_string(
        input,
        &FieldConstraints::new()
            .required()
            .min(1.0)
            .max(SHOPPING_ITEM_NAME_MAX_LENGTH)
            .label("Item name"),
    )
}

fn text_rule(
    validate: fn(&str) -> ValidationResult<String>,
) -> impl Fn(&FieldInput) -> ValidationResult<FieldValue> {
    move |input: &FieldInput| validate(&input.to_text()).map(FieldValue::Text)
}

fn number_rule(
    validate: fn(FieldInput) -> ValidationResult<Option<f64>>,
) -> impl Fn(&FieldInput) -> ValidationResult<FieldValue> {
    move |input: &FieldInput| validate(input.clone()).map(FieldValue::from)
}

fn tag_rule(label: &str) -> FieldRule {
    Box::new(optional(string_field(
        FieldConstraints::new().max(TAG_MAX_LENGTH).label(label),
    )))
}

/// Schema used by the recipe editor.
pub fn recipe_schema() -> FormSchema {
    FormSchema::new()
        .field("name", text_rule(validate_recipe_name))
        .field("description", text_rule(validate_description))
        .field("instructions", text_rule(validate_instructions))
        .field("servings", number_rule(|input| validate_servings(input)))
        .field("prepTime", number_rule(|input| validate_prep_time(input)))
        .field("cookTime", number_rule(|input| validate_cook_time(input)))
        .field("sourceUrl", text_rule(validate_source_url))
        .field("category", tag_rule("Category"))
        .field("mealType", tag_rule("Meal type"))
        .field("dietaryPreference", tag_rule("Dietary preference"))
}

/// Schema used by a single ingredient row.
pub fn ingredient_schema() -> FormSchema {
    FormSchema::new()
        .field("name", text_rule(validate_ingredient_name))
        .field("quantity", number_rule(|input| validate_quantity(input)))
        .field("unit", text_rule(validate_unit))
}

/// Whole-number field value; validation has already checked the bounds.
fn whole_number(validation: &FormValidation, field: &str) -> Option<u32> {
    validation.number(field).map(|number| number as u32)
}

/// Raw ingredient row as submitted by the recipe editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientForm {
    pub name: String,
    #[serde(default)]
    pub quantity: FieldInput,
    #[serde(default)]
    pub unit: Option<String>,
}

impl IngredientForm {
    fn form_data(&self) -> HashMap<String, FieldInput> {
        HashMap::from([
            ("name".to_string(), FieldInput::from(self.name.as_str())),
            ("quantity".to_string(), self.quantity.clone()),
            ("unit".to_string(), FieldInput::from(self.unit.clone())),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientFormPayload {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl IngredientFormPayload {
    /// Shopping-list style line, e.g. "1 ½ cups flour".
    pub fn display(&self) -> String {
        let amount = format_quantity_with_unit(self.quantity, self.unit.as_deref());
        if amount.is_empty() {
            self.name.clone()
        } else {
            format!("{amount} {}", self.name)
        }
    }
}

#[derive(Debug, Error)]
pub enum IngredientFormError {
    #[error("Ingredient form validation failed: {0}")]
    Validation(FormValidation),
}

impl TryFrom<IngredientForm> for IngredientFormPayload {
    type Error = IngredientFormError;

    fn try_from(value: IngredientForm) -> Result<Self, Self::Error> {
        let validation = validate_form(&value.form_data(), &ingredient_schema());
        if !validation.is_valid {
            return Err(IngredientFormError::Validation(validation));
        }

        Ok(Self {
            name: validation.non_empty_text("name").unwrap_or_default(),
            quantity: validation.number("quantity"),
            unit: validation.non_empty_text("unit"),
        })
    }
}

/// Raw recipe editor submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub servings: FieldInput,
    #[serde(default)]
    pub prep_time: FieldInput,
    #[serde(default)]
    pub cook_time: FieldInput,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub dietary_preference: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientForm>,
}

impl RecipeForm {
    /// Field inputs keyed by the names used in [`recipe_schema`].
    pub fn form_data(&self) -> HashMap<String, FieldInput> {
        HashMap::from([
            ("name".to_string(), FieldInput::from(self.name.as_str())),
            (
                "description".to_string(),
                FieldInput::from(self.description.clone()),
            ),
            (
                "instructions".to_string(),
                FieldInput::from(self.instructions.clone()),
            ),
            ("servings".to_string(), self.servings.clone()),
            ("prepTime".to_string(), self.prep_time.clone()),
            ("cookTime".to_string(), self.cook_time.clone()),
            (
                "sourceUrl".to_string(),
                FieldInput::from(self.source_url.clone()),
            ),
            ("category".to_string(), FieldInput::from(self.category.clone())),
            ("mealType".to_string(), FieldInput::from(self.meal_type.clone())),
            (
                "dietaryPreference".to_string(),
                FieldInput::from(self.dietary_preference.clone()),
            ),
        ])
    }

    /// Runs the recipe schema without building a payload.
    pub fn validate(&self) -> FormValidation {
        validate_form(&self.form_data(), &recipe_schema())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFormPayload {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub servings: u32,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub source_url: Option<String>,
    pub category: Option<String>,
    pub meal_type: Option<String>,
    pub dietary_preference: Option<String>,
    pub ingredients: Vec<IngredientFormPayload>,
}

impl RecipeFormPayload {
    /// Prep plus cook time, `None` when neither is known.
    pub fn total_time(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0) + cook.unwrap_or(0)),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecipeFormError {
    #[error("Recipe form validation failed: {0}")]
    Validation(FormValidation),
    #[error("Ingredient {index} is invalid: {source}")]
    Ingredient {
        index: usize,
        source: IngredientFormError,
    },
}

impl TryFrom<RecipeForm> for RecipeFormPayload {
    type Error = RecipeFormError;

    fn try_from(value: RecipeForm) -> Result<Self, Self::Error> {
        let validation = value.validate();
        if !validation.is_valid {
            return Err(RecipeFormError::Validation(validation));
        }

        let ingredients = value
            .ingredients
            .into_iter()
            .enumerate()
            .map(|(index, ingredient)| {
                IngredientFormPayload::try_from(ingredient)
                    .map_err(|source| RecipeFormError::Ingredient { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: validation.non_empty_text("name").unwrap_or_default(),
            description: validation.non_empty_text("description"),
            instructions: validation.non_empty_text("instructions"),
            servings: whole_number(&validation, "servings").unwrap_or(1),
            prep_time: whole_number(&validation, "prepTime"),
            cook_time: whole_number(&validation, "cookTime"),
            source_url: validation.non_empty_text("sourceUrl"),
            category: validation.non_empty_text("category"),
            meal_type: validation.non_empty_text("mealType"),
            dietary_preference: validation.non_empty_text("dietaryPreference"),
            ingredients,
        })
    }
}
