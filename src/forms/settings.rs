use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use validator::ValidateEmail;

use crate::forms::validation::{
    FieldConstraints, FieldInput, FieldValue, FormSchema, FormValidation, ValidationResult,
    validate_form, validate_integer, validate_string,
};

pub const HOUSEHOLD_SIZE_MIN: f64 = 1.0;
pub const HOUSEHOLD_SIZE_MAX: f64 = 20.0;
pub const EMAIL_MAX_LENGTH: f64 = 254.0;

pub fn validate_household_size(input: impl Into<FieldInput>) -> ValidationResult<Option<f64>> {
    validate_integer(
        input,
        &FieldConstraints::new()
            .required()
            .min(HOUSEHOLD_SIZE_MIN)
            .max(HOUSEHOLD_SIZE_MAX)
            .label("Household size"),
    )
}

pub fn validate_email(input: &str) -> ValidationResult<String> {
    let result = validate_string(
        input,
        &FieldConstraints::new()
            .required()
            .max(EMAIL_MAX_LENGTH)
            .label("Email"),
    );
    if result.is_valid() && !result.value().as_str().validate_email() {
        return ValidationResult::invalid(
            result.into_value(),
            "Email must be a valid email address",
        );
    }
    result
}

pub fn settings_schema() -> FormSchema {
    FormSchema::new()
        .field("householdSize", |input: &FieldInput| {
            validate_household_size(input.clone()).map(FieldValue::from)
        })
        .field("email", |input: &FieldInput| {
            validate_email(&input.to_text()).map(FieldValue::Text)
        })
}

/// Raw account settings submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    #[serde(default)]
    pub household_size: FieldInput,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFormPayload {
    pub household_size: u32,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum SettingsFormError {
    #[error("Settings form validation failed: {0}")]
    Validation(FormValidation),
}

impl TryFrom<SettingsForm> for SettingsFormPayload {
    type Error = SettingsFormError;

    fn try_from(value: SettingsForm) -> Result<Self, Self::Error> {
        let data = HashMap::from([
            ("householdSize".to_string(), value.household_size),
            ("email".to_string(), FieldInput::from(value.email)),
        ]);
        let validation = validate_form(&data, &settings_schema());
        if !validation.is_valid {
            return Err(SettingsFormError::Validation(validation));
        }

        Ok(Self {
            household_size: validation
                .number("householdSize")
                .map_or(1, |size| size as u32),
            email: validation.non_empty_text("email").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn household_size_bounds() {
        assert!(validate_household_size("1").is_valid());
        assert!(validate_household_size(20).is_valid());
        assert_eq!(
            validate_household_size("21").error(),
            Some("Household size must be at most 20")
        );
        assert_eq!(
            validate_household_size("1.5").error(),
            Some("Household size must be a whole number")
        );
    }

    #[test]
    fn email_must_be_valid() {
        assert!(validate_email(" cook@example.com ").is_valid());
        assert_eq!(validate_email("").error(), Some("Email is required"));
        assert_eq!(
            validate_email("not-an-email").error(),
            Some("Email must be a valid email address")
        );
    }

    #[test]
    fn settings_form_builds_payload() {
        let form = SettingsForm {
            household_size: FieldInput::from("4"),
            email: " Cook@Example.com ".to_string(),
        };
        let payload = SettingsFormPayload::try_from(form).unwrap();
        assert_eq!(payload.household_size, 4);
        assert_eq!(payload.email, "Cook@Example.com");
    }

    #[test]
    fn settings_form_collects_errors() {
        let form = SettingsForm {
            household_size: FieldInput::from("0"),
            email: "nope".to_string(),
        };
        let SettingsFormError::Validation(validation) =
            SettingsFormPayload::try_from(form).unwrap_err();
        assert_eq!(validation.errors.len(), 2);
        assert_eq!(
            validation.errors["householdSize"],
            "Household size must be at least 1"
        );
    }
}
