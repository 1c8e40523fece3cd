//! Generic field normalisation and validation.
//!
//! Every validator returns a [`ValidationResult`] carrying the normalised
//! value even when validation fails, so views can show what would be saved
//! next to the error.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{ValidateLength, ValidateRange};

const DEFAULT_LABEL: &str = "This field";

/// Outcome of validating a single field.
///
/// `is_valid` is `false` exactly when `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult<T> {
    value: T,
    is_valid: bool,
    error: Option<String>,
}

impl<T> ValidationResult<T> {
    pub fn valid(value: T) -> Self {
        Self {
            value,
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(value: T, error: impl Into<String>) -> Self {
        Self {
            value,
            is_valid: false,
            error: Some(error.into()),
        }
    }

    /// Normalised value, present regardless of the verdict.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transforms the carried value, keeping the verdict.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        ValidationResult {
            value: f(self.value),
            is_valid: self.is_valid,
            error: self.error,
        }
    }

    /// Converts into a `Result`, dropping the value on failure.
    pub fn into_result(self) -> Result<T, String> {
        match self.error {
            None => Ok(self.value),
            Some(error) => Err(error),
        }
    }
}

/// Constraints applied by the generic validators.
///
/// `min`/`max` are character counts for strings and inclusive bounds for
/// numbers. A `message` replaces the default text of every failure.
#[derive(Debug, Clone, Default)]
pub struct FieldConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub required: bool,
    pattern: Option<Regex>,
    pub message: Option<String>,
    pub label: Option<String>,
}

impl FieldConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Adds a pattern the whole value must match.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!(r"\A(?:{pattern})\z"))?);
        Ok(self)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    fn error_text(&self, default: impl FnOnce(&str) -> String) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => default(self.label_text()),
        }
    }
}

/// Raw value of a form field as received from an input element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    #[default]
    Missing,
    Number(f64),
    Text(String),
}

impl FieldInput {
    /// Textual view of the input; missing values read as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Returns `true` for missing values and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for FieldInput {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<T: Into<FieldInput>> From<Option<T>> for FieldInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Normalised value of a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Trims `input` and checks it against `constraints`.
///
/// Empty optional values pass without evaluating length or pattern checks.
pub fn validate_string(input: &str, constraints: &FieldConstraints) -> ValidationResult<String> {
    let value = input.trim().to_string();

    if value.is_empty() {
        if constraints.required {
            let error = constraints.error_text(|label| format!("{label} is required"));
            return ValidationResult::invalid(value, error);
        }
        return ValidationResult::valid(value);
    }

    if let Some(min) = constraints.min {
        if !value.validate_length(Some(min.ceil() as u64), None, None) {
            let error = constraints
                .error_text(|label| format!("{label} must be at least {min} characters"));
            return ValidationResult::invalid(value, error);
        }
    }

    if let Some(max) = constraints.max {
        if !value.validate_length(None, Some(max.floor() as u64), None) {
            let error =
                constraints.error_text(|label| format!("{label} must be at most {max} characters"));
            return ValidationResult::invalid(value, error);
        }
    }

    if let Some(pattern) = &constraints.pattern {
        if !pattern.is_match(&value) {
            let error = constraints.error_text(|label| format!("{label} has an invalid format"));
            return ValidationResult::invalid(value, error);
        }
    }

    ValidationResult::valid(value)
}

/// Normalises `input` to a number and checks it against `constraints`.
///
/// Missing, blank and unparseable input normalises to `None`.
pub fn validate_number(
    input: impl Into<FieldInput>,
    constraints: &FieldConstraints,
) -> ValidationResult<Option<f64>> {
    let value = normalize_number(input.into());

    let Some(number) = value else {
        if constraints.required {
            let error = constraints.error_text(|label| format!("{label} is required"));
            return ValidationResult::invalid(None, error);
        }
        return ValidationResult::valid(None);
    };

    if let Some(min) = constraints.min {
        if !number.validate_range(Some(min), None, None, None) {
            let error = constraints.error_text(|label| format!("{label} must be at least {min}"));
            return ValidationResult::invalid(value, error);
        }
    }

    if let Some(max) = constraints.max {
        if !number.validate_range(None, Some(max), None, None) {
            let error = constraints.error_text(|label| format!("{label} must be at most {max}"));
            return ValidationResult::invalid(value, error);
        }
    }

    ValidationResult::valid(value)
}

/// Like [`validate_number`] but additionally requires a whole number.
pub fn validate_integer(
    input: impl Into<FieldInput>,
    constraints: &FieldConstraints,
) -> ValidationResult<Option<f64>> {
    let result = validate_number(input, constraints);
    if let Some(number) = *result.value() {
        if result.is_valid() && number.fract() != 0.0 {
            let error = constraints.error_text(|label| format!("{label} must be a whole number"));
            return ValidationResult::invalid(Some(number), error);
        }
    }
    result
}

fn normalize_number(input: FieldInput) -> Option<f64> {
    match input {
        FieldInput::Missing => None,
        FieldInput::Number(number) => (!number.is_nan()).then_some(number),
        FieldInput::Text(text) => parse_float_prefix(text.trim()),
    }
}

/// Parses the longest leading decimal literal of `text`, ignoring the rest.
///
/// `"3.5 cups"` yields `3.5`; text without a leading number yields `None`.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// A validator step that threads its normalised value to the next step.
pub type Rule<T> = Box<dyn Fn(T) -> ValidationResult<T>>;

/// Runs `steps` in order, stopping at the first failure.
pub fn chain<T>(steps: Vec<Rule<T>>) -> impl Fn(T) -> ValidationResult<T> {
    move |input| {
        let mut value = input;
        for step in &steps {
            let result = step(value);
            if !result.is_valid() {
                return result;
            }
            value = result.into_value();
        }
        ValidationResult::valid(value)
    }
}

/// Validator for one form field.
pub type FieldRule = Box<dyn Fn(&FieldInput) -> ValidationResult<FieldValue>>;

/// Wraps `rule` so that missing or blank input is accepted as `Null`.
pub fn optional<F>(rule: F) -> impl Fn(&FieldInput) -> ValidationResult<FieldValue>
where
    F: Fn(&FieldInput) -> ValidationResult<FieldValue>,
{
    move |input: &FieldInput| {
        if input.is_blank() {
            ValidationResult::valid(FieldValue::Null)
        } else {
            rule(input)
        }
    }
}

pub fn string_field(constraints: FieldConstraints) -> FieldRule {
    Box::new(move |input: &FieldInput| {
        validate_string(&input.to_text(), &constraints).map(FieldValue::Text)
    })
}

pub fn number_field(constraints: FieldConstraints) -> FieldRule {
    Box::new(move |input: &FieldInput| {
        validate_number(input.clone(), &constraints).map(FieldValue::from)
    })
}

pub fn integer_field(constraints: FieldConstraints) -> FieldRule {
    Box::new(move |input: &FieldInput| {
        validate_integer(input.clone(), &constraints).map(FieldValue::from)
    })
}

/// Ordered list of form fields and their validators.
#[derive(Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldRule)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field; fields are validated in insertion order.
    pub fn field<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&FieldInput) -> ValidationResult<FieldValue> + 'static,
    {
        self.fields.push((name.into(), Box::new(rule)));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Aggregate outcome of [`validate_form`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    /// Normalised value of every schema field, valid or not.
    pub values: BTreeMap<String, FieldValue>,
    /// First error per failing field.
    pub errors: BTreeMap<String, String>,
    /// Errors in schema order.
    pub error_list: Vec<String>,
    pub is_valid: bool,
}

impl FormValidation {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(FieldValue::as_text)
    }

    /// Text value of `field`, or `None` when it normalised to an empty string.
    pub fn non_empty_text(&self, field: &str) -> Option<String> {
        self.text(field)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(FieldValue::as_number)
    }
}

impl Display for FormValidation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_list.join("; "))
    }
}

/// Validates every schema field of `data`.
///
/// Fields absent from `data` are validated as [`FieldInput::Missing`].
pub fn validate_form(data: &HashMap<String, FieldInput>, schema: &FormSchema) -> FormValidation {
    let mut validation = FormValidation {
        is_valid: true,
        ..Default::default()
    };

    for (name, rule) in &schema.fields {
        let input = data.get(name).cloned().unwrap_or_default();
        let result = rule(&input);
        if let Some(error) = result.error() {
            validation.is_valid = false;
            validation.errors.insert(name.clone(), error.to_string());
            validation.error_list.push(error.to_string());
        }
        validation.values.insert(name.clone(), result.into_value());
    }

    validation
}
