//! Shared form plumbing for the camera and demographics forms.
//! Inputs arrive as the raw text the user typed: they are parsed into typed values first,
//! then the value constraints declared with [`validator::Validate`] are checked.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error of a form, in field order
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("Invalid form input: {}", join_field_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Records the error, if any, and passes the value through
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        result.map_err(|e| self.push(e)).ok()
    }

    /// Like [`Self::check`] for a field the user may have left out
    pub fn check_optional<T>(
        &mut self,
        raw: Option<&str>,
        parse: impl FnOnce(&str) -> Result<T, FieldError>,
    ) -> Option<T> {
        raw.and_then(|raw| self.check(parse(raw)))
    }

    /// Adds the constraint violations of the parsed values, then puts every error in `fields` order
    pub fn add_violations(
        &mut self,
        fields: &[&'static str],
        validated: Result<(), validator::ValidationErrors>,
    ) {
        if let Err(violations) = validated {
            let by_field = violations.field_errors();
            for &field in fields {
                let Some(errors) = by_field.get(field) else {
                    continue;
                };
                for error in errors.iter() {
                    let message = error.message.as_ref().unwrap_or(&error.code);
                    self.push(FieldError::new(field, message.to_string()));
                }
            }
        }
        self.errors
            .sort_by_key(|e| fields.iter().position(|field| *field == e.field));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn parse_integer(field: &'static str, raw: &str) -> Result<u32, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    raw.parse::<u32>()
        .map_err(|_| FieldError::new(field, "must be a whole number"))
}

pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::new(field, "must be a number"))
}

pub fn parse_bool(field: &'static str, raw: &str) -> Result<bool, FieldError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(FieldError::new(field, "must be true or false")),
    }
}
