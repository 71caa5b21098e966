pub mod chart;
pub mod distribution;
pub mod form;

use analytics_api_caller::{
    json::{
        CameraId,
        categories::{AgeGroup, Emotion, Ethnicity, Gender},
    },
    query::DemographicsQuery,
};
use chrono::{DateTime, Utc};

use crate::forms::{FieldError, ValidationErrors};

/// Raw filter input for the demographics results view
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DemographicsFilter {
    pub gender: Option<String>,
    pub age: Option<String>,
    pub emotion: Option<String>,
    pub ethnicity: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DemographicsFilter {
    pub fn to_query(&self, camera_id: CameraId) -> Result<DemographicsQuery, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let query = DemographicsQuery {
            camera_id,
            gender: errors.check_optional(self.gender.as_deref(), |raw| {
                parse_category::<Gender>("gender", raw)
            }),
            age: errors.check_optional(self.age.as_deref(), |raw| {
                parse_category::<AgeGroup>("age", raw)
            }),
            emotion: errors.check_optional(self.emotion.as_deref(), |raw| {
                parse_category::<Emotion>("emotion", raw)
            }),
            ethnicity: errors.check_optional(self.ethnicity.as_deref(), |raw| {
                parse_category::<Ethnicity>("ethnicity", raw)
            }),
            start_date: errors.check_optional(self.start_date.as_deref(), |raw| {
                parse_timestamp("start_date", raw)
            }),
            end_date: errors.check_optional(self.end_date.as_deref(), |raw| {
                parse_timestamp("end_date", raw)
            }),
        };

        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                errors.push(FieldError::new("end_date", "must not be before start_date"));
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(errors)
        }
    }
}

fn parse_category<T>(field: &'static str, raw: &str) -> Result<T, FieldError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| FieldError::new(field, e.to_string()))
}

fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, FieldError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| FieldError::new(field, format!("must be an RFC 3339 timestamp: {e}")))
}
