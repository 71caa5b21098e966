use chrono::{DateTime, SecondsFormat, Utc};

use crate::json::{
    CameraId,
    categories::{AgeGroup, Emotion, Ethnicity, Gender},
};

/// Parameters of `GET /cameras/`. Pages start at 1.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraListQuery {
    pub page: u32,
    pub size: u32,
    pub camera_name: Option<String>,
}

impl CameraListQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            camera_name: None,
        }
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(name) = self.camera_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                pairs.push(("camera_name", name.to_string()));
            }
        }
        pairs
    }
}

/// Parameters of `GET /demographics/results`. Unset filters are not sent.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DemographicsQuery {
    pub camera_id: CameraId,
    pub gender: Option<Gender>,
    pub age: Option<AgeGroup>,
    pub emotion: Option<Emotion>,
    pub ethnicity: Option<Ethnicity>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl DemographicsQuery {
    pub fn for_camera(camera_id: CameraId) -> Self {
        Self {
            camera_id,
            gender: None,
            age: None,
            emotion: None,
            ethnicity: None,
            start_date: None,
            end_date: None,
        }
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("camera_id", self.camera_id.to_string())];
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.to_string()));
        }
        if let Some(age) = self.age {
            pairs.push(("age", age.to_string()));
        }
        if let Some(emotion) = self.emotion {
            pairs.push(("emotion", emotion.to_string()));
        }
        if let Some(ethnicity) = self.ethnicity {
            pairs.push(("ethnicity", ethnicity.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push((
                "start_date",
                start.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        pairs
    }
}
