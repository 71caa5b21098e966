use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{CameraId, DemographicsConfigId};

/// Per-camera tracking and detection settings used by the backend's demographics pipeline
#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DemographicsConfig {
    pub id: DemographicsConfigId,
    pub camera_id: CameraId,
    pub track_history_max_length: u32,
    pub exit_threshold: u32,
    /// Seconds
    pub min_track_duration: f64,
    pub detection_confidence_threshold: f64,
    pub demographics_confidence_threshold: f64,
    pub min_track_updates: u32,
    /// Fraction of the frame area
    pub box_area_threshold: f64,
    /// Seconds
    pub save_interval: u32,
    /// Seconds
    pub frame_skip_interval: f64,
}

/// Body of `POST /demographics/config` and `PUT /demographics/config/{id}`
#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DemographicsConfigPayload {
    pub camera_id: CameraId,
    pub track_history_max_length: u32,
    pub exit_threshold: u32,
    pub min_track_duration: f64,
    pub detection_confidence_threshold: f64,
    pub demographics_confidence_threshold: f64,
    pub min_track_updates: u32,
    pub box_area_threshold: f64,
    pub save_interval: u32,
    pub frame_skip_interval: f64,
}

impl From<&DemographicsConfig> for DemographicsConfigPayload {
    fn from(config: &DemographicsConfig) -> Self {
        Self {
            camera_id: config.camera_id,
            track_history_max_length: config.track_history_max_length,
            exit_threshold: config.exit_threshold,
            min_track_duration: config.min_track_duration,
            detection_confidence_threshold: config.detection_confidence_threshold,
            demographics_confidence_threshold: config.demographics_confidence_threshold,
            min_track_updates: config.min_track_updates,
            box_area_threshold: config.box_area_threshold,
            save_interval: config.save_interval,
            frame_skip_interval: config.frame_skip_interval,
        }
    }
}

pub type CategoryCounts = BTreeMap<String, u64>;

/// A timestamped bucket of counts, keyed by category label
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DemographicsResult {
    pub id: i64,
    pub camera_id: CameraId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub gender: CategoryCounts,
    #[serde(default)]
    pub age: CategoryCounts,
    #[serde(default)]
    pub emotion: CategoryCounts,
    #[serde(default)]
    pub ethnicity: CategoryCounts,
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DemographicsAnalytics {
    #[serde(default)]
    pub gender_distribution: CategoryCounts,
    #[serde(default)]
    pub age_distribution: CategoryCounts,
    #[serde(default)]
    pub emotion_distribution: CategoryCounts,
    #[serde(default)]
    pub ethnicity_distribution: CategoryCounts,
}

/// Response of `GET /demographics/results`
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DemographicsResults {
    #[serde(default)]
    pub items: Vec<DemographicsResult>,
    #[serde(default)]
    pub analytics: Option<DemographicsAnalytics>,
}
