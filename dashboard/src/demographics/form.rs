use analytics_api_caller::json::{
    CameraId, DemographicsConfigId,
    camera::Camera,
    demographics::{DemographicsConfig, DemographicsConfigPayload},
};

use validator::Validate;

use crate::forms::{ValidationErrors, parse_integer, parse_number};

/// Form fields in display order
const FIELDS: [&str; 9] = [
    "track_history_max_length",
    "exit_threshold",
    "min_track_duration",
    "detection_confidence_threshold",
    "demographics_confidence_threshold",
    "min_track_updates",
    "box_area_threshold",
    "save_interval",
    "frame_skip_interval",
];

/// Raw user input for a camera's demographics configuration
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemographicsConfigForm {
    pub track_history_max_length: String,
    pub exit_threshold: String,
    pub min_track_duration: String,
    pub detection_confidence_threshold: String,
    pub demographics_confidence_threshold: String,
    pub min_track_updates: String,
    pub box_area_threshold: String,
    pub save_interval: String,
    pub frame_skip_interval: String,
}

/// The backend's defaults for a new configuration
impl Default for DemographicsConfigForm {
    fn default() -> Self {
        Self {
            track_history_max_length: "20".to_string(),
            exit_threshold: "30".to_string(),
            min_track_duration: "1.0".to_string(),
            detection_confidence_threshold: "0.7".to_string(),
            demographics_confidence_threshold: "0.5".to_string(),
            min_track_updates: "5".to_string(),
            box_area_threshold: "0.05".to_string(),
            save_interval: "600".to_string(),
            frame_skip_interval: "1.0".to_string(),
        }
    }
}

impl DemographicsConfigForm {
    pub fn from_config(config: &DemographicsConfig) -> Self {
        Self {
            track_history_max_length: config.track_history_max_length.to_string(),
            exit_threshold: config.exit_threshold.to_string(),
            min_track_duration: config.min_track_duration.to_string(),
            detection_confidence_threshold: config.detection_confidence_threshold.to_string(),
            demographics_confidence_threshold: config
                .demographics_confidence_threshold
                .to_string(),
            min_track_updates: config.min_track_updates.to_string(),
            box_area_threshold: config.box_area_threshold.to_string(),
            save_interval: config.save_interval.to_string(),
            frame_skip_interval: config.frame_skip_interval.to_string(),
        }
    }

    /// Pre-filled from the camera's configuration if it has one, defaults otherwise
    pub fn for_camera(camera: &Camera) -> Self {
        camera
            .demographics_config
            .as_ref()
            .map_or_else(Self::default, Self::from_config)
    }

    pub fn validate(
        &self,
        camera_id: CameraId,
    ) -> Result<DemographicsConfigPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let input = DemographicsConfigInput {
            track_history_max_length: errors.check(parse_integer(
                "track_history_max_length",
                &self.track_history_max_length,
            )),
            exit_threshold: errors.check(parse_integer("exit_threshold", &self.exit_threshold)),
            min_track_duration: errors.check(parse_number(
                "min_track_duration",
                &self.min_track_duration,
            )),
            detection_confidence_threshold: errors.check(parse_number(
                "detection_confidence_threshold",
                &self.detection_confidence_threshold,
            )),
            demographics_confidence_threshold: errors.check(parse_number(
                "demographics_confidence_threshold",
                &self.demographics_confidence_threshold,
            )),
            min_track_updates: errors.check(parse_integer(
                "min_track_updates",
                &self.min_track_updates,
            )),
            box_area_threshold: errors.check(parse_number(
                "box_area_threshold",
                &self.box_area_threshold,
            )),
            save_interval: errors.check(parse_integer("save_interval", &self.save_interval)),
            frame_skip_interval: errors.check(parse_number(
                "frame_skip_interval",
                &self.frame_skip_interval,
            )),
        };

        errors.add_violations(&FIELDS, input.validate());
        match input.into_payload(camera_id) {
            Some(payload) if errors.is_empty() => Ok(payload),
            _ => Err(errors),
        }
    }
}

/// The form's values once parsed; `None` where the text did not parse
#[derive(Debug, Validate)]
struct DemographicsConfigInput {
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    track_history_max_length: Option<u32>,
    #[validate(range(min = 1, max = 300, message = "must be between 1 and 300"))]
    exit_threshold: Option<u32>,
    #[validate(range(min = 0.0, max = 60.0, message = "must be between 0 and 60"))]
    min_track_duration: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    detection_confidence_threshold: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    demographics_confidence_threshold: Option<f64>,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    min_track_updates: Option<u32>,
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    box_area_threshold: Option<f64>,
    #[validate(range(min = 1, max = 3600, message = "must be between 1 and 3600"))]
    save_interval: Option<u32>,
    #[validate(range(min = 0.0, max = 10.0, message = "must be between 0 and 10"))]
    frame_skip_interval: Option<f64>,
}

impl DemographicsConfigInput {
    fn into_payload(self, camera_id: CameraId) -> Option<DemographicsConfigPayload> {
        Some(DemographicsConfigPayload {
            camera_id,
            track_history_max_length: self.track_history_max_length?,
            exit_threshold: self.exit_threshold?,
            min_track_duration: self.min_track_duration?,
            detection_confidence_threshold: self.detection_confidence_threshold?,
            demographics_confidence_threshold: self.demographics_confidence_threshold?,
            min_track_updates: self.min_track_updates?,
            box_area_threshold: self.box_area_threshold?,
            save_interval: self.save_interval?,
            frame_skip_interval: self.frame_skip_interval?,
        })
    }
}

/// What submitting the form does on the backend
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum DemographicsConfigSubmission {
    Create(DemographicsConfigPayload),
    Update {
        id: DemographicsConfigId,
        payload: DemographicsConfigPayload,
    },
}

impl DemographicsConfigSubmission {
    /// Creates a configuration for a camera without one, updates the existing one otherwise
    pub fn for_camera(
        camera: &Camera,
        form: &DemographicsConfigForm,
    ) -> Result<Self, ValidationErrors> {
        let payload = form.validate(camera.id)?;
        let submission = match &camera.demographics_config {
            Some(existing) => Self::Update {
                id: existing.id,
                payload,
            },
            None => Self::Create(payload),
        };
        Ok(submission)
    }

    pub fn payload(&self) -> &DemographicsConfigPayload {
        match self {
            Self::Create(payload) | Self::Update { payload, .. } => payload,
        }
    }
}
