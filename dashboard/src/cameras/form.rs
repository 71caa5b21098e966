use std::borrow::Cow;

use analytics_api_caller::json::{
    TagId,
    camera::{Camera, CameraUpdate, StreamEncoding},
};
use itertools::Itertools;
use validator::{Validate, ValidationError};

use crate::forms::{FieldError, ValidationErrors, parse_bool, parse_integer};

/// Form fields in display order
const FIELDS: [&str; 9] = [
    "name",
    "rtsp_url",
    "stream_fps",
    "stream_width",
    "stream_height",
    "stream_bitrate",
    "stream_encoding",
    "is_active",
    "tag_ids",
];

const RTSP_SCHEMES: [&str; 2] = ["rtsp", "rtsps"];

/// Raw user input for editing a camera. `None` means the field was left untouched.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraForm {
    pub name: Option<String>,
    pub rtsp_url: Option<String>,
    pub stream_fps: Option<String>,
    pub stream_width: Option<String>,
    pub stream_height: Option<String>,
    pub stream_bitrate: Option<String>,
    pub stream_encoding: Option<String>,
    pub is_active: Option<String>,
    /// Comma-separated tag ids; an empty string clears the tags
    pub tag_ids: Option<String>,
}

/// The form's values once parsed, with the limits the backend accepts
#[derive(Debug, Validate)]
struct CameraInput {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    name: Option<String>,
    #[validate(custom(function = "validate_rtsp_url"))]
    rtsp_url: Option<String>,
    #[validate(range(min = 1, max = 60, message = "must be between 1 and 60"))]
    stream_fps: Option<u32>,
    #[validate(range(min = 160, max = 7680, message = "must be between 160 and 7680"))]
    stream_width: Option<u32>,
    #[validate(range(min = 120, max = 4320, message = "must be between 120 and 4320"))]
    stream_height: Option<u32>,
    #[validate(range(min = 100, max = 50_000, message = "must be between 100 and 50000"))]
    stream_bitrate: Option<u32>,
}

impl CameraForm {
    /// Every field pre-filled from the current camera
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            name: Some(camera.name.clone()),
            rtsp_url: Some(camera.rtsp_url.clone()),
            stream_fps: Some(camera.stream_fps.to_string()),
            stream_width: Some(camera.stream_width.to_string()),
            stream_height: Some(camera.stream_height.to_string()),
            stream_bitrate: Some(camera.stream_bitrate.to_string()),
            stream_encoding: Some(camera.stream_encoding.to_string()),
            is_active: Some(camera.is_active.to_string()),
            tag_ids: Some(camera.tags.iter().map(|t| t.id).join(",")),
        }
    }

    pub fn validate(&self) -> Result<CameraUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let input = CameraInput {
            name: self.name.as_deref().map(|raw| raw.trim().to_string()),
            rtsp_url: self.rtsp_url.as_deref().map(|raw| raw.trim().to_string()),
            stream_fps: errors.check_optional(self.stream_fps.as_deref(), |raw| {
                parse_integer("stream_fps", raw)
            }),
            stream_width: errors.check_optional(self.stream_width.as_deref(), |raw| {
                parse_integer("stream_width", raw)
            }),
            stream_height: errors.check_optional(self.stream_height.as_deref(), |raw| {
                parse_integer("stream_height", raw)
            }),
            stream_bitrate: errors.check_optional(self.stream_bitrate.as_deref(), |raw| {
                parse_integer("stream_bitrate", raw)
            }),
        };
        let stream_encoding =
            errors.check_optional(self.stream_encoding.as_deref(), parse_stream_encoding);
        let is_active = errors.check_optional(self.is_active.as_deref(), |raw| {
            parse_bool("is_active", raw)
        });
        let tag_ids = errors.check_optional(self.tag_ids.as_deref(), parse_tag_ids);

        errors.add_violations(&FIELDS, input.validate());
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CameraUpdate {
            name: input.name,
            rtsp_url: input.rtsp_url,
            stream_fps: input.stream_fps,
            stream_width: input.stream_width,
            stream_height: input.stream_height,
            stream_bitrate: input.stream_bitrate,
            stream_encoding,
            is_active,
            tag_ids,
        })
    }
}

fn validate_rtsp_url(raw: &str) -> Result<(), ValidationError> {
    let invalid =
        |message: String| ValidationError::new("rtsp_url").with_message(Cow::from(message));

    if raw.is_empty() {
        return Err(invalid("is required".to_string()));
    }
    let url = url::Url::parse(raw).map_err(|e| invalid(format!("is not a valid URL: {e}")))?;
    if !RTSP_SCHEMES.contains(&url.scheme()) {
        return Err(invalid(format!(
            "must start with rtsp:// or rtsps://, not {}://",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("must include a host".to_string()));
    }
    Ok(())
}

fn parse_stream_encoding(raw: &str) -> Result<StreamEncoding, FieldError> {
    raw.parse::<StreamEncoding>()
        .map_err(|e| FieldError::new("stream_encoding", e.to_string()))
}

fn parse_tag_ids(raw: &str) -> Result<Vec<TagId>, FieldError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<TagId>().map_err(|_| {
                FieldError::new("tag_ids", format!("`{s}` is not a valid tag id"))
            })
        })
        .process_results(|ids| ids.unique().collect())
}
