use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};

use super::{CameraId, TagId, demographics::DemographicsConfig, tag::Tag};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StreamEncoding {
    #[default]
    H264,
    H265,
    Mjpeg,
}

impl StreamEncoding {
    pub const ALL: &[StreamEncoding] = &[
        StreamEncoding::H264,
        StreamEncoding::H265,
        StreamEncoding::Mjpeg,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StreamEncoding::H264 => "h264",
            StreamEncoding::H265 => "h265",
            StreamEncoding::Mjpeg => "mjpeg",
        }
    }
}

impl Display for StreamEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown stream encoding `{0}`; expected one of: h264, h265, mjpeg")]
pub struct UnknownStreamEncoding(pub String);

impl FromStr for StreamEncoding {
    type Err = UnknownStreamEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .find(|e| e.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownStreamEncoding(s.to_string()))
    }
}

#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub rtsp_url: String,
    pub stream_fps: u32,
    pub stream_width: u32,
    pub stream_height: u32,
    /// kbps
    pub stream_bitrate: u32,
    #[serde(default)]
    pub stream_encoding: StreamEncoding,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub demographics_config: Option<DemographicsConfig>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_is_active() -> bool {
    true
}

impl Camera {
    #[must_use]
    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    #[must_use]
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.stream_width, self.stream_height)
    }
}

/// Body of `PUT /cameras/{id}`. Fields left as `None` are not sent and stay unchanged.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct CameraUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtsp_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_encoding: Option<StreamEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl CameraUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
