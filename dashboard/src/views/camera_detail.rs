use std::fmt::Write;

use analytics_api_caller::json::{camera::Camera, demographics::DemographicsConfig};
use itertools::Itertools;

use super::{View, camera_list::status_label};

#[must_use]
pub struct CameraDetailView<'a> {
    camera: &'a Camera,
}

impl<'a> CameraDetailView<'a> {
    pub fn new(camera: &'a Camera) -> Self {
        Self { camera }
    }
}

impl View for CameraDetailView<'_> {
    fn render(&self) -> String {
        let camera = self.camera;
        let mut out = String::new();

        let tags = if camera.tags.is_empty() {
            "none".to_string()
        } else {
            camera.tags.iter().map(|t| t.name.as_str()).join(", ")
        };
        let updated = camera
            .updated_at
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());

        let _ = writeln!(out, "Camera #{}: {}", camera.id, camera.name);
        let _ = writeln!(out, "  Status:    {}", status_label(camera.is_active));
        let _ = writeln!(out, "  RTSP URL:  {}", camera.rtsp_url);
        let _ = writeln!(
            out,
            "  Stream:    {} {} @ {} fps, {} kbps",
            camera.stream_encoding,
            camera.resolution(),
            camera.stream_fps,
            camera.stream_bitrate
        );
        let _ = writeln!(out, "  Tags:      {tags}");
        let _ = writeln!(out, "  Created:   {}", camera.created_at.to_rfc3339());
        let _ = writeln!(out, "  Updated:   {updated}");
        let _ = writeln!(out);
        out.push_str(&render_demographics_config(camera.demographics_config.as_ref()));
        out
    }
}

#[must_use]
pub fn render_demographics_config(config: Option<&DemographicsConfig>) -> String {
    let Some(config) = config else {
        return "Demographics: not configured\n".to_string();
    };

    let rows = [
        ("track_history_max_length", config.track_history_max_length.to_string()),
        ("exit_threshold", config.exit_threshold.to_string()),
        ("min_track_duration", format!("{}s", config.min_track_duration)),
        (
            "detection_confidence_threshold",
            config.detection_confidence_threshold.to_string(),
        ),
        (
            "demographics_confidence_threshold",
            config.demographics_confidence_threshold.to_string(),
        ),
        ("min_track_updates", config.min_track_updates.to_string()),
        ("box_area_threshold", config.box_area_threshold.to_string()),
        ("save_interval", format!("{}s", config.save_interval)),
        ("frame_skip_interval", format!("{}s", config.frame_skip_interval)),
    ];
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = format!("Demographics configuration #{}\n", config.id);
    for (name, value) in rows {
        let _ = writeln!(out, "  {name:<width$}  {value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cameras::tests::make_camera;
    use test_utils::asserts::{assert_str_contains, assert_str_ends_with};

    #[test]
    fn renders_unconfigured_camera() {
        let camera = make_camera(3, "Lobby", &[4], false);
        let rendered = CameraDetailView::new(&camera).render();

        assert!(rendered.starts_with("Camera #3: Lobby\n"), "{rendered}");
        assert_str_contains(&rendered, "  Status:    inactive\n");
        assert_str_contains(&rendered, "  RTSP URL:  rtsp://10.0.0.3:554/stream\n");
        assert_str_contains(&rendered, "  Stream:    h264 1920x1080 @ 15 fps, 4096 kbps\n");
        assert_str_contains(&rendered, "  Tags:      tag-4\n");
        assert_str_contains(&rendered, "  Updated:   never\n");
        assert_str_ends_with(&rendered, "Demographics: not configured\n");
    }

    #[test]
    fn renders_configuration() {
        let mut camera = make_camera(3, "Lobby", &[], true);
        camera.demographics_config = Some(DemographicsConfig {
            id: 8,
            camera_id: 3,
            track_history_max_length: 20,
            exit_threshold: 30,
            min_track_duration: 1.5,
            detection_confidence_threshold: 0.7,
            demographics_confidence_threshold: 0.5,
            min_track_updates: 5,
            box_area_threshold: 0.05,
            save_interval: 600,
            frame_skip_interval: 1.0,
        });
        let rendered = CameraDetailView::new(&camera).render();

        assert_str_contains(&rendered, "  Tags:      none\n");
        assert_str_contains(&rendered, "Demographics configuration #8\n");
        assert_str_contains(
            &rendered,
            "  detection_confidence_threshold     0.7\n",
        );
        assert_str_contains(&rendered, "  min_track_duration                 1.5s\n");
        assert_str_ends_with(&rendered, "  frame_skip_interval                1s\n");
    }
}
