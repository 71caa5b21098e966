use std::fmt::Write;

use analytics_api_caller::json::camera::Camera;
use itertools::Itertools;

use super::{View, controls::PaginationControls};
use crate::cameras::ListPage;

const NAME_WIDTH: usize = 24;

/// Pages are picked on the command line, so the footer's controls have nothing to call back
type FooterControls = PaginationControls<fn(u32)>;

#[must_use]
pub struct CameraListView<'a> {
    page: ListPage<'a>,
    controls: FooterControls,
}

impl<'a> CameraListView<'a> {
    pub fn new(page: ListPage<'a>) -> Self {
        let controls = FooterControls::new(page.pagination, |_| {});
        Self { page, controls }
    }
}

impl View for CameraListView<'_> {
    fn render(&self) -> String {
        let mut out = String::new();

        if self.page.items.is_empty() {
            let _ = writeln!(out, "No cameras found");
        } else {
            let _ = writeln!(
                out,
                "{:>5}  {:<NAME_WIDTH$}  {:<8}  TAGS",
                "ID", "NAME", "STATUS"
            );
            for camera in &self.page.items {
                let _ = writeln!(out, "{}", camera_row(camera));
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}  ({} cameras)",
            self.controls.render(),
            self.page.total_items
        );
        out
    }
}

fn camera_row(camera: &Camera) -> String {
    let tags = if camera.tags.is_empty() {
        "-".to_string()
    } else {
        camera.tags.iter().map(|t| t.name.as_str()).join(", ")
    };
    format!(
        "{:>5}  {:<NAME_WIDTH$}  {:<8}  {tags}",
        camera.id,
        camera.name,
        status_label(camera.is_active),
    )
}

#[must_use]
pub fn status_label(is_active: bool) -> &'static str {
    if is_active { "active" } else { "inactive" }
}
