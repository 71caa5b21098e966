use std::fmt::Write;

use analytics_api_caller::json::tag::Tag;

use super::View;

#[must_use]
pub struct TagListView<'a> {
    tags: &'a [Tag],
}

impl<'a> TagListView<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        Self { tags }
    }
}

impl View for TagListView<'_> {
    fn render(&self) -> String {
        if self.tags.is_empty() {
            return "No tags\n".to_string();
        }

        let name_width = self
            .tags
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("NAME".len());

        let mut out = String::new();
        let _ = writeln!(out, "{:>5}  {:<name_width$}  COLOR", "ID", "NAME");
        for tag in self.tags {
            let _ = writeln!(out, "{:>5}  {:<name_width$}  {}", tag.id, tag.name, tag.color);
        }
        out
    }
}
