//! Interactive controls of the list views. A control owns its current state and reports
//! every accepted change through its callback.

use analytics_api_caller::json::TagId;

use crate::cameras::{CameraFilter, Pagination};

pub const PREVIOUS_LABEL: &str = "« Prev";
pub const NEXT_LABEL: &str = "Next »";

pub struct PaginationControls<F> {
    pagination: Pagination,
    on_page_change: F,
}

impl<F: FnMut(u32)> PaginationControls<F> {
    #[must_use]
    pub fn new(pagination: Pagination, on_page_change: F) -> Self {
        Self {
            pagination,
            on_page_change,
        }
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Moves back a page. Returns false, without calling back, on the first page.
    pub fn previous(&mut self) -> bool {
        self.go_to(self.pagination.previous())
    }

    /// Moves forward a page. Returns false, without calling back, on the last page.
    pub fn next(&mut self) -> bool {
        self.go_to(self.pagination.next())
    }

    fn go_to(&mut self, page: Option<u32>) -> bool {
        match page {
            Some(page) => {
                self.pagination = Pagination::new(page, self.pagination.total_pages);
                (self.on_page_change)(page);
                true
            }
            None => false,
        }
    }
}

impl<F> PaginationControls<F> {
    #[must_use]
    pub fn render(&self) -> String {
        render_pagination(self.pagination)
    }
}

/// Disabled controls are shown in brackets
fn render_pagination(pagination: Pagination) -> String {
    let button = |label: &str, enabled: bool| {
        if enabled {
            label.to_string()
        } else {
            format!("[{label}]")
        }
    };
    format!(
        "{}  Page {} of {}  {}",
        button(PREVIOUS_LABEL, !pagination.is_first()),
        pagination.page,
        pagination.total_pages,
        button(NEXT_LABEL, !pagination.is_last()),
    )
}

pub struct FilterControls<F> {
    filter: CameraFilter,
    on_change: F,
}

impl<F: FnMut(&CameraFilter)> FilterControls<F> {
    #[must_use]
    pub fn new(filter: CameraFilter, on_change: F) -> Self {
        Self { filter, on_change }
    }

    #[must_use]
    pub fn into_filter(self) -> CameraFilter {
        self.filter
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.update(|filter| filter.with_name(name));
    }

    pub fn set_tag_ids(&mut self, tag_ids: Vec<TagId>) {
        self.update(|filter| filter.with_tag_ids(tag_ids));
    }

    pub fn set_active(&mut self, active: Option<bool>) {
        self.update(|filter| filter.with_active(active));
    }

    fn update(&mut self, change: impl FnOnce(CameraFilter) -> CameraFilter) {
        self.filter = change(std::mem::take(&mut self.filter));
        (self.on_change)(&self.filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, "[« Prev]  Page 1 of 1  [Next »]")]
    #[case(1, 3, "[« Prev]  Page 1 of 3  Next »")]
    #[case(2, 3, "« Prev  Page 2 of 3  Next »")]
    #[case(3, 3, "« Prev  Page 3 of 3  [Next »]")]
    fn disabled_buttons_are_bracketed(
        #[case] page: u32,
        #[case] total_pages: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(render_pagination(Pagination::new(page, total_pages)), expected);
    }

    #[test]
    fn pagination_calls_back_with_target_page() {
        let mut pages = Vec::new();
        let mut controls = PaginationControls::new(Pagination::new(2, 3), |p| pages.push(p));

        assert!(controls.next());
        assert!(!controls.next());
        assert!(controls.previous());
        assert!(controls.previous());
        assert!(!controls.previous());
        assert_eq!(controls.pagination().page, 1);
        assert_eq!(controls.render(), "[« Prev]  Page 1 of 3  Next »");

        drop(controls);
        assert_eq!(pages, vec![3, 2, 1]);
    }

    #[test]
    fn single_page_never_calls_back() {
        let mut calls = 0;
        let mut controls = PaginationControls::new(Pagination::new(1, 1), |_| calls += 1);
        assert!(!controls.next());
        assert!(!controls.previous());
        drop(controls);
        assert_eq!(calls, 0);
    }

    #[test]
    fn filter_changes_keep_other_fields() {
        let mut seen = Vec::new();
        let initial = CameraFilter {
            name: Some("door".to_string()),
            tag_ids: vec![1],
            active: None,
        };
        let mut controls = FilterControls::new(initial, |f: &CameraFilter| seen.push(f.clone()));

        controls.set_active(Some(true));
        controls.set_tag_ids(vec![2, 3]);
        controls.set_name(None);
        let last = controls.into_filter();

        assert_eq!(
            seen,
            vec![
                CameraFilter {
                    name: Some("door".to_string()),
                    tag_ids: vec![1],
                    active: Some(true),
                },
                CameraFilter {
                    name: Some("door".to_string()),
                    tag_ids: vec![2, 3],
                    active: Some(true),
                },
                CameraFilter {
                    name: None,
                    tag_ids: vec![2, 3],
                    active: Some(true),
                },
            ]
        );
        assert_eq!(&last, seen.last().unwrap());
    }
}
