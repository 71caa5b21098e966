//! Client-side filtering, sorting and paging of fetched cameras: filter, then sort, then slice.

pub mod form;

use analytics_api_caller::json::{TagId, camera::Camera};

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraFilter {
    /// Case-insensitive substring of the camera name
    pub name: Option<String>,
    /// A camera matches if it carries any of these tags; empty matches everything
    pub tag_ids: Vec<TagId>,
    pub active: Option<bool>,
}

impl CameraFilter {
    pub fn with_name(self, name: Option<String>) -> Self {
        Self { name, ..self }
    }

    pub fn with_tag_ids(self, tag_ids: Vec<TagId>) -> Self {
        Self { tag_ids, ..self }
    }

    pub fn with_active(self, active: Option<bool>) -> Self {
        Self { active, ..self }
    }

    #[must_use]
    pub fn matches(&self, camera: &Camera) -> bool {
        let name_matches = match self.name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => camera
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };

        let tags_match =
            self.tag_ids.is_empty() || self.tag_ids.iter().any(|t| camera.has_tag(*t));

        let active_matches = self.active.is_none_or(|active| camera.is_active == active);

        name_matches && tags_match && active_matches
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl CameraSort {
    /// Stable, so cameras that compare equal keep their fetched order
    pub fn sort(&self, cameras: &mut [&Camera]) {
        cameras.sort_by(|a, b| {
            let ordering = match self.field {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

/// Position within a paged listing. Pages start at 1.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Clamps `page` into `1..=total_pages`; there is always at least one page
    pub fn new(page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            page: page.clamp(1, total_pages),
            total_pages,
        }
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    #[must_use]
    pub fn previous(&self) -> Option<u32> {
        (!self.is_first()).then(|| self.page - 1)
    }

    #[must_use]
    pub fn next(&self) -> Option<u32> {
        (!self.is_last()).then(|| self.page + 1)
    }
}

/// Serializes flat, as `{ items, page, total_pages, total_items }`
#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListPage<'a> {
    pub items: Vec<&'a Camera>,
    #[serde(flatten)]
    pub pagination: Pagination,
    pub total_items: usize,
}

#[must_use]
pub fn page_count(total_items: usize, page_size: u32) -> u32 {
    let page_size = usize::try_from(page_size.max(1)).unwrap_or(usize::MAX);
    u32::try_from(total_items.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// Filter, then sort, then slice out `page` of `page_size` items
pub fn apply<'a>(
    cameras: &'a [Camera],
    filter: &CameraFilter,
    sort: CameraSort,
    page: u32,
    page_size: u32,
) -> ListPage<'a> {
    let mut matching = cameras.iter().filter(|c| filter.matches(c)).collect::<Vec<_>>();
    sort.sort(&mut matching);

    let total_items = matching.len();
    let pagination = Pagination::new(page, page_count(total_items, page_size));

    let page_size = usize::try_from(page_size.max(1)).unwrap_or(usize::MAX);
    let start = usize::try_from(pagination.page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(page_size);
    let items = matching
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect::<Vec<_>>();

    ListPage {
        items,
        pagination,
        total_items,
    }
}
