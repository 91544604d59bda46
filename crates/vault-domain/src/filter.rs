//! List and export filters
//!
//! The presentation layer sends loosely shaped requests; these structs carry
//! every field with its default already applied so query construction never
//! has to guess.

use crate::{EvidenceVersion, StatusFilter};
use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Column a listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Group creation time
    #[default]
    CreatedAt,

    /// Review status (lexical)
    Status,
}

/// Ordering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,

    /// Descending
    #[default]
    Desc,
}

/// Category restriction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// No restriction
    #[default]
    All,

    /// Exact category match
    Exact(String),
}

impl CategoryFilter {
    /// The category to match, if restricted
    pub fn category(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Exact(category) => Some(category),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(trimmed.to_string())
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Exact(category) => category,
        }
    }
}

/// Fully specified listing request
///
/// # Examples
///
/// ```
/// use vault_domain::{ListFilter, SortDirection, SortField};
///
/// let filter = ListFilter::default();
/// assert_eq!(filter.page, 1);
/// assert_eq!(filter.page_size, 10);
/// assert_eq!(filter.sort_by, SortField::CreatedAt);
/// assert_eq!(filter.sort_dir, SortDirection::Desc);
/// assert!(!filter.include_history);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFilter {
    /// Case-insensitive substring over title, description and tag names
    pub search: String,

    /// Status restriction
    pub status: StatusFilter,

    /// Category restriction
    pub category: CategoryFilter,

    /// Sort column
    pub sort_by: SortField,

    /// Sort direction
    pub sort_dir: SortDirection,

    /// 1-based page number
    pub page: u32,

    /// Rows per page
    pub page_size: u32,

    /// List every version instead of only the latest per group
    pub include_history: bool,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            category: CategoryFilter::All,
            sort_by: SortField::CreatedAt,
            sort_dir: SortDirection::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            include_history: false,
        }
    }
}

impl ListFilter {
    /// Clamp out-of-range values and trim the search text
    ///
    /// Page numbers below 1 become 1; a zero page size becomes the default.
    pub fn normalized(mut self) -> Self {
        self.search = self.search.trim().to_string();
        self.page = self.page.max(1);
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    /// Row offset of the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.page_size)
    }

    /// Search text, if any
    pub fn search_text(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Filter for building an export package
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFilter {
    /// Status restriction
    pub status: StatusFilter,

    /// Category restriction
    pub category: CategoryFilter,
}

impl ExportFilter {
    /// Equivalent listing filter: latest versions only, no search text
    ///
    /// Pagination fields keep their defaults; the export path ignores them.
    pub fn to_list_filter(&self) -> ListFilter {
        ListFilter {
            status: self.status,
            category: self.category.clone(),
            ..ListFilter::default()
        }
    }
}

/// One page of a listing plus the unpaginated match count
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvidencePage {
    /// Rows on this page
    pub items: Vec<EvidenceVersion>,

    /// Number of rows matching the filter, before pagination
    pub total: u64,
}

impl EvidencePage {
    /// Number of pages needed for `total` rows
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(page_size))
    }
}
