//! Offset pagination types
//!
//! List endpoints take a 1-based `page` and a `page_size`, and return the
//! requested slice together with the total number of matching records.
//!
//! # Usage
//!
//! ```rust,ignore
//! let args = PageArgs { page: 2, page_size: 10 }.validate()?;
//! let page = Page::from_vec(all_matching, &args);
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw pagination input, as received from a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageArgs {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageArgs {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Validate against the public bounds (`page >= 1`, `1 <= page_size <= 100`).
    ///
    /// Out-of-range values are rejected rather than clamped.
    pub fn validate(&self) -> Result<ValidatedPageArgs, &'static str> {
        if self.page < 1 {
            return Err("page must be >= 1");
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err("page_size must be between 1 and 100");
        }
        Ok(ValidatedPageArgs {
            page: self.page,
            page_size: self.page_size,
        })
    }
}

/// Pagination arguments that passed validation.
///
/// Internal callers that need bigger pages (bulk email recipient resolution)
/// build one with [`ValidatedPageArgs::unbounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPageArgs {
    page: u32,
    page_size: u32,
}

impl ValidatedPageArgs {
    /// First page of the given size, skipping the public size cap.
    pub fn unbounded(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }
}

/// One page of results plus the size of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Slice `all` down to the requested page. Pages past the end are empty
    /// but still report the full `total_count`.
    pub fn from_vec(all: Vec<T>, args: &ValidatedPageArgs) -> Self {
        let total_count = all.len();
        let start = args.offset().min(total_count);
        let items = all
            .into_iter()
            .skip(start)
            .take(args.page_size() as usize)
            .collect();

        Page {
            items,
            total_count,
            page: args.page(),
            page_size: args.page_size(),
        }
    }
}
