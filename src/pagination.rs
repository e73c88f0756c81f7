//! Page-number pagination over a known item count.
//!
//! An empty collection still has one (empty) page, so page 1 is always
//! addressable. Every other out-of-range request is a `NotFound`.

use crate::error::{AppError, AppResult};

pub const PAGE_SIZE: u64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub num_pages: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self { count, per_page: per_page.max(1) }
    }

    pub fn num_pages(&self) -> u64 {
        self.count.div_ceil(self.per_page).max(1)
    }

    /// Resolves the raw `page` query value: absent or blank means the first
    /// page and `last` means the final one.
    pub fn page(&self, raw: Option<&str>) -> AppResult<Page> {
        let number: i64 = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => 1,
            Some("last") => i64::try_from(self.num_pages()).unwrap_or(i64::MAX),
            Some(s) => s.parse::<i64>().map_err(|_| {
                AppError::not_found("page is not 'last', nor can it be converted to an int")
            })?,
        };

        if number < 1 {
            return Err(AppError::not_found("that page number is less than 1"));
        }
        let number = number as u64;
        if number > self.num_pages() {
            return Err(AppError::not_found("that page contains no results"));
        }

        Ok(Page { number, num_pages: self.num_pages() })
    }
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    /// Zero-based index, as the store's paginator expects.
    pub fn index(&self) -> u64 {
        self.number - 1
    }
}
