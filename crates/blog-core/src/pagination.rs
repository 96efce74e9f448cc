//! Fixed-size page arithmetic for the post listing.

use serde::Serialize;

use crate::error::DomainError;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: u64 = 5;

/// One page of results plus enough context to link to its neighbours.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Total number of pages; an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        num_pages(self.total_items, self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn previous_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }
}

pub fn num_pages(total_items: u64, per_page: u64) -> u64 {
    total_items.div_ceil(per_page.max(1)).max(1)
}

/// Check `number` against the listing size and return the row offset for it.
///
/// Page 0 and pages past the last one are not found.
pub fn page_offset(number: u64, per_page: u64, total_items: u64) -> Result<u64, DomainError> {
    if number == 0 || number > num_pages(total_items, per_page) {
        return Err(DomainError::not_found("page", number));
    }
    Ok((number - 1) * per_page)
}
