//! Pagination constants and arithmetic shared by every list screen.
//!
//! List endpoints take `skip`/`take` and answer with a `{ data, total }`
//! envelope. The server's `total` is authoritative; pages are 1-based on
//! the client side.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

pub const STUDENT_PAGE_SIZE: u32 = 10;
pub const USER_PAGE_SIZE: u32 = 10;
pub const CLASS_PAGE_SIZE: u32 = 5;
pub const CLASS_STUDENTS_PAGE_SIZE: u32 = 10;
pub const CLASS_ATTENDANCE_PAGE_SIZE: u32 = 5;

/// Upper bound on students fetched in one request for an attendance roster.
pub const ROSTER_FETCH_LIMIT: u32 = 1000;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Standard `{ "data": [...], "total": n }` list response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A 1-based page request of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::Validation("Page numbers start at 1".to_string()));
        }
        if page_size == 0 {
            return Err(CoreError::Validation(
                "Page size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// First page of the given size.
    pub fn first(page_size: u32) -> Self {
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

    /// `skip` query value: `(page - 1) * page_size`.
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// `take` query value.
    pub fn take(&self) -> u32 {
        self.page_size
    }
}

/// Number of pages needed for `total` records: `ceil(total / page_size)`.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// How many records a page should hold given the server's `total`.
pub fn items_on_page(total: u64, request: &PageRequest) -> u64 {
    total
        .saturating_sub(request.skip())
        .min(u64::from(request.page_size))
}

/// Keep a requested page inside `1..=total_pages` (page 1 when empty).
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.max(1).min(total_pages.max(1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
