//! Page/page-size access on top of [`DiscoveryService`].
//!
//! Serving page `n` of size `s` re-runs discovery with a cap of `n * s` and
//! slices the window `[(n-1)*s, n*s)` out of the ranked prefix. Every page
//! request re-ranks the whole prefix, so the cost grows with the page number.
//! Because ranking is a total order the pages never overlap or skip items.

use crate::criteria::SearchCriteria;
use crate::discovery::DiscoveryService;
use crate::rank::RankedResult;
use crate::{Error, Result};
use std::ops::Range;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page < 1 {
            return Err(Error::validation(format!("page must be at least 1, got {}", page)));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::validation(format!(
                "page_size must be within [1, {}], got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        Ok(Self { page, page_size })
    }

    #[inline]
    pub fn page(&self) -> usize {
        self.page
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of ranked results needed to fill this page
    pub fn fetch_cap(&self) -> Result<usize> {
        self.page
            .checked_mul(self.page_size)
            .ok_or_else(|| Error::validation(format!("page {} is out of range", self.page)))
    }

    /// Half-open index window of this page in the full ranked sequence
    pub fn window(&self) -> Result<Range<usize>> {
        let end = self.fetch_cap()?;
        Ok(end - self.page_size..end)
    }
}

/// One page of a ranked search
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<RankedResult>,
    /// Matches across all pages
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Clone)]
pub struct PaginationAdapter {
    discovery: DiscoveryService,
}

impl PaginationAdapter {
    pub fn new(discovery: DiscoveryService) -> Self {
        Self { discovery }
    }

    /// Fetch one page. The cap on `criteria` is replaced by the page's fetch cap.
    pub async fn page(&self, criteria: SearchCriteria, request: PageRequest) -> Result<Page> {
        let window = request.window()?;
        let criteria = criteria.with_cap(window.end);
        let discovery = self.discovery.search(&criteria).await?;

        let items = slice_window(discovery.results, window);

        Ok(Page {
            items,
            total: discovery.total_found,
            page: request.page(),
            page_size: request.page_size(),
        })
    }
}

fn slice_window(mut results: Vec<RankedResult>, window: Range<usize>) -> Vec<RankedResult> {
    if window.start >= results.len() {
        return Vec::new();
    }
    results.truncate(window.end);
    results.split_off(window.start)
}
