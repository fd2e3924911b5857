use std::collections::HashSet;

use async_trait::async_trait;

use crate::types::ApiError;

/// One fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Server-reported total item count, when known.
    pub total: Option<u64>,
}

/// Source of pages for a [`Pager`]. Implementations wrap one paginated
/// backend listing.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send;

    /// Fetch the given 1-based page.
    async fn fetch_page(&self, page: u32) -> Result<Page<Self::Item>, ApiError>;

    /// Stable identity used to drop items re-delivered by overlapping pages.
    fn key(item: &Self::Item) -> String;

    /// Page size requested from the backend; a shorter page means the
    /// listing is exhausted.
    fn page_size(&self) -> u32;
}

/// Accumulates pages from a [`PageFetcher`] as the view scrolls.
#[derive(Debug)]
pub struct Pager<F: PageFetcher> {
    fetcher: F,
    next_page: u32,
    seen: HashSet<String>,
    exhausted: bool,
    total: Option<u64>,
}

impl<F: PageFetcher> Pager<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            next_page: 1,
            seen: HashSet::new(),
            exhausted: false,
            total: None,
        }
    }

    /// Forget everything and start again from page one.
    pub fn reset(&mut self) {
        self.next_page = 1;
        self.seen.clear();
        self.exhausted = false;
        self.total = None;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    /// Fetch the next page and return only the items not seen before.
    /// Returns an empty vec once the listing is exhausted.
    pub async fn load_next(&mut self) -> Result<Vec<F::Item>, ApiError> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        let page = self.fetcher.fetch_page(self.next_page).await?;
        self.next_page += 1;
        if page.total.is_some() {
            self.total = page.total;
        }
        if (page.items.len() as u32) < self.fetcher.page_size() {
            self.exhausted = true;
        }

        let mut fresh = Vec::with_capacity(page.items.len());
        for item in page.items {
            if self.seen.insert(F::key(&item)) {
                fresh.push(item);
            }
        }
        Ok(fresh)
    }
}
