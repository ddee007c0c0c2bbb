use std::future::Future;

use futures::future::try_join_all;
use tracing::debug;

/// One page of an offset paginated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Retrieves complete offset paginated collections.
///
/// A probe request with `limit=1` discovers the collection size, then all
/// pages are requested in groups of `group_width`. Results are concatenated
/// in request order no matter in which order the requests complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFetcher {
    page_size: usize,
    group_width: usize,
}

impl PageFetcher {
    pub fn new(page_size: usize, group_width: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            group_width: group_width.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `(offset, limit)` pairs covering a collection of `total` items.
    pub fn page_requests(&self, total: usize) -> Vec<(usize, usize)> {
        (0..total.div_ceil(self.page_size))
            .map(|page| (page * self.page_size, self.page_size))
            .collect()
    }

    /// Fetches every item of the collection behind `fetch_page`.
    ///
    /// `on_progress` receives the share of completed pages in percent after
    /// each group. It is not called for an empty collection, and the last
    /// value reported for a successful fetch is exactly `100.0`.
    ///
    /// The first failing page request aborts the fetch; items already
    /// received are discarded.
    pub async fn fetch_all<T, E, F, Fut, P>(
        &self,
        mut fetch_page: F,
        mut on_progress: P,
    ) -> Result<Vec<T>, E>
    where
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
        P: FnMut(f64),
    {
        let probe = fetch_page(0, 1).await?;
        if probe.total == 0 {
            return Ok(Vec::new());
        }

        let requests = self.page_requests(probe.total);
        let page_count = requests.len();
        debug!(total = probe.total, pages = page_count, "fetching paginated collection");

        let mut items = Vec::with_capacity(probe.total);
        let mut completed = 0;

        for group in requests.chunks(self.group_width) {
            let pages =
                try_join_all(group.iter().map(|&(offset, limit)| fetch_page(offset, limit)))
                    .await?;

            for page in pages {
                items.extend(page.items);
            }

            completed += group.len();
            on_progress(completed as f64 / page_count as f64 * 100.0);
        }

        Ok(items)
    }
}
