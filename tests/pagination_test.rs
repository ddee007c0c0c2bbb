use std::sync::Mutex;

use tokio::time::{Duration, sleep};
use tunetwin::pagination::{Page, PageFetcher};

/// Serves `total` numbered items, recording every `(offset, limit)` request.
fn serve(
    total: usize,
    calls: &Mutex<Vec<(usize, usize)>>,
) -> impl FnMut(usize, usize) -> std::future::Ready<Result<Page<usize>, String>> + '_ {
    move |offset, limit| {
        calls.lock().unwrap().push((offset, limit));
        let items = (offset..total.min(offset + limit)).collect();
        std::future::ready(Ok(Page { items, total }))
    }
}

#[tokio::test]
async fn fetches_every_item_in_order() {
    for (total, page_size) in [(1, 50), (50, 50), (51, 50), (120, 50), (7, 2), (10, 3)] {
        let calls = Mutex::new(Vec::new());
        let fetcher = PageFetcher::new(page_size, 3);

        let items = fetcher
            .fetch_all(serve(total, &calls), |_| {})
            .await
            .unwrap();

        assert_eq!(items, (0..total).collect::<Vec<_>>(), "total {total}");
        assert_eq!(
            calls.lock().unwrap().len(),
            total.div_ceil(page_size) + 1,
            "total {total}, page size {page_size}"
        );
    }
}

#[tokio::test]
async fn probe_asks_for_a_single_item() {
    let calls = Mutex::new(Vec::new());
    let fetcher = PageFetcher::new(50, 3);

    fetcher.fetch_all(serve(120, &calls), |_| {}).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0], (0, 1));
    assert_eq!(calls[1..], [(0, 50), (50, 50), (100, 50)]);
}

#[tokio::test]
async fn empty_collection_needs_only_the_probe() {
    let calls = Mutex::new(Vec::new());
    let mut reports = Vec::new();
    let fetcher = PageFetcher::new(50, 3);

    let items = fetcher
        .fetch_all(serve(0, &calls), |p| reports.push(p))
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert!(reports.is_empty());
}

#[tokio::test]
async fn progress_rises_to_exactly_one_hundred() {
    let calls = Mutex::new(Vec::new());
    let mut reports = Vec::new();
    let fetcher = PageFetcher::new(2, 3);

    fetcher
        .fetch_all(serve(13, &calls), |p| reports.push(p))
        .await
        .unwrap();

    // 7 pages in groups of 3
    assert_eq!(reports.len(), 3);
    assert!(reports.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(reports.last().copied(), Some(100.0));
    assert!(reports.iter().all(|p| (0.0..=100.0).contains(p)));
}

#[tokio::test]
async fn out_of_order_completion_keeps_request_order() {
    let fetcher = PageFetcher::new(10, 4);

    let items = fetcher
        .fetch_all(
            |offset, limit| async move {
                // later pages finish first
                sleep(Duration::from_millis(50 - offset as u64 / 2)).await;
                Ok::<_, String>(Page {
                    items: (offset..40.min(offset + limit)).collect::<Vec<_>>(),
                    total: 40,
                })
            },
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(items, (0..40).collect::<Vec<_>>());
}

#[tokio::test]
async fn failing_page_aborts_the_fetch() {
    let fetcher = PageFetcher::new(5, 2);
    let mut reports = Vec::new();

    let result = fetcher
        .fetch_all(
            |offset, limit| async move {
                if offset == 15 {
                    return Err(format!("page at {offset} failed"));
                }
                Ok(Page {
                    items: (offset..30.min(offset + limit)).collect::<Vec<_>>(),
                    total: 30,
                })
            },
            |p| reports.push(p),
        )
        .await;

    assert_eq!(result, Err("page at 15 failed".to_string()));
    // the first group of two pages went through before the failure
    assert_eq!(reports.len(), 1);
}
