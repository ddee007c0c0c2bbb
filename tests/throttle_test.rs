use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::future::join_all;
use tokio::time::{Instant, sleep};
use tunetwin::throttle::{TaskDropped, Throttler};

#[tokio::test(start_paused = true)]
async fn never_runs_more_than_width_tasks_at_once() {
    let throttler = Throttler::new(3, Duration::ZERO);
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));

    let tasks = (0..10).map(|i| {
        let in_flight = Arc::clone(&in_flight);
        let max_in_flight = Arc::clone(&max_in_flight);
        throttler.submit(async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now, Ordering::SeqCst);
            sleep(Duration::from_millis(10 + i)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            i
        })
    });

    let results: Vec<u64> = join_all(tasks)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(results, (0..10).collect::<Vec<_>>());
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 3);
    assert_eq!(throttler.pending().await, 0);
}

#[tokio::test(start_paused = true)]
async fn keeps_minimum_delay_between_dispatches() {
    let delay = Duration::from_millis(25);
    let throttler = Throttler::new(3, delay);
    let started = Arc::new(Mutex::new(Vec::new()));

    let tasks = (0..7).map(|_| {
        let started = Arc::clone(&started);
        throttler.submit(async move {
            started.lock().unwrap().push(Instant::now());
        })
    });
    join_all(tasks).await;

    let mut started = started.lock().unwrap().clone();
    started.sort();
    assert_eq!(started.len(), 7);
    for pair in started.windows(2) {
        assert!(
            pair[1] - pair[0] >= delay,
            "dispatches only {:?} apart",
            pair[1] - pair[0]
        );
    }
}

#[tokio::test]
async fn width_one_runs_tasks_in_submission_order() {
    let throttler = Throttler::new(1, Duration::ZERO);
    let order = Arc::new(Mutex::new(Vec::new()));

    let tasks = (0..5).map(|i| {
        let order = Arc::clone(&order);
        throttler.submit(async move {
            order.lock().unwrap().push(i);
        })
    });
    join_all(tasks).await;

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn failing_task_only_fails_its_caller() {
    let throttler = Throttler::new(2, Duration::ZERO);

    let ok_before = throttler.submit(async { Ok::<_, String>(1) });
    let failing = throttler.submit(async { Err::<u32, _>("boom".to_string()) });
    let panicking = throttler.submit(async {
        if blow_up() {
            panic!("task blew up");
        }
        Ok::<u32, String>(0)
    });
    let ok_after = throttler.submit(async { Ok::<_, String>(4) });

    let (ok_before, failing, panicking, ok_after) =
        tokio::join!(ok_before, failing, panicking, ok_after);

    assert_eq!(ok_before, Ok(Ok(1)));
    assert_eq!(failing, Ok(Err("boom".to_string())));
    assert_eq!(panicking, Err(TaskDropped));
    assert_eq!(ok_after, Ok(Ok(4)));

    // the throttler keeps working after a task panicked
    assert_eq!(throttler.submit(async { 5 }).await, Ok(5));
}

#[tokio::test]
async fn zero_width_is_treated_as_one() {
    let throttler = Throttler::new(0, Duration::ZERO);
    assert_eq!(throttler.width(), 1);
    assert_eq!(throttler.submit(async { "done" }).await, Ok("done"));
}

fn blow_up() -> bool {
    true
}
