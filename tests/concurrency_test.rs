//! Concurrent maneuvers on one battlefield

mod common;

use std::thread;

use common::{memory_battlefield, page_registry, sqlite_battlefield};

#[test]
fn concurrent_maneuvers_for_one_player_award_single_medallion_once() {
    let bf = memory_battlefield(page_registry());

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..10 {
                    bf.player("deldy").execute_maneuver("LoadedPage").unwrap();
                }
            });
        }
    });

    let deldy = bf.player("deldy");
    let overview = deldy.medallion_overview().unwrap();
    assert_eq!(deldy.points().unwrap(), 80_000);
    assert_eq!(overview["PageLoader"], 1);
    assert_eq!(overview["SiteLoader"], 16);
}

#[test]
fn news_is_delivered_once_across_threads() {
    let bf = memory_battlefield(page_registry());
    bf.player("deldy").execute("LoadedPage", 50, None).unwrap();

    let delivered: u32 = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| bf.player("deldy").new_medallions().unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().values().sum::<u32>())
            .sum()
    });

    // 10 SiteLoader + 1 PageLoader, handed out exactly once
    assert_eq!(delivered, 11);
}

#[test]
fn global_recalculation_alongside_maneuvers_on_sqlite() {
    let (_dir, bf) = sqlite_battlefield(page_registry());

    thread::scope(|s| {
        for name in ["a", "b", "c"] {
            let bf = &bf;
            s.spawn(move || {
                for _ in 0..15 {
                    bf.player(name).execute_maneuver("LoadedPage").unwrap();
                }
            });
        }
        s.spawn(|| {
            for _ in 0..3 {
                bf.recalculate(None).unwrap();
            }
        });
    });

    bf.recalculate(None).unwrap();
    for name in ["a", "b", "c"] {
        let overview = bf.player(name).medallion_overview().unwrap();
        assert_eq!(overview["SiteLoader"], 3);
        assert!(!overview.contains_key("PageLoader"));
    }
}
