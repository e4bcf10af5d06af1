mod common;

use common::{PagedListing, event_url, listing_page};
use ffa_scraper::{config::SiteConfig, scrape::EventEnumerator};
use std::collections::HashSet;
use std::time::Duration;

fn site() -> SiteConfig {
    SiteConfig {
        base_url: common::BASE.to_string(),
        ..SiteConfig::default()
    }
}

fn skip(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_repeated_event_stops_after_empty_page() {
    let source = PagedListing::new(vec![
        listing_page(&[("E1", 1)]),
        listing_page(&[("E1", 1), ("E2", 2)]),
        listing_page(&[]),
    ]);
    let site = site();
    let enumerator = EventEnumerator::new(&source, &site, Duration::ZERO);

    let events = enumerator.enumerate(2021, &HashSet::new()).await.unwrap();

    let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["E1", "E2"]);
    assert_eq!(events[1].url, event_url(2));
    assert_eq!(source.requested(), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_terminates_with_exactly_k_distinct_urls() {
    let source = PagedListing::new(vec![
        listing_page(&[("A", 1), ("B", 2), ("B", 2)]),
        listing_page(&[("C", 3), ("A", 1)]),
        listing_page(&[("D", 4), ("E", 5), ("C", 3)]),
        listing_page(&[("E", 5), ("A", 1)]),
        listing_page(&[("F", 6)]),
    ]);
    let site = site();
    let enumerator = EventEnumerator::new(&source, &site, Duration::ZERO);

    let events = enumerator.enumerate(2021, &HashSet::new()).await.unwrap();

    assert_eq!(events.len(), 5);
    let urls: HashSet<_> = events.iter().map(|e| e.url.clone()).collect();
    assert_eq!(urls.len(), 5);
    assert_eq!(source.requested(), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_skip_filter_does_not_change_termination() {
    let pages = || {
        vec![
            listing_page(&[("A", 1), ("B", 2)]),
            listing_page(&[("C", 3)]),
            listing_page(&[("A", 1)]),
        ]
    };

    let site = site();
    let unfiltered = PagedListing::new(pages());
    let all = EventEnumerator::new(&unfiltered, &site, Duration::ZERO)
        .enumerate(2021, &HashSet::new())
        .await
        .unwrap();

    let filtered = PagedListing::new(pages());
    let kept = EventEnumerator::new(&filtered, &site, Duration::ZERO)
        .enumerate(2021, &skip(&["A", "C"]))
        .await
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(kept.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["B"]);
    assert_eq!(unfiltered.requested(), filtered.requested());
}

#[tokio::test]
async fn test_page_of_only_skipped_events_still_advances() {
    let source = PagedListing::new(vec![
        listing_page(&[("A", 1), ("B", 2)]),
        listing_page(&[("A2", 10)]),
        listing_page(&[("Z", 26)]),
    ]);
    let site = site();
    let enumerator = EventEnumerator::new(&source, &site, Duration::ZERO);

    let events = enumerator
        .enumerate(2021, &skip(&["A", "A2"]))
        .await
        .unwrap();

    let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["B", "Z"]);
    assert_eq!(source.requested(), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_listing_fields_and_competition_id() {
    let source = PagedListing::new(vec![listing_page(&[("Semi de Paris", 271345)])]);
    let site = site();
    let events = EventEnumerator::new(&source, &site, Duration::ZERO)
        .enumerate(2023, &HashSet::new())
        .await
        .unwrap();

    let event = &events[0];
    assert_eq!(event.date, "14/03/21");
    assert_eq!(event.event_type, "Route");
    assert_eq!(event.location, "PARIS");
    assert_eq!(event.competition_id.as_deref(), Some("271345"));
}
