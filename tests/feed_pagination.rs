//! End-to-end pagination over the public feed API: raw response bodies go
//! through `parse_page` and are merged by `FeedCache` the way the app does
//! it, including kind switches with late responses.
//!
//! Run with: cargo test --test feed_pagination

use feedchat_frontend::feed::cache::{FeedCache, HasMore, MergeOutcome};
use feedchat_frontend::feed::normalize::parse_page;
use feedchat_frontend::models::FeedKind;

fn products_body(skip: u32, limit: u32, total: u32) -> String {
    let items: Vec<String> = (skip..(skip + limit).min(total))
        .map(|i| {
            format!(
                r#"{{"id": {id}, "title": "Product {id}", "description": "d", "price": 1.5, "brand": "B"}}"#,
                id = i + 1
            )
        })
        .collect();
    format!(
        r#"{{"products": [{}], "total": {}, "skip": {}, "limit": {}}}"#,
        items.join(","),
        total,
        skip,
        limit
    )
}

fn users_body(skip: u32, limit: u32, total: u32) -> String {
    let items: Vec<String> = (skip..(skip + limit).min(total))
        .map(|i| {
            format!(
                r#"{{"id": {id}, "firstName": "F{id}", "lastName": "L{id}", "username": "u{id}"}}"#,
                id = i + 1
            )
        })
        .collect();
    format!(
        r#"{{"users": [{}], "total": {}, "skip": {}, "limit": {}}}"#,
        items.join(","),
        total,
        skip,
        limit
    )
}

#[test]
fn scrolling_to_the_end_collects_every_item_once() {
    let mut cache = FeedCache::new(FeedKind::Products, 10);

    let mut requests = 0;
    while let Some(tag) = cache.load_more() {
        requests += 1;
        let body = products_body(tag.request.offset, tag.request.limit, 25);
        let page = parse_page(FeedKind::Products, &body).expect("valid page");
        let outcome = cache.complete(tag, page);
        assert_ne!(outcome, MergeOutcome::Stale);
        assert!(requests <= 3, "pagination did not stop");
    }

    assert_eq!(requests, 3);
    assert_eq!(cache.has_more(FeedKind::Products), HasMore::No);

    let ids: Vec<&str> = cache.visible_items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), 25);
    assert_eq!(ids.first(), Some(&"1"));
    assert_eq!(ids.last(), Some(&"25"));
}

#[test]
fn late_page_from_previous_kind_is_discarded() {
    let mut cache = FeedCache::new(FeedKind::Products, 10);

    let first = cache.load_more().expect("first page");
    cache.complete(
        first,
        parse_page(FeedKind::Products, &products_body(0, 10, 30)).expect("valid page"),
    );

    let second = cache.load_more().expect("second products page");
    let users = cache.switch_kind(FeedKind::Users).expect("users first page");
    assert!(cache.visible_items().is_empty());

    let late = parse_page(FeedKind::Products, &products_body(10, 10, 30)).expect("valid page");
    assert_eq!(cache.complete(second, late), MergeOutcome::Stale);
    assert!(cache.visible_items().is_empty());

    let page = parse_page(FeedKind::Users, &users_body(0, 10, 12)).expect("valid page");
    assert_eq!(cache.complete(users, page), MergeOutcome::Replaced);
    assert_eq!(cache.visible_items().len(), 10);
    assert!(cache.visible_items().iter().all(|i| i.id.starts_with("user-")));
    assert_eq!(cache.has_more(FeedKind::Users), HasMore::Yes);
}

#[test]
fn failed_page_can_be_retried_without_losing_items() {
    let mut cache = FeedCache::new(FeedKind::Products, 10);

    let first = cache.load_more().expect("first page");
    cache.complete(
        first,
        parse_page(FeedKind::Products, &products_body(0, 10, 30)).expect("valid page"),
    );

    let second = cache.load_more().expect("second page");
    assert!(cache.fail(second, "Request failed with status 500".into()));
    assert_eq!(cache.visible_items().len(), 10);
    assert!(cache.error().is_some());

    let retry = cache.retry().expect("retry issues a request");
    assert_eq!(retry.request.offset, 10);
    assert!(cache.error().is_none());

    cache.complete(
        retry,
        parse_page(FeedKind::Products, &products_body(10, 10, 30)).expect("valid page"),
    );
    assert_eq!(cache.visible_items().len(), 20);
}

#[test]
fn malformed_bodies_are_rejected_before_merging() {
    assert!(parse_page(FeedKind::Products, "not json").is_err());
    assert!(parse_page(FeedKind::Products, r#"{"products": []}"#).is_err());
    assert!(parse_page(FeedKind::Users, r#"{"total": -1, "skip": 0, "limit": 10, "users": []}"#).is_err());
}
