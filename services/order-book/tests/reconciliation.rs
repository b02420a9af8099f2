//! End-to-end reconciliation scenarios
//!
//! Drives sessions through the public event interface and checks the
//! published book against hand-computed expectations.

use order_book::config::BookConfig;
use order_book::events::SessionEvent;
use order_book::level::PriceLevel;
use order_book::machine::{BookState, Outcome, Session};
use order_book::merge::merge_side;
use order_book::snapshot::BookSnapshot;
use order_book::view::DepthView;
use rust_decimal::Decimal;
use types::numeric::{Grouping, Price};
use types::product::ProductId;
use types::side::Side;

fn lvl(price: u64, size: u64) -> PriceLevel {
    PriceLevel::from_u64(price, size)
}

fn grouping(s: &str) -> Grouping {
    s.parse().unwrap()
}

fn update(asks: Vec<PriceLevel>, bids: Vec<PriceLevel>) -> SessionEvent {
    SessionEvent::UpdateOrders { asks, bids }
}

/// A session on grouping 1 that has been hydrated with the given asks/bids.
fn hydrated(asks: Vec<PriceLevel>, bids: Vec<PriceLevel>) -> (Session, BookConfig) {
    let config = BookConfig::default();
    let mut session = Session::with_grouping(ProductId::XbtUsd, grouping("1"));
    session.apply(&SessionEvent::OpenConnection, &config);
    session.apply(&SessionEvent::Hydrate { asks, bids }, &config);
    assert_eq!(session.state(), BookState::Idle);
    (session, config)
}

#[test]
fn test_zero_removes() {
    let merged = merge_side(&[lvl(100, 5)], &[lvl(100, 0)], grouping("1"), Side::Ask, &BookConfig::default());
    assert!(merged.is_empty());
}

#[test]
fn test_new_insert() {
    let merged = merge_side(&[], &[lvl(100, 5)], grouping("1"), Side::Bid, &BookConfig::default());
    assert_eq!(merged, vec![lvl(100, 5)]);
}

#[test]
fn test_grouping_change_clears_both_sides() {
    let (mut session, config) = hydrated(vec![lvl(101, 1), lvl(102, 2)], vec![lvl(99, 3)]);
    session.apply(
        &SessionEvent::ChangeGrouping {
            grouping: grouping("2.5"),
        },
        &config,
    );
    assert!(session.asks().is_empty());
    assert!(session.bids().is_empty());

    // The next update rebuilds at the new width.
    session.apply(&update(vec![lvl(101, 1), lvl(102, 2)], vec![]), &config);
    assert_eq!(
        session.asks(),
        &[PriceLevel::new("100".parse().unwrap(), "3".parse().unwrap())]
    );
}

#[test]
fn test_hydration_replaces_stale_book() {
    let config = BookConfig::default();
    let (mut session, _) = hydrated(vec![lvl(100, 5)], vec![]);

    // Reload: the stale ask must not survive the next snapshot.
    session.apply(&SessionEvent::Retry, &config);
    assert_eq!(session.state(), BookState::Loading);
    session.apply(
        &SessionEvent::Hydrate {
            asks: vec![lvl(200, 3)],
            bids: vec![],
        },
        &config,
    );
    assert_eq!(session.asks(), &[lvl(200, 3)]);
}

#[test]
fn test_batches_are_order_sensitive() {
    let (mut forward, config) = hydrated(vec![lvl(100, 5)], vec![]);
    forward.apply(&update(vec![lvl(100, 0)], vec![]), &config);
    forward.apply(&update(vec![lvl(100, 7)], vec![]), &config);
    assert_eq!(forward.asks(), &[lvl(100, 7)]);

    let (mut reverse, config) = hydrated(vec![lvl(100, 5)], vec![]);
    reverse.apply(&update(vec![lvl(100, 7)], vec![]), &config);
    reverse.apply(&update(vec![lvl(100, 0)], vec![]), &config);
    assert!(reverse.asks().is_empty());
}

#[test]
fn test_depth_truncation_keeps_lowest_asks() {
    let (mut session, config) = hydrated(vec![], vec![]);
    let deltas: Vec<PriceLevel> = (1..=35).map(|i| lvl(1000 + i * 10, 1)).collect();
    session.apply(&update(deltas, vec![]), &config);

    let asks = session.asks();
    assert_eq!(asks.len(), 30);
    let mut expected: Vec<Price> = (1..=30).map(|i| Price::from_u64(1000 + i * 10)).collect();
    expected.reverse();
    let retained: Vec<Price> = asks.iter().map(|l| l.price).collect();
    assert_eq!(retained, expected);
}

#[test]
fn test_depth_truncation_keeps_highest_bids() {
    let (mut session, config) = hydrated(vec![], vec![]);
    let deltas: Vec<PriceLevel> = (1..=35).map(|i| lvl(1000 + i * 10, 1)).collect();
    session.apply(&update(vec![], deltas), &config);

    let bids = session.bids();
    assert_eq!(bids.len(), 30);
    assert_eq!(bids[0].price, Price::from_u64(1350));
    assert_eq!(bids[29].price, Price::from_u64(1060));
}

#[test]
fn test_update_before_hydration_is_ignored() {
    let config = BookConfig::default();
    let mut session = Session::new(ProductId::XbtUsd);
    session.apply(&SessionEvent::OpenConnection, &config);
    let outcome = session.apply(&update(vec![lvl(100, 5)], vec![lvl(99, 5)]), &config);
    assert_eq!(outcome, Outcome::Ignored);
    assert!(session.asks().is_empty());
    assert!(session.bids().is_empty());
}

#[test]
fn test_error_preserves_books_until_reset() {
    let (mut session, config) = hydrated(vec![lvl(101, 1)], vec![lvl(99, 1)]);
    session.apply(&SessionEvent::Kill, &config);
    assert_eq!(session.state(), BookState::Error);
    assert_eq!(session.asks(), &[lvl(101, 1)]);

    session.apply(&SessionEvent::Reset, &config);
    assert_eq!(session.state(), BookState::Disconnected);
    assert!(session.asks().is_empty());
    assert!(!session.has_error());
}

#[test]
fn test_disconnect_then_reconnect_starts_clean() {
    let (mut session, config) = hydrated(vec![lvl(101, 1)], vec![lvl(99, 1)]);
    session.apply(&SessionEvent::Disconnect, &config);
    session.apply(&SessionEvent::OpenConnection, &config);
    assert_eq!(session.state(), BookState::Loading);
    assert!(session.asks().is_empty());
    assert!(session.bids().is_empty());
}

#[test]
fn test_toggle_product_then_hydrate_uses_new_grouping() {
    let (mut session, config) = hydrated(vec![lvl(101, 1)], vec![]);
    session.apply(&SessionEvent::ToggleProduct, &config);
    assert_eq!(session.product(), ProductId::EthUsd);
    session.apply(
        &SessionEvent::Hydrate {
            asks: vec![
                PriceLevel::new("2000.07".parse().unwrap(), "1".parse().unwrap()),
                PriceLevel::new("2000.09".parse().unwrap(), "2".parse().unwrap()),
            ],
            bids: vec![],
        },
        &config,
    );
    // ETHUSD default grouping is 0.05.
    assert_eq!(
        session.asks(),
        &[PriceLevel::new("2000.05".parse().unwrap(), "3".parse().unwrap())]
    );
}

#[test]
fn test_multiple_sessions_are_independent() {
    let config = BookConfig::default();
    let mut xbt = Session::new(ProductId::XbtUsd);
    let mut eth = Session::new(ProductId::EthUsd);
    assert_ne!(xbt.id(), eth.id());

    xbt.apply(&SessionEvent::OpenConnection, &config);
    assert_eq!(xbt.state(), BookState::Loading);
    assert_eq!(eth.state(), BookState::Disconnected);

    eth.apply(&SessionEvent::OpenConnection, &config);
    eth.apply(&SessionEvent::Resolve, &config);
    assert_eq!(eth.state(), BookState::Idle);
    assert_eq!(xbt.state(), BookState::Loading);
}

#[test]
fn test_depth_view_from_live_session() {
    let (mut session, config) = hydrated(
        vec![lvl(103, 1), lvl(102, 1), lvl(101, 2)],
        vec![lvl(99, 4), lvl(98, 4)],
    );
    session.apply(&update(vec![lvl(101, 0)], vec![lvl(100, 2)]), &config);

    let view = DepthView::from_snapshot(&BookSnapshot::from_session(&session), config.display_depth);
    assert_eq!(view.asks[0].price, Price::from_u64(102));
    assert_eq!(view.bids[0].price, Price::from_u64(100));
    assert_eq!(view.spread, Some(Decimal::from(2)));
    assert_eq!(view.bids.last().unwrap().total, "10".parse().unwrap());
}
