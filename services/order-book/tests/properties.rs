//! Property tests for the side book invariants
//!
//! Random event sequences are fed to a session and, after every step, each
//! side must hold unique live prices in descending order within the
//! retained depth.

use std::collections::BTreeSet;

use order_book::config::BookConfig;
use order_book::events::SessionEvent;
use order_book::level::PriceLevel;
use order_book::machine::{BookState, Session};
use order_book::merge::merge_side;
use proptest::prelude::*;
use rust_decimal::Decimal;
use types::numeric::{Grouping, Price, Size};
use types::product::ProductId;
use types::side::Side;

fn level_strategy() -> impl Strategy<Value = PriceLevel> {
    // Prices with one decimal place so fractional groupings get exercised.
    (1i64..2_000, 0u64..6).prop_map(|(tenths, size)| {
        let price = Price::try_new(Decimal::new(tenths, 1)).unwrap_or(Price::ZERO);
        PriceLevel::new(price, Size::from_u64(size))
    })
}

fn levels_strategy() -> impl Strategy<Value = Vec<PriceLevel>> {
    prop::collection::vec(level_strategy(), 0..60)
}

fn grouping_strategy() -> impl Strategy<Value = Grouping> {
    prop::sample::select(ProductId::XbtUsd.grouping_options())
}

fn event_strategy() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        4 => (levels_strategy(), levels_strategy())
            .prop_map(|(asks, bids)| SessionEvent::UpdateOrders { asks, bids }),
        2 => (levels_strategy(), levels_strategy())
            .prop_map(|(asks, bids)| SessionEvent::Hydrate { asks, bids }),
        1 => grouping_strategy().prop_map(|grouping| SessionEvent::ChangeGrouping { grouping }),
        1 => Just(SessionEvent::OpenConnection),
        1 => Just(SessionEvent::Disconnect),
        1 => Just(SessionEvent::Retry),
        1 => Just(SessionEvent::Kill),
        1 => Just(SessionEvent::Error),
    ]
}

fn check_side(levels: &[PriceLevel], config: &BookConfig) -> Result<(), TestCaseError> {
    prop_assert!(levels.len() <= config.retained_depth);

    let unique: BTreeSet<Price> = levels.iter().map(|level| level.price).collect();
    prop_assert_eq!(unique.len(), levels.len());

    for level in levels {
        prop_assert!(!level.size.is_zero());
    }
    for pair in levels.windows(2) {
        prop_assert!(pair[0].price > pair[1].price);
    }
    Ok(())
}

fn on_grid(levels: &[PriceLevel], grouping: Grouping) -> bool {
    levels
        .iter()
        .all(|level| (level.price.as_decimal() % grouping.as_decimal()).is_zero())
}

proptest! {
    #[test]
    fn test_side_invariants_hold_after_every_event(
        events in prop::collection::vec(event_strategy(), 1..40),
    ) {
        let config = BookConfig::default();
        let mut session = Session::new(ProductId::XbtUsd);

        for event in &events {
            session.apply(event, &config);
            check_side(session.asks(), &config)?;
            check_side(session.bids(), &config)?;
            prop_assert!(on_grid(session.asks(), session.grouping()));
            prop_assert!(on_grid(session.bids(), session.grouping()));
            if session.state() == BookState::Disconnected {
                prop_assert!(session.asks().is_empty());
                prop_assert!(session.bids().is_empty());
            }
        }
    }

    #[test]
    fn test_merge_is_idempotent(
        existing in levels_strategy(),
        deltas in levels_strategy(),
        grouping in grouping_strategy(),
        is_ask in any::<bool>(),
    ) {
        let config = BookConfig::default();
        let side = if is_ask { Side::Ask } else { Side::Bid };
        let base = merge_side(&[], &existing, grouping, side, &config);

        let once = merge_side(&base, &deltas, grouping, side, &config);
        let twice = merge_side(&once, &deltas, grouping, side, &config);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_zero_delta_always_removes(
        existing in levels_strategy(),
        grouping in grouping_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let config = BookConfig::default();
        let base = merge_side(&[], &existing, grouping, Side::Bid, &config);
        prop_assume!(!base.is_empty());

        let target = base[pick.index(base.len())].price;
        let removal = PriceLevel::new(target, Size::ZERO);
        let merged = merge_side(&base, &[removal], grouping, Side::Bid, &config);
        prop_assert!(merged.iter().all(|level| level.price != target));
    }

    #[test]
    fn test_empty_batch_is_identity(
        existing in levels_strategy(),
        grouping in grouping_strategy(),
    ) {
        let config = BookConfig::default();
        let base = merge_side(&[], &existing, grouping, Side::Ask, &config);
        prop_assert_eq!(merge_side(&base, &[], grouping, Side::Ask, &config), base);
    }
}
