//! Session state machine
//!
//! A session moves through `Disconnected → Loading → Idle`, with `Error`
//! reachable from `Loading` and `Idle` and left again via `Retry`. There is no
//! terminal state.
//!
//! `transition` is a pure function from `(session, event)` to the next
//! session. It builds new side books instead of editing the old ones, so a
//! snapshot handed out before a transition is never affected by it. Events a
//! state has no rule for are ignored, leaving the session untouched.
//!
//! | State        | Event           | Action                             | Next         |
//! |--------------|-----------------|------------------------------------|--------------|
//! | Disconnected | OpenConnection  |                                    | Loading      |
//! | Loading      | Disconnect      | clear books                        | Disconnected |
//! | Loading      | Hydrate         | replace books from snapshot        | Idle         |
//! | Loading      | Error           | set error flag                     | Error        |
//! | Loading      | Resolve         |                                    | Idle         |
//! | Idle         | Disconnect      | clear books                        | Disconnected |
//! | Idle         | Retry           |                                    | Loading      |
//! | Idle         | Kill            | set error flag                     | Error        |
//! | Idle         | UpdateOrders    | merge each side                    | Idle         |
//! | Idle         | ChangeGrouping  | set grouping, clear books          | Idle         |
//! | Idle         | ToggleProduct   | switch product, clear books        | Loading      |
//! | Error        | Retry           | clear error flag                   | Loading      |
//! | any          | Reset           | clear books and error flag         | Disconnected |

use serde::{Deserialize, Serialize};
use types::ids::SessionId;
use types::numeric::Grouping;
use types::product::ProductId;
use types::side::Side;

use crate::config::BookConfig;
use crate::events::SessionEvent;
use crate::hydrate::hydrate;
use crate::level::PriceLevel;
use crate::merge::merge_side;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookState {
    Disconnected,
    Loading,
    Idle,
    Error,
}

impl BookState {
    pub fn label(&self) -> &'static str {
        match self {
            BookState::Disconnected => "DISCONNECTED",
            BookState::Loading => "LOADING",
            BookState::Idle => "IDLE",
            BookState::Error => "ERROR",
        }
    }
}

/// Whether an event changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

/// The result of feeding one event to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: Session,
    pub outcome: Outcome,
}

/// Lifecycle wrapper around both side books.
///
/// Mutated only through [`transition`] / [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    state: BookState,
    asks: Vec<PriceLevel>,
    bids: Vec<PriceLevel>,
    grouping: Grouping,
    product: ProductId,
    has_error: bool,
    /// Number of applied transitions since creation.
    revision: u64,
}

impl Session {
    /// Create a disconnected session with empty books on `product`'s default
    /// grouping.
    pub fn new(product: ProductId) -> Self {
        Self::with_grouping(product, product.default_grouping())
    }

    pub fn with_grouping(product: ProductId, grouping: Grouping) -> Self {
        Self {
            id: SessionId::new(),
            state: BookState::Disconnected,
            asks: Vec::new(),
            bids: Vec::new(),
            grouping,
            product,
            has_error: false,
            revision: 0,
        }
    }

    /// Create a session on the configured default product.
    pub fn from_config(config: &BookConfig) -> Self {
        Self::new(config.default_product)
    }

    /// Apply one event in place, returning whether it was acted upon.
    pub fn apply(&mut self, event: &SessionEvent, config: &BookConfig) -> Outcome {
        let Transition { session, outcome } = transition(self, event, config);
        if outcome == Outcome::Applied {
            *self = session;
        }
        outcome
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> BookState {
        self.state
    }

    /// Ask levels, descending by price.
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Bid levels, descending by price.
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn product(&self) -> ProductId {
        self.product
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn moved_to(&self, state: BookState) -> Self {
        Self {
            state,
            revision: self.revision + 1,
            ..self.clone()
        }
    }

    fn cleared(&self, state: BookState) -> Self {
        Self {
            asks: Vec::new(),
            bids: Vec::new(),
            has_error: false,
            ..self.moved_to(state)
        }
    }
}

/// Compute the session that results from applying `event` to `session`.
///
/// Never fails: events that are not valid in the current state come back as
/// [`Outcome::Ignored`] with an unchanged copy of the session.
pub fn transition(session: &Session, event: &SessionEvent, config: &BookConfig) -> Transition {
    use BookState::*;

    let next = match (session.state, event) {
        (_, SessionEvent::Reset) => Some(session.cleared(Disconnected)),

        (Disconnected, SessionEvent::OpenConnection) => Some(session.moved_to(Loading)),

        (Loading, SessionEvent::Disconnect) | (Idle, SessionEvent::Disconnect) => {
            Some(session.cleared(Disconnected))
        }
        (Loading, SessionEvent::Hydrate { asks, bids }) => {
            let (asks, bids) = hydrate(asks, bids, session.grouping, config);
            Some(Session {
                asks,
                bids,
                ..session.moved_to(Idle)
            })
        }
        (Loading, SessionEvent::Error) | (Idle, SessionEvent::Kill) => Some(Session {
            has_error: true,
            ..session.moved_to(Error)
        }),
        (Loading, SessionEvent::Resolve) => Some(session.moved_to(Idle)),

        (Idle, SessionEvent::Retry) => Some(session.moved_to(Loading)),
        (Idle, SessionEvent::UpdateOrders { asks, bids }) => {
            let grouping = session.grouping;
            Some(Session {
                asks: merge_side(&session.asks, asks, grouping, Side::Ask, config),
                bids: merge_side(&session.bids, bids, grouping, Side::Bid, config),
                ..session.moved_to(Idle)
            })
        }
        (Idle, SessionEvent::ChangeGrouping { grouping }) => Some(Session {
            grouping: *grouping,
            ..session.cleared(Idle)
        }),
        (Idle, SessionEvent::ToggleProduct) => {
            let product = session.product.toggled();
            Some(Session {
                product,
                grouping: product.default_grouping(),
                ..session.cleared(Loading)
            })
        }

        (Error, SessionEvent::Retry) => Some(Session {
            has_error: false,
            ..session.moved_to(Loading)
        }),

        _ => None,
    };

    match next {
        Some(session) => Transition {
            session,
            outcome: Outcome::Applied,
        },
        None => Transition {
            session: session.clone(),
            outcome: Outcome::Ignored,
        },
    }
}
