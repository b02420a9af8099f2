//! Order Book Service
//!
//! Maintains a live, grouped, depth-bounded two-sided book from a stream of
//! snapshot and delta frames:
//! - Feed classification of raw frames into session events
//! - Session state machine (disconnected, loading, idle, error)
//! - Snapshot hydration and per-side delta merging
//! - Price grouping into coarser buckets
//! - Depth bounding to a retained buffer above the display depth
//! - Single-writer actor publishing immutable snapshots
//!
//! # Architecture
//!
//! ```text
//!   Transport frames
//!        │
//!    ┌───▼───┐
//!    │ Feed  │  ← Classifies snapshot / delta / control
//!    └───┬───┘
//!        │ SessionEvent
//!    ┌───▼────┐
//!    │ Actor  │  ← Serial, arrival-ordered
//!    └───┬────┘
//!        │
//!   ┌────▼─────┐
//!   │ Machine  │──► Hydrate ──┐
//!   └────┬─────┘              │
//!        └─────► Merge ───────┤  (grouping + depth bound)
//!                             │
//!                   ┌─────────▼─────────┐
//!                   │  BookSnapshot     │──► DepthView
//!                   └───────────────────┘
//! ```

pub mod actor;
pub mod config;
pub mod depth;
pub mod events;
pub mod feed;
pub mod grouping;
pub mod hydrate;
pub mod level;
pub mod machine;
pub mod merge;
pub mod snapshot;
pub mod view;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
