//! Types library for the grouped order book
//!
//! Core type definitions shared by the order book service and its tools,
//! keeping prices and sizes in exact decimal arithmetic so grouping buckets
//! compare by equality.
//!
//! # Modules
//! - `ids`: Session identifiers
//! - `numeric`: Fixed-point decimal types (Price, Size, Grouping)
//! - `side`: Book side (ask/bid)
//! - `product`: Tradable products and their grouping options
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod side;
pub mod product;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::side::*;
    pub use crate::product::*;
    pub use crate::errors::*;
}
