//! Two-source robust price oracle
//!
//! Combines a keeper-pushed reference feed with a protocol-curated NAV
//! opinion, gated by a sequencer-availability feed. Validation and the
//! robust-price computation live in `price`; account shapes in `state`;
//! instruction processors in `handlers`.

pub mod handlers;
pub mod price;
pub mod state;

pub use price::{compute_robust_price, FeedReading, NavReading, PriceSnapshot, SequencerReading};
pub use state::{ReferenceFeed, RwaOracle, SequencerStatus};
