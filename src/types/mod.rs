//! Types shared across endpoints.

pub mod common;
pub mod paginated;
pub mod serde_helpers;

pub use common::*;
pub use paginated::PairSeries;
