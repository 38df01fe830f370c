//! Core business logic - framework-agnostic benefit tracking.

/// Card and benefit definitions
pub mod catalog;
/// Period keys, labels and cycle boundaries
pub mod period;
/// Text rendering of the views
pub mod report;
/// Owned state container and the backend trait
pub mod store;
/// Owned cards and per-period usage flags
pub mod usage;
/// Wallet and library view models
pub mod wallet;
