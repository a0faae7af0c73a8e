//! Core business logic - framework-agnostic order board operations.
//!
//! Pure functions work on snapshots; functions taking a [`crate::store::Store`]
//! write through it and re-publish the affected collection.

/// Published announcement feed and its management
pub mod announcement;
/// Live per-category board recomputed from snapshots
pub mod board;
/// Pending selection assembled before submission
pub mod cart;
/// Requester roster and administrator accounts
pub mod directory;
/// CSV rendering of report tables
pub mod export;
/// Status and payment changes on submitted orders
pub mod lifecycle;
/// Daily menu resolution, cutoff locking and menu management
pub mod menu;
/// Filtering, aggregation and export rows
pub mod report;
/// Administrator session validity
pub mod session;
/// Turning a cart into a persisted order
pub mod submission;
