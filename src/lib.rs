//! Checklist tracking engine for a quarterly operating cadence.
//!
//! The crate models one [`TrackerState`](models::TrackerState) holding a
//! [`MonthRecord`](models::MonthRecord) for every team member and tracked
//! month, and derives everything else from it: progress counts, team
//! overviews and date-driven alerts. Mutations go through typed
//! [`FieldPath`](path::FieldPath)s and always produce a new snapshot.
//!
//! Hosts normally use the [`Tracker`](tracker::Tracker) facade, which owns the
//! current snapshot and persists it through a [`BlobStore`](store::BlobStore).

pub mod alerts;
pub mod calendar;
pub mod error;
pub mod models;
pub mod path;
pub mod progress;
pub mod render;
pub mod store;
pub mod tracker;

pub use error::{Result, TrackerError};
