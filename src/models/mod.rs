//! Domain models for the checklist tracker.
//!
//! # Shape
//!
//! - [`TrackerState`]: member name -> month -> [`MonthRecord`]. Built once by
//!   [`init_state`] and replaced as a whole on every mutation.
//! - [`MonthRecord`]: one member's checklist for one month, split into
//!   [`Planning`], one [`SprintRecord`] per sprint window and one
//!   [`ReportingRecord`] per reporting period.
//!
//! The sprint and reporting key sets of every record are dictated by the
//! month's [`MonthConfig`](crate::calendar::MonthConfig) and never change
//! through mutation.

mod month_record;
mod state;

pub use month_record::*;
pub use state::*;
