//! The caller-facing query and command surface.
//!
//! A [`Tracker`] owns the current snapshot and the store it is mirrored to.
//! It is created once per process with [`Tracker::open`] (load or initialize)
//! and lives until the host drops it. Commands take `&mut self`, so there is
//! one writer at a time; each command builds the next snapshot from the latest
//! committed one, commits it, then persists it. A failed save is logged and
//! ignored: memory stays authoritative.

use chrono::{Datelike, Local};

use crate::alerts::{self, Alert};
use crate::calendar::{self, Month, MonthConfig, Roster};
use crate::error::Result;
use crate::models::{MonthRecord, TrackerState};
use crate::path::{self, FieldPath, FieldValue};
use crate::progress::{self, MemberOverview, Progress};
use crate::store::{self, BlobStore, STORAGE_KEY};

pub struct Tracker<S: BlobStore> {
    store: S,
    key: String,
    roster: Roster,
    months: Vec<Month>,
    state: TrackerState,
}

impl<S: BlobStore> Tracker<S> {
    /// Open a tracker over the default roster and the full quarter, stored
    /// under [`STORAGE_KEY`].
    pub fn open(store: S) -> Self {
        Self::with_calendar(store, STORAGE_KEY, Roster::default(), Month::ALL.to_vec())
    }

    pub fn with_calendar(
        store: S,
        key: impl Into<String>,
        roster: Roster,
        months: Vec<Month>,
    ) -> Self {
        let key = key.into();
        let state = store::load_or_init(&store, &key, &roster, &months);
        tracing::debug!(
            members = roster.members().len(),
            months = months.len(),
            "Tracker opened"
        );
        Self {
            store,
            key,
            roster,
            months,
            state,
        }
    }

    /// The latest committed snapshot.
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn record(&self, member: &str, month: Month) -> Option<&MonthRecord> {
        self.state.record(member, month)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn month_config(&self, month: Month) -> MonthConfig {
        calendar::month_config(month)
    }

    pub fn progress(&self, member: &str, month: Month) -> Progress {
        progress::progress(&self.state, member, month)
    }

    pub fn overview(&self) -> Vec<MemberOverview> {
        progress::team_overview(&self.state, &self.roster, &self.months)
    }

    pub fn due_alerts(&self, now: &impl Datelike) -> Vec<Alert> {
        alerts::due_alerts(now)
    }

    /// Alerts for the local wall-clock date.
    pub fn due_alerts_now(&self) -> Vec<Alert> {
        alerts::due_alerts(&Local::now())
    }

    pub fn field(&self, member: &str, month: Month, path: &FieldPath) -> Result<FieldValue> {
        path::get_at_path(&self.state, member, month, path)
    }

    pub fn set_field(
        &mut self,
        member: &str,
        month: Month,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<()> {
        let next = path::set_at_path(&self.state, member, month, path, value)?;
        self.commit(next, member, month, path);
        Ok(())
    }

    pub fn toggle_field(&mut self, member: &str, month: Month, path: &FieldPath) -> Result<()> {
        let next = path::toggle_at_path(&self.state, member, month, path)?;
        self.commit(next, member, month, path);
        Ok(())
    }

    /// Select or deselect an emotional code for the month.
    pub fn toggle_tag(&mut self, member: &str, month: Month, tag: &str) -> Result<()> {
        let next = path::toggle_tag(&self.state, member, month, tag)?;
        self.commit(next, member, month, "planning.emotionalCodes.selected");
        Ok(())
    }

    fn commit(
        &mut self,
        next: TrackerState,
        member: &str,
        month: Month,
        path: impl std::fmt::Display,
    ) {
        self.state = next;
        tracing::debug!(%member, %month, %path, "Committed tracker mutation");
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = store::save_state(&self.store, &self.key, &self.state) {
            tracing::warn!("Failed to persist tracker state, keeping in-memory copy: {}", e);
        }
    }
}
