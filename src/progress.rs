//! Completion counts for month records and the whole team.

use crate::calendar::{Month, Roster};
use crate::models::{MonthRecord, TrackerState};

/// Checked items out of checkable items for a slice of the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: u32,
    pub total: u32,
    pub percent: u32,
}

impl Progress {
    pub fn new(done: u32, total: u32) -> Self {
        Self {
            done,
            total,
            percent: percent(done, total),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

/// `100 * done / total` rounded half up; 0 when there is nothing to count.
pub fn percent(done: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (done, total) = (u64::from(done), u64::from(total));
    ((200 * done + total) / (2 * total)) as u32
}

/// Count planning, sprint and reporting checks of one record.
///
/// Free-text fields never count.
pub fn record_progress(record: &MonthRecord) -> Progress {
    let checks = record
        .planning
        .checks()
        .into_iter()
        .chain(record.sprints.values().flat_map(|s| s.checks()))
        .chain(record.reporting.values().flat_map(|r| r.checks()));

    let (done, total) = checks.fold((0, 0), |(done, total), checked| {
        (done + u32::from(checked), total + 1)
    });
    Progress::new(done, total)
}

/// Progress of `member` in `month`; all zeros when there is no such record.
pub fn progress(state: &TrackerState, member: &str, month: Month) -> Progress {
    state
        .record(member, month)
        .map(record_progress)
        .unwrap_or_default()
}

/// One roster row of the team overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOverview {
    pub member: String,
    pub customers: Vec<String>,
    pub months: Vec<(Month, Progress)>,
}

impl MemberOverview {
    pub fn month(&self, month: Month) -> Option<Progress> {
        self.months
            .iter()
            .find(|(m, _)| *m == month)
            .map(|(_, p)| *p)
    }
}

/// Progress of every roster member across `months`, in roster order.
pub fn team_overview(
    state: &TrackerState,
    roster: &Roster,
    months: &[Month],
) -> Vec<MemberOverview> {
    roster
        .members()
        .iter()
        .map(|member| MemberOverview {
            member: member.name.clone(),
            customers: member.customers.clone(),
            months: months
                .iter()
                .map(|&month| (month, progress(state, &member.name, month)))
                .collect(),
        })
        .collect()
}
