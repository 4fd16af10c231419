use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use super::month_record::MonthRecord;
use crate::calendar::{month_config, Month, Roster};

/// Month records of a single member, keyed by month.
pub type MemberMonths = BTreeMap<Month, Arc<MonthRecord>>;

/// The whole tracker: member name -> month -> [`MonthRecord`].
///
/// Snapshots are immutable from the outside. Records are held behind `Arc`s
/// so a mutated snapshot shares every untouched member and month with the
/// snapshot it was derived from; see [`crate::path`].
///
/// Decoding skips month keys that are not tracked months and remembers them
/// as `member/month` so [`TrackerState::reconcile`] can report them dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackerState {
    members: BTreeMap<String, Arc<MemberMonths>>,
    #[serde(skip)]
    untracked: Vec<String>,
}

impl<'de> Deserialize<'de> for TrackerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, BTreeMap<String, Arc<MonthRecord>>> =
            BTreeMap::deserialize(deserializer)?;
        let mut members = BTreeMap::new();
        let mut untracked = Vec::new();

        for (name, labelled) in raw {
            let mut months = MemberMonths::new();
            for (label, record) in labelled {
                match Month::from_str(&label) {
                    Some(month) => {
                        months.insert(month, record);
                    }
                    None => untracked.push(format!("{name}/{label}")),
                }
            }
            members.insert(name, Arc::new(months));
        }

        Ok(Self { members, untracked })
    }
}

/// What [`TrackerState::reconcile`] changed, as `member/month[/key]` paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub dropped: Vec<String>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }
}

impl TrackerState {
    /// Build a record at its defaults for every roster member and month.
    pub fn init(roster: &Roster, months: &[Month]) -> Self {
        let members = roster
            .names()
            .map(|name| {
                let months = months
                    .iter()
                    .map(|&month| {
                        let record = MonthRecord::from_config(&month_config(month));
                        (month, Arc::new(record))
                    })
                    .collect::<MemberMonths>();
                (name.to_string(), Arc::new(months))
            })
            .collect();
        Self {
            members,
            untracked: Vec::new(),
        }
    }

    pub fn record(&self, member: &str, month: Month) -> Option<&MonthRecord> {
        self.members
            .get(member)
            .and_then(|months| months.get(&month))
            .map(Arc::as_ref)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn months_of(&self, member: &str) -> Vec<Month> {
        self.members
            .get(member)
            .map(|months| months.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Writable access to one record, copying it (and the member's month map)
    /// first if any other snapshot still refers to them.
    pub(crate) fn record_mut(&mut self, member: &str, month: Month) -> Option<&mut MonthRecord> {
        let months = Arc::make_mut(self.members.get_mut(member)?);
        months.get_mut(&month).map(Arc::make_mut)
    }

    /// Whether both snapshots hold the very same allocation for a record.
    pub fn shares_record(&self, other: &TrackerState, member: &str, month: Month) -> bool {
        let lhs = self.members.get(member).and_then(|m| m.get(&month));
        let rhs = other.members.get(member).and_then(|m| m.get(&month));
        matches!((lhs, rhs), (Some(a), Some(b)) if Arc::ptr_eq(a, b))
    }

    /// Bring a loaded state in line with the current roster and calendar.
    ///
    /// Records still configured are kept verbatim, missing members, months,
    /// sprints and reporting periods are added at their defaults, and anything
    /// no longer configured is dropped, including months skipped on decode.
    pub fn reconcile(&self, roster: &Roster, months: &[Month]) -> (Self, ReconcileReport) {
        let mut report = ReconcileReport::default();
        let mut members = BTreeMap::new();

        for name in roster.names() {
            let existing = self.members.get(name);
            let mut reconciled = MemberMonths::new();

            for &month in months {
                let config = month_config(month);
                let record = match existing.and_then(|m| m.get(&month)) {
                    Some(record) if record.conforms_to(&config) => Arc::clone(record),
                    Some(record) => {
                        let (reshaped, diff) = record.reshaped(&config);
                        let prefix = format!("{name}/{month}");
                        report
                            .added
                            .extend(diff.added.iter().map(|k| format!("{prefix}/{k}")));
                        report
                            .dropped
                            .extend(diff.dropped.iter().map(|k| format!("{prefix}/{k}")));
                        Arc::new(reshaped)
                    }
                    None => {
                        report.added.push(format!("{name}/{month}"));
                        Arc::new(MonthRecord::from_config(&config))
                    }
                };
                reconciled.insert(month, record);
            }

            if let Some(existing) = existing {
                report.dropped.extend(
                    existing
                        .keys()
                        .filter(|m| !months.contains(m))
                        .map(|m| format!("{name}/{m}")),
                );
            }
            members.insert(name.to_string(), Arc::new(reconciled));
        }

        report.dropped.extend(
            self.members
                .keys()
                .filter(|name| !roster.contains(name))
                .cloned(),
        );
        report.dropped.extend(self.untracked.iter().cloned());

        let reconciled = Self {
            members,
            untracked: Vec::new(),
        };
        (reconciled, report)
    }
}

/// Build the initial tracker state for `roster` across `months`.
pub fn init_state(roster: &Roster, months: &[Month]) -> TrackerState {
    TrackerState::init(roster, months)
}
