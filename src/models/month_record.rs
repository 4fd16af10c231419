use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::MonthConfig;

/// Free-text narrative for the month plus its completion flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeArc {
    pub done: bool,
    pub notes: String,
}

/// Emotional codes chosen for the month's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalCodes {
    pub done: bool,
    pub selected: TagSet,
}

/// Ordered set of tag strings. Insertion order is kept and duplicates are
/// dropped, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Append `tag` if absent, remove it if present. Returns whether the tag
    /// is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|t| t == tag) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(tag.to_string());
            true
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        let mut set = Vec::with_capacity(tags.len());
        for tag in tags {
            if !set.contains(&tag) {
                set.push(tag);
            }
        }
        Self(set)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.0
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}

/// Monthly planning checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planning {
    pub narrative_arc: NarrativeArc,
    pub emotional_codes: EmotionalCodes,
    pub capacity_confirmed: bool,
    pub calendar_sent: bool,
    pub customer_signoff: bool,
}

impl Planning {
    /// The five checkable planning items. Object-shaped items contribute
    /// their `done` flag.
    pub fn checks(&self) -> [bool; 5] {
        [
            self.narrative_arc.done,
            self.emotional_codes.done,
            self.capacity_confirmed,
            self.calendar_sent,
            self.customer_signoff,
        ]
    }
}

/// Checklist for one sprint window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintRecord {
    pub scope_notes: String,
    pub scope_locked: bool,
    pub all_scheduled: bool,
    pub qa_complete: bool,
    pub zero_typos: bool,
    pub clean_runway: bool,
}

impl SprintRecord {
    /// Scope notes are never counted.
    pub fn checks(&self) -> [bool; 5] {
        [
            self.scope_locked,
            self.all_scheduled,
            self.qa_complete,
            self.zero_typos,
            self.clean_runway,
        ]
    }
}

/// Checklist for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingRecord {
    pub performance_signals: bool,
    pub qualitative_wins: bool,
    pub next_steps: bool,
    pub notes: String,
}

impl ReportingRecord {
    pub fn checks(&self) -> [bool; 3] {
        [self.performance_signals, self.qualitative_wins, self.next_steps]
    }
}

/// The complete checklist state for one member in one month.
///
/// `sprints` is keyed by sprint label and `reporting` by reporting-period
/// label. Both key sets always equal the labels of the month's
/// [`MonthConfig`]; mutations only ever change leaf values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub planning: Planning,
    pub sprints: BTreeMap<String, SprintRecord>,
    pub reporting: BTreeMap<String, ReportingRecord>,
}

/// Keys added to and dropped from a record while reshaping it to a config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeDiff {
    pub added: Vec<String>,
    pub dropped: Vec<String>,
}

impl MonthRecord {
    /// A record at its defaults with one entry per configured sprint window
    /// and reporting period.
    pub fn from_config(config: &MonthConfig) -> Self {
        Self {
            planning: Planning::default(),
            sprints: config
                .sprint_labels()
                .map(|label| (label.to_string(), SprintRecord::default()))
                .collect(),
            reporting: config
                .reporting_periods
                .iter()
                .map(|period| (period.to_string(), ReportingRecord::default()))
                .collect(),
        }
    }

    /// Whether the sprint and reporting key sets match `config` exactly.
    pub fn conforms_to(&self, config: &MonthConfig) -> bool {
        self.sprints.len() == config.sprint_windows.len()
            && config.sprint_labels().all(|l| self.sprints.contains_key(l))
            && self.reporting.len() == config.reporting_periods.len()
            && config
                .reporting_periods
                .iter()
                .all(|p| self.reporting.contains_key(*p))
    }

    /// Copy of this record with its keys brought in line with `config`.
    ///
    /// Entries whose key is still configured are kept as they are, missing
    /// entries are added at their defaults and unconfigured ones are dropped.
    pub fn reshaped(&self, config: &MonthConfig) -> (Self, ShapeDiff) {
        let mut diff = ShapeDiff::default();

        let sprints = config
            .sprint_labels()
            .map(|label| {
                let record = self.sprints.get(label).cloned().unwrap_or_else(|| {
                    diff.added.push(format!("sprints.{label}"));
                    SprintRecord::default()
                });
                (label.to_string(), record)
            })
            .collect::<BTreeMap<_, _>>();
        diff.dropped.extend(
            self.sprints
                .keys()
                .filter(|k| !sprints.contains_key(*k))
                .map(|k| format!("sprints.{k}")),
        );

        let reporting = config
            .reporting_periods
            .iter()
            .map(|period| {
                let record = self.reporting.get(*period).cloned().unwrap_or_else(|| {
                    diff.added.push(format!("reporting.{period}"));
                    ReportingRecord::default()
                });
                (period.to_string(), record)
            })
            .collect::<BTreeMap<_, _>>();
        diff.dropped.extend(
            self.reporting
                .keys()
                .filter(|k| !reporting.contains_key(*k))
                .map(|k| format!("reporting.{k}")),
        );

        let record = Self {
            planning: self.planning.clone(),
            sprints,
            reporting,
        };
        (record, diff)
    }
}
