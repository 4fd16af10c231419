//! Typed addressing and copy-on-write mutation of month-record leaves.
//!
//! Every leaf of a [`MonthRecord`] is named by a [`FieldPath`]. The dotted
//! textual form used by presentation layers (`planning.narrativeArc.notes`,
//! `sprints.W3-4.qaComplete`, `reporting.Monthly.notes`) parses into the same
//! type, so an unknown segment fails up front instead of writing into a shape
//! that does not exist.
//!
//! Mutations never touch their input: they clone the snapshot (sharing every
//! record behind its `Arc`) and copy only the member map and record on the
//! mutated path.

use std::fmt;

use crate::calendar::Month;
use crate::error::{Result, TrackerError};
use crate::models::{MonthRecord, TagSet, TrackerState};

/// Leaves of the planning section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanningField {
    NarrativeArcDone,
    NarrativeArcNotes,
    EmotionalCodesDone,
    EmotionalCodesSelected,
    CapacityConfirmed,
    CalendarSent,
    CustomerSignoff,
}

impl PlanningField {
    pub const ALL: [PlanningField; 7] = [
        Self::NarrativeArcDone,
        Self::NarrativeArcNotes,
        Self::EmotionalCodesDone,
        Self::EmotionalCodesSelected,
        Self::CapacityConfirmed,
        Self::CalendarSent,
        Self::CustomerSignoff,
    ];

    /// Path segments below `planning`.
    pub fn segments(&self) -> &'static [&'static str] {
        match self {
            Self::NarrativeArcDone => &["narrativeArc", "done"],
            Self::NarrativeArcNotes => &["narrativeArc", "notes"],
            Self::EmotionalCodesDone => &["emotionalCodes", "done"],
            Self::EmotionalCodesSelected => &["emotionalCodes", "selected"],
            Self::CapacityConfirmed => &["capacityConfirmed"],
            Self::CalendarSent => &["calendarSent"],
            Self::CustomerSignoff => &["customerSignoff"],
        }
    }

    pub fn from_segments(segments: &[&str]) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.segments() == segments)
    }

    pub fn kind(&self) -> LeafKind {
        match self {
            Self::NarrativeArcNotes => LeafKind::Text,
            Self::EmotionalCodesSelected => LeafKind::Tags,
            _ => LeafKind::Bool,
        }
    }
}

/// Leaves of a sprint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprintField {
    ScopeNotes,
    ScopeLocked,
    AllScheduled,
    QaComplete,
    ZeroTypos,
    CleanRunway,
}

impl SprintField {
    pub const ALL: [SprintField; 6] = [
        Self::ScopeNotes,
        Self::ScopeLocked,
        Self::AllScheduled,
        Self::QaComplete,
        Self::ZeroTypos,
        Self::CleanRunway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScopeNotes => "scopeNotes",
            Self::ScopeLocked => "scopeLocked",
            Self::AllScheduled => "allScheduled",
            Self::QaComplete => "qaComplete",
            Self::ZeroTypos => "zeroTypos",
            Self::CleanRunway => "cleanRunway",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn kind(&self) -> LeafKind {
        match self {
            Self::ScopeNotes => LeafKind::Text,
            _ => LeafKind::Bool,
        }
    }
}

/// Leaves of a reporting record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportingField {
    PerformanceSignals,
    QualitativeWins,
    NextSteps,
    Notes,
}

impl ReportingField {
    pub const ALL: [ReportingField; 4] = [
        Self::PerformanceSignals,
        Self::QualitativeWins,
        Self::NextSteps,
        Self::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerformanceSignals => "performanceSignals",
            Self::QualitativeWins => "qualitativeWins",
            Self::NextSteps => "nextSteps",
            Self::Notes => "notes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn kind(&self) -> LeafKind {
        match self {
            Self::Notes => LeafKind::Text,
            _ => LeafKind::Bool,
        }
    }
}

/// The kind of value a leaf holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Bool,
    Text,
    Tags,
}

impl LeafKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Text => "text",
            Self::Tags => "tag list",
        }
    }
}

/// Address of one leaf inside a [`MonthRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Planning(PlanningField),
    Sprint { label: String, field: SprintField },
    Reporting { period: String, field: ReportingField },
}

impl FieldPath {
    pub fn sprint(label: impl Into<String>, field: SprintField) -> Self {
        Self::Sprint {
            label: label.into(),
            field,
        }
    }

    pub fn reporting(period: impl Into<String>, field: ReportingField) -> Self {
        Self::Reporting {
            period: period.into(),
            field,
        }
    }

    /// Parse a dotted path such as `sprints.W1-2.scopeLocked`.
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<&str> = path.split('.').collect();
        Self::from_segments(&segments)
    }

    pub fn from_segments(segments: &[&str]) -> Result<Self> {
        let parsed = match segments {
            ["planning", rest @ ..] => PlanningField::from_segments(rest).map(Self::Planning),
            ["sprints", label, field] => {
                SprintField::from_str(field).map(|field| Self::sprint(*label, field))
            }
            ["reporting", period, field] => {
                ReportingField::from_str(field).map(|field| Self::reporting(*period, field))
            }
            _ => None,
        };
        parsed.ok_or_else(|| TrackerError::InvalidPath(segments.join(".")))
    }

    pub fn kind(&self) -> LeafKind {
        match self {
            Self::Planning(field) => field.kind(),
            Self::Sprint { field, .. } => field.kind(),
            Self::Reporting { field, .. } => field.kind(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning(field) => write!(f, "planning.{}", field.segments().join(".")),
            Self::Sprint { label, field } => write!(f, "sprints.{}.{}", label, field.as_str()),
            Self::Reporting { period, field } => {
                write!(f, "reporting.{}.{}", period, field.as_str())
            }
        }
    }
}

/// A leaf value read from or written to a month record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    Tags(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> LeafKind {
        match self {
            Self::Bool(_) => LeafKind::Bool,
            Self::Text(_) => LeafKind::Text,
            Self::Tags(_) => LeafKind::Tags,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

enum Leaf<'a> {
    Bool(&'a mut bool),
    Text(&'a mut String),
    Tags(&'a mut TagSet),
}

fn leaf_mut<'a>(record: &'a mut MonthRecord, path: &FieldPath) -> Result<Leaf<'a>> {
    let leaf = match path {
        FieldPath::Planning(field) => {
            let planning = &mut record.planning;
            match field {
                PlanningField::NarrativeArcDone => Leaf::Bool(&mut planning.narrative_arc.done),
                PlanningField::NarrativeArcNotes => Leaf::Text(&mut planning.narrative_arc.notes),
                PlanningField::EmotionalCodesDone => {
                    Leaf::Bool(&mut planning.emotional_codes.done)
                }
                PlanningField::EmotionalCodesSelected => {
                    Leaf::Tags(&mut planning.emotional_codes.selected)
                }
                PlanningField::CapacityConfirmed => Leaf::Bool(&mut planning.capacity_confirmed),
                PlanningField::CalendarSent => Leaf::Bool(&mut planning.calendar_sent),
                PlanningField::CustomerSignoff => Leaf::Bool(&mut planning.customer_signoff),
            }
        }
        FieldPath::Sprint { label, field } => {
            let sprint = record
                .sprints
                .get_mut(label)
                .ok_or_else(|| TrackerError::InvalidPath(path.to_string()))?;
            match field {
                SprintField::ScopeNotes => Leaf::Text(&mut sprint.scope_notes),
                SprintField::ScopeLocked => Leaf::Bool(&mut sprint.scope_locked),
                SprintField::AllScheduled => Leaf::Bool(&mut sprint.all_scheduled),
                SprintField::QaComplete => Leaf::Bool(&mut sprint.qa_complete),
                SprintField::ZeroTypos => Leaf::Bool(&mut sprint.zero_typos),
                SprintField::CleanRunway => Leaf::Bool(&mut sprint.clean_runway),
            }
        }
        FieldPath::Reporting { period, field } => {
            let report = record
                .reporting
                .get_mut(period)
                .ok_or_else(|| TrackerError::InvalidPath(path.to_string()))?;
            match field {
                ReportingField::PerformanceSignals => Leaf::Bool(&mut report.performance_signals),
                ReportingField::QualitativeWins => Leaf::Bool(&mut report.qualitative_wins),
                ReportingField::NextSteps => Leaf::Bool(&mut report.next_steps),
                ReportingField::Notes => Leaf::Text(&mut report.notes),
            }
        }
    };
    Ok(leaf)
}

/// Read one leaf of a record.
pub fn read_field(record: &MonthRecord, path: &FieldPath) -> Result<FieldValue> {
    let missing = || TrackerError::InvalidPath(path.to_string());
    let value: FieldValue = match path {
        FieldPath::Planning(field) => {
            let planning = &record.planning;
            match field {
                PlanningField::NarrativeArcDone => planning.narrative_arc.done.into(),
                PlanningField::NarrativeArcNotes => planning.narrative_arc.notes.clone().into(),
                PlanningField::EmotionalCodesDone => planning.emotional_codes.done.into(),
                PlanningField::EmotionalCodesSelected => {
                    FieldValue::Tags(planning.emotional_codes.selected.as_slice().to_vec())
                }
                PlanningField::CapacityConfirmed => planning.capacity_confirmed.into(),
                PlanningField::CalendarSent => planning.calendar_sent.into(),
                PlanningField::CustomerSignoff => planning.customer_signoff.into(),
            }
        }
        FieldPath::Sprint { label, field } => {
            let sprint = record.sprints.get(label).ok_or_else(missing)?;
            match field {
                SprintField::ScopeNotes => sprint.scope_notes.clone().into(),
                SprintField::ScopeLocked => sprint.scope_locked.into(),
                SprintField::AllScheduled => sprint.all_scheduled.into(),
                SprintField::QaComplete => sprint.qa_complete.into(),
                SprintField::ZeroTypos => sprint.zero_typos.into(),
                SprintField::CleanRunway => sprint.clean_runway.into(),
            }
        }
        FieldPath::Reporting { period, field } => {
            let report = record.reporting.get(period).ok_or_else(missing)?;
            match field {
                ReportingField::PerformanceSignals => report.performance_signals.into(),
                ReportingField::QualitativeWins => report.qualitative_wins.into(),
                ReportingField::NextSteps => report.next_steps.into(),
                ReportingField::Notes => report.notes.clone().into(),
            }
        }
    };
    Ok(value)
}

fn missing_record(member: &str, month: Month) -> TrackerError {
    TrackerError::InvalidPath(format!("{member}/{month}"))
}

/// Apply `edit` to a copy of the addressed record and return the new snapshot.
fn update_record<F>(
    state: &TrackerState,
    member: &str,
    month: Month,
    edit: F,
) -> Result<TrackerState>
where
    F: FnOnce(&mut MonthRecord) -> Result<()>,
{
    let mut next = state.clone();
    let record = next
        .record_mut(member, month)
        .ok_or_else(|| missing_record(member, month))?;
    edit(record)?;
    Ok(next)
}

/// Read the leaf at `path` in the (member, month) record.
pub fn get_at_path(
    state: &TrackerState,
    member: &str,
    month: Month,
    path: &FieldPath,
) -> Result<FieldValue> {
    let record = state
        .record(member, month)
        .ok_or_else(|| missing_record(member, month))?;
    read_field(record, path)
}

/// Replace the leaf at `path` with `value`.
///
/// Fails with [`TrackerError::InvalidPath`] when the member, month, sprint or
/// reporting period does not exist, and with [`TrackerError::TypeMismatch`]
/// when `value` is not of the leaf's kind. Tag lists are deduplicated.
pub fn set_at_path(
    state: &TrackerState,
    member: &str,
    month: Month,
    path: &FieldPath,
    value: FieldValue,
) -> Result<TrackerState> {
    update_record(state, member, month, |record| {
        match (leaf_mut(record, path)?, value) {
            (Leaf::Bool(slot), FieldValue::Bool(v)) => *slot = v,
            (Leaf::Text(slot), FieldValue::Text(v)) => *slot = v,
            (Leaf::Tags(slot), FieldValue::Tags(v)) => *slot = TagSet::from(v),
            _ => {
                return Err(TrackerError::TypeMismatch {
                    path: path.to_string(),
                    expected: path.kind().as_str(),
                })
            }
        }
        Ok(())
    })
}

/// Negate the boolean leaf at `path`.
pub fn toggle_at_path(
    state: &TrackerState,
    member: &str,
    month: Month,
    path: &FieldPath,
) -> Result<TrackerState> {
    update_record(state, member, month, |record| match leaf_mut(record, path)? {
        Leaf::Bool(slot) => {
            *slot = !*slot;
            Ok(())
        }
        _ => Err(TrackerError::TypeMismatch {
            path: path.to_string(),
            expected: LeafKind::Bool.as_str(),
        }),
    })
}

/// Select `tag` in the month's emotional codes, or deselect it if already
/// selected. Newly selected tags go to the end of the list.
pub fn toggle_tag(
    state: &TrackerState,
    member: &str,
    month: Month,
    tag: &str,
) -> Result<TrackerState> {
    update_record(state, member, month, |record| {
        record.planning.emotional_codes.selected.toggle(tag);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_planning_paths() {
        assert_eq!(
            FieldPath::parse("planning.narrativeArc.notes").unwrap(),
            FieldPath::Planning(PlanningField::NarrativeArcNotes)
        );
        assert_eq!(
            FieldPath::parse("planning.calendarSent").unwrap(),
            FieldPath::Planning(PlanningField::CalendarSent)
        );
    }

    #[test]
    fn test_parse_sprint_and_reporting_paths() {
        assert_eq!(
            FieldPath::parse("sprints.W3-4.qaComplete").unwrap(),
            FieldPath::sprint("W3-4", SprintField::QaComplete)
        );
        assert_eq!(
            FieldPath::parse("reporting.1st-2nd Week.notes").unwrap(),
            FieldPath::reporting("1st-2nd Week", ReportingField::Notes)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_segments() {
        for bad in [
            "planning.narrativeArc",
            "planning.narrativeArc.title",
            "planning.capacityConfirmed.done",
            "sprints.W3-4",
            "sprints.W3-4.owner",
            "reporting.Monthly.notes.extra",
            "budget.total",
            "",
        ] {
            let err = FieldPath::parse(bad).unwrap_err();
            assert!(
                matches!(err, TrackerError::InvalidPath(ref p) if p == bad),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn test_display_matches_parse() {
        let paths = PlanningField::ALL
            .into_iter()
            .map(FieldPath::Planning)
            .chain(SprintField::ALL.into_iter().map(|f| FieldPath::sprint("W1-2", f)))
            .chain(ReportingField::ALL.into_iter().map(|f| FieldPath::reporting("Monthly", f)));
        for path in paths {
            assert_eq!(FieldPath::parse(&path.to_string()).unwrap(), path);
        }
    }

    #[test]
    fn test_leaf_kinds() {
        assert_eq!(
            FieldPath::Planning(PlanningField::EmotionalCodesSelected).kind(),
            LeafKind::Tags
        );
        assert_eq!(FieldPath::sprint("W1-2", SprintField::ScopeNotes).kind(), LeafKind::Text);
        assert_eq!(
            FieldPath::reporting("Monthly", ReportingField::NextSteps).kind(),
            LeafKind::Bool
        );
    }
}
