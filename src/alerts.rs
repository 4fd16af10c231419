//! Date-driven notices for the monthly and fortnightly cadence.
//!
//! Each rule is a pure predicate over the day of month and weekday of a
//! caller-supplied date. Rules are evaluated independently and in a fixed
//! priority order, so several can fire on the same day.

use chrono::{Datelike, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Urgent,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: &'static str,
}

pub const CALENDAR_DUE: &str = "Monthly calendar due to customer by 20th";
pub const SIGNOFF_LOCK: &str = "Customer sign-off must be locked by 23rd";
pub const SPRINT_CLOSE: &str = "SPRINT CLOSE: All content must be scheduled by 3pm today";
pub const SPRINT_START: &str = "Sprint start: Confirm scope is locked for this fortnight";

struct AlertRule {
    level: AlertLevel,
    message: &'static str,
    applies: fn(u32, Weekday) -> bool,
}

fn calendar_window(day: u32, _: Weekday) -> bool {
    (15..20).contains(&day)
}

fn signoff_window(day: u32, _: Weekday) -> bool {
    (20..=23).contains(&day)
}

fn sprint_close(_: u32, weekday: Weekday) -> bool {
    weekday == Weekday::Fri
}

fn sprint_start(_: u32, weekday: Weekday) -> bool {
    weekday == Weekday::Mon
}

// Priority order.
const RULES: &[AlertRule] = &[
    AlertRule {
        level: AlertLevel::Warning,
        message: CALENDAR_DUE,
        applies: calendar_window,
    },
    AlertRule {
        level: AlertLevel::Urgent,
        message: SIGNOFF_LOCK,
        applies: signoff_window,
    },
    AlertRule {
        level: AlertLevel::Urgent,
        message: SPRINT_CLOSE,
        applies: sprint_close,
    },
    AlertRule {
        level: AlertLevel::Info,
        message: SPRINT_START,
        applies: sprint_start,
    },
];

/// Notices due on the date of `now`, highest priority first.
pub fn due_alerts(now: &impl Datelike) -> Vec<Alert> {
    let (day, weekday) = (now.day(), now.weekday());
    RULES
        .iter()
        .filter(|rule| (rule.applies)(day, weekday))
        .map(|rule| Alert {
            level: rule.level,
            message: rule.message,
        })
        .collect()
}
