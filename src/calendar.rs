//! Static calendar tables: tracked months, sprint windows, reporting cadence
//! and the team roster.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag vocabulary offered by the emotional-code picker, in display order.
pub const EMOTIONAL_CODES: &[&str] = &[
    "Power",
    "Order",
    "Curiosity",
    "Status",
    "Tranquility",
    "Saving",
    "Vengeance",
];

/// Reporting cadence for the first tracked month.
pub const MONTHLY_PERIODS: &[&str] = &["Monthly"];

/// Reporting cadence for every other month.
pub const FORTNIGHTLY_PERIODS: &[&str] = &["1st-2nd Week", "3rd-4th Week"];

/// A tracked month of the quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
}

impl Month {
    /// All tracked months in calendar order.
    pub const ALL: [Month; 3] = [Month::January, Month::February, Month::March];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "January" => Some(Self::January),
            "February" => Some(Self::February),
            "March" => Some(Self::March),
            _ => None,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fortnightly delivery window. Config only, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintWindow {
    /// Unique within its month; doubles as the sprint key in a month record.
    pub label: &'static str,
    /// Display range, e.g. "Mon 3rd – Fri 14th Feb".
    pub range: &'static str,
    /// When scope for this sprint must be closed.
    pub close: &'static str,
}

const JANUARY_SPRINTS: &[SprintWindow] = &[SprintWindow {
    label: "W3-4",
    range: "Mon 20th – Fri 31st Jan",
    close: "Fri 17th Jan, 3pm",
}];

const FEBRUARY_SPRINTS: &[SprintWindow] = &[
    SprintWindow {
        label: "W1-2",
        range: "Mon 3rd – Fri 14th Feb",
        close: "Fri 31st Jan, 3pm",
    },
    SprintWindow {
        label: "W3-4",
        range: "Mon 17th – Fri 28th Feb",
        close: "Fri 14th Feb, 3pm",
    },
];

const MARCH_SPRINTS: &[SprintWindow] = &[
    SprintWindow {
        label: "W1-2",
        range: "Mon 3rd – Fri 14th Mar",
        close: "Fri 28th Feb, 3pm",
    },
    SprintWindow {
        label: "W3-4",
        range: "Mon 17th – Fri 28th Mar",
        close: "Fri 14th Mar, 3pm",
    },
];

/// Sprint windows and reporting periods that shape one month record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthConfig {
    pub sprint_windows: &'static [SprintWindow],
    pub reporting_periods: &'static [&'static str],
}

impl MonthConfig {
    /// Config for a month given by name.
    ///
    /// Untracked names get no sprints and the fortnightly reporting cadence.
    pub fn for_label(label: &str) -> Self {
        match Month::from_str(label) {
            Some(month) => month_config(month),
            None => Self {
                sprint_windows: &[],
                reporting_periods: FORTNIGHTLY_PERIODS,
            },
        }
    }

    pub fn sprint_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sprint_windows.iter().map(|w| w.label)
    }
}

pub fn month_config(month: Month) -> MonthConfig {
    match month {
        Month::January => MonthConfig {
            sprint_windows: JANUARY_SPRINTS,
            reporting_periods: MONTHLY_PERIODS,
        },
        Month::February => MonthConfig {
            sprint_windows: FEBRUARY_SPRINTS,
            reporting_periods: FORTNIGHTLY_PERIODS,
        },
        Month::March => MonthConfig {
            sprint_windows: MARCH_SPRINTS,
            reporting_periods: FORTNIGHTLY_PERIODS,
        },
    }
}

/// A roster entry and the customer accounts they look after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub customers: Vec<String>,
}

impl Member {
    pub fn new(name: impl Into<String>, customers: &[&str]) -> Self {
        Self {
            name: name.into(),
            customers: customers.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Ordered team roster. Member order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.member(name).is_some()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(vec![
            Member::new("Nick", &["Carlo", "Build Club"]),
            Member::new("Matt", &["Meridian", "Haast"]),
            Member::new("Molly", &["Quarterzip"]),
            Member::new("Tash", &["Lorikeet", "KC Ventures"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_january_has_monthly_reporting() {
        let config = month_config(Month::January);
        assert_eq!(config.reporting_periods, &["Monthly"]);
        assert_eq!(config.sprint_labels().collect::<Vec<_>>(), vec!["W3-4"]);
    }

    #[test]
    fn test_later_months_report_fortnightly() {
        for month in [Month::February, Month::March] {
            let config = month_config(month);
            assert_eq!(config.reporting_periods, &["1st-2nd Week", "3rd-4th Week"]);
            assert_eq!(
                config.sprint_labels().collect::<Vec<_>>(),
                vec!["W1-2", "W3-4"]
            );
        }
    }

    #[test]
    fn test_unknown_month_has_no_sprints() {
        let config = MonthConfig::for_label("April");
        assert!(config.sprint_windows.is_empty());
        assert_eq!(config.reporting_periods.len(), 2);
    }

    #[test]
    fn test_sprint_labels_unique_within_month() {
        for month in Month::ALL {
            let labels: Vec<_> = month_config(month).sprint_labels().collect();
            let mut deduped = labels.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(labels.len(), deduped.len());
        }
    }

    #[test]
    fn test_month_names_round_trip() {
        for month in Month::ALL {
            assert_eq!(Month::from_str(month.as_str()), Some(month));
        }
        assert_eq!(Month::from_str("january"), None);
    }

    #[test]
    fn test_default_roster_order() {
        let roster = Roster::default();
        assert_eq!(
            roster.names().collect::<Vec<_>>(),
            vec!["Nick", "Matt", "Molly", "Tash"]
        );
        assert_eq!(
            roster.member("Tash").map(|m| m.customers.clone()),
            Some(vec!["Lorikeet".to_string(), "KC Ventures".to_string()])
        );
    }
}
