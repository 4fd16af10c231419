use std::cell::Cell;

use chrono::NaiveDate;
use kindling_tracker::alerts::AlertLevel;
use kindling_tracker::calendar::{Member, Month, Roster};
use kindling_tracker::models::init_state;
use kindling_tracker::path::*;
use kindling_tracker::store::*;
use kindling_tracker::tracker::Tracker;
use kindling_tracker::{Result, TrackerError};

/// Store whose writes always fail.
#[derive(Default)]
struct BrokenStore {
    attempts: Cell<u32>,
}

impl BlobStore for BrokenStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _blob: &str) -> Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        Err(TrackerError::Storage("disk full".to_string()))
    }
}

fn setup() -> Tracker<MemoryStore> {
    Tracker::open(MemoryStore::new())
}

mod opening {
    use super::*;

    #[test]
    fn starts_from_initialized_state_on_empty_store() {
        let tracker = setup();
        assert_eq!(
            tracker.state(),
            &init_state(&Roster::default(), &Month::ALL)
        );
        assert_eq!(tracker.months(), &Month::ALL);
    }

    #[test]
    fn starts_fresh_on_corrupt_blob() {
        let tracker = Tracker::open(MemoryStore::with_blob(STORAGE_KEY, "][ not json"));
        assert_eq!(
            tracker.state(),
            &init_state(&Roster::default(), &Month::ALL)
        );
    }

    #[test]
    fn uses_custom_calendar() {
        let roster = Roster::new(vec![Member::new("Sam", &["Fern"])]);
        let tracker = Tracker::with_calendar(
            MemoryStore::new(),
            "custom",
            roster,
            vec![Month::March],
        );
        assert_eq!(tracker.roster().names().collect::<Vec<_>>(), vec!["Sam"]);
        assert!(tracker.record("Sam", Month::March).is_some());
        assert!(tracker.record("Sam", Month::January).is_none());
    }
}

mod commands {
    use super::*;

    #[test]
    fn toggle_field_persists_the_new_state() {
        let mut tracker = setup();
        let path = FieldPath::Planning(PlanningField::CapacityConfirmed);

        tracker
            .toggle_field("Molly", Month::February, &path)
            .expect("toggle");

        assert_eq!(
            tracker.field("Molly", Month::February, &path).expect("field"),
            FieldValue::Bool(true)
        );
        let stored = tracker
            .store()
            .load(STORAGE_KEY)
            .expect("load")
            .expect("blob saved");
        assert_eq!(&decode(&stored).expect("decode"), tracker.state());
    }

    #[test]
    fn set_field_survives_reopen() {
        let mut tracker = setup();
        let path = FieldPath::sprint("W1-2", SprintField::ScopeNotes);
        tracker
            .set_field("Nick", Month::March, &path, "Two shoots, four edits".into())
            .expect("set");

        let blob = tracker.store().load(STORAGE_KEY).expect("load").expect("blob");
        let reopened = Tracker::open(MemoryStore::with_blob(STORAGE_KEY, blob));

        assert_eq!(reopened.state(), tracker.state());
    }

    #[test]
    fn toggle_tag_updates_selection() {
        let mut tracker = setup();
        tracker.toggle_tag("Tash", Month::January, "Tranquility").expect("tag");
        tracker.toggle_tag("Tash", Month::January, "Saving").expect("tag");
        tracker.toggle_tag("Tash", Month::January, "Tranquility").expect("tag");

        let selected = &tracker
            .record("Tash", Month::January)
            .expect("record")
            .planning
            .emotional_codes
            .selected;
        assert_eq!(selected.as_slice(), &["Saving"]);
    }

    #[test]
    fn failed_command_changes_nothing_and_saves_nothing() {
        let mut tracker = setup();
        let before = tracker.state().clone();

        let err = tracker
            .toggle_field(
                "Nick",
                Month::January,
                &FieldPath::Planning(PlanningField::NarrativeArcNotes),
            )
            .unwrap_err();

        assert!(matches!(err, TrackerError::TypeMismatch { .. }));
        assert_eq!(tracker.state(), &before);
        assert_eq!(tracker.store().load(STORAGE_KEY).expect("load"), None);
    }

    #[test]
    fn save_failure_keeps_in_memory_mutation() {
        let mut tracker = Tracker::open(BrokenStore::default());
        let path = FieldPath::reporting("Monthly", ReportingField::QualitativeWins);

        tracker.toggle_field("Matt", Month::January, &path).expect("toggle");
        tracker.toggle_field("Matt", Month::January, &path).expect("toggle");
        tracker.toggle_field("Matt", Month::January, &path).expect("toggle");

        assert_eq!(tracker.store().attempts.get(), 3);
        assert_eq!(
            tracker.field("Matt", Month::January, &path).expect("field"),
            FieldValue::Bool(true)
        );
    }

    #[test]
    fn mutations_apply_in_order() {
        let mut tracker = setup();
        let path = FieldPath::reporting("3rd-4th Week", ReportingField::Notes);
        for note in ["draft", "review", "final"] {
            tracker
                .set_field("Nick", Month::February, &path, note.into())
                .expect("set");
        }
        assert_eq!(
            tracker.field("Nick", Month::February, &path).expect("field"),
            FieldValue::Text("final".to_string())
        );
    }
}

mod queries {
    use super::*;

    #[test]
    fn progress_tracks_commands() {
        let mut tracker = setup();
        for field in [SprintField::ScopeLocked, SprintField::AllScheduled] {
            tracker
                .toggle_field("Nick", Month::January, &FieldPath::sprint("W3-4", field))
                .expect("toggle");
        }
        let p = tracker.progress("Nick", Month::January);
        assert_eq!((p.done, p.total, p.percent), (2, 13, 15));
    }

    #[test]
    fn overview_covers_roster_and_months() {
        let tracker = setup();
        let rows = tracker.overview();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.months.len() == 3));
    }

    #[test]
    fn month_config_matches_calendar() {
        let tracker = setup();
        let config = tracker.month_config(Month::January);
        assert_eq!(config.reporting_periods, &["Monthly"]);
    }

    #[test]
    fn due_alerts_takes_the_given_date() {
        let tracker = setup();
        // 2025-05-05 is a Monday.
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).expect("date");
        let alerts = tracker.due_alerts(&date);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Info);
    }
}
