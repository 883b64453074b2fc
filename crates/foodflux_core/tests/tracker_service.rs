use chrono::NaiveDate;
use foodflux_core::db::open_db_in_memory;
use foodflux_core::{
    ensure_user, AddEntryRequest, Clock, EntryRepository, FoodItemRepository, SqliteStore,
    StoredUserGateway, TrackerError, TrackerService, UserId, ViewInvalidator, ViewPath,
};
use rusqlite::Connection;
use std::cell::RefCell;
use uuid::Uuid;

#[derive(Default)]
struct RecordingViews {
    paths: RefCell<Vec<String>>,
}

impl ViewInvalidator for RecordingViews {
    fn invalidate(&self, path: &ViewPath) {
        self.paths.borrow_mut().push(path.to_string());
    }
}

impl RecordingViews {
    fn take(&self) -> Vec<String> {
        self.paths.borrow_mut().drain(..).collect()
    }
}

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

type Service<'a> =
    TrackerService<SqliteStore<'a>, StoredUserGateway<SqliteStore<'a>>, &'a RecordingViews>;

fn service<'a>(conn: &'a Connection, views: &'a RecordingViews) -> Service<'a> {
    let store = SqliteStore::try_new(conn).unwrap();
    TrackerService::new(store, StoredUserGateway::new(store), views)
}

fn user(conn: &Connection, email: &str) -> UserId {
    let store = SqliteStore::try_new(conn).unwrap();
    ensure_user(&store, email, None).unwrap().user.id
}

fn entry_request(date_key: &str, name: &str, calories: f64) -> AddEntryRequest {
    AddEntryRequest {
        date_key: date_key.to_string(),
        name: name.to_string(),
        calories,
        food_item_id: None,
    }
}

#[test]
fn every_operation_requires_a_resolved_user() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let unknown = Uuid::new_v4().to_string();

    for subject in [None, Some(""), Some(unknown.as_str())] {
        assert!(matches!(
            service.create_preset(subject, "Toast", 80),
            Err(TrackerError::Unauthorized)
        ));
        assert!(matches!(
            service.set_goal(subject, 2_000),
            Err(TrackerError::Unauthorized)
        ));
        assert!(matches!(
            service.add_entry(subject, &entry_request("2024-05-01", "Soup", 100.0)),
            Err(TrackerError::Unauthorized)
        ));
        assert!(matches!(
            service.day_summary(subject, "2024-05-01"),
            Err(TrackerError::Unauthorized)
        ));
    }
    assert!(views.take().is_empty());
}

#[test]
fn created_preset_is_owned_by_creator_with_exact_values() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");

    let created = service
        .create_preset(Some(alice.as_str()), "  Oat milk ", 45)
        .unwrap();

    let store = SqliteStore::try_new(&conn).unwrap();
    let loaded = store.get_food_item(created.id).unwrap().unwrap();
    assert_eq!(loaded.user_id, alice);
    assert_eq!(loaded.name, "Oat milk");
    assert_eq!(loaded.calories_per_unit, 45);
    assert_eq!(views.take(), ["/"]);
}

#[test]
fn invalid_preset_input_is_rejected_with_reason() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");

    match service.create_preset(Some(alice.as_str()), "  ", 10) {
        Err(TrackerError::InvalidInput(reason)) => assert!(reason.contains("name")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        service.create_preset(Some(alice.as_str()), "Toast", -1),
        Err(TrackerError::InvalidInput(_))
    ));
    assert!(service.list_presets(Some(alice.as_str())).unwrap().is_empty());
}

#[test]
fn update_preset_replaces_fields_for_owner() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    let created = service.create_preset(subject, "Toast", 80).unwrap();
    views.take();
    let updated = service
        .update_preset(subject, created.id, "Rye toast", 95)
        .unwrap();

    assert_eq!(views.take(), ["/"]);
    assert_eq!(updated.id, created.id);
    let presets = service.list_presets(subject).unwrap();
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0].name, "Rye toast");
    assert_eq!(presets[0].calories_per_unit, 95);

    assert!(matches!(
        service.update_preset(subject, Uuid::new_v4(), "Ghost", 1),
        Err(TrackerError::NotFound)
    ));
    assert!(matches!(
        service.update_preset(subject, created.id, " ", 1),
        Err(TrackerError::InvalidInput(_))
    ));
    assert!(views.take().is_empty());
    assert_eq!(service.list_presets(subject).unwrap()[0].name, "Rye toast");
}

#[test]
fn foreign_rows_report_not_found_and_stay_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let mallory = user(&conn, "mallory@example.com");

    let preset = service
        .create_preset(Some(alice.as_str()), "Salad", 150)
        .unwrap();
    let entry = service
        .add_entry(
            Some(alice.as_str()),
            &entry_request("2024-05-01", "Salad", 150.0),
        )
        .unwrap();
    views.take();

    let intruder = Some(mallory.as_str());
    assert!(matches!(
        service.update_preset(intruder, preset.id, "Mine now", 1),
        Err(TrackerError::NotFound)
    ));
    assert!(matches!(
        service.delete_preset(intruder, preset.id),
        Err(TrackerError::NotFound)
    ));
    assert!(matches!(
        service.delete_entry(intruder, entry.id),
        Err(TrackerError::NotFound)
    ));
    assert_eq!(TrackerError::NotFound.to_string(), "not found");

    let store = SqliteStore::try_new(&conn).unwrap();
    assert_eq!(store.get_food_item(preset.id).unwrap(), Some(preset));
    assert_eq!(store.get_entry(entry.id).unwrap(), Some(entry));
    assert!(views.take().is_empty());
}

#[test]
fn delete_preset_leaves_referencing_entries_alone() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    let preset = service.create_preset(subject, "Bagel", 280).unwrap();
    let entry = service
        .add_entry(
            subject,
            &AddEntryRequest {
                food_item_id: Some(preset.id),
                ..entry_request("2024-05-01", "", 0.0)
            },
        )
        .unwrap();

    views.take();
    service.delete_preset(subject, preset.id).unwrap();
    assert_eq!(views.take(), ["/"]);
    assert!(matches!(
        service.delete_preset(subject, preset.id),
        Err(TrackerError::NotFound)
    ));
    assert!(views.take().is_empty());

    let summary = service.day_summary(subject, "2024-05-01").unwrap();
    assert_eq!(summary.entries, [entry]);
    assert_eq!(summary.entries[0].food_item_id, Some(preset.id));
    assert_eq!(summary.total, 280);
}

#[test]
fn add_entry_with_only_preset_resolves_name_and_calories() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    let preset = service.create_preset(subject, "Protein bar", 210).unwrap();
    views.take();

    let entry = service
        .add_entry(
            subject,
            &AddEntryRequest {
                food_item_id: Some(preset.id),
                ..entry_request("2024-05-01", "   ", f64::NAN)
            },
        )
        .unwrap();

    assert_eq!(entry.name, "Protein bar");
    assert_eq!(entry.calories, 210);
    assert_eq!(entry.food_item_id, Some(preset.id));
    assert_eq!(views.take(), ["/?date=2024-05-01"]);
}

#[test]
fn explicit_calories_win_over_preset_but_blank_name_is_borrowed() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    let preset = service.create_preset(subject, "Pasta", 400).unwrap();

    let borrowed_name = service
        .add_entry(
            subject,
            &AddEntryRequest {
                food_item_id: Some(preset.id),
                ..entry_request("2024-05-01", "", 550.0)
            },
        )
        .unwrap();
    assert_eq!(borrowed_name.name, "Pasta");
    assert_eq!(borrowed_name.calories, 550);

    let explicit = service
        .add_entry(
            subject,
            &AddEntryRequest {
                food_item_id: Some(preset.id),
                ..entry_request("2024-05-01", "Half pasta", 200.0)
            },
        )
        .unwrap();
    assert_eq!(explicit.name, "Half pasta");
    assert_eq!(explicit.calories, 200);
}

#[test]
fn explicit_zero_calories_are_overridden_by_preset() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    let preset = service.create_preset(subject, "Cola", 140).unwrap();
    let entry = service
        .add_entry(
            subject,
            &AddEntryRequest {
                food_item_id: Some(preset.id),
                ..entry_request("2024-05-01", "Diet cola", 0.0)
            },
        )
        .unwrap();

    assert_eq!(entry.name, "Diet cola");
    assert_eq!(entry.calories, 140);
}

#[test]
fn foreign_preset_is_not_resolvable() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let bob = user(&conn, "bob@example.com");

    let alices = service
        .create_preset(Some(alice.as_str()), "Secret recipe", 999)
        .unwrap();

    let err = service
        .add_entry(
            Some(bob.as_str()),
            &AddEntryRequest {
                food_item_id: Some(alices.id),
                ..entry_request("2024-05-01", "", 0.0)
            },
        )
        .unwrap_err();
    match err {
        TrackerError::InvalidInput(reason) => assert_eq!(
            reason,
            "food name required, enter a name or select a preset"
        ),
        other => panic!("unexpected error: {other:?}"),
    }

    let entry = service
        .add_entry(
            Some(bob.as_str()),
            &AddEntryRequest {
                food_item_id: Some(alices.id),
                ..entry_request("2024-05-01", "Water", 0.0)
            },
        )
        .unwrap();
    assert_eq!(entry.calories, 0);
    assert_eq!(entry.food_item_id, Some(alices.id));
}

#[test]
fn add_entry_validates_date_key_length_only() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    for bad in ["2024-05", "2024-05-011"] {
        assert!(matches!(
            service.add_entry(subject, &entry_request(bad, "Soup", 100.0)),
            Err(TrackerError::InvalidInput(_))
        ));
    }
    for accepted in ["2024-5-1", "2024-05-1", "2024-05-01", "notadate"] {
        let entry = service
            .add_entry(subject, &entry_request(accepted, "Soup", 100.0))
            .unwrap();
        assert_eq!(entry.date_key.as_str(), accepted);
    }
}

#[test]
fn add_entry_rejects_fractional_and_negative_calories() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    for calories in [-50.0, 12.5] {
        assert!(matches!(
            service.add_entry(subject, &entry_request("2024-05-01", "Soup", calories)),
            Err(TrackerError::InvalidInput(_))
        ));
    }
    assert!(service
        .day_summary(subject, "2024-05-01")
        .unwrap()
        .entries
        .is_empty());
}

#[test]
fn day_summary_totals_entries_against_goal() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let bob = user(&conn, "bob@example.com");
    let subject = Some(alice.as_str());

    for (name, calories) in [("Eggs", 180.0), ("Sandwich", 450.0), ("Apple", 95.0)] {
        service
            .add_entry(subject, &entry_request("2024-05-01", name, calories))
            .unwrap();
    }
    service
        .add_entry(subject, &entry_request("2024-05-02", "Cake", 600.0))
        .unwrap();
    service
        .add_entry(Some(bob.as_str()), &entry_request("2024-05-01", "Pizza", 900.0))
        .unwrap();

    let without_goal = service.day_summary(subject, "2024-05-01").unwrap();
    assert_eq!(without_goal.total, 725);
    assert_eq!(without_goal.goal_calories, 0);
    assert_eq!(without_goal.diff, -725);
    let names: Vec<&str> = without_goal
        .entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, ["Eggs", "Sandwich", "Apple"]);

    service.set_goal(subject, 2_000).unwrap();
    let with_goal = service.list_day(&alice, &without_goal.date_key).unwrap();
    assert_eq!(with_goal.total, 725);
    assert_eq!(with_goal.goal_calories, 2_000);
    assert_eq!(with_goal.diff, 1_275);
}

#[test]
fn set_goal_twice_keeps_latest_value() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    service.set_goal(subject, 2_200).unwrap();
    service.set_goal(subject, 1_900).unwrap();
    assert!(matches!(
        service.set_goal(subject, -1),
        Err(TrackerError::InvalidInput(_))
    ));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM daily_goals;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(
        service.day_summary(subject, "2024-05-01").unwrap().goal_calories,
        1_900
    );
    assert_eq!(views.take(), ["/", "/"]);
}

#[test]
fn delete_entry_removes_row_and_invalidates_its_day() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());

    let entry = service
        .add_entry(subject, &entry_request("2024-06-10", "Curry", 640.0))
        .unwrap();
    views.take();

    service.delete_entry(subject, entry.id).unwrap();

    assert_eq!(views.take(), ["/?date=2024-06-10"]);
    assert!(matches!(
        service.delete_entry(subject, entry.id),
        Err(TrackerError::NotFound)
    ));
    assert_eq!(service.day_summary(subject, "2024-06-10").unwrap().total, 0);
}

#[test]
fn day_view_defaults_to_today_and_links_neighbours() {
    let conn = open_db_in_memory().unwrap();
    let views = RecordingViews::default();
    let service = service(&conn, &views);
    let alice = user(&conn, "alice@example.com");
    let subject = Some(alice.as_str());
    let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

    service.create_preset(subject, "Yogurt", 100).unwrap();
    service
        .add_entry(subject, &entry_request("2024-02-29", "Yogurt", 100.0))
        .unwrap();

    let view = service.day_view(subject, None, &clock).unwrap();
    assert_eq!(view.today.as_str(), "2024-02-29");
    assert_eq!(view.summary.date_key.as_str(), "2024-02-29");
    assert_eq!(view.previous.as_str(), "2024-02-28");
    assert_eq!(view.next.as_str(), "2024-03-01");
    assert_eq!(view.summary.total, 100);
    assert_eq!(view.presets.len(), 1);

    let new_year = service.day_view(subject, Some("2023-12-31"), &clock).unwrap();
    assert_eq!(new_year.today.as_str(), "2024-02-29");
    assert_eq!(new_year.next.as_str(), "2024-01-01");
    assert!(new_year.summary.entries.is_empty());

    assert!(matches!(
        service.day_view(subject, Some("notadate"), &clock),
        Err(TrackerError::InvalidInput(_))
    ));
}
