//! End-to-end store behaviour against an on-disk database.

mod common;

use common::{count_habit, TestContext};
use githabit_tracker::db::{CheckInRepository, HabitRepository, StatsRepository, TimelineRepository};
use githabit_tracker::StoreError;
use habit_core::types::{HabitDraft, HabitStats, HabitStatus};
use habit_core::GroupKind;
use pretty_assertions::assert_eq;

#[test]
fn data_survives_reopen() {
    let ctx = TestContext::new();
    let habit_id = {
        let mut store = ctx.store();
        let id = store.add_habit(&count_habit("pushups", 20)).unwrap();
        store.commit_check_in(id, "morning", 12).unwrap();
        store.commit_check_in(id, "evening", 10).unwrap();
        id
    };
    assert!(ctx.db_path().exists());

    let store = ctx.store();
    assert_eq!(store.categories().len(), 5);
    assert_eq!(store.habits().len(), 1);
    assert_eq!(store.habit_stats(habit_id).total, 22);
    assert_eq!(store.goal_streak(), 1);
}

#[test]
fn stats_track_sum_and_latest_timestamp() {
    let ctx = TestContext::new();
    let store = ctx.store();
    let repo = store.repository();
    let id = repo.create_habit(&count_habit("water", 8)).unwrap();

    let entries = [(3, 1_700_000_000_000), (2, 1_700_000_900_000), (4, 1_700_000_300_000)];
    for (value, ts) in entries {
        repo.create_check_in_at(id, "", value, 8, ts).unwrap();
    }

    assert_eq!(
        repo.habit_stats(id).unwrap(),
        HabitStats {
            total: 9,
            last_timestamp: Some(1_700_000_900_000),
        }
    );
}

#[test]
fn removed_habit_stays_in_timeline() {
    let ctx = TestContext::new();
    let mut store = ctx.store();
    let id = store.add_habit(&HabitDraft::named("journal")).unwrap();
    store.commit_check_in(id, "day one", 1).unwrap();
    store.remove_habit(id).unwrap();

    assert!(store.habits().is_empty());
    assert_eq!(store.repository().list_check_ins_for_habit(id).unwrap().len(), 1);
    assert_eq!(
        store.repository().get_habit(id).unwrap().unwrap().status,
        HabitStatus::Deleted
    );

    let feed = store.repository().recent_activities(10).unwrap();
    let delete = feed.iter().find(|a| a.id() == format!("delete_{id}")).unwrap();
    assert_eq!(delete.habit_name, "journal");

    let groups = store.timeline_groups();
    assert_eq!(groups[0].kind, GroupKind::Delete);
}

#[test]
fn commits_to_one_habit_group_together() {
    let ctx = TestContext::new();
    let mut store = ctx.store();
    let a = store.add_habit(&HabitDraft::named("a")).unwrap();
    let b = store.add_habit(&HabitDraft::named("b")).unwrap();
    let repo = store.repository();
    repo.create_check_in_at(b, "", 1, 1, 4_000_000_000_000).unwrap();
    repo.create_check_in_at(a, "", 1, 1, 4_000_000_001_000).unwrap();
    repo.create_check_in_at(a, "", 1, 1, 4_000_000_002_000).unwrap();
    store.refresh_all();

    let groups = store.timeline_groups();
    assert_eq!(groups[0].habit_id, a);
    assert_eq!(groups[0].activities.len(), 2);
    assert_eq!(groups[1].habit_id, b);
    assert_eq!(groups[1].activities.len(), 1);
}

#[test]
fn rejected_mutations_leave_data_untouched() {
    let ctx = TestContext::new();
    let mut store = ctx.store();
    let id = store.add_habit(&count_habit("read", 5)).unwrap();
    let before = store.state().clone();

    assert!(matches!(
        store.commit_check_in(id, "", -3),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.update_habit(id, &count_habit("read", 0)),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.update_check_in(77, "", 1),
        Err(StoreError::CheckInNotFound(77))
    ));

    store.refresh_all();
    assert_eq!(store.state(), &before);
}

#[test]
fn yearly_stats_cover_recorded_years() {
    let ctx = TestContext::new();
    let mut store = ctx.store();
    let id = store.add_habit(&HabitDraft::named("run")).unwrap();
    // 2021-06-15 around midday UTC
    store
        .repository()
        .create_check_in_at(id, "", 1, 1, 1_623_758_400_000)
        .unwrap();
    store.refresh_all();

    let years = store.available_years();
    assert!(years.contains(&2021));
    assert!(years.windows(2).all(|w| w[0] > w[1]));

    let stats = store.yearly_stats(2021);
    assert_eq!(stats.total_check_ins, 1);
    assert_eq!(stats.days_elapsed, 365);
    assert_eq!(stats.active_days, 1);
    assert_eq!(stats.top_habit.unwrap().habit_name.as_deref(), Some("run"));
}
