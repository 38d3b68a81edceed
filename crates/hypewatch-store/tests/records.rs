use chrono::NaiveDate;
use hypewatch_store::{
    calendar_view, create_agency, create_event, create_project, delete_agency, delete_event,
    events_in_range, get_agency, get_event, list_agencies, list_events, list_projects,
    update_agency, update_event, AgencyPatch, CalendarEventPatch, CalendarView, EventStatus,
    JsonStore, NewAgency, NewCalendarEvent, NewProject, StoreError,
};
use uuid::Uuid;

async fn store() -> (tempfile::TempDir, JsonStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();
    (dir, store)
}

fn event(title: &str, starts_at: &str, ends_at: Option<&str>) -> NewCalendarEvent {
    NewCalendarEvent {
        title: title.to_string(),
        description: String::new(),
        starts_at: starts_at.parse().unwrap(),
        ends_at: ends_at.map(|s| s.parse().unwrap()),
        channel: "instagram".to_string(),
        status: EventStatus::Planned,
        brand_slug: Some("crooks-and-castles".to_string()),
    }
}

fn agency(name: &str) -> NewAgency {
    NewAgency {
        name: name.to_string(),
        ..NewAgency::default()
    }
}

#[tokio::test]
async fn creating_same_event_twice_yields_two_records() {
    let (_dir, store) = store().await;
    let payload = event("Drop teaser", "2026-03-01T17:00:00Z", None);

    let a = create_event(&store, payload.clone()).await.unwrap();
    let b = create_event(&store, payload).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(list_events(&store).await.unwrap().len(), 2);
}

#[tokio::test]
async fn creating_same_agency_twice_yields_two_records() {
    let (_dir, store) = store().await;
    create_agency(&store, agency("Northside PR")).await.unwrap();
    create_agency(&store, agency("Northside PR")).await.unwrap();
    assert_eq!(list_agencies(&store).await.unwrap().len(), 2);
}

#[tokio::test]
async fn records_survive_reopening_the_store() {
    let (dir, store) = store().await;
    let created = create_event(&store, event("Lookbook", "2026-03-02T12:00:00Z", None))
        .await
        .unwrap();
    drop(store);

    let reopened = JsonStore::open(dir.path()).await.unwrap();
    let fetched = get_event(&reopened, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_and_delete_event() {
    let (_dir, store) = store().await;
    let created = create_event(&store, event("Lookbook", "2026-03-02T12:00:00Z", None))
        .await
        .unwrap();

    let updated = update_event(
        &store,
        created.id,
        CalendarEventPatch {
            status: Some(EventStatus::Scheduled),
            ..CalendarEventPatch::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.status, EventStatus::Scheduled);
    assert_eq!(get_event(&store, created.id).await.unwrap().status, EventStatus::Scheduled);

    delete_event(&store, created.id).await.unwrap();
    assert!(matches!(
        get_event(&store, created.id).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn invalid_update_is_not_persisted() {
    let (_dir, store) = store().await;
    let created = create_event(&store, event("Lookbook", "2026-03-02T12:00:00Z", None))
        .await
        .unwrap();

    let err = update_event(
        &store,
        created.id,
        CalendarEventPatch {
            ends_at: Some("2026-01-01T00:00:00Z".parse().unwrap()),
            ..CalendarEventPatch::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(get_event(&store, created.id).await.unwrap(), created);
}

#[tokio::test]
async fn range_includes_overlapping_multi_day_events() {
    let (_dir, store) = store().await;
    create_event(&store, event("Before", "2026-02-20T10:00:00Z", None))
        .await
        .unwrap();
    create_event(
        &store,
        event("Pop-up", "2026-02-27T10:00:00Z", Some("2026-03-03T18:00:00Z")),
    )
    .await
    .unwrap();
    create_event(&store, event("Inside", "2026-03-10T10:00:00Z", None))
        .await
        .unwrap();
    create_event(&store, event("After", "2026-04-01T00:00:00Z", None))
        .await
        .unwrap();

    let march = calendar_view(
        &store,
        CalendarView::Month,
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
    )
    .await
    .unwrap();
    let titles: Vec<_> = march.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Pop-up", "Inside"]);
    assert_eq!(march.start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    assert_eq!(march.end, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());

    let day = events_in_range(
        &store,
        "2026-03-10T00:00:00Z".parse().unwrap(),
        "2026-03-11T00:00:00Z".parse().unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].title, "Inside");
}

#[tokio::test]
async fn agency_update_validates() {
    let (_dir, store) = store().await;
    let created = create_agency(&store, agency("Northside PR")).await.unwrap();

    let updated = update_agency(
        &store,
        created.id,
        AgencyPatch {
            specialty: Some("influencer seeding".into()),
            ..AgencyPatch::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.specialty.as_deref(), Some("influencer seeding"));

    let err = update_agency(
        &store,
        created.id,
        AgencyPatch {
            name: Some("  ".into()),
            ..AgencyPatch::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn project_requires_existing_agency() {
    let (_dir, store) = store().await;
    let err = create_project(
        &store,
        Uuid::new_v4(),
        NewProject {
            name: "FW26".into(),
            ..NewProject::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn deleting_agency_cascades_to_its_projects() {
    let (_dir, store) = store().await;
    let keep = create_agency(&store, agency("Keep Co")).await.unwrap();
    let drop_me = create_agency(&store, agency("Drop Co")).await.unwrap();

    for name in ["Lookbook", "Seeding"] {
        create_project(
            &store,
            drop_me.id,
            NewProject {
                name: name.into(),
                ..NewProject::default()
            },
        )
        .await
        .unwrap();
    }
    create_project(
        &store,
        keep.id,
        NewProject {
            name: "Retail windows".into(),
            ..NewProject::default()
        },
    )
    .await
    .unwrap();

    let (removed, project_count) = delete_agency(&store, drop_me.id).await.unwrap();
    assert_eq!(removed.id, drop_me.id);
    assert_eq!(project_count, 2);

    assert!(matches!(
        get_agency(&store, drop_me.id).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        list_projects(&store, drop_me.id).await,
        Err(StoreError::NotFound)
    ));
    let kept = list_projects(&store, keep.id).await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Retail windows");
}

#[tokio::test]
async fn failed_project_write_keeps_the_agency() {
    let (dir, store) = store().await;
    let target = create_agency(&store, agency("Stuck Co")).await.unwrap();
    create_project(
        &store,
        target.id,
        NewProject {
            name: "Capsule".into(),
            ..NewProject::default()
        },
    )
    .await
    .unwrap();

    // A directory squatting on the temp path makes the projects write fail.
    let blocker = dir.path().join(".projects.json.tmp");
    std::fs::create_dir(&blocker).unwrap();
    assert!(delete_agency(&store, target.id).await.is_err());
    assert_eq!(get_agency(&store, target.id).await.unwrap().id, target.id);
    assert_eq!(list_projects(&store, target.id).await.unwrap().len(), 1);

    std::fs::remove_dir(&blocker).unwrap();
    let (_, removed) = delete_agency(&store, target.id).await.unwrap();
    assert_eq!(removed, 1);
    assert!(list_agencies(&store).await.unwrap().is_empty());
}
