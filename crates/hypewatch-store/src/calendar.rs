//! Store operations for the `calendar_events` collection.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{CalendarEvent, CalendarEventPatch, NewCalendarEvent};
use crate::{JsonStore, StoreError};

/// Calendar page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    Month,
}

impl std::str::FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(CalendarView::Day),
            "week" => Ok(CalendarView::Week),
            "month" => Ok(CalendarView::Month),
            other => Err(format!("view must be day, week, or month, got '{other}'")),
        }
    }
}

impl CalendarView {
    /// Half-open `[start, end)` window containing `anchor`.
    ///
    /// Weeks start on Monday. Months run from the 1st to the 1st. Returns
    /// `None` when the window would fall outside the representable dates.
    #[must_use]
    pub fn window(self, anchor: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = match self {
            CalendarView::Day => anchor,
            CalendarView::Week => anchor.checked_sub_days(Days::new(u64::from(
                anchor.weekday().num_days_from_monday(),
            )))?,
            CalendarView::Month => anchor.with_day(1)?,
        };
        let end = match self {
            CalendarView::Day => start.checked_add_days(Days::new(1))?,
            CalendarView::Week => start.checked_add_days(Days::new(7))?,
            CalendarView::Month => start.checked_add_months(Months::new(1))?,
        };
        Some((start, end))
    }
}

/// Events falling in one calendar page.
#[derive(Debug, Clone, Serialize)]
pub struct ViewWindow {
    pub view: CalendarView,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// All events ordered by start time.
///
/// # Errors
///
/// Returns [`StoreError`] if the collection cannot be read.
pub async fn list_events(store: &JsonStore) -> Result<Vec<CalendarEvent>, StoreError> {
    let mut events: Vec<CalendarEvent> = store.list().await?;
    events.sort_by_key(|e| e.starts_at);
    Ok(events)
}

/// # Errors
///
/// Returns [`StoreError::NotFound`] if no event has `id`.
pub async fn get_event(store: &JsonStore, id: Uuid) -> Result<CalendarEvent, StoreError> {
    store.get(id).await
}

/// # Errors
///
/// Returns [`StoreError::Validation`] for an invalid payload, or an I/O error.
pub async fn create_event(
    store: &JsonStore,
    new: NewCalendarEvent,
) -> Result<CalendarEvent, StoreError> {
    let event = CalendarEvent::from_new(new)?;
    let event = store.insert(event).await?;
    tracing::info!(event_id = %event.id, title = %event.title, "calendar event created");
    Ok(event)
}

/// # Errors
///
/// Returns [`StoreError::NotFound`] or [`StoreError::Validation`].
pub async fn update_event(
    store: &JsonStore,
    id: Uuid,
    patch: CalendarEventPatch,
) -> Result<CalendarEvent, StoreError> {
    store
        .modify(id, |event: &mut CalendarEvent| event.apply(patch))
        .await
}

/// # Errors
///
/// Returns [`StoreError::NotFound`] if no event has `id`.
pub async fn delete_event(store: &JsonStore, id: Uuid) -> Result<CalendarEvent, StoreError> {
    let removed = store.remove::<CalendarEvent>(id).await?;
    tracing::info!(event_id = %id, "calendar event deleted");
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Range queries
// ---------------------------------------------------------------------------

/// Events overlapping the half-open range `[from, to)`, ordered by start.
///
/// An event overlaps when it starts before `to` and ends at or after `from`.
///
/// # Errors
///
/// Returns [`StoreError`] if the collection cannot be read.
pub async fn events_in_range(
    store: &JsonStore,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>, StoreError> {
    let events = list_events(store).await?;
    Ok(events
        .into_iter()
        .filter(|e| e.starts_at < to && e.end() >= from)
        .collect())
}

/// The day, week, or month page containing `anchor`, in UTC.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] when `anchor` is too close to the
/// calendar limits to build a window, or an I/O error if the collection
/// cannot be read.
pub async fn calendar_view(
    store: &JsonStore,
    view: CalendarView,
    anchor: NaiveDate,
) -> Result<ViewWindow, StoreError> {
    let (start, end) = view.window(anchor).ok_or_else(|| {
        StoreError::Validation(format!("date {anchor} is out of range for a {view:?} view"))
    })?;
    let events = events_in_range(store, midnight(start), midnight(end)).await?;
    Ok(ViewWindow {
        view,
        start,
        end,
        events,
    })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
