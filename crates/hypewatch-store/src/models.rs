//! Record types and their create / update payloads.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Record, StoreError};

// ---------------------------------------------------------------------------
// Calendar events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Planned,
    Scheduled,
    Published,
    Cancelled,
}

/// A planned piece of content on the marketing calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Where the content goes out: `instagram`, `tiktok`, `email`, `retail` ...
    pub channel: String,
    pub status: EventStatus,
    pub brand_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub brand_slug: Option<String>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarEventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub channel: Option<String>,
    pub status: Option<EventStatus>,
    pub brand_slug: Option<String>,
}

impl CalendarEvent {
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank title or an end before
    /// the start.
    pub fn from_new(new: NewCalendarEvent) -> Result<Self, StoreError> {
        let now = Utc::now();
        let event = Self {
            id: Uuid::new_v4(),
            title: new.title.trim().to_string(),
            description: new.description,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            channel: new.channel.trim().to_lowercase(),
            status: new.status,
            brand_slug: new.brand_slug,
            created_at: now,
            updated_at: now,
        };
        event.validate()?;
        Ok(event)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the patched event is invalid; the
    /// event is left unchanged in that case.
    pub fn apply(&mut self, patch: CalendarEventPatch) -> Result<(), StoreError> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(starts_at) = patch.starts_at {
            next.starts_at = starts_at;
        }
        if patch.ends_at.is_some() {
            next.ends_at = patch.ends_at;
        }
        if let Some(channel) = patch.channel {
            next.channel = channel.trim().to_lowercase();
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if patch.brand_slug.is_some() {
            next.brand_slug = patch.brand_slug;
        }
        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }

    /// Last instant the event occupies; `starts_at` for point events.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.ends_at.unwrap_or(self.starts_at)
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("title", &self.title)?;
        if self.ends_at.is_some_and(|end| end < self.starts_at) {
            return Err(StoreError::Validation(
                "ends_at must not be before starts_at".to_string(),
            ));
        }
        Ok(())
    }
}

impl Record for CalendarEvent {
    const COLLECTION: &'static str = "calendar_events";

    fn id(&self) -> Uuid {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Agencies
// ---------------------------------------------------------------------------

/// An outside agency the brand works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub specialty: Option<String>,
    pub monthly_retainer: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAgency {
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub monthly_retainer: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgencyPatch {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub specialty: Option<String>,
    pub monthly_retainer: Option<Decimal>,
    pub notes: Option<String>,
}

impl Agency {
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank name, a malformed
    /// contact email, or a negative retainer.
    pub fn from_new(new: NewAgency) -> Result<Self, StoreError> {
        let now = Utc::now();
        let agency = Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            contact_email: new.contact_email,
            website: new.website,
            specialty: new.specialty,
            monthly_retainer: new.monthly_retainer,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        agency.validate()?;
        Ok(agency)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the patched agency is invalid.
    pub fn apply(&mut self, patch: AgencyPatch) -> Result<(), StoreError> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name.trim().to_string();
        }
        if patch.contact_email.is_some() {
            next.contact_email = patch.contact_email;
        }
        if patch.website.is_some() {
            next.website = patch.website;
        }
        if patch.specialty.is_some() {
            next.specialty = patch.specialty;
        }
        if patch.monthly_retainer.is_some() {
            next.monthly_retainer = patch.monthly_retainer;
        }
        if patch.notes.is_some() {
            next.notes = patch.notes;
        }
        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("name", &self.name)?;
        if let Some(email) = &self.contact_email {
            if !email.contains('@') {
                return Err(StoreError::Validation(format!(
                    "contact_email '{email}' is not an email address"
                )));
            }
        }
        require_non_negative("monthly_retainer", self.monthly_retainer)
    }
}

impl Record for Agency {
    const COLLECTION: &'static str = "agencies";

    fn id(&self) -> Uuid {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Proposed,
    Active,
    Completed,
    Cancelled,
}

/// A scoped piece of work under one agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub budget: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub deliverables: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

impl Project {
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank name or negative budget.
    pub fn from_new(agency_id: Uuid, new: NewProject) -> Result<Self, StoreError> {
        let now = Utc::now();
        let project = Self {
            id: Uuid::new_v4(),
            agency_id,
            name: new.name.trim().to_string(),
            status: new.status,
            budget: new.budget,
            due_date: new.due_date,
            deliverables: new
                .deliverables
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            created_at: now,
            updated_at: now,
        };
        require_non_empty("name", &project.name)?;
        require_non_negative("budget", project.budget)?;
        Ok(project)
    }
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Uuid {
        self.id
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Option<Decimal>) -> Result<(), StoreError> {
    if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
        return Err(StoreError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}
