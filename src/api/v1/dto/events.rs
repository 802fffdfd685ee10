/*
 * Responsibility
 * - request/response DTOs for events
 * - category/status enums live here; the DB stores their text form
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::repos::event_repo::EventRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Turf,
    Restaurant,
    Trip,
    Party,
    Custom,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Turf => "turf",
            Self::Restaurant => "restaurant",
            Self::Trip => "trip",
            Self::Party => "party",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for EventCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turf" => Ok(Self::Turf),
            "restaurant" => Ok(Self::Restaurant),
            "trip" => Ok(Self::Trip),
            "party" => Ok(Self::Party),
            "custom" => Ok(Self::Custom),
            _ => Err("unknown event category"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Active,
    Closed,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for EventStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err("unknown event status"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub category: EventCategory,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub due_pay_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub persons_count: i32,
    /// Omitted means the event starts as a draft.
    pub status: Option<EventStatus>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.persons_count < 1 {
            return Err("persons_count must be at least 1");
        }
        if self.end_date_time < self.start_date_time {
            return Err("end_date_time must not be before start_date_time");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub category: Option<EventCategory>,
    /// Present-and-null clears the description, absent leaves it untouched.
    #[serde(default, with = "super::serde_double_option")]
    pub description: Option<Option<String>>,
    pub event_date: Option<NaiveDate>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub due_pay_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub persons_count: Option<i32>,
    pub status: Option<EventStatus>,
}

impl UpdateEventRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(n) = self.persons_count
            && n < 1
        {
            return Err("persons_count must be at least 1");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SetEventStatusRequest {
    pub status: EventStatus,
}

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    #[serde(rename = "fromDate", alias = "from_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(rename = "toDate", alias = "to_date")]
    pub to_date: Option<NaiveDate>,
    pub status: Option<EventStatus>,
    pub category: Option<EventCategory>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub due_pay_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub persons_count: i32,
    pub status: String,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for EventResponse {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            description: row.description,
            event_date: row.event_date,
            start_date_time: row.start_date_time,
            end_date_time: row.end_date_time,
            due_pay_date: row.due_pay_date,
            latitude: row.latitude,
            longitude: row.longitude,
            persons_count: row.persons_count,
            status: row.status,
            created_by: row.created_by,
            created_by_name: row.created_by_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_through_text() {
        for c in [
            EventCategory::Turf,
            EventCategory::Restaurant,
            EventCategory::Trip,
            EventCategory::Party,
            EventCategory::Custom,
        ] {
            assert_eq!(c.as_str().parse::<EventCategory>().unwrap(), c);
        }
        assert!("picnic".parse::<EventCategory>().is_err());
    }

    #[test]
    fn create_request_keeps_client_status() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{
                "title": "Team dinner",
                "category": "restaurant",
                "event_date": "2026-09-01",
                "start_date_time": "2026-09-01T18:00:00Z",
                "end_date_time": "2026-09-01T21:00:00Z",
                "due_pay_date": "2026-09-05",
                "persons_count": 4,
                "status": "active"
            }"#,
        )
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.status, Some(EventStatus::Active));

        let without: CreateEventRequest = serde_json::from_str(
            r#"{
                "title": "Team dinner",
                "category": "restaurant",
                "event_date": "2026-09-01",
                "start_date_time": "2026-09-01T18:00:00Z",
                "end_date_time": "2026-09-01T21:00:00Z",
                "due_pay_date": "2026-09-05",
                "persons_count": 4
            }"#,
        )
        .unwrap();
        assert_eq!(without.status, None);
    }

    #[test]
    fn update_distinguishes_null_description_from_absent() {
        let absent: UpdateEventRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.description.is_none());

        let null: UpdateEventRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Cancelled).unwrap(),
            r#""cancelled""#
        );
        let s: EventStatus = serde_json::from_str(r#""draft""#).unwrap();
        assert_eq!(s, EventStatus::Draft);
    }
}
