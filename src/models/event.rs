use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{iso_datetime, iso_datetime_opt};

/// Flat `calendar_events` row as selected by the listing queries. The
/// `deleted` and `template` flags are filtered in SQL and never selected.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub user_id: Option<i64>,
    pub created: NaiveDateTime,
    pub starts: NaiveDateTime,
    pub ends: Option<NaiveDateTime>,
    pub registration_starts: Option<NaiveDateTime>,
    pub registration_ends: Option<NaiveDateTime>,
    pub cancellation_starts: Option<NaiveDateTime>,
    pub cancellation_ends: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub organizer: Option<String>,
    pub organizer_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Organizer {
    pub name: String,
    pub url: Option<String>,
}

/// Public event shape. For the per-user listing the `price` field carries
/// the registration's price rather than the event's.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub name: String,
    pub user_id: Option<i64>,
    #[serde(with = "iso_datetime")]
    pub created: NaiveDateTime,
    #[serde(with = "iso_datetime")]
    pub starts: NaiveDateTime,
    #[serde(with = "iso_datetime_opt")]
    pub ends: Option<NaiveDateTime>,
    #[serde(with = "iso_datetime_opt")]
    pub registration_starts: Option<NaiveDateTime>,
    #[serde(with = "iso_datetime_opt")]
    pub registration_ends: Option<NaiveDateTime>,
    #[serde(with = "iso_datetime_opt")]
    pub cancellation_starts: Option<NaiveDateTime>,
    #[serde(with = "iso_datetime_opt")]
    pub cancellation_ends: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub organizer: Option<Organizer>,
}

impl From<EventRow> for CalendarEvent {
    fn from(row: EventRow) -> Self {
        let organizer = row.organizer.map(|name| Organizer {
            name,
            url: row.organizer_url,
        });

        Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            created: row.created,
            starts: row.starts,
            ends: row.ends,
            registration_starts: row.registration_starts,
            registration_ends: row.registration_ends,
            cancellation_starts: row.cancellation_starts,
            cancellation_ends: row.cancellation_ends,
            location: row.location,
            category: row.category,
            description: row.description,
            price: row.price,
            organizer,
        }
    }
}

/// Insert payload for `POST /api/events`. Only `name` and `starts` are
/// required; the schema enforces everything else.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCalendarEvent {
    pub name: String,
    pub user_id: Option<i64>,
    #[serde(with = "iso_datetime")]
    pub starts: NaiveDateTime,
    #[serde(default, with = "iso_datetime_opt")]
    pub ends: Option<NaiveDateTime>,
    #[serde(default, with = "iso_datetime_opt")]
    pub registration_starts: Option<NaiveDateTime>,
    #[serde(default, with = "iso_datetime_opt")]
    pub registration_ends: Option<NaiveDateTime>,
    #[serde(default, with = "iso_datetime_opt")]
    pub cancellation_starts: Option<NaiveDateTime>,
    #[serde(default, with = "iso_datetime_opt")]
    pub cancellation_ends: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub organizer: Option<String>,
    pub organizer_url: Option<String>,
    #[serde(default)]
    pub template: bool,
}
