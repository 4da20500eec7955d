use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::models::{CalendarEvent, CustomField, NewCalendarEvent, Registration};
use crate::utils::error::AppError;
use crate::AppState;

pub async fn ping() -> &'static str {
    "pong"
}

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedEvent {
    pub id: i64,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventsQuery>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let from = match params.from_date.as_deref() {
        Some(raw) => Some(
            db::parse_from_date(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid fromDate '{raw}'")))?,
        ),
        None => None,
    };

    let events = db::all_events(&state.pool, from).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<NewCalendarEvent>,
) -> Result<Json<CreatedEvent>, AppError> {
    let id = db::create_event(&state.pool, payload).await?;
    Ok(Json(CreatedEvent { id }))
}

pub async fn list_user_events(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let events = db::events_for_user(&state.pool, user_id).await?;
    Ok(Json(events))
}

pub async fn list_event_registrations(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<Registration>>, AppError> {
    let registrations = db::registrations_for_event(&state.pool, event_id).await?;
    Ok(Json(registrations))
}

pub async fn list_event_fields(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<CustomField>>, AppError> {
    let fields = db::custom_fields_for_event(&state.pool, event_id).await?;
    Ok(Json(fields))
}
