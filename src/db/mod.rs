use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;

use crate::models::custom_field::CustomFieldRow;
use crate::models::event::EventRow;
use crate::models::registration::{AnswerRow, RegistrationRow};
use crate::models::{Answer, CalendarEvent, CustomField, NewCalendarEvent, Registration};

const EVENT_COLUMNS: &str = "id, name, user_id, created, starts, ends, \
     registration_starts, registration_ends, cancellation_starts, cancellation_ends, \
     location, category, description, price, organizer, organizer_url";

/// Accepts a full datetime or a bare date (taken as midnight), matching the
/// stored `DATETIME` string format.
pub fn parse_from_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

const USER_EVENTS_SQL: &str =
    "SELECT e.id, e.name, e.user_id, e.created, e.starts, e.ends, \
            e.registration_starts, e.registration_ends, \
            e.cancellation_starts, e.cancellation_ends, \
            e.location, e.category, e.description, r.price AS price, \
            e.organizer, e.organizer_url \
     FROM registrations r \
     INNER JOIN calendar_events e ON e.id = r.event_id \
     WHERE r.user_id = ?";

/// Listing query: non-deleted, non-template events ordered by start time,
/// with an optional lower bound on `starts`.
fn events_listing_sql(bounded: bool) -> String {
    let from_clause = if bounded { " AND starts >= ?" } else { "" };
    format!(
        "SELECT {EVENT_COLUMNS} FROM calendar_events \
         WHERE deleted = 0 AND template = 0{from_clause} \
         ORDER BY starts ASC"
    )
}

/// All non-deleted, non-template events ordered by start time, optionally
/// bounded below by `from`.
pub async fn all_events(
    pool: &MySqlPool,
    from: Option<NaiveDateTime>,
) -> Result<Vec<CalendarEvent>, sqlx::Error> {
    let sql = events_listing_sql(from.is_some());
    let mut query = sqlx::query_as(&sql);
    if let Some(from) = from {
        query = query.bind(from);
    }
    let rows: Vec<EventRow> = query.fetch_all(pool).await?;

    Ok(rows.into_iter().map(CalendarEvent::from).collect())
}

/// Events the given user has registered for, with the registration's price
/// in place of the event's. A double registration yields the event twice.
pub async fn events_for_user(
    pool: &MySqlPool,
    user_id: i64,
) -> Result<Vec<CalendarEvent>, sqlx::Error> {
    let rows: Vec<EventRow> = sqlx::query_as(USER_EVENTS_SQL)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(CalendarEvent::from).collect())
}

pub async fn custom_fields_for_event(
    pool: &MySqlPool,
    event_id: i64,
) -> Result<Vec<CustomField>, sqlx::Error> {
    let rows: Vec<CustomFieldRow> = sqlx::query_as(
        "SELECT id, event_id, name, type, options FROM custom_fields WHERE event_id = ?",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CustomField::from).collect())
}

/// Registrations for an event with their answers attached. Two queries plus
/// an in-memory group-by; no transaction is taken, so a write landing
/// between the selects can surface a registration with missing answers.
pub async fn registrations_for_event(
    pool: &MySqlPool,
    event_id: i64,
) -> Result<Vec<Registration>, sqlx::Error> {
    let rows: Vec<RegistrationRow> = sqlx::query_as(
        "SELECT r.id, r.event_id, r.user_id, \
                COALESCE(r.name, u.name) AS name, \
                COALESCE(r.email, u.email) AS email, \
                r.phone, r.created \
         FROM registrations r \
         LEFT JOIN users u ON u.id = r.user_id \
         WHERE r.event_id = ?",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let answers = answers_for_registrations(pool, &ids).await?;
    let mut grouped = group_answers(answers);

    Ok(rows
        .into_iter()
        .map(|row| {
            let answers = grouped.remove(&row.id).unwrap_or_default();
            row.into_registration(answers)
        })
        .collect())
}

async fn answers_for_registrations(
    pool: &MySqlPool,
    registration_ids: &[i64],
) -> Result<Vec<AnswerRow>, sqlx::Error> {
    // MySQL has no array binds; expand one placeholder per id.
    let placeholders = vec!["?"; registration_ids.len()].join(",");
    let sql = format!(
        "SELECT a.registration_id, a.custom_field_id AS question_id, \
                f.name AS question, a.answer \
         FROM custom_field_answers a \
         INNER JOIN custom_fields f ON f.id = a.custom_field_id \
         WHERE a.registration_id IN ({placeholders})"
    );

    let mut query = sqlx::query_as(&sql);
    for id in registration_ids {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

fn group_answers(rows: Vec<AnswerRow>) -> HashMap<i64, Vec<Answer>> {
    let mut grouped: HashMap<i64, Vec<Answer>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.registration_id)
            .or_default()
            .push(Answer::from(row));
    }
    grouped
}

/// Inserts a new event row and returns its generated id.
pub async fn create_event(
    pool: &MySqlPool,
    event: NewCalendarEvent,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO calendar_events \
            (name, user_id, created, starts, ends, \
             registration_starts, registration_ends, \
             cancellation_starts, cancellation_ends, \
             location, category, description, price, \
             organizer, organizer_url, deleted, template) \
         VALUES (?, ?, NOW(), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(event.name)
    .bind(event.user_id)
    .bind(event.starts)
    .bind(event.ends)
    .bind(event.registration_starts)
    .bind(event.registration_ends)
    .bind(event.cancellation_starts)
    .bind(event.cancellation_ends)
    .bind(event.location)
    .bind(event.category)
    .bind(event.description)
    .bind(event.price)
    .bind(event.organizer)
    .bind(event.organizer_url)
    .bind(event.template)
    .execute(pool)
    .await?;

    generated_id(result.last_insert_id())
}

fn generated_id(raw: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn answer_row(registration_id: i64, question_id: i64, answer: &str) -> AnswerRow {
        AnswerRow {
            registration_id,
            question_id,
            question: format!("Question {question_id}"),
            answer: Some(answer.to_string()),
        }
    }

    #[test]
    fn listing_excludes_deleted_and_template_rows_in_start_order() {
        for bounded in [false, true] {
            let sql = events_listing_sql(bounded);
            assert!(sql.contains("deleted = 0 AND template = 0"), "sql: {sql}");
            assert!(sql.ends_with("ORDER BY starts ASC"), "sql: {sql}");
        }
    }

    #[test]
    fn listing_lower_bound_is_inclusive_on_starts() {
        let bounded = events_listing_sql(true);
        assert!(bounded.contains("starts >= ?"), "sql: {bounded}");
        assert_eq!(bounded.matches('?').count(), 1);

        let unbounded = events_listing_sql(false);
        assert!(!unbounded.contains('?'), "sql: {unbounded}");
    }

    #[test]
    fn user_events_join_takes_price_from_registration() {
        assert!(USER_EVENTS_SQL.contains("r.price AS price"));
        assert!(!USER_EVENTS_SQL.contains("e.price"));
        assert!(USER_EVENTS_SQL.contains("INNER JOIN calendar_events e ON e.id = r.event_id"));
        assert!(USER_EVENTS_SQL.contains("WHERE r.user_id = ?"));
    }

    #[test]
    fn generated_id_rejects_out_of_range_values() {
        assert_eq!(generated_id(42).unwrap(), 42);
        assert!(matches!(
            generated_id(u64::MAX),
            Err(sqlx::Error::Decode(_))
        ));
    }

    #[test]
    fn from_date_accepts_datetime_and_bare_date() {
        let full = parse_from_date("2024-01-01T12:30:00").unwrap();
        assert_eq!(full.format("%H:%M:%S").to_string(), "12:30:00");

        let midnight = parse_from_date("2024-01-01").unwrap();
        assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");

        assert!(parse_from_date("next tuesday").is_none());
    }

    #[test]
    fn answers_group_by_registration_without_leakage() {
        let grouped = group_answers(vec![
            answer_row(1, 10, "Yes"),
            answer_row(2, 10, "No"),
            answer_row(1, 11, "Vegan"),
        ]);

        let first = &grouped[&1];
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|a| a.question_id == 10 || a.question_id == 11));

        let second = &grouped[&2];
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].answer.as_deref(), Some("No"));

        assert!(!grouped.contains_key(&3));
    }

    #[test]
    fn registration_without_answers_gets_empty_list() {
        let row = RegistrationRow {
            id: 9,
            event_id: 5,
            user_id: None,
            name: Some("Guest".to_string()),
            email: None,
            phone: None,
            created: NaiveDateTime::parse_from_str("2024-01-05T08:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
        };

        let mut grouped = group_answers(Vec::new());
        let registration = row.into_registration(grouped.remove(&9).unwrap_or_default());
        assert!(registration.answers.is_empty());

        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["answers"], serde_json::json!([]));
        assert_eq!(json["event_id"], serde_json::json!(5));
    }
}
