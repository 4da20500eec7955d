use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use super::iso_datetime;

/// Registration joined to its user account. Name and email fall back to the
/// account's values in SQL when the registration row leaves them null.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: i64,
    pub event_id: i64,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created: NaiveDateTime,
}

/// Answer row joined to its custom-field definition.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerRow {
    pub registration_id: i64,
    pub question_id: i64,
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub question_id: i64,
    pub question: String,
    pub answer: Option<String>,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Self {
            question_id: row.question_id,
            question: row.question,
            answer: row.answer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(with = "iso_datetime")]
    pub created: NaiveDateTime,
    /// Always a list; registrations without answers get an empty one.
    pub answers: Vec<Answer>,
}

impl RegistrationRow {
    pub fn into_registration(self, answers: Vec<Answer>) -> Registration {
        Registration {
            id: self.id,
            event_id: self.event_id,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            created: self.created,
            answers,
        }
    }
}
