pub mod custom_field;
pub mod event;
pub mod registration;

pub use custom_field::{CustomField, FieldType};
pub use event::{CalendarEvent, NewCalendarEvent, Organizer};
pub use registration::{Answer, Registration};

/// `DATETIME` columns are stored without a timezone and rendered to clients
/// as `YYYY-MM-DDTHH:MM:SS` strings. The driver hands rows over as
/// `chrono::NaiveDateTime`; these serde modules pin the wire format.
pub mod iso_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Variant of [`iso_datetime`] for nullable columns.
pub mod iso_datetime_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::iso_datetime::FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&value.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|raw| NaiveDateTime::parse_from_str(&raw, FORMAT))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super::iso_datetime")]
        at: NaiveDateTime,
        #[serde(default, with = "super::iso_datetime_opt")]
        maybe: Option<NaiveDateTime>,
    }

    #[test]
    fn datetimes_serialize_with_t_separator() {
        let stamped = Stamped {
            at: NaiveDateTime::parse_from_str("2024-02-01 18:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
            maybe: None,
        };

        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"at":"2024-02-01T18:30:00","maybe":null}"#);
    }

    #[test]
    fn datetimes_round_trip_from_wire_format() {
        let stamped: Stamped =
            serde_json::from_str(r#"{"at":"2024-02-01T18:30:00","maybe":"2024-03-01T09:00:00"}"#)
                .unwrap();

        assert_eq!(stamped.at.format("%H:%M").to_string(), "18:30");
        assert!(stamped.maybe.is_some());
    }
}
