//! Serde helpers for `YYYY-MM-DD` calendar dates.

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime, UtcOffset};

pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its UTC date.
pub fn parse_flexible_date(s: &str) -> Option<Date> {
    parse_date(s).ok().or_else(|| {
        OffsetDateTime::parse(s.trim(), &Rfc3339)
            .ok()
            .map(|ts| ts.to_offset(UtcOffset::UTC).date())
    })
}

pub mod iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(date)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).map_err(|e| D::Error::custom(format!("invalid date {raw:?}: {e}")))
    }
}

pub mod iso_date_option {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.collect_str(d),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| {
                parse_date(&raw).map_err(|e| D::Error::custom(format!("invalid date {raw:?}: {e}")))
            })
            .transpose()
    }
}

/// Input-side due dates: older clients send full timestamps.
pub mod flexible_date_option {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        Option::<String>::deserialize(d)?
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                parse_flexible_date(&raw)
                    .ok_or_else(|| D::Error::custom(format!("invalid due date {raw:?}")))
            })
            .transpose()
    }
}
