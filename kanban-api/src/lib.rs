use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

mod comment;
pub use comment::{validate_content, BoardId, Comment, CommentId, ContentError, NewComment};

mod error;
pub use error::Error;

mod gateway;
pub use gateway::CommentGateway;

mod session;
pub use session::{AuthToken, Identity, Session};

pub type Time = DateTime<Utc>;

/// Maximum length of a comment, in characters, after trimming
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Parses an ISO-8601 timestamp as sent by the backend.
///
/// Offset-less local date-times (`2024-01-15T10:30:00`) are read as UTC.
pub fn parse_time(s: &str) -> Result<Time, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(t) => Ok(t.with_timezone(&Utc)),
        Err(e) => s
            .parse::<NaiveDateTime>()
            .map(|t| Utc.from_utc_datetime(&t))
            .map_err(|_| e),
    }
}

pub(crate) mod wire_time {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::Time;

    pub fn serialize<S: Serializer>(t: &Time, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Time, D::Error> {
        let s = String::deserialize(d)?;
        crate::parse_time(&s).map_err(serde::de::Error::custom)
    }
}
