use std::fmt;

use crate::{Error, Time, MAX_CONTENT_CHARS};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct BoardId(pub i64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub board_id: BoardId,

    /// Only filled in on listings that span multiple boards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_title: Option<String>,

    pub author_username: String,

    #[serde(with = "crate::wire_time")]
    pub created_at: Time,

    /// Equal to `created_at` until the first edit
    #[serde(with = "crate::wire_time")]
    pub updated_at: Time,
}

impl Comment {
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub content: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>) -> NewComment {
        NewComment {
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        Ok(validate_content(&self.content)?)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("comment is empty")]
    Empty,

    #[error("comment is too long ({len} characters)")]
    TooLong { len: usize },
}

pub fn validate_content(content: &str) -> Result<(), ContentError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ContentError::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_CONTENT_CHARS {
        return Err(ContentError::TooLong { len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn content_bounds() {
        assert_eq!(validate_content(""), Err(ContentError::Empty));
        assert_eq!(validate_content(" \n\t "), Err(ContentError::Empty));
        assert_eq!(validate_content("  hi  "), Ok(()));

        // surrounding whitespace does not count towards the limit
        let max = format!("   {}   ", "가".repeat(MAX_CONTENT_CHARS));
        assert_eq!(validate_content(&max), Ok(()));
        let over = "a".repeat(MAX_CONTENT_CHARS + 1);
        assert_eq!(
            validate_content(&over),
            Err(ContentError::TooLong {
                len: MAX_CONTENT_CHARS + 1
            })
        );
        assert_eq!(
            NewComment::new("   ").validate(),
            Err(Error::Validation(ContentError::Empty))
        );
    }

    #[test]
    fn wire_shape() {
        let c: Comment = serde_json::from_str(
            r#"{
                "id": 3,
                "content": "hello",
                "boardId": 7,
                "authorUsername": "A",
                "createdAt": "2024-01-15T10:30:00",
                "updatedAt": "2024-01-15T11:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(c.id, CommentId(3));
        assert_eq!(c.board_id, BoardId(7));
        assert_eq!(c.board_title, None);
        assert_eq!(c.author_username, "A");
        assert_eq!(
            c.created_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
        assert!(c.is_edited());

        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["authorUsername"], "A");
        assert_eq!(json["createdAt"], "2024-01-15T10:30:00Z");
        assert!(json.get("boardTitle").is_none());
    }

    #[test]
    fn wire_shape_with_board_title() {
        let c: Comment = serde_json::from_str(
            r#"{
                "id": 1,
                "content": "x",
                "boardId": 2,
                "boardTitle": "Release planning",
                "authorUsername": "bob",
                "createdAt": "2024-01-15T10:30:00Z",
                "updatedAt": "2024-01-15T10:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(c.board_title.as_deref(), Some("Release planning"));
        assert!(!c.is_edited());
    }
}
