use crate::api::{Comment, Session};

/// Whether `session` should be offered the edit and delete controls of
/// `comment`.
///
/// This only drives what the UI shows: the server checks authorship again on
/// every mutation.
pub fn can_mutate(session: &Session, comment: &Comment) -> bool {
    session.is_authenticated() && session.username() == Some(&comment.author_username as &str)
}
