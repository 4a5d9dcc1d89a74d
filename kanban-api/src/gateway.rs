use async_trait::async_trait;

use crate::{BoardId, Comment, CommentId, Error, NewComment};

/// Access to the comments of boards.
///
/// None of the mutating calls return the new server state: callers that
/// display comments must `list` again after a successful mutation.
#[async_trait(?Send)]
pub trait CommentGateway {
    /// Lists all the comments of `board`, in server order (oldest first)
    async fn list(&self, board: BoardId) -> Result<Vec<Comment>, Error>;

    async fn create(&self, board: BoardId, comment: &NewComment) -> Result<(), Error>;

    /// Only the author of the comment may update it
    async fn update(
        &self,
        board: BoardId,
        id: CommentId,
        comment: &NewComment,
    ) -> Result<(), Error>;

    /// Only the author of the comment may delete it
    async fn delete(&self, board: BoardId, id: CommentId) -> Result<(), Error>;

    /// Lists the current user's comments across all boards, newest first
    async fn list_mine(&self) -> Result<Vec<Comment>, Error>;
}
