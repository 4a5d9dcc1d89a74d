use crate::api::{BoardId, Comment, CommentGateway, CommentId, Error, NewComment};

/// Why a list fetch was issued
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Refresh {
    Mount,
    AfterCreate,
    AfterUpdate,
    AfterDelete,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Op {
    List(Refresh),
    Create(NewComment),
    Update(CommentId, NewComment),
    Delete(CommentId),
}

/// A gateway call that a `CommentList` asks its host to perform
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub board: BoardId,
    pub op: Op,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Listed(Refresh, Result<Vec<Comment>, Error>),
    Created(Result<(), Error>),
    Updated(CommentId, Result<(), Error>),
    Deleted(CommentId, Result<(), Error>),
}

/// The result of a `Request`, to be fed back into `CommentList::complete`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    pub board: BoardId,
    pub outcome: Outcome,
}

pub async fn perform<G>(gateway: &G, req: Request) -> Response
where
    G: CommentGateway + ?Sized,
{
    let board = req.board;
    tracing::trace!(?req, "performing comment request");
    let outcome = match req.op {
        Op::List(why) => Outcome::Listed(why, gateway.list(board).await),
        Op::Create(c) => Outcome::Created(gateway.create(board, &c).await),
        Op::Update(id, c) => Outcome::Updated(id, gateway.update(board, id, &c).await),
        Op::Delete(id) => Outcome::Deleted(id, gateway.delete(board, id).await),
    };
    Response { board, outcome }
}
