use std::{
    collections::{btree_map, BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{Duration, SubsecRound, Utc};
use kanban_api::{
    validate_content, AuthToken, BoardId, Comment, CommentGateway, CommentId, Error, Identity,
    NewComment, Session, Time,
};
use parking_lot::{Mutex, MutexGuard};

pub type SharedServer = Arc<Mutex<MockServer>>;

/// In-memory stand-in for the board backend
pub struct MockServer {
    users: BTreeMap<String, MockUser>,
    sessions: HashMap<AuthToken, String>,
    boards: BTreeMap<BoardId, MockBoard>,
    next_comment_id: i64,
    next_token: u64,
    clock: Time,
    calls: Vec<Call>,
    faults: Vec<(CallKind, Error)>,
}

#[derive(Debug)]
struct MockUser {
    identity: Identity,
    password: String,
}

#[derive(Debug)]
struct MockBoard {
    title: String,
    // in creation order
    comments: Vec<Comment>,
}

/// A call received through a `MockGateway`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    List(BoardId),
    Create(BoardId, NewComment),
    Update(BoardId, CommentId, NewComment),
    Delete(BoardId, CommentId),
    ListMine,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
    List,
    Create,
    Update,
    Delete,
    ListMine,
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Call::List(_) => CallKind::List,
            Call::Create(..) => CallKind::Create,
            Call::Update(..) => CallKind::Update,
            Call::Delete(..) => CallKind::Delete,
            Call::ListMine => CallKind::ListMine,
        }
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            sessions: HashMap::new(),
            boards: BTreeMap::new(),
            next_comment_id: 1,
            next_token: 1,
            clock: Utc::now().trunc_subsecs(0),
            calls: Vec::new(),
            faults: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedServer {
        Arc::new(Mutex::new(self))
    }

    /// Current server time. Every write moves it forward by one second, so
    /// that an edit is always visible in `updated_at`.
    pub fn now(&self) -> Time {
        self.clock
    }

    pub fn set_now(&mut self, t: Time) {
        self.clock = t;
    }

    pub fn advance(&mut self, d: Duration) {
        self.clock = self.clock + d;
    }

    fn stamp(&mut self) -> Time {
        self.clock = self.clock + Duration::seconds(1);
        self.clock
    }

    /// All the calls received through gateways so far
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    /// Makes the next gateway call of kind `kind` fail with `err`
    pub fn fail_next(&mut self, kind: CallKind, err: Error) {
        self.faults.push((kind, err));
    }

    fn take_fault(&mut self, kind: CallKind) -> Option<Error> {
        let idx = self.faults.iter().position(|(k, _)| *k == kind)?;
        Some(self.faults.remove(idx).1)
    }

    pub fn admin_create_user(&mut self, name: &str, password: &str) -> Result<(), Error> {
        match self.users.entry(String::from(name)) {
            btree_map::Entry::Occupied(_) => Err(Error::Server {
                status: 409,
                message: Some(format!("username {name:?} is already used")),
            }),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(MockUser {
                    identity: Identity::new(name),
                    password: String::from(password),
                });
                Ok(())
            }
        }
    }

    pub fn admin_create_board(&mut self, id: BoardId, title: &str) -> Result<(), Error> {
        match self.boards.entry(id) {
            btree_map::Entry::Occupied(_) => Err(Error::Server {
                status: 409,
                message: Some(format!("board {id} already exists")),
            }),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(MockBoard {
                    title: String::from(title),
                    comments: Vec::new(),
                });
                Ok(())
            }
        }
    }

    pub fn login(&mut self, name: &str, password: &str) -> Result<Session, Error> {
        let user = self.users.get(name).ok_or(Error::Unauthenticated(None))?;
        if user.password != password {
            return Err(Error::Unauthenticated(None));
        }
        let identity = user.identity.clone();
        let tok = AuthToken(format!("mock-token-{}", self.next_token));
        self.next_token += 1;
        self.sessions.insert(tok.clone(), String::from(name));
        Ok(Session::logged_in(tok, identity))
    }

    pub fn logout(&mut self, tok: &AuthToken) -> Result<(), Error> {
        self.sessions
            .remove(tok)
            .map(|_| ())
            .ok_or(Error::Unauthenticated(None))
    }

    fn resolve(&self, tok: Option<&AuthToken>) -> Result<&MockUser, Error> {
        tok.and_then(|t| self.sessions.get(t))
            .and_then(|name| self.users.get(name))
            .ok_or(Error::Unauthenticated(None))
    }

    pub fn whoami(&self, tok: &AuthToken) -> Result<Identity, Error> {
        Ok(self.resolve(Some(tok))?.identity.clone())
    }

    fn board_mut(&mut self, board: BoardId) -> Result<&mut MockBoard, Error> {
        self.boards.get_mut(&board).ok_or(Error::NotFound(None))
    }

    pub fn list_comments(&self, board: BoardId) -> Result<Vec<Comment>, Error> {
        Ok(self
            .boards
            .get(&board)
            .ok_or(Error::NotFound(None))?
            .comments
            .clone())
    }

    pub fn create_comment(
        &mut self,
        tok: Option<&AuthToken>,
        board: BoardId,
        c: NewComment,
    ) -> Result<Comment, Error> {
        let author = self.resolve(tok)?.identity.username.clone();
        validate_on_server(&c)?;
        self.board_mut(board)?;
        let now = self.stamp();
        let comment = Comment {
            id: CommentId(self.next_comment_id),
            content: c.content,
            board_id: board,
            board_title: None,
            author_username: author,
            created_at: now,
            updated_at: now,
        };
        self.next_comment_id += 1;
        self.board_mut(board)?.comments.push(comment.clone());
        tracing::debug!(?comment, "mock server created comment");
        Ok(comment)
    }

    pub fn update_comment(
        &mut self,
        tok: Option<&AuthToken>,
        board: BoardId,
        id: CommentId,
        c: NewComment,
    ) -> Result<Comment, Error> {
        let user = self.resolve(tok)?.identity.username.clone();
        validate_on_server(&c)?;
        let now = self.stamp();
        let comment = self
            .board_mut(board)?
            .comments
            .iter_mut()
            .find(|comment| comment.id == id)
            .ok_or(Error::NotFound(None))?;
        if comment.author_username != user {
            return Err(Error::PermissionDenied(None));
        }
        comment.content = c.content;
        comment.updated_at = now;
        Ok(comment.clone())
    }

    pub fn delete_comment(
        &mut self,
        tok: Option<&AuthToken>,
        board: BoardId,
        id: CommentId,
    ) -> Result<(), Error> {
        let user = self.resolve(tok)?.identity.username.clone();
        let comments = &mut self.board_mut(board)?.comments;
        let idx = comments
            .iter()
            .position(|comment| comment.id == id)
            .ok_or(Error::NotFound(None))?;
        if comments[idx].author_username != user {
            return Err(Error::PermissionDenied(None));
        }
        comments.remove(idx);
        Ok(())
    }

    pub fn list_my_comments(&self, tok: Option<&AuthToken>) -> Result<Vec<Comment>, Error> {
        let user = &self.resolve(tok)?.identity.username;
        let mut res = self
            .boards
            .values()
            .flat_map(|b| {
                b.comments
                    .iter()
                    .filter(|c| &c.author_username == user)
                    .map(|c| Comment {
                        board_title: Some(b.title.clone()),
                        ..c.clone()
                    })
            })
            .collect::<Vec<_>>();
        res.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(res)
    }
}

fn validate_on_server(c: &NewComment) -> Result<(), Error> {
    validate_content(&c.content).map_err(|e| Error::Server {
        status: 400,
        message: Some(e.to_string()),
    })
}

/// `CommentGateway` acting as one session against a shared `MockServer`
#[derive(Clone)]
pub struct MockGateway {
    server: SharedServer,
    token: Option<AuthToken>,
}

impl MockGateway {
    pub fn new(server: &SharedServer, session: &Session) -> MockGateway {
        MockGateway {
            server: server.clone(),
            token: session.token.clone(),
        }
    }

    pub fn anonymous(server: &SharedServer) -> MockGateway {
        MockGateway::new(server, &Session::anonymous())
    }

    fn enter(&self, call: Call) -> Result<MutexGuard<'_, MockServer>, Error> {
        let mut server = self.server.lock();
        let kind = call.kind();
        server.calls.push(call);
        match server.take_fault(kind) {
            Some(err) => Err(err),
            None => Ok(server),
        }
    }
}

#[async_trait(?Send)]
impl CommentGateway for MockGateway {
    async fn list(&self, board: BoardId) -> Result<Vec<Comment>, Error> {
        self.enter(Call::List(board))?.list_comments(board)
    }

    async fn create(&self, board: BoardId, comment: &NewComment) -> Result<(), Error> {
        let mut server = self.enter(Call::Create(board, comment.clone()))?;
        comment.validate()?;
        server
            .create_comment(self.token.as_ref(), board, comment.clone())
            .map(|_| ())
    }

    async fn update(
        &self,
        board: BoardId,
        id: CommentId,
        comment: &NewComment,
    ) -> Result<(), Error> {
        let mut server = self.enter(Call::Update(board, id, comment.clone()))?;
        comment.validate()?;
        server
            .update_comment(self.token.as_ref(), board, id, comment.clone())
            .map(|_| ())
    }

    async fn delete(&self, board: BoardId, id: CommentId) -> Result<(), Error> {
        self.enter(Call::Delete(board, id))?
            .delete_comment(self.token.as_ref(), board, id)
    }

    async fn list_mine(&self) -> Result<Vec<Comment>, Error> {
        self.enter(Call::ListMine)?
            .list_my_comments(self.token.as_ref())
    }
}
