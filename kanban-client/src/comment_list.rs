use std::collections::{HashSet, VecDeque};

use chrono::TimeZone;

use crate::{
    api::{
        validate_content, BoardId, Comment, CommentGateway, CommentId, ContentError, NewComment,
        Session, Time,
    },
    can_mutate, perform, Locale, Op, Outcome, Refresh, Request, Response, TimeFormatter,
};

/// What the user currently sees the comment list doing.
///
/// Posting a comment and editing another one can overlap, in which case
/// `Submitting` is reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    Idle,
    Submitting,
    Editing(CommentId),
}

/// The single open edit draft of a `CommentList`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EditSession {
    pub id: CommentId,
    pub draft: String,
}

#[derive(Debug, Eq, PartialEq)]
pub struct CommentRow<'a> {
    pub comment: &'a Comment,
    pub mode: RowMode<'a>,
}

#[derive(Debug, Eq, PartialEq)]
pub enum RowMode<'a> {
    View {
        label: String,
        edited: bool,
        can_mutate: bool,
    },
    Edit {
        draft: &'a str,
        /// the update is in flight, the save control should be disabled
        saving: bool,
    },
}

/// The comments of one board, along with the drafts and submissions of the
/// user viewing them.
///
/// The list itself is only ever replaced wholesale by the result of a
/// `list` call: every successful mutation asks for a refetch instead of
/// patching the list locally. The methods never talk to the gateway
/// themselves, they return the `Request` the host must `perform` and whose
/// `Response` must be fed back through `complete`.
#[derive(Clone, Debug)]
pub struct CommentList {
    board: BoardId,
    locale: Locale,
    comments: Vec<Comment>,

    compose: String,
    submitting: bool,
    create_error: Option<String>,

    edit: Option<EditSession>,
    updating: Option<CommentId>,

    deleting: HashSet<CommentId>,

    alerts: VecDeque<String>, // push_back, pop_front
}

impl CommentList {
    /// Returns an empty list for `board` along with its initial fetch
    pub fn mount(board: BoardId, locale: Locale) -> (CommentList, Request) {
        let this = CommentList {
            board,
            locale,
            comments: Vec::new(),
            compose: String::new(),
            submitting: false,
            create_error: None,
            edit: None,
            updating: None,
            deleting: HashSet::new(),
            alerts: VecDeque::new(),
        };
        let req = this.request(Op::List(Refresh::Mount));
        (this, req)
    }

    fn request(&self, op: Op) -> Request {
        Request {
            board: self.board,
            op,
        }
    }

    pub fn board(&self) -> BoardId {
        self.board
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn state(&self) -> State {
        match (&self.edit, self.submitting) {
            (_, true) => State::Submitting,
            (Some(e), false) => State::Editing(e.id),
            (None, false) => State::Idle,
        }
    }

    pub fn editing_id(&self) -> Option<CommentId> {
        self.edit.as_ref().map(|e| e.id)
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn compose_draft(&self) -> &str {
        &self.compose
    }

    pub fn compose_counter(&self) -> String {
        self.locale.char_counter(self.compose.chars().count())
    }

    pub fn set_compose_draft(&mut self, text: impl Into<String>) {
        self.compose = text.into();
    }

    /// Whether the submit control of the compose form should be enabled
    pub fn can_submit_create(&self) -> bool {
        !self.submitting && !self.compose.trim().is_empty()
    }

    /// Inline error to display next to the compose form
    pub fn create_error(&self) -> Option<&str> {
        self.create_error.as_deref()
    }

    /// Drains the alert-class notifications raised since the last call
    pub fn take_alerts(&mut self) -> Vec<String> {
        self.alerts.drain(..).collect()
    }

    /// Posts the compose draft.
    ///
    /// Does nothing if the draft is blank or a submission is already in
    /// flight.
    pub fn submit_create(&mut self) -> Option<Request> {
        if self.submitting {
            tracing::debug!("ignoring comment submission while one is in flight");
            return None;
        }
        match validate_content(&self.compose) {
            Ok(()) => (),
            Err(ContentError::Empty) => return None,
            Err(err) => {
                self.create_error = Some(self.locale.invalid_content(err));
                return None;
            }
        }
        self.submitting = true;
        self.create_error = None;
        Some(self.request(Op::Create(NewComment::new(self.compose.clone()))))
    }

    /// Opens the edit draft of comment `id`, seeded with its current content.
    ///
    /// Any other open draft is dropped without being saved. Does nothing if
    /// `id` is already being edited, so the draft is kept.
    pub fn begin_edit(&mut self, id: CommentId) {
        if self.editing_id() == Some(id) {
            return;
        }
        match self.comments.iter().find(|c| c.id == id) {
            None => tracing::warn!(?id, "attempted editing a comment that is not listed"),
            Some(c) => {
                if let Some(previous) = &self.edit {
                    if previous.id != id {
                        tracing::debug!(abandoned = ?previous.id, "dropping edit draft");
                    }
                }
                self.edit = Some(EditSession {
                    id,
                    draft: c.content.clone(),
                });
            }
        }
    }

    pub fn set_edit_draft(&mut self, text: impl Into<String>) {
        match &mut self.edit {
            Some(e) => e.draft = text.into(),
            None => tracing::warn!("attempted changing edit draft while not editing"),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Saves the edit draft of comment `id`.
    ///
    /// Does nothing if `id` is not the comment being edited, if the draft is
    /// blank or if an update is already in flight.
    pub fn submit_edit(&mut self, id: CommentId) -> Option<Request> {
        if self.updating.is_some() {
            tracing::debug!(?id, "ignoring edit submission while one is in flight");
            return None;
        }
        let draft = match &self.edit {
            Some(e) if e.id == id => e.draft.clone(),
            _ => return None,
        };
        match validate_content(&draft) {
            Ok(()) => (),
            Err(ContentError::Empty) => return None,
            Err(err) => {
                self.alerts.push_back(self.locale.invalid_content(err));
                return None;
            }
        }
        self.updating = Some(id);
        Some(self.request(Op::Update(id, NewComment::new(draft))))
    }

    /// Deletes comment `id` once `confirm` agrees to it.
    ///
    /// `confirm` receives the question to ask and must block until the user
    /// answers. A second request for a comment whose deletion is still in
    /// flight is ignored.
    pub fn request_delete<F>(&mut self, id: CommentId, confirm: F) -> Option<Request>
    where
        F: FnOnce(&str) -> bool,
    {
        if self.deleting.contains(&id) {
            tracing::debug!(?id, "ignoring duplicate delete request");
            return None;
        }
        if !confirm(self.locale.confirm_delete()) {
            return None;
        }
        self.deleting.insert(id);
        Some(self.request(Op::Delete(id)))
    }

    /// Applies the result of a request, possibly returning the follow-up
    /// refetch to perform.
    pub fn complete(&mut self, resp: Response) -> Option<Request> {
        if resp.board != self.board {
            tracing::debug!(board = ?resp.board, "ignoring response for another board");
            return None;
        }
        match resp.outcome {
            Outcome::Listed(why, res) => {
                match res {
                    Ok(comments) => self.comments = comments,
                    // keep showing the previous list
                    Err(err) => tracing::warn!(?err, ?why, "failed to fetch comments"),
                }
                if why == Refresh::AfterCreate {
                    self.submitting = false;
                }
                None
            }
            Outcome::Created(Ok(())) => {
                tracing::info!(board = ?self.board, "posted comment");
                self.compose.clear();
                Some(self.request(Op::List(Refresh::AfterCreate)))
            }
            Outcome::Created(Err(err)) => {
                tracing::warn!(?err, "failed to post comment");
                self.submitting = false;
                self.create_error = Some(
                    err.server_message()
                        .map(String::from)
                        .unwrap_or_else(|| String::from(self.locale.create_failed())),
                );
                None
            }
            Outcome::Updated(id, Ok(())) => {
                tracing::info!(?id, "edited comment");
                self.updating = None;
                if self.editing_id() == Some(id) {
                    self.edit = None;
                }
                Some(self.request(Op::List(Refresh::AfterUpdate)))
            }
            Outcome::Updated(id, Err(err)) => {
                tracing::warn!(?id, ?err, "failed to edit comment");
                self.updating = None;
                self.alerts
                    .push_back(String::from(self.locale.update_failed()));
                None
            }
            Outcome::Deleted(id, res) => {
                self.deleting.remove(&id);
                match res {
                    Ok(()) => tracing::info!(?id, "deleted comment"),
                    Err(err) if err.is_not_found() => {
                        tracing::info!(?id, "comment was already deleted")
                    }
                    Err(err) => {
                        tracing::warn!(?id, ?err, "failed to delete comment");
                        self.alerts
                            .push_back(String::from(self.locale.delete_failed()));
                        return None;
                    }
                }
                if self.editing_id() == Some(id) {
                    self.edit = None;
                }
                Some(self.request(Op::List(Refresh::AfterDelete)))
            }
        }
    }

    /// Performs `req` and all its follow-ups against `gateway`
    pub async fn run<G>(&mut self, gateway: &G, req: Option<Request>)
    where
        G: CommentGateway + ?Sized,
    {
        let mut next = req;
        while let Some(req) = next {
            let resp = perform(gateway, req).await;
            next = self.complete(resp);
        }
    }

    /// What to display for each comment, in server order
    pub fn rows<Tz: TimeZone>(
        &self,
        session: &Session,
        formatter: &TimeFormatter<Tz>,
        now: Time,
    ) -> Vec<CommentRow<'_>> {
        self.comments
            .iter()
            .map(|comment| {
                let mode = match &self.edit {
                    Some(e) if e.id == comment.id => RowMode::Edit {
                        draft: &e.draft,
                        saving: self.updating == Some(comment.id),
                    },
                    _ => RowMode::View {
                        label: formatter.format(comment.created_at, now),
                        edited: comment.is_edited(),
                        can_mutate: can_mutate(session, comment),
                    },
                };
                CommentRow { comment, mode }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use futures::executor::block_on;
    use kanban_mock_server::{Call, CallKind, MockGateway, MockServer, SharedServer};

    use super::*;
    use crate::api::Error;

    const BOARD: BoardId = BoardId(1);

    struct Fixture {
        server: SharedServer,
        alice: Session,
        bob: Session,
    }

    impl Fixture {
        fn new() -> Fixture {
            let mut server = MockServer::new();
            server.admin_create_user("alice", "alice-pw").unwrap();
            server.admin_create_user("bob", "bob-pw").unwrap();
            server.admin_create_board(BOARD, "Roadmap").unwrap();
            let alice = server.login("alice", "alice-pw").unwrap();
            let bob = server.login("bob", "bob-pw").unwrap();
            Fixture {
                server: server.into_shared(),
                alice,
                bob,
            }
        }

        fn gateway(&self, session: &Session) -> MockGateway {
            MockGateway::new(&self.server, session)
        }

        /// Posts a comment directly on the server, bypassing the call log
        fn seed(&self, session: &Session, content: &str) -> Comment {
            self.server
                .lock()
                .create_comment(session.token.as_ref(), BOARD, NewComment::new(content))
                .unwrap()
        }

        fn server_list(&self) -> Vec<Comment> {
            self.server.lock().list_comments(BOARD).unwrap()
        }

        fn take_calls(&self) -> Vec<Call> {
            self.server.lock().take_calls()
        }

        fn mounted(&self, gw: &MockGateway) -> CommentList {
            let (mut list, req) = CommentList::mount(BOARD, Locale::English);
            block_on(list.run(gw, Some(req)));
            self.take_calls();
            list
        }
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    fn edit_rows(list: &CommentList, session: &Session) -> usize {
        list.rows(session, &TimeFormatter::utc(Locale::English), chrono::Utc::now())
            .iter()
            .filter(|r| matches!(r.mode, RowMode::Edit { .. }))
            .count()
    }

    #[test]
    fn mount_fetches_the_list() {
        let f = Fixture::new();
        f.seed(&f.alice, "first");
        f.seed(&f.bob, "second");
        let (mut list, req) = CommentList::mount(BOARD, Locale::English);
        assert_eq!(req.op, Op::List(Refresh::Mount));
        assert!(list.is_empty());
        block_on(list.run(&f.gateway(&f.alice), Some(req)));
        assert_eq!(list.comments(), &f.server_list()[..]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.state(), State::Idle);
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let f = Fixture::new();
        let mut list = f.mounted(&f.gateway(&f.alice));
        for draft in ["", "   ", "\n\t"] {
            list.set_compose_draft(draft);
            assert!(!list.can_submit_create());
            assert_eq!(list.submit_create(), None);
            assert_eq!(list.state(), State::Idle);
            assert_eq!(list.create_error(), None);
        }
        assert!(f.take_calls().is_empty());
    }

    #[test]
    fn oversized_submission_is_rejected_inline() {
        let f = Fixture::new();
        let mut list = f.mounted(&f.gateway(&f.alice));
        list.set_compose_draft("a".repeat(1001));
        assert_eq!(list.compose_counter(), "1001/1000");
        assert_eq!(list.submit_create(), None);
        assert_eq!(
            list.create_error(),
            Some("Comments are limited to 1000 characters.")
        );
        assert_eq!(list.state(), State::Idle);
        assert!(f.take_calls().is_empty());
    }

    #[test]
    fn create_shows_nothing_until_refetch() {
        let f = Fixture::new();
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.set_compose_draft("hello");
        assert!(list.can_submit_create());
        let req = list.submit_create().expect("create request");
        assert_eq!(req.op, Op::Create(NewComment::new("hello")));
        assert_eq!(list.state(), State::Submitting);

        // the control is disabled while in flight
        assert!(!list.can_submit_create());
        assert_eq!(list.submit_create(), None);

        let refetch = list
            .complete(block_on(perform(&gw, req)))
            .expect("refetch after create");
        assert_eq!(refetch.op, Op::List(Refresh::AfterCreate));
        assert!(list.is_empty());
        assert_eq!(list.compose_draft(), "");
        assert_eq!(list.state(), State::Submitting);

        assert_eq!(list.complete(block_on(perform(&gw, refetch))), None);
        assert_eq!(list.state(), State::Idle);
        assert_eq!(list.comments(), &f.server_list()[..]);
        assert_eq!(list.comments()[0].content, "hello");
    }

    #[test]
    fn create_failure_falls_back_to_generic_message() {
        let f = Fixture::new();
        let anon = MockGateway::anonymous(&f.server);
        let mut list = f.mounted(&anon);

        list.set_compose_draft("hi");
        let req = list.submit_create();
        block_on(list.run(&anon, req));
        assert_eq!(list.state(), State::Idle);
        assert_eq!(list.create_error(), Some("Failed to post the comment."));
        assert_eq!(list.compose_draft(), "hi");
        assert!(list.take_alerts().is_empty());
        assert_eq!(f.take_calls(), vec![Call::Create(BOARD, NewComment::new("hi"))]);
    }

    #[test]
    fn create_failure_shows_server_message() {
        let f = Fixture::new();
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        f.server.lock().fail_next(
            CallKind::Create,
            Error::Server {
                status: 423,
                message: Some(String::from("board is locked")),
            },
        );
        list.set_compose_draft("hi");
        let req = list.submit_create();
        block_on(list.run(&gw, req));
        assert_eq!(list.create_error(), Some("board is locked"));
        assert!(list.is_empty());

        // retrying clears the error
        let req = list.submit_create();
        assert_eq!(list.create_error(), None);
        block_on(list.run(&gw, req));
        assert_eq!(list.create_error(), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn create_failure_shows_auth_message() {
        let f = Fixture::new();
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        f.server.lock().fail_next(
            CallKind::Create,
            Error::from_response(
                reqwest::StatusCode::UNAUTHORIZED,
                br#"{"error":"login expired, sign in again"}"#,
            ),
        );
        list.set_compose_draft("hi");
        let req = list.submit_create();
        block_on(list.run(&gw, req));
        assert_eq!(list.create_error(), Some("login expired, sign in again"));
        assert_eq!(list.compose_draft(), "hi");
        assert_eq!(list.state(), State::Idle);
    }

    #[test]
    fn editing_another_comment_drops_the_draft() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "comment a");
        let b = f.seed(&f.alice, "comment b");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.begin_edit(a.id);
        list.set_edit_draft("changed a");
        assert_eq!(list.state(), State::Editing(a.id));
        list.begin_edit(b.id);
        assert_eq!(list.state(), State::Editing(b.id));
        assert_eq!(
            list.edit_session(),
            Some(&EditSession {
                id: b.id,
                draft: String::from("comment b"),
            })
        );
        assert_eq!(edit_rows(&list, &f.alice), 1);

        // a is no longer being edited
        assert_eq!(list.submit_edit(a.id), None);

        list.set_edit_draft("changed b");
        let req = list.submit_edit(b.id);
        block_on(list.run(&gw, req));
        assert_eq!(
            f.take_calls(),
            vec![
                Call::Update(BOARD, b.id, NewComment::new("changed b")),
                Call::List(BOARD),
            ]
        );
        assert_eq!(list.comments()[0].content, "comment a");
        assert_eq!(list.comments()[1].content, "changed b");
        assert_eq!(list.state(), State::Idle);
        assert_eq!(edit_rows(&list, &f.alice), 0);
    }

    #[test]
    fn cancel_edit_discards_the_draft() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "original");
        let mut list = f.mounted(&f.gateway(&f.alice));

        list.begin_edit(a.id);
        list.set_edit_draft("never saved");
        list.cancel_edit();
        assert_eq!(list.state(), State::Idle);
        assert_eq!(list.submit_edit(a.id), None);

        list.begin_edit(a.id);
        assert_eq!(list.edit_session().unwrap().draft, "original");

        // unknown comments cannot be edited
        list.begin_edit(CommentId(12345));
        assert_eq!(list.editing_id(), Some(a.id));
        assert!(f.take_calls().is_empty());
    }

    #[test]
    fn reopening_the_edited_comment_keeps_the_draft() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "typo");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.begin_edit(a.id);
        list.set_edit_draft("fixed");
        list.begin_edit(a.id);
        assert_eq!(list.edit_session().unwrap().draft, "fixed");

        // clicking edit again while the save is in flight
        let req = list.submit_edit(a.id).expect("update request");
        list.begin_edit(a.id);
        assert_eq!(
            list.rows(&f.alice, &TimeFormatter::utc(Locale::English), chrono::Utc::now())[0]
                .mode,
            RowMode::Edit {
                draft: "fixed",
                saving: true,
            }
        );
        let refetch = list.complete(block_on(perform(&gw, req)));
        block_on(list.run(&gw, refetch));
        assert_eq!(list.state(), State::Idle);
        assert_eq!(list.comments()[0].content, "fixed");
    }

    #[test]
    fn labels_follow_the_server_clock() {
        let f = Fixture::new();
        let posted = chrono::Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        f.server.lock().set_now(posted);
        f.seed(&f.alice, "old news");
        let list = f.mounted(&f.gateway(&f.alice));
        let fmt = TimeFormatter::utc(Locale::English);

        let label_after = |d: Duration| {
            f.server.lock().advance(d);
            let now = f.server.lock().now();
            match list.rows(&f.alice, &fmt, now).remove(0).mode {
                RowMode::View { label, .. } => label,
                mode => panic!("unexpected row mode {mode:?}"),
            }
        };
        assert_eq!(label_after(Duration::minutes(30)), "30 minutes ago");
        assert_eq!(label_after(Duration::hours(30)), "yesterday");
        assert_eq!(label_after(Duration::days(3)), "2024-03-10");
    }

    #[test]
    fn blank_edit_is_ignored() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "original");
        let mut list = f.mounted(&f.gateway(&f.alice));

        list.begin_edit(a.id);
        list.set_edit_draft("   ");
        assert_eq!(list.submit_edit(a.id), None);
        assert_eq!(list.state(), State::Editing(a.id));
        assert!(list.take_alerts().is_empty());
        assert!(f.take_calls().is_empty());
    }

    #[test]
    fn failed_edit_keeps_the_draft() {
        let f = Fixture::new();
        let theirs = f.seed(&f.bob, "bob's");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.begin_edit(theirs.id);
        list.set_edit_draft("hijacked");
        let req = list.submit_edit(theirs.id).expect("update request");
        let resp = block_on(perform(&gw, req));
        assert_eq!(
            resp.outcome,
            Outcome::Updated(theirs.id, Err(Error::PermissionDenied(None)))
        );
        assert_eq!(list.complete(resp), None);

        assert_eq!(list.take_alerts(), vec![String::from("Failed to edit the comment.")]);
        assert_eq!(list.state(), State::Editing(theirs.id));
        assert_eq!(list.edit_session().unwrap().draft, "hijacked");
        assert_eq!(list.comments()[0].content, "bob's");

        // the draft can be retried
        assert!(list.submit_edit(theirs.id).is_some());
    }

    #[test]
    fn one_update_in_flight() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "a");
        let b = f.seed(&f.alice, "b");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.begin_edit(a.id);
        list.set_edit_draft("a2");
        let req = list.submit_edit(a.id).expect("update request");
        assert_eq!(list.submit_edit(a.id), None);

        // moving on to b while a is saving: a's success must not close b
        list.begin_edit(b.id);
        assert_eq!(list.submit_edit(b.id), None);
        let refetch = list.complete(block_on(perform(&gw, req)));
        assert_eq!(list.state(), State::Editing(b.id));
        block_on(list.run(&gw, refetch));
        assert_eq!(list.comments()[0].content, "a2");
        assert!(list.submit_edit(b.id).is_some());
    }

    #[test]
    fn successful_edit_is_marked_edited() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "typo");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);
        assert!(!list.comments()[0].is_edited());

        list.begin_edit(a.id);
        list.set_edit_draft("fixed");
        let req = list.submit_edit(a.id);
        block_on(list.run(&gw, req));
        assert_eq!(list.state(), State::Idle);
        assert_eq!(list.comments()[0].content, "fixed");
        assert!(list.comments()[0].is_edited());
    }

    #[test]
    fn delete_requires_confirmation() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "bye");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        assert_eq!(list.request_delete(a.id, no), None);
        assert!(f.take_calls().is_empty());

        let mut asked = None;
        let req = list.request_delete(a.id, |q| {
            asked = Some(String::from(q));
            true
        });
        assert_eq!(asked.as_deref(), Some("Delete this comment?"));
        block_on(list.run(&gw, req));
        assert!(list.is_empty());
        assert_eq!(
            f.take_calls(),
            vec![Call::Delete(BOARD, a.id), Call::List(BOARD)]
        );
    }

    #[test]
    fn double_delete_is_soft() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "bye");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);
        let mut other_tab = f.mounted(&gw);

        let req = list.request_delete(a.id, yes).expect("delete request");
        // second click while the first is in flight
        assert_eq!(list.request_delete(a.id, yes), None);
        block_on(list.run(&gw, Some(req)));
        assert!(list.is_empty());

        // the other tab still shows it, its delete hits a not-found
        assert_eq!(other_tab.len(), 1);
        let req = other_tab.request_delete(a.id, yes).expect("delete request");
        let resp = block_on(perform(&gw, req));
        assert_eq!(resp.outcome, Outcome::Deleted(a.id, Err(Error::NotFound(None))));
        let refetch = other_tab.complete(resp);
        assert!(other_tab.take_alerts().is_empty());
        block_on(other_tab.run(&gw, refetch));
        assert!(other_tab.is_empty());
    }

    #[test]
    fn failed_delete_keeps_the_list() {
        let f = Fixture::new();
        let theirs = f.seed(&f.bob, "bob's");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        let req = list.request_delete(theirs.id, yes).expect("delete request");
        assert_eq!(list.complete(block_on(perform(&gw, req))), None);
        assert_eq!(list.take_alerts(), vec![String::from("Failed to delete the comment.")]);
        assert_eq!(list.comments(), &f.server_list()[..]);
        assert_eq!(list.len(), 1);

        // the delete can be asked for again
        assert!(list.request_delete(theirs.id, yes).is_some());
    }

    #[test]
    fn deleting_the_edited_comment_closes_the_draft() {
        let f = Fixture::new();
        let a = f.seed(&f.alice, "bye");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.begin_edit(a.id);
        let req = list.request_delete(a.id, yes);
        block_on(list.run(&gw, req));
        assert_eq!(list.state(), State::Idle);
    }

    #[test]
    fn list_failures_keep_the_previous_list() {
        let f = Fixture::new();
        f.seed(&f.alice, "kept");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);
        let shown = list.comments().to_vec();

        f.server
            .lock()
            .fail_next(CallKind::List, Error::Network(String::from("offline")));
        list.set_compose_draft("new");
        let req = list.submit_create();
        block_on(list.run(&gw, req));

        // the create went through, but its refetch did not
        assert_eq!(list.comments(), &shown[..]);
        assert_eq!(f.server_list().len(), 2);
        assert_eq!(list.state(), State::Idle);
        assert_eq!(list.create_error(), None);
        assert!(list.take_alerts().is_empty());
    }

    #[test]
    fn last_refetch_wins() {
        let f = Fixture::new();
        let old = f.seed(&f.alice, "old");
        let gw = f.gateway(&f.alice);
        let mut list = f.mounted(&gw);

        list.set_compose_draft("new");
        let create = list.submit_create().expect("create request");
        let delete = list.request_delete(old.id, yes).expect("delete request");

        let after_create = list
            .complete(block_on(perform(&gw, create)))
            .expect("refetch after create");
        let before_delete = block_on(perform(&gw, after_create));
        let after_delete = list
            .complete(block_on(perform(&gw, delete)))
            .expect("refetch after delete");
        let after_both = block_on(perform(&gw, after_delete));

        // the refetches resolve out of order: the stale one lands last
        assert_eq!(list.complete(after_both), None);
        assert_eq!(list.len(), 1);
        assert_eq!(list.complete(before_delete), None);
        assert_eq!(
            list.comments()
                .iter()
                .map(|c| &c.content as &str)
                .collect::<Vec<_>>(),
            vec!["old", "new"]
        );
        assert_eq!(list.state(), State::Idle);
    }

    #[test]
    fn responses_for_other_boards_are_ignored() {
        let f = Fixture::new();
        let mut list = f.mounted(&f.gateway(&f.alice));
        let stray = Response {
            board: BoardId(99),
            outcome: Outcome::Listed(Refresh::Mount, Ok(vec![f.seed(&f.alice, "elsewhere")])),
        };
        assert_eq!(list.complete(stray), None);
        assert!(list.is_empty());
    }

    #[test]
    fn rows_follow_server_order() {
        let f = Fixture::new();
        let first = f.seed(&f.bob, "first");
        let second = f.seed(&f.alice, "second");
        let mut list = f.mounted(&f.gateway(&f.alice));
        let now = f.server.lock().now() + Duration::minutes(90);

        let fmt = TimeFormatter::utc(Locale::English);
        let rows = list.rows(&f.alice, &fmt, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].comment.id, first.id);
        assert_eq!(
            rows[0].mode,
            RowMode::View {
                label: String::from("1 hours ago"),
                edited: false,
                can_mutate: false,
            }
        );
        assert_eq!(
            rows[1].mode,
            RowMode::View {
                label: String::from("1 hours ago"),
                edited: false,
                can_mutate: true,
            }
        );

        list.begin_edit(second.id);
        list.set_edit_draft("draft");
        let rows = list.rows(&f.alice, &fmt, now);
        assert!(matches!(rows[0].mode, RowMode::View { .. }));
        assert_eq!(
            rows[1].mode,
            RowMode::Edit {
                draft: "draft",
                saving: false,
            }
        );
    }

    #[test]
    fn author_scenario() {
        let mut server = MockServer::new();
        server.admin_create_user("A", "a-pw").unwrap();
        server.admin_create_user("B", "b-pw").unwrap();
        server.admin_create_board(BoardId(7), "Board seven").unwrap();
        let a = server.login("A", "a-pw").unwrap();
        let b = server.login("B", "b-pw").unwrap();
        let server = server.into_shared();
        let gw_a = MockGateway::new(&server, &a);
        let gw_b = MockGateway::new(&server, &b);

        // A posts "hello"
        let (mut list_a, req) = CommentList::mount(BoardId(7), Locale::English);
        block_on(list_a.run(&gw_a, Some(req)));
        list_a.set_compose_draft("hello");
        let req = list_a.submit_create();
        block_on(list_a.run(&gw_a, req));
        assert!(server
            .lock()
            .calls()
            .contains(&Call::Create(BoardId(7), NewComment::new("hello"))));
        assert_eq!(list_a.len(), 1);
        let hello = list_a.comments()[0].clone();
        assert_eq!(hello.content, "hello");
        assert_eq!(hello.author_username, "A");
        assert!(!hello.is_edited());

        // A edits it
        list_a.begin_edit(hello.id);
        list_a.set_edit_draft("hello world");
        let req = list_a.submit_edit(hello.id);
        block_on(list_a.run(&gw_a, req));
        let edited = &list_a.comments()[0];
        assert_eq!(edited.content, "hello world");
        assert_ne!(edited.updated_at, edited.created_at);

        let fmt = TimeFormatter::utc(Locale::English);
        let now = server.lock().now();
        assert_eq!(
            list_a.rows(&a, &fmt, now)[0].mode,
            RowMode::View {
                label: String::from("0 minutes ago"),
                edited: true,
                can_mutate: true,
            }
        );

        // B sees it without controls
        let (mut list_b, req) = CommentList::mount(BoardId(7), Locale::English);
        block_on(list_b.run(&gw_b, Some(req)));
        assert_eq!(list_b.comments(), list_a.comments());
        assert_eq!(
            list_b.rows(&b, &fmt, now)[0].mode,
            RowMode::View {
                label: String::from("0 minutes ago"),
                edited: true,
                can_mutate: false,
            }
        );
    }

    #[test]
    fn korean_messages() {
        let f = Fixture::new();
        let theirs = f.seed(&f.bob, "bob's");
        let gw = f.gateway(&f.alice);
        let (mut list, req) = CommentList::mount(BOARD, Locale::Korean);
        block_on(list.run(&gw, Some(req)));

        let mut asked = String::new();
        let req = list.request_delete(theirs.id, |q| {
            asked = String::from(q);
            true
        });
        assert_eq!(asked, "댓글을 삭제하시겠습니까?");
        block_on(list.run(&gw, req));
        assert_eq!(list.take_alerts(), vec![String::from("댓글 삭제에 실패했습니다.")]);
        assert_eq!(list.compose_counter(), "0/1000자");
    }
}
