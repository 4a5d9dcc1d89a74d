mod auth;
pub use auth::can_mutate;

mod comment_list;
pub use comment_list::{CommentList, CommentRow, EditSession, RowMode, State};

mod format;
pub use format::{Locale, TimeFormatter};

mod http;
pub use http::HttpGateway;

mod request;
pub use request::{perform, Op, Outcome, Refresh, Request, Response};

pub mod api {
    pub use kanban_api::*;
}
