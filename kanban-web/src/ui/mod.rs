mod app;
pub use app::{App, AppProps};

mod comment_item;
pub use comment_item::{CommentItem, ItemMode};

mod comment_list;
pub use comment_list::CommentList;
