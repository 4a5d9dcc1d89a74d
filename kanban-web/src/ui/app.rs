use kanban_client::api::BoardId;
use yew::prelude::*;

use crate::{ui, LoginInfo};

#[derive(Clone, PartialEq, Properties)]
pub struct AppProps {
    pub login: LoginInfo,
    pub board: Option<BoardId>,
}

#[function_component(App)]
pub fn app(p: &AppProps) -> Html {
    let body = match p.board {
        None => html! {
            <div class="text-center my-4">
                <h1>{ "No board selected" }</h1>
            </div>
        },
        Some(board) => html! {
            <ui::CommentList board_id={ board } />
        },
    };
    html! {
        <ContextProvider<LoginInfo> context={ p.login.clone() }>
            <div class="container">
                { body }
            </div>
        </ContextProvider<LoginInfo>>
    }
}
