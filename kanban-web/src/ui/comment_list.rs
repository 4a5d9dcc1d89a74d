use chrono::Utc;
use kanban_client::{
    api::{BoardId, CommentId},
    perform, HttpGateway, Request, Response, TimeFormatter,
};
use yew::{context::ContextHandle, prelude::*};

use crate::{ui, util, LoginInfo};

#[derive(Clone, PartialEq, Properties)]
pub struct CommentListProps {
    pub board_id: BoardId,
}

pub enum CommentListMsg {
    LoginChanged(LoginInfo),

    ComposeChanged(String),
    SubmitCreate,

    BeginEdit(CommentId),
    EditChanged(String),
    CancelEdit,
    SubmitEdit(CommentId),

    RequestDelete(CommentId),

    Completed(Response),
}

pub struct CommentList {
    login: LoginInfo,
    _login_listener: Option<ContextHandle<LoginInfo>>,
    gateway: HttpGateway,
    list: kanban_client::CommentList,
    formatter: TimeFormatter<chrono_tz::Tz>,
}

impl CommentList {
    fn send(&self, ctx: &Context<Self>, req: Option<Request>) {
        if let Some(req) = req {
            let gateway = self.gateway.clone();
            ctx.link().send_future(async move {
                CommentListMsg::Completed(perform(&gateway, req).await)
            });
        }
    }

    fn compose_form(&self, ctx: &Context<Self>) -> Html {
        let locale = self.formatter.locale();
        if !self.login.session.is_authenticated() {
            return html! {
                <p class="text-muted">{ locale.login_required() }</p>
            };
        }
        let on_input = ctx.link().callback(|e: InputEvent| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            CommentListMsg::ComposeChanged(input.value())
        });
        let error = self.list.create_error().map(|e| {
            html! {
                <div class="invalid-feedback d-block">{ e }</div>
            }
        });
        html! {
            <div class="mb-3">
                <textarea
                    class={ classes!("form-control", error.is_some().then_some("is-invalid")) }
                    rows="3"
                    placeholder={ locale.compose_placeholder() }
                    value={ String::from(self.list.compose_draft()) }
                    oninput={ on_input }
                />
                { for error }
                <div class="d-flex justify-content-between align-items-center mt-2">
                    <small class="text-muted">{ self.list.compose_counter() }</small>
                    <button
                        type="button"
                        class="btn btn-primary"
                        disabled={ !self.list.can_submit_create() }
                        onclick={ ctx.link().callback(|_| CommentListMsg::SubmitCreate) }
                    >
                        { locale.submit(self.list.is_submitting()) }
                    </button>
                </div>
            </div>
        }
    }

    fn items(&self, ctx: &Context<Self>) -> Html {
        let locale = self.formatter.locale();
        if self.list.is_empty() {
            return html! {
                <p class="text-muted text-center my-4">{ locale.no_comments() }</p>
            };
        }
        let rows = self
            .list
            .rows(&self.login.session, &self.formatter, Utc::now());
        html! {
            <ul class="list-group">
                { for rows.into_iter().map(|row| {
                    let id = row.comment.id;
                    html! {
                        <ui::CommentItem
                            key={ id.0 }
                            comment={ row.comment.clone() }
                            mode={ ui::ItemMode::from(row.mode) }
                            { locale }
                            on_edit={ ctx.link().callback(move |()| CommentListMsg::BeginEdit(id)) }
                            on_delete={ ctx.link().callback(move |()| CommentListMsg::RequestDelete(id)) }
                            on_draft_change={ ctx.link().callback(CommentListMsg::EditChanged) }
                            on_save={ ctx.link().callback(move |()| CommentListMsg::SubmitEdit(id)) }
                            on_cancel={ ctx.link().callback(|()| CommentListMsg::CancelEdit) }
                        />
                    }
                }) }
            </ul>
        }
    }
}

impl Component for CommentList {
    type Message = CommentListMsg;
    type Properties = CommentListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (login, listener) = match ctx
            .link()
            .context::<LoginInfo>(ctx.link().callback(CommentListMsg::LoginChanged))
        {
            Some((login, listener)) => (login, Some(listener)),
            None => {
                tracing::warn!("comment list mounted without login context");
                (LoginInfo::anonymous(), None)
            }
        };
        let locale = util::browser_locale();
        let (list, req) = kanban_client::CommentList::mount(ctx.props().board_id, locale);
        let this = CommentList {
            gateway: login.gateway(),
            login,
            _login_listener: listener,
            list,
            formatter: TimeFormatter::new(util::local_tz(), locale),
        };
        this.send(ctx, Some(req));
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let board = ctx.props().board_id;
        if board != old_props.board_id {
            tracing::debug!(?board, "switching comment list to another board");
            let (list, req) = kanban_client::CommentList::mount(board, self.formatter.locale());
            self.list = list;
            self.send(ctx, Some(req));
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let req = match msg {
            CommentListMsg::LoginChanged(login) => {
                self.gateway = login.gateway();
                self.login = login;
                None
            }
            CommentListMsg::ComposeChanged(text) => {
                self.list.set_compose_draft(text);
                None
            }
            CommentListMsg::SubmitCreate => self.list.submit_create(),
            CommentListMsg::BeginEdit(id) => {
                self.list.begin_edit(id);
                None
            }
            CommentListMsg::EditChanged(text) => {
                self.list.set_edit_draft(text);
                None
            }
            CommentListMsg::CancelEdit => {
                self.list.cancel_edit();
                None
            }
            CommentListMsg::SubmitEdit(id) => self.list.submit_edit(id),
            CommentListMsg::RequestDelete(id) => self.list.request_delete(id, util::confirm),
            CommentListMsg::Completed(resp) => self.list.complete(resp),
        };
        self.send(ctx, req);
        for alert in self.list.take_alerts() {
            util::alert(&alert);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let locale = self.formatter.locale();
        html! {
            <div class="comment-list my-4">
                <h5 class="mb-3">
                    { locale.comment_count() }
                    <span class="badge bg-secondary ms-2">{ self.list.len() }</span>
                </h5>
                { self.compose_form(ctx) }
                { self.items(ctx) }
            </div>
        }
    }
}
