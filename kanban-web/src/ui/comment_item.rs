use kanban_client::{api::Comment, Locale, RowMode};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum ItemMode {
    View {
        label: String,
        edited: bool,
        can_mutate: bool,
    },
    Edit {
        draft: String,
        saving: bool,
    },
}

impl From<RowMode<'_>> for ItemMode {
    fn from(m: RowMode<'_>) -> ItemMode {
        match m {
            RowMode::View {
                label,
                edited,
                can_mutate,
            } => ItemMode::View {
                label,
                edited,
                can_mutate,
            },
            RowMode::Edit { draft, saving } => ItemMode::Edit {
                draft: String::from(draft),
                saving,
            },
        }
    }
}

#[derive(Clone, PartialEq, Properties)]
pub struct CommentItemProps {
    pub comment: Comment,
    pub mode: ItemMode,
    pub locale: Locale,
    pub on_edit: Callback<()>,
    pub on_delete: Callback<()>,
    pub on_draft_change: Callback<String>,
    pub on_save: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(CommentItem)]
pub fn comment_item(p: &CommentItemProps) -> Html {
    let body = match &p.mode {
        ItemMode::View {
            label,
            edited,
            can_mutate,
        } => view_body(p, label, *edited, *can_mutate),
        ItemMode::Edit { draft, saving } => edit_body(p, draft, *saving),
    };
    html! {
        <li class="list-group-item">
            <div class="d-flex justify-content-between">
                <strong>{ &p.comment.author_username }</strong>
            </div>
            { body }
        </li>
    }
}

fn view_body(p: &CommentItemProps, label: &str, edited: bool, can_mutate: bool) -> Html {
    let controls = can_mutate.then(|| {
        html! {
            <div class="btn-group btn-group-sm">
                <button
                    type="button"
                    class="btn btn-link"
                    onclick={ p.on_edit.reform(|_| ()) }
                >
                    { p.locale.edit() }
                </button>
                <button
                    type="button"
                    class="btn btn-link text-danger"
                    onclick={ p.on_delete.reform(|_| ()) }
                >
                    { p.locale.delete() }
                </button>
            </div>
        }
    });
    html! {<>
        <p class="comment-content mb-1">{ &p.comment.content }</p>
        <div class="d-flex align-items-center text-muted small">
            <span>{ label }</span>
            { for edited.then(|| html! {
                <span class="ms-1">{ p.locale.edited_marker() }</span>
            }) }
            <div class="ms-auto">{ for controls }</div>
        </div>
    </>}
}

fn edit_body(p: &CommentItemProps, draft: &str, saving: bool) -> Html {
    let on_input = p.on_draft_change.reform(|e: InputEvent| {
        let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
        input.value()
    });
    html! {<>
        <textarea
            class="form-control mb-2"
            rows="3"
            value={ String::from(draft) }
            oninput={ on_input }
        />
        <div class="d-flex justify-content-end gap-2">
            <button
                type="button"
                class="btn btn-sm btn-secondary"
                onclick={ p.on_cancel.reform(|_| ()) }
            >
                { p.locale.cancel() }
            </button>
            <button
                type="button"
                class="btn btn-sm btn-primary"
                disabled={ saving || draft.trim().is_empty() }
                onclick={ p.on_save.reform(|_| ()) }
            >
                { p.locale.save() }
            </button>
        </div>
    </>}
}
