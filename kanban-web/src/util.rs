use std::str::FromStr;

use kanban_client::{api::BoardId, Locale};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = "
    export function get_timezone() {
        return Intl.DateTimeFormat().resolvedOptions().timeZone;
    }
")]
extern "C" {
    fn get_timezone() -> String;
}

lazy_static::lazy_static! {
    static ref LOCAL_TZ: chrono_tz::Tz = {
        let name = get_timezone();
        chrono_tz::Tz::from_str(&name).unwrap_or_else(|e| {
            tracing::warn!(?name, ?e, "host js timezone is not in chrono-tz database, using UTC");
            chrono_tz::Tz::UTC
        })
    };
}

pub fn local_tz() -> chrono_tz::Tz {
    *LOCAL_TZ
}

pub fn browser_locale() -> Locale {
    web_sys::window()
        .and_then(|w| w.navigator().language())
        .and_then(|l| l.parse().ok())
        .unwrap_or_default()
}

pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Blocks on a native confirmation dialog, answering no if it cannot be shown
pub fn confirm(question: &str) -> bool {
    match web_sys::window().map(|w| w.confirm_with_message(question)) {
        Some(Ok(answer)) => answer,
        res => {
            tracing::error!(?res, "failed to show confirmation dialog");
            false
        }
    }
}

pub fn alert(msg: &str) {
    match web_sys::window().map(|w| w.alert_with_message(msg)) {
        Some(Ok(())) => (),
        res => tracing::error!(?res, ?msg, "failed to show alert"),
    }
}

pub fn board_from_path() -> Option<BoardId> {
    let path = web_sys::window()?.location().pathname().ok()?;
    parse_board_path(&path)
}

fn parse_board_path(path: &str) -> Option<BoardId> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some("boards"), Some(id)) => id.parse().ok().map(BoardId),
        _ => None,
    }
}
