use gloo_storage::{LocalStorage, Storage};
use kanban_client::{api::Session, HttpGateway};

mod ui;
mod util;

/// Key under which the auth shell stores the `LoginInfo`
const KEY_SESSION: &str = "session";

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LoginInfo {
    pub host: String,

    #[serde(flatten)]
    pub session: Session,
}

impl LoginInfo {
    fn anonymous() -> LoginInfo {
        LoginInfo {
            host: util::origin(),
            session: Session::anonymous(),
        }
    }

    pub fn gateway(&self) -> HttpGateway {
        HttpGateway::new(self.host.clone(), self.session.token.clone())
    }
}

fn main() {
    tracing_wasm::set_as_global_default();
    let login = match LocalStorage::get::<LoginInfo>(KEY_SESSION) {
        Ok(login) => login,
        Err(e) => {
            tracing::info!(?e, "no stored session, browsing anonymously");
            LoginInfo::anonymous()
        }
    };
    let board = util::board_from_path();
    yew::Renderer::<ui::App>::with_props(ui::AppProps { login, board }).render();
}
