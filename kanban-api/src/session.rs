#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AuthToken(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub full_name: Option<String>,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Identity {
        Identity {
            username: username.into(),
            email: None,
            full_name: None,
        }
    }
}

/// The current authenticated identity, or its absence
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub token: Option<AuthToken>,
    pub identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Session {
        Session::default()
    }

    pub fn logged_in(token: AuthToken, identity: Identity) -> Session {
        Session {
            token: Some(token),
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| &i.username as &str)
    }
}
