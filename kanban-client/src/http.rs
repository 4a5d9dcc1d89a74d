use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::api::{AuthToken, BoardId, Comment, CommentGateway, CommentId, Error, NewComment};

const DEFAULT_READ_RETRIES: u32 = 3;

/// `CommentGateway` talking to the board backend over HTTP.
///
/// Reads are retried on transient failures, writes are sent exactly once.
#[derive(Clone)]
pub struct HttpGateway {
    host: String,
    token: Option<AuthToken>,
    client: reqwest::Client,
    reader: ClientWithMiddleware,
}

fn reader_with_retries(client: &reqwest::Client, retries: u32) -> ClientWithMiddleware {
    let policy = ExponentialBackoff::builder().build_with_max_retries(retries);
    ClientBuilder::new(client.clone())
        .with(RetryTransientMiddleware::new_with_policy(policy))
        .build()
}

fn network(e: impl std::fmt::Display) -> Error {
    Error::Network(e.to_string())
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await.map_err(network)?;
    Err(Error::from_response(status, &body))
}

async fn decode<T>(resp: reqwest::Response) -> Result<T, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let status = resp.status().as_u16();
    resp.json().await.map_err(|e| {
        tracing::error!(?e, "failed to parse data from server");
        Error::Server {
            status,
            message: None,
        }
    })
}

impl HttpGateway {
    pub fn new(host: impl Into<String>, token: Option<AuthToken>) -> HttpGateway {
        let client = reqwest::Client::new();
        HttpGateway {
            host: host.into().trim_end_matches('/').to_string(),
            token,
            reader: reader_with_retries(&client, DEFAULT_READ_RETRIES),
            client,
        }
    }

    pub fn with_read_retries(mut self, retries: u32) -> HttpGateway {
        self.reader = reader_with_retries(&self.client, retries);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path)
    }

    fn comments_url(&self, board: BoardId) -> String {
        self.url(&format!("boards/{board}/comments"))
    }

    fn comment_url(&self, board: BoardId, id: CommentId) -> String {
        self.url(&format!("boards/{board}/comments/{id}"))
    }

    fn token(&self) -> Result<&str, Error> {
        self.token
            .as_ref()
            .map(|t| &t.0 as &str)
            .ok_or(Error::Unauthenticated(None))
    }

    async fn read<T>(&self, url: String, authenticated: bool) -> Result<T, Error>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let mut req = self.reader.get(&url);
        if authenticated {
            req = req.bearer_auth(self.token()?);
        } else if let Some(tok) = &self.token {
            req = req.bearer_auth(&tok.0);
        }
        let resp = req.send().await.map_err(network)?;
        decode(check(resp).await?).await
    }

    async fn write(&self, req: reqwest::RequestBuilder) -> Result<(), Error> {
        let resp = req.bearer_auth(self.token()?).send().await.map_err(network)?;
        check(resp).await?;
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl CommentGateway for HttpGateway {
    async fn list(&self, board: BoardId) -> Result<Vec<Comment>, Error> {
        self.read(self.comments_url(board), false).await
    }

    async fn create(&self, board: BoardId, comment: &NewComment) -> Result<(), Error> {
        comment.validate()?;
        self.write(self.client.post(self.comments_url(board)).json(comment))
            .await
    }

    async fn update(
        &self,
        board: BoardId,
        id: CommentId,
        comment: &NewComment,
    ) -> Result<(), Error> {
        comment.validate()?;
        self.write(self.client.put(self.comment_url(board, id)).json(comment))
            .await
    }

    async fn delete(&self, board: BoardId, id: CommentId) -> Result<(), Error> {
        self.write(self.client.delete(self.comment_url(board, id)))
            .await
    }

    async fn list_mine(&self) -> Result<Vec<Comment>, Error> {
        self.read(self.url("users/me/comments"), true).await
    }
}
