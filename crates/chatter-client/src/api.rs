use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use chatter_types::api::{
    AvatarRequest, ErrorResponse, OfflineRequest, OnlineRequest, SendMessageRequest,
    SuccessResponse,
};
use chatter_types::models::{Message, PresenceEntry};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the server's `error` field when present.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// HTTP client for the chat server's REST endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://localhost:3002`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base: Url::parse(base_url)?,
        })
    }

    // -- Messages --

    pub async fn list_messages(&self) -> Result<Vec<Message>, ClientError> {
        let resp = self.http.get(self.endpoint("/api/messages")?).send().await?;
        decode(resp).await
    }

    pub async fn post_message(&self, user: &str, content: &str) -> Result<Message, ClientError> {
        let body = SendMessageRequest {
            user: user.to_string(),
            content: content.to_string(),
        };
        self.post("/api/messages", &body).await
    }

    // -- Presence --

    pub async fn go_online(&self, username: &str, avatar: Option<&str>) -> Result<(), ClientError> {
        let body = OnlineRequest {
            username: username.to_string(),
            avatar: avatar.map(str::to_string),
        };
        self.post::<_, SuccessResponse>("/api/users/online", &body)
            .await
            .map(|_| ())
    }

    pub async fn go_offline(&self, username: &str) -> Result<(), ClientError> {
        let body = OfflineRequest {
            username: username.to_string(),
        };
        self.post::<_, SuccessResponse>("/api/users/offline", &body)
            .await
            .map(|_| ())
    }

    pub async fn online_users(&self) -> Result<Vec<PresenceEntry>, ClientError> {
        let resp = self
            .http
            .get(self.endpoint("/api/users/online")?)
            .send()
            .await?;
        decode(resp).await
    }

    // -- Users --

    pub async fn set_avatar(&self, username: &str, avatar: &str) -> Result<(), ClientError> {
        let body = AvatarRequest {
            username: username.to_string(),
            avatar: avatar.to_string(),
        };
        self.post::<_, SuccessResponse>("/api/users/avatar", &body)
            .await
            .map(|_| ())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
