//! Twitter/X API integration.
//!
//! [`TwitterClient`] authenticates once with OAuth 1.0a user credentials and then
//! posts text. Construction verifies the credentials against `GET /2/users/me`,
//! so a `TwitterClient` that exists is one that was accepted by the API at
//! startup.

pub mod oauth;

use crate::config::TwitterConfig;
use crate::credentials::{Credentials, CredentialsError};
use crate::server::Publisher;
use async_trait::async_trait;
use oauth::OAuth1Signer;
use reqwest::{header::AUTHORIZATION, Client, Method, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

const VERIFY_PATH: &str = "/2/users/me";
const TWEETS_PATH: &str = "/2/tweets";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid Twitter API URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// Startup identity check was refused
    #[error("credential verification failed: {0}")]
    Auth(String),

    /// The API refused the post
    #[error("post rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

pub struct TwitterClient {
    http: Client,
    signer: OAuth1Signer,
    api_base: Url,
    username: String,
}

impl TwitterClient {
    /// Build a signed client and verify the credentials.
    pub async fn connect(
        credentials: &Credentials,
        config: &TwitterConfig,
    ) -> Result<Self, PublishError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| PublishError::InvalidUrl(format!("{}: {}", config.api_base, e)))?;
        let http = Client::builder().timeout(config.timeout()).build()?;

        let mut client = Self {
            http,
            signer: OAuth1Signer::new(credentials),
            api_base,
            username: String::new(),
        };

        let user = client.verify_credentials().await?;
        log::info!("Authenticated with Twitter as @{} ({})", user.username, user.id);
        client.username = user.username;

        Ok(client)
    }

    /// Account the client posts as.
    pub fn username(&self) -> &str {
        &self.username
    }

    fn endpoint(&self, path: &str) -> Result<Url, PublishError> {
        self.api_base
            .join(path)
            .map_err(|e| PublishError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn signed(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let authorization = self.signer.authorization_header(method.as_str(), &url);
        self.http
            .request(method, url)
            .header(AUTHORIZATION, authorization)
    }

    async fn verify_credentials(&self) -> Result<User, PublishError> {
        let url = self.endpoint(VERIFY_PATH)?;
        let response = self.signed(Method::GET, url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PublishError::Auth(format!("{}: {}", status, body)));
        }

        serde_json::from_str::<DataEnvelope<User>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| PublishError::Auth(format!("unexpected response: {}", e)))
    }

    /// Post `text` as a new tweet and return its id.
    pub async fn post(&self, text: &str) -> Result<String, PublishError> {
        let url = self.endpoint(TWEETS_PATH)?;
        let response = self
            .signed(Method::POST, url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected { status, body });
        }

        let created: DataEnvelope<CreatedTweet> = response.json().await?;
        Ok(created.data.id)
    }
}

#[async_trait]
impl Publisher for TwitterClient {
    async fn publish(&self, text: &str) -> Result<String, PublishError> {
        self.post(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::spawn_mock;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn credentials() -> Credentials {
        Credentials::new("ck".into(), "cs".into(), "at".into(), "ats".into())
    }

    fn config_for(api_base: String) -> TwitterConfig {
        TwitterConfig {
            api_base,
            ..TwitterConfig::default()
        }
    }

    fn is_signed(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("OAuth ") && v.contains("oauth_token=\"at\""))
            .unwrap_or(false)
    }

    fn mock_api(posted: Arc<Mutex<Vec<Value>>>) -> Router {
        Router::new()
            .route(
                VERIFY_PATH,
                get(|headers: HeaderMap| async move {
                    if is_signed(&headers) {
                        (
                            AxumStatus::OK,
                            Json(json!({"data": {"id": "42", "name": "Seattle Tides", "username": "seattletidedata"}})),
                        )
                    } else {
                        (AxumStatus::UNAUTHORIZED, Json(json!({"title": "Unauthorized"})))
                    }
                }),
            )
            .route(
                TWEETS_PATH,
                post(move |headers: HeaderMap, Json(body): Json<Value>| {
                    let posted = posted.clone();
                    async move {
                        if !is_signed(&headers) {
                            return (AxumStatus::UNAUTHORIZED, Json(json!({"title": "Unauthorized"})));
                        }
                        posted.lock().unwrap().push(body);
                        (
                            AxumStatus::CREATED,
                            Json(json!({"data": {"id": "1234567890", "text": "ok"}})),
                        )
                    }
                }),
            )
    }

    #[tokio::test]
    async fn connect_verifies_and_posts() {
        let posted = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_mock(mock_api(posted.clone())).await;

        let client = TwitterClient::connect(&credentials(), &config_for(base))
            .await
            .unwrap();
        assert_eq!(client.username(), "seattletidedata");

        let id = client.publish("Seattle tide predictions for today").await.unwrap();
        assert_eq!(id, "1234567890");

        let posted = posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0], json!({"text": "Seattle tide predictions for today"}));
    }

    #[tokio::test]
    async fn rejected_credentials_fail_connect() {
        let app = Router::new().route(
            VERIFY_PATH,
            get(|| async { (AxumStatus::UNAUTHORIZED, "Unauthorized") }),
        );
        let base = spawn_mock(app).await;

        match TwitterClient::connect(&credentials(), &config_for(base)).await {
            Err(PublishError::Auth(msg)) => assert!(msg.contains("401")),
            Err(other) => panic!("expected auth error, got {:?}", other),
            Ok(_) => panic!("expected auth error"),
        }
    }

    #[tokio::test]
    async fn rejected_post_is_an_error() {
        let app = Router::new()
            .route(
                VERIFY_PATH,
                get(|| async { Json(json!({"data": {"id": "42", "username": "seattletidedata"}})) }),
            )
            .route(
                TWEETS_PATH,
                post(|| async {
                    (
                        AxumStatus::FORBIDDEN,
                        "You are not allowed to create a Tweet with duplicate content.",
                    )
                }),
            );
        let base = spawn_mock(app).await;

        let client = TwitterClient::connect(&credentials(), &config_for(base))
            .await
            .unwrap();
        match client.publish("same again").await {
            Err(PublishError::Rejected { status, body }) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(body.contains("duplicate content"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_api_base_fails_connect() {
        let result = TwitterClient::connect(&credentials(), &config_for("::nope::".into())).await;
        assert!(matches!(result, Err(PublishError::InvalidUrl(_))));
    }
}
