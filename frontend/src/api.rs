use crate::config::AppConfig;
use crate::error::ApiError;
use crate::storage;
use gloo_net::http::{Request, RequestBuilder, Response};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::RequestCredentials;

/// Thin JSON client over the portal REST API.
///
/// The bearer token is read from storage on every call so a login or logout
/// elsewhere in the app takes effect without rebuilding the client.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.credentials(RequestCredentials::Include);
        match storage::access_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {url}");
        let resp = self
            .authorize(Request::get(&url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {url}");
        let request = self
            .authorize(Request::post(&url))
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("PUT {url}");
        let request = self
            .authorize(Request::put(&url))
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!("DELETE {url}");
        let resp = self
            .authorize(Request::delete(&url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(resp).await.map(|_| ())
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::from_status(status, &body))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let resp = check_status(resp).await?;
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
