//! Base REST client
//!
//! Ordinary non-2xx responses are returned as values, never raised;
//! only transport-level failures surface as errors. Callers must branch
//! on [`RestResult`] explicitly.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Transport-level client failures (network unreachable, malformed
/// success payload). HTTP failure statuses are NOT errors; see
/// [`RestResult`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid header value for '{name}'")]
    InvalidHeader { name: String },
}

/// A structured HTTP failure response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: u16,
    pub message: String,
}

/// Uniform envelope for remote call outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum RestResult<T> {
    Success(T),
    Error(HttpError),
}

impl<T> RestResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn into_error(self) -> Option<HttpError> {
        match self {
            Self::Success(_) => None,
            Self::Error(error) => Some(error),
        }
    }
}

/// Thin reqwest wrapper used by the typed clients
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    headers: HeaderMap,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            headers: HeaderMap::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Attach a default header to every request
    pub fn with_header(
        mut self,
        name: &str,
        value: &str,
    ) -> Result<Self, ClientError> {
        let name = HeaderName::try_from(name).map_err(|_| ClientError::InvalidHeader {
            name: name.to_string(),
        })?;
        let value = HeaderValue::try_from(value).map_err(|_| ClientError::InvalidHeader {
            name: name.to_string(),
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<RestResult<T>, ClientError> {
        let response = self.send(Method::GET, path, &[], None::<&()>).await?;
        Self::read_json(response).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<RestResult<T>, ClientError> {
        let response = self.send(Method::GET, path, query, None::<&()>).await?;
        Self::read_json(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RestResult<T>, ClientError> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Self::read_json(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RestResult<T>, ClientError> {
        let response = self.send(Method::PUT, path, &[], Some(body)).await?;
        Self::read_json(response).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RestResult<T>, ClientError> {
        let response = self.send(Method::PATCH, path, &[], Some(body)).await?;
        Self::read_json(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<RestResult<()>, ClientError> {
        let response = self.send(Method::DELETE, path, &[], None::<&()>).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(RestResult::Success(()));
        }
        Ok(RestResult::Error(Self::read_error(status, response).await))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method, url)
            .headers(self.headers.clone());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
    ) -> Result<RestResult<T>, ClientError> {
        let status = response.status();
        if status.is_success() {
            let data = response.json::<T>().await?;
            return Ok(RestResult::Success(data));
        }
        Ok(RestResult::Error(Self::read_error(status, response).await))
    }

    /// Extract the error message from a failure body, accepting both the
    /// structured envelope and plain text
    async fn read_error(status: StatusCode, response: Response) -> HttpError {
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/error/message")
                    .or_else(|| value.get("message"))
                    .and_then(|message| message.as_str())
                    .map(String::from)
            })
            .unwrap_or(body);

        HttpError {
            status: status.as_u16(),
            message,
        }
    }
}
