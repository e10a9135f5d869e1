pub mod endpoints;

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{BuddyError, Result};

/// HTTP client wrapper for the Bill Buddy REST API.
///
/// Clones share the same connection pool and bearer token slot, so a token
/// set after login is seen by every store holding a clone.
#[derive(Debug, Clone)]
pub struct BuddyHttpClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl BuddyHttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Attach `token` as the bearer credential of subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// The bearer token currently attached, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let req = self.client.get(self.url(path)).query(query);
        let resp = self.send(req).await?;
        resp.json::<T>().await.map_err(BuddyError::Request)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.client.post(self.url(path)).json(body);
        let resp = self.send(req).await?;
        resp.json::<T>().await.map_err(BuddyError::Request)
    }

    /// POST a JSON body, ignoring whatever the server answers on success.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let req = self.client.post(self.url(path)).json(body);
        self.send(req).await?;
        Ok(())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let req = match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status, body = %body, "request failed");
            return Err(error_from_body(status, body));
        }

        Ok(resp)
    }
}

/// Map a failed response body to an error, preferring the server's `error` text.
fn error_from_body(status: u16, body: String) -> BuddyError {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            error: Some(message),
        }) => BuddyError::Api { status, message },
        _ => BuddyError::Http {
            status,
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_body_with_server_text() {
        let err = error_from_body(400, r#"{"error":"Email already registered"}"#.into());
        assert!(matches!(err, BuddyError::Api { status: 400, ref message } if message == "Email already registered"));
    }

    #[test]
    fn test_error_from_body_without_server_text() {
        let err = error_from_body(500, "Internal Server Error".into());
        assert!(matches!(err, BuddyError::Http { status: 500, .. }));

        let err = error_from_body(404, r#"{"status":404}"#.into());
        assert!(matches!(err, BuddyError::Http { status: 404, .. }));
    }

    #[test]
    fn test_url_joins_with_and_without_leading_slash() {
        let client = BuddyHttpClient::new("http://localhost:8080/");
        assert_eq!(client.url("/groups/detail"), "http://localhost:8080/groups/detail");
        assert_eq!(client.url("expenses/group/3"), "http://localhost:8080/expenses/group/3");
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let client = BuddyHttpClient::new("http://localhost:8080");
        let clone = client.clone();
        client.set_token(Some("abc".into()));
        assert_eq!(clone.token().as_deref(), Some("abc"));
        clone.set_token(None);
        assert!(client.token().is_none());
    }
}
