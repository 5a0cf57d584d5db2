//! HTTP backend for the Staffly REST API
//!
//! | operation | route |
//! |-----------|-------|
//! | membership | `GET {root}/restaurants/{id}/membership` → `{"role": ...}`; 404 = not a member |
//! | layout load | `GET {root}/restaurants/{id}/dashboard-layout` → `{"layout": [...]}` |
//! | layout save | `PUT {root}/restaurants/{id}/dashboard-layout` with `{"layout": [...]}` |
//!
//! Failure bodies of the form `{"message": "..."}` (or `{"error": "..."}`)
//! are surfaced as the user-facing message of the resulting error.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use staffly_access::{AccessError, MembershipSource, RestaurantId};
use staffly_layout::{CardId, LayoutApi, LayoutError, LayoutPayload};

const MEMBERSHIP_PATH: &str = "membership";
const LAYOUT_PATH: &str = "dashboard-layout";

#[derive(Debug, Deserialize)]
struct MembershipResponse {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extract a user-facing message from a failure body
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// reqwest-backed implementation of the remote collaborators
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    root: Url,
}

impl HttpBackend {
    /// Build a backend from configuration
    ///
    /// # Errors
    /// Returns error if the base URL or token is unusable, or the client
    /// cannot be built
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let root = Url::parse(config.api_root())
            .map_err(|e| ClientError::invalid_config(format!("base_url: {e}")))?;
        if root.cannot_be_a_base() {
            return Err(ClientError::invalid_config("base_url cannot carry a path"));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::invalid_config("token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        tracing::debug!(root = %root, authenticated = config.token.is_some(), "http backend ready");
        Ok(Self { client, root })
    }

    /// URL of a per-restaurant resource
    #[must_use]
    pub fn restaurant_url(&self, restaurant: &RestaurantId, resource: &str) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["restaurants", restaurant.as_str(), resource]);
        }
        url
    }

    async fn failure(response: reqwest::Response) -> LayoutError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        LayoutError::remote(Some(status), error_message(&body))
    }

    async fn read_layout(response: reqwest::Response) -> Result<Vec<CardId>, LayoutError> {
        let payload: LayoutPayload = response
            .json()
            .await
            .map_err(|e| LayoutError::Malformed(e.to_string()))?;
        Ok(payload.into_ids())
    }
}

#[async_trait]
impl LayoutApi for HttpBackend {
    async fn fetch_layout(&self, restaurant: &RestaurantId) -> Result<Vec<CardId>, LayoutError> {
        let url = self.restaurant_url(restaurant, LAYOUT_PATH);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LayoutError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Self::read_layout(response).await
    }

    async fn save_layout(
        &self,
        restaurant: &RestaurantId,
        layout: &[CardId],
    ) -> Result<Vec<CardId>, LayoutError> {
        let url = self.restaurant_url(restaurant, LAYOUT_PATH);
        let response = self
            .client
            .put(url)
            .json(&LayoutPayload::new(layout.to_vec()))
            .send()
            .await
            .map_err(|e| LayoutError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(layout.to_vec()),
            status if status.is_success() => Self::read_layout(response).await,
            _ => Err(Self::failure(response).await),
        }
    }
}

#[async_trait]
impl MembershipSource for HttpBackend {
    async fn fetch_role(&self, restaurant: &RestaurantId) -> Result<Option<String>, AccessError> {
        let url = self.restaurant_url(restaurant, MEMBERSHIP_PATH);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AccessError::membership_lookup(restaurant.clone(), e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!(%restaurant, "not a member");
                Ok(None)
            }
            status if status.is_success() => {
                let body: MembershipResponse = response.json().await.map_err(|e| {
                    AccessError::membership_lookup(restaurant.clone(), format!("malformed body: {e}"))
                })?;
                Ok(body.role)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                let detail = error_message(&body).unwrap_or_else(|| status.to_string());
                Err(AccessError::membership_lookup(restaurant.clone(), detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(&ClientConfig::new().with_base_url(base).with_token("t0k")).unwrap()
    }

    #[test]
    fn builds_restaurant_urls() {
        let http = backend("https://api.staffly.test/v1/");
        let url = http.restaurant_url(&RestaurantId::new("r-1"), LAYOUT_PATH);
        assert_eq!(
            url.as_str(),
            "https://api.staffly.test/v1/restaurants/r-1/dashboard-layout"
        );
    }

    #[test]
    fn restaurant_ids_are_escaped() {
        let http = backend("https://api.staffly.test");
        let url = http.restaurant_url(&RestaurantId::new("a/b c"), MEMBERSHIP_PATH);
        assert_eq!(
            url.as_str(),
            "https://api.staffly.test/restaurants/a%2Fb%20c/membership"
        );
    }

    #[test]
    fn rejects_bad_token() {
        let config = ClientConfig::new().with_token("line\nbreak");
        let err = HttpBackend::new(&config).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn extracts_error_messages() {
        assert_eq!(
            error_message(r#"{"message":"Layout contains unknown cards"}"#).as_deref(),
            Some("Layout contains unknown cards")
        );
        assert_eq!(error_message(r#"{"error":"forbidden"}"#).as_deref(), Some("forbidden"));
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn membership_role_may_be_null() {
        let body: MembershipResponse = serde_json::from_str(r#"{"role":null}"#).unwrap();
        assert_eq!(body.role, None);
        let body: MembershipResponse = serde_json::from_str(r#"{"role":"manager"}"#).unwrap();
        assert_eq!(body.role.as_deref(), Some("manager"));
    }
}
