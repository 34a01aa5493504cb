use crate::http::routes::Routes;
use aloha_error::ApiError;
use aloha_settings::ApiSettings;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, Url,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestType {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestType {
    fn method(&self) -> Method {
        match self {
            RequestType::Get => Method::GET,
            RequestType::Post => Method::POST,
            RequestType::Put => Method::PUT,
            RequestType::Delete => Method::DELETE,
        }
    }
}

/// Create a new HTTP client that can be shared across services
pub fn build_http_client(settings: &ApiSettings) -> Result<Client, ApiError> {
    settings
        .validate()
        .map_err(|e| ApiError::Error(format!("Invalid api settings: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| ApiError::Error(format!("Failed to create client with error: {}", e)))
}

/// Thin wrapper over `reqwest`: one attempt per call, no retries, no
/// timeout. Successful bodies that are empty or not json come back as `{}`.
#[derive(Debug, Clone)]
pub struct AlohaApiClient {
    client: Client,
    settings: ApiSettings,
    base_path: String,
}

impl AlohaApiClient {
    pub fn new(settings: &ApiSettings, client: &Client) -> Self {
        Self {
            client: client.clone(),
            settings: settings.clone(),
            base_path: settings.base_path(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Each route segment is percent-encoded on its own
    pub fn url(&self, route: &Routes) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_path).map_err(|e| {
            ApiError::Error(format!("Invalid base path {}: {}", self.base_path, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Error(format!("Base path {} cannot hold a route", self.base_path))
            })?
            .pop_if_empty()
            .extend(route.segments());

        Ok(url)
    }

    async fn send(
        &self,
        url: Url,
        request_type: RequestType,
        body: Option<Value>,
        query_params: Option<Vec<(String, String)>>,
    ) -> Result<Value, ApiError> {
        debug!("{:?} {}", request_type, url);

        let mut builder = self.client.request(request_type.method(), url.as_str());

        if let Some(params) = query_params {
            builder = builder.query(&params);
        }

        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            warn!("{:?} {} returned {}", request_type, url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                status_text,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        if bytes.is_empty() {
            return Ok(json!({}));
        }

        Ok(serde_json::from_slice::<Value>(&bytes).unwrap_or_else(|_| json!({})))
    }

    pub async fn request(
        &self,
        route: Routes,
        request_type: RequestType,
        body: Option<Value>,
        query_params: Option<Vec<(String, String)>>,
    ) -> Result<Value, ApiError> {
        let url = self.url(&route)?;
        self.send(url, request_type, body, query_params).await
    }

    /// Same as `request`, decoding the body into `T`
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        route: Routes,
        request_type: RequestType,
        body: Option<Value>,
        query_params: Option<Vec<(String, String)>>,
    ) -> Result<T, ApiError> {
        let response = self
            .request(route, request_type, body, query_params)
            .await?;

        serde_json::from_value(response).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Any failure, transport or status, counts as unhealthy
    pub async fn health_check(&self) -> bool {
        let url = match Url::parse(&self.settings.health_url()) {
            Ok(url) => url,
            Err(e) => {
                warn!("Health check failed: invalid url: {}", e);
                return false;
            }
        };

        match self.send(url, RequestType::Get, None, None).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde::Deserialize;

    async fn setup_server() -> (ServerGuard, String) {
        let server = Server::new_async().await;
        let server_url = server.url();
        (server, server_url)
    }

    fn setup_client(server_url: String) -> AlohaApiClient {
        let settings = ApiSettings {
            base_url: server_url,
            api_dir: "api".to_string(),
            health_route: "health_check".to_string(),
        };
        let client = build_http_client(&settings).unwrap();
        AlohaApiClient::new(&settings, &client)
    }

    #[test]
    fn test_build_client_rejects_bad_url() {
        let settings = ApiSettings {
            base_url: "localhost".to_string(),
            api_dir: "api".to_string(),
            health_route: "health_check".to_string(),
        };
        assert!(build_http_client(&settings).is_err());
    }

    #[test]
    fn test_ids_stay_in_their_segment() {
        let api_client = setup_client("http://localhost:3000/".to_string());

        let url = api_client
            .url(&Routes::User("a/b?c#d".to_string()))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/users/a%2Fb%3Fc%23d");

        let url = api_client.url(&Routes::GroupPermissions).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/group_permissions");
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let (mut server, server_url) = setup_server().await;
        let api_client = setup_client(server_url);

        let mock = server
            .mock("GET", "/api/users")
            .match_query(Matcher::Exact("page=2&size=5".to_string()))
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let params = vec![
            ("page".to_string(), "2".to_string()),
            ("size".to_string(), "5".to_string()),
        ];
        let response = api_client
            .request(Routes::Users, RequestType::Get, None, Some(params))
            .await
            .unwrap();

        assert_eq!(response["status"], "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (mut server, server_url) = setup_server().await;
        let api_client = setup_client(server_url);

        let _mock = server
            .mock("GET", "/api/users/missing")
            .with_status(404)
            .with_body(r#"{"detail": "ignored"}"#)
            .create_async()
            .await;

        let err = api_client
            .request(Routes::User("missing".to_string()), RequestType::Get, None, None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Request failed with status 404 Not Found");
    }

    #[tokio::test]
    async fn test_empty_and_non_json_bodies() {
        let (mut server, server_url) = setup_server().await;
        let api_client = setup_client(server_url);

        let _empty = server
            .mock("POST", "/api/auth/logout")
            .with_status(204)
            .create_async()
            .await;

        let _text = server
            .mock("DELETE", "/api/users/u-1")
            .with_status(200)
            .with_body("deleted")
            .create_async()
            .await;

        let empty = api_client
            .request(Routes::Logout, RequestType::Post, None, None)
            .await
            .unwrap();
        assert_eq!(empty, json!({}));

        let text = api_client
            .request(Routes::User("u-1".to_string()), RequestType::Delete, None, None)
            .await
            .unwrap();
        assert_eq!(text, json!({}));
    }

    #[tokio::test]
    async fn test_delete_with_body() {
        let (mut server, server_url) = setup_server().await;
        let api_client = setup_client(server_url);

        let mock = server
            .mock("DELETE", "/api/group_permissions")
            .match_body(Matcher::Json(
                json!({"group_id": "g-1", "permission_id": "p-1"}),
            ))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        api_client
            .request(
                Routes::GroupPermissions,
                RequestType::Delete,
                Some(json!({"group_id": "g-1", "permission_id": "p-1"})),
                None,
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_as_decode_error() {
        #[derive(Debug, Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let (mut server, server_url) = setup_server().await;
        let api_client = setup_client(server_url);

        let _mock = server
            .mock("GET", "/api/permissions/p-1")
            .with_status(200)
            .with_body(r#"{"id": "p-1"}"#)
            .create_async()
            .await;

        let err = api_client
            .request_as::<Named>(
                Routes::Permission("p-1".to_string()),
                RequestType::Get,
                None,
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (mut server, server_url) = setup_server().await;
        let api_client = setup_client(server_url);

        let healthy = server
            .mock("GET", "/health_check")
            .with_status(200)
            .with_body("OK")
            .expect(1)
            .create_async()
            .await;

        assert!(api_client.health_check().await);
        healthy.assert_async().await;
        healthy.remove_async().await;

        let _down = server
            .mock("GET", "/health_check")
            .with_status(503)
            .create_async()
            .await;

        assert!(!api_client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let api_client = setup_client("http://127.0.0.1:1".to_string());
        assert!(!api_client.health_check().await);
    }
}
