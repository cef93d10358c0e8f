use crate::api::models::ListResource;
use crate::error::{ApiError, ResponseBody};
use crate::map_api_error;
use crate::utils::error_helpers::{DEFAULT_TIMEOUT_SECS, convert_json_error};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("polar-cli/", env!("CARGO_PKG_VERSION"));

/// Query string pairs appended to a request.
pub type Query = Vec<(&'static str, String)>;

#[derive(Debug, Clone)]
pub struct PolarClient {
    client: Client,
    pub base_url: String,
    access_token: String,
}

impl PolarClient {
    pub fn new(base_url: &str, access_token: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client_init".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(PolarClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// GET a paginated collection.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<ListResource<T>, ApiError> {
        self.get_with(path, query).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.build_request(Method::GET, path), path).await
    }

    pub async fn get_with<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T, ApiError> {
        let request = self.build_request(Method::GET, path).query(query);
        self.execute(request, path).await
    }

    /// GET a non-JSON body, such as a CSV export, as text.
    pub async fn get_text(&self, path: &str, query: &Query) -> Result<String, ApiError> {
        let request = self.build_request(Method::GET, path).query(query);
        tracing::debug!(endpoint = path, "sending request");
        let response = map_api_error!(request.send().await, path)?;
        self.success_text(response, path).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(Method::POST, path).json(body);
        self.execute(request, path).await
    }

    /// POST without a request body, for action endpoints.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.build_request(Method::POST, path), path).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(Method::PATCH, path).json(body);
        self.execute(request, path).await
    }

    /// PATCH without a request body, for reset-style endpoints.
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.build_request(Method::PATCH, path), path).await
    }

    /// DELETE a resource. Endpoints answering `204 No Content` yield `Value::Null`
    /// when `T` is `serde_json::Value`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.build_request(Method::DELETE, path), path).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(endpoint, "sending request");
        let response = map_api_error!(request.send().await, endpoint)?;
        self.handle_response(response, endpoint).await
    }

    pub async fn handle_response<T>(&self, response: Response, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let text = self.success_text(response, endpoint).await?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| convert_json_error(e, endpoint))
    }

    /// Body of a 2xx response; any other status becomes [`ApiError::Status`].
    async fn success_text(&self, response: Response, endpoint: &str) -> Result<String, ApiError> {
        let status = response.status();
        let text = map_api_error!(response.text().await, endpoint)?;

        if status.is_success() {
            tracing::debug!(endpoint, status = status.as_u16(), "request succeeded");
            Ok(text)
        } else {
            tracing::warn!(endpoint, status = status.as_u16(), "request failed");
            Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body: ResponseBody::from(text),
            })
        }
    }
}
