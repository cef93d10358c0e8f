use super::types::ListParams;
use crate::AppError;
use crate::api::client::PolarClient;
use crate::api::models::{ListResource, Organization};
use crate::api::resources::ORGANIZATIONS;
use crate::storage::config::Environment;
use crate::storage::credentials::TokenStore;

/// Token lifecycle for one environment
pub struct AuthService<'a> {
    store: &'a dyn TokenStore,
    environment: Environment,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a dyn TokenStore, environment: Environment) -> Self {
        Self { store, environment }
    }

    /// Validate `client`'s token against the API, then persist it.
    /// Returns the number of organizations the token can access.
    pub async fn login(&self, client: &PolarClient, token: &str) -> Result<u64, AppError> {
        let organizations = accessible_organizations(client, 1).await?;
        self.store.set(self.environment, token)?;
        tracing::debug!(environment = %self.environment, "token stored");
        Ok(organizations.pagination.total_count)
    }

    /// Remove the stored token. Returns whether one existed.
    pub fn logout(&self) -> Result<bool, AppError> {
        Ok(self.store.delete(self.environment)?)
    }
}

/// First page of organizations visible to the client's token.
pub async fn accessible_organizations(
    client: &PolarClient,
    limit: u32,
) -> Result<ListResource<Organization>, AppError> {
    let params = ListParams::page(1, limit);
    Ok(client.list(ORGANIZATIONS.path, &params.to_query()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::storage::credentials::MemoryTokenStore;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_stores_validated_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/organizations/"))
            .and(header("authorization", "Bearer polar_oat_good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "o1", "name": "Acme", "slug": "acme"}],
                "pagination": {"total_count": 3, "max_page": 3}
            })))
            .mount(&server)
            .await;

        let store = MemoryTokenStore::default();
        let client = PolarClient::new(&server.uri(), "polar_oat_good".to_string()).expect("client");
        let service = AuthService::new(&store, Environment::Sandbox);

        let count = service.login(&client, "polar_oat_good").await.expect("login");
        assert_eq!(count, 3);
        assert_eq!(
            store.get(Environment::Sandbox).expect("get").as_deref(),
            Some("polar_oat_good")
        );
    }

    #[tokio::test]
    async fn test_rejected_token_is_not_stored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/organizations/"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_token"})),
            )
            .mount(&server)
            .await;

        let store = MemoryTokenStore::default();
        let client = PolarClient::new(&server.uri(), "bad".to_string()).expect("client");
        let result = AuthService::new(&store, Environment::Production)
            .login(&client, "bad")
            .await;

        assert!(matches!(
            result,
            Err(AppError::Api(ApiError::Status { status: 401, .. }))
        ));
        assert_eq!(store.get(Environment::Production).expect("get"), None);
    }

    #[test]
    fn test_logout_reports_whether_token_existed() {
        let store = MemoryTokenStore::with_token(Environment::Production, "t");
        let service = AuthService::new(&store, Environment::Production);
        assert!(service.logout().expect("logout"));
        assert!(!service.logout().expect("logout"));
    }
}
