use super::types::ListParams;
use crate::AppError;
use crate::api::client::PolarClient;
use crate::api::models::{ListResource, Organization};
use crate::api::resources::ORGANIZATIONS;
use crate::core::requests::{OrganizationCreate, OrganizationUpdate};
use crate::error::CliError;
use crate::utils::validation::is_uuid;

/// Organization lookups and mutations
pub struct OrganizationService {
    client: PolarClient,
}

impl OrganizationService {
    pub fn new(client: PolarClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ListParams) -> Result<ListResource<Organization>, AppError> {
        Ok(self.client.list(ORGANIZATIONS.path, &params.to_query()).await?)
    }

    /// Resolve an organization by UUID, or by slug through the list endpoint.
    pub async fn find(&self, id_or_slug: &str) -> Result<Organization, AppError> {
        if is_uuid(id_or_slug) {
            return Ok(self.client.get(&ORGANIZATIONS.item_path(id_or_slug)).await?);
        }

        let query = vec![
            ("slug", id_or_slug.to_string()),
            ("limit", "1".to_string()),
        ];
        let result: ListResource<Organization> =
            self.client.list(ORGANIZATIONS.path, &query).await?;

        result.items.into_iter().next().ok_or_else(|| {
            CliError::OrganizationNotFound {
                id_or_slug: id_or_slug.to_string(),
            }
            .into()
        })
    }

    pub async fn create(&self, request: &OrganizationCreate) -> Result<Organization, AppError> {
        Ok(self.client.post(ORGANIZATIONS.path, request).await?)
    }

    pub async fn update(
        &self,
        id_or_slug: &str,
        request: &OrganizationUpdate,
    ) -> Result<Organization, AppError> {
        let organization = self.find(id_or_slug).await?;
        Ok(self
            .client
            .patch(&ORGANIZATIONS.item_path(&organization.id), request)
            .await?)
    }
}

/// Organization to scope a command to: the `--org` flag, else the configured default.
pub fn resolve_org_id(flag: Option<&str>, default: Option<&str>) -> Result<String, CliError> {
    flag.filter(|id| !id.is_empty())
        .or(default)
        .map(str::to_string)
        .ok_or(CliError::NoOrganization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ORG_ID: &str = "1dbfc517-0bbf-4301-9ba8-555ca42b9737";

    fn org_json() -> serde_json::Value {
        json!({"id": ORG_ID, "name": "Acme", "slug": "acme", "created_at": "2024-05-01T12:00:00Z"})
    }

    async fn service(server: &MockServer) -> OrganizationService {
        let client = PolarClient::new(&server.uri(), "token".to_string()).expect("client");
        OrganizationService::new(client)
    }

    #[test]
    fn test_resolve_org_id() {
        assert_eq!(resolve_org_id(Some("org_flag"), Some("org_default")).expect("org"), "org_flag");
        assert_eq!(resolve_org_id(None, Some("org_default")).expect("org"), "org_default");
        assert_eq!(resolve_org_id(Some(""), Some("org_default")).expect("org"), "org_default");
        assert!(matches!(resolve_org_id(None, None), Err(CliError::NoOrganization)));
    }

    #[tokio::test]
    async fn test_find_by_uuid_uses_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/organizations/{}", ORG_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(org_json()))
            .mount(&server)
            .await;

        let org = service(&server).await.find(ORG_ID).await.expect("found");
        assert_eq!(org.slug, "acme");
    }

    #[tokio::test]
    async fn test_find_by_slug_uses_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/organizations/"))
            .and(query_param("slug", "acme"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [org_json()],
                "pagination": {"total_count": 1, "max_page": 1}
            })))
            .mount(&server)
            .await;

        let org = service(&server).await.find("acme").await.expect("found");
        assert_eq!(org.id, ORG_ID);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/organizations/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "pagination": {"total_count": 0, "max_page": 0}
            })))
            .mount(&server)
            .await;

        let result = service(&server).await.find("ghost").await;
        assert!(matches!(
            result,
            Err(AppError::Cli(CliError::OrganizationNotFound { ref id_or_slug })) if id_or_slug == "ghost"
        ));
    }
}
