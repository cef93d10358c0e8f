use super::types::ListParams;
use crate::AppError;
use crate::api::client::{PolarClient, Query};
use crate::api::models::ListResource;
use crate::api::resources::Resource;
use serde::Serialize;
use serde_json::Value;

/// Generic operations over any catalogued [`Resource`]. Entities stay as
/// loosely-typed JSON so that structured output is lossless.
pub struct ResourceService {
    client: PolarClient,
}

impl ResourceService {
    pub fn new(client: PolarClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        resource: &Resource,
        params: &ListParams,
    ) -> Result<ListResource<Value>, AppError> {
        tracing::debug!(resource = resource.label, page = params.page, "listing");
        Ok(self.client.list(resource.path, &params.to_query()).await?)
    }

    pub async fn get(&self, resource: &Resource, id: &str) -> Result<Value, AppError> {
        Ok(self.client.get(&resource.item_path(id)).await?)
    }

    pub async fn create<B>(&self, resource: &Resource, body: &B) -> Result<Value, AppError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.client.post(resource.path, body).await?)
    }

    pub async fn update<B>(&self, resource: &Resource, id: &str, body: &B) -> Result<Value, AppError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.client.patch(&resource.item_path(id), body).await?)
    }

    /// DELETE the item. Some endpoints (subscription revoke) answer with the
    /// updated entity, others with no content (`Value::Null`).
    pub async fn delete(&self, resource: &Resource, id: &str) -> Result<Value, AppError> {
        Ok(self.client.delete(&resource.item_path(id)).await?)
    }

    /// GET a sub-resource of an item, e.g. `/v1/orders/{id}/invoice`.
    pub async fn get_nested(
        &self,
        resource: &Resource,
        id: &str,
        child: &str,
    ) -> Result<Value, AppError> {
        Ok(self.client.get(&resource.child_path(id, child)).await?)
    }

    /// Like [`Self::get_nested`] with query parameters, e.g. meter quantities.
    pub async fn query_nested(
        &self,
        resource: &Resource,
        id: &str,
        child: &str,
        query: &Query,
    ) -> Result<Value, AppError> {
        Ok(self
            .client
            .get_with(&resource.child_path(id, child), query)
            .await?)
    }

    /// Paginated collection below an item, e.g. `/v1/benefits/{id}/grants`.
    pub async fn list_nested(
        &self,
        resource: &Resource,
        id: &str,
        child: &str,
        params: &ListParams,
    ) -> Result<ListResource<Value>, AppError> {
        Ok(self
            .client
            .list(&resource.child_path(id, child), &params.to_query())
            .await?)
    }

    /// Paginated collection below the resource, e.g. `/v1/events/names`.
    pub async fn list_action(
        &self,
        resource: &Resource,
        action: &str,
        params: &ListParams,
    ) -> Result<ListResource<Value>, AppError> {
        Ok(self
            .client
            .list(&resource.action_path(action), &params.to_query())
            .await?)
    }

    pub async fn get_action(
        &self,
        resource: &Resource,
        action: &str,
        query: &Query,
    ) -> Result<Value, AppError> {
        Ok(self.client.get_with(&resource.action_path(action), query).await?)
    }

    pub async fn post_action<B>(
        &self,
        resource: &Resource,
        action: &str,
        body: &B,
    ) -> Result<Value, AppError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.client.post(&resource.action_path(action), body).await?)
    }

    pub async fn post_nested<B>(
        &self,
        resource: &Resource,
        id: &str,
        child: &str,
        body: &B,
    ) -> Result<Value, AppError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.client.post(&resource.child_path(id, child), body).await?)
    }

    /// Bodyless POST below an item, e.g. invoice generation or redelivery.
    pub async fn trigger(&self, resource: &Resource, id: &str, child: &str) -> Result<Value, AppError> {
        Ok(self.client.post_empty(&resource.child_path(id, child)).await?)
    }

    /// Bodyless PATCH below an item, e.g. resetting a webhook secret.
    pub async fn reset(&self, resource: &Resource, id: &str, child: &str) -> Result<Value, AppError> {
        Ok(self.client.patch_empty(&resource.child_path(id, child)).await?)
    }

    /// CSV export of the collection, returned verbatim.
    pub async fn export(&self, resource: &Resource, organization_id: &str) -> Result<String, AppError> {
        tracing::debug!(resource = resource.label, "exporting");
        let query: Query = vec![("organization_id", organization_id.to_string())];
        Ok(self
            .client
            .get_text(&resource.action_path("export"), &query)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::{BENEFITS, CUSTOMERS, EVENTS, ORDERS, PRODUCTS, SUBSCRIPTIONS};
    use crate::error::ApiError;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> ResourceService {
        ResourceService::new(PolarClient::new(&server.uri(), "token".to_string()).expect("client"))
    }

    #[tokio::test]
    async fn test_list_passes_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products/"))
            .and(query_param("organization_id", "org_1"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "p_1"}, {"id": "p_2"}],
                "pagination": {"total_count": 50, "max_page": 25}
            })))
            .mount(&server)
            .await;

        let params = ListParams {
            organization_id: Some("org_1".to_string()),
            ..ListParams::page(1, 2)
        };
        let list = service(&server).list(&PRODUCTS, &params).await.expect("list");
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.pagination.total_count, 50);
    }

    #[tokio::test]
    async fn test_update_uses_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/products/p_1"))
            .and(body_json(json!({"is_archived": true})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "p_1", "is_archived": true})),
            )
            .mount(&server)
            .await;

        let updated = service(&server)
            .update(&PRODUCTS, "p_1", &json!({"is_archived": true}))
            .await
            .expect("update");
        assert_eq!(updated["is_archived"], json!(true));
    }

    #[tokio::test]
    async fn test_revoke_returns_entity() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/subscriptions/s_1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "s_1", "status": "canceled"})),
            )
            .mount(&server)
            .await;

        let revoked = service(&server).delete(&SUBSCRIPTIONS, "s_1").await.expect("revoke");
        assert_eq!(revoked["status"], json!("canceled"));
    }

    #[tokio::test]
    async fn test_nested_get_and_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orders/o_1/invoice"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"url": "https://files/invoice.pdf"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/orders/o_2/invoice"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let invoice = service(&server)
            .get_nested(&ORDERS, "o_1", "invoice")
            .await
            .expect("invoice");
        assert_eq!(invoice["url"], json!("https://files/invoice.pdf"));

        let missing = service(&server).get_nested(&ORDERS, "o_2", "invoice").await;
        assert!(matches!(
            missing,
            Err(AppError::Api(ApiError::Status { status: 404, .. }))
        ));
    }

    #[tokio::test]
    async fn test_nested_and_action_listings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/benefits/b_1/grants"))
            .and(query_param("is_granted", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "g_1", "is_granted": true}],
                "pagination": {"total_count": 1, "max_page": 1}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/events/names"))
            .and(query_param("organization_id", "org_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"name": "api_call", "source": "user"}],
                "pagination": {"total_count": 1, "max_page": 1}
            })))
            .mount(&server)
            .await;

        let grants = service(&server)
            .list_nested(
                &BENEFITS,
                "b_1",
                "grants",
                &ListParams::default().with_filter("is_granted", Some("true".to_string())),
            )
            .await
            .expect("grants");
        assert_eq!(grants.items[0]["id"], json!("g_1"));

        let params = ListParams {
            organization_id: Some("org_1".to_string()),
            ..ListParams::default()
        };
        let names = service(&server)
            .list_action(&EVENTS, "names", &params)
            .await
            .expect("names");
        assert_eq!(names.items[0]["name"], json!("api_call"));
    }

    #[tokio::test]
    async fn test_actions_and_export() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/events/ingest"))
            .and(body_json(json!({"events": [{"name": "api_call"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"inserted": 1})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/orders/o_1/invoice"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v1/products/p_1/secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p_1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/customers/export"))
            .and(query_param("organization_id", "org_1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("id\nc_1\n"))
            .mount(&server)
            .await;

        let service = service(&server);
        let ingested = service
            .post_action(&EVENTS, "ingest", &json!({"events": [{"name": "api_call"}]}))
            .await
            .expect("ingest");
        assert_eq!(ingested["inserted"], json!(1));

        let accepted = service.trigger(&ORDERS, "o_1", "invoice").await.expect("trigger");
        assert!(accepted.is_null());

        let reset = service.reset(&PRODUCTS, "p_1", "secret").await.expect("reset");
        assert_eq!(reset["id"], json!("p_1"));

        let csv = service.export(&CUSTOMERS, "org_1").await.expect("export");
        assert_eq!(csv, "id\nc_1\n");
    }
}
