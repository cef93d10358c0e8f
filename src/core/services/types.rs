use crate::api::client::Query;

/// Paging and filtering for list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub organization_id: Option<String>,
    pub query: Option<String>,
    pub page: u32,
    pub limit: u32,
    /// Resource-specific filters such as `product_id`.
    pub filters: Vec<(&'static str, String)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            organization_id: None,
            query: None,
            page: 1,
            limit: 20,
            filters: Vec::new(),
        }
    }
}

impl ListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, key: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.filters.push((key, value));
        }
        self
    }

    pub fn to_query(&self) -> Query {
        let mut query: Query = Vec::new();
        if let Some(org) = &self.organization_id {
            query.push(("organization_id", org.clone()));
        }
        if let Some(text) = self.query.as_ref().filter(|q| !q.is_empty()) {
            query.push(("query", text.clone()));
        }
        query.push(("page", self.page.to_string()));
        query.push(("limit", self.limit.to_string()));
        query.extend(self.filters.iter().cloned());
        query
    }
}
