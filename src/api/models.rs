use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pagination block attached to every list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: u64,
    pub max_page: u64,
}

/// Envelope of a paginated list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResource<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

// Organization models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Remaining attributes, kept so JSON/YAML output stays lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Organization {
    /// `name (slug)` label used in status notices.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.slug)
    }
}

crate::impl_serialized_record!(Organization);
