//! Catalogue of API resources the CLI can browse
//!
//! Each [`Resource`] ties an endpoint path to the columns shown in list
//! tables and the fields shown in detail views.

use crate::display::format::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Singular label used in status notices, e.g. "Product".
    pub label: &'static str,
    /// Collection path, always ending with `/`.
    pub path: &'static str,
    /// Whether list requests need an `organization_id` filter.
    pub org_scoped: bool,
    /// Whether list requests accept a free-text `query` filter.
    pub searchable: bool,
    pub list_columns: &'static [Column],
    pub detail_fields: &'static [Column],
}

impl Resource {
    pub fn item_path(&self, id: &str) -> String {
        format!("{}{}", self.path, id)
    }

    /// Path below an item, e.g. `/v1/orders/{id}/invoice`.
    pub fn child_path(&self, id: &str, child: &str) -> String {
        format!("{}{}/{}", self.path, id, child)
    }

    /// Path below the collection, e.g. `/v1/events/ingest`.
    pub fn action_path(&self, action: &str) -> String {
        format!("{}{}", self.path, action)
    }
}

const fn c(header: &'static str, path: &'static str) -> Column {
    Column::new(header, path)
}

pub const ORGANIZATIONS: Resource = Resource {
    label: "Organization",
    path: "/v1/organizations/",
    org_scoped: false,
    searchable: false,
    list_columns: &[c("ID", "id"), c("Slug", "slug"), c("Name", "name"), c("Created", "created_at")],
    detail_fields: &[
        c("ID", "id"),
        c("Slug", "slug"),
        c("Name", "name"),
        c("Avatar URL", "avatar_url"),
        c("Created", "created_at"),
    ],
};

pub const PRODUCTS: Resource = Resource {
    label: "Product",
    path: "/v1/products/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Is Archived", "is_archived"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Description", "description"),
        c("Is Archived", "is_archived"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
        c("Modified", "modified_at"),
    ],
};

pub const CUSTOMERS: Resource = Resource {
    label: "Customer",
    path: "/v1/customers/",
    org_scoped: true,
    searchable: true,
    list_columns: &[c("ID", "id"), c("Email", "email"), c("Name", "name"), c("Created", "created_at")],
    detail_fields: &[
        c("ID", "id"),
        c("Email", "email"),
        c("Name", "name"),
        c("External ID", "external_id"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
    ],
};

pub const ORDERS: Resource = Resource {
    label: "Order",
    path: "/v1/orders/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Product ID", "product_id"),
        c("Customer ID", "customer_id"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Product ID", "product_id"),
        c("Customer ID", "customer_id"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Tax Amount", "tax_amount"),
        c("Created", "created_at"),
    ],
};

pub const SUBSCRIPTIONS: Resource = Resource {
    label: "Subscription",
    path: "/v1/subscriptions/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Product ID", "product_id"),
        c("Customer ID", "customer_id"),
        c("Status", "status"),
        c("Current Period Start", "current_period_start"),
        c("Current Period End", "current_period_end"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Product ID", "product_id"),
        c("Customer ID", "customer_id"),
        c("Status", "status"),
        c("Current Period Start", "current_period_start"),
        c("Current Period End", "current_period_end"),
        c("Cancel At Period End", "cancel_at_period_end"),
        c("Created", "created_at"),
    ],
};

pub const WEBHOOK_ENDPOINTS: Resource = Resource {
    label: "Endpoint",
    path: "/v1/webhooks/endpoints/",
    org_scoped: true,
    searchable: false,
    list_columns: &[c("ID", "id"), c("URL", "url"), c("Created", "created_at")],
    detail_fields: &[
        c("ID", "id"),
        c("URL", "url"),
        c("Format", "format"),
        c("Secret", "secret"),
        c("Events", "events"),
        c("Created", "created_at"),
    ],
};

pub const WEBHOOK_DELIVERIES: Resource = Resource {
    label: "Delivery",
    path: "/v1/webhooks/deliveries/",
    org_scoped: false,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Event Type", "webhook_event.type"),
        c("HTTP Code", "http_code"),
        c("Succeeded", "succeeded"),
        c("Created", "created_at"),
    ],
    detail_fields: &[],
};

pub const DISCOUNTS: Resource = Resource {
    label: "Discount",
    path: "/v1/discounts/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Code", "code"),
        c("Type", "type"),
        c("Amount", "amount"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Code", "code"),
        c("Type", "type"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Duration", "duration"),
        c("Max Redemptions", "max_redemptions"),
        c("Redemptions Count", "redemptions_count"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
    ],
};

pub const BENEFITS: Resource = Resource {
    label: "Benefit",
    path: "/v1/benefits/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Type", "type"),
        c("Description", "description"),
        c("Selectable", "selectable"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Type", "type"),
        c("Description", "description"),
        c("Selectable", "selectable"),
        c("Deletable", "deletable"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
    ],
};

pub const LICENSE_KEYS: Resource = Resource {
    label: "License key",
    path: "/v1/license-keys/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Key", "display_key"),
        c("Status", "status"),
        c("Usage", "usage"),
        c("Limit", "limit_usage"),
        c("Customer ID", "customer_id"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Key", "key"),
        c("Status", "status"),
        c("Usage", "usage"),
        c("Limit", "limit_usage"),
        c("Validations", "validations"),
        c("Customer ID", "customer_id"),
        c("Benefit ID", "benefit_id"),
        c("Expires At", "expires_at"),
        c("Created", "created_at"),
    ],
};

pub const METERS: Resource = Resource {
    label: "Meter",
    path: "/v1/meters/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Aggregation", "aggregation.func"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Filter", "filter"),
        c("Aggregation", "aggregation"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
        c("Modified", "modified_at"),
    ],
};

pub const EVENTS: Resource = Resource {
    label: "Event",
    path: "/v1/events/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Source", "source"),
        c("Customer ID", "customer_id"),
        c("Created", "timestamp"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Source", "source"),
        c("Customer ID", "customer_id"),
        c("External Customer ID", "external_customer_id"),
        c("Metadata", "metadata"),
        c("Created", "timestamp"),
    ],
};

pub const REFUNDS: Resource = Resource {
    label: "Refund",
    path: "/v1/refunds/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Order ID", "order_id"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Reason", "reason"),
        c("Status", "status"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Order ID", "order_id"),
        c("Subscription ID", "subscription_id"),
        c("Customer ID", "customer_id"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Reason", "reason"),
        c("Comment", "comment"),
        c("Status", "status"),
        c("Created", "created_at"),
    ],
};

pub const PAYMENTS: Resource = Resource {
    label: "Payment",
    path: "/v1/payments/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Status", "status"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Method", "method"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Status", "status"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Method", "method"),
        c("Order ID", "order_id"),
        c("Checkout ID", "checkout_id"),
        c("Created", "created_at"),
    ],
};

pub const DISPUTES: Resource = Resource {
    label: "Dispute",
    path: "/v1/disputes/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Order ID", "order_id"),
        c("Status", "status"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Order ID", "order_id"),
        c("Status", "status"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Created", "created_at"),
    ],
};

pub const CHECKOUT_LINKS: Resource = Resource {
    label: "Checkout link",
    path: "/v1/checkout-links/",
    org_scoped: true,
    searchable: false,
    list_columns: &[c("ID", "id"), c("Label", "label"), c("URL", "url"), c("Created", "created_at")],
    detail_fields: &[
        c("ID", "id"),
        c("Label", "label"),
        c("URL", "url"),
        c("Success URL", "success_url"),
        c("Created", "created_at"),
    ],
};

pub const CHECKOUTS: Resource = Resource {
    label: "Checkout",
    path: "/v1/checkouts/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Product ID", "product_id"),
        c("Status", "status"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Product ID", "product_id"),
        c("Customer ID", "customer_id"),
        c("Status", "status"),
        c("Amount", "amount"),
        c("Currency", "currency"),
        c("URL", "url"),
        c("Success URL", "success_url"),
        c("Created", "created_at"),
    ],
};

pub const CUSTOM_FIELDS: Resource = Resource {
    label: "Custom field",
    path: "/v1/custom-fields/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Slug", "slug"),
        c("Name", "name"),
        c("Type", "type"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Slug", "slug"),
        c("Name", "name"),
        c("Type", "type"),
        c("Properties", "properties"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
    ],
};

pub const BENEFIT_GRANTS: Resource = Resource {
    label: "Benefit grant",
    path: "/v1/benefit-grants/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Benefit ID", "benefit_id"),
        c("Customer ID", "customer_id"),
        c("Is Granted", "is_granted"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Benefit ID", "benefit_id"),
        c("Customer ID", "customer_id"),
        c("Is Granted", "is_granted"),
        c("Is Revoked", "is_revoked"),
        c("Granted At", "granted_at"),
        c("Revoked At", "revoked_at"),
        c("Created", "created_at"),
    ],
};

pub const MEMBERS: Resource = Resource {
    label: "Member",
    path: "/v1/members/",
    org_scoped: false,
    searchable: false,
    list_columns: &[c("ID", "id"), c("Customer ID", "customer_id"), c("Created", "created_at")],
    detail_fields: &[
        c("ID", "id"),
        c("Customer ID", "customer_id"),
        c("Name", "name"),
        c("Role", "role"),
        c("Created", "created_at"),
        c("Modified", "modified_at"),
    ],
};

pub const EVENT_TYPES: Resource = Resource {
    label: "Event type",
    path: "/v1/event-types/",
    org_scoped: true,
    searchable: true,
    list_columns: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Source", "source"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Source", "source"),
        c("Is Archived", "is_archived"),
        c("Created", "created_at"),
        c("Modified", "modified_at"),
    ],
};

/// Distinct event names, as listed by `/v1/events/names`.
pub const EVENT_NAME_COLUMNS: &[Column] = &[
    c("Name", "name"),
    c("Source", "source"),
    c("Occurrences", "occurrences"),
    c("Last Seen", "last_seen"),
];

pub const FILES: Resource = Resource {
    label: "File",
    path: "/v1/files/",
    org_scoped: true,
    searchable: false,
    list_columns: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Size", "size"),
        c("MIME Type", "mime_type"),
        c("Service", "service"),
        c("Created", "created_at"),
    ],
    detail_fields: &[
        c("ID", "id"),
        c("Name", "name"),
        c("Size", "size"),
        c("MIME Type", "mime_type"),
        c("Service", "service"),
        c("Upload ID", "upload.id"),
        c("Organization ID", "organization_id"),
        c("Created", "created_at"),
    ],
};

/// Revenue and subscription analytics. Reports have no fixed shape, so they
/// are shown as documents.
pub const METRICS: Resource = Resource {
    label: "Metrics",
    path: "/v1/metrics/",
    org_scoped: true,
    searchable: false,
    list_columns: &[],
    detail_fields: &[],
};

/// Webhook events, addressed when redelivering.
pub const WEBHOOK_EVENTS: Resource = Resource {
    label: "Webhook event",
    path: "/v1/webhooks/events/",
    org_scoped: false,
    searchable: false,
    list_columns: &[c("ID", "id"), c("Type", "type"), c("Created", "created_at")],
    detail_fields: &[c("ID", "id"), c("Type", "type"), c("Created", "created_at")],
};

/// License key actions performed on behalf of a customer: validate, activate
/// and deactivate. Detail fields describe the validated key.
pub const LICENSE_KEY_PORTAL: Resource = Resource {
    label: "License key",
    path: "/v1/customer-portal/license-keys/",
    org_scoped: false,
    searchable: false,
    list_columns: &[c("ID", "id"), c("Key", "display_key"), c("Status", "status")],
    detail_fields: &[
        c("ID", "id"),
        c("Key", "key"),
        c("Status", "status"),
        c("Usage", "usage"),
        c("Limit", "limit_usage"),
        c("Customer ID", "customer_id"),
        c("Benefit ID", "benefit_id"),
    ],
};

pub const ACTIVATION_FIELDS: &[Column] = &[
    c("ID", "id"),
    c("License Key ID", "license_key_id"),
    c("Label", "label"),
    c("Created", "created_at"),
];
