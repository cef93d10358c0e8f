use crate::core::requests::{
    BenefitType, CustomFieldType, DiscountDuration, DiscountType, FileService, LicenseKeyStatus,
    RecurringInterval, RefundReason, TimeInterval, WebhookFormat,
};
use crate::display::OutputFormat;
use clap::{ArgAction, Args, Parser, Subcommand, builder::FalseyValueParser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "polar")]
#[command(about = "Command line interface for the Polar API")]
#[command(version)]
#[command(after_help = "Examples:
  polar auth login                      # Store an access token
  polar org set-default acme            # Use 'acme' when --org is omitted
  polar products list                   # List products of the default organization
  polar customers get <id> -o json      # Output a customer as JSON
  polar --sandbox orders list           # Talk to the sandbox environment

Environment Variables:
  POLAR_ACCESS_TOKEN   Access token, takes priority over the stored one
  POLAR_BASE_URL       Override the API base URL
  POLAR_DEBUG          Print error details after unexpected failures
  POLAR_LOG            Log filter, e.g. polar_cli=debug")]
pub struct Cli {
    /// Override the API base URL
    #[arg(long, global = true, env = "POLAR_BASE_URL")]
    pub base_url: Option<String>,

    /// Use the sandbox environment
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print full error details after unexpected failures
    #[arg(
        long,
        global = true,
        env = "POLAR_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Access token for this invocation
    #[arg(long, global = true, env = "POLAR_ACCESS_TOKEN", hide = true, hide_env_values = true)]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with Polar
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Inspect the local configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage organizations
    Org {
        #[command(subcommand)]
        command: OrgCommands,
    },
    /// Manage organization members
    Members {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage customers
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Manage subscriptions
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },
    /// Manage webhook endpoints and deliveries
    Webhooks {
        #[command(subcommand)]
        command: WebhookCommands,
    },
    /// Manage discounts
    Discounts {
        #[command(subcommand)]
        command: DiscountCommands,
    },
    /// Manage benefits
    Benefits {
        #[command(subcommand)]
        command: BenefitCommands,
    },
    /// Manage license keys
    LicenseKeys {
        #[command(subcommand)]
        command: LicenseKeyCommands,
    },
    /// Manage usage meters
    Meters {
        #[command(subcommand)]
        command: MeterCommands,
    },
    /// Manage ingested events
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Manage event types
    EventTypes {
        #[command(subcommand)]
        command: EventTypeCommands,
    },
    /// View revenue and subscription metrics
    Metrics {
        #[command(subcommand)]
        command: MetricsCommands,
    },
    /// Manage files
    Files {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Manage refunds
    Refunds {
        #[command(subcommand)]
        command: RefundCommands,
    },
    /// View payments
    Payments {
        #[command(subcommand)]
        command: ReadOnlyCommands,
    },
    /// View disputes
    Disputes {
        #[command(subcommand)]
        command: ReadOnlyCommands,
    },
    /// Manage checkout links
    CheckoutLinks {
        #[command(subcommand)]
        command: CheckoutLinkCommands,
    },
    /// Manage checkout sessions
    Checkouts {
        #[command(subcommand)]
        command: CheckoutCommands,
    },
    /// Manage custom fields
    CustomFields {
        #[command(subcommand)]
        command: CustomFieldCommands,
    },
    /// View benefit grants
    BenefitGrants {
        #[command(subcommand)]
        command: ReadOnlyCommands,
    },
}

impl Commands {
    /// Command group name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Auth { .. } => "auth",
            Commands::Config { .. } => "config",
            Commands::Org { .. } => "org",
            Commands::Members { .. } => "members",
            Commands::Products { .. } => "products",
            Commands::Customers { .. } => "customers",
            Commands::Orders { .. } => "orders",
            Commands::Subscriptions { .. } => "subscriptions",
            Commands::Webhooks { .. } => "webhooks",
            Commands::Discounts { .. } => "discounts",
            Commands::Benefits { .. } => "benefits",
            Commands::LicenseKeys { .. } => "license-keys",
            Commands::Meters { .. } => "meters",
            Commands::Events { .. } => "events",
            Commands::EventTypes { .. } => "event-types",
            Commands::Metrics { .. } => "metrics",
            Commands::Files { .. } => "files",
            Commands::Refunds { .. } => "refunds",
            Commands::Payments { .. } => "payments",
            Commands::Disputes { .. } => "disputes",
            Commands::CheckoutLinks { .. } => "checkout-links",
            Commands::Checkouts { .. } => "checkouts",
            Commands::CustomFields { .. } => "custom-fields",
            Commands::BenefitGrants { .. } => "benefit-grants",
        }
    }
}

/// Paging and scoping options shared by list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Organization ID (defaults to the configured organization)
    #[arg(long)]
    pub org: Option<String>,
    /// Search query
    #[arg(short, long)]
    pub query: Option<String>,
    /// Page number
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
    /// Items per page
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: u32,
}

/// Paging options for lists that are not scoped to an organization
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page number
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
    /// Items per page
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: u32,
}

/// `--yes` for destructive commands
#[derive(Args, Debug, Clone, Copy)]
pub struct ConfirmArgs {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with a personal access token
    Login {
        /// Access token. Prompted for when omitted
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Remove the stored access token
    Logout,
    /// Show authentication status
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
}

#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// List organizations you have access to
    List(PageArgs),
    /// Get an organization by ID or slug
    Get {
        /// Organization ID or slug
        id: String,
    },
    /// Set the default organization for commands
    SetDefault {
        /// Organization ID or slug
        id: String,
    },
    /// Create an organization
    Create {
        #[arg(long)]
        name: String,
        /// URL slug
        #[arg(long)]
        slug: Option<String>,
    },
    /// Update an organization
    Update {
        /// Organization ID or slug
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// List members
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by customer
        #[arg(long)]
        customer_id: Option<String>,
    },
    /// Get a member
    Get { id: String },
    /// Create a member for a customer
    Create {
        #[arg(long)]
        customer_id: String,
    },
    /// Update a member
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete a member
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products
    List(ListArgs),
    /// Get a product
    Get { id: String },
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        /// Organization ID (only needed for tokens spanning several organizations)
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Price in cents
        #[arg(long, allow_negative_numbers = true)]
        price_amount: Option<i64>,
        /// Currency code
        #[arg(long, default_value = "usd")]
        price_currency: String,
        #[arg(long, value_enum)]
        recurring_interval: Option<RecurringInterval>,
    },
    /// Update a product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Archive (true) or unarchive (false)
        #[arg(long)]
        is_archived: Option<bool>,
    },
    /// Set the benefits attached to a product
    UpdateBenefits {
        id: String,
        /// Benefit ID (repeat for multiple)
        #[arg(long = "benefit", required = true)]
        benefits: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// List customers
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by email
        #[arg(long)]
        email: Option<String>,
    },
    /// Get a customer
    Get { id: String },
    /// Create a customer
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        /// Your own identifier for the customer
        #[arg(long)]
        external_id: Option<String>,
        #[arg(long)]
        org: Option<String>,
    },
    /// Update a customer
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a customer
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Show active subscriptions and granted benefits of a customer
    State { id: String },
    /// Export customers as CSV
    Export {
        #[arg(long)]
        org: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// List orders
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by product
        #[arg(long)]
        product_id: Option<String>,
        /// Filter by customer
        #[arg(long)]
        customer_id: Option<String>,
    },
    /// Get an order
    Get { id: String },
    /// Update an order
    Update {
        id: String,
        #[arg(long)]
        billing_name: Option<String>,
    },
    /// Get the invoice URL of an order
    Invoice { id: String },
    /// Generate a new invoice for an order
    GenerateInvoice { id: String },
    /// Export orders as CSV
    Export {
        #[arg(long)]
        org: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SubscriptionCommands {
    /// List subscriptions
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by product
        #[arg(long)]
        product_id: Option<String>,
        /// Filter by customer
        #[arg(long)]
        customer_id: Option<String>,
        /// Filter by active status
        #[arg(long)]
        active: Option<bool>,
    },
    /// Get a subscription
    Get { id: String },
    /// Create a free subscription for a customer
    Create {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        customer_id: String,
    },
    /// Update a subscription
    Update {
        id: String,
        /// Move to a different product
        #[arg(long)]
        product_id: Option<String>,
        /// Cancel at the end of the current period (true) or resume (false)
        #[arg(long)]
        cancel_at_period_end: Option<bool>,
    },
    /// Revoke (immediately cancel) a subscription
    Revoke {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Export subscriptions as CSV
    Export {
        #[arg(long)]
        org: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    /// List webhook endpoints
    Endpoints(ListArgs),
    /// Get a webhook endpoint
    GetEndpoint { id: String },
    /// Create a webhook endpoint
    CreateEndpoint {
        #[arg(long)]
        url: String,
        /// Event type to subscribe to (repeat for multiple)
        #[arg(long = "event")]
        events: Vec<String>,
        /// Payload format
        #[arg(long, value_enum, default_value_t = WebhookFormat::Raw)]
        format: WebhookFormat,
        #[arg(long)]
        org: Option<String>,
    },
    /// Update a webhook endpoint
    UpdateEndpoint {
        id: String,
        #[arg(long)]
        url: Option<String>,
        /// Event type to subscribe to (repeat for multiple)
        #[arg(long = "event")]
        events: Vec<String>,
    },
    /// Delete a webhook endpoint
    DeleteEndpoint {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Reset the signing secret of a webhook endpoint
    ResetSecret {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// List webhook deliveries
    Deliveries {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by endpoint
        #[arg(long)]
        endpoint_id: Option<String>,
        /// Filter by delivery outcome
        #[arg(long)]
        succeeded: Option<bool>,
    },
    /// Redeliver a webhook event
    Redeliver {
        /// Webhook event ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DiscountCommands {
    /// List discounts
    List(ListArgs),
    /// Get a discount
    Get { id: String },
    /// Create a discount
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_enum)]
        discount_type: DiscountType,
        /// Percent off (1-100) for percentage discounts, cents for fixed ones
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,
        #[arg(long, value_enum, default_value_t = DiscountDuration::Once)]
        duration: DiscountDuration,
        /// Months the discount applies (repeating discounts only)
        #[arg(long)]
        duration_in_months: Option<u32>,
        /// Currency of fixed discounts
        #[arg(long, default_value = "usd")]
        currency: String,
        /// Coupon code
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        max_redemptions: Option<u32>,
        #[arg(long)]
        org: Option<String>,
    },
    /// Update a discount
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        max_redemptions: Option<u32>,
    },
    /// Delete a discount
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum BenefitCommands {
    /// List benefits
    List(ListArgs),
    /// Get a benefit
    Get { id: String },
    /// Create a benefit
    Create {
        #[arg(long)]
        description: String,
        #[arg(long = "type", value_enum, default_value_t = BenefitType::Custom)]
        benefit_type: BenefitType,
        /// Let customers select this benefit
        #[arg(long)]
        selectable: bool,
        #[arg(long)]
        tax_applicable: bool,
        /// Type-specific properties as a JSON object
        #[arg(long)]
        properties: Option<String>,
        #[arg(long)]
        org: Option<String>,
    },
    /// Update a benefit
    Update {
        id: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a benefit
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// List grants of a benefit
    Grants {
        id: String,
        #[command(flatten)]
        page: PageArgs,
        /// Filter by grant status
        #[arg(long)]
        granted: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LicenseKeyCommands {
    /// List license keys
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by benefit
        #[arg(long)]
        benefit_id: Option<String>,
    },
    /// Get a license key
    Get { id: String },
    /// Update a license key
    Update {
        id: String,
        #[arg(long, value_enum)]
        status: Option<LicenseKeyStatus>,
        #[arg(long)]
        limit_usage: Option<u32>,
    },
    /// Validate a license key
    Validate {
        /// The license key string
        key: String,
        #[arg(long)]
        org: Option<String>,
    },
    /// Activate a license key
    Activate {
        #[arg(long)]
        key: String,
        /// Activation label, e.g. a machine ID
        #[arg(long)]
        label: String,
        #[arg(long)]
        org: Option<String>,
    },
    /// Deactivate a license key activation
    Deactivate {
        #[arg(long)]
        key: String,
        #[arg(long)]
        activation_id: String,
        #[arg(long)]
        org: Option<String>,
    },
    /// Get an activation of a license key
    GetActivation {
        /// License key ID
        id: String,
        activation_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MeterCommands {
    /// List meters
    List(ListArgs),
    /// Get a meter
    Get { id: String },
    /// Create a meter
    Create {
        #[arg(long)]
        name: String,
        /// Event filter as JSON, e.g. '{"conjunction": "and", "clauses": []}'
        #[arg(long)]
        filter: String,
        /// Aggregation as JSON, e.g. '{"func": "count"}'
        #[arg(long)]
        aggregation: String,
        #[arg(long)]
        org: Option<String>,
    },
    /// Update a meter
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Show meter quantities over a time range
    Quantities {
        id: String,
        /// Start timestamp (ISO 8601)
        #[arg(long)]
        start: String,
        /// End timestamp (ISO 8601)
        #[arg(long)]
        end: String,
        #[arg(long, value_enum, default_value_t = TimeInterval::Day)]
        interval: TimeInterval,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// List events
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by customer
        #[arg(long)]
        customer_id: Option<String>,
    },
    /// Get an event
    Get { id: String },
    /// List distinct event names
    Names(ListArgs),
    /// Ingest events from a JSON array
    Ingest {
        /// JSON array of events, each with at least a name
        events: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventTypeCommands {
    /// List event types
    List(ListArgs),
    /// Archive or unarchive an event type
    Update {
        id: String,
        #[arg(long)]
        is_archived: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MetricsCommands {
    /// Get revenue and subscription metrics for a date range
    Get {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,
        #[arg(long, value_enum, default_value_t = TimeInterval::Month)]
        interval: TimeInterval,
        #[arg(long)]
        org: Option<String>,
        /// Filter by product
        #[arg(long)]
        product_id: Option<String>,
    },
    /// Show the available metrics and their limits
    Limits,
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// List files
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        org: Option<String>,
    },
    /// Create a file entry and its multipart upload
    Create {
        #[arg(long)]
        name: String,
        /// MIME type, e.g. application/zip
        #[arg(long)]
        mime_type: String,
        /// File size in bytes
        #[arg(long)]
        size: u64,
        #[arg(long, value_enum, default_value_t = FileService::Downloadable)]
        service: FileService,
        #[arg(long)]
        org: Option<String>,
    },
    /// Rename a file
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a file
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum RefundCommands {
    /// List refunds
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by order
        #[arg(long)]
        order_id: Option<String>,
        /// Filter by customer
        #[arg(long)]
        customer_id: Option<String>,
        /// Filter by outcome
        #[arg(long)]
        succeeded: Option<bool>,
    },
    /// Get a refund
    Get { id: String },
    /// Refund an order
    Create {
        #[arg(long)]
        order_id: String,
        #[arg(long, value_enum, default_value_t = RefundReason::CustomerRequest)]
        reason: RefundReason,
        /// Partial amount in cents. Omit for a full refund
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<i64>,
        /// Internal comment
        #[arg(long)]
        comment: Option<String>,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum CheckoutLinkCommands {
    /// List checkout links
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by product
        #[arg(long)]
        product_id: Option<String>,
    },
    /// Get a checkout link
    Get { id: String },
    /// Create a checkout link
    Create {
        #[arg(long)]
        product_id: String,
        /// Redirect after checkout
        #[arg(long)]
        success_url: Option<String>,
        /// Internal label
        #[arg(long)]
        label: Option<String>,
    },
    /// Update a checkout link
    Update {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        success_url: Option<String>,
    },
    /// Delete a checkout link
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum CheckoutCommands {
    /// List checkout sessions
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by product
        #[arg(long)]
        product_id: Option<String>,
    },
    /// Get a checkout session
    Get { id: String },
    /// Create a checkout session
    Create {
        /// Product ID (repeat for multiple)
        #[arg(long = "product", required = true)]
        products: Vec<String>,
        /// Redirect after checkout
        #[arg(long)]
        success_url: Option<String>,
        /// Pre-fill the customer email
        #[arg(long)]
        customer_email: Option<String>,
        /// Discount to apply
        #[arg(long)]
        discount_id: Option<String>,
    },
    /// Update a checkout session
    Update {
        id: String,
        #[arg(long)]
        customer_email: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomFieldCommands {
    /// List custom fields
    List(ListArgs),
    /// Get a custom field
    Get { id: String },
    /// Create a custom field
    Create {
        #[arg(long)]
        name: String,
        /// URL-friendly identifier
        #[arg(long)]
        slug: String,
        #[arg(long = "type", value_enum, default_value_t = CustomFieldType::Text)]
        field_type: CustomFieldType,
        /// Type-specific properties as a JSON object, e.g. select options
        #[arg(long)]
        properties: Option<String>,
        #[arg(long)]
        org: Option<String>,
    },
    /// Rename a custom field
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a custom field
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReadOnlyCommands {
    /// List items
    List(ListArgs),
    /// Get an item by ID
    Get { id: String },
}
