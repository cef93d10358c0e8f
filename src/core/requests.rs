//! Request bodies and query parameters for write and report operations
//!
//! Each builder validates its input locally before anything is sent. Issues
//! carry the location the API schema would report (`body.prices.0.price_amount`),
//! so local and server-side rejections render identically.

use crate::api::client::Query;
use crate::error::{FieldIssue, InputValidationError};
use crate::utils::validation::{validate_currency, validate_email, validate_url};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Value, json};

const EMPTY_NAME: &str = "Name must not be empty";
const EMPTY_ID: &str = "ID must not be empty";
const NEGATIVE_AMOUNT: &str = "Input should be greater than or equal to 0";
const NOT_POSITIVE: &str = "Input should be greater than 0";
const RANGE_REVERSED: &str = "End must not be before start";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WebhookFormat {
    #[default]
    Raw,
    Discord,
    Slack,
}

/// Collects issues and converts them into a single error.
#[derive(Debug, Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn check(&mut self, result: Result<(), String>, loc: &[&str]) {
        if let Err(msg) = result {
            self.0.push(FieldIssue::new(loc.iter().copied(), msg));
        }
    }

    fn non_empty(&mut self, value: &str, loc: &[&str]) {
        if value.trim().is_empty() {
            self.0.push(FieldIssue::new(loc.iter().copied(), EMPTY_NAME));
        }
    }

    /// Parse `text` as a JSON object. Anything else is recorded and yields `Null`.
    fn json_object(&mut self, text: &str, loc: &[&str]) -> Value {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                self.check(Err("Input should be a JSON object".to_string()), loc);
                Value::Null
            }
            Err(e) => {
                self.check(Err(format!("Invalid JSON: {}", e)), loc);
                Value::Null
            }
        }
    }

    /// Record a parse failure as an issue at `loc`.
    fn parsed<T>(&mut self, result: Result<T, String>, loc: &[&str]) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(msg) => {
                self.check(Err(msg), loc);
                None
            }
        }
    }

    fn events(&mut self, events: &[String]) {
        for (index, event) in events.iter().enumerate() {
            if event.trim().is_empty() {
                let index = index.to_string();
                self.check(
                    Err("Event type must not be empty".to_string()),
                    &["body", "events", index.as_str()],
                );
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, InputValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(InputValidationError { issues: self.0 })
        }
    }
}

// Organization requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrganizationCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl OrganizationCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.name, &["body", "name"]);
        issues.finish(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OrganizationUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        let Some(name) = &self.name else {
            return Ok(None);
        };
        let mut issues = Issues::default();
        issues.non_empty(name, &["body", "name"]);
        issues.finish(Some(self))
    }
}

// Product requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceCreate {
    pub amount_type: &'static str,
    #[serde(rename = "type")]
    pub price_type: &'static str,
    pub price_amount: i64,
    pub price_currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
    pub prices: Vec<PriceCreate>,
}

/// Command-line input for `products create`.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub organization_id: Option<String>,
    pub description: Option<String>,
    pub price_amount: Option<i64>,
    pub price_currency: String,
    pub recurring_interval: Option<RecurringInterval>,
}

impl ProductInput {
    pub fn build(self) -> Result<ProductCreate, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.name, &["body", "name"]);

        let mut prices = Vec::new();
        if let Some(amount) = self.price_amount {
            if amount < 0 {
                issues.check(
                    Err(NEGATIVE_AMOUNT.to_string()),
                    &["body", "prices", "0", "price_amount"],
                );
            }
            issues.check(
                validate_currency(&self.price_currency),
                &["body", "prices", "0", "price_currency"],
            );
            prices.push(PriceCreate {
                amount_type: "fixed",
                price_type: if self.recurring_interval.is_some() {
                    "recurring"
                } else {
                    "one_time"
                },
                price_amount: amount,
                price_currency: self.price_currency.to_lowercase(),
                recurring_interval: self.recurring_interval,
            });
        }

        issues.finish(ProductCreate {
            name: self.name,
            organization_id: self.organization_id,
            description: self.description,
            recurring_interval: self.recurring_interval,
            prices,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl ProductUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if let Some(name) = &self.name {
            issues.non_empty(name, &["body", "name"]);
        }
        issues.finish(Some(self))
    }
}

// Customer requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerCreate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl CustomerCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        issues.check(validate_email(&self.email), &["body", "email"]);
        issues.finish(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CustomerUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if let Some(email) = &self.email {
            issues.check(validate_email(email), &["body", "email"]);
        }
        issues.finish(Some(self))
    }
}

// Webhook requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookEndpointCreate {
    pub url: String,
    pub format: WebhookFormat,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl WebhookEndpointCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        issues.check(validate_url(&self.url), &["body", "url"]);
        issues.events(&self.events);
        issues.finish(self)
    }
}

// Discount requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiscountDuration {
    #[default]
    Once,
    Forever,
    Repeating,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscountCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub duration: DiscountDuration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_redemptions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Command-line input for `discounts create`. `amount` is a percentage for
/// percentage discounts and cents for fixed ones.
#[derive(Debug, Clone)]
pub struct DiscountInput {
    pub name: String,
    pub discount_type: DiscountType,
    pub amount: i64,
    pub duration: DiscountDuration,
    pub duration_in_months: Option<u32>,
    pub currency: String,
    pub code: Option<String>,
    pub max_redemptions: Option<u32>,
    pub organization_id: Option<String>,
}

impl DiscountInput {
    pub fn build(self) -> Result<DiscountCreate, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.name, &["body", "name"]);

        let (basis_points, amount, currency) = match self.discount_type {
            DiscountType::Percentage => {
                if !(1..=100).contains(&self.amount) {
                    issues.check(
                        Err("Percentage must be between 1 and 100".to_string()),
                        &["body", "basis_points"],
                    );
                }
                (Some(self.amount * 100), None, None)
            }
            DiscountType::Fixed => {
                if self.amount < 0 {
                    issues.check(Err(NEGATIVE_AMOUNT.to_string()), &["body", "amount"]);
                }
                issues.check(validate_currency(&self.currency), &["body", "currency"]);
                (None, Some(self.amount), Some(self.currency.to_lowercase()))
            }
        };

        let duration_in_months = match self.duration {
            DiscountDuration::Repeating => {
                if !self.duration_in_months.is_some_and(|months| months > 0) {
                    issues.check(
                        Err("Required for repeating discounts".to_string()),
                        &["body", "duration_in_months"],
                    );
                }
                self.duration_in_months
            }
            DiscountDuration::Once | DiscountDuration::Forever => None,
        };

        if self.max_redemptions == Some(0) {
            issues.check(Err(NOT_POSITIVE.to_string()), &["body", "max_redemptions"]);
        }

        issues.finish(DiscountCreate {
            name: self.name,
            discount_type: self.discount_type,
            duration: self.duration,
            duration_in_months,
            basis_points,
            amount,
            currency,
            code: self.code.filter(|code| !code.is_empty()),
            max_redemptions: self.max_redemptions,
            organization_id: self.organization_id,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DiscountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_redemptions: Option<u32>,
}

impl DiscountUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if let Some(name) = &self.name {
            issues.non_empty(name, &["body", "name"]);
        }
        if self.max_redemptions == Some(0) {
            issues.check(Err(NOT_POSITIVE.to_string()), &["body", "max_redemptions"]);
        }
        issues.finish(Some(self))
    }
}

// Benefit requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum BenefitType {
    #[default]
    Custom,
    Discord,
    Downloadables,
    GithubRepository,
    LicenseKeys,
    MeterCredit,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BenefitCreate {
    #[serde(rename = "type")]
    pub benefit_type: BenefitType,
    pub description: String,
    pub selectable: bool,
    pub is_tax_applicable: bool,
    pub properties: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Command-line input for `benefits create`; `properties` is raw JSON text.
#[derive(Debug, Clone, Default)]
pub struct BenefitInput {
    pub benefit_type: BenefitType,
    pub description: String,
    pub selectable: bool,
    pub is_tax_applicable: bool,
    pub properties: Option<String>,
    pub organization_id: Option<String>,
}

impl BenefitInput {
    pub fn build(self) -> Result<BenefitCreate, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.description, &["body", "description"]);

        let properties = match &self.properties {
            Some(text) => issues.json_object(text, &["body", "properties"]),
            None if self.benefit_type == BenefitType::Custom => json!({"note": null}),
            None => json!({}),
        };

        issues.finish(BenefitCreate {
            benefit_type: self.benefit_type,
            description: self.description,
            selectable: self.selectable,
            is_tax_applicable: self.is_tax_applicable,
            properties,
            organization_id: self.organization_id,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BenefitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BenefitUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        let Some(description) = &self.description else {
            return Ok(None);
        };
        let mut issues = Issues::default();
        issues.non_empty(description, &["body", "description"]);
        issues.finish(Some(self))
    }
}

// Meter requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeterCreate {
    pub name: String,
    pub filter: Value,
    pub aggregation: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Command-line input for `meters create`; filter and aggregation are JSON text.
#[derive(Debug, Clone, Default)]
pub struct MeterInput {
    pub name: String,
    pub filter: String,
    pub aggregation: String,
    pub organization_id: Option<String>,
}

impl MeterInput {
    pub fn build(self) -> Result<MeterCreate, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.name, &["body", "name"]);
        let filter = issues.json_object(&self.filter, &["body", "filter"]);
        let aggregation = issues.json_object(&self.aggregation, &["body", "aggregation"]);
        if aggregation.is_object() && !aggregation.get("func").is_some_and(Value::is_string) {
            issues.check(
                Err("Field required".to_string()),
                &["body", "aggregation", "func"],
            );
        }

        issues.finish(MeterCreate {
            name: self.name,
            filter,
            aggregation,
            organization_id: self.organization_id,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeInterval {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl TimeInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInterval::Hour => "hour",
            TimeInterval::Day => "day",
            TimeInterval::Week => "week",
            TimeInterval::Month => "month",
            TimeInterval::Year => "year",
        }
    }
}

/// Time range for `meters quantities`. Bounds accept RFC 3339 timestamps,
/// naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) or plain dates (midnight UTC).
#[derive(Debug, Clone)]
pub struct QuantitiesInput {
    pub start: String,
    pub end: String,
    pub interval: TimeInterval,
}

impl QuantitiesInput {
    pub fn build(self) -> Result<Query, InputValidationError> {
        let mut issues = Issues::default();
        let start = issues.parsed(parse_timestamp(&self.start), &["query", "start_timestamp"]);
        let end = issues.parsed(parse_timestamp(&self.end), &["query", "end_timestamp"]);

        let mut query = Query::new();
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                issues.check(Err(RANGE_REVERSED.to_string()), &["query", "end_timestamp"]);
            }
            query.push(("start_timestamp", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
            query.push(("end_timestamp", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
            query.push(("interval", self.interval.as_str().to_string()));
        }
        issues.finish(query)
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("Invalid timestamp '{}', expected ISO 8601", text))
}

/// Date range and scope for `metrics get`.
#[derive(Debug, Clone)]
pub struct MetricsInput {
    pub start_date: String,
    pub end_date: String,
    pub interval: TimeInterval,
    pub organization_id: String,
    pub product_id: Option<String>,
}

impl MetricsInput {
    pub fn build(self) -> Result<Query, InputValidationError> {
        let mut issues = Issues::default();
        let start = issues.parsed(parse_date(&self.start_date), &["query", "start_date"]);
        let end = issues.parsed(parse_date(&self.end_date), &["query", "end_date"]);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                issues.check(Err(RANGE_REVERSED.to_string()), &["query", "end_date"]);
            }
        }

        let mut query: Query = vec![
            ("start_date", self.start_date),
            ("end_date", self.end_date),
            ("interval", self.interval.as_str().to_string()),
            ("organization_id", self.organization_id),
        ];
        if let Some(product_id) = self.product_id.filter(|id| !id.is_empty()) {
            query.push(("product_id", product_id));
        }
        issues.finish(query)
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", text))
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NameUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NameUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        let Some(name) = &self.name else {
            return Ok(None);
        };
        let mut issues = Issues::default();
        issues.non_empty(name, &["body", "name"]);
        issues.finish(Some(self))
    }
}

// Event requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventIngest {
    pub events: Vec<Value>,
}

impl EventIngest {
    /// Parse a JSON array of events; each needs a non-empty `name`.
    pub fn parse(text: &str) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        let events = match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(events)) => events,
            Ok(_) => {
                issues.check(Err("Input should be a JSON array".to_string()), &["body", "events"]);
                Vec::new()
            }
            Err(e) => {
                issues.check(Err(format!("Invalid JSON: {}", e)), &["body", "events"]);
                Vec::new()
            }
        };

        for (index, event) in events.iter().enumerate() {
            let named = event
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| !name.trim().is_empty());
            if !named {
                let index = index.to_string();
                issues.check(
                    Err("Field required".to_string()),
                    &["body", "events", index.as_str(), "name"],
                );
            }
        }
        issues.finish(Self { events })
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EventTypeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl EventTypeUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Option<Self> {
        self.is_archived.is_some().then_some(self)
    }
}

// Checkout requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutLinkCreate {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CheckoutLinkCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.product_id, &["body", "product_id"]);
        if let Some(url) = &self.success_url {
            issues.check(validate_url(url), &["body", "success_url"]);
        }
        issues.finish(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CheckoutLinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
}

impl CheckoutLinkUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if let Some(url) = &self.success_url {
            issues.check(validate_url(url), &["body", "success_url"]);
        }
        issues.finish(Some(self))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutCreate {
    pub products: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_id: Option<String>,
}

impl CheckoutCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        if self.products.is_empty() {
            issues.check(
                Err("At least one product is required".to_string()),
                &["body", "products"],
            );
        }
        if let Some(url) = &self.success_url {
            issues.check(validate_url(url), &["body", "success_url"]);
        }
        if let Some(email) = &self.customer_email {
            issues.check(validate_email(email), &["body", "customer_email"]);
        }
        issues.finish(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CheckoutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

impl CheckoutUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        let Some(email) = &self.customer_email else {
            return Ok(None);
        };
        let mut issues = Issues::default();
        issues.check(validate_email(email), &["body", "customer_email"]);
        issues.finish(Some(self))
    }
}

// Custom field requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    #[default]
    Text,
    Number,
    Date,
    Checkbox,
    Select,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomFieldCreate {
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    pub name: String,
    pub slug: String,
    pub properties: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Command-line input for `custom-fields create`; `properties` is raw JSON text.
#[derive(Debug, Clone, Default)]
pub struct CustomFieldInput {
    pub field_type: CustomFieldType,
    pub name: String,
    pub slug: String,
    pub properties: Option<String>,
    pub organization_id: Option<String>,
}

impl CustomFieldInput {
    pub fn build(self) -> Result<CustomFieldCreate, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.name, &["body", "name"]);
        issues.check(validate_slug(&self.slug), &["body", "slug"]);
        let properties = match &self.properties {
            Some(text) => issues.json_object(text, &["body", "properties"]),
            None => json!({}),
        };

        issues.finish(CustomFieldCreate {
            field_type: self.field_type,
            name: self.name,
            slug: self.slug,
            properties,
            organization_id: self.organization_id,
        })
    }
}

fn validate_slug(slug: &str) -> Result<(), String> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err("Slug may only contain lowercase letters, digits, '-' and '_'".to_string())
    }
}

/// Rename of a custom field. The API discriminates updates by field type, so
/// the current type is sent along with the new name.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomFieldUpdate {
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
}

// Refund requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum RefundReason {
    Duplicate,
    Fraudulent,
    #[default]
    CustomerRequest,
    ServiceDisruption,
    Other,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RefundCreate {
    pub order_id: String,
    pub reason: RefundReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RefundCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&self.order_id, &["body", "order_id"]);
        if self.amount.is_some_and(|amount| amount <= 0) {
            issues.check(Err(NOT_POSITIVE.to_string()), &["body", "amount"]);
        }
        issues.finish(Self {
            comment: self.comment.filter(|comment| !comment.is_empty()),
            ..self
        })
    }
}

// License key requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LicenseKeyStatus {
    Granted,
    Revoked,
    Disabled,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LicenseKeyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LicenseKeyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_usage: Option<u32>,
}

impl LicenseKeyUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if self.limit_usage == Some(0) {
            issues.check(Err(NOT_POSITIVE.to_string()), &["body", "limit_usage"]);
        }
        issues.finish(Some(self))
    }
}

/// Body shared by the customer-portal license key actions. `label` is set for
/// activation and `activation_id` for deactivation.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LicenseKeyAction {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl LicenseKeyAction {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        if self.key.trim().is_empty() {
            issues.check(Err("License key must not be empty".to_string()), &["body", "key"]);
        }
        if let Some(label) = &self.label {
            issues.non_empty(label, &["body", "label"]);
        }
        issues.finish(self)
    }
}

// Member requests
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemberCreate {
    pub customer_id: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl MemberUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if let Some(name) = &self.name {
            issues.non_empty(name, &["body", "name"]);
        }
        issues.finish(Some(self))
    }
}

// File requests
/// Multipart upload chunk size.
pub const UPLOAD_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FileService {
    #[default]
    Downloadable,
    ProductMedia,
    OrganizationAvatar,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadPart {
    pub number: u32,
    pub chunk_start: u64,
    pub chunk_end: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileUpload {
    pub parts: Vec<UploadPart>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileCreate {
    pub service: FileService,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub upload: FileUpload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl FileCreate {
    pub fn new(
        service: FileService,
        name: String,
        mime_type: String,
        size: u64,
        organization_id: Option<String>,
    ) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        issues.non_empty(&name, &["body", "name"]);
        if mime_type.split_once('/').is_none_or(|(kind, sub)| kind.is_empty() || sub.is_empty()) {
            issues.check(
                Err("MIME type must look like type/subtype".to_string()),
                &["body", "mime_type"],
            );
        }
        if size == 0 {
            issues.check(Err(NOT_POSITIVE.to_string()), &["body", "size"]);
        }

        issues.finish(Self {
            service,
            name,
            mime_type,
            size,
            upload: FileUpload {
                parts: upload_parts(size),
            },
            organization_id,
        })
    }
}

/// Split `size` bytes into consecutive [`UPLOAD_CHUNK_SIZE`] parts, numbered from 1.
pub fn upload_parts(size: u64) -> Vec<UploadPart> {
    (0..size.div_ceil(UPLOAD_CHUNK_SIZE))
        .map(|index| {
            let chunk_start = index * UPLOAD_CHUNK_SIZE;
            UploadPart {
                number: index as u32 + 1,
                chunk_start,
                chunk_end: (chunk_start + UPLOAD_CHUNK_SIZE).min(size),
            }
        })
        .collect()
}

// Order and subscription requests
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_name: Option<String>,
}

impl OrderUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Option<Self> {
        self.billing_name.is_some().then_some(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionCreate {
    pub product_id: String,
    pub customer_id: String,
}

impl SubscriptionCreate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        if self.product_id.trim().is_empty() {
            issues.check(Err(EMPTY_ID.to_string()), &["body", "product_id"]);
        }
        if self.customer_id.trim().is_empty() {
            issues.check(Err(EMPTY_ID.to_string()), &["body", "customer_id"]);
        }
        issues.finish(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_at_period_end: Option<bool>,
}

impl SubscriptionUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if self.product_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            issues.check(Err(EMPTY_ID.to_string()), &["body", "product_id"]);
        }
        issues.finish(Some(self))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductBenefitsUpdate {
    pub benefits: Vec<String>,
}

impl ProductBenefitsUpdate {
    pub fn validated(self) -> Result<Self, InputValidationError> {
        let mut issues = Issues::default();
        for (index, benefit) in self.benefits.iter().enumerate() {
            if benefit.trim().is_empty() {
                let index = index.to_string();
                issues.check(Err(EMPTY_ID.to_string()), &["body", "benefits", index.as_str()]);
            }
        }
        issues.finish(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WebhookEndpointUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
}

impl WebhookEndpointUpdate {
    /// `None` when there is nothing to send.
    pub fn validated(self) -> Result<Option<Self>, InputValidationError> {
        if self == Self::default() {
            return Ok(None);
        }
        let mut issues = Issues::default();
        if let Some(url) = &self.url {
            issues.check(validate_url(url), &["body", "url"]);
        }
        issues.events(self.events.as_deref().unwrap_or_default());
        issues.finish(Some(self))
    }
}
