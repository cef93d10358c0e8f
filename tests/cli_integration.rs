use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG_ID: &str = "1dbfc517-0bbf-4301-9ba8-555ca42b9737";

/// `polar` pointed at `base_url` with an isolated config dir and a token from the environment.
fn polar(config_dir: &TempDir, base_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("polar").expect("binary built");
    cmd.env("POLAR_ACCESS_TOKEN", "polar_oat_test")
        .env_remove("POLAR_DEBUG")
        .env_remove("POLAR_BASE_URL")
        .env_remove("POLAR_LOG")
        .arg("--no-color")
        .arg("--config-dir")
        .arg(config_dir.path())
        .arg("--base-url")
        .arg(base_url);
    cmd
}

fn products_page() -> Value {
    json!({
        "items": [
            {"id": "p_1", "name": "Starter", "is_archived": false, "created_at": "2024-05-01T12:00:00Z"},
            {"id": "p_2", "name": "Pro", "is_archived": true, "created_at": "2024-06-02T08:30:00Z"}
        ],
        "pagination": {"total_count": 50, "max_page": 25}
    })
}

#[test]
fn test_help_lists_command_groups() {
    Command::cargo_bin("polar")
        .expect("binary built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("products"))
        .stdout(predicate::str::contains("license-keys"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_token_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/products/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_token"})))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["products", "list", "--org", ORG_ID])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Authentication error"))
        .stderr(predicate::str::contains("Hint: Run 'polar auth login' to authenticate"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_validation_error_lists_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/customers/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "email"], "msg": "Invalid email", "type": "value_error"}]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["customers", "create", "--email", "taken@example.com"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Validation error"))
        .stderr(predicate::str::contains("email: Invalid email"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_local_validation_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c_1"})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["customers", "create", "--email", "not-an-email"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Validation error"))
        .stderr(predicate::str::contains("email:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_table_shows_pagination_footer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/products/"))
        .and(query_param("organization_id", ORG_ID))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["products", "list", "--org", ORG_ID, "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starter"))
        .stdout(predicate::str::contains("2024-06-02 08:30"))
        .stdout(predicate::str::contains("Showing 2 of 50 total"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_is_parseable_without_footer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let output = polar(&dir, &server.uri())
        .args(["products", "list", "--org", ORG_ID, "-o", "json"])
        .output()
        .expect("run polar");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("Showing"));

    let parsed: Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed[0]["id"], "p_1");
    assert_eq!(parsed[1]["created_at"], "2024-06-02T08:30:00Z");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_default_org_from_config_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/"))
        .and(query_param("organization_id", "org_from_config"))
        .and(query_param("customer_id", "cus_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "pagination": {"total_count": 0, "max_page": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[production]\ndefault_org_id = \"org_from_config\"\n",
    )
    .expect("write config");

    polar(&dir, &server.uri())
        .args(["orders", "list", "--customer-id", "cus_1", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_org_fails_before_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");

    polar(&dir, &server.uri())
        .args(["subscriptions", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No organization specified"))
        .stderr(predicate::str::contains("polar org set-default"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unexpected_error_body_is_generic_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/meters/m_1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"foo": "bar"})))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["meters", "get", "m_1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API error (500)"))
        .stderr(predicate::str::contains("foo"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/o_missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "ResourceNotFound", "detail": "Order not found"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["orders", "get", "o_missing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Not found"))
        .stderr(predicate::str::contains("Order not found"));
}

#[test]
fn test_connection_refused_exit_code() {
    let dir = TempDir::new().expect("temp dir");
    polar(&dir, "http://127.0.0.1:9")
        .args(["products", "get", "p_1"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Connection error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_order_invoice_prints_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/o_1/invoice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "https://files.example/inv.pdf"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["orders", "invoice", "o_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice URL"))
        .stdout(predicate::str::contains("https://files.example/inv.pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_nothing_to_send() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p_1"})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["products", "update", "p_1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Nothing to update."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_declined_confirmation_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["customers", "delete", "c_1"])
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted"));
}

#[test]
fn test_config_show_reports_environment() {
    let dir = TempDir::new().expect("temp dir");
    polar(&dir, "http://127.0.0.1:9")
        .args(["--sandbox", "config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"environment\": \"sandbox\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_percentage_discount_is_sent_in_basis_points() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/discounts/"))
        .and(body_json(json!({
            "name": "Launch",
            "type": "percentage",
            "duration": "once",
            "basis_points": 1500,
            "code": "LAUNCH15"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "d_1", "name": "Launch"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args([
            "discounts", "create", "--name", "Launch", "--type", "percentage", "--amount", "15",
            "--code", "LAUNCH15",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Discount created: d_1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_customer_export_writes_csv_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers/export"))
        .and(query_param("organization_id", ORG_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("id,email\nc_1,ada@example.com\n")
                .insert_header("content-type", "text/csv"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["customers", "export", "--org", ORG_ID])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,email\nc_1,ada@example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_metrics_query_uses_default_org() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/metrics/"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-03-31"))
        .and(query_param("interval", "month"))
        .and(query_param("organization_id", "org_from_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "periods": [{"timestamp": "2024-01-01T00:00:00Z", "revenue": 1200}],
            "totals": {"revenue": 1200}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[production]\ndefault_org_id = \"org_from_config\"\n",
    )
    .expect("write config");

    polar(&dir, &server.uri())
        .args(["metrics", "get", "--start-date", "2024-01-01", "--end-date", "2024-03-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"revenue\": 1200"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reversed_metrics_range_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args([
            "metrics", "get", "--start-date", "2024-03-01", "--end-date", "2024-01-01", "--org",
            ORG_ID,
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("end_date"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_webhook_secret_reset_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/webhooks/endpoints/we_1/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "we_1",
            "url": "https://example.com/hook",
            "format": "raw"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["webhooks", "reset-secret", "we_1", "-y"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Webhook endpoint secret reset: we_1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_event_ingest_reports_inserted_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/events/ingest"))
        .and(body_json(json!({"events": [{"name": "api_call", "customer_id": "c_1"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"inserted": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    polar(&dir, &server.uri())
        .args(["events", "ingest", r#"[{"name": "api_call", "customer_id": "c_1"}]"#])
        .assert()
        .success()
        .stderr(predicate::str::contains("Events ingested: 1"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_at_confirmation_prompt_is_cancelled() {
    use std::io::Read;
    use std::process::Stdio;
    use std::time::Duration;

    let dir = TempDir::new().expect("temp dir");
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("polar"))
        .env("POLAR_ACCESS_TOKEN", "polar_oat_test")
        .env_remove("POLAR_DEBUG")
        .env_remove("POLAR_BASE_URL")
        .env_remove("POLAR_LOG")
        .arg("--no-color")
        .arg("--config-dir")
        .arg(dir.path())
        .args(["--base-url", "http://127.0.0.1:9", "customers", "delete", "c_1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn polar");

    // Keep stdin open so the prompt stays blocked on input.
    let _stdin = child.stdin.take();
    let mut stderr = child.stderr.take().expect("stderr");

    let mut seen = Vec::new();
    let mut byte = [0u8; 1];
    while !String::from_utf8_lossy(&seen).contains("[y/N]") {
        let read = stderr.read(&mut byte).expect("read stderr");
        assert!(read > 0, "prompt not shown: {}", String::from_utf8_lossy(&seen));
        seen.push(byte[0]);
    }
    std::thread::sleep(Duration::from_millis(500));

    let killed = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(killed.success());

    let status = child.wait().expect("wait for polar");
    stderr.read_to_end(&mut seen).expect("read stderr");
    assert_eq!(status.code(), Some(130));
    assert!(String::from_utf8_lossy(&seen).contains("Cancelled"));
}
