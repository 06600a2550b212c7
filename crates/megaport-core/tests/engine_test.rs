#![allow(clippy::unwrap_used)]
// End-to-end tests for `Provisioner` against a wiremock provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use megaport_api::MegaportClient;
use megaport_core::{
    CoreError, CreatePortIntent, CreatePrivateVxcIntent, DeleteOutcome, Endpoint,
    MIN_POLL_INTERVAL, PollPolicy, ProductUid, Provisioner, ProvisioningStatus, UpdatePrivateVxcIntent,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn fast_policy() -> PollPolicy {
    PollPolicy {
        initial_delay: Duration::from_millis(1),
        interval: MIN_POLL_INTERVAL,
        timeout: Duration::from_secs(30),
    }
}

async fn setup_with(policy: PollPolicy) -> (MockServer, Provisioner) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MegaportClient::with_client(reqwest::Client::new(), base_url);
    (server, Provisioner::new(client, policy))
}

async fn setup() -> (MockServer, Provisioner) {
    setup_with(fast_policy()).await
}

fn envelope(data: Value) -> Value {
    json!({ "message": "ok", "data": data })
}

/// Answers with each body in turn, then keeps repeating the last one.
fn sequence(bodies: Vec<Value>) -> impl Respond {
    let calls = AtomicUsize::new(0);
    move |_: &Request| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        let body = bodies[n.min(bodies.len() - 1)].clone();
        ResponseTemplate::new(200).set_body_json(envelope(body))
    }
}

fn port(uid: &str, status: &str) -> Value {
    json!({
        "productUid": uid,
        "productName": "edge-1",
        "productType": "MEGAPORT",
        "provisioningStatus": status,
        "locationId": 3,
        "portSpeed": 10000,
        "contractTermMonths": 12
    })
}

fn vxc(uid: &str, name: &str, status: &str, a_vlan: u16) -> Value {
    json!({
        "productUid": uid,
        "productName": name,
        "productType": "VXC",
        "provisioningStatus": status,
        "rateLimit": 100,
        "aEnd": { "productUid": "port-a", "locationId": 3, "vlan": a_vlan },
        "bEnd": { "productUid": "port-b", "locationId": 4, "vlan": 200 }
    })
}

async fn mount_ok(server: &MockServer, verb: &str, route: &str, expect: u64) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Null)))
        .expect(expect)
        .mount(server)
        .await;
}

/// Read one HTTP/1.1 request (head and `Content-Length` body) and return
/// its request line.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if raw.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw)
        .lines()
        .next()
        .unwrap_or_default()
        .to_owned()
}

async fn respond(socket: &mut TcpStream, body: &Value) {
    let body = envelope(body.clone()).to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.unwrap();
}

/// A provider that accepts the port order, hangs up on the first product
/// read without answering, then reports the port as configured.
async fn flaky_provider(product_reads: Arc<AtomicUsize>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = listener.accept().await.unwrap();
            let line = read_request(&mut socket).await;
            let body = if line.starts_with("POST /v2/networkdesign/validate") {
                json!([])
            } else if line.starts_with("POST /v2/networkdesign/buy") {
                json!([{"technicalServiceUid": "port-1"}])
            } else if line.starts_with("GET /v2/product/port-1") {
                if product_reads.fetch_add(1, Ordering::SeqCst) == 0 {
                    drop(socket);
                    continue;
                }
                port("port-1", "CONFIGURED")
            } else {
                Value::Null
            };
            respond(&mut socket, &body).await;
        }
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

fn port_intent() -> CreatePortIntent {
    CreatePortIntent {
        name: Some("edge-1".into()),
        location_id: Some(3),
        speed: Some(10_000),
        term: Some(12),
        ..CreatePortIntent::default()
    }
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_port_polls_until_configured() {
    let (server, provisioner) = setup().await;

    let expected = json!([{
        "locationId": 3,
        "portSpeed": 10000,
        "productName": "edge-1",
        "productType": "MEGAPORT",
        "term": 12,
        "virtual": false
    }]);

    Mock::given(method("POST"))
        .and(path("/v2/networkdesign/validate"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/networkdesign/buy"))
        .and(body_json(&expected))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([{"technicalServiceUid": "port-1"}]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-1"))
        .respond_with(sequence(vec![
            port("port-1", "DEPLOYABLE"),
            port("port-1", "DEPLOYABLE"),
            port("port-1", "CONFIGURED"),
        ]))
        .expect(3)
        .mount(&server)
        .await;

    let (uid, snapshot) = provisioner.create_port(&port_intent()).await.unwrap();

    assert_eq!(uid.as_str(), "port-1");
    assert_eq!(snapshot.status, ProvisioningStatus::Configured);
    assert_eq!(snapshot.speed, 10_000);
}

#[tokio::test]
async fn test_rejected_order_is_never_bought() {
    let (server, provisioner) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/networkdesign/validate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation failed",
            "data": ["location 3 does not support 100G"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_ok(&server, "POST", "/v2/networkdesign/buy", 0).await;

    let result = provisioner.create_port(&port_intent()).await;
    assert!(
        matches!(&result, Err(CoreError::ValidationRejected { message }) if message.contains("100G")),
        "expected ValidationRejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_intent_sends_nothing() {
    let (server, provisioner) = setup().await;

    let intent = CreatePortIntent {
        speed: Some(2500),
        ..port_intent()
    };
    let result = provisioner.create_port(&intent).await;

    assert!(matches!(result, Err(CoreError::InvalidIntent { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_taken_vlan_fails_before_validation() {
    let (server, provisioner) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-a/vlan"))
        .and(query_param("vlan", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([100]))))
        .expect(1)
        .mount(&server)
        .await;
    mount_ok(&server, "POST", "/v2/networkdesign/validate", 0).await;

    let intent = CreatePrivateVxcIntent {
        name: Some("a-to-b".into()),
        rate_limit: Some(100),
        a_end: Endpoint::new("port-a").with_vlan(100),
        b_end: Endpoint::new("port-b"),
        ..CreatePrivateVxcIntent::default()
    };
    let err = provisioner.create_private_vxc(&intent).await.unwrap_err();

    assert_eq!(err.to_string(), "VLAN id 100 is unavailable on product port-a");
}

#[tokio::test]
async fn test_create_times_out_with_last_status() {
    let (server, provisioner) = setup_with(PollPolicy {
        timeout: Duration::from_millis(60),
        ..fast_policy()
    })
    .await;

    mount_ok(&server, "POST", "/v2/networkdesign/validate", 1).await;
    Mock::given(method("POST"))
        .and(path("/v2/networkdesign/buy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([{"technicalServiceUid": "port-2"}]))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/product/port-2"))
        .respond_with(sequence(vec![port("port-2", "DEPLOYABLE")]))
        .mount(&server)
        .await;

    let result = provisioner.create_port(&port_intent()).await;
    assert!(
        matches!(
            &result,
            Err(CoreError::Timeout {
                last_status: Some(ProvisioningStatus::Deployable),
                ..
            })
        ),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_create_retries_after_dropped_connection() {
    let product_reads = Arc::new(AtomicUsize::new(0));
    let base_url = flaky_provider(Arc::clone(&product_reads)).await;
    let client = MegaportClient::with_client(reqwest::Client::new(), base_url);
    let provisioner = Provisioner::new(client, fast_policy());

    let (uid, snapshot) = provisioner.create_port(&port_intent()).await.unwrap();
    assert_eq!(uid.as_str(), "port-1");
    assert_eq!(snapshot.status, ProvisioningStatus::Configured);
    assert_eq!(product_reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_create_fails_when_product_disappears() {
    let (server, provisioner) = setup().await;

    mount_ok(&server, "POST", "/v2/networkdesign/validate", 1).await;
    Mock::given(method("POST"))
        .and(path("/v2/networkdesign/buy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([{"technicalServiceUid": "port-1"}]))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/product/port-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = provisioner.create_port(&port_intent()).await;
    assert!(
        matches!(&result, Err(CoreError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_waits_for_field_convergence() {
    let (server, provisioner) = setup().await;

    // Current read, then two polls: the rename lands on the second.
    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-1"))
        .respond_with(sequence(vec![
            vxc("vxc-1", "old", "LIVE", 100),
            vxc("vxc-1", "old", "LIVE", 100),
            vxc("vxc-1", "renamed", "LIVE", 100),
        ]))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v2/product/vxc/vxc-1"))
        .and(body_json(json!({"name": "renamed", "aEndVlan": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    // The A-end tag does not change, so it is not checked.
    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-a/vlan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([100]))))
        .expect(0)
        .mount(&server)
        .await;

    let mut intent = UpdatePrivateVxcIntent::new("vxc-1");
    intent.name = Some("renamed".into());
    intent.vlan_a = Some(100);

    let snapshot = provisioner.update_private_vxc(&intent).await.unwrap();
    assert_eq!(snapshot.name, "renamed");
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_treats_missing_and_decommissioned_as_absent() {
    let (server, provisioner) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-dead"))
        .respond_with(sequence(vec![vxc("vxc-dead", "x", "DECOMMISSIONED", 100)]))
        .mount(&server)
        .await;

    let gone = provisioner.read_vxc(&ProductUid::from("vxc-gone")).await.unwrap();
    let dead = provisioner.read_vxc(&ProductUid::from("vxc-dead")).await.unwrap();
    assert!(gone.is_none());
    assert!(dead.is_none());
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_waits_for_vlan_release() {
    let (server, provisioner) = setup().await;

    mount_ok(&server, "POST", "/v2/product/vxc-1/action/CANCEL_NOW", 1).await;

    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-1"))
        .respond_with(sequence(vec![vxc("vxc-1", "x", "DECOMMISSIONED", 100)]))
        .mount(&server)
        .await;

    // Still held for two polls after the product is gone.
    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-a/vlan"))
        .and(query_param("vlan", "100"))
        .respond_with(sequence(vec![json!([100]), json!([100]), json!([])]))
        .expect(3)
        .mount(&server)
        .await;

    // Private VXC: the B-end tag is released too.
    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-b/vlan"))
        .and(query_param("vlan", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provisioner.delete(&ProductUid::from("vxc-1")).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
}

#[tokio::test]
async fn test_delete_of_unknown_product_is_already_gone() {
    let (server, provisioner) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/product/vxc-9/action/CANCEL_NOW"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(2)
        .mount(&server)
        .await;

    let uid = ProductUid::from("vxc-9");
    assert_eq!(provisioner.delete(&uid).await.unwrap(), DeleteOutcome::AlreadyGone);
    assert_eq!(provisioner.delete(&uid).await.unwrap(), DeleteOutcome::AlreadyGone);
}
