//! Vendor listing, detail fan-out and read-merge-write updates.

mod support;

use serde_json::{json, Value};
use support::{query_value, record, MockTransport};
use vendorlink_core::{VendorService, WorkerPool};
use vendorlink_domain::{HttpMethod, VendorLinkError};

#[tokio::test]
async fn list_walks_every_page() {
    let transport = MockTransport::new()
        .route(HttpMethod::Get, "/vendors", |request| {
            Ok(match query_value(request, "page") {
                None => json!({"items": [{"identifier": "v-1"}, {"identifier": "v-2"}], "nextPage": "p2"}),
                Some("p2") => json!({"items": [{"identifier": "v-3"}]}),
                Some(other) => panic!("unexpected page {other}"),
            })
        })
        .into_arc();

    let vendors = VendorService::new(transport.clone(), WorkerPool::new(3)).list().await.unwrap();
    let ids: Vec<&str> = vendors.iter().map(|v| v["identifier"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["v-1", "v-2", "v-3"]);
    assert_eq!(transport.calls(HttpMethod::Get, "/vendors"), 2);
}

#[tokio::test]
async fn describe_fetches_each_detail_and_keeps_failures() {
    let mut transport = MockTransport::new().reply(
        HttpMethod::Get,
        "/vendors",
        json!({"items": [
            {"identifier": "v-1"},
            {"identifier": "v-2"},
            {"name": "no identifier"},
            {"identifier": "v-3"}
        ]}),
    );
    for id in ["v-1", "v-3"] {
        transport = transport.reply(HttpMethod::Get, &format!("/vendors/{id}"), json!({"identifier": id, "detail": true}));
    }
    let transport = transport.into_arc();

    let report = VendorService::new(transport.clone(), WorkerPool::new(2)).describe().await.unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.failure_count(), 1);
    let (failed, err) = report.failures().next().unwrap();
    assert_eq!(failed, "v-2");
    assert!(matches!(err, VendorLinkError::Api { status: 404, .. }));
    assert!(report.successes().all(|(_, vendor)| vendor["detail"] == json!(true)));
}

#[tokio::test]
async fn update_sends_the_merged_record() {
    let transport = MockTransport::new()
        .reply(
            HttpMethod::Get,
            "/vendors/v-1",
            json!({
                "identifier": "v-1",
                "name": "Acme",
                "address": {"city": "Austin", "zip": "78701"},
                "tags": ["a", "b"]
            }),
        )
        .reply(HttpMethod::Put, "/vendors/v-1", Value::Null)
        .into_arc();

    let changes = record(json!({"address": {"zip": "78702"}, "tags": ["c"]}));
    let updated =
        VendorService::new(transport.clone(), WorkerPool::new(1)).update("v-1", &changes).await.unwrap();

    let expected = json!({
        "identifier": "v-1",
        "name": "Acme",
        "address": {"city": "Austin", "zip": "78702"},
        "tags": ["c"]
    });
    assert_eq!(Value::Object(updated), expected);

    let put = transport.requests().into_iter().find(|r| r.method == HttpMethod::Put).unwrap();
    assert_eq!(put.body, Some(expected));
}

#[tokio::test]
async fn update_of_missing_vendor_sends_nothing() {
    let transport = MockTransport::new().into_arc();
    let result = VendorService::new(transport.clone(), WorkerPool::new(1))
        .update("v-404", &record(json!({"name": "x"})))
        .await;

    assert!(matches!(result, Err(VendorLinkError::Api { status: 404, .. })));
    assert_eq!(transport.calls(HttpMethod::Put, "/vendors/v-404"), 0);
}

#[tokio::test]
async fn find_by_domain_filters_and_normalizes() {
    let transport = MockTransport::new()
        .reply(
            HttpMethod::Get,
            "/vendors",
            json!({"items": [
                {"identifier": "v-1", "domain": "other.com"},
                {"identifier": "v-2", "domain": "http://Acme.com"}
            ]}),
        )
        .into_arc();
    let service = VendorService::new(transport.clone(), WorkerPool::new(1));

    let found = service.find_by_domain("www.acme.com").await.unwrap().unwrap();
    assert_eq!(found["identifier"], json!("v-2"));
    assert!(service.find_by_domain("missing.io").await.unwrap().is_none());
    assert_eq!(query_value(&transport.requests()[0], "domain"), Some("www.acme.com"));
}

#[tokio::test]
async fn create_posts_the_record() {
    let transport =
        MockTransport::new().reply(HttpMethod::Post, "/vendors", json!({"identifier": "v-7"})).into_arc();

    let body = VendorService::new(transport.clone(), WorkerPool::new(1))
        .create(record(json!({"name": "Acme"})))
        .await
        .unwrap();

    assert_eq!(body, json!({"identifier": "v-7"}));
    assert_eq!(transport.requests()[0].body, Some(json!({"name": "Acme"})));
}
