//! OQL client and builder against a wiremock server.

mod common;

use dynrec::services::oql::OqlQueryBuilder;
use dynrec::services::token::TokenStore;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn builder_fetch_posts_rendered_query() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/data/oql/execute"))
        .and(header("authorization", "Bearer oql-token"))
        .and(body_json(json!({
            "query": "SELECT Name FROM Account__c WHERE Status = 'Active' LIMIT 10"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "r1": {
                    "id": "r1",
                    "createdAt": "2025-04-01T09:00:00",
                    "name": "Acme",
                    "metaRecordId": "m1",
                    "data": {"Name": "Acme"},
                    "isActive": true,
                    "isArchived": false,
                    "isPublic": false
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::factory(&server).new_oql_client(TokenStore::new("oql-token"))?;

    let response = OqlQueryBuilder::new("Account__c")
        .add_field("Name")
        .r#where("Status", "=", "Active")
        .limit(10)
        .fetch(&client)
        .await?;

    let records = response.data.unwrap_or_default();
    assert_eq!(records.len(), 1);
    assert_eq!(records["r1"].name, "Acme");
    assert_eq!(records["r1"].meta_record_id.as_deref(), Some("m1"));

    Ok(())
}

#[tokio::test]
async fn parser_errors_come_back_from_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/data/oql/execute"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": {"code": "OQL_SYNTAX", "message": "Unexpected token 'Brien'"}
        })))
        .mount(&server)
        .await;

    let client = common::factory(&server)
        .new_oql_client(TokenStore::default())
        .unwrap();

    let error = OqlQueryBuilder::new("Account__c")
        .r#where("Name", "=", "O'Brien")
        .fetch(&client)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Unexpected token 'Brien'");

    let received = server.received_requests().await.unwrap_or_default();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        body,
        json!({"query": "SELECT * FROM Account__c WHERE Name = 'O'Brien'"})
    );
}

#[tokio::test]
async fn sync_graph_accepts_bare_string() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/data/oql/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Graph sync completed")))
        .mount(&server)
        .await;

    let client = common::factory(&server).new_oql_client(TokenStore::new("t"))?;
    let response = client.sync_graph().await?;

    assert_eq!(response.data.as_deref(), Some("Graph sync completed"));

    Ok(())
}

#[tokio::test]
async fn sync_graph_accepts_envelope() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/data/oql/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Sync started",
            "data": "queued"
        })))
        .mount(&server)
        .await;

    let client = common::factory(&server).new_oql_client(TokenStore::new("t"))?;
    let response = client.sync_graph().await?;

    assert_eq!(response.message.as_deref(), Some("Sync started"));
    assert_eq!(response.data.as_deref(), Some("queued"));

    Ok(())
}
