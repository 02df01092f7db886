#![allow(dead_code)]

use dynrec::services::ApiClient;
use dynrec::{ConfigBuilder, ServiceFactory};
use url::Url;
use wiremock::MockServer;

/// Factory whose API base points at the mock server under `/api/v1/`.
pub fn factory(server: &MockServer) -> ServiceFactory {
    let config = ConfigBuilder::default()
        .app_url(Url::parse(&server.uri()).unwrap())
        .build()
        .unwrap();

    ServiceFactory::new(config).unwrap()
}

pub fn api_client(server: &MockServer) -> ApiClient {
    factory(server).new_api_client().unwrap()
}

pub async fn authorization_headers(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            request
                .headers
                .get("authorization")
                .map(|value| value.to_str().unwrap().to_owned())
        })
        .collect()
}

pub fn record_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "createdAt": "2025-04-01T09:00:00Z",
        "updatedAt": "2025-04-02T09:00:00Z",
        "data": {"Name": name},
        "name": name,
        "type": "Account__c",
        "isActive": true,
        "isArchived": false,
        "isPublic": false
    })
}
