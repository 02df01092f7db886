//
// Copyright © 2025 Hardcore Engineering Inc.
//
// Licensed under the Eclipse Public License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may
// obtain a copy of the License at https://www.eclipse.org/legal/epl-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//
// See the License for the specific language governing permissions and
// limitations under the License.
//

use reqwest::{
    self, Method, Response, StatusCode, Url,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use reqwest_middleware::{ClientBuilder, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{self as json, Value};
use tracing::*;

pub mod oql;
pub mod records;
pub mod token;
pub mod types;

pub use token::TokenProvider;

use super::{Error, Result};
use crate::config::Config;
use oql::OqlClient;
use records::DataRecordClient;

pub type HttpClient = reqwest_middleware::ClientWithMiddleware;

pub trait RequestBuilderExt {
    fn send_ext(self) -> impl Future<Output = Result<Response>>;
}

/// Message of a failed response: `message`, then `error.message`, then the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = json::from_str::<Value>(body).ok().and_then(|body| {
        body.get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .or_else(|| {
                body.get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
            })
            .map(str::to_owned)
    });

    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_str().to_owned())
    })
}

impl RequestBuilderExt for RequestBuilder {
    async fn send_ext(self) -> Result<Response> {
        let response = self.send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await?;
            let message = error_message(status, &body);

            debug!(%status, %message, "http error");

            Err(Error::HttpError(status, message))
        }
    }
}

pub trait ResponseExt {
    fn json_body<T: DeserializeOwned>(self) -> impl Future<Output = Result<T>>;
}

impl ResponseExt for reqwest::Response {
    async fn json_body<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.text().await?;

        serde_json::from_str::<T>(&body).map_err(|error| {
            error!(%body, %error);
            Error::Serde(error)
        })
    }
}

/// Flattens a serializable object into query pairs. Arrays repeat the key,
/// nulls are dropped, strings go in unquoted.
fn query_pairs(params: &Value) -> Result<Vec<(String, String)>> {
    fn scalar(value: &Value) -> String {
        match value {
            Value::String(string) => string.clone(),
            other => other.to_string(),
        }
    }

    let object = match params {
        Value::Null => return Ok(Vec::new()),
        Value::Object(object) => object,
        _ => return Err(Error::Other("QueryIsNotObject")),
    };

    let mut pairs = Vec::new();

    for (name, value) in object {
        match value {
            Value::Null => {}

            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push((name.clone(), scalar(item)));
                }
            }

            other => pairs.push((name.clone(), scalar(other))),
        }
    }

    Ok(pairs)
}

/// Sentinel for `204 No Content`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Content(T),
    NoContent,
}

impl<T> Reply<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Reply::Content(content) => Some(content),
            Reply::NoContent => None,
        }
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, Reply::NoContent)
    }
}

impl<T: Default> Reply<T> {
    pub fn or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

/// One outgoing call. Token and body are optional, headers are merged
/// over the JSON content type.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    method: Method,
    body: Option<Value>,
    params: Option<Value>,
    token: Option<SecretString>,
    headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(json::to_value(body)?);
        Ok(self)
    }

    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self> {
        self.params = Some(json::to_value(params)?);
        Ok(self)
    }

    pub fn token(mut self, token: Option<SecretString>) -> Self {
        self.token = token;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// Single choke point for outbound REST calls against the API base.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish()
    }
}

impl ApiClient {
    pub fn new(http: HttpClient, base: Url) -> Self {
        Self { http, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a relative endpoint such as `/data/records` against the base.
    pub fn endpoint(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base.join(endpoint.trim_start_matches('/'))?)
    }

    /// Appends path segments, each percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();

        url.path_segments_mut()
            .map_err(|_| Error::Other("BaseCannotBeABase"))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    pub async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: ApiRequest,
    ) -> Result<Reply<T>> {
        let url = self.endpoint(endpoint)?;
        self.send_url(url, request).await
    }

    #[tracing::instrument(
        level = "trace",
        skip(self, url, request),
        fields(%url, method = %request.method)
    )]
    pub async fn send_url<T: DeserializeOwned>(
        &self,
        mut url: Url,
        request: ApiRequest,
    ) -> Result<Reply<T>> {
        let ApiRequest {
            method,
            body,
            params,
            token,
            headers,
        } = request;

        if let Some(params) = &params {
            let pairs = query_pairs(params)?;

            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let mut merged = HeaderMap::new();
        merged.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        merged.extend(headers);

        if let Some(token) = &token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Error::Other("InvalidToken"))?;
            bearer.set_sensitive(true);

            merged.insert(header::AUTHORIZATION, bearer);
        }

        let mut builder = self.http.request(method, url.clone()).headers(merged);

        if let Some(body) = &body {
            trace!(%body, "http request");
            builder = builder.json(body);
        } else {
            trace!("http request");
        }

        let response = builder.send_ext().await?;

        if response.status() == StatusCode::NO_CONTENT {
            trace!("http response: no content");
            return Ok(Reply::NoContent);
        }

        response.json_body::<T>().await.map(Reply::Content)
    }
}

#[derive(Clone)]
pub struct ServiceFactory {
    config: Config,
    http: HttpClient,
}

impl ServiceFactory {
    pub fn new(config: Config) -> Result<Self> {
        let mut client = reqwest::Client::builder();

        if let Some(timeout) = config.request_timeout {
            client = client.timeout(timeout);
        }

        let http = ClientBuilder::new(client.build()?).build();

        Ok(Self { config, http })
    }

    /// Shares an existing client, e.g. one carrying extra middleware.
    pub fn with_http(config: Config, http: HttpClient) -> Self {
        Self { config, http }
    }

    pub fn new_api_client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(self.http.clone(), self.config.api_base()?))
    }

    pub fn new_data_record_client(
        &self,
        tokens: impl TokenProvider + 'static,
    ) -> Result<DataRecordClient> {
        Ok(DataRecordClient::new(self.new_api_client()?, tokens))
    }

    pub fn new_oql_client(&self, tokens: impl TokenProvider + 'static) -> Result<OqlClient> {
        Ok(OqlClient::new(self.new_api_client()?, tokens))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_top_level_message() {
        let body = r#"{"message": "Invalid record", "error": {"message": "nested"}}"#;

        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Invalid record"
        );
    }

    #[test]
    fn error_message_falls_back_to_nested_error() {
        let body = r#"{"success": false, "error": {"code": "OQL_PARSE", "message": "Unexpected token"}}"#;

        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Unexpected token"
        );
    }

    #[test]
    fn error_message_falls_back_to_status_text() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>upstream</html>"),
            "Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, r#"{"status": 401}"#),
            "Unauthorized"
        );
    }

    #[test]
    fn error_message_skips_empty_messages() {
        let body = r#"{"message": "", "error": {"message": "nested"}}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "nested");

        let body = r#"{"message": "", "error": {"message": ""}}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "Bad Request");
    }

    #[test]
    fn query_pairs_expand_arrays_and_drop_nulls() {
        let mut pairs = query_pairs(&json!({
            "object": "Contact__c",
            "ids": ["a", null, "b"],
            "page": 2,
            "archived": false,
            "sortBy": null
        }))
        .unwrap();

        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("archived".to_owned(), "false".to_owned()),
                ("ids".to_owned(), "a".to_owned()),
                ("ids".to_owned(), "b".to_owned()),
                ("object".to_owned(), "Contact__c".to_owned()),
                ("page".to_owned(), "2".to_owned()),
            ]
        );
    }

    #[test]
    fn query_pairs_reject_scalars() {
        assert!(query_pairs(&json!("page=1")).is_err());
        assert!(query_pairs(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn url_encodes_segments() {
        let client = ApiClient::new(
            ClientBuilder::new(reqwest::Client::new()).build(),
            Url::parse("http://localhost:3000/api/v1/").unwrap(),
        );

        assert_eq!(
            client.url(&["data", "records", "a/b c"]).unwrap().as_str(),
            "http://localhost:3000/api/v1/data/records/a%2Fb%20c"
        );
        assert_eq!(
            client.endpoint("/data/oql/execute").unwrap().as_str(),
            "http://localhost:3000/api/v1/data/oql/execute"
        );
    }
}
