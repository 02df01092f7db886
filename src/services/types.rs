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

use std::collections::HashMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{self as json, Value};

use crate::Result;

pub type Timestamp = chrono::DateTime<chrono::Utc>;

pub type Links = HashMap<String, LinkRel>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

/// A relation points at one link or, for collections, several.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum LinkRel {
    One(Link),
    Many(Vec<Link>),
}

impl LinkRel {
    pub fn href(&self) -> Option<&str> {
        match self {
            LinkRel::One(link) => Some(&link.href),
            LinkRel::Many(links) => links.first().map(|link| link.href.as_str()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Envelope shared by flat (`data`) and HATEOAS (`_embedded`) endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,

    #[serde(
        default,
        rename = "_embedded",
        skip_serializing_if = "Option::is_none"
    )]
    pub embedded: Option<json::Map<String, Value>>,

    #[serde(default, rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            status: None,
            message: None,
            r#type: None,
            success: None,
            data: None,
            error: None,
            embedded: None,
            links: None,
            page: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Data(T),
    Embedded(json::Map<String, Value>),
    Empty,
}

impl<T> ApiResponse<T> {
    /// `data` wins when both shapes are present.
    pub fn into_payload(self) -> Payload<T> {
        match (self.data, self.embedded) {
            (Some(data), _) => Payload::Data(data),
            (None, Some(embedded)) => Payload::Embedded(embedded),
            (None, None) => Payload::Empty,
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<Vec<T>> {
    /// Items from `data`, or from the first collection under `_embedded`.
    pub fn into_items(self) -> Result<Vec<T>> {
        match self.into_payload() {
            Payload::Data(items) => Ok(items),

            Payload::Embedded(embedded) => match embedded
                .into_iter()
                .map(|(_, value)| value)
                .find(Value::is_array)
            {
                Some(items) => Ok(json::from_value(items)?),
                None => Ok(Vec::new()),
            },

            Payload::Empty => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn flat_envelope() {
        let response: ApiResponse<Vec<Item>> = json::from_value(json!({
            "status": 200,
            "success": true,
            "message": "ok",
            "data": [{"id": "a"}, {"id": "b"}]
        }))
        .unwrap();

        assert_eq!(response.success, Some(true));
        assert_eq!(
            response.into_items().unwrap(),
            vec![Item { id: "a".into() }, Item { id: "b".into() }]
        );
    }

    #[test]
    fn hateoas_envelope() {
        let response: ApiResponse<Vec<Item>> = json::from_value(json!({
            "_embedded": {"dataRecordDtoList": [{"id": "x"}]},
            "_links": {
                "self": {"href": "http://host/api/v1/data/records?page=0"},
                "next": [{"href": "http://host/api/v1/data/records?page=1"}]
            },
            "page": {"size": 1, "totalElements": 2, "totalPages": 2, "number": 0}
        }))
        .unwrap();

        let links = response.links.clone().unwrap();
        assert_eq!(
            links["next"].href(),
            Some("http://host/api/v1/data/records?page=1")
        );
        assert_eq!(response.page.as_ref().unwrap().total_elements, 2);
        assert_eq!(response.into_items().unwrap(), vec![Item { id: "x".into() }]);
    }

    #[test]
    fn error_envelope() {
        let response: ApiResponse<Value> = json::from_value(json!({
            "success": false,
            "error": {"code": "NOT_FOUND", "message": "missing", "details": {"id": "1"}}
        }))
        .unwrap();

        let error = response.error.clone().unwrap();
        assert_eq!(error.message.as_deref(), Some("missing"));
        assert_eq!(response.into_payload(), Payload::Empty);
    }

    #[test]
    fn default_is_empty() {
        let response = ApiResponse::<Vec<Item>>::default();

        assert!(response.data.is_none());
        assert!(response.into_items().unwrap().is_empty());
    }
}
