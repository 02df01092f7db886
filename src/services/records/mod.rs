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
use std::sync::Arc;

use derive_builder::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::*;

use crate::Result;
use crate::services::types::{ApiResponse, Links, Timestamp};
use crate::services::{ApiClient, ApiRequest, TokenProvider};

pub mod query;

pub use query::DataQueryBuilder;

pub type RecordId = String;

/// Field values of a dynamic object, keyed by field API name.
pub type RecordData = HashMap<String, Value>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataRecordDto {
    pub id: RecordId,

    #[serde(deserialize_with = "crate::flexible_timestamp")]
    pub created_at: Timestamp,

    #[serde(
        default,
        deserialize_with = "crate::optional_flexible_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<Timestamp>,

    #[serde(default)]
    pub data: RecordData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data_record: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<Value>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub r#type: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default)]
    pub is_public: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,

    #[serde(default, rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Projection returned by OQL execution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataRecordDtoMin {
    pub id: RecordId,

    #[serde(deserialize_with = "crate::flexible_timestamp")]
    pub created_at: Timestamp,

    #[serde(
        default,
        deserialize_with = "crate::optional_flexible_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<Timestamp>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_record_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default)]
    pub is_public: bool,
}

/// Body of create and update. Unset fields are left out of the JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct DataRecordRequestDto {
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_record_api_name: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl DataRecordRequestDtoBuilder {
    pub fn field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data
            .get_or_insert(None)
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());

        self
    }
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataRecordQueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Comma separated field API names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
}

/// CRUD over `/data/records`. The token is fetched from the provider on every call.
#[derive(Clone)]
pub struct DataRecordClient {
    api: ApiClient,
    tokens: Arc<dyn TokenProvider>,
}

impl DataRecordClient {
    pub fn new(api: ApiClient, tokens: impl TokenProvider + 'static) -> Self {
        Self {
            api,
            tokens: Arc::new(tokens),
        }
    }

    fn token(&self) -> Option<SecretString> {
        self.tokens.provide_token()
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn list(
        &self,
        params: Option<&DataRecordQueryParams>,
    ) -> Result<ApiResponse<Vec<DataRecordDto>>> {
        let mut request = ApiRequest::get().token(self.token());

        if let Some(params) = params {
            request = request.params(params)?;
        }

        let url = self.api.url(&["data", "records"])?;

        Ok(self.api.send_url(url, request).await?.or_default())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn get(&self, id: &str) -> Result<ApiResponse<DataRecordDto>> {
        let request = ApiRequest::get().token(self.token());
        let url = self.api.url(&["data", "records", id])?;

        Ok(self.api.send_url(url, request).await?.or_default())
    }

    #[tracing::instrument(level = "trace", skip(self, dto))]
    pub async fn create(&self, dto: &DataRecordRequestDto) -> Result<ApiResponse<DataRecordDto>> {
        let request = ApiRequest::post().token(self.token()).body(dto)?;
        let url = self.api.url(&["data", "records"])?;

        let response: ApiResponse<DataRecordDto> =
            self.api.send_url(url, request).await?.or_default();

        if let Some(record) = &response.data {
            debug!(id = %record.id, "record created");
        }

        Ok(response)
    }

    /// Full PUT. Fields left unset in `dto` are simply not sent.
    #[tracing::instrument(level = "trace", skip(self, dto))]
    pub async fn update(
        &self,
        id: &str,
        dto: &DataRecordRequestDto,
    ) -> Result<ApiResponse<DataRecordDto>> {
        let request = ApiRequest::put().token(self.token()).body(dto)?;
        let url = self.api.url(&["data", "records", id])?;

        Ok(self.api.send_url(url, request).await?.or_default())
    }

    /// Returns the confirmation envelope; nothing is tracked locally.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<Value>> {
        let request = ApiRequest::delete().token(self.token());
        let url = self.api.url(&["data", "records", id])?;

        let response: ApiResponse<Value> = self.api.send_url(url, request).await?.or_default();

        debug!(%id, message = ?response.message, "record deleted");

        Ok(response)
    }
}
