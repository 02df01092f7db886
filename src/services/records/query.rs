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

use super::{DataRecordClient, DataRecordDto, DataRecordQueryParams, SortDirection};
use crate::Result;
use crate::services::types::ApiResponse;

/// Accumulates list parameters for [`DataRecordClient::list`]. No predicates,
/// filtering goes through OQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataQueryBuilder {
    params: DataRecordQueryParams,
}

impl DataQueryBuilder {
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            params: DataRecordQueryParams {
                object: Some(object.into()),
                ..Default::default()
            },
        }
    }

    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.params.object = Some(object.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|field| field.as_ref().to_owned())
            .collect::<Vec<_>>();

        self.params.fields = Some(fields.join(","));
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.params.page = Some(page);
        self
    }

    /// Page size, sent as `size`.
    pub fn limit(mut self, limit: u32) -> Self {
        self.params.size = Some(limit);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.params.sort_by = Some(field.into());
        self.params.sort_direction = Some(direction);
        self
    }

    pub fn params(&self) -> &DataRecordQueryParams {
        &self.params
    }

    pub fn into_params(self) -> DataRecordQueryParams {
        self.params
    }

    pub async fn fetch(&self, client: &DataRecordClient) -> Result<ApiResponse<Vec<DataRecordDto>>> {
        client.list(Some(&self.params)).await
    }
}
