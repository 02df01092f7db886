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

use serde::{Deserialize, Serialize};
use tracing::*;

use crate::Result;
use crate::services::records::DataRecordDtoMin;
use crate::services::types::ApiResponse;
use crate::services::{ApiClient, ApiRequest, Reply, TokenProvider};

pub mod builder;

pub use builder::OqlQueryBuilder;

/// Projections keyed by whatever identifier the backend chooses.
pub type OqlResult = HashMap<String, DataRecordDtoMin>;

#[derive(Serialize, Debug)]
struct ExecuteRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum SyncReply {
    Bare(String),
    Envelope(ApiResponse<String>),
}

#[derive(Clone)]
pub struct OqlClient {
    api: ApiClient,
    tokens: Arc<dyn TokenProvider>,
}

impl OqlClient {
    pub fn new(api: ApiClient, tokens: impl TokenProvider + 'static) -> Self {
        Self {
            api,
            tokens: Arc::new(tokens),
        }
    }

    /// Sends the query text as is. Malformed queries are rejected by the backend.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn execute(&self, query: &str) -> Result<ApiResponse<OqlResult>> {
        let request = ApiRequest::post()
            .token(self.tokens.provide_token())
            .body(&ExecuteRequest { query })?;

        let response: ApiResponse<OqlResult> = self
            .api
            .send("data/oql/execute", request)
            .await?
            .or_default();

        trace!(
            records = response.data.as_ref().map(HashMap::len).unwrap_or_default(),
            "oql executed"
        );

        Ok(response)
    }

    /// Triggers the knowledge-graph sync. The reply does not tell a finished
    /// sync from a queued one.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn sync_graph(&self) -> Result<ApiResponse<String>> {
        let request = ApiRequest::get().token(self.tokens.provide_token());

        let reply = self.api.send::<SyncReply>("data/oql/sync", request).await?;

        Ok(match reply {
            Reply::Content(SyncReply::Bare(message)) => ApiResponse {
                data: Some(message),
                ..Default::default()
            },
            Reply::Content(SyncReply::Envelope(envelope)) => envelope,
            Reply::NoContent => ApiResponse::default(),
        })
    }
}
