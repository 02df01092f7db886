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

use std::fmt;

use super::{OqlClient, OqlResult};
use crate::Result;
use crate::services::types::ApiResponse;

/// Fluent `SELECT` builder.
///
/// The WHERE part is a flat token list: predicates and `AND`/`OR` connectors in
/// call order, joined by spaces with no grouping. Precedence of mixed chains is
/// left to the backend parser. Values are wrapped in single quotes without any
/// escaping, so a value containing `'` yields a malformed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OqlQueryBuilder {
    object_api_name: String,
    fields: Vec<String>,
    where_clauses: Vec<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl OqlQueryBuilder {
    pub fn new(object_api_name: impl Into<String>) -> Self {
        Self {
            object_api_name: object_api_name.into(),
            fields: Vec::new(),
            where_clauses: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    pub fn add_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    fn predicate(field: &str, operator: &str, value: impl fmt::Display) -> String {
        format!("{field} {operator} '{value}'")
    }

    pub fn r#where(mut self, field: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.where_clauses
            .push(Self::predicate(field, operator, value));
        self
    }

    /// Without a preceding predicate the connector is dropped.
    pub fn and_where(self, field: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.connect("AND", field, operator, value)
    }

    /// Without a preceding predicate the connector is dropped.
    pub fn or_where(self, field: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.connect("OR", field, operator, value)
    }

    fn connect(
        mut self,
        connector: &str,
        field: &str,
        operator: &str,
        value: impl fmt::Display,
    ) -> Self {
        if !self.where_clauses.is_empty() {
            self.where_clauses.push(connector.to_owned());
        }

        self.where_clauses
            .push(Self::predicate(field, operator, value));
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn object_api_name(&self) -> &str {
        &self.object_api_name
    }

    pub fn build_oql(&self) -> String {
        self.to_string()
    }

    pub async fn fetch(&self, client: &OqlClient) -> Result<ApiResponse<OqlResult>> {
        client.execute(&self.build_oql()).await
    }
}

impl fmt::Display for OqlQueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            write!(f, "SELECT * FROM {}", self.object_api_name)?;
        } else {
            write!(
                f,
                "SELECT {} FROM {}",
                self.fields.join(", "),
                self.object_api_name
            )?;
        }

        if !self.where_clauses.is_empty() {
            write!(f, " WHERE {}", self.where_clauses.join(" "))?;
        }

        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }

        if let Some(offset) = self.offset {
            write!(f, " OFFSET {offset}")?;
        }

        Ok(())
    }
}
