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

pub use reqwest::{Method, StatusCode};

mod config;
pub mod services;

pub use config::{Config, ConfigBuilder, ConfigBuilderError};
pub use services::ServiceFactory;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    ReqwestMiddleware(#[from] reqwest_middleware::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Non-2xx response. Displays as the message extracted from the body,
    /// or the status text when the body carries none.
    #[error("{1}")]
    HttpError(reqwest::StatusCode, String),

    #[error(transparent)]
    Config(#[from] ::config::ConfigError),

    #[error("{0}")]
    Other(&'static str),
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError(status, _) => Some(*status),
            Error::Reqwest(error) => error.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn parse_timestamp(value: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, NaiveDateTime, Utc};

    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Accepts RFC 3339 as well as zone-less local date-times, the latter read as UTC.
pub(crate) fn flexible_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<chrono::DateTime<chrono::Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let value = String::deserialize(deserializer)?;

    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("Cannot parse timestamp {value}")))
}

pub(crate) fn optional_flexible_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<chrono::DateTime<chrono::Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    if let Some(value) = Option::<String>::deserialize(deserializer)? {
        parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("Cannot parse timestamp {value}")))
    } else {
        Ok(None)
    }
}
