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

use std::time::Duration;

use derive_builder::Builder;
use serde::Deserialize;
use serde_with::{DurationSeconds, formats::Flexible, serde_as};
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_PREFIX: &str = "/api/v1";

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_api_prefix() -> String {
    String::from(DEFAULT_API_PREFIX)
}

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(default)]
pub struct Config {
    /// Absolute origin of the API gateway. Falls back to `http://localhost:<port>`.
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    pub app_url: Option<Url>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_api_prefix")]
    #[builder(setter(into))]
    pub api_prefix: String,

    /// Per-request timeout. Requests never time out when unset.
    #[serde_as(as = "Option<DurationSeconds<u64, Flexible>>")]
    #[builder(setter(strip_option))]
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_url: None,
            port: DEFAULT_PORT,
            api_prefix: default_api_prefix(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_env_with_prefix("DYNREC")
    }

    /// Reads `<PREFIX>_APP_URL`, `<PREFIX>_PORT`, `<PREFIX>_API_PREFIX` and
    /// `<PREFIX>_REQUEST_TIMEOUT` (seconds).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
    }

    /// Absolute base every endpoint path is resolved against, always ending with `/`.
    pub fn api_base(&self) -> Result<Url, url::ParseError> {
        let origin = match &self.app_url {
            Some(url) => url.as_str().trim_end_matches('/').to_owned(),
            None => format!("http://localhost:{}", self.port),
        };

        let prefix = self.api_prefix.trim_matches('/');

        if prefix.is_empty() {
            Url::parse(&format!("{origin}/"))
        } else {
            Url::parse(&format!("{origin}/{prefix}/"))
        }
    }
}
