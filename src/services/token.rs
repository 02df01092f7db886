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

use std::sync::{Arc, RwLock};

use secrecy::SecretString;

/// Source of the bearer token. Resource clients ask for it before every request,
/// so a provider that changes its value is picked up by the next call.
pub trait TokenProvider: Send + Sync {
    fn provide_token(&self) -> Option<SecretString>;
}

/// Anonymous access, no `Authorization` header is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn provide_token(&self) -> Option<SecretString> {
        None
    }
}

impl TokenProvider for SecretString {
    fn provide_token(&self) -> Option<SecretString> {
        Some(self.clone())
    }
}

impl TokenProvider for Option<SecretString> {
    fn provide_token(&self) -> Option<SecretString> {
        self.clone()
    }
}

impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    fn provide_token(&self) -> Option<SecretString> {
        (**self).provide_token()
    }
}

/// Shared token slot. Clones observe each other's `set` and `clear`.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    slot: Arc<RwLock<Option<SecretString>>>,
}

impl TokenStore {
    pub fn new(token: impl Into<SecretString>) -> Self {
        let store = Self::default();
        store.set(token);
        store
    }

    pub fn set(&self, token: impl Into<SecretString>) {
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }
}

impl TokenProvider for TokenStore {
    fn provide_token(&self) -> Option<SecretString> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    variable: String,
}

impl EnvToken {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl TokenProvider for EnvToken {
    fn provide_token(&self) -> Option<SecretString> {
        std::env::var(&self.variable)
            .ok()
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }
}
