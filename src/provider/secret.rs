use std::collections::HashMap;

use secrecy::SecretString;

use super::types::{ProviderError, ProviderResult};
use crate::config::{ProviderSecretConfig, SecretConfig};

#[derive(Clone, Default)]
pub struct ProviderSecret {
    pub api_key: SecretString,
    pub additional_auth: HashMap<String, SecretString>,
}

impl From<ProviderSecretConfig> for ProviderSecret {
    fn from(config: ProviderSecretConfig) -> Self {
        Self {
            api_key: SecretString::from(config.api_key),
            additional_auth: config
                .additional_auth
                .into_iter()
                .map(|(k, v)| (k, SecretString::from(v)))
                .collect(),
        }
    }
}

pub struct SecretRegistry {
    secrets: HashMap<String, ProviderSecret>,
}

impl SecretRegistry {
    pub fn new(config: SecretConfig) -> Self {
        let mut secrets = HashMap::new();
        for (provider_name, secret) in config.providers {
            secrets.insert(provider_name, ProviderSecret::from(secret));
        }
        Self { secrets }
    }

    pub fn get_secret(&self, provider_name: &str) -> ProviderResult<ProviderSecret> {
        self.secrets
            .get(provider_name)
            .cloned()
            .ok_or(ProviderError::SecretNotFound(provider_name.to_string()))
    }
}
