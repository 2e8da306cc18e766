//! External OAuth2 provider definitions

use crate::schema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct OAuth2ProviderDefinition {
    pub provider_key: String,
    pub provider_type: String,
    /// Provider configuration (client id, scopes, endpoints), passed through
    pub options: serde_json::Value,
}

impl Default for OAuth2ProviderDefinition {
    fn default() -> Self {
        OAuth2ProviderDefinition {
            provider_key: String::new(),
            provider_type: schema::providers::OAUTH2_CUSTOM.to_string(),
            options: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// A provider as it appears under `external_auth_providers.oauth2.<key>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2ProviderManifest {
    pub provider_type: String,
    pub options: serde_json::Value,
}

pub fn define_oauth2_provider(
    definition: OAuth2ProviderDefinition,
) -> Arc<OAuth2ProviderDefinition> {
    Arc::new(definition)
}

impl OAuth2ProviderDefinition {
    pub fn id(&self) -> &str {
        &self.provider_key
    }

    pub fn export(&self) -> OAuth2ProviderManifest {
        OAuth2ProviderManifest {
            provider_type: self.provider_type.clone(),
            options: self.options.clone(),
        }
    }
}
