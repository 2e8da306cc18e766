//! The root app definition handed to the assembler
//!
//! Static fields can be loaded from a TOML file using the camelCase keys of
//! the app definition surface (`backgroundColor`, `botScopes`, ...); the
//! definitions built in code (functions, workflows, datastores, types and
//! providers) are attached afterwards.
//!
//! ```toml
//! name = "Triage Bot"
//! description = "Routes incidents"
//! icon = "assets/icon.png"
//! botScopes = ["commands", "chat:write"]
//! slackHosted = true
//!
//! [features.appHome]
//! messagesTabEnabled = false
//! ```

use crate::custom_type::CustomType;
use crate::datastore::DatastoreDefinition;
use crate::errors::ManifestError;
use crate::function::FunctionDefinition;
use crate::oauth2::OAuth2ProviderDefinition;
use crate::types::{
    AppDirectory, EventSubscriptions, ManifestMetadata, ManifestSettings, Shortcut, SlashCommand,
    WorkflowStepConfig,
};
use crate::workflow::WorkflowDefinition;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Everything needed to assemble a manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    /// Bot display name; falls back to `name`
    #[serde(default)]
    pub display_name: Option<String>,

    /// Selects the hosted (`function_runtime = "slack"`) or remote variant
    #[serde(default)]
    pub slack_hosted: bool,

    #[serde(default)]
    pub bot_scopes: Vec<String>,
    #[serde(default)]
    pub user_scopes: Option<Vec<String>>,
    #[serde(default)]
    pub redirect_urls: Option<Vec<String>>,
    #[serde(default)]
    pub token_management_enabled: Option<bool>,

    #[serde(default)]
    pub features: Option<FeaturesDefinition>,
    #[serde(default)]
    pub settings: Option<ManifestSettings>,
    #[serde(default)]
    pub socket_mode_enabled: Option<bool>,
    #[serde(default)]
    pub token_rotation_enabled: Option<bool>,
    #[serde(default)]
    pub event_subscriptions: Option<EventSubscriptions>,
    #[serde(default)]
    pub app_directory: Option<AppDirectory>,
    #[serde(default)]
    pub outgoing_domains: Option<Vec<String>>,
    #[serde(default, rename = "_metadata")]
    pub metadata: Option<ManifestMetadata>,

    #[serde(skip)]
    pub functions: Vec<Arc<FunctionDefinition>>,
    #[serde(skip)]
    pub workflows: Vec<Arc<WorkflowDefinition>>,
    #[serde(skip)]
    pub datastores: Vec<Arc<DatastoreDefinition>>,
    #[serde(skip)]
    pub types: Vec<Arc<CustomType>>,
    #[serde(skip)]
    pub external_auth_providers: Vec<Arc<OAuth2ProviderDefinition>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesDefinition {
    #[serde(default)]
    pub app_home: Option<AppHomeDefinition>,
    #[serde(default)]
    pub shortcuts: Option<Vec<Shortcut>>,
    #[serde(default)]
    pub slash_commands: Option<Vec<SlashCommand>>,
    #[serde(default)]
    pub unfurl_domains: Option<Vec<String>>,
    #[serde(default)]
    pub workflow_steps: Option<Vec<WorkflowStepConfig>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppHomeDefinition {
    #[serde(default)]
    pub home_tab_enabled: Option<bool>,
    #[serde(default)]
    pub messages_tab_enabled: Option<bool>,
    #[serde(default)]
    pub messages_tab_read_only_enabled: Option<bool>,
}

impl ManifestDefinition {
    /// Parse the static portion of an app definition
    pub fn from_toml_str(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Load the static portion of an app definition from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        debug!("Loading app definition from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_function(mut self, function: Arc<FunctionDefinition>) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_workflow(mut self, workflow: WorkflowDefinition) -> Self {
        self.workflows.push(Arc::new(workflow));
        self
    }

    pub fn with_datastore(mut self, datastore: Arc<DatastoreDefinition>) -> Self {
        self.datastores.push(datastore);
        self
    }

    pub fn with_type(mut self, custom_type: Arc<CustomType>) -> Self {
        self.types.push(custom_type);
        self
    }

    pub fn with_oauth2_provider(mut self, provider: Arc<OAuth2ProviderDefinition>) -> Self {
        self.external_auth_providers.push(provider);
        self
    }
}
