//! Shared data model for app definitions and the exported manifest
//!
//! This module provides:
//! - Parameter shapes used by functions, workflows, datastores and custom types
//! - The serialized manifest document and its sections

use crate::custom_type::CustomType;
use crate::datastore::DatastoreManifest;
use crate::function::FunctionManifest;
use crate::oauth2::OAuth2ProviderManifest;
use crate::schema;
use crate::workflow::WorkflowManifest;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// PARAMETER TYPE - Primitive tag or shared custom type
// =============================================================================

/// The `type` of a parameter: a tag string or a reference to a custom type
#[derive(Debug, Clone)]
pub enum ParameterType {
    Primitive(Arc<str>),
    Custom(Arc<CustomType>),
}

impl ParameterType {
    /// Render the type as it appears in the manifest
    pub fn as_tag(&self) -> Cow<'_, str> {
        match self {
            ParameterType::Primitive(tag) => Cow::Borrowed(tag.as_ref()),
            ParameterType::Custom(custom) => Cow::Owned(custom.reference()),
        }
    }

    pub fn as_custom(&self) -> Option<&Arc<CustomType>> {
        match self {
            ParameterType::Custom(custom) => Some(custom),
            ParameterType::Primitive(_) => None,
        }
    }

    /// True when this is the given primitive tag
    pub fn is(&self, tag: &str) -> bool {
        matches!(self, ParameterType::Primitive(t) if t.as_ref() == tag)
    }
}

impl Default for ParameterType {
    fn default() -> Self {
        ParameterType::Primitive(Arc::from(schema::types::STRING))
    }
}

// Custom types read back from a manifest come in as their `#/types/<id>`
// tag, so equality is on the rendered form.
impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.as_tag() == other.as_tag()
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_tag())
    }
}

impl Serialize for ParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_tag())
    }
}

impl<'de> Deserialize<'de> for ParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ParameterType::Primitive(Arc::from(tag)))
    }
}

impl From<&str> for ParameterType {
    fn from(tag: &str) -> Self {
        ParameterType::Primitive(Arc::from(tag))
    }
}

impl From<String> for ParameterType {
    fn from(tag: String) -> Self {
        ParameterType::Primitive(Arc::from(tag))
    }
}

impl From<Arc<CustomType>> for ParameterType {
    fn from(custom: Arc<CustomType>) -> Self {
        ParameterType::Custom(custom)
    }
}

impl From<&Arc<CustomType>> for ParameterType {
    fn from(custom: &Arc<CustomType>) -> Self {
        ParameterType::Custom(Arc::clone(custom))
    }
}

// =============================================================================
// PARAMETER DEFINITION - Trusted as given, never validated
// =============================================================================

/// A single parameter, attribute or custom type shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<serde_json::Value>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<serde_json::Value>>,

    /// For array types - the item shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterDefinition>>,

    /// For object types - the named properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, ParameterDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,

    /// Any other keys, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ParameterDefinition {
    pub fn new(param_type: impl Into<ParameterType>) -> Self {
        ParameterDefinition {
            param_type: param_type.into(),
            ..Default::default()
        }
    }

    /// An array whose items have the given shape
    pub fn array_of(items: ParameterDefinition) -> Self {
        ParameterDefinition {
            items: Some(Box::new(items)),
            ..Self::new(schema::types::ARRAY)
        }
    }

    /// An object with no declared properties yet
    pub fn object() -> Self {
        Self::new(schema::types::OBJECT)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, property: ParameterDefinition) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), property);
        self
    }

    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required = Some(names.iter().map(|n| (*n).to_string()).collect());
        self
    }

    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Set an arbitrary key that has no dedicated field
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

// =============================================================================
// PARAMETER SET - Input/output parameters of functions and workflows
// =============================================================================

/// A named set of parameters plus the ordered list of required names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(default)]
    pub required: SmallVec<[String; 4]>,
    #[serde(default)]
    pub properties: IndexMap<String, ParameterDefinition>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, property: ParameterDefinition) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Add a property and mark it required
    pub fn with_required_property(
        mut self,
        name: impl Into<String>,
        property: ParameterDefinition,
    ) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, property);
        self
    }
}

// =============================================================================
// MANIFEST DOCUMENT - The single exported artifact
// =============================================================================

/// Which runtime hosts the app's functions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FunctionRuntime {
    Slack,
    #[default]
    Remote,
}

impl FunctionRuntime {
    pub fn from_slack_hosted(slack_hosted: bool) -> Self {
        if slack_hosted {
            FunctionRuntime::Slack
        } else {
            FunctionRuntime::Remote
        }
    }
}

/// The manifest handed to the deployment platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSchema {
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ManifestMetadata>,
    pub display_information: DisplayInformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub features: FeaturesSchema,
    pub oauth_config: OAuthConfig,
    pub settings: ManifestSettings,
    #[serde(default)]
    pub types: IndexMap<String, ParameterDefinition>,
    #[serde(default)]
    pub functions: IndexMap<String, FunctionManifest>,
    #[serde(default)]
    pub workflows: IndexMap<String, WorkflowManifest>,
    #[serde(default)]
    pub datastores: IndexMap<String, DatastoreManifest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_auth_providers: Option<ExternalAuthProviders>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_directory: Option<AppDirectory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub major_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInformation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturesSchema {
    pub bot_user: BotUser,
    pub app_home: AppHomeSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Vec<Shortcut>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slash_commands: Option<Vec<SlashCommand>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_steps: Option<Vec<WorkflowStepConfig>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUser {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppHomeSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_tab_enabled: Option<bool>,
    pub messages_tab_enabled: bool,
    pub messages_tab_read_only_enabled: bool,
}

/// Global or message shortcut, passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    #[serde(rename = "type")]
    pub shortcut_type: String,
    pub callback_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommand {
    pub command: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_escape: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStepConfig {
    pub name: String,
    pub callback_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub scopes: Scopes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_management_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scopes {
    pub bot: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Vec<String>>,
}

/// App settings. The assembler writes the runtime fields onto the caller's
/// settings; anything it does not know about passes through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_ip_address_ranges: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_subscriptions: Option<EventSubscriptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_webhooks: Option<IncomingWebhooks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactivity: Option<Interactivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_deploy_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_mode_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_rotation_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_runtime: Option<FunctionRuntime>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSubscriptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_subscriptions: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingWebhooks {
    pub incoming_webhooks_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactivity {
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_menu_options_url: Option<String>,
}

/// App Directory listing metadata, passed through unmodified
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppDirectory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_directory_categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_direct_install: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_install_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_landing_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalAuthProviders {
    #[serde(default)]
    pub oauth2: IndexMap<String, OAuth2ProviderManifest>,
}
