//! Manifest assembly
//!
//! [`SlackManifest`] walks everything reachable from a [`ManifestDefinition`]
//! and flattens it into one [`ManifestSchema`]. Functions and custom types are
//! discovered transitively: registering a function registers the custom types
//! of its parameters, and registering a custom type registers the types its
//! shape references. Discovery is depth-first and pre-order, so a type's own
//! dependencies land right after it, before the next sibling property.
//!
//! The assembler keeps its discovered functions and types in its own
//! registries; the caller's definition is never modified.

use crate::custom_type::CustomType;
use crate::datastore::DatastoreDefinition;
use crate::definition::ManifestDefinition;
use crate::errors::ManifestError;
use crate::function::FunctionDefinition;
use crate::oauth2::OAuth2ProviderDefinition;
use crate::registry::Registry;
use crate::schema::{DATASTORE_READ_SCOPE, DATASTORE_WRITE_SCOPE};
use crate::types::{
    AppHomeSchema, BotUser, DisplayInformation, ExternalAuthProviders, FeaturesSchema,
    FunctionRuntime, ManifestSchema, ManifestSettings, OAuthConfig, ParameterDefinition, Scopes,
};
use crate::workflow::WorkflowDefinition;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Assemble the manifest for an app definition in one call
pub fn manifest(definition: ManifestDefinition) -> Result<ManifestSchema, ManifestError> {
    SlackManifest::new(definition).export()
}

/// The manifest assembler. Not meant to be shared across threads while
/// exporting; registration mutates its registries without locking.
#[derive(Debug)]
pub struct SlackManifest {
    definition: ManifestDefinition,
    functions: Registry<FunctionDefinition>,
    types: Registry<CustomType>,
    workflows: Registry<WorkflowDefinition>,
    datastores: Registry<DatastoreDefinition>,
    providers: Registry<OAuth2ProviderDefinition>,
}

impl SlackManifest {
    pub fn new(definition: ManifestDefinition) -> Self {
        SlackManifest {
            definition,
            functions: Registry::default(),
            types: Registry::default(),
            workflows: Registry::default(),
            datastores: Registry::default(),
            providers: Registry::default(),
        }
    }

    pub fn definition(&self) -> &ManifestDefinition {
        &self.definition
    }

    /// Every function registered so far, explicit and discovered, in order
    pub fn functions(&self) -> &[Arc<FunctionDefinition>] {
        self.functions.entries()
    }

    /// Every custom type registered so far, explicit and discovered, in order
    pub fn types(&self) -> &[Arc<CustomType>] {
        self.types.entries()
    }

    /// Register a function and the custom types its parameters reference.
    /// Registering a known callback id again is a no-op.
    pub fn register_function(&mut self, function: &Arc<FunctionDefinition>) {
        if !self.functions.insert(function.id(), function) {
            return;
        }
        debug!("Registered function: {}", function.id());
        function.register_parameter_types(self);
    }

    /// Register a custom type and, transitively, every type it references.
    /// Registering a known id again is a no-op, which also ends cycles.
    pub fn register_type(&mut self, custom_type: &Arc<CustomType>) {
        if !self.types.insert(custom_type.id(), custom_type) {
            return;
        }
        debug!("Registered custom type: {}", custom_type.id());
        custom_type.register_parameter_types(self);
    }

    /// Register every custom type used directly as a property's `type`
    pub fn register_types(&mut self, properties: &IndexMap<String, ParameterDefinition>) {
        for property in properties.values() {
            if let Some(custom_type) = property.param_type.as_custom() {
                self.register_type(custom_type);
            }
        }
    }

    fn register_workflow(&mut self, workflow: &Arc<WorkflowDefinition>) {
        workflow.register_step_functions(self);
        workflow.register_parameter_types(self);
        if self.workflows.insert(workflow.id(), workflow) {
            debug!("Registered workflow: {}", workflow.id());
        }
    }

    fn register_datastore(&mut self, datastore: &Arc<DatastoreDefinition>) {
        datastore.register_attribute_types(self);
        if self.datastores.insert(&datastore.name, datastore) {
            debug!("Registered datastore: {}", datastore.name);
        }
    }

    /// Register everything reachable from the definition and build the manifest
    pub fn export(&mut self) -> Result<ManifestSchema, ManifestError> {
        let function_runtime = FunctionRuntime::from_slack_hosted(self.definition.slack_hosted);

        for function in self.definition.functions.clone() {
            self.register_function(&function);
        }
        for workflow in self.definition.workflows.clone() {
            self.register_workflow(&workflow);
        }
        for datastore in self.definition.datastores.clone() {
            self.register_datastore(&datastore);
        }
        for custom_type in self.definition.types.clone() {
            self.register_type(&custom_type);
        }
        for provider in self.definition.external_auth_providers.clone() {
            self.providers.insert(provider.id(), &provider);
        }

        let def = &self.definition;

        let display_information = DisplayInformation {
            name: def.name.clone(),
            description: def.description.clone(),
            background_color: def.background_color.clone(),
            long_description: def.long_description.clone(),
        };

        let features = self.build_features();
        let oauth_config = self.build_oauth_config();
        let settings = self.build_settings(function_runtime);

        let types = self
            .types
            .entries()
            .iter()
            .map(|t| Ok((t.id().to_string(), t.export()?)))
            .collect::<Result<IndexMap<_, _>, ManifestError>>()?;

        let functions = self
            .functions
            .entries()
            .iter()
            .map(|f| (f.id().to_string(), f.export()))
            .collect();

        let workflows = self
            .workflows
            .entries()
            .iter()
            .map(|w| (w.id().to_string(), w.export()))
            .collect();

        let datastores = self
            .datastores
            .entries()
            .iter()
            .map(|d| (d.name.clone(), d.export()))
            .collect();

        let external_auth_providers = (!self.providers.is_empty()).then(|| ExternalAuthProviders {
            oauth2: self
                .providers
                .entries()
                .iter()
                .map(|p| (p.id().to_string(), p.export()))
                .collect(),
        });

        let schema = ManifestSchema {
            metadata: def.metadata.clone(),
            display_information,
            icon: def.icon.clone(),
            features,
            oauth_config,
            settings,
            types,
            functions,
            workflows,
            datastores,
            external_auth_providers,
            outgoing_domains: def.outgoing_domains.clone(),
            app_directory: def.app_directory.clone(),
        };

        info!(
            "Exported manifest for '{}': {} functions, {} workflows, {} types, {} datastores",
            schema.display_information.name,
            schema.functions.len(),
            schema.workflows.len(),
            schema.types.len(),
            schema.datastores.len()
        );

        Ok(schema)
    }

    fn build_features(&self) -> FeaturesSchema {
        let def = &self.definition;
        let features = def.features.clone().unwrap_or_default();
        let app_home = features.app_home.unwrap_or_default();

        FeaturesSchema {
            bot_user: BotUser {
                display_name: def.display_name.clone().unwrap_or_else(|| def.name.clone()),
            },
            app_home: AppHomeSchema {
                home_tab_enabled: app_home.home_tab_enabled,
                messages_tab_enabled: app_home.messages_tab_enabled.unwrap_or(true),
                messages_tab_read_only_enabled: app_home
                    .messages_tab_read_only_enabled
                    .unwrap_or(true),
            },
            shortcuts: features.shortcuts,
            slash_commands: features.slash_commands,
            unfurl_domains: features.unfurl_domains,
            workflow_steps: features.workflow_steps,
        }
    }

    fn build_oauth_config(&self) -> OAuthConfig {
        let def = &self.definition;
        let mut bot = def.bot_scopes.clone();

        if !self.datastores.is_empty() {
            for scope in [DATASTORE_READ_SCOPE, DATASTORE_WRITE_SCOPE] {
                if !bot.iter().any(|s| s == scope) {
                    bot.push(scope.to_string());
                }
            }
        }

        OAuthConfig {
            scopes: Scopes {
                bot,
                user: def.user_scopes.clone(),
            },
            redirect_urls: def.redirect_urls.clone(),
            token_management_enabled: def.token_management_enabled,
        }
    }

    /// The caller's settings with the runtime fields written over them.
    /// An absent definition value clears the corresponding setting.
    fn build_settings(&self, function_runtime: FunctionRuntime) -> ManifestSettings {
        let def = &self.definition;
        let mut settings = def.settings.clone().unwrap_or_default();

        settings.function_runtime = Some(function_runtime);
        settings.socket_mode_enabled = def.socket_mode_enabled;
        settings.token_rotation_enabled = def.token_rotation_enabled;
        settings.event_subscriptions = def.event_subscriptions.clone();
        settings
    }
}
