//! Slack App Manifest Assembly
//!
//! This crate lets an app describe its functions, workflows, datastores,
//! custom types and OAuth2 providers as in-memory definitions, then flattens
//! them into the single manifest document consumed by the deployment
//! platform.
//!
//! Definitions are built independently and composed into a
//! [`ManifestDefinition`]; [`manifest`] (or [`SlackManifest::export`]) pulls
//! in everything reachable from it, deduplicated and keyed by identity.
//!
//! ```
//! use slack_manifest::{
//!     define_function, define_workflow, manifest, schema, FunctionDefinition,
//!     ManifestDefinition, ParameterDefinition, ParameterSet, WorkflowSpec,
//! };
//! use serde_json::json;
//!
//! let reverse = define_function(FunctionDefinition {
//!     callback_id: "reverse".to_string(),
//!     title: "Reverse".to_string(),
//!     source_file: "functions/reverse.ts".to_string(),
//!     input_parameters: Some(ParameterSet::new().with_required_property(
//!         "text",
//!         ParameterDefinition::new(schema::types::STRING),
//!     )),
//!     ..Default::default()
//! });
//!
//! let mut workflow = define_workflow(WorkflowSpec {
//!     callback_id: "reverse_workflow".to_string(),
//!     title: "Reverse".to_string(),
//!     input_parameters: Some(ParameterSet::new().with_property(
//!         "text",
//!         ParameterDefinition::new(schema::types::STRING),
//!     )),
//!     ..Default::default()
//! });
//! let text = workflow.inputs().get("text");
//! workflow.add_step(&reverse, json!({ "text": text }))?;
//!
//! let exported = manifest(
//!     ManifestDefinition {
//!         name: "Reverser".to_string(),
//!         slack_hosted: true,
//!         ..Default::default()
//!     }
//!     .with_workflow(workflow),
//! )?;
//!
//! assert!(exported.functions.contains_key("reverse"));
//! assert_eq!(
//!     exported.workflows["reverse_workflow"].steps[0].inputs,
//!     json!({ "text": "{{inputs.text}}" })
//! );
//! # Ok::<(), slack_manifest::ManifestError>(())
//! ```

pub mod custom_type;
pub mod datastore;
pub mod definition;
pub mod errors;
pub mod function;
pub mod manifest;
pub mod manifest_writer;
pub mod oauth2;
pub mod parameters;
pub mod registry;
pub mod schema;
pub mod types;
pub mod workflow;

pub use custom_type::{define_type, CustomType, CustomTypeSpec, TypeIdentity};
pub use datastore::{define_datastore, DatastoreDefinition, DatastoreManifest};
pub use definition::{AppHomeDefinition, FeaturesDefinition, ManifestDefinition};
pub use function::{define_function, FunctionDefinition, FunctionManifest};
pub use manifest::{manifest, SlackManifest};
pub use oauth2::{define_oauth2_provider, OAuth2ProviderDefinition, OAuth2ProviderManifest};
pub use parameters::{ParameterReference, ParameterVariable};
pub use types::{
    AppDirectory, AppHomeSchema, BotUser, DisplayInformation, EventSubscriptions,
    ExternalAuthProviders, FeaturesSchema, FunctionRuntime, IncomingWebhooks, Interactivity,
    ManifestMetadata, ManifestSchema, ManifestSettings, OAuthConfig, ParameterDefinition,
    ParameterSet, ParameterType, Scopes, Shortcut, SlashCommand, WorkflowStepConfig,
};
pub use workflow::{
    define_workflow, StepFunction, StepManifest, WorkflowDefinition, WorkflowManifest,
    WorkflowSpec, WorkflowStep,
};

pub use errors::ManifestError;

// Re-export manifest writer utilities for persisting the exported document
pub use manifest_writer::{read_from_path, write_to_path};
