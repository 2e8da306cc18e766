//! Function definitions

use crate::manifest::SlackManifest;
use crate::types::ParameterSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A function the app exposes, keyed by `callback_id`
#[derive(Debug, Clone, Default)]
pub struct FunctionDefinition {
    pub callback_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Opaque to this crate; meaningful only to the deployment platform
    pub source_file: String,
    pub input_parameters: Option<ParameterSet>,
    pub output_parameters: Option<ParameterSet>,
}

/// A function as it appears under `functions.<callback_id>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionManifest {
    pub source_file: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_parameters: ParameterSet,
    pub output_parameters: ParameterSet,
}

/// Define a function for use in workflows and the manifest
pub fn define_function(definition: FunctionDefinition) -> Arc<FunctionDefinition> {
    debug!("Defined function: {}", definition.callback_id);
    Arc::new(definition)
}

impl FunctionDefinition {
    pub fn id(&self) -> &str {
        &self.callback_id
    }

    /// True when the callback id is not already qualified with `#/`
    pub fn is_local(&self) -> bool {
        !self.callback_id.contains("#/")
    }

    pub fn export(&self) -> FunctionManifest {
        FunctionManifest {
            source_file: self.source_file.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            input_parameters: self.input_parameters.clone().unwrap_or_default(),
            output_parameters: self.output_parameters.clone().unwrap_or_default(),
        }
    }

    /// Register the custom types referenced by any input or output parameter
    pub fn register_parameter_types(&self, manifest: &mut SlackManifest) {
        for parameters in [&self.input_parameters, &self.output_parameters]
            .into_iter()
            .flatten()
        {
            manifest.register_types(&parameters.properties);
        }
    }
}
