//! Datastore definitions: table-like schemas keyed by `name`

use crate::manifest::SlackManifest;
use crate::types::ParameterDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct DatastoreDefinition {
    pub name: String,
    /// Expected to name one of `attributes`; not checked
    pub primary_key: String,
    pub attributes: IndexMap<String, ParameterDefinition>,
    pub time_to_live_attribute: Option<String>,
}

/// A datastore as it appears under `datastores.<name>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatastoreManifest {
    pub primary_key: String,
    pub attributes: IndexMap<String, ParameterDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live_attribute: Option<String>,
}

pub fn define_datastore(definition: DatastoreDefinition) -> Arc<DatastoreDefinition> {
    debug!("Defined datastore: {}", definition.name);
    Arc::new(definition)
}

impl DatastoreDefinition {
    pub fn export(&self) -> DatastoreManifest {
        DatastoreManifest {
            primary_key: self.primary_key.clone(),
            attributes: self.attributes.clone(),
            time_to_live_attribute: self.time_to_live_attribute.clone(),
        }
    }

    pub fn register_attribute_types(&self, manifest: &mut SlackManifest) {
        manifest.register_types(&self.attributes);
    }
}
