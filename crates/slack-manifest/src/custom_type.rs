//! Custom types: named, reusable parameter shapes
//!
//! A custom type is keyed by either a `name` or a `callback_id`, never both.
//! Its shape may reference other custom types (as an alias, as array items,
//! or as object properties), and registering one type with the assembler
//! pulls in everything it references.
//!
//! Self-referencing and mutually-referencing graphs are built by declaring a
//! type first and defining its shape afterwards:
//!
//! ```
//! use slack_manifest::{CustomType, ParameterDefinition};
//!
//! let node = CustomType::named("node");
//! node.define(
//!     ParameterDefinition::object()
//!         .with_property("next", ParameterDefinition::new(&node)),
//! )?;
//! assert_eq!(node.to_string(), "#/types/node");
//! # Ok::<(), slack_manifest::ManifestError>(())
//! ```

use crate::errors::ManifestError;
use crate::manifest::SlackManifest;
use crate::schema;
use crate::types::ParameterDefinition;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The key a custom type is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeIdentity {
    Name(Arc<str>),
    CallbackId(Arc<str>),
}

impl TypeIdentity {
    pub fn id(&self) -> &str {
        match self {
            TypeIdentity::Name(id) | TypeIdentity::CallbackId(id) => id,
        }
    }

    /// The key this identity would occupy inside a type definition
    fn key(&self) -> &'static str {
        match self {
            TypeIdentity::Name(_) => "name",
            TypeIdentity::CallbackId(_) => "callback_id",
        }
    }
}

/// Arguments for [`define_type`]
#[derive(Debug, Clone, Default)]
pub struct CustomTypeSpec {
    pub name: Option<String>,
    pub callback_id: Option<String>,
    pub definition: ParameterDefinition,
}

/// A registered custom type. Immutable once its shape is defined.
pub struct CustomType {
    identity: TypeIdentity,
    definition: OnceLock<ParameterDefinition>,
}

/// Define a custom type in one step
pub fn define_type(spec: CustomTypeSpec) -> Result<Arc<CustomType>, ManifestError> {
    let identity = match (spec.name, spec.callback_id) {
        (Some(name), None) => TypeIdentity::Name(Arc::from(name)),
        (None, Some(callback_id)) => TypeIdentity::CallbackId(Arc::from(callback_id)),
        (Some(name), Some(callback_id)) => {
            return Err(ManifestError::ConflictingTypeIdentity { name, callback_id })
        }
        (None, None) => return Err(ManifestError::MissingTypeIdentity),
    };

    let custom_type = CustomType::declare(identity);
    custom_type.define(spec.definition)?;
    Ok(custom_type)
}

impl CustomType {
    /// Declare a type whose shape will be supplied later via [`CustomType::define`]
    pub fn declare(identity: TypeIdentity) -> Arc<Self> {
        Arc::new(CustomType {
            identity,
            definition: OnceLock::new(),
        })
    }

    pub fn named(name: &str) -> Arc<Self> {
        Self::declare(TypeIdentity::Name(Arc::from(name)))
    }

    pub fn with_callback_id(callback_id: &str) -> Arc<Self> {
        Self::declare(TypeIdentity::CallbackId(Arc::from(callback_id)))
    }

    /// Supply the shape of a declared type. A type can only be defined once.
    pub fn define(&self, definition: ParameterDefinition) -> Result<(), ManifestError> {
        self.definition
            .set(definition)
            .map_err(|_| ManifestError::TypeAlreadyDefined(self.id().to_string()))
    }

    pub fn id(&self) -> &str {
        self.identity.id()
    }

    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    pub fn definition(&self) -> Option<&ParameterDefinition> {
        self.definition.get()
    }

    /// `#/types/<id>`
    pub fn reference(&self) -> String {
        format!("#/types/{}", self.id())
    }

    /// The shape as it appears under `types.<id>`, without the identity key
    pub fn export(&self) -> Result<ParameterDefinition, ManifestError> {
        let mut exported = self
            .definition()
            .cloned()
            .ok_or_else(|| ManifestError::UndefinedType(self.id().to_string()))?;
        exported.extra.remove(self.identity.key());
        Ok(exported)
    }

    /// Register every custom type this shape depends on
    pub fn register_parameter_types(&self, manifest: &mut SlackManifest) {
        let Some(definition) = self.definition() else {
            return;
        };

        if definition.param_type.is(schema::types::ARRAY) {
            if let Some(item_type) = definition
                .items
                .as_ref()
                .and_then(|items| items.param_type.as_custom())
            {
                manifest.register_type(item_type);
            }
        } else if definition.param_type.is(schema::types::OBJECT) {
            if let Some(properties) = &definition.properties {
                manifest.register_types(properties);
            }
        } else if let Some(aliased) = definition.param_type.as_custom() {
            manifest.register_type(aliased);
        }
    }
}

impl fmt::Display for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#/types/{}", self.id())
    }
}

// The shape may reference this type again, so only the reference is printed.
impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("identity", &self.identity)
            .field("defined", &self.definition.get().is_some())
            .finish()
    }
}

impl Serialize for CustomType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ManifestDefinition;
    use serde_json::json;

    fn incident_type() -> Result<Arc<CustomType>, ManifestError> {
        define_type(CustomTypeSpec {
            name: Some("incident".to_string()),
            definition: ParameterDefinition::object()
                .with_property("summary", ParameterDefinition::new(schema::types::STRING))
                .with_extra("name", json!("incident")),
            ..Default::default()
        })
    }

    #[test]
    fn test_export_strips_identity_key() -> Result<(), ManifestError> {
        let incident = incident_type()?;
        let exported = serde_json::to_value(incident.export()?)?;

        assert!(exported.get("name").is_none());
        assert_eq!(exported["type"], json!("object"));
        assert_eq!(exported["properties"]["summary"]["type"], json!("string"));
        Ok(())
    }

    #[test]
    fn test_reference_rendering() -> Result<(), ManifestError> {
        let incident = incident_type()?;

        assert_eq!(incident.to_string(), "#/types/incident");
        assert_eq!(serde_json::to_string(&*incident)?, r##""#/types/incident""##);

        let by_callback = CustomType::with_callback_id("ticket");
        assert_eq!(by_callback.reference(), "#/types/ticket");
        Ok(())
    }

    #[test]
    fn test_identity_is_exclusive() {
        let neither = define_type(CustomTypeSpec::default());
        assert!(matches!(neither, Err(ManifestError::MissingTypeIdentity)));

        let both = define_type(CustomTypeSpec {
            name: Some("a".to_string()),
            callback_id: Some("b".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            both,
            Err(ManifestError::ConflictingTypeIdentity { .. })
        ));
    }

    #[test]
    fn test_define_only_once() {
        let declared = CustomType::named("once");
        assert!(declared.define(ParameterDefinition::new("string")).is_ok());
        assert!(matches!(
            declared.define(ParameterDefinition::new("boolean")),
            Err(ManifestError::TypeAlreadyDefined(_))
        ));
    }

    #[test]
    fn test_export_undefined_type_fails() {
        let declared = CustomType::named("pending");
        assert!(matches!(
            declared.export(),
            Err(ManifestError::UndefinedType(id)) if id == "pending"
        ));
    }

    #[test]
    fn test_alias_registers_target() -> Result<(), ManifestError> {
        let target = incident_type()?;
        let alias = define_type(CustomTypeSpec {
            name: Some("incident_alias".to_string()),
            definition: ParameterDefinition::new(&target),
            ..Default::default()
        })?;

        let mut manifest = SlackManifest::new(ManifestDefinition::default());
        alias.register_parameter_types(&mut manifest);

        let ids: Vec<&str> = manifest.types().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["incident"]);
        Ok(())
    }

    #[test]
    fn test_array_items_register_target() -> Result<(), ManifestError> {
        let target = incident_type()?;
        let list = define_type(CustomTypeSpec {
            callback_id: Some("incident_list".to_string()),
            definition: ParameterDefinition::array_of(ParameterDefinition::new(&target)),
            ..Default::default()
        })?;

        let mut manifest = SlackManifest::new(ManifestDefinition::default());
        list.register_parameter_types(&mut manifest);

        assert_eq!(manifest.types().len(), 1);
        assert_eq!(manifest.types()[0].id(), "incident");
        Ok(())
    }
}
