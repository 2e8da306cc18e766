//! Parameter references for templating workflow step inputs
//!
//! A [`ParameterReference`] is an accumulated dot path that renders as
//! `{{path}}` both through `Display` and through serde. A
//! [`ParameterVariable`] adds the shape knowledge: the sub-properties a
//! parameter definition declares, and whether unknown properties may still be
//! accessed (open objects and untyped values).

use crate::schema;
use crate::types::ParameterDefinition;
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// A path into the workflow's runtime data, e.g. `steps.0.user_id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParameterReference {
    segments: SmallVec<[Arc<str>; 4]>,
}

impl ParameterReference {
    /// Build a reference from a namespace (possibly empty) and a name.
    /// Empty segments are dropped.
    pub fn new(namespace: &str, name: &str) -> Self {
        ParameterReference::default().get(namespace).get(name)
    }

    /// Extend the path by one property
    pub fn get(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        if !key.is_empty() {
            segments.push(Arc::from(key));
        }
        ParameterReference { segments }
    }

    /// The dot-joined path without braces
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.path())
    }
}

impl Serialize for ParameterReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<ParameterReference> for serde_json::Value {
    fn from(reference: ParameterReference) -> Self {
        serde_json::Value::String(reference.to_string())
    }
}

/// A parameter reference that knows the shape it points at.
///
/// Sub-variables are built on access, so shapes that refer back to
/// themselves through custom types never unfold further than the path
/// actually walked.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterVariable {
    reference: ParameterReference,
    shape: Shape,
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Untyped,
    Declared(ParameterDefinition),
    Properties {
        properties: IndexMap<String, ParameterDefinition>,
        open: bool,
    },
}

/// A shape with custom types looked through
enum Resolved<'a> {
    Leaf,
    Untyped,
    Object {
        properties: &'a IndexMap<String, ParameterDefinition>,
        open: bool,
    },
}

/// Follow custom types down to a concrete shape. Objects with declared
/// properties are typed, objects without them are untyped, anything else is
/// a leaf. Undefined types and alias loops resolve as untyped.
fn resolve(definition: &ParameterDefinition) -> Resolved<'_> {
    let mut current = definition;
    let mut seen = AHashSet::new();

    while let Some(custom_type) = current.param_type.as_custom() {
        if !seen.insert(custom_type.id()) {
            return Resolved::Untyped;
        }
        match custom_type.definition() {
            Some(definition) => current = definition,
            None => return Resolved::Untyped,
        }
    }

    if !current.param_type.is(schema::types::OBJECT) {
        return Resolved::Leaf;
    }
    match &current.properties {
        Some(properties) => Resolved::Object {
            properties,
            open: current.additional_properties == Some(true),
        },
        None => Resolved::Untyped,
    }
}

impl ParameterVariable {
    /// Build a variable for `namespace.name` following the parameter's shape,
    /// looking through custom types.
    pub fn new(namespace: &str, name: &str, definition: &ParameterDefinition) -> Self {
        ParameterVariable {
            reference: ParameterReference::new(namespace, name),
            shape: Shape::Declared(definition.clone()),
        }
    }

    /// A variable that accepts any property path
    pub fn untyped(namespace: &str, name: &str) -> Self {
        ParameterVariable {
            reference: ParameterReference::new(namespace, name),
            shape: Shape::Untyped,
        }
    }

    /// A variable with one typed sub-variable per declared property
    pub fn with_properties(
        namespace: &str,
        name: &str,
        properties: &IndexMap<String, ParameterDefinition>,
        open: bool,
    ) -> Self {
        ParameterVariable {
            reference: ParameterReference::new(namespace, name),
            shape: Shape::Properties {
                properties: properties.clone(),
                open,
            },
        }
    }

    fn resolved(&self) -> Resolved<'_> {
        match &self.shape {
            Shape::Untyped => Resolved::Untyped,
            Shape::Declared(definition) => resolve(definition),
            Shape::Properties { properties, open } => Resolved::Object {
                properties,
                open: *open,
            },
        }
    }

    /// Access a property. Declared properties keep their shape; undeclared
    /// ones are only reachable on open or untyped variables.
    pub fn get(&self, key: &str) -> Option<ParameterVariable> {
        let reference = self.reference.get(key);
        let shape = match self.resolved() {
            Resolved::Leaf => return None,
            Resolved::Untyped => Shape::Untyped,
            Resolved::Object { properties, open } => match properties.get(key) {
                Some(definition) => Shape::Declared(definition.clone()),
                None if open => Shape::Untyped,
                None => return None,
            },
        };
        Some(ParameterVariable { reference, shape })
    }

    /// Walk a dotted property chain, e.g. `"user.profile.email"`
    pub fn path(&self, dotted: &str) -> Option<ParameterVariable> {
        dotted
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.clone(), |variable, segment| variable.get(segment))
    }

    pub fn reference(&self) -> &ParameterReference {
        &self.reference
    }

    /// Names of the declared properties, in declaration order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        let properties = match self.resolved() {
            Resolved::Object { properties, .. } => Some(properties),
            Resolved::Leaf | Resolved::Untyped => None,
        };
        properties
            .into_iter()
            .flat_map(|properties| properties.keys().map(String::as_str))
    }

    pub fn is_open(&self) -> bool {
        match self.resolved() {
            Resolved::Leaf => false,
            Resolved::Untyped => true,
            Resolved::Object { open, .. } => open,
        }
    }
}

impl fmt::Display for ParameterVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.reference, f)
    }
}

impl Serialize for ParameterVariable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reference.serialize(serializer)
    }
}

impl From<ParameterVariable> for serde_json::Value {
    fn from(variable: ParameterVariable) -> Self {
        variable.reference.into()
    }
}

impl From<&ParameterVariable> for serde_json::Value {
    fn from(variable: &ParameterVariable) -> Self {
        serde_json::Value::String(variable.to_string())
    }
}
