//! Workflow definitions: ordered steps invoking functions
//!
//! Steps are numbered by position when they are added (`"0"`, `"1"`, ...).
//! Each step exposes its outputs as parameter variables scoped to
//! `steps.<id>`, so later steps can template their inputs against earlier
//! outputs:
//!
//! ```
//! use slack_manifest::{define_workflow, WorkflowSpec};
//! use serde_json::json;
//!
//! let mut workflow = define_workflow(WorkflowSpec {
//!     callback_id: "greet".to_string(),
//!     title: "Greet".to_string(),
//!     ..Default::default()
//! });
//! let lookup = workflow.add_step("lookup_user", json!({}))?;
//! let name = lookup.outputs().path("profile.name");
//! workflow.add_step("slack#/functions/send_message", json!({"text": name}))?;
//!
//! let exported = workflow.export();
//! assert_eq!(exported.steps[1].inputs["text"], "{{steps.0.profile.name}}");
//! # Ok::<(), slack_manifest::ManifestError>(())
//! ```

use crate::errors::ManifestError;
use crate::function::FunctionDefinition;
use crate::manifest::SlackManifest;
use crate::parameters::ParameterVariable;
use crate::types::ParameterSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Arguments for [`define_workflow`]
#[derive(Debug, Clone, Default)]
pub struct WorkflowSpec {
    pub callback_id: String,
    pub title: String,
    pub description: Option<String>,
    pub input_parameters: Option<ParameterSet>,
    pub output_parameters: Option<ParameterSet>,
}

/// What a step invokes: a typed function definition or a bare callback id
#[derive(Debug, Clone)]
pub enum StepFunction {
    Typed(Arc<FunctionDefinition>),
    Untyped(String),
}

impl From<&str> for StepFunction {
    fn from(callback_id: &str) -> Self {
        StepFunction::Untyped(callback_id.to_string())
    }
}

impl From<String> for StepFunction {
    fn from(callback_id: String) -> Self {
        StepFunction::Untyped(callback_id)
    }
}

impl From<Arc<FunctionDefinition>> for StepFunction {
    fn from(function: Arc<FunctionDefinition>) -> Self {
        StepFunction::Typed(function)
    }
}

impl From<&Arc<FunctionDefinition>> for StepFunction {
    fn from(function: &Arc<FunctionDefinition>) -> Self {
        StepFunction::Typed(Arc::clone(function))
    }
}

/// A single step of a workflow
#[derive(Debug, Clone)]
pub struct WorkflowStep {
    id: String,
    function_reference: String,
    function: Option<Arc<FunctionDefinition>>,
    inputs: serde_json::Value,
    outputs: ParameterVariable,
}

/// A step as it appears in `workflows.<callback_id>.steps`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepManifest {
    pub id: String,
    pub function_id: String,
    pub inputs: serde_json::Value,
}

/// Qualify a bare callback id as `#/functions/<id>`
fn normalize_function_reference(callback_id: &str) -> String {
    if callback_id.contains("#/") {
        callback_id.to_string()
    } else {
        format!("#/functions/{}", callback_id)
    }
}

impl WorkflowStep {
    fn new(
        id: String,
        function: StepFunction,
        inputs: serde_json::Value,
    ) -> WorkflowStep {
        let inputs = match inputs {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other,
        };

        match function {
            StepFunction::Typed(definition) => {
                let empty = ParameterSet::default();
                let output_parameters = definition.output_parameters.as_ref().unwrap_or(&empty);
                let outputs = ParameterVariable::with_properties(
                    "steps",
                    &id,
                    &output_parameters.properties,
                    true,
                );
                WorkflowStep {
                    function_reference: normalize_function_reference(&definition.callback_id),
                    function: Some(definition),
                    id,
                    inputs,
                    outputs,
                }
            }
            StepFunction::Untyped(callback_id) => WorkflowStep {
                function_reference: normalize_function_reference(&callback_id),
                function: None,
                outputs: ParameterVariable::untyped("steps", &id),
                id,
                inputs,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fully qualified function id, e.g. `#/functions/reverse`
    pub fn function_reference(&self) -> &str {
        &self.function_reference
    }

    pub fn inputs(&self) -> &serde_json::Value {
        &self.inputs
    }

    /// References to this step's outputs, rooted at `steps.<id>`
    pub fn outputs(&self) -> &ParameterVariable {
        &self.outputs
    }

    /// Only a typed step whose function is local to this app registers it
    pub fn register_function(&self, manifest: &mut SlackManifest) {
        if let Some(function) = &self.function {
            if function.is_local() {
                manifest.register_function(function);
            }
        }
    }

    pub fn export(&self) -> StepManifest {
        StepManifest {
            id: self.id.clone(),
            function_id: self.function_reference.clone(),
            inputs: self.inputs.clone(),
        }
    }
}

/// A workflow under construction or ready for export
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    spec: WorkflowSpec,
    inputs: ParameterVariable,
    steps: Vec<WorkflowStep>,
}

/// A workflow as it appears under `workflows.<callback_id>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowManifest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_parameters: Option<ParameterSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_parameters: Option<ParameterSet>,
    pub steps: Vec<StepManifest>,
}

pub fn define_workflow(spec: WorkflowSpec) -> WorkflowDefinition {
    debug!("Defined workflow: {}", spec.callback_id);
    WorkflowDefinition::new(spec)
}

impl WorkflowDefinition {
    pub fn new(spec: WorkflowSpec) -> Self {
        let inputs = match &spec.input_parameters {
            Some(parameters) => {
                ParameterVariable::with_properties("", "inputs", &parameters.properties, false)
            }
            None => ParameterVariable::with_properties("", "inputs", &Default::default(), false),
        };

        WorkflowDefinition {
            spec,
            inputs,
            steps: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.callback_id
    }

    /// `#/workflows/<callback_id>`
    pub fn reference(&self) -> String {
        format!("#/workflows/{}", self.spec.callback_id)
    }

    /// References to the declared workflow inputs, rooted at `inputs`
    pub fn inputs(&self) -> &ParameterVariable {
        &self.inputs
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Append a step and return it so its outputs can feed later steps.
    ///
    /// Inputs may contain parameter variables anywhere; serializing them here
    /// is what turns each one into its `{{path}}` string.
    pub fn add_step<F, I>(&mut self, function: F, inputs: I) -> Result<WorkflowStep, ManifestError>
    where
        F: Into<StepFunction>,
        I: Serialize,
    {
        let inputs = serde_json::to_value(inputs)?;
        let id = self.steps.len().to_string();
        let step = WorkflowStep::new(id, function.into(), inputs);

        debug!(
            "Workflow {} step {} -> {}",
            self.spec.callback_id, step.id, step.function_reference
        );
        self.steps.push(step.clone());
        Ok(step)
    }

    pub fn register_step_functions(&self, manifest: &mut SlackManifest) {
        for step in &self.steps {
            step.register_function(manifest);
        }
    }

    pub fn register_parameter_types(&self, manifest: &mut SlackManifest) {
        for parameters in [&self.spec.input_parameters, &self.spec.output_parameters]
            .into_iter()
            .flatten()
        {
            manifest.register_types(&parameters.properties);
        }
    }

    pub fn export(&self) -> WorkflowManifest {
        WorkflowManifest {
            title: self.spec.title.clone(),
            description: self.spec.description.clone(),
            input_parameters: self.spec.input_parameters.clone(),
            output_parameters: self.spec.output_parameters.clone(),
            steps: self.steps.iter().map(WorkflowStep::export).collect(),
        }
    }
}
