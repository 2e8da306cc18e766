//! Function handler test contexts
//!
//! [`SlackFunctionTester`] builds the context a function handler receives
//! when the platform executes it, so handlers can be unit-tested without a
//! live workspace. Anything not supplied is filled with a placeholder.
//!
//! ```
//! use serde_json::json;
//! use slack_function_tester::{CreateContextArgs, SlackFunctionTester};
//!
//! let tester = SlackFunctionTester::new("reverse");
//! let context = tester.create_context(CreateContextArgs {
//!     inputs: json!({ "text": "hello" }),
//!     ..Default::default()
//! });
//!
//! assert_eq!(context.token, "slack-function-test-token");
//! assert_eq!(context.event.function.callback_id, "reverse");
//! assert_eq!(context.event.inputs, json!({ "text": "hello" }));
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use slack_manifest::FunctionDefinition;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TOKEN: &str = "slack-function-test-token";
pub const DEFAULT_TITLE: &str = "Function Test Title";
pub const FUNCTION_EXECUTED: &str = "function_executed";

/// The function a tester synthesizes contexts for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionUnderTest {
    pub callback_id: String,
    pub title: String,
}

impl From<&str> for FunctionUnderTest {
    fn from(callback_id: &str) -> Self {
        FunctionUnderTest::from(callback_id.to_string())
    }
}

impl From<String> for FunctionUnderTest {
    fn from(callback_id: String) -> Self {
        FunctionUnderTest {
            callback_id,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl From<&FunctionDefinition> for FunctionUnderTest {
    fn from(definition: &FunctionDefinition) -> Self {
        FunctionUnderTest {
            callback_id: definition.callback_id.clone(),
            title: definition.title.clone(),
        }
    }
}

impl From<&Arc<FunctionDefinition>> for FunctionUnderTest {
    fn from(definition: &Arc<FunctionDefinition>) -> Self {
        FunctionUnderTest::from(definition.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedFunction {
    pub id: String,
    pub callback_id: String,
    pub title: String,
}

/// The `function_executed` event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExecutedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub event_ts: String,
    pub function_execution_id: String,
    pub inputs: serde_json::Value,
    pub function: ExecutedFunction,
}

/// Overrides for [`SlackFunctionTester::create_context`]
#[derive(Debug, Clone, Default)]
pub struct CreateContextArgs {
    pub inputs: serde_json::Value,
    pub env: Option<AHashMap<String, String>>,
    pub token: Option<String>,
    pub event: Option<FunctionExecutedEvent>,
}

/// What a handler is invoked with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionContext {
    pub inputs: serde_json::Value,
    pub env: AHashMap<String, String>,
    pub token: String,
    pub event: FunctionExecutedEvent,
}

#[derive(Debug, Clone)]
pub struct SlackFunctionTester {
    function: FunctionUnderTest,
}

impl SlackFunctionTester {
    pub fn new(function: impl Into<FunctionUnderTest>) -> Self {
        SlackFunctionTester {
            function: function.into(),
        }
    }

    pub fn function(&self) -> &FunctionUnderTest {
        &self.function
    }

    pub fn create_context(&self, args: CreateContextArgs) -> FunctionContext {
        let inputs = if args.inputs.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            args.inputs
        };
        let event = args
            .event
            .unwrap_or_else(|| self.executed_event(inputs.clone()));

        debug!(
            "Created test context for {} ({})",
            self.function.callback_id, event.function_execution_id
        );

        FunctionContext {
            inputs,
            env: args.env.unwrap_or_default(),
            token: args.token.unwrap_or_else(|| DEFAULT_TOKEN.to_string()),
            event,
        }
    }

    fn executed_event(&self, inputs: serde_json::Value) -> FunctionExecutedEvent {
        let ts = chrono::Utc::now().timestamp_millis();
        FunctionExecutedEvent {
            event_type: FUNCTION_EXECUTED.to_string(),
            event_ts: ts.to_string(),
            function_execution_id: format!("fx{ts}"),
            inputs,
            function: ExecutedFunction {
                id: format!("fn{ts}"),
                callback_id: self.function.callback_id.clone(),
                title: self.function.title.clone(),
            },
        }
    }
}
