//! Type tags understood by the deployment platform
//!
//! Primitive tags describe JSON-schema-like shapes; `slack#/types/*` tags are
//! the platform's built-in types and may be used anywhere a parameter type is
//! expected.

/// Primitive parameter types
pub mod types {
    pub const STRING: &str = "string";
    pub const BOOLEAN: &str = "boolean";
    pub const INTEGER: &str = "integer";
    pub const NUMBER: &str = "number";
    pub const OBJECT: &str = "object";
    pub const ARRAY: &str = "array";
}

/// Built-in Slack types
pub mod slack_types {
    pub const USER_ID: &str = "slack#/types/user_id";
    pub const CHANNEL_ID: &str = "slack#/types/channel_id";
    pub const USERGROUP_ID: &str = "slack#/types/usergroup_id";
    pub const TEAM_ID: &str = "slack#/types/team_id";
    pub const FILE_ID: &str = "slack#/types/file_id";
    pub const CANVAS_ID: &str = "slack#/types/canvas_id";
    pub const CANVAS_TEMPLATE_ID: &str = "slack#/types/canvas_template_id";
    pub const LIST_ID: &str = "slack#/types/list_id";
    pub const TIMESTAMP: &str = "slack#/types/timestamp";
    pub const DATE: &str = "slack#/types/date";
    pub const MESSAGE_TS: &str = "slack#/types/message_ts";
    pub const MESSAGE_CONTEXT: &str = "slack#/types/message_context";
    pub const BLOCKS: &str = "slack#/types/blocks";
    pub const RICH_TEXT: &str = "slack#/types/rich_text";
    pub const EXPANDED_RICH_TEXT: &str = "slack#/types/expanded_rich_text";
    pub const FORMATTED_TEXT: &str = "slack#/types/formatted_text";
    pub const OAUTH2: &str = "slack#/types/credential/oauth2";
    pub const INTERACTIVITY: &str = "slack#/types/interactivity";
    pub const USER_CONTEXT: &str = "slack#/types/user_context";
}

/// External auth provider kinds
pub mod providers {
    pub const OAUTH2_CUSTOM: &str = "CUSTOM";
}

/// Bot scopes the platform requires for datastore access
pub const DATASTORE_READ_SCOPE: &str = "datastore:read";
pub const DATASTORE_WRITE_SCOPE: &str = "datastore:write";
